//! The form container: owns the form state, keeps the location fields in
//! line with the fetched options, and drives a submission.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use tracing::{debug, error, info};

use crate::api::EstimationApi;
use crate::error::SubmitError;
use crate::form::container::{Alert, FormInput, FormState};
use crate::form::fields::Field;
use crate::form::validation::missing_recommended;
use crate::location::{reconcile, LocationResolver};
use crate::models::FormRecord;
use crate::pipeline::{SubmissionPipeline, SubmitOutcome};
use crate::state::{AppStores, Draft};

/// Photo thumbnail shown on the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub file_name: String,
    pub data_url: String,
}

/// Snapshot of everything the form page renders
#[derive(Debug, Clone)]
pub struct FormView {
    pub record: FormRecord,
    pub cities: Vec<String>,
    pub districts: Vec<String>,
    pub messages: BTreeMap<Field, String>,
    pub raw_inputs: BTreeMap<Field, String>,
    pub previews: Vec<Preview>,
    pub alert: Option<Alert>,
    pub processing: bool,
    pub draft_saved_at: Option<DateTime<Utc>>,
}

pub struct FormController {
    state: Mutex<FormState>,
    resolver: LocationResolver,
    pipeline: SubmissionPipeline,
    stores: AppStores,
}

impl FormController {
    pub fn new(api: Arc<dyn EstimationApi>, stores: AppStores) -> Self {
        Self {
            state: Mutex::new(FormState::new(stores.draft.get())),
            resolver: LocationResolver::new(Arc::clone(&api)),
            pipeline: SubmissionPipeline::new(api, stores.clone()),
            stores,
        }
    }

    fn state(&self) -> MutexGuard<'_, FormState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn resolver(&self) -> &LocationResolver {
        &self.resolver
    }

    /// Load the page: fetch cities, then the districts of the chosen city
    pub async fn mount(&self) -> FormView {
        self.resolver.load_cities().await;
        self.sync_location().await;
        self.view()
    }

    /// Apply edits without submitting. Rejected while a submission runs.
    pub async fn edit(&self, input: FormInput) -> Result<FormView, SubmitError> {
        {
            let mut state = self.state();
            if state.is_processing() {
                return Err(SubmitError::Busy);
            }
            if state.apply(&input) {
                debug!(city = %state.record.city, "City changed");
            }
        }

        if self.resolver.cities().is_empty() {
            self.resolver.load_cities().await;
        }
        self.sync_location().await;
        Ok(self.view())
    }

    /// Validate, save the draft and run the submission pipeline.
    ///
    /// On success the caller navigates to the results page. On failure the
    /// alert is stored on the form and it becomes editable again.
    pub async fn submit(&self, input: FormInput) -> Result<SubmitOutcome, SubmitError> {
        {
            let mut state = self.state();
            if state.is_processing() {
                return Err(SubmitError::Busy);
            }
            state.apply(&input);
        }

        if self.resolver.cities().is_empty() {
            self.resolver.load_cities().await;
        }
        self.sync_location().await;

        let (record, attachments) = {
            let mut state = self.state();
            if state.is_processing() {
                return Err(SubmitError::Busy);
            }

            state.touch_all();
            let errors = state.errors();
            if !errors.is_empty() {
                debug!(fields = ?errors.keys().collect::<Vec<_>>(), "Submission blocked by validation");
                return Err(SubmitError::Invalid(errors));
            }

            state.begin_processing();
            (state.record.clone(), state.attachments.clone())
        };

        info!(
            city = %record.city,
            district = %record.district,
            photos = attachments.len(),
            "Submitting form"
        );
        self.stores
            .draft
            .set(Some(Draft::new(record.clone(), attachments.clone())));

        let processing = ProcessingGuard { state: &self.state };
        let result = self.pipeline.run(&record, &attachments).await;
        drop(processing);

        if let Err(err) = &result {
            error!(error = %err, "Submission failed");
            let mut message = err.to_string();
            if matches!(err, SubmitError::Estimate(_)) {
                let missing = missing_recommended(&record);
                if !missing.is_empty() {
                    let labels: Vec<_> = missing.iter().map(|f| f.label()).collect();
                    message.push_str(&format!(". Uzupełnij pola: {}", labels.join(", ")));
                }
            }
            self.state().alert = Some(Alert {
                message,
                results_available: err.price_stored(),
            });
        }
        result
    }

    /// Start over with an empty form and forget the draft
    pub fn reset(&self) -> Result<(), SubmitError> {
        let mut state = self.state();
        if state.is_processing() {
            return Err(SubmitError::Busy);
        }

        *state = FormState::default();
        self.stores.draft.set(None);
        info!("Form reset");
        Ok(())
    }

    /// Districts of any city. The form's own options are not affected.
    pub async fn districts(&self, city: &str) -> Vec<String> {
        self.resolver.lookup_districts(city).await
    }

    pub fn view(&self) -> FormView {
        let state = self.state();
        let districts = self
            .resolver
            .districts_for(&state.record.city)
            .unwrap_or_default();

        FormView {
            record: state.record.clone(),
            cities: self.resolver.cities(),
            districts,
            messages: state.messages(),
            raw_inputs: state.raw_inputs(),
            previews: state
                .attachments
                .iter()
                .map(|a| Preview {
                    file_name: a.file_name.clone(),
                    data_url: a.preview_data_url(),
                })
                .collect(),
            alert: state.alert.clone(),
            processing: state.is_processing(),
            draft_saved_at: self.stores.draft.get().map(|d| d.saved_at),
        }
    }

    /// Seed the city, fetch its districts, seed the district.
    ///
    /// Districts are fetched again whenever the city has no stored list,
    /// which includes a city whose last lookup failed.
    ///
    /// The record is left alone while a submission is running.
    async fn sync_location(&self) {
        let cities = self.resolver.cities();
        let city = {
            let mut state = self.state();
            if !state.is_processing() {
                reconcile(&mut state.record, &cities, &[]);
            }
            state.record.city.clone()
        };

        if self.resolver.districts_for(&city).is_none() {
            self.resolver.select_city(&city).await;
        }

        let mut state = self.state();
        if state.is_processing() {
            return;
        }
        // the city may have changed while the lookup was in flight
        if let Some(districts) = self.resolver.districts_for(&state.record.city) {
            reconcile(&mut state.record, &cities, &districts);
        }
    }
}

/// Returns the form to `Idle` when the submission ends, including when the
/// request future is dropped mid-flight.
struct ProcessingGuard<'a> {
    state: &'a Mutex<FormState>,
}

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .finish_processing();
    }
}
