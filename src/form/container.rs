//! Synchronous form state: the record being edited, which fields the user
//! has touched, rejected input, and whether a submission is running.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::form::fields::{Field, FieldError, FieldKind};
use crate::form::validation::{is_required, validate};
use crate::models::{Attachment, AttachmentError, FormRecord};
use crate::state::Draft;

/// One posted form: raw values by input name plus the attached files
#[derive(Debug, Clone, Default)]
pub struct FormInput {
    pub values: HashMap<String, String>,
    pub files: Vec<Attachment>,
    pub rejected_files: Vec<AttachmentError>,
}

impl FormInput {
    pub fn value(&self, field: Field) -> Option<&str> {
        self.values.get(field.name()).map(String::as_str)
    }

    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        self.values.insert(field.name().to_string(), value.into());
        self
    }
}

/// Message shown above the form after a failed submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub message: String,
    /// The price was stored even though a later step failed
    pub results_available: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Idle,
    Processing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Rejected {
    raw: String,
    error: FieldError,
}

#[derive(Debug, Clone, Default)]
pub struct FormState {
    pub record: FormRecord,
    pub attachments: Vec<Attachment>,
    pub alert: Option<Alert>,
    touched: BTreeSet<Field>,
    rejected: BTreeMap<Field, Rejected>,
    status: Status,
}

impl FormState {
    /// Start from the saved draft if there is one
    pub fn new(draft: Option<Draft>) -> Self {
        match draft {
            Some(draft) => Self {
                record: draft.record,
                attachments: draft.attachments,
                ..Default::default()
            },
            None => Self::default(),
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_processing(&self) -> bool {
        self.status == Status::Processing
    }

    pub fn begin_processing(&mut self) {
        self.status = Status::Processing;
        self.alert = None;
    }

    pub fn finish_processing(&mut self) {
        self.status = Status::Idle;
    }

    /// Apply a full form post.
    ///
    /// Unchecked checkboxes are absent from a post, so every toggle is set
    /// from presence. A browser posts every input, so only inputs whose
    /// value differs from what the form showed count as touched. A new city
    /// clears a district carried over from the
    /// previous city. New files replace the attachments, an empty file list
    /// keeps the previous ones. Returns true if the city changed.
    pub fn apply(&mut self, input: &FormInput) -> bool {
        let previous_city = self.record.city.clone();
        let previous_district = self.record.district.clone();

        for field in Field::ALL {
            let raw = match (field.kind(), input.value(field)) {
                (FieldKind::Files, _) => continue,
                (FieldKind::Toggle, value) => value.unwrap_or(""),
                (_, Some(value)) => value,
                (_, None) => continue,
            };

            let was_checked = field.is_checked(&self.record);
            let shown = match self.rejected.get(&field) {
                Some(rejected) => rejected.raw.clone(),
                None => field.display(&self.record),
            };

            let result = field.apply(&mut self.record, raw);

            let changed = match field.kind() {
                FieldKind::Toggle => field.is_checked(&self.record) != was_checked,
                _ => raw.trim() != shown.trim(),
            };
            if changed {
                self.touched.insert(field);
            }

            match result {
                Ok(()) => {
                    self.rejected.remove(&field);
                }
                Err(error) => {
                    self.rejected.insert(
                        field,
                        Rejected {
                            raw: raw.to_string(),
                            error,
                        },
                    );
                }
            }
        }

        if !input.files.is_empty() {
            self.attachments = input.files.clone();
        }
        if input.rejected_files.is_empty() {
            self.rejected.remove(&Field::Photos);
        } else {
            let message = input
                .rejected_files
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            self.rejected.insert(
                Field::Photos,
                Rejected {
                    raw: String::new(),
                    error: FieldError::Attachment(message),
                },
            );
        }

        let city_changed = self.record.city != previous_city;
        if city_changed && self.record.district == previous_district {
            self.record.district.clear();
        }
        city_changed
    }

    /// Mark every field as touched, done when the user submits
    pub fn touch_all(&mut self) {
        self.touched.extend(Field::ALL);
    }

    /// Every problem that blocks submission
    pub fn errors(&self) -> BTreeMap<Field, FieldError> {
        let mut errors = validate(&self.record);
        for (field, rejected) in &self.rejected {
            errors.insert(*field, rejected.error.clone());
        }
        errors
    }

    /// Problems worth showing: touched fields only
    pub fn messages(&self) -> BTreeMap<Field, String> {
        self.errors()
            .into_iter()
            .filter(|(field, _)| self.touched.contains(field))
            .map(|(field, error)| (field, error.to_string()))
            .collect()
    }

    /// Text the user typed that could not be stored, shown back in the input
    pub fn raw_inputs(&self) -> BTreeMap<Field, String> {
        self.rejected
            .iter()
            .filter(|(_, r)| !r.raw.is_empty())
            .map(|(field, r)| (*field, r.raw.clone()))
            .collect()
    }

    /// True for a required field the user touched and left empty
    pub fn is_missing(&self, field: Field) -> bool {
        is_required(field) && self.touched.contains(&field) && !field.is_filled(&self.record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HeatingType;
    use pretty_assertions::assert_eq;

    #[test]
    fn draft_restores_record_and_attachments() {
        let record = FormRecord {
            city: "Gdańsk".into(),
            ..Default::default()
        };
        let photo = Attachment::image("a.jpg", "image/jpeg", vec![1]).unwrap();

        let state = FormState::new(Some(Draft::new(record.clone(), vec![photo.clone()])));

        assert_eq!(state.record, record);
        assert_eq!(state.attachments, vec![photo]);
        assert_eq!(state.status(), Status::Idle);
    }

    #[test]
    fn untouched_empty_fields_show_no_message() {
        let state = FormState::default();

        assert!(!state.errors().is_empty());
        assert!(state.messages().is_empty());
        assert!(!state.is_missing(Field::Area));
    }

    #[test]
    fn touched_and_empty_shows_a_message() {
        let mut state = FormState::default();
        state.apply(&FormInput::default().with(Field::Area, "45"));

        state.apply(&FormInput::default().with(Field::Area, ""));

        assert!(state.is_missing(Field::Area));
        assert_eq!(
            state.messages().get(&Field::Area).map(String::as_str),
            Some("To pole jest wymagane")
        );
        assert!(!state.messages().contains_key(&Field::Rooms));
    }

    #[test]
    fn reposting_unchanged_values_touches_nothing() {
        let mut state = FormState::default();

        state.apply(
            &FormInput::default()
                .with(Field::City, "Gdańsk")
                .with(Field::Area, "")
                .with(Field::Rooms, "")
                .with(Field::Heating, "miejskie"),
        );

        assert_eq!(state.record.city, "Gdańsk");
        assert!(state.messages().is_empty());

        state.touch_all();
        assert!(state.messages().contains_key(&Field::Area));
        assert!(state.messages().contains_key(&Field::Rooms));
    }

    #[test]
    fn rejected_input_is_kept_for_display_and_blocks() {
        let mut state = FormState::default();

        state.apply(&FormInput::default().with(Field::Rooms, "dwa"));

        assert_eq!(state.record.rooms, None);
        assert_eq!(state.raw_inputs().get(&Field::Rooms).map(String::as_str), Some("dwa"));
        assert_eq!(state.errors().get(&Field::Rooms), Some(&FieldError::NotANumber));

        state.apply(&FormInput::default().with(Field::Rooms, "2"));
        assert!(state.raw_inputs().is_empty());
        assert_eq!(state.record.rooms, Some(2));
    }

    #[test]
    fn changing_city_clears_district() {
        let mut state = FormState::default();
        state.apply(
            &FormInput::default()
                .with(Field::City, "Warszawa")
                .with(Field::District, "Wola"),
        );
        assert_eq!(state.record.district, "Wola");

        let changed = state.apply(
            &FormInput::default()
                .with(Field::City, "Kraków")
                .with(Field::District, "Wola"),
        );

        assert!(changed);
        assert_eq!(state.record.district, "");
    }

    #[test]
    fn absent_checkboxes_are_unchecked() {
        let mut state = FormState::default();
        state.apply(&FormInput::default().with(Field::Elevator, "on"));
        assert!(state.record.elevator);

        state.apply(&FormInput::default().with(Field::Heating, "inne"));

        assert!(!state.record.elevator);
        assert_eq!(state.record.heating, HeatingType::Other);
    }

    #[test]
    fn empty_file_list_keeps_previous_attachments() {
        let photo = Attachment::image("kuchnia.jpg", "image/jpeg", vec![9]).unwrap();
        let mut state = FormState::default();

        state.apply(&FormInput {
            files: vec![photo.clone()],
            ..Default::default()
        });
        state.apply(&FormInput::default());

        assert_eq!(state.attachments, vec![photo]);
    }

    #[test]
    fn rejected_files_block_submission() {
        let mut state = FormState::default();
        state.apply(&FormInput {
            rejected_files: vec![AttachmentError::NotAnImage {
                file_name: "umowa.pdf".into(),
                content_type: "application/pdf".into(),
            }],
            ..Default::default()
        });
        state.touch_all();

        assert!(state.messages()[&Field::Photos].contains("umowa.pdf"));
    }

    #[test]
    fn processing_clears_the_alert() {
        let mut state = FormState {
            alert: Some(Alert {
                message: "błąd".into(),
                results_available: false,
            }),
            ..Default::default()
        };

        state.begin_processing();
        assert!(state.is_processing());
        assert!(state.alert.is_none());

        state.finish_processing();
        assert!(!state.is_processing());
    }
}
