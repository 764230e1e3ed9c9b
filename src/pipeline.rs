//! Submission pipeline: estimate first, then photos, never in parallel.

use std::sync::Arc;

use tracing::{info, warn};

use crate::api::EstimationApi;
use crate::error::SubmitError;
use crate::models::{Attachment, FormRecord, PhotoFeedback, PriceResult};
use crate::state::AppStores;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub price: PriceResult,
    pub feedback: PhotoFeedback,
}

pub struct SubmissionPipeline {
    api: Arc<dyn EstimationApi>,
    stores: AppStores,
}

impl SubmissionPipeline {
    pub fn new(api: Arc<dyn EstimationApi>, stores: AppStores) -> Self {
        Self { api, stores }
    }

    /// Run both calls and fill the result stores.
    ///
    /// A failed estimate stops before the upload. A failed upload keeps the
    /// stored price and resets the feedback store so feedback from an
    /// earlier submission is not shown next to the new price.
    pub async fn run(
        &self,
        record: &FormRecord,
        attachments: &[Attachment],
    ) -> Result<SubmitOutcome, SubmitError> {
        let price = self
            .api
            .estimate(record)
            .await
            .map_err(SubmitError::Estimate)?;
        info!(price = price.0, "Estimate received");
        self.stores.price.set(price);

        let feedback = match self.api.upload_photos(attachments, record).await {
            Ok(feedback) => feedback,
            Err(error) => {
                warn!(?error, "Photo upload failed after a successful estimate");
                self.stores.feedback.set(PhotoFeedback::default());
                return Err(SubmitError::Upload(error));
            }
        };
        info!(score = feedback.score, photos = attachments.len(), "Photo feedback received");
        self.stores.feedback.set(feedback.clone());

        Ok(SubmitOutcome { price, feedback })
    }
}
