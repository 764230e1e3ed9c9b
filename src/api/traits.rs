use crate::models::{Attachment, FormRecord, PhotoFeedback, PriceResult};
use anyhow::Result;
use async_trait::async_trait;

/// Operations the front end needs from the estimation service
#[async_trait]
pub trait EstimationApi: Send + Sync {
    /// Cities the service knows about
    async fn cities(&self) -> Result<Vec<String>>;

    /// Districts of one city, in the order the service returns them
    async fn districts(&self, city: &str) -> Result<Vec<String>>;

    /// Price estimate for the scalar fields of a record
    async fn estimate(&self, record: &FormRecord) -> Result<PriceResult>;

    /// Upload photos with the record as metadata and get feedback back
    async fn upload_photos(
        &self,
        files: &[Attachment],
        record: &FormRecord,
    ) -> Result<PhotoFeedback>;
}
