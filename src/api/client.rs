use crate::api::traits::EstimationApi;
use crate::api::types::{flatten_names, NamedEntry, PhotoFeedbackResponse, PriceEstimate};
use crate::models::{Attachment, FormRecord, PhotoFeedback, PriceResult};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, Url};
use std::time::Duration;
use tracing::{debug, warn};

/// Estimation service reached over HTTP
pub struct HttpEstimationApi {
    client: Client,
    base_url: Url,
}

impl HttpEstimationApi {
    /// Create a client for the service at `base_url`
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("Invalid estimation API URL: {base_url}"))?;

        if base_url.cannot_be_a_base() {
            anyhow::bail!("Estimation API URL cannot be used as a base: {base_url}");
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("flat-valuer/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, base_url })
    }

    /// Base URL with `segments` appended, each one percent-encoded
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("Estimation API URL cannot be used as a base"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn check(response: Response, what: &str) -> Result<Response> {
        let status = response.status();
        if !status.is_success() {
            warn!("{} returned status: {}", what, status);
            anyhow::bail!("{what} failed: {status}");
        }
        Ok(response)
    }
}

#[async_trait]
impl EstimationApi for HttpEstimationApi {
    async fn cities(&self) -> Result<Vec<String>> {
        let url = self.endpoint(&["cities"])?;
        debug!("Fetching cities from {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to fetch cities")?;
        let entries: Vec<NamedEntry> = Self::check(response, "City lookup")
            .await?
            .json()
            .await
            .context("Failed to decode city list")?;

        Ok(flatten_names(entries))
    }

    async fn districts(&self, city: &str) -> Result<Vec<String>> {
        let url = self.endpoint(&["cities", city])?;
        debug!("Fetching districts from {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch districts of {city}"))?;
        let entries: Vec<NamedEntry> = Self::check(response, "District lookup")
            .await?
            .json()
            .await
            .context("Failed to decode district list")?;

        Ok(flatten_names(entries))
    }

    async fn estimate(&self, record: &FormRecord) -> Result<PriceResult> {
        let url = self.endpoint(&["estimate"])?;
        debug!("Requesting estimate from {}", url);

        let response = self
            .client
            .post(url)
            .json(record)
            .send()
            .await
            .context("Failed to send estimate request")?;
        let estimate: PriceEstimate = Self::check(response, "Estimate")
            .await?
            .json()
            .await
            .context("Failed to decode estimate")?;

        Ok(estimate.into())
    }

    async fn upload_photos(
        &self,
        files: &[Attachment],
        record: &FormRecord,
    ) -> Result<PhotoFeedback> {
        let url = self.endpoint(&["upload"])?;
        debug!("Uploading {} photo(s) to {}", files.len(), url);

        let parameters =
            serde_json::to_string(record).context("Failed to serialize form parameters")?;
        let mut form = Form::new().text("parameters", parameters);
        for file in files {
            let part = Part::bytes(file.bytes.clone())
                .file_name(file.file_name.clone())
                .mime_str(&file.content_type)
                .with_context(|| format!("Invalid content type of {}", file.file_name))?;
            form = form.part("files", part);
        }

        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .context("Failed to upload photos")?;
        let feedback: PhotoFeedbackResponse = Self::check(response, "Photo upload")
            .await?
            .json()
            .await
            .context("Failed to decode photo feedback")?;

        Ok(feedback.into())
    }
}
