//! Preview and build services reached over HTTP
//!
//! The backend exposes two JSON endpoints next to each other:
//! `POST {base}/render-pdf` answers a [`PreviewRequest`] with a
//! [`PreviewResponse`], and `POST {base}/build-pdf` answers a
//! [`FinalizeRequest`] with the PDF bytes.

use crate::error::{FinalizeError, LoadError};
use crate::finalize::{BuildOutcome, FinalizeRequest, PdfBuilder};
use crate::upload::{PreviewLoader, PreviewRequest, PreviewResponse, PDF_MIME_TYPE};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

#[async_trait]
impl PreviewLoader for HttpBackend {
    async fn load_previews(&self, request: &PreviewRequest) -> Result<PreviewResponse, LoadError> {
        let url = self.endpoint("render-pdf");
        debug!(%url, resolution = request.resolution, "requesting previews");

        let response = self
            .client
            .post(&url)
            .header(ACCEPT, "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| LoadError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status(status.as_u16()));
        }

        response
            .json::<PreviewResponse>()
            .await
            .map_err(|e| LoadError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl PdfBuilder for HttpBackend {
    async fn build_pdf(&self, request: &FinalizeRequest) -> Result<BuildOutcome, FinalizeError> {
        let url = self.endpoint("build-pdf");
        debug!(%url, pages = request.pages.len(), "requesting build");

        let response = self
            .client
            .post(&url)
            .header(ACCEPT, PDF_MIME_TYPE)
            .json(request)
            .send()
            .await
            .map_err(|e| FinalizeError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FinalizeError::Status(status.as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FinalizeError::Transport(e.to_string()))?;

        Ok(BuildOutcome::Document(bytes.to_vec()))
    }
}
