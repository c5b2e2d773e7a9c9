//! Submitting the assembled page list to the build service

use crate::error::FinalizeError;
use crate::model::{BuildData, Origin};
use crate::modifications::Modification;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Default name of the assembled document
pub const DEFAULT_OUTPUT_NAME: &str = "assembled.pdf";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilePayload {
    /// Base64 encoded PDF
    pub pdf: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagePayload {
    pub origin: Origin,
    pub modifications: Vec<Modification>,
}

/// Body sent to the build service; pages are in output order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalizeRequest {
    pub name: String,
    pub files: Vec<FilePayload>,
    pub pages: Vec<PagePayload>,
}

impl FinalizeRequest {
    /// Snapshot of the committed page order
    ///
    /// Pages for which `is_leaving` holds are left behind. Hidden pages that
    /// are only waiting to be revealed are part of the document.
    pub fn from_build_data(
        name: impl Into<String>,
        data: &BuildData,
        is_leaving: impl Fn(Origin) -> bool,
    ) -> Self {
        Self {
            name: name.into(),
            files: data
                .files
                .iter()
                .map(|file| FilePayload {
                    pdf: file.pdf.clone(),
                })
                .collect(),
            pages: data
                .pages
                .iter()
                .filter(|page| !is_leaving(page.origin))
                .map(|page| PagePayload {
                    origin: page.origin,
                    modifications: page.modifications.clone(),
                })
                .collect(),
        }
    }
}

/// What a build service can answer with
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    /// The finished PDF
    Document(Vec<u8>),
    /// The service dealt with the result itself; only reset the loading state
    ResetLoading,
}

/// Builds the final PDF from an assembled page list
#[async_trait]
pub trait PdfBuilder: Send + Sync {
    async fn build_pdf(&self, request: &FinalizeRequest) -> Result<BuildOutcome, FinalizeError>;
}

/// State of the host's finalize button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FinalizeButton {
    pub loading: bool,
    pub disabled: bool,
}

/// What the host should do once a build completes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinalizeOutcome {
    /// Offer the bytes to the user as a download named `name`
    Download { name: String, bytes: Vec<u8> },
    /// Nothing to offer; the button is usable again
    Reset,
    /// The build failed and the user was notified
    Failed(String),
}
