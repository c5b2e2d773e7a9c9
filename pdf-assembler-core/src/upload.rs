//! Turning dropped files into previewed source files
//!
//! Files are read, checked to be PDFs, base64 encoded and sent to a
//! [`PreviewLoader`] one at a time, so previews come back in drop order.
//! A file that fails any step is skipped and reported; the rest of the
//! batch carries on.
//!
//! Ingestion is split so a host can keep rendering while the network is
//! busy: the assembler hands out an [`IngestJob`], the job runs without
//! borrowing the assembler, and the resulting [`IngestBatch`] is committed
//! back in one step.

use crate::error::{AssemblerError, LoadError, Result};
use crate::model::{Preview, SourceFile};
use crate::notify::{Notification, Notifier};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, warn};

/// MIME type accepted by the drop zone
pub const PDF_MIME_TYPE: &str = "application/pdf";

const PDF_MAGIC: &[u8] = b"%PDF-";

/// A file handed to the drop zone
pub trait FileSource: Send + Sync {
    fn name(&self) -> String;

    /// Declared MIME type, if the host knows it
    fn mime_type(&self) -> Option<&str> {
        None
    }

    fn read(&self) -> std::io::Result<Vec<u8>>;
}

impl FileSource for PathBuf {
    fn name(&self) -> String {
        self.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.display().to_string())
    }

    fn read(&self) -> std::io::Result<Vec<u8>> {
        std::fs::read(self)
    }
}

/// A file whose content is already in memory, as delivered by a browser drop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedFile {
    pub name: String,
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl DroppedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: None,
            bytes,
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }
}

impl FileSource for DroppedFile {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    fn read(&self) -> std::io::Result<Vec<u8>> {
        Ok(self.bytes.clone())
    }
}

/// Base64 form of a file, as sent to the preview and build services
pub fn encode_file(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Whether `bytes` start with the PDF header
pub fn is_pdf(bytes: &[u8]) -> bool {
    bytes.starts_with(PDF_MAGIC)
}

/// Body sent to the preview service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewRequest {
    /// Base64 encoded PDF
    pub file: String,
    /// Resolution hint for the rendered thumbnails
    pub resolution: u32,
}

/// Body returned by the preview service
///
/// A missing page list means the service could not handle the file, which
/// is different from a document that has no pages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreviewResponse {
    #[serde(default)]
    pub pages: Option<Vec<Preview>>,
}

impl PreviewResponse {
    pub fn with_pages(pages: Vec<Preview>) -> Self {
        Self { pages: Some(pages) }
    }
}

/// Renders page previews for an encoded PDF
#[async_trait]
pub trait PreviewLoader: Send + Sync {
    async fn load_previews(
        &self,
        request: &PreviewRequest,
    ) -> std::result::Result<PreviewResponse, LoadError>;
}

/// A file left out of a batch and why
#[derive(Debug)]
pub struct SkippedFile {
    pub name: String,
    pub error: AssemblerError,
}

/// Outcome of running an [`IngestJob`]
#[derive(Debug, Default)]
pub struct IngestBatch {
    /// Successfully previewed files, in drop order
    pub files: Vec<SourceFile>,
    pub skipped: Vec<SkippedFile>,
}

impl IngestBatch {
    pub fn page_count(&self) -> usize {
        self.files.iter().map(|file| file.previews.len()).sum()
    }
}

/// Files waiting to be previewed
pub struct IngestJob {
    files: Vec<Box<dyn FileSource>>,
    resolution: u32,
}

impl IngestJob {
    pub fn new(files: Vec<Box<dyn FileSource>>, resolution: u32) -> Self {
        Self { files, resolution }
    }

    /// Preview every file in order, skipping and reporting failures
    pub async fn run(self, loader: &dyn PreviewLoader, notifier: &dyn Notifier) -> IngestBatch {
        let mut batch = IngestBatch::default();

        for source in &self.files {
            let name = source.name();
            match load_file(source.as_ref(), self.resolution, loader).await {
                Ok(file) => {
                    debug!(file = %name, pages = file.previews.len(), "previews loaded");
                    batch.files.push(file);
                }
                Err(error) => {
                    warn!(file = %name, %error, "skipping file");
                    notifier.notify(Notification::error(error.to_string()));
                    batch.skipped.push(SkippedFile { name, error });
                }
            }
        }

        debug!(
            files = batch.files.len(),
            pages = batch.page_count(),
            skipped = batch.skipped.len(),
            "batch previewed"
        );
        batch
    }
}

async fn load_file(
    source: &dyn FileSource,
    resolution: u32,
    loader: &dyn PreviewLoader,
) -> Result<SourceFile> {
    let name = source.name();

    if let Some(mime_type) = source.mime_type() {
        if mime_type != PDF_MIME_TYPE {
            return Err(AssemblerError::NotPdf(name));
        }
    }

    let bytes = source.read().map_err(|source| AssemblerError::FileRead {
        name: name.clone(),
        source,
    })?;
    if !is_pdf(&bytes) {
        return Err(AssemblerError::NotPdf(name));
    }

    let request = PreviewRequest {
        file: encode_file(&bytes),
        resolution,
    };

    let previews = loader
        .load_previews(&request)
        .await
        .and_then(|response| response.pages.ok_or(LoadError::MissingPages))
        .map_err(|source| AssemblerError::PreviewLoad {
            name: name.clone(),
            source,
        })?;

    if previews.is_empty() {
        return Err(AssemblerError::EmptyDocument(name));
    }

    Ok(SourceFile {
        name,
        pdf: request.file,
        previews,
    })
}

#[cfg(test)]
#[path = "upload_tests.rs"]
mod upload_tests;
