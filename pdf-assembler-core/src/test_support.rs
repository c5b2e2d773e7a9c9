//! Collaborator doubles shared by the unit tests

use crate::error::{FinalizeError, LoadError};
use crate::finalize::{BuildOutcome, FinalizeRequest, PdfBuilder};
use crate::model::Preview;
use crate::upload::{DroppedFile, PreviewLoader, PreviewRequest, PreviewResponse};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Minimal bytes that pass the PDF header check
pub fn pdf_file(name: &str) -> DroppedFile {
    DroppedFile::new(name, format!("%PDF-1.7\n% {name}\n").into_bytes())
}

/// `count` portrait previews of 85x110 with distinct URIs
pub fn previews(tag: &str, count: usize) -> Vec<Preview> {
    (0..count)
        .map(|i| Preview::new(format!("data:{tag}/{i}"), 85.0, 110.0))
        .collect()
}

/// Answers preview requests from a queue, in call order
#[derive(Default)]
pub struct ScriptedLoader {
    responses: Mutex<VecDeque<Result<PreviewResponse, LoadError>>>,
    requests: Mutex<Vec<PreviewRequest>>,
}

impl ScriptedLoader {
    pub fn new(responses: Vec<Result<PreviewResponse, LoadError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<PreviewRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PreviewLoader for ScriptedLoader {
    async fn load_previews(&self, request: &PreviewRequest) -> Result<PreviewResponse, LoadError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(LoadError::MissingPages))
    }
}

/// Returns one fixed outcome and remembers what it was asked to build
pub struct FixedBuilder {
    outcome: Result<BuildOutcome, FinalizeError>,
    requests: Mutex<Vec<FinalizeRequest>>,
}

impl FixedBuilder {
    pub fn new(outcome: Result<BuildOutcome, FinalizeError>) -> Self {
        Self {
            outcome,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<FinalizeRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PdfBuilder for FixedBuilder {
    async fn build_pdf(&self, request: &FinalizeRequest) -> Result<BuildOutcome, FinalizeError> {
        self.requests.lock().unwrap().push(request.clone());
        self.outcome.clone()
    }
}

/// Never answers; for builds the host gives up on
pub struct StalledBuilder;

#[async_trait]
impl PdfBuilder for StalledBuilder {
    async fn build_pdf(&self, _request: &FinalizeRequest) -> Result<BuildOutcome, FinalizeError> {
        std::future::pending().await
    }
}
