use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssemblerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Previews are still loading")]
    Busy,

    #[error("A page is being dragged")]
    DragInProgress,

    #[error("No page is being dragged")]
    NoActiveDrag,

    #[error("Page index {0} out of bounds (collection has {1} pages)")]
    PageIndexOutOfBounds(usize, usize),

    #[error("Page {0} is being removed")]
    PageDisappearing(usize),

    #[error("No pages to assemble")]
    NoPages,

    #[error("A PDF is already being built")]
    FinalizeInProgress,

    #[error("Invalid rotation angle: {0} (must be a multiple of 90)")]
    InvalidRotation(i32),

    #[error("Failed to read {name}: {source}")]
    FileRead {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0} is not a PDF file")]
    NotPdf(String),

    #[error("{0} contains no pages")]
    EmptyDocument(String),

    #[error("Failed to load previews for {name}: {source}")]
    PreviewLoad {
        name: String,
        #[source]
        source: LoadError,
    },

    #[error("Failed to build PDF: {0}")]
    Finalize(#[from] FinalizeError),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, AssemblerError>;

/// Failure reported by a preview loading collaborator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The service answered without a page list
    #[error("preview service returned no page list")]
    MissingPages,

    /// The request never completed
    #[error("transport error: {0}")]
    Transport(String),

    /// The service answered with a non-success status
    #[error("preview service responded with status {0}")]
    Status(u16),

    /// The response body could not be decoded
    #[error("invalid preview response: {0}")]
    InvalidResponse(String),
}

/// Failure reported by a PDF build collaborator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FinalizeError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("build service responded with status {0}")]
    Status(u16),
}
