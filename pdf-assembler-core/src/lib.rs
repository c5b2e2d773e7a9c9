//! # pdf-assembler
//!
//! Headless engine behind a drag-and-drop PDF assembly widget. Users drop PDF
//! files, see a strip of page thumbnails, reorder pages by dragging, remove
//! pages, and finally submit the ordered page list to a service that builds
//! the combined document.
//!
//! ## Features
//!
//! - **Upload**: Files are checked, base64 encoded and previewed one by one; a failing file is skipped and reported
//! - **Geometry**: Thumbnails are scaled to a common height and laid out left to right
//! - **Live reordering**: A dragged page is spliced into a neighbour's slot once it passes that neighbour's midpoint
//! - **Page lifecycle**: New pages fade in and removed pages fade out on a deterministic timeline
//! - **Finalize**: The committed order plus per-page modifications is sent to a build service
//! - **HTTP backend**: Preview and build services reached over JSON endpoints (`http` feature)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf_assembler::{Assembler, AssemblerConfig, HttpBackend, TracingNotifier};
//! use std::path::PathBuf;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = HttpBackend::new("http://localhost:3001");
//! let notifier = TracingNotifier;
//! let mut assembler = Assembler::new(AssemblerConfig::default())?;
//!
//! // Preview two documents
//! let files = vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")];
//! assembler.ingest(files, &backend, &notifier).await?;
//! assembler.flush();
//!
//! // Move the last page to the front
//! let last = assembler.pages().len() - 1;
//! assembler.drag_start(last)?;
//! assembler.drag_move(-1000.0)?;
//! assembler.drag_end()?;
//!
//! let outcome = assembler.finalize("combined.pdf", &backend, &notifier).await?;
//! println!("{outcome:?}");
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`assembler`] - The widget state and its event handlers
//! - [`upload`] - File checks, encoding and preview ingestion
//! - [`geometry`] - Thumbnail sizes and positions
//! - [`reorder`] - Drag state machine and the midpoint rule
//! - [`lifecycle`] - Timed reveal and purge transitions
//! - [`finalize`] - Build requests and outcomes
//! - [`view`] - Render-ready snapshot for the host

pub mod assembler;
pub mod config;
pub mod error;
pub mod finalize;
pub mod geometry;
#[cfg(feature = "http")]
pub mod http;
pub mod lifecycle;
pub mod model;
pub mod modifications;
pub mod notify;
pub mod reorder;
pub mod upload;
pub mod view;

#[cfg(test)]
mod test_support;

pub use assembler::{Assembler, IngestSummary};
pub use config::{AssemblerConfig, ContentSlots};
pub use error::{AssemblerError, FinalizeError, LoadError, Result};
pub use finalize::{
    BuildOutcome, FinalizeButton, FinalizeOutcome, FinalizeRequest, PdfBuilder,
    DEFAULT_OUTPUT_NAME,
};
pub use geometry::{Dimensions, Layout, Position};
#[cfg(feature = "http")]
pub use http::HttpBackend;
pub use lifecycle::{Clock, ManualClock, SystemClock};
pub use model::{BuildData, Origin, PageCollection, PageRef, Preview, SourceFile};
pub use modifications::{Modification, RotationAngle};
pub use notify::{Notification, NotificationLevel, Notifier, RecordingNotifier, TracingNotifier};
pub use upload::{DroppedFile, FileSource, PreviewLoader, PreviewRequest, PreviewResponse};
pub use view::AssemblerView;

/// Current version of pdf-assembler
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_assembler_is_empty() {
        let assembler = Assembler::new(AssemblerConfig::default()).unwrap();
        assert!(assembler.pages().is_empty());
        assert!(!assembler.is_busy());
        assert!(assembler.view().finalize.disabled);
    }

    #[test]
    fn test_version_info() {
        assert!(!VERSION.is_empty());
    }
}
