//! Shared helpers for the integration tests: an in-process preview and
//! build service plus small PDF-shaped fixtures.

#![allow(dead_code)]

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use pdf_assembler::{DroppedFile, FinalizeRequest, Preview, PreviewRequest, PreviewResponse};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Bytes that pass the PDF header check and tell the mock service how many pages to render
pub fn pdf_bytes(pages: usize) -> Vec<u8> {
    format!("%PDF-1.7\n%pages={pages}\n%%EOF\n").into_bytes()
}

pub fn pdf_file(name: &str, pages: usize) -> DroppedFile {
    DroppedFile::new(name, pdf_bytes(pages)).with_mime_type("application/pdf")
}

/// A PDF the mock service refuses with a 500
pub fn broken_pdf(name: &str) -> DroppedFile {
    DroppedFile::new(name, b"%PDF-1.7\n%status=500\n".to_vec())
}

/// A PDF the mock service answers without a page list
pub fn unreadable_pdf(name: &str) -> DroppedFile {
    DroppedFile::new(name, b"%PDF-1.7\n%garbage\n".to_vec())
}

/// Recorded traffic of the mock service
#[derive(Clone, Default)]
pub struct MockService {
    pub previews: Arc<Mutex<Vec<PreviewRequest>>>,
    pub builds: Arc<Mutex<Vec<FinalizeRequest>>>,
    pub fail_builds: Arc<AtomicBool>,
}

impl MockService {
    pub fn preview_requests(&self) -> Vec<PreviewRequest> {
        self.previews.lock().unwrap().clone()
    }

    pub fn build_requests(&self) -> Vec<FinalizeRequest> {
        self.builds.lock().unwrap().clone()
    }

    pub fn set_fail_builds(&self, fail: bool) {
        self.fail_builds.store(fail, Ordering::SeqCst);
    }
}

fn page_count(text: &str) -> Option<usize> {
    text.lines()
        .find_map(|line| line.strip_prefix("%pages="))
        .and_then(|count| count.trim().parse().ok())
}

async fn render_pdf(
    State(service): State<MockService>,
    Json(request): Json<PreviewRequest>,
) -> Response {
    service.previews.lock().unwrap().push(request.clone());

    let Ok(bytes) = STANDARD.decode(&request.file) else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    let text = String::from_utf8_lossy(&bytes);
    if text.contains("%status=500") {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    let response = match page_count(&text) {
        Some(count) => PreviewResponse::with_pages(
            (0..count)
                .map(|i| {
                    // Alternate portrait and landscape so widths differ
                    let (width, height) = if i % 2 == 0 { (85.0, 110.0) } else { (110.0, 85.0) };
                    Preview::new(format!("data:image/png;base64,page{i}"), width, height)
                })
                .collect(),
        ),
        None => PreviewResponse::default(),
    };
    Json(response).into_response()
}

async fn build_pdf(
    State(service): State<MockService>,
    Json(request): Json<FinalizeRequest>,
) -> Response {
    if service.fail_builds.load(Ordering::SeqCst) {
        return StatusCode::BAD_GATEWAY.into_response();
    }

    let order: Vec<String> = request.pages.iter().map(|p| p.origin.to_string()).collect();
    service.builds.lock().unwrap().push(request);

    let body = format!("%PDF-1.7\n% {}\n%%EOF\n", order.join(" "));
    ([(header::CONTENT_TYPE, "application/pdf")], body.into_bytes()).into_response()
}

pub fn router(service: MockService) -> Router {
    Router::new()
        .route("/render-pdf", post(render_pdf))
        .route("/build-pdf", post(build_pdf))
        .with_state(service)
}

/// Serve the mock on an ephemeral port; returns its base URL
pub async fn spawn_service() -> (String, MockService) {
    let service = MockService::default();
    let app = router(service.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), service)
}
