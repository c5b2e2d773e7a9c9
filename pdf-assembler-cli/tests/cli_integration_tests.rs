//! Integration tests for the pdfasm CLI
//!
//! Tests command-line interface functionality including:
//! - Command parsing and validation
//! - Assembly against an in-process preview and build service
//! - Error handling and exit codes

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Output;
use tempfile::{tempdir, TempDir};

/// Test helper to get the CLI binary path
fn get_cli_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_pdfasm"))
}

/// Test helper to create a temporary directory
fn setup_temp_dir() -> TempDir {
    tempdir().expect("Failed to create temp directory")
}

/// Test helper to run CLI command and return output
async fn run_cli_command(args: &[&str]) -> Output {
    tokio::process::Command::new(get_cli_path())
        .args(args)
        .output()
        .await
        .expect("Failed to run CLI")
}

/// Write a PDF-shaped file the mock service renders as `pages` pages
fn write_pdf(dir: &Path, name: &str, pages: usize) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("%PDF-1.7\n%pages={pages}\n%%EOF\n")).unwrap();
    path
}

async fn render_pdf(Json(request): Json<Value>) -> Response {
    let file = request["file"].as_str().unwrap_or_default();
    let Ok(bytes) = STANDARD.decode(file) else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    let text = String::from_utf8_lossy(&bytes);
    let Some(count) = text
        .lines()
        .find_map(|line| line.strip_prefix("%pages="))
        .and_then(|count| count.parse::<usize>().ok())
    else {
        return Json(json!({})).into_response();
    };

    let pages: Vec<Value> = (0..count)
        .map(|i| {
            json!({
                "uri": format!("data:image/png;base64,page{i}"),
                "dimensions": {"width": 85.0, "height": 110.0}
            })
        })
        .collect();
    Json(json!({ "pages": pages })).into_response()
}

async fn build_pdf(Json(request): Json<Value>) -> Response {
    let pages: Vec<String> = request["pages"]
        .as_array()
        .map(|pages| {
            pages
                .iter()
                .map(|page| {
                    let origin = &page["origin"];
                    let rotation = page["modifications"]
                        .as_array()
                        .and_then(|m| m.first())
                        .and_then(|m| m["degrees"].as_i64())
                        .unwrap_or(0);
                    format!("{}:{}@{}", origin["file"], origin["page"], rotation)
                })
                .collect()
        })
        .unwrap_or_default();

    let body = format!(
        "%PDF-1.7\n% {} {}\n%%EOF\n",
        request["name"].as_str().unwrap_or_default(),
        pages.join(" ")
    );
    ([(header::CONTENT_TYPE, "application/pdf")], body).into_response()
}

/// Serve the mock backend on an ephemeral port
async fn spawn_backend() -> String {
    let app = Router::new()
        .route("/render-pdf", post(render_pdf))
        .route("/build-pdf", post(build_pdf));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn test_cli_help() {
    let output = run_cli_command(&["--help"]).await;

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("assemble"));
    assert!(stdout.contains("previews"));
}

#[tokio::test]
async fn test_cli_config_prints_defaults() {
    let output = run_cli_command(&["config"]).await;

    assert!(output.status.success());
    let config: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(config["preview_resolution"], 100);
    assert_eq!(config["removal_delay_ms"], 300);
}

#[tokio::test]
async fn test_cli_assemble_requires_output() {
    let output = run_cli_command(&["assemble", "a.pdf", "--backend", "http://localhost:1"]).await;

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--output"));
}

#[tokio::test]
async fn test_cli_rejects_bad_rotation() {
    let temp_dir = setup_temp_dir();
    let input = write_pdf(temp_dir.path(), "a.pdf", 1);
    let output_path = temp_dir.path().join("out.pdf");

    let output = run_cli_command(&[
        "assemble",
        input.to_str().unwrap(),
        "--backend",
        "http://localhost:1",
        "-o",
        output_path.to_str().unwrap(),
        "--rotate",
        "1:45",
    ])
    .await;

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("multiple of 90"));
    assert!(!output_path.exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_cli_previews() {
    let backend = spawn_backend().await;
    let temp_dir = setup_temp_dir();
    let first = write_pdf(temp_dir.path(), "first.pdf", 2);
    let second = write_pdf(temp_dir.path(), "second.pdf", 1);

    let output = run_cli_command(&[
        "previews",
        first.to_str().unwrap(),
        second.to_str().unwrap(),
        "--backend",
        &backend,
    ])
    .await;

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Pages: 3"));
    assert!(stdout.contains("first.pdf page 2"));
    assert!(stdout.contains("second.pdf page 1"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_cli_assemble() {
    let backend = spawn_backend().await;
    let temp_dir = setup_temp_dir();
    let first = write_pdf(temp_dir.path(), "first.pdf", 2);
    let second = write_pdf(temp_dir.path(), "second.pdf", 3);
    let not_pdf = temp_dir.path().join("notes.txt");
    fs::write(&not_pdf, "plain text").unwrap();
    let output_path = temp_dir.path().join("combined.pdf");

    let output = run_cli_command(&[
        "assemble",
        first.to_str().unwrap(),
        not_pdf.to_str().unwrap(),
        second.to_str().unwrap(),
        "--backend",
        &backend,
        "-o",
        output_path.to_str().unwrap(),
        "--order",
        "5,1",
        "--remove",
        "2",
        "--rotate",
        "5:90",
    ])
    .await;

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Skipped notes.txt"));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Assembled 4 pages"));

    let content = fs::read_to_string(&output_path).unwrap();
    assert!(content.starts_with("%PDF-"));
    assert!(content.contains("combined.pdf 1:2@90 0:0@0 1:0@0 1:1@0"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_cli_fails_without_pages() {
    let backend = spawn_backend().await;
    let temp_dir = setup_temp_dir();
    let input = temp_dir.path().join("broken.pdf");
    fs::write(&input, "%PDF-1.7\n%garbage\n").unwrap();
    let output_path = temp_dir.path().join("out.pdf");

    let output = run_cli_command(&[
        "assemble",
        input.to_str().unwrap(),
        "--backend",
        &backend,
        "-o",
        output_path.to_str().unwrap(),
    ])
    .await;

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No pages could be loaded"));
    assert!(!output_path.exists());
}
