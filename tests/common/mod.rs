use std::path::Path;

use axum::body::Body;
use axum::http::Request;
use tempfile::TempDir;

use trade_journal::api::router::create_router;
use trade_journal::config::AppConfig;
use trade_journal::db::{AttachmentManager, RecordStore};
use trade_journal::journal::Journal;
use trade_journal::AppState;

pub const BOUNDARY: &str = "journal-test-boundary";

/// App backed by a fresh temp directory. Keep the `TempDir` alive for the
/// duration of the test.
#[allow(dead_code)]
pub fn build_test_app() -> (axum::Router, AppConfig, TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let (router, config) = build_app_in(dir.path());
    (router, config, dir)
}

#[allow(dead_code)]
pub fn build_app_in(dir: &Path) -> (axum::Router, AppConfig) {
    let config = AppConfig::in_dir(dir);
    let journal = Journal::new(
        RecordStore::new(&config.journal_path),
        AttachmentManager::new(&config.attachment_dir),
    );
    let state = AppState::new(
        config.clone(),
        journal,
        trade_journal::metrics::init_metrics(),
    );
    (create_router(state), config)
}

/// The required dropdowns at their first option plus `trade_id`.
#[allow(dead_code)]
pub fn base_fields(trade_id: &str) -> Vec<(&'static str, String)> {
    vec![
        ("trade_id", trade_id.to_string()),
        ("market_bias", "Bullish".into()),
        ("trade_type", "Buy".into()),
        ("result", "Win".into()),
        ("execution_grade", "A".into()),
        ("session", "London".into()),
        ("news_impact", "No".into()),
    ]
}

/// Encode form fields, and optionally a screenshot part, as multipart.
#[allow(dead_code)]
pub fn multipart_body(fields: &[(&str, String)], screenshot: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, bytes)) = screenshot {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"screenshot\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

#[allow(dead_code)]
pub fn submit_request(fields: &[(&str, String)], screenshot: Option<(&str, &[u8])>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/trades")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(fields, screenshot)))
        .unwrap()
}

#[allow(dead_code)]
pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[allow(dead_code)]
pub async fn body_json(resp: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}
