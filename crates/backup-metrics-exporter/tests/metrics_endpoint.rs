#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use tower::ServiceExt;

use backup_metrics_core::timestamp::backup_timestamp_to_epoch;
use backup_metrics_exporter::{app_state::AppState, config::ExporterConfig, router};

struct TestApp {
    _dir: tempfile::TempDir,
    state_path: PathBuf,
}

impl TestApp {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let state_path = dir.path().join("state.json");
        Self { _dir: dir, state_path }
    }

    fn with_state(body: &str) -> Self {
        let app = Self::new();
        std::fs::write(&app.state_path, body).unwrap();
        app
    }

    fn router(&self) -> Router {
        router::build_router(AppState::new(ExporterConfig {
            state_path: self.state_path.clone(),
            port: 9217,
        }))
    }

    async fn request(&self, method: Method, uri: &str) -> (StatusCode, axum::http::HeaderMap, String) {
        let response = self
            .router()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, headers, String::from_utf8(body.to_vec()).unwrap())
    }

    async fn scrape(&self) -> String {
        let (status, _, body) = self.request(Method::GET, "/metrics").await;
        assert_eq!(status, StatusCode::OK);
        body
    }
}

fn value(body: &str, metric: &str) -> i64 {
    body.lines()
        .find(|l| l.starts_with(metric))
        .and_then(|l| l.rsplit(' ').next())
        .unwrap_or_else(|| panic!("{metric} missing in:\n{body}"))
        .parse()
        .unwrap()
}

fn now() -> i64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs() as i64
}

#[tokio::test]
async fn missing_state_file_reports_zeros() {
    let app = TestApp::new();
    let body = app.scrape().await;

    assert_eq!(value(&body, "mongo_backup_last_success_timestamp"), 0);
    assert_eq!(value(&body, "mongo_backup_last_run_age_seconds"), 0);
    assert_eq!(value(&body, "mongo_backup_last_archive_bytes"), 0);
    assert_eq!(value(&body, "mongo_backup_total_runs"), 0);
    assert!(body.ends_with(r#"mongo_backup_last_failure{message=""} 0"#));
}

#[tokio::test]
async fn invalid_json_reports_parse_error() {
    for content in ["{not json", "[]", "\u{0}\u{1}", "{\"last_success\": \"yesterday\"}"] {
        let app = TestApp::with_state(content);
        let body = app.scrape().await;
        assert!(
            body.ends_with(r#"mongo_backup_last_failure{message="state_parse_error"} 1"#),
            "content={content:?}\n{body}"
        );
        assert_eq!(value(&body, "mongo_backup_total_runs"), 0);
    }
}

#[tokio::test]
async fn well_formed_state() {
    let app = TestApp::with_state(
        r#"{"last_success": "20240101_120000", "last_size_bytes": 1048576, "total_backups": 42}"#,
    );
    let before = now();
    let body = app.scrape().await;
    let after = now();

    let epoch = backup_timestamp_to_epoch("20240101_120000").unwrap();
    assert!(body.contains("mongo_backup_last_archive_bytes 1048576"));
    assert!(body.contains("mongo_backup_total_runs 42"));
    assert!(body.contains(&format!("mongo_backup_last_success_timestamp {epoch}")));
    assert!(body.ends_with(r#"mongo_backup_last_failure{message=""} 0"#));

    let age = value(&body, "mongo_backup_last_run_age_seconds");
    assert!(age >= 0);
    assert!((before - epoch..=after - epoch).contains(&age), "age={age}");
}

#[tokio::test]
async fn failure_message_is_labelled() {
    let app = TestApp::with_state(r#"{"total_backups": 3, "last_failure": "disk full"}"#);
    let body = app.scrape().await;
    assert_eq!(
        body.lines().last(),
        Some(r#"mongo_backup_last_failure{message="disk full"} 1"#)
    );
}

#[tokio::test]
async fn root_serves_same_document() {
    let app = TestApp::with_state(r#"{"last_size_bytes": 5, "total_backups": 1}"#);
    let (status, _, body) = app.request(Method::GET, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("mongo_backup_last_archive_bytes 5"));
    assert_eq!(body.lines().count(), 5);
}

#[tokio::test]
async fn headers_match_payload() {
    let app = TestApp::with_state(r#"{"last_failure": "naïve ünïcode"}"#);
    let (status, headers, body) = app.request(Method::GET, "/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        headers.get(header::CONTENT_TYPE).unwrap(),
        "text/plain; version=0.0.4"
    );
    let len: usize = headers
        .get(header::CONTENT_LENGTH)
        .unwrap()
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    assert_eq!(len, body.len());
    assert!(!body.ends_with('\n'));
}

#[tokio::test]
async fn unknown_path_is_404() {
    let app = TestApp::with_state(r#"{"total_backups": 1}"#);
    for uri in [
        "/nonexistent",
        "/metrics/",
        "/healthz",
        "/metrics?x=1",
        "/metrics?",
        "/?format=text",
    ] {
        let (status, _, _) = app.request(Method::GET, uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
    }
}

#[tokio::test]
async fn non_get_methods_are_404() {
    let app = TestApp::new();
    for method in [Method::POST, Method::HEAD, Method::PUT, Method::DELETE] {
        let (status, _, _) = app.request(method.clone(), "/metrics").await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{method}");
    }
}

#[tokio::test]
async fn consecutive_scrapes_agree() {
    let app = TestApp::with_state(
        r#"{"last_success": "20240101_120000", "last_size_bytes": 99, "total_backups": 4}"#,
    );
    let first = app.scrape().await;
    let second = app.scrape().await;

    for metric in [
        "mongo_backup_last_success_timestamp",
        "mongo_backup_last_archive_bytes",
        "mongo_backup_total_runs",
    ] {
        assert_eq!(value(&first, metric), value(&second, metric), "{metric}");
    }
    let drift = value(&second, "mongo_backup_last_run_age_seconds")
        - value(&first, "mongo_backup_last_run_age_seconds");
    assert!((0..=2).contains(&drift), "drift={drift}");
}

#[tokio::test]
async fn state_file_changes_are_picked_up() {
    let app = TestApp::new();
    assert_eq!(value(&app.scrape().await, "mongo_backup_total_runs"), 0);

    std::fs::write(&app.state_path, r#"{"total_backups": 8}"#).unwrap();
    assert_eq!(value(&app.scrape().await, "mongo_backup_total_runs"), 8);
}
