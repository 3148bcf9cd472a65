//! Operational HTTP endpoints.
//!
//! - `GET /`, `GET /metrics` : backup status in Prometheus text format
//! - anything else           : 404 (other methods, query strings, paths)

use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    extract::State,
    http::{header, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};

use backup_metrics_core::{exposition, read_snapshot, Snapshot};

use crate::app_state::AppState;

pub async fn metrics(method: Method, uri: Uri, State(state): State<AppState>) -> Response {
    // any() also routes HEAD/POST/...; only GET is served, and only on the
    // bare path: `/metrics?x=1` is a different target.
    if method != Method::GET || uri.query().is_some() {
        return not_found().await.into_response();
    }

    let snapshot = read_state(&state).await;
    let body = exposition::render(&snapshot, now_epoch());

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(exposition::CONTENT_TYPE)),
            (header::CONTENT_LENGTH, HeaderValue::from(body.len())),
        ],
        body,
    )
        .into_response()
}

pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "not found")
}

/// Read the state file off the async workers.
async fn read_state(state: &AppState) -> Snapshot {
    let path = state.state_path().to_path_buf();
    tokio::task::spawn_blocking(move || read_snapshot(&path))
        .await
        .unwrap_or_else(|_| Snapshot::parse_error())
}

fn now_epoch() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}
