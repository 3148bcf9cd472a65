//! Axum router wiring.
//!
//! `/` and `/metrics` serve the exposition document; everything else is 404.
//! No trace or access-log layer is installed: scrapes are silent.

use axum::{routing::any, Router};

use crate::{app_state::AppState, ops};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", any(ops::metrics))
        .route("/metrics", any(ops::metrics))
        .fallback(ops::not_found)
        .with_state(state)
}
