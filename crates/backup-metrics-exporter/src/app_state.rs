//! Shared application state for the exporter.
//!
//! Only the read-only config is shared between requests; every scrape reads
//! the state file fresh.

use std::path::Path;
use std::sync::Arc;

use crate::config::ExporterConfig;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<ExporterConfig>,
}

impl AppState {
    pub fn new(cfg: ExporterConfig) -> Self {
        Self { inner: Arc::new(cfg) }
    }

    pub fn state_path(&self) -> &Path {
        &self.inner.state_path
    }
}
