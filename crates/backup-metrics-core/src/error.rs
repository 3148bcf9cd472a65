//! Shared error type across backup-metrics crates.

use thiserror::Error;

/// Failure message rendered into the metrics output when the state file
/// cannot be read or decoded.
pub const STATE_PARSE_ERROR: &str = "state_parse_error";

/// Shared result type.
pub type Result<T> = std::result::Result<T, BackupMetricsError>;

/// Unified error type used by core and exporter.
#[derive(Debug, Error)]
pub enum BackupMetricsError {
    #[error("state read failed: {0}")]
    StateRead(String),
    #[error("state parse failed: {0}")]
    StateParse(String),
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
    #[error("invalid config: {0}")]
    Config(String),
    #[error("bind failed: {0}")]
    Bind(String),
    #[error("server failed: {0}")]
    Serve(String),
}

impl BackupMetricsError {
    /// Whether this error should stop the process.
    ///
    /// State errors never are: the reader folds them into a degraded snapshot.
    pub fn is_fatal(&self) -> bool {
        match self {
            BackupMetricsError::StateRead(_)
            | BackupMetricsError::StateParse(_)
            | BackupMetricsError::InvalidTimestamp(_) => false,
            BackupMetricsError::Config(_)
            | BackupMetricsError::Bind(_)
            | BackupMetricsError::Serve(_) => true,
        }
    }
}
