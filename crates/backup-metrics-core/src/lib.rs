//! backup-metrics core: state record decoding, timestamp parsing, and the
//! exposition renderer.
//!
//! This crate turns the JSON status record written by the backup job into a
//! fixed-shape snapshot and renders it as Prometheus text. It carries no
//! transport or runtime dependencies so the exporter and tests can share it.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! A broken state file must surface as a `BackupMetricsError` and get folded
//! into a degraded snapshot, never take the exporter down.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod exposition;
pub mod state;
pub mod timestamp;

/// Shared result type.
pub use error::{BackupMetricsError, Result};
pub use state::{read_snapshot, Snapshot};
