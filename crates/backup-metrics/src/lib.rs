//! Top-level facade crate for the backup metrics exporter.
//!
//! Re-exports the core types and the exporter library so users can depend on a single crate.

pub mod core {
    pub use backup_metrics_core::*;
}

pub mod exporter {
    pub use backup_metrics_exporter::*;
}
