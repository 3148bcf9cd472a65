//! Backup metrics exporter library entry.
//!
//! Wires the env config, shared state, and the axum router around the core
//! state reader and renderer. Consumed by the binary (`main.rs`) and by
//! integration tests.

pub mod app_state;
pub mod config;
pub mod ops;
pub mod router;
