//! Exporter config loader (environment only).
//!
//! Two variables, both optional:
//! - `MONGO_BACKUP_STATE`  : path to the backup job's state JSON
//! - `BACKUP_METRICS_PORT` : TCP port to listen on
//!
//! A variable that is set but empty is a config error, not a fallback to
//! the default.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use backup_metrics_core::error::{BackupMetricsError, Result};

pub const STATE_PATH_VAR: &str = "MONGO_BACKUP_STATE";
pub const PORT_VAR: &str = "BACKUP_METRICS_PORT";

pub const DEFAULT_STATE_PATH: &str = "/var/log/mongo-backup/state.json";
pub const DEFAULT_PORT: u16 = 9217;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExporterConfig {
    pub state_path: PathBuf,
    pub port: u16,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            state_path: PathBuf::from(DEFAULT_STATE_PATH),
            port: DEFAULT_PORT,
        }
    }
}

impl ExporterConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Load through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let state_path = lookup(STATE_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_PATH));

        let port = match lookup(PORT_VAR) {
            Some(raw) => parse_port(&raw)?,
            None => DEFAULT_PORT,
        };

        let cfg = Self { state_path, port };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.state_path.as_os_str().is_empty() {
            return Err(BackupMetricsError::Config(format!(
                "{STATE_PATH_VAR} must not be empty"
            )));
        }
        if self.port == 0 {
            return Err(BackupMetricsError::Config(format!(
                "{PORT_VAR} must be between 1 and 65535"
            )));
        }
        Ok(())
    }

    /// Bind address: all interfaces on the configured port.
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}

fn parse_port(raw: &str) -> Result<u16> {
    raw.trim().parse::<u16>().map_err(|e| {
        BackupMetricsError::Config(format!("{PORT_VAR}={raw:?} is not a valid port: {e}"))
    })
}
