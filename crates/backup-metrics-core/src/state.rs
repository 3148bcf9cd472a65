//! State reader: backup status record -> normalized snapshot.
//!
//! The backup job owns the state file and rewrites it after every run. The
//! reader loads it whole, decodes it leniently, and never fails outward:
//! `read_snapshot` folds every error into a degraded snapshot that still
//! renders as valid metrics.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::de::{Deserializer, Error as _};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{BackupMetricsError, Result, STATE_PARSE_ERROR};
use crate::timestamp;

/// Status record as written by the backup job. Every field is optional and
/// unknown fields are ignored.
///
/// `last_success` and `last_failure` are kept as raw JSON: a falsy value
/// (`null`, `false`, `0`, `""`, `[]`, `{}`) means absent.
#[derive(Debug, Default, Deserialize)]
pub struct StatusRecord {
    #[serde(default)]
    pub last_success: Value,

    #[serde(default, deserialize_with = "lenient_int")]
    pub last_size_bytes: i64,

    #[serde(default, deserialize_with = "lenient_int")]
    pub total_backups: i64,

    #[serde(default)]
    pub last_failure: Value,
}

impl StatusRecord {
    /// Decode a record from JSON text. The top level must be an object.
    pub fn from_json(text: &str) -> Result<Self> {
        let map: Map<String, Value> = serde_json::from_str(text)
            .map_err(|e| BackupMetricsError::StateParse(format!("invalid json: {e}")))?;
        StatusRecord::deserialize(Value::Object(map))
            .map_err(|e| BackupMetricsError::StateParse(format!("invalid field: {e}")))
    }
}

/// Fixed-shape view of the backup status, built fresh for every scrape.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    /// Epoch seconds of the last successful run, 0 if unknown.
    pub last_success_epoch: i64,
    pub last_size_bytes: i64,
    pub total_runs: i64,
    /// Empty means no failure.
    pub last_failure_message: String,
}

impl Snapshot {
    /// Zeroed snapshot flagged with the synthetic `state_parse_error` failure.
    pub fn parse_error() -> Self {
        Self {
            last_failure_message: STATE_PARSE_ERROR.to_string(),
            ..Self::default()
        }
    }

    pub fn has_failure(&self) -> bool {
        !self.last_failure_message.is_empty()
    }
}

impl TryFrom<StatusRecord> for Snapshot {
    type Error = BackupMetricsError;

    fn try_from(r: StatusRecord) -> Result<Self> {
        let last_success_epoch = match &r.last_success {
            v if !is_truthy(v) => 0,
            Value::String(s) => timestamp::backup_timestamp_to_epoch(s)?,
            other => {
                return Err(BackupMetricsError::StateParse(format!(
                    "last_success must be a string, got {other}"
                )))
            }
        };
        let last_failure_message = match r.last_failure {
            v if !is_truthy(&v) => String::new(),
            Value::String(s) => s,
            other => other.to_string(),
        };
        Ok(Self {
            last_success_epoch,
            last_size_bytes: r.last_size_bytes,
            total_runs: r.total_backups,
            last_failure_message,
        })
    }
}

/// Decode a snapshot from the state file's text.
pub fn parse_snapshot(text: &str) -> Result<Snapshot> {
    Snapshot::try_from(StatusRecord::from_json(text)?)
}

/// Load the state file. A missing file is an empty history, not an error.
pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let text = match fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Snapshot::default()),
        Err(e) => {
            return Err(BackupMetricsError::StateRead(format!(
                "{}: {e}",
                path.display()
            )))
        }
    };
    parse_snapshot(&text)
}

/// Load the state file, degrading every failure to [`Snapshot::parse_error`].
pub fn read_snapshot(path: &Path) -> Snapshot {
    load_snapshot(path).unwrap_or_else(|_| Snapshot::parse_error())
}

fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IntLike {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

/// Accept integers, finite floats (truncated), booleans as 0/1, and integer
/// strings.
fn lenient_int<'de, D>(d: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match IntLike::deserialize(d)? {
        IntLike::Int(v) => Ok(v),
        IntLike::Float(f) if f.is_finite() => Ok(f.trunc() as i64),
        IntLike::Float(f) => Err(D::Error::custom(format!("non-finite number {f}"))),
        IntLike::Bool(b) => Ok(i64::from(b)),
        IntLike::Text(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| D::Error::custom(format!("not an integer: {s:?}"))),
    }
}
