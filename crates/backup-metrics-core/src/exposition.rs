//! Prometheus text rendering for a status snapshot.
//!
//! Output is five lines in fixed order joined by `\n`, with no `# TYPE`
//! metadata and no trailing newline. The failure message is embedded in the
//! label value verbatim, unescaped, to stay byte-compatible with existing
//! dashboards and alert rules.

use crate::state::Snapshot;

pub const LAST_SUCCESS_TIMESTAMP: &str = "mongo_backup_last_success_timestamp";
pub const LAST_RUN_AGE_SECONDS: &str = "mongo_backup_last_run_age_seconds";
pub const LAST_ARCHIVE_BYTES: &str = "mongo_backup_last_archive_bytes";
pub const TOTAL_RUNS: &str = "mongo_backup_total_runs";
pub const LAST_FAILURE: &str = "mongo_backup_last_failure";

/// Content type served with the rendered document.
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4";

/// Seconds since the last success, or 0 when no success is recorded.
/// Not clamped: a success stamped in the future yields a negative age.
pub fn run_age_seconds(snapshot: &Snapshot, now: i64) -> i64 {
    if snapshot.last_success_epoch != 0 {
        now - snapshot.last_success_epoch
    } else {
        0
    }
}

/// Render the snapshot as of `now` (epoch seconds).
pub fn render(snapshot: &Snapshot, now: i64) -> String {
    format!(
        "{LAST_SUCCESS_TIMESTAMP} {}\n\
         {LAST_RUN_AGE_SECONDS} {}\n\
         {LAST_ARCHIVE_BYTES} {}\n\
         {TOTAL_RUNS} {}\n\
         {LAST_FAILURE}{{message=\"{}\"}} {}",
        snapshot.last_success_epoch,
        run_age_seconds(snapshot, now),
        snapshot.last_size_bytes,
        snapshot.total_runs,
        snapshot.last_failure_message,
        u8::from(snapshot.has_failure()),
    )
}
