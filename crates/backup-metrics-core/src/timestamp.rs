//! Fixed-format backup timestamps (`YYYYMMDD_HHMMSS`).
//!
//! The backup job stamps runs with local wall-clock time in a single fixed
//! layout. This parser validates that layout byte by byte instead of handing
//! the string to a general-purpose date parser, so every malformed stamp
//! fails the same way.

use chrono::{Duration, Local, NaiveDate, NaiveDateTime, TimeZone};

use crate::error::{BackupMetricsError, Result};

/// `YYYYMMDD_HHMMSS`
pub const TIMESTAMP_LEN: usize = 15;
const SEPARATOR_AT: usize = 8;

/// Parse a backup timestamp into a naive (zone-less) date-time.
pub fn parse_backup_timestamp(s: &str) -> Result<NaiveDateTime> {
    let b = s.as_bytes();
    if b.len() != TIMESTAMP_LEN {
        return Err(invalid(s, "expected YYYYMMDD_HHMMSS"));
    }
    if b[SEPARATOR_AT] != b'_' {
        return Err(invalid(s, "missing '_' separator"));
    }
    let all_digits = b
        .iter()
        .enumerate()
        .all(|(i, c)| i == SEPARATOR_AT || c.is_ascii_digit());
    if !all_digits {
        return Err(invalid(s, "non-digit in date or time"));
    }

    let year = digits(&b[0..4]) as i32;
    let month = digits(&b[4..6]);
    let day = digits(&b[6..8]);
    let hour = digits(&b[9..11]);
    let minute = digits(&b[11..13]);
    let second = digits(&b[13..15]);

    let date = NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| invalid(s, "date out of range"))?;
    date.and_hms_opt(hour, minute, second)
        .ok_or_else(|| invalid(s, "time out of range"))
}

/// Interpret a naive date-time in the local zone and return epoch seconds.
///
/// Ambiguous local times (DST fold) resolve to the earlier instant. A time
/// inside a spring-forward gap is rolled forward by the hour the clocks
/// skipped, so `02:30` on the change-over day maps to `03:30` after it.
pub fn local_epoch_seconds(dt: NaiveDateTime) -> Result<i64> {
    Local
        .from_local_datetime(&dt)
        .earliest()
        .or_else(|| {
            dt.checked_add_signed(Duration::hours(1))
                .and_then(|shifted| Local.from_local_datetime(&shifted).earliest())
        })
        .map(|t| t.timestamp())
        .ok_or_else(|| {
            BackupMetricsError::InvalidTimestamp(format!("{dt} does not exist in local time"))
        })
}

/// Parse a backup timestamp straight to local epoch seconds.
pub fn backup_timestamp_to_epoch(s: &str) -> Result<i64> {
    local_epoch_seconds(parse_backup_timestamp(s)?)
}

fn digits(b: &[u8]) -> u32 {
    b.iter().fold(0, |acc, c| acc * 10 + u32::from(c - b'0'))
}

fn invalid(s: &str, why: &str) -> BackupMetricsError {
    BackupMetricsError::InvalidTimestamp(format!("{s:?}: {why}"))
}
