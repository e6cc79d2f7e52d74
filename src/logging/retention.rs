//! Log file retention management
//!
//! Removes daily log files whose name-encoded date is older than the
//! retention window.

use std::fs;
use std::path::Path;

use anyhow::Result;
use chrono::{Duration, NaiveDate, Utc};

/// Default retention period in days; 0 keeps every file
pub const DEFAULT_RETENTION_DAYS: u64 = 0;

/// Parse the date out of a `<program>i_<YYYY>_<MM>_<DD>.log` file name
pub fn parse_log_file_date(program: &str, file_name: &str) -> Option<NaiveDate> {
    let rest = file_name.strip_prefix(program)?.strip_prefix('i')?;
    let stamp = rest.strip_prefix('_')?.strip_suffix(".log")?;
    NaiveDate::parse_from_str(stamp, "%Y_%m_%d").ok()
}

/// Clean up this program's log files older than `retention_days`
///
/// Returns the number of files deleted.
pub fn cleanup_old_logs(logs_dir: &Path, program: &str, retention_days: u64) -> Result<usize> {
    cleanup_old_logs_before(logs_dir, program, retention_days, Utc::now().date_naive())
}

/// Same as [`cleanup_old_logs`] with an explicit current date
pub fn cleanup_old_logs_before(
    logs_dir: &Path,
    program: &str,
    retention_days: u64,
    today: NaiveDate,
) -> Result<usize> {
    if retention_days == 0 || !logs_dir.exists() {
        return Ok(0);
    }

    let cutoff = i64::try_from(retention_days)
        .ok()
        .and_then(Duration::try_days)
        .and_then(|window| today.checked_sub_signed(window))
        .unwrap_or(NaiveDate::MIN);

    let mut deleted_count = 0;

    for entry in fs::read_dir(logs_dir)? {
        let entry = entry?;
        let path = entry.path();

        // Only files this program wrote
        let Some(date) = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| parse_log_file_date(program, n))
        else {
            continue;
        };

        if date < cutoff && fs::remove_file(&path).is_ok() {
            tracing::debug!("Removed expired log file {}", path.display());
            deleted_count += 1;
        }
    }

    Ok(deleted_count)
}
