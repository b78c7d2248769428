//! Utility functions for date ranges, log formatting, and file system checks.

use crate::error::{Error, Result};
use chrono::{Days, NaiveDate};
use std::fs as stdfs;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Every date from `start` to `end`, both inclusive. Empty when `start > end`.
pub fn enum_dates(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start
        .iter_days()
        .take_while(move |date| *date <= end)
}

/// Validate that `start..=end` is a non-empty range.
pub fn check_range(start: NaiveDate, end: NaiveDate) -> Result<()> {
    if start > end {
        return Err(Error::InvalidDateRange { start, end });
    }
    Ok(())
}

/// The day before `date`, or `date` itself at the calendar's lower bound.
pub fn previous_day(date: NaiveDate) -> NaiveDate {
    date.checked_sub_days(Days::new(1)).unwrap_or(date)
}

/// Truncate a string for logging purposes.
///
/// Cuts on character boundaries, so Hangul titles never split a syllable.
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log("가나다라", 2), "가나…(+2 chars)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    let total = s.chars().count();
    if total <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max).collect();
        format!("{}…(+{} chars)", head, total - max)
    }
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if it doesn't exist, then creates and immediately
/// deletes a probe file.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).await?;
    // Try a small sync write using std fs (simpler error surface)
    let probe_path = path.join("..__probe_write__");
    stdfs::File::create(&probe_path)?;
    let _ = stdfs::remove_file(&probe_path);
    info!("Directory is writable");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_enum_dates_inclusive() {
        let dates: Vec<_> = enum_dates(d(2012, 2, 27), d(2012, 3, 1)).collect();
        assert_eq!(
            dates,
            vec![d(2012, 2, 27), d(2012, 2, 28), d(2012, 2, 29), d(2012, 3, 1)]
        );
    }

    #[test]
    fn test_enum_dates_single_and_empty() {
        assert_eq!(enum_dates(d(2012, 1, 1), d(2012, 1, 1)).count(), 1);
        assert_eq!(enum_dates(d(2012, 1, 2), d(2012, 1, 1)).count(), 0);
    }

    #[test]
    fn test_check_range() {
        assert!(check_range(d(2012, 1, 1), d(2012, 1, 1)).is_ok());
        assert!(matches!(
            check_range(d(2012, 1, 2), d(2012, 1, 1)),
            Err(Error::InvalidDateRange { .. })
        ));
    }

    #[test]
    fn test_previous_day() {
        assert_eq!(previous_day(d(2012, 3, 1)), d(2012, 2, 29));
    }

    #[test]
    fn test_truncate_for_log_short_string() {
        assert_eq!(truncate_for_log("세월호 침몰", 100), "세월호 침몰");
    }

    #[test]
    fn test_truncate_for_log_multibyte() {
        assert_eq!(truncate_for_log("가나다라", 2), "가나…(+2 chars)");
    }

    #[tokio::test]
    async fn test_ensure_writable_dir_creates_missing() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("data").join("cache");
        ensure_writable_dir(&nested).await.unwrap();
        assert!(nested.is_dir());
        assert!(!nested.join("..__probe_write__").exists());
    }
}
