//! Analysis options and lenient parsing of user-supplied option values.
//!
//! Option values typed by a user are never rejected outright: a window or line
//! limit that cannot be read falls back to its default, and out-of-range values
//! are clamped. Only malformed dates are reported, because silently widening a
//! date range would change the meaning of every view.

use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{MacroLensError, Result};
use crate::model::{LogEntry, DATE_FORMAT, TIMESTAMP_FORMAT};

/// Deduplication window used when none (or an unreadable one) is given.
pub const DEFAULT_DEDUP_WINDOW_MS: u64 = 1_000;

/// Largest accepted deduplication window (one day).
pub const MAX_DEDUP_WINDOW_MS: u64 = 86_400_000;

/// Line ceiling applied to loaded text when none is given.
pub const DEFAULT_MAX_LINES: usize = 100_000;

/// Inclusive range of execution times. Either end may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// Earliest included time.
    pub start: Option<NaiveDateTime>,
    /// Latest included time.
    pub end: Option<NaiveDateTime>,
}

impl DateRange {
    /// A range open on both ends.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            start: None,
            end: None,
        }
    }

    /// Whether neither end is set.
    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Whether `timestamp` falls inside the range.
    #[must_use]
    pub fn contains(&self, timestamp: NaiveDateTime) -> bool {
        self.start.map_or(true, |start| timestamp >= start)
            && self.end.map_or(true, |end| timestamp <= end)
    }

    /// Entries inside the range, order preserved.
    pub fn apply(&self, entries: &[LogEntry]) -> Vec<LogEntry> {
        if self.is_unbounded() {
            return entries.to_vec();
        }
        entries
            .iter()
            .filter(|e| self.contains(e.timestamp))
            .cloned()
            .collect()
    }
}

/// Options controlling how parsed entries are reduced before aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisOptions {
    /// Collapse rapid repeats of the same macro.
    pub deduplicate: bool,
    /// Window for [`Self::deduplicate`], in milliseconds.
    pub deduplication_window_ms: u64,
    /// Only executions inside this range are analysed.
    pub date_range: DateRange,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            deduplicate: false,
            deduplication_window_ms: DEFAULT_DEDUP_WINDOW_MS,
            date_range: DateRange::unbounded(),
        }
    }
}

impl AnalysisOptions {
    /// Builder: enable or disable deduplication.
    #[must_use]
    pub fn with_deduplicate(mut self, enabled: bool) -> Self {
        self.deduplicate = enabled;
        self
    }

    /// Builder: set the deduplication window, clamped to [`MAX_DEDUP_WINDOW_MS`].
    #[must_use]
    pub fn with_window_ms(mut self, window_ms: u64) -> Self {
        self.deduplication_window_ms = window_ms.min(MAX_DEDUP_WINDOW_MS);
        self
    }

    /// Builder: set the date range.
    #[must_use]
    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = range;
        self
    }
}

/// Read a deduplication window typed by a user.
///
/// Accepts plain milliseconds (`1500`) or a humantime duration (`2s`,
/// `1m 30s`). Unreadable input falls back to [`DEFAULT_DEDUP_WINDOW_MS`];
/// values above [`MAX_DEDUP_WINDOW_MS`] are clamped.
pub fn parse_window_input(input: &str) -> u64 {
    let input = input.trim();
    let parsed = input.parse::<u64>().ok().or_else(|| {
        humantime::parse_duration(input)
            .ok()
            .map(|d: Duration| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    });

    match parsed {
        Some(ms) if ms > MAX_DEDUP_WINDOW_MS => {
            warn!(ms, max = MAX_DEDUP_WINDOW_MS, "Deduplication window clamped");
            MAX_DEDUP_WINDOW_MS
        }
        Some(ms) => ms,
        None => {
            warn!(input, default = DEFAULT_DEDUP_WINDOW_MS, "Unreadable deduplication window, using default");
            DEFAULT_DEDUP_WINDOW_MS
        }
    }
}

/// Read a line ceiling typed by a user. Zero or unreadable input gives [`DEFAULT_MAX_LINES`].
pub fn parse_max_lines_input(input: &str) -> usize {
    match input.trim().replace(['_', ','], "").parse::<usize>() {
        Ok(n) if n > 0 => n,
        _ => {
            warn!(input, default = DEFAULT_MAX_LINES, "Unreadable line limit, using default");
            DEFAULT_MAX_LINES
        }
    }
}

/// Which end of a range a date bound is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeEnd {
    /// A bare date means the start of that day.
    Start,
    /// A bare date means the last second of that day.
    End,
}

/// Parse `YYYY-MM-DD` or `YYYY-MM-DD HH:MM:SS` as a range bound.
pub fn parse_date_bound(input: &str, end: RangeEnd) -> Result<NaiveDateTime> {
    let input = input.trim();
    if let Ok(ts) = NaiveDateTime::parse_from_str(input, TIMESTAMP_FORMAT) {
        return Ok(ts);
    }
    let invalid = || {
        MacroLensError::invalid_argument(
            match end {
                RangeEnd::Start => "from",
                RangeEnd::End => "to",
            },
            format!("'{input}' is not YYYY-MM-DD or YYYY-MM-DD HH:MM:SS"),
        )
    };
    let date = NaiveDate::parse_from_str(input, DATE_FORMAT).map_err(|_| invalid())?;
    let (h, m, s) = match end {
        RangeEnd::Start => (0, 0, 0),
        RangeEnd::End => (23, 59, 59),
    };
    date.and_hms_opt(h, m, s).ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).unwrap()
    }

    #[rstest]
    #[case("1500", 1500)]
    #[case(" 0 ", 0)]
    #[case("2s", 2000)]
    #[case("1m 30s", 90_000)]
    #[case("abc", DEFAULT_DEDUP_WINDOW_MS)]
    #[case("-5", DEFAULT_DEDUP_WINDOW_MS)]
    #[case("", DEFAULT_DEDUP_WINDOW_MS)]
    #[case("999999999999", MAX_DEDUP_WINDOW_MS)]
    #[case("3days", MAX_DEDUP_WINDOW_MS)]
    fn test_parse_window_input(#[case] input: &str, #[case] expected: u64) {
        assert_eq!(parse_window_input(input), expected);
    }

    #[rstest]
    #[case("500", 500)]
    #[case("10_000", 10_000)]
    #[case("0", DEFAULT_MAX_LINES)]
    #[case("lots", DEFAULT_MAX_LINES)]
    fn test_parse_max_lines_input(#[case] input: &str, #[case] expected: usize) {
        assert_eq!(parse_max_lines_input(input), expected);
    }

    #[test]
    fn test_parse_date_bound() {
        assert_eq!(
            parse_date_bound("2024-01-05", RangeEnd::Start).unwrap(),
            ts("2024-01-05 00:00:00")
        );
        assert_eq!(
            parse_date_bound("2024-01-05", RangeEnd::End).unwrap(),
            ts("2024-01-05 23:59:59")
        );
        assert_eq!(
            parse_date_bound("2024-01-05 12:30:00", RangeEnd::End).unwrap(),
            ts("2024-01-05 12:30:00")
        );
        assert!(matches!(
            parse_date_bound("yesterday", RangeEnd::Start),
            Err(MacroLensError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let range = DateRange {
            start: Some(ts("2024-01-01 00:00:00")),
            end: Some(ts("2024-01-01 23:59:59")),
        };
        assert!(range.contains(ts("2024-01-01 00:00:00")));
        assert!(range.contains(ts("2024-01-01 23:59:59")));
        assert!(!range.contains(ts("2024-01-02 00:00:00")));
        assert!(DateRange::unbounded().contains(ts("1999-12-31 23:59:59")));
    }

    #[test]
    fn test_window_builder_clamps() {
        let options = AnalysisOptions::default().with_window_ms(u64::MAX);
        assert_eq!(options.deduplication_window_ms, MAX_DEDUP_WINDOW_MS);
        assert!(!options.deduplicate);
    }
}
