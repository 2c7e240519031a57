//! Overview figures for a set of executions.

use chrono::{NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::model::{HotkeyAnalysis, LogEntry, MacroStatEntry, TimeBucketSeries};

use super::days_between;

/// Headline numbers shown above the detailed tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    /// Executions counted.
    pub total_executions: usize,
    /// Distinct macros executed.
    pub unique_macros: usize,
    /// Earliest execution.
    pub first_execution: Option<NaiveDateTime>,
    /// Latest execution.
    pub last_execution: Option<NaiveDateTime>,
    /// Span between first and last execution in whole days (0 when empty).
    pub span_days: u64,
    /// Executions per day over the span.
    pub average_per_day: f64,
    /// Most executed macro.
    pub top_macro: Option<String>,
    /// Executions of the most executed macro.
    pub top_macro_count: usize,
    /// Busiest hour of day.
    pub peak_hour: Option<u32>,
    /// Busiest weekday.
    pub peak_weekday: Option<Weekday>,
    /// Busiest calendar date.
    pub peak_day: Option<NaiveDate>,
    /// Executions fired by a hotkey.
    pub hotkey_executions: usize,
}

impl AnalysisSummary {
    /// Hotkey share of all executions, as a percentage.
    #[must_use]
    pub fn hotkey_share(&self) -> f64 {
        if self.total_executions == 0 {
            return 0.0;
        }
        self.hotkey_executions as f64 / self.total_executions as f64 * 100.0
    }
}

/// Combine already-computed views into a summary.
///
/// `entries` must be sorted ascending; `stats` ranked by count as returned by
/// [`super::aggregate_macro_stats`].
pub fn summarize(
    entries: &[LogEntry],
    stats: &[MacroStatEntry],
    hotkeys: &HotkeyAnalysis,
    buckets: &TimeBucketSeries,
) -> AnalysisSummary {
    let (Some(first), Some(last)) = (entries.first(), entries.last()) else {
        return AnalysisSummary::default();
    };

    let span_days = days_between(first.timestamp, last.timestamp);
    let top = stats.first();

    AnalysisSummary {
        total_executions: entries.len(),
        unique_macros: stats.len(),
        first_execution: Some(first.timestamp),
        last_execution: Some(last.timestamp),
        span_days,
        average_per_day: entries.len() as f64 / span_days as f64,
        top_macro: top.map(|s| s.name.clone()),
        top_macro_count: top.map_or(0, |s| s.count),
        peak_hour: buckets.peak_hour().map(|b| b.hour),
        peak_weekday: buckets.peak_weekday().map(|b| b.weekday),
        peak_day: buckets.peak_day().map(|b| b.date),
        hotkey_executions: hotkeys.hotkey_executions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::{aggregate_hotkey_stats, aggregate_macro_stats, aggregate_time_buckets};
    use crate::parser::parse;

    fn summary_of(text: &str) -> AnalysisSummary {
        let entries = parse(text);
        summarize(
            &entries,
            &aggregate_macro_stats(&entries),
            &aggregate_hotkey_stats(&entries),
            &aggregate_time_buckets(&entries),
        )
    }

    #[test]
    fn test_empty_summary() {
        let summary = summary_of("");
        assert_eq!(summary, AnalysisSummary::default());
        assert!(summary.hotkey_share().abs() < f64::EPSILON);
    }

    #[test]
    fn test_summary_figures() {
        let summary = summary_of(
            "2024-01-01 09:00:00 Execute macro \"A\" from trigger Hot Key ⌘A is pressed
2024-01-01 09:30:00 Execute macro \"A\" from trigger Hot Key ⌘A is pressed
2024-01-03 20:00:00 Execute macro \"B\" from trigger Typed String",
        );

        assert_eq!(summary.total_executions, 3);
        assert_eq!(summary.unique_macros, 2);
        assert_eq!(summary.span_days, 3);
        assert!((summary.average_per_day - 1.0).abs() < 1e-9);
        assert_eq!(summary.top_macro.as_deref(), Some("A"));
        assert_eq!(summary.top_macro_count, 2);
        assert_eq!(summary.peak_hour, Some(9));
        assert_eq!(summary.peak_weekday, Some(Weekday::Mon));
        assert_eq!(summary.peak_day, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(summary.hotkey_executions, 2);
        assert!((summary.hotkey_share() - 200.0 / 3.0).abs() < 1e-9);
    }
}
