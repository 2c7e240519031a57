//! Derived statistics types.
//!
//! These are produced by the aggregators in [`crate::analytics`] and are plain
//! data: they never hold references back into the entry sequence.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, Weekday};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::DATE_FORMAT;

/// Per-macro usage statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MacroStatEntry {
    /// Macro name.
    pub name: String,
    /// Number of executions, at least 1.
    pub count: usize,
    /// Executions per day over the observed span, formatted with one decimal.
    pub avg_per_day: String,
    /// Earliest execution.
    pub first_seen: NaiveDateTime,
    /// Latest execution.
    pub last_seen: NaiveDateTime,
    /// Distinct triggers in order of first occurrence, joined with `", "`.
    pub triggers: String,
    /// Observed span in whole days, rounded up, at least 1.
    pub days_diff: u64,
}

impl MacroStatEntry {
    /// Numeric value of [`Self::avg_per_day`].
    #[must_use]
    pub fn avg_per_day_value(&self) -> f64 {
        self.avg_per_day.parse().unwrap_or(0.0)
    }

    /// Iterate over the individual trigger strings.
    pub fn trigger_list(&self) -> impl Iterator<Item = &str> {
        self.triggers.split(", ").filter(|t| !t.is_empty())
    }
}

/// Keyboard modifier recognised in hotkey triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Modifier {
    /// Command, `⌘`.
    Cmd,
    /// Option, `⌥`.
    Option,
    /// Control, `⌃`.
    Ctrl,
    /// Shift, `⇧`.
    Shift,
}

impl Modifier {
    /// All modifiers in the order they are checked.
    pub const ALL: [Self; 4] = [Self::Cmd, Self::Option, Self::Ctrl, Self::Shift];

    /// The symbol used for this modifier in trigger text.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Cmd => '⌘',
            Self::Option => '⌥',
            Self::Ctrl => '⌃',
            Self::Shift => '⇧',
        }
    }

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Cmd => "Cmd",
            Self::Option => "Option",
            Self::Ctrl => "Ctrl",
            Self::Shift => "Shift",
        }
    }

    /// Look up a modifier by its symbol.
    #[must_use]
    pub fn from_symbol(symbol: char) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.symbol() == symbol)
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Keyboard usage derived from hotkey-triggered executions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotkeyAnalysis {
    /// Residual key -> press count, ranked descending.
    pub key_stats: IndexMap<String, usize>,
    /// Modifier -> count, in order of first occurrence.
    pub modifier_stats: IndexMap<Modifier, usize>,
    /// Full combination -> count, ranked descending.
    pub combination_stats: IndexMap<String, usize>,
    /// Number of entries whose trigger matched the hotkey grammar.
    pub hotkey_executions: usize,
}

impl HotkeyAnalysis {
    /// Highest single-key count, never below 1.
    #[must_use]
    pub fn max_key_count(&self) -> usize {
        self.key_stats.values().copied().max().unwrap_or(0).max(1)
    }

    /// Press count for a key (case-insensitive), 0 when never pressed.
    #[must_use]
    pub fn key_count(&self, key: &str) -> usize {
        self.key_stats
            .get(key.to_uppercase().as_str())
            .copied()
            .unwrap_or(0)
    }

    /// Heatmap intensity in `[0, 1]` for a key.
    #[must_use]
    pub fn intensity(&self, key: &str) -> f64 {
        crate::analytics::key_intensity(self.key_count(key), self.max_key_count())
    }

    /// Intensity for every observed key, in ranking order.
    #[must_use]
    pub fn intensities(&self) -> Vec<(&str, f64)> {
        let max = self.max_key_count();
        self.key_stats
            .iter()
            .map(|(key, count)| (key.as_str(), crate::analytics::key_intensity(*count, max)))
            .collect()
    }

    /// Whether no hotkey executions were seen.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hotkey_executions == 0
    }
}

/// Hour-of-day bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourBucket {
    /// Hour, 0-23.
    pub hour: u32,
    /// Executions in this hour across all days.
    pub count: usize,
}

impl HourBucket {
    /// Label such as `09:00`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{:02}:00", self.hour)
    }
}

/// Calendar-date bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayBucket {
    /// The date.
    pub date: NaiveDate,
    /// Executions on this date.
    pub count: usize,
}

impl DayBucket {
    /// Label such as `2024-01-31`.
    #[must_use]
    pub fn label(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }
}

/// Day-of-week bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekdayBucket {
    /// The weekday.
    pub weekday: Weekday,
    /// Executions on this weekday across all weeks.
    pub count: usize,
}

impl WeekdayBucket {
    /// Short label such as `Mon`.
    #[must_use]
    pub fn label(&self) -> String {
        self.weekday.to_string()
    }
}

/// Weekdays in bucket order, Sunday first.
pub const WEEKDAYS_FROM_SUNDAY: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// Hourly, daily, and weekly views over the same entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBucketSeries {
    /// Always 24 buckets, hour 0 first.
    pub hourly: Vec<HourBucket>,
    /// One bucket per observed date, ascending.
    pub daily: Vec<DayBucket>,
    /// Always 7 buckets, Sunday first.
    pub weekly: Vec<WeekdayBucket>,
}

impl Default for TimeBucketSeries {
    fn default() -> Self {
        Self {
            hourly: (0..24).map(|hour| HourBucket { hour, count: 0 }).collect(),
            daily: Vec::new(),
            weekly: WEEKDAYS_FROM_SUNDAY
                .iter()
                .map(|&weekday| WeekdayBucket { weekday, count: 0 })
                .collect(),
        }
    }
}

impl TimeBucketSeries {
    /// Busiest hour. Ties go to the earliest hour.
    #[must_use]
    pub fn peak_hour(&self) -> Option<&HourBucket> {
        first_peak(&self.hourly, |b| b.count)
    }

    /// Busiest date. Ties go to the earliest date; `None` when no dates exist.
    #[must_use]
    pub fn peak_day(&self) -> Option<&DayBucket> {
        first_peak(&self.daily, |b| b.count)
    }

    /// Busiest weekday. Ties go to the earliest weekday, Sunday first.
    #[must_use]
    pub fn peak_weekday(&self) -> Option<&WeekdayBucket> {
        first_peak(&self.weekly, |b| b.count)
    }

    /// Total executions counted in the hourly view.
    #[must_use]
    pub fn total(&self) -> usize {
        self.hourly.iter().map(|b| b.count).sum()
    }
}

/// First bucket holding the maximum count, scanning in natural order.
pub fn first_peak<T>(buckets: &[T], count: impl Fn(&T) -> usize) -> Option<&T> {
    let mut peak: Option<&T> = None;
    for bucket in buckets {
        match peak {
            Some(current) if count(bucket) <= count(current) => {}
            _ => peak = Some(bucket),
        }
    }
    peak
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_symbols_round_trip() {
        for modifier in Modifier::ALL {
            assert_eq!(Modifier::from_symbol(modifier.symbol()), Some(modifier));
        }
        assert_eq!(Modifier::from_symbol('A'), None);
        assert_eq!(Modifier::Option.to_string(), "Option");
    }

    #[test]
    fn test_first_peak_prefers_earliest_on_tie() {
        let counts = [1usize, 3, 2, 3];
        let peak = first_peak(&counts, |c| *c);
        assert!(std::ptr::eq(peak.unwrap(), &counts[1]));
    }

    #[test]
    fn test_first_peak_empty() {
        let counts: [usize; 0] = [];
        assert!(first_peak(&counts, |c| *c).is_none());
    }

    #[test]
    fn test_default_series_is_seeded() {
        let series = TimeBucketSeries::default();
        assert_eq!(series.hourly.len(), 24);
        assert_eq!(series.weekly.len(), 7);
        assert!(series.daily.is_empty());
        assert_eq!(series.weekly[0].weekday, Weekday::Sun);
        assert_eq!(series.peak_hour().map(|b| b.hour), Some(0));
        assert_eq!(series.peak_weekday().map(|b| b.weekday), Some(Weekday::Sun));
        assert!(series.peak_day().is_none());
    }

    #[test]
    fn test_bucket_labels() {
        assert_eq!(HourBucket { hour: 7, count: 0 }.label(), "07:00");
        assert_eq!(
            WeekdayBucket { weekday: Weekday::Wed, count: 0 }.label(),
            "Wed"
        );
    }

    #[test]
    fn test_hotkey_max_key_count_floor() {
        let analysis = HotkeyAnalysis::default();
        assert_eq!(analysis.max_key_count(), 1);
        assert!(analysis.intensity("A").abs() < f64::EPSILON);
    }
}
