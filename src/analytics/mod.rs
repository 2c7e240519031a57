//! Statistics over parsed macro executions.
//!
//! This module provides:
//! - Per-macro counts, first/last use, and daily rates
//! - Hotkey, modifier, and key frequency ([`hotkeys`])
//! - Hour-of-day, per-date, and weekday buckets ([`timeline`])
//! - A one-screen overview combining the above ([`summary`])
//!
//! Every aggregator is a pure function of its input slice and returns a
//! well-formed empty result for empty input.

pub mod hotkeys;
pub mod summary;
pub mod timeline;

pub use hotkeys::{aggregate_hotkey_stats, hotkey_combination, key_intensity};
pub use summary::{summarize, AnalysisSummary};
pub use timeline::aggregate_time_buckets;

use chrono::NaiveDateTime;
use indexmap::{IndexMap, IndexSet};

use crate::model::{LogEntry, MacroStatEntry};

const SECONDS_PER_DAY: i64 = 86_400;

/// Running totals for one macro during the accumulation pass.
#[derive(Debug, Clone)]
struct MacroAccumulator {
    count: usize,
    first_seen: NaiveDateTime,
    last_seen: NaiveDateTime,
    triggers: IndexSet<String>,
}

impl MacroAccumulator {
    fn new(entry: &LogEntry) -> Self {
        Self {
            count: 0,
            first_seen: entry.timestamp,
            last_seen: entry.timestamp,
            triggers: IndexSet::new(),
        }
    }

    fn add(&mut self, entry: &LogEntry) {
        self.count += 1;
        self.first_seen = self.first_seen.min(entry.timestamp);
        self.last_seen = self.last_seen.max(entry.timestamp);
        if !self.triggers.contains(entry.trigger.as_str()) {
            self.triggers.insert(entry.trigger.clone());
        }
    }

    fn finish(self, name: String) -> MacroStatEntry {
        let days_diff = days_between(self.first_seen, self.last_seen);
        MacroStatEntry {
            name,
            count: self.count,
            avg_per_day: one_decimal(self.count as f64 / days_diff as f64),
            first_seen: self.first_seen,
            last_seen: self.last_seen,
            triggers: self.triggers.into_iter().collect::<Vec<_>>().join(", "),
            days_diff,
        }
    }
}

/// Format with one decimal, rounding ties up.
fn one_decimal(value: f64) -> String {
    format!("{:.1}", (value * 10.0).round() / 10.0)
}

/// Whole days from `first` to `last`, rounded up, never below 1.
#[must_use]
pub fn days_between(first: NaiveDateTime, last: NaiveDateTime) -> u64 {
    let secs = (last - first).num_seconds().max(0);
    let days = (secs + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY;
    days.max(1) as u64
}

/// Per-macro statistics ranked by execution count.
///
/// Accumulation is a single fold keyed by macro name; rates are derived in a
/// second pass once first/last timestamps are final. Macros with equal counts
/// keep the order in which they first appear.
pub fn aggregate_macro_stats(entries: &[LogEntry]) -> Vec<MacroStatEntry> {
    let accumulated = entries.iter().fold(
        IndexMap::<String, MacroAccumulator>::new(),
        |mut acc, entry| {
            acc.entry(entry.macro_name.clone())
                .or_insert_with(|| MacroAccumulator::new(entry))
                .add(entry);
            acc
        },
    );

    let mut stats: Vec<MacroStatEntry> = accumulated
        .into_iter()
        .map(|(name, acc)| acc.finish(name))
        .collect();
    stats.sort_by(|a, b| b.count.cmp(&a.count));
    stats
}

/// Distinct macro names in order of first appearance.
pub fn macro_names(entries: &[LogEntry]) -> IndexSet<&str> {
    entries.iter().map(|e| e.macro_name.as_str()).collect()
}

/// Top `n` items of a ranked count map.
pub fn top_n<K>(ranked: &IndexMap<K, usize>, n: usize) -> Vec<(&K, usize)> {
    ranked.iter().take(n).map(|(k, v)| (k, *v)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TIMESTAMP_FORMAT;
    use pretty_assertions::assert_eq;

    fn entry(ts: &str, name: &str, trigger: &str) -> LogEntry {
        LogEntry::new(
            NaiveDateTime::parse_from_str(ts, TIMESTAMP_FORMAT).unwrap(),
            name,
            trigger,
            "",
        )
    }

    #[test]
    fn test_empty_input() {
        assert!(aggregate_macro_stats(&[]).is_empty());
    }

    #[test]
    fn test_single_event_macro() {
        let stats = aggregate_macro_stats(&[entry("2024-01-01 09:00:00", "X", "t")]);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].days_diff, 1);
        assert_eq!(stats[0].avg_per_day, "1.0");
        assert_eq!(stats[0].first_seen, stats[0].last_seen);
    }

    #[test]
    fn test_days_diff_rounds_up() {
        let stats = aggregate_macro_stats(&[
            entry("2024-01-01 09:00:00", "X", "t"),
            entry("2024-01-02 09:00:01", "X", "t"),
            entry("2024-01-03 08:00:00", "X", "t"),
        ]);
        // 1 day 23 hours -> 2 days
        assert_eq!(stats[0].days_diff, 2);
        assert_eq!(stats[0].avg_per_day, "1.5");
    }

    #[test]
    fn test_ranking_is_stable_on_ties() {
        let stats = aggregate_macro_stats(&[
            entry("2024-01-01 09:00:00", "B", "t"),
            entry("2024-01-01 09:00:01", "A", "t"),
            entry("2024-01-01 09:00:02", "C", "t"),
            entry("2024-01-01 09:00:03", "C", "t"),
        ]);
        let names: Vec<_> = stats.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["C", "B", "A"]);
    }

    #[test]
    fn test_triggers_are_distinct_in_first_seen_order() {
        let stats = aggregate_macro_stats(&[
            entry("2024-01-01 09:00:00", "X", "Hot Key ⌘K is pressed"),
            entry("2024-01-01 09:00:01", "X", "Typed String"),
            entry("2024-01-01 09:00:02", "X", "Hot Key ⌘K is pressed"),
        ]);
        assert_eq!(stats[0].triggers, "Hot Key ⌘K is pressed, Typed String");
        assert_eq!(stats[0].trigger_list().count(), 2);
    }

    #[test]
    fn test_avg_times_days_matches_count() {
        let stats = aggregate_macro_stats(&[
            entry("2024-01-01 09:00:00", "X", "t"),
            entry("2024-01-04 10:00:00", "X", "t"),
            entry("2024-01-05 10:00:00", "Y", "t"),
        ]);
        for stat in &stats {
            assert!(stat.days_diff >= 1);
            let approx = stat.avg_per_day_value() * stat.days_diff as f64;
            assert!((approx - stat.count as f64).abs() <= 0.05 * stat.days_diff as f64);
        }
    }

    #[test]
    fn test_avg_per_day_rounds_ties_up() {
        let entries: Vec<_> = (1..=5)
            .map(|day| entry(&format!("2024-01-0{day} 09:00:00"), "X", "t"))
            .collect();
        let stats = aggregate_macro_stats(&entries);
        assert_eq!(stats[0].days_diff, 4);
        assert_eq!(stats[0].avg_per_day, "1.3");
        assert_eq!(one_decimal(0.25), "0.3");
        assert_eq!(one_decimal(2.0), "2.0");
    }

    #[test]
    fn test_macro_names_first_appearance() {
        let entries = [
            entry("2024-01-01 09:00:00", "B", "t"),
            entry("2024-01-01 09:00:01", "A", "t"),
            entry("2024-01-01 09:00:02", "B", "t"),
        ];
        let names: Vec<_> = macro_names(&entries).into_iter().collect();
        assert_eq!(names, vec!["B", "A"]);
    }
}
