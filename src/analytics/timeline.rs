//! Time-bucketed execution counts.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::model::{DayBucket, LogEntry, TimeBucketSeries};

/// Bucket executions by hour of day, calendar date, and weekday.
///
/// Hourly and weekly views always hold all 24 / 7 buckets so chart axes stay
/// fixed; the daily view only has dates that occur in `entries`.
pub fn aggregate_time_buckets(entries: &[LogEntry]) -> TimeBucketSeries {
    let mut series = TimeBucketSeries::default();
    let mut daily: BTreeMap<NaiveDate, usize> = BTreeMap::new();

    for entry in entries {
        series.hourly[entry.hour() as usize].count += 1;
        series.weekly[entry.weekday().num_days_from_sunday() as usize].count += 1;
        *daily.entry(entry.date()).or_insert(0) += 1;
    }

    series.daily = daily
        .into_iter()
        .map(|(date, count)| DayBucket { date, count })
        .collect();
    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDateTime, Weekday};
    use pretty_assertions::assert_eq;

    use crate::model::TIMESTAMP_FORMAT;

    fn at(ts: &str) -> LogEntry {
        LogEntry::new(
            NaiveDateTime::parse_from_str(ts, TIMESTAMP_FORMAT).unwrap(),
            "M",
            "t",
            "",
        )
    }

    #[test]
    fn test_empty_entries_are_seeded() {
        let series = aggregate_time_buckets(&[]);
        assert_eq!(series.hourly.len(), 24);
        assert_eq!(series.weekly.len(), 7);
        assert!(series.daily.is_empty());
        assert_eq!(series.total(), 0);
    }

    #[test]
    fn test_three_hours_same_day() {
        // 2024-01-03 was a Wednesday
        let series = aggregate_time_buckets(&[
            at("2024-01-03 08:10:00"),
            at("2024-01-03 12:00:00"),
            at("2024-01-03 17:59:59"),
        ]);

        for bucket in &series.hourly {
            let expected = usize::from(matches!(bucket.hour, 8 | 12 | 17));
            assert_eq!(bucket.count, expected, "hour {}", bucket.hour);
        }
        for bucket in &series.weekly {
            let expected = if bucket.weekday == Weekday::Wed { 3 } else { 0 };
            assert_eq!(bucket.count, expected, "weekday {}", bucket.weekday);
        }
        assert_eq!(series.daily.len(), 1);
        assert_eq!(series.daily[0].count, 3);
    }

    #[test]
    fn test_daily_sorted_ascending() {
        let series = aggregate_time_buckets(&[
            at("2024-02-01 09:00:00"),
            at("2024-01-15 09:00:00"),
            at("2024-02-01 10:00:00"),
        ]);
        let labels: Vec<_> = series.daily.iter().map(|b| (b.label(), b.count)).collect();
        assert_eq!(
            labels,
            vec![("2024-01-15".to_string(), 1), ("2024-02-01".to_string(), 2)]
        );
    }

    #[test]
    fn test_peaks_take_first_maximum() {
        let series = aggregate_time_buckets(&[
            at("2024-01-01 14:00:00"), // Monday
            at("2024-01-02 09:00:00"), // Tuesday
            at("2024-01-02 14:30:00"),
            at("2024-01-03 09:30:00"), // Wednesday
        ]);
        // hours 9 and 14 tie at 2: earliest wins
        assert_eq!(series.peak_hour().map(|b| b.hour), Some(9));
        assert_eq!(series.peak_weekday().map(|b| b.weekday), Some(Weekday::Tue));
        assert_eq!(
            series.peak_day().map(|b| b.label()),
            Some("2024-01-02".to_string())
        );
    }
}
