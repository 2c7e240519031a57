//! Timeline command implementation.
//!
//! Execution counts by hour of day, calendar date, and weekday.

use serde::Serialize;

use crate::cli::{Cli, OutputFormat, TimelineArgs, TimelineView};
use crate::config::Config;
use crate::error::Result;
use crate::model::{DayBucket, HourBucket, TimeBucketSeries, WeekdayBucket};
use crate::util::{bar, format_count};

use super::{load_analyzer, print_heading, print_json};

/// Width of the bar column.
const BAR_WIDTH: usize = 40;

/// A bucket reduced to what the printers need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct Row {
    label: String,
    count: usize,
}

/// One titled series of rows with its peak label.
#[derive(Debug, Clone, Serialize)]
struct Section {
    view: &'static str,
    peak: Option<String>,
    buckets: Vec<Row>,
}

/// Run the timeline command.
pub fn run(cli: &Cli, config: &Config, args: &TimelineArgs) -> Result<()> {
    let (analyzer, _) = load_analyzer(config, &args.analysis)?;
    let series = analyzer.time_buckets();
    let sections = sections(&series, args.view);

    match cli.effective_output() {
        OutputFormat::Json => print_json(&sections)?,
        OutputFormat::Tsv => {
            println!("view\tlabel\tcount");
            for section in &sections {
                for row in &section.buckets {
                    println!("{}\t{}\t{}", section.view, row.label, row.count);
                }
            }
        }
        OutputFormat::Compact => {
            for section in &sections {
                let counts: Vec<String> = section.buckets.iter().map(|r| r.count.to_string()).collect();
                println!("{}:{}", section.view, counts.join(","));
            }
        }
        OutputFormat::Text => {
            for (idx, section) in sections.iter().enumerate() {
                if idx > 0 {
                    println!();
                }
                print_section(section);
            }
        }
    }

    Ok(())
}

fn sections(series: &TimeBucketSeries, view: TimelineView) -> Vec<Section> {
    let hourly = || Section {
        view: "hourly",
        peak: series.peak_hour().map(HourBucket::label),
        buckets: series.hourly.iter().map(|b| row(b.label(), b.count)).collect(),
    };
    let daily = || Section {
        view: "daily",
        peak: series.peak_day().map(DayBucket::label),
        buckets: series.daily.iter().map(|b| row(b.label(), b.count)).collect(),
    };
    let weekly = || Section {
        view: "weekly",
        peak: series.peak_weekday().map(WeekdayBucket::label),
        buckets: series.weekly.iter().map(|b| row(b.label(), b.count)).collect(),
    };

    match view {
        TimelineView::Hourly => vec![hourly()],
        TimelineView::Daily => vec![daily()],
        TimelineView::Weekly => vec![weekly()],
        TimelineView::All => vec![hourly(), daily(), weekly()],
    }
}

fn row(label: String, count: usize) -> Row {
    Row { label, count }
}

fn print_section(section: &Section) {
    let title = match section.view {
        "hourly" => "By hour of day",
        "daily" => "By date",
        _ => "By weekday",
    };
    print_heading(title);

    if section.buckets.is_empty() {
        println!("No executions.");
        return;
    }

    let max = section.buckets.iter().map(|r| r.count).max().unwrap_or(0);
    for row in &section.buckets {
        let marker = if max > 0 && section.peak.as_deref() == Some(row.label.as_str()) {
            " <- peak"
        } else {
            ""
        };
        println!(
            "  {:<10} {:>7}  {}{}",
            row.label,
            format_count(row.count),
            bar(row.count, max, BAR_WIDTH),
            marker
        );
    }
}
