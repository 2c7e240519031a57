//! Report command implementation.
//!
//! One-screen overview of a log: volume, span, peaks, and the top macros.

use crate::api::{AnalysisReport, MacroAnalyzer};
use crate::cli::{Cli, OutputFormat, ReportArgs};
use crate::config::Config;
use crate::error::Result;
use crate::model::{DATE_FORMAT, TIMESTAMP_FORMAT};
use crate::util::{format_count, truncate_chars};

use super::{load_analyzer, print_heading, print_json};

/// Macros listed under "Top macros" in the text report.
const TOP_IN_REPORT: usize = 5;

/// Run the report command.
pub fn run(cli: &Cli, config: &Config, args: &ReportArgs) -> Result<()> {
    let (analyzer, _) = load_analyzer(config, &args.analysis)?;
    let report = analyzer.report();

    match cli.effective_output() {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Tsv => print_tsv(&report),
        OutputFormat::Compact => print_compact(&report),
        OutputFormat::Text => print_text(cli, &analyzer, &report, args.samples),
    }
    Ok(())
}

fn print_text(cli: &Cli, analyzer: &MacroAnalyzer, report: &AnalysisReport, show_samples: bool) {
    let summary = &report.summary;
    let parse = &report.parse;

    print_heading("Macro Execution Report");
    println!();

    if !cli.quiet {
        println!(
            "Source:         {} lines, {} executions parsed, {} malformed",
            format_count(parse.lines_processed),
            format_count(parse.entries_parsed),
            format_count(parse.lines_skipped)
        );
        if report.truncated_lines > 0 {
            println!(
                "                {} oldest lines skipped (line limit)",
                format_count(report.truncated_lines)
            );
        }
        if let Some(dedup) = report.dedup {
            println!(
                "Deduplication:  {} repeats removed within {} ms",
                format_count(dedup.removed),
                report.options.deduplication_window_ms
            );
        }
    }

    if summary.total_executions == 0 {
        println!("No executions match the current filters.");
        return;
    }

    if let (Some(first), Some(last)) = (summary.first_execution, summary.last_execution) {
        println!(
            "Period:         {} to {} ({} days)",
            first.format(TIMESTAMP_FORMAT),
            last.format(TIMESTAMP_FORMAT),
            summary.span_days
        );
    }
    println!(
        "Executions:     {} ({:.1}/day)",
        format_count(summary.total_executions),
        summary.average_per_day
    );
    println!(
        "Macros:         {} of {} selected",
        format_count(summary.unique_macros),
        format_count(analyzer.macro_stats().len())
    );
    if let Some(top) = &summary.top_macro {
        println!("Most used:      {} ({})", top, format_count(summary.top_macro_count));
    }
    if let Some(hour) = summary.peak_hour {
        println!("Peak hour:      {hour:02}:00");
    }
    if let Some(weekday) = summary.peak_weekday {
        println!("Peak weekday:   {weekday}");
    }
    if let Some(day) = summary.peak_day {
        println!("Peak day:       {}", day.format(DATE_FORMAT));
    }
    println!(
        "Hotkeys:        {} ({:.1}% of executions)",
        format_count(summary.hotkey_executions),
        summary.hotkey_share()
    );

    println!();
    println!("Top macros:");
    for (rank, stat) in report.macros.iter().take(TOP_IN_REPORT).enumerate() {
        println!(
            "  {:>2}. {:<32} {:>8}  {:>6}/day",
            rank + 1,
            truncate_chars(&stat.name, 32),
            format_count(stat.count),
            stat.avg_per_day
        );
    }

    if show_samples && !parse.samples.is_empty() {
        println!();
        println!("Malformed lines (first {}):", parse.samples.len());
        for sample in &parse.samples {
            println!("  line {}: {}", sample.line, sample.reason);
            println!("    {}", sample.content_preview);
        }
    }
}

fn print_tsv(report: &AnalysisReport) {
    let summary = &report.summary;
    println!("metric\tvalue");
    println!("lines_processed\t{}", report.parse.lines_processed);
    println!("entries_parsed\t{}", report.parse.entries_parsed);
    println!("lines_skipped\t{}", report.parse.lines_skipped);
    println!("total_executions\t{}", summary.total_executions);
    println!("unique_macros\t{}", summary.unique_macros);
    println!("span_days\t{}", summary.span_days);
    println!("average_per_day\t{:.2}", summary.average_per_day);
    if let Some(top) = &summary.top_macro {
        println!("top_macro\t{top}");
        println!("top_macro_count\t{}", summary.top_macro_count);
    }
    if let Some(hour) = summary.peak_hour {
        println!("peak_hour\t{hour}");
    }
    if let Some(weekday) = summary.peak_weekday {
        println!("peak_weekday\t{weekday}");
    }
    if let Some(day) = summary.peak_day {
        println!("peak_day\t{}", day.format(DATE_FORMAT));
    }
    println!("hotkey_executions\t{}", summary.hotkey_executions);
    if let Some(dedup) = report.dedup {
        println!("dedup_removed\t{}", dedup.removed);
    }
}

fn print_compact(report: &AnalysisReport) {
    let summary = &report.summary;
    println!(
        "executions:{} macros:{} days:{} avg:{:.1} top:{} hotkeys:{}",
        summary.total_executions,
        summary.unique_macros,
        summary.span_days,
        summary.average_per_day,
        summary.top_macro.as_deref().unwrap_or("-"),
        summary.hotkey_executions
    );
}
