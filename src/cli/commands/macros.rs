//! Macros command implementation.
//!
//! Per-macro usage table for the selected macros.

use std::cmp::Reverse;

use crate::cli::{Cli, MacroSort, MacrosArgs, OutputFormat};
use crate::config::Config;
use crate::error::Result;
use crate::model::{MacroStatEntry, TIMESTAMP_FORMAT};
use crate::util::{format_count, truncate_chars};

use super::{load_analyzer, print_heading, print_json, row_limit};

/// Width of the name column in text output.
const NAME_WIDTH: usize = 32;

/// Width of the trigger column in text output.
const TRIGGER_WIDTH: usize = 48;

/// Run the macros command.
pub fn run(cli: &Cli, config: &Config, args: &MacrosArgs) -> Result<()> {
    let (analyzer, config) = load_analyzer(config, &args.analysis)?;

    let mut stats = analyzer.selected_stats();
    sort_stats(&mut stats, args.sort);
    let total = stats.len();
    stats.truncate(row_limit(args.top, &config));

    let show_triggers = config.display.show_triggers && !args.no_triggers;

    match cli.effective_output() {
        OutputFormat::Json => print_json(&stats)?,
        OutputFormat::Tsv => {
            println!("name\tcount\tavg_per_day\tfirst_seen\tlast_seen\tdays\ttriggers");
            for stat in &stats {
                println!(
                    "{}\t{}\t{}\t{}\t{}\t{}\t{}",
                    stat.name,
                    stat.count,
                    stat.avg_per_day,
                    stat.first_seen.format(TIMESTAMP_FORMAT),
                    stat.last_seen.format(TIMESTAMP_FORMAT),
                    stat.days_diff,
                    stat.triggers
                );
            }
        }
        OutputFormat::Compact => {
            for stat in &stats {
                println!("{}:{}", stat.name, stat.count);
            }
        }
        OutputFormat::Text => {
            print_heading("Macros");
            if stats.is_empty() {
                println!("No macros selected.");
                return Ok(());
            }

            print!(
                "{:>4}  {:<NAME_WIDTH$} {:>8} {:>8}  {:<19}  {:<19}",
                "#", "Macro", "Count", "Per day", "First seen", "Last seen"
            );
            if show_triggers {
                print!("  Triggers");
            }
            println!();

            for (rank, stat) in stats.iter().enumerate() {
                print!(
                    "{:>4}  {:<NAME_WIDTH$} {:>8} {:>8}  {}  {}",
                    rank + 1,
                    truncate_chars(&stat.name, NAME_WIDTH),
                    format_count(stat.count),
                    stat.avg_per_day,
                    stat.first_seen.format(TIMESTAMP_FORMAT),
                    stat.last_seen.format(TIMESTAMP_FORMAT)
                );
                if show_triggers {
                    print!("  {}", truncate_chars(&stat.triggers, TRIGGER_WIDTH));
                }
                println!();
            }

            if !cli.quiet && stats.len() < total {
                println!();
                println!("Showing {} of {} macros (use --top 0 for all).", stats.len(), total);
            }
        }
    }

    Ok(())
}

/// Reorder statistics rows. Ties keep their ranked order.
fn sort_stats(stats: &mut [MacroStatEntry], sort: MacroSort) {
    match sort {
        MacroSort::Count => {}
        MacroSort::Name => stats.sort_by_cached_key(|s| s.name.to_lowercase()),
        MacroSort::Recent => stats.sort_by_key(|s| Reverse(s.last_seen)),
    }
}
