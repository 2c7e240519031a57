//! Hotkeys command implementation.
//!
//! Key, modifier, and combination frequency for hotkey-triggered executions,
//! with a log-scaled intensity per key for heatmap-style display.

use serde::Serialize;

use crate::analytics::key_intensity;
use crate::cli::{Cli, HotkeysArgs, OutputFormat};
use crate::config::Config;
use crate::error::Result;
use crate::model::{HotkeyAnalysis, Modifier};
use crate::util::{bar, format_count};

use super::{load_analyzer, print_heading, print_json, row_limit};

/// Width of the intensity bar.
const BAR_WIDTH: usize = 24;

/// One key row.
#[derive(Debug, Serialize)]
struct KeyRow<'a> {
    key: &'a str,
    count: usize,
    intensity: f64,
}

/// One modifier row.
#[derive(Debug, Serialize)]
struct ModifierRow {
    modifier: Modifier,
    symbol: char,
    count: usize,
}

/// One combination row.
#[derive(Debug, Serialize)]
struct CombinationRow<'a> {
    combination: &'a str,
    count: usize,
}

/// JSON shape of the command output.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HotkeysOutput<'a> {
    hotkey_executions: usize,
    keys: Vec<KeyRow<'a>>,
    modifiers: Vec<ModifierRow>,
    combinations: Vec<CombinationRow<'a>>,
}

impl<'a> HotkeysOutput<'a> {
    fn new(analysis: &'a HotkeyAnalysis, limit: usize) -> Self {
        let max = analysis.max_key_count();
        Self {
            hotkey_executions: analysis.hotkey_executions,
            keys: analysis
                .key_stats
                .iter()
                .take(limit)
                .map(|(key, count)| KeyRow {
                    key,
                    count: *count,
                    intensity: key_intensity(*count, max),
                })
                .collect(),
            modifiers: analysis
                .modifier_stats
                .iter()
                .map(|(modifier, count)| ModifierRow {
                    modifier: *modifier,
                    symbol: modifier.symbol(),
                    count: *count,
                })
                .collect(),
            combinations: analysis
                .combination_stats
                .iter()
                .take(limit)
                .map(|(combination, count)| CombinationRow {
                    combination,
                    count: *count,
                })
                .collect(),
        }
    }
}

/// Run the hotkeys command.
pub fn run(cli: &Cli, config: &Config, args: &HotkeysArgs) -> Result<()> {
    let (analyzer, config) = load_analyzer(config, &args.analysis)?;
    let analysis = analyzer.hotkeys();
    let output = HotkeysOutput::new(&analysis, row_limit(args.top, &config));

    match cli.effective_output() {
        OutputFormat::Json => print_json(&output)?,
        OutputFormat::Tsv => {
            println!("kind\tvalue\tcount\tintensity");
            for row in &output.keys {
                println!("key\t{}\t{}\t{:.3}", row.key, row.count, row.intensity);
            }
            for row in &output.modifiers {
                println!("modifier\t{}\t{}\t", row.modifier, row.count);
            }
            for row in &output.combinations {
                println!("combination\t{}\t{}\t", row.combination, row.count);
            }
        }
        OutputFormat::Compact => {
            let keys: Vec<String> = output
                .keys
                .iter()
                .map(|row| format!("{}:{}", row.key, row.count))
                .collect();
            println!("hotkeys:{} {}", output.hotkey_executions, keys.join(" "));
        }
        OutputFormat::Text => print_text(&output),
    }

    Ok(())
}

fn print_text(output: &HotkeysOutput<'_>) {
    print_heading("Hotkeys");
    if output.hotkey_executions == 0 {
        println!("No hotkey-triggered executions.");
        return;
    }
    println!(
        "{} hotkey-triggered executions",
        format_count(output.hotkey_executions)
    );

    println!();
    println!("Keys:");
    for row in &output.keys {
        println!(
            "  {:<10} {:>8}  {:<BAR_WIDTH$} {:>5.2}",
            row.key,
            format_count(row.count),
            intensity_bar(row.intensity),
            row.intensity
        );
    }

    println!();
    println!("Modifiers:");
    let max_modifier = output.modifiers.iter().map(|r| r.count).max().unwrap_or(0);
    for row in &output.modifiers {
        println!(
            "  {} {:<7} {:>8}  {}",
            row.symbol,
            row.modifier.name(),
            format_count(row.count),
            bar(row.count, max_modifier, BAR_WIDTH)
        );
    }

    println!();
    println!("Combinations:");
    for row in &output.combinations {
        println!("  {:<16} {:>8}", row.combination, format_count(row.count));
    }
}

/// Bar for an intensity already in `[0, 1]`.
fn intensity_bar(intensity: f64) -> String {
    let scaled = (intensity * 1000.0).round() as usize;
    bar(scaled, 1000, BAR_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::aggregate_hotkey_stats;
    use crate::parser::parse;

    #[test]
    fn test_output_rows() {
        let entries = parse(
            "2024-01-01 09:00:00 Execute macro \"A\" from trigger Hot Key ⌘⇧T is pressed
2024-01-01 09:00:01 Execute macro \"A\" from trigger Hot Key ⌘T is pressed
2024-01-01 09:00:02 Execute macro \"B\" from trigger Hot Key ⌥K is pressed
2024-01-01 09:00:03 Execute macro \"C\" from trigger Typed String",
        );
        let analysis = aggregate_hotkey_stats(&entries);
        let output = HotkeysOutput::new(&analysis, 1);

        assert_eq!(output.hotkey_executions, 3);
        assert_eq!(output.keys.len(), 1);
        assert_eq!(output.keys[0].key, "T");
        assert!((output.keys[0].intensity - 1.0).abs() < 1e-9);
        assert_eq!(output.modifiers.len(), 3);
        assert_eq!(output.combinations.len(), 1);

        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["modifiers"][0]["modifier"], "Cmd");
        assert_eq!(json["modifiers"][0]["symbol"], "⌘");
    }

    #[test]
    fn test_intensity_bar_bounds() {
        assert_eq!(intensity_bar(0.0), "");
        assert_eq!(intensity_bar(1.0).chars().count(), BAR_WIDTH);
    }
}
