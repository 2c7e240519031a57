//! CLI command implementations.
//!
//! Each command is implemented in its own module with a `run` function
//! that handles the command logic.

pub mod config;
pub mod export;
pub mod hotkeys;
pub mod macros;
pub mod report;
pub mod timeline;

use std::io::{self, Read};
use std::path::Path;

use console::style;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::api::MacroAnalyzer;
use crate::config::Config;
use crate::error::{MacroLensError, Result};
use crate::options::{parse_date_bound, parse_max_lines_input, parse_window_input, AnalysisOptions, DateRange, RangeEnd};

use super::AnalysisArgs;

/// Read a log from a file, or from stdin when the path is `-`.
///
/// Bytes that are not valid UTF-8 are replaced rather than rejected; the
/// parser only cares about lines it can match.
pub fn read_log(path: &Path) -> Result<String> {
    let bytes = if path == Path::new("-") {
        let mut buffer = Vec::new();
        io::stdin()
            .lock()
            .read_to_end(&mut buffer)
            .map_err(|e| MacroLensError::io("Failed to read log from stdin", e))?;
        buffer
    } else {
        std::fs::read(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => MacroLensError::FileNotFound {
                path: path.to_path_buf(),
            },
            io::ErrorKind::PermissionDenied => MacroLensError::PermissionDenied {
                path: path.to_path_buf(),
            },
            _ => MacroLensError::io(format!("Failed to read log: {}", path.display()), e),
        })?
    };

    debug!(path = %path.display(), bytes = bytes.len(), "Log read");
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Configuration with overrides from a `.macrolens.toml` beside the log.
///
/// An unreadable directory file is logged and skipped.
pub fn effective_config(config: &Config, args: &AnalysisArgs) -> Config {
    if args.file == Path::new("-") {
        return config.clone();
    }
    let dir = match args.file.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    config.clone().with_directory_overrides(dir).unwrap_or_else(|e| {
        warn!(error = %e, "Ignoring directory config");
        config.clone()
    })
}

/// Analysis options from configuration overlaid with command-line flags.
pub fn analysis_options(config: &Config, args: &AnalysisArgs) -> Result<AnalysisOptions> {
    let mut options = config.analysis_options();

    if let Some(dedup) = args.dedup_override() {
        options = options.with_deduplicate(dedup);
    }
    if let Some(window) = &args.window {
        options = options.with_window_ms(parse_window_input(window));
    }

    let range = DateRange {
        start: args
            .from
            .as_deref()
            .map(|s| parse_date_bound(s, RangeEnd::Start))
            .transpose()?,
        end: args
            .to
            .as_deref()
            .map(|s| parse_date_bound(s, RangeEnd::End))
            .transpose()?,
    };
    if let (Some(start), Some(end)) = (range.start, range.end) {
        if start > end {
            return Err(MacroLensError::invalid_argument(
                "from",
                "must not be later than --to",
            ));
        }
    }

    Ok(options.with_date_range(range))
}

/// Read, parse, and analyse the log named by `args`, applying selection flags.
///
/// Returns the analyzer together with the configuration that applied to it.
pub fn load_analyzer(config: &Config, args: &AnalysisArgs) -> Result<(MacroAnalyzer, Config)> {
    let config = effective_config(config, args);
    let options = analysis_options(&config, args)?;
    let max_lines = args
        .max_lines
        .as_deref()
        .map_or_else(|| config.analysis.effective_max_lines(), parse_max_lines_input);

    let text = read_log(&args.file)?;
    let mut analyzer = MacroAnalyzer::from_text_with(&text, max_lines, options)?;

    if !args.select.is_empty() {
        analyzer.select_only(&args.select);
    }
    for name in &args.exclude {
        if !analyzer.deselect(name) {
            warn!(name = name.as_str(), "Excluded macro is not selected");
        }
    }
    if analyzer.selection().is_empty() {
        warn!("No macros selected, views will be empty");
    }

    info!(
        entries = analyzer.entries().len(),
        analyzed = analyzer.analyzed_entries().len(),
        selected = analyzer.selection().len(),
        "Log analysed"
    );
    Ok((analyzer, config))
}

/// Print a value as pretty JSON.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a section heading.
pub fn print_heading(title: &str) {
    println!("{}", style(title).bold().cyan());
    println!("{}", "=".repeat(title.chars().count()));
}

/// Limit a row count, with 0 meaning no limit.
pub fn row_limit(requested: Option<usize>, config: &Config) -> usize {
    match requested.unwrap_or(config.display.top) {
        0 => usize::MAX,
        n => n,
    }
}
