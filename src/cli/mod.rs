//! Command-line interface for macrolens.
//!
//! Provides scriptable access to macro execution logs with these commands:
//! - `report`: One-screen overview of a log
//! - `macros`: Per-macro usage table
//! - `hotkeys`: Key, modifier, and combination frequency
//! - `timeline`: Hour-of-day, per-date, and weekday activity
//! - `export`: Write the analysis as JSON or CSV
//! - `config`: View and modify configuration
//!
//! Every analysis command reads one log file (or `-` for stdin) and accepts
//! the same filtering flags, see [`AnalysisArgs`].

mod commands;

pub use commands::*;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;

use crate::config::Config;
use crate::error::Result;
use crate::export::{CsvTable, ExportFormat};

/// Usage statistics for macro-automation execution logs.
#[derive(Debug, Parser)]
#[command(name = "macrolens")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Output format for structured data.
    #[arg(short = 'o', long, global = true, default_value = "text", env = "MACROLENS_OUTPUT")]
    pub output: OutputFormat,

    /// Suppress non-essential output.
    #[arg(short = 'q', long, global = true, env = "MACROLENS_QUIET")]
    pub quiet: bool,

    /// Enable colored output (auto-detected by default).
    #[arg(long, global = true, env = "MACROLENS_COLOR")]
    pub color: Option<bool>,

    /// Output as JSON (shorthand for -o json).
    #[arg(long, global = true, env = "MACROLENS_JSON")]
    pub json: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, global = true, default_value = "warn", env = "MACROLENS_LOG_LEVEL")]
    pub log_level: LogLevel,

    /// Log format (text, json, compact, pretty).
    #[arg(long, global = true, default_value = "text", env = "MACROLENS_LOG_FORMAT")]
    pub log_format: LogFormat,

    /// Path to custom configuration file.
    #[arg(long, global = true, env = "MACROLENS_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Log level options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogLevel {
    /// Only errors.
    Error,
    /// Errors and warnings.
    #[default]
    Warn,
    /// Errors, warnings, and informational messages.
    Info,
    /// All of the above plus debug messages.
    Debug,
    /// All messages including trace-level details.
    Trace,
}

/// Log format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Human-readable text format.
    #[default]
    Text,
    /// Structured JSON format for machine consumption.
    Json,
    /// Compact single-line format.
    Compact,
    /// Pretty format with full details.
    Pretty,
}

impl LogLevel {
    /// Convert to tracing filter level.
    #[must_use]
    pub fn to_filter_string(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

impl Cli {
    /// Get effective output format.
    #[must_use]
    pub fn effective_output(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            self.output
        }
    }
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Overview of executions, peaks, and hotkey share.
    #[command(alias = "r", alias = "summary")]
    Report(ReportArgs),

    /// Per-macro usage table.
    #[command(alias = "m", alias = "ls")]
    Macros(MacrosArgs),

    /// Keyboard usage from hotkey triggers.
    #[command(alias = "keys")]
    Hotkeys(HotkeysArgs),

    /// Activity by hour, date, and weekday.
    #[command(alias = "t")]
    Timeline(TimelineArgs),

    /// Export the analysis as JSON or CSV.
    #[command(alias = "x")]
    Export(ExportArgs),

    /// View and modify configuration.
    Config(ConfigArgs),

    /// Generate shell completions.
    Completions(CompletionsArgs),
}

/// Log source and filters shared by every analysis command.
#[derive(Debug, Clone, clap::Args)]
pub struct AnalysisArgs {
    /// Execution log to analyse (`-` reads stdin).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Collapse rapid repeats of the same macro.
    #[arg(long, overrides_with = "no_dedup")]
    pub dedup: bool,

    /// Keep every execution, even if deduplication is configured.
    #[arg(long, overrides_with = "dedup")]
    pub no_dedup: bool,

    /// Deduplication window: milliseconds (1500) or a duration (2s, 1m).
    #[arg(short = 'w', long, value_name = "WINDOW")]
    pub window: Option<String>,

    /// Only executions at or after this date (YYYY-MM-DD [HH:MM:SS]).
    #[arg(long, value_name = "DATE")]
    pub from: Option<String>,

    /// Only executions at or before this date (YYYY-MM-DD [HH:MM:SS]).
    #[arg(long, value_name = "DATE")]
    pub to: Option<String>,

    /// Read at most this many lines, keeping the most recent.
    #[arg(long, value_name = "N")]
    pub max_lines: Option<String>,

    /// Only include these macros (repeatable).
    #[arg(short = 's', long = "select", value_name = "MACRO")]
    pub select: Vec<String>,

    /// Leave out these macros (repeatable).
    #[arg(short = 'x', long = "exclude", value_name = "MACRO")]
    pub exclude: Vec<String>,
}

impl AnalysisArgs {
    /// Deduplication choice from the flags, `None` to defer to configuration.
    #[must_use]
    pub fn dedup_override(&self) -> Option<bool> {
        if self.dedup {
            Some(true)
        } else if self.no_dedup {
            Some(false)
        } else {
            None
        }
    }
}

/// Arguments for the report command.
#[derive(Debug, Parser)]
pub struct ReportArgs {
    #[command(flatten)]
    pub analysis: AnalysisArgs,

    /// List sampled malformed lines.
    #[arg(long)]
    pub samples: bool,
}

/// Arguments for the macros command.
#[derive(Debug, Parser)]
pub struct MacrosArgs {
    #[command(flatten)]
    pub analysis: AnalysisArgs,

    /// Show at most this many rows (0 for all; default from config).
    #[arg(short = 'n', long)]
    pub top: Option<usize>,

    /// Sort order.
    #[arg(long, default_value = "count")]
    pub sort: MacroSort,

    /// Hide the trigger column.
    #[arg(long)]
    pub no_triggers: bool,
}

/// Macro table sort orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum MacroSort {
    /// Most executed first.
    #[default]
    Count,
    /// Alphabetical, case-insensitive.
    Name,
    /// Most recently executed first.
    Recent,
}

/// Arguments for the hotkeys command.
#[derive(Debug, Parser)]
pub struct HotkeysArgs {
    #[command(flatten)]
    pub analysis: AnalysisArgs,

    /// Show at most this many keys and combinations (0 for all; default from config).
    #[arg(short = 'n', long)]
    pub top: Option<usize>,
}

/// Arguments for the timeline command.
#[derive(Debug, Parser)]
pub struct TimelineArgs {
    #[command(flatten)]
    pub analysis: AnalysisArgs,

    /// Which buckets to show.
    #[arg(long, default_value = "all")]
    pub view: TimelineView,
}

/// Timeline bucket views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TimelineView {
    /// 24 hour-of-day buckets.
    Hourly,
    /// One bucket per calendar date.
    Daily,
    /// 7 weekday buckets, Sunday first.
    Weekly,
    /// All three.
    #[default]
    All,
}

/// Arguments for the export command.
#[derive(Debug, Parser)]
pub struct ExportArgs {
    #[command(flatten)]
    pub analysis: AnalysisArgs,

    /// Export format.
    #[arg(short = 'f', long, default_value = "json")]
    pub format: ExportFormatArg,

    /// Table for CSV exports.
    #[arg(long, default_value = "macros")]
    pub table: CsvTableArg,

    /// Output file (default: stdout).
    #[arg(long = "out", value_name = "PATH")]
    pub out: Option<PathBuf>,
}

/// Export format argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormatArg {
    /// JSON report.
    Json,
    /// Pretty-printed JSON report.
    JsonPretty,
    /// CSV table.
    Csv,
}

impl From<ExportFormatArg> for ExportFormat {
    fn from(arg: ExportFormatArg) -> Self {
        match arg {
            ExportFormatArg::Json => Self::Json,
            ExportFormatArg::JsonPretty => Self::JsonPretty,
            ExportFormatArg::Csv => Self::Csv,
        }
    }
}

/// CSV table argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CsvTableArg {
    /// Per-macro statistics.
    Macros,
    /// Individual executions.
    Entries,
    /// Keys, modifiers, and combinations.
    Hotkeys,
    /// Executions per date.
    Daily,
}

impl From<CsvTableArg> for CsvTable {
    fn from(arg: CsvTableArg) -> Self {
        match arg {
            CsvTableArg::Macros => Self::Macros,
            CsvTableArg::Entries => Self::Entries,
            CsvTableArg::Hotkeys => Self::Hotkeys,
            CsvTableArg::Daily => Self::Daily,
        }
    }
}

/// Arguments for the config command.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    /// Config action to perform.
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommand actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Show all configuration values.
    Show,
    /// Get a specific configuration value.
    Get {
        /// Configuration key (e.g., "analysis.window_ms").
        key: String,
    },
    /// Set a configuration value.
    Set {
        /// Configuration key (e.g., "analysis.window_ms").
        key: String,
        /// New value.
        value: String,
    },
    /// Show configuration file path.
    Path,
    /// Initialize configuration file with defaults.
    Init,
    /// Reset configuration to defaults.
    Reset,
}

/// Arguments for the completions command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for.
    #[arg(value_enum)]
    pub shell: CompletionShell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CompletionShell {
    /// Bash shell.
    Bash,
    /// Zsh shell.
    Zsh,
    /// Fish shell.
    Fish,
    /// PowerShell.
    Powershell,
    /// Elvish shell.
    Elvish,
}

impl From<CompletionShell> for Shell {
    fn from(shell: CompletionShell) -> Self {
        match shell {
            CompletionShell::Bash => Shell::Bash,
            CompletionShell::Zsh => Shell::Zsh,
            CompletionShell::Fish => Shell::Fish,
            CompletionShell::Powershell => Shell::PowerShell,
            CompletionShell::Elvish => Shell::Elvish,
        }
    }
}

/// Generate shell completions and print to stdout.
pub fn generate_completions(shell: CompletionShell) {
    let mut cmd = Cli::command();
    let shell: Shell = shell.into();
    generate(shell, &mut cmd, "macrolens", &mut io::stdout());
}

/// Output format for CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// Tab-separated values.
    Tsv,
    /// Compact single-line output.
    Compact,
}

/// Initialize tracing/logging based on CLI options.
fn init_logging(cli: &Cli) {
    use tracing_subscriber::{
        fmt::{self, format::FmtSpan},
        layer::SubscriberExt,
        util::SubscriberInitExt,
        EnvFilter,
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level.to_filter_string()));

    let result = match cli.log_format {
        LogFormat::Json => {
            let layer = fmt::layer()
                .json()
                .with_span_events(FmtSpan::CLOSE)
                .with_file(true)
                .with_line_number(true)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()
        }
        LogFormat::Compact => {
            let layer = fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()
        }
        LogFormat::Pretty => {
            let layer = fmt::layer()
                .pretty()
                .with_file(true)
                .with_line_number(true)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()
        }
        LogFormat::Text => {
            let layer = fmt::layer().with_writer(std::io::stderr);
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()
        }
    };

    if let Err(e) = result {
        eprintln!("Warning: Could not initialize logging: {e}");
    }
}

/// Load configuration from `--config` or the default location.
///
/// An unreadable file is reported and replaced by defaults so a broken config
/// never blocks analysis.
fn load_config(cli: &Cli) -> Config {
    let loaded = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    loaded.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load config, using defaults");
        Config::default()
    })
}

/// Apply `--color`, falling back to the configured preference.
fn init_colors(cli: &Cli, config: &Config) {
    match cli.color {
        Some(enabled) => {
            console::set_colors_enabled(enabled);
            console::set_colors_enabled_stderr(enabled);
        }
        None if !config.display.color => {
            console::set_colors_enabled(false);
            console::set_colors_enabled_stderr(false);
        }
        None => {}
    }
}

/// Run the CLI application.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli);

    let config = load_config(&cli);
    init_colors(&cli, &config);

    match &cli.command {
        Commands::Report(args) => commands::report::run(&cli, &config, args),
        Commands::Macros(args) => commands::macros::run(&cli, &config, args),
        Commands::Hotkeys(args) => commands::hotkeys::run(&cli, &config, args),
        Commands::Timeline(args) => commands::timeline::run(&cli, &config, args),
        Commands::Export(args) => commands::export::run(&cli, &config, args),
        Commands::Config(args) => commands::config::run(&cli, args),
        Commands::Completions(args) => {
            generate_completions(args.shell);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_export_format_conversion() {
        assert_eq!(ExportFormat::from(ExportFormatArg::Json), ExportFormat::Json);
        assert_eq!(ExportFormat::from(ExportFormatArg::Csv), ExportFormat::Csv);
        assert_eq!(CsvTable::from(CsvTableArg::Daily), CsvTable::Daily);
    }

    #[test]
    fn test_log_level_to_filter() {
        assert_eq!(LogLevel::Error.to_filter_string(), "error");
        assert_eq!(LogLevel::Warn.to_filter_string(), "warn");
        assert_eq!(LogLevel::Info.to_filter_string(), "info");
        assert_eq!(LogLevel::Debug.to_filter_string(), "debug");
        assert_eq!(LogLevel::Trace.to_filter_string(), "trace");
    }

    #[test]
    fn test_parse_analysis_flags() {
        let cli = Cli::try_parse_from([
            "macrolens", "macros", "log.txt", "--dedup", "--window", "2s", "-s", "A", "-s", "B",
            "--from", "2024-01-01", "--json",
        ])
        .unwrap();

        assert_eq!(cli.effective_output(), OutputFormat::Json);
        let Commands::Macros(args) = cli.command else {
            panic!("expected macros command");
        };
        assert_eq!(args.analysis.dedup_override(), Some(true));
        assert_eq!(args.analysis.window.as_deref(), Some("2s"));
        assert_eq!(args.analysis.select, vec!["A", "B"]);
        assert_eq!(args.sort, MacroSort::Count);
    }

    #[test]
    fn test_last_dedup_flag_wins() {
        let cli =
            Cli::try_parse_from(["macrolens", "report", "-", "--dedup", "--no-dedup"]).unwrap();
        let Commands::Report(args) = cli.command else {
            panic!("expected report command");
        };
        assert_eq!(args.analysis.dedup_override(), Some(false));
    }
}
