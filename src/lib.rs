//! macrolens: usage statistics for macro-automation execution logs.
//!
//! A macro engine writes one line per execution:
//!
//! ```text
//! 2024-01-01 09:00:00 Execute macro "Open Mail" from trigger Hot Key ⌘M is pressed
//! ```
//!
//! This crate turns such a log into per-macro usage tables, keyboard
//! (hotkey) frequency, and time-of-day / per-date / weekday activity.
//!
//! # Features
//!
//! - **Lenient parsing**: unrelated lines are ignored, malformed ones counted and sampled
//! - **Deduplication**: collapse bursts of the same macro inside a time window
//! - **Selection**: narrow every view to a chosen subset of macros
//! - **Export**: JSON reports and CSV tables for spreadsheets
//!
//! # Quick Start (High-Level API)
//!
//! ```rust
//! use macrolens::api::MacroAnalyzer;
//!
//! fn main() -> macrolens::Result<()> {
//!     let log = "2024-01-01 09:00:00 Execute macro \"Open Mail\" from trigger Hot Key ⌘M is pressed";
//!     let analyzer = MacroAnalyzer::from_text(log, 0)?;
//!
//!     let summary = analyzer.summary();
//!     assert_eq!(summary.top_macro.as_deref(), Some("Open Mail"));
//!     assert_eq!(analyzer.hotkeys().key_count("m"), 1);
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`api`]: [`MacroAnalyzer`](api::MacroAnalyzer), which runs the pipeline and owns the selection
//! - [`parser`]: Log text to time-ordered [`LogEntry`] values
//! - [`dedup`]: Collapsing of rapid repeat executions
//! - [`analytics`]: Per-macro, hotkey, and time-bucket aggregation
//! - [`selection`]: Narrowing views to selected macros
//! - [`options`]: Analysis options and lenient parsing of user input
//! - [`model`]: Data structures shared by all of the above
//! - [`export`]: JSON and CSV output
//! - [`cli`]: Command-line interface
//! - [`config`]: Configuration management
//! - [`error`]: Error types and handling
//!
//! # Low-Level Example
//!
//! Every stage is also a plain function over slices:
//!
//! ```rust
//! use macrolens::analytics::{aggregate_macro_stats, aggregate_time_buckets};
//! use macrolens::dedup::deduplicate;
//! use macrolens::parser::parse;
//!
//! let entries = parse(
//!     "2024-01-01 09:00:00 Execute macro \"A\" from trigger Hot Key ⌘Space is pressed\n\
//!      2024-01-01 09:00:01 Execute macro \"A\" from trigger Hot Key ⌘Space is pressed",
//! );
//! assert_eq!(deduplicate(&entries, 2000).len(), 1);
//! assert_eq!(deduplicate(&entries, 500).len(), 2);
//!
//! let stats = aggregate_macro_stats(&entries);
//! assert_eq!(stats[0].avg_per_day, "2.0");
//! assert_eq!(aggregate_time_buckets(&entries).hourly[9].count, 2);
//! ```

#![doc(html_root_url = "https://docs.rs/macrolens/0.1.0")]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod analytics;
pub mod api;
pub mod cli;
pub mod config;
pub mod dedup;
pub mod error;
pub mod export;
pub mod model;
pub mod options;
pub mod parser;
pub mod selection;
pub mod util;

// Re-export commonly used types at the crate root
pub use error::{MacroLensError, Result};
pub use model::{LogEntry, MacroStatEntry};
pub use options::{AnalysisOptions, DateRange};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::analytics::{
        aggregate_hotkey_stats, aggregate_macro_stats, aggregate_time_buckets, AnalysisSummary,
    };
    pub use crate::api::{AnalysisReport, MacroAnalyzer};
    pub use crate::dedup::deduplicate;
    pub use crate::error::{MacroLensError, Result};
    pub use crate::model::{HotkeyAnalysis, LogEntry, MacroStatEntry, TimeBucketSeries};
    pub use crate::options::{AnalysisOptions, DateRange};
    pub use crate::parser::{parse, LineParser};
    pub use crate::selection::{filter_entries, filter_stats, SelectionSet};
}
