//! Data model for macro execution logs.
//!
//! [`LogEntry`] is the only record the parser produces. Everything in
//! [`stats`] is derived from a sequence of entries and is recomputed from
//! scratch whenever that sequence changes.

pub mod entry;
pub mod stats;

pub use entry::*;
pub use stats::*;

/// Timestamp layout used by the execution log (`YYYY-MM-DD HH:MM:SS`).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Calendar date layout used for daily buckets and date-range input.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
