//! The parsed macro execution record.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use super::TIMESTAMP_FORMAT;

/// One macro execution parsed from the log.
///
/// Timestamps are local wall-clock times exactly as written in the log;
/// no timezone conversion is applied anywhere in the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// When the macro ran, second resolution.
    pub timestamp: NaiveDateTime,
    /// Macro name, never empty.
    pub macro_name: String,
    /// Free-text description of what fired the macro.
    pub trigger: String,
    /// Original source line, kept for diagnostics.
    pub raw: String,
}

impl LogEntry {
    /// Create a new entry.
    #[must_use]
    pub fn new(
        timestamp: NaiveDateTime,
        macro_name: impl Into<String>,
        trigger: impl Into<String>,
        raw: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            macro_name: macro_name.into(),
            trigger: trigger.into(),
            raw: raw.into(),
        }
    }

    /// Calendar date of the execution.
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    /// Hour of day, 0-23.
    #[must_use]
    pub fn hour(&self) -> u32 {
        self.timestamp.hour()
    }

    /// Day of week.
    #[must_use]
    pub fn weekday(&self) -> Weekday {
        self.timestamp.weekday()
    }

    /// Render the entry back into the log grammar.
    ///
    /// Only the documented fields survive, so this is not a byte-exact copy of `raw`.
    #[must_use]
    pub fn to_log_line(&self) -> String {
        format!(
            "{} Execute macro \"{}\" from trigger {}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.macro_name,
            self.trigger
        )
    }
}
