//! Line-oriented parsing of macro execution logs.
//!
//! Each log line of interest looks like:
//!
//! ```text
//! 2024-01-01 09:00:00 Execute macro "Open Mail" from trigger Hot Key ⌘M is pressed
//! ```
//!
//! Parsing is always lenient:
//! - Lines without `Execute macro` are ignored outright
//! - Lines with the marker that fail extraction are dropped and counted
//! - A handful of dropped lines are kept as samples for debugging
//!
//! # Example
//!
//! ```rust
//! use macrolens::parser::LineParser;
//!
//! let log = "2024-01-01 09:00:00 Execute macro \"A\" from trigger Hot Key ⌘Space is pressed\n\
//!            some unrelated engine chatter";
//!
//! let mut parser = LineParser::new();
//! let entries = parser.parse(log);
//! assert_eq!(entries.len(), 1);
//! assert_eq!(parser.stats().ignored_lines, 1);
//! ```

use std::borrow::Cow;

use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, instrument, trace};

use crate::model::{LogEntry, TIMESTAMP_FORMAT};
use crate::util::split_universal_lines;

/// Substring a line must contain to be considered at all.
pub const EXECUTE_MARKER: &str = "Execute macro";

/// Number of malformed lines kept as samples.
pub const MAX_UNMATCHED_SAMPLES: usize = 5;

/// Preview length for sampled lines.
const PREVIEW_LEN: usize = 120;

static TIMESTAMP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2})").expect("valid regex"));

static MACRO_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"Execute macro "([^"]*)""#).expect("valid regex"));

static TRIGGER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"from trigger (.*)$").expect("valid regex"));

/// Why a marked line could not be turned into an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineRejection {
    /// No `YYYY-MM-DD HH:MM:SS` at the start of the line.
    #[error("missing leading timestamp")]
    MissingTimestamp,
    /// Timestamp had the right shape but is not a real date/time.
    #[error("timestamp is not a valid date/time")]
    InvalidTimestamp,
    /// No quoted name after `Execute macro `.
    #[error("missing quoted macro name")]
    MissingMacroName,
    /// Quoted name was blank.
    #[error("macro name is empty")]
    EmptyMacroName,
    /// No `from trigger ` clause.
    #[error("missing trigger clause")]
    MissingTrigger,
}

/// A marked line that was dropped, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnmatchedLine {
    /// 1-indexed line number in the input.
    pub line: usize,
    /// Why the line was dropped.
    pub reason: LineRejection,
    /// Line content (truncated).
    pub content_preview: String,
}

/// Statistics about a parse run.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseStats {
    /// Non-empty lines examined.
    pub lines_processed: usize,
    /// Lines that were blank after trimming.
    pub empty_lines: usize,
    /// Lines without the execute marker.
    pub ignored_lines: usize,
    /// Entries produced.
    pub entries_parsed: usize,
    /// Marked lines that failed extraction.
    pub lines_skipped: usize,
    /// First few malformed lines.
    pub samples: Vec<UnmatchedLine>,
}

impl ParseStats {
    /// Share of marked lines that produced an entry, as a percentage.
    #[must_use]
    pub fn success_rate(&self) -> f64 {
        let marked = self.entries_parsed + self.lines_skipped;
        if marked == 0 {
            return 100.0;
        }
        (self.entries_parsed as f64 / marked as f64) * 100.0
    }
}

/// Parser for macro execution logs.
#[derive(Debug)]
pub struct LineParser {
    /// How many malformed lines to keep as samples.
    sample_limit: usize,
    /// Statistics about the last parse.
    stats: ParseStats,
}

impl LineParser {
    /// Create a new parser with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sample_limit: MAX_UNMATCHED_SAMPLES,
            stats: ParseStats::default(),
        }
    }

    /// Set how many malformed lines are sampled (0 disables sampling).
    #[must_use]
    pub fn with_sample_limit(mut self, limit: usize) -> Self {
        self.sample_limit = limit;
        self
    }

    /// Statistics from the most recent [`Self::parse`] call.
    #[must_use]
    pub fn stats(&self) -> &ParseStats {
        &self.stats
    }

    /// Parse raw log text into entries sorted ascending by timestamp.
    ///
    /// Never fails: malformed lines are skipped and recorded in [`Self::stats`].
    /// Entries sharing a timestamp keep their input order.
    #[instrument(skip(self, text), fields(bytes = text.len()), level = "debug")]
    pub fn parse(&mut self, text: &str) -> Vec<LogEntry> {
        self.stats = ParseStats::default();
        let normalized = normalize_quotes(text);
        let mut entries = Vec::new();

        for (idx, line) in split_universal_lines(&normalized).enumerate() {
            let line_num = idx + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                self.stats.empty_lines += 1;
                continue;
            }
            self.stats.lines_processed += 1;

            if !trimmed.contains(EXECUTE_MARKER) {
                self.stats.ignored_lines += 1;
                continue;
            }

            match parse_line(line) {
                Ok(entry) => {
                    self.stats.entries_parsed += 1;
                    entries.push(entry);
                }
                Err(reason) => {
                    self.stats.lines_skipped += 1;
                    trace!(line = line_num, %reason, "Skipping malformed line");
                    if self.stats.samples.len() < self.sample_limit {
                        self.stats.samples.push(UnmatchedLine {
                            line: line_num,
                            reason,
                            content_preview: truncate_preview(trimmed, PREVIEW_LEN),
                        });
                    }
                }
            }
        }

        // sort_by_key is stable, so equal timestamps keep input order
        entries.sort_by_key(|e| e.timestamp);

        debug!(
            entries = entries.len(),
            lines = self.stats.lines_processed,
            ignored = self.stats.ignored_lines,
            skipped = self.stats.lines_skipped,
            "Parsing complete"
        );
        entries
    }
}

impl Default for LineParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse raw log text with default settings.
pub fn parse(text: &str) -> Vec<LogEntry> {
    LineParser::new().parse(text)
}

/// Extract an entry from a single line that already has smart quotes normalized.
///
/// Surrounding whitespace is ignored for matching; `raw` keeps the line as given.
pub fn parse_line(line: &str) -> Result<LogEntry, LineRejection> {
    let text = line.trim();
    let timestamp = TIMESTAMP_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .ok_or(LineRejection::MissingTimestamp)?;
    let timestamp = NaiveDateTime::parse_from_str(timestamp.as_str().trim(), TIMESTAMP_FORMAT)
        .map_err(|_| LineRejection::InvalidTimestamp)?;

    let macro_name = MACRO_NAME_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .ok_or(LineRejection::MissingMacroName)?
        .as_str()
        .trim();
    if macro_name.is_empty() {
        return Err(LineRejection::EmptyMacroName);
    }

    let trigger = TRIGGER_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .ok_or(LineRejection::MissingTrigger)?
        .as_str()
        .trim();

    Ok(LogEntry::new(timestamp, macro_name, trigger, line))
}

/// Replace curly double quotes with straight ones.
fn normalize_quotes(text: &str) -> Cow<'_, str> {
    if text.contains(['\u{201C}', '\u{201D}']) {
        Cow::Owned(text.replace(['\u{201C}', '\u{201D}'], "\""))
    } else {
        Cow::Borrowed(text)
    }
}

/// Truncate a string for preview display.
///
/// Uses character-aware truncation to avoid panicking on multi-byte UTF-8 characters.
fn truncate_preview(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        let mut end = max_len;
        while end > 0 && !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &s[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    const LINE: &str =
        "2024-01-01 09:00:00 Execute macro \"A\" from trigger Hot Key ⌘Space is pressed";

    #[test]
    fn test_parse_empty() {
        let mut parser = LineParser::new();
        assert!(parser.parse("").is_empty());
        assert_eq!(parser.stats().lines_processed, 0);
    }

    #[test]
    fn test_parse_single_line() {
        let entries = parse(LINE);
        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry.macro_name, "A");
        assert_eq!(entry.trigger, "Hot Key ⌘Space is pressed");
        assert_eq!(entry.timestamp.to_string(), "2024-01-01 09:00:00");
        assert_eq!(entry.raw, LINE);
    }

    #[test]
    fn test_smart_quotes_are_normalized() {
        let line = "2024-01-01 09:00:00 Execute macro \u{201C}Smart\u{201D} from trigger Typed String";
        let entries = parse(line);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].macro_name, "Smart");
        assert_eq!(entries[0].trigger, "Typed String");
    }

    #[test]
    fn test_unmarked_lines_are_ignored_not_skipped() {
        let text = format!("Engine started\n{LINE}\nAnother status line");
        let mut parser = LineParser::new();
        let entries = parser.parse(&text);

        assert_eq!(entries.len(), 1);
        assert_eq!(parser.stats().ignored_lines, 2);
        assert_eq!(parser.stats().lines_skipped, 0);
        assert!(parser.stats().samples.is_empty());
    }

    #[rstest]
    #[case("Execute macro \"A\" from trigger x", LineRejection::MissingTimestamp)]
    #[case("2024-13-45 09:00:00 Execute macro \"A\" from trigger x", LineRejection::InvalidTimestamp)]
    #[case("2024-01-01 09:00:00 Execute macro A from trigger x", LineRejection::MissingMacroName)]
    #[case("2024-01-01 09:00:00 Execute macro \"  \" from trigger x", LineRejection::EmptyMacroName)]
    #[case("2024-01-01 09:00:00 Execute macro \"A\"", LineRejection::MissingTrigger)]
    fn test_line_rejections(#[case] line: &str, #[case] expected: LineRejection) {
        assert_eq!(parse_line(line), Err(expected));
    }

    #[test]
    fn test_malformed_lines_are_sampled_up_to_limit() {
        let bad = "Execute macro \"A\" from trigger x";
        let text = std::iter::repeat(bad).take(8).collect::<Vec<_>>().join("\n");
        let mut parser = LineParser::new();
        let entries = parser.parse(&text);

        assert!(entries.is_empty());
        assert_eq!(parser.stats().lines_skipped, 8);
        assert_eq!(parser.stats().samples.len(), MAX_UNMATCHED_SAMPLES);
        assert_eq!(parser.stats().samples[0].line, 1);
        assert_eq!(parser.stats().samples[0].reason, LineRejection::MissingTimestamp);
    }

    #[test]
    fn test_output_sorted_and_stable() {
        let text = "\
2024-01-02 10:00:00 Execute macro \"Late\" from trigger x
2024-01-01 10:00:00 Execute macro \"First\" from trigger x
2024-01-01 10:00:00 Execute macro \"Second\" from trigger x";
        let names: Vec<_> = parse(text).into_iter().map(|e| e.macro_name).collect();
        assert_eq!(names, vec!["First", "Second", "Late"]);
    }

    #[test]
    fn test_universal_newlines() {
        let text = format!("{LINE}\r\n{LINE}\r{LINE}\n\n   \n");
        let mut parser = LineParser::new();
        assert_eq!(parser.parse(&text).len(), 3);
        assert_eq!(parser.stats().empty_lines, 3);
    }

    #[test]
    fn test_fields_are_trimmed() {
        let line = "  2024-01-01 09:00:00 Execute macro \" Spaced \" from trigger   Periodic Trigger   ";
        let entries = parse(line);
        assert_eq!(entries[0].macro_name, "Spaced");
        assert_eq!(entries[0].trigger, "Periodic Trigger");
    }

    #[test]
    fn test_first_quoted_string_is_the_name() {
        let line = "2024-01-01 09:00:00 Execute macro \"A\" from trigger Macro \"B\" finished";
        let entries = parse(line);
        assert_eq!(entries[0].macro_name, "A");
        assert_eq!(entries[0].trigger, "Macro \"B\" finished");
    }

    #[test]
    fn test_success_rate() {
        let text = format!("{LINE}\nExecute macro \"A\" from trigger x");
        let mut parser = LineParser::new();
        parser.parse(&text);
        assert!((parser.stats().success_rate() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_truncate_preview_multibyte() {
        let s = "⌘".repeat(50);
        let preview = truncate_preview(&s, 10);
        assert!(preview.ends_with("..."));
        assert!(preview.len() <= 13);
    }
}
