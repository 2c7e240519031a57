//! High-level programmatic API for macrolens.
//!
//! [`MacroAnalyzer`] ties the pipeline together: it parses a log once, then
//! re-derives every view whenever the options or the macro selection change.
//!
//! # Quick Start
//!
//! ```rust
//! use macrolens::api::MacroAnalyzer;
//! use macrolens::AnalysisOptions;
//!
//! fn main() -> macrolens::Result<()> {
//!     let log = "\
//! 2024-01-01 09:00:00 Execute macro \"Open Mail\" from trigger Hot Key ⌘M is pressed
//! 2024-01-01 09:00:00 Execute macro \"Open Mail\" from trigger Hot Key ⌘M is pressed
//! 2024-01-02 17:30:00 Execute macro \"Lock Screen\" from trigger Hot Key ⌃⌘Q is pressed";
//!
//!     let mut analyzer = MacroAnalyzer::from_text(log, 0)?;
//!     assert_eq!(analyzer.macro_stats()[0].count, 2);
//!
//!     analyzer.set_options(AnalysisOptions::default().with_deduplicate(true));
//!     assert_eq!(analyzer.macro_stats()[0].count, 1);
//!
//!     analyzer.select_only(["Lock Screen"]);
//!     assert_eq!(analyzer.summary().total_executions, 1);
//!     Ok(())
//! }
//! ```
//!
//! # Selection lifecycle
//!
//! The selection is reset to every macro name in the freshly computed
//! statistics each time they are recomputed (new text, new options). Between
//! recomputations only the explicit selection methods change it.

use indexmap::IndexSet;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::analytics::{
    aggregate_hotkey_stats, aggregate_macro_stats, aggregate_time_buckets, summarize,
    AnalysisSummary,
};
use crate::dedup::{deduplicate_with_stats, DedupStats};
use crate::error::{MacroLensError, Result};
use crate::model::{HotkeyAnalysis, LogEntry, MacroStatEntry, TimeBucketSeries};
use crate::options::AnalysisOptions;
use crate::parser::{LineParser, ParseStats};
use crate::selection::{filter_entries, filter_stats, SelectionSet};
use crate::util::tail_lines;

/// Parsed log plus every view derived from it.
#[derive(Debug, Clone)]
pub struct MacroAnalyzer {
    /// All parsed entries, sorted ascending.
    entries: Vec<LogEntry>,
    /// Counters from the parse.
    parse_stats: ParseStats,
    /// Lines dropped from the front by the line ceiling.
    truncated_lines: usize,
    /// Options the current views were computed with.
    options: AnalysisOptions,
    /// Entries after the date range and optional deduplication.
    analyzed: Vec<LogEntry>,
    /// Counters from the last deduplication, if it ran.
    dedup_stats: Option<DedupStats>,
    /// Per-macro statistics over `analyzed`.
    macro_stats: Vec<MacroStatEntry>,
    /// Macros included in the selected views.
    selection: SelectionSet,
}

/// Everything derived from one analysis, ready for serialization.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    /// Headline figures over the selected macros.
    pub summary: AnalysisSummary,
    /// Options in effect.
    pub options: AnalysisOptions,
    /// Parse counters and malformed-line samples.
    pub parse: ParseStats,
    /// Lines dropped by the line ceiling.
    pub truncated_lines: usize,
    /// Deduplication counters, when deduplication ran.
    pub dedup: Option<DedupStats>,
    /// Selected macro names.
    pub selection: SelectionSet,
    /// Per-macro statistics for the selected macros.
    pub macros: Vec<MacroStatEntry>,
    /// Keyboard usage for the selected macros.
    pub hotkeys: HotkeyAnalysis,
    /// Time buckets for the selected macros.
    pub timeline: TimeBucketSeries,
}

impl MacroAnalyzer {
    /// Parse `text` with default options.
    ///
    /// `max_lines` caps how many lines are read; when exceeded only the most
    /// recent (last) lines are kept. `0` disables the cap.
    ///
    /// # Errors
    ///
    /// Returns [`MacroLensError::NoEntries`] if no line parses.
    pub fn from_text(text: &str, max_lines: usize) -> Result<Self> {
        Self::from_text_with(text, max_lines, AnalysisOptions::default())
    }

    /// Parse `text` and compute views with `options`.
    ///
    /// # Errors
    ///
    /// Returns [`MacroLensError::NoEntries`] if no line parses.
    #[instrument(skip(text, options), fields(bytes = text.len()))]
    pub fn from_text_with(text: &str, max_lines: usize, options: AnalysisOptions) -> Result<Self> {
        let (text, truncated_lines) = tail_lines(text, max_lines);
        if truncated_lines > 0 {
            warn!(
                max_lines,
                dropped = truncated_lines,
                "Log exceeds line limit, keeping the most recent lines"
            );
        }

        let mut parser = LineParser::new();
        let entries = parser.parse(text);
        let parse_stats = parser.stats().clone();

        if entries.is_empty() {
            return Err(MacroLensError::NoEntries {
                lines_processed: parse_stats.lines_processed,
            });
        }

        let mut analyzer = Self::from_entries(entries, options);
        analyzer.parse_stats = parse_stats;
        analyzer.truncated_lines = truncated_lines;
        Ok(analyzer)
    }

    /// Build from already-parsed entries. They are sorted here if needed.
    #[must_use]
    pub fn from_entries(mut entries: Vec<LogEntry>, options: AnalysisOptions) -> Self {
        entries.sort_by_key(|e| e.timestamp);
        let parse_stats = ParseStats {
            entries_parsed: entries.len(),
            ..ParseStats::default()
        };
        let mut analyzer = Self {
            entries,
            parse_stats,
            truncated_lines: 0,
            options,
            analyzed: Vec::new(),
            dedup_stats: None,
            macro_stats: Vec::new(),
            selection: SelectionSet::new(),
        };
        analyzer.recompute();
        analyzer
    }

    /// Re-derive every view from the parsed entries and reset the selection.
    #[instrument(skip(self), level = "debug")]
    fn recompute(&mut self) {
        let in_range = self.options.date_range.apply(&self.entries);

        if self.options.deduplicate {
            let (kept, stats) =
                deduplicate_with_stats(&in_range, self.options.deduplication_window_ms);
            self.analyzed = kept;
            self.dedup_stats = Some(stats);
        } else {
            self.analyzed = in_range;
            self.dedup_stats = None;
        }

        self.macro_stats = aggregate_macro_stats(&self.analyzed);
        self.selection = self.macro_stats.iter().map(|s| s.name.as_str()).collect();

        debug!(
            analyzed = self.analyzed.len(),
            macros = self.macro_stats.len(),
            "Views recomputed"
        );
    }

    // ---- options ----

    /// Options the current views were computed with.
    #[must_use]
    pub fn options(&self) -> &AnalysisOptions {
        &self.options
    }

    /// Replace the options and recompute. Resets the selection.
    pub fn set_options(&mut self, options: AnalysisOptions) {
        self.options = options;
        self.recompute();
    }

    // ---- selection ----

    /// Current selection.
    #[must_use]
    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Whether `name` occurs in the current statistics.
    #[must_use]
    pub fn has_macro(&self, name: &str) -> bool {
        self.macro_stats.iter().any(|s| s.name == name)
    }

    /// Every macro name in the current statistics, ranked by count.
    #[must_use]
    pub fn macro_names(&self) -> IndexSet<&str> {
        self.macro_stats.iter().map(|s| s.name.as_str()).collect()
    }

    /// Add a macro to the selection.
    ///
    /// Names absent from the current statistics are ignored and return `false`.
    pub fn select(&mut self, name: &str) -> bool {
        if !self.has_macro(name) {
            warn!(name, "Unknown macro, not selected");
            return false;
        }
        self.selection.select(name)
    }

    /// Remove a macro from the selection.
    pub fn deselect(&mut self, name: &str) -> bool {
        self.selection.deselect(name)
    }

    /// Flip a macro's membership. Unknown names stay unselected.
    pub fn toggle(&mut self, name: &str) -> bool {
        if self.selection.contains(name) {
            self.selection.deselect(name);
            false
        } else {
            self.select(name)
        }
    }

    /// Select only the given macros.
    pub fn select_only<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.selection.clear();
        for name in names {
            self.select(name.as_ref());
        }
    }

    /// Select every macro in the current statistics.
    pub fn select_all(&mut self) {
        let universe: Vec<String> = self.macro_stats.iter().map(|s| s.name.clone()).collect();
        self.selection.select_all(universe);
    }

    /// Deselect every macro.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // ---- unselected views ----

    /// All parsed entries.
    #[must_use]
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Entries after the date range and deduplication.
    #[must_use]
    pub fn analyzed_entries(&self) -> &[LogEntry] {
        &self.analyzed
    }

    /// Per-macro statistics for every analysed macro.
    #[must_use]
    pub fn macro_stats(&self) -> &[MacroStatEntry] {
        &self.macro_stats
    }

    /// Parse counters.
    #[must_use]
    pub fn parse_stats(&self) -> &ParseStats {
        &self.parse_stats
    }

    /// Lines dropped by the line ceiling.
    #[must_use]
    pub fn truncated_lines(&self) -> usize {
        self.truncated_lines
    }

    /// Deduplication counters, when deduplication is enabled.
    #[must_use]
    pub fn dedup_stats(&self) -> Option<DedupStats> {
        self.dedup_stats
    }

    // ---- selected views ----

    /// Analysed entries of the selected macros.
    #[must_use]
    pub fn selected_entries(&self) -> Vec<LogEntry> {
        filter_entries(&self.analyzed, &self.selection)
    }

    /// Statistics rows of the selected macros.
    #[must_use]
    pub fn selected_stats(&self) -> Vec<MacroStatEntry> {
        filter_stats(&self.macro_stats, &self.selection)
    }

    /// Keyboard usage of the selected macros.
    #[must_use]
    pub fn hotkeys(&self) -> HotkeyAnalysis {
        aggregate_hotkey_stats(&self.selected_entries())
    }

    /// Time buckets of the selected macros.
    #[must_use]
    pub fn time_buckets(&self) -> TimeBucketSeries {
        aggregate_time_buckets(&self.selected_entries())
    }

    /// Headline figures for the selected macros.
    #[must_use]
    pub fn summary(&self) -> AnalysisSummary {
        let entries = self.selected_entries();
        summarize(
            &entries,
            &self.selected_stats(),
            &aggregate_hotkey_stats(&entries),
            &aggregate_time_buckets(&entries),
        )
    }

    /// Snapshot of every selected view.
    #[must_use]
    pub fn report(&self) -> AnalysisReport {
        let entries = self.selected_entries();
        let macros = self.selected_stats();
        let hotkeys = aggregate_hotkey_stats(&entries);
        let timeline = aggregate_time_buckets(&entries);
        let summary = summarize(&entries, &macros, &hotkeys, &timeline);

        AnalysisReport {
            summary,
            options: self.options,
            parse: self.parse_stats.clone(),
            truncated_lines: self.truncated_lines,
            dedup: self.dedup_stats,
            selection: self.selection.clone(),
            macros,
            hotkeys,
            timeline,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use pretty_assertions::assert_eq;

    use crate::model::TIMESTAMP_FORMAT;
    use crate::options::DateRange;

    const LOG: &str = "\
2024-01-01 09:00:00 Execute macro \"A\" from trigger Hot Key ⌘A is pressed
2024-01-01 09:00:00 Execute macro \"A\" from trigger Hot Key ⌘A is pressed
2024-01-01 10:00:00 Execute macro \"B\" from trigger Typed String
2024-01-02 11:00:00 Execute macro \"C\" from trigger Hot Key ⌥C is pressed
engine idle";

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).unwrap()
    }

    #[test]
    fn test_no_entries_is_an_error() {
        let err = MacroAnalyzer::from_text("nothing\nto see", 0).unwrap_err();
        assert!(matches!(err, MacroLensError::NoEntries { lines_processed: 2 }));
    }

    #[test]
    fn test_initial_selection_is_everything() {
        let analyzer = MacroAnalyzer::from_text(LOG, 0).unwrap();
        assert_eq!(analyzer.entries().len(), 4);
        assert_eq!(analyzer.parse_stats().ignored_lines, 1);
        assert_eq!(analyzer.selection().len(), 3);
        assert_eq!(analyzer.selected_entries().len(), 4);
        assert!(analyzer.dedup_stats().is_none());
    }

    #[test]
    fn test_options_change_resets_selection() {
        let mut analyzer = MacroAnalyzer::from_text(LOG, 0).unwrap();
        analyzer.clear_selection();
        assert!(analyzer.selected_stats().is_empty());

        analyzer.set_options(AnalysisOptions::default().with_deduplicate(true));
        assert_eq!(analyzer.selection().len(), 3);
        assert_eq!(analyzer.analyzed_entries().len(), 3);
        assert_eq!(
            analyzer.dedup_stats(),
            Some(DedupStats { input: 4, kept: 3, removed: 1 })
        );
    }

    #[test]
    fn test_date_range_narrows_universe() {
        let mut analyzer = MacroAnalyzer::from_text(LOG, 0).unwrap();
        analyzer.set_options(AnalysisOptions::default().with_date_range(DateRange {
            start: Some(ts("2024-01-02 00:00:00")),
            end: None,
        }));
        assert_eq!(analyzer.macro_names().into_iter().collect::<Vec<_>>(), vec!["C"]);
        assert_eq!(analyzer.selection().len(), 1);
    }

    #[test]
    fn test_range_excluding_everything_is_empty_not_error() {
        let mut analyzer = MacroAnalyzer::from_text(LOG, 0).unwrap();
        analyzer.set_options(AnalysisOptions::default().with_date_range(DateRange {
            start: Some(ts("2030-01-01 00:00:00")),
            end: None,
        }));
        assert!(analyzer.macro_stats().is_empty());
        assert_eq!(analyzer.summary(), AnalysisSummary::default());
    }

    #[test]
    fn test_selected_views_follow_selection() {
        let mut analyzer = MacroAnalyzer::from_text(LOG, 0).unwrap();
        analyzer.select_only(["C", "Nope"]);
        assert_eq!(analyzer.selection().iter().collect::<Vec<_>>(), vec!["C"]);

        let hotkeys = analyzer.hotkeys();
        assert_eq!(hotkeys.hotkey_executions, 1);
        assert_eq!(hotkeys.key_count("c"), 1);
        assert_eq!(analyzer.time_buckets().total(), 1);
        assert_eq!(analyzer.summary().top_macro.as_deref(), Some("C"));
    }

    #[test]
    fn test_toggle_and_select_all() {
        let mut analyzer = MacroAnalyzer::from_text(LOG, 0).unwrap();
        assert!(!analyzer.toggle("A"));
        assert_eq!(analyzer.selected_entries().len(), 2);
        assert!(analyzer.toggle("A"));
        assert!(!analyzer.toggle("Unknown"));
        analyzer.clear_selection();
        analyzer.select_all();
        assert_eq!(analyzer.selected_stats(), analyzer.macro_stats().to_vec());
    }

    #[test]
    fn test_line_ceiling_keeps_tail() {
        let analyzer = MacroAnalyzer::from_text(LOG, 2).unwrap();
        assert_eq!(analyzer.truncated_lines(), 3);
        assert_eq!(analyzer.macro_names().into_iter().collect::<Vec<_>>(), vec!["C"]);
    }

    #[test]
    fn test_line_ceiling_counts_carriage_returns() {
        let log = LOG.replace('\n', "\r");
        let analyzer = MacroAnalyzer::from_text(&log, 2).unwrap();
        assert_eq!(analyzer.truncated_lines(), 3);
        assert_eq!(analyzer.entries().len(), 1);
    }

    #[test]
    fn test_report_serializes() {
        let analyzer = MacroAnalyzer::from_text(LOG, 0).unwrap();
        let json = serde_json::to_value(analyzer.report()).unwrap();
        assert_eq!(json["summary"]["totalExecutions"], 4);
        assert_eq!(json["macros"][0]["name"], "A");
        assert_eq!(json["selection"].as_array().map(Vec::len), Some(3));
    }
}
