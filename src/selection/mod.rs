//! Narrowing derived views to a user-chosen subset of macros.
//!
//! The filtering policy is deliberately asymmetric:
//! - An empty selection over a non-empty source yields nothing ("nothing
//!   selected" is a real state, distinct from "no data loaded")
//! - A selection as large as the source's set of names returns the source
//!   untouched (checked by size only)
//! - Anything else keeps the items whose macro name is selected
//!
//! The filter never resets the selection itself. Whoever owns the
//! [`SelectionSet`] resets it when the universe of names changes; see
//! [`crate::api::MacroAnalyzer`].

use std::collections::HashSet;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::model::{LogEntry, MacroStatEntry};

/// Items that belong to a macro.
pub trait MacroNamed {
    /// Name of the macro this item belongs to.
    fn macro_name(&self) -> &str;
}

impl MacroNamed for LogEntry {
    fn macro_name(&self) -> &str {
        &self.macro_name
    }
}

impl MacroNamed for MacroStatEntry {
    fn macro_name(&self) -> &str {
        &self.name
    }
}

/// Macro names currently included in analysis, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionSet {
    names: IndexSet<String>,
}

impl SelectionSet {
    /// An empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A selection holding every given name.
    pub fn all_of<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Add a name. Returns `true` if it was not already selected.
    pub fn select(&mut self, name: impl Into<String>) -> bool {
        self.names.insert(name.into())
    }

    /// Remove a name. Returns `true` if it was selected.
    pub fn deselect(&mut self, name: &str) -> bool {
        self.names.shift_remove(name)
    }

    /// Flip a name's membership. Returns the new state.
    pub fn toggle(&mut self, name: &str) -> bool {
        if self.deselect(name) {
            false
        } else {
            self.select(name)
        }
    }

    /// Replace the selection with every name in `universe`.
    pub fn select_all<I, S>(&mut self, universe: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        *self = Self::all_of(universe);
    }

    /// Deselect everything.
    pub fn clear(&mut self) {
        self.names.clear();
    }

    /// Whether `name` is selected.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Number of selected names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Selected names in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for SelectionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::all_of(iter)
    }
}

/// Reduce `items` to the selected macros under the policy described above.
pub fn filter_by_selection<T>(items: &[T], selected: &SelectionSet) -> Vec<T>
where
    T: MacroNamed + Clone,
{
    if items.is_empty() || selected.is_empty() {
        return Vec::new();
    }

    let universe: HashSet<&str> = items.iter().map(MacroNamed::macro_name).collect();
    if selected.len() == universe.len() {
        return items.to_vec();
    }

    items
        .iter()
        .filter(|item| selected.contains(item.macro_name()))
        .cloned()
        .collect()
}

/// Entries belonging to selected macros.
pub fn filter_entries(entries: &[LogEntry], selected: &SelectionSet) -> Vec<LogEntry> {
    filter_by_selection(entries, selected)
}

/// Statistics rows belonging to selected macros.
pub fn filter_stats(stats: &[MacroStatEntry], selected: &SelectionSet) -> Vec<MacroStatEntry> {
    filter_by_selection(stats, selected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    use crate::analytics::aggregate_macro_stats;

    fn entries(names: &[&str]) -> Vec<LogEntry> {
        let ts = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        names.iter().map(|n| LogEntry::new(ts, *n, "t", "")).collect()
    }

    fn names_of(entries: &[LogEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.macro_name.as_str()).collect()
    }

    #[test]
    fn test_empty_selection_over_data_is_empty() {
        let source = entries(&["A", "B"]);
        assert!(filter_entries(&source, &SelectionSet::new()).is_empty());
    }

    #[test]
    fn test_empty_source_is_empty() {
        let selected = SelectionSet::all_of(["A"]);
        assert!(filter_entries(&[], &selected).is_empty());
        assert!(filter_entries(&[], &SelectionSet::new()).is_empty());
    }

    #[test]
    fn test_full_selection_returns_source_unchanged() {
        let source = entries(&["B", "A", "B", "C"]);
        let selected = SelectionSet::all_of(["A", "B", "C"]);
        assert_eq!(filter_entries(&source, &selected), source);
    }

    #[test]
    fn test_size_match_short_circuits() {
        // same size as the universe but different names: the fast path wins
        let source = entries(&["A", "B"]);
        let selected = SelectionSet::all_of(["A", "Z"]);
        assert_eq!(filter_entries(&source, &selected), source);
    }

    #[test]
    fn test_subset_selection() {
        let source = entries(&["A", "B", "A", "C"]);
        let selected = SelectionSet::all_of(["A", "C"]);
        assert_eq!(names_of(&filter_entries(&source, &selected)), vec!["A", "A", "C"]);
    }

    #[test]
    fn test_filter_stats() {
        let stats = aggregate_macro_stats(&entries(&["A", "B", "B", "C"]));
        let selected = SelectionSet::all_of(["B"]);
        let filtered = filter_stats(&stats, &selected);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "B");

        assert!(filter_stats(&stats, &SelectionSet::new()).is_empty());
        assert_eq!(filter_stats(&stats, &SelectionSet::all_of(["A", "B", "C"])), stats);
    }

    #[test]
    fn test_selection_mutations() {
        let mut selection = SelectionSet::all_of(["A", "B"]);
        assert!(!selection.select("A"));
        assert!(selection.deselect("A"));
        assert!(!selection.contains("A"));
        assert!(selection.toggle("A"));
        assert!(!selection.toggle("B"));
        assert_eq!(selection.iter().collect::<Vec<_>>(), vec!["A"]);

        selection.select_all(["X", "Y", "Z"]);
        assert_eq!(selection.len(), 3);
        selection.clear();
        assert!(selection.is_empty());
    }

    #[test]
    fn test_serializes_as_list() {
        let selection: SelectionSet = ["A", "B"].into_iter().collect();
        assert_eq!(serde_json::to_string(&selection).unwrap(), r#"["A","B"]"#);
    }
}
