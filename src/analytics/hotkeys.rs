//! Keyboard usage from hotkey triggers.
//!
//! Only triggers of the form `Hot Key <combination> is pressed` count. A
//! combination is a run of modifier symbols (`⌘ ⌥ ⌃ ⇧`) followed by at most
//! one key token, e.g. `⌘⇧T` or `⌃⌥Space`.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{HotkeyAnalysis, LogEntry, Modifier};

static HOTKEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Hot Key (.+) is pressed").expect("valid regex"));

/// The combination part of a hotkey trigger, if the trigger is one.
pub fn hotkey_combination(trigger: &str) -> Option<&str> {
    HOTKEY_RE
        .captures(trigger)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Split a combination into its modifiers and the residual key, if any.
///
/// The residual key is trimmed and upper-cased, so whitespace alone is no
/// key. Modifiers are reported once each, in [`Modifier::ALL`] order.
pub fn split_combination(combination: &str) -> (Vec<Modifier>, Option<String>) {
    let mut working = combination.to_string();
    let mut modifiers = Vec::new();

    for modifier in Modifier::ALL {
        if working.contains(modifier.symbol()) {
            modifiers.push(modifier);
            working = working.replace(modifier.symbol(), "");
        }
    }

    let rest = working.trim();
    let key = (!rest.is_empty()).then(|| rest.to_uppercase());
    (modifiers, key)
}

/// Count keys, modifiers, and full combinations across hotkey triggers.
pub fn aggregate_hotkey_stats(entries: &[LogEntry]) -> HotkeyAnalysis {
    let mut analysis = HotkeyAnalysis::default();

    for combination in entries.iter().filter_map(|e| hotkey_combination(&e.trigger)) {
        analysis.hotkey_executions += 1;
        *analysis
            .combination_stats
            .entry(combination.to_string())
            .or_insert(0) += 1;

        let (modifiers, key) = split_combination(combination);
        for modifier in modifiers {
            *analysis.modifier_stats.entry(modifier).or_insert(0) += 1;
        }
        if let Some(key) = key {
            *analysis.key_stats.entry(key).or_insert(0) += 1;
        }
    }

    // IndexMap::sort_by is stable, so ties keep first-seen order
    analysis.key_stats.sort_by(|_, a, _, b| b.cmp(a));
    analysis.combination_stats.sort_by(|_, a, _, b| b.cmp(a));
    analysis
}

/// Log-scaled heatmap intensity of a key.
///
/// `ln(count + 1) / ln(max_count + 1)`, where `max_count` is floored at 1.
/// Log compression keeps one dominant key from washing out the rest.
#[must_use]
pub fn key_intensity(count: usize, max_count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    let max = max_count.max(1) as f64;
    ((count as f64) + 1.0).ln() / (max + 1.0).ln()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn hotkey(trigger: &str) -> LogEntry {
        let ts = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        LogEntry::new(ts, "M", trigger, "")
    }

    #[test]
    fn test_cmd_shift_t() {
        let analysis = aggregate_hotkey_stats(&[hotkey("Hot Key ⌘⇧T is pressed")]);

        assert_eq!(analysis.modifier_stats.len(), 2);
        assert_eq!(analysis.modifier_stats[&Modifier::Cmd], 1);
        assert_eq!(analysis.modifier_stats[&Modifier::Shift], 1);
        assert_eq!(analysis.key_stats.len(), 1);
        assert_eq!(analysis.key_stats["T"], 1);
        assert_eq!(analysis.combination_stats["⌘⇧T"], 1);
        assert_eq!(analysis.hotkey_executions, 1);
    }

    #[test]
    fn test_modifier_only_combination() {
        let analysis = aggregate_hotkey_stats(&[hotkey("Hot Key ⌃⌥ is pressed")]);
        assert!(analysis.key_stats.is_empty());
        assert_eq!(analysis.modifier_stats[&Modifier::Ctrl], 1);
        assert_eq!(analysis.modifier_stats[&Modifier::Option], 1);
        assert_eq!(analysis.combination_stats["⌃⌥"], 1);
    }

    #[test]
    fn test_non_hotkey_triggers_are_ignored() {
        let analysis = aggregate_hotkey_stats(&[
            hotkey("Typed String Trigger"),
            hotkey("hot key ⌘A is pressed"),
            hotkey("Periodic Trigger"),
        ]);
        assert!(analysis.is_empty());
        assert!(analysis.combination_stats.is_empty());
    }

    #[test]
    fn test_keys_are_uppercased_and_ranked() {
        let analysis = aggregate_hotkey_stats(&[
            hotkey("Hot Key ⌘a is pressed"),
            hotkey("Hot Key ⌘B is pressed"),
            hotkey("Hot Key ⌥b is pressed"),
            hotkey("Hot Key ⌘A is pressed"),
            hotkey("Hot Key ⌃b is pressed"),
        ]);
        let keys: Vec<_> = analysis.key_stats.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        assert_eq!(keys, vec![("B", 3), ("A", 2)]);
        // every combination seen once, first-seen order kept
        let combos: Vec<_> = analysis.combination_stats.keys().map(String::as_str).collect();
        assert_eq!(combos, vec!["⌘a", "⌘B", "⌥b", "⌘A", "⌃b"]);
    }

    #[rstest]
    #[case("⌘Space", vec![Modifier::Cmd], Some("SPACE"))]
    #[case("⇧⌘F1", vec![Modifier::Cmd, Modifier::Shift], Some("F1"))]
    #[case("⌘⌥⌃⇧", vec![Modifier::Cmd, Modifier::Option, Modifier::Ctrl, Modifier::Shift], None)]
    #[case("K", vec![], Some("K"))]
    #[case("⌘ ", vec![Modifier::Cmd], None)]
    fn test_split_combination(
        #[case] combination: &str,
        #[case] modifiers: Vec<Modifier>,
        #[case] key: Option<&str>,
    ) {
        let (found, residual) = split_combination(combination);
        assert_eq!(found, modifiers);
        assert_eq!(residual.as_deref(), key);
    }

    #[test]
    fn test_key_intensity() {
        assert!(key_intensity(0, 10).abs() < f64::EPSILON);
        assert!((key_intensity(10, 10) - 1.0).abs() < 1e-12);
        assert!((key_intensity(1, 0) - 1.0).abs() < 1e-12);

        let low = key_intensity(1, 100);
        assert!(low > 0.1 && low < 0.2, "log scaling keeps small counts visible: {low}");
    }

    #[test]
    fn test_analysis_intensities() {
        let analysis = aggregate_hotkey_stats(&[
            hotkey("Hot Key ⌘A is pressed"),
            hotkey("Hot Key ⌘A is pressed"),
            hotkey("Hot Key ⌘B is pressed"),
        ]);
        let intensities = analysis.intensities();
        assert_eq!(intensities[0].0, "A");
        assert!((intensities[0].1 - 1.0).abs() < 1e-12);
        assert!((analysis.intensity("b") - 2f64.ln() / 3f64.ln()).abs() < 1e-12);
        assert!(analysis.intensity("Z").abs() < f64::EPSILON);
    }
}
