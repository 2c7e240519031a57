//! Collapsing of rapid repeat executions.
//!
//! Some triggers fire a macro several times for one user action (key repeat,
//! a device that reports twice). [`deduplicate`] folds those bursts into a
//! single execution using a greedy scan over time-ordered entries.

use serde::Serialize;
use tracing::debug;

use crate::model::LogEntry;

/// Counts from a deduplication pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DedupStats {
    /// Entries before deduplication.
    pub input: usize,
    /// Entries kept.
    pub kept: usize,
    /// Entries dropped as repeats.
    pub removed: usize,
}

/// Drop executions that repeat the previously kept macro within `window_ms`.
///
/// The first entry is always kept. Every later entry is compared with the last
/// *kept* entry only: it survives if the macro name differs or at least
/// `window_ms` milliseconds have passed. Interleaved executions (A, B, A) are
/// therefore never merged, however close together they are.
///
/// `entries` must be sorted ascending by timestamp.
pub fn deduplicate(entries: &[LogEntry], window_ms: u64) -> Vec<LogEntry> {
    deduplicate_with_stats(entries, window_ms).0
}

/// Same as [`deduplicate`], also reporting how many entries were dropped.
pub fn deduplicate_with_stats(entries: &[LogEntry], window_ms: u64) -> (Vec<LogEntry>, DedupStats) {
    let mut kept: Vec<LogEntry> = Vec::with_capacity(entries.len());

    for entry in entries {
        let keep = match kept.last() {
            None => true,
            Some(last) => {
                entry.macro_name != last.macro_name || elapsed_ms(last, entry) >= window_ms
            }
        };
        if keep {
            kept.push(entry.clone());
        }
    }

    let stats = DedupStats {
        input: entries.len(),
        kept: kept.len(),
        removed: entries.len() - kept.len(),
    };
    debug!(
        window_ms,
        input = stats.input,
        removed = stats.removed,
        "Deduplication complete"
    );
    (kept, stats)
}

/// Milliseconds from `earlier` to `later`; negative gaps count as zero.
fn elapsed_ms(earlier: &LogEntry, later: &LogEntry) -> u64 {
    let delta = later.timestamp - earlier.timestamp;
    u64::try_from(delta.num_milliseconds()).unwrap_or(0)
}
