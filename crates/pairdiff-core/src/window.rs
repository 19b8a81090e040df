//! Context window selection over an edit script

use crate::script::EditScript;
use std::ops::RangeInclusive;

/// Inclusive index ranges covering every change plus `context` lines on each
/// side, with overlapping or touching ranges merged. Ascending, disjoint.
pub fn context_ranges(script: &EditScript, context: usize) -> Vec<RangeInclusive<usize>> {
    let Some(last) = script.len().checked_sub(1) else {
        return Vec::new();
    };

    let mut ranges: Vec<RangeInclusive<usize>> = Vec::new();
    for idx in script.changed_indices() {
        let start = idx.saturating_sub(context);
        let end = idx.saturating_add(context).min(last);

        match ranges.last_mut() {
            // Changed indices ascend, so only the newest range can overlap
            Some(prev) if start <= prev.end().saturating_add(1) => {
                *prev = *prev.start()..=end.max(*prev.end());
            }
            _ => ranges.push(start..=end),
        }
    }
    ranges
}

/// Sorted, deduplicated indices to keep for display.
///
/// Empty when the script has no removed or added lines.
pub fn context_window(script: &EditScript, context: usize) -> Vec<usize> {
    context_ranges(script, context)
        .into_iter()
        .flatten()
        .collect()
}
