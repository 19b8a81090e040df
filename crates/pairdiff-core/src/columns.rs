//! Dual-column projection of retained edit script lines

use crate::script::{EditScript, Origin, TaggedLine};
use serde::Serialize;

/// One side-by-side row: old column, new column and the origin that produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnPair {
    pub old: String,
    pub new: String,
    pub origin: Origin,
    /// 1-based line number in the old file, when the row has old content
    pub old_line: Option<usize>,
    /// 1-based line number in the new file, when the row has new content
    pub new_line: Option<usize>,
}

impl ColumnPair {
    /// Place a tagged line into its owning column(s)
    pub fn from_tagged(line: &TaggedLine) -> Self {
        let (old, new) = match line.origin {
            Origin::Removed => (line.content.clone(), String::new()),
            Origin::Added => (String::new(), line.content.clone()),
            Origin::Kept => (line.content.clone(), line.content.clone()),
        };
        Self {
            old,
            new,
            origin: line.origin,
            old_line: None,
            new_line: None,
        }
    }

    fn with_line_numbers(mut self, old_line: Option<usize>, new_line: Option<usize>) -> Self {
        self.old_line = old_line;
        self.new_line = new_line;
        self
    }
}

/// Old/new line numbers for every entry of the script
fn line_numbers(script: &EditScript) -> Vec<(Option<usize>, Option<usize>)> {
    let mut old_no = 0;
    let mut new_no = 0;
    script
        .lines()
        .iter()
        .map(|line| match line.origin {
            Origin::Kept => {
                old_no += 1;
                new_no += 1;
                (Some(old_no), Some(new_no))
            }
            Origin::Removed => {
                old_no += 1;
                (Some(old_no), None)
            }
            Origin::Added => {
                new_no += 1;
                (None, Some(new_no))
            }
        })
        .collect()
}

/// Project the retained indices (ascending) into column pairs, one per index,
/// in the same order.
pub fn project(script: &EditScript, retained: &[usize]) -> Vec<ColumnPair> {
    let numbers = line_numbers(script);
    retained
        .iter()
        .filter_map(|&idx| {
            debug_assert!(idx < script.len(), "retained index {idx} out of range");
            let line = script.get(idx)?;
            let (old_line, new_line) = numbers[idx];
            Some(ColumnPair::from_tagged(line).with_line_numbers(old_line, new_line))
        })
        .collect()
}
