//! Edit script construction on top of a line diff

use imara_diff::{Algorithm, Diff, InternedInput};
use serde::{Deserialize, Serialize};

/// Which side of the comparison a line belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// Present in both old and new
    Kept,
    /// Only present in old
    Removed,
    /// Only present in new
    Added,
}

impl Origin {
    /// True for removed and added lines
    pub fn is_change(self) -> bool {
        !matches!(self, Origin::Kept)
    }

    /// Single-character marker used in digests and plain-text output
    pub fn marker(self) -> char {
        match self {
            Origin::Kept => ' ',
            Origin::Removed => '-',
            Origin::Added => '+',
        }
    }
}

/// One entry of an edit script
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaggedLine {
    pub content: String,
    pub origin: Origin,
}

impl TaggedLine {
    pub fn new(content: impl Into<String>, origin: Origin) -> Self {
        Self {
            content: content.into(),
            origin,
        }
    }
}

/// Per-origin line counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DiffStats {
    pub kept: usize,
    pub removed: usize,
    pub added: usize,
}

impl DiffStats {
    pub fn total(&self) -> usize {
        self.kept + self.removed + self.added
    }

    pub fn changed(&self) -> usize {
        self.removed + self.added
    }
}

/// Ordered sequence of tagged lines in the order the diff emitted them.
///
/// Removals and additions of one hunk appear interleaved with the kept lines
/// around them: kept lines, then the hunk's removals, then its additions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditScript {
    lines: Vec<TaggedLine>,
}

impl EditScript {
    /// Wrap an already computed sequence
    pub fn from_lines(lines: Vec<TaggedLine>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[TaggedLine] {
        &self.lines
    }

    pub fn get(&self, idx: usize) -> Option<&TaggedLine> {
        self.lines.get(idx)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn stats(&self) -> DiffStats {
        let mut stats = DiffStats::default();
        for line in &self.lines {
            match line.origin {
                Origin::Kept => stats.kept += 1,
                Origin::Removed => stats.removed += 1,
                Origin::Added => stats.added += 1,
            }
        }
        stats
    }

    pub fn has_changes(&self) -> bool {
        self.lines.iter().any(|line| line.origin.is_change())
    }

    /// Indices of removed and added lines, ascending
    pub fn changed_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.lines
            .iter()
            .enumerate()
            .filter(|(_, line)| line.origin.is_change())
            .map(|(idx, _)| idx)
    }
}

/// Line diff algorithm used by [`DiffEngine`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffAlgorithm {
    #[default]
    Histogram,
    Myers,
}

impl From<DiffAlgorithm> for Algorithm {
    fn from(algorithm: DiffAlgorithm) -> Self {
        match algorithm {
            DiffAlgorithm::Histogram => Algorithm::Histogram,
            DiffAlgorithm::Myers => Algorithm::Myers,
        }
    }
}

/// Split text into lines, dropping the line terminators (`\n` or `\r\n`).
///
/// Nothing else is normalized: case and interior whitespace are preserved.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.lines().collect()
}

/// Produces edit scripts from pairs of texts
#[derive(Debug, Clone, Copy, Default)]
pub struct DiffEngine {
    algorithm: DiffAlgorithm,
}

impl DiffEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_algorithm(mut self, algorithm: DiffAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Diff two texts line by line
    pub fn diff_strings(&self, old: &str, new: &str) -> EditScript {
        let old_lines = split_lines(old);
        let new_lines = split_lines(new);
        self.diff_lines(&old_lines, &new_lines)
    }

    fn diff_lines(&self, old: &[&str], new: &[&str]) -> EditScript {
        // Every line is re-terminated with '\n' so the tokenizer sees exactly
        // one token per entry of `old`/`new`, whatever the source line endings.
        let old_text = terminated(old);
        let new_text = terminated(new);

        let input = InternedInput::new(old_text.as_str(), new_text.as_str());
        let mut diff = Diff::compute(self.algorithm.into(), &input);
        diff.postprocess_lines(&input);

        let mut lines = Vec::with_capacity(old.len().max(new.len()));
        let mut old_pos = 0usize;

        for hunk in diff.hunks() {
            let before = hunk.before.start as usize..hunk.before.end as usize;
            let after = hunk.after.start as usize..hunk.after.end as usize;

            lines.extend(
                old[old_pos..before.start]
                    .iter()
                    .map(|line| TaggedLine::new(*line, Origin::Kept)),
            );
            lines.extend(
                old[before.clone()]
                    .iter()
                    .map(|line| TaggedLine::new(*line, Origin::Removed)),
            );
            lines.extend(
                new[after]
                    .iter()
                    .map(|line| TaggedLine::new(*line, Origin::Added)),
            );
            old_pos = before.end;
        }

        lines.extend(
            old[old_pos..]
                .iter()
                .map(|line| TaggedLine::new(*line, Origin::Kept)),
        );

        EditScript::from_lines(lines)
    }
}

fn terminated(lines: &[&str]) -> String {
    let mut text = String::with_capacity(lines.iter().map(|line| line.len() + 1).sum());
    for line in lines {
        debug_assert!(!line.contains('\n'));
        text.push_str(line);
        text.push('\n');
    }
    text
}
