//! Per-file comparison: adapt, window, project, paginate

use crate::columns::{project, ColumnPair};
use crate::page::{paginate, Page};
use crate::script::{DiffAlgorithm, DiffEngine, DiffStats, EditScript};
use crate::window::context_window;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;

pub const DEFAULT_CONTEXT: usize = 2;

pub const DEFAULT_MAX_ROWS: NonZeroUsize = match NonZeroUsize::new(40) {
    Some(n) => n,
    None => unreachable!(),
};

/// Maximum characters of change text handed to a summarizer
pub const DEFAULT_MAX_DIGEST_CHARS: NonZeroUsize = match NonZeroUsize::new(4000) {
    Some(n) => n,
    None => unreachable!(),
};

/// Knobs for a single comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineOptions {
    /// Unchanged lines shown before and after each change
    pub context: usize,
    /// Rows per rendered page
    pub max_rows: NonZeroUsize,
    pub algorithm: DiffAlgorithm,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            context: DEFAULT_CONTEXT,
            max_rows: DEFAULT_MAX_ROWS,
            algorithm: DiffAlgorithm::default(),
        }
    }
}

/// Renderable result of comparing one file pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileComparison {
    pub name: String,
    pub stats: DiffStats,
    pub pages: Vec<Page>,
}

impl FileComparison {
    pub fn has_changes(&self) -> bool {
        self.stats.changed() > 0
    }

    /// Total rows across all pages
    pub fn row_count(&self) -> usize {
        self.pages.iter().map(Page::len).sum()
    }

    pub fn rows(&self) -> impl Iterator<Item = &ColumnPair> {
        self.pages.iter().flat_map(|page| page.rows.iter())
    }
}

/// Build the paginated comparison for an already computed edit script
pub fn compare_script(name: &str, script: &EditScript, options: &PipelineOptions) -> FileComparison {
    let retained = context_window(script, options.context);
    let rows = project(script, &retained);
    let pages = paginate(rows, options.max_rows);
    tracing::debug!(
        file = name,
        lines = script.len(),
        retained = retained.len(),
        pages = pages.len(),
        "built comparison"
    );

    FileComparison {
        name: name.to_string(),
        stats: script.stats(),
        pages,
    }
}

/// Compare two texts end to end
pub fn compare(name: &str, old_text: &str, new_text: &str, options: &PipelineOptions) -> FileComparison {
    let script = DiffEngine::new()
        .with_algorithm(options.algorithm)
        .diff_strings(old_text, new_text);
    compare_script(name, &script, options)
}

/// Removed and added lines as `- `/`+ ` prefixed text, truncated to
/// `max_chars` characters. Empty when nothing changed.
pub fn change_digest(script: &EditScript, max_chars: usize) -> String {
    let mut digest = String::new();
    let mut chars = 0usize;

    for line in script.lines().iter().filter(|line| line.origin.is_change()) {
        if chars >= max_chars {
            break;
        }
        if !digest.is_empty() {
            digest.push('\n');
            chars += 1;
        }
        digest.push(line.origin.marker());
        digest.push(' ');
        digest.push_str(&line.content);
        chars += 2 + line.content.chars().count();
    }

    if chars > max_chars {
        if let Some((byte_idx, _)) = digest.char_indices().nth(max_chars) {
            digest.truncate(byte_idx);
        }
    }
    digest
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(context: usize, max_rows: usize) -> PipelineOptions {
        PipelineOptions {
            context,
            max_rows: NonZeroUsize::new(max_rows).unwrap(),
            ..PipelineOptions::default()
        }
    }

    #[test]
    fn test_defaults() {
        let options = PipelineOptions::default();
        assert_eq!(options.context, 2);
        assert_eq!(options.max_rows.get(), 40);
        assert_eq!(options.algorithm, DiffAlgorithm::Histogram);
    }

    #[test]
    fn test_compare_replacement() {
        let cmp = compare("a.xml", "a\nb\nc", "a\nx\nc", &opts(1, 40));
        assert!(cmp.has_changes());
        assert_eq!(cmp.pages.len(), 1);
        let rows: Vec<(&str, &str)> = cmp.rows().map(|r| (r.old.as_str(), r.new.as_str())).collect();
        assert_eq!(rows, vec![("a", "a"), ("b", ""), ("", "x"), ("c", "c")]);
    }

    #[test]
    fn test_compare_identical_has_no_pages() {
        let cmp = compare("same.xml", "same", "same", &PipelineOptions::default());
        assert!(!cmp.has_changes());
        assert!(cmp.pages.is_empty());
        assert_eq!(cmp.stats.kept, 1);
    }

    #[test]
    fn test_compare_is_deterministic() {
        let old = (0..200).map(|i| format!("<row n=\"{i}\"/>")).collect::<Vec<_>>().join("\n");
        let new = old.replace("n=\"50\"", "n=\"fifty\"").replace("n=\"150\"", "n=\"x\"");
        let first = compare("rows.xml", &old, &new, &opts(3, 4));
        let second = compare("rows.xml", &old, &new, &opts(3, 4));
        assert_eq!(first, second);
        assert_eq!(first.row_count(), 2 * (2 + 3 + 3));
    }

    #[test]
    fn test_change_digest_prefixes() {
        let script = DiffEngine::new().diff_strings("a\nb\nc", "a\nx\nc");
        assert_eq!(change_digest(&script, 4000), "- b\n+ x");
    }

    #[test]
    fn test_change_digest_empty_without_changes() {
        let script = DiffEngine::new().diff_strings("a\nb", "a\nb");
        assert_eq!(change_digest(&script, 4000), "");
    }

    #[test]
    fn test_change_digest_truncates_on_char_boundary() {
        let script = DiffEngine::new().diff_strings("ééééé", "ààààà");
        let digest = change_digest(&script, 5);
        assert_eq!(digest, "- ééé");
        assert_eq!(digest.chars().count(), 5);
    }

    #[test]
    fn test_change_digest_stops_early() {
        let old = (0..1000).map(|i| format!("old {i}")).collect::<Vec<_>>().join("\n");
        let new = (0..1000).map(|i| format!("new {i}")).collect::<Vec<_>>().join("\n");
        let script = DiffEngine::new().diff_strings(&old, &new);
        let digest = change_digest(&script, DEFAULT_MAX_DIGEST_CHARS.get());
        assert_eq!(digest.chars().count(), DEFAULT_MAX_DIGEST_CHARS.get());
        assert!(digest.starts_with("- old 0\n"));
    }
}
