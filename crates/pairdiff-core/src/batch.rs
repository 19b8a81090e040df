//! Batch comparison over matched file pairs

use crate::matching::{decode, DecodeError, FileMatch, FilePair};
use crate::pipeline::{change_digest, compare_script, FileComparison, PipelineOptions, DEFAULT_MAX_DIGEST_CHARS};
use crate::script::{DiffEngine, DiffStats};
use crate::summarize::SummaryGate;
use serde::Serialize;
use std::num::NonZeroUsize;

/// Options for a whole run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOptions {
    pub pipeline: PipelineOptions,
    /// Character limit of the change text passed to the summarizer
    pub max_digest_chars: NonZeroUsize,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            pipeline: PipelineOptions::default(),
            max_digest_chars: DEFAULT_MAX_DIGEST_CHARS,
        }
    }
}

/// A compared file plus its optional summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    #[serde(flatten)]
    pub comparison: FileComparison,
    pub summary: Option<String>,
}

/// Per-file result; failures stay local to their file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FileOutcome {
    Compared(FileReport),
    Failed { name: String, error: DecodeError },
}

impl FileOutcome {
    pub fn name(&self) -> &str {
        match self {
            FileOutcome::Compared(report) => &report.comparison.name,
            FileOutcome::Failed { name, .. } => name,
        }
    }

    pub fn report(&self) -> Option<&FileReport> {
        match self {
            FileOutcome::Compared(report) => Some(report),
            FileOutcome::Failed { .. } => None,
        }
    }
}

/// Everything a report assembler needs for one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub files: Vec<FileOutcome>,
    pub unmatched_old: Vec<String>,
    pub unmatched_new: Vec<String>,
}

impl BatchReport {
    pub fn reports(&self) -> impl Iterator<Item = &FileReport> {
        self.files.iter().filter_map(FileOutcome::report)
    }

    pub fn failed_count(&self) -> usize {
        self.files.len() - self.reports().count()
    }

    /// Line counts summed over every compared file
    pub fn total_stats(&self) -> DiffStats {
        self.reports().fold(DiffStats::default(), |mut acc, report| {
            let stats = report.comparison.stats;
            acc.kept += stats.kept;
            acc.removed += stats.removed;
            acc.added += stats.added;
            acc
        })
    }
}

/// Compare one pair. Decoding is the only fallible step.
pub fn run_pair(pair: &FilePair, options: &BatchOptions, gate: &mut SummaryGate) -> FileOutcome {
    let texts = decode(&pair.old).and_then(|old| decode(&pair.new).map(|new| (old, new)));
    let (old_text, new_text) = match texts {
        Ok(texts) => texts,
        Err(error) => {
            tracing::warn!(file = %pair.name, %error, "cannot decode file, skipping");
            return FileOutcome::Failed {
                name: pair.name.clone(),
                error,
            };
        }
    };

    let script = DiffEngine::new()
        .with_algorithm(options.pipeline.algorithm)
        .diff_strings(&old_text, &new_text);
    let comparison = compare_script(&pair.name, &script, &options.pipeline);

    let summary = if gate.is_active() {
        tracing::info!(file = %pair.name, "summarizing changes");
        gate.summarize(&pair.name, &change_digest(&script, options.max_digest_chars.get()))
    } else {
        None
    };

    let stats = comparison.stats;
    tracing::info!(
        file = %pair.name,
        removed = stats.removed,
        added = stats.added,
        pages = comparison.pages.len(),
        "compared"
    );

    FileOutcome::Compared(FileReport { comparison, summary })
}

/// Compare every matched pair in order
pub fn run_batch(file_match: FileMatch, options: &BatchOptions, gate: &mut SummaryGate) -> BatchReport {
    let files = file_match
        .pairs
        .iter()
        .map(|pair| run_pair(pair, options, gate))
        .collect();

    BatchReport {
        files,
        unmatched_old: file_match.unmatched_old,
        unmatched_new: file_match.unmatched_new,
    }
}
