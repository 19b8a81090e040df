//! pairdiff-core - side-by-side comparison engine
//!
//! Turns an old/new pair of texts into paginated two-column tables:
//!
//! 1. [`DiffEngine`] builds an [`EditScript`] of kept, removed and added lines.
//! 2. [`context_window`] keeps every change plus a few surrounding lines.
//! 3. [`project`] maps each kept entry to an old/new [`ColumnPair`].
//! 4. [`paginate`] chunks the pairs into [`Page`]s of bounded size.
//!
//! [`matching`] pairs files across an old and new set by name, and
//! [`batch`] runs the whole pipeline per pair with optional summaries.
//!
//! ```
//! use pairdiff_core::{compare, PipelineOptions};
//!
//! let cmp = compare("a.xml", "a\nb\nc", "a\nx\nc", &PipelineOptions::default());
//! let rows: Vec<_> = cmp.rows().map(|r| (r.old.as_str(), r.new.as_str())).collect();
//! assert_eq!(rows, [("a", "a"), ("b", ""), ("", "x"), ("c", "c")]);
//! ```

pub mod batch;
pub mod columns;
pub mod matching;
pub mod page;
pub mod pipeline;
pub mod script;
pub mod summarize;
pub mod window;

pub use batch::{run_batch, run_pair, BatchOptions, BatchReport, FileOutcome, FileReport};
pub use columns::{project, ColumnPair};
pub use matching::{
    collect_dir, decode, match_files, DecodeError, FileFilter, FileMatch, FilePair, MatchError,
    ScanError, SourceFile,
};
pub use page::{paginate, Page, PAGE_HEADER};
pub use pipeline::{
    change_digest, compare, compare_script, FileComparison, PipelineOptions, DEFAULT_CONTEXT,
    DEFAULT_MAX_DIGEST_CHARS, DEFAULT_MAX_ROWS,
};
pub use script::{split_lines, DiffAlgorithm, DiffEngine, DiffStats, EditScript, Origin, TaggedLine};
pub use summarize::{
    build_prompt, no_changes_summary, NoopSummarizer, SummarizeError, Summarizer, SummaryGate,
};
pub use window::{context_ranges, context_window};
