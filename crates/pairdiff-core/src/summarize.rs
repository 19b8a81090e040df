//! Optional natural-language summaries of file changes

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SummarizeError {
    /// The backing model cannot be reached or loaded; further calls are pointless
    #[error("Summarizer unavailable: {0}")]
    Unavailable(String),
    /// This call failed but later calls may succeed
    #[error("Summarization failed: {0}")]
    Failed(String),
}

/// A capability that turns a change digest into prose
pub trait Summarizer {
    /// Short label used in logs
    fn name(&self) -> &str;

    /// Whether calls should be attempted at all
    fn is_enabled(&self) -> bool {
        true
    }

    /// Summarize `digest` (non-empty `-`/`+` prefixed change lines) for `file`
    fn summarize(&self, file: &str, digest: &str) -> Result<String, SummarizeError>;
}

/// Default summarizer: never produces a summary
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSummarizer;

impl Summarizer for NoopSummarizer {
    fn name(&self) -> &str {
        "none"
    }

    fn is_enabled(&self) -> bool {
        false
    }

    fn summarize(&self, _file: &str, _digest: &str) -> Result<String, SummarizeError> {
        Err(SummarizeError::Unavailable("summarization is disabled".to_string()))
    }
}

/// Text returned when a file has no removed or added lines
pub fn no_changes_summary(file: &str) -> String {
    format!("No significant changes detected in {file}.")
}

/// Instruction text for model-backed summarizers
pub fn build_prompt(file: &str, digest: &str) -> String {
    format!(
        "Summarize the following differences in file '{file}'.\n\
         Explain what changed and why it might matter:\n\n{digest}"
    )
}

/// Wraps a summarizer so failures never reach the diff pipeline.
///
/// The first [`SummarizeError::Unavailable`] turns the gate off for the rest
/// of the run; [`SummarizeError::Failed`] only skips the current file.
pub struct SummaryGate {
    summarizer: Box<dyn Summarizer>,
    active: bool,
}

impl Default for SummaryGate {
    fn default() -> Self {
        Self::new(Box::new(NoopSummarizer))
    }
}

impl SummaryGate {
    pub fn new(summarizer: Box<dyn Summarizer>) -> Self {
        let active = summarizer.is_enabled();
        Self { summarizer, active }
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Summary for one file, or `None` when summarization is off or failed
    pub fn summarize(&mut self, file: &str, digest: &str) -> Option<String> {
        if !self.active {
            return None;
        }
        if digest.trim().is_empty() {
            return Some(no_changes_summary(file));
        }

        match self.summarizer.summarize(file, digest) {
            Ok(summary) => Some(summary.trim().to_string()),
            Err(SummarizeError::Unavailable(reason)) => {
                tracing::warn!(
                    summarizer = self.summarizer.name(),
                    %reason,
                    "summarizer unavailable, skipping summaries for the rest of this run"
                );
                self.active = false;
                None
            }
            Err(err @ SummarizeError::Failed(_)) => {
                tracing::warn!(summarizer = self.summarizer.name(), file, error = %err, "summary skipped");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    struct Scripted {
        replies: RefCell<Vec<Result<String, SummarizeError>>>,
        calls: Rc<Cell<usize>>,
    }

    impl Summarizer for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }

        fn summarize(&self, _file: &str, _digest: &str) -> Result<String, SummarizeError> {
            self.calls.set(self.calls.get() + 1);
            self.replies.borrow_mut().remove(0)
        }
    }

    fn gate(replies: Vec<Result<String, SummarizeError>>) -> (SummaryGate, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        let summarizer = Scripted {
            replies: RefCell::new(replies),
            calls: Rc::clone(&calls),
        };
        (SummaryGate::new(Box::new(summarizer)), calls)
    }

    #[test]
    fn test_disabled_gate_returns_nothing() {
        let mut gate = SummaryGate::disabled();
        assert!(!gate.is_active());
        assert_eq!(gate.summarize("a.xml", "- x"), None);
        assert_eq!(gate.summarize("a.xml", ""), None);
    }

    #[test]
    fn test_empty_digest_uses_sentinel_without_calling() {
        let (mut gate, calls) = gate(vec![]);
        assert_eq!(
            gate.summarize("a.xml", ""),
            Some("No significant changes detected in a.xml.".to_string())
        );
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_successful_summary_is_trimmed() {
        let (mut gate, _) = gate(vec![Ok("  Renamed a field.\n".to_string())]);
        assert_eq!(gate.summarize("a.xml", "- a\n+ b"), Some("Renamed a field.".to_string()));
    }

    #[test]
    fn test_unavailable_disables_for_rest_of_run() {
        let (mut gate, calls) = gate(vec![
            Err(SummarizeError::Unavailable("connection refused".to_string())),
            Ok("never used".to_string()),
        ]);
        assert_eq!(gate.summarize("a.xml", "- a"), None);
        assert!(!gate.is_active());
        assert_eq!(gate.summarize("b.xml", "- b"), None);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_failed_call_only_skips_one_file() {
        let (mut gate, calls) = gate(vec![
            Err(SummarizeError::Failed("empty reply".to_string())),
            Ok("second".to_string()),
        ]);
        assert_eq!(gate.summarize("a.xml", "- a"), None);
        assert!(gate.is_active());
        assert_eq!(gate.summarize("b.xml", "- b"), Some("second".to_string()));
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_prompt_mentions_file_and_digest() {
        let prompt = build_prompt("store.xml", "- <a/>\n+ <b/>");
        assert!(prompt.contains("'store.xml'"));
        assert!(prompt.ends_with("- <a/>\n+ <b/>"));
    }
}
