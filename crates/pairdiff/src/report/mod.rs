//! Report assembly: HTML document, JSON dump or plain-text tables

mod html;
mod json;
mod text;

use crate::config::ResolvedTheme;
use pairdiff_core::{BatchReport, FileOutcome};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

#[derive(Error, Debug)]
pub enum RenderError {
    /// A page or row broke an invariant the pipeline guarantees
    #[error("Internal render error: {0}")]
    Internal(String),
    #[error("Failed to encode JSON report: {0}")]
    Json(#[from] serde_json::Error),
}

/// Output format of the report document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Print-ready HTML, one table per printed page
    #[default]
    Html,
    Json,
    /// Plain-text tables
    Text,
}

impl ReportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ReportFormat::Html => "html",
            ReportFormat::Json => "json",
            ReportFormat::Text => "txt",
        }
    }
}

/// Presentation settings that are not part of the comparison data
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub theme: ResolvedTheme,
    /// Old column share of the table width, in percent
    pub old_column_percent: f64,
    /// Total line width for text output
    pub text_width: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            theme: ResolvedTheme::default(),
            old_column_percent: 50.0,
            text_width: 120,
        }
    }
}

/// A batch plus document metadata
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub title: String,
    /// RFC 3339 timestamp
    pub generated_at: String,
    #[serde(flatten)]
    pub batch: &'a BatchReport,
}

impl<'a> Report<'a> {
    pub fn new(title: impl Into<String>, batch: &'a BatchReport) -> Self {
        let generated_at = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_else(|_| "unknown".to_string());
        Self {
            title: title.into(),
            generated_at,
            batch,
        }
    }
}

/// Pages must be non-empty and numbered 1..=n
fn validate(batch: &BatchReport) -> Result<(), RenderError> {
    for outcome in &batch.files {
        let FileOutcome::Compared(report) = outcome else {
            continue;
        };
        for (idx, page) in report.comparison.pages.iter().enumerate() {
            if page.number != idx + 1 {
                return Err(RenderError::Internal(format!(
                    "{}: page {} found at position {}",
                    report.comparison.name,
                    page.number,
                    idx + 1
                )));
            }
            if page.is_empty() {
                return Err(RenderError::Internal(format!(
                    "{}: page {} has no rows",
                    report.comparison.name, page.number
                )));
            }
        }
    }
    Ok(())
}

/// Render a report document
pub fn render(report: &Report, format: ReportFormat, options: &RenderOptions) -> Result<String, RenderError> {
    validate(report.batch)?;
    let document = match format {
        ReportFormat::Html => html::render(report, options),
        ReportFormat::Json => json::render(report)?,
        ReportFormat::Text => text::render(report, options),
    };
    tracing::debug!(format = format.extension(), bytes = document.len(), "rendered report");
    Ok(document)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use pairdiff_core::{
        match_files, run_batch, BatchOptions, ColumnPair, Origin, Page, SourceFile, SummaryGate, TaggedLine,
        PAGE_HEADER,
    };

    /// Two compared files, one decode failure, one unmatched file per side
    pub(crate) fn sample_batch() -> BatchReport {
        let old = vec![
            SourceFile::new("store.xml", "<store>\n  <name>North & Co</name>\n</store>"),
            SourceFile::new("same.xml", "<same/>"),
            SourceFile::new("bad.xml", vec![0xFF]),
            SourceFile::new("gone.xml", "<gone/>"),
        ];
        let new = vec![
            SourceFile::new("store.xml", "<store>\n  <name>South</name>\n</store>"),
            SourceFile::new("same.xml", "<same/>"),
            SourceFile::new("bad.xml", "<ok/>"),
            SourceFile::new("fresh.xml", "<fresh/>"),
        ];
        run_batch(
            match_files(old, new).unwrap(),
            &BatchOptions::default(),
            &mut SummaryGate::disabled(),
        )
    }

    #[test]
    fn test_validate_accepts_pipeline_output() {
        assert!(validate(&sample_batch()).is_ok());
    }

    #[test]
    fn test_broken_page_numbering_is_internal_error() {
        let mut batch = sample_batch();
        let FileOutcome::Compared(report) = &mut batch.files[2] else {
            panic!("store.xml should be compared");
        };
        report.comparison.pages.push(Page {
            number: 7,
            header: PAGE_HEADER,
            rows: vec![ColumnPair::from_tagged(&TaggedLine::new("x", Origin::Added))],
        });

        let report = Report::new("t", &batch);
        let err = render(&report, ReportFormat::Text, &RenderOptions::default()).unwrap_err();
        assert!(matches!(err, RenderError::Internal(msg) if msg.contains("page 7")));
    }

    #[test]
    fn test_generated_at_is_rfc3339() {
        let batch = BatchReport::default();
        let report = Report::new("t", &batch);
        assert!(OffsetDateTime::parse(&report.generated_at, &Rfc3339).is_ok());
    }

    #[test]
    fn test_extensions() {
        assert_eq!(ReportFormat::Html.extension(), "html");
        assert_eq!(ReportFormat::Json.extension(), "json");
        assert_eq!(ReportFormat::Text.extension(), "txt");
    }
}
