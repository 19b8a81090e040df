use super::{RenderOptions, Report};
use pairdiff_core::{ColumnPair, FileOutcome, FileReport, Origin, Page};
use std::fmt::Write;
use unicode_width::UnicodeWidthChar;

const SEPARATOR: &str = " | ";
const MIN_COLUMN: usize = 8;

/// Truncate `text` to `width` display columns (marking the cut with `…`)
/// and pad it with spaces to exactly `width`.
fn fit(text: &str, width: usize) -> String {
    let text = text.replace('\t', "    ");
    let total: usize = text.chars().map(|c| c.width().unwrap_or(0)).sum();

    let mut out = String::with_capacity(width);
    let mut used = 0;
    if total <= width {
        out.push_str(&text);
        used = total;
    } else if width > 0 {
        for c in text.chars() {
            let w = c.width().unwrap_or(0);
            if used + w > width - 1 {
                break;
            }
            out.push(c);
            used += w;
        }
        out.push('…');
        used += 1;
    }
    out.extend(std::iter::repeat(' ').take(width.saturating_sub(used)));
    out
}

fn column_widths(options: &RenderOptions) -> (usize, usize) {
    let available = options.text_width.saturating_sub(SEPARATOR.len());
    let old = (available as f64 * options.old_column_percent.clamp(0.0, 100.0) / 100.0).round() as usize;
    let old = old.clamp(MIN_COLUMN, available.saturating_sub(MIN_COLUMN).max(MIN_COLUMN));
    let new = available.saturating_sub(old).max(MIN_COLUMN);
    (old, new)
}

fn render_row(out: &mut String, row: &ColumnPair, widths: (usize, usize)) {
    let (old_marker, new_marker) = match row.origin {
        Origin::Removed => ('-', ' '),
        Origin::Added => (' ', '+'),
        Origin::Kept => (' ', ' '),
    };
    let old = fit(&format!("{old_marker} {}", row.old), widths.0);
    let new = fit(&format!("{new_marker} {}", row.new), widths.1);
    let line = format!("{old}{SEPARATOR}{new}");
    let _ = writeln!(out, "{}", line.trim_end());
}

fn render_page(out: &mut String, page: &Page, page_count: usize, widths: (usize, usize)) {
    let _ = writeln!(out, "Page {} of {}", page.number, page_count);
    let _ = writeln!(
        out,
        "{}{SEPARATOR}{}",
        fit(page.header[0], widths.0),
        page.header[1]
    );
    let _ = writeln!(out, "{}-+-{}", "-".repeat(widths.0), "-".repeat(widths.1));
    for row in &page.rows {
        render_row(out, row, widths);
    }
    out.push('\n');
}

fn render_file(out: &mut String, report: &FileReport, widths: (usize, usize)) {
    let comparison = &report.comparison;
    let _ = writeln!(
        out,
        "== {} (-{} +{}) ==",
        comparison.name, comparison.stats.removed, comparison.stats.added
    );
    if let Some(summary) = &report.summary {
        let _ = writeln!(out, "{summary}");
    }
    out.push('\n');
    if comparison.pages.is_empty() {
        out.push_str("No differences.\n\n");
    }
    for page in &comparison.pages {
        render_page(out, page, comparison.pages.len(), widths);
    }
}

pub(super) fn render(report: &Report, options: &RenderOptions) -> String {
    let batch = report.batch;
    let widths = column_widths(options);
    let mut out = String::new();

    let _ = writeln!(out, "{}", report.title);
    let _ = writeln!(out, "Generated {}\n", report.generated_at);

    for outcome in &batch.files {
        match outcome {
            FileOutcome::Compared(file) => render_file(&mut out, file, widths),
            FileOutcome::Failed { name, error } => {
                let _ = writeln!(out, "== {name} ==\nNot compared: {error}\n");
            }
        }
    }

    for (label, names) in [("old", &batch.unmatched_old), ("new", &batch.unmatched_new)] {
        if !names.is_empty() {
            let _ = writeln!(out, "Only in {label} set: {}", names.join(", "));
        }
    }
    out
}
