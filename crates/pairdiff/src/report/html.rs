use super::{RenderOptions, Report};
use crate::color::css_color;
use pairdiff_core::{ColumnPair, FileOutcome, FileReport, Origin, Page};

const REMOVED_MARKER: &str = "❌";
const ADDED_MARKER: &str = "✅";

fn html_escape(value: &str) -> String {
    v_htmlescape::escape(value).to_string()
}

fn style(options: &RenderOptions) -> String {
    let theme = &options.theme;
    format!(
        "  <style>\n    \
         body {{ font-family: Helvetica, Arial, sans-serif; margin: 24px; color: #111; }}\n    \
         h1 {{ margin: 0 0 8px; }}\n    \
         h2 {{ margin: 18px 0 8px; font-size: 15px; }}\n    \
         .meta {{ margin-bottom: 16px; color: #555; font-size: 12px; }}\n    \
         .summary {{ font-style: italic; margin: 0 0 12px; }}\n    \
         .note {{ color: #555; }}\n    \
         .error {{ color: {removed}; }}\n    \
         table {{ table-layout: fixed; width: 100%; border-collapse: collapse; }}\n    \
         th, td {{ border: 0.25pt solid #000; padding: 2px 4px; font-family: Menlo, Consolas, monospace; font-size: 8pt; line-height: 10pt; white-space: pre-wrap; overflow-wrap: anywhere; vertical-align: top; text-align: left; }}\n    \
         th {{ background: {header_bg}; color: {header_fg}; }}\n    \
         td.removed {{ color: {removed}; }}\n    \
         td.added {{ color: {added}; }}\n    \
         td.kept {{ color: {kept}; }}\n    \
         .page {{ break-after: page; page-break-after: always; }}\n    \
         .page-number {{ font-size: 10px; color: #777; text-align: right; margin-top: 4px; }}\n  \
         </style>\n",
        removed = css_color(theme.removed),
        added = css_color(theme.added),
        kept = css_color(theme.kept),
        header_bg = css_color(theme.header_bg),
        header_fg = css_color(theme.header_fg),
    )
}

fn cell(class: &str, marker: Option<&str>, content: &str) -> String {
    match marker {
        Some(marker) => format!("<td class=\"{class}\">{marker} {}</td>", html_escape(content)),
        None => format!("<td class=\"{class}\">{}</td>", html_escape(content)),
    }
}

fn render_row(html: &mut String, row: &ColumnPair) {
    let (old, new) = match row.origin {
        Origin::Removed => (
            cell("removed", Some(REMOVED_MARKER), &row.old),
            "<td></td>".to_string(),
        ),
        Origin::Added => (
            "<td></td>".to_string(),
            cell("added", Some(ADDED_MARKER), &row.new),
        ),
        Origin::Kept => (cell("kept", None, &row.old), cell("kept", None, &row.new)),
    };
    html.push_str(&format!("      <tr>{old}{new}</tr>\n"));
}

fn render_page(html: &mut String, page: &Page, page_count: usize, options: &RenderOptions) {
    let old_width = options.old_column_percent.clamp(0.0, 100.0);
    html.push_str("  <div class=\"page\">\n    <table>\n");
    html.push_str(&format!(
        "      <colgroup><col style=\"width: {:.1}%\"><col style=\"width: {:.1}%\"></colgroup>\n",
        old_width,
        100.0 - old_width
    ));
    html.push_str(&format!(
        "      <thead><tr><th>{}</th><th>{}</th></tr></thead>\n      <tbody>\n",
        html_escape(page.header[0]),
        html_escape(page.header[1])
    ));
    for row in &page.rows {
        render_row(html, row);
    }
    html.push_str("      </tbody>\n    </table>\n");
    html.push_str(&format!(
        "    <div class=\"page-number\">Page {} of {}</div>\n  </div>\n",
        page.number, page_count
    ));
}

fn render_file(html: &mut String, report: &FileReport, options: &RenderOptions) {
    let comparison = &report.comparison;
    html.push_str(&format!(
        "<section class=\"file\">\n  <h2>{}</h2>\n",
        html_escape(&comparison.name)
    ));
    if let Some(summary) = &report.summary {
        html.push_str(&format!("  <p class=\"summary\">{}</p>\n", html_escape(summary)));
    }
    if comparison.pages.is_empty() {
        html.push_str("  <p class=\"note\">No differences.</p>\n");
    }
    for page in &comparison.pages {
        render_page(html, page, comparison.pages.len(), options);
    }
    html.push_str("</section>\n");
}

fn render_name_list(html: &mut String, heading: &str, names: &[String]) {
    if names.is_empty() {
        return;
    }
    html.push_str(&format!("  <h3>{heading}</h3>\n  <ul>\n"));
    for name in names {
        html.push_str(&format!("    <li>{}</li>\n", html_escape(name)));
    }
    html.push_str("  </ul>\n");
}

pub(super) fn render(report: &Report, options: &RenderOptions) -> String {
    let batch = report.batch;
    let stats = batch.total_stats();
    let mut html = String::new();

    html.push_str("<!doctype html>\n<html lang=\"en\">\n<head>\n  <meta charset=\"utf-8\">\n");
    html.push_str(&format!("  <title>{}</title>\n", html_escape(&report.title)));
    html.push_str(&style(options));
    html.push_str("</head>\n<body>\n");

    html.push_str(&format!("<h1>{}</h1>\n", html_escape(&report.title)));
    html.push_str(&format!(
        "<div class=\"meta\">Generated {} | {} compared | {} failed | {} removed, {} added</div>\n",
        html_escape(&report.generated_at),
        batch.reports().count(),
        batch.failed_count(),
        stats.removed,
        stats.added
    ));

    for outcome in &batch.files {
        match outcome {
            FileOutcome::Compared(file) => render_file(&mut html, file, options),
            FileOutcome::Failed { name, error } => {
                html.push_str(&format!(
                    "<section class=\"file failed\">\n  <h2>{}</h2>\n  <p class=\"error\">Not compared: {}</p>\n</section>\n",
                    html_escape(name),
                    html_escape(&error.to_string())
                ));
            }
        }
    }

    if !batch.unmatched_old.is_empty() || !batch.unmatched_new.is_empty() {
        html.push_str("<section class=\"unmatched\">\n  <h2>Unmatched files</h2>\n");
        render_name_list(&mut html, "Only in old set", &batch.unmatched_old);
        render_name_list(&mut html, "Only in new set", &batch.unmatched_new);
        html.push_str("</section>\n");
    }

    html.push_str("</body>\n</html>\n");
    html
}
