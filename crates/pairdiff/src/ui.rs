//! UI rendering for the viewer

use crate::app::App;
use pairdiff_core::{FileOutcome, FileReport, Origin};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table, Wrap},
    Frame,
};

/// Main drawing function
pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(file_list_width(chunks[0].width)),
            Constraint::Min(0),
        ])
        .split(chunks[0]);

    draw_file_list(frame, app, panes[0]);
    draw_content(frame, app, panes[1]);
    draw_status_bar(frame, app, chunks[1]);

    if app.show_help {
        draw_help_popover(frame, app);
    }
}

fn file_list_width(total: u16) -> u16 {
    (total / 4).clamp(16, 36).min(total)
}

fn draw_file_list(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let items: Vec<ListItem> = app
        .report
        .files
        .iter()
        .map(|outcome| match outcome {
            FileOutcome::Compared(report) => {
                let stats = report.comparison.stats;
                ListItem::new(Line::from(vec![
                    Span::raw(report.comparison.name.clone()),
                    Span::raw(" "),
                    Span::styled(format!("-{}", stats.removed), Style::default().fg(theme.removed)),
                    Span::raw(" "),
                    Span::styled(format!("+{}", stats.added), Style::default().fg(theme.added)),
                ]))
            }
            FileOutcome::Failed { name, .. } => ListItem::new(Line::from(vec![
                Span::raw(name.clone()),
                Span::styled(" !", Style::default().fg(theme.removed)),
            ])),
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::RIGHT)
                .title(format!(" Files ({}) ", app.file_count())),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut state = ListState::default();
    if app.file_count() > 0 {
        state.select(Some(app.selected));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_content(frame: &mut Frame, app: &App, area: Rect) {
    let Some(outcome) = app.current_file() else {
        let empty = Paragraph::new("No files to show.").style(Style::default().fg(app.theme.kept));
        frame.render_widget(empty, area);
        return;
    };

    let block = Block::default()
        .borders(Borders::NONE)
        .title(Span::styled(
            format!(" {} ", outcome.name()),
            Style::default().add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    match outcome {
        FileOutcome::Failed { error, .. } => {
            let note = Paragraph::new(format!("Not compared: {error}"))
                .style(Style::default().fg(app.theme.removed))
                .wrap(Wrap { trim: false });
            frame.render_widget(note, inner);
        }
        FileOutcome::Compared(report) => draw_comparison(frame, app, report, inner),
    }
}

fn draw_comparison(frame: &mut Frame, app: &App, report: &FileReport, area: Rect) {
    let summary_height = if report.summary.is_some() { 3 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(summary_height), Constraint::Min(0)])
        .split(area);

    if let Some(summary) = &report.summary {
        let summary = Paragraph::new(summary.as_str())
            .style(Style::default().add_modifier(Modifier::ITALIC))
            .wrap(Wrap { trim: true });
        frame.render_widget(summary, chunks[0]);
    }

    let Some(page) = app.current_page() else {
        let note = Paragraph::new("No differences.").style(Style::default().fg(app.theme.kept));
        frame.render_widget(note, chunks[1]);
        return;
    };

    let theme = &app.theme;
    let header_style = Style::default()
        .fg(theme.header_fg)
        .bg(theme.header_bg)
        .add_modifier(Modifier::BOLD);
    let header = Row::new(page.header.iter().map(|title| Cell::from(*title))).style(header_style);

    let rows = page.rows.iter().map(|row| {
        let (old, new) = match row.origin {
            Origin::Removed => (
                Cell::from(format!("- {}", row.old)).style(Style::default().fg(theme.removed)),
                Cell::from(""),
            ),
            Origin::Added => (
                Cell::from(""),
                Cell::from(format!("+ {}", row.new)).style(Style::default().fg(theme.added)),
            ),
            Origin::Kept => (
                Cell::from(format!("  {}", row.old)).style(Style::default().fg(theme.kept)),
                Cell::from(format!("  {}", row.new)).style(Style::default().fg(theme.kept)),
            ),
        };
        Row::new([old, new])
    });

    let old_percent = app.old_column_percent.min(100);
    let table = Table::new(
        rows,
        [Constraint::Percentage(old_percent), Constraint::Percentage(100 - old_percent)],
    )
    .header(header)
    .column_spacing(1);
    frame.render_widget(table, chunks[1]);
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let muted = Style::default().fg(Color::DarkGray);
    let mut spans = vec![
        Span::styled(" PAIRDIFF ", Style::default().add_modifier(Modifier::REVERSED)),
        Span::raw(" "),
    ];

    if app.file_count() > 0 {
        spans.push(Span::raw(format!("file {}/{}", app.selected + 1, app.file_count())));
        spans.push(Span::styled("  ", muted));
        let pages = app.page_count();
        let page = if pages == 0 { 0 } else { app.page + 1 };
        spans.push(Span::raw(format!("page {page}/{pages}")));
    }

    let stats = app.report.total_stats();
    spans.push(Span::styled("  ", muted));
    spans.push(Span::styled(format!("-{}", stats.removed), Style::default().fg(app.theme.removed)));
    spans.push(Span::raw(" "));
    spans.push(Span::styled(format!("+{}", stats.added), Style::default().fg(app.theme.added)));
    spans.push(Span::styled("  ? help  q quit", muted));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_help_popover(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let popup_width = 40u16.min(area.width.saturating_sub(4));
    let popup_height = 12u16.min(area.height.saturating_sub(2));
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    frame.render_widget(Clear, popup_area);

    let key_style = Style::default().fg(Color::Cyan);
    let help_line = |key: &str, desc: &str| -> Line {
        Line::from(vec![
            Span::styled(format!("  {:<12}", key), key_style),
            Span::raw(desc.to_string()),
        ])
    };

    let lines = vec![
        help_line("j / k / ↑↓", "Next/prev page"),
        help_line("g / G", "First/last page"),
        help_line("] / [", "Next/prev file"),
        help_line("Tab / S-Tab", "Next/prev file"),
        Line::from(""),
        help_line("?", "Close help"),
        help_line("q / Esc", "Quit"),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", app.title))
        .title_alignment(Alignment::Center);

    frame.render_widget(Paragraph::new(lines).block(block), popup_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pairdiff_core::{
        match_files, run_batch, BatchOptions, BatchReport, FileComparison, SourceFile, SummaryGate,
    };
    use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};

    fn make_app() -> App {
        let old = vec![
            SourceFile::new("store.xml", "<store>\n  <name>North</name>\n</store>"),
            SourceFile::new("bad.xml", vec![0xFF]),
        ];
        let new = vec![
            SourceFile::new("store.xml", "<store>\n  <name>South</name>\n</store>"),
            SourceFile::new("bad.xml", "<ok/>"),
        ];
        let report = run_batch(
            match_files(old, new).unwrap(),
            &BatchOptions::default(),
            &mut SummaryGate::disabled(),
        );
        let mut app = App::new(report, "Report");
        // store.xml sorts after bad.xml
        app.selected = 1;
        app
    }

    fn render_buffer(app: &App, width: u16, height: u16) -> Buffer {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).expect("terminal");
        terminal.draw(|frame| draw(frame, app)).expect("draw");
        terminal.backend().buffer().clone()
    }

    fn buffer_text(buf: &Buffer) -> Vec<String> {
        let mut lines = Vec::new();
        for y in 0..buf.area.height {
            let mut line = String::new();
            for x in 0..buf.area.width {
                line.push_str(buf[(x, y)].symbol());
            }
            lines.push(line);
        }
        lines
    }

    #[test]
    fn test_renders_page_table() {
        let app = make_app();
        let lines = buffer_text(&render_buffer(&app, 100, 12));
        let text = lines.join("\n");

        assert!(text.contains("Files (2)"));
        assert!(text.contains("bad.xml !"));
        assert!(text.contains("store.xml -1 +1"));
        assert!(text.contains(" store.xml "));
        assert!(lines.iter().any(|l| l.contains("OLD VERSION") && l.contains("NEW VERSION")));
        assert!(lines.iter().any(|l| l.contains("-   <name>North</name>") && !l.contains("South")));
        assert!(lines.iter().any(|l| l.contains("+   <name>South</name>") && !l.contains("North")));
        assert!(lines.last().unwrap().contains("file 2/2  page 1/1"));
    }

    #[test]
    fn test_failed_file_shows_error() {
        let mut app = make_app();
        app.selected = 0;
        let text = buffer_text(&render_buffer(&app, 100, 12)).join("\n");
        assert!(text.contains("Not compared: bad.xml is not valid UTF-8"));
        assert!(text.contains("page 0/0"));
    }

    #[test]
    fn test_summary_and_empty_states() {
        let mut report = BatchReport::default();
        report.files.push(FileOutcome::Compared(FileReport {
            comparison: FileComparison {
                name: "same.xml".to_string(),
                stats: Default::default(),
                pages: Vec::new(),
            },
            summary: Some("No significant changes detected in same.xml.".to_string()),
        }));
        let app = App::new(report, "Report");
        let text = buffer_text(&render_buffer(&app, 120, 10)).join("\n");
        assert!(text.contains("No significant changes detected in same.xml."));
        assert!(text.contains("No differences."));

        let empty = App::new(BatchReport::default(), "Report");
        let text = buffer_text(&render_buffer(&empty, 80, 6)).join("\n");
        assert!(text.contains("No files to show."));
    }

    #[test]
    fn test_help_popover() {
        let mut app = make_app();
        app.show_help = true;
        let text = buffer_text(&render_buffer(&app, 80, 20)).join("\n");
        assert!(text.contains(" Report "));
        assert!(text.contains("Next/prev page"));
    }
}
