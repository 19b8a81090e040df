//! Viewer state: which file and page is on screen

use crate::config::ResolvedTheme;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use pairdiff_core::{BatchReport, FileOutcome, Page};

/// What the event loop should do after a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

pub struct App {
    pub report: BatchReport,
    pub title: String,
    pub theme: ResolvedTheme,
    /// Old column share of the table width, in percent
    pub old_column_percent: u16,
    /// Index into `report.files`
    pub selected: usize,
    /// 0-based page within the selected file
    pub page: usize,
    pub show_help: bool,
}

impl App {
    pub fn new(report: BatchReport, title: impl Into<String>) -> Self {
        Self {
            report,
            title: title.into(),
            theme: ResolvedTheme::default(),
            old_column_percent: 50,
            selected: 0,
            page: 0,
            show_help: false,
        }
    }

    pub fn file_count(&self) -> usize {
        self.report.files.len()
    }

    pub fn current_file(&self) -> Option<&FileOutcome> {
        self.report.files.get(self.selected)
    }

    /// Pages of the selected file (none for failed files)
    pub fn page_count(&self) -> usize {
        self.current_file()
            .and_then(FileOutcome::report)
            .map_or(0, |report| report.comparison.pages.len())
    }

    pub fn current_page(&self) -> Option<&Page> {
        self.current_file()
            .and_then(FileOutcome::report)
            .and_then(|report| report.comparison.pages.get(self.page))
    }

    pub fn next_page(&mut self) {
        if self.page + 1 < self.page_count() {
            self.page += 1;
        }
    }

    pub fn prev_page(&mut self) {
        self.page = self.page.saturating_sub(1);
    }

    pub fn first_page(&mut self) {
        self.page = 0;
    }

    pub fn last_page(&mut self) {
        self.page = self.page_count().saturating_sub(1);
    }

    pub fn next_file(&mut self) {
        if self.selected + 1 < self.file_count() {
            self.selected += 1;
            self.page = 0;
        }
    }

    pub fn prev_file(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            self.page = 0;
        }
    }

    /// Apply one key press
    pub fn handle_key(&mut self, key: KeyEvent) -> Control {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Control::Quit;
        }

        if self.show_help {
            if matches!(key.code, KeyCode::Char('?' | 'q') | KeyCode::Esc) {
                self.show_help = false;
            }
            return Control::Continue;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Control::Quit,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Down | KeyCode::Char('j') | KeyCode::PageDown | KeyCode::Char(' ') => self.next_page(),
            KeyCode::Up | KeyCode::Char('k') | KeyCode::PageUp => self.prev_page(),
            KeyCode::Home | KeyCode::Char('g') => self.first_page(),
            KeyCode::End | KeyCode::Char('G') => self.last_page(),
            KeyCode::Tab | KeyCode::Char(']') => self.next_file(),
            KeyCode::BackTab | KeyCode::Char('[') => self.prev_file(),
            _ => {}
        }
        Control::Continue
    }
}
