//! pairdiff CLI - side-by-side comparison reports for two versions of a file set

mod app;
mod color;
mod config;
mod logging;
mod report;
mod summarizer;
mod ui;

use anyhow::{bail, Context, Result};
use app::{App, Control};
use clap::Parser;
use config::Config;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use pairdiff_core::{
    collect_dir, match_files, run_batch, BatchOptions, BatchReport, FileFilter, MatchError, SummaryGate,
};
use ratatui::prelude::*;
use report::{RenderOptions, Report, ReportFormat};
use std::io::{self, Stdout, Write};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use summarizer::LocalModelSummarizer;

#[derive(Parser, Debug)]
#[command(name = "pairdiff")]
#[command(author, version, about = "Side-by-side comparison reports for two versions of a file set")]
struct Args {
    /// Directory holding the old versions
    old_dir: PathBuf,

    /// Directory holding the new versions
    new_dir: PathBuf,

    /// Report path ("-" writes to stdout)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Report format
    #[arg(short, long, value_enum)]
    format: Option<ReportFormat>,

    /// Unchanged lines shown around each change
    #[arg(short, long, value_name = "N")]
    context: Option<usize>,

    /// Rows per report page
    #[arg(long, value_name = "N")]
    max_rows: Option<usize>,

    /// File extension to compare (repeatable, default from config: xml)
    #[arg(long = "ext", value_name = "EXT")]
    extensions: Vec<String>,

    /// Report title
    #[arg(long)]
    title: Option<String>,

    /// Summarize each file's changes with the local model server
    #[arg(long)]
    summarize: bool,

    /// Browse the comparison in an interactive viewer
    #[arg(long)]
    view: bool,

    /// Config file to use instead of the default location
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Overlay command line flags on the loaded config
fn apply_args(config: &mut Config, args: &Args) -> Result<()> {
    if let Some(context) = args.context {
        config.diff.context = context;
    }
    if let Some(max_rows) = args.max_rows {
        if NonZeroUsize::new(max_rows).is_none() {
            bail!("--max-rows must be at least 1");
        }
        config.report.max_rows = max_rows;
    }
    if let Some(format) = args.format {
        config.report.format = format;
    }
    if let Some(output) = &args.output {
        config.report.output = Some(output.clone());
    }
    if let Some(title) = &args.title {
        config.report.title = title.clone();
    }
    if !args.extensions.is_empty() {
        config.files.extensions = args.extensions.clone();
    }
    if args.summarize {
        config.summary.enabled = true;
    }
    Ok(())
}

fn summary_gate(config: &Config) -> SummaryGate {
    if !config.summary.enabled {
        return SummaryGate::disabled();
    }
    let summarizer = LocalModelSummarizer::new(&config.summary);
    tracing::info!(url = summarizer.url(), "summaries enabled");
    SummaryGate::new(Box::new(summarizer))
}

fn report_path(config: &Config) -> PathBuf {
    config
        .report
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("comparison_report.{}", config.report.format.extension())))
}

fn is_stdout(path: &Path) -> bool {
    path.as_os_str() == "-"
}

fn write_report(batch: &BatchReport, config: &Config) -> Result<()> {
    let path = report_path(config);
    let format = config.report.format;

    let mut options = RenderOptions {
        theme: config.theme.resolve(),
        old_column_percent: config.report.old_column_percent(),
        ..RenderOptions::default()
    };
    if is_stdout(&path) && format == ReportFormat::Text {
        if let Ok((columns, _)) = crossterm::terminal::size() {
            options.text_width = usize::from(columns);
        }
    }

    let report = Report::new(config.report.title.clone(), batch);
    let document = report::render(&report, format, &options).context("Failed to render report")?;

    if is_stdout(&path) {
        io::stdout()
            .write_all(document.as_bytes())
            .context("Failed to write report to stdout")?;
    } else {
        std::fs::write(&path, document)
            .with_context(|| format!("Failed to write report: {}", path.display()))?;
        eprintln!(
            "Wrote {} ({} compared, {} failed, {} unmatched)",
            path.display(),
            batch.reports().count(),
            batch.failed_count(),
            batch.unmatched_old.len() + batch.unmatched_new.len()
        );
    }
    Ok(())
}

fn print_unmatched(label: &str, names: &[String]) {
    if !names.is_empty() {
        eprintln!("Only in {label} set: {}", names.join(", "));
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose)?;

    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load(),
    };
    apply_args(&mut config, &args)?;

    let filter = FileFilter::extensions(&config.files.extensions);
    let old_files = collect_dir(&args.old_dir, &filter)
        .with_context(|| format!("Failed to read old files from {}", args.old_dir.display()))?;
    let new_files = collect_dir(&args.new_dir, &filter)
        .with_context(|| format!("Failed to read new files from {}", args.new_dir.display()))?;

    let file_match = match match_files(old_files, new_files) {
        Ok(file_match) => file_match,
        Err(err) => {
            let MatchError::NoMatchingFiles {
                unmatched_old,
                unmatched_new,
            } = &err;
            print_unmatched("old", unmatched_old);
            print_unmatched("new", unmatched_new);
            return Err(err.into());
        }
    };

    let options = BatchOptions {
        pipeline: config.pipeline_options(),
        max_digest_chars: config.max_input_chars(),
    };
    let mut gate = summary_gate(&config);
    let batch = run_batch(file_match, &options, &mut gate);

    // The viewer replaces the report unless an output path was asked for
    if !args.view || args.output.is_some() {
        write_report(&batch, &config)?;
    }

    if args.view {
        let mut app = App::new(batch, config.report.title.clone());
        app.theme = config.theme.resolve();
        app.old_column_percent = config.report.old_column_percent().round() as u16;
        run_viewer(&mut app)?;
    }

    Ok(())
}

fn run_viewer(app: &mut App) -> Result<()> {
    let _mute = logging::MuteGuard::new();

    enable_raw_mode()?;
    let mut terminal = match open_terminal() {
        Ok(terminal) => terminal,
        Err(err) => {
            // Leave the shell usable even when setup fails halfway
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            let _ = disable_raw_mode();
            return Err(err);
        }
    };

    let result = run_app(&mut terminal, app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn open_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press && app.handle_key(key) == Control::Quit {
                return Ok(());
            }
        }
    }
}
