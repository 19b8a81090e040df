//! Configuration file support for pairdiff
//!
//! Config file location: `~/.config/pairdiff/config.toml` (XDG_CONFIG_HOME)
//!
//! Example config:
//! ```toml
//! [diff]
//! context = 2
//! algorithm = "histogram"
//!
//! [report]
//! max_rows = 40
//! title = "Version Comparison Report"
//! output = "comparison_report.html"
//! format = "html"
//! column_ratio = [1, 1]
//!
//! [files]
//! extensions = ["xml"]
//!
//! [summary]
//! enabled = false
//! endpoint = "http://localhost:4891/v1"
//! model = "Meta-Llama-3-8B-Instruct.Q4_1.gguf"
//! max_input_chars = 4000
//! max_tokens = 300
//! timeout_secs = 120
//!
//! [theme]
//! removed = "red"
//! added = "green"
//! kept = "gray"
//! header_bg = "gray"
//! header_fg = "#f5f5f5"
//! ```

use crate::color;
use crate::report::ReportFormat;
use anyhow::{Context, Result};
use pairdiff_core::{DiffAlgorithm, PipelineOptions, DEFAULT_CONTEXT, DEFAULT_MAX_DIGEST_CHARS, DEFAULT_MAX_ROWS};
use ratatui::style::Color;
use serde::Deserialize;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

/// Diff configuration
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DiffConfig {
    /// Unchanged lines kept around each change
    pub context: usize,
    pub algorithm: DiffAlgorithm,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            context: DEFAULT_CONTEXT,
            algorithm: DiffAlgorithm::default(),
        }
    }
}

/// Report configuration
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Rows per table page
    pub max_rows: usize,
    pub title: String,
    /// Output path; defaults to `comparison_report.<ext>` in the working directory
    pub output: Option<PathBuf>,
    pub format: ReportFormat,
    /// Relative widths of the old and new columns
    pub column_ratio: [u32; 2],
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            max_rows: DEFAULT_MAX_ROWS.get(),
            title: "Version Comparison Report".to_string(),
            output: None,
            format: ReportFormat::Html,
            column_ratio: [1, 1],
        }
    }
}

impl ReportConfig {
    /// Old column share of the table width, in percent
    pub fn old_column_percent(&self) -> f64 {
        let [old, new] = self.column_ratio;
        if old == 0 && new == 0 {
            return 50.0;
        }
        f64::from(old) * 100.0 / (f64::from(old) + f64::from(new))
    }
}

/// Input file selection
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
    /// Extensions to compare (case-insensitive); empty compares every file
    pub extensions: Vec<String>,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["xml".to_string()],
        }
    }
}

/// Local model summarization
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    pub enabled: bool,
    /// Base URL of an OpenAI-compatible server
    pub endpoint: String,
    pub model: String,
    /// Characters of change text sent per file
    pub max_input_chars: usize,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: "http://localhost:4891/v1".to_string(),
            model: "Meta-Llama-3-8B-Instruct.Q4_1.gguf".to_string(),
            max_input_chars: DEFAULT_MAX_DIGEST_CHARS.get(),
            max_tokens: 300,
            timeout_secs: 120,
        }
    }
}

/// Theme colors: hex (`#rrggbb`) or ANSI names
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub removed: String,
    pub added: String,
    pub kept: String,
    pub header_bg: String,
    pub header_fg: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            removed: "red".to_string(),
            added: "green".to_string(),
            kept: "gray".to_string(),
            header_bg: "gray".to_string(),
            header_fg: "#f5f5f5".to_string(),
        }
    }
}

/// Resolved theme, all ratatui Colors ready to use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedTheme {
    pub removed: Color,
    pub added: Color,
    pub kept: Color,
    pub header_bg: Color,
    pub header_fg: Color,
}

impl Default for ResolvedTheme {
    fn default() -> Self {
        ThemeConfig::default().resolve()
    }
}

impl ThemeConfig {
    /// Resolve to concrete colors. Unparseable values fall back to the defaults.
    pub fn resolve(&self) -> ResolvedTheme {
        let resolve = |key: &str, value: &str, fallback: Color| -> Color {
            color::resolve_color(value).unwrap_or_else(|| {
                tracing::warn!(key, value, "unknown theme color, using default");
                fallback
            })
        };

        ResolvedTheme {
            removed: resolve("removed", &self.removed, Color::Red),
            added: resolve("added", &self.added, Color::Green),
            kept: resolve("kept", &self.kept, Color::Gray),
            header_bg: resolve("header_bg", &self.header_bg, Color::Gray),
            header_fg: resolve("header_fg", &self.header_fg, Color::Rgb(0xf5, 0xf5, 0xf5)),
        }
    }
}

/// Root configuration
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub diff: DiffConfig,
    pub report: ReportConfig,
    pub files: FilesConfig,
    pub summary: SummaryConfig,
    pub theme: ThemeConfig,
}

impl Config {
    /// Get all possible config file paths in priority order
    fn config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
            paths.push(PathBuf::from(xdg).join("pairdiff").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".config").join("pairdiff").join("config.toml"));
        }

        // Platform-specific config dir (~/Library/Application Support on macOS)
        if let Some(config_dir) = dirs::config_dir() {
            let platform_path = config_dir.join("pairdiff").join("config.toml");
            if !paths.contains(&platform_path) {
                paths.push(platform_path);
            }
        }

        paths
    }

    /// Get the first existing config file path
    pub fn config_path() -> Option<PathBuf> {
        Self::config_paths().into_iter().find(|p| p.exists())
    }

    /// Load config from the XDG config path.
    /// Returns default config if the file doesn't exist or can't be parsed.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        match std::fs::read_to_string(&path) {
            Ok(content) => Self::parse(&content, &path),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "cannot read config, using defaults");
                Self::default()
            }
        }
    }

    /// Load an explicitly requested config file. A missing file is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Ok(Self::parse(&content, path))
    }

    fn parse(content: &str, path: &Path) -> Self {
        match toml::from_str(content) {
            Ok(config) => {
                tracing::debug!(path = %path.display(), "loaded config");
                config
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "failed to parse config, using defaults");
                Self::default()
            }
        }
    }

    /// Rows per page; zero is rejected in favor of the default
    pub fn max_rows(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.report.max_rows).unwrap_or_else(|| {
            tracing::warn!("report.max_rows must be at least 1, using {}", DEFAULT_MAX_ROWS);
            DEFAULT_MAX_ROWS
        })
    }

    /// Summarizer input limit; zero is rejected in favor of the default
    pub fn max_input_chars(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.summary.max_input_chars).unwrap_or_else(|| {
            tracing::warn!(
                "summary.max_input_chars must be at least 1, using {}",
                DEFAULT_MAX_DIGEST_CHARS
            );
            DEFAULT_MAX_DIGEST_CHARS
        })
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            context: self.diff.context,
            max_rows: self.max_rows(),
            algorithm: self.diff.algorithm,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.diff.context, 2);
        assert_eq!(config.report.max_rows, 40);
        assert_eq!(config.report.format, ReportFormat::Html);
        assert_eq!(config.files.extensions, vec!["xml"]);
        assert!(!config.summary.enabled);
        assert_eq!(config.summary.max_input_chars, 4000);
        assert_eq!(config.summary.max_tokens, 300);
        assert_eq!(config.report.old_column_percent(), 50.0);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: Config = toml::from_str(
            r##"
            [diff]
            context = 5
            algorithm = "myers"

            [report]
            format = "json"
            column_ratio = [3, 1]

            [theme]
            removed = "#aa0000"
            "##,
        )
        .unwrap();

        assert_eq!(config.diff.context, 5);
        assert_eq!(config.diff.algorithm, DiffAlgorithm::Myers);
        assert_eq!(config.report.format, ReportFormat::Json);
        assert_eq!(config.report.max_rows, 40);
        assert_eq!(config.report.old_column_percent(), 75.0);
        assert_eq!(config.summary.endpoint, "http://localhost:4891/v1");

        let theme = config.theme.resolve();
        assert_eq!(theme.removed, Color::Rgb(0xaa, 0, 0));
        assert_eq!(theme.added, Color::Green);
    }

    #[test]
    fn test_malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[diff\ncontext = ").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.diff.context, 2);
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load_from(&dir.path().join("missing.toml")).is_err());
    }

    #[test]
    fn test_zero_max_rows_uses_default() {
        let mut config = Config::default();
        config.report.max_rows = 0;
        assert_eq!(config.max_rows(), DEFAULT_MAX_ROWS);
        config.report.max_rows = 12;
        assert_eq!(config.pipeline_options().max_rows.get(), 12);
    }

    #[test]
    fn test_zero_max_input_chars_uses_default() {
        let mut config = Config::default();
        config.summary.max_input_chars = 0;
        assert_eq!(config.max_input_chars(), DEFAULT_MAX_DIGEST_CHARS);
        config.summary.max_input_chars = 500;
        assert_eq!(config.max_input_chars().get(), 500);
    }

    #[test]
    fn test_unknown_theme_color_falls_back() {
        let theme = ThemeConfig {
            kept: "not-a-color".to_string(),
            ..ThemeConfig::default()
        };
        assert_eq!(theme.resolve().kept, Color::Gray);
    }
}
