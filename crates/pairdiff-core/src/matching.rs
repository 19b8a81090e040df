//! Pairing old and new files by name

use rustc_hash::FxHashMap;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MatchError {
    #[error("No matching file names found in both sets")]
    NoMatchingFiles {
        unmatched_old: Vec<String>,
        unmatched_new: Vec<String>,
    },
}

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
    #[error("IO error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DecodeError {
    #[error("{name} is not valid UTF-8 text (invalid byte at offset {offset})")]
    InvalidUtf8 { name: String, offset: usize },
    #[error("{name} could not be read: {reason}")]
    Unreadable { name: String, reason: String },
}

/// Raw contents of one input file, or the reason they could not be read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub name: String,
    pub contents: Result<Vec<u8>, DecodeError>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            contents: Ok(bytes.into()),
        }
    }

    /// A file that was listed but whose contents could not be loaded
    pub fn unreadable(name: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        let name = name.into();
        Self {
            contents: Err(DecodeError::Unreadable {
                name: name.clone(),
                reason: reason.to_string(),
            }),
            name,
        }
    }
}

/// An old/new pair sharing a (case-insensitive) name
#[derive(Debug, Clone)]
pub struct FilePair {
    /// Display name, taken from the old file
    pub name: String,
    pub old: SourceFile,
    pub new: SourceFile,
}

/// Result of pairing two file sets
#[derive(Debug, Clone, Default)]
pub struct FileMatch {
    /// Sorted by lowercase name
    pub pairs: Vec<FilePair>,
    pub unmatched_old: Vec<String>,
    pub unmatched_new: Vec<String>,
}

/// Extension filter applied when scanning directories
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFilter {
    extensions: Vec<String>,
}

impl Default for FileFilter {
    fn default() -> Self {
        Self::extensions(["xml"])
    }
}

impl FileFilter {
    /// Accept files whose extension is one of `extensions` (case-insensitive,
    /// leading dots ignored). An empty list accepts every file.
    pub fn extensions<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|ext| ext.as_ref().trim_start_matches('.').to_ascii_lowercase())
                .filter(|ext| !ext.is_empty())
                .collect(),
        }
    }

    pub fn matches(&self, path: &Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext = ext.to_ascii_lowercase();
                self.extensions.iter().any(|allowed| *allowed == ext)
            })
            .unwrap_or(false)
    }
}

/// Load the regular files directly inside `dir` that pass `filter`.
///
/// Hidden files are skipped. Results are sorted by name. A file that fails
/// to load is still returned, carrying its read error, so the failure stays
/// local to that file; only problems with `dir` itself are errors here.
pub fn collect_dir(dir: &Path, filter: &FileFilter) -> Result<Vec<SourceFile>, ScanError> {
    if !dir.is_dir() {
        return Err(ScanError::NotADirectory(dir.to_path_buf()));
    }

    let io_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source: std::io::Error| ScanError::Io { path, source }
    };

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_err(dir))? {
        let entry = entry.map_err(io_err(dir))?;
        let path = entry.path();

        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            tracing::warn!(path = %path.display(), "skipping file with non UTF-8 name");
            continue;
        };
        if name.starts_with('.') || !path.is_file() || !filter.matches(&path) {
            continue;
        }

        match std::fs::read(&path) {
            Ok(bytes) => files.push(SourceFile::new(name, bytes)),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "cannot read file");
                files.push(SourceFile::unreadable(name, err));
            }
        }
    }

    files.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(files)
}

fn index_by_name(files: Vec<SourceFile>, duplicates: &mut Vec<String>) -> FxHashMap<String, SourceFile> {
    let mut map = FxHashMap::default();
    for file in files {
        let key = file.name.to_lowercase();
        if map.contains_key(&key) {
            tracing::warn!(file = %file.name, "duplicate file name (ignoring case), skipping");
            duplicates.push(file.name);
            continue;
        }
        map.insert(key, file);
    }
    map
}

/// Pair files present in both sets, comparing names case-insensitively.
///
/// Files only present on one side are reported as unmatched. Fails with
/// [`MatchError::NoMatchingFiles`] when no name is shared.
pub fn match_files(old: Vec<SourceFile>, new: Vec<SourceFile>) -> Result<FileMatch, MatchError> {
    let mut unmatched_old = Vec::new();
    let mut unmatched_new = Vec::new();
    let mut old_map = index_by_name(old, &mut unmatched_old);
    let mut new_map = index_by_name(new, &mut unmatched_new);

    let mut keys: Vec<String> = old_map.keys().cloned().collect();
    keys.sort();

    let mut pairs = Vec::new();
    for key in keys {
        let Some(old_file) = old_map.remove(&key) else {
            continue;
        };
        match new_map.remove(&key) {
            Some(new_file) => pairs.push(FilePair {
                name: old_file.name.clone(),
                old: old_file,
                new: new_file,
            }),
            None => unmatched_old.push(old_file.name),
        }
    }
    unmatched_new.extend(new_map.into_values().map(|file| file.name));

    unmatched_old.sort();
    unmatched_new.sort();

    if pairs.is_empty() {
        return Err(MatchError::NoMatchingFiles {
            unmatched_old,
            unmatched_new,
        });
    }

    tracing::info!(
        matched = pairs.len(),
        unmatched_old = unmatched_old.len(),
        unmatched_new = unmatched_new.len(),
        "paired input files"
    );

    Ok(FileMatch {
        pairs,
        unmatched_old,
        unmatched_new,
    })
}

/// Decode file contents as UTF-8 text, dropping a leading byte order mark
pub fn decode(file: &SourceFile) -> Result<String, DecodeError> {
    let bytes = file.contents.as_deref().map_err(Clone::clone)?;
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|err| DecodeError::InvalidUtf8 {
            name: file.name.clone(),
            offset: err.valid_up_to(),
        })
}
