pub mod metadata;

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Could not read directory {path}: {source}")]
    Walk {
        path: String,
        #[source]
        source: walkdir::Error,
    },
    #[error("No audio files found in {0}")]
    NoAudioFiles(String),
}

/// What a file is compared against the track listing by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// File name without its extension.
    #[default]
    Filename,
    /// Title already embedded in the file's tags.
    Title,
}

/// A local audio file waiting to be matched.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// File name including extension. Files found in subfolders of the
    /// scanned folder are shown with their relative path, e.g. `CD2/01.mp3`.
    pub file_name: String,
    /// Text scored against track names.
    pub label: String,
    pub path: PathBuf,
}

impl Candidate {
    pub fn new(path: PathBuf, label: String) -> Self {
        let file_name = path
            .file_name()
            .map(|f| f.to_string_lossy().to_string())
            .unwrap_or_default();
        Self { file_name, label, path }
    }

    /// Candidate labelled by its file stem.
    pub fn by_file_name(path: PathBuf) -> Self {
        let label = file_stem(&path);
        Self::new(path, label)
    }

    /// Candidate labelled by its embedded title, falling back to the file stem.
    pub fn by_title(path: PathBuf) -> Self {
        match metadata::read_title(&path) {
            Some(title) => Self::new(path, title),
            None => {
                log::warn!("{} has no embedded title, matching by file name", path.display());
                Self::by_file_name(path)
            }
        }
    }

    /// Show the file by its path below `root`, so nested files that share a
    /// name stay distinguishable.
    fn shown_relative_to(mut self, root: &Path) -> Self {
        if let Ok(rel) = self.path.strip_prefix(root) {
            self.file_name = rel.to_string_lossy().to_string();
        }
        self
    }

    /// Point at the file's new location after it was moved, keeping its label.
    pub fn relocate(&mut self, path: PathBuf) {
        self.file_name = path
            .file_name()
            .map(|f| f.to_string_lossy().to_string())
            .unwrap_or_default();
        self.path = path;
    }

    pub fn extension(&self) -> String {
        self.path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase()
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Collect the audio files anywhere below `dir`, sorted by file name.
/// Hidden files and directories are skipped.
pub fn load_candidates(
    dir: &Path,
    mode: MatchMode,
    extensions: &[String],
) -> std::result::Result<Vec<Candidate>, ScanError> {
    let mut paths = Vec::new();

    let walker = WalkDir::new(dir)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        // Dotfiles such as macOS "._" resource forks
        .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'));
    for entry in walker {
        let entry = entry.map_err(|source| ScanError::Walk {
            path: dir.display().to_string(),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let ext = entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        if extensions.iter().any(|e| e.eq_ignore_ascii_case(&ext)) {
            paths.push(entry.into_path());
        } else {
            log::debug!("Skipping non-audio file {}", entry.path().display());
        }
    }

    if paths.is_empty() {
        return Err(ScanError::NoAudioFiles(dir.display().to_string()));
    }

    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()).then_with(|| a.cmp(b)));

    let candidates: Vec<Candidate> = paths
        .into_iter()
        .map(|p| {
            let candidate = match mode {
                MatchMode::Filename => Candidate::by_file_name(p),
                MatchMode::Title => Candidate::by_title(p),
            };
            candidate.shown_relative_to(dir)
        })
        .collect();

    log::info!("Found {} audio files in {}", candidates.len(), dir.display());
    Ok(candidates)
}
