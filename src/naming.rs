//! Output names from naming patterns.
//!
//! A pattern is literal text with two-character placeholders:
//!
//! | token | value |
//! |-------|-------|
//! | `%a` | album name |
//! | `%A` | album artists, joined with ", " |
//! | `%g` | genre |
//! | `%y` | year |
//! | `%t` | track name |
//! | `%r` | track artists, joined with ", " |
//! | `%n` | track number, two digits |
//! | `%d` | disc number |
//!
//! Anything else, including `%` followed by another character, is copied as is.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::album::{AlbumMetadata, Track};

#[derive(Error, Debug)]
pub enum NamingError {
    #[error("Naming pattern must not be empty")]
    EmptyPattern,
    #[error("Pattern \"{pattern}\" produces an empty name")]
    EmptyName { pattern: String },
    #[error("\"{first}\" and \"{second}\" would both be renamed to \"{name}\"")]
    Collision {
        first: String,
        second: String,
        name: String,
    },
    #[error("Cannot rename \"{source_name}\": \"{name}\" already exists")]
    TargetExists { source_name: String, name: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, NamingError>;

/// Characters that cannot appear in a path segment on common filesystems.
static ILLEGAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[<>:"/\\|?*\x00-\x1F]"#).unwrap());

/// A validated, non-empty naming pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamePattern(String);

impl NamePattern {
    pub fn new(pattern: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into();
        if pattern.is_empty() {
            return Err(NamingError::EmptyPattern);
        }
        Ok(Self(pattern))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Expand and sanitize into a path segment.
    pub fn render(&self, album: &AlbumMetadata, track: Option<&Track>) -> Result<String> {
        let name = sanitize(&expand(&self.0, album, track));
        if name.is_empty() {
            return Err(NamingError::EmptyName {
                pattern: self.0.clone(),
            });
        }
        Ok(name)
    }
}

/// Substitute every recognized token in a single left-to-right pass, so text
/// coming from the metadata is never expanded again. Track tokens are left
/// untouched when there is no track.
pub fn expand(pattern: &str, album: &AlbumMetadata, track: Option<&Track>) -> String {
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut chars = pattern.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        let Some(&key) = chars.peek() else {
            out.push(c);
            break;
        };
        match value_for(key, album, track) {
            Some(value) => {
                out.push_str(&value);
                chars.next();
            }
            None => out.push(c),
        }
    }
    out
}

fn value_for(key: char, album: &AlbumMetadata, track: Option<&Track>) -> Option<String> {
    let value = match key {
        'a' => album.name.clone(),
        'A' => album.artists_joined(),
        'g' => album.genre.clone(),
        'y' => album.year.clone(),
        't' => track?.name.clone(),
        'r' => album.track_artists(track?).join(", "),
        'n' => format!("{:02}", track?.number),
        'd' => track?.disc.to_string(),
        _ => return None,
    };
    Some(value)
}

/// Strip characters illegal in a path segment and collapse whitespace.
pub fn sanitize(name: &str) -> String {
    ILLEGAL
        .replace_all(name, "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// A single file move within one directory.
#[derive(Debug, Clone, PartialEq)]
pub struct Rename {
    pub from: PathBuf,
    pub to: PathBuf,
}

/// A batch of renames in one directory, checked for collisions as a whole.
#[derive(Debug, Default)]
pub struct RenamePlan {
    renames: Vec<Rename>,
}

impl RenamePlan {
    /// Plan `(source path, new file name)` moves inside `dir`.
    ///
    /// Fails without touching anything if two sources would get the same name
    /// (compared case-insensitively) or a target already exists and is not
    /// itself being renamed away.
    pub fn new(dir: &Path, moves: Vec<(PathBuf, String)>) -> Result<Self> {
        let mut claimed: HashMap<String, &Path> = HashMap::new();
        for (from, name) in &moves {
            if let Some(first) = claimed.insert(name.to_lowercase(), from) {
                return Err(NamingError::Collision {
                    first: display_name(first),
                    second: display_name(from),
                    name: name.clone(),
                });
            }
        }

        let sources: Vec<String> = moves
            .iter()
            .filter_map(|(from, _)| from.file_name())
            .map(|f| f.to_string_lossy().to_lowercase())
            .collect();

        let mut renames = Vec::with_capacity(moves.len());
        for (from, name) in moves {
            let to = dir.join(&name);
            if to.exists() && !sources.contains(&name.to_lowercase()) {
                return Err(NamingError::TargetExists {
                    source_name: display_name(&from),
                    name,
                });
            }
            if from != to {
                renames.push(Rename { from, to });
            }
        }

        Ok(Self { renames })
    }

    pub fn renames(&self) -> &[Rename] {
        &self.renames
    }

    pub fn is_empty(&self) -> bool {
        self.renames.is_empty()
    }

    /// Move every file to a temporary name first, then to its target, so
    /// swaps and chains inside the batch never overwrite each other.
    ///
    /// If any move fails, every file already moved is put back under its
    /// original name before the error is returned.
    pub fn apply(&self) -> Result<usize> {
        let temps: Vec<PathBuf> = self
            .renames
            .iter()
            .enumerate()
            .map(|(i, rename)| {
                let dir = rename.from.parent().unwrap_or_else(|| Path::new("."));
                dir.join(format!(".trackmatch-rename-{}-{i}", std::process::id()))
            })
            .collect();

        for (i, rename) in self.renames.iter().enumerate() {
            if let Err(e) = fs::rename(&rename.from, &temps[i]) {
                self.roll_back(&temps, i, 0);
                return Err(e.into());
            }
        }
        for (i, rename) in self.renames.iter().enumerate() {
            if let Err(e) = fs::rename(&temps[i], &rename.to) {
                self.roll_back(&temps, self.renames.len(), i);
                return Err(e.into());
            }
            log::debug!("Renamed to {}", rename.to.display());
        }
        Ok(self.renames.len())
    }

    /// Undo a partial `apply`: the first `staged` files were moved to their
    /// temporary names, and the first `placed` of those went on to their
    /// targets. Targets go back to temporary names first so no original name
    /// is still occupied when the temporaries return.
    fn roll_back(&self, temps: &[PathBuf], staged: usize, placed: usize) {
        for (rename, temp) in self.renames.iter().zip(temps).take(placed) {
            if let Err(e) = fs::rename(&rename.to, temp) {
                log::warn!("Could not undo rename of {}: {}", rename.to.display(), e);
            }
        }
        for (rename, temp) in self.renames.iter().zip(temps).take(staged) {
            match fs::rename(temp, &rename.from) {
                Ok(()) => log::debug!("Restored {}", rename.from.display()),
                Err(e) => log::warn!(
                    "Could not restore {} from {}: {}",
                    rename.from.display(),
                    temp.display(),
                    e
                ),
            }
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
