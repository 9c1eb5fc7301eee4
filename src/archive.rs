use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Zip error in {path}: {source}")]
    Zip {
        path: String,
        #[source]
        source: zip::result::ZipError,
    },
    #[error("Could not walk {path}: {source}")]
    Walk {
        path: String,
        #[source]
        source: walkdir::Error,
    },
}

pub type Result<T> = std::result::Result<T, ArchiveError>;

/// Removes a directory created for this run unless the run completes.
///
/// Directories that existed before the guard was taken are never removed.
#[derive(Debug)]
pub struct ExtractionGuard {
    path: PathBuf,
    created: bool,
    armed: bool,
}

impl ExtractionGuard {
    /// Create `path` (and parents) if needed and start guarding it.
    pub fn create(path: &Path) -> Result<Self> {
        let created = !path.exists();
        fs::create_dir_all(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            created,
            armed: true,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Keep the directory.
    pub fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for ExtractionGuard {
    fn drop(&mut self) {
        if self.armed && self.created && self.path.is_dir() {
            match fs::remove_dir_all(&self.path) {
                Ok(()) => log::info!("Removed {}", self.path.display()),
                Err(e) => log::warn!("Failed to remove {}: {}", self.path.display(), e),
            }
        }
    }
}

/// Extract every entry of a zip archive into `dest`.
pub fn extract_zip(archive: &Path, dest: &Path) -> Result<usize> {
    let zip_err = |source| ArchiveError::Zip {
        path: archive.display().to_string(),
        source,
    };
    let file = fs::File::open(archive)?;
    let mut zip = zip::ZipArchive::new(file).map_err(zip_err)?;
    let count = zip.len();
    zip.extract(dest).map_err(zip_err)?;
    log::info!("Extracted {} entries from {}", count, archive.display());
    Ok(count)
}

/// Move every file below `root` up into `root` itself, then delete the
/// emptied subdirectories. Names that clash get `_` appended to the stem
/// until they are unique. Returns each `(old, new)` path that moved.
pub fn flatten(root: &Path) -> Result<Vec<(PathBuf, PathBuf)>> {
    let mut nested = Vec::new();
    for entry in WalkDir::new(root).min_depth(2).sort_by_file_name() {
        let entry = entry.map_err(|source| ArchiveError::Walk {
            path: root.display().to_string(),
            source,
        })?;
        if entry.file_type().is_file() {
            nested.push(entry.into_path());
        }
    }

    let mut moved = Vec::with_capacity(nested.len());
    for path in nested {
        let target = unique_target(root, &path);
        log::debug!("Moving {} -> {}", path.display(), target.display());
        fs::rename(&path, &target)?;
        moved.push((path, target));
    }

    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            fs::remove_dir_all(entry.path())?;
        }
    }

    if !moved.is_empty() {
        log::info!("Flattened {} nested files into {}", moved.len(), root.display());
    }
    Ok(moved)
}

fn unique_target(root: &Path, path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let mut suffix = String::new();
    loop {
        let candidate = root.join(format!("{stem}{suffix}{ext}"));
        if !candidate.exists() {
            return candidate;
        }
        suffix.push('_');
    }
}
