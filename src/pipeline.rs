//! One run: fetch the album, find the files, match them, then tag and rename.
//!
//! Nothing on disk changes before the final confirmation except the
//! extraction directory, which is removed again on any failure or decline.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use crate::album::AlbumMetadata;
use crate::archive::{self, ExtractionGuard};
use crate::matcher::{self, Mapping, MatchError, Prompter, ScoreMatrix};
use crate::naming::{NamePattern, RenamePlan};
use crate::scanner::{self, Candidate, MatchMode};
use crate::source::MetadataSource;
use crate::tagger::{self, Cover};

/// Everything a run needs besides its collaborators.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Folder of audio files, or a zip archive when `extract_to` is set.
    pub source: PathBuf,
    /// Extraction destination; `None` works on `source` in place.
    pub extract_to: Option<PathBuf>,
    pub match_mode: MatchMode,
    pub extensions: Vec<String>,
    pub album_pattern: NamePattern,
    pub song_pattern: NamePattern,
    pub preserve_album: bool,
    pub preserve_songs: bool,
    pub dry_run: bool,
    /// Ask whether to delete the archive after a successful extract run.
    pub offer_archive_delete: bool,
}

#[derive(Debug, PartialEq)]
pub enum Outcome {
    Completed(Summary),
    /// Matching finished and the plan was printed; nothing was written.
    DryRun,
    /// The user declined at a checkpoint; nothing was written.
    Aborted,
}

#[derive(Debug, PartialEq)]
pub struct Summary {
    pub tagged: usize,
    pub renamed: usize,
    /// Where the album ended up, after any folder rename.
    pub album_dir: PathBuf,
    pub archive_deleted: bool,
}

/// Fetches cover art for a URL. The binary downloads it; tests hand back bytes.
pub type CoverFetcher<'a> = dyn Fn(&str) -> tagger::Result<Cover> + 'a;

pub fn run(
    options: &RunOptions,
    source: &dyn MetadataSource,
    fetch_cover: &CoverFetcher<'_>,
    prompter: &mut dyn Prompter,
) -> Result<Outcome> {
    if !options.source.exists() {
        bail!("Source {} does not exist", options.source.display());
    }
    if options.extract_to.is_none() && !options.source.is_dir() {
        bail!(
            "Source {} is not a folder (use --extract for archives)",
            options.source.display()
        );
    }

    log::info!("Fetching album metadata from {}", source.describe());
    let album = source
        .fetch()
        .with_context(|| format!("Failed to fetch album metadata from {}", source.describe()))?;

    // Dropping the guard on any early return removes what we extracted
    let guard = match &options.extract_to {
        Some(dest) => {
            let guard = ExtractionGuard::create(dest)
                .with_context(|| format!("Failed to create {}", dest.display()))?;
            archive::extract_zip(&options.source, dest).context("Extraction failed")?;
            Some(guard)
        }
        None => None,
    };
    let work_dir =
        std::path::absolute(options.extract_to.as_deref().unwrap_or(options.source.as_path()))?;

    let mut candidates = scanner::load_candidates(&work_dir, options.match_mode, &options.extensions)
        .context("Failed to read audio files")?;
    matcher::check_counts(candidates.len(), album.tracks.len())?;

    let labels: Vec<&str> = candidates.iter().map(|c| c.label.as_str()).collect();
    let names: Vec<&str> = album.tracks.iter().map(|t| t.name.as_str()).collect();
    let matrix = ScoreMatrix::compute(&labels, &names);

    let mapping = match matcher::resolve(&matrix, &candidates, &album, prompter) {
        Ok(mapping) => mapping,
        Err(MatchError::Aborted) => return Ok(Outcome::Aborted),
        Err(e) => return Err(e).context("Matching failed"),
    };

    let song_names = song_names(&mapping, &candidates, &album, options)?;
    let album_target = album_target(&work_dir, &album, options)?;

    if options.dry_run {
        print_plan(&candidates, &song_names, album_target.as_deref());
        return Ok(Outcome::DryRun);
    }

    if !prompter.confirm("Proceed with updating files?")? {
        return Ok(Outcome::Aborted);
    }

    for (from, to) in archive::flatten(&work_dir).context("Failed to flatten folder")? {
        if let Some(c) = candidates.iter_mut().find(|c| c.path == from) {
            c.relocate(to);
        }
    }

    let cover = fetch_cover(&album.cover).context("Failed to fetch cover art")?;
    let tagged = tagger::tag_all(&mapping, &candidates, &album, &cover)
        .context("Failed to write tags")?;

    let renamed = if options.preserve_songs {
        0
    } else {
        rename_songs(&work_dir, &candidates, song_names)?
    };

    if let Some(guard) = guard {
        guard.disarm();
    }

    let album_dir = match album_target {
        Some(target) => rename_album(&work_dir, target)?,
        None => work_dir,
    };

    let archive_deleted = options.extract_to.is_some()
        && options.offer_archive_delete
        && delete_archive(&options.source, prompter)?;

    Ok(Outcome::Completed(Summary {
        tagged,
        renamed,
        album_dir,
        archive_deleted,
    }))
}

/// New file name for every candidate, in candidate order, keeping extensions.
fn song_names(
    mapping: &Mapping,
    candidates: &[Candidate],
    album: &AlbumMetadata,
    options: &RunOptions,
) -> Result<Vec<String>> {
    candidates
        .iter()
        .enumerate()
        .map(|(c, candidate)| -> Result<String> {
            let track = &album.tracks[mapping.track_for(c)];
            let stem = options.song_pattern.render(album, Some(track))?;
            Ok(match candidate.path.extension() {
                Some(ext) => format!("{stem}.{}", ext.to_string_lossy()),
                None => stem,
            })
        })
        .collect()
}

fn album_target(
    work_dir: &Path,
    album: &AlbumMetadata,
    options: &RunOptions,
) -> Result<Option<PathBuf>> {
    if options.preserve_album {
        return Ok(None);
    }
    let name = options.album_pattern.render(album, None)?;
    let target = match work_dir.parent() {
        Some(parent) => parent.join(name),
        None => return Ok(None),
    };
    Ok((target != work_dir).then_some(target))
}

/// Rename every song in one batch. A batch that would collide is skipped as a
/// whole and the files keep their current names.
fn rename_songs(work_dir: &Path, candidates: &[Candidate], names: Vec<String>) -> Result<usize> {
    let moves = candidates.iter().map(|c| c.path.clone()).zip(names).collect();
    let plan = match RenamePlan::new(work_dir, moves) {
        Ok(plan) => plan,
        Err(e) => {
            log::warn!("Song rename batch rejected: {e}");
            println!("Not renaming songs: {e}");
            return Ok(0);
        }
    };
    let renamed = plan.apply().context("Failed to rename songs")?;
    log::info!("Renamed {renamed} songs");
    Ok(renamed)
}

/// Rename the album folder, refusing to replace an existing one.
fn rename_album(work_dir: &Path, target: PathBuf) -> Result<PathBuf> {
    // A case-only change reports the target as existing on case-insensitive filesystems
    let same_name = work_dir
        .file_name()
        .zip(target.file_name())
        .is_some_and(|(a, b)| a.to_string_lossy().to_lowercase() == b.to_string_lossy().to_lowercase());
    if target.exists() && !same_name {
        log::warn!("Album folder {} already exists", target.display());
        println!(
            "Not renaming album folder: {} already exists",
            target.display()
        );
        return Ok(work_dir.to_path_buf());
    }
    std::fs::rename(work_dir, &target).with_context(|| {
        format!(
            "Failed to rename {} to {}",
            work_dir.display(),
            target.display()
        )
    })?;
    log::info!("Renamed album folder to {}", target.display());
    Ok(target)
}

fn delete_archive(archive: &Path, prompter: &mut dyn Prompter) -> Result<bool> {
    let question = format!("Delete the original archive {}?", archive.display());
    if !prompter.confirm(&question)? {
        return Ok(false);
    }
    std::fs::remove_file(archive)
        .with_context(|| format!("Failed to delete {}", archive.display()))?;
    Ok(true)
}

fn print_plan(candidates: &[Candidate], song_names: &[String], album_target: Option<&Path>) {
    println!();
    println!("Dry run, planned changes:");
    for (candidate, name) in candidates.iter().zip(song_names) {
        println!("  {} -> {}", candidate.file_name, name);
    }
    if let Some(target) = album_target {
        println!("  album folder -> {}", target.display());
    }
}
