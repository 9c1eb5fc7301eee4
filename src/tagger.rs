use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use lofty::config::WriteOptions;
use lofty::picture::{MimeType, Picture, PictureType};
use lofty::prelude::*;
use lofty::tag::{Tag, TagType};
use thiserror::Error;

use crate::album::{AlbumMetadata, Track};
use crate::matcher::Mapping;
use crate::scanner::Candidate;

#[derive(Error, Debug)]
pub enum TagError {
    #[error("Tag error for {path}: {source}")]
    Lofty {
        path: String,
        #[source]
        source: lofty::error::LoftyError,
    },
    #[error("Could not create a tag for {0}")]
    NoTag(String),
    #[error("Cover download from {url} failed: {source}")]
    Cover {
        url: String,
        #[source]
        source: ureq::Error,
    },
}

pub type Result<T> = std::result::Result<T, TagError>;

/// Front cover image, downloaded once and embedded in every file.
#[derive(Debug, Clone)]
pub struct Cover {
    pub data: Vec<u8>,
    pub mime: MimeType,
}

impl Cover {
    pub fn from_bytes(data: Vec<u8>) -> Self {
        let mime = sniff_mime(&data);
        Self { data, mime }
    }

    pub fn fetch(url: &str, user_agent: &str) -> Result<Self> {
        log::debug!("Fetching cover {url}");
        let cover_err = |source| TagError::Cover {
            url: url.to_string(),
            source,
        };
        let data = ureq::get(url)
            .header("User-Agent", user_agent)
            .call()
            .map_err(cover_err)?
            .body_mut()
            .read_to_vec()
            .map_err(cover_err)?;
        log::info!("Downloaded cover art ({} bytes)", data.len());
        Ok(Self::from_bytes(data))
    }

    fn picture(&self) -> Picture {
        Picture::new_unchecked(
            PictureType::CoverFront,
            Some(self.mime.clone()),
            Some("Cover".to_string()),
            self.data.clone(),
        )
    }
}

fn sniff_mime(data: &[u8]) -> MimeType {
    match data {
        [0x89, b'P', b'N', b'G', ..] => MimeType::Png,
        [b'G', b'I', b'F', ..] => MimeType::Gif,
        [b'B', b'M', ..] => MimeType::Bmp,
        _ => MimeType::Jpeg,
    }
}

/// Write album, track and cover tags to one file and save it.
pub fn write_track_tags(path: &Path, album: &AlbumMetadata, track: &Track, cover: &Cover) -> Result<()> {
    let lofty_err = |source| TagError::Lofty {
        path: path.display().to_string(),
        source,
    };
    let mut tagged_file = lofty::read_from_path(path).map_err(lofty_err)?;

    let mut tag_type = tagged_file.primary_tag_type();
    if tagged_file.tag(tag_type).is_none() {
        if let Some(tag) = tagged_file.first_tag() {
            tag_type = tag.tag_type();
        } else if let Some(default) = default_tag_type(path) {
            tag_type = default;
        }
    }
    if tagged_file.tag(tag_type).is_none() {
        tagged_file.insert_tag(Tag::new(tag_type));
    }
    let tag = tagged_file
        .tag_mut(tag_type)
        .ok_or_else(|| TagError::NoTag(path.display().to_string()))?;

    tag.set_album(album.name.clone());
    tag.insert_text(ItemKey::AlbumArtist, album.artists_joined());
    tag.set_genre(album.genre.clone());
    tag.insert_text(ItemKey::Year, album.year.clone());
    tag.set_title(track.name.clone());
    tag.set_artist(album.track_artists(track).join(", "));
    tag.set_track(track.number);
    tag.set_track_total(track.total);
    tag.set_disk(track.disc);
    tag.set_disk_total(track.total_discs);
    tag.remove_picture_type(PictureType::CoverFront);
    tag.push_picture(cover.picture());

    tagged_file
        .save_to_path(path, WriteOptions::default())
        .map_err(lofty_err)?;
    log::debug!("Tagged {} as {}", path.display(), track.name);
    Ok(())
}

/// Tag every mapped file. Stops at the first failure; files already written stay written.
pub fn tag_all(
    mapping: &Mapping,
    candidates: &[Candidate],
    album: &AlbumMetadata,
    cover: &Cover,
) -> Result<usize> {
    let pb = ProgressBar::new(mapping.len() as u64);
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );

    let mut written = 0;
    for (c, t) in mapping.by_track() {
        let candidate = &candidates[c];
        pb.set_message(candidate.file_name.clone());
        if let Err(e) = write_track_tags(&candidate.path, album, &album.tracks[t], cover) {
            pb.abandon_with_message(format!("failed on {}", candidate.file_name));
            return Err(e);
        }
        written += 1;
        pb.inc(1);
    }

    pb.finish_with_message("done");
    Ok(written)
}

fn default_tag_type(path: &Path) -> Option<TagType> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let tag_type = match ext.as_str() {
        "flac" | "ogg" | "oga" | "opus" => TagType::VorbisComments,
        "mp4" | "m4a" | "m4b" | "aac" => TagType::Mp4Ilst,
        _ => TagType::Id3v2,
    };
    Some(tag_type)
}
