use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum AlbumError {
    #[error("Album \"{0}\" has no tracks")]
    NoTracks(String),
    #[error("Track {index} (\"{name}\") is numbered {disc}.{number}, expected {expected_disc}.{expected_number}")]
    Numbering {
        index: usize,
        name: String,
        disc: u32,
        number: u32,
        expected_disc: u32,
        expected_number: u32,
    },
}

/// Album-level metadata. Built once per run by a metadata source and never
/// mutated afterwards.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AlbumMetadata {
    pub name: String,
    /// Display order is preserved.
    pub artists: Vec<String>,
    /// URL of the cover image.
    pub cover: String,
    pub genre: String,
    /// Free-form, not validated as a number.
    pub year: String,
    /// Canonical disc/track order.
    pub tracks: Vec<Track>,
}

/// One slot of the track listing.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Track {
    pub name: String,
    /// 1-based position on its disc.
    pub number: u32,
    /// Tracks on this disc.
    pub total: u32,
    /// 1-based disc number.
    pub disc: u32,
    pub total_discs: u32,
    #[serde(default)]
    pub artists: Vec<String>,
}

impl AlbumMetadata {
    /// Build album metadata from per-disc track listings. Track and disc
    /// numbers are derived from listing order.
    pub fn from_discs(
        name: String,
        artists: Vec<String>,
        cover: String,
        genre: String,
        year: String,
        discs: Vec<Vec<(String, Vec<String>)>>,
    ) -> Self {
        let total_discs = discs.len() as u32;
        let tracks = discs
            .into_iter()
            .enumerate()
            .flat_map(|(d, rows)| {
                let total = rows.len() as u32;
                rows.into_iter()
                    .enumerate()
                    .map(move |(i, (name, artists))| Track {
                        name,
                        number: i as u32 + 1,
                        total,
                        disc: d as u32 + 1,
                        total_discs,
                        artists,
                    })
            })
            .collect();

        Self { name, artists, cover, genre, year, tracks }
    }

    /// Check that the listing is non-empty and numbered contiguously from 1.1.
    pub fn validate(&self) -> Result<(), AlbumError> {
        if self.tracks.is_empty() {
            return Err(AlbumError::NoTracks(self.name.clone()));
        }

        let (mut disc, mut number) = (1, 0);
        for (index, track) in self.tracks.iter().enumerate() {
            if track.disc == disc && track.number == number + 1 {
                number += 1;
            } else if track.disc == disc + 1 && track.number == 1 {
                disc += 1;
                number = 1;
            } else {
                return Err(AlbumError::Numbering {
                    index,
                    name: track.name.clone(),
                    disc: track.disc,
                    number: track.number,
                    expected_disc: disc,
                    expected_number: number + 1,
                });
            }
        }
        Ok(())
    }

    pub fn artists_joined(&self) -> String {
        self.artists.join(", ")
    }

    /// Track artists, falling back to the album artists when the listing has none.
    pub fn track_artists<'a>(&'a self, track: &'a Track) -> &'a [String] {
        if track.artists.is_empty() {
            &self.artists
        } else {
            &track.artists
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::AlbumMetadata;

    /// Single-disc album with the given track names.
    pub fn album(names: &[&str]) -> AlbumMetadata {
        AlbumMetadata::from_discs(
            "Night Songs".into(),
            vec!["The Owls".into(), "Marta K".into()],
            "https://example.com/cover.jpg".into(),
            "Indie".into(),
            "2019".into(),
            vec![names.iter().map(|n| (n.to_string(), vec![])).collect()],
        )
    }
}
