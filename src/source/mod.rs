pub mod apple;

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::album::{AlbumError, AlbumMetadata};

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid album JSON in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("HTTP request for {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: ureq::Error,
    },
    #[error("Album page {url} is missing {field}")]
    MissingField { url: String, field: &'static str },
    #[error(transparent)]
    Album(#[from] AlbumError),
}

pub type Result<T> = std::result::Result<T, SourceError>;

/// Produces the full album listing, or fails. Partial metadata is never returned.
pub trait MetadataSource {
    fn fetch(&self) -> Result<AlbumMetadata>;

    /// Human-readable description for log output.
    fn describe(&self) -> String;
}

/// Album metadata stored as JSON on disk.
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl MetadataSource for JsonFileSource {
    fn fetch(&self) -> Result<AlbumMetadata> {
        let path = self.path.display().to_string();
        let contents = std::fs::read_to_string(&self.path).map_err(|source| SourceError::Io {
            path: path.clone(),
            source,
        })?;
        let album: AlbumMetadata =
            serde_json::from_str(&contents).map_err(|source| SourceError::Json { path, source })?;
        album.validate()?;
        Ok(album)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Pick a source for an album reference: URLs are scraped, anything else is
/// read as a JSON file.
pub fn for_reference(reference: &str, user_agent: &str) -> Box<dyn MetadataSource> {
    if reference.starts_with("http://") || reference.starts_with("https://") {
        Box::new(apple::AppleMusicSource::new(reference, user_agent))
    } else {
        Box::new(JsonFileSource::new(Path::new(reference)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALBUM_JSON: &str = r#"{
        "name": "Night Songs",
        "artists": ["The Owls"],
        "cover": "https://example.com/c.jpg",
        "genre": "Indie",
        "year": "2019",
        "tracks": [
            {"name": "Rain", "number": 1, "total": 2, "disc": 1, "total_discs": 1, "artists": ["The Owls"]},
            {"name": "Sun", "number": 2, "total": 2, "disc": 1, "total_discs": 1}
        ]
    }"#;

    #[test]
    fn test_json_source_reads_album() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("album.json");
        std::fs::write(&path, ALBUM_JSON).unwrap();

        let album = JsonFileSource::new(&path).fetch().unwrap();
        assert_eq!(album.name, "Night Songs");
        assert_eq!(album.tracks.len(), 2);
    }

    #[test]
    fn test_json_source_rejects_bad_numbering() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("album.json");
        std::fs::write(&path, ALBUM_JSON.replace("\"number\": 2", "\"number\": 5")).unwrap();

        assert!(matches!(
            JsonFileSource::new(&path).fetch(),
            Err(SourceError::Album(AlbumError::Numbering { .. }))
        ));
    }

    #[test]
    fn test_json_source_missing_file() {
        assert!(matches!(
            JsonFileSource::new("/nonexistent/album.json").fetch(),
            Err(SourceError::Io { .. })
        ));
    }

    #[test]
    fn test_json_source_incomplete() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("album.json");
        std::fs::write(&path, r#"{"name": "x"}"#).unwrap();
        assert!(matches!(
            JsonFileSource::new(&path).fetch(),
            Err(SourceError::Json { .. })
        ));
    }

    #[test]
    fn test_for_reference() {
        assert!(for_reference("https://music.apple.com/us/album/x/1", "ua")
            .describe()
            .starts_with("https://"));
        assert_eq!(for_reference("album.json", "ua").describe(), "album.json");
    }
}
