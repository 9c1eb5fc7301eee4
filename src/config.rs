use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;

use crate::scanner::MatchMode;

/// Application configuration loaded from TOML config file.
/// All fields have defaults, so the config file is optional.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Pattern for the album folder name.
    pub album_pattern: String,
    /// Pattern for song file names, without extension.
    pub song_pattern: String,
    /// Compare track names against file names or embedded titles.
    pub match_by: MatchMode,
    /// Extensions treated as audio files (case-insensitive, no dot).
    pub extensions: Vec<String>,
    /// User-Agent header for album page and cover requests.
    pub user_agent: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            album_pattern: "%a".to_string(),
            song_pattern: "%t".to_string(),
            match_by: MatchMode::Filename,
            extensions: crate::SUPPORTED_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
            user_agent: format!("{}/{}", crate::APP_NAME, env!("CARGO_PKG_VERSION")),
        }
    }
}

impl AppConfig {
    /// Load config from `override_path`, or `~/.config/trackmatch/config.toml`.
    /// Returns default config if the file doesn't exist.
    /// Logs a warning if the file exists but can't be parsed.
    pub fn load(override_path: Option<&Path>) -> Self {
        let config_path = override_path.map(Path::to_path_buf).or_else(Self::config_path);
        match config_path {
            Some(path) if path.exists() => match std::fs::read_to_string(&path) {
                Ok(contents) => match Self::parse(&contents) {
                    Ok(config) => {
                        log::info!("Loaded config from {}", path.display());
                        config
                    }
                    Err(e) => {
                        log::warn!("Failed to parse {}: {}. Using defaults.", path.display(), e);
                        Self::default()
                    }
                },
                Err(e) => {
                    log::warn!("Failed to read {}: {}. Using defaults.", path.display(), e);
                    Self::default()
                }
            },
            _ => {
                log::debug!("No config file found, using defaults");
                Self::default()
            }
        }
    }

    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Get the config file path.
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", crate::APP_NAME)
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}
