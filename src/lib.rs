pub mod album;
pub mod archive;
pub mod config;
pub mod matcher;
pub mod naming;
pub mod pipeline;
pub mod scanner;
pub mod source;
pub mod tagger;

/// Audio file extensions we can tag
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "mp3", "flac", "ogg", "opus", "wav",
    "m4a", "aif", "aiff",
];

/// Application name for XDG paths
pub const APP_NAME: &str = "trackmatch";
