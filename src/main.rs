use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use std::path::PathBuf;
use trackmatch::config::AppConfig;
use trackmatch::matcher::ConsolePrompter;
use trackmatch::naming::NamePattern;
use trackmatch::pipeline::{self, Outcome, RunOptions};
use trackmatch::scanner::MatchMode;
use trackmatch::tagger::Cover;

#[derive(Parser)]
#[command(
    name = "trackmatch",
    version,
    about = "Match audio files to an album's track listing, then tag and rename them",
    override_usage = "trackmatch [OPTIONS] <SOURCE> [DEST] <ALBUM>"
)]
struct Cli {
    /// Folder of audio files, or a zip archive with --extract
    source: PathBuf,

    /// Extraction destination (with --extract), otherwise the album reference
    #[arg(value_name = "DEST|ALBUM")]
    second: String,

    /// Album reference: an Apple Music album URL or a local album JSON file
    #[arg(value_name = "ALBUM")]
    album: Option<String>,

    /// Extract SOURCE as a zip archive into DEST first
    #[arg(short = 'x', long)]
    extract: bool,

    /// Match against the titles embedded in the files instead of file names
    #[arg(short = 't', long)]
    match_title: bool,

    /// Keep the album folder name
    #[arg(short = 'a', long)]
    preserve_album: bool,

    /// Keep the song file names
    #[arg(short = 's', long)]
    preserve_songs: bool,

    /// Album folder name pattern (default "%a")
    #[arg(long, value_name = "PATTERN")]
    album_pattern: Option<String>,

    /// Song file name pattern, without extension (default "%t")
    #[arg(long, value_name = "PATTERN")]
    song_pattern: Option<String>,

    /// Match and print the planned changes without writing anything
    #[arg(long)]
    dry_run: bool,

    /// Answer yes to every confirmation (track choices are still asked)
    #[arg(short = 'y', long)]
    yes: bool,

    /// Config file to use instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,

    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Split the positionals into (destination, album reference).
    fn targets(&self) -> (Option<PathBuf>, String) {
        match (&self.album, self.extract) {
            (Some(album), true) => (Some(PathBuf::from(&self.second)), album.clone()),
            (None, false) => (None, self.second.clone()),
            (None, true) => Cli::command()
                .error(
                    ErrorKind::MissingRequiredArgument,
                    "--extract needs both DEST and ALBUM",
                )
                .exit(),
            (Some(_), false) => Cli::command()
                .error(
                    ErrorKind::ArgumentConflict,
                    "DEST is only accepted together with --extract",
                )
                .exit(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    let (dest, album_ref) = cli.targets();

    // Load config file (optional, defaults if missing)
    let config = AppConfig::load(cli.config.as_deref());

    // Patterns: CLI > config > default
    let album_pattern = NamePattern::new(cli.album_pattern.unwrap_or(config.album_pattern))
        .context("Invalid album pattern")?;
    let song_pattern = NamePattern::new(cli.song_pattern.unwrap_or(config.song_pattern))
        .context("Invalid song pattern")?;

    let options = RunOptions {
        source: cli.source,
        extract_to: dest,
        match_mode: if cli.match_title {
            MatchMode::Title
        } else {
            config.match_by
        },
        extensions: config.extensions,
        album_pattern,
        song_pattern,
        preserve_album: cli.preserve_album,
        preserve_songs: cli.preserve_songs,
        dry_run: cli.dry_run,
        offer_archive_delete: !cli.yes,
    };

    let user_agent = config.user_agent;
    let source = trackmatch::source::for_reference(&album_ref, &user_agent);
    let fetch_cover = |url: &str| Cover::fetch(url, &user_agent);
    let mut prompter = ConsolePrompter::stdio(cli.yes);

    match pipeline::run(&options, source.as_ref(), &fetch_cover, &mut prompter)? {
        Outcome::Completed(summary) => {
            println!();
            println!(
                "Done! Tagged {} files and renamed {}.",
                summary.tagged, summary.renamed
            );
            println!("Album folder: {}", summary.album_dir.display());
            if summary.archive_deleted {
                println!("Deleted {}", options.source.display());
            }
        }
        Outcome::DryRun => {
            println!();
            println!("Dry run, no files were changed.");
        }
        Outcome::Aborted => {
            println!("Aborted, no files were changed.");
        }
    }

    Ok(())
}
