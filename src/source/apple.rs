use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use super::{MetadataSource, Result, SourceError};
use crate::album::AlbumMetadata;

static TITLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".headings__title").unwrap());
static SUBTITLES: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".headings__subtitles").unwrap());
static COVER: LazyLock<Selector> = LazyLock::new(|| Selector::parse("picture > source").unwrap());
static GENRE_YEAR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".headings__metadata-bottom").unwrap());
static DISC: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".songs-list").unwrap());
static ROW: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".songs-list-row__song-name-wrapper").unwrap());
static SONG_NAME: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".songs-list-row__song-name").unwrap());
static BY_LINE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".songs-list-row__by-line").unwrap());
static LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").unwrap());

/// Separator between genre and year in the album header.
const META_SEPARATOR: &str = "\u{2004}·\u{2004}";

/// Artwork size in the page markup, and the size we embed instead.
const THUMB_SIZE: &str = "296x296bb";
const COVER_SIZE: &str = "512x512bb";

/// Album page on the Apple Music web player.
pub struct AppleMusicSource {
    url: String,
    user_agent: String,
}

impl AppleMusicSource {
    pub fn new(url: &str, user_agent: &str) -> Self {
        Self {
            url: url.to_string(),
            user_agent: user_agent.to_string(),
        }
    }

    fn fetch_page(&self) -> Result<String> {
        log::debug!("Fetching {}", self.url);
        let http_err = |source| SourceError::Http {
            url: self.url.clone(),
            source,
        };
        ureq::get(&self.url)
            .header("User-Agent", &self.user_agent)
            .call()
            .map_err(http_err)?
            .body_mut()
            .read_to_string()
            .map_err(http_err)
    }
}

impl MetadataSource for AppleMusicSource {
    fn fetch(&self) -> Result<AlbumMetadata> {
        let html = self.fetch_page()?;
        let album = parse_album_page(&html, &self.url)?;
        log::info!(
            "Scraped \"{}\" with {} tracks on {} disc(s)",
            album.name,
            album.tracks.len(),
            album.tracks.last().map_or(0, |t| t.total_discs)
        );
        Ok(album)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Extract album metadata from an album page. Every field is required.
pub fn parse_album_page(html: &str, url: &str) -> Result<AlbumMetadata> {
    let doc = Html::parse_document(html);
    let missing = |field| SourceError::MissingField {
        url: url.to_string(),
        field,
    };

    let name = doc
        .select(&TITLE)
        .next()
        .map(text_of)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| missing("the album title"))?;

    let artists: Vec<String> = doc.select(&SUBTITLES).flat_map(link_texts).collect();
    if artists.is_empty() {
        return Err(missing("the album artists"));
    }

    let cover = doc
        .select(&COVER)
        .nth(1)
        .and_then(|el| el.value().attr("srcset"))
        .and_then(|srcset| srcset.split_whitespace().next())
        .map(|src| src.replace(THUMB_SIZE, COVER_SIZE))
        .ok_or_else(|| missing("the cover art"))?;

    // Raw text: the separator is made of Unicode spaces
    let meta: String = doc
        .select(&GENRE_YEAR)
        .next()
        .map(|el| el.text().collect())
        .ok_or_else(|| missing("the genre and year"))?;
    let mut parts = meta.split(META_SEPARATOR).map(str::trim);
    let genre = parts
        .next()
        .filter(|g| !g.is_empty())
        .map(title_case)
        .ok_or_else(|| missing("the genre"))?;
    let year = parts
        .next()
        .filter(|y| !y.is_empty())
        .map(str::to_string)
        .ok_or_else(|| missing("the year"))?;

    let discs: Vec<Vec<(String, Vec<String>)>> = doc
        .select(&DISC)
        .map(|disc| {
            disc.select(&ROW)
                .map(|row| {
                    let name = row.select(&SONG_NAME).next().map(text_of).unwrap_or_default();
                    let artists = row.select(&BY_LINE).flat_map(link_texts).collect();
                    (name, artists)
                })
                .collect()
        })
        .collect();
    if discs.is_empty() || discs.iter().any(Vec::is_empty) {
        return Err(missing("the track listing"));
    }
    if discs.iter().flatten().any(|(name, _)| name.is_empty()) {
        return Err(missing("a track name"));
    }

    let album = AlbumMetadata::from_discs(name, artists, cover, genre, year, discs);
    album.validate()?;
    Ok(album)
}

/// Element text with whitespace collapsed.
fn text_of(el: ElementRef<'_>) -> String {
    el.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text of each link inside `el`, or the element's own text when it has no links.
fn link_texts(el: ElementRef<'_>) -> Vec<String> {
    let links: Vec<String> = el
        .select(&LINK)
        .map(text_of)
        .filter(|s| !s.is_empty())
        .collect();
    if !links.is_empty() {
        return links;
    }
    let own = text_of(el);
    if own.is_empty() { Vec::new() } else { vec![own] }
}

/// Capitalize the first letter of every word and lowercase the rest.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}
