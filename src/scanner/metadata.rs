use lofty::file::TaggedFileExt;
use lofty::prelude::*;
use std::path::Path;

/// Read the embedded title from an audio file. `None` if the file can't be
/// parsed or carries no non-empty title.
pub fn read_title(path: &Path) -> Option<String> {
    let tagged_file = match lofty::read_from_path(path) {
        Ok(f) => f,
        Err(e) => {
            log::debug!("Could not read tags from {}: {}", path.display(), e);
            return None;
        }
    };

    // Try primary tag, then fall back
    let tag = tagged_file
        .primary_tag()
        .or_else(|| tagged_file.first_tag())?;

    tag.title()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
