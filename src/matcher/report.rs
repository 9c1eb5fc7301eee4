use crate::album::AlbumMetadata;

/// Shown in place of a file name for tracks still waiting on a match.
pub const UNMATCHED: &str = "*** UNMATCHED ***";

/// Shown in place of a similarity score for tracks still waiting on a match.
pub const NO_SCORE: &str = "-";

/// One row of the match table.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub disc: u32,
    pub number: u32,
    pub track_name: String,
    pub file_name: Option<String>,
    pub score: Option<f64>,
}

/// Format a similarity score, or the placeholder when there is none.
pub fn format_score(score: Option<f64>) -> String {
    match score {
        Some(s) if s.is_finite() => format!("{s:.1}"),
        _ => NO_SCORE.to_string(),
    }
}

/// cd / # / track name / matched file / similarity.
pub fn match_table(rows: &[ReportRow]) -> String {
    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            vec![
                r.disc.to_string(),
                r.number.to_string(),
                r.track_name.clone(),
                r.file_name.clone().unwrap_or_else(|| UNMATCHED.to_string()),
                format_score(r.score),
            ]
        })
        .collect();
    render(
        &["cd", "#", "track name", "matched file", "similarity"],
        &[true, true, false, false, true],
        &body,
    )
}

/// Full album listing shown before assigning files by hand.
pub fn track_listing(album: &AlbumMetadata) -> String {
    let body: Vec<Vec<String>> = album
        .tracks
        .iter()
        .map(|t| {
            vec![
                t.disc.to_string(),
                t.number.to_string(),
                t.name.clone(),
                album.track_artists(t).join(", "),
            ]
        })
        .collect();
    let table = render(
        &["cd", "#", "track name", "track artists"],
        &[true, true, false, false],
        &body,
    );
    format!("{} - {}\n\n{}", album.name, album.artists_joined(), table)
}

/// Tracks and files left over after auto-matching, side by side.
pub fn unmatched_table(tracks: &[&str], files: &[&str]) -> String {
    let len = tracks.len().max(files.len());
    let body: Vec<Vec<String>> = (0..len)
        .map(|i| {
            vec![
                tracks.get(i).copied().unwrap_or_default().to_string(),
                files.get(i).copied().unwrap_or_default().to_string(),
            ]
        })
        .collect();
    render(&["Unmatched tracks", "Unmatched files"], &[false, false], &body)
}

/// Plain-text table with a dashed rule under the header. `right` marks
/// right-aligned columns.
fn render(headers: &[&str], right: &[bool], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let line = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .zip(right)
            .map(|((cell, &w), &r)| {
                if r {
                    format!("{cell:>w$}")
                } else {
                    format!("{cell:<w$}")
                }
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = Vec::with_capacity(rows.len() + 2);
    out.push(line(headers.to_vec()));
    out.push(
        widths
            .iter()
            .map(|&w| "-".repeat(w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    for row in rows {
        out.push(line(row.iter().map(String::as_str).collect()));
    }
    out.join("\n")
}
