use rapidfuzz::distance::indel;

/// Best alignment of the shorter string inside the longer one, scored 0-100.
///
/// Both inputs are normalized first (lowercase, punctuation and runs of
/// whitespace collapsed to a single space). The shorter string is slid across
/// the longer one, including partial overlaps at either end, and each window is
/// scored with the normalized indel similarity. 100 means the shorter string
/// occurs verbatim inside the longer one.
pub fn score(a: &str, b: &str) -> f64 {
    let a: Vec<char> = normalize(a).chars().collect();
    let b: Vec<char> = normalize(b).chars().collect();

    if a.is_empty() && b.is_empty() {
        return 100.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let best = if a.len() < b.len() {
        best_window(&a, &b)
    } else if a.len() > b.len() {
        best_window(&b, &a)
    } else {
        best_window(&a, &b).max(best_window(&b, &a))
    };
    best * 100.0
}

/// Lowercase, replace non-alphanumerics with spaces, collapse whitespace.
pub fn normalize(s: &str) -> String {
    let replaced: String = s
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .flat_map(char::to_lowercase)
        .collect();
    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Highest similarity between `short` and any window of `long`.
fn best_window(short: &[char], long: &[char]) -> f64 {
    let m = short.len();
    let n = long.len();
    let mut best = 0.0_f64;

    let mut consider = |window: &[char]| {
        let sim = indel::normalized_similarity(short.iter().copied(), window.iter().copied());
        if sim > best {
            best = sim;
        }
    };

    // Windows hanging off the left edge
    for end in 1..m {
        consider(&long[..end]);
    }
    // Full-width windows
    for start in 0..=(n - m) {
        consider(&long[start..start + m]);
    }
    // Windows hanging off the right edge
    for start in (n - m + 1)..n {
        consider(&long[start..]);
    }

    best
}

/// Candidate x track table of similarity scores.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreMatrix {
    rows: usize,
    cols: usize,
    scores: Vec<f64>,
}

impl ScoreMatrix {
    /// Score every label against every track name. No pair is skipped.
    pub fn compute<L, T>(labels: &[L], tracks: &[T]) -> Self
    where
        L: AsRef<str>,
        T: AsRef<str>,
    {
        let mut scores = Vec::with_capacity(labels.len() * tracks.len());
        for label in labels {
            for track in tracks {
                scores.push(score(label.as_ref(), track.as_ref()));
            }
        }
        log::debug!("Scored {} labels against {} tracks", labels.len(), tracks.len());

        Self {
            rows: labels.len(),
            cols: tracks.len(),
            scores,
        }
    }

    /// Build a matrix from precomputed rows. All rows must have equal length.
    #[cfg(test)]
    pub(crate) fn from_rows(rows: Vec<Vec<f64>>) -> Self {
        let cols = rows.first().map_or(0, Vec::len);
        assert!(rows.iter().all(|r| r.len() == cols), "ragged score matrix");
        Self {
            rows: rows.len(),
            cols,
            scores: rows.into_iter().flatten().collect(),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.scores[row * self.cols + col]
    }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.scores[row * self.cols..(row + 1) * self.cols]
    }

    /// Column index of the highest score in `row`, with its score. Ties go to
    /// the lowest index. `None` when there are no columns.
    pub fn best_guess(&self, row: usize) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for (col, &s) in self.row(row).iter().enumerate() {
            match best {
                Some((_, b)) if s <= b => {}
                _ => best = Some((col, s)),
            }
        }
        best
    }

    /// Best guess for every row, in row order.
    pub fn best_guesses(&self) -> Vec<(usize, f64)> {
        (0..self.rows).filter_map(|r| self.best_guess(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  01 -  Rain_Song.MP3 "), "01 rain song mp3");
        assert_eq!(normalize("Ça  Va"), "ça va");
        assert_eq!(normalize("!!!"), "");
    }

    #[test]
    fn test_contained_scores_full() {
        assert!(close(score("Rain", "03 - Rain"), 100.0));
        assert!(close(score("03 - rain", "RAIN"), 100.0));
        assert!(close(score("Track  One", "track one"), 100.0));
    }

    #[test]
    fn test_no_resemblance_scores_zero() {
        assert!(close(score("abc", "xyz"), 0.0));
        assert!(close(score("", "xyz"), 0.0));
        assert!(close(score("", ""), 100.0));
    }

    #[test]
    fn test_partial_overlap_at_edge() {
        // "track" is a prefix of both names; the 8-char label overlaps it at the left edge
        let one = score("02 Track", "Track One");
        let two = score("02 Track", "Track Two");
        assert!(close(one, two));
        assert!(one > 70.0 && one < 80.0);
    }

    #[test]
    fn test_scores_in_range() {
        for (a, b) in [("hello world", "world"), ("kitten", "sitting"), ("a", "bbbb")] {
            let s = score(a, b);
            assert!((0.0..=100.0).contains(&s), "{a} / {b} -> {s}");
        }
    }

    #[test]
    fn test_matrix_computes_every_pair() {
        let m = ScoreMatrix::compute(&["Rain", "Sun"], &["Rain", "Rain Again", "Sunrise"]);
        assert_eq!((m.rows(), m.cols()), (2, 3));
        assert!(close(m.get(0, 0), 100.0));
        assert!(close(m.get(0, 1), 100.0));
        assert!(close(m.get(1, 2), 100.0));
    }

    #[test]
    fn test_best_guess_ties_go_to_lowest_index() {
        let m = ScoreMatrix::from_rows(vec![vec![50.0, 90.0, 90.0], vec![10.0, 10.0, 10.0]]);
        assert_eq!(m.best_guess(0), Some((1, 90.0)));
        assert_eq!(m.best_guess(1), Some((0, 10.0)));
        // Repeated calls agree
        assert_eq!(m.best_guesses(), m.best_guesses());
    }

    #[test]
    fn test_best_guess_empty_row() {
        let m = ScoreMatrix::from_rows(vec![vec![]]);
        assert_eq!(m.best_guess(0), None);
    }
}
