use std::collections::BTreeMap;

use thiserror::Error;

use super::prompt::{PromptError, Prompter, checked_choice};
use super::report::{self, ReportRow};
use super::similarity::ScoreMatrix;
use crate::album::AlbumMetadata;
use crate::scanner::Candidate;

#[derive(Error, Debug)]
pub enum MatchError {
    #[error("There are more audio files ({files}) than songs in the album ({tracks})")]
    CountMismatch { files: usize, tracks: usize },
    #[error("Matching aborted by user")]
    Aborted,
    #[error("Prompt failed: {0}")]
    Prompt(#[from] PromptError),
}

pub type Result<T> = std::result::Result<T, MatchError>;

/// Fail when there are more files than tracks. Runs before any scoring.
pub fn check_counts(files: usize, tracks: usize) -> Result<()> {
    if files > tracks {
        return Err(MatchError::CountMismatch { files, tracks });
    }
    Ok(())
}

/// Final one-to-one assignment of candidates to track indices.
#[derive(Debug, Clone, PartialEq)]
pub struct Mapping {
    /// `track_of[candidate]` is the track index assigned to that candidate.
    track_of: Vec<usize>,
}

impl Mapping {
    /// Build from `(candidate, track)` pairs covering every candidate exactly once.
    fn from_pairs(candidates: usize, pairs: impl IntoIterator<Item = (usize, usize)>) -> Self {
        let mut slots = vec![None; candidates];
        for (candidate, track) in pairs {
            debug_assert!(slots[candidate].is_none(), "candidate {candidate} assigned twice");
            slots[candidate] = Some(track);
        }
        let track_of: Vec<usize> = slots
            .into_iter()
            .enumerate()
            .map(|(c, t)| t.unwrap_or_else(|| unreachable!("candidate {c} left unassigned")))
            .collect();

        let mut seen = track_of.clone();
        seen.sort_unstable();
        seen.dedup();
        debug_assert_eq!(seen.len(), track_of.len(), "track assigned twice");

        Self { track_of }
    }

    pub fn len(&self) -> usize {
        self.track_of.len()
    }

    pub fn is_empty(&self) -> bool {
        self.track_of.is_empty()
    }

    pub fn track_for(&self, candidate: usize) -> usize {
        self.track_of[candidate]
    }

    /// `(candidate, track)` pairs in candidate order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.track_of.iter().copied().enumerate()
    }

    /// `(candidate, track)` pairs in track order.
    pub fn by_track(&self) -> Vec<(usize, usize)> {
        let mut pairs: Vec<_> = self.iter().collect();
        pairs.sort_by_key(|&(_, t)| t);
        pairs
    }

    /// Track indices in `0..tracks` that no candidate maps to.
    pub fn unmapped_tracks(&self, tracks: usize) -> Vec<usize> {
        (0..tracks).filter(|t| !self.track_of.contains(t)).collect()
    }
}

/// State of one track slot in the equal-count regime.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotStatus {
    /// Exactly one candidate picked this track as its best guess.
    Auto { candidate: usize, score: f64 },
    /// No candidate picked this track.
    Omitted,
    /// Several candidates picked this track; all of them went to the pool.
    Duplicate { candidates: Vec<usize> },
    /// Resolved by the user.
    Manual { candidate: usize, score: f64 },
}

impl SlotStatus {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Auto { .. } | Self::Manual { .. })
    }

    pub fn candidate(&self) -> Option<usize> {
        match self {
            Self::Auto { candidate, .. } | Self::Manual { candidate, .. } => Some(*candidate),
            _ => None,
        }
    }

    pub fn score(&self) -> Option<f64> {
        match self {
            Self::Auto { score, .. } | Self::Manual { score, .. } => Some(*score),
            _ => None,
        }
    }
}

/// Auto-matching result when file and track counts are equal.
#[derive(Debug, Clone, PartialEq)]
pub struct EqualPlan {
    /// One slot per track, in track index order.
    slots: Vec<SlotStatus>,
    /// Candidates not yet assigned.
    pool: Vec<usize>,
}

impl EqualPlan {
    /// Group candidates by best guess. A track with exactly one claimant is
    /// matched; everything else is left for manual resolution.
    pub fn build(matrix: &ScoreMatrix) -> Self {
        debug_assert_eq!(matrix.rows(), matrix.cols());

        let mut claims: Vec<Vec<(usize, f64)>> = vec![Vec::new(); matrix.cols()];
        for (candidate, (track, score)) in matrix.best_guesses().into_iter().enumerate() {
            claims[track].push((candidate, score));
        }

        let mut pool = Vec::new();
        let slots = claims
            .into_iter()
            .map(|claimants| match claimants.as_slice() {
                [] => SlotStatus::Omitted,
                [(candidate, score)] => SlotStatus::Auto {
                    candidate: *candidate,
                    score: *score,
                },
                group => {
                    let candidates: Vec<usize> = group.iter().map(|&(c, _)| c).collect();
                    pool.extend(&candidates);
                    SlotStatus::Duplicate { candidates }
                }
            })
            .collect();

        Self { slots, pool }
    }

    pub fn slots(&self) -> &[SlotStatus] {
        &self.slots
    }

    pub fn pool(&self) -> &[usize] {
        &self.pool
    }

    pub fn auto_matched(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| matches!(s, SlotStatus::Auto { .. }))
            .count()
    }

    /// Track indices still waiting for a candidate, in track order.
    pub fn unresolved(&self) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.is_resolved())
            .map(|(t, _)| t)
            .collect()
    }

    /// Ask the user to pick a pool candidate for every unresolved track, in
    /// track order. Each pick leaves the pool, so the result stays one-to-one.
    pub fn resolve(
        self,
        matrix: &ScoreMatrix,
        candidates: &[Candidate],
        album: &AlbumMetadata,
        prompter: &mut dyn Prompter,
    ) -> Result<Self> {
        let unresolved = self.unresolved();
        let Self { mut slots, mut pool } = self;

        for track in unresolved {
            let options: Vec<String> = pool
                .iter()
                .map(|&c| candidates[c].file_name.clone())
                .collect();
            let question = &album.tracks[track].name;
            let pick = prompter.choose(question, &options)?;
            let pick = checked_choice(question, pick, options.len())?;
            let candidate = pool.remove(pick);
            log::debug!(
                "Manually matched {} -> {}",
                candidates[candidate].file_name,
                album.tracks[track].name
            );
            slots[track] = SlotStatus::Manual {
                candidate,
                score: matrix.get(candidate, track),
            };
        }
        debug_assert!(pool.is_empty());

        Ok(Self { slots, pool })
    }

    /// Display rows sorted by disc and track number.
    pub fn report_rows(&self, candidates: &[Candidate], album: &AlbumMetadata) -> Vec<ReportRow> {
        let mut rows: Vec<ReportRow> = self
            .slots
            .iter()
            .enumerate()
            .map(|(t, slot)| {
                let track = &album.tracks[t];
                ReportRow {
                    disc: track.disc,
                    number: track.number,
                    track_name: track.name.clone(),
                    file_name: slot.candidate().map(|c| candidates[c].file_name.clone()),
                    score: slot.score(),
                }
            })
            .collect();
        rows.sort_by_key(|r| (r.disc, r.number));
        rows
    }

    /// Final mapping. `None` while any track is unresolved.
    pub fn into_mapping(self) -> Option<Mapping> {
        let pairs: Option<Vec<(usize, usize)>> = self
            .slots
            .iter()
            .enumerate()
            .map(|(t, s)| s.candidate().map(|c| (c, t)))
            .collect();
        let pairs = pairs?;
        Some(Mapping::from_pairs(pairs.len(), pairs))
    }
}

/// Fewer files than tracks: every file is assigned by hand, in listing order.
/// The best guess is offered as the default when its track is still free;
/// each assigned track is withdrawn from later choices.
pub fn resolve_fewer(
    matrix: &ScoreMatrix,
    candidates: &[Candidate],
    album: &AlbumMetadata,
    prompter: &mut dyn Prompter,
) -> Result<Mapping> {
    let question = format!(
        "There are fewer audio files ({}) than songs in the album ({}). Proceed?",
        candidates.len(),
        album.tracks.len()
    );
    if !prompter.confirm(&question)? {
        return Err(MatchError::Aborted);
    }

    println!();
    println!("{}", report::track_listing(album));
    println!("Input the corresponding track for each of the following files:");

    // Unclaimed tracks keyed by index, so offered choices stay in album order
    let mut free: BTreeMap<usize, &str> = album
        .tracks
        .iter()
        .enumerate()
        .map(|(i, t)| (i, t.name.as_str()))
        .collect();
    let mut pairs = Vec::with_capacity(candidates.len());

    for (c, candidate) in candidates.iter().enumerate() {
        let indices: Vec<usize> = free.keys().copied().collect();
        let options: Vec<String> = free.values().map(|n| n.to_string()).collect();
        let question = format!("{}:", candidate.file_name);

        let guess = matrix
            .best_guess(c)
            .and_then(|(t, _)| indices.iter().position(|&i| i == t));
        let pick = match guess {
            Some(default) => prompter.choose_with_default(&question, &options, default)?,
            None => prompter.choose(&question, &options)?,
        };
        let pick = checked_choice(&question, pick, options.len())?;

        let track = indices[pick];
        free.remove(&track);
        log::debug!("Assigned {} -> {}", candidate.file_name, album.tracks[track].name);
        pairs.push((c, track));
    }

    Ok(Mapping::from_pairs(candidates.len(), pairs))
}

/// Equal counts: auto-match unique best guesses, then have the user settle
/// omitted and duplicated tracks.
pub fn resolve_equal(
    matrix: &ScoreMatrix,
    candidates: &[Candidate],
    album: &AlbumMetadata,
    prompter: &mut dyn Prompter,
) -> Result<Mapping> {
    let plan = EqualPlan::build(matrix);
    let rows = plan.report_rows(candidates, album);

    println!();
    println!("{}", album.name);
    println!(
        "Auto-matched {} out of {} tracks",
        plan.auto_matched(),
        candidates.len()
    );
    println!();
    println!("{}", report::match_table(&rows));

    let plan = if plan.pool().is_empty() {
        plan
    } else {
        let tracks: Vec<&str> = plan
            .unresolved()
            .into_iter()
            .map(|t| album.tracks[t].name.as_str())
            .collect();
        let files: Vec<&str> = plan
            .pool()
            .iter()
            .map(|&c| candidates[c].file_name.as_str())
            .collect();
        println!();
        println!("The following tracks could not be auto-matched:");
        println!();
        println!("{}", report::unmatched_table(&tracks, &files));
        println!("Select the corresponding file for each of the following tracks:");
        println!();

        let resolved = plan.resolve(matrix, candidates, album, prompter)?;
        println!();
        println!("{}", report::match_table(&resolved.report_rows(candidates, album)));
        resolved
    };

    Ok(plan
        .into_mapping()
        .unwrap_or_else(|| unreachable!("every slot is resolved after manual matching")))
}

/// Match candidates to tracks, branching on the file/track count.
pub fn resolve(
    matrix: &ScoreMatrix,
    candidates: &[Candidate],
    album: &AlbumMetadata,
    prompter: &mut dyn Prompter,
) -> Result<Mapping> {
    check_counts(candidates.len(), album.tracks.len())?;
    debug_assert_eq!(matrix.rows(), candidates.len());
    debug_assert_eq!(matrix.cols(), album.tracks.len());

    if candidates.len() < album.tracks.len() {
        resolve_fewer(matrix, candidates, album, prompter)
    } else {
        resolve_equal(matrix, candidates, album, prompter)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::album::fixtures::album;
    use crate::matcher::prompt::Result as PromptResult;
    use crate::matcher::prompt::scripted::{Answer, ScriptedPrompter};
    use crate::matcher::similarity::ScoreMatrix;

    fn candidates(names: &[&str]) -> Vec<Candidate> {
        names
            .iter()
            .map(|n| Candidate::by_file_name(PathBuf::from(n)))
            .collect()
    }

    fn matrix_for(files: &[Candidate], album: &AlbumMetadata) -> ScoreMatrix {
        let labels: Vec<&str> = files.iter().map(|c| c.label.as_str()).collect();
        let names: Vec<&str> = album.tracks.iter().map(|t| t.name.as_str()).collect();
        ScoreMatrix::compute(&labels, &names)
    }

    fn assert_bijection(mapping: &Mapping, n: usize) {
        assert_eq!(mapping.len(), n);
        let mut tracks: Vec<usize> = mapping.iter().map(|(_, t)| t).collect();
        tracks.sort_unstable();
        assert_eq!(tracks, (0..n).collect::<Vec<_>>());
    }

    #[test]
    fn test_more_files_than_tracks_fails() {
        let album = album(&["Track One", "Track Two"]);
        let files = candidates(&["02 Track.mp3", "Track One.mp3", "Track One (live).mp3"]);
        let matrix = ScoreMatrix::from_rows(vec![vec![0.0; 2]; 3]);
        let mut prompter = ScriptedPrompter::default();

        let err = resolve(&matrix, &files, &album, &mut prompter).unwrap_err();
        assert!(matches!(err, MatchError::CountMismatch { files: 3, tracks: 2 }));
        assert!(prompter.asked.is_empty());
    }

    #[test]
    fn test_check_counts() {
        assert!(check_counts(2, 2).is_ok());
        assert!(check_counts(1, 2).is_ok());
        assert!(check_counts(3, 2).is_err());
    }

    #[test]
    fn test_equal_all_auto_matched() {
        let album = album(&["Rain", "Sunrise", "Snowfall"]);
        let files = candidates(&["03 snowfall.mp3", "01 rain.mp3", "02 sunrise.mp3"]);
        let matrix = matrix_for(&files, &album);
        let mut prompter = ScriptedPrompter::default();

        let mapping = resolve(&matrix, &files, &album, &mut prompter).unwrap();
        assert!(prompter.asked.is_empty());
        assert_bijection(&mapping, 3);
        assert_eq!(mapping.track_for(0), 2);
        assert_eq!(mapping.track_for(1), 0);
        assert_eq!(mapping.track_for(2), 1);
    }

    #[test]
    fn test_equal_plan_classifies_slots() {
        // rows: candidates, cols: tracks
        let matrix = ScoreMatrix::from_rows(vec![
            vec![90.0, 10.0, 10.0],
            vec![80.0, 20.0, 10.0],
            vec![10.0, 10.0, 95.0],
        ]);
        let plan = EqualPlan::build(&matrix);
        assert_eq!(
            plan.slots(),
            &[
                SlotStatus::Duplicate { candidates: vec![0, 1] },
                SlotStatus::Omitted,
                SlotStatus::Auto { candidate: 2, score: 95.0 },
            ]
        );
        assert_eq!(plan.pool(), &[0, 1]);
        assert_eq!(plan.unresolved(), vec![0, 1]);
        assert_eq!(plan.auto_matched(), 1);
        assert!(plan.clone().into_mapping().is_none());
    }

    #[test]
    fn test_duplicate_and_omitted_scenario() {
        let album = album(&["Track One", "Track Two"]);
        let files = candidates(&["02 Track.mp3", "Track One.mp3"]);
        let matrix = matrix_for(&files, &album);

        // Both labels score highest against "Track One"; "Track Two" is left unclaimed
        let plan = EqualPlan::build(&matrix);
        assert!(matches!(plan.slots()[0], SlotStatus::Duplicate { .. }));
        assert_eq!(plan.slots()[1], SlotStatus::Omitted);
        assert_eq!(plan.unresolved(), vec![0, 1]);

        let mut prompter = ScriptedPrompter::new([Answer::Pick("Track One.mp3"), Answer::Pick("02 Track.mp3")]);
        let mapping = resolve(&matrix, &files, &album, &mut prompter).unwrap();

        assert_eq!(prompter.asked.len(), 2);
        assert_eq!(prompter.asked[0].0, "Track One");
        assert_eq!(prompter.asked[0].1, vec!["02 Track.mp3", "Track One.mp3"]);
        // After "Track One" is settled, only "02 Track" remains in the pool
        assert_eq!(prompter.asked[1].0, "Track Two");
        assert_eq!(prompter.asked[1].1, vec!["02 Track.mp3"]);

        assert_bijection(&mapping, 2);
        assert_eq!(mapping.track_for(1), 0);
        assert_eq!(mapping.track_for(0), 1);
    }

    #[test]
    fn test_manual_rows_report_real_scores() {
        let album = album(&["A", "B"]);
        let files = candidates(&["x.mp3", "y.mp3"]);
        let matrix = ScoreMatrix::from_rows(vec![vec![60.0, 40.0], vec![70.0, 30.0]]);
        let plan = EqualPlan::build(&matrix);

        let rows = plan.report_rows(&files, &album);
        assert!(rows.iter().all(|r| r.score.is_none() && r.file_name.is_none()));

        let mut prompter = ScriptedPrompter::new([Answer::Pick("y.mp3"), Answer::Pick("x.mp3")]);
        let resolved = plan.resolve(&matrix, &files, &album, &mut prompter).unwrap();
        let rows = resolved.report_rows(&files, &album);
        assert_eq!(rows[0].score, Some(70.0));
        assert_eq!(rows[1].score, Some(40.0));
        assert!(resolved.pool().is_empty());
    }

    #[test]
    fn test_fewer_files_assigns_distinct_tracks() {
        let album = album(&["Rain", "Sunrise", "Snowfall", "Dusk"]);
        let files = candidates(&["rain.mp3", "rain again.mp3"]);
        let matrix = matrix_for(&files, &album);

        let mut prompter = ScriptedPrompter::new([Answer::Yes, Answer::Default, Answer::Pick("Dusk")]);
        let mapping = resolve(&matrix, &files, &album, &mut prompter).unwrap();

        assert_eq!(mapping.track_for(0), 0);
        assert_eq!(mapping.track_for(1), 3);
        assert_eq!(mapping.unmapped_tracks(4), vec![1, 2]);

        // First file is offered every track with its best guess preselected
        let (_, options, default) = &prompter.asked[1];
        assert_eq!(options.len(), 4);
        assert_eq!(*default, Some(0));
        // "Rain" is claimed, so the second file's best guess is not offered
        let (question, options, default) = &prompter.asked[2];
        assert_eq!(question, "rain again.mp3:");
        assert_eq!(options, &vec!["Sunrise", "Snowfall", "Dusk"]);
        assert_eq!(*default, None);
    }

    #[test]
    fn test_fewer_files_default_shifts_with_claims() {
        let album = album(&["Rain", "Sunrise", "Snowfall"]);
        let files = candidates(&["a.mp3", "b.mp3"]);
        let matrix = ScoreMatrix::from_rows(vec![vec![90.0, 0.0, 0.0], vec![0.0, 0.0, 90.0]]);

        let mut prompter = ScriptedPrompter::new([Answer::Yes, Answer::Default, Answer::Default]);
        let mapping = resolve(&matrix, &files, &album, &mut prompter).unwrap();

        // "Snowfall" is option 1 once "Rain" is gone
        assert_eq!(prompter.asked[2].2, Some(1));
        assert_eq!(mapping.track_for(1), 2);
    }

    #[test]
    fn test_fewer_files_declined() {
        let album = album(&["Rain", "Sunrise"]);
        let files = candidates(&["rain.mp3"]);
        let matrix = matrix_for(&files, &album);
        let mut prompter = ScriptedPrompter::new([Answer::No]);

        let err = resolve(&matrix, &files, &album, &mut prompter).unwrap_err();
        assert!(matches!(err, MatchError::Aborted));
        assert_eq!(prompter.asked.len(), 1);
    }

    #[test]
    fn test_prompt_failure_propagates() {
        let album = album(&["A", "B"]);
        let files = candidates(&["x.mp3", "y.mp3"]);
        let matrix = ScoreMatrix::from_rows(vec![vec![60.0, 40.0], vec![70.0, 30.0]]);
        let mut prompter = ScriptedPrompter::default();

        let err = resolve(&matrix, &files, &album, &mut prompter).unwrap_err();
        assert!(matches!(err, MatchError::Prompt(PromptError::Closed)));
    }

    #[test]
    fn test_out_of_range_choice_is_rejected() {
        let album2 = album(&["A", "B"]);
        let files = candidates(&["x.mp3", "y.mp3"]);
        let matrix = ScoreMatrix::from_rows(vec![vec![60.0, 40.0], vec![70.0, 30.0]]);
        let mut prompter = ScriptedPrompter::new([Answer::Index(2)]);
        let err = resolve(&matrix, &files, &album2, &mut prompter).unwrap_err();
        assert!(matches!(
            err,
            MatchError::Prompt(PromptError::InvalidChoice { index: 2, options: 2, .. })
        ));

        let album3 = album(&["A", "B", "C"]);
        let files = candidates(&["x.mp3"]);
        let matrix = matrix_for(&files, &album3);
        let mut prompter = ScriptedPrompter::new([Answer::Yes, Answer::Index(3)]);
        let err = resolve(&matrix, &files, &album3, &mut prompter).unwrap_err();
        assert!(matches!(
            err,
            MatchError::Prompt(PromptError::InvalidChoice { index: 3, options: 3, .. })
        ));
    }

    /// Confirms everything and picks a random valid option.
    struct RandomPrompter(StdRng);

    impl Prompter for RandomPrompter {
        fn confirm(&mut self, _question: &str) -> PromptResult<bool> {
            Ok(true)
        }

        fn choose(&mut self, _question: &str, options: &[String]) -> PromptResult<usize> {
            Ok(self.0.gen_range(0..options.len()))
        }

        fn choose_with_default(
            &mut self,
            question: &str,
            options: &[String],
            default: usize,
        ) -> PromptResult<usize> {
            if self.0.gen_bool(0.5) {
                Ok(default)
            } else {
                self.choose(question, options)
            }
        }
    }

    /// Scores drawn from a few coarse values so ties and duplicates are common.
    fn random_matrix(rng: &mut StdRng, rows: usize, cols: usize) -> ScoreMatrix {
        ScoreMatrix::from_rows(
            (0..rows)
                .map(|_| (0..cols).map(|_| f64::from(rng.gen_range(0..4u8)) * 25.0).collect())
                .collect(),
        )
    }

    fn numbered(prefix: &str, n: usize) -> Vec<String> {
        (0..n).map(|i| format!("{prefix}{i}")).collect()
    }

    #[test]
    fn test_equal_counts_always_give_a_bijection() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let n = rng.gen_range(1..=6);
            let tracks = numbered("Track ", n);
            let album = album(&tracks.iter().map(String::as_str).collect::<Vec<_>>());
            let names = numbered("file", n);
            let files = candidates(&names.iter().map(String::as_str).collect::<Vec<_>>());
            let matrix = random_matrix(&mut rng, n, n);
            let mut prompter = RandomPrompter(StdRng::seed_from_u64(rng.gen_range(0..u64::MAX)));

            let mapping = resolve(&matrix, &files, &album, &mut prompter).unwrap();
            assert_bijection(&mapping, n);
        }
    }

    #[test]
    fn test_fewer_files_leave_exactly_the_difference_unmapped() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let track_count = rng.gen_range(2..=7);
            let file_count = rng.gen_range(1..track_count);
            let tracks = numbered("Track ", track_count);
            let album = album(&tracks.iter().map(String::as_str).collect::<Vec<_>>());
            let names = numbered("file", file_count);
            let files = candidates(&names.iter().map(String::as_str).collect::<Vec<_>>());
            let matrix = random_matrix(&mut rng, file_count, track_count);
            let mut prompter = RandomPrompter(StdRng::seed_from_u64(rng.gen_range(0..u64::MAX)));

            let mapping = resolve(&matrix, &files, &album, &mut prompter).unwrap();
            assert_eq!(mapping.len(), file_count);
            let mut assigned: Vec<usize> = mapping.iter().map(|(_, t)| t).collect();
            assigned.sort_unstable();
            assigned.dedup();
            assert_eq!(assigned.len(), file_count);
            assert_eq!(mapping.unmapped_tracks(track_count).len(), track_count - file_count);
        }
    }

    #[test]
    fn test_mapping_by_track_order() {
        let mapping = Mapping::from_pairs(3, [(0, 2), (1, 0), (2, 1)]);
        assert_eq!(mapping.by_track(), vec![(1, 0), (2, 1), (0, 2)]);
        assert!(mapping.unmapped_tracks(3).is_empty());
    }
}
