//! Persisted level sets and the offline generation pipeline.
//!
//! A level set maps level numbers to boards plus precomputed optimal-play
//! metadata (minimum move count and best achievable score). Sets are
//! produced offline by the batch pipeline, serialized to a JSON file, and
//! consumed at runtime through [`LevelLibrary`], which serves pregenerated
//! levels first and falls back to on-the-fly generation.

use crate::board::Board;
use crate::generator::LevelGenerator;
use crate::solver::{find_solution, is_solvable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

/// Base score awarded per level number.
const BASE_SCORE_PER_LEVEL: u64 = 1000;

/// Points deducted per move made.
const MOVE_PENALTY: u64 = 10;

/// Best achievable score for a level solved in `moves` moves with no time
/// penalty: `max(0, 1000 * level - 10 * moves)`.
///
/// # Examples
/// ```
/// use gridlock_solver::levels::best_score;
/// assert_eq!(best_score(1, 8), 920);
/// assert_eq!(best_score(1, 200), 0);
/// ```
pub fn best_score(level: u32, moves: u32) -> u64 {
    (BASE_SCORE_PER_LEVEL * level as u64).saturating_sub(MOVE_PENALTY * moves as u64)
}

/// Runtime score formula: the best-score formula with an additional
/// per-second time penalty. The penalty rate is caller policy.
pub fn score(level: u32, moves: u32, elapsed_secs: u64, penalty_per_sec: u64) -> u64 {
    best_score(level, moves).saturating_sub(penalty_per_sec * elapsed_secs)
}

/// One persisted level: the board and its optimal-play metadata.
///
/// The metadata fields are optional so a level file can be generated first
/// and annotated by the scoring pass afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelEntry {
    pub board: Board,
    /// Minimum number of moves to solve, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_moves: Option<u32>,
    /// Score for an optimal, zero-time solve, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_score: Option<u64>,
}

/// A full level file: level number to entry, ordered by level number.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSet {
    pub levels: BTreeMap<u32, LevelEntry>,
}

impl LevelSet {
    /// Serializes the set to pretty-printed JSON at `path`.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
    }

    /// Loads a set from a JSON file written by [`LevelSet::save`].
    pub fn load(path: &Path) -> io::Result<Self> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

/// Outcome of re-validating every level in a set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub valid: u32,
    pub invalid: u32,
}

impl ValidationReport {
    /// True when every level passed.
    pub fn is_ok(&self) -> bool {
        self.invalid == 0
    }
}

/// Summary of a metadata annotation pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AnnotateSummary {
    /// Levels whose solution was recomputed.
    pub processed: u32,
    /// Levels whose metadata improved (or was filled in).
    pub updated: u32,
    /// Levels skipped because no solution was found.
    pub failed: u32,
}

/// Generates a complete level set of `count` levels.
///
/// Each level is generated independently at its own target difficulty and
/// stored with its optimal move count and best score already computed.
/// Progress is reported every 50 levels.
pub fn generate_all(count: u32, generator: &mut LevelGenerator) -> LevelSet {
    let mut set = LevelSet::default();

    for level in 1..=count {
        let board = generator.generate(level);
        let moves = find_solution(&board).len() as u32;

        set.levels.insert(
            level,
            LevelEntry {
                board,
                best_moves: Some(moves),
                best_score: Some(best_score(level, moves)),
            },
        );

        if level % 50 == 0 || level == count {
            println!("Generated {}/{} levels", level, count);
        }
    }

    set
}

/// Independently re-checks every level in a set: structural invariants plus
/// a fresh solvability search. Invalid levels are reported on stderr.
pub fn validate_all(set: &LevelSet) -> ValidationReport {
    let mut report = ValidationReport::default();

    for (level, entry) in &set.levels {
        if let Err(e) = entry.board.validate() {
            eprintln!("Level {}: invalid board: {}", level, e);
            report.invalid += 1;
            continue;
        }
        if !is_solvable(&entry.board) {
            eprintln!("Level {}: not solvable", level);
            report.invalid += 1;
            continue;
        }
        report.valid += 1;
    }

    report
}

/// Recomputes optimal-play metadata for every level in a set.
///
/// A level's metadata is only updated when the freshly computed solution is
/// strictly better than what is stored (or nothing is stored yet), so an
/// annotation pass never degrades an existing file. Levels the solver could
/// not solve are counted as failed and left untouched.
pub fn annotate_best_scores(set: &mut LevelSet) -> AnnotateSummary {
    let mut summary = AnnotateSummary::default();

    for (level, entry) in set.levels.iter_mut() {
        let solution = find_solution(&entry.board);
        if solution.is_empty() && !entry.board.is_solved() {
            eprintln!("Level {}: no solution found, skipping", level);
            summary.failed += 1;
            continue;
        }
        summary.processed += 1;

        let moves = solution.len() as u32;
        let improved = match entry.best_moves {
            Some(existing) => moves < existing,
            None => true,
        };
        if improved {
            entry.best_moves = Some(moves);
            entry.best_score = Some(best_score(*level, moves));
            summary.updated += 1;
        }
    }

    summary
}

/// Runtime level source: pregenerated levels first, generation as fallback.
pub struct LevelLibrary {
    set: LevelSet,
    generator: LevelGenerator,
}

impl LevelLibrary {
    /// Library backed by a loaded level set.
    pub fn new(set: LevelSet) -> Self {
        LevelLibrary {
            set,
            generator: LevelGenerator::new(),
        }
    }

    /// Library backed by a level file on disk.
    pub fn open(path: &Path) -> io::Result<Self> {
        Ok(Self::new(LevelSet::load(path)?))
    }

    /// Returns the board for a level, generating one on the fly when the
    /// level is not pregenerated. Never fails: the generator always
    /// produces a board.
    pub fn level(&mut self, level: u32) -> Board {
        match self.set.levels.get(&level) {
            Some(entry) => entry.board.clone(),
            None => self.generator.generate(level),
        }
    }

    /// Pregenerated optimal move count for a level, when known.
    pub fn best_moves(&self, level: u32) -> Option<u32> {
        self.set.levels.get(&level).and_then(|e| e.best_moves)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Block, Board};

    fn small_set() -> LevelSet {
        let mut generator = LevelGenerator::with_seed(99);
        generate_all(3, &mut generator)
    }

    #[test]
    fn test_best_score_formula() {
        assert_eq!(best_score(1, 0), 1000);
        assert_eq!(best_score(3, 12), 2880);
        // The move penalty can zero out a level-1 score but never go negative.
        assert_eq!(best_score(1, 100), 0);
        assert_eq!(best_score(1, 101), 0);
    }

    #[test]
    fn test_score_with_time_penalty() {
        assert_eq!(score(2, 10, 30, 2), 2000 - 100 - 60);
        assert_eq!(score(1, 0, 10_000, 5), 0);
    }

    #[test]
    fn test_generate_all_precomputes_metadata() {
        let set = small_set();
        assert_eq!(set.len(), 3);
        for (level, entry) in &set.levels {
            let moves = entry.best_moves.expect("metadata precomputed");
            assert!(moves > 0, "level {} has a zero-move solution", level);
            assert_eq!(entry.best_score, Some(best_score(*level, moves)));
        }
    }

    #[test]
    fn test_validate_all_accepts_generated_set() {
        let set = small_set();
        let report = validate_all(&set);
        assert!(report.is_ok());
        assert_eq!(report.valid, 3);
    }

    #[test]
    fn test_validate_all_flags_bad_level() {
        let mut set = small_set();
        set.levels.insert(
            4,
            LevelEntry {
                // No goal block: fails structural validation.
                board: Board::new(vec![Block::vertical(1, 0, 0, 2)]),
                best_moves: None,
                best_score: None,
            },
        );
        let report = validate_all(&set);
        assert_eq!(report.invalid, 1);
        assert!(!report.is_ok());
    }

    #[test]
    fn test_annotate_fills_missing_metadata() {
        let mut set = LevelSet::default();
        set.levels.insert(
            1,
            LevelEntry {
                board: Board::new(vec![Block::goal(0), Block::vertical(1, 1, 2, 2)]),
                best_moves: None,
                best_score: None,
            },
        );

        let summary = annotate_best_scores(&mut set);
        assert_eq!(summary.processed, 1);
        assert_eq!(summary.updated, 1);
        assert_eq!(summary.failed, 0);

        let entry = &set.levels[&1];
        assert_eq!(entry.best_moves, Some(2));
        assert_eq!(entry.best_score, Some(best_score(1, 2)));
    }

    #[test]
    fn test_annotate_never_degrades_existing_metadata() {
        let mut set = LevelSet::default();
        set.levels.insert(
            1,
            LevelEntry {
                board: Board::new(vec![Block::goal(0), Block::vertical(1, 1, 2, 2)]),
                // Better than the solver can do: must be left alone.
                best_moves: Some(1),
                best_score: Some(best_score(1, 1)),
            },
        );

        let summary = annotate_best_scores(&mut set);
        assert_eq!(summary.updated, 0);
        assert_eq!(set.levels[&1].best_moves, Some(1));
    }

    #[test]
    fn test_annotate_counts_unsolvable_levels() {
        let mut set = LevelSet::default();
        let mut goal = Block::goal(0);
        goal.row = 0; // precondition failure: rejected without search
        set.levels.insert(
            1,
            LevelEntry {
                board: Board::new(vec![goal]),
                best_moves: None,
                best_score: None,
            },
        );
        let summary = annotate_best_scores(&mut set);
        assert_eq!(summary.failed, 1);
        assert_eq!(set.levels[&1].best_moves, None);
    }

    #[test]
    fn test_level_set_json_round_trip() {
        let set = small_set();
        let json = serde_json::to_string(&set).unwrap();
        let restored: LevelSet = serde_json::from_str(&json).unwrap();
        assert_eq!(set, restored);
    }

    #[test]
    fn test_library_prefers_pregenerated_levels() {
        let set = small_set();
        let expected = set.levels[&2].board.clone();
        let mut library = LevelLibrary::new(set);
        assert_eq!(library.level(2), expected);
        assert!(library.best_moves(2).is_some());
    }

    #[test]
    fn test_library_generates_missing_levels() {
        let mut library = LevelLibrary::new(LevelSet::default());
        let board = library.level(1);
        assert!(board.validate().is_ok());
        assert!(crate::solver::is_solvable(&board));
        assert_eq!(library.best_moves(1), None);
    }
}
