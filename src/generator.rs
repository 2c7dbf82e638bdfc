//! Difficulty-shaped random level generation.
//!
//! The generator proposes random block layouts biased toward a target
//! difficulty, invokes the solver to reject unsolvable or off-target
//! candidates, and degrades through progressively relaxed constraints down
//! to hand-authored fallback boards. It never fails: a level is always
//! produced, possibly below ideal quality.
//!
//! A [`LevelGenerator`] owns its RNG and carries no other state, so callers
//! construct one per task (or per seed, for reproducible output) instead of
//! sharing a global instance.

use crate::board::{Block, Board, Orientation, EXIT_ROW, GRID_SIZE};
use crate::solver::{find_solution, is_solvable};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Attempts at generating a candidate meeting the strict target range.
const MAX_GENERATION_ATTEMPTS: usize = 200;

/// Attempts in the relaxed pass after the strict pass comes up empty.
const RELAXED_GENERATION_ATTEMPTS: usize = 20;

/// Cap on random placement attempts within a single layout.
const MAX_PLACEMENT_ATTEMPTS: usize = 500;

/// Level number at which the difficulty curve saturates at 1.0.
const DIFFICULTY_SATURATION_LEVEL: u32 = 200;

/// Exponent of the difficulty ramp: slightly faster early, slower later.
const DIFFICULTY_EXPONENT: f64 = 0.7;

/// Above this difficulty, candidates must need most of their blocks moved.
const SECONDARY_FILTER_THRESHOLD: f64 = 0.3;

/// Fraction of non-goal blocks the shortest solution must touch for the
/// secondary filter to pass.
const REQUIRED_MOVED_RATIO: f64 = 0.7;

/// Maps a level number to a normalized difficulty in `[0, 1]`.
///
/// Power-law ramp from level 1 (0.0) saturating at
/// [`DIFFICULTY_SATURATION_LEVEL`] (1.0). Monotonic by construction.
///
/// # Examples
/// ```
/// use gridlock_solver::generator::difficulty_for_level;
/// assert_eq!(difficulty_for_level(1), 0.0);
/// assert_eq!(difficulty_for_level(500), 1.0);
/// ```
pub fn difficulty_for_level(level: u32) -> f64 {
    if level <= 1 {
        return 0.0;
    }
    if level >= DIFFICULTY_SATURATION_LEVEL {
        return 1.0;
    }
    let normalized = (level - 1) as f64 / (DIFFICULTY_SATURATION_LEVEL - 1) as f64;
    normalized.powf(DIFFICULTY_EXPONENT)
}

/// Target solution-length range for a difficulty, by linear interpolation.
/// Difficulty 0: 2-4 moves; difficulty 1: 30-50 moves.
pub fn target_moves(difficulty: f64) -> (usize, usize) {
    let min_moves = 2 + (difficulty * 28.0) as usize;
    let max_moves = 4 + (difficulty * 46.0) as usize;
    (min_moves, max_moves)
}

/// Target non-goal block count range for a difficulty.
/// Difficulty 0: 3-5 blocks; difficulty 1: 10-14 blocks.
pub fn target_blocks(difficulty: f64) -> (usize, usize) {
    let min_blocks = 3 + (difficulty * 7.0) as usize;
    let max_blocks = 5 + (difficulty * 9.0) as usize;
    (min_blocks, max_blocks)
}

/// Procedural level generator with an owned RNG.
pub struct LevelGenerator {
    rng: SmallRng,
}

impl Default for LevelGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl LevelGenerator {
    /// Generator seeded from system entropy.
    pub fn new() -> Self {
        LevelGenerator {
            rng: SmallRng::from_entropy(),
        }
    }

    /// Generator with a fixed seed, for reproducible level sets.
    ///
    /// The same seed always produces the same sequence of levels.
    pub fn with_seed(seed: u64) -> Self {
        LevelGenerator {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Produces a board for the given level number.
    ///
    /// The generation loop runs up to [`MAX_GENERATION_ATTEMPTS`] times:
    /// each attempt places random blocks, repairs the layout to a solvable
    /// one, and scores the candidate by how close its shortest solution is
    /// to the midpoint of the target move range. A candidate inside the
    /// range is accepted immediately (above
    /// [`SECONDARY_FILTER_THRESHOLD`] difficulty it must also require most
    /// blocks to move). When the strict pass fails, a relaxed pass lowers
    /// the difficulty and halves the move floor; after that, the
    /// best-scoring candidate seen so far is used, and as a last resort a
    /// hand-authored fallback board.
    pub fn generate(&mut self, level: u32) -> Board {
        let difficulty = difficulty_for_level(level);
        let (min_moves, max_moves) = target_moves(difficulty);
        let (min_blocks, max_blocks) = target_blocks(difficulty);
        let midpoint = (min_moves + max_moves) as f64 / 2.0;

        let mut best: Option<Board> = None;
        let mut best_moves = 0usize;
        let mut best_quality = f64::NEG_INFINITY;

        for _ in 0..MAX_GENERATION_ATTEMPTS {
            let layout = self.random_layout(min_blocks, max_blocks, difficulty);
            let Some(board) = self.ensure_solvable(layout) else {
                continue;
            };
            // Repair may have stripped the layout below the target count.
            if board.blocks().len() - 1 < min_blocks {
                continue;
            }

            let moves = find_solution(&board).len();
            if moves == 0 {
                continue;
            }

            let quality = 100.0 - (moves as f64 - midpoint).abs();
            if quality > best_quality || (quality == best_quality && moves > best_moves) {
                best = Some(board.clone());
                best_moves = moves;
                best_quality = quality;
            }

            if (min_moves..=max_moves).contains(&moves) {
                if difficulty > SECONDARY_FILTER_THRESHOLD
                    && !requires_most_blocks_to_move(&board)
                {
                    continue;
                }
                return board;
            }
        }

        // Relaxed pass: lower difficulty, halve the move floor.
        let relaxed_min = min_moves / 2;
        let relaxed_difficulty = (difficulty - 0.2).max(0.0);
        for _ in 0..RELAXED_GENERATION_ATTEMPTS {
            let layout = self.random_layout(min_blocks, max_blocks, relaxed_difficulty);
            let Some(board) = self.ensure_solvable(layout) else {
                continue;
            };

            let moves = find_solution(&board).len();
            if moves == 0 {
                continue;
            }

            let quality = 100.0 - (moves as f64 - midpoint).abs();
            if quality > best_quality || (quality == best_quality && moves > best_moves) {
                best = Some(board.clone());
                best_moves = moves;
                best_quality = quality;
            }

            if moves >= relaxed_min {
                return board;
            }
        }

        if let Some(board) = best {
            return board;
        }

        self.fallback_board(difficulty.min(0.5))
    }

    /// Places the goal block and a random number of additional blocks.
    ///
    /// Placement is biased at higher difficulty toward strategic positions:
    /// blocks on the exit row ahead of the goal, and vertical blocks near
    /// the exit path that force detours. Every candidate placement is
    /// bounds- and collision-checked against the blocks placed so far; a
    /// rejected candidate just burns one of the bounded placement attempts.
    fn random_layout(&mut self, min_blocks: usize, max_blocks: usize, difficulty: f64) -> Board {
        let mut blocks = vec![Block::goal(0)];

        let num_blocks = self.rng.gen_range(min_blocks..=max_blocks);
        let strategic_chance = 0.3 + difficulty * 0.5;

        let mut next_id = 1u8;
        let mut placed = 0usize;
        let mut attempts = 0usize;

        while placed < num_blocks && attempts < MAX_PLACEMENT_ATTEMPTS {
            attempts += 1;

            // Strategic placements are front-loaded: once 70% of the target
            // count is down, the rest is purely random fill.
            let strategic =
                (placed as f64) < (num_blocks as f64) * 0.7 && self.rng.gen_bool(strategic_chance);

            let candidate = if strategic {
                if self.rng.gen_bool(0.5) {
                    self.exit_row_blocker(next_id)
                } else {
                    self.vertical_obstacle(next_id, difficulty)
                }
            } else {
                self.random_block(next_id, difficulty)
            };
            let Some(candidate) = candidate else {
                continue;
            };

            if !candidate.in_bounds() {
                continue;
            }
            if blocks.iter().any(|other| candidate.overlaps(other)) {
                continue;
            }

            blocks.push(candidate);
            placed += 1;
            next_id += 1;
        }

        Board::new(blocks)
    }

    /// A block on the exit row, behind the goal's start, to block its path.
    fn exit_row_blocker(&mut self, id: u8) -> Option<Block> {
        if self.rng.gen_bool(0.7) {
            let length = if self.rng.gen_bool(0.5) { 3 } else { 2 };
            let max_col = GRID_SIZE - length;
            if max_col < 2 {
                return None;
            }
            let col = self.rng.gen_range(2..=max_col);
            Some(Block::horizontal(id, EXIT_ROW, col, length))
        } else {
            let length = if self.rng.gen_bool(0.6) { 3 } else { 2 };
            if EXIT_ROW + length > GRID_SIZE {
                return None;
            }
            let col = self.rng.gen_range(2..GRID_SIZE);
            Some(Block::vertical(id, EXIT_ROW, col, length))
        }
    }

    /// A vertical block creating a dependency, near the exit path at higher
    /// difficulty.
    fn vertical_obstacle(&mut self, id: u8, difficulty: f64) -> Option<Block> {
        let long_chance = 0.3 + difficulty * 0.4;
        let length = if self.rng.gen_bool(long_chance) { 3 } else { 2 };
        let row = self.rng.gen_range(0..=GRID_SIZE - length);

        let col = if difficulty > 0.5 && self.rng.gen_bool(0.6) {
            // Columns the goal must cross to exit.
            self.rng.gen_range(2..=4)
        } else {
            // Off the edges.
            self.rng.gen_range(1..GRID_SIZE - 1)
        };
        Some(Block::vertical(id, row, col, length))
    }

    /// Uniformly random block; longer blocks more likely at higher
    /// difficulty.
    fn random_block(&mut self, id: u8, difficulty: f64) -> Option<Block> {
        let long_chance = 0.5 + difficulty * 0.3;
        let length = if self.rng.gen_bool(long_chance) { 3 } else { 2 };

        if self.rng.gen_bool(0.5) {
            let row = self.rng.gen_range(0..GRID_SIZE);
            let col = self.rng.gen_range(0..=GRID_SIZE - length);
            Some(Block::horizontal(id, row, col, length))
        } else {
            let row = self.rng.gen_range(0..=GRID_SIZE - length);
            let col = self.rng.gen_range(0..GRID_SIZE);
            Some(Block::vertical(id, row, col, length))
        }
    }

    /// Repairs a candidate layout into a solvable board, or gives up.
    ///
    /// Resets the goal block to column 0, drops out-of-bounds and
    /// overlapping blocks (first placed wins), then iteratively removes
    /// blocks that plausibly block the goal's path: direct blockers on the
    /// exit row first, then vertical blocks straddling it, then arbitrary
    /// non-goal blocks. Removal is bounded by twice the block count.
    ///
    /// # Returns
    /// `Some(board)` that passed a final solvability check, `None` if the
    /// layout could not be repaired within the attempt budget.
    pub fn ensure_solvable(&mut self, layout: Board) -> Option<Board> {
        let mut blocks: Vec<Block> = layout.blocks().to_vec();
        if blocks.is_empty() {
            return None;
        }

        // The goal always starts at column 0; this also covers a goal
        // placed at or past the exit.
        if let Some(goal) = blocks.iter_mut().find(|b| b.is_goal) {
            goal.col = 0;
        }

        let mut board = Board::new(remove_overlapping(blocks));
        if is_solvable(&board) {
            return Some(board);
        }

        let max_attempts = board.blocks().len() * 2;
        for _ in 0..max_attempts {
            if is_solvable(&board) {
                break;
            }
            let goal_col = board.goal()?.col;

            let direct: Vec<usize> = board
                .blocks()
                .iter()
                .enumerate()
                .filter(|(_, b)| !b.is_goal && b.row == EXIT_ROW && b.col > goal_col)
                .map(|(i, _)| i)
                .collect();

            let victims = if !direct.is_empty() {
                direct
            } else {
                let straddlers: Vec<usize> = board
                    .blocks()
                    .iter()
                    .enumerate()
                    .filter(|(_, b)| {
                        !b.is_goal
                            && b.orientation == Orientation::Vertical
                            && b.row <= EXIT_ROW
                            && b.row_end() >= EXIT_ROW
                            && b.col > goal_col
                    })
                    .map(|(i, _)| i)
                    .collect();
                if !straddlers.is_empty() {
                    straddlers
                } else {
                    let any: Vec<usize> = board
                        .blocks()
                        .iter()
                        .enumerate()
                        .filter(|(_, b)| !b.is_goal)
                        .map(|(i, _)| i)
                        .collect();
                    if any.is_empty() {
                        break;
                    }
                    any
                }
            };

            let victim = victims[self.rng.gen_range(0..victims.len())];
            let mut remaining = board.blocks().to_vec();
            remaining.remove(victim);
            board = Board::new(remaining);
        }

        if is_solvable(&board) {
            Some(board)
        } else {
            None
        }
    }

    /// Hand-authored guaranteed-solvable board, the generator's last resort.
    fn fallback_board(&mut self, difficulty: f64) -> Board {
        if difficulty >= 0.3 {
            Board::new(vec![
                Block::goal(0),
                Block::vertical(1, 0, 2, 2),
                Block::vertical(2, 1, 4, 2),
                Block::vertical(3, 2, 3, 2),
                Block::horizontal(4, 4, 1, 2),
                Block::horizontal(5, 5, 3, 2),
            ])
        } else {
            Board::new(vec![
                Block::goal(0),
                Block::vertical(1, 0, 3, 2),
                Block::vertical(2, 2, 3, 2),
                Block::horizontal(3, 4, 2, 2),
                Block::horizontal(4, 5, 4, 2),
            ])
        }
    }
}

/// Secondary difficulty filter: does the shortest solution touch at least
/// [`REQUIRED_MOVED_RATIO`] of the non-goal blocks?
///
/// Rejecting boards that fail this avoids "trivial with clutter" layouts
/// where most blocks are decoration.
pub fn requires_most_blocks_to_move(board: &Board) -> bool {
    let solution = find_solution(board);
    if solution.is_empty() {
        return false;
    }

    let total = board.blocks().iter().filter(|b| !b.is_goal).count();
    if total == 0 {
        return false;
    }

    let mut moved: Vec<u8> = solution
        .iter()
        .filter(|m| board.blocks().iter().any(|b| b.id == m.block_id && !b.is_goal))
        .map(|m| m.block_id)
        .collect();
    moved.sort_unstable();
    moved.dedup();

    moved.len() as f64 / total as f64 >= REQUIRED_MOVED_RATIO
}

/// Drops out-of-bounds blocks and overlap losers (first placed wins).
fn remove_overlapping(blocks: Vec<Block>) -> Vec<Block> {
    let mut kept: Vec<Block> = Vec::with_capacity(blocks.len());
    for block in blocks {
        if !block.in_bounds() {
            continue;
        }
        if kept.iter().any(|other| block.overlaps(other)) {
            continue;
        }
        kept.push(block);
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver;

    #[test]
    fn test_difficulty_curve_endpoints() {
        assert_eq!(difficulty_for_level(0), 0.0);
        assert_eq!(difficulty_for_level(1), 0.0);
        assert_eq!(difficulty_for_level(200), 1.0);
        assert_eq!(difficulty_for_level(1000), 1.0);
    }

    #[test]
    fn test_difficulty_curve_monotonic() {
        let mut previous = 0.0;
        for level in 1..=250 {
            let d = difficulty_for_level(level);
            assert!(d >= previous, "difficulty dipped at level {}", level);
            assert!((0.0..=1.0).contains(&d));
            previous = d;
        }
    }

    #[test]
    fn test_target_ranges_scale_with_difficulty() {
        assert_eq!(target_moves(0.0), (2, 4));
        assert_eq!(target_moves(1.0), (30, 50));
        assert_eq!(target_blocks(0.0), (3, 5));
        assert_eq!(target_blocks(1.0), (10, 14));
    }

    #[test]
    fn test_generated_levels_are_valid_and_solvable() {
        let mut generator = LevelGenerator::with_seed(7);
        for level in 1..=10 {
            let board = generator.generate(level);
            board
                .validate()
                .unwrap_or_else(|e| panic!("level {}: {}", level, e));
            assert!(solver::is_solvable(&board), "level {} not solvable", level);
        }
    }

    #[test]
    fn test_generation_is_deterministic_per_seed() {
        let mut a = LevelGenerator::with_seed(42);
        let mut b = LevelGenerator::with_seed(42);
        assert_eq!(a.generate(20), b.generate(20));
    }

    #[test]
    fn test_ensure_solvable_resets_goal_and_drops_overlaps() {
        let mut generator = LevelGenerator::with_seed(1);
        // Goal adrift at column 3, plus two overlapping verticals.
        let layout = Board::new(vec![
            Block::goal(3),
            Block::vertical(1, 0, 4, 3),
            Block::vertical(2, 1, 4, 2),
        ]);
        let board = generator.ensure_solvable(layout).expect("repairable");
        assert_eq!(board.goal().unwrap().col, 0);
        assert!(board.validate().is_ok());
        assert!(solver::is_solvable(&board));
    }

    #[test]
    fn test_fallback_boards_are_solvable() {
        let mut generator = LevelGenerator::with_seed(1);
        for difficulty in [0.0, 0.5] {
            let board = generator.fallback_board(difficulty);
            assert!(board.validate().is_ok());
            assert!(solver::is_solvable(&board), "fallback d={}", difficulty);
        }
    }

    #[test]
    fn test_requires_most_blocks_filter() {
        // Single blocker ahead of the goal: it must move, ratio 1.0.
        let busy = Board::new(vec![Block::goal(0), Block::vertical(1, 1, 2, 2)]);
        assert!(requires_most_blocks_to_move(&busy));

        // Clutter far from the exit path never moves, ratio 0.0.
        let trivial = Board::new(vec![Block::goal(0), Block::horizontal(1, 5, 0, 2)]);
        assert!(!requires_most_blocks_to_move(&trivial));
    }
}
