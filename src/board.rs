//! Core board model for the sliding-block puzzle.
//!
//! This module defines the puzzle's fundamental components:
//! - `Block`: a rectangular piece, horizontal or vertical, 2 or 3 cells long.
//! - `Board`: a full grid configuration and the move-legality rules
//!   (bounds checks, collision checks, slide enumeration).
//! - `Move`: a single atomic relocation of one block along its axis.
//!
//! The board is a pure value type: every mutation-like operation returns a
//! new `Board` and leaves its input untouched. The solver relies on this to
//! explore the state space over immutable copies.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The grid is fixed at 6x6 for the entire system.
pub const GRID_SIZE: usize = 6;

/// Row the goal block lives on and exits through (0-indexed middle row).
pub const EXIT_ROW: usize = 2;

/// Sliding axis of a block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// The block occupies `length` cells in a single row and slides left/right.
    Horizontal,
    /// The block occupies `length` cells in a single column and slides up/down.
    Vertical,
}

/// A placed rectangular piece.
///
/// `(row, col)` is the top-left cell of the block. A horizontal block of
/// length `l` covers columns `col..col + l` of `row`; a vertical block covers
/// rows `row..row + l` of `col`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Block {
    /// Identifier unique within a board. The goal block conventionally gets 0.
    pub id: u8,
    /// Top-left row coordinate (0-indexed).
    pub row: usize,
    /// Top-left column coordinate (0-indexed).
    pub col: usize,
    /// Number of cells covered, 2 or 3.
    pub length: usize,
    /// Sliding axis.
    pub orientation: Orientation,
    /// Exactly one block per board is the goal block.
    pub is_goal: bool,
}

impl Block {
    /// Creates a horizontal block.
    pub fn horizontal(id: u8, row: usize, col: usize, length: usize) -> Self {
        Block {
            id,
            row,
            col,
            length,
            orientation: Orientation::Horizontal,
            is_goal: false,
        }
    }

    /// Creates a vertical block.
    pub fn vertical(id: u8, row: usize, col: usize, length: usize) -> Self {
        Block {
            id,
            row,
            col,
            length,
            orientation: Orientation::Vertical,
            is_goal: false,
        }
    }

    /// Creates the goal block: id 0, horizontal, length 2, on the exit row.
    ///
    /// # Examples
    /// ```
    /// use gridlock_solver::board::{Block, EXIT_ROW};
    /// let goal = Block::goal(0);
    /// assert!(goal.is_goal);
    /// assert_eq!(goal.row, EXIT_ROW);
    /// ```
    pub fn goal(col: usize) -> Self {
        Block {
            id: 0,
            row: EXIT_ROW,
            col,
            length: 2,
            orientation: Orientation::Horizontal,
            is_goal: true,
        }
    }

    /// Last row covered by this block (inclusive).
    pub fn row_end(&self) -> usize {
        match self.orientation {
            Orientation::Horizontal => self.row,
            Orientation::Vertical => self.row + self.length - 1,
        }
    }

    /// Last column covered by this block (inclusive).
    pub fn col_end(&self) -> usize {
        match self.orientation {
            Orientation::Horizontal => self.col + self.length - 1,
            Orientation::Vertical => self.col,
        }
    }

    /// Returns whether every cell of the block lies within the grid.
    pub fn in_bounds(&self) -> bool {
        self.row_end() < GRID_SIZE && self.col_end() < GRID_SIZE
    }

    /// Axis-aligned rectangle overlap test against another block.
    ///
    /// Two blocks intersect iff their row ranges overlap AND their column
    /// ranges overlap.
    pub fn overlaps(&self, other: &Block) -> bool {
        self.row <= other.row_end()
            && self.row_end() >= other.row
            && self.col <= other.col_end()
            && self.col_end() >= other.col
    }

    /// Returns whether this block covers the given cell.
    pub fn covers(&self, row: usize, col: usize) -> bool {
        self.row <= row && row <= self.row_end() && self.col <= col && col <= self.col_end()
    }

    /// Copy of this block relocated to a new top-left position.
    pub fn at(&self, row: usize, col: usize) -> Self {
        Block { row, col, ..*self }
    }

    /// Returns whether the goal block has fully reached the right edge.
    fn at_exit(&self) -> bool {
        self.col + self.length == GRID_SIZE
    }
}

/// A single atomic relocation of one block along its fixed axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    /// Id of the block that moved.
    pub block_id: u8,
    pub from_row: usize,
    pub from_col: usize,
    pub to_row: usize,
    pub to_col: usize,
}

/// A full grid configuration: the set of all blocks and their positions.
///
/// Block order in the underlying vector does not affect semantics; only
/// identity and position matter. The solver keys its visited set on
/// [`Board::state_key`], which is position-in-index-order, and level
/// deduplication uses the order-independent [`Board::layout_signature`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    blocks: Vec<Block>,
}

impl Board {
    /// Creates a board from a list of blocks. No validation is performed;
    /// use [`Board::validate`] to check invariants.
    pub fn new(blocks: Vec<Block>) -> Self {
        Board { blocks }
    }

    /// All blocks on the board, in insertion order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// The goal block, if one is present.
    pub fn goal(&self) -> Option<&Block> {
        self.blocks.iter().find(|b| b.is_goal)
    }

    /// Checks the solver's precondition: a goal block exists, is horizontal,
    /// and sits on the exit row. Boards failing this are rejected as
    /// unsolvable without any search.
    pub fn has_valid_goal(&self) -> bool {
        match self.goal() {
            Some(goal) => goal.orientation == Orientation::Horizontal && goal.row == EXIT_ROW,
            None => false,
        }
    }

    /// Returns whether the goal block has fully exited through the right
    /// edge of its row (`col + length == GRID_SIZE`).
    pub fn is_solved(&self) -> bool {
        self.goal().is_some_and(Block::at_exit)
    }

    /// Checks whether one block could occupy a new top-left position.
    ///
    /// This is a pure function of the board: the block's full extent must lie
    /// within the grid, and it must not intersect any other block. The block
    /// itself is excluded from the collision check.
    ///
    /// # Arguments
    /// * `block_index`: index into [`Board::blocks`] of the moving block.
    /// * `row`, `col`: candidate top-left position.
    ///
    /// # Examples
    /// ```
    /// use gridlock_solver::board::{Block, Board};
    /// let board = Board::new(vec![Block::goal(0), Block::vertical(1, 0, 2, 2)]);
    /// assert!(board.can_occupy(0, 2, 1));  // slide right one cell
    /// assert!(!board.can_occupy(0, 2, 5)); // would hang off the grid
    /// ```
    pub fn can_occupy(&self, block_index: usize, row: usize, col: usize) -> bool {
        let candidate = self.blocks[block_index].at(row, col);
        if !candidate.in_bounds() {
            return false;
        }
        self.blocks
            .iter()
            .enumerate()
            .all(|(i, other)| i == block_index || !candidate.overlaps(other))
    }

    /// Enumerates every legal single-slide destination for a block.
    ///
    /// Scans outward from the current position in both directions along the
    /// block's axis, collecting each intermediate legal position. A blocked
    /// cell truncates the scan in that direction, since a slide cannot pass
    /// through another block. A block with no legal moves returns an empty
    /// list; a block already at a grid edge simply has a truncated scan.
    ///
    /// # Returns
    /// A list of `(row, col)` top-left destinations.
    pub fn possible_moves(&self, block_index: usize) -> Vec<(usize, usize)> {
        let block = &self.blocks[block_index];
        let mut moves = Vec::new();

        match block.orientation {
            Orientation::Horizontal => {
                // Leftward, then rightward.
                for new_col in (0..block.col).rev() {
                    if self.can_occupy(block_index, block.row, new_col) {
                        moves.push((block.row, new_col));
                    } else {
                        break;
                    }
                }
                for new_col in block.col + 1..=GRID_SIZE.saturating_sub(block.length) {
                    if self.can_occupy(block_index, block.row, new_col) {
                        moves.push((block.row, new_col));
                    } else {
                        break;
                    }
                }
            }
            Orientation::Vertical => {
                // Upward, then downward.
                for new_row in (0..block.row).rev() {
                    if self.can_occupy(block_index, new_row, block.col) {
                        moves.push((new_row, block.col));
                    } else {
                        break;
                    }
                }
                for new_row in block.row + 1..=GRID_SIZE.saturating_sub(block.length) {
                    if self.can_occupy(block_index, new_row, block.col) {
                        moves.push((new_row, block.col));
                    } else {
                        break;
                    }
                }
            }
        }

        moves
    }

    /// Produces a new board with one block relocated.
    ///
    /// The input board is not mutated. Legality is the caller's concern;
    /// the solver only applies positions returned by
    /// [`Board::possible_moves`].
    pub fn apply_move(&self, block_index: usize, row: usize, col: usize) -> Board {
        let mut blocks = self.blocks.clone();
        blocks[block_index] = blocks[block_index].at(row, col);
        Board { blocks }
    }

    /// Builds the [`Move`] record for relocating a block to `(row, col)`.
    pub fn move_record(&self, block_index: usize, row: usize, col: usize) -> Move {
        let block = &self.blocks[block_index];
        Move {
            block_id: block.id,
            from_row: block.row,
            from_col: block.col,
            to_row: row,
            to_col: col,
        }
    }

    /// Compact serialization of all block positions, in block index order.
    ///
    /// Used as the visited-set key during search. Two boards reached by
    /// different move orders but with identical per-block positions produce
    /// the same key. Block identity is implied by index, so lengths and
    /// orientations (which never change during search) are omitted.
    pub fn state_key(&self) -> Vec<u8> {
        let mut key = Vec::with_capacity(self.blocks.len() * 2);
        for block in &self.blocks {
            key.push(block.row as u8);
            key.push(block.col as u8);
        }
        key
    }

    /// Order-independent canonical signature of the layout.
    ///
    /// Blocks are sorted by (row, col, length, orientation) before encoding,
    /// so two boards with the same block placements produce identical
    /// signatures regardless of block array ordering. Used to deduplicate
    /// generated levels.
    pub fn layout_signature(&self) -> String {
        let mut entries: Vec<(usize, usize, usize, u8)> = self
            .blocks
            .iter()
            .map(|b| {
                let horizontal = matches!(b.orientation, Orientation::Horizontal) as u8;
                (b.row, b.col, b.length, horizontal)
            })
            .collect();
        entries.sort_unstable();

        entries
            .iter()
            .map(|(r, c, l, h)| format!("{},{},{},{}", r, c, l, h))
            .collect::<Vec<_>>()
            .join("|")
    }

    /// Validates every structural invariant of the board.
    ///
    /// Checks that all blocks lie within the grid, that block lengths are 2
    /// or 3, that no two blocks overlap, and that exactly one goal block
    /// exists, horizontal and on the exit row.
    ///
    /// # Returns
    /// * `Ok(())` if the board is well formed.
    /// * `Err(String)` describing the first violation found.
    pub fn validate(&self) -> Result<(), String> {
        let goal_count = self.blocks.iter().filter(|b| b.is_goal).count();
        if goal_count != 1 {
            return Err(format!("Expected exactly one goal block, found {}", goal_count));
        }
        if !self.has_valid_goal() {
            return Err("Goal block must be horizontal on the exit row".to_string());
        }

        for block in &self.blocks {
            if !(2..=3).contains(&block.length) {
                return Err(format!("Block {} has invalid length {}", block.id, block.length));
            }
            if !block.in_bounds() {
                return Err(format!(
                    "Block {} at ({}, {}) extends outside the {}x{} grid",
                    block.id, block.row, block.col, GRID_SIZE, GRID_SIZE
                ));
            }
        }

        for (i, a) in self.blocks.iter().enumerate() {
            for b in &self.blocks[i + 1..] {
                if a.overlaps(b) {
                    return Err(format!("Blocks {} and {} overlap", a.id, b.id));
                }
            }
        }

        Ok(())
    }
}

/// Letter pool for rendering non-goal blocks; 'R' is reserved for the goal.
const BLOCK_LETTERS: &[u8] = b"ABCDEFGHIJKLMNOPQSTUVWXYZ";

/// Character used for the goal block in the ASCII grid format.
pub const GOAL_CHAR: char = 'R';

impl fmt::Display for Board {
    /// Renders the board as a `GRID_SIZE` x `GRID_SIZE` character grid.
    ///
    /// Empty cells are '.', the goal block is [`GOAL_CHAR`], and other blocks
    /// are letters assigned from their ids. The format round-trips through
    /// `utils::board_from_str_array`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut grid = [['.'; GRID_SIZE]; GRID_SIZE];
        for block in &self.blocks {
            let ch = if block.is_goal {
                GOAL_CHAR
            } else {
                BLOCK_LETTERS[(block.id as usize).saturating_sub(1) % BLOCK_LETTERS.len()] as char
            };
            for r in block.row..=block.row_end() {
                for c in block.col..=block.col_end() {
                    grid[r][c] = ch;
                }
            }
        }

        for (r, row) in grid.iter().enumerate() {
            for ch in row {
                write!(f, "{}", ch)?;
            }
            if r < GRID_SIZE - 1 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_block_board() -> Board {
        Board::new(vec![Block::goal(0), Block::vertical(1, 1, 3, 2)])
    }

    #[test]
    fn test_goal_block_shape() {
        let board = two_block_board();
        let goal = board.goal().unwrap();
        assert_eq!(goal.row, EXIT_ROW);
        assert_eq!(goal.orientation, Orientation::Horizontal);
        assert!(board.has_valid_goal());
        assert!(!board.is_solved());
    }

    #[test]
    fn test_is_solved_at_exit() {
        let board = Board::new(vec![Block::goal(4)]);
        assert!(board.is_solved());
    }

    #[test]
    fn test_can_occupy_bounds() {
        let board = two_block_board();
        // Horizontal goal of length 2: col 4 is the last legal column.
        assert!(board.can_occupy(0, EXIT_ROW, 4));
        assert!(!board.can_occupy(0, EXIT_ROW, 5));
        // Vertical block of length 2: row 4 is the last legal row.
        assert!(board.can_occupy(1, 4, 3));
        assert!(!board.can_occupy(1, 5, 3));
    }

    #[test]
    fn test_can_occupy_collision() {
        let board = two_block_board();
        // The vertical block straddles (2, 3). The goal at col 1 covers
        // (2, 1)-(2, 2) and fits; at col 2 it would cover (2, 3).
        assert!(board.can_occupy(0, EXIT_ROW, 1));
        assert!(!board.can_occupy(0, EXIT_ROW, 2));
    }

    #[test]
    fn test_can_occupy_is_pure() {
        let board = two_block_board();
        let before = board.clone();
        let first = board.can_occupy(0, EXIT_ROW, 3);
        let second = board.can_occupy(0, EXIT_ROW, 3);
        assert_eq!(first, second);
        assert_eq!(board, before);
    }

    #[test]
    fn test_possible_moves_truncated_by_blocker() {
        let board = two_block_board();
        // Goal at col 0 can only slide right to col 1; at col 2 it would hit
        // the blocker's cell (2, 3), which truncates the rightward scan.
        assert_eq!(board.possible_moves(0), vec![(EXIT_ROW, 1)]);
    }

    #[test]
    fn test_possible_moves_adjacent_blocker_pins_goal() {
        // Blocker straddling (2, 2) sits flush against the goal, so even the
        // one-cell slide to col 1 would collide: no legal moves at all.
        let board = Board::new(vec![Block::goal(0), Block::vertical(1, 1, 2, 2)]);
        assert!(!board.can_occupy(0, EXIT_ROW, 1));
        assert!(board.possible_moves(0).is_empty());
    }

    #[test]
    fn test_possible_moves_full_scan() {
        let board = Board::new(vec![Block::goal(0)]);
        // Nothing in the way: every column up to 4 is reachable in one slide.
        assert_eq!(
            board.possible_moves(0),
            vec![(EXIT_ROW, 1), (EXIT_ROW, 2), (EXIT_ROW, 3), (EXIT_ROW, 4)]
        );
    }

    #[test]
    fn test_possible_moves_boxed_in_is_empty() {
        // Vertical block pinned between two horizontal blocks in its column.
        let board = Board::new(vec![
            Block::goal(0),
            Block::vertical(1, 1, 4, 2),
            Block::horizontal(2, 0, 3, 2),
            Block::horizontal(3, 3, 3, 2),
        ]);
        assert!(board.possible_moves(1).is_empty());
    }

    #[test]
    fn test_apply_move_copies() {
        let board = two_block_board();
        let moved = board.apply_move(1, 0, 2);
        assert_eq!(board.blocks()[1].row, 1, "input board must not change");
        assert_eq!(moved.blocks()[1].row, 0);
    }

    #[test]
    fn test_state_key_position_only() {
        let board = two_block_board();
        assert_eq!(board.state_key(), vec![2, 0, 1, 3]);
        let moved = board.apply_move(0, EXIT_ROW, 1);
        assert_eq!(moved.state_key(), vec![2, 1, 1, 3]);
    }

    #[test]
    fn test_layout_signature_order_independent() {
        let a = Board::new(vec![Block::goal(0), Block::vertical(1, 0, 3, 2)]);
        let b = Board::new(vec![Block::vertical(7, 0, 3, 2), Block::goal(0)]);
        assert_eq!(a.layout_signature(), b.layout_signature());
    }

    #[test]
    fn test_validate_accepts_well_formed() {
        assert!(two_block_board().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_overlap() {
        let board = Board::new(vec![Block::goal(0), Block::horizontal(1, 2, 1, 2)]);
        let err = board.validate().unwrap_err();
        assert!(err.contains("overlap"), "unexpected error: {}", err);
    }

    #[test]
    fn test_validate_rejects_out_of_bounds() {
        let board = Board::new(vec![Block::goal(0), Block::vertical(1, 4, 5, 3)]);
        let err = board.validate().unwrap_err();
        assert!(err.contains("outside"), "unexpected error: {}", err);
    }

    #[test]
    fn test_validate_rejects_missing_goal() {
        let board = Board::new(vec![Block::vertical(1, 0, 0, 2)]);
        assert!(board.validate().is_err());
    }

    #[test]
    fn test_display_grid() {
        let board = two_block_board();
        let rendered = board.to_string();
        let rows: Vec<&str> = rendered.lines().collect();
        assert_eq!(rows.len(), GRID_SIZE);
        assert_eq!(rows[1], "...A..");
        assert_eq!(rows[2], "RR.A..");
    }

    #[test]
    fn test_display_tolerates_zero_id_block() {
        // `Board::new` performs no validation, so a non-goal block may carry
        // id 0; rendering must not underflow the letter lookup.
        let board = Board::new(vec![Block::goal(0), Block::horizontal(0, 5, 0, 2)]);
        let rendered = board.to_string();
        assert_eq!(rendered.lines().last().unwrap(), "AA....");
    }
}
