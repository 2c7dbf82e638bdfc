//! BFS solvability and shortest-solution search.
//!
//! Both queries walk the same implicit graph: nodes are board
//! configurations, edges are single-block slides. Breadth-first order gives
//! the shortest-path guarantee the scoring formula depends on, and a
//! visited set keyed on the canonical state serialization keeps the search
//! tractable. [`check`] answers "is this solvable at all"; [`solve`]
//! additionally carries the move path in each queue entry so the winning
//! path can be returned directly, with no parent-pointer reconstruction.

use crate::board::{Board, Move};
use rustc_hash::FxHashSet;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Default cap on dequeued states before a search gives up.
///
/// Guards against pathological boards causing unbounded search time. A
/// capped search is reported as [`StopReason::BudgetExhausted`], which
/// callers conservatively treat as "no solution found".
pub const MAX_SEARCH_STATES: usize = 50_000;

/// Shared flag for cancelling an in-flight search from another thread.
pub type CancelFlag = Arc<AtomicBool>;

/// Bounds on a single search: a state cap and an optional cancel flag,
/// checked once per dequeued state.
#[derive(Clone, Debug)]
pub struct SearchBudget {
    /// Maximum number of states popped from the frontier.
    pub max_states: usize,
    /// When set and flipped to `true`, the search stops at the next
    /// iteration with [`StopReason::Cancelled`].
    pub cancel: Option<CancelFlag>,
}

impl Default for SearchBudget {
    fn default() -> Self {
        SearchBudget {
            max_states: MAX_SEARCH_STATES,
            cancel: None,
        }
    }
}

impl SearchBudget {
    /// Budget with a custom state cap and no cancel flag.
    pub fn with_max_states(max_states: usize) -> Self {
        SearchBudget {
            max_states,
            cancel: None,
        }
    }

    /// Why a bounded search stopped early, if it did.
    fn interrupted(&self, states_popped: usize) -> Option<StopReason> {
        if let Some(flag) = &self.cancel {
            if flag.load(Ordering::Relaxed) {
                return Some(StopReason::Cancelled);
            }
        }
        if states_popped > self.max_states {
            return Some(StopReason::BudgetExhausted);
        }
        None
    }
}

/// Why a search stopped without a definitive answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// The state cap was hit before the frontier was exhausted.
    BudgetExhausted,
    /// The cancel flag was raised.
    Cancelled,
}

/// Result of a solvability query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// A goal state was dequeued.
    Solvable,
    /// The frontier was exhausted, or the board fails the goal-block
    /// precondition: proven unsolvable.
    Unsolvable,
    /// The search gave up before reaching a definitive answer.
    Inconclusive(StopReason),
}

impl Verdict {
    /// True only for a proven-solvable board.
    pub fn is_solvable(&self) -> bool {
        matches!(self, Verdict::Solvable)
    }
}

/// Result of a shortest-solution query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SolveOutcome {
    /// A minimum-length move sequence. Empty for an already-solved board.
    Solved(Vec<Move>),
    /// Proven unsolvable (frontier exhausted or precondition failed).
    Unsolvable,
    /// The search gave up before reaching a definitive answer.
    Inconclusive(StopReason),
}

impl SolveOutcome {
    /// Extracts the move path, or an empty list for any non-solved outcome.
    ///
    /// Collapses the unsolvable/inconclusive distinction the way the
    /// generator wants it: both mean "reject this candidate".
    pub fn into_moves(self) -> Vec<Move> {
        match self {
            SolveOutcome::Solved(moves) => moves,
            _ => Vec::new(),
        }
    }
}

/// Decides whether a board is solvable, within the given budget.
///
/// The goal test runs only on states popped from the frontier, never at
/// insertion time; this keeps the search shape identical to [`solve`], where
/// first-dequeue order is what guarantees minimality.
///
/// # Examples
/// ```
/// use gridlock_solver::board::{Block, Board};
/// use gridlock_solver::solver::{check, SearchBudget, Verdict};
///
/// let board = Board::new(vec![Block::goal(0), Block::vertical(1, 1, 2, 2)]);
/// assert_eq!(check(&board, &SearchBudget::default()), Verdict::Solvable);
/// ```
pub fn check(board: &Board, budget: &SearchBudget) -> Verdict {
    // Precondition violation, not a search failure.
    if !board.has_valid_goal() {
        return Verdict::Unsolvable;
    }

    let mut visited: FxHashSet<Vec<u8>> = FxHashSet::default();
    visited.insert(board.state_key());

    let mut queue = VecDeque::new();
    queue.push_back(board.clone());

    let mut states_popped = 0usize;
    while let Some(current) = queue.pop_front() {
        states_popped += 1;
        if let Some(reason) = budget.interrupted(states_popped) {
            return Verdict::Inconclusive(reason);
        }

        if current.is_solved() {
            return Verdict::Solvable;
        }

        for block_index in 0..current.blocks().len() {
            for (row, col) in current.possible_moves(block_index) {
                let next = current.apply_move(block_index, row, col);
                if visited.insert(next.state_key()) {
                    queue.push_back(next);
                }
            }
        }
    }

    Verdict::Unsolvable
}

/// Finds a minimum-length solution, within the given budget.
///
/// Identical search shape to [`check`], but each queue entry carries the
/// accumulated move path, trading memory for reconstruction-free results.
/// BFS guarantees the first goal state dequeued has a shortest path.
pub fn solve(board: &Board, budget: &SearchBudget) -> SolveOutcome {
    if !board.has_valid_goal() {
        return SolveOutcome::Unsolvable;
    }

    let mut visited: FxHashSet<Vec<u8>> = FxHashSet::default();
    visited.insert(board.state_key());

    let mut queue: VecDeque<(Board, Vec<Move>)> = VecDeque::new();
    queue.push_back((board.clone(), Vec::new()));

    let mut states_popped = 0usize;
    while let Some((current, path)) = queue.pop_front() {
        states_popped += 1;
        if let Some(reason) = budget.interrupted(states_popped) {
            return SolveOutcome::Inconclusive(reason);
        }

        if current.is_solved() {
            return SolveOutcome::Solved(path);
        }

        for block_index in 0..current.blocks().len() {
            for (row, col) in current.possible_moves(block_index) {
                let next = current.apply_move(block_index, row, col);
                if visited.insert(next.state_key()) {
                    let mut next_path = path.clone();
                    next_path.push(current.move_record(block_index, row, col));
                    queue.push_back((next, next_path));
                }
            }
        }
    }

    SolveOutcome::Unsolvable
}

/// Convenience wrapper: solvability with the default budget, treating an
/// inconclusive search as unsolvable. The generator relies on this
/// conservative false negative to simply retry with a fresh board.
pub fn is_solvable(board: &Board) -> bool {
    check(board, &SearchBudget::default()).is_solvable()
}

/// Convenience wrapper: shortest solution with the default budget, or an
/// empty path when none was found.
pub fn find_solution(board: &Board) -> Vec<Move> {
    solve(board, &SearchBudget::default()).into_moves()
}
