//! # Gridlock Solver Library
//!
//! Core logic for a 6x6 sliding-block puzzle: a board/move-legality model,
//! a BFS engine that decides solvability and computes minimum-move
//! solutions, and a difficulty-shaped procedural level generator.
//!
//! It is used by three binaries:
//! - `generate_levels`: bulk-generates a pre-validated level file.
//! - `score_levels`: recomputes optimal-move and best-score metadata for an
//!   existing level file.
//! - `solve_board`: solves a single board given as an ASCII grid file.
//!
//! ## Modules
//! - `board`: block and board representation (`Block`, `Board`, `Move`),
//!   move legality, and canonical state serialization.
//! - `solver`: bounded BFS queries (`check`, `solve`) with an explicit
//!   result taxonomy distinguishing proven-unsolvable from gave-up.
//! - `generator`: difficulty curve, strategic random placement, repair
//!   loop, and fallback boards.
//! - `levels`: persisted level sets, the batch generation/validation
//!   pipeline, scoring, and the runtime level library.
//! - `utils`: ASCII board parsing for tests and CLI tools.

pub mod board;
pub mod generator;
pub mod levels;
pub mod solver;
pub mod utils;
