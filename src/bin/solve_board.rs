use anyhow::{anyhow, Context, Result};
use clap::Parser;
use gridlock_solver::board::Board;
use gridlock_solver::solver::{solve, SearchBudget, SolveOutcome, StopReason, MAX_SEARCH_STATES};
use gridlock_solver::utils::board_from_str_array;
use std::fs;
use std::path::PathBuf;

/// Solves a single board given as an ASCII grid file.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Maximum number of BFS states to explore
    #[clap(long, default_value_t = MAX_SEARCH_STATES)]
    max_states: usize,

    /// Path to the board file (6x6 grid: '.' empty, 'R' goal, letters for blocks)
    board_file: PathBuf,
}

fn read_board_file(path: &PathBuf) -> Result<Board> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let lines: Vec<&str> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    board_from_str_array(&lines).map_err(|e| anyhow!("Invalid board format: {}", e))
}

fn main() -> Result<()> {
    let args = Args::parse();

    let board = read_board_file(&args.board_file)?;
    println!("Loaded board from {}\n", args.board_file.display());
    println!("{}\n", board);

    let budget = SearchBudget::with_max_states(args.max_states);
    match solve(&board, &budget) {
        SolveOutcome::Solved(moves) => {
            println!("Solution found ({} moves):", moves.len());
            for (i, mv) in moves.iter().enumerate() {
                println!(
                    "  Move {}: block {} ({}, {}) -> ({}, {})",
                    i + 1,
                    mv.block_id,
                    mv.from_row,
                    mv.from_col,
                    mv.to_row,
                    mv.to_col
                );
            }
        }
        SolveOutcome::Unsolvable => println!("Board is unsolvable."),
        SolveOutcome::Inconclusive(StopReason::BudgetExhausted) => {
            println!(
                "No solution within {} states; try a larger --max-states.",
                args.max_states
            );
        }
        SolveOutcome::Inconclusive(StopReason::Cancelled) => {
            println!("Search cancelled.");
        }
    }

    Ok(())
}
