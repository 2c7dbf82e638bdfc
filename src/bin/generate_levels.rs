use anyhow::{bail, Context, Result};
use clap::Parser;
use gridlock_solver::generator::LevelGenerator;
use gridlock_solver::levels;
use std::fs;
use std::path::PathBuf;

/// Bulk-generates a pre-validated level file with difficulty progression.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Number of levels to generate
    #[clap(short, long, default_value_t = 1000)]
    count: u32,

    /// Output path for the level file
    #[clap(short, long, default_value = "levels.json")]
    output: PathBuf,

    /// RNG seed for reproducible generation
    #[clap(short, long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("Generating {} levels...\n", args.count);

    let mut generator = match args.seed {
        Some(seed) => LevelGenerator::with_seed(seed),
        None => LevelGenerator::new(),
    };
    let set = levels::generate_all(args.count, &mut generator);

    println!("\nValidating all levels...");
    let report = levels::validate_all(&set);
    println!("Validation: {} valid, {} invalid", report.valid, report.invalid);
    if !report.is_ok() {
        bail!("{} levels failed validation", report.invalid);
    }

    set.save(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    let size = fs::metadata(&args.output).map(|m| m.len()).unwrap_or(0);
    println!("\nLevels saved to {} ({:.2} MB)", args.output.display(), size as f64 / 1_048_576.0);
    Ok(())
}
