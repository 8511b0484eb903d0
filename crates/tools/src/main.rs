use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use grove_tools::replay_file;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the JSONL session journal to replay
    #[arg(short, long)]
    journal: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let (journal, result) = replay_file(&args.journal)
        .with_context(|| format!("Failed to replay journal file: {}", args.journal.display()))?;

    println!("Replay complete.");
    println!("User: {}", journal.user);
    println!("Build: {}", journal.build_id);
    println!("Seed: {}", journal.seed);
    println!("Actions applied: {}", result.actions_applied);
    println!("Actions ignored: {}", result.actions_ignored);
    println!("Snapshot Hash: {}", result.final_snapshot_hash);

    Ok(())
}
