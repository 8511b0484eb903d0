use anyhow::{Context, Result, bail};
use clap::Parser;
use grove::{SessionController, SessionJournal, replay_journal};
use grove_tools::{check_invariants, random_action};
use rand_chacha::{ChaCha8Rng, rand_core::SeedableRng};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 1000)]
    steps: u32,
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("Starting Fuzz harness on seed {} for {} steps...", args.seed, args.steps);
    let mut controller = SessionController::new("fuzz", args.seed);
    let mut journal = SessionJournal::new("fuzz", args.seed);
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);

    let mut applied = 0;
    for step in 0..args.steps {
        let action = random_action(&controller, &mut rng);
        let outcome = controller.apply(action.clone());
        if outcome.is_applied() {
            applied += 1;
        }
        journal.append(action, outcome);
        controller.drain_effects();

        check_invariants(&controller).with_context(|| format!("at step {step}"))?;
    }

    let replayed = replay_journal(&journal).context("Replay diverged")?;
    if replayed.final_snapshot_hash != controller.snapshot_hash() {
        bail!("Replay hash mismatch");
    }

    println!("Applied {applied} of {} actions.", args.steps);
    println!("Fuzzing completed successfully.");
    Ok(())
}
