use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use grove::{
    ChampionId, Difficulty, LogEvent, MemoryStore, SaveStore, SessionAction, SessionController,
    SessionJournal, SyncQueue, TreeLayout,
};
use grove_tools::{
    Autopilot, JsonFileStore, Policy, RunPlan, load_layout, play_run, write_journal,
};

#[derive(Parser)]
#[command(author, version, about = "Play scripted runs against the rules engine", long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 1)]
    runs: u32,
    #[arg(long, value_enum, default_value_t = Policy::Greedy)]
    policy: Policy,
    #[arg(long, default_value = "warrior")]
    champion: String,
    #[arg(long, default_value = "beginner")]
    difficulty: String,
    #[arg(long, default_value_t = 0)]
    tree: u8,
    #[arg(long, default_value_t = 1)]
    slot: u8,
    #[arg(long, default_value = "sim")]
    user: String,
    /// TOML file overriding the default tree layout
    #[arg(long)]
    layout: Option<PathBuf>,
    /// Persist save slots as JSON files under this directory
    #[arg(long)]
    save_dir: Option<PathBuf>,
    /// Write the session journal (JSONL) here for later replay
    #[arg(long)]
    journal: Option<PathBuf>,
    #[arg(long, default_value_t = 20_000)]
    max_steps: u32,
}

fn parse_champion(name: &str) -> Result<ChampionId> {
    ChampionId::ALL
        .into_iter()
        .find(|id| id.as_str().eq_ignore_ascii_case(name))
        .with_context(|| format!("Unknown champion: {name}"))
}

fn parse_difficulty(name: &str) -> Result<Difficulty> {
    Difficulty::ALL
        .into_iter()
        .find(|d| format!("{d:?}").eq_ignore_ascii_case(name))
        .with_context(|| format!("Unknown difficulty: {name}"))
}

fn main() -> Result<()> {
    let args = Args::parse();

    let layout = match &args.layout {
        Some(path) => load_layout(path)?,
        None => TreeLayout::default(),
    };
    let plan = RunPlan {
        slot: args.slot,
        username: args.user.clone(),
        difficulty: parse_difficulty(&args.difficulty)?,
        tree: args.tree,
        champion: parse_champion(&args.champion)?,
    };

    let mut store: Box<dyn SaveStore> = match &args.save_dir {
        Some(dir) => Box::new(JsonFileStore::new(dir)),
        None => Box::new(MemoryStore::new()),
    };
    let mut controller = SessionController::with_layout(&args.user, args.seed, layout.clone());
    let mut journal = SessionJournal::with_layout(&args.user, args.seed, layout);

    let records = store.fetch_slots(&args.user).context("Failed to read existing save slots")?;
    if !records.is_empty() {
        let action = SessionAction::HydrateSlots { records };
        let outcome = controller.apply(action.clone());
        journal.append(action, outcome);
    }

    let mut queue = SyncQueue::new();
    println!("Simulating {} run(s) on seed {}...", args.runs, args.seed);
    for run in 0..args.runs {
        let mut autopilot = Autopilot::new(args.policy, args.seed.wrapping_add(u64::from(run)));
        let steps =
            play_run(&mut controller, &mut autopilot, &plan, args.max_steps, |action, outcome| {
                journal.append(action.clone(), outcome);
            });

        queue.push_all(controller.drain_effects());
        let report = queue.flush(store.as_mut());
        if report.failed {
            bail!("Save store rejected a write; {} effect(s) still pending", report.pending);
        }

        let ended = controller.log().iter().rev().find_map(|event| match event {
            LogEvent::RunEnded { outcome, credits } => Some((*outcome, *credits)),
            _ => None,
        });
        match ended {
            Some((outcome, credits)) if !controller.run().in_tree() => {
                println!("Run {run}: {outcome:?} after {steps} actions, +{credits} credits")
            }
            _ => println!("Run {run}: stopped after {steps} actions without finishing"),
        }
    }

    if let Some(slot) = controller.slot(plan.slot) {
        println!("Slot {} credits: {}", slot.slot, slot.credits);
    }
    println!("Snapshot Hash: {}", controller.snapshot_hash());

    if let Some(path) = &args.journal {
        write_journal(path, &journal)
            .with_context(|| format!("Failed to write journal file: {}", path.display()))?;
        println!("Journal written to {}", path.display());
    }

    Ok(())
}
