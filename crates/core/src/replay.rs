use thiserror::Error;

use crate::journal::{JOURNAL_FORMAT_VERSION, SessionJournal};
use crate::mapgen::LayoutError;
use crate::session::SessionController;
use crate::types::ActionOutcome;

#[derive(Debug, PartialEq, Error)]
pub enum ReplayError {
    #[error("journal format version {found} is not supported")]
    UnsupportedVersion { found: u16 },
    #[error("journal layout is invalid")]
    InvalidLayout(#[from] LayoutError),
    #[error("action {seq} is out of sequence (expected {expected})")]
    OutOfSequence { seq: u64, expected: u64 },
    #[error("action {seq} was {recorded:?} when recorded but {replayed:?} on replay")]
    Diverged { seq: u64, recorded: ActionOutcome, replayed: ActionOutcome },
}

#[derive(Debug, PartialEq, Eq)]
pub struct ReplayResult {
    pub final_snapshot_hash: u64,
    pub actions_applied: usize,
    pub actions_ignored: usize,
}

/// Rebuilds a controller from the journal seed and re-applies every action, checking each
/// one lands with the outcome it had when recorded.
pub fn replay_journal(journal: &SessionJournal) -> Result<ReplayResult, ReplayError> {
    replay_into(journal).map(|(_, result)| result)
}

/// Like `replay_journal`, but hands back the rebuilt controller for further play.
pub fn replay_into(
    journal: &SessionJournal,
) -> Result<(SessionController, ReplayResult), ReplayError> {
    if journal.format_version != JOURNAL_FORMAT_VERSION {
        return Err(ReplayError::UnsupportedVersion { found: journal.format_version });
    }
    journal.layout.validate()?;

    let mut controller =
        SessionController::with_layout(journal.user.clone(), journal.seed, journal.layout.clone());
    let mut result = ReplayResult { final_snapshot_hash: 0, actions_applied: 0, actions_ignored: 0 };

    for (expected, record) in (0_u64..).zip(&journal.actions) {
        if record.seq != expected {
            return Err(ReplayError::OutOfSequence { seq: record.seq, expected });
        }
        let replayed = controller.apply(record.action.clone());
        if replayed != record.outcome {
            return Err(ReplayError::Diverged {
                seq: record.seq,
                recorded: record.outcome,
                replayed,
            });
        }
        match replayed {
            ActionOutcome::Applied => result.actions_applied += 1,
            ActionOutcome::Ignored => result.actions_ignored += 1,
        }
    }

    result.final_snapshot_hash = controller.snapshot_hash();
    Ok((controller, result))
}
