use serde::{Deserialize, Serialize};

use crate::mapgen::TreeLayout;
use crate::session::SessionAction;
use crate::types::ActionOutcome;

pub const JOURNAL_FORMAT_VERSION: u16 = 1;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionJournal {
    pub format_version: u16,
    pub build_id: String,
    pub seed: u64,
    pub user: String,
    #[serde(default)]
    pub layout: TreeLayout,
    pub actions: Vec<ActionRecord>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub seq: u64,
    pub action: SessionAction,
    pub outcome: ActionOutcome,
}

impl SessionJournal {
    pub fn new(user: impl Into<String>, seed: u64) -> Self {
        Self::with_layout(user, seed, TreeLayout::default())
    }

    pub fn with_layout(user: impl Into<String>, seed: u64, layout: TreeLayout) -> Self {
        Self {
            format_version: JOURNAL_FORMAT_VERSION,
            build_id: "dev".to_string(),
            seed,
            user: user.into(),
            layout,
            actions: Vec::new(),
        }
    }

    pub fn next_seq(&self) -> u64 {
        self.actions.last().map_or(0, |record| record.seq + 1)
    }

    pub fn append(&mut self, action: SessionAction, outcome: ActionOutcome) {
        let seq = self.next_seq();
        self.actions.push(ActionRecord { seq, action, outcome });
    }
}
