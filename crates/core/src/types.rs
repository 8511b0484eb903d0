use std::fmt;

use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    pub struct CardId;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ChampionId {
    Warrior,
    Guardian,
    Mystic,
}

impl ChampionId {
    pub const ALL: [ChampionId; 3] = [ChampionId::Warrior, ChampionId::Guardian, ChampionId::Mystic];

    pub fn as_str(self) -> &'static str {
        match self {
            ChampionId::Warrior => "warrior",
            ChampionId::Guardian => "guardian",
            ChampionId::Mystic => "mystic",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Beginner,
    Easy,
    Hard,
    Nightmare,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] =
        [Difficulty::Beginner, Difficulty::Easy, Difficulty::Hard, Difficulty::Nightmare];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Basic,
    Elite,
    Boss,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Basic => "basic",
            NodeKind::Elite => "elite",
            NodeKind::Boss => "boss",
        }
    }
}

/// Grid coordinate of a tree node. Rows grow away from the entrance; the boss sits in the last row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId {
    pub row: u8,
    pub col: u8,
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node-{}-{}", self.row, self.col)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardKind {
    Attack,
    Skill,
    Power,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    Chill,
    Exhaust,
    ShieldBash,
}

/// Secondary effect carried by an attack card. `magnitude` is a percentage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardEffect {
    pub kind: EffectKind,
    pub magnitude: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DebuffKind {
    Chill,
    Exhaust,
}

impl DebuffKind {
    pub fn name(self) -> &'static str {
        match self {
            DebuffKind::Chill => "Chill",
            DebuffKind::Exhaust => "Exhaust",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntentAction {
    Attack,
    Shield,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StatKind {
    Health,
    Offense,
    Defense,
}

impl StatKind {
    pub const ALL: [StatKind; 3] = [StatKind::Health, StatKind::Offense, StatKind::Defense];
}

/// Result of a gameplay operation. Rejected input leaves every piece of state untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionOutcome {
    Applied,
    Ignored,
}

impl ActionOutcome {
    pub fn is_applied(self) -> bool {
        self == ActionOutcome::Applied
    }

    pub(crate) fn from_applied(applied: bool) -> Self {
        if applied { ActionOutcome::Applied } else { ActionOutcome::Ignored }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EncounterResult {
    Victory,
    Defeat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunOutcome {
    BossDefeated,
    Defeated,
    Surrendered,
    Emerged,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LogEvent {
    SlotCreated { slot: u8 },
    SlotDeleted { slot: u8 },
    SlotLoaded { slot: u8, resumed_run: bool },
    CharacterInitialized { champion: ChampionId },
    TreeGenerated { tree_index: u8, nodes: usize },
    NodeSelected { node: NodeId },
    EncounterStarted { node: NodeId, enemy: String },
    CardPlayed { name: &'static str },
    TurnEnded { turn: u32 },
    EncounterDecided { result: EncounterResult },
    NodeCompleted { node: NodeId },
    RunEnded { outcome: RunOutcome, credits: u32 },
    StatUpgraded { champion: ChampionId, stat: StatKind, level: u32, cost: u32 },
}
