//! Run orchestration: save slots, tree lifecycle, encounters and persistence effects.
//! Every operation mutates the owned `RunState`/slot table and reports whether it applied;
//! persistence is only ever emitted as `PersistenceEffect`s for an external sync worker.

use std::mem;

use serde::{Deserialize, Serialize};

use crate::combat::{Card, Combatant, Encounter, Enemy};
use crate::content::BaseStats;
use crate::mapgen::{Tree, TreeLayout, TreeNode};
use crate::rng::{COMBAT_STREAM, RandomSource, derive_stream_seed};
use crate::types::*;

mod encounter;
mod hash;
mod outcome;
mod progress;
mod slots;
pub mod store;


pub use slots::{SLOT_COUNT, SaveRecord, SaveSlot};
pub use store::{MemoryStore, PersistenceEffect, SaveStore, StoreError, SyncQueue, SyncReport};

/// The champion instance carried through one run. Health persists between encounters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunCharacter {
    pub champion: ChampionId,
    pub name: &'static str,
    pub current_health: u32,
    pub max_health: u32,
    pub max_energy: u32,
    pub offense: u32,
    pub defense: u32,
    pub card_draw: u32,
}

impl RunCharacter {
    pub(crate) fn from_stats(champion: ChampionId, name: &'static str, stats: &BaseStats) -> Self {
        Self {
            champion,
            name,
            current_health: stats.health,
            max_health: stats.health,
            max_energy: stats.energy,
            offense: stats.offense,
            defense: stats.defense,
            card_draw: stats.card_draw,
        }
    }

    pub(crate) fn combatant(&self) -> Combatant {
        Combatant::new(
            self.current_health,
            self.max_health,
            self.max_energy,
            self.offense,
            self.defense,
        )
    }
}

/// Everything that belongs to the run in progress. Cleared wholesale when a run ends.
#[derive(Clone, Debug, Default)]
pub struct RunState {
    pub(crate) difficulty: Option<Difficulty>,
    pub(crate) tree_index: Option<u8>,
    pub(crate) character: Option<RunCharacter>,
    pub(crate) tree: Tree,
    pub(crate) current_node: Option<NodeId>,
    pub(crate) completed_nodes: Vec<NodeId>,
    pub(crate) encounter: Option<Encounter>,
}

impl RunState {
    pub fn in_tree(&self) -> bool {
        !self.tree.is_empty()
    }

    /// Drops the tree, champion instance and combat state. Difficulty stays with the slot.
    pub(crate) fn discard_run(&mut self) {
        self.tree_index = None;
        self.character = None;
        self.tree = Tree::default();
        self.current_node = None;
        self.completed_nodes.clear();
        self.encounter = None;
    }
}

/// Reducer input. Every public mutating operation on the controller is one of these.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SessionAction {
    CreateSlot { slot: u8, username: String },
    DeleteSlot { slot: u8, confirmation: String },
    LoadSlot { slot: u8 },
    HydrateSlots { records: Vec<SaveRecord> },
    SetDifficulty { difficulty: Difficulty },
    SelectTree { index: u8 },
    InitializeCharacter { champion: ChampionId },
    InitializeTree,
    SelectNode { node: NodeId },
    StartEncounter,
    PlayCard { card: CardId, targets_enemy: bool },
    EndTurn,
    CompleteEncounter,
    SurrenderEncounter,
    EmergeFromForest,
    UpgradeStat { champion: ChampionId, stat: StatKind },
    SaveProgress,
}

/// Read-only view handed to presentation code.
#[derive(Debug)]
pub struct SessionSnapshot<'a> {
    pub active_slot: Option<u8>,
    pub difficulty: Option<Difficulty>,
    pub tree_index: Option<u8>,
    pub character: Option<&'a RunCharacter>,
    pub combatant: Option<&'a Combatant>,
    pub enemy: Option<&'a Enemy>,
    pub hand: Vec<&'a Card>,
    pub deck: Vec<&'a Card>,
    pub discard_pile: Vec<&'a Card>,
    pub current_energy: u32,
    pub tree_nodes: &'a [TreeNode],
    pub current_node: Option<NodeId>,
    pub completed_nodes: &'a [NodeId],
    pub save_slots: &'a [SaveSlot],
    pub encounter_result: Option<EncounterResult>,
}

pub struct SessionController {
    user: String,
    seed: u64,
    layout: TreeLayout,
    combat_rng: RandomSource,
    trees_generated: u64,
    active_slot: Option<u8>,
    slots: Vec<SaveSlot>,
    run: RunState,
    effects: Vec<PersistenceEffect>,
    log: Vec<LogEvent>,
}

impl SessionController {
    pub fn new(user: impl Into<String>, seed: u64) -> Self {
        Self::with_layout(user, seed, TreeLayout::default())
    }

    /// `layout` is trusted; callers loading it from outside should `validate()` first.
    pub fn with_layout(user: impl Into<String>, seed: u64, layout: TreeLayout) -> Self {
        Self {
            user: user.into(),
            seed,
            layout,
            combat_rng: RandomSource::from_seed(derive_stream_seed(seed, COMBAT_STREAM)),
            trees_generated: 0,
            active_slot: None,
            slots: slots::empty_slots(),
            run: RunState::default(),
            effects: Vec::new(),
            log: Vec::new(),
        }
    }

    pub fn apply(&mut self, action: SessionAction) -> ActionOutcome {
        match action {
            SessionAction::CreateSlot { slot, username } => self.create_slot(slot, &username),
            SessionAction::DeleteSlot { slot, confirmation } => {
                self.delete_slot(slot, &confirmation)
            }
            SessionAction::LoadSlot { slot } => self.load_slot(slot),
            SessionAction::HydrateSlots { records } => self.hydrate_slots(records),
            SessionAction::SetDifficulty { difficulty } => self.set_difficulty(difficulty),
            SessionAction::SelectTree { index } => self.select_tree(index),
            SessionAction::InitializeCharacter { champion } => self.initialize_character(champion),
            SessionAction::InitializeTree => self.initialize_tree(),
            SessionAction::SelectNode { node } => self.select_node(node),
            SessionAction::StartEncounter => self.start_encounter(),
            SessionAction::PlayCard { card, targets_enemy } => self.play_card(card, targets_enemy),
            SessionAction::EndTurn => self.end_turn(),
            SessionAction::CompleteEncounter => self.complete_encounter(),
            SessionAction::SurrenderEncounter => self.surrender_encounter(),
            SessionAction::EmergeFromForest => self.emerge_from_forest(),
            SessionAction::UpgradeStat { champion, stat } => self.upgrade_stat(champion, stat),
            SessionAction::SaveProgress => self.save_progress(),
        }
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn layout(&self) -> &TreeLayout {
        &self.layout
    }

    pub fn run(&self) -> &RunState {
        &self.run
    }

    pub fn tree(&self) -> &Tree {
        &self.run.tree
    }

    pub fn character(&self) -> Option<&RunCharacter> {
        self.run.character.as_ref()
    }

    pub fn encounter(&self) -> Option<&Encounter> {
        self.run.encounter.as_ref()
    }

    pub fn active_slot(&self) -> Option<u8> {
        self.active_slot
    }

    pub fn slots(&self) -> &[SaveSlot] {
        &self.slots
    }

    pub fn slot(&self, slot: u8) -> Option<&SaveSlot> {
        slots::slot_index(slot).map(|index| &self.slots[index])
    }

    pub fn log(&self) -> &[LogEvent] {
        &self.log
    }

    /// Hands queued persistence effects to the caller, oldest first.
    pub fn drain_effects(&mut self) -> Vec<PersistenceEffect> {
        mem::take(&mut self.effects)
    }

    pub fn pending_effects(&self) -> &[PersistenceEffect] {
        &self.effects
    }

    pub fn snapshot(&self) -> SessionSnapshot<'_> {
        let encounter = self.run.encounter.as_ref();
        SessionSnapshot {
            active_slot: self.active_slot,
            difficulty: self.run.difficulty,
            tree_index: self.run.tree_index,
            character: self.run.character.as_ref(),
            combatant: encounter.map(Encounter::combatant),
            enemy: encounter.map(Encounter::enemy),
            hand: encounter.map(Encounter::hand).unwrap_or_default(),
            deck: encounter.map(Encounter::deck).unwrap_or_default(),
            discard_pile: encounter.map(Encounter::discard_pile).unwrap_or_default(),
            current_energy: encounter.map_or(0, Encounter::current_energy),
            tree_nodes: self.run.tree.nodes(),
            current_node: self.run.current_node,
            completed_nodes: &self.run.completed_nodes,
            save_slots: &self.slots,
            encounter_result: encounter.and_then(Encounter::result),
        }
    }

    fn active_slot_mut(&mut self) -> Option<&mut SaveSlot> {
        let index = slots::slot_index(self.active_slot?)?;
        let slot = &mut self.slots[index];
        (!slot.is_empty).then_some(slot)
    }

    fn active_save(&self) -> Option<&SaveSlot> {
        let index = slots::slot_index(self.active_slot?)?;
        let slot = &self.slots[index];
        (!slot.is_empty).then_some(slot)
    }

    fn push_upsert(&mut self, slot: u8) {
        if let Some(index) = slots::slot_index(slot) {
            let record = SaveRecord { user: self.user.clone(), slot: self.slots[index].clone() };
            self.effects.push(PersistenceEffect::Upsert(record));
        }
    }
}
