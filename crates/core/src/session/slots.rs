//! Save slot records and the slot lifecycle: create, delete, load, hydrate, save.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::content::champion;
use crate::mapgen::{Tree, TreeNode};
use crate::progression::{StatUpgrades, effective_stats};

use super::*;

pub const SLOT_COUNT: u8 = 3;

/// One persisted player profile: permanent progress plus a snapshot of the run in progress.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveSlot {
    pub slot: u8,
    pub is_empty: bool,
    pub username: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub credits: u32,
    pub champion: Option<ChampionId>,
    pub tree_index: Option<u8>,
    pub current_node: Option<NodeId>,
    pub current_health: Option<u32>,
    pub max_health: Option<u32>,
    /// Combat stats the run started with; later upgrades do not touch a run in progress.
    #[serde(default)]
    pub offense: Option<u32>,
    #[serde(default)]
    pub defense: Option<u32>,
    #[serde(default)]
    pub completed_nodes: Vec<NodeId>,
    pub in_tree: bool,
    #[serde(default)]
    pub tree: Vec<TreeNode>,
    #[serde(default)]
    pub upgrades: BTreeMap<ChampionId, StatUpgrades>,
    #[serde(default)]
    pub completed_trees: Vec<u8>,
}

impl SaveSlot {
    pub fn empty(slot: u8) -> Self {
        Self {
            slot,
            is_empty: true,
            username: None,
            difficulty: None,
            credits: 0,
            champion: None,
            tree_index: None,
            current_node: None,
            current_health: None,
            max_health: None,
            offense: None,
            defense: None,
            completed_nodes: Vec::new(),
            in_tree: false,
            tree: Vec::new(),
            upgrades: BTreeMap::new(),
            completed_trees: Vec::new(),
        }
    }

    pub fn upgrades_for(&self, champion: ChampionId) -> StatUpgrades {
        self.upgrades.get(&champion).copied().unwrap_or_default()
    }
}

/// Upsert unit for the save store, keyed by `(user, slot.slot)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveRecord {
    pub user: String,
    pub slot: SaveSlot,
}

pub(super) fn empty_slots() -> Vec<SaveSlot> {
    (1..=SLOT_COUNT).map(SaveSlot::empty).collect()
}

/// Slots are numbered from 1.
pub(super) fn slot_index(slot: u8) -> Option<usize> {
    (1..=SLOT_COUNT).contains(&slot).then(|| usize::from(slot - 1))
}

impl SessionController {
    /// Claims an empty slot for `username` and makes it active. Not while a fight is open.
    pub fn create_slot(&mut self, slot: u8, username: &str) -> ActionOutcome {
        let username = username.trim();
        let Some(index) = slot_index(slot) else {
            return ActionOutcome::Ignored;
        };
        if username.is_empty() || !self.slots[index].is_empty || self.run.encounter.is_some() {
            return ActionOutcome::Ignored;
        }

        self.slots[index] =
            SaveSlot { is_empty: false, username: Some(username.to_string()), ..SaveSlot::empty(slot) };
        self.active_slot = Some(slot);
        self.run = RunState::default();

        debug!(slot, username, "save slot created");
        self.log.push(LogEvent::SlotCreated { slot });
        self.push_upsert(slot);
        ActionOutcome::Applied
    }

    /// Wipes a slot. `confirmation` must repeat the slot's username exactly.
    pub fn delete_slot(&mut self, slot: u8, confirmation: &str) -> ActionOutcome {
        let Some(index) = slot_index(slot) else {
            return ActionOutcome::Ignored;
        };
        let target = &self.slots[index];
        if target.is_empty || target.username.as_deref() != Some(confirmation) {
            return ActionOutcome::Ignored;
        }

        self.slots[index] = SaveSlot::empty(slot);
        if self.active_slot == Some(slot) {
            self.active_slot = None;
            self.run = RunState::default();
        }

        debug!(slot, "save slot deleted");
        self.log.push(LogEvent::SlotDeleted { slot });
        self.effects.push(PersistenceEffect::Delete { user: self.user.clone(), slot });
        ActionOutcome::Applied
    }

    /// Activates a slot and restores its run. A slot saved mid-tree brings back the tree
    /// graph, the completed path and the champion at its persisted health and stats.
    /// An open encounter must be settled first.
    pub fn load_slot(&mut self, slot: u8) -> ActionOutcome {
        let Some(index) = slot_index(slot) else {
            return ActionOutcome::Ignored;
        };
        let saved = &self.slots[index];
        if saved.is_empty || self.run.encounter.is_some() {
            return ActionOutcome::Ignored;
        }

        let mut run = RunState {
            difficulty: saved.difficulty,
            tree_index: saved.tree_index,
            completed_nodes: saved.completed_nodes.clone(),
            ..RunState::default()
        };
        if saved.in_tree
            && !saved.tree.is_empty()
            && let Some(champion_id) = saved.champion
        {
            let def = champion(champion_id);
            let stats = effective_stats(&def.base, &saved.upgrades_for(champion_id));
            let mut character = RunCharacter::from_stats(champion_id, def.name, &stats);
            character.max_health = saved.max_health.unwrap_or(stats.health);
            character.current_health =
                saved.current_health.unwrap_or(character.max_health).min(character.max_health);
            character.offense = saved.offense.unwrap_or(stats.offense);
            character.defense = saved.defense.unwrap_or(stats.defense);
            run.character = Some(character);
            run.tree = Tree::from_nodes(saved.tree.clone());
        } else {
            run.tree_index = None;
            run.completed_nodes.clear();
        }

        let resumed_run = run.in_tree();
        self.run = run;
        self.active_slot = Some(slot);

        debug!(slot, resumed_run, "save slot loaded");
        self.log.push(LogEvent::SlotLoaded { slot, resumed_run });
        ActionOutcome::Applied
    }

    /// Adopts records fetched from the store. Records for another user or an unknown slot
    /// number are skipped. Nothing is re-emitted: the store already holds these.
    pub fn hydrate_slots(&mut self, records: Vec<SaveRecord>) -> ActionOutcome {
        let mut applied = false;
        for record in records {
            if record.user != self.user {
                continue;
            }
            let Some(index) = slot_index(record.slot.slot) else {
                continue;
            };
            self.slots[index] = record.slot;
            applied = true;
        }
        ActionOutcome::from_applied(applied)
    }

    pub fn hydrate_from_store(
        &mut self,
        store: &dyn SaveStore,
    ) -> Result<ActionOutcome, StoreError> {
        let records = store.fetch_slots(&self.user)?;
        Ok(self.hydrate_slots(records))
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> ActionOutcome {
        if self.run.in_tree() {
            return ActionOutcome::Ignored;
        }
        let Some(active) = self.active_slot_mut() else {
            return ActionOutcome::Ignored;
        };
        active.difficulty = Some(difficulty);
        let slot = active.slot;
        self.run.difficulty = Some(difficulty);

        debug!(slot, ?difficulty, "difficulty set");
        self.push_upsert(slot);
        ActionOutcome::Applied
    }

    /// Writes the in-memory run into the active slot and queues an upsert.
    pub fn save_progress(&mut self) -> ActionOutcome {
        let in_tree = self.run.in_tree();
        let run = &self.run;
        let tree_nodes = if in_tree { run.tree.nodes().to_vec() } else { Vec::new() };
        let character = run.character.clone();
        let (difficulty, tree_index, current_node, completed_nodes) =
            (run.difficulty, run.tree_index, run.current_node, run.completed_nodes.clone());

        let Some(active) = self.active_slot_mut() else {
            return ActionOutcome::Ignored;
        };
        if let Some(character) = character {
            active.champion = Some(character.champion);
            active.current_health = Some(character.current_health);
            active.max_health = Some(character.max_health);
            active.offense = Some(character.offense);
            active.defense = Some(character.defense);
        }
        active.difficulty = difficulty;
        active.tree_index = tree_index;
        active.current_node = current_node;
        active.completed_nodes = completed_nodes;
        active.in_tree = in_tree;
        active.tree = tree_nodes;
        let slot = active.slot;

        self.push_upsert(slot);
        ActionOutcome::Applied
    }
}
