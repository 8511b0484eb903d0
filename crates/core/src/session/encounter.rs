//! Run setup and the in-encounter operations the controller forwards to combat.

use tracing::debug;

use crate::combat::{build_deck, spawn_enemy};
use crate::content::{TREE_COUNT, champion};
use crate::mapgen::TreeGenerator;
use crate::rng::MAP_STREAM;

use super::*;

impl SessionController {
    pub fn select_tree(&mut self, index: u8) -> ActionOutcome {
        if index >= TREE_COUNT || self.run.in_tree() {
            return ActionOutcome::Ignored;
        }
        self.run.tree_index = Some(index);
        ActionOutcome::Applied
    }

    /// Instantiates `champion` at full health from its effective stats for the active slot.
    pub fn initialize_character(&mut self, champion_id: ChampionId) -> ActionOutcome {
        if self.active_save().is_none() || self.run.in_tree() {
            return ActionOutcome::Ignored;
        }
        let def = champion(champion_id);
        let stats = self.effective_stats(champion_id);
        self.run.character = Some(RunCharacter::from_stats(champion_id, def.name, &stats));

        debug!(champion = champion_id.as_str(), health = stats.health, "character initialized");
        self.log.push(LogEvent::CharacterInitialized { champion: champion_id });
        ActionOutcome::Applied
    }

    /// Generates a fresh tree for the selected tree index. Each generated tree draws from
    /// its own map stream so replays rebuild identical graphs.
    pub fn initialize_tree(&mut self) -> ActionOutcome {
        let Some(tree_index) = self.run.tree_index else {
            return ActionOutcome::Ignored;
        };
        if self.run.character.is_none() || self.run.difficulty.is_none() || self.run.in_tree() {
            return ActionOutcome::Ignored;
        }

        let map_seed = derive_stream_seed(self.seed, MAP_STREAM.wrapping_add(self.trees_generated));
        self.trees_generated += 1;
        let tree = TreeGenerator::new(self.layout.clone(), map_seed).generate();
        let nodes = tree.nodes().len();

        self.run.tree = tree;
        self.run.completed_nodes.clear();
        self.run.current_node = None;

        debug!(tree_index, nodes, "tree generated");
        self.log.push(LogEvent::TreeGenerated { tree_index, nodes });
        self.save_progress();
        ActionOutcome::Applied
    }

    pub fn select_node(&mut self, node: NodeId) -> ActionOutcome {
        if self.run.encounter.is_some() || !self.run.tree.is_available(node) {
            return ActionOutcome::Ignored;
        }
        self.run.current_node = Some(node);
        self.log.push(LogEvent::NodeSelected { node });
        ActionOutcome::Applied
    }

    /// Spawns the selected node's enemy, scaled by difficulty and tree depth, against a
    /// freshly built and shuffled deck.
    pub fn start_encounter(&mut self) -> ActionOutcome {
        if self.run.encounter.is_some() {
            return ActionOutcome::Ignored;
        }
        let (Some(difficulty), Some(tree_index), Some(character), Some(node_id)) = (
            self.run.difficulty,
            self.run.tree_index,
            self.run.character.as_ref(),
            self.run.current_node,
        ) else {
            return ActionOutcome::Ignored;
        };
        let Some(node) = self.run.tree.node(node_id) else {
            return ActionOutcome::Ignored;
        };
        if !node.available {
            return ActionOutcome::Ignored;
        }

        let enemy =
            spawn_enemy(node.kind, difficulty, u32::from(tree_index), &mut self.combat_rng);
        let cards = build_deck(character.champion, character.offense, character.defense);
        let card_draw = character.card_draw as usize;
        let combatant = character.combatant();

        let enemy_name = enemy.name.to_string();
        debug!(node = %node_id, enemy = %enemy_name, kind = node.kind.as_str(), "encounter started");
        self.run.encounter =
            Some(Encounter::start(combatant, enemy, cards, card_draw, &mut self.combat_rng));
        self.log.push(LogEvent::EncounterStarted { node: node_id, enemy: enemy_name });
        ActionOutcome::Applied
    }

    pub fn play_card(&mut self, card: CardId, targets_enemy: bool) -> ActionOutcome {
        let Some(encounter) = self.run.encounter.as_mut() else {
            return ActionOutcome::Ignored;
        };
        let name = encounter.card(card).map(|card| card.name);
        let outcome = encounter.play_card(card, targets_enemy);
        if !outcome.is_applied() {
            return outcome;
        }

        if let Some(name) = name {
            self.log.push(LogEvent::CardPlayed { name });
        }
        self.note_decision();
        outcome
    }

    pub fn end_turn(&mut self) -> ActionOutcome {
        let Some(encounter) = self.run.encounter.as_mut() else {
            return ActionOutcome::Ignored;
        };
        let turn = encounter.turn();
        let outcome = encounter.end_turn(&mut self.combat_rng);
        if !outcome.is_applied() {
            return outcome;
        }

        self.log.push(LogEvent::TurnEnded { turn });
        self.note_decision();
        outcome
    }

    fn note_decision(&mut self) {
        if let Some(result) = self.run.encounter.as_ref().and_then(Encounter::result) {
            debug!(?result, "encounter decided");
            self.log.push(LogEvent::EncounterDecided { result });
        }
    }
}
