//! Terminal handling: clearing a node, beating the boss, defeat and voluntary exits.

use tracing::info;

use crate::progression::{Reward, credit_award};

use super::*;

impl SessionController {
    /// Settles a decided encounter. A cleared non-boss node advances the frontier and is
    /// saved; a cleared boss or a defeat ends the run.
    pub fn complete_encounter(&mut self) -> ActionOutcome {
        let Some(result) = self.run.encounter.as_ref().and_then(Encounter::result) else {
            return ActionOutcome::Ignored;
        };
        let Some(node_id) = self.run.current_node else {
            return ActionOutcome::Ignored;
        };

        match result {
            EncounterResult::Defeat => self.end_run(RunOutcome::Defeated),
            EncounterResult::Victory => {
                let remaining_health = self
                    .run
                    .encounter
                    .as_ref()
                    .map(|encounter| encounter.combatant().current_health);
                if let (Some(character), Some(health)) =
                    (self.run.character.as_mut(), remaining_health)
                {
                    character.current_health = health;
                }

                let is_boss =
                    self.run.tree.node(node_id).is_some_and(|node| node.kind == NodeKind::Boss);
                if is_boss {
                    self.end_run(RunOutcome::BossDefeated);
                } else {
                    self.run.tree.complete_node(node_id);
                    self.run.completed_nodes.push(node_id);
                    self.run.current_node = None;
                    self.run.encounter = None;
                    self.log.push(LogEvent::NodeCompleted { node: node_id });
                    self.save_progress();
                }
            }
        }
        ActionOutcome::Applied
    }

    /// Abandons an encounter that is still being fought.
    pub fn surrender_encounter(&mut self) -> ActionOutcome {
        match self.run.encounter.as_ref() {
            Some(encounter) if !encounter.is_decided() => {
                self.end_run(RunOutcome::Surrendered);
                ActionOutcome::Applied
            }
            _ => ActionOutcome::Ignored,
        }
    }

    /// Leaves the tree between encounters.
    pub fn emerge_from_forest(&mut self) -> ActionOutcome {
        if !self.run.in_tree() || self.run.encounter.is_some() {
            return ActionOutcome::Ignored;
        }
        self.end_run(RunOutcome::Emerged);
        ActionOutcome::Applied
    }

    fn end_run(&mut self, outcome: RunOutcome) {
        let reward = match outcome {
            RunOutcome::BossDefeated => Reward::BossDefeated,
            RunOutcome::Defeated | RunOutcome::Surrendered | RunOutcome::Emerged => {
                Reward::Partial { completed_nodes: self.run.completed_nodes.len() }
            }
        };
        let credits = credit_award(reward);
        let tree_index = self.run.tree_index;

        if let Some(active) = self.active_slot_mut() {
            active.credits += credits;
            if outcome == RunOutcome::BossDefeated
                && let Some(index) = tree_index
                && !active.completed_trees.contains(&index)
            {
                active.completed_trees.push(index);
            }
        }

        info!(?outcome, credits, completed = self.run.completed_nodes.len(), "run ended");
        self.run.discard_run();
        self.log.push(LogEvent::RunEnded { outcome, credits });
        self.save_progress();
    }
}
