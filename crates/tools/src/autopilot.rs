//! Scripted players that drive a `SessionController` through one run.

use grove::{
    ActionOutcome, CardKind, ChampionId, Difficulty, Encounter, SessionAction, SessionController,
};
use rand_chacha::{ChaCha8Rng, rand_core::SeedableRng};

use crate::chaos::choose;

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Policy {
    /// Attacks first, always takes the leftmost open node.
    Greedy,
    /// Uniform choice among legal moves.
    Random,
}

/// What the autopilot sets up before entering the tree.
#[derive(Clone, Debug)]
pub struct RunPlan {
    pub slot: u8,
    pub username: String,
    pub difficulty: Difficulty,
    pub tree: u8,
    pub champion: ChampionId,
}

pub struct Autopilot {
    policy: Policy,
    rng: ChaCha8Rng,
    entered_tree: bool,
}

impl Autopilot {
    pub fn new(policy: Policy, seed: u64) -> Self {
        Self { policy, rng: ChaCha8Rng::seed_from_u64(seed), entered_tree: false }
    }

    /// Next action for the current state, or `None` once the run has ended.
    pub fn next_action(
        &mut self,
        controller: &SessionController,
        plan: &RunPlan,
    ) -> Option<SessionAction> {
        if let Some(encounter) = controller.encounter() {
            return Some(self.combat_action(encounter));
        }
        if controller.run().in_tree() {
            self.entered_tree = true;
            return self.path_action(controller);
        }
        if self.entered_tree {
            return None;
        }
        Some(setup_action(controller, plan))
    }

    fn combat_action(&mut self, encounter: &Encounter) -> SessionAction {
        if encounter.is_decided() {
            return SessionAction::CompleteEncounter;
        }
        let energy = encounter.current_energy();
        let playable: Vec<_> =
            encounter.hand().into_iter().filter(|card| card.cost <= energy).collect();

        let pick = match self.policy {
            Policy::Greedy => playable
                .iter()
                .find(|card| card.kind == CardKind::Attack)
                .or_else(|| playable.first())
                .map(|card| card.id),
            Policy::Random => {
                let mut options: Vec<_> = playable.iter().map(|card| Some(card.id)).collect();
                options.push(None);
                choose(&mut self.rng, &options)
            }
        };
        match pick {
            Some(card) => SessionAction::PlayCard { card, targets_enemy: true },
            None => SessionAction::EndTurn,
        }
    }

    fn path_action(&mut self, controller: &SessionController) -> Option<SessionAction> {
        let tree = controller.tree();
        if let Some(selected) = controller.snapshot().current_node
            && tree.is_available(selected)
        {
            return Some(SessionAction::StartEncounter);
        }
        let open: Vec<_> = tree.nodes().iter().filter(|node| node.available).map(|n| n.id).collect();
        if open.is_empty() {
            return Some(SessionAction::EmergeFromForest);
        }
        let node = match self.policy {
            Policy::Greedy => open[0],
            Policy::Random => choose(&mut self.rng, &open),
        };
        Some(SessionAction::SelectNode { node })
    }
}

fn setup_action(controller: &SessionController, plan: &RunPlan) -> SessionAction {
    let Some(active) = controller.active_slot().and_then(|slot| controller.slot(slot)) else {
        return match controller.slot(plan.slot) {
            Some(slot) if !slot.is_empty => SessionAction::LoadSlot { slot: plan.slot },
            _ => SessionAction::CreateSlot { slot: plan.slot, username: plan.username.clone() },
        };
    };
    let snapshot = controller.snapshot();
    if active.difficulty != Some(plan.difficulty) || snapshot.difficulty.is_none() {
        SessionAction::SetDifficulty { difficulty: plan.difficulty }
    } else if snapshot.tree_index.is_none() {
        SessionAction::SelectTree { index: plan.tree }
    } else if snapshot.character.is_none() {
        SessionAction::InitializeCharacter { champion: plan.champion }
    } else {
        SessionAction::InitializeTree
    }
}

/// Drives `controller` through one run, feeding every action and outcome to `record`.
/// Stops after `max_steps` actions even if the run is still going.
pub fn play_run(
    controller: &mut SessionController,
    autopilot: &mut Autopilot,
    plan: &RunPlan,
    max_steps: u32,
    mut record: impl FnMut(&SessionAction, ActionOutcome),
) -> u32 {
    let mut steps = 0;
    while steps < max_steps {
        let Some(action) = autopilot.next_action(controller, plan) else {
            break;
        };
        let outcome = controller.apply(action.clone());
        record(&action, outcome);
        steps += 1;
    }
    steps
}
