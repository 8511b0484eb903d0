//! Random session input and the state invariants it must never break.
//!
//! Shared by the `fuzz` bin and the semantic fuzz test so both exercise the same policy.

use grove::{
    CardId, ChampionId, Difficulty, NodeId, NodeKind, SessionAction, SessionController, StatKind,
};
use rand_chacha::{ChaCha8Rng, rand_core::Rng};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("invariant violated: {0}")]
pub struct Violation(String);

pub(crate) fn choose<T: Clone>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    let p = rng.next_u64() as usize % slice.len();
    slice[p].clone()
}

/// Any action at all, legal or not, weighted toward ones that move the session along.
pub fn random_action(controller: &SessionController, rng: &mut ChaCha8Rng) -> SessionAction {
    if let Some(encounter) = controller.encounter() {
        let mut options = vec![SessionAction::EndTurn, SessionAction::CompleteEncounter];
        for &card in encounter.hand_ids() {
            options.push(SessionAction::PlayCard { card, targets_enemy: true });
            options.push(SessionAction::PlayCard { card, targets_enemy: rng.next_u64() % 2 == 0 });
        }
        if rng.next_u64() % 30 == 0 {
            options.push(SessionAction::SurrenderEncounter);
            options.push(SessionAction::PlayCard { card: CardId::default(), targets_enemy: true });
            options.push(SessionAction::EmergeFromForest);
            options.push(SessionAction::LoadSlot { slot: 1 });
            options.push(SessionAction::CreateSlot { slot: 2, username: "Bea".to_string() });
        }
        return choose(rng, &options);
    }

    let mut options = vec![
        SessionAction::CreateSlot {
            slot: (rng.next_u64() % 5) as u8,
            username: choose(rng, &["Ada".to_string(), String::new(), "Bea".to_string()]),
        },
        SessionAction::LoadSlot { slot: (rng.next_u64() % 4) as u8 },
        SessionAction::SetDifficulty { difficulty: choose(rng, &Difficulty::ALL) },
        SessionAction::SelectTree { index: (rng.next_u64() % 6) as u8 },
        SessionAction::InitializeCharacter { champion: choose(rng, &ChampionId::ALL) },
        SessionAction::InitializeTree,
        SessionAction::StartEncounter,
        SessionAction::UpgradeStat {
            champion: choose(rng, &ChampionId::ALL),
            stat: choose(rng, &StatKind::ALL),
        },
        SessionAction::SaveProgress,
        SessionAction::CompleteEncounter,
    ];
    if rng.next_u64() % 25 == 0 {
        options.push(SessionAction::DeleteSlot {
            slot: (rng.next_u64() % 4) as u8,
            confirmation: choose(rng, &["Ada".to_string(), "nope".to_string()]),
        });
        options.push(SessionAction::EmergeFromForest);
    }
    let nodes = controller.tree().nodes();
    if !nodes.is_empty() {
        let open: Vec<_> = nodes.iter().filter(|n| n.available).map(|n| n.id).collect();
        if !open.is_empty() {
            for _ in 0..3 {
                options.push(SessionAction::SelectNode { node: choose(rng, &open) });
            }
        }
        for _ in 0..2 {
            options.push(SessionAction::SelectNode { node: choose(rng, nodes).id });
        }
        options.push(SessionAction::SelectNode { node: NodeId { row: 0, col: 99 } });
    }
    choose(rng, &options)
}

/// Structural checks on the tree, the open encounter and the run character.
pub fn check_invariants(controller: &SessionController) -> Result<(), Violation> {
    let fail = |message: String| Err(Violation(message));

    let tree = controller.tree();
    if !tree.is_empty() {
        let last_row = tree.row_count() - 1;
        let bosses: Vec<_> = tree.nodes().iter().filter(|n| n.kind == NodeKind::Boss).collect();
        if bosses.len() != 1 || bosses[0].row != last_row {
            return fail("tree must hold exactly one boss in its final row".to_string());
        }
        for row in 0..=last_row {
            if tree.row(row).filter(|n| n.completed).count() > 1 {
                return fail(format!("row {row} has more than one completed node"));
            }
        }
        for node in tree.nodes() {
            if node.row > 0 && node.connections.is_empty() {
                return fail(format!("{} has no predecessor", node.id));
            }
            if node.completed && node.available {
                return fail(format!("{} is both completed and available", node.id));
            }
        }
    }

    if let Some(encounter) = controller.encounter() {
        let piles =
            encounter.deck_ids().len() + encounter.hand_ids().len() + encounter.discard_ids().len();
        if piles != encounter.total_cards() {
            return fail(format!("piles hold {piles} of {} cards", encounter.total_cards()));
        }
        let player = encounter.combatant();
        if player.current_health > player.max_health {
            return fail("player health above max".to_string());
        }
        if player.energy > player.max_energy {
            return fail("player energy above max".to_string());
        }
        let enemy = encounter.enemy();
        if enemy.current_health > enemy.max_health {
            return fail("enemy health above max".to_string());
        }
        if enemy.debuffs.iter().any(|d| d.turns_remaining == 0) {
            return fail("expired enemy debuff was not pruned".to_string());
        }
    }

    if let Some(character) = controller.character()
        && character.current_health > character.max_health
    {
        return fail("run character health above max".to_string());
    }
    Ok(())
}
