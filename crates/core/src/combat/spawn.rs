//! Enemy selection, difficulty/depth scaling and intent rolls.

use crate::content::{difficulty, enemy_templates};
use crate::rng::RandomSource;
use crate::types::{Difficulty, IntentAction, NodeKind};

use super::{Enemy, Intent};

const DEPTH_SCALING: f64 = 0.10;
const ATTACK_INTENT_CHANCE: f64 = 0.70;
const BASE_SHIELD_INTENT: u32 = 10;

pub(super) fn combined_scalar(level: Difficulty, tree_depth: u32) -> f64 {
    difficulty(level).multiplier * (1.0 + f64::from(tree_depth) * DEPTH_SCALING)
}

fn scale(value: u32, scalar: f64) -> u32 {
    (f64::from(value) * scalar).round() as u32
}

pub fn spawn_enemy(
    kind: NodeKind,
    level: Difficulty,
    tree_depth: u32,
    rng: &mut RandomSource,
) -> Enemy {
    let templates = enemy_templates(kind);
    let template = templates[rng.index(templates.len())];
    let scalar = combined_scalar(level, tree_depth);

    let max_health = scale(template.base_health, scalar);
    let mut enemy = Enemy {
        id: format!("enemy-{:08x}", rng.next_u64() as u32),
        name: template.name,
        kind,
        max_health,
        current_health: max_health,
        shield: 0,
        shield_turns: 0,
        damage_min: scale(template.damage_min, scalar),
        damage_max: scale(template.damage_max, scalar),
        shield_value: scale(BASE_SHIELD_INTENT, scalar),
        intent: Intent { action: IntentAction::Attack, value: 0 },
        debuffs: Vec::new(),
    };
    enemy.reroll_intent(rng);
    enemy
}

impl Enemy {
    /// 70% attack for a uniform value in the scaled damage range, 30% shield.
    pub(crate) fn reroll_intent(&mut self, rng: &mut RandomSource) {
        self.intent = if rng.chance(ATTACK_INTENT_CHANCE) {
            Intent {
                action: IntentAction::Attack,
                value: rng.range_inclusive(self.damage_min, self.damage_max),
            }
        } else {
            Intent { action: IntentAction::Shield, value: self.shield_value }
        };
    }
}
