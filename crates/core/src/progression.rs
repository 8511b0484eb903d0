//! Permanent champion upgrades, the cost curve that prices them, and run rewards.

use serde::{Deserialize, Serialize};

use crate::content::BaseStats;
use crate::types::StatKind;

const HEALTH_STEP_PERCENT: u32 = 5;
const COMBAT_STEP_PERCENT: u32 = 10;

const FLAT_COST: u32 = 50;
const FLAT_COST_LEVELS: u32 = 5;
const COST_STEP: u32 = 10;

pub const BOSS_REWARD: u32 = 100;
pub const PARTIAL_REWARD_PER_NODE: u32 = 4;
pub const PARTIAL_REWARD_CAP: u32 = 40;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatUpgrades {
    pub health: u32,
    pub offense: u32,
    pub defense: u32,
}

impl StatUpgrades {
    pub fn level(&self, stat: StatKind) -> u32 {
        match stat {
            StatKind::Health => self.health,
            StatKind::Offense => self.offense,
            StatKind::Defense => self.defense,
        }
    }

    pub fn increment(&mut self, stat: StatKind) {
        let level = match stat {
            StatKind::Health => &mut self.health,
            StatKind::Offense => &mut self.offense,
            StatKind::Defense => &mut self.defense,
        };
        *level += 1;
    }
}

/// Gain per upgrade level: `ceil(base * step%)`, applied once per level.
fn per_level_gain(base: u32, step_percent: u32) -> u32 {
    (base * step_percent).div_ceil(100)
}

/// Base stats plus upgrades. The gain is rounded per level, `level * ceil(base * pct)`,
/// not `ceil(base * pct * level)`: every level bought adds at least one point. The two
/// forms differ for small bases such as Guardian offense and Mystic defense.
pub fn effective_stats(base: &BaseStats, upgrades: &StatUpgrades) -> BaseStats {
    BaseStats {
        health: base.health + upgrades.health * per_level_gain(base.health, HEALTH_STEP_PERCENT),
        offense: base.offense
            + upgrades.offense * per_level_gain(base.offense, COMBAT_STEP_PERCENT),
        defense: base.defense
            + upgrades.defense * per_level_gain(base.defense, COMBAT_STEP_PERCENT),
        ..*base
    }
}

/// Price of buying the next level when `level` levels are already owned.
pub fn upgrade_cost(level: u32) -> u32 {
    if level < FLAT_COST_LEVELS {
        return FLAT_COST;
    }
    FLAT_COST + (level - (FLAT_COST_LEVELS - 1)) * COST_STEP
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reward {
    BossDefeated,
    Partial { completed_nodes: usize },
}

pub fn credit_award(reward: Reward) -> u32 {
    match reward {
        Reward::BossDefeated => BOSS_REWARD,
        Reward::Partial { completed_nodes } => {
            let nodes = u32::try_from(completed_nodes).unwrap_or(u32::MAX);
            nodes.saturating_mul(PARTIAL_REWARD_PER_NODE).min(PARTIAL_REWARD_CAP)
        }
    }
}
