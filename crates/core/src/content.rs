//! Static catalog: champions, difficulty multipliers, forest trees, enemy pools and deck templates.

use crate::types::{CardEffect, CardKind, ChampionId, Difficulty, EffectKind, NodeKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BaseStats {
    pub health: u32,
    pub energy: u32,
    pub offense: u32,
    pub defense: u32,
    pub card_draw: u32,
    pub deck_size: u32,
    pub starting_gold: u32,
    pub luck: u32,
    pub armor: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChampionDef {
    pub id: ChampionId,
    pub name: &'static str,
    pub description: &'static str,
    pub base: BaseStats,
}

pub fn champion(id: ChampionId) -> ChampionDef {
    match id {
        ChampionId::Warrior => ChampionDef {
            id,
            name: "The Warrior",
            description: "A battle-hardened fighter who excels in direct combat.",
            base: BaseStats {
                health: 80,
                energy: 3,
                offense: 10,
                defense: 8,
                card_draw: 5,
                deck_size: 10,
                starting_gold: 100,
                luck: 5,
                armor: 5,
            },
        },
        ChampionId::Guardian => ChampionDef {
            id,
            name: "The Guardian",
            description: "A defensive specialist who outlasts opponents.",
            base: BaseStats {
                health: 90,
                energy: 3,
                offense: 6,
                defense: 12,
                card_draw: 5,
                deck_size: 10,
                starting_gold: 100,
                luck: 5,
                armor: 10,
            },
        },
        ChampionId::Mystic => ChampionDef {
            id,
            name: "The Mystic",
            description: "A wielder of arcane powers with versatile abilities.",
            base: BaseStats {
                health: 65,
                energy: 4,
                offense: 8,
                defense: 5,
                card_draw: 6,
                deck_size: 12,
                starting_gold: 100,
                luck: 10,
                armor: 0,
            },
        },
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DifficultyDef {
    pub label: &'static str,
    pub multiplier: f64,
    pub description: &'static str,
}

pub fn difficulty(level: Difficulty) -> DifficultyDef {
    match level {
        Difficulty::Beginner => {
            DifficultyDef { label: "Beginner", multiplier: 0.75, description: "75% enemy stats" }
        }
        Difficulty::Easy => {
            DifficultyDef { label: "Easy", multiplier: 1.0, description: "100% enemy stats" }
        }
        Difficulty::Hard => {
            DifficultyDef { label: "Hard", multiplier: 1.5, description: "150% enemy stats" }
        }
        Difficulty::Nightmare => {
            DifficultyDef { label: "Nightmare", multiplier: 2.0, description: "200% enemy stats" }
        }
    }
}

pub const TREE_COUNT: u8 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TreeDef {
    pub index: u8,
    pub name: &'static str,
    pub description: &'static str,
}

const TREES: [TreeDef; TREE_COUNT as usize] = [
    TreeDef {
        index: 0,
        name: "The Whispering Woods",
        description: "A dark forest filled with lesser creatures",
    },
    TreeDef {
        index: 1,
        name: "The Corrupted Grove",
        description: "Twisted trees and stronger beasts",
    },
    TreeDef { index: 2, name: "The Shadow Thicket", description: "Where light fears to tread" },
    TreeDef { index: 3, name: "The Blighted Depths", description: "Ancient horrors lurk within" },
    TreeDef {
        index: 4,
        name: "The Nightmare Canopy",
        description: "Only the strongest survive",
    },
];

pub fn tree(index: u8) -> Option<TreeDef> {
    TREES.get(usize::from(index)).copied()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnemyTemplate {
    pub name: &'static str,
    pub base_health: u32,
    pub damage_min: u32,
    pub damage_max: u32,
}

const BASIC_ENEMIES: [EnemyTemplate; 3] = [
    EnemyTemplate { name: "Goblin", base_health: 30, damage_min: 5, damage_max: 10 },
    EnemyTemplate { name: "Skeleton", base_health: 25, damage_min: 6, damage_max: 12 },
    EnemyTemplate { name: "Slime", base_health: 40, damage_min: 4, damage_max: 8 },
];

const ELITE_ENEMIES: [EnemyTemplate; 3] = [
    EnemyTemplate { name: "Orc Warrior", base_health: 60, damage_min: 10, damage_max: 18 },
    EnemyTemplate { name: "Dark Knight", base_health: 70, damage_min: 12, damage_max: 20 },
    EnemyTemplate { name: "Corrupted Mage", base_health: 50, damage_min: 15, damage_max: 25 },
];

const BOSS_ENEMIES: [EnemyTemplate; 3] = [
    EnemyTemplate { name: "The Overlord", base_health: 120, damage_min: 15, damage_max: 30 },
    EnemyTemplate { name: "Ancient Dragon", base_health: 150, damage_min: 20, damage_max: 35 },
    EnemyTemplate { name: "Lich King", base_health: 100, damage_min: 25, damage_max: 40 },
];

pub fn enemy_templates(kind: NodeKind) -> &'static [EnemyTemplate] {
    match kind {
        NodeKind::Basic => &BASIC_ENEMIES,
        NodeKind::Elite => &ELITE_ENEMIES,
        NodeKind::Boss => &BOSS_ENEMIES,
    }
}

/// How a card's number is derived from the champion's current effective stats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardValue {
    Offense { percent: u32 },
    Defense { percent: u32 },
    Flat(u32),
}

impl CardValue {
    pub fn resolve(self, offense: u32, defense: u32) -> u32 {
        match self {
            CardValue::Offense { percent } => (offense * percent).div_ceil(100),
            CardValue::Defense { percent } => (defense * percent).div_ceil(100),
            CardValue::Flat(value) => value,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CardTemplate {
    pub name: &'static str,
    pub kind: CardKind,
    pub cost: u32,
    pub value: CardValue,
    pub effect: Option<CardEffect>,
    pub count: u32,
}

const STRIKE: CardTemplate = CardTemplate {
    name: "Strike",
    kind: CardKind::Attack,
    cost: 1,
    value: CardValue::Offense { percent: 100 },
    effect: None,
    count: 0,
};

const DEFEND: CardTemplate = CardTemplate {
    name: "Defend",
    kind: CardKind::Skill,
    cost: 1,
    value: CardValue::Defense { percent: 100 },
    effect: None,
    count: 0,
};

const WARRIOR_DECK: [CardTemplate; 4] = [
    CardTemplate { count: 4, ..STRIKE },
    CardTemplate {
        name: "Rend",
        kind: CardKind::Attack,
        cost: 1,
        value: CardValue::Offense { percent: 60 },
        effect: Some(CardEffect { kind: EffectKind::Exhaust, magnitude: 20 }),
        count: 2,
    },
    CardTemplate { count: 3, ..DEFEND },
    CardTemplate {
        name: "Battle Cry",
        kind: CardKind::Power,
        cost: 2,
        value: CardValue::Flat(50),
        effect: None,
        count: 1,
    },
];

const GUARDIAN_DECK: [CardTemplate; 4] = [
    CardTemplate { count: 3, ..STRIKE },
    CardTemplate {
        name: "Shield Bash",
        kind: CardKind::Attack,
        cost: 1,
        value: CardValue::Offense { percent: 80 },
        effect: Some(CardEffect { kind: EffectKind::ShieldBash, magnitude: 50 }),
        count: 3,
    },
    CardTemplate { count: 3, ..DEFEND },
    CardTemplate {
        name: "Rally",
        kind: CardKind::Power,
        cost: 2,
        value: CardValue::Flat(50),
        effect: None,
        count: 1,
    },
];

const MYSTIC_DECK: [CardTemplate; 5] = [
    CardTemplate { name: "Arcane Bolt", count: 4, ..STRIKE },
    CardTemplate {
        name: "Frost Bolt",
        kind: CardKind::Attack,
        cost: 1,
        value: CardValue::Offense { percent: 75 },
        effect: Some(CardEffect { kind: EffectKind::Chill, magnitude: 25 }),
        count: 2,
    },
    CardTemplate {
        name: "Withering Hex",
        kind: CardKind::Attack,
        cost: 1,
        value: CardValue::Offense { percent: 50 },
        effect: Some(CardEffect { kind: EffectKind::Exhaust, magnitude: 30 }),
        count: 2,
    },
    CardTemplate { name: "Ward", count: 3, ..DEFEND },
    CardTemplate {
        name: "Focus",
        kind: CardKind::Power,
        cost: 2,
        value: CardValue::Flat(50),
        effect: None,
        count: 1,
    },
];

pub fn deck_template(champion: ChampionId) -> &'static [CardTemplate] {
    match champion {
        ChampionId::Warrior => &WARRIOR_DECK,
        ChampionId::Guardian => &GUARDIAN_DECK,
        ChampionId::Mystic => &MYSTIC_DECK,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deck_templates_fill_each_champions_deck_size() {
        for id in ChampionId::ALL {
            let total: u32 = deck_template(id).iter().map(|card| card.count).sum();
            assert_eq!(total, champion(id).base.deck_size, "{id:?} deck size mismatch");
        }
    }

    #[test]
    fn every_enemy_pool_is_non_empty_with_ordered_damage() {
        for kind in [NodeKind::Basic, NodeKind::Elite, NodeKind::Boss] {
            let pool = enemy_templates(kind);
            assert!(!pool.is_empty());
            assert!(pool.iter().all(|t| t.damage_min <= t.damage_max));
        }
    }

    #[test]
    fn card_values_round_up_from_stats() {
        assert_eq!(CardValue::Offense { percent: 100 }.resolve(10, 8), 10);
        assert_eq!(CardValue::Offense { percent: 75 }.resolve(8, 5), 6);
        assert_eq!(CardValue::Offense { percent: 60 }.resolve(11, 8), 7);
        assert_eq!(CardValue::Defense { percent: 100 }.resolve(10, 8), 8);
        assert_eq!(CardValue::Flat(50).resolve(0, 0), 50);
    }

    #[test]
    fn tree_catalog_covers_every_index() {
        for index in 0..TREE_COUNT {
            assert_eq!(tree(index).map(|t| t.index), Some(index));
        }
        assert!(tree(TREE_COUNT).is_none());
    }

    #[test]
    fn only_the_mystic_draws_six() {
        assert_eq!(champion(ChampionId::Mystic).base.card_draw, 6);
        assert_eq!(champion(ChampionId::Warrior).base.card_draw, 5);
        assert_eq!(champion(ChampionId::Guardian).base.card_draw, 5);
    }
}
