//! Turn-based card combat for a single encounter.
//! This file owns the combat data model and pile bookkeeping; spawning, deck building and
//! turn resolution live in focused submodules.

use slotmap::SlotMap;

use crate::rng::RandomSource;
use crate::types::*;

mod deck;
mod resolve;
mod spawn;

#[cfg(test)]
mod tests;

pub use deck::build_deck;
pub use spawn::spawn_enemy;

pub const DEBUFF_TURNS: u32 = 2;
pub const ATTACK_BUFF_TURNS: u32 = 2;
pub const MAX_DEBUFF_REDUCTION: u32 = 80;
pub const ENEMY_SHIELD_TURNS: u32 = 1;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Card {
    pub id: CardId,
    pub name: &'static str,
    pub kind: CardKind,
    pub cost: u32,
    pub value: u32,
    pub effect: Option<CardEffect>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Debuff {
    pub id: u32,
    pub name: &'static str,
    pub kind: DebuffKind,
    pub turns_remaining: u32,
    pub percent: u32,
}

/// The player's side of an encounter. Shield never survives past the end of a turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Combatant {
    pub current_health: u32,
    pub max_health: u32,
    pub energy: u32,
    pub max_energy: u32,
    pub shield: u32,
    pub offense: u32,
    pub defense: u32,
    pub attack_buff: u32,
    pub attack_buff_turns: u32,
    pub debuffs: Vec<Debuff>,
}

impl Combatant {
    pub fn new(current_health: u32, max_health: u32, max_energy: u32, offense: u32, defense: u32) -> Self {
        Self {
            current_health,
            max_health,
            energy: max_energy,
            max_energy,
            shield: 0,
            offense,
            defense,
            attack_buff: 0,
            attack_buff_turns: 0,
            debuffs: Vec::new(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Intent {
    pub action: IntentAction,
    pub value: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Enemy {
    pub id: String,
    pub name: &'static str,
    pub kind: NodeKind,
    pub max_health: u32,
    pub current_health: u32,
    pub shield: u32,
    /// Turns the current shield has left; 0 means no timed shield.
    pub shield_turns: u32,
    pub damage_min: u32,
    pub damage_max: u32,
    pub shield_value: u32,
    pub intent: Intent,
    pub debuffs: Vec<Debuff>,
}

/// One fight. `deck`, `hand` and `discard` partition the keys of `cards` at all times.
#[derive(Clone, Debug)]
pub struct Encounter {
    pub(crate) combatant: Combatant,
    pub(crate) enemy: Enemy,
    pub(crate) cards: SlotMap<CardId, Card>,
    pub(crate) deck: Vec<CardId>,
    pub(crate) hand: Vec<CardId>,
    pub(crate) discard: Vec<CardId>,
    pub(crate) card_draw: usize,
    pub(crate) turn: u32,
    pub(crate) next_debuff_id: u32,
    pub(crate) result: Option<EncounterResult>,
}

impl Encounter {
    /// Shuffles the freshly built `cards` into the deck and draws the opening hand.
    pub fn start(
        combatant: Combatant,
        enemy: Enemy,
        cards: SlotMap<CardId, Card>,
        card_draw: usize,
        rng: &mut RandomSource,
    ) -> Self {
        let mut deck: Vec<CardId> = cards.keys().collect();
        rng.shuffle(&mut deck);

        let mut encounter = Self {
            combatant,
            enemy,
            cards,
            deck,
            hand: Vec::new(),
            discard: Vec::new(),
            card_draw,
            turn: 1,
            next_debuff_id: 0,
            result: None,
        };
        encounter.draw_cards(card_draw, rng);
        encounter
    }

    pub fn combatant(&self) -> &Combatant {
        &self.combatant
    }

    pub fn enemy(&self) -> &Enemy {
        &self.enemy
    }

    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.cards.get(id)
    }

    pub fn hand(&self) -> Vec<&Card> {
        self.resolve_pile(&self.hand)
    }

    pub fn deck(&self) -> Vec<&Card> {
        self.resolve_pile(&self.deck)
    }

    pub fn discard_pile(&self) -> Vec<&Card> {
        self.resolve_pile(&self.discard)
    }

    pub fn hand_ids(&self) -> &[CardId] {
        &self.hand
    }

    pub fn deck_ids(&self) -> &[CardId] {
        &self.deck
    }

    pub fn discard_ids(&self) -> &[CardId] {
        &self.discard
    }

    pub fn total_cards(&self) -> usize {
        self.cards.len()
    }

    pub fn current_energy(&self) -> u32 {
        self.combatant.energy
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn result(&self) -> Option<EncounterResult> {
        self.result
    }

    pub fn is_decided(&self) -> bool {
        self.result.is_some()
    }

    fn resolve_pile(&self, pile: &[CardId]) -> Vec<&Card> {
        pile.iter().filter_map(|id| self.cards.get(*id)).collect()
    }

    /// Draws up to `count` cards. A short deck first absorbs the discard pile and is reshuffled.
    pub(crate) fn draw_cards(&mut self, count: usize, rng: &mut RandomSource) {
        if self.deck.len() < count && !self.discard.is_empty() {
            self.deck.append(&mut self.discard);
            rng.shuffle(&mut self.deck);
        }
        let take = count.min(self.deck.len());
        self.hand.extend(self.deck.drain(..take));
    }
}
