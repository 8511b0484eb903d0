//! Card play and end-of-turn resolution.

use crate::rng::RandomSource;
use crate::types::*;

use super::{
    ATTACK_BUFF_TURNS, DEBUFF_TURNS, Debuff, ENEMY_SHIELD_TURNS, Encounter, MAX_DEBUFF_REDUCTION,
};

/// Shield soaks first, one point per point; the rest comes off health, floored at zero.
pub(crate) fn absorb(shield: &mut u32, health: &mut u32, damage: u32) {
    let blocked = damage.min(*shield);
    *shield -= blocked;
    *health = health.saturating_sub(damage - blocked);
}

/// Outgoing damage after the attacker's own chill/exhaust debuffs.
pub(crate) fn reduce_outgoing(damage: u32, debuffs: &[Debuff]) -> u32 {
    let reduction: u32 = debuffs.iter().map(|debuff| debuff.percent).sum();
    let reduction = reduction.min(MAX_DEBUFF_REDUCTION);
    damage * (100 - reduction) / 100
}

pub(crate) fn tick_debuffs(debuffs: &mut Vec<Debuff>) {
    debuffs.retain_mut(|debuff| {
        debuff.turns_remaining = debuff.turns_remaining.saturating_sub(1);
        debuff.turns_remaining > 0
    });
}

fn buffed(value: u32, buff_percent: u32) -> u32 {
    (value * (100 + buff_percent)).div_ceil(100)
}

impl Encounter {
    /// Plays `card_id` from hand. Absent or unaffordable cards, and any play after the
    /// fight is decided, are ignored without touching state.
    pub fn play_card(&mut self, card_id: CardId, targets_enemy: bool) -> ActionOutcome {
        if self.is_decided() {
            return ActionOutcome::Ignored;
        }
        let Some(position) = self.hand.iter().position(|id| *id == card_id) else {
            return ActionOutcome::Ignored;
        };
        let Some(card) = self.cards.get(card_id).cloned() else {
            return ActionOutcome::Ignored;
        };
        if card.cost > self.combatant.energy {
            return ActionOutcome::Ignored;
        }

        self.hand.remove(position);
        self.discard.push(card_id);
        self.combatant.energy -= card.cost;

        match card.kind {
            CardKind::Attack if targets_enemy => {
                let mut damage = card.value;
                if self.combatant.attack_buff_turns > 0 {
                    damage = buffed(damage, self.combatant.attack_buff);
                }
                damage = reduce_outgoing(damage, &self.combatant.debuffs);

                if let Some(effect) = card.effect {
                    self.apply_effect(effect);
                }

                absorb(&mut self.enemy.shield, &mut self.enemy.current_health, damage);
                if self.enemy.current_health == 0 {
                    self.result = Some(EncounterResult::Victory);
                }
            }
            CardKind::Attack => {}
            CardKind::Skill => {
                self.combatant.shield += card.value;
            }
            CardKind::Power => {
                self.combatant.attack_buff = card.value;
                self.combatant.attack_buff_turns = ATTACK_BUFF_TURNS;
            }
        }
        ActionOutcome::Applied
    }

    fn apply_effect(&mut self, effect: CardEffect) {
        match effect.kind {
            EffectKind::Chill => self.debuff_enemy(DebuffKind::Chill, effect.magnitude),
            EffectKind::Exhaust => self.debuff_enemy(DebuffKind::Exhaust, effect.magnitude),
            EffectKind::ShieldBash => {
                self.combatant.shield += (self.combatant.defense * effect.magnitude).div_ceil(100);
            }
        }
    }

    /// Attaches a fresh debuff, or refreshes the duration of an existing one of that kind.
    fn debuff_enemy(&mut self, kind: DebuffKind, percent: u32) {
        if let Some(existing) = self.enemy.debuffs.iter_mut().find(|debuff| debuff.kind == kind) {
            existing.turns_remaining = DEBUFF_TURNS;
            existing.percent = existing.percent.max(percent);
            return;
        }
        self.enemy.debuffs.push(Debuff {
            id: self.next_debuff_id,
            name: kind.name(),
            kind,
            turns_remaining: DEBUFF_TURNS,
            percent,
        });
        self.next_debuff_id += 1;
    }

    /// Resolves the enemy's telegraphed action and rolls over into the next player turn.
    pub fn end_turn(&mut self, rng: &mut RandomSource) -> ActionOutcome {
        if self.is_decided() {
            return ActionOutcome::Ignored;
        }

        let enemy = &mut self.enemy;
        if enemy.shield_turns > 0 {
            enemy.shield_turns -= 1;
            if enemy.shield_turns == 0 {
                enemy.shield = 0;
            }
        }

        match enemy.intent.action {
            IntentAction::Attack => {
                let damage = reduce_outgoing(enemy.intent.value, &enemy.debuffs);
                absorb(&mut self.combatant.shield, &mut self.combatant.current_health, damage);
            }
            IntentAction::Shield => {
                enemy.shield = enemy.intent.value;
                enemy.shield_turns = ENEMY_SHIELD_TURNS;
            }
        }

        if self.combatant.current_health == 0 {
            self.result = Some(EncounterResult::Defeat);
            return ActionOutcome::Applied;
        }

        self.enemy.reroll_intent(rng);

        tick_debuffs(&mut self.enemy.debuffs);
        tick_debuffs(&mut self.combatant.debuffs);

        let combatant = &mut self.combatant;
        if combatant.attack_buff_turns > 0 {
            combatant.attack_buff_turns -= 1;
            if combatant.attack_buff_turns == 0 {
                combatant.attack_buff = 0;
            }
        }
        combatant.shield = 0;

        self.discard.append(&mut self.hand);
        self.draw_cards(self.card_draw, rng);

        self.combatant.energy = self.combatant.max_energy;
        self.turn += 1;
        ActionOutcome::Applied
    }
}
