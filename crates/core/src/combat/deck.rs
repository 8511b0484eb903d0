//! Champion deck instantiation from catalog templates.

use slotmap::SlotMap;

use crate::content::deck_template;
use crate::types::{CardId, ChampionId};

use super::Card;

/// Builds fresh card instances for one encounter. Values track the champion's current
/// effective offense and defense; every copy gets its own id.
pub fn build_deck(champion: ChampionId, offense: u32, defense: u32) -> SlotMap<CardId, Card> {
    let mut cards = SlotMap::with_key();
    for template in deck_template(champion) {
        let value = template.value.resolve(offense, defense);
        for _ in 0..template.count {
            let id = cards.insert(Card {
                id: CardId::default(), // Will be overwritten
                name: template.name,
                kind: template.kind,
                cost: template.cost,
                value,
                effect: template.effect,
            });
            cards[id].id = id;
        }
    }
    cards
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::champion;
    use crate::types::{CardKind, EffectKind};

    #[test]
    fn card_ids_are_distinct_and_self_consistent() {
        let cards = build_deck(ChampionId::Warrior, 10, 8);
        assert_eq!(cards.len(), 10);
        for (id, card) in &cards {
            assert_eq!(card.id, id);
        }
    }

    #[test]
    fn strike_and_defend_follow_effective_stats() {
        let cards = build_deck(ChampionId::Warrior, 13, 9);
        let strike = cards.values().find(|c| c.name == "Strike").map(|c| c.value);
        let defend = cards.values().find(|c| c.name == "Defend").map(|c| c.value);
        assert_eq!(strike, Some(13));
        assert_eq!(defend, Some(9));
    }

    #[test]
    fn guardian_carries_shield_bash_and_mystic_carries_chill() {
        let guardian = build_deck(ChampionId::Guardian, 6, 12);
        assert!(guardian.values().any(|c| c.kind == CardKind::Attack
            && c.effect.is_some_and(|e| e.kind == EffectKind::ShieldBash)));

        let mystic = build_deck(ChampionId::Mystic, 8, 5);
        assert!(mystic.values().any(|c| c.effect.is_some_and(|e| e.kind == EffectKind::Chill)));
        assert!(mystic.values().any(|c| c.effect.is_some_and(|e| e.kind == EffectKind::Exhaust)));
        assert_eq!(mystic.len() as u32, champion(ChampionId::Mystic).base.deck_size);
    }
}
