//! Encounter behavior tests: card play math, end-of-turn sequencing and pile conservation.

use std::collections::BTreeSet;

use proptest::prelude::*;
use slotmap::SlotMap;

use super::resolve::absorb;
use super::*;

fn dummy_enemy(health: u32) -> Enemy {
    Enemy {
        id: "enemy-test".to_string(),
        name: "Goblin",
        kind: NodeKind::Basic,
        max_health: health,
        current_health: health,
        shield: 0,
        shield_turns: 0,
        damage_min: 5,
        damage_max: 10,
        shield_value: 10,
        intent: Intent { action: IntentAction::Attack, value: 12 },
        debuffs: Vec::new(),
    }
}

fn single_card_pool(kind: CardKind, cost: u32, value: u32, effect: Option<CardEffect>) -> SlotMap<CardId, Card> {
    let mut cards = SlotMap::with_key();
    let id = cards.insert(Card {
        id: CardId::default(),
        name: "Strike",
        kind,
        cost,
        value,
        effect,
    });
    cards[id].id = id;
    cards
}

fn encounter_with(cards: SlotMap<CardId, Card>, enemy: Enemy) -> (Encounter, RandomSource) {
    let mut rng = RandomSource::from_seed(9);
    let card_draw = cards.len();
    let combatant = Combatant::new(80, 80, 3, 10, 8);
    (Encounter::start(combatant, enemy, cards, card_draw, &mut rng), rng)
}

fn first_in_hand(encounter: &Encounter) -> CardId {
    encounter.hand_ids()[0]
}

fn chill(percent: u32, turns: u32) -> Debuff {
    Debuff { id: 0, name: "Chill", kind: DebuffKind::Chill, turns_remaining: turns, percent }
}

#[test]
fn strike_for_ten_takes_an_unshielded_enemy_from_thirty_to_twenty() {
    let (mut encounter, _) =
        encounter_with(single_card_pool(CardKind::Attack, 1, 10, None), dummy_enemy(30));
    let strike = first_in_hand(&encounter);

    assert_eq!(encounter.play_card(strike, true), ActionOutcome::Applied);
    assert_eq!(encounter.enemy().current_health, 20);
    assert_eq!(encounter.current_energy(), 2);
    assert_eq!(encounter.discard_ids(), &[strike]);
    assert!(encounter.hand_ids().is_empty());
}

#[test]
fn enemy_shield_soaks_before_health() {
    let mut enemy = dummy_enemy(50);
    enemy.shield = 15;
    let (mut encounter, _) =
        encounter_with(single_card_pool(CardKind::Attack, 1, 20, None), enemy);
    let strike = first_in_hand(&encounter);

    encounter.play_card(strike, true);
    assert_eq!(encounter.enemy().shield, 0);
    assert_eq!(encounter.enemy().current_health, 45);
}

#[test]
fn absorb_never_goes_negative() {
    let (mut shield, mut health) = (5, 3);
    absorb(&mut shield, &mut health, 100);
    assert_eq!((shield, health), (0, 0));

    let (mut shield, mut health) = (30, 10);
    absorb(&mut shield, &mut health, 12);
    assert_eq!((shield, health), (18, 10));
}

#[test]
fn unaffordable_or_absent_cards_are_ignored() {
    let (mut encounter, _) =
        encounter_with(single_card_pool(CardKind::Power, 5, 50, None), dummy_enemy(30));
    let card = first_in_hand(&encounter);
    let before = (encounter.combatant().clone(), encounter.hand_ids().to_vec());

    assert_eq!(encounter.play_card(card, false), ActionOutcome::Ignored);
    assert_eq!(encounter.play_card(CardId::default(), true), ActionOutcome::Ignored);
    assert_eq!((encounter.combatant().clone(), encounter.hand_ids().to_vec()), before);
}

#[test]
fn attack_not_aimed_at_enemy_only_spends_energy() {
    let (mut encounter, _) =
        encounter_with(single_card_pool(CardKind::Attack, 1, 10, None), dummy_enemy(30));
    let strike = first_in_hand(&encounter);
    assert_eq!(encounter.play_card(strike, false), ActionOutcome::Applied);
    assert_eq!(encounter.enemy().current_health, 30);
    assert_eq!(encounter.current_energy(), 2);
}

#[test]
fn skill_shield_stacks_without_cap() {
    let mut cards = single_card_pool(CardKind::Skill, 1, 8, None);
    let extra = cards.insert(Card {
        id: CardId::default(),
        name: "Defend",
        kind: CardKind::Skill,
        cost: 1,
        value: 8,
        effect: None,
    });
    cards[extra].id = extra;
    let (mut encounter, _) = encounter_with(cards, dummy_enemy(30));

    for id in encounter.hand_ids().to_vec() {
        encounter.play_card(id, false);
    }
    assert_eq!(encounter.combatant().shield, 16);
}

#[test]
fn attack_buff_rounds_up_and_lasts_two_turns() {
    let (mut encounter, mut rng) =
        encounter_with(single_card_pool(CardKind::Attack, 0, 7, None), dummy_enemy(500));
    encounter.enemy.intent = Intent { action: IntentAction::Shield, value: 0 };
    encounter.combatant.attack_buff = 50;
    encounter.combatant.attack_buff_turns = ATTACK_BUFF_TURNS;

    let strike = first_in_hand(&encounter);
    encounter.play_card(strike, true);
    assert_eq!(encounter.enemy().current_health, 500 - 11);

    encounter.end_turn(&mut rng);
    assert_eq!(encounter.combatant().attack_buff_turns, 1);
    assert_eq!(encounter.combatant().attack_buff, 50);

    encounter.enemy.intent = Intent { action: IntentAction::Shield, value: 0 };
    encounter.end_turn(&mut rng);
    assert_eq!(encounter.combatant().attack_buff_turns, 0);
    assert_eq!(encounter.combatant().attack_buff, 0);
}

#[test]
fn second_power_overwrites_the_first() {
    let (mut encounter, _) =
        encounter_with(single_card_pool(CardKind::Power, 1, 25, None), dummy_enemy(30));
    encounter.combatant.attack_buff = 50;
    encounter.combatant.attack_buff_turns = 1;
    let power = first_in_hand(&encounter);
    encounter.play_card(power, false);
    assert_eq!(encounter.combatant().attack_buff, 25);
    assert_eq!(encounter.combatant().attack_buff_turns, ATTACK_BUFF_TURNS);
}

#[test]
fn chill_card_debuffs_enemy_for_exactly_two_attacks() {
    let effect = Some(CardEffect { kind: EffectKind::Chill, magnitude: 25 });
    let (mut encounter, mut rng) =
        encounter_with(single_card_pool(CardKind::Attack, 1, 1, effect), dummy_enemy(500));
    let bolt = first_in_hand(&encounter);
    encounter.play_card(bolt, true);
    assert_eq!(encounter.enemy().debuffs.len(), 1);
    assert_eq!(encounter.enemy().debuffs[0].turns_remaining, DEBUFF_TURNS);

    encounter.enemy.intent = Intent { action: IntentAction::Attack, value: 20 };
    encounter.end_turn(&mut rng);
    assert_eq!(encounter.combatant().current_health, 80 - 15);
    assert_eq!(encounter.enemy().debuffs[0].turns_remaining, 1);

    encounter.enemy.intent = Intent { action: IntentAction::Attack, value: 20 };
    encounter.end_turn(&mut rng);
    assert_eq!(encounter.combatant().current_health, 65 - 15);
    assert!(encounter.enemy().debuffs.is_empty());

    encounter.enemy.intent = Intent { action: IntentAction::Attack, value: 20 };
    encounter.end_turn(&mut rng);
    assert_eq!(encounter.combatant().current_health, 50 - 20);
}

#[test]
fn replaying_a_debuff_refreshes_instead_of_stacking() {
    let effect = Some(CardEffect { kind: EffectKind::Exhaust, magnitude: 30 });
    let (mut encounter, _) =
        encounter_with(single_card_pool(CardKind::Attack, 0, 1, effect), dummy_enemy(500));
    encounter.enemy.debuffs.push(Debuff {
        id: 7,
        name: "Exhaust",
        kind: DebuffKind::Exhaust,
        turns_remaining: 1,
        percent: 30,
    });
    let hex = first_in_hand(&encounter);
    encounter.play_card(hex, true);
    assert_eq!(encounter.enemy().debuffs.len(), 1);
    assert_eq!(encounter.enemy().debuffs[0].turns_remaining, DEBUFF_TURNS);
}

#[test]
fn debuff_reduction_is_capped_at_eighty_percent() {
    let (mut encounter, mut rng) =
        encounter_with(single_card_pool(CardKind::Skill, 9, 1, None), dummy_enemy(30));
    encounter.enemy.debuffs = vec![chill(60, 2), Debuff { kind: DebuffKind::Exhaust, ..chill(60, 2) }];
    encounter.enemy.intent = Intent { action: IntentAction::Attack, value: 50 };
    encounter.end_turn(&mut rng);
    assert_eq!(encounter.combatant().current_health, 80 - 10);
}

#[test]
fn player_debuffs_do_not_soften_incoming_hits() {
    let (mut encounter, mut rng) =
        encounter_with(single_card_pool(CardKind::Skill, 9, 1, None), dummy_enemy(30));
    encounter.combatant.current_health = 50;
    encounter.combatant.debuffs.push(chill(25, 2));
    encounter.enemy.intent = Intent { action: IntentAction::Attack, value: 12 };

    encounter.end_turn(&mut rng);
    assert_eq!(encounter.combatant().current_health, 38);
}

#[test]
fn shieldbash_grants_a_share_of_defense() {
    let effect = Some(CardEffect { kind: EffectKind::ShieldBash, magnitude: 50 });
    let (mut encounter, _) =
        encounter_with(single_card_pool(CardKind::Attack, 1, 5, effect), dummy_enemy(30));
    let bash = first_in_hand(&encounter);
    encounter.play_card(bash, true);
    assert_eq!(encounter.combatant().shield, 4);
    assert_eq!(encounter.enemy().current_health, 25);
}

#[test]
fn enemy_shield_intent_lasts_one_player_turn_and_replaces() {
    let (mut encounter, mut rng) =
        encounter_with(single_card_pool(CardKind::Skill, 9, 1, None), dummy_enemy(30));
    encounter.enemy.intent = Intent { action: IntentAction::Shield, value: 10 };
    encounter.end_turn(&mut rng);
    assert_eq!(encounter.enemy().shield, 10);
    assert_eq!(encounter.enemy().shield_turns, 1);

    encounter.enemy.intent = Intent { action: IntentAction::Shield, value: 7 };
    encounter.end_turn(&mut rng);
    assert_eq!(encounter.enemy().shield, 7);

    encounter.enemy.intent = Intent { action: IntentAction::Attack, value: 0 };
    encounter.end_turn(&mut rng);
    assert_eq!(encounter.enemy().shield, 0);
    assert_eq!(encounter.enemy().shield_turns, 0);
}

#[test]
fn player_shield_absorbs_then_resets_each_turn() {
    let (mut encounter, mut rng) =
        encounter_with(single_card_pool(CardKind::Skill, 9, 1, None), dummy_enemy(30));
    encounter.combatant.shield = 5;
    encounter.enemy.intent = Intent { action: IntentAction::Attack, value: 12 };
    encounter.end_turn(&mut rng);
    assert_eq!(encounter.combatant().current_health, 73);
    assert_eq!(encounter.combatant().shield, 0);

    encounter.combatant.shield = 30;
    encounter.enemy.intent = Intent { action: IntentAction::Attack, value: 12 };
    encounter.end_turn(&mut rng);
    assert_eq!(encounter.combatant().current_health, 73);
    assert_eq!(encounter.combatant().shield, 0);
}

#[test]
fn lethal_attack_decides_the_fight_and_freezes_it() {
    let (mut encounter, mut rng) =
        encounter_with(single_card_pool(CardKind::Attack, 1, 50, None), dummy_enemy(30));
    let strike = first_in_hand(&encounter);
    encounter.play_card(strike, true);
    assert_eq!(encounter.result(), Some(EncounterResult::Victory));
    assert_eq!(encounter.end_turn(&mut rng), ActionOutcome::Ignored);

    let (mut encounter, mut rng) =
        encounter_with(single_card_pool(CardKind::Skill, 9, 1, None), dummy_enemy(30));
    encounter.combatant.current_health = 4;
    encounter.enemy.intent = Intent { action: IntentAction::Attack, value: 12 };
    assert_eq!(encounter.end_turn(&mut rng), ActionOutcome::Applied);
    assert_eq!(encounter.combatant().current_health, 0);
    assert_eq!(encounter.result(), Some(EncounterResult::Defeat));
}

#[test]
fn end_turn_discards_hand_redraws_and_refills_energy() {
    let cards = build_deck(ChampionId::Warrior, 10, 8);
    let mut rng = RandomSource::from_seed(31);
    let enemy = dummy_enemy(999);
    let mut encounter = Encounter::start(Combatant::new(80, 80, 3, 10, 8), enemy, cards, 5, &mut rng);
    assert_eq!(encounter.hand_ids().len(), 5);
    assert_eq!(encounter.deck_ids().len(), 5);

    let first = first_in_hand(&encounter);
    encounter.play_card(first, true);
    encounter.enemy.intent = Intent { action: IntentAction::Shield, value: 0 };
    encounter.end_turn(&mut rng);

    assert_eq!(encounter.hand_ids().len(), 5);
    assert_eq!(encounter.deck_ids().len(), 0);
    assert_eq!(encounter.discard_ids().len(), 5);
    assert_eq!(encounter.current_energy(), 3);
    assert_eq!(encounter.turn(), 2);

    encounter.enemy.intent = Intent { action: IntentAction::Shield, value: 0 };
    encounter.end_turn(&mut rng);
    assert_eq!(encounter.hand_ids().len(), 5);
    assert_eq!(encounter.deck_ids().len(), 5);
    assert!(encounter.discard_ids().is_empty());
}

fn pile_keys(encounter: &Encounter) -> BTreeSet<CardId> {
    encounter
        .deck_ids()
        .iter()
        .chain(encounter.hand_ids())
        .chain(encounter.discard_ids())
        .copied()
        .collect()
}

proptest! {
    #[test]
    fn piles_always_partition_the_card_pool(
        seed in any::<u64>(),
        champion in 0usize..3,
        plays in proptest::collection::vec((0usize..8, any::<bool>(), any::<bool>()), 1..60),
    ) {
        let champion = ChampionId::ALL[champion];
        let cards = build_deck(champion, 10, 8);
        let all: BTreeSet<CardId> = cards.keys().collect();
        let mut rng = RandomSource::from_seed(seed);
        let mut enemy = dummy_enemy(u32::MAX / 4);
        enemy.damage_min = 0;
        enemy.damage_max = 0;
        enemy.intent = Intent { action: IntentAction::Attack, value: 0 };
        let mut encounter =
            Encounter::start(Combatant::new(80, 80, 3, 10, 8), enemy, cards, 5, &mut rng);

        for (slot, targets_enemy, end) in plays {
            if end {
                encounter.end_turn(&mut rng);
            } else if let Some(id) = encounter.hand_ids().get(slot).copied() {
                encounter.play_card(id, targets_enemy);
            }
            let total = encounter.deck_ids().len()
                + encounter.hand_ids().len()
                + encounter.discard_ids().len();
            prop_assert_eq!(total, encounter.total_cards());
            prop_assert_eq!(&pile_keys(&encounter), &all);
            prop_assert!(encounter.combatant().current_health <= encounter.combatant().max_health);
            prop_assert!(encounter.enemy().current_health <= encounter.enemy().max_health);
        }
    }
}
