//! Stable snapshot hashing for deterministic replay checks.
//! Covers the slot table and the run in progress; card ids are skipped in favour of
//! pile contents so the hash does not depend on slotmap key layout.

use std::hash::Hasher;

use xxhash_rust::xxh3::Xxh3;

use crate::combat::{Card, Debuff};

use super::*;

fn write_opt_u8(hasher: &mut Xxh3, value: Option<u8>) {
    hasher.write_u8(u8::from(value.is_some()));
    hasher.write_u8(value.unwrap_or(0));
}

fn write_node(hasher: &mut Xxh3, node: NodeId) {
    hasher.write_u8(node.row);
    hasher.write_u8(node.col);
}

fn write_pile(hasher: &mut Xxh3, pile: &[&Card]) {
    hasher.write_usize(pile.len());
    for card in pile {
        hasher.write(card.name.as_bytes());
        hasher.write_u32(card.cost);
        hasher.write_u32(card.value);
    }
}

fn write_debuffs(hasher: &mut Xxh3, debuffs: &[Debuff]) {
    hasher.write_usize(debuffs.len());
    for debuff in debuffs {
        hasher.write_u8(debuff.kind as u8);
        hasher.write_u32(debuff.turns_remaining);
        hasher.write_u32(debuff.percent);
    }
}

impl SessionController {
    pub fn snapshot_hash(&self) -> u64 {
        let mut hasher = Xxh3::new();
        hasher.write_u64(self.seed);
        hasher.write_u64(self.trees_generated);
        write_opt_u8(&mut hasher, self.active_slot);

        for slot in &self.slots {
            hasher.write_u8(slot.slot);
            hasher.write_u8(u8::from(slot.is_empty));
            hasher.write_u32(slot.credits);
            hasher.write_u8(u8::from(slot.in_tree));
            for (champion, upgrades) in &slot.upgrades {
                hasher.write_u8(*champion as u8);
                hasher.write_u32(upgrades.health);
                hasher.write_u32(upgrades.offense);
                hasher.write_u32(upgrades.defense);
            }
            hasher.write(&slot.completed_trees);
        }

        let run = &self.run;
        write_opt_u8(&mut hasher, run.difficulty.map(|level| level as u8));
        write_opt_u8(&mut hasher, run.tree_index);
        if let Some(character) = &run.character {
            hasher.write_u8(character.champion as u8);
            hasher.write_u32(character.current_health);
            hasher.write_u32(character.max_health);
        }
        for node in run.tree.nodes() {
            write_node(&mut hasher, node.id);
            hasher.write_u8(node.kind as u8);
            hasher.write_u8(u8::from(node.available));
            hasher.write_u8(u8::from(node.completed));
            for link in &node.connections {
                write_node(&mut hasher, *link);
            }
        }
        if let Some(node) = run.current_node {
            write_node(&mut hasher, node);
        }
        for node in &run.completed_nodes {
            write_node(&mut hasher, *node);
        }

        if let Some(encounter) = &run.encounter {
            let player = encounter.combatant();
            hasher.write_u32(player.current_health);
            hasher.write_u32(player.energy);
            hasher.write_u32(player.shield);
            hasher.write_u32(player.attack_buff);
            hasher.write_u32(player.attack_buff_turns);
            write_debuffs(&mut hasher, &player.debuffs);

            let enemy = encounter.enemy();
            hasher.write(enemy.id.as_bytes());
            hasher.write_u32(enemy.current_health);
            hasher.write_u32(enemy.shield);
            hasher.write_u32(enemy.shield_turns);
            hasher.write_u8(enemy.intent.action as u8);
            hasher.write_u32(enemy.intent.value);
            write_debuffs(&mut hasher, &enemy.debuffs);

            write_pile(&mut hasher, &encounter.hand());
            write_pile(&mut hasher, &encounter.deck());
            write_pile(&mut hasher, &encounter.discard_pile());
            hasher.write_u32(encounter.turn());
        }
        hasher.finish()
    }
}
