//! Credit spending and per-slot champion stat queries.

use tracing::debug;

use crate::combat::build_deck;
use crate::content::champion;
use crate::progression::{effective_stats, upgrade_cost};

use super::*;

impl SessionController {
    /// Base stats plus the active slot's upgrades. Without an active slot, plain base stats.
    pub fn effective_stats(&self, champion_id: ChampionId) -> BaseStats {
        let upgrades =
            self.active_save().map(|slot| slot.upgrades_for(champion_id)).unwrap_or_default();
        effective_stats(&champion(champion_id).base, &upgrades)
    }

    pub fn upgrade_cost(&self, champion_id: ChampionId, stat: StatKind) -> u32 {
        let level = self
            .active_save()
            .map_or(0, |slot| slot.upgrades_for(champion_id).level(stat));
        upgrade_cost(level)
    }

    /// The deck this champion would fight with right now, in template order.
    pub fn character_deck(&self, champion_id: ChampionId) -> Vec<Card> {
        let stats = self.effective_stats(champion_id);
        build_deck(champion_id, stats.offense, stats.defense).into_iter().map(|(_, card)| card).collect()
    }

    /// Buys one level of `stat` for `champion`. A run already in progress keeps the stats
    /// it started with.
    pub fn upgrade_stat(&mut self, champion_id: ChampionId, stat: StatKind) -> ActionOutcome {
        let cost = self.upgrade_cost(champion_id, stat);
        let Some(active) = self.active_slot_mut() else {
            return ActionOutcome::Ignored;
        };
        if active.credits < cost {
            return ActionOutcome::Ignored;
        }

        active.credits -= cost;
        let upgrades = active.upgrades.entry(champion_id).or_default();
        upgrades.increment(stat);
        let level = upgrades.level(stat);
        let slot = active.slot;

        debug!(slot, champion = champion_id.as_str(), ?stat, level, cost, "stat upgraded");
        self.log.push(LogEvent::StatUpgraded { champion: champion_id, stat, level, cost });
        self.push_upsert(slot);
        ActionOutcome::Applied
    }
}
