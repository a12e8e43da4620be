//! Stat-track upgrade handling.
//!
//! Validates the gating precondition and the full bulk-quote price, then
//! advances the level counter. The displayed stat value is never stored —
//! combat snapshots recompute it from `StatLevels` on read.

use bevy::prelude::*;

use crate::progression::{bulk_upgrade, is_unlocked};
use crate::shared::*;

pub fn handle_stat_upgrade(
    mut events: EventReader<StatUpgradeEvent>,
    mut levels: ResMut<StatLevels>,
    mut wallet: ResMut<Wallet>,
    mut stats: ResMut<PlayStats>,
) {
    for ev in events.read() {
        if ev.count == 0 {
            continue;
        }
        if !is_unlocked(ev.key, &levels) {
            debug!(
                "[Economy] Stat upgrade refused — {} is locked",
                ev.key.name()
            );
            continue;
        }

        let quote = bulk_upgrade(ev.key, levels.get(ev.key), ev.count);
        if quote.granted == 0 {
            debug!(
                "[Economy] Stat upgrade refused — {} is at its cap",
                ev.key.name()
            );
            continue;
        }
        if !wallet.try_spend_gold(quote.total_cost) {
            debug!(
                "[Economy] Stat upgrade refused — {} costs {}, have {}",
                ev.key.name(),
                quote.total_cost,
                wallet.gold
            );
            continue;
        }
        stats.total_gold_spent += quote.total_cost;

        levels.add(ev.key, quote.granted);
        info!(
            "[Economy] {} +{} levels (now {}, {} gold)",
            ev.key.name(),
            quote.granted,
            levels.get(ev.key),
            quote.total_cost
        );
    }
}
