//! Economy domain — currency, weapon enhance/evolve, stat upgrades, gacha,
//! merges, equipment, and collection-reward claims.
//!
//! All cross-domain communication goes through `crate::shared::*` events and
//! resources. No other domain module is imported here.
//!
//! Every handler is total: an ineligible request (insufficient currency,
//! gate unmet, already at cap, nothing to claim) leaves state untouched and
//! is visually silent — callers detect no-ops only by state not changing.

use bevy::prelude::*;

use crate::shared::*;

pub mod enhance;
pub mod equip;
pub mod gacha;
pub mod merge;
pub mod rewards;
pub mod stat_upgrade;
pub mod wallet;

use enhance::{handle_enhance, handle_evolve};
use equip::{handle_equip_pet, handle_equip_skin, handle_unequip_pet};
use gacha::{clear_gacha_results, handle_gacha_pull, handle_upgrade_artifact};
use merge::{handle_merge_all_pets, handle_merge_all_skins, handle_merge_pet, handle_merge_skin};
use rewards::{
    handle_claim_all, handle_claim_mushroom, handle_claim_pet, handle_claim_weapon,
};
use stat_upgrade::handle_stat_upgrade;
use wallet::apply_currency_changes;

// ─────────────────────────────────────────────────────────────────────────────
// Plugin
// ─────────────────────────────────────────────────────────────────────────────

pub struct EconomyPlugin;

impl Plugin for EconomyPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GachaResults>();

        app.add_systems(
            Update,
            (
                // Currency change events can arrive from any domain at any time.
                apply_currency_changes,
                // Weapon panel.
                handle_enhance,
                handle_evolve,
                // Stat tracks.
                handle_stat_upgrade,
                // Gacha and the artifact copy-sink.
                handle_gacha_pull,
                handle_upgrade_artifact,
                clear_gacha_results,
                // Merge cascades.
                handle_merge_pet,
                handle_merge_skin,
                handle_merge_all_pets,
                handle_merge_all_skins,
                // Equipment slots.
                handle_equip_pet,
                handle_unequip_pet,
                handle_equip_skin,
                // One-time collection claims.
                handle_claim_weapon,
                handle_claim_mushroom,
                handle_claim_pet,
                handle_claim_all,
                // Drain ToastEvent to prevent "event not read" warnings when
                // no client shell is attached.
                drain_toasts,
            )
                .run_if(in_state(GameState::Playing)),
        );
    }
}

/// Drains `ToastEvent`; the client shell reads these when present.
pub fn drain_toasts(mut events: EventReader<ToastEvent>) {
    for _event in events.read() {}
}
