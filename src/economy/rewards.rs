//! One-time collection-reward claims.
//!
//! A claim needs two things: the matching dex flag set, and the claim flag
//! unset. Payout and claim-flag write happen together, so a second request
//! for the same (item, rarity) pair — even in the same frame's batch — is a
//! silent no-op. Claim flags are never cleared by later dex writes.

use bevy::prelude::*;

use crate::shared::*;

/// Diamond paid for a weapon-dex entry at the given tier index.
pub fn weapon_claim_diamond(tier: usize) -> u64 {
    10 * (tier as u64 + 1)
}

fn pay(wallet: &mut Wallet, stats: &mut PlayStats, amount: u64) {
    wallet.add_diamond(amount);
    stats.total_diamond_earned += amount;
}

pub fn handle_claim_weapon(
    mut events: EventReader<ClaimWeaponRewardEvent>,
    weapon: Res<WeaponState>,
    mut claimed: ResMut<ClaimedRewards>,
    mut wallet: ResMut<Wallet>,
    mut stats: ResMut<PlayStats>,
) {
    for ev in events.read() {
        if !weapon.obtained.contains(&ev.tier) {
            debug!("[Economy] Weapon claim refused — tier {} not in dex", ev.tier);
            continue;
        }
        if !claimed.weapons.insert(ev.tier) {
            debug!("[Economy] Weapon claim refused — tier {} already paid", ev.tier);
            continue;
        }
        let amount = weapon_claim_diamond(ev.tier);
        pay(&mut wallet, &mut stats, amount);
        info!(
            "[Economy] Weapon dex reward claimed: tier {} (+{} diamond)",
            ev.tier, amount
        );
    }
}

pub fn handle_claim_mushroom(
    mut events: EventReader<ClaimMushroomRewardEvent>,
    dex: Res<MushroomDex>,
    mut claimed: ResMut<ClaimedRewards>,
    mut wallet: ResMut<Wallet>,
    mut stats: ResMut<PlayStats>,
) {
    for ev in events.read() {
        if !dex.has_seen(&ev.species, ev.rarity) {
            debug!(
                "[Economy] Mushroom claim refused — {} {} not in dex",
                ev.rarity.name(),
                ev.species
            );
            continue;
        }
        if claimed.mushroom_claimed(&ev.species, ev.rarity) {
            debug!(
                "[Economy] Mushroom claim refused — {} {} already paid",
                ev.rarity.name(),
                ev.species
            );
            continue;
        }
        claimed.mark_mushroom(&ev.species, ev.rarity);
        let amount = ev.rarity.claim_diamond();
        pay(&mut wallet, &mut stats, amount);
        info!(
            "[Economy] Mushroom dex reward claimed: {} {} (+{} diamond)",
            ev.rarity.name(),
            ev.species,
            amount
        );
    }
}

pub fn handle_claim_pet(
    mut events: EventReader<ClaimPetRewardEvent>,
    pets: Res<PetCollection>,
    mut claimed: ResMut<ClaimedRewards>,
    mut wallet: ResMut<Wallet>,
    mut stats: ResMut<PlayStats>,
) {
    for ev in events.read() {
        if !pets.ever_owned.contains(&ev.id) {
            debug!(
                "[Economy] Pet claim refused — {} {} not in dex",
                ev.id.rarity.name(),
                ev.id.species
            );
            continue;
        }
        if !claimed.pets.insert(ev.id.clone()) {
            debug!(
                "[Economy] Pet claim refused — {} {} already paid",
                ev.id.rarity.name(),
                ev.id.species
            );
            continue;
        }
        let amount = ev.id.rarity.claim_diamond();
        pay(&mut wallet, &mut stats, amount);
        info!(
            "[Economy] Pet dex reward claimed: {} {} (+{} diamond)",
            ev.id.rarity.name(),
            ev.id.species,
            amount
        );
    }
}

/// Claims every currently-claimable entry across all three dexes in one
/// pass. Equivalent to firing the individual claim events for each.
#[allow(clippy::too_many_arguments)]
pub fn handle_claim_all(
    mut events: EventReader<ClaimAllRewardsEvent>,
    weapon: Res<WeaponState>,
    dex: Res<MushroomDex>,
    pets: Res<PetCollection>,
    mut claimed: ResMut<ClaimedRewards>,
    mut wallet: ResMut<Wallet>,
    mut stats: ResMut<PlayStats>,
    mut toast_writer: EventWriter<ToastEvent>,
) {
    for _ev in events.read() {
        let mut total = 0u64;

        for tier in weapon.obtained.iter() {
            if claimed.weapons.insert(*tier) {
                total += weapon_claim_diamond(*tier);
            }
        }

        for (species, flags) in dex.seen.iter() {
            for rarity in MushroomRarity::ALL {
                if flags.get(rarity) && !claimed.mushroom_claimed(species, rarity) {
                    claimed.mark_mushroom(species, rarity);
                    total += rarity.claim_diamond();
                }
            }
        }

        for id in pets.ever_owned.iter() {
            if claimed.pets.insert(id.clone()) {
                total += id.rarity.claim_diamond();
            }
        }

        if total == 0 {
            debug!("[Economy] Claim-all — nothing claimable");
            continue;
        }
        pay(&mut wallet, &mut stats, total);
        info!("[Economy] Claim-all paid {} diamond", total);
        toast_writer.send(ToastEvent {
            message: format!("Collected {} diamond in dex rewards!", total),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weapon_claim_scales_with_tier() {
        assert_eq!(weapon_claim_diamond(0), 10);
        assert_eq!(weapon_claim_diamond(30), 310);
    }
}
