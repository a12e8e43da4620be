//! Weapon enhancement and evolution.
//!
//! Enhancing walks levels 0..10 on the current tier with a success rate
//! that decays 5 points per level. At level 10 the only path forward is an
//! evolve attempt into the next tier, which can also destroy the enhance
//! progress on a separate low-probability roll.

use bevy::prelude::*;
use rand::Rng;

use crate::shared::*;

/// Success percent for enhancing from `level` to `level + 1`.
pub fn enhance_success_percent(level: u32) -> f64 {
    100.0 - 5.0 * level as f64
}

/// Gold cost of one enhance attempt at `level` on the given tier.
pub fn enhance_cost(def: &WeaponTierDef, level: u32) -> f64 {
    let raw = (def.enhance_base_cost * ((level + 1) as f64).powf(1.5) * 0.01).floor();
    raw.max(100.0)
}

/// Success percent for evolving out of `tier`. Decays 2 points per tier,
/// never below the floor.
pub fn evolve_success_percent(tier: usize) -> f64 {
    (100.0 - 2.0 * tier as f64).max(EVOLVE_SUCCESS_FLOOR)
}

pub const EVOLVE_SUCCESS_FLOOR: f64 = 5.0;
/// Independent roll made after a failed evolve; on hit, enhance progress
/// on the current tier is wiped.
pub const EVOLVE_DESTRUCTION_PERCENT: f64 = 5.0;

pub fn handle_enhance(
    mut events: EventReader<EnhanceWeaponEvent>,
    mut weapon: ResMut<WeaponState>,
    mut wallet: ResMut<Wallet>,
    mut stats: ResMut<PlayStats>,
    mut rng: ResMut<HuntRng>,
    registry: Res<WeaponRegistry>,
    mut toast_writer: EventWriter<ToastEvent>,
) {
    for _ev in events.read() {
        if weapon.level >= WEAPON_MAX_ENHANCE_LEVEL {
            debug!("[Economy] Enhance refused — level {} must evolve", weapon.level);
            continue;
        }
        let Some(def) = registry.get(weapon.tier) else {
            warn!("[Economy] Enhance failed — unknown weapon tier {}", weapon.tier);
            continue;
        };

        let cost = enhance_cost(def, weapon.level);
        if !wallet.try_spend_gold(cost) {
            debug!(
                "[Economy] Enhance refused — need {} gold, have {}",
                cost, wallet.gold
            );
            continue;
        }
        stats.total_gold_spent += cost;
        stats.enhance_attempts += 1;

        let roll: f64 = rng.0.gen_range(0.0..100.0);
        if roll < enhance_success_percent(weapon.level) {
            weapon.level += 1;
            info!(
                "[Economy] {} enhanced to +{} ({} gold)",
                def.name, weapon.level, cost
            );
            toast_writer.send(ToastEvent {
                message: format!("{} +{}!", def.name, weapon.level),
            });
        } else {
            info!(
                "[Economy] Enhance failed at +{} ({} gold burned)",
                weapon.level, cost
            );
            toast_writer.send(ToastEvent {
                message: "Enhance failed…".to_string(),
            });
        }
    }
}

pub fn handle_evolve(
    mut events: EventReader<EvolveWeaponEvent>,
    mut weapon: ResMut<WeaponState>,
    mut wallet: ResMut<Wallet>,
    mut stats: ResMut<PlayStats>,
    mut rng: ResMut<HuntRng>,
    registry: Res<WeaponRegistry>,
    mut toast_writer: EventWriter<ToastEvent>,
) {
    for _ev in events.read() {
        if weapon.level < WEAPON_MAX_ENHANCE_LEVEL {
            debug!(
                "[Economy] Evolve refused — weapon is +{}, needs +{}",
                weapon.level, WEAPON_MAX_ENHANCE_LEVEL
            );
            continue;
        }
        let Some(next_def) = registry.get(weapon.tier + 1) else {
            debug!("[Economy] Evolve refused — already at the final tier");
            continue;
        };

        let cost = next_def.price;
        if !wallet.try_spend_gold(cost) {
            debug!(
                "[Economy] Evolve refused — need {} gold, have {}",
                cost, wallet.gold
            );
            continue;
        }
        stats.total_gold_spent += cost;
        stats.evolve_attempts += 1;

        let roll: f64 = rng.0.gen_range(0.0..100.0);
        if roll < evolve_success_percent(weapon.tier) {
            weapon.tier += 1;
            weapon.level = 0;
            let tier = weapon.tier;
            weapon.obtained.insert(tier);
            info!("[Economy] Weapon evolved into {}", next_def.name);
            toast_writer.send(ToastEvent {
                message: format!("Evolved into {}!", next_def.name),
            });
            continue;
        }

        let destruction: f64 = rng.0.gen_range(0.0..100.0);
        if destruction < EVOLVE_DESTRUCTION_PERCENT {
            weapon.level = 0;
            info!("[Economy] Evolve failed — enhance progress shattered");
            toast_writer.send(ToastEvent {
                message: "The weapon shattered back to +0…".to_string(),
            });
        } else {
            info!("[Economy] Evolve failed ({} gold burned)", cost);
            toast_writer.send(ToastEvent {
                message: "Evolve failed…".to_string(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tier_def(enhance_base_cost: f64) -> WeaponTierDef {
        WeaponTierDef {
            index: 0,
            name: "Rotten Twig".to_string(),
            price: 1_000.0,
            base_damage: 10.0,
            damage_per_level: 5.0,
            enhance_base_cost,
        }
    }

    #[test]
    fn test_enhance_cost_floor_at_level_zero() {
        let def = tier_def(10_000.0);
        // 10000 × 1^1.5 × 0.01 = 100, exactly the floor.
        assert_eq!(enhance_cost(&def, 0), 100.0);
        // A cheap tier still pays the 100-gold minimum.
        let cheap = tier_def(500.0);
        assert_eq!(enhance_cost(&cheap, 0), 100.0);
    }

    #[test]
    fn test_enhance_cost_grows_with_level() {
        let def = tier_def(10_000.0);
        let mut prev = 0.0;
        for level in 0..WEAPON_MAX_ENHANCE_LEVEL {
            let c = enhance_cost(&def, level);
            assert!(c >= prev);
            prev = c;
        }
        assert_eq!(
            enhance_cost(&def, 9),
            (10_000.0f64 * 10.0f64.powf(1.5) * 0.01).floor()
        );
    }

    #[test]
    fn test_enhance_success_decays_five_per_level() {
        assert_eq!(enhance_success_percent(0), 100.0);
        assert_eq!(enhance_success_percent(5), 75.0);
        assert_eq!(enhance_success_percent(9), 55.0);
    }

    #[test]
    fn test_evolve_success_decreases_with_floor() {
        assert_eq!(evolve_success_percent(0), 100.0);
        assert_eq!(evolve_success_percent(30), 40.0);
        let mut prev = f64::INFINITY;
        for tier in 0..60 {
            let p = evolve_success_percent(tier);
            assert!(p <= prev);
            assert!(p >= EVOLVE_SUCCESS_FLOOR);
            prev = p;
        }
        assert_eq!(evolve_success_percent(55), EVOLVE_SUCCESS_FLOOR);
    }
}
