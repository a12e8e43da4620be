//! Derived-stat snapshot assembly.
//!
//! `StatLevels` plus the weapon, skin, pet, and artifact collections are the
//! only sources of truth; everything here is recomputed on read. Nothing in
//! this module writes state.

use crate::shared::*;

/// Everything an attack resolution needs, read once at swing time.
#[derive(Debug, Clone)]
pub struct PlayerSnapshot {
    pub click_damage: f64,
    pub move_speed: f32,
    pub attack_range: f32,
    /// Chance percent per crit tier, already capped at 100.
    pub crit_chance: [f64; CRIT_TIER_COUNT],
    /// Damage percent per crit tier (tier base + track level).
    pub crit_damage: [f64; CRIT_TIER_COUNT],
    pub artifact_attack_percent: f64,
    pub skin_attack_percent: f64,
    /// Final-damage multiplier from the best equipped dragon, 1.0 if none.
    pub dragon_multiplier: f64,
    /// Boss bonus from the best equipped wolf, added to 1.0. Zero if none.
    pub wolf_boss_bonus: f64,
    /// Artifact boss-damage channel, percent.
    pub boss_damage_percent: f64,
}

pub fn player_snapshot(
    levels: &StatLevels,
    weapon: &WeaponState,
    weapon_registry: &WeaponRegistry,
    pets: &PetCollection,
    pet_registry: &PetRegistry,
    skins: &SkinCollection,
    artifacts: &ArtifactCollection,
) -> PlayerSnapshot {
    let weapon_damage = weapon_registry
        .get(weapon.tier)
        .map(|def| def.damage_at(weapon.level))
        .unwrap_or(1.0);

    // Attack-power track: one percent of weapon damage per level.
    let click_damage =
        (weapon_damage * (1.0 + levels.attack_power as f64 / 100.0)).floor();

    let mut crit_chance = [0.0; CRIT_TIER_COUNT];
    let mut crit_damage = [0.0; CRIT_TIER_COUNT];
    for tier in CritTier::ALL {
        crit_chance[tier.index()] = levels.chance_percent(tier);
        crit_damage[tier.index()] = levels.damage_percent(tier);
    }
    // The crit-chance artifact channel lands on the basic tier only.
    let crit_flat = artifacts.channel_percent(ArtifactChannel::CritChanceFlat);
    crit_chance[0] = (crit_chance[0] + crit_flat).min(100.0);

    let speed_bonus = artifacts.channel_percent(ArtifactChannel::MoveSpeedPercent);
    let move_speed = (BASE_MOVE_SPEED + 0.01 * levels.move_speed as f32)
        * (1.0 + speed_bonus as f32 / 100.0);
    let attack_range = BASE_ATTACK_RANGE + 0.01 * levels.attack_range as f32;

    PlayerSnapshot {
        click_damage,
        move_speed,
        attack_range,
        crit_chance,
        crit_damage,
        artifact_attack_percent: artifacts.channel_percent(ArtifactChannel::AttackPercent),
        skin_attack_percent: skins.equipped_attack_bonus(),
        dragon_multiplier: pets
            .best_equipped_effect(pet_registry, PetKind::Dragon)
            .unwrap_or(1.0),
        wolf_boss_bonus: pets
            .best_equipped_effect(pet_registry, PetKind::Wolf)
            .unwrap_or(0.0),
        boss_damage_percent: artifacts.channel_percent(ArtifactChannel::BossDamagePercent),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with_one_tier() -> WeaponRegistry {
        WeaponRegistry {
            tiers: vec![WeaponTierDef {
                index: 0,
                name: "Twig".to_string(),
                price: 1_000.0,
                base_damage: 10.0,
                damage_per_level: 5.0,
                enhance_base_cost: 10_000.0,
            }],
        }
    }

    #[test]
    fn test_click_damage_from_weapon_and_attack_power() {
        let mut levels = StatLevels::default();
        let weapon = WeaponState::default();
        let reg = registry_with_one_tier();
        let pets = PetCollection::default();
        let pet_reg = PetRegistry::default();
        let skins = SkinCollection::default();
        let artifacts = ArtifactCollection::default();

        let snap = player_snapshot(&levels, &weapon, &reg, &pets, &pet_reg, &skins, &artifacts);
        assert_eq!(snap.click_damage, 10.0);

        // 50 attack-power levels = +50% weapon damage.
        levels.attack_power = 50;
        let snap = player_snapshot(&levels, &weapon, &reg, &pets, &pet_reg, &skins, &artifacts);
        assert_eq!(snap.click_damage, 15.0);
    }

    #[test]
    fn test_best_equipped_dragon_wins_not_sum() {
        let levels = StatLevels::default();
        let weapon = WeaponState::default();
        let reg = registry_with_one_tier();
        let skins = SkinCollection::default();
        let artifacts = ArtifactCollection::default();

        let pet_reg = PetRegistry {
            species: vec![PetSpeciesDef {
                id: "moss_dragon".to_string(),
                name: "Moss Dragon".to_string(),
                kind: PetKind::Dragon,
            }],
        };
        let mut pets = PetCollection::default();
        for rarity in [PetRarity::Common, PetRarity::Epic] {
            let id = PetId {
                species: "moss_dragon".to_string(),
                rarity,
            };
            pets.add(id.clone(), 1);
            pets.equipped.push(id);
        }

        let snap = player_snapshot(&levels, &weapon, &reg, &pets, &pet_reg, &skins, &artifacts);
        assert_eq!(snap.dragon_multiplier, pet_effect(PetKind::Dragon, PetRarity::Epic));
    }

    #[test]
    fn test_chance_percent_caps_at_100() {
        let mut levels = StatLevels::default();
        levels.crit_chance[0] = 1_000;
        let artifacts = ArtifactCollection {
            entries: vec![ArtifactEntry {
                kind: ArtifactKind::KeenMycelium,
                count: 0,
                level: 500,
            }],
        };
        let snap = player_snapshot(
            &levels,
            &WeaponState::default(),
            &registry_with_one_tier(),
            &PetCollection::default(),
            &PetRegistry::default(),
            &SkinCollection::default(),
            &artifacts,
        );
        assert_eq!(snap.crit_chance[0], 100.0);
    }
}
