//! Mushroom spawn math: HP/reward difficulty curves and the rarity roll.
//!
//! The HP and reward exponents differ between the stage-select call site
//! and the auto-advance call site. The two pairs are kept as distinct
//! constants on `SpawnSite` — they are balanced independently upstream and
//! must not be unified here.

use rand::Rng;

use crate::shared::*;

/// Which call path generated the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpawnSite {
    #[default]
    StageStart,
    StageAdvance,
}

impl SpawnSite {
    pub fn hp_exponent(self) -> f64 {
        match self {
            SpawnSite::StageStart => 0.05,
            SpawnSite::StageAdvance => 0.055,
        }
    }

    pub fn reward_exponent(self) -> f64 {
        match self {
            SpawnSite::StageStart => 0.04,
            SpawnSite::StageAdvance => 0.035,
        }
    }
}

pub const BOSS_HP_MULTIPLIER: f64 = 50.0;
pub const BOSS_REWARD_MULTIPLIER: f64 = 100.0;

/// Base HP for a normal-rarity mushroom at this stage.
pub fn base_hp(coord: StageCoord, site: SpawnSite) -> f64 {
    (10f64.powf(coord.difficulty() * site.hp_exponent()) * 100.0).floor()
}

/// Base gold reward for a normal-rarity mushroom at this stage.
pub fn base_reward(coord: StageCoord, site: SpawnSite) -> f64 {
    (10f64.powf(coord.difficulty() * site.reward_exponent()) * 50.0).floor()
}

/// Rolls a spawn rarity from the cumulative bands: 0.01% unique, a further
/// 0.1% epic, a further 1% rare, normal otherwise. An equipped eagle pet
/// widens all three non-normal bands by the same multiplier.
pub fn roll_rarity(rng: &mut impl Rng, eagle_multiplier: f64) -> MushroomRarity {
    let roll: f64 = rng.gen_range(0.0..100.0);
    let unique_band = 0.01 * eagle_multiplier;
    let epic_band = unique_band + 0.1 * eagle_multiplier;
    let rare_band = epic_band + 1.0 * eagle_multiplier;
    if roll < unique_band {
        MushroomRarity::Unique
    } else if roll < epic_band {
        MushroomRarity::Epic
    } else if roll < rare_band {
        MushroomRarity::Rare
    } else {
        MushroomRarity::Normal
    }
}

/// Builds one spawned instance at a random field position.
pub fn spawn_instance(
    field: &mut MushroomField,
    registry: &MushroomRegistry,
    rng: &mut impl Rng,
    coord: StageCoord,
    site: SpawnSite,
    eagle_multiplier: f64,
) -> MushroomInstance {
    let species = if registry.species.is_empty() {
        String::new()
    } else {
        registry.species[rng.gen_range(0..registry.species.len())]
            .id
            .clone()
    };
    let rarity = roll_rarity(rng, eagle_multiplier);
    let hp = base_hp(coord, site) * rarity.hp_multiplier();
    MushroomInstance {
        id: field.alloc_id(),
        species,
        rarity,
        x: rng.gen_range(-FIELD_HALF_EXTENT..FIELD_HALF_EXTENT),
        y: rng.gen_range(-FIELD_HALF_EXTENT..FIELD_HALF_EXTENT),
        hp,
        max_hp: hp,
        reward_gold: (base_reward(coord, site) * rarity.reward_multiplier()).floor(),
        reward_diamond: if rarity == MushroomRarity::Unique {
            UNIQUE_DIAMOND_BONUS
        } else {
            0
        },
        is_boss: false,
        dead: false,
        respawn_timer: None,
    }
}

/// Wholesale field (re)generation: exactly MUSHROOMS_PER_STAGE fresh
/// instances. The previous field is dropped — instance ids stay unique via
/// the field's id counter, so stale references cannot resurrect.
pub fn generate_field(
    field: &mut MushroomField,
    registry: &MushroomRegistry,
    rng: &mut impl Rng,
    coord: StageCoord,
    site: SpawnSite,
    eagle_multiplier: f64,
) {
    field.instances.clear();
    for _ in 0..MUSHROOMS_PER_STAGE {
        let instance = spawn_instance(field, registry, rng, coord, site, eagle_multiplier);
        field.instances.push(instance);
    }
}

/// The stage-10 boss: one oversized instance appended to the field.
pub fn spawn_boss(
    field: &mut MushroomField,
    registry: &MushroomRegistry,
    rng: &mut impl Rng,
    coord: StageCoord,
    site: SpawnSite,
) -> u64 {
    let mut boss = spawn_instance(field, registry, rng, coord, site, 1.0);
    boss.rarity = MushroomRarity::Normal;
    boss.hp = base_hp(coord, site) * BOSS_HP_MULTIPLIER;
    boss.max_hp = boss.hp;
    boss.reward_gold = (base_reward(coord, site) * BOSS_REWARD_MULTIPLIER).floor();
    boss.reward_diamond = 0;
    boss.is_boss = true;
    boss.x = 0.0;
    boss.y = 0.0;
    let id = boss.id;
    field.instances.push(boss);
    id
}
