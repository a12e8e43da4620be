use crate::shared::*;

/// Display names for all 31 weapon tiers, lowest to highest.
const WEAPON_NAMES: [&str; 31] = [
    "Rotten Twig",
    "Birch Branch",
    "Foraging Knife",
    "Rusty Trowel",
    "Copper Sickle",
    "Iron Machete",
    "Sporesteel Dagger",
    "Gilled Cleaver",
    "Amber Hatchet",
    "Mycel Blade",
    "Silver Scythe",
    "Duskcap Saber",
    "Glowshroom Edge",
    "Thornveil Pike",
    "Obsidian Slicer",
    "Moonlit Falx",
    "Royal Trufflefork",
    "Emberfung Brand",
    "Frostgill Claymore",
    "Stormspore Glaive",
    "Venomveil Kris",
    "Sunfleck Halberd",
    "Starspore Lance",
    "Voidcap Reaper",
    "Crystal Mycoblade",
    "Phoenixgill Saber",
    "Dragonspore Fang",
    "Titanshroom Maul",
    "Celestial Sporeblade",
    "Eternal Myceliumbrand",
    "Infinity Sporescythe",
];

/// Populate the WeaponRegistry with every tier.
///
/// Per-tier numbers follow fixed geometric ladders so neighbouring tiers
/// keep the same relative jump all the way up:
///   base damage   ×1.8 per tier, from 10
///   evolve price  ×2.5 per tier, from 1,000
///   enhance base  ×2.2 per tier, from 10,000
/// Per-enhance-level damage growth is half the tier's base damage.
pub fn populate_weapons(registry: &mut WeaponRegistry) {
    registry.tiers = WEAPON_NAMES
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let base_damage = (10.0 * 1.8f64.powi(index as i32)).floor();
            WeaponTierDef {
                index,
                name: (*name).to_string(),
                price: (1_000.0 * 2.5f64.powi(index as i32)).floor(),
                base_damage,
                damage_per_level: (base_damage / 2.0).floor().max(1.0),
                enhance_base_cost: (10_000.0 * 2.2f64.powi(index as i32)).floor(),
            }
        })
        .collect();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weapon_ladder_shape() {
        let mut registry = WeaponRegistry::default();
        populate_weapons(&mut registry);

        assert_eq!(registry.tiers.len(), 31);
        let first = registry.get(0).unwrap();
        assert_eq!(first.base_damage, 10.0);
        assert_eq!(first.enhance_base_cost, 10_000.0);

        // Strictly increasing across every ladder.
        for pair in registry.tiers.windows(2) {
            assert!(pair[1].base_damage > pair[0].base_damage);
            assert!(pair[1].price > pair[0].price);
            assert!(pair[1].enhance_base_cost > pair[0].enhance_base_cost);
        }
    }

    #[test]
    fn test_damage_at_is_base_plus_linear() {
        let mut registry = WeaponRegistry::default();
        populate_weapons(&mut registry);
        let tier = registry.get(5).unwrap();
        assert_eq!(
            tier.damage_at(7),
            tier.base_damage + tier.damage_per_level * 7.0
        );
    }
}
