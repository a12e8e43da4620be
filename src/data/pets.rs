use crate::shared::*;

/// Populate the PetRegistry: two species per effect kind.
///
/// A species exists at every rarity; the gacha rolls species and rarity
/// independently, and merges climb the rarity ladder within one species.
pub fn populate_pets(registry: &mut PetRegistry) {
    let species = [
        ("moss_dragon", "Moss Dragon", PetKind::Dragon),
        ("ember_dragon", "Ember Dragon", PetKind::Dragon),
        ("duskcap_wolf", "Duskcap Wolf", PetKind::Wolf),
        ("frostfang_wolf", "Frostfang Wolf", PetKind::Wolf),
        ("keen_eagle", "Keen Eagle", PetKind::Eagle),
        ("storm_eagle", "Storm Eagle", PetKind::Eagle),
        ("glimmer_fairy", "Glimmer Fairy", PetKind::Fairy),
        ("dew_fairy", "Dew Fairy", PetKind::Fairy),
        ("truffle_boar", "Truffle Boar", PetKind::Truffler),
        ("golden_boar", "Golden Boar", PetKind::Truffler),
    ];

    registry.species = species
        .iter()
        .map(|(id, name, kind)| PetSpeciesDef {
            id: (*id).to_string(),
            name: (*name).to_string(),
            kind: *kind,
        })
        .collect();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_has_a_species() {
        let mut registry = PetRegistry::default();
        populate_pets(&mut registry);
        for kind in [
            PetKind::Dragon,
            PetKind::Wolf,
            PetKind::Eagle,
            PetKind::Fairy,
            PetKind::Truffler,
        ] {
            assert!(
                registry.species.iter().any(|s| s.kind == kind),
                "missing species for {:?}",
                kind
            );
        }
    }
}
