//! Merge cascades: five copies of an item become one copy of the next step.
//!
//! Pets climb the rarity ladder within a species; skins climb grade first,
//! then rarity. The merge-all variants repeat single merges until nothing
//! changes, bounded by a fixed pass cap so termination never depends on
//! inventory shape.

use bevy::prelude::*;

use crate::shared::*;

/// One merge step: consumes `MERGE_BATCH` copies, grants one of the next
/// step. Returns false (state untouched) if fewer than five copies are held
/// or the item is already terminal.
pub fn merge_pet_once(pets: &mut PetCollection, id: &PetId) -> bool {
    let Some(next_rarity) = id.rarity.next() else {
        return false;
    };
    if pets.count(id) < MERGE_BATCH {
        return false;
    }
    pets.remove(id, MERGE_BATCH);
    pets.add(
        PetId {
            species: id.species.clone(),
            rarity: next_rarity,
        },
        1,
    );
    true
}

pub fn merge_skin_once(skins: &mut SkinCollection, id: SkinId) -> bool {
    let Some(next) = id.next_step() else {
        return false;
    };
    if skins.count(id) < MERGE_BATCH {
        return false;
    }
    skins.remove(id, MERGE_BATCH);
    skins.add(next, 1);
    true
}

/// Cascading merge-all over the pet inventory. Returns the number of merges
/// performed. Each pass batches every currently-mergeable stack; produced
/// copies become eligible on the next pass, so 25 commons collapse through
/// 5 rares into 1 epic.
pub fn merge_all_pets(pets: &mut PetCollection) -> u32 {
    let mut merges = 0;
    for _pass in 0..MERGE_CASCADE_CAP {
        let candidates: Vec<PetId> = pets
            .stacks
            .iter()
            .filter(|s| s.count >= MERGE_BATCH && s.id.rarity.next().is_some())
            .map(|s| s.id.clone())
            .collect();
        if candidates.is_empty() {
            break;
        }
        for id in candidates {
            while merge_pet_once(pets, &id) {
                merges += 1;
            }
        }
    }
    merges
}

pub fn merge_all_skins(skins: &mut SkinCollection) -> u32 {
    let mut merges = 0;
    for _pass in 0..MERGE_CASCADE_CAP {
        let candidates: Vec<SkinId> = skins
            .stacks
            .iter()
            .filter(|s| s.count >= MERGE_BATCH && s.id.next_step().is_some())
            .map(|s| s.id)
            .collect();
        if candidates.is_empty() {
            break;
        }
        for id in candidates {
            while merge_skin_once(skins, id) {
                merges += 1;
            }
        }
    }
    merges
}

pub fn handle_merge_pet(mut events: EventReader<MergePetEvent>, mut pets: ResMut<PetCollection>) {
    for ev in events.read() {
        if merge_pet_once(&mut pets, &ev.id) {
            info!(
                "[Economy] Merged 5× {} {} into the next rarity",
                ev.id.rarity.name(),
                ev.id.species
            );
        } else {
            debug!(
                "[Economy] Merge refused for {} {} — not enough copies or terminal",
                ev.id.rarity.name(),
                ev.id.species
            );
        }
    }
}

pub fn handle_merge_skin(
    mut events: EventReader<MergeSkinEvent>,
    mut skins: ResMut<SkinCollection>,
) {
    for ev in events.read() {
        if merge_skin_once(&mut skins, ev.id) {
            info!(
                "[Economy] Merged 5× {} grade-{} skin into the next step",
                ev.id.rarity.name(),
                ev.id.grade
            );
        } else {
            debug!("[Economy] Skin merge refused — not enough copies or terminal");
        }
    }
}

pub fn handle_merge_all_pets(
    mut events: EventReader<MergeAllPetsEvent>,
    mut pets: ResMut<PetCollection>,
) {
    for _ev in events.read() {
        let merges = merge_all_pets(&mut pets);
        if merges > 0 {
            info!("[Economy] Merge-all performed {} pet merges", merges);
        }
    }
}

pub fn handle_merge_all_skins(
    mut events: EventReader<MergeAllSkinsEvent>,
    mut skins: ResMut<SkinCollection>,
) {
    for _ev in events.read() {
        let merges = merge_all_skins(&mut skins);
        if merges > 0 {
            info!("[Economy] Merge-all performed {} skin merges", merges);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pet(species: &str, rarity: PetRarity) -> PetId {
        PetId {
            species: species.to_string(),
            rarity,
        }
    }

    #[test]
    fn test_merge_conserves_remainder() {
        let mut pets = PetCollection::default();
        pets.add(pet("truffle_boar", PetRarity::Common), 12);

        assert!(merge_pet_once(&mut pets, &pet("truffle_boar", PetRarity::Common)));
        assert!(merge_pet_once(&mut pets, &pet("truffle_boar", PetRarity::Common)));
        assert!(!merge_pet_once(&mut pets, &pet("truffle_boar", PetRarity::Common)));

        assert_eq!(pets.count(&pet("truffle_boar", PetRarity::Common)), 2);
        assert_eq!(pets.count(&pet("truffle_boar", PetRarity::Rare)), 2);
    }

    #[test]
    fn test_merge_all_twenty_three_commons() {
        let mut pets = PetCollection::default();
        pets.add(pet("moss_dragon", PetRarity::Common), 23);

        let merges = merge_all_pets(&mut pets);
        assert_eq!(merges, 4);
        assert_eq!(pets.count(&pet("moss_dragon", PetRarity::Common)), 3);
        assert_eq!(pets.count(&pet("moss_dragon", PetRarity::Rare)), 4);
    }

    #[test]
    fn test_merge_all_cascades_across_rarities() {
        let mut pets = PetCollection::default();
        pets.add(pet("keen_eagle", PetRarity::Common), 25);

        let merges = merge_all_pets(&mut pets);
        // 25 commons → 5 rares → 1 epic.
        assert_eq!(merges, 6);
        assert_eq!(pets.count(&pet("keen_eagle", PetRarity::Common)), 0);
        assert_eq!(pets.count(&pet("keen_eagle", PetRarity::Rare)), 0);
        assert_eq!(pets.count(&pet("keen_eagle", PetRarity::Epic)), 1);
    }

    #[test]
    fn test_mythic_is_terminal() {
        let mut pets = PetCollection::default();
        pets.add(pet("dew_fairy", PetRarity::Mythic), 50);
        assert!(!merge_pet_once(&mut pets, &pet("dew_fairy", PetRarity::Mythic)));
        assert_eq!(merge_all_pets(&mut pets), 0);
        assert_eq!(pets.count(&pet("dew_fairy", PetRarity::Mythic)), 50);
    }

    #[test]
    fn test_skin_steps_grade_then_rarity() {
        let mut skins = SkinCollection::default();
        let common4 = SkinId {
            rarity: SkinRarity::Common,
            grade: 4,
        };
        skins.add(common4, 5);
        assert!(merge_skin_once(&mut skins, common4));
        assert_eq!(
            skins.count(SkinId {
                rarity: SkinRarity::Rare,
                grade: 1
            }),
            1
        );

        let legendary4 = SkinId {
            rarity: SkinRarity::Legendary,
            grade: 4,
        };
        skins.add(legendary4, 10);
        assert!(!merge_skin_once(&mut skins, legendary4));
    }

    #[test]
    fn test_merge_all_with_too_few_copies_is_noop() {
        let mut pets = PetCollection::default();
        pets.add(pet("storm_eagle", PetRarity::Common), 4);
        assert_eq!(merge_all_pets(&mut pets), 0);
        assert_eq!(pets.count(&pet("storm_eagle", PetRarity::Common)), 4);
    }
}
