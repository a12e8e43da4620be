//! Equipment slots: up to three pets, one skin.

use bevy::prelude::*;

use crate::shared::*;

pub fn handle_equip_pet(mut events: EventReader<EquipPetEvent>, mut pets: ResMut<PetCollection>) {
    for ev in events.read() {
        if pets.count(&ev.id) == 0 {
            debug!(
                "[Economy] Equip refused — no {} {} held",
                ev.id.rarity.name(),
                ev.id.species
            );
            continue;
        }
        if pets.is_equipped(&ev.id) {
            debug!("[Economy] Equip refused — pet already equipped");
            continue;
        }
        if pets.equipped.len() >= PET_EQUIP_SLOTS {
            debug!(
                "[Economy] Equip refused — all {} pet slots in use",
                PET_EQUIP_SLOTS
            );
            continue;
        }
        info!(
            "[Economy] Equipped {} {}",
            ev.id.rarity.name(),
            ev.id.species
        );
        pets.equipped.push(ev.id.clone());
    }
}

pub fn handle_unequip_pet(
    mut events: EventReader<UnequipPetEvent>,
    mut pets: ResMut<PetCollection>,
) {
    for ev in events.read() {
        let before = pets.equipped.len();
        pets.equipped.retain(|id| *id != ev.id);
        if pets.equipped.len() < before {
            info!(
                "[Economy] Unequipped {} {}",
                ev.id.rarity.name(),
                ev.id.species
            );
        }
    }
}

pub fn handle_equip_skin(
    mut events: EventReader<EquipSkinEvent>,
    mut skins: ResMut<SkinCollection>,
) {
    for ev in events.read() {
        if skins.count(ev.id) == 0 {
            debug!("[Economy] Skin equip refused — not owned");
            continue;
        }
        skins.equipped = Some(ev.id);
        info!(
            "[Economy] Equipped {} grade-{} skin",
            ev.id.rarity.name(),
            ev.id.grade
        );
    }
}
