//! Data layer — populates all registries at game startup.
//!
//! This plugin runs in OnEnter(GameState::Loading), fills every registry
//! (WeaponRegistry, PetRegistry, MushroomRegistry) from the hard-coded
//! game-design data defined in submodules, then transitions the game into
//! GameState::MainMenu.
//!
//! No other domain needs to seed these resources. All domain plugins can
//! safely read them once GameState has advanced past Loading.

mod mushrooms;
mod pets;
mod weapons;

use bevy::prelude::*;

use crate::shared::*;

pub struct DataPlugin;

impl Plugin for DataPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Loading), load_all_data);
    }
}

/// Single system that populates every registry and then transitions to
/// MainMenu.
fn load_all_data(
    mut weapon_registry: ResMut<WeaponRegistry>,
    mut pet_registry: ResMut<PetRegistry>,
    mut mushroom_registry: ResMut<MushroomRegistry>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    info!("DataPlugin: populating registries…");

    weapons::populate_weapons(&mut weapon_registry);
    info!("  Weapon tiers loaded: {}", weapon_registry.tiers.len());

    pets::populate_pets(&mut pet_registry);
    info!("  Pet species loaded: {}", pet_registry.species.len());

    mushrooms::populate_mushrooms(&mut mushroom_registry);
    info!(
        "  Mushroom species loaded: {}",
        mushroom_registry.species.len()
    );

    next_state.set(GameState::MainMenu);
}
