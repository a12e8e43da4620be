mod combat;
mod data;
mod economy;
mod progression;
mod save;
mod shared;
mod stage;

use std::time::Duration;

use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;

use save::{LoadRequestEvent, NewGameEvent, SaveSlotInfoCache};
use shared::*;

fn main() {
    App::new()
        // Headless core: the schedule runner stands in for the client
        // shell's frame loop at the same 60 Hz cadence.
        .add_plugins(
            MinimalPlugins
                .set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(1.0 / 60.0))),
        )
        .add_plugins(LogPlugin::default())
        .add_plugins(StatesPlugin)
        // Game state
        .init_state::<GameState>()
        // Shared resources
        .init_resource::<Wallet>()
        .init_resource::<WeaponState>()
        .init_resource::<StatLevels>()
        .init_resource::<ArtifactCollection>()
        .init_resource::<PetCollection>()
        .init_resource::<SkinCollection>()
        .init_resource::<MushroomDex>()
        .init_resource::<ClaimedRewards>()
        .init_resource::<StageProgress>()
        .init_resource::<StageSession>()
        .init_resource::<MushroomField>()
        .init_resource::<WorldBossState>()
        .init_resource::<WorldBossSession>()
        .init_resource::<PlayerPosition>()
        .init_resource::<WallClock>()
        .init_resource::<HuntRng>()
        .init_resource::<PlayStats>()
        // Registries (populated by the data plugin during Loading)
        .init_resource::<WeaponRegistry>()
        .init_resource::<PetRegistry>()
        .init_resource::<MushroomRegistry>()
        // Events
        .add_event::<EnhanceWeaponEvent>()
        .add_event::<EvolveWeaponEvent>()
        .add_event::<StatUpgradeEvent>()
        .add_event::<GachaPullEvent>()
        .add_event::<ClearGachaResultsEvent>()
        .add_event::<MergePetEvent>()
        .add_event::<MergeAllPetsEvent>()
        .add_event::<MergeSkinEvent>()
        .add_event::<MergeAllSkinsEvent>()
        .add_event::<UpgradeArtifactEvent>()
        .add_event::<EquipPetEvent>()
        .add_event::<UnequipPetEvent>()
        .add_event::<EquipSkinEvent>()
        .add_event::<ClaimWeaponRewardEvent>()
        .add_event::<ClaimMushroomRewardEvent>()
        .add_event::<ClaimPetRewardEvent>()
        .add_event::<ClaimAllRewardsEvent>()
        .add_event::<GoldChangeEvent>()
        .add_event::<DiamondChangeEvent>()
        .add_event::<MushroomKilledEvent>()
        .add_event::<AttackResolvedEvent>()
        .add_event::<SelectStageEvent>()
        .add_event::<StageClearedEvent>()
        .add_event::<StartWorldBossEvent>()
        .add_event::<EndWorldBossEvent>()
        .add_event::<ToastEvent>()
        // Domain plugins
        .add_plugins(economy::EconomyPlugin)
        .add_plugins(combat::CombatPlugin)
        .add_plugins(stage::StagePlugin)
        .add_plugins(save::SavePlugin)
        // Data loading
        .add_plugins(data::DataPlugin)
        // Real clock wiring; tests write WallClock directly instead.
        .add_systems(Update, stage::world_boss::refresh_wall_clock)
        .add_systems(
            Update,
            auto_start_session.run_if(in_state(GameState::MainMenu)),
        )
        .run();
}

/// Headless session bootstrap: resume slot 0 if it exists, otherwise start
/// a fresh hunt. The full client replaces this with its main-menu UI.
fn auto_start_session(
    mut started: Local<bool>,
    cache: Res<SaveSlotInfoCache>,
    mut load_writer: EventWriter<LoadRequestEvent>,
    mut new_game_writer: EventWriter<NewGameEvent>,
) {
    if *started {
        return;
    }
    *started = true;

    if cache.slots.first().map(|s| s.exists).unwrap_or(false) {
        load_writer.send(LoadRequestEvent { slot: 0 });
    } else {
        new_game_writer.send(NewGameEvent {
            hunter_name: String::from("Hunter"),
            active_slot: 0,
        });
    }
}
