//! Stage domain — spawn generation, stage lifecycle, boss phase, world boss.
//!
//! The stage tracker observes kill events from combat, pays rewards, keeps
//! the collection dex current, and drives stage/chapter sequencing. All
//! timers live here as ticked state, never as callbacks — a stage change
//! invalidates pending timers through the session token.

use bevy::prelude::*;

use crate::shared::*;

pub mod lifecycle;
pub mod spawn;
pub mod world_boss;

use lifecycle::{
    award_kill_rewards, handle_select_stage, spawn_initial_field, tick_stage_timers,
    track_stage_kills,
};
use world_boss::{handle_end_world_boss, handle_start_world_boss, tick_world_boss};

pub struct StagePlugin;

impl Plugin for StagePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<lifecycle::ActiveSpawnSite>();

        app.add_systems(OnEnter(GameState::Playing), spawn_initial_field);

        app.add_systems(
            Update,
            (
                handle_select_stage,
                award_kill_rewards,
                track_stage_kills,
                tick_stage_timers,
                handle_start_world_boss,
                handle_end_world_boss,
                tick_world_boss,
                // Drain display-only combat events when no shell is attached.
                drain_attack_resolved,
            )
                .run_if(in_state(GameState::Playing)),
        );
    }
}

/// Drains `AttackResolvedEvent`; the damage-number layer reads these when
/// present.
pub fn drain_attack_resolved(mut events: EventReader<AttackResolvedEvent>) {
    for _event in events.read() {}
}
