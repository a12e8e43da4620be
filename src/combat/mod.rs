//! Combat domain — stat snapshots, attack resolution, and the auto-hunt loop.
//!
//! The resolver is a pure function over a `PlayerSnapshot`; nothing in here
//! stores derived stats. The snapshot is rebuilt at attack time so upgrades
//! bought mid-hunt apply to the very next swing.

use bevy::prelude::*;

use crate::shared::*;

pub mod auto_attack;
pub mod resolver;
pub mod snapshot;

use auto_attack::{auto_hunt, AttackTimer};

pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AttackTimer>();

        app.add_systems(Update, auto_hunt.run_if(in_state(GameState::Playing)));
    }
}
