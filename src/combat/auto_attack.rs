//! The auto-hunt loop: target selection, approach, and rate-limited swings.
//!
//! One attack resolution per 100 ms interval — the rate limit lives here in
//! the caller, never in the resolver. Joystick/keyboard movement is handled
//! by the client shell; this loop only walks the hunter toward its current
//! target so idle play functions headless.

use bevy::prelude::*;

use crate::shared::*;

use super::resolver::resolve_attack;
use super::snapshot::player_snapshot;

#[derive(Resource, Debug)]
pub struct AttackTimer {
    pub timer: Timer,
}

impl Default for AttackTimer {
    fn default() -> Self {
        Self {
            timer: Timer::from_seconds(ATTACK_INTERVAL_SECS, TimerMode::Repeating),
        }
    }
}

/// Per-frame hunt tick: pick the nearest living mushroom, close distance,
/// and swing when the attack interval elapses with the target in range.
///
/// While a world-boss session is running, swings are redirected into the
/// session damage total instead (the field keeps idling untouched).
#[allow(clippy::too_many_arguments)]
pub fn auto_hunt(
    time: Res<Time>,
    mut attack_timer: ResMut<AttackTimer>,
    mut position: ResMut<PlayerPosition>,
    mut field: ResMut<MushroomField>,
    mut rng: ResMut<HuntRng>,
    mut boss_session: ResMut<WorldBossSession>,
    levels: Res<StatLevels>,
    weapon: Res<WeaponState>,
    weapon_registry: Res<WeaponRegistry>,
    pets: Res<PetCollection>,
    pet_registry: Res<PetRegistry>,
    skins: Res<SkinCollection>,
    artifacts: Res<ArtifactCollection>,
    mut killed_writer: EventWriter<MushroomKilledEvent>,
    mut resolved_writer: EventWriter<AttackResolvedEvent>,
) {
    attack_timer.timer.tick(time.delta());

    let snapshot = player_snapshot(
        &levels,
        &weapon,
        &weapon_registry,
        &pets,
        &pet_registry,
        &skins,
        &artifacts,
    );

    if boss_session.battling {
        if attack_timer.timer.just_finished() {
            let outcome = resolve_attack(&snapshot, &mut rng.0, true);
            boss_session.session_damage += outcome.damage;
            resolved_writer.send(AttackResolvedEvent {
                target_id: 0,
                damage: outcome.damage,
                reached_tier: outcome.reached_tier,
            });
        }
        return;
    }

    // Nearest living instance is the target.
    let Some(target_idx) = field
        .instances
        .iter()
        .enumerate()
        .filter(|(_, m)| !m.dead)
        .min_by(|(_, a), (_, b)| {
            let da = position.distance_to(a.x, a.y);
            let db = position.distance_to(b.x, b.y);
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|(i, _)| i)
    else {
        return;
    };

    let target = &field.instances[target_idx];
    let distance = position.distance_to(target.x, target.y);

    if distance > snapshot.attack_range {
        let step = (snapshot.move_speed * time.delta_secs()).min(distance - snapshot.attack_range);
        if distance > f32::EPSILON {
            position.x += (target.x - position.x) / distance * step;
            position.y += (target.y - position.y) / distance * step;
        }
        return;
    }

    if !attack_timer.timer.just_finished() {
        return;
    }

    let target = &mut field.instances[target_idx];
    let outcome = resolve_attack(&snapshot, &mut rng.0, target.is_boss);
    target.hp = (target.hp - outcome.damage).max(0.0);

    resolved_writer.send(AttackResolvedEvent {
        target_id: target.id,
        damage: outcome.damage,
        reached_tier: outcome.reached_tier,
    });

    if target.hp <= 0.0 {
        target.dead = true;
        killed_writer.send(MushroomKilledEvent {
            instance_id: target.id,
            species: target.species.clone(),
            rarity: target.rarity,
            reward_gold: target.reward_gold,
            reward_diamond: target.reward_diamond,
            was_boss: target.is_boss,
        });
    }
}
