//! Stage lifecycle: selection, kill accounting, respawns, and the boss
//! phase state machine.
//!
//! Clearing 100 kills completes a normal stage immediately; on a boss stage
//! it summons the boss under a 60-second countdown instead. Countdown
//! expiry restarts the stage from scratch (fresh field roll, kill count
//! zeroed); a boss kill auto-advances after a short delay.

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::Rng;

use crate::shared::*;

use super::spawn::{self, SpawnSite};

/// Which call path generated the current field. Respawns reuse it so one
/// stage never mixes the two difficulty curves.
#[derive(Resource, Debug, Default)]
pub struct ActiveSpawnSite(pub SpawnSite);

fn eagle_multiplier(pets: &PetCollection, registry: &PetRegistry) -> f64 {
    pets.best_equipped_effect(registry, PetKind::Eagle)
        .unwrap_or(1.0)
}

/// Zeroes the session and rolls a fresh field for `coord`.
fn restart_stage(
    session: &mut StageSession,
    field: &mut MushroomField,
    rng: &mut StdRng,
    registry: &MushroomRegistry,
    coord: StageCoord,
    site: SpawnSite,
    eagle: f64,
) {
    session.kills = 0;
    session.boss_phase = false;
    session.boss_countdown = None;
    session.pending_advance = None;
    session.token += 1;
    spawn::generate_field(field, registry, rng, coord, site, eagle);
}

/// OnEnter(Playing): roll the opening field. Loads never persist the field,
/// so every session starts (or resumes) on a fresh spawn.
pub fn spawn_initial_field(
    progress: Res<StageProgress>,
    mut session: ResMut<StageSession>,
    mut site: ResMut<ActiveSpawnSite>,
    mut field: ResMut<MushroomField>,
    mut rng: ResMut<HuntRng>,
    registry: Res<MushroomRegistry>,
    pets: Res<PetCollection>,
    pet_registry: Res<PetRegistry>,
) {
    let eagle = eagle_multiplier(&pets, &pet_registry);
    site.0 = SpawnSite::StageStart;
    restart_stage(
        &mut session,
        &mut field,
        &mut rng.0,
        &registry,
        progress.current,
        SpawnSite::StageStart,
        eagle,
    );
    info!(
        "[Stage] Entering stage {}-{} with a fresh field",
        progress.current.chapter, progress.current.stage
    );
}

/// Jump to a previously-reached stage (replay / farming).
pub fn handle_select_stage(
    mut events: EventReader<SelectStageEvent>,
    mut progress: ResMut<StageProgress>,
    mut session: ResMut<StageSession>,
    mut site: ResMut<ActiveSpawnSite>,
    mut field: ResMut<MushroomField>,
    mut rng: ResMut<HuntRng>,
    registry: Res<MushroomRegistry>,
    pets: Res<PetCollection>,
    pet_registry: Res<PetRegistry>,
) {
    for ev in events.read() {
        let coord = StageCoord {
            chapter: ev.chapter,
            stage: ev.stage,
        };
        if ev.chapter < 1 || ev.stage < 1 || ev.stage > STAGES_PER_CHAPTER {
            debug!("[Stage] Select refused — {}-{} is not a stage", ev.chapter, ev.stage);
            continue;
        }
        if coord.is_beyond(progress.max_reached) {
            debug!(
                "[Stage] Select refused — {}-{} not reached yet (max {}-{})",
                coord.chapter, coord.stage, progress.max_reached.chapter, progress.max_reached.stage
            );
            continue;
        }
        progress.current = coord;
        site.0 = SpawnSite::StageStart;
        let eagle = eagle_multiplier(&pets, &pet_registry);
        restart_stage(
            &mut session,
            &mut field,
            &mut rng.0,
            &registry,
            coord,
            SpawnSite::StageStart,
            eagle,
        );
        info!("[Stage] Selected stage {}-{}", coord.chapter, coord.stage);
    }
}

/// Pays out gold/diamond kill rewards and keeps the collection dex current.
#[allow(clippy::too_many_arguments)]
pub fn award_kill_rewards(
    mut events: EventReader<MushroomKilledEvent>,
    mut dex: ResMut<MushroomDex>,
    mut stats: ResMut<PlayStats>,
    mut rng: ResMut<HuntRng>,
    levels: Res<StatLevels>,
    pets: Res<PetCollection>,
    pet_registry: Res<PetRegistry>,
    artifacts: Res<ArtifactCollection>,
    mut gold_writer: EventWriter<GoldChangeEvent>,
    mut diamond_writer: EventWriter<DiamondChangeEvent>,
) {
    for ev in events.read() {
        stats.total_kills += 1;
        if ev.was_boss {
            stats.boss_kills += 1;
        }

        // Dex write is idempotent and never touches claim flags.
        if !ev.species.is_empty() {
            dex.record(&ev.species, ev.rarity);
        }

        let truffler = pets
            .best_equipped_effect(&pet_registry, PetKind::Truffler)
            .unwrap_or(1.0);
        let gold_track = 1.0 + levels.gold_gain as f64 / 100.0;
        let artifact_gold =
            1.0 + artifacts.channel_percent(ArtifactChannel::GoldPercent) / 100.0;
        let gold = (ev.reward_gold * gold_track * truffler * artifact_gold).floor();
        if gold > 0.0 {
            gold_writer.send(GoldChangeEvent {
                amount: gold,
                reason: format!("{} {} kill", ev.rarity.name(), ev.species),
            });
        }

        // Unique spawns carry a flat diamond bonus; fairies and the prism
        // channel add an independent per-kill drop chance on top.
        let mut diamond = ev.reward_diamond;
        let drop_chance = pets
            .best_equipped_effect(&pet_registry, PetKind::Fairy)
            .unwrap_or(0.0)
            + artifacts.channel_percent(ArtifactChannel::DiamondDropPercent);
        if drop_chance > 0.0 && rng.0.gen_range(0.0..100.0) < drop_chance {
            diamond += 1;
        }
        if diamond > 0 {
            diamond_writer.send(DiamondChangeEvent {
                amount: diamond as i64,
                reason: format!("{} {} kill", ev.rarity.name(), ev.species),
            });
        }
    }
}

/// Advances the kill counter, schedules respawns, and drives the boss
/// phase and stage completion.
#[allow(clippy::too_many_arguments)]
pub fn track_stage_kills(
    mut events: EventReader<MushroomKilledEvent>,
    mut progress: ResMut<StageProgress>,
    mut session: ResMut<StageSession>,
    mut site: ResMut<ActiveSpawnSite>,
    mut field: ResMut<MushroomField>,
    mut rng: ResMut<HuntRng>,
    registry: Res<MushroomRegistry>,
    pets: Res<PetCollection>,
    pet_registry: Res<PetRegistry>,
    mut diamond_writer: EventWriter<DiamondChangeEvent>,
    mut cleared_writer: EventWriter<StageClearedEvent>,
    mut toast_writer: EventWriter<ToastEvent>,
) {
    for ev in events.read() {
        if ev.was_boss {
            if session.boss_phase && session.pending_advance.is_none() {
                session.boss_countdown = None;
                session.pending_advance =
                    Some(Timer::from_seconds(BOSS_ADVANCE_DELAY_SECS, TimerMode::Once));
                info!("[Stage] Boss down — advancing shortly");
                toast_writer.send(ToastEvent {
                    message: "Boss defeated!".to_string(),
                });
            }
            continue;
        }

        session.kills = (session.kills + 1).min(STAGE_KILL_TARGET);

        // The killed instance comes back as a brand-new spawn (new id) after
        // a fixed delay, so stale references can never resurrect it.
        if let Some(instance) = field.get_mut(ev.instance_id) {
            instance.respawn_timer =
                Some(Timer::from_seconds(RESPAWN_DELAY_SECS, TimerMode::Once));
        }

        if session.kills >= STAGE_KILL_TARGET
            && !session.boss_phase
            && session.pending_advance.is_none()
        {
            let coord = progress.current;
            if coord.is_boss_stage() {
                session.boss_phase = true;
                session.boss_countdown =
                    Some(Timer::from_seconds(BOSS_COUNTDOWN_SECS, TimerMode::Once));
                spawn::spawn_boss(&mut field, &registry, &mut rng.0, coord, site.0);
                info!(
                    "[Stage] Boss phase on stage {}-{} — {}s on the clock",
                    coord.chapter, coord.stage, BOSS_COUNTDOWN_SECS
                );
                toast_writer.send(ToastEvent {
                    message: "The boss emerges!".to_string(),
                });
            } else {
                let eagle = eagle_multiplier(&pets, &pet_registry);
                complete_stage(
                    &mut progress,
                    &mut session,
                    &mut site,
                    &mut field,
                    &mut rng.0,
                    &registry,
                    eagle,
                    &mut diamond_writer,
                    &mut cleared_writer,
                    &mut toast_writer,
                );
            }
        }
    }
}

/// Ticks respawn, boss-countdown, and pending-advance timers.
#[allow(clippy::too_many_arguments)]
pub fn tick_stage_timers(
    time: Res<Time>,
    mut progress: ResMut<StageProgress>,
    mut session: ResMut<StageSession>,
    mut site: ResMut<ActiveSpawnSite>,
    mut field: ResMut<MushroomField>,
    mut rng: ResMut<HuntRng>,
    registry: Res<MushroomRegistry>,
    pets: Res<PetCollection>,
    pet_registry: Res<PetRegistry>,
    mut diamond_writer: EventWriter<DiamondChangeEvent>,
    mut cleared_writer: EventWriter<StageClearedEvent>,
    mut toast_writer: EventWriter<ToastEvent>,
) {
    let eagle = eagle_multiplier(&pets, &pet_registry);
    let coord = progress.current;

    // Individual respawns: replace the slot with a fresh instance.
    let mut due = Vec::new();
    for (idx, instance) in field.instances.iter_mut().enumerate() {
        if let Some(timer) = instance.respawn_timer.as_mut() {
            timer.tick(time.delta());
            if timer.finished() {
                due.push(idx);
            }
        }
    }
    for idx in due {
        let fresh = spawn::spawn_instance(&mut field, &registry, &mut rng.0, coord, site.0, eagle);
        field.instances[idx] = fresh;
    }

    // Boss countdown: expiry restarts the stage from scratch, not merely
    // the timer.
    let mut boss_expired = false;
    if let Some(timer) = session.boss_countdown.as_mut() {
        timer.tick(time.delta());
        if timer.finished() {
            boss_expired = true;
        }
    }
    if boss_expired {
        info!(
            "[Stage] Boss timer expired on {}-{} — restarting stage",
            coord.chapter, coord.stage
        );
        toast_writer.send(ToastEvent {
            message: "The boss escaped…".to_string(),
        });
        site.0 = SpawnSite::StageStart;
        restart_stage(
            &mut session,
            &mut field,
            &mut rng.0,
            &registry,
            coord,
            SpawnSite::StageStart,
            eagle,
        );
        return;
    }

    // Post-boss-kill advance delay.
    let mut advance = false;
    if let Some(timer) = session.pending_advance.as_mut() {
        timer.tick(time.delta());
        if timer.finished() {
            advance = true;
        }
    }
    if advance {
        complete_stage(
            &mut progress,
            &mut session,
            &mut site,
            &mut field,
            &mut rng.0,
            &registry,
            eagle,
            &mut diamond_writer,
            &mut cleared_writer,
            &mut toast_writer,
        );
    }
}

/// Stage clear: diamond payout, coordinate advance, fresh field under the
/// advance-site difficulty curve.
#[allow(clippy::too_many_arguments)]
fn complete_stage(
    progress: &mut StageProgress,
    session: &mut StageSession,
    site: &mut ActiveSpawnSite,
    field: &mut MushroomField,
    rng: &mut StdRng,
    registry: &MushroomRegistry,
    eagle: f64,
    diamond_writer: &mut EventWriter<DiamondChangeEvent>,
    cleared_writer: &mut EventWriter<StageClearedEvent>,
    toast_writer: &mut EventWriter<ToastEvent>,
) {
    let cleared = progress.current;
    let boss_stage = cleared.is_boss_stage();
    let diamond = if boss_stage {
        BOSS_CLEAR_DIAMOND
    } else {
        STAGE_CLEAR_DIAMOND
    };
    diamond_writer.send(DiamondChangeEvent {
        amount: diamond as i64,
        reason: format!("stage {}-{} clear", cleared.chapter, cleared.stage),
    });

    let next = cleared.next();
    progress.current = next;
    if next.is_beyond(progress.max_reached) {
        progress.max_reached = next;
    }

    site.0 = SpawnSite::StageAdvance;
    restart_stage(session, field, rng, registry, next, SpawnSite::StageAdvance, eagle);

    cleared_writer.send(StageClearedEvent {
        coord: cleared,
        boss_stage,
    });
    toast_writer.send(ToastEvent {
        message: format!("Stage {}-{} cleared! +{} diamond", cleared.chapter, cleared.stage, diamond),
    });
    info!(
        "[Stage] Cleared {}-{}, moving to {}-{}",
        cleared.chapter, cleared.stage, next.chapter, next.stage
    );
}
