//! World boss: a timed damage-accumulation session, three attempts per
//! local calendar day, damage converted to gold at session end.
//!
//! The session itself is ephemeral; only the best-ever damage, remaining
//! attempts, and last reset date persist.

use bevy::prelude::*;

use crate::shared::*;

/// Production clock wiring: refreshes `WallClock` from the system date once
/// per frame. Tests write `WallClock` directly instead of adding this.
pub fn refresh_wall_clock(mut clock: ResMut<WallClock>) {
    clock.today = chrono::Local::now().date_naive().to_string();
}

pub fn handle_start_world_boss(
    mut events: EventReader<StartWorldBossEvent>,
    clock: Res<WallClock>,
    mut state: ResMut<WorldBossState>,
    mut session: ResMut<WorldBossSession>,
    mut toast_writer: EventWriter<ToastEvent>,
) {
    for _ev in events.read() {
        if session.battling {
            debug!("[WorldBoss] Start refused — session already running");
            continue;
        }

        // Attempts reset on local-date rollover. An empty clock means the
        // date is unknown (headless test without clock wiring): no reset.
        if !clock.today.is_empty() && state.last_reset_date != clock.today {
            state.last_reset_date = clock.today.clone();
            state.attempts_remaining = WORLD_BOSS_DAILY_ATTEMPTS;
            debug!("[WorldBoss] Daily attempts reset for {}", clock.today);
        }

        if state.attempts_remaining == 0 {
            debug!("[WorldBoss] Start refused — no attempts left today");
            toast_writer.send(ToastEvent {
                message: "No world boss attempts left today".to_string(),
            });
            continue;
        }

        state.attempts_remaining -= 1;
        session.battling = true;
        session.session_damage = 0.0;
        session.countdown = Some(Timer::from_seconds(WORLD_BOSS_SESSION_SECS, TimerMode::Once));
        info!(
            "[WorldBoss] Session started ({} attempts left today)",
            state.attempts_remaining
        );
    }
}

/// Early retreat: ends the session exactly as timer expiry would.
pub fn handle_end_world_boss(
    mut events: EventReader<EndWorldBossEvent>,
    mut state: ResMut<WorldBossState>,
    mut session: ResMut<WorldBossSession>,
    mut gold_writer: EventWriter<GoldChangeEvent>,
    mut toast_writer: EventWriter<ToastEvent>,
) {
    for _ev in events.read() {
        if !session.battling {
            debug!("[WorldBoss] End refused — no session running");
            continue;
        }
        finish_session(&mut state, &mut session, &mut gold_writer, &mut toast_writer);
    }
}

pub fn tick_world_boss(
    time: Res<Time>,
    mut state: ResMut<WorldBossState>,
    mut session: ResMut<WorldBossSession>,
    mut gold_writer: EventWriter<GoldChangeEvent>,
    mut toast_writer: EventWriter<ToastEvent>,
) {
    if !session.battling {
        return;
    }
    let mut done = false;
    match session.countdown.as_mut() {
        Some(timer) => {
            timer.tick(time.delta());
            if timer.finished() {
                done = true;
            }
        }
        None => done = true,
    }
    if done {
        finish_session(&mut state, &mut session, &mut gold_writer, &mut toast_writer);
    }
}

fn finish_session(
    state: &mut WorldBossState,
    session: &mut WorldBossSession,
    gold_writer: &mut EventWriter<GoldChangeEvent>,
    toast_writer: &mut EventWriter<ToastEvent>,
) {
    session.battling = false;
    session.countdown = None;

    let payout = (session.session_damage * WORLD_BOSS_GOLD_PER_DAMAGE).floor();
    if payout > 0.0 {
        gold_writer.send(GoldChangeEvent {
            amount: payout,
            reason: "world boss session".to_string(),
        });
    }
    if session.session_damage > state.best_damage {
        state.best_damage = session.session_damage;
        toast_writer.send(ToastEvent {
            message: format!("New world boss record: {:.0} damage!", state.best_damage),
        });
    }
    info!(
        "[WorldBoss] Session over — {:.0} damage, {} gold",
        session.session_damage, payout
    );
}
