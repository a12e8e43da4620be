//! Persistence: save slots, autosave, and the persisted/session boundary.
//!
//! Only durable progression is written to disk. The spawned mushroom field,
//! the per-stage kill counter, and any running boss session are session
//! state: a load re-rolls a fresh field and restarts the current stage's
//! counters. `PersistedState` below is the type-level statement of that
//! boundary — if a resource is not in it, it does not survive a restart.
//!
//! Save failures never touch in-memory state; the periodic autosave retries
//! from current state on its next tick.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::shared::*;

// ═══════════════════════════════════════════════════════════════════════
// PUBLIC TYPES
// ═══════════════════════════════════════════════════════════════════════

pub const SAVE_VERSION: u32 = 1;
pub const NUM_SAVE_SLOTS: usize = 3;
pub const AUTOSAVE_INTERVAL_SECS: f32 = 60.0;

/// Info about a save slot shown on the load screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveSlotInfo {
    pub slot: u8,
    pub exists: bool,
    pub hunter_name: String,
    pub max_stage: StageCoord,
    pub weapon_tier: usize,
    pub gold: f64,
    pub diamond: u64,
    pub play_time_seconds: u64,
    pub save_timestamp: u64,
}

impl Default for SaveSlotInfo {
    fn default() -> Self {
        Self {
            slot: 0,
            exists: false,
            hunter_name: String::from("Hunter"),
            max_stage: StageCoord::first(),
            weapon_tier: 0,
            gold: 0.0,
            diamond: 0,
            play_time_seconds: 0,
            save_timestamp: 0,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// EVENTS
// ═══════════════════════════════════════════════════════════════════════

/// Sent by UI (pause menu) to trigger a manual save.
#[derive(Event, Debug, Clone)]
pub struct SaveRequestEvent {
    pub slot: u8,
}

/// Sent by UI to trigger loading a specific slot.
#[derive(Event, Debug, Clone)]
pub struct LoadRequestEvent {
    pub slot: u8,
}

/// Sent by SavePlugin after a save completes (success or failure).
#[derive(Event, Debug, Clone)]
pub struct SaveCompleteEvent {
    pub slot: u8,
    pub success: bool,
    pub error_message: Option<String>,
}

/// Sent by SavePlugin after a load completes.
#[derive(Event, Debug, Clone)]
pub struct LoadCompleteEvent {
    pub slot: u8,
    pub success: bool,
    pub error_message: Option<String>,
}

/// Sent to initialize a new game (clears all state to defaults).
#[derive(Event, Debug, Clone)]
pub struct NewGameEvent {
    pub hunter_name: String,
    pub active_slot: u8,
}

// ═══════════════════════════════════════════════════════════════════════
// RESOURCES
// ═══════════════════════════════════════════════════════════════════════

/// Tracks which save slot is currently active.
#[derive(Resource, Debug, Clone)]
pub struct ActiveSaveSlot {
    pub slot: u8,
}

impl Default for ActiveSaveSlot {
    fn default() -> Self {
        Self { slot: 0 }
    }
}

/// Cached metadata for all 3 save slots, refreshed on the load screen.
#[derive(Resource, Debug, Clone, Default)]
pub struct SaveSlotInfoCache {
    pub slots: Vec<SaveSlotInfo>,
}

/// The account identity attached to saves and leaderboard snapshots.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct HunterProfile {
    pub name: String,
}

impl Default for HunterProfile {
    fn default() -> Self {
        Self {
            name: String::from("Hunter"),
        }
    }
}

/// Accumulated play time from the current session start.
#[derive(Resource, Debug, Clone)]
pub struct SessionTimer {
    pub elapsed: Duration,
}

impl Default for SessionTimer {
    fn default() -> Self {
        Self {
            elapsed: Duration::ZERO,
        }
    }
}

/// Periodic autosave cadence.
#[derive(Resource, Debug)]
pub struct AutosaveTimer {
    pub timer: Timer,
}

impl Default for AutosaveTimer {
    fn default() -> Self {
        Self {
            timer: Timer::from_seconds(AUTOSAVE_INTERVAL_SECS, TimerMode::Repeating),
        }
    }
}

/// Every resource that survives a restart, in one bundle. Session-only
/// resources (MushroomField, StageSession, WorldBossSession, GachaResults,
/// PlayerPosition) are deliberately absent.
#[derive(SystemParam)]
pub struct PersistedState<'w> {
    pub wallet: ResMut<'w, Wallet>,
    pub weapon: ResMut<'w, WeaponState>,
    pub stat_levels: ResMut<'w, StatLevels>,
    pub artifacts: ResMut<'w, ArtifactCollection>,
    pub pets: ResMut<'w, PetCollection>,
    pub skins: ResMut<'w, SkinCollection>,
    pub mushroom_dex: ResMut<'w, MushroomDex>,
    pub claimed_rewards: ResMut<'w, ClaimedRewards>,
    pub stage_progress: ResMut<'w, StageProgress>,
    pub world_boss: ResMut<'w, WorldBossState>,
    pub play_stats: ResMut<'w, PlayStats>,
}

// ═══════════════════════════════════════════════════════════════════════
// PLUGIN
// ═══════════════════════════════════════════════════════════════════════

pub struct SavePlugin;

impl Plugin for SavePlugin {
    fn build(&self, app: &mut App) {
        app
            // Resources
            .init_resource::<ActiveSaveSlot>()
            .init_resource::<SaveSlotInfoCache>()
            .init_resource::<HunterProfile>()
            .init_resource::<SessionTimer>()
            .init_resource::<AutosaveTimer>()
            // Events emitted/received by this plugin
            .add_event::<SaveRequestEvent>()
            .add_event::<LoadRequestEvent>()
            .add_event::<SaveCompleteEvent>()
            .add_event::<LoadCompleteEvent>()
            .add_event::<NewGameEvent>()
            // Startup: scan existing save files for the slot cache
            .add_systems(Startup, scan_save_slots)
            // Playing systems
            .add_systems(
                Update,
                (
                    tick_session_timer,
                    handle_save_request,
                    handle_load_request,
                    autosave_on_stage_clear,
                    autosave_periodic,
                )
                    .run_if(in_state(GameState::Playing)),
            )
            // Also allow saving/loading from the pause menu
            .add_systems(
                Update,
                (handle_save_request, handle_load_request)
                    .run_if(in_state(GameState::Paused)),
            )
            // Main menu drives new-game and slot loads
            .add_systems(
                Update,
                (handle_load_request, handle_new_game).run_if(in_state(GameState::MainMenu)),
            )
            // Refresh slot metadata whenever the menu is entered
            .add_systems(OnEnter(GameState::MainMenu), scan_save_slots);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// FILESYSTEM HELPERS
// ═══════════════════════════════════════════════════════════════════════

fn saves_directory() -> PathBuf {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));
    exe_dir.join("saves")
}

fn slot_path(slot: u8) -> PathBuf {
    saves_directory().join(format!("slot_{}.json", slot))
}

fn ensure_saves_dir() -> Result<(), std::io::Error> {
    let dir = saves_directory();
    if !dir.exists() {
        fs::create_dir_all(&dir)?;
    }
    Ok(())
}

fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

// ═══════════════════════════════════════════════════════════════════════
// SAVE FILE
// ═══════════════════════════════════════════════════════════════════════

/// On-disk representation: save metadata plus the persisted resources.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SaveFile {
    pub version: u32,
    pub slot: u8,
    pub save_timestamp: u64,
    pub hunter_name: String,
    pub wallet: Wallet,
    pub weapon: WeaponState,
    pub stat_levels: StatLevels,
    pub artifacts: ArtifactCollection,
    pub pets: PetCollection,
    pub skins: SkinCollection,
    pub mushroom_dex: MushroomDex,
    pub claimed_rewards: ClaimedRewards,
    pub stage_progress: StageProgress,
    pub world_boss: WorldBossState,
    pub play_stats: PlayStats,
}

impl SaveFile {
    fn to_save_slot_info(&self) -> SaveSlotInfo {
        SaveSlotInfo {
            slot: self.slot,
            exists: true,
            hunter_name: self.hunter_name.clone(),
            max_stage: self.stage_progress.max_reached,
            weapon_tier: self.weapon.tier,
            gold: self.wallet.gold,
            diamond: self.wallet.diamond,
            play_time_seconds: self.play_stats.play_time_seconds,
            save_timestamp: self.save_timestamp,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// SAVE / LOAD LOGIC
// ═══════════════════════════════════════════════════════════════════════

fn write_save(slot: u8, profile: &HunterProfile, state: &PersistedState) -> Result<(), String> {
    ensure_saves_dir().map_err(|e| format!("Could not create saves directory: {}", e))?;

    let file = SaveFile {
        version: SAVE_VERSION,
        slot,
        save_timestamp: current_timestamp(),
        hunter_name: profile.name.clone(),
        wallet: state.wallet.clone(),
        weapon: state.weapon.clone(),
        stat_levels: state.stat_levels.clone(),
        artifacts: state.artifacts.clone(),
        pets: state.pets.clone(),
        skins: state.skins.clone(),
        mushroom_dex: state.mushroom_dex.clone(),
        claimed_rewards: state.claimed_rewards.clone(),
        stage_progress: state.stage_progress.clone(),
        world_boss: state.world_boss.clone(),
        play_stats: state.play_stats.clone(),
    };

    let json =
        serde_json::to_string_pretty(&file).map_err(|e| format!("Serialization failed: {}", e))?;

    let path = slot_path(slot);
    // Write to a temp file first, then rename for atomicity
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, &json)
        .map_err(|e| format!("Write failed for {}: {}", tmp_path.display(), e))?;
    fs::rename(&tmp_path, &path).map_err(|e| format!("Rename failed: {}", e))?;

    Ok(())
}

fn read_save(slot: u8) -> Result<SaveFile, String> {
    let path = slot_path(slot);
    if !path.exists() {
        return Err(format!("Save slot {} does not exist", slot));
    }
    let json = fs::read_to_string(&path)
        .map_err(|e| format!("Read failed for {}: {}", path.display(), e))?;
    let file: SaveFile =
        serde_json::from_str(&json).map_err(|e| format!("Deserialization failed: {}", e))?;

    // Version check — future versions can add migration here
    if file.version != SAVE_VERSION {
        warn!(
            "Save slot {} has version {} but current version is {}. Attempting to load anyway.",
            slot, file.version, SAVE_VERSION
        );
    }

    Ok(file)
}

fn peek_save(slot: u8) -> Option<SaveSlotInfo> {
    match read_save(slot) {
        Ok(file) => Some(file.to_save_slot_info()),
        Err(_) => Some(SaveSlotInfo {
            slot,
            exists: false,
            ..Default::default()
        }),
    }
}

// ═══════════════════════════════════════════════════════════════════════
// SYSTEMS
// ═══════════════════════════════════════════════════════════════════════

fn scan_save_slots(mut cache: ResMut<SaveSlotInfoCache>) {
    cache.slots.clear();
    for slot in 0..NUM_SAVE_SLOTS as u8 {
        let info = peek_save(slot).unwrap_or(SaveSlotInfo {
            slot,
            exists: false,
            ..Default::default()
        });
        cache.slots.push(info);
    }
    info!("Save slot scan complete. Found {} slots.", NUM_SAVE_SLOTS);
}

fn tick_session_timer(
    time: Res<Time>,
    mut session: ResMut<SessionTimer>,
    mut stats: ResMut<PlayStats>,
) {
    session.elapsed += time.delta();
    // Accumulate into statistics every second to keep stats reasonable
    let elapsed_secs = session.elapsed.as_secs();
    if elapsed_secs > 0 {
        stats.play_time_seconds = stats.play_time_seconds.saturating_add(elapsed_secs);
        session.elapsed -= Duration::from_secs(elapsed_secs);
    }
}

fn handle_save_request(
    mut save_events: EventReader<SaveRequestEvent>,
    mut complete_events: EventWriter<SaveCompleteEvent>,
    mut cache: ResMut<SaveSlotInfoCache>,
    mut active_slot: ResMut<ActiveSaveSlot>,
    profile: Res<HunterProfile>,
    state: PersistedState,
) {
    for ev in save_events.read() {
        let slot = ev.slot;
        active_slot.slot = slot;

        info!("Saving to slot {}...", slot);

        match write_save(slot, &profile, &state) {
            Ok(()) => {
                info!("Save to slot {} succeeded.", slot);
                // Refresh the slot info in the cache
                if let Some(info) = peek_save(slot) {
                    if let Some(cached) = cache.slots.get_mut(slot as usize) {
                        *cached = info;
                    }
                }
                complete_events.send(SaveCompleteEvent {
                    slot,
                    success: true,
                    error_message: None,
                });
            }
            Err(e) => {
                // In-memory state is untouched; the next autosave retries.
                warn!("Save to slot {} FAILED: {}", slot, e);
                complete_events.send(SaveCompleteEvent {
                    slot,
                    success: false,
                    error_message: Some(e),
                });
            }
        }
    }
}

fn handle_load_request(
    mut load_events: EventReader<LoadRequestEvent>,
    mut complete_events: EventWriter<LoadCompleteEvent>,
    mut active_slot: ResMut<ActiveSaveSlot>,
    mut profile: ResMut<HunterProfile>,
    mut state: PersistedState,
    mut boss_session: ResMut<WorldBossSession>,
    mut select_writer: EventWriter<SelectStageEvent>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    for ev in load_events.read() {
        let slot = ev.slot;
        info!("Loading from slot {}...", slot);

        match read_save(slot) {
            Ok(file) => {
                active_slot.slot = slot;

                profile.name = file.hunter_name;
                *state.wallet = file.wallet;
                *state.weapon = file.weapon;
                *state.stat_levels = file.stat_levels;
                *state.artifacts = file.artifacts;
                *state.pets = file.pets;
                *state.skins = file.skins;
                *state.mushroom_dex = file.mushroom_dex;
                *state.claimed_rewards = file.claimed_rewards;
                *state.stage_progress = file.stage_progress;
                *state.world_boss = file.world_boss;
                *state.play_stats = file.play_stats;

                // Session state is never persisted: drop any boss battle and
                // re-roll the field for the loaded stage.
                *boss_session = WorldBossSession::default();
                let current = state.stage_progress.current;
                select_writer.send(SelectStageEvent {
                    chapter: current.chapter,
                    stage: current.stage,
                });
                next_state.set(GameState::Playing);

                info!("Load from slot {} succeeded.", slot);
                complete_events.send(LoadCompleteEvent {
                    slot,
                    success: true,
                    error_message: None,
                });
            }
            Err(e) => {
                warn!("Load from slot {} FAILED: {}", slot, e);
                complete_events.send(LoadCompleteEvent {
                    slot,
                    success: false,
                    error_message: Some(e),
                });
            }
        }
    }
}

fn handle_new_game(
    mut new_game_events: EventReader<NewGameEvent>,
    mut active_slot: ResMut<ActiveSaveSlot>,
    mut profile: ResMut<HunterProfile>,
    mut state: PersistedState,
    mut boss_session: ResMut<WorldBossSession>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    for ev in new_game_events.read() {
        info!(
            "Starting new game in slot {} as '{}'",
            ev.active_slot, ev.hunter_name
        );

        active_slot.slot = ev.active_slot;
        profile.name = ev.hunter_name.clone();

        // Reset all persisted resources to their new-account defaults.
        *state.wallet = Wallet::default();
        *state.weapon = WeaponState::default();
        *state.stat_levels = StatLevels::default();
        *state.artifacts = ArtifactCollection::default();
        *state.pets = PetCollection::default();
        *state.skins = SkinCollection::default();
        *state.mushroom_dex = MushroomDex::default();
        *state.claimed_rewards = ClaimedRewards::default();
        *state.stage_progress = StageProgress::default();
        *state.world_boss = WorldBossState::default();
        *state.play_stats = PlayStats::default();
        *boss_session = WorldBossSession::default();

        next_state.set(GameState::Playing);
        info!("New game initialized.");
    }
}

/// Stage clears are the natural checkpoint moments.
fn autosave_on_stage_clear(
    mut cleared_events: EventReader<StageClearedEvent>,
    mut save_writer: EventWriter<SaveRequestEvent>,
    active_slot: Res<ActiveSaveSlot>,
) {
    for ev in cleared_events.read() {
        info!(
            "Autosaving after clearing stage {}-{}",
            ev.coord.chapter, ev.coord.stage
        );
        save_writer.send(SaveRequestEvent {
            slot: active_slot.slot,
        });
    }
}

/// Periodic autosave between stage clears.
fn autosave_periodic(
    time: Res<Time>,
    mut autosave: ResMut<AutosaveTimer>,
    mut save_writer: EventWriter<SaveRequestEvent>,
    active_slot: Res<ActiveSaveSlot>,
) {
    autosave.timer.tick(time.delta());
    if autosave.timer.just_finished() {
        save_writer.send(SaveRequestEvent {
            slot: active_slot.slot,
        });
    }
}
