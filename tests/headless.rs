//! Headless integration tests for Shroomvale.
//!
//! These tests exercise the game's ECS logic without a window or GPU.
//! They use Bevy's `MinimalPlugins` to tick the app, register only the
//! pure-logic systems (skipping any client shell), and verify that the
//! core game loops work correctly.
//!
//! Run with: `cargo test --test headless`

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;

use shroomvale::combat::auto_attack::AttackTimer;
use shroomvale::data::DataPlugin;
use shroomvale::economy::enhance::{handle_enhance, handle_evolve};
use shroomvale::economy::gacha::{clear_gacha_results, handle_gacha_pull, handle_upgrade_artifact};
use shroomvale::economy::merge::handle_merge_all_pets;
use shroomvale::economy::rewards::{
    handle_claim_all, handle_claim_mushroom, weapon_claim_diamond,
};
use shroomvale::economy::stat_upgrade::handle_stat_upgrade;
use shroomvale::economy::wallet::apply_currency_changes;
use shroomvale::save::SavePlugin;
use shroomvale::shared::*;
use shroomvale::stage::lifecycle::{
    award_kill_rewards, handle_select_stage, tick_stage_timers, track_stage_kills, ActiveSpawnSite,
};
use shroomvale::stage::world_boss::{handle_start_world_boss, tick_world_boss};

// ─────────────────────────────────────────────────────────────────────────────
// Test App Builder
// ─────────────────────────────────────────────────────────────────────────────

/// Builds a minimal Bevy app with all shared resources and events registered
/// but NO rendering, windowing, or asset loading. Systems must be added
/// per-test depending on what's being exercised. The RNG is seeded so every
/// probability roll is reproducible.
fn build_test_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(StatesPlugin);

    // ── Game State ───────────────────────────────────────────────────────
    app.init_state::<GameState>();

    // ── Shared Resources (mirrors main.rs) ───────────────────────────────
    app.init_resource::<Wallet>()
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
        .init_resource::<PlayStats>()
        .init_resource::<GachaResults>()
        .init_resource::<AttackTimer>()
        .init_resource::<ActiveSpawnSite>()
        .init_resource::<WeaponRegistry>()
        .init_resource::<PetRegistry>()
        .init_resource::<MushroomRegistry>();
    app.insert_resource(HuntRng::seeded(0xC0FFEE));

    // ── Shared Events (mirrors main.rs) ──────────────────────────────────
    app.add_event::<EnhanceWeaponEvent>()
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
        .add_event::<ToastEvent>();

    app
}

/// Adds the DataPlugin and runs the Loading → MainMenu boot so registries
/// are populated.
fn boot_registries(app: &mut App) {
    app.add_plugins(DataPlugin);
    app.update(); // OnEnter(Loading) populates registries
    app.update(); // applies the NextState transition
}

fn wallet(app: &App) -> &Wallet {
    app.world().resource::<Wallet>()
}

fn set_gold(app: &mut App, gold: f64) {
    app.world_mut().resource_mut::<Wallet>().gold = gold;
}

fn set_diamond(app: &mut App, diamond: u64) {
    app.world_mut().resource_mut::<Wallet>().diamond = diamond;
}

// ─────────────────────────────────────────────────────────────────────────────
// Boot smoke
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_headless_boot_populates_registries() {
    let mut app = build_test_app();
    boot_registries(&mut app);

    let state = app.world().resource::<State<GameState>>();
    assert_eq!(
        state.get(),
        &GameState::MainMenu,
        "Expected to reach MainMenu after loading data"
    );

    assert_eq!(app.world().resource::<WeaponRegistry>().tiers.len(), 31);
    assert!(!app.world().resource::<PetRegistry>().species.is_empty());
    assert!(!app.world().resource::<MushroomRegistry>().species.is_empty());
}

// ─────────────────────────────────────────────────────────────────────────────
// Stat upgrades
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_stat_upgrade_deducts_quoted_cost() {
    let mut app = build_test_app();
    app.add_systems(Update, handle_stat_upgrade);

    set_gold(&mut app, 10_000.0);
    app.world_mut().send_event(StatUpgradeEvent {
        key: StatKey::CritChance(CritTier::Basic),
        count: 3,
    });
    app.update();

    // 1000 + 2000 + 3000 = 6000 gold for the first three levels.
    assert_eq!(wallet(&app).gold, 4_000.0);
    assert_eq!(
        app.world().resource::<StatLevels>().crit_chance[0],
        3,
        "Three levels should have been granted"
    );
}

#[test]
fn test_stat_upgrade_insufficient_gold_is_a_noop() {
    let mut app = build_test_app();
    app.add_systems(Update, handle_stat_upgrade);

    set_gold(&mut app, 5_999.0);
    app.world_mut().send_event(StatUpgradeEvent {
        key: StatKey::CritChance(CritTier::Basic),
        count: 3,
    });
    app.update();

    assert_eq!(wallet(&app).gold, 5_999.0, "Gold must be untouched");
    assert_eq!(app.world().resource::<StatLevels>().crit_chance[0], 0);
}

#[test]
fn test_locked_tier_refuses_upgrades_regardless_of_gold() {
    let mut app = build_test_app();
    app.add_systems(Update, handle_stat_upgrade);

    set_gold(&mut app, 1_000_000_000.0);
    app.world_mut().send_event(StatUpgradeEvent {
        key: StatKey::CritChance(CritTier::Hyper),
        count: 1,
    });
    app.update();

    assert_eq!(wallet(&app).gold, 1_000_000_000.0);
    assert_eq!(
        app.world().resource::<StatLevels>().crit_chance[CritTier::Hyper.index()],
        0,
        "Hyper tier is gated behind basic chance at cap"
    );

    // Cap the prerequisite and the same request goes through.
    app.world_mut().resource_mut::<StatLevels>().crit_chance[CritTier::Basic.index()] = 1_000;
    app.world_mut().send_event(StatUpgradeEvent {
        key: StatKey::CritChance(CritTier::Hyper),
        count: 1,
    });
    app.update();
    assert_eq!(
        app.world().resource::<StatLevels>().crit_chance[CritTier::Hyper.index()],
        1
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Weapon enhance / evolve
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_enhance_at_level_zero_always_succeeds_for_minimum_cost() {
    let mut app = build_test_app();
    boot_registries(&mut app);
    app.add_systems(Update, handle_enhance);

    set_gold(&mut app, 1_000.0);
    app.world_mut().send_event(EnhanceWeaponEvent);
    app.update();

    // Tier 0 base cost is 10,000 → max(100, 10000×1^1.5×0.01) = 100 gold,
    // and the level-0 success rate is 100%.
    assert_eq!(wallet(&app).gold, 900.0);
    let weapon = app.world().resource::<WeaponState>();
    assert_eq!(weapon.level, 1, "Level-0 enhance cannot fail");
    assert_eq!(app.world().resource::<PlayStats>().enhance_attempts, 1);
}

#[test]
fn test_enhance_refused_at_level_cap() {
    let mut app = build_test_app();
    boot_registries(&mut app);
    app.add_systems(Update, handle_enhance);

    app.world_mut().resource_mut::<WeaponState>().level = WEAPON_MAX_ENHANCE_LEVEL;
    set_gold(&mut app, 1_000_000.0);
    app.world_mut().send_event(EnhanceWeaponEvent);
    app.update();

    assert_eq!(wallet(&app).gold, 1_000_000.0, "No gold spent on a refused enhance");
    assert_eq!(
        app.world().resource::<WeaponState>().level,
        WEAPON_MAX_ENHANCE_LEVEL
    );
}

#[test]
fn test_evolve_at_tier_zero_always_succeeds() {
    let mut app = build_test_app();
    boot_registries(&mut app);
    app.add_systems(Update, handle_evolve);

    app.world_mut().resource_mut::<WeaponState>().level = WEAPON_MAX_ENHANCE_LEVEL;
    set_gold(&mut app, 10_000.0);
    app.world_mut().send_event(EvolveWeaponEvent);
    app.update();

    let weapon = app.world().resource::<WeaponState>();
    assert_eq!(weapon.tier, 1, "Tier-0 evolve succeeds at 100%");
    assert_eq!(weapon.level, 0, "Evolve resets the enhance level");
    assert!(weapon.obtained.contains(&1), "New tier lands in the dex");
    // Tier 1 price is 1000 × 2.5 = 2500.
    assert_eq!(wallet(&app).gold, 7_500.0);
}

#[test]
fn test_evolve_refused_below_max_enhance() {
    let mut app = build_test_app();
    boot_registries(&mut app);
    app.add_systems(Update, handle_evolve);

    app.world_mut().resource_mut::<WeaponState>().level = 9;
    set_gold(&mut app, 10_000.0);
    app.world_mut().send_event(EvolveWeaponEvent);
    app.update();

    let weapon = app.world().resource::<WeaponState>();
    assert_eq!(weapon.tier, 0);
    assert_eq!(wallet(&app).gold, 10_000.0);
}

// ─────────────────────────────────────────────────────────────────────────────
// Gacha & merges
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_pet_gacha_costs_and_fills_results_buffer() {
    let mut app = build_test_app();
    boot_registries(&mut app);
    app.add_systems(Update, (handle_gacha_pull, clear_gacha_results));

    set_diamond(&mut app, 1_000);
    app.world_mut().send_event(GachaPullEvent {
        kind: GachaKind::Pet,
        count: 5,
    });
    app.update();

    assert_eq!(wallet(&app).diamond, 500, "5 pet pulls at 100 diamond each");
    assert_eq!(app.world().resource::<GachaResults>().entries.len(), 5);
    let pets = app.world().resource::<PetCollection>();
    let held: u32 = pets.stacks.iter().map(|s| s.count).sum();
    assert_eq!(held, 5);
    assert!(!pets.ever_owned.is_empty(), "Pulls must populate the pet dex");

    app.world_mut().send_event(ClearGachaResultsEvent);
    app.update();
    assert!(app.world().resource::<GachaResults>().entries.is_empty());
}

#[test]
fn test_gacha_insufficient_diamond_is_a_noop() {
    let mut app = build_test_app();
    boot_registries(&mut app);
    app.add_systems(Update, handle_gacha_pull);

    set_diamond(&mut app, 99);
    app.world_mut().send_event(GachaPullEvent {
        kind: GachaKind::Pet,
        count: 1,
    });
    app.update();

    assert_eq!(wallet(&app).diamond, 99);
    assert!(app.world().resource::<GachaResults>().entries.is_empty());
}

#[test]
fn test_merge_all_event_collapses_twenty_three_commons() {
    let mut app = build_test_app();
    app.add_systems(Update, handle_merge_all_pets);

    let common = PetId {
        species: "moss_dragon".to_string(),
        rarity: PetRarity::Common,
    };
    let rare = PetId {
        species: "moss_dragon".to_string(),
        rarity: PetRarity::Rare,
    };
    app.world_mut()
        .resource_mut::<PetCollection>()
        .add(common.clone(), 23);

    app.world_mut().send_event(MergeAllPetsEvent);
    app.update();

    let pets = app.world().resource::<PetCollection>();
    assert_eq!(pets.count(&common), 3, "23 = 4×5 + 3 leftover commons");
    assert_eq!(pets.count(&rare), 4);
}

#[test]
fn test_artifact_upgrade_consumes_copies() {
    let mut app = build_test_app();
    app.add_systems(Update, handle_upgrade_artifact);

    app.world_mut()
        .resource_mut::<ArtifactCollection>()
        .entry_mut(ArtifactKind::SporeBlade)
        .count = 2;

    app.world_mut().send_event(UpgradeArtifactEvent {
        kind: ArtifactKind::SporeBlade,
    });
    app.update();

    let artifacts = app.world().resource::<ArtifactCollection>();
    let entry = artifacts.entry(ArtifactKind::SporeBlade).unwrap();
    assert_eq!(entry.level, 1);
    assert_eq!(entry.count, 1);

    // No copies → no-op.
    app.world_mut()
        .resource_mut::<ArtifactCollection>()
        .entry_mut(ArtifactKind::SporeBlade)
        .count = 0;
    app.world_mut().send_event(UpgradeArtifactEvent {
        kind: ArtifactKind::SporeBlade,
    });
    app.update();
    let artifacts = app.world().resource::<ArtifactCollection>();
    assert_eq!(artifacts.entry(ArtifactKind::SporeBlade).unwrap().level, 1);
}

// ─────────────────────────────────────────────────────────────────────────────
// Claims
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_mushroom_claim_requires_dex_flag_and_pays_once() {
    let mut app = build_test_app();
    app.add_systems(Update, handle_claim_mushroom);

    // Claim before the dex flag exists: unchanged state.
    app.world_mut().send_event(ClaimMushroomRewardEvent {
        species: "enoki".to_string(),
        rarity: MushroomRarity::Rare,
    });
    app.update();
    assert_eq!(wallet(&app).diamond, 0);

    // Kill recorded → the same claim pays exactly once.
    app.world_mut()
        .resource_mut::<MushroomDex>()
        .record("enoki", MushroomRarity::Rare);
    app.world_mut().send_event(ClaimMushroomRewardEvent {
        species: "enoki".to_string(),
        rarity: MushroomRarity::Rare,
    });
    app.update();
    assert_eq!(wallet(&app).diamond, 50, "Rare mushroom claim pays 50 diamond");

    // Second claim is a silent no-op.
    app.world_mut().send_event(ClaimMushroomRewardEvent {
        species: "enoki".to_string(),
        rarity: MushroomRarity::Rare,
    });
    app.update();
    assert_eq!(wallet(&app).diamond, 50);
}

#[test]
fn test_claim_all_covers_weapons_mushrooms_and_pets() {
    let mut app = build_test_app();
    app.add_systems(Update, handle_claim_all);

    // Weapon dex: tiers 0 and 1 obtained.
    app.world_mut()
        .resource_mut::<WeaponState>()
        .obtained
        .insert(1);
    // Mushroom dex: one normal entry.
    app.world_mut()
        .resource_mut::<MushroomDex>()
        .record("enoki", MushroomRarity::Normal);
    // Pet dex: one rare pet ever owned.
    let pet = PetId {
        species: "dew_fairy".to_string(),
        rarity: PetRarity::Rare,
    };
    app.world_mut()
        .resource_mut::<PetCollection>()
        .add(pet.clone(), 1);

    app.world_mut().send_event(ClaimAllRewardsEvent);
    app.update();

    let expected = weapon_claim_diamond(0)
        + weapon_claim_diamond(1)
        + MushroomRarity::Normal.claim_diamond()
        + PetRarity::Rare.claim_diamond();
    assert_eq!(wallet(&app).diamond, expected);

    // Claim-all again: everything already paid.
    app.world_mut().send_event(ClaimAllRewardsEvent);
    app.update();
    assert_eq!(wallet(&app).diamond, expected);
}

// ─────────────────────────────────────────────────────────────────────────────
// Stage tracking
// ─────────────────────────────────────────────────────────────────────────────

fn field_instance(id: u64, reward_gold: f64) -> MushroomInstance {
    MushroomInstance {
        id,
        species: "enoki".to_string(),
        rarity: MushroomRarity::Normal,
        x: 0.0,
        y: 0.0,
        hp: 0.0,
        max_hp: 100.0,
        reward_gold,
        reward_diamond: 0,
        is_boss: false,
        dead: true,
        respawn_timer: None,
    }
}

#[test]
fn test_kill_awards_gold_and_records_dex() {
    let mut app = build_test_app();
    boot_registries(&mut app);
    app.add_systems(
        Update,
        (award_kill_rewards, track_stage_kills, apply_currency_changes),
    );

    app.world_mut().send_event(MushroomKilledEvent {
        instance_id: 1,
        species: "enoki".to_string(),
        rarity: MushroomRarity::Normal,
        reward_gold: 100.0,
        reward_diamond: 0,
        was_boss: false,
    });
    app.update();
    app.update(); // currency event lands on the next frame

    assert_eq!(wallet(&app).gold, 100.0);
    assert!(app
        .world()
        .resource::<MushroomDex>()
        .has_seen("enoki", MushroomRarity::Normal));
    assert_eq!(app.world().resource::<StageSession>().kills, 1);
    assert_eq!(app.world().resource::<PlayStats>().total_kills, 1);
}

#[test]
fn test_hundredth_kill_completes_a_normal_stage() {
    let mut app = build_test_app();
    boot_registries(&mut app);
    app.add_systems(Update, (track_stage_kills, apply_currency_changes));

    app.world_mut().resource_mut::<StageSession>().kills = STAGE_KILL_TARGET - 1;
    app.world_mut().send_event(MushroomKilledEvent {
        instance_id: 7,
        species: "enoki".to_string(),
        rarity: MushroomRarity::Normal,
        reward_gold: 10.0,
        reward_diamond: 0,
        was_boss: false,
    });
    app.update();
    app.update();

    let progress = app.world().resource::<StageProgress>();
    assert_eq!(progress.current, StageCoord { chapter: 1, stage: 2 });
    assert_eq!(progress.max_reached, StageCoord { chapter: 1, stage: 2 });
    assert_eq!(
        app.world().resource::<StageSession>().kills,
        0,
        "Kill count restarts on the next stage"
    );
    assert_eq!(
        app.world().resource::<MushroomField>().instances.len(),
        MUSHROOMS_PER_STAGE,
        "A fresh field spawns for the next stage"
    );
    assert_eq!(
        wallet(&app).diamond,
        STAGE_CLEAR_DIAMOND,
        "Normal stage clear pays 10 diamond"
    );
}

#[test]
fn test_boss_stage_summons_boss_instead_of_advancing() {
    let mut app = build_test_app();
    boot_registries(&mut app);
    app.add_systems(Update, track_stage_kills);

    {
        let mut progress = app.world_mut().resource_mut::<StageProgress>();
        progress.current = StageCoord {
            chapter: 1,
            stage: 10,
        };
        progress.max_reached = StageCoord {
            chapter: 1,
            stage: 10,
        };
    }
    app.world_mut().resource_mut::<StageSession>().kills = STAGE_KILL_TARGET - 1;

    app.world_mut().send_event(MushroomKilledEvent {
        instance_id: 3,
        species: "enoki".to_string(),
        rarity: MushroomRarity::Normal,
        reward_gold: 10.0,
        reward_diamond: 0,
        was_boss: false,
    });
    app.update();

    let session = app.world().resource::<StageSession>();
    assert!(session.boss_phase, "Stage 10 enters the boss phase at 100 kills");
    assert!(session.boss_countdown.is_some());
    let progress = app.world().resource::<StageProgress>();
    assert_eq!(
        progress.current,
        StageCoord {
            chapter: 1,
            stage: 10
        },
        "No advance until the boss dies"
    );
    assert!(
        app.world()
            .resource::<MushroomField>()
            .instances
            .iter()
            .any(|m| m.is_boss),
        "A boss instance joins the field"
    );
}

#[test]
fn test_boss_timer_expiry_restarts_the_stage() {
    let mut app = build_test_app();
    boot_registries(&mut app);
    app.add_systems(Update, tick_stage_timers);

    {
        let mut session = app.world_mut().resource_mut::<StageSession>();
        session.kills = STAGE_KILL_TARGET;
        session.boss_phase = true;
        session.boss_countdown = Some(Timer::from_seconds(0.0, TimerMode::Once));
    }
    app.update();

    let session = app.world().resource::<StageSession>();
    assert!(!session.boss_phase, "Expiry drops the boss phase");
    assert_eq!(session.kills, 0, "The stage restarts from scratch");
    assert!(session.boss_countdown.is_none());
    assert_eq!(
        app.world().resource::<MushroomField>().instances.len(),
        MUSHROOMS_PER_STAGE,
        "Restart rolls a fresh field"
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// World boss
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_world_boss_attempts_gate_and_daily_reset() {
    let mut app = build_test_app();
    app.add_systems(Update, handle_start_world_boss);
    app.world_mut().resource_mut::<WallClock>().today = "2026-08-07".to_string();

    for expected_left in [2, 1, 0] {
        app.world_mut().send_event(StartWorldBossEvent);
        app.update();
        assert_eq!(
            app.world().resource::<WorldBossState>().attempts_remaining,
            expected_left
        );
        // Stand the session down so the next start isn't refused for
        // already battling.
        app.world_mut().resource_mut::<WorldBossSession>().battling = false;
    }

    // Fourth attempt on the same day is refused.
    app.world_mut().send_event(StartWorldBossEvent);
    app.update();
    assert!(!app.world().resource::<WorldBossSession>().battling);

    // Local-date rollover refills the three attempts.
    app.world_mut().resource_mut::<WallClock>().today = "2026-08-08".to_string();
    app.world_mut().send_event(StartWorldBossEvent);
    app.update();
    assert!(app.world().resource::<WorldBossSession>().battling);
    assert_eq!(
        app.world().resource::<WorldBossState>().attempts_remaining,
        WORLD_BOSS_DAILY_ATTEMPTS - 1
    );
}

#[test]
fn test_world_boss_session_converts_damage_to_gold() {
    let mut app = build_test_app();
    app.add_systems(Update, (tick_world_boss, apply_currency_changes));

    {
        let mut session = app.world_mut().resource_mut::<WorldBossSession>();
        session.battling = true;
        session.session_damage = 123_456.0;
        session.countdown = Some(Timer::from_seconds(0.0, TimerMode::Once));
    }
    app.update();
    app.update();

    // 123,456 damage at 1 gold per 10,000 → 12 gold.
    assert_eq!(wallet(&app).gold, 12.0);
    assert!(!app.world().resource::<WorldBossSession>().battling);
    assert_eq!(
        app.world().resource::<WorldBossState>().best_damage,
        123_456.0,
        "Best-ever damage feeds the leaderboard snapshot"
    );
}

#[test]
fn test_leaderboard_snapshot_reads_current_state() {
    let progress = StageProgress {
        current: StageCoord { chapter: 3, stage: 4 },
        max_reached: StageCoord { chapter: 5, stage: 6 },
    };
    let mut weapon = WeaponState::default();
    weapon.tier = 12;
    let world_boss = WorldBossState {
        best_damage: 9_999_999.0,
        ..Default::default()
    };

    let entry = LeaderboardEntry::from_state("Morel", &progress, &weapon, &world_boss);
    assert_eq!(entry.hunter_name, "Morel");
    assert_eq!(entry.max_stage, StageCoord { chapter: 5, stage: 6 });
    assert_eq!(entry.weapon_tier, 12);
    assert_eq!(entry.world_boss_best, 9_999_999.0);

    // The snapshot is what gets shipped to the external leaderboard, so it
    // must serialize cleanly.
    let json = serde_json::to_string(&entry).unwrap();
    let back: LeaderboardEntry = serde_json::from_str(&json).unwrap();
    assert_eq!(back.max_stage, entry.max_stage);
}

// ─────────────────────────────────────────────────────────────────────────────
// Persistence boundary
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_save_load_roundtrip_excludes_session_state() {
    let mut app = build_test_app();
    app.add_plugins(SavePlugin);
    // The production load path re-rolls the field through stage selection.
    app.add_systems(Update, handle_select_stage);
    boot_registries(&mut app);
    app.world_mut()
        .resource_mut::<NextState<GameState>>()
        .set(GameState::Playing);
    app.update();

    // Durable progress…
    set_gold(&mut app, 4_321.0);
    set_diamond(&mut app, 77);
    app.world_mut().resource_mut::<WeaponState>().tier = 3;
    app.world_mut().resource_mut::<StatLevels>().attack_power = 42;
    // …and some session-only state that must NOT survive.
    app.world_mut()
        .resource_mut::<MushroomField>()
        .instances
        .push(field_instance(99, 10.0));
    app.world_mut().resource_mut::<StageSession>().kills = 55;

    app.world_mut().send_event(shroomvale::save::SaveRequestEvent { slot: 2 });
    app.update();

    // Wipe in-memory state, then load the slot back.
    set_gold(&mut app, 0.0);
    set_diamond(&mut app, 0);
    app.world_mut().resource_mut::<WeaponState>().tier = 0;
    app.world_mut().resource_mut::<StatLevels>().attack_power = 0;

    app.world_mut().send_event(shroomvale::save::LoadRequestEvent { slot: 2 });
    app.update();
    app.update(); // stage re-selection lands on the following frame

    assert_eq!(wallet(&app).gold, 4_321.0);
    assert_eq!(wallet(&app).diamond, 77);
    assert_eq!(app.world().resource::<WeaponState>().tier, 3);
    assert_eq!(app.world().resource::<StatLevels>().attack_power, 42);

    // Session state was not persisted: the kill counter restarted and the
    // field is a fresh 100-instance roll, not the saved-session leftovers.
    assert_eq!(app.world().resource::<StageSession>().kills, 0);
    assert_eq!(
        app.world().resource::<MushroomField>().instances.len(),
        MUSHROOMS_PER_STAGE
    );
}
