//! Shared resources, events, and states for Shroomvale.
//!
//! This is the type contract. Every domain plugin imports from here.
//! No domain imports from any other domain directly.

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

// ═══════════════════════════════════════════════════════════════════════
// GAME STATE — top-level state machine
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, States, Default)]
pub enum GameState {
    #[default]
    Loading,
    MainMenu,
    Playing,
    Paused,
}

// ═══════════════════════════════════════════════════════════════════════
// CURRENCY
// ═══════════════════════════════════════════════════════════════════════

/// Player currency balances.
///
/// Gold is an integer-valued f64: late-game costs and kill rewards grow far
/// past u64 range, so gold follows the damage numbers into floating point.
/// Every mutation floors, so the value never carries a fractional part.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct Wallet {
    pub gold: f64,
    pub diamond: u64,
}

impl Default for Wallet {
    fn default() -> Self {
        Self {
            gold: 0.0,
            diamond: 0,
        }
    }
}

impl Wallet {
    pub fn add_gold(&mut self, amount: f64) {
        if amount > 0.0 {
            self.gold = (self.gold + amount).floor();
        }
    }

    /// Deducts `cost` gold if affordable. Returns false (and leaves the
    /// balance untouched) otherwise.
    pub fn try_spend_gold(&mut self, cost: f64) -> bool {
        if cost < 0.0 || !cost.is_finite() {
            return false;
        }
        if self.gold >= cost {
            self.gold = (self.gold - cost).floor();
            true
        } else {
            false
        }
    }

    pub fn add_diamond(&mut self, amount: u64) {
        self.diamond = self.diamond.saturating_add(amount);
    }

    pub fn try_spend_diamond(&mut self, cost: u64) -> bool {
        if self.diamond >= cost {
            self.diamond -= cost;
            true
        } else {
            false
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// CRITICAL TIERS & STAT TRACKS
// ═══════════════════════════════════════════════════════════════════════

pub const CRIT_TIER_COUNT: usize = 16;

/// The sixteen escalating critical tiers. Each tier has its own chance and
/// damage track, and a tier's tracks unlock only once the previous tier's
/// chance track is maxed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CritTier {
    Basic,
    Hyper,
    Mega,
    Giga,
    Tera,
    Peta,
    Exa,
    Zetta,
    Yotta,
    Ronna,
    Quetta,
    Xeno,
    Ultima,
    Omni,
    Absolute,
    Infinity,
}

impl CritTier {
    pub const ALL: [CritTier; CRIT_TIER_COUNT] = [
        CritTier::Basic,
        CritTier::Hyper,
        CritTier::Mega,
        CritTier::Giga,
        CritTier::Tera,
        CritTier::Peta,
        CritTier::Exa,
        CritTier::Zetta,
        CritTier::Yotta,
        CritTier::Ronna,
        CritTier::Quetta,
        CritTier::Xeno,
        CritTier::Ultima,
        CritTier::Omni,
        CritTier::Absolute,
        CritTier::Infinity,
    ];

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    pub fn prev(self) -> Option<CritTier> {
        let i = self.index();
        if i == 0 {
            None
        } else {
            Some(Self::ALL[i - 1])
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CritTier::Basic => "basic",
            CritTier::Hyper => "hyper",
            CritTier::Mega => "mega",
            CritTier::Giga => "giga",
            CritTier::Tera => "tera",
            CritTier::Peta => "peta",
            CritTier::Exa => "exa",
            CritTier::Zetta => "zetta",
            CritTier::Yotta => "yotta",
            CritTier::Ronna => "ronna",
            CritTier::Quetta => "quetta",
            CritTier::Xeno => "xeno",
            CritTier::Ultima => "ultima",
            CritTier::Omni => "omni",
            CritTier::Absolute => "absolute",
            CritTier::Infinity => "infinity",
        }
    }

    /// Starting critical-damage percent for this tier, before any track
    /// levels are added on top.
    pub fn base_damage_percent(self) -> f64 {
        150.0 + 50.0 * self.index() as f64
    }
}

/// Shape of a stat track's per-level cost curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CostCurve {
    /// `base × (level + 1)`
    Linear,
    /// `base × (level + 1)^3`
    Cubic,
    /// `base × (level + 1)^e` with e stepping 1.1 → 1.15 → 1.2 as the
    /// level crosses 100 and 200. Used by the weapon-panel damage tracks.
    Staged,
}

/// Identifier for one upgradeable progression track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatKey {
    CritChance(CritTier),
    CritDamage(CritTier),
    AttackPower,
    GoldGain,
    MoveSpeed,
    AttackRange,
}

impl StatKey {
    pub fn base_cost(self) -> f64 {
        match self {
            StatKey::CritChance(_) => 1_000.0,
            StatKey::CritDamage(_) => 500.0,
            StatKey::AttackPower => 50.0,
            StatKey::GoldGain => 80.0,
            StatKey::MoveSpeed => 200.0,
            StatKey::AttackRange => 200.0,
        }
    }

    pub fn max_level(self) -> u32 {
        match self {
            StatKey::CritChance(_) => 1_000,
            StatKey::CritDamage(_) => 100_000,
            StatKey::AttackPower | StatKey::GoldGain => 100_000,
            StatKey::MoveSpeed | StatKey::AttackRange => 300,
        }
    }

    pub fn curve(self) -> CostCurve {
        match self {
            StatKey::CritChance(_) => CostCurve::Linear,
            StatKey::CritDamage(_) => CostCurve::Cubic,
            StatKey::AttackPower | StatKey::GoldGain => CostCurve::Staged,
            StatKey::MoveSpeed | StatKey::AttackRange => CostCurve::Linear,
        }
    }

    /// The track that must be maxed before this one accepts upgrades.
    /// Tier 1 tracks and the flat player tracks have no prerequisite.
    pub fn gate(self) -> Option<StatKey> {
        match self {
            StatKey::CritChance(tier) | StatKey::CritDamage(tier) => {
                tier.prev().map(StatKey::CritChance)
            }
            _ => None,
        }
    }

    pub fn name(self) -> String {
        match self {
            StatKey::CritChance(t) => format!("{} crit chance", t.name()),
            StatKey::CritDamage(t) => format!("{} crit damage", t.name()),
            StatKey::AttackPower => "attack power".to_string(),
            StatKey::GoldGain => "gold gain".to_string(),
            StatKey::MoveSpeed => "move speed".to_string(),
            StatKey::AttackRange => "attack range".to_string(),
        }
    }
}

/// Levels for every stat track. This is the single source of truth — all
/// display/derived values are recomputed from here on read, never stored.
#[derive(Resource, Debug, Clone, Serialize, Deserialize, Default)]
pub struct StatLevels {
    pub crit_chance: [u32; CRIT_TIER_COUNT],
    pub crit_damage: [u32; CRIT_TIER_COUNT],
    pub attack_power: u32,
    pub gold_gain: u32,
    pub move_speed: u32,
    pub attack_range: u32,
}

impl StatLevels {
    pub fn get(&self, key: StatKey) -> u32 {
        match key {
            StatKey::CritChance(t) => self.crit_chance[t.index()],
            StatKey::CritDamage(t) => self.crit_damage[t.index()],
            StatKey::AttackPower => self.attack_power,
            StatKey::GoldGain => self.gold_gain,
            StatKey::MoveSpeed => self.move_speed,
            StatKey::AttackRange => self.attack_range,
        }
    }

    pub fn add(&mut self, key: StatKey, levels: u32) {
        let slot = match key {
            StatKey::CritChance(t) => &mut self.crit_chance[t.index()],
            StatKey::CritDamage(t) => &mut self.crit_damage[t.index()],
            StatKey::AttackPower => &mut self.attack_power,
            StatKey::GoldGain => &mut self.gold_gain,
            StatKey::MoveSpeed => &mut self.move_speed,
            StatKey::AttackRange => &mut self.attack_range,
        };
        *slot = (*slot + levels).min(key.max_level());
    }

    /// Displayed chance percent for a crit tier: 0.1 percentage points per
    /// level, logically capped at 100.
    pub fn chance_percent(&self, tier: CritTier) -> f64 {
        (self.crit_chance[tier.index()] as f64 * 0.1).min(100.0)
    }

    /// Displayed damage percent for a crit tier: tier base plus one
    /// percentage point per level. No percent cap, only the level cap.
    pub fn damage_percent(&self, tier: CritTier) -> f64 {
        tier.base_damage_percent() + self.crit_damage[tier.index()] as f64
    }
}

// ═══════════════════════════════════════════════════════════════════════
// WEAPONS
// ═══════════════════════════════════════════════════════════════════════

/// Static definition of one weapon tier. Populated by the data layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeaponTierDef {
    pub index: usize,
    pub name: String,
    /// Fixed gold price charged by an evolve attempt into this tier.
    pub price: f64,
    pub base_damage: f64,
    pub damage_per_level: f64,
    /// Base term of the enhance cost formula for this tier.
    pub enhance_base_cost: f64,
}

impl WeaponTierDef {
    pub fn damage_at(&self, level: u32) -> f64 {
        self.base_damage + self.damage_per_level * level as f64
    }
}

#[derive(Resource, Debug, Clone, Default)]
pub struct WeaponRegistry {
    pub tiers: Vec<WeaponTierDef>,
}

impl WeaponRegistry {
    pub fn get(&self, index: usize) -> Option<&WeaponTierDef> {
        self.tiers.get(index)
    }
}

/// The player's weapon: current tier, enhance level, and the dex of tiers
/// ever obtained (feeds one-time collection rewards).
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct WeaponState {
    pub tier: usize,
    pub level: u32,
    pub obtained: HashSet<usize>,
}

impl Default for WeaponState {
    fn default() -> Self {
        let mut obtained = HashSet::new();
        obtained.insert(0);
        Self {
            tier: 0,
            level: 0,
            obtained,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// MUSHROOMS — rarity, species registry, collection dex
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MushroomRarity {
    Normal,
    Rare,
    Epic,
    Unique,
}

impl MushroomRarity {
    pub const ALL: [MushroomRarity; 4] = [
        MushroomRarity::Normal,
        MushroomRarity::Rare,
        MushroomRarity::Epic,
        MushroomRarity::Unique,
    ];

    pub fn hp_multiplier(self) -> f64 {
        match self {
            MushroomRarity::Normal => 1.0,
            MushroomRarity::Rare => 3.0,
            MushroomRarity::Epic => 10.0,
            MushroomRarity::Unique => 100.0,
        }
    }

    pub fn reward_multiplier(self) -> f64 {
        self.hp_multiplier()
    }

    /// One-time dex claim payout, in diamond.
    pub fn claim_diamond(self) -> u64 {
        match self {
            MushroomRarity::Normal => 10,
            MushroomRarity::Rare => 50,
            MushroomRarity::Epic => 100,
            MushroomRarity::Unique => 500,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MushroomRarity::Normal => "normal",
            MushroomRarity::Rare => "rare",
            MushroomRarity::Epic => "epic",
            MushroomRarity::Unique => "unique",
        }
    }
}

pub type SpeciesId = String;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MushroomSpeciesDef {
    pub id: SpeciesId,
    pub name: String,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct MushroomRegistry {
    pub species: Vec<MushroomSpeciesDef>,
}

impl MushroomRegistry {
    pub fn get(&self, id: &str) -> Option<&MushroomSpeciesDef> {
        self.species.iter().find(|s| s.id == id)
    }
}

/// One boolean per rarity. Used for both "seen in the wild" dex flags and
/// "reward already paid" claim flags.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RarityFlags {
    pub normal: bool,
    pub rare: bool,
    pub epic: bool,
    pub unique: bool,
}

impl RarityFlags {
    pub fn get(&self, rarity: MushroomRarity) -> bool {
        match rarity {
            MushroomRarity::Normal => self.normal,
            MushroomRarity::Rare => self.rare,
            MushroomRarity::Epic => self.epic,
            MushroomRarity::Unique => self.unique,
        }
    }

    pub fn set(&mut self, rarity: MushroomRarity) {
        match rarity {
            MushroomRarity::Normal => self.normal = true,
            MushroomRarity::Rare => self.rare = true,
            MushroomRarity::Epic => self.epic = true,
            MushroomRarity::Unique => self.unique = true,
        }
    }
}

/// Collection dex: which (species, rarity) pairs the player has ever killed.
/// Setting an already-set flag is a no-op; flags are never cleared.
#[derive(Resource, Debug, Clone, Default, Serialize, Deserialize)]
pub struct MushroomDex {
    pub seen: HashMap<SpeciesId, RarityFlags>,
}

impl MushroomDex {
    pub fn has_seen(&self, species: &str, rarity: MushroomRarity) -> bool {
        self.seen.get(species).map(|f| f.get(rarity)).unwrap_or(false)
    }

    pub fn record(&mut self, species: &str, rarity: MushroomRarity) {
        self.seen.entry(species.to_string()).or_default().set(rarity);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// PETS
// ═══════════════════════════════════════════════════════════════════════

/// What a pet species does when equipped. Effects of different kinds stack
/// multiplicatively; within one kind only the best equipped pet counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PetKind {
    /// Final-damage multiplier on every attack.
    Dragon,
    /// Extra damage against bosses only, added to 1.0.
    Wolf,
    /// Scales the rare/epic/unique spawn bands.
    Eagle,
    /// Chance of a bonus diamond on every kill.
    Fairy,
    /// Multiplies gold kill rewards.
    Truffler,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PetRarity {
    Common,
    Rare,
    Epic,
    Legendary,
    Mythic,
}

impl PetRarity {
    pub const ALL: [PetRarity; 5] = [
        PetRarity::Common,
        PetRarity::Rare,
        PetRarity::Epic,
        PetRarity::Legendary,
        PetRarity::Mythic,
    ];

    pub fn next(self) -> Option<PetRarity> {
        match self {
            PetRarity::Common => Some(PetRarity::Rare),
            PetRarity::Rare => Some(PetRarity::Epic),
            PetRarity::Epic => Some(PetRarity::Legendary),
            PetRarity::Legendary => Some(PetRarity::Mythic),
            PetRarity::Mythic => None,
        }
    }

    /// Gacha weight in units of 0.01% (sums to 10,000).
    pub fn gacha_weight(self) -> u32 {
        match self {
            PetRarity::Common => 8_390,
            PetRarity::Rare => 1_000,
            PetRarity::Epic => 500,
            PetRarity::Legendary => 100,
            PetRarity::Mythic => 10,
        }
    }

    /// One-time pet dex claim payout, in diamond.
    pub fn claim_diamond(self) -> u64 {
        match self {
            PetRarity::Common => 10,
            PetRarity::Rare => 50,
            PetRarity::Epic => 100,
            PetRarity::Legendary => 500,
            PetRarity::Mythic => 1_000,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PetRarity::Common => "common",
            PetRarity::Rare => "rare",
            PetRarity::Epic => "epic",
            PetRarity::Legendary => "legendary",
            PetRarity::Mythic => "mythic",
        }
    }
}

/// Effect magnitude for a pet of the given kind and rarity.
///
/// Dragon/Eagle/Truffler return a multiplier (≥ 1.0); Wolf returns the
/// additive boss bonus; Fairy returns a per-kill diamond chance in percent.
pub fn pet_effect(kind: PetKind, rarity: PetRarity) -> f64 {
    let scale = match rarity {
        PetRarity::Common => 0,
        PetRarity::Rare => 1,
        PetRarity::Epic => 2,
        PetRarity::Legendary => 3,
        PetRarity::Mythic => 4,
    };
    match kind {
        PetKind::Dragon | PetKind::Eagle | PetKind::Truffler => {
            [1.1, 1.25, 1.5, 2.0, 3.0][scale]
        }
        PetKind::Wolf => [0.1, 0.25, 0.5, 1.0, 2.0][scale],
        PetKind::Fairy => [0.5, 1.0, 2.0, 4.0, 8.0][scale],
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PetSpeciesDef {
    pub id: SpeciesId,
    pub name: String,
    pub kind: PetKind,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct PetRegistry {
    pub species: Vec<PetSpeciesDef>,
}

impl PetRegistry {
    pub fn get(&self, id: &str) -> Option<&PetSpeciesDef> {
        self.species.iter().find(|s| s.id == id)
    }

    pub fn kind_of(&self, id: &str) -> Option<PetKind> {
        self.get(id).map(|s| s.kind)
    }
}

/// Compound inventory id: a species at a rarity step.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PetId {
    pub species: SpeciesId,
    pub rarity: PetRarity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PetStack {
    pub id: PetId,
    pub count: u32,
}

#[derive(Resource, Debug, Clone, Default, Serialize, Deserialize)]
pub struct PetCollection {
    pub stacks: Vec<PetStack>,
    /// Bounded by PET_EQUIP_SLOTS.
    pub equipped: Vec<PetId>,
    /// Every pet id ever held — the pet dex. Never cleared, even if all
    /// copies are merged away.
    pub ever_owned: HashSet<PetId>,
}

impl PetCollection {
    pub fn count(&self, id: &PetId) -> u32 {
        self.stacks
            .iter()
            .find(|s| s.id == *id)
            .map(|s| s.count)
            .unwrap_or(0)
    }

    pub fn add(&mut self, id: PetId, quantity: u32) {
        if quantity == 0 {
            return;
        }
        self.ever_owned.insert(id.clone());
        match self.stacks.iter_mut().find(|s| s.id == id) {
            Some(stack) => stack.count += quantity,
            None => self.stacks.push(PetStack { id, count: quantity }),
        }
    }

    /// Removes up to `quantity` copies. Returns how many were removed.
    pub fn remove(&mut self, id: &PetId, quantity: u32) -> u32 {
        let Some(pos) = self.stacks.iter().position(|s| s.id == *id) else {
            return 0;
        };
        let stack = &mut self.stacks[pos];
        let removed = quantity.min(stack.count);
        stack.count -= removed;
        if stack.count == 0 {
            self.stacks.remove(pos);
        }
        removed
    }

    pub fn is_equipped(&self, id: &PetId) -> bool {
        self.equipped.contains(id)
    }

    /// Best effect among equipped pets of the given kind, or None if no such
    /// pet is equipped.
    pub fn best_equipped_effect(&self, registry: &PetRegistry, kind: PetKind) -> Option<f64> {
        self.equipped
            .iter()
            .filter(|id| registry.kind_of(&id.species) == Some(kind))
            .map(|id| pet_effect(kind, id.rarity))
            .fold(None, |best, e| Some(best.map_or(e, |b: f64| b.max(e))))
    }
}

// ═══════════════════════════════════════════════════════════════════════
// SKINS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SkinRarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl SkinRarity {
    pub const ALL: [SkinRarity; 4] = [
        SkinRarity::Common,
        SkinRarity::Rare,
        SkinRarity::Epic,
        SkinRarity::Legendary,
    ];

    pub fn next(self) -> Option<SkinRarity> {
        match self {
            SkinRarity::Common => Some(SkinRarity::Rare),
            SkinRarity::Rare => Some(SkinRarity::Epic),
            SkinRarity::Epic => Some(SkinRarity::Legendary),
            SkinRarity::Legendary => None,
        }
    }

    /// Gacha weight in percent (sums to 100).
    pub fn gacha_weight(self) -> u32 {
        match self {
            SkinRarity::Common => 60,
            SkinRarity::Rare => 25,
            SkinRarity::Epic => 10,
            SkinRarity::Legendary => 5,
        }
    }

    /// Attack bonus percent per grade step.
    pub fn attack_bonus_base(self) -> f64 {
        match self {
            SkinRarity::Common => 5.0,
            SkinRarity::Rare => 10.0,
            SkinRarity::Epic => 20.0,
            SkinRarity::Legendary => 40.0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SkinRarity::Common => "common",
            SkinRarity::Rare => "rare",
            SkinRarity::Epic => "epic",
            SkinRarity::Legendary => "legendary",
        }
    }
}

pub const SKIN_MAX_GRADE: u8 = 4;

/// Grade gacha weights for grades 1..=4, in percent.
pub const SKIN_GRADE_WEIGHTS: [u32; 4] = [10, 20, 30, 40];

/// Compound skin id: rarity × grade. The two dimensions are rolled
/// independently by the gacha and combined here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SkinId {
    pub rarity: SkinRarity,
    pub grade: u8,
}

impl SkinId {
    pub fn attack_bonus_percent(self) -> f64 {
        self.rarity.attack_bonus_base() * self.grade as f64
    }

    /// The next merge step: grade first, then rarity (resetting to grade 1).
    /// Legendary grade 4 is terminal.
    pub fn next_step(self) -> Option<SkinId> {
        if self.grade < SKIN_MAX_GRADE {
            Some(SkinId {
                rarity: self.rarity,
                grade: self.grade + 1,
            })
        } else {
            self.rarity.next().map(|rarity| SkinId { rarity, grade: 1 })
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkinStack {
    pub id: SkinId,
    pub count: u32,
}

#[derive(Resource, Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkinCollection {
    pub stacks: Vec<SkinStack>,
    pub equipped: Option<SkinId>,
}

impl SkinCollection {
    pub fn count(&self, id: SkinId) -> u32 {
        self.stacks
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.count)
            .unwrap_or(0)
    }

    pub fn add(&mut self, id: SkinId, quantity: u32) {
        if quantity == 0 {
            return;
        }
        match self.stacks.iter_mut().find(|s| s.id == id) {
            Some(stack) => stack.count += quantity,
            None => self.stacks.push(SkinStack { id, count: quantity }),
        }
    }

    pub fn remove(&mut self, id: SkinId, quantity: u32) -> u32 {
        let Some(pos) = self.stacks.iter().position(|s| s.id == id) else {
            return 0;
        };
        let stack = &mut self.stacks[pos];
        let removed = quantity.min(stack.count);
        stack.count -= removed;
        if stack.count == 0 {
            self.stacks.remove(pos);
        }
        removed
    }

    pub fn equipped_attack_bonus(&self) -> f64 {
        self.equipped.map(SkinId::attack_bonus_percent).unwrap_or(0.0)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// ARTIFACTS
// ═══════════════════════════════════════════════════════════════════════

/// What an artifact's level feeds into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactChannel {
    AttackPercent,
    GoldPercent,
    DiamondDropPercent,
    BossDamagePercent,
    CritChanceFlat,
    MoveSpeedPercent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArtifactKind {
    SporeBlade,
    GildedCap,
    PrismSpore,
    TitanLichen,
    KeenMycelium,
    SwiftMoss,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 6] = [
        ArtifactKind::SporeBlade,
        ArtifactKind::GildedCap,
        ArtifactKind::PrismSpore,
        ArtifactKind::TitanLichen,
        ArtifactKind::KeenMycelium,
        ArtifactKind::SwiftMoss,
    ];

    pub fn channel(self) -> ArtifactChannel {
        match self {
            ArtifactKind::SporeBlade => ArtifactChannel::AttackPercent,
            ArtifactKind::GildedCap => ArtifactChannel::GoldPercent,
            ArtifactKind::PrismSpore => ArtifactChannel::DiamondDropPercent,
            ArtifactKind::TitanLichen => ArtifactChannel::BossDamagePercent,
            ArtifactKind::KeenMycelium => ArtifactChannel::CritChanceFlat,
            ArtifactKind::SwiftMoss => ArtifactChannel::MoveSpeedPercent,
        }
    }

    /// Effect contribution per upgrade level, in the channel's unit
    /// (percent for all current channels).
    pub fn per_level(self) -> f64 {
        match self {
            ArtifactKind::SporeBlade => 1.0,
            ArtifactKind::GildedCap => 1.0,
            ArtifactKind::PrismSpore => 0.05,
            ArtifactKind::TitanLichen => 2.0,
            ArtifactKind::KeenMycelium => 0.1,
            ArtifactKind::SwiftMoss => 0.5,
        }
    }

    /// Gacha weight in percent (sums to 100).
    pub fn gacha_weight(self) -> u32 {
        match self {
            ArtifactKind::SporeBlade => 30,
            ArtifactKind::GildedCap => 25,
            ArtifactKind::PrismSpore => 20,
            ArtifactKind::TitanLichen => 15,
            ArtifactKind::KeenMycelium => 7,
            ArtifactKind::SwiftMoss => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ArtifactKind::SporeBlade => "Spore Blade",
            ArtifactKind::GildedCap => "Gilded Cap",
            ArtifactKind::PrismSpore => "Prism Spore",
            ArtifactKind::TitanLichen => "Titan Lichen",
            ArtifactKind::KeenMycelium => "Keen Mycelium",
            ArtifactKind::SwiftMoss => "Swift Moss",
        }
    }
}

pub const ARTIFACT_MAX_LEVEL: u32 = 1_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactEntry {
    pub kind: ArtifactKind,
    /// Unleveled copies held, waiting to be fed into upgrades.
    pub count: u32,
    /// Upgraded tier, 0..=ARTIFACT_MAX_LEVEL.
    pub level: u32,
}

#[derive(Resource, Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArtifactCollection {
    pub entries: Vec<ArtifactEntry>,
}

impl ArtifactCollection {
    pub fn entry(&self, kind: ArtifactKind) -> Option<&ArtifactEntry> {
        self.entries.iter().find(|e| e.kind == kind)
    }

    pub fn entry_mut(&mut self, kind: ArtifactKind) -> &mut ArtifactEntry {
        if let Some(pos) = self.entries.iter().position(|e| e.kind == kind) {
            return &mut self.entries[pos];
        }
        self.entries.push(ArtifactEntry {
            kind,
            count: 0,
            level: 0,
        });
        self.entries.last_mut().unwrap()
    }

    /// Summed percent contribution across all artifacts on a channel.
    pub fn channel_percent(&self, channel: ArtifactChannel) -> f64 {
        self.entries
            .iter()
            .filter(|e| e.kind.channel() == channel)
            .map(|e| e.level as f64 * e.kind.per_level())
            .sum()
    }
}

// ═══════════════════════════════════════════════════════════════════════
// CLAIMED REWARDS
// ═══════════════════════════════════════════════════════════════════════

/// One-time claim flags mirroring the three dexes. A claim requires the
/// matching collection flag to already be set, pays out exactly once, and is
/// a silent no-op forever after.
#[derive(Resource, Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClaimedRewards {
    pub weapons: HashSet<usize>,
    pub mushrooms: HashMap<SpeciesId, RarityFlags>,
    pub pets: HashSet<PetId>,
}

impl ClaimedRewards {
    pub fn mushroom_claimed(&self, species: &str, rarity: MushroomRarity) -> bool {
        self.mushrooms
            .get(species)
            .map(|f| f.get(rarity))
            .unwrap_or(false)
    }

    pub fn mark_mushroom(&mut self, species: &str, rarity: MushroomRarity) {
        self.mushrooms
            .entry(species.to_string())
            .or_default()
            .set(rarity);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// STAGE PROGRESS & MUSHROOM FIELD
// ═══════════════════════════════════════════════════════════════════════

pub const STAGES_PER_CHAPTER: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageCoord {
    pub chapter: u32,
    pub stage: u32,
}

impl StageCoord {
    pub fn first() -> Self {
        Self {
            chapter: 1,
            stage: 1,
        }
    }

    /// Difficulty scalar feeding the HP/reward exponent curves.
    pub fn difficulty(self) -> f64 {
        ((self.chapter - 1) * STAGES_PER_CHAPTER + self.stage) as f64
    }

    pub fn is_boss_stage(self) -> bool {
        self.stage == STAGES_PER_CHAPTER
    }

    pub fn next(self) -> StageCoord {
        if self.is_boss_stage() {
            StageCoord {
                chapter: self.chapter + 1,
                stage: 1,
            }
        } else {
            StageCoord {
                chapter: self.chapter,
                stage: self.stage + 1,
            }
        }
    }

    /// Chapter-first lexicographic comparison.
    pub fn is_beyond(self, other: StageCoord) -> bool {
        (self.chapter, self.stage) > (other.chapter, other.stage)
    }
}

/// Persisted stage bookkeeping. Kill counts and the spawned field are
/// session state and live in `StageSession` / `MushroomField` instead.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct StageProgress {
    pub current: StageCoord,
    pub max_reached: StageCoord,
}

impl Default for StageProgress {
    fn default() -> Self {
        Self {
            current: StageCoord::first(),
            max_reached: StageCoord::first(),
        }
    }
}

/// Ephemeral per-stage state. Never persisted — a reload re-rolls the field
/// and restarts the current stage's kill count from zero.
#[derive(Resource, Debug, Default)]
pub struct StageSession {
    pub kills: u32,
    pub boss_phase: bool,
    pub boss_countdown: Option<Timer>,
    /// Delay between the boss kill and the automatic stage advance.
    pub pending_advance: Option<Timer>,
    /// Monotonic field-generation counter, bumped on every wholesale
    /// respawn. Identifies the current stage run so stale work (UI effects,
    /// deferred callbacks in the shell) can be discarded after a restart.
    pub token: u64,
}

#[derive(Debug, Clone)]
pub struct MushroomInstance {
    pub id: u64,
    pub species: SpeciesId,
    pub rarity: MushroomRarity,
    pub x: f32,
    pub y: f32,
    pub hp: f64,
    pub max_hp: f64,
    pub reward_gold: f64,
    pub reward_diamond: u64,
    pub is_boss: bool,
    pub dead: bool,
    pub respawn_timer: Option<Timer>,
}

/// The spawned creature field for the current stage. Ephemeral: rebuilt
/// wholesale on stage transitions and on load.
#[derive(Resource, Debug, Default)]
pub struct MushroomField {
    pub instances: Vec<MushroomInstance>,
    pub next_id: u64,
}

impl MushroomField {
    pub fn alloc_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn get_mut(&mut self, id: u64) -> Option<&mut MushroomInstance> {
        self.instances.iter_mut().find(|m| m.id == id)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// WORLD BOSS
// ═══════════════════════════════════════════════════════════════════════

/// Persisted world-boss bookkeeping.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct WorldBossState {
    pub best_damage: f64,
    pub attempts_remaining: u8,
    /// Local date of the last attempt-counter reset, ISO "YYYY-MM-DD".
    pub last_reset_date: String,
}

impl Default for WorldBossState {
    fn default() -> Self {
        Self {
            best_damage: 0.0,
            attempts_remaining: WORLD_BOSS_DAILY_ATTEMPTS,
            last_reset_date: String::new(),
        }
    }
}

/// Ephemeral world-boss battle session.
#[derive(Resource, Debug, Default)]
pub struct WorldBossSession {
    pub battling: bool,
    pub session_damage: f64,
    pub countdown: Option<Timer>,
}

// ═══════════════════════════════════════════════════════════════════════
// PLAYER POSITION & RNG
// ═══════════════════════════════════════════════════════════════════════

/// Where the hunter stands on the field. Movement input is out of scope;
/// the auto-hunt loop walks this toward the current target.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct PlayerPosition {
    pub x: f32,
    pub y: f32,
}

impl PlayerPosition {
    pub fn distance_to(&self, x: f32, y: f32) -> f32 {
        let dx = x - self.x;
        let dy = y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Today's local calendar date as ISO "YYYY-MM-DD". Refreshed once per
/// frame from the system clock in production; tests write it directly so
/// date-rollover logic stays deterministic.
#[derive(Resource, Debug, Clone, Default)]
pub struct WallClock {
    pub today: String,
}

/// The single RNG every probability roll goes through. Seeded from entropy
/// in production; tests construct it with `HuntRng::seeded` for determinism.
#[derive(Resource)]
pub struct HuntRng(pub StdRng);

impl Default for HuntRng {
    fn default() -> Self {
        Self(StdRng::from_entropy())
    }
}

impl HuntRng {
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

// ═══════════════════════════════════════════════════════════════════════
// GACHA
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GachaKind {
    Artifact,
    Pet,
    Skin,
}

impl GachaKind {
    /// Diamond price per single pull.
    pub fn unit_price(self) -> u64 {
        match self {
            GachaKind::Artifact => 80,
            GachaKind::Pet => 100,
            GachaKind::Skin => 150,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            GachaKind::Artifact => "artifact",
            GachaKind::Pet => "pet",
            GachaKind::Skin => "skin",
        }
    }
}

#[derive(Debug, Clone)]
pub enum GachaResult {
    Artifact(ArtifactKind),
    Pet(PetId),
    Skin(SkinId),
}

/// Per-session pull results for the UI reveal panel. Accumulates across
/// batches until explicitly cleared.
#[derive(Resource, Debug, Clone, Default)]
pub struct GachaResults {
    pub entries: Vec<GachaResult>,
}

// ═══════════════════════════════════════════════════════════════════════
// PLAY STATISTICS
// ═══════════════════════════════════════════════════════════════════════

/// Lifetime play counters. Persisted with the save.
#[derive(Resource, Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayStats {
    pub total_gold_earned: f64,
    pub total_gold_spent: f64,
    pub total_diamond_earned: u64,
    pub total_kills: u64,
    pub boss_kills: u64,
    pub enhance_attempts: u64,
    pub evolve_attempts: u64,
    pub gacha_pulls: u64,
    pub play_time_seconds: u64,
}

/// Snapshot handed to the (external) leaderboard collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub hunter_name: String,
    pub max_stage: StageCoord,
    pub weapon_tier: usize,
    pub world_boss_best: f64,
}

impl LeaderboardEntry {
    pub fn from_state(
        hunter_name: &str,
        progress: &StageProgress,
        weapon: &WeaponState,
        world_boss: &WorldBossState,
    ) -> Self {
        Self {
            hunter_name: hunter_name.to_string(),
            max_stage: progress.max_reached,
            weapon_tier: weapon.tier,
            world_boss_best: world_boss.best_damage,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// EVENTS — cross-domain communication
// ═══════════════════════════════════════════════════════════════════════

#[derive(Event, Debug, Clone)]
pub struct EnhanceWeaponEvent;

#[derive(Event, Debug, Clone)]
pub struct EvolveWeaponEvent;

#[derive(Event, Debug, Clone)]
pub struct StatUpgradeEvent {
    pub key: StatKey,
    pub count: u32,
}

#[derive(Event, Debug, Clone)]
pub struct GachaPullEvent {
    pub kind: GachaKind,
    pub count: u32,
}

#[derive(Event, Debug, Clone)]
pub struct ClearGachaResultsEvent;

#[derive(Event, Debug, Clone)]
pub struct MergePetEvent {
    pub id: PetId,
}

#[derive(Event, Debug, Clone)]
pub struct MergeAllPetsEvent;

#[derive(Event, Debug, Clone)]
pub struct MergeSkinEvent {
    pub id: SkinId,
}

#[derive(Event, Debug, Clone)]
pub struct MergeAllSkinsEvent;

#[derive(Event, Debug, Clone)]
pub struct UpgradeArtifactEvent {
    pub kind: ArtifactKind,
}

#[derive(Event, Debug, Clone)]
pub struct EquipPetEvent {
    pub id: PetId,
}

#[derive(Event, Debug, Clone)]
pub struct UnequipPetEvent {
    pub id: PetId,
}

#[derive(Event, Debug, Clone)]
pub struct EquipSkinEvent {
    pub id: SkinId,
}

#[derive(Event, Debug, Clone)]
pub struct ClaimWeaponRewardEvent {
    pub tier: usize,
}

#[derive(Event, Debug, Clone)]
pub struct ClaimMushroomRewardEvent {
    pub species: SpeciesId,
    pub rarity: MushroomRarity,
}

#[derive(Event, Debug, Clone)]
pub struct ClaimPetRewardEvent {
    pub id: PetId,
}

#[derive(Event, Debug, Clone)]
pub struct ClaimAllRewardsEvent;

#[derive(Event, Debug, Clone)]
pub struct GoldChangeEvent {
    /// Positive = gain, negative = spend. Integer-valued.
    pub amount: f64,
    pub reason: String,
}

#[derive(Event, Debug, Clone)]
pub struct DiamondChangeEvent {
    pub amount: i64,
    pub reason: String,
}

/// Fired by combat when an instance's HP reaches zero; consumed by the
/// stage tracker for rewards, dex flags, and stage-clear accounting.
#[derive(Event, Debug, Clone)]
pub struct MushroomKilledEvent {
    pub instance_id: u64,
    pub species: SpeciesId,
    pub rarity: MushroomRarity,
    pub reward_gold: f64,
    pub reward_diamond: u64,
    pub was_boss: bool,
}

/// Fired per resolved attack for the damage-number/particle layer.
/// `reached_tier` is display-only and feeds no gameplay input.
#[derive(Event, Debug, Clone)]
pub struct AttackResolvedEvent {
    pub target_id: u64,
    pub damage: f64,
    pub reached_tier: u8,
}

#[derive(Event, Debug, Clone)]
pub struct SelectStageEvent {
    pub chapter: u32,
    pub stage: u32,
}

#[derive(Event, Debug, Clone)]
pub struct StageClearedEvent {
    pub coord: StageCoord,
    pub boss_stage: bool,
}

#[derive(Event, Debug, Clone)]
pub struct StartWorldBossEvent;

/// Request to end the running world-boss session early (retreat). Timer
/// expiry ends the session the same way without this event.
#[derive(Event, Debug, Clone)]
pub struct EndWorldBossEvent;

/// Transient UI notification (consumed by the out-of-scope client shell).
#[derive(Event, Debug, Clone)]
pub struct ToastEvent {
    pub message: String,
}

// ═══════════════════════════════════════════════════════════════════════
// CONSTANTS
// ═══════════════════════════════════════════════════════════════════════

/// Auto-attack cadence: one resolution per interval, enforced by the hunt
/// loop (the resolver itself is stateless per call).
pub const ATTACK_INTERVAL_SECS: f32 = 0.1;

pub const MUSHROOMS_PER_STAGE: usize = 100;
pub const STAGE_KILL_TARGET: u32 = 100;

pub const WEAPON_MAX_ENHANCE_LEVEL: u32 = 10;

pub const PET_EQUIP_SLOTS: usize = 3;
pub const MERGE_BATCH: u32 = 5;
/// Upper bound on merge-all cascade passes. Far above any reachable
/// inventory, it only guarantees termination.
pub const MERGE_CASCADE_CAP: usize = 100;

pub const BOSS_COUNTDOWN_SECS: f32 = 60.0;
pub const BOSS_ADVANCE_DELAY_SECS: f32 = 1.5;
pub const RESPAWN_DELAY_SECS: f32 = 3.0;
pub const FIELD_HALF_EXTENT: f32 = 50.0;

pub const STAGE_CLEAR_DIAMOND: u64 = 10;
pub const BOSS_CLEAR_DIAMOND: u64 = 100;
pub const UNIQUE_DIAMOND_BONUS: u64 = 5;

pub const WORLD_BOSS_SESSION_SECS: f32 = 60.0;
pub const WORLD_BOSS_DAILY_ATTEMPTS: u8 = 3;
pub const WORLD_BOSS_GOLD_PER_DAMAGE: f64 = 1.0 / 10_000.0;

pub const BASE_MOVE_SPEED: f32 = 4.0;
pub const BASE_ATTACK_RANGE: f32 = 3.0;
