//! Stat-track cost curves and the level-by-level bulk-upgrade walk.
//!
//! Costs are integer-valued gold amounts carried as f64 (late tracks
//! overflow u64). Every curve is non-decreasing in level, so a bulk quote
//! can stop the moment a step becomes unaffordable — but quoting itself
//! never looks at the wallet; affordability is the caller's check.

use crate::shared::*;

/// Gold cost of the single upgrade from `level` to `level + 1`.
///
/// Levels at or past the track's cap have no next step; callers reach this
/// only through `bulk_upgrade`, which stops at the cap first.
pub fn step_cost(key: StatKey, level: u32) -> f64 {
    let base = key.base_cost();
    let next = (level + 1) as f64;
    match key.curve() {
        CostCurve::Linear => base * next,
        CostCurve::Cubic => (base * next.powi(3)).floor(),
        CostCurve::Staged => {
            let exponent = if level < 100 {
                1.1
            } else if level < 200 {
                1.15
            } else {
                1.2
            };
            (base * next.powf(exponent)).floor()
        }
    }
}

/// Quote for upgrading a track by up to `requested` levels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BulkQuote {
    pub total_cost: f64,
    /// Levels actually grantable, ≤ requested. Zero when already at cap —
    /// callers must treat that as a no-op, not an error.
    pub granted: u32,
}

/// Walks the cost curve level by level from `current_level`, accumulating
/// the total and stopping early at the track's cap. Per-step costs are not
/// uniform, so there is no closed-form shortcut here.
pub fn bulk_upgrade(key: StatKey, current_level: u32, requested: u32) -> BulkQuote {
    let cap = key.max_level();
    let mut total = 0.0;
    let mut granted = 0;
    for step in 0..requested {
        let level = current_level + step;
        if level >= cap {
            break;
        }
        total += step_cost(key, level);
        granted += 1;
    }
    BulkQuote {
        total_cost: total,
        granted,
    }
}

/// Gating precondition: a track is locked until its prerequisite track
/// (previous crit tier's chance) reaches its level cap. Locked tracks
/// silently refuse upgrades.
pub fn is_unlocked(key: StatKey, levels: &StatLevels) -> bool {
    match key.gate() {
        Some(prerequisite) => levels.get(prerequisite) >= prerequisite.max_level(),
        None => true,
    }
}
