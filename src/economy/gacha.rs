//! Gacha pulls for artifacts, pets, and skins, plus the artifact copy-sink.
//!
//! Every pull is an independent sample from the kind's weighted rarity
//! table; skins additionally roll a grade on a second independent table and
//! the two combine into the compound inventory id. Results accumulate in
//! the `GachaResults` buffer until the UI clears it.

use bevy::prelude::*;
use rand::Rng;

use crate::shared::*;

/// Weighted index pick over a slice of weights. The caller guarantees a
/// non-zero total.
fn weighted_index(rng: &mut impl Rng, weights: &[u32]) -> usize {
    let total: u32 = weights.iter().sum();
    let mut roll = rng.gen_range(0..total);
    for (i, w) in weights.iter().enumerate() {
        if roll < *w {
            return i;
        }
        roll -= w;
    }
    weights.len() - 1
}

pub fn roll_pet_rarity(rng: &mut impl Rng) -> PetRarity {
    let weights: Vec<u32> = PetRarity::ALL.iter().map(|r| r.gacha_weight()).collect();
    PetRarity::ALL[weighted_index(rng, &weights)]
}

pub fn roll_skin(rng: &mut impl Rng) -> SkinId {
    let rarity_weights: Vec<u32> = SkinRarity::ALL.iter().map(|r| r.gacha_weight()).collect();
    let rarity = SkinRarity::ALL[weighted_index(rng, &rarity_weights)];
    // Grade is a second, independent dimension.
    let grade = weighted_index(rng, &SKIN_GRADE_WEIGHTS) as u8 + 1;
    SkinId { rarity, grade }
}

pub fn roll_artifact(rng: &mut impl Rng) -> ArtifactKind {
    let weights: Vec<u32> = ArtifactKind::ALL.iter().map(|k| k.gacha_weight()).collect();
    ArtifactKind::ALL[weighted_index(rng, &weights)]
}

#[allow(clippy::too_many_arguments)]
pub fn handle_gacha_pull(
    mut events: EventReader<GachaPullEvent>,
    mut wallet: ResMut<Wallet>,
    mut stats: ResMut<PlayStats>,
    mut rng: ResMut<HuntRng>,
    mut results: ResMut<GachaResults>,
    mut artifacts: ResMut<ArtifactCollection>,
    mut pets: ResMut<PetCollection>,
    mut skins: ResMut<SkinCollection>,
    pet_registry: Res<PetRegistry>,
) {
    for ev in events.read() {
        if ev.count == 0 {
            continue;
        }
        let total_cost = ev.kind.unit_price() * ev.count as u64;
        if !wallet.try_spend_diamond(total_cost) {
            debug!(
                "[Economy] {} gacha refused — need {} diamond, have {}",
                ev.kind.name(),
                total_cost,
                wallet.diamond
            );
            continue;
        }
        stats.gacha_pulls += ev.count as u64;

        for _ in 0..ev.count {
            match ev.kind {
                GachaKind::Artifact => {
                    let kind = roll_artifact(&mut rng.0);
                    artifacts.entry_mut(kind).count += 1;
                    results.entries.push(GachaResult::Artifact(kind));
                }
                GachaKind::Pet => {
                    if pet_registry.species.is_empty() {
                        warn!("[Economy] Pet gacha with an empty registry");
                        break;
                    }
                    let idx = rng.0.gen_range(0..pet_registry.species.len());
                    let id = PetId {
                        species: pet_registry.species[idx].id.clone(),
                        rarity: roll_pet_rarity(&mut rng.0),
                    };
                    pets.add(id.clone(), 1);
                    results.entries.push(GachaResult::Pet(id));
                }
                GachaKind::Skin => {
                    let id = roll_skin(&mut rng.0);
                    skins.add(id, 1);
                    results.entries.push(GachaResult::Skin(id));
                }
            }
        }
        info!(
            "[Economy] {} gacha ×{} ({} diamond)",
            ev.kind.name(),
            ev.count,
            total_cost
        );
    }
}

/// The UI acknowledges the reveal panel; the buffer survives until then so
/// batches can stack up.
pub fn clear_gacha_results(
    mut events: EventReader<ClearGachaResultsEvent>,
    mut results: ResMut<GachaResults>,
) {
    for _ev in events.read() {
        results.entries.clear();
    }
}

/// Feeds one held copy into the artifact's level, up to the cap.
pub fn handle_upgrade_artifact(
    mut events: EventReader<UpgradeArtifactEvent>,
    mut artifacts: ResMut<ArtifactCollection>,
) {
    for ev in events.read() {
        let entry = artifacts.entry_mut(ev.kind);
        if entry.count == 0 {
            debug!(
                "[Economy] Artifact upgrade refused — no {} copies held",
                ev.kind.name()
            );
            continue;
        }
        if entry.level >= ARTIFACT_MAX_LEVEL {
            debug!(
                "[Economy] Artifact upgrade refused — {} is at max level",
                ev.kind.name()
            );
            continue;
        }
        entry.count -= 1;
        entry.level += 1;
        info!(
            "[Economy] {} upgraded to level {}",
            ev.kind.name(),
            entry.level
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_weighted_index_covers_all_buckets() {
        let mut rng = StdRng::seed_from_u64(11);
        let weights = [10, 20, 30, 40];
        let mut hits = [0u32; 4];
        for _ in 0..10_000 {
            hits[weighted_index(&mut rng, &weights)] += 1;
        }
        // Rough shape check: larger weights land more often.
        assert!(hits[3] > hits[2]);
        assert!(hits[2] > hits[1]);
        assert!(hits[1] > hits[0]);
        assert!(hits[0] > 0);
    }

    #[test]
    fn test_pet_rarity_distribution_converges() {
        let mut rng = StdRng::seed_from_u64(42);
        let samples = 200_000;
        let mut common = 0u32;
        let mut mythic = 0u32;
        for _ in 0..samples {
            match roll_pet_rarity(&mut rng) {
                PetRarity::Common => common += 1,
                PetRarity::Mythic => mythic += 1,
                _ => {}
            }
        }
        let common_pct = common as f64 / samples as f64 * 100.0;
        let mythic_pct = mythic as f64 / samples as f64 * 100.0;
        assert!((common_pct - 83.9).abs() < 1.0, "common at {common_pct}%");
        assert!((mythic_pct - 0.1).abs() < 0.1, "mythic at {mythic_pct}%");
    }

    #[test]
    fn test_skin_roll_dimensions_are_independent_and_in_range() {
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..1_000 {
            let skin = roll_skin(&mut rng);
            assert!((1..=SKIN_MAX_GRADE).contains(&skin.grade));
        }
    }
}
