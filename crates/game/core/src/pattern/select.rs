//! Anti-repetition pattern selection.

use tracing::debug;

use crate::config::SelectionConfig;
use crate::env::RngOracle;
use crate::pattern::{PatternCatalog, PatternId};
use crate::state::BossState;

/// Picks the next pattern and records it in the boss's history.
///
/// 1. Signature roll: if the signature is off cooldown, registered, and not
///    in history, take it with `signature_chance`.
/// 2. Pool = unlocked shared patterns plus archetype uniques.
/// 3. Drop ids present in history; if that empties the pool, drop only the
///    previous pick; if that still empties it, use the whole pool.
/// 4. Uniform pick.
///
/// Returns `None` only when nothing eligible is registered.
pub fn select_pattern(
    boss: &mut BossState,
    catalog: &PatternCatalog,
    config: &SelectionConfig,
    rng: &mut dyn RngOracle,
) -> Option<PatternId> {
    let info = boss.archetype.info();

    let signature = info.signature;
    if boss.signature_cooldown <= 0.0
        && catalog.contains(signature)
        && !boss.history.contains(signature)
        && rng.chance(config.signature_chance)
    {
        boss.signature_cooldown = config.signature_cooldown;
        boss.history.push(signature);
        debug!(pattern = %signature, archetype = %boss.archetype, "signature selected");
        return Some(signature);
    }

    let mut pool: Vec<PatternId> = boss
        .unlocked
        .iter()
        .chain(info.uniques.iter())
        .copied()
        .filter(|id| catalog.contains(*id))
        .collect();
    pool.sort();
    pool.dedup();
    if pool.is_empty() {
        return None;
    }

    let fresh: Vec<PatternId> = pool
        .iter()
        .copied()
        .filter(|id| !boss.history.contains(*id))
        .collect();
    let candidates = if !fresh.is_empty() {
        fresh
    } else {
        let previous = boss.history.last();
        let not_previous: Vec<PatternId> = pool
            .iter()
            .copied()
            .filter(|id| Some(*id) != previous)
            .collect();
        if not_previous.is_empty() { pool } else { not_previous }
    };

    let choice = candidates[rng.index(candidates.len())];
    boss.history.push(choice);
    debug!(pattern = %choice, pool = candidates.len(), "pattern selected");
    Some(choice)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::PcgRng;
    use crate::pattern::{ArchetypeId, standard_catalog};

    fn never_signature() -> SelectionConfig {
        SelectionConfig {
            signature_chance: 0.0,
            ..SelectionConfig::default()
        }
    }

    #[test]
    fn no_repeat_within_history_window() {
        let catalog = standard_catalog().unwrap();
        let mut boss = BossState::new(ArchetypeId::StormHerald);
        let mut rng = PcgRng::new(11);
        let picks: Vec<PatternId> = (0..200)
            .map(|_| select_pattern(&mut boss, &catalog, &never_signature(), &mut rng).unwrap())
            .collect();

        for window in picks.windows(6) {
            let newest = window[5];
            assert!(
                !window[..5].contains(&newest),
                "{newest} repeated inside {window:?}"
            );
        }
    }

    #[test]
    fn small_pool_falls_back_to_not_previous() {
        let catalog = standard_catalog().unwrap();
        let mut boss = BossState::new(ArchetypeId::StormHerald);
        boss.unlocked = vec![PatternId::AimedVolley];
        // Pool: AimedVolley + two uniques = 3 entries.
        let mut rng = PcgRng::new(2);
        let mut previous = None;
        for _ in 0..50 {
            let pick = select_pattern(&mut boss, &catalog, &never_signature(), &mut rng).unwrap();
            assert_ne!(Some(pick), previous);
            previous = Some(pick);
        }
    }

    #[test]
    fn single_entry_pool_repeats() {
        let mut catalog = PatternCatalog::new();
        catalog
            .register(Box::new(crate::pattern::shapes::TimedBurst::new(
                PatternId::AimedVolley,
                crate::pattern::shapes::ProjectileSpec::new(100.0, 1.0),
            )))
            .unwrap();
        let mut boss = BossState::new(ArchetypeId::FlameWarden);
        let mut rng = PcgRng::new(2);
        for _ in 0..3 {
            assert_eq!(
                select_pattern(&mut boss, &catalog, &never_signature(), &mut rng),
                Some(PatternId::AimedVolley)
            );
        }
    }

    #[test]
    fn signature_respects_cooldown() {
        let catalog = standard_catalog().unwrap();
        let mut boss = BossState::new(ArchetypeId::VenomQueen);
        let always = SelectionConfig {
            signature_chance: 1.0,
            signature_cooldown: 10.0,
        };
        let mut rng = PcgRng::new(4);

        assert_eq!(
            select_pattern(&mut boss, &catalog, &always, &mut rng),
            Some(PatternId::Plague)
        );
        assert_eq!(boss.signature_cooldown, 10.0);
        let next = select_pattern(&mut boss, &catalog, &always, &mut rng).unwrap();
        assert_ne!(next, PatternId::Plague);
    }

    #[test]
    fn uniques_join_the_pool() {
        let catalog = standard_catalog().unwrap();
        let mut boss = BossState::new(ArchetypeId::StoneColossus);
        let mut rng = PcgRng::new(8);
        let picks: Vec<PatternId> = (0..300)
            .map(|_| select_pattern(&mut boss, &catalog, &never_signature(), &mut rng).unwrap())
            .collect();
        assert!(picks.contains(&PatternId::Earthquake));
        assert!(!picks.contains(&PatternId::FlameWave));
        assert!(!picks.contains(&PatternId::MeteorRain));
    }
}
