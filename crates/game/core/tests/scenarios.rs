//! End-to-end combat scenarios across the AI, pattern, and resolution layers.

use deluge_core::combat::{Aim, AttackDescriptor, HitKind, Owner, ResolutionPipeline};
use deluge_core::pattern::{ArchetypeId, PatternId, standard_catalog};
use deluge_core::state::{BossState, CombatStats, Combatant, Control, EntityId, Side};
use deluge_core::{CombatConfig, Encounter, PcgRng, ResolutionConfig, Vec2, calculate_damage};

const DT: f32 = 0.05;

fn hero(id: u32, position: Vec2) -> Combatant {
    let stats = CombatStats {
        health: 1.0e9,
        max_health: 1.0e9,
        ..CombatStats::default()
    };
    Combatant::new(EntityId(id), "hero", Side::Players, stats)
        .at(position)
        .with_control(Control::External)
}

fn boss(id: u32, archetype: ArchetypeId) -> Combatant {
    let stats = CombatStats {
        health: 1000.0,
        max_health: 1000.0,
        ..CombatStats::default()
    };
    Combatant::new(EntityId(id), "boss", Side::Hostile, stats).with_boss(BossState::new(archetype))
}

#[test]
fn first_threshold_fires_once_with_heal_invulnerability_and_minions() {
    let mut encounter = Encounter::new(CombatConfig::default(), standard_catalog().unwrap(), 42);
    encounter.spawn(hero(1, Vec2::new(150.0, 0.0))).unwrap();
    encounter.spawn(boss(2, ArchetypeId::FrostMatriarch)).unwrap();
    let player = Owner::new(EntityId(1), Side::Players);

    let mut transitions = 0;
    let mut after_transition = Vec::new();
    for _ in 0..30 {
        encounter.submit(AttackDescriptor::direct(player, Vec2::ZERO, EntityId(2), 50.0));
        let report = encounter.tick(DT, None, &mut ());

        let bound: Vec<_> = report
            .spawn_requests
            .iter()
            .filter(|r| r.bound_to_phase)
            .collect();
        if !bound.is_empty() {
            transitions += 1;
            assert_eq!(bound.len(), 1);
            assert_eq!(bound[0].count, 10);
            assert_eq!(bound[0].kind, "frost_wisp");
            assert_eq!(bound[0].summoner, EntityId(2));
            assert!(report.intents.iter().any(|i| i.phase_flash));
        }
        if transitions > 0 {
            after_transition.extend(
                report
                    .hits
                    .iter()
                    .filter(|h| h.target == EntityId(2) && h.kind != HitKind::Heal)
                    .map(|h| h.amount),
            );
        }
    }

    assert_eq!(transitions, 1);
    let me = encounter.get(EntityId(2)).unwrap();
    assert_eq!(me.stats.health, 1000.0);
    assert!(me.is_invulnerable());
    assert_eq!(me.boss.as_ref().unwrap().phase, 2);
    assert!(!after_transition.is_empty());
    assert!(after_transition.iter().all(|&amount| amount == 0.0));
}

#[test]
fn non_cleaving_melee_hits_only_the_first_target() {
    let mut pipeline = ResolutionPipeline::new(ResolutionConfig::default(), PcgRng::new(5));
    let attacker = Combatant::new(EntityId(9), "brute", Side::Hostile, CombatStats::default());
    let mut targets = vec![
        attacker,
        hero(1, Vec2::new(35.0, 0.0)),
        hero(2, Vec2::new(45.0, 0.0)),
    ];
    pipeline.submit(AttackDescriptor::melee(
        Owner::new(EntityId(9), Side::Hostile),
        Vec2::ZERO,
        Vec2::X,
        40.0,
        25.0,
    ));

    let log = pipeline.tick(DT, &mut targets);
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].target, EntityId(1));
    assert_eq!(log[0].amount, 25.0);
    assert!(pipeline.objects().is_empty());
}

#[test]
fn explosive_projectile_splashes_secondaries_but_not_owner() {
    let mut pipeline = ResolutionPipeline::new(ResolutionConfig::default(), PcgRng::new(5));
    let owner = Combatant::new(EntityId(9), "caster", Side::Hostile, CombatStats::default())
        .at(Vec2::new(70.0, 0.0));
    let mut targets = vec![
        owner,
        hero(1, Vec2::new(98.0, 0.0)),
        hero(2, Vec2::new(120.0, 0.0)),
        hero(3, Vec2::new(100.0, 30.0)),
        hero(4, Vec2::new(90.0, -30.0)),
    ];
    pipeline.submit(
        AttackDescriptor::projectile(
            Owner::new(EntityId(9), Side::Hostile),
            Vec2::new(70.0, 0.0),
            Aim::Direction(Vec2::X),
            200.0,
            40.0,
        )
        .with_aoe_radius(40.0),
    );

    let log = pipeline.tick(DT, &mut targets);
    let primary: Vec<_> = log.iter().filter(|h| h.kind == HitKind::Damage).collect();
    assert_eq!(primary.len(), 1);
    assert_eq!(primary[0].target, EntityId(1));
    assert_eq!(primary[0].amount, 40.0);

    let splash: Vec<_> = log.iter().filter(|h| h.kind == HitKind::Splash).collect();
    assert_eq!(splash.len(), 3);
    for hit in &splash {
        assert!((hit.amount - 28.0).abs() < 1e-4);
        assert_ne!(hit.target, EntityId(9));
        assert_ne!(hit.target, EntityId(1));
    }
    assert_eq!(targets[0].stats.health, targets[0].stats.max_health);
}

/// Runs a lone boss against an unkillable hero and records the active
/// pattern on every tick.
fn pattern_timeline(archetype: ArchetypeId, seconds: f32, seed: u64) -> Vec<Option<PatternId>> {
    let mut encounter = Encounter::new(CombatConfig::default(), standard_catalog().unwrap(), seed);
    encounter.spawn(hero(1, Vec2::new(150.0, 0.0))).unwrap();
    encounter.spawn(boss(2, archetype)).unwrap();

    let ticks = (seconds / DT) as usize;
    (0..ticks)
        .map(|_| {
            let report = encounter.tick(DT, None, &mut ());
            report.intents.first().and_then(|i| i.pattern)
        })
        .collect()
}

/// Collapses a timeline into (pattern, ticks active) runs and idle gaps.
fn runs(timeline: &[Option<PatternId>]) -> (Vec<(PatternId, usize)>, Vec<usize>) {
    let mut active = Vec::new();
    let mut idle = Vec::new();
    let mut current: Option<(Option<PatternId>, usize)> = None;
    for &entry in timeline {
        match current.as_mut() {
            Some((id, len)) if *id == entry => *len += 1,
            _ => {
                if let Some((id, len)) = current.take() {
                    match id {
                        Some(id) => active.push((id, len)),
                        None => idle.push(len),
                    }
                }
                current = Some((entry, 1));
            }
        }
    }
    (active, idle)
}

#[test]
fn bosses_stay_busy_and_never_stall() {
    for (seed, archetype) in [
        ArchetypeId::FlameWarden,
        ArchetypeId::FrostMatriarch,
        ArchetypeId::StormHerald,
        ArchetypeId::VenomQueen,
        ArchetypeId::ShadowReaver,
        ArchetypeId::StoneColossus,
    ]
    .into_iter()
    .enumerate()
    {
        let timeline = pattern_timeline(archetype, 30.0, seed as u64);
        let (active, idle) = runs(&timeline);
        assert!(active.len() >= 5, "{archetype}: only {} patterns", active.len());

        for gap in idle {
            assert!(gap as f32 * DT <= 0.5 + DT, "{archetype}: idle for {gap} ticks");
        }
        for (id, len) in &active {
            assert!(*len <= 61, "{archetype}: {id} ran {len} ticks");
        }
    }
}

#[test]
fn no_pattern_repeats_within_five_selections() {
    let timeline = pattern_timeline(ArchetypeId::ShadowReaver, 40.0, 3);
    let (active, _) = runs(&timeline);
    let selections: Vec<PatternId> = active.iter().map(|(id, _)| *id).collect();
    assert!(selections.len() > 6);
    for window in selections.windows(6) {
        let latest = window[5];
        assert!(
            !window[..5].contains(&latest),
            "{latest} repeated within {window:?}"
        );
    }
}

#[test]
fn damage_never_drops_below_floor() {
    let config = ResolutionConfig::default();
    for incoming in [0.0, 0.5, 1.0, 10.0, 50.0, 1000.0] {
        for defense in [0.0, 1.0, 20.0, 100.0, 10_000.0] {
            let dealt = calculate_damage(incoming, defense, &config);
            assert!(dealt >= 1.0);
            assert!(dealt >= incoming - defense * 0.3 - 1e-4);
        }
    }
}
