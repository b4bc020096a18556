//! The standard pattern library.
//!
//! Every entry is one of the generic shapes configured as data. Timings keep
//! each pattern well inside the engine's stall timeout.

use glam::Vec2;

use crate::combat::{HitPayload, OnHit, ZoneSpec};
use crate::pattern::shapes::{
    Anchor, Area, BlastSpec, Choreography, DelayedTelegraph, Formation, FormationShot, Heading,
    Layout, ProjectileSpec, Step, StrikeSpec, TimedBurst, WindupMark,
};
use crate::pattern::{CatalogError, Pattern, PatternCatalog, PatternId};
use crate::state::StatusEffect;

/// Catalog holding every built-in pattern.
pub fn standard_catalog() -> Result<PatternCatalog, CatalogError> {
    let mut catalog = PatternCatalog::new();
    for pattern in shared_patterns()
        .into_iter()
        .chain(archetype_patterns())
    {
        catalog.register(pattern)?;
    }
    Ok(catalog)
}

fn charge(speed_scale: f32, max_time: f32) -> [Step; 2] {
    [
        Step::Windup {
            duration: 0.5,
            mark: Some(WindupMark::Lane { width: 48.0 }),
        },
        Step::Dash {
            speed_scale,
            max_time,
            arrive: 36.0,
            overshoot: 40.0,
        },
    ]
}

fn cleave(damage_scale: f32, payload: HitPayload) -> Step {
    Step::Strike(StrikeSpec::Melee {
        reach: 44.0,
        half_extents: Vec2::new(40.0, 40.0),
        cleave: true,
        damage_scale,
        payload,
    })
}

fn nova(radius: f32, damage_scale: f32, payload: HitPayload) -> Step {
    Step::Strike(StrikeSpec::Nova(BlastSpec::new(radius, damage_scale).payload(payload)))
}

fn shared_patterns() -> Vec<Box<dyn Pattern>> {
    let bolt = ProjectileSpec::new(320.0, 1.0);
    vec![
        // ===== always =====
        Box::new(TimedBurst::new(PatternId::AimedVolley, bolt).volleys(3, 0.25)),
        Box::new(
            TimedBurst::new(PatternId::SpreadShot, bolt.radius(6.0))
                .volleys(2, 0.45)
                .fan(5, 0.8),
        ),
        Box::new(
            TimedBurst::new(PatternId::RadialBurst, ProjectileSpec::new(220.0, 0.8))
                .volleys(2, 0.4)
                .radial(12)
                .spin(0.13),
        ),
        Box::new(Choreography::new(PatternId::ChargeSlam, {
            let mut steps = charge(3.0, 0.8).to_vec();
            steps.push(nova(90.0, 1.5, HitPayload::knockback(220.0)));
            steps.push(Step::Recover { duration: 0.4 });
            steps
        })),
        Box::new(Choreography::new(
            PatternId::CleaveCombo,
            vec![
                Step::Dash {
                    speed_scale: 2.0,
                    max_time: 0.6,
                    arrive: 40.0,
                    overshoot: 0.0,
                },
                cleave(1.0, HitPayload::NONE),
                Step::Wait { duration: 0.2 },
                cleave(1.3, HitPayload::knockback(160.0)),
                Step::Recover { duration: 0.3 },
            ],
        )),
        Box::new(Choreography::new(
            PatternId::GroundPound,
            vec![
                Step::Windup {
                    duration: 0.6,
                    mark: Some(WindupMark::Circle { radius: 140.0 }),
                },
                nova(140.0, 1.4, HitPayload::knockback(260.0)),
                Step::Recover { duration: 0.4 },
            ],
        )),
        Box::new(
            DelayedTelegraph::new(PatternId::TargetedBlast, Area::Circle { radius: 70.0 }, 1.2, 2.0)
                .follow(0.6),
        ),
        Box::new(
            TimedBurst::new(PatternId::SpiralBarrage, ProjectileSpec::new(200.0, 0.6))
                .volleys(10, 0.15)
                .radial(4)
                .spin(0.35),
        ),
        Box::new(Choreography::new(
            PatternId::Leap,
            vec![
                Step::Windup {
                    duration: 0.3,
                    mark: Some(WindupMark::Lane { width: 32.0 }),
                },
                Step::Dash {
                    speed_scale: 4.0,
                    max_time: 0.5,
                    arrive: 20.0,
                    overshoot: 0.0,
                },
                nova(80.0, 1.6, HitPayload::NONE),
                Step::Recover { duration: 0.4 },
            ],
        )),
        // ===== phase 2 =====
        Box::new(
            Formation::new(
                PatternId::RingCollapse,
                Layout::Ring {
                    count: 16,
                    radius: 220.0,
                },
                Anchor::Target,
                FormationShot::Projectile {
                    spec: ProjectileSpec::new(160.0, 0.8).radius(8.0),
                    heading: Heading::Inward,
                },
            )
            .stagger(0.03),
        ),
        Box::new(
            Formation::new(
                PatternId::CrossFire,
                Layout::Cross {
                    per_arm: 4,
                    spacing: 55.0,
                },
                Anchor::Target,
                FormationShot::Blast {
                    spec: BlastSpec::new(32.0, 1.2),
                    warn: 0.7,
                },
            )
            .stagger(0.04),
        ),
        Box::new(
            Formation::new(
                PatternId::MeteorRain,
                Layout::Scatter {
                    count: 8,
                    radius: 160.0,
                },
                Anchor::Target,
                FormationShot::Blast {
                    spec: BlastSpec::new(50.0, 1.5),
                    warn: 0.6,
                },
            )
            .stagger(0.2)
            .mobile(),
        ),
        Box::new(Choreography::new(PatternId::DoubleCharge, {
            let mut steps = charge(3.2, 0.6).to_vec();
            steps.push(cleave(1.2, HitPayload::knockback(180.0)));
            steps.push(Step::Windup {
                duration: 0.3,
                mark: Some(WindupMark::Lane { width: 48.0 }),
            });
            steps.push(Step::Dash {
                speed_scale: 3.6,
                max_time: 0.5,
                arrive: 36.0,
                overshoot: 0.0,
            });
            steps.push(cleave(1.4, HitPayload::knockback(220.0)));
            steps.push(Step::Recover { duration: 0.3 });
            steps
        })),
        Box::new(
            Formation::new(
                PatternId::PillarLine,
                Layout::Pillars {
                    count: 7,
                    spacing: 60.0,
                },
                Anchor::Owner,
                FormationShot::Blast {
                    spec: BlastSpec::new(40.0, 1.3),
                    warn: 0.5,
                },
            )
            .stagger(0.12),
        ),
        Box::new(
            DelayedTelegraph::new(
                PatternId::Shockwave,
                Area::Ring {
                    inner: 80.0,
                    outer: 220.0,
                },
                1.0,
                1.8,
            )
            .anchored(Anchor::Owner)
            .payload(HitPayload::knockback(240.0)),
        ),
        // ===== phase 3 =====
        Box::new(
            Formation::new(
                PatternId::Pentagram,
                Layout::Pentagram {
                    radius: 180.0,
                    per_edge: 4,
                },
                Anchor::Target,
                FormationShot::Blast {
                    spec: BlastSpec::new(36.0, 1.4),
                    warn: 0.8,
                },
            )
            .stagger(0.03),
        ),
        Box::new(
            TimedBurst::new(PatternId::BulletHell, ProjectileSpec::new(180.0, 0.5).radius(5.0))
                .volleys(8, 0.2)
                .radial(16)
                .spin(0.2),
        ),
        Box::new(
            DelayedTelegraph::new(PatternId::Annihilation, Area::Circle { radius: 260.0 }, 2.0, 4.0)
                .anchored(Anchor::Owner),
        ),
        Box::new(
            Formation::new(
                PatternId::GridLockdown,
                Layout::Grid {
                    cols: 5,
                    rows: 5,
                    spacing: 70.0,
                },
                Anchor::Target,
                FormationShot::Blast {
                    spec: BlastSpec::new(30.0, 1.2),
                    warn: 0.6,
                },
            )
            .stagger(0.05),
        ),
        Box::new(Choreography::new(
            PatternId::BlinkStrike,
            vec![
                Step::Teleport {
                    distance: 60.0,
                    behind: true,
                },
                Step::Wait { duration: 0.15 },
                Step::Strike(StrikeSpec::Melee {
                    reach: 50.0,
                    half_extents: Vec2::new(36.0, 36.0),
                    cleave: false,
                    damage_scale: 2.2,
                    payload: HitPayload::stun(0.4),
                }),
                Step::Recover { duration: 0.4 },
            ],
        )),
    ]
}

fn archetype_patterns() -> Vec<Box<dyn Pattern>> {
    let burn = HitPayload::effect(StatusEffect::burn(6.0), 3.0);
    let chill = HitPayload::slow(0.4, 2.0);
    let venom = HitPayload::effect(StatusEffect::poison(5.0), 4.0);

    vec![
        // ===== flame warden =====
        Box::new(
            TimedBurst::new(PatternId::FlameWave, ProjectileSpec::new(260.0, 0.8).payload(burn))
                .volleys(3, 0.3)
                .fan(7, 1.0),
        ),
        Box::new(
            Formation::new(
                PatternId::Firewall,
                Layout::Pillars {
                    count: 6,
                    spacing: 50.0,
                },
                Anchor::Owner,
                FormationShot::Blast {
                    spec: BlastSpec::new(34.0, 0.4)
                        .linger(3.0, 0.5)
                        .payload(burn),
                    warn: 0.4,
                },
            )
            .stagger(0.08),
        ),
        Box::new(
            Formation::new(
                PatternId::Inferno,
                Layout::Spiral {
                    count: 14,
                    turns: 1.5,
                    radius: 200.0,
                },
                Anchor::Owner,
                FormationShot::Blast {
                    spec: BlastSpec::new(40.0, 0.6)
                        .linger(2.0, 0.5)
                        .payload(burn),
                    warn: 0.5,
                },
            )
            .stagger(0.1),
        ),
        // ===== frost matriarch =====
        Box::new(
            TimedBurst::new(
                PatternId::IceShards,
                ProjectileSpec::new(360.0, 0.9).piercing().payload(chill),
            )
            .volleys(3, 0.35)
            .fan(3, 0.4),
        ),
        Box::new(
            DelayedTelegraph::new(
                PatternId::FrozenPrison,
                Area::Ring {
                    inner: 0.0,
                    outer: 90.0,
                },
                1.1,
                1.2,
            )
            .follow(0.5)
            .payload(HitPayload::stun(1.5)),
        ),
        Box::new(
            Formation::new(
                PatternId::Blizzard,
                Layout::Scatter {
                    count: 14,
                    radius: 220.0,
                },
                Anchor::Target,
                FormationShot::Blast {
                    spec: BlastSpec::new(45.0, 0.9).payload(chill),
                    warn: 0.5,
                },
            )
            .stagger(0.12)
            .mobile(),
        ),
        // ===== storm herald =====
        Box::new(
            TimedBurst::new(
                PatternId::ChainLightning,
                ProjectileSpec::new(300.0, 1.0).homing(2.5).explode(40.0),
            )
            .volleys(3, 0.4),
        ),
        Box::new(
            DelayedTelegraph::new(PatternId::ThunderStrike, Area::Circle { radius: 60.0 }, 0.8, 2.2)
                .follow(0.4)
                .payload(HitPayload::stun(0.5)),
        ),
        Box::new(
            TimedBurst::new(
                PatternId::Tempest,
                ProjectileSpec::new(240.0, 0.7).homing(1.5),
            )
            .volleys(4, 0.35)
            .radial(10),
        ),
        // ===== venom queen =====
        Box::new(
            Formation::new(
                PatternId::ToxicPools,
                Layout::Scatter {
                    count: 5,
                    radius: 120.0,
                },
                Anchor::Target,
                FormationShot::Blast {
                    spec: BlastSpec::new(50.0, 0.3).linger(4.0, 0.5).payload(venom),
                    warn: 0.5,
                },
            )
            .stagger(0.1),
        ),
        Box::new(
            DelayedTelegraph::new(
                PatternId::VenomSpray,
                Area::Cone {
                    length: 220.0,
                    half_angle: 0.5,
                },
                0.7,
                1.3,
            )
            .anchored(Anchor::Owner)
            .follow(0.3)
            .payload(venom),
        ),
        Box::new(
            Formation::new(
                PatternId::Plague,
                Layout::Ring {
                    count: 8,
                    radius: 130.0,
                },
                Anchor::Owner,
                FormationShot::Projectile {
                    spec: ProjectileSpec::new(150.0, 0.6).on_hit(OnHit::SpawnZone(ZoneSpec {
                        radius: 45.0,
                        duration: 3.0,
                        tick_rate: 0.5,
                        damage: 4.0,
                        payload: venom,
                    })),
                    heading: Heading::AtTarget,
                },
            )
            .stagger(0.1),
        ),
        // ===== shadow reaver =====
        Box::new(
            Formation::new(
                PatternId::ShadowClones,
                Layout::Ring {
                    count: 4,
                    radius: 160.0,
                },
                Anchor::Target,
                FormationShot::Projectile {
                    spec: ProjectileSpec::new(260.0, 1.1)
                        .on_hit(OnHit::Lifesteal { fraction: 0.5 }),
                    heading: Heading::Inward,
                },
            )
            .stagger(0.25),
        ),
        Box::new(
            DelayedTelegraph::new(PatternId::VoidRift, Area::Circle { radius: 90.0 }, 0.9, 1.0)
                .follow(0.4)
                .linger(BlastSpec::new(90.0, 0.3).linger(2.5, 0.5).pull(420.0)),
        ),
        Box::new(Choreography::new(
            PatternId::Eclipse,
            vec![
                Step::Teleport {
                    distance: 120.0,
                    behind: true,
                },
                Step::Windup {
                    duration: 0.4,
                    mark: Some(WindupMark::Circle { radius: 150.0 }),
                },
                nova(150.0, 1.8, HitPayload::NONE),
                Step::Teleport {
                    distance: 120.0,
                    behind: true,
                },
                Step::Windup {
                    duration: 0.4,
                    mark: Some(WindupMark::Circle { radius: 150.0 }),
                },
                nova(150.0, 1.8, HitPayload::slow(0.5, 2.0)),
                Step::Recover { duration: 0.4 },
            ],
        )),
        // ===== stone colossus =====
        Box::new(Choreography::new(
            PatternId::Earthquake,
            vec![
                Step::Windup {
                    duration: 0.8,
                    mark: Some(WindupMark::Circle { radius: 180.0 }),
                },
                nova(180.0, 1.3, HitPayload::stun(0.6)),
                Step::Recover { duration: 0.5 },
            ],
        )),
        Box::new(
            TimedBurst::new(
                PatternId::BoulderToss,
                ProjectileSpec::new(180.0, 1.8).radius(16.0).explode(60.0),
            )
            .volleys(2, 0.7)
            .windup(0.5),
        ),
        Box::new(
            Formation::new(
                PatternId::Avalanche,
                Layout::Pillars {
                    count: 8,
                    spacing: 55.0,
                },
                Anchor::Owner,
                FormationShot::Blast {
                    spec: BlastSpec::new(48.0, 1.6).payload(HitPayload::knockback(300.0)),
                    warn: 0.6,
                },
            )
            .stagger(0.1),
        ),
    ]
}
