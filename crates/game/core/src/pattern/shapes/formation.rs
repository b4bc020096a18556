use std::f32::consts::{PI, TAU};

use glam::Vec2;

use crate::env::RngOracle;
use crate::pattern::shapes::{Anchor, BlastSpec, ProjectileSpec};
use crate::pattern::{
    FormationEntry, Pattern, PatternContext, PatternId, PatternOutput, PatternRun, PatternState,
    Progress,
};
use crate::state::{Telegraph, TelegraphShape, direction_or};

/// Geometric arrangement, relative to the anchor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Layout {
    Ring { count: u32, radius: f32 },
    /// Centered `cols x rows` grid.
    Grid { cols: u32, rows: u32, spacing: f32 },
    /// Five-pointed star; `per_edge` points along each of its five strokes.
    Pentagram { radius: f32, per_edge: u32 },
    /// Line from the boss toward the target.
    Pillars { count: u32, spacing: f32 },
    Spiral { count: u32, turns: f32, radius: f32 },
    /// Four arms of `per_arm` points.
    Cross { per_arm: u32, spacing: f32 },
    /// Uniform random points inside a disc.
    Scatter { count: u32, radius: f32 },
}

impl Layout {
    /// Offsets from the anchor. `toward` orients pillar lines.
    pub fn offsets(self, toward: Vec2, rng: &mut dyn RngOracle) -> Vec<Vec2> {
        match self {
            Layout::Ring { count, radius } => (0..count)
                .map(|i| Vec2::from_angle(TAU * i as f32 / count.max(1) as f32) * radius)
                .collect(),
            Layout::Grid {
                cols,
                rows,
                spacing,
            } => {
                let origin = Vec2::new(
                    (cols.max(1) - 1) as f32 * spacing * 0.5,
                    (rows.max(1) - 1) as f32 * spacing * 0.5,
                );
                (0..rows)
                    .flat_map(|r| (0..cols).map(move |c| (c, r)))
                    .map(|(c, r)| Vec2::new(c as f32 * spacing, r as f32 * spacing) - origin)
                    .collect()
            }
            Layout::Pentagram { radius, per_edge } => {
                let vertex =
                    |i: u32| Vec2::from_angle(-PI / 2.0 + TAU * (i % 5) as f32 / 5.0) * radius;
                let per_edge = per_edge.max(1);
                (0..5)
                    .flat_map(|edge| {
                        let from = vertex(edge * 2);
                        let to = vertex(edge * 2 + 2);
                        (0..per_edge).map(move |k| from.lerp(to, k as f32 / per_edge as f32))
                    })
                    .collect()
            }
            Layout::Pillars { count, spacing } => {
                let dir = direction_or(toward, Vec2::X);
                (1..=count).map(|i| dir * spacing * i as f32).collect()
            }
            Layout::Spiral {
                count,
                turns,
                radius,
            } => (0..count)
                .map(|i| {
                    let t = (i + 1) as f32 / count.max(1) as f32;
                    Vec2::from_angle(t * turns * TAU) * radius * t
                })
                .collect(),
            Layout::Cross { per_arm, spacing } => {
                let mut points = vec![Vec2::ZERO];
                for arm in [Vec2::X, Vec2::Y, Vec2::NEG_X, Vec2::NEG_Y] {
                    points.extend((1..=per_arm).map(|k| arm * spacing * k as f32));
                }
                points
            }
            Layout::Scatter { count, radius } => (0..count)
                .map(|_| {
                    let angle = rng.range_f32(0.0, TAU);
                    let distance = radius * rng.next_f32().sqrt();
                    Vec2::from_angle(angle) * distance
                })
                .collect(),
        }
    }
}

/// Launch direction for projectile formations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Heading {
    Outward,
    Inward,
    /// Toward the target at the moment of firing.
    AtTarget,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FormationShot {
    Projectile { spec: ProjectileSpec, heading: Heading },
    /// Area blast telegraphed for `warn` seconds before it lands.
    Blast { spec: BlastSpec, warn: f32 },
}

/// Spawns at precomputed positions with staggered delays.
#[derive(Clone, Debug, PartialEq)]
pub struct Formation {
    pub id: PatternId,
    pub layout: Layout,
    pub anchor: Anchor,
    /// Seconds between consecutive entries.
    pub stagger: f32,
    pub shot: FormationShot,
    pub root: bool,
}

impl Formation {
    pub fn new(id: PatternId, layout: Layout, anchor: Anchor, shot: FormationShot) -> Self {
        Self {
            id,
            layout,
            anchor,
            stagger: 0.0,
            shot,
            root: true,
        }
    }

    pub fn stagger(mut self, seconds: f32) -> Self {
        self.stagger = seconds;
        self
    }

    pub fn mobile(mut self) -> Self {
        self.root = false;
        self
    }

    fn warn(&self) -> f32 {
        match self.shot {
            FormationShot::Blast { warn, .. } => warn,
            FormationShot::Projectile { .. } => 0.0,
        }
    }
}

impl Pattern for Formation {
    fn id(&self) -> PatternId {
        self.id
    }

    fn enter(&self, ctx: &PatternContext, rng: &mut dyn RngOracle) -> PatternState {
        let anchor = self.anchor.point(ctx);
        let warn = self.warn();
        let entries = self
            .layout
            .offsets(ctx.aim_point() - ctx.position, rng)
            .into_iter()
            .enumerate()
            .map(|(i, offset)| FormationEntry {
                position: anchor + offset,
                delay: warn + self.stagger * i as f32,
                heading: direction_or(offset, Vec2::X),
            })
            .collect();
        PatternState::Formation {
            entries,
            elapsed: 0.0,
            next: 0,
        }
    }

    fn tick(
        &self,
        run: &mut PatternRun,
        ctx: &PatternContext,
        _rng: &mut dyn RngOracle,
        out: &mut PatternOutput,
    ) -> Progress {
        let PatternState::Formation {
            entries,
            elapsed,
            next,
        } = &mut run.state
        else {
            return Progress::Done;
        };

        *elapsed += ctx.dt;
        if self.root {
            out.velocity = Some(Vec2::ZERO);
        }

        while let Some(entry) = entries.get(*next) {
            if entry.delay > *elapsed {
                break;
            }
            match self.shot {
                FormationShot::Projectile { spec, heading } => {
                    let dir = match heading {
                        Heading::Outward => entry.heading,
                        Heading::Inward => -entry.heading,
                        Heading::AtTarget => {
                            direction_or(ctx.aim_point() - entry.position, entry.heading)
                        }
                    };
                    out.attacks.push(spec.launch(ctx, entry.position, dir));
                }
                FormationShot::Blast { spec, .. } => {
                    out.attacks.push(spec.detonate(ctx, entry.position));
                }
            }
            *next += 1;
        }
        run.step = *next as u32;

        if let (FormationShot::Blast { spec, .. }, Some(upcoming)) = (self.shot, entries.get(*next)) {
            out.telegraph = Some(Telegraph {
                shape: TelegraphShape::Circle,
                center: upcoming.position,
                radius: spec.radius,
                color: ctx.element.color(),
                remaining: (upcoming.delay - *elapsed).max(0.0),
            });
        }

        if *next >= entries.len() {
            Progress::Done
        } else {
            Progress::Continue
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::PcgRng;
    use crate::pattern::shapes::testing::{ctx_with_target, run_to_end};

    #[test]
    fn ring_points_sit_on_radius() {
        let mut rng = PcgRng::new(1);
        let points = Layout::Ring {
            count: 8,
            radius: 100.0,
        }
        .offsets(Vec2::X, &mut rng);
        assert_eq!(points.len(), 8);
        assert!(points.iter().all(|p| (p.length() - 100.0).abs() < 1e-3));
    }

    #[test]
    fn grid_is_centered() {
        let mut rng = PcgRng::new(1);
        let points = Layout::Grid {
            cols: 3,
            rows: 3,
            spacing: 10.0,
        }
        .offsets(Vec2::X, &mut rng);
        let sum = points.iter().fold(Vec2::ZERO, |acc, p| acc + *p);
        assert_eq!(points.len(), 9);
        assert!(sum.length() < 1e-3);
    }

    #[test]
    fn pentagram_has_five_strokes() {
        let mut rng = PcgRng::new(1);
        let points = Layout::Pentagram {
            radius: 100.0,
            per_edge: 4,
        }
        .offsets(Vec2::X, &mut rng);
        assert_eq!(points.len(), 20);
    }

    #[test]
    fn scatter_stays_inside_radius() {
        let mut rng = PcgRng::new(5);
        let points = Layout::Scatter {
            count: 50,
            radius: 80.0,
        }
        .offsets(Vec2::X, &mut rng);
        assert!(points.iter().all(|p| p.length() <= 80.0));
    }

    #[test]
    fn pillars_walk_toward_target() {
        let mut rng = PcgRng::new(1);
        let points = Layout::Pillars {
            count: 3,
            spacing: 50.0,
        }
        .offsets(Vec2::new(0.0, 10.0), &mut rng);
        assert_eq!(points, vec![
            Vec2::new(0.0, 50.0),
            Vec2::new(0.0, 100.0),
            Vec2::new(0.0, 150.0)
        ]);
    }

    #[test]
    fn staggered_blasts_fire_in_order_with_warning() {
        let pattern = Formation::new(
            PatternId::MeteorRain,
            Layout::Scatter {
                count: 4,
                radius: 100.0,
            },
            Anchor::Target,
            FormationShot::Blast {
                spec: BlastSpec::new(40.0, 1.0),
                warn: 0.3,
            },
        )
        .stagger(0.2);
        let ctx = ctx_with_target(Vec2::new(200.0, 0.0));
        let (outputs, done) = run_to_end(&pattern, &ctx, 3.0);

        assert!(done.is_some());
        assert!(outputs[0].telegraph.is_some());
        assert!(outputs[0].attacks.is_empty());
        let blasts: usize = outputs.iter().map(|o| o.attacks.len()).sum();
        assert_eq!(blasts, 4);
    }

    #[test]
    fn inward_ring_aims_at_anchor() {
        let pattern = Formation::new(
            PatternId::RingCollapse,
            Layout::Ring {
                count: 4,
                radius: 100.0,
            },
            Anchor::Target,
            FormationShot::Projectile {
                spec: ProjectileSpec::new(150.0, 1.0),
                heading: Heading::Inward,
            },
        );
        let target = Vec2::new(300.0, 0.0);
        let ctx = ctx_with_target(target);
        let (outputs, _) = run_to_end(&pattern, &ctx, 1.0);
        for attack in &outputs[0].attacks {
            let crate::combat::Aim::Direction(dir) = attack.aim else {
                panic!("formation projectiles fly in a direction");
            };
            let to_center = (target - attack.origin).normalize();
            assert!(dir.dot(to_center) > 0.99);
        }
        assert_eq!(outputs[0].attacks.len(), 4);
    }
}
