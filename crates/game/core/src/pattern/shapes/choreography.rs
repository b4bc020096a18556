use glam::Vec2;

use crate::combat::{AttackDescriptor, AttackShape, HitPayload};
use crate::env::RngOracle;
use crate::pattern::shapes::{BlastSpec, ProjectileSpec, fan_directions};
use crate::pattern::{
    Pattern, PatternContext, PatternId, PatternOutput, PatternRun, PatternState, Progress,
};
use crate::state::{Telegraph, TelegraphShape, direction_or};

/// Telegraph drawn during a windup.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WindupMark {
    /// Charge lane toward the locked destination.
    Lane { width: f32 },
    /// Circle around the boss.
    Circle { radius: f32 },
}

/// What a strike step emits.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StrikeSpec {
    Melee {
        reach: f32,
        half_extents: Vec2,
        cleave: bool,
        damage_scale: f32,
        payload: HitPayload,
    },
    /// Area burst centered on the boss.
    Nova(BlastSpec),
    /// Full ring of projectiles.
    Ring { count: u32, projectile: ProjectileSpec },
}

/// One step of a choreography.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Step {
    /// Stand still; locks the charge destination on entry.
    Windup { duration: f32, mark: Option<WindupMark> },
    /// Move toward the locked destination until within `arrive` or
    /// `max_time` elapses. `overshoot` extends the destination past the
    /// target; a windup right before the dash locks it already extended.
    Dash {
        speed_scale: f32,
        max_time: f32,
        arrive: f32,
        overshoot: f32,
    },
    Strike(StrikeSpec),
    /// Blink to `distance` from the target; `behind` picks the far side.
    Teleport { distance: f32, behind: bool },
    Wait { duration: f32 },
    Recover { duration: f32 },
}

/// A fixed list of steps driven by elapsed time or arrival distance.
#[derive(Clone, Debug, PartialEq)]
pub struct Choreography {
    pub id: PatternId,
    pub steps: Vec<Step>,
}

impl Choreography {
    pub fn new(id: PatternId, steps: Vec<Step>) -> Self {
        Self { id, steps }
    }

    fn destination(ctx: &PatternContext, overshoot: f32) -> Vec2 {
        let target = ctx.aim_point();
        target + direction_or(target - ctx.position, ctx.facing) * overshoot
    }

    /// Overshoot of the dash that directly follows step `index`, if any.
    fn dash_overshoot_after(&self, index: usize) -> f32 {
        match self.steps.get(index + 1) {
            Some(Step::Dash { overshoot, .. }) => *overshoot,
            _ => 0.0,
        }
    }

    fn strike(&self, spec: &StrikeSpec, ctx: &PatternContext, out: &mut PatternOutput) {
        match *spec {
            StrikeSpec::Melee {
                reach,
                half_extents,
                cleave,
                damage_scale,
                payload,
            } => {
                let facing = ctx.aim_dir();
                out.facing = Some(facing);
                out.attacks.push(
                    AttackDescriptor::melee(ctx.owner, ctx.position, facing, reach, ctx.damage * damage_scale)
                        .with_shape(AttackShape::Melee {
                            reach,
                            half_extents,
                            lifetime: 0.12,
                            cleave,
                        })
                        .with_element(ctx.element)
                        .with_payload(payload),
                );
            }
            StrikeSpec::Nova(blast) => out.attacks.push(blast.detonate(ctx, ctx.position)),
            StrikeSpec::Ring { count, projectile } => {
                for dir in fan_directions(0.0, count, None) {
                    out.attacks.push(projectile.launch(ctx, ctx.position, dir));
                }
            }
        }
    }
}

impl Pattern for Choreography {
    fn id(&self) -> PatternId {
        self.id
    }

    fn enter(&self, _ctx: &PatternContext, _rng: &mut dyn RngOracle) -> PatternState {
        PatternState::Choreography {
            step_elapsed: 0.0,
            locked: None,
        }
    }

    fn tick(
        &self,
        run: &mut PatternRun,
        ctx: &PatternContext,
        _rng: &mut dyn RngOracle,
        out: &mut PatternOutput,
    ) -> Progress {
        let PatternState::Choreography {
            step_elapsed,
            locked,
        } = &mut run.state
        else {
            return Progress::Done;
        };
        let Some(step) = self.steps.get(run.step as usize) else {
            return Progress::Done;
        };

        *step_elapsed += ctx.dt;
        let finished = match *step {
            Step::Windup { duration, mark } => {
                let overshoot = self.dash_overshoot_after(run.step as usize);
                let destination =
                    *locked.get_or_insert_with(|| Self::destination(ctx, overshoot));
                out.velocity = Some(Vec2::ZERO);
                out.facing = Some(direction_or(destination - ctx.position, ctx.facing));
                let remaining = (duration - *step_elapsed).max(0.0);
                out.telegraph = mark.map(|mark| match mark {
                    WindupMark::Lane { width } => Telegraph {
                        shape: TelegraphShape::Line {
                            width,
                            dir: direction_or(destination - ctx.position, ctx.facing),
                        },
                        center: ctx.position,
                        radius: ctx.position.distance(destination),
                        color: ctx.element.color(),
                        remaining,
                    },
                    WindupMark::Circle { radius } => Telegraph {
                        shape: TelegraphShape::Circle,
                        center: ctx.position,
                        radius,
                        color: ctx.element.color(),
                        remaining,
                    },
                });
                *step_elapsed >= duration
            }
            Step::Dash {
                speed_scale,
                max_time,
                arrive,
                overshoot,
            } => {
                let destination = *locked.get_or_insert_with(|| Self::destination(ctx, overshoot));
                let offset = destination - ctx.position;
                let arrived = offset.length() <= arrive;
                if arrived {
                    out.velocity = Some(Vec2::ZERO);
                } else {
                    let dir = direction_or(offset, ctx.facing);
                    out.velocity = Some(dir * ctx.speed * speed_scale);
                    out.facing = Some(dir);
                }
                arrived || *step_elapsed >= max_time
            }
            Step::Strike(spec) => {
                out.velocity = Some(Vec2::ZERO);
                self.strike(&spec, ctx, out);
                true
            }
            Step::Teleport { distance, behind } => {
                if let Some(target) = ctx.target {
                    let from_target = direction_or(ctx.position - target.position, -ctx.facing);
                    let side = if behind { -from_target } else { from_target };
                    let point = target.position + side * distance;
                    out.teleport = Some(point);
                    out.facing = Some(direction_or(target.position - point, ctx.facing));
                }
                out.velocity = Some(Vec2::ZERO);
                true
            }
            Step::Wait { duration } | Step::Recover { duration } => {
                out.velocity = Some(Vec2::ZERO);
                *step_elapsed >= duration
            }
        };

        if finished {
            // A new dash or windup re-locks its destination.
            if matches!(step, Step::Dash { .. } | Step::Strike(_)) {
                *locked = None;
            }
            *step_elapsed = 0.0;
            run.step += 1;
        }

        if run.step as usize >= self.steps.len() {
            Progress::Done
        } else {
            Progress::Continue
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::shapes::testing::{ctx_with_target, run_to_end};

    fn charge() -> Choreography {
        Choreography::new(
            PatternId::ChargeSlam,
            vec![
                Step::Windup {
                    duration: 0.2,
                    mark: Some(WindupMark::Lane { width: 40.0 }),
                },
                Step::Dash {
                    speed_scale: 3.0,
                    max_time: 0.5,
                    arrive: 30.0,
                    overshoot: 0.0,
                },
                Step::Strike(StrikeSpec::Nova(BlastSpec::new(80.0, 1.5))),
                Step::Recover { duration: 0.2 },
            ],
        )
    }

    #[test]
    fn windup_shows_lane_and_holds_still() {
        let pattern = charge();
        let ctx = ctx_with_target(Vec2::new(300.0, 0.0));
        let (outputs, done) = run_to_end(&pattern, &ctx, 3.0);

        assert!(done.is_some());
        assert!(matches!(
            outputs[0].telegraph.map(|t| t.shape),
            Some(TelegraphShape::Line { .. })
        ));
        assert_eq!(outputs[0].velocity, Some(Vec2::ZERO));
    }

    #[test]
    fn dash_moves_toward_target_then_strikes() {
        let pattern = charge();
        let ctx = ctx_with_target(Vec2::new(300.0, 0.0));
        let (outputs, _) = run_to_end(&pattern, &ctx, 3.0);

        let dashing = outputs
            .iter()
            .find_map(|o| o.velocity.filter(|v| v.x > 0.0));
        assert!(dashing.is_some());
        let strikes: usize = outputs.iter().map(|o| o.attacks.len()).sum();
        assert_eq!(strikes, 1);
    }

    #[test]
    fn windup_locks_destination_past_target() {
        let pattern = Choreography::new(
            PatternId::ChargeSlam,
            vec![
                Step::Windup {
                    duration: 0.1,
                    mark: Some(WindupMark::Lane { width: 40.0 }),
                },
                Step::Dash {
                    speed_scale: 3.0,
                    max_time: 0.2,
                    arrive: 10.0,
                    overshoot: 60.0,
                },
            ],
        );
        let ctx = ctx_with_target(Vec2::new(300.0, 0.0));
        let (outputs, _) = run_to_end(&pattern, &ctx, 1.0);

        let lane = outputs[0].telegraph.map(|t| t.radius);
        assert_eq!(lane, Some(360.0));
        // Standing on the target does not count as arriving.
        let at_target = PatternContext {
            position: Vec2::new(300.0, 0.0),
            ..ctx
        };
        let mut rng = crate::env::PcgRng::new(3);
        let mut run = PatternRun::new(pattern.id(), pattern.enter(&at_target, &mut rng));
        run.state = PatternState::Choreography {
            step_elapsed: 0.0,
            locked: Some(Vec2::new(360.0, 0.0)),
        };
        run.step = 1;
        let mut out = PatternOutput::default();
        pattern.tick(&mut run, &at_target, &mut rng, &mut out);
        assert!(out.velocity.is_some_and(|v| v.x > 0.0));
    }

    #[test]
    fn teleport_lands_behind_target() {
        let pattern = Choreography::new(
            PatternId::BlinkStrike,
            vec![Step::Teleport {
                distance: 50.0,
                behind: true,
            }],
        );
        let ctx = ctx_with_target(Vec2::new(200.0, 0.0));
        let (outputs, _) = run_to_end(&pattern, &ctx, 1.0);
        assert_eq!(outputs[0].teleport, Some(Vec2::new(250.0, 0.0)));
    }
}
