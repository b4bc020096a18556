use crate::env::RngOracle;
use crate::pattern::shapes::{ProjectileSpec, fan_directions};
use crate::pattern::{
    Pattern, PatternContext, PatternId, PatternOutput, PatternRun, PatternState, Progress,
};

/// Base direction of each volley.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BurstAim {
    /// Re-aimed at the target for every shot; `spread` radians across the fan.
    Target { spread: f32 },
    /// Full circle around the boss.
    Radial,
}

/// Fires `shots` volleys of `fan` projectiles every `interval` seconds.
#[derive(Clone, Debug, PartialEq)]
pub struct TimedBurst {
    pub id: PatternId,
    pub windup: f32,
    pub interval: f32,
    pub shots: u32,
    pub fan: u32,
    pub aim: BurstAim,
    /// Radians added to the base angle after every volley.
    pub spin: f32,
    pub projectile: ProjectileSpec,
    /// Stand still while firing.
    pub root: bool,
}

impl TimedBurst {
    pub fn new(id: PatternId, projectile: ProjectileSpec) -> Self {
        Self {
            id,
            windup: 0.2,
            interval: 0.3,
            shots: 3,
            fan: 1,
            aim: BurstAim::Target { spread: 0.0 },
            spin: 0.0,
            projectile,
            root: true,
        }
    }

    pub fn volleys(mut self, shots: u32, interval: f32) -> Self {
        self.shots = shots.max(1);
        self.interval = interval;
        self
    }

    pub fn fan(mut self, count: u32, spread: f32) -> Self {
        self.fan = count.max(1);
        self.aim = BurstAim::Target { spread };
        self
    }

    pub fn radial(mut self, count: u32) -> Self {
        self.fan = count.max(1);
        self.aim = BurstAim::Radial;
        self
    }

    pub fn spin(mut self, radians: f32) -> Self {
        self.spin = radians;
        self
    }

    pub fn windup(mut self, seconds: f32) -> Self {
        self.windup = seconds;
        self
    }

    pub fn mobile(mut self) -> Self {
        self.root = false;
        self
    }

    fn fire(&self, ctx: &PatternContext, spin: f32, out: &mut PatternOutput) {
        let (base, spread) = match self.aim {
            BurstAim::Target { spread } => (ctx.aim_dir().to_angle() + spin, Some(spread)),
            BurstAim::Radial => (spin, None),
        };
        for dir in fan_directions(base, self.fan, spread) {
            out.attacks.push(self.projectile.launch(ctx, ctx.position, dir));
        }
    }
}

impl Pattern for TimedBurst {
    fn id(&self) -> PatternId {
        self.id
    }

    fn enter(&self, _ctx: &PatternContext, _rng: &mut dyn RngOracle) -> PatternState {
        PatternState::Burst {
            fired: 0,
            timer: self.windup,
            heading: 0.0,
        }
    }

    fn tick(
        &self,
        run: &mut PatternRun,
        ctx: &PatternContext,
        _rng: &mut dyn RngOracle,
        out: &mut PatternOutput,
    ) -> Progress {
        let PatternState::Burst {
            fired,
            timer,
            heading,
        } = &mut run.state
        else {
            return Progress::Done;
        };

        if self.root {
            out.velocity = Some(glam::Vec2::ZERO);
        }
        out.facing = Some(ctx.aim_dir());

        *timer -= ctx.dt;
        if *timer <= 0.0 {
            self.fire(ctx, *heading, out);
            *fired += 1;
            *heading += self.spin;
            *timer += self.interval;
            run.step = *fired;
        }

        if *fired >= self.shots {
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
    use glam::Vec2;

    #[test]
    fn fires_every_volley_then_ends() {
        let pattern = TimedBurst::new(PatternId::SpreadShot, ProjectileSpec::new(300.0, 1.0))
            .volleys(3, 0.2)
            .fan(5, 0.8);
        let ctx = ctx_with_target(Vec2::new(200.0, 0.0));
        let (outputs, done) = run_to_end(&pattern, &ctx, 3.0);

        assert!(done.is_some());
        let shots: usize = outputs.iter().map(|o| o.attacks.len()).sum();
        assert_eq!(shots, 15);
    }

    #[test]
    fn radial_covers_full_circle() {
        let pattern = TimedBurst::new(PatternId::RadialBurst, ProjectileSpec::new(200.0, 1.0))
            .volleys(1, 0.1)
            .radial(4)
            .windup(0.0);
        let ctx = ctx_with_target(Vec2::new(200.0, 0.0));
        let (outputs, _) = run_to_end(&pattern, &ctx, 1.0);
        let sum = outputs
            .iter()
            .flat_map(|o| o.attacks.iter())
            .filter_map(|a| match a.aim {
                crate::combat::Aim::Direction(d) => Some(d),
                _ => None,
            })
            .fold(Vec2::ZERO, |acc, d| acc + d);
        assert!(sum.length() < 1e-3);
    }
}
