//! Generic pattern shapes.
//!
//! - [`TimedBurst`]: fires projectile volleys on an interval
//! - [`Choreography`]: windup → dash → strike → recover style step lists
//! - [`DelayedTelegraph`]: warns, then lands one effect if the target stayed
//!   inside
//! - [`Formation`]: precomputed positions and delays (rings, grids,
//!   pentagrams, pillars, spirals, crosses, scatters)

mod burst;
mod choreography;
mod formation;
mod telegraph;

pub use burst::{BurstAim, TimedBurst};
pub use choreography::{Choreography, Step, StrikeSpec, WindupMark};
pub use formation::{Formation, FormationShot, Heading, Layout};
pub use telegraph::{Area, DelayedTelegraph};

use glam::Vec2;

use crate::combat::{Aim, AttackDescriptor, AttackShape, HitPayload, OnHit};
use crate::pattern::PatternContext;

/// Where a shape centers itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Anchor {
    Owner,
    Target,
}

impl Anchor {
    pub fn point(self, ctx: &PatternContext) -> Vec2 {
        match self {
            Anchor::Owner => ctx.position,
            Anchor::Target => ctx.aim_point(),
        }
    }
}

/// Projectile parameters relative to the boss's base damage.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSpec {
    pub speed: f32,
    pub radius: f32,
    pub lifetime: f32,
    pub damage_scale: f32,
    pub piercing: bool,
    pub homing: bool,
    pub turn_rate: f32,
    pub aoe_radius: f32,
    pub payload: HitPayload,
    pub on_hit: Option<OnHit>,
}

impl ProjectileSpec {
    pub const fn new(speed: f32, damage_scale: f32) -> Self {
        Self {
            speed,
            radius: 7.0,
            lifetime: 3.0,
            damage_scale,
            piercing: false,
            homing: false,
            turn_rate: 0.0,
            aoe_radius: 0.0,
            payload: HitPayload::NONE,
            on_hit: None,
        }
    }

    pub const fn radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    pub const fn piercing(mut self) -> Self {
        self.piercing = true;
        self
    }

    pub const fn homing(mut self, turn_rate: f32) -> Self {
        self.homing = true;
        self.turn_rate = turn_rate;
        self
    }

    pub const fn explode(mut self, radius: f32) -> Self {
        self.aoe_radius = radius;
        self
    }

    pub const fn payload(mut self, payload: HitPayload) -> Self {
        self.payload = payload;
        self
    }

    pub const fn on_hit(mut self, hook: OnHit) -> Self {
        self.on_hit = Some(hook);
        self
    }

    /// Descriptor launched from `origin` along `dir`. Homing shots steer
    /// toward the context target.
    pub fn launch(&self, ctx: &PatternContext, origin: Vec2, dir: Vec2) -> AttackDescriptor {
        let homing = if self.homing {
            ctx.target.map(|t| t.id)
        } else {
            None
        };
        let mut descriptor = AttackDescriptor::projectile(
            ctx.owner,
            origin,
            Aim::Direction(dir),
            self.speed,
            ctx.damage * self.damage_scale,
        )
        .with_shape(AttackShape::Projectile {
            speed: self.speed,
            radius: self.radius,
            lifetime: self.lifetime,
            max_range: f32::INFINITY,
            piercing: self.piercing,
            homing,
            turn_rate: self.turn_rate,
        })
        .with_element(ctx.element)
        .with_payload(self.payload)
        .with_aoe_radius(self.aoe_radius);
        if let Some(hook) = self.on_hit {
            descriptor = descriptor.with_on_hit(hook);
        }
        descriptor
    }
}

/// Area burst parameters relative to the boss's base damage.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlastSpec {
    pub radius: f32,
    pub damage_scale: f32,
    /// Zone lifetime; 0 resolves once.
    pub duration: f32,
    pub tick_rate: f32,
    pub pull: f32,
    pub payload: HitPayload,
}

impl BlastSpec {
    pub const fn new(radius: f32, damage_scale: f32) -> Self {
        Self {
            radius,
            damage_scale,
            duration: 0.0,
            tick_rate: 0.0,
            pull: 0.0,
            payload: HitPayload::NONE,
        }
    }

    /// Turns the blast into a lingering zone.
    pub const fn linger(mut self, duration: f32, tick_rate: f32) -> Self {
        self.duration = duration;
        self.tick_rate = tick_rate;
        self
    }

    pub const fn pull(mut self, strength: f32) -> Self {
        self.pull = strength;
        self
    }

    pub const fn payload(mut self, payload: HitPayload) -> Self {
        self.payload = payload;
        self
    }

    pub fn detonate(&self, ctx: &PatternContext, center: Vec2) -> AttackDescriptor {
        AttackDescriptor::aoe(ctx.owner, center, self.radius, ctx.damage * self.damage_scale)
            .with_shape(AttackShape::Aoe {
                radius: self.radius,
                duration: self.duration,
                tick_rate: self.tick_rate,
                pull: self.pull,
                heal: false,
                friendly_fire: false,
            })
            .with_element(ctx.element)
            .with_payload(self.payload)
    }
}

/// Evenly spread directions: a fan of `count` over `spread` radians around
/// `base`, or a full circle when `spread` is `None`.
pub fn fan_directions(base: f32, count: u32, spread: Option<f32>) -> impl Iterator<Item = Vec2> {
    let count = count.max(1);
    (0..count).map(move |k| {
        let angle = match spread {
            None => base + std::f32::consts::TAU * k as f32 / count as f32,
            Some(_) if count == 1 => base,
            Some(spread) => base - spread * 0.5 + spread * k as f32 / (count - 1) as f32,
        };
        Vec2::from_angle(angle)
    })
}

#[cfg(test)]
pub(crate) mod testing {
    use glam::Vec2;

    use crate::combat::{Element, Owner};
    use crate::env::PcgRng;
    use crate::pattern::{Pattern, PatternContext, PatternOutput, PatternRun, Progress};
    use crate::state::{CombatStats, Combatant, EntityId, Side, TargetInfo};

    pub fn ctx_with_target(target_at: Vec2) -> PatternContext {
        let target = Combatant::new(EntityId(1), "hero", Side::Players, CombatStats::default())
            .at(target_at);
        PatternContext {
            owner: Owner::new(EntityId(0), Side::Hostile),
            position: Vec2::ZERO,
            facing: Vec2::X,
            speed: 100.0,
            damage: 20.0,
            element: Element::Fire,
            phase: 1,
            target: Some(TargetInfo::of(&target)),
            dt: 0.05,
        }
    }

    /// Runs a pattern to completion (or `limit` seconds) and returns every
    /// output plus the number of ticks taken.
    pub fn run_to_end(
        pattern: &dyn Pattern,
        ctx: &PatternContext,
        limit: f32,
    ) -> (Vec<PatternOutput>, Option<f32>) {
        let mut rng = PcgRng::new(3);
        let mut run = PatternRun::new(pattern.id(), pattern.enter(ctx, &mut rng));
        let mut outputs = Vec::new();
        let mut elapsed = 0.0;
        while elapsed < limit {
            elapsed += ctx.dt;
            let mut out = PatternOutput::default();
            let progress = pattern.tick(&mut run, ctx, &mut rng, &mut out);
            outputs.push(out);
            if progress == Progress::Done {
                return (outputs, Some(elapsed));
            }
        }
        (outputs, None)
    }
}
