use glam::Vec2;

use crate::combat::{AttackDescriptor, HitPayload};
use crate::env::RngOracle;
use crate::pattern::shapes::{Anchor, BlastSpec};
use crate::pattern::{
    Pattern, PatternContext, PatternId, PatternOutput, PatternRun, PatternState, Progress,
};
use crate::state::{Telegraph, TelegraphShape, direction_or};

/// Footprint of a delayed effect.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Area {
    Circle { radius: f32 },
    Ring { inner: f32, outer: f32 },
    Line { length: f32, width: f32 },
    Cone { length: f32, half_angle: f32 },
}

impl Area {
    fn telegraph(self, center: Vec2, dir: Vec2, color: u32, remaining: f32) -> Telegraph {
        let (shape, radius) = match self {
            Area::Circle { radius } => (TelegraphShape::Circle, radius),
            Area::Ring { inner, outer } => (TelegraphShape::Ring { inner }, outer),
            Area::Line { length, width } => (TelegraphShape::Line { width, dir }, length),
            Area::Cone { length, half_angle } => (TelegraphShape::Cone { half_angle, dir }, length),
        };
        Telegraph {
            shape,
            center,
            radius,
            color,
            remaining,
        }
    }
}

/// Shows a warning, then lands one effect if the target is still inside.
///
/// The warning follows its anchor for `follow` seconds, then locks. At
/// `delay` the effect resolves as a direct hit on the target, optionally
/// leaving a lingering zone regardless of the outcome.
#[derive(Clone, Debug, PartialEq)]
pub struct DelayedTelegraph {
    pub id: PatternId,
    pub area: Area,
    pub anchor: Anchor,
    pub follow: f32,
    pub delay: f32,
    pub damage_scale: f32,
    pub payload: HitPayload,
    pub linger: Option<BlastSpec>,
    pub root: bool,
}

impl DelayedTelegraph {
    pub fn new(id: PatternId, area: Area, delay: f32, damage_scale: f32) -> Self {
        Self {
            id,
            area,
            anchor: Anchor::Target,
            follow: 0.0,
            delay,
            damage_scale,
            payload: HitPayload::NONE,
            linger: None,
            root: true,
        }
    }

    pub fn anchored(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn follow(mut self, seconds: f32) -> Self {
        self.follow = seconds;
        self
    }

    pub fn payload(mut self, payload: HitPayload) -> Self {
        self.payload = payload;
        self
    }

    pub fn linger(mut self, blast: BlastSpec) -> Self {
        self.linger = Some(blast);
        self
    }

    pub fn mobile(mut self) -> Self {
        self.root = false;
        self
    }
}

impl Pattern for DelayedTelegraph {
    fn id(&self) -> PatternId {
        self.id
    }

    fn enter(&self, ctx: &PatternContext, _rng: &mut dyn RngOracle) -> PatternState {
        PatternState::Telegraph {
            elapsed: 0.0,
            center: self.anchor.point(ctx),
            dir: ctx.aim_dir(),
        }
    }

    fn tick(
        &self,
        run: &mut PatternRun,
        ctx: &PatternContext,
        _rng: &mut dyn RngOracle,
        out: &mut PatternOutput,
    ) -> Progress {
        let PatternState::Telegraph {
            elapsed,
            center,
            dir,
        } = &mut run.state
        else {
            return Progress::Done;
        };

        *elapsed += ctx.dt;
        if *elapsed <= self.follow {
            *center = self.anchor.point(ctx);
            *dir = ctx.aim_dir();
        }
        if self.root {
            out.velocity = Some(Vec2::ZERO);
        }
        out.facing = Some(direction_or(*dir, ctx.facing));

        let telegraph = self.area.telegraph(
            *center,
            *dir,
            ctx.element.color(),
            (self.delay - *elapsed).max(0.0),
        );

        if *elapsed < self.delay {
            out.telegraph = Some(telegraph);
            run.step = 0;
            return Progress::Continue;
        }

        run.step = 1;
        if let Some(target) = ctx.target.filter(|t| telegraph.contains(t.position)) {
            out.attacks.push(
                AttackDescriptor::direct(ctx.owner, *center, target.id, ctx.damage * self.damage_scale)
                    .with_element(ctx.element)
                    .with_payload(self.payload),
            );
        }
        if let Some(blast) = self.linger {
            out.attacks.push(blast.detonate(ctx, *center));
        }
        Progress::Done
    }
}
