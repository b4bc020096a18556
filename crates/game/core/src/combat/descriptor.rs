//! Attack descriptors: short-lived values describing one attack awaiting
//! resolution.
//!
//! AI and patterns only ever produce descriptors. The
//! [`ResolutionPipeline`](super::ResolutionPipeline) turns them into live
//! objects or immediate hits.

use glam::Vec2;

use crate::combat::Element;
use crate::state::{EntityId, Side, StatusEffect};

/// Attacker identity used for team filtering and kill attribution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Owner {
    pub id: EntityId,
    pub side: Side,
}

impl Owner {
    pub const fn new(id: EntityId, side: Side) -> Self {
        Self { id, side }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum AttackKind {
    Melee,
    Projectile,
    Aoe,
    Direct,
}

/// Where an attack is pointed.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Aim {
    Point(Vec2),
    Entity(EntityId),
    Direction(Vec2),
}

/// Side effects applied to every primary hit.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HitPayload {
    /// Impulse magnitude pushing the target away from the impact.
    pub knockback: f32,
    /// Stun duration in seconds.
    pub stun: f32,
    /// `(fraction, seconds)`.
    pub slow: Option<(f32, f32)>,
    /// Arbitrary status with its duration.
    pub effect: Option<(StatusEffect, f32)>,
}

impl HitPayload {
    pub const NONE: Self = Self {
        knockback: 0.0,
        stun: 0.0,
        slow: None,
        effect: None,
    };

    pub fn knockback(strength: f32) -> Self {
        Self {
            knockback: strength,
            ..Self::NONE
        }
    }

    pub fn stun(seconds: f32) -> Self {
        Self {
            stun: seconds,
            ..Self::NONE
        }
    }

    pub fn slow(fraction: f32, seconds: f32) -> Self {
        Self {
            slow: Some((fraction, seconds)),
            ..Self::NONE
        }
    }

    pub fn effect(effect: StatusEffect, seconds: f32) -> Self {
        Self {
            effect: Some((effect, seconds)),
            ..Self::NONE
        }
    }

    pub fn is_empty(&self) -> bool {
        self.knockback == 0.0 && self.stun <= 0.0 && self.slow.is_none() && self.effect.is_none()
    }
}

/// Lingering zone spawned by an on-hit hook.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZoneSpec {
    pub radius: f32,
    pub duration: f32,
    pub tick_rate: f32,
    /// Damage per zone tick.
    pub damage: f32,
    pub payload: HitPayload,
}

/// Optional hook run after a primary hit lands.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OnHit {
    /// Heal the owner for a fraction of damage dealt.
    Lifesteal { fraction: f32 },
    /// Leave a zone at the impact point.
    SpawnZone(ZoneSpec),
}

/// Kind-specific parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttackShape {
    /// Axis-aligned box anchored at `owner + facing * reach`.
    Melee {
        reach: f32,
        half_extents: Vec2,
        lifetime: f32,
        cleave: bool,
    },
    Projectile {
        speed: f32,
        radius: f32,
        lifetime: f32,
        max_range: f32,
        piercing: bool,
        /// Entity to steer toward.
        homing: Option<EntityId>,
        /// Radians per second.
        turn_rate: f32,
    },
    /// Zone centered on the aim point (or origin).
    Aoe {
        radius: f32,
        duration: f32,
        /// Seconds between hits on the same target; `<= 0` hits once.
        tick_rate: f32,
        /// Inward pull strength.
        pull: f32,
        heal: bool,
        friendly_fire: bool,
    },
    /// Applied straight to the aimed entity.
    Direct,
}

/// One attack awaiting resolution.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackDescriptor {
    pub owner: Owner,
    pub shape: AttackShape,
    pub origin: Vec2,
    pub aim: Aim,
    pub damage: f32,
    pub element: Element,
    pub payload: HitPayload,
    /// Chained explosion radius around each primary hit; 0 disables.
    pub aoe_radius: f32,
    /// Probability in `[0, 1]`.
    pub crit_chance: f32,
    pub on_hit: Option<OnHit>,
}

impl AttackDescriptor {
    fn base(owner: Owner, shape: AttackShape, origin: Vec2, aim: Aim, damage: f32) -> Self {
        Self {
            owner,
            shape,
            origin,
            aim,
            damage,
            element: Element::Physical,
            payload: HitPayload::NONE,
            aoe_radius: 0.0,
            crit_chance: 0.0,
            on_hit: None,
        }
    }

    pub fn melee(owner: Owner, origin: Vec2, facing: Vec2, reach: f32, damage: f32) -> Self {
        Self::base(
            owner,
            AttackShape::Melee {
                reach,
                half_extents: Vec2::splat(reach * 0.5),
                lifetime: 0.1,
                cleave: false,
            },
            origin,
            Aim::Direction(facing),
            damage,
        )
    }

    pub fn projectile(owner: Owner, origin: Vec2, aim: Aim, speed: f32, damage: f32) -> Self {
        Self::base(
            owner,
            AttackShape::Projectile {
                speed,
                radius: 6.0,
                lifetime: 3.0,
                max_range: f32::INFINITY,
                piercing: false,
                homing: None,
                turn_rate: 0.0,
            },
            origin,
            aim,
            damage,
        )
    }

    pub fn aoe(owner: Owner, center: Vec2, radius: f32, damage: f32) -> Self {
        Self::base(
            owner,
            AttackShape::Aoe {
                radius,
                duration: 0.0,
                tick_rate: 0.0,
                pull: 0.0,
                heal: false,
                friendly_fire: false,
            },
            center,
            Aim::Point(center),
            damage,
        )
    }

    pub fn direct(owner: Owner, origin: Vec2, target: EntityId, damage: f32) -> Self {
        Self::base(owner, AttackShape::Direct, origin, Aim::Entity(target), damage)
    }

    // ===== builder =====

    pub fn with_element(mut self, element: Element) -> Self {
        self.element = element;
        self
    }

    pub fn with_payload(mut self, payload: HitPayload) -> Self {
        self.payload = payload;
        self
    }

    pub fn with_aoe_radius(mut self, radius: f32) -> Self {
        self.aoe_radius = radius.max(0.0);
        self
    }

    pub fn with_crit_chance(mut self, chance: f32) -> Self {
        self.crit_chance = chance.clamp(0.0, 1.0);
        self
    }

    pub fn with_on_hit(mut self, hook: OnHit) -> Self {
        self.on_hit = Some(hook);
        self
    }

    /// Replaces the shape while keeping everything else.
    pub fn with_shape(mut self, shape: AttackShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn kind(&self) -> AttackKind {
        match self.shape {
            AttackShape::Melee { .. } => AttackKind::Melee,
            AttackShape::Projectile { .. } => AttackKind::Projectile,
            AttackShape::Aoe { .. } => AttackKind::Aoe,
            AttackShape::Direct => AttackKind::Direct,
        }
    }
}

/// FIFO of descriptors produced in one tick. Never overwrites.
#[derive(Clone, Debug, Default)]
pub struct AttackQueue {
    pending: Vec<AttackDescriptor>,
}

impl AttackQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, descriptor: AttackDescriptor) {
        self.pending.push(descriptor);
    }

    pub fn extend(&mut self, descriptors: impl IntoIterator<Item = AttackDescriptor>) {
        self.pending.extend(descriptors);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Removes and yields every queued descriptor in submission order.
    pub fn drain(&mut self) -> impl Iterator<Item = AttackDescriptor> + '_ {
        self.pending.drain(..)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_keeps_every_descriptor_in_order() {
        let owner = Owner::new(EntityId(1), Side::Hostile);
        let mut queue = AttackQueue::new();
        queue.push(AttackDescriptor::aoe(owner, Vec2::ZERO, 10.0, 5.0));
        queue.push(AttackDescriptor::direct(owner, Vec2::ZERO, EntityId(2), 7.0));
        assert_eq!(queue.len(), 2);

        let kinds: Vec<AttackKind> = queue.drain().map(|d| d.kind()).collect();
        assert_eq!(kinds, vec![AttackKind::Aoe, AttackKind::Direct]);
        assert!(queue.is_empty());
    }

    #[test]
    fn crit_chance_is_clamped() {
        let owner = Owner::new(EntityId(1), Side::Hostile);
        let d = AttackDescriptor::aoe(owner, Vec2::ZERO, 10.0, 5.0).with_crit_chance(4.0);
        assert_eq!(d.crit_chance, 1.0);
    }
}
