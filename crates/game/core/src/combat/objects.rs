//! Live combat objects owned by the resolution pipeline.

use std::collections::BTreeMap;

use glam::Vec2;

use crate::combat::{AttackDescriptor, AttackShape, Element, HitPayload, OnHit, Owner};
use crate::state::{EntityId, direction_or};

/// Stable handle of a live object, unique per pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(pub u64);

#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
    /// Seconds left.
    pub lifetime: f32,
    pub traveled: f32,
    pub max_range: f32,
    pub piercing: bool,
    pub homing: Option<EntityId>,
    pub turn_rate: f32,
    /// Targets already struck.
    pub hits: Vec<EntityId>,
}

impl Projectile {
    /// Steers toward `homing_point` (if any) then moves.
    pub fn advance(&mut self, dt: f32, homing_point: Option<Vec2>) {
        if let Some(point) = homing_point {
            let desired = point - self.position;
            if desired.length_squared() > f32::EPSILON && self.velocity != Vec2::ZERO {
                let max_turn = self.turn_rate.max(0.0) * dt;
                let angle = self.velocity.angle_to(desired).clamp(-max_turn, max_turn);
                self.velocity = Vec2::from_angle(angle).rotate(self.velocity);
            }
        }
        let step = self.velocity * dt;
        self.position += step;
        self.traveled += step.length();
    }

    pub fn overlaps(&self, center: Vec2, radius: f32) -> bool {
        self.position.distance(center) <= self.radius + radius
    }

    pub fn is_spent(&self) -> bool {
        self.lifetime <= 0.0 || self.traveled >= self.max_range
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MeleeHitbox {
    pub center: Vec2,
    pub reach: f32,
    pub half_extents: Vec2,
    pub lifetime: f32,
    pub cleave: bool,
    pub hits: Vec<EntityId>,
}

impl MeleeHitbox {
    /// Re-centers the box in front of its owner.
    pub fn anchor(&mut self, owner_position: Vec2, owner_facing: Vec2) {
        self.center = owner_position + direction_or(owner_facing, Vec2::X) * self.reach;
    }

    /// Circle-vs-AABB.
    pub fn overlaps(&self, center: Vec2, radius: f32) -> bool {
        let min = self.center - self.half_extents;
        let max = self.center + self.half_extents;
        let closest = center.clamp(min, max);
        closest.distance_squared(center) <= radius * radius
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AreaZone {
    pub center: Vec2,
    pub radius: f32,
    pub duration: f32,
    pub elapsed: f32,
    pub tick_rate: f32,
    pub pull: f32,
    pub heal: bool,
    pub friendly_fire: bool,
    /// Pipeline clock of the last hit per target.
    pub last_hit: BTreeMap<EntityId, f32>,
}

impl AreaZone {
    pub fn overlaps(&self, center: Vec2, radius: f32) -> bool {
        self.center.distance(center) <= self.radius + radius
    }

    /// True when `target` may be hit again at `clock`.
    pub fn is_ready(&self, target: EntityId, clock: f32) -> bool {
        match self.last_hit.get(&target) {
            None => true,
            Some(_) if self.tick_rate <= 0.0 => false,
            // Small tolerance keeps fixed-step accumulation from skipping a beat.
            Some(last) => clock - last >= self.tick_rate - 1e-4,
        }
    }

    pub fn is_spent(&self) -> bool {
        self.elapsed >= self.duration
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ObjectBody {
    Projectile(Projectile),
    Melee(MeleeHitbox),
    Zone(AreaZone),
}

/// A spawned, ticking object with the attack data it carries.
#[derive(Clone, Debug, PartialEq)]
pub struct LiveObject {
    pub id: ObjectId,
    pub owner: Owner,
    pub element: Element,
    pub damage: f32,
    pub payload: HitPayload,
    pub aoe_radius: f32,
    pub crit_chance: f32,
    pub on_hit: Option<OnHit>,
    pub body: ObjectBody,
    /// Entity whose position fixes direction or center on the first tick.
    pub pending_aim: Option<EntityId>,
    pub alive: bool,
}

impl LiveObject {
    /// Instantiates a descriptor. Direct descriptors have no live form.
    pub fn from_descriptor(id: ObjectId, descriptor: &AttackDescriptor) -> Option<Self> {
        use crate::combat::Aim;

        let origin = descriptor.origin;
        let (direction, point, pending_aim) = match descriptor.aim {
            Aim::Point(p) => (direction_or(p - origin, Vec2::X), p, None),
            Aim::Direction(d) => (direction_or(d, Vec2::X), origin, None),
            Aim::Entity(e) => (Vec2::X, origin, Some(e)),
        };

        let body = match descriptor.shape {
            AttackShape::Melee {
                reach,
                half_extents,
                lifetime,
                cleave,
            } => ObjectBody::Melee(MeleeHitbox {
                center: origin + direction * reach,
                reach,
                half_extents,
                lifetime,
                cleave,
                hits: Vec::new(),
            }),
            AttackShape::Projectile {
                speed,
                radius,
                lifetime,
                max_range,
                piercing,
                homing,
                turn_rate,
            } => ObjectBody::Projectile(Projectile {
                position: origin,
                velocity: direction * speed,
                radius,
                lifetime,
                traveled: 0.0,
                max_range,
                piercing,
                homing,
                turn_rate,
                hits: Vec::new(),
            }),
            AttackShape::Aoe {
                radius,
                duration,
                tick_rate,
                pull,
                heal,
                friendly_fire,
            } => ObjectBody::Zone(AreaZone {
                center: point,
                radius,
                duration,
                elapsed: 0.0,
                tick_rate,
                pull,
                heal,
                friendly_fire,
                last_hit: BTreeMap::new(),
            }),
            AttackShape::Direct => return None,
        };

        Some(Self {
            id,
            owner: descriptor.owner,
            element: descriptor.element,
            damage: descriptor.damage,
            payload: descriptor.payload,
            aoe_radius: descriptor.aoe_radius,
            crit_chance: descriptor.crit_chance,
            on_hit: descriptor.on_hit,
            body,
            pending_aim,
            alive: true,
        })
    }

    /// Fixes an entity aim to a concrete location.
    pub fn resolve_aim(&mut self, target_position: Option<Vec2>) {
        if self.pending_aim.take().is_none() {
            return;
        }
        let Some(target_position) = target_position else {
            return;
        };
        match &mut self.body {
            ObjectBody::Projectile(p) => {
                let speed = p.velocity.length();
                p.velocity = direction_or(target_position - p.position, Vec2::X) * speed;
            }
            ObjectBody::Melee(m) => {
                let origin = m.center - Vec2::X * m.reach;
                m.center = origin + direction_or(target_position - origin, Vec2::X) * m.reach;
            }
            ObjectBody::Zone(z) => z.center = target_position,
        }
    }

    pub fn position(&self) -> Vec2 {
        match &self.body {
            ObjectBody::Projectile(p) => p.position,
            ObjectBody::Melee(m) => m.center,
            ObjectBody::Zone(z) => z.center,
        }
    }
}
