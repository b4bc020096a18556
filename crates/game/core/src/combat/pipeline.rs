//! Attack resolution pipeline.
//!
//! Descriptors enter through [`ResolutionPipeline::submit`]. Melee,
//! projectile, and area descriptors become live objects in an ordered arena;
//! direct descriptors wait for the start of the next pass. Each
//! [`tick`](ResolutionPipeline::tick) then:
//!
//! 1. applies queued direct hits
//! 2. for every live object in insertion order: move, resolve against all
//!    targets, age
//! 3. compacts dead objects and appends objects spawned during the pass
//!
//! The returned [`HitRecord`] log is the only output. Target state changes go
//! through the [`CombatTarget`] hooks.

use glam::Vec2;
use tracing::{debug, trace};

use crate::combat::{
    Aim, AreaZone, AttackDescriptor, AttackKind, AttackQueue, CombatTarget, Element, HitPayload,
    LiveObject, ObjectBody, ObjectId, OnHit, Owner, calculate_damage, splash_damage,
};
use crate::config::ResolutionConfig;
use crate::env::{PcgRng, RngOracle};
use crate::state::{EntityId, StatusEffect, Threat, direction_or};

/// Category of a logged interaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum HitKind {
    /// Primary hit from a live object.
    Damage,
    /// Primary hit from a direct descriptor.
    Direct,
    /// Chained explosion around a primary hit.
    Splash,
    /// Periodic status damage (logged by the encounter).
    DamageOverTime,
    Heal,
}

/// One line of the per-tick hit log.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitRecord {
    pub target: EntityId,
    pub source: EntityId,
    pub object: Option<ObjectId>,
    pub kind: HitKind,
    /// Health removed (or restored for heals). 0 when the target was
    /// invulnerable.
    pub amount: f32,
    pub is_crit: bool,
    pub killed: bool,
}

/// Everything a primary hit needs, independent of where it came from.
struct Strike {
    owner: Owner,
    object: Option<ObjectId>,
    kind: HitKind,
    damage: f32,
    payload: HitPayload,
    aoe_radius: f32,
    crit_chance: f32,
    on_hit: Option<OnHit>,
    element: Element,
    impact: Vec2,
}

/// Owns every live combat object and adjudicates collisions.
#[derive(Clone, Debug)]
pub struct ResolutionPipeline {
    config: ResolutionConfig,
    objects: Vec<LiveObject>,
    spawned: Vec<LiveObject>,
    direct: Vec<AttackDescriptor>,
    next_id: u64,
    clock: f32,
    rng: PcgRng,
}

impl ResolutionPipeline {
    pub fn new(config: ResolutionConfig, rng: PcgRng) -> Self {
        Self {
            config,
            objects: Vec::new(),
            spawned: Vec::new(),
            direct: Vec::new(),
            next_id: 0,
            clock: 0.0,
            rng,
        }
    }

    pub fn config(&self) -> &ResolutionConfig {
        &self.config
    }

    /// Seconds of simulated time seen by this pipeline.
    pub fn clock(&self) -> f32 {
        self.clock
    }

    pub fn objects(&self) -> &[LiveObject] {
        &self.objects
    }

    pub fn pending_direct(&self) -> usize {
        self.direct.len()
    }

    /// Live projectiles as dodge threats.
    pub fn threats(&self) -> Vec<Threat> {
        self.objects
            .iter()
            .filter_map(|o| match &o.body {
                ObjectBody::Projectile(p) => Some(Threat {
                    owner_side: o.owner.side,
                    position: p.position,
                    velocity: p.velocity,
                }),
                _ => None,
            })
            .collect()
    }

    fn allocate_id(&mut self) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        id
    }

    // ========================================================================
    // Ingestion
    // ========================================================================

    /// Accepts one descriptor. Returns the live object id, or `None` for
    /// direct descriptors (queued for the next pass).
    pub fn submit(&mut self, descriptor: AttackDescriptor) -> Option<ObjectId> {
        if descriptor.kind() == AttackKind::Direct {
            self.direct.push(descriptor);
            return None;
        }
        let id = self.allocate_id();
        let object = LiveObject::from_descriptor(id, &descriptor)?;
        trace!(object = id.0, kind = %descriptor.kind(), owner = %descriptor.owner.id, "live object spawned");
        self.objects.push(object);
        Some(id)
    }

    /// Drains a queue in submission order.
    pub fn submit_all(&mut self, queue: &mut AttackQueue) {
        for descriptor in queue.drain() {
            self.submit(descriptor);
        }
    }

    /// Applies a direct descriptor immediately.
    pub fn apply_direct<T: CombatTarget>(
        &mut self,
        descriptor: &AttackDescriptor,
        targets: &mut [T],
    ) -> Vec<HitRecord> {
        let mut log = Vec::new();
        self.resolve_direct(descriptor, targets, &mut log);
        let spawned = std::mem::take(&mut self.spawned);
        self.objects.extend(spawned);
        log
    }

    // ========================================================================
    // Resolution pass
    // ========================================================================

    pub fn tick<T: CombatTarget>(&mut self, dt: f32, targets: &mut [T]) -> Vec<HitRecord> {
        self.clock += dt;
        let mut log = Vec::new();

        for descriptor in std::mem::take(&mut self.direct) {
            self.resolve_direct(&descriptor, targets, &mut log);
        }

        let mut objects = std::mem::take(&mut self.objects);
        for object in objects.iter_mut() {
            self.step_object(object, dt, targets, &mut log);
        }
        objects.retain(|o| o.alive);
        objects.append(&mut self.spawned);
        self.objects = objects;

        if !log.is_empty() {
            debug!(hits = log.len(), live = self.objects.len(), "resolution pass");
        }
        log
    }

    fn resolve_direct<T: CombatTarget>(
        &mut self,
        descriptor: &AttackDescriptor,
        targets: &mut [T],
        log: &mut Vec<HitRecord>,
    ) {
        let Aim::Entity(target_id) = descriptor.aim else {
            debug!(owner = %descriptor.owner.id, "direct attack without entity aim ignored");
            return;
        };
        let Some(index) = targets
            .iter()
            .position(|t| t.id() == target_id && t.is_active())
        else {
            return;
        };
        if !descriptor.owner.side.is_opposed(targets[index].side()) {
            return;
        }
        let strike = Strike {
            owner: descriptor.owner,
            object: None,
            kind: HitKind::Direct,
            damage: descriptor.damage,
            payload: descriptor.payload,
            aoe_radius: descriptor.aoe_radius,
            crit_chance: descriptor.crit_chance,
            on_hit: descriptor.on_hit,
            element: descriptor.element,
            impact: targets[index].position(),
        };
        self.strike(&strike, index, targets, log);
    }

    fn step_object<T: CombatTarget>(
        &mut self,
        object: &mut LiveObject,
        dt: f32,
        targets: &mut [T],
        log: &mut Vec<HitRecord>,
    ) {
        if let Some(aim) = object.pending_aim {
            let point = find_active(targets, aim).map(|i| targets[i].position());
            object.resolve_aim(point);
        }

        // ===== move =====
        match &mut object.body {
            ObjectBody::Projectile(p) => {
                let homing = p
                    .homing
                    .and_then(|id| find_active(targets, id))
                    .map(|i| targets[i].position());
                p.advance(dt, homing);
            }
            ObjectBody::Melee(m) => {
                if let Some(i) = find_active(targets, object.owner.id) {
                    m.anchor(targets[i].position(), targets[i].facing());
                }
            }
            ObjectBody::Zone(_) => {}
        }

        // ===== resolve =====
        for index in 0..targets.len() {
            if !object.alive {
                break;
            }
            self.resolve_against(object, index, dt, targets, log);
        }

        // ===== age =====
        match &mut object.body {
            ObjectBody::Projectile(p) => {
                p.lifetime -= dt;
                if p.is_spent() {
                    object.alive = false;
                }
            }
            ObjectBody::Melee(m) => {
                m.lifetime -= dt;
                if m.lifetime <= 0.0 {
                    object.alive = false;
                }
            }
            ObjectBody::Zone(z) => {
                z.elapsed += dt;
                if z.is_spent() {
                    object.alive = false;
                }
            }
        }
    }

    fn resolve_against<T: CombatTarget>(
        &mut self,
        object: &mut LiveObject,
        index: usize,
        dt: f32,
        targets: &mut [T],
        log: &mut Vec<HitRecord>,
    ) {
        let owner = object.owner;
        let target = &targets[index];
        if !target.is_active() {
            return;
        }
        let target_id = target.id();
        let target_position = target.position();
        let target_radius = target.radius();

        let eligible = match &object.body {
            ObjectBody::Zone(z) if z.heal => target.side() == owner.side,
            ObjectBody::Zone(z) if z.friendly_fire => target_id != owner.id,
            _ => owner.side.is_opposed(target.side()),
        };
        if !eligible {
            return;
        }

        let clock = self.clock;
        let impact = match &mut object.body {
            ObjectBody::Projectile(p) => {
                if p.hits.contains(&target_id) || !p.overlaps(target_position, target_radius) {
                    return;
                }
                p.hits.push(target_id);
                if !p.piercing {
                    object.alive = false;
                }
                p.position
            }
            ObjectBody::Melee(m) => {
                if m.hits.contains(&target_id) || !m.overlaps(target_position, target_radius) {
                    return;
                }
                m.hits.push(target_id);
                if !m.cleave {
                    object.alive = false;
                }
                target_position
            }
            ObjectBody::Zone(z) => {
                if !z.overlaps(target_position, target_radius) {
                    return;
                }
                if z.pull > 0.0 && !z.heal {
                    let inward = direction_or(z.center - target_position, Vec2::ZERO);
                    targets[index].receive_knockback(inward * z.pull * dt);
                }
                if !z.is_ready(target_id, clock) {
                    return;
                }
                z.last_hit.insert(target_id, clock);
                if z.heal {
                    let healed = targets[index].receive_heal(object.damage);
                    log.push(HitRecord {
                        target: target_id,
                        source: owner.id,
                        object: Some(object.id),
                        kind: HitKind::Heal,
                        amount: healed,
                        is_crit: false,
                        killed: false,
                    });
                    return;
                }
                z.center
            }
        };

        let strike = Strike {
            owner,
            object: Some(object.id),
            kind: HitKind::Damage,
            damage: object.damage,
            payload: object.payload,
            aoe_radius: object.aoe_radius,
            crit_chance: object.crit_chance,
            on_hit: object.on_hit,
            element: object.element,
            impact,
        };
        self.strike(&strike, index, targets, log);
    }

    /// Applies one primary hit plus its payload, hook, and chained explosion.
    fn strike<T: CombatTarget>(
        &mut self,
        strike: &Strike,
        index: usize,
        targets: &mut [T],
        log: &mut Vec<HitRecord>,
    ) {
        let is_crit = strike.crit_chance > 0.0 && self.rng.chance(strike.crit_chance);
        let mut incoming = strike.damage;
        if is_crit {
            incoming *= self.config.crit_multiplier;
        }

        let target = &mut targets[index];
        let target_id = target.id();
        let target_position = target.position();
        incoming *= 1.0 - target.damage_reduction().clamp(0.0, 1.0);
        let dealt = calculate_damage(incoming, target.defense(), &self.config);
        let outcome = target.receive_damage(dealt, strike.owner.id);

        log.push(HitRecord {
            target: target_id,
            source: strike.owner.id,
            object: strike.object,
            kind: strike.kind,
            amount: outcome.dealt,
            is_crit: is_crit && !outcome.blocked,
            killed: outcome.killed,
        });

        if !outcome.blocked {
            let payload = strike.payload;
            if payload.knockback != 0.0 {
                let away = direction_or(target_position - strike.impact, Vec2::X);
                target.receive_knockback(away * payload.knockback);
            }
            if payload.stun > 0.0 {
                target.receive_status(StatusEffect::STUN, payload.stun, strike.owner.id);
            }
            if let Some((fraction, seconds)) = payload.slow {
                target.receive_status(StatusEffect::slow(fraction), seconds, strike.owner.id);
            }
            if let Some((effect, seconds)) = payload.effect {
                target.receive_status(effect, seconds, strike.owner.id);
            }
            self.run_hook(strike, outcome.dealt, target_position, targets, log);
        }

        if strike.aoe_radius > 0.0 {
            self.splash(strike, target_id, target_position, targets, log);
        }
    }

    fn run_hook<T: CombatTarget>(
        &mut self,
        strike: &Strike,
        dealt: f32,
        at: Vec2,
        targets: &mut [T],
        log: &mut Vec<HitRecord>,
    ) {
        match strike.on_hit {
            None => {}
            Some(OnHit::Lifesteal { fraction }) => {
                let Some(owner) = find_active(targets, strike.owner.id) else {
                    return;
                };
                let healed = targets[owner].receive_heal(dealt * fraction);
                if healed > 0.0 {
                    log.push(HitRecord {
                        target: strike.owner.id,
                        source: strike.owner.id,
                        object: strike.object,
                        kind: HitKind::Heal,
                        amount: healed,
                        is_crit: false,
                        killed: false,
                    });
                }
            }
            Some(OnHit::SpawnZone(zone)) => {
                let id = self.allocate_id();
                self.spawned.push(LiveObject {
                    id,
                    owner: strike.owner,
                    element: strike.element,
                    damage: zone.damage,
                    payload: zone.payload,
                    aoe_radius: 0.0,
                    crit_chance: 0.0,
                    on_hit: None,
                    body: ObjectBody::Zone(AreaZone {
                        center: at,
                        radius: zone.radius,
                        duration: zone.duration,
                        elapsed: 0.0,
                        tick_rate: zone.tick_rate,
                        pull: 0.0,
                        heal: false,
                        friendly_fire: false,
                        last_hit: Default::default(),
                    }),
                    pending_aim: None,
                    alive: true,
                });
            }
        }
    }

    /// Flat fraction of the base damage to everything near the primary.
    fn splash<T: CombatTarget>(
        &mut self,
        strike: &Strike,
        primary: EntityId,
        center: Vec2,
        targets: &mut [T],
        log: &mut Vec<HitRecord>,
    ) {
        let amount = splash_damage(strike.damage, &self.config);
        for target in targets.iter_mut() {
            let id = target.id();
            if id == primary || id == strike.owner.id || !target.is_active() {
                continue;
            }
            if target.position().distance(center) > strike.aoe_radius {
                continue;
            }
            let outcome = target.receive_damage(amount, strike.owner.id);
            log.push(HitRecord {
                target: id,
                source: strike.owner.id,
                object: strike.object,
                kind: HitKind::Splash,
                amount: outcome.dealt,
                is_crit: false,
                killed: outcome.killed,
            });
        }
    }
}

fn find_active<T: CombatTarget>(targets: &[T], id: EntityId) -> Option<usize> {
    targets.iter().position(|t| t.id() == id && t.is_active())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::AttackShape;
    use crate::state::{CombatStats, Combatant, Side};

    fn hero(id: u32, x: f32) -> Combatant {
        Combatant::new(EntityId(id), "hero", Side::Players, CombatStats::default())
            .at(Vec2::new(x, 0.0))
    }

    fn pipeline() -> ResolutionPipeline {
        ResolutionPipeline::new(ResolutionConfig::default(), PcgRng::new(1))
    }

    fn boss_owner() -> Owner {
        Owner::new(EntityId(0), Side::Hostile)
    }

    #[test]
    fn projectile_hits_once_and_is_destroyed() {
        let mut pipeline = pipeline();
        let mut targets = vec![hero(1, 20.0)];
        pipeline.submit(AttackDescriptor::projectile(
            boss_owner(),
            Vec2::ZERO,
            Aim::Direction(Vec2::X),
            200.0,
            30.0,
        ));

        let log = pipeline.tick(0.1, &mut targets);
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].amount, 30.0);
        assert!(pipeline.objects().is_empty());

        let log = pipeline.tick(0.1, &mut targets);
        assert!(log.is_empty());
    }

    #[test]
    fn piercing_projectile_hits_each_target_once() {
        let mut pipeline = pipeline();
        let mut targets = vec![hero(1, 10.0), hero(2, 14.0)];
        let descriptor = AttackDescriptor::projectile(
            boss_owner(),
            Vec2::ZERO,
            Aim::Direction(Vec2::X),
            100.0,
            10.0,
        )
        .with_shape(AttackShape::Projectile {
            speed: 100.0,
            radius: 20.0,
            lifetime: 1.0,
            max_range: f32::INFINITY,
            piercing: true,
            homing: None,
            turn_rate: 0.0,
        });
        pipeline.submit(descriptor);

        let first = pipeline.tick(0.05, &mut targets);
        let second = pipeline.tick(0.05, &mut targets);
        assert_eq!(first.len(), 2);
        assert!(second.is_empty());
        assert_eq!(pipeline.objects().len(), 1);
    }

    #[test]
    fn allies_are_filtered_out() {
        let mut pipeline = pipeline();
        let mut targets = vec![
            Combatant::new(EntityId(1), "imp", Side::Hostile, CombatStats::default()),
        ];
        pipeline.submit(AttackDescriptor::aoe(boss_owner(), Vec2::ZERO, 50.0, 10.0));
        let log = pipeline.tick(0.1, &mut targets);
        assert!(log.is_empty());
    }

    #[test]
    fn zone_respects_tick_rate() {
        let mut pipeline = pipeline();
        let mut targets = vec![hero(1, 0.0)];
        pipeline.submit(
            AttackDescriptor::aoe(boss_owner(), Vec2::ZERO, 50.0, 2.0).with_shape(
                AttackShape::Aoe {
                    radius: 50.0,
                    duration: 0.95,
                    tick_rate: 0.5,
                    pull: 0.0,
                    heal: false,
                    friendly_fire: false,
                },
            ),
        );

        let mut hits = 0;
        for _ in 0..12 {
            hits += pipeline.tick(0.1, &mut targets).len();
        }
        assert_eq!(hits, 2);
        assert!(pipeline.objects().is_empty());
    }

    fn zone(pull: f32, heal: bool) -> AttackShape {
        AttackShape::Aoe {
            radius: 80.0,
            duration: 2.0,
            tick_rate: 1.0,
            pull,
            heal,
            friendly_fire: false,
        }
    }

    #[test]
    fn pulling_zone_drags_inward_between_damage_ticks() {
        let mut pipeline = pipeline();
        let mut targets = vec![hero(1, 40.0)];
        pipeline.submit(
            AttackDescriptor::aoe(boss_owner(), Vec2::ZERO, 80.0, 1.0).with_shape(zone(100.0, false)),
        );

        let first = pipeline.tick(0.1, &mut targets);
        assert_eq!(first.len(), 1);
        let after_hit = targets[0].knockback;
        assert!(after_hit.x < 0.0);
        assert_eq!(after_hit.y, 0.0);

        let second = pipeline.tick(0.1, &mut targets);
        assert!(second.is_empty());
        let pulled = targets[0].knockback;
        assert!(pulled.x < after_hit.x);
        assert!(pulled.normalize().dot(Vec2::ZERO - targets[0].position) > 0.0);
    }

    #[test]
    fn healing_zone_only_touches_owner_side() {
        let mut pipeline = pipeline();
        let mut imp = Combatant::new(EntityId(2), "imp", Side::Hostile, CombatStats::default());
        imp.stats.health = 50.0;
        let mut targets = vec![imp, hero(1, 10.0)];
        pipeline.submit(
            AttackDescriptor::aoe(boss_owner(), Vec2::ZERO, 80.0, 20.0).with_shape(zone(100.0, true)),
        );

        let log = pipeline.tick(0.1, &mut targets);
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].target, EntityId(2));
        assert_eq!(log[0].kind, HitKind::Heal);
        assert_eq!(log[0].amount, 20.0);
        assert_eq!(targets[0].stats.health, 70.0);
        assert_eq!(targets[0].knockback, Vec2::ZERO);

        assert_eq!(targets[1].stats.health, 100.0);
        assert_eq!(targets[1].knockback, Vec2::ZERO);
        assert!(targets[1].status.is_empty());
    }

    #[test]
    fn direct_waits_for_next_pass() {
        let mut pipeline = pipeline();
        let mut targets = vec![hero(1, 500.0)];
        pipeline.submit(AttackDescriptor::direct(
            boss_owner(),
            Vec2::ZERO,
            EntityId(1),
            40.0,
        ));
        assert_eq!(pipeline.pending_direct(), 1);

        let log = pipeline.tick(0.016, &mut targets);
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].kind, HitKind::Direct);
        assert_eq!(targets[0].stats.health, 60.0);
    }

    #[test]
    fn apply_direct_is_immediate() {
        let mut pipeline = pipeline();
        let mut targets = vec![hero(1, 0.0)];
        let descriptor = AttackDescriptor::direct(boss_owner(), Vec2::ZERO, EntityId(1), 15.0)
            .with_payload(HitPayload::stun(1.0));
        let log = pipeline.apply_direct(&descriptor, &mut targets);
        assert_eq!(log[0].amount, 15.0);
        assert!(targets[0].status.is_stunned());
    }

    #[test]
    fn invulnerable_target_is_logged_with_zero() {
        let mut pipeline = pipeline();
        let mut targets = vec![hero(1, 0.0)];
        targets[0].invulnerable = 1.0;
        let descriptor = AttackDescriptor::direct(boss_owner(), Vec2::ZERO, EntityId(1), 15.0)
            .with_payload(HitPayload::stun(1.0));
        let log = pipeline.apply_direct(&descriptor, &mut targets);
        assert_eq!(log[0].amount, 0.0);
        assert!(!targets[0].status.is_stunned());
        assert_eq!(targets[0].stats.health, 100.0);
    }

    #[test]
    fn guaranteed_crit_multiplies_before_defense() {
        let mut pipeline = pipeline();
        let mut targets = vec![hero(1, 0.0)];
        targets[0].stats.defense = 10.0;
        let descriptor = AttackDescriptor::direct(boss_owner(), Vec2::ZERO, EntityId(1), 20.0)
            .with_crit_chance(1.0);
        let log = pipeline.apply_direct(&descriptor, &mut targets);
        assert!(log[0].is_crit);
        assert_eq!(log[0].amount, 27.0);
    }

    #[test]
    fn lifesteal_heals_owner() {
        let mut pipeline = pipeline();
        let mut boss = Combatant::new(EntityId(0), "boss", Side::Hostile, CombatStats::default());
        boss.stats.health = 50.0;
        let mut targets = vec![boss, hero(1, 0.0)];
        let descriptor = AttackDescriptor::direct(boss_owner(), Vec2::ZERO, EntityId(1), 20.0)
            .with_on_hit(OnHit::Lifesteal { fraction: 0.5 });
        let log = pipeline.apply_direct(&descriptor, &mut targets);
        assert_eq!(targets[0].stats.health, 60.0);
        assert!(log.iter().any(|r| r.kind == HitKind::Heal && r.amount == 10.0));
    }

    #[test]
    fn spawned_zone_appears_after_pass() {
        let mut pipeline = pipeline();
        let mut targets = vec![hero(1, 0.0)];
        let zone = crate::combat::ZoneSpec {
            radius: 30.0,
            duration: 2.0,
            tick_rate: 0.5,
            damage: 3.0,
            payload: HitPayload::NONE,
        };
        pipeline.submit(
            AttackDescriptor::direct(boss_owner(), Vec2::ZERO, EntityId(1), 5.0)
                .with_on_hit(OnHit::SpawnZone(zone)),
        );
        let log = pipeline.tick(0.1, &mut targets);
        assert_eq!(log.len(), 1);
        assert_eq!(pipeline.objects().len(), 1);

        let log = pipeline.tick(0.1, &mut targets);
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].amount, 3.0);
    }
}
