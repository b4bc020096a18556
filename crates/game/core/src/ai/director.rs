//! Per-tick decision making for bosses.
//!
//! The director glues the boss's subsystems together in a fixed order:
//!
//! 1. phase controller (thresholds, minion healing, reinforcements)
//! 2. targeting
//! 3. pattern engine (selection, step logic, watchdogs)
//! 4. movement, when the active pattern leaves it to the director
//! 5. anti-stuck watchdog
//!
//! Nothing here touches presentation directly; each tick yields a
//! [`VisualIntent`] instead.

use glam::Vec2;
use tracing::{debug, warn};

use crate::ai::{AiOutput, PhaseController, VisualIntent, update_target};
use crate::combat::Owner;
use crate::config::{CombatConfig, MovementConfig, TargetingConfig};
use crate::env::{RngOracle, TileOracle};
use crate::pattern::{PatternCatalog, PatternContext, PatternEngine};
use crate::state::{
    AiState, BossState, Combatant, MovementMode, TargetInfo, WorldView, direction_or,
};

/// Retreat below this fraction of attack range.
const RETREAT_FRACTION: f32 = 0.4;
/// Teleports land this fraction of attack range away from the target.
const TELEPORT_STANDOFF: f32 = 0.8;

pub struct BossDirector {
    catalog: PatternCatalog,
    engine: PatternEngine,
    phase: PhaseController,
    movement: MovementConfig,
    targeting: TargetingConfig,
}

impl BossDirector {
    pub fn new(config: &CombatConfig, catalog: PatternCatalog) -> Self {
        Self {
            catalog,
            engine: PatternEngine::new(config.watchdog.clone(), config.selection.clone()),
            phase: PhaseController::new(config.phase.clone()),
            movement: config.movement.clone(),
            targeting: config.targeting.clone(),
        }
    }

    pub fn catalog(&self) -> &PatternCatalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut PatternCatalog {
        &mut self.catalog
    }

    /// Runs one decision tick for `me`. Non-bosses and the dead yield nothing.
    pub fn tick(
        &self,
        me: &mut Combatant,
        world: &WorldView,
        tiles: Option<&dyn TileOracle>,
        rng: &mut dyn RngOracle,
        dt: f32,
    ) -> AiOutput {
        let mut output = AiOutput::default();
        if !me.is_alive() || !me.is_boss() {
            return output;
        }

        let live_minions = world.live_bound_minions(me.id);
        let events = self.phase.update(me, &self.catalog, live_minions, dt);
        output.spawn_requests = events.spawn_requests;

        let target = update_target(me, world, tiles, &self.targeting);
        let stunned = me.status.is_stunned();

        let Some(mut boss) = me.boss.take() else {
            return output;
        };
        boss.dash_cooldown = (boss.dash_cooldown - dt).max(0.0);
        boss.dodge_cooldown = (boss.dodge_cooldown - dt).max(0.0);
        boss.teleport_cooldown = (boss.teleport_cooldown - dt).max(0.0);

        let ctx = PatternContext {
            owner: Owner::new(me.id, me.side),
            position: me.position,
            facing: me.facing,
            speed: me.stats.speed * me.status.speed_multiplier(),
            damage: me.stats.damage,
            element: me.element,
            phase: boss.phase,
            target,
            dt,
        };
        let step = self.engine.tick(&mut boss, &self.catalog, &ctx, rng, stunned);

        let mut intent = VisualIntent {
            entity: me.id,
            phase_flash: events.transitioned.is_some(),
            enraged: boss.is_enraged(),
            ..VisualIntent::default()
        };

        if let Some(point) = step.output.teleport {
            if point.is_finite() {
                blink(me, point);
                intent.teleport = Some(point);
            } else {
                warn!(entity = %me.id, "pattern requested non-finite teleport, ignoring");
            }
        }

        if stunned {
            boss.dash_remaining = 0.0;
            boss.movement = MovementMode::Hold;
            me.velocity = Vec2::ZERO;
        } else if let Some(velocity) = step.output.velocity {
            boss.dash_remaining = 0.0;
            me.velocity = if velocity.is_finite() { velocity } else { Vec2::ZERO };
        } else {
            self.steer(me, &mut boss, target.as_ref(), world, dt, &mut intent);
            self.unstick(me, &mut boss, target.as_ref(), dt, &mut intent);
        }

        match (step.output.facing, target) {
            (Some(facing), _) => me.facing = direction_or(facing, me.facing),
            (None, Some(t)) => me.face(t.position),
            (None, None) => me.facing = direction_or(me.velocity, me.facing),
        }

        me.ai_state = if stunned {
            AiState::Stunned
        } else if boss.active.is_some() {
            AiState::Attack
        } else if target.is_some() {
            AiState::Chase
        } else {
            AiState::Idle
        };

        intent.telegraph = boss.telegraph;
        intent.pattern = boss.active_pattern();
        intent.movement = boss.movement;
        output.attacks = step.output.attacks;
        output.intent = Some(intent);

        me.boss = Some(boss);
        output
    }

    /// Chooses velocity when no pattern drives movement.
    ///
    /// Priority: dash in progress, dodge, long-range teleport, gap-closing
    /// dash, then the regular movement mode.
    fn steer(
        &self,
        me: &mut Combatant,
        boss: &mut BossState,
        target: Option<&TargetInfo>,
        world: &WorldView,
        dt: f32,
        intent: &mut VisualIntent,
    ) {
        let cfg = &self.movement;
        let speed = me.stats.speed;

        if boss.dash_remaining > 0.0 {
            boss.dash_remaining = (boss.dash_remaining - dt).max(0.0);
            me.velocity = boss.dash_velocity;
            intent.dash_trail = true;
            return;
        }

        if boss.dodge_cooldown <= 0.0 {
            if let Some(side_step) = incoming_threat(me, world, cfg.dodge_radius) {
                debug!(entity = %me.id, "dodging projectile");
                boss.dash_velocity = side_step * speed * cfg.dodge_speed_multiplier;
                boss.dash_remaining = cfg.dodge_duration;
                boss.dodge_cooldown = cfg.dodge_cooldown;
                me.velocity = boss.dash_velocity;
                intent.dash_trail = true;
                return;
            }
        }

        let Some(target) = target else {
            boss.movement = MovementMode::Hold;
            me.velocity = Vec2::ZERO;
            return;
        };

        let offset = target.position - me.position;
        let distance = offset.length();
        let toward = direction_or(offset, me.facing);

        if boss.teleport_cooldown <= 0.0
            && distance > me.stats.aggro_range * cfg.teleport_distance_factor
        {
            let landing = target.position - toward * me.stats.attack_range * TELEPORT_STANDOFF;
            debug!(entity = %me.id, distance, "teleporting to distant target");
            blink(me, landing);
            boss.teleport_cooldown = cfg.teleport_cooldown;
            me.velocity = Vec2::ZERO;
            intent.teleport = Some(landing);
            return;
        }

        if boss.dash_cooldown <= 0.0 && distance > cfg.dash_trigger_distance {
            debug!(entity = %me.id, distance, "gap-closing dash");
            boss.dash_velocity = toward * speed * cfg.dash_speed_multiplier;
            boss.dash_remaining = cfg.dash_duration;
            boss.dash_cooldown = cfg.dash_cooldown;
            me.velocity = boss.dash_velocity;
            intent.dash_trail = true;
            return;
        }

        boss.movement = if distance > me.stats.attack_range {
            MovementMode::Approach
        } else if distance < me.stats.attack_range * RETREAT_FRACTION {
            MovementMode::Retreat
        } else {
            MovementMode::Strafe
        };

        boss.strafe_timer += dt;
        if boss.strafe_timer >= cfg.strafe_flip_interval {
            boss.strafe_timer = 0.0;
            boss.strafe_sign = -boss.strafe_sign;
        }

        me.velocity = match boss.movement {
            MovementMode::Approach => toward * speed,
            MovementMode::Retreat => -toward * speed * 0.8,
            MovementMode::Strafe => toward.perp() * boss.strafe_sign * speed * 0.7,
            MovementMode::Hold => Vec2::ZERO,
        };
    }

    /// Escapes when the boss has been trying to move without getting anywhere.
    fn unstick(
        &self,
        me: &mut Combatant,
        boss: &mut BossState,
        target: Option<&TargetInfo>,
        dt: f32,
        intent: &mut VisualIntent,
    ) {
        let cfg = &self.movement;
        let trying = me.velocity.length() > me.stats.speed * 0.1;
        if !trying {
            boss.stuck_timer = 0.0;
            boss.stuck_anchor = me.position;
            return;
        }

        boss.stuck_timer += dt;
        if boss.stuck_timer < cfg.stuck_window {
            return;
        }
        let moved = me.position.distance(boss.stuck_anchor);
        boss.stuck_timer = 0.0;
        boss.stuck_anchor = me.position;
        if moved >= cfg.stuck_min_displacement {
            return;
        }

        match target {
            Some(target) if boss.teleport_cooldown <= 0.0 => {
                let back = direction_or(me.position - target.position, Vec2::X);
                let landing = target.position + back * me.stats.attack_range * TELEPORT_STANDOFF;
                warn!(entity = %me.id, moved, "stuck, teleporting next to target");
                blink(me, landing);
                boss.stuck_anchor = landing;
                boss.teleport_cooldown = cfg.teleport_cooldown;
                me.velocity = Vec2::ZERO;
                intent.teleport = Some(landing);
            }
            _ => {
                warn!(entity = %me.id, moved, "stuck, dashing sideways");
                let side = direction_or(me.velocity.perp(), Vec2::Y) * boss.strafe_sign;
                boss.dash_velocity = side * me.stats.speed * cfg.dash_speed_multiplier;
                boss.dash_remaining = cfg.dash_duration;
                boss.strafe_sign = -boss.strafe_sign;
                me.velocity = boss.dash_velocity;
                intent.dash_trail = true;
            }
        }
    }
}

fn blink(me: &mut Combatant, point: Vec2) {
    me.position = point;
    me.last_valid_position = point;
}

/// Sidestep direction away from the closest approaching hostile projectile.
fn incoming_threat(me: &Combatant, world: &WorldView, radius: f32) -> Option<Vec2> {
    let threat = world
        .threats_to(me.side)
        .filter(|t| t.position.distance(me.position) <= radius)
        .filter(|t| t.velocity.dot(me.position - t.position) > 0.0)
        .min_by(|a, b| {
            a.position
                .distance_squared(me.position)
                .total_cmp(&b.position.distance_squared(me.position))
        })?;

    let side = threat.velocity.perp().normalize_or_zero();
    if side == Vec2::ZERO {
        return None;
    }
    if side.dot(me.position - threat.position) < 0.0 {
        Some(-side)
    } else {
        Some(side)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::PcgRng;
    use crate::pattern::{ArchetypeId, standard_catalog};
    use crate::state::{CombatStats, EntityId, Side, StatusEffect, Threat};

    fn director() -> BossDirector {
        BossDirector::new(&CombatConfig::default(), standard_catalog().unwrap())
    }

    fn boss_at(position: Vec2) -> Combatant {
        let stats = CombatStats {
            health: 1000.0,
            max_health: 1000.0,
            attack_range: 120.0,
            aggro_range: 600.0,
            ..CombatStats::default()
        };
        Combatant::new(EntityId(1), "herald", Side::Hostile, stats)
            .with_boss(BossState::new(ArchetypeId::StormHerald))
            .at(position)
    }

    fn hero_at(position: Vec2) -> Combatant {
        Combatant::new(EntityId(2), "hero", Side::Players, CombatStats::default()).at(position)
    }

    #[test]
    fn engages_target_and_reports_intent() {
        let director = director();
        let mut me = boss_at(Vec2::ZERO);
        let world = WorldView::from_combatants(&[hero_at(Vec2::new(100.0, 0.0))]);
        let mut rng = PcgRng::new(3);

        let out = director.tick(&mut me, &world, None, &mut rng, 0.05);
        assert_eq!(me.target, Some(EntityId(2)));
        assert_eq!(me.ai_state, AiState::Attack);
        let intent = out.intent.unwrap();
        assert_eq!(intent.entity, EntityId(1));
        assert!(intent.pattern.is_some());
    }

    #[test]
    fn phase_transition_flashes_and_requests_minions() {
        let director = director();
        let mut me = boss_at(Vec2::ZERO);
        me.stats.health = 500.0;
        let world = WorldView::from_combatants(&[hero_at(Vec2::new(100.0, 0.0))]);
        let mut rng = PcgRng::new(3);

        let out = director.tick(&mut me, &world, None, &mut rng, 0.05);
        assert!(out.intent.unwrap().phase_flash);
        assert_eq!(out.spawn_requests.len(), 1);
        assert_eq!(out.spawn_requests[0].kind, "storm_sprite");
    }

    #[test]
    fn stunned_boss_holds_still() {
        let director = director();
        let mut me = boss_at(Vec2::ZERO);
        me.apply_status(StatusEffect::STUN, 1.0, None);
        let world = WorldView::from_combatants(&[hero_at(Vec2::new(100.0, 0.0))]);
        let mut rng = PcgRng::new(3);

        let out = director.tick(&mut me, &world, None, &mut rng, 0.05);
        assert_eq!(me.ai_state, AiState::Stunned);
        assert_eq!(me.velocity, Vec2::ZERO);
        assert!(out.attacks.is_empty());
        assert!(me.boss.as_ref().unwrap().active.is_none());
    }

    #[test]
    fn far_target_triggers_teleport() {
        let director = director();
        let mut me = boss_at(Vec2::ZERO);
        let mut boss = me.boss.take().unwrap();
        // Keep the engine from driving movement this tick.
        boss.recovery = 1.0;
        me.boss = Some(boss);
        me.target = Some(EntityId(2));
        let world = WorldView::from_combatants(&[hero_at(Vec2::new(1500.0, 0.0))]);
        let mut rng = PcgRng::new(3);

        let out = director.tick(&mut me, &world, None, &mut rng, 0.05);
        let landing = out.intent.unwrap().teleport.unwrap();
        assert!((landing.x - (1500.0 - 96.0)).abs() < 1e-3);
        assert_eq!(me.position, landing);
    }

    #[test]
    fn dodges_incoming_projectile() {
        let director = director();
        let mut me = boss_at(Vec2::ZERO);
        let mut boss = me.boss.take().unwrap();
        boss.recovery = 1.0;
        me.boss = Some(boss);
        let world = WorldView::default().with_threats(vec![Threat {
            owner_side: Side::Players,
            position: Vec2::new(-50.0, 5.0),
            velocity: Vec2::new(300.0, 0.0),
        }]);
        let mut rng = PcgRng::new(3);

        let out = director.tick(&mut me, &world, None, &mut rng, 0.05);
        assert!(out.intent.unwrap().dash_trail);
        // Sidestep is perpendicular to the shot, away from its line.
        assert!(me.velocity.x.abs() < 1e-3);
        assert!(me.velocity.y < 0.0);
    }

    #[test]
    fn stuck_boss_breaks_free() {
        let director = director();
        let mut me = boss_at(Vec2::ZERO);
        let mut boss = me.boss.take().unwrap();
        boss.teleport_cooldown = 100.0;
        boss.dash_cooldown = 100.0;
        me.boss = Some(boss);
        let world = WorldView::from_combatants(&[hero_at(Vec2::new(200.0, 0.0))]);
        let mut rng = PcgRng::new(3);

        let mut dashed = false;
        for _ in 0..40 {
            let mut boss = me.boss.take().unwrap();
            boss.active = None;
            boss.recovery = 1.0;
            boss.idle_timer = 0.0;
            me.boss = Some(boss);
            // Never integrate, as if pinned against a wall.
            let out = director.tick(&mut me, &world, None, &mut rng, 0.05);
            if out.intent.unwrap().dash_trail {
                dashed = true;
                break;
            }
        }
        assert!(dashed);
    }
}
