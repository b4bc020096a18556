//! Combatant state: stats, kinematics, timers, and the optional boss block.

use arrayvec::ArrayVec;
use glam::Vec2;
use tracing::warn;

use crate::combat::{DamageOutcome, Element};
use crate::config::CombatConfig;
use crate::state::{BossState, EntityId, Side, StatusEffect, StatusEffects};

/// Base combat statistics.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatStats {
    pub health: f32,
    pub max_health: f32,
    pub damage: f32,
    pub defense: f32,
    /// Movement speed in world units per second.
    pub speed: f32,
    pub attack_range: f32,
    pub aggro_range: f32,
    /// Seconds between basic attacks.
    pub attack_cooldown: f32,
}

impl Default for CombatStats {
    fn default() -> Self {
        Self {
            health: 100.0,
            max_health: 100.0,
            damage: 10.0,
            defense: 0.0,
            speed: 90.0,
            attack_range: 48.0,
            aggro_range: 320.0,
            attack_cooldown: 1.0,
        }
    }
}

impl CombatStats {
    /// Health as a fraction of maximum, 0 when max is not positive.
    pub fn health_ratio(&self) -> f32 {
        if self.max_health > 0.0 {
            (self.health / self.max_health).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// High-level AI state visible to the presentation layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum AiState {
    #[default]
    Idle,
    Chase,
    Attack,
    Stunned,
}

/// Who decides what a combatant does each tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Control {
    /// Driven by the encounter's AI (basic or boss).
    #[default]
    Ai,
    /// Driven by the caller (player input, scripted actors).
    External,
}

/// Special attacks a basic combatant can use instead of its basic attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum AbilityKind {
    /// Single fast projectile.
    Bolt,
    /// Three-projectile fan.
    Volley,
    /// Short-lived area burst around self.
    Slam,
    /// Long-reach melee strike with knockback.
    Lunge,
    /// Slow projectile that poisons.
    Spit,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ability {
    pub kind: AbilityKind,
    pub cooldown: f32,
    /// Seconds until ready.
    pub remaining: f32,
    pub range: f32,
}

impl Ability {
    pub fn new(kind: AbilityKind, cooldown: f32, range: f32) -> Self {
        Self {
            kind,
            cooldown,
            remaining: 0.0,
            range,
        }
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        self.remaining <= 0.0
    }

    pub fn trigger(&mut self) {
        self.remaining = self.cooldown;
    }
}

/// Idle wander bookkeeping.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WanderState {
    pub point: Option<Vec2>,
    pub timer: f32,
}

/// A single combatant in an encounter.
#[derive(Clone, Debug, PartialEq)]
pub struct Combatant {
    pub id: EntityId,
    /// Template or archetype key, used for minion spawn requests and logs.
    pub kind: String,
    pub name: String,
    pub side: Side,
    pub control: Control,
    pub element: Element,
    pub stats: CombatStats,
    /// Body radius for collision tests.
    pub radius: f32,

    pub position: Vec2,
    /// Unit vector the combatant faces.
    pub facing: Vec2,
    /// Intended velocity for this tick (before status modifiers).
    pub velocity: Vec2,
    /// External impulse that decays over time.
    pub knockback: Vec2,
    pub last_valid_position: Vec2,

    pub ai_state: AiState,
    pub target: Option<EntityId>,
    /// Require line of sight when acquiring targets.
    pub requires_los: bool,
    pub wander: WanderState,

    pub status: StatusEffects,
    pub abilities: ArrayVec<Ability, { CombatConfig::MAX_ABILITIES }>,

    /// Boss that summoned this combatant.
    pub summoner: Option<EntityId>,
    /// Counts toward the summoner's phase-transition heal while alive.
    pub bound_to_phase: bool,

    /// Seconds of remaining invulnerability.
    pub invulnerable: f32,
    /// Seconds until the next basic attack.
    pub attack_timer: f32,
    pub last_attacker: Option<EntityId>,

    pub boss: Option<Box<BossState>>,
}

impl Combatant {
    pub fn new(id: EntityId, name: impl Into<String>, side: Side, stats: CombatStats) -> Self {
        let name = name.into();
        Self {
            id,
            kind: name.clone(),
            name,
            side,
            control: Control::Ai,
            element: Element::Physical,
            stats,
            radius: 14.0,
            position: Vec2::ZERO,
            facing: Vec2::X,
            velocity: Vec2::ZERO,
            knockback: Vec2::ZERO,
            last_valid_position: Vec2::ZERO,
            ai_state: AiState::Idle,
            target: None,
            requires_los: false,
            wander: WanderState::default(),
            status: StatusEffects::empty(),
            abilities: ArrayVec::new(),
            summoner: None,
            bound_to_phase: false,
            invulnerable: 0.0,
            attack_timer: 0.0,
            last_attacker: None,
            boss: None,
        }
    }

    // ===== builder =====

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    pub fn at(mut self, position: Vec2) -> Self {
        self.position = position;
        self.last_valid_position = position;
        self
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_element(mut self, element: Element) -> Self {
        self.element = element;
        self
    }

    pub fn with_control(mut self, control: Control) -> Self {
        self.control = control;
        self
    }

    pub fn with_line_of_sight(mut self) -> Self {
        self.requires_los = true;
        self
    }

    /// Adds an ability. Abilities beyond capacity are ignored.
    pub fn with_ability(mut self, ability: Ability) -> Self {
        let _ = self.abilities.try_push(ability);
        self
    }

    pub fn summoned_by(mut self, summoner: EntityId, bound_to_phase: bool) -> Self {
        self.summoner = Some(summoner);
        self.bound_to_phase = bound_to_phase;
        self
    }

    pub fn with_boss(mut self, boss: BossState) -> Self {
        self.element = boss.archetype.info().element;
        self.boss = Some(Box::new(boss));
        self
    }

    // ===== queries =====

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.stats.health > 0.0
    }

    #[inline]
    pub fn is_boss(&self) -> bool {
        self.boss.is_some()
    }

    #[inline]
    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable > 0.0
    }

    // ===== mutation =====

    /// Removes health. Invulnerable or dead combatants take nothing.
    pub fn take_damage(&mut self, amount: f32, source: EntityId) -> DamageOutcome {
        if !self.is_alive() || self.is_invulnerable() {
            return DamageOutcome::BLOCKED;
        }
        let amount = if amount.is_finite() { amount.max(0.0) } else { 0.0 };
        let dealt = amount.min(self.stats.health);
        self.stats.health -= dealt;
        if !source.is_environment() {
            self.last_attacker = Some(source);
        }
        DamageOutcome {
            dealt,
            killed: !self.is_alive(),
            blocked: false,
        }
    }

    /// Restores health up to maximum and returns the amount restored.
    pub fn heal(&mut self, amount: f32) -> f32 {
        if !self.is_alive() || !amount.is_finite() || amount <= 0.0 {
            return 0.0;
        }
        let before = self.stats.health;
        self.stats.health = (before + amount).min(self.stats.max_health);
        self.stats.health - before
    }

    pub fn apply_status(&mut self, effect: StatusEffect, duration: f32, source: Option<EntityId>) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.status.apply(effect, duration, source)
    }

    /// Advances per-combatant timers and returns damage-over-time owed.
    pub fn tick_timers(&mut self, dt: f32) -> f32 {
        self.invulnerable = (self.invulnerable - dt).max(0.0);
        self.attack_timer = (self.attack_timer - dt).max(0.0);
        for ability in self.abilities.iter_mut() {
            ability.remaining = (ability.remaining - dt).max(0.0);
        }
        self.status.tick(dt)
    }

    /// Moves by velocity (scaled by status) plus knockback.
    ///
    /// A non-finite result snaps back to the last valid position and zeroes
    /// all motion.
    pub fn integrate(&mut self, dt: f32, knockback_decay: f32) {
        let speed = if self.status.is_stunned() {
            0.0
        } else {
            self.status.speed_multiplier()
        };
        let motion = self.velocity * speed + self.knockback;
        self.position += motion * dt;
        self.knockback *= (-knockback_decay * dt).exp();

        if self.position.is_finite() {
            self.last_valid_position = self.position;
        } else {
            warn!(entity = %self.id, "non-finite position, restoring last valid");
            self.position = self.last_valid_position;
            self.velocity = Vec2::ZERO;
            self.knockback = Vec2::ZERO;
        }
        if !self.facing.is_finite() || self.facing == Vec2::ZERO {
            self.facing = Vec2::X;
        }
    }

    /// Turns to face `point` when it is not on top of us.
    pub fn face(&mut self, point: Vec2) {
        let dir = (point - self.position).normalize_or_zero();
        if dir != Vec2::ZERO {
            self.facing = dir;
        }
    }
}
