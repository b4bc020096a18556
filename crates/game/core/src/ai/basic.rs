//! Behavior-tree AI for ordinary combatants.
//!
//! ```text
//! Selector
//!   ├─ Sequence [is_stunned?, hold_still]
//!   ├─ Sequence [has_target?, Selector
//!   │              ├─ Sequence [in_attack_range?, AttackTarget]
//!   │              └─ ChaseTarget ]
//!   └─ Wander
//! ```
//!
//! Guards are plain predicates wrapped as `Condition` leaves; stateful
//! actions are unit structs.
//!
//! Nodes operate on a [`Blackboard`] copied out of the combatant before the
//! tick and written back afterwards, so the tree never borrows the roster.
//! Random draws are sampled up front for the same reason.

use arrayvec::ArrayVec;
use behavior_tree::builder::{action, condition, selector, sequence};
use behavior_tree::{Behavior, Status};
use glam::Vec2;

use crate::ai::{AiOutput, update_target};
use crate::combat::{Aim, AttackDescriptor, Element, HitPayload, Owner};
use crate::config::{CombatConfig, TargetingConfig};
use crate::env::{RngOracle, TileOracle};
use crate::pattern::shapes::fan_directions;
use crate::state::{
    Ability, AbilityKind, AiState, CombatStats, Combatant, StatusEffect, TargetInfo, WanderState,
    WorldView, direction_or,
};

/// Wander movement speed as a fraction of full speed.
const WANDER_SPEED: f32 = 0.5;
/// Close enough to a wander point to stop.
const WANDER_ARRIVAL: f32 = 4.0;
const PROJECTILE_SPEED: f32 = 260.0;

/// Per-tick working state for one combatant.
#[derive(Clone, Debug)]
pub struct Blackboard {
    pub owner: Owner,
    pub position: Vec2,
    pub facing: Vec2,
    pub velocity: Vec2,
    pub element: Element,
    pub stats: CombatStats,
    /// Speed after status modifiers.
    pub speed: f32,
    pub stunned: bool,
    pub target: Option<TargetInfo>,
    pub attack_timer: f32,
    pub abilities: ArrayVec<Ability, { CombatConfig::MAX_ABILITIES }>,
    pub wander: WanderState,
    pub ai_state: AiState,
    /// Two uniform draws in [0, 1) for this tick.
    pub rolls: [f32; 2],
    pub dt: f32,
    pub melee_threshold: f32,
    pub wander_radius: f32,
    pub wander_interval: f32,
    pub attacks: Vec<AttackDescriptor>,
}

impl Blackboard {
    fn target_distance(&self) -> Option<f32> {
        self.target.map(|t| self.position.distance(t.position))
    }
}

pub type BasicTree = Box<dyn Behavior<Blackboard>>;

/// The standard melee/ranged tree.
pub fn standard_tree() -> BasicTree {
    selector(vec![
        sequence(vec![condition(is_stunned), action(hold_still)]),
        sequence(vec![
            condition(has_target),
            selector(vec![
                sequence(vec![condition(in_attack_range), Box::new(AttackTarget)]),
                Box::new(ChaseTarget),
            ]),
        ]),
        Box::new(Wander),
    ])
}

pub struct BasicAi {
    tree: BasicTree,
    targeting: TargetingConfig,
}

impl BasicAi {
    pub fn new(targeting: TargetingConfig) -> Self {
        Self::with_tree(targeting, standard_tree())
    }

    pub fn with_tree(targeting: TargetingConfig, tree: BasicTree) -> Self {
        Self { tree, targeting }
    }

    pub fn tick(
        &self,
        me: &mut Combatant,
        world: &WorldView,
        tiles: Option<&dyn TileOracle>,
        rng: &mut dyn RngOracle,
        dt: f32,
    ) -> AiOutput {
        if !me.is_alive() {
            return AiOutput::default();
        }
        let target = update_target(me, world, tiles, &self.targeting);

        let mut board = Blackboard {
            owner: Owner::new(me.id, me.side),
            position: me.position,
            facing: me.facing,
            velocity: Vec2::ZERO,
            element: me.element,
            stats: me.stats,
            speed: me.stats.speed,
            stunned: me.status.is_stunned(),
            target,
            attack_timer: me.attack_timer,
            abilities: me.abilities.clone(),
            wander: me.wander,
            ai_state: me.ai_state,
            rolls: [rng.next_f32(), rng.next_f32()],
            dt,
            melee_threshold: self.targeting.melee_range_threshold,
            wander_radius: self.targeting.wander_radius,
            wander_interval: self.targeting.wander_interval,
            attacks: Vec::new(),
        };
        self.tree.tick(&mut board);

        me.velocity = board.velocity;
        me.facing = direction_or(board.facing, me.facing);
        me.ai_state = board.ai_state;
        me.attack_timer = board.attack_timer;
        me.abilities = board.abilities;
        me.wander = board.wander;

        AiOutput {
            attacks: board.attacks,
            ..AiOutput::default()
        }
    }
}

// ============================================================================
// Conditions
// ============================================================================

pub fn is_stunned(ctx: &Blackboard) -> bool {
    ctx.stunned
}

pub fn has_target(ctx: &Blackboard) -> bool {
    ctx.target.is_some()
}

/// Target within attack range, measured to the edge of its body.
pub fn in_attack_range(ctx: &Blackboard) -> bool {
    let reach = ctx.stats.attack_range + ctx.target.map_or(0.0, |t| t.radius);
    ctx.target_distance().is_some_and(|d| d <= reach)
}

// ============================================================================
// Actions
// ============================================================================

pub fn hold_still(ctx: &mut Blackboard) -> Status {
    ctx.velocity = Vec2::ZERO;
    ctx.ai_state = AiState::Stunned;
    Status::Success
}

pub struct ChaseTarget;

impl Behavior<Blackboard> for ChaseTarget {
    fn tick(&self, ctx: &mut Blackboard) -> Status {
        let Some(target) = ctx.target else {
            return Status::Failure;
        };
        let dir = direction_or(target.position - ctx.position, ctx.facing);
        ctx.velocity = dir * ctx.speed;
        ctx.facing = dir;
        ctx.ai_state = AiState::Chase;
        Status::Running
    }
}

/// Stands and strikes: first ready ability in range, else the basic attack.
///
/// Runs while the attack cooldown is pending.
pub struct AttackTarget;

impl Behavior<Blackboard> for AttackTarget {
    fn tick(&self, ctx: &mut Blackboard) -> Status {
        let Some(target) = ctx.target else {
            return Status::Failure;
        };
        ctx.velocity = Vec2::ZERO;
        ctx.facing = direction_or(target.position - ctx.position, ctx.facing);
        ctx.ai_state = AiState::Attack;
        if ctx.attack_timer > 0.0 {
            return Status::Running;
        }

        let distance = ctx.position.distance(target.position);
        let ready = ctx
            .abilities
            .iter_mut()
            .find(|a| a.is_ready() && distance <= a.range + target.radius);
        let attacks = match ready {
            Some(ability) => {
                ability.trigger();
                let kind = ability.kind;
                ability_attacks(ctx, kind, &target)
            }
            None => vec![basic_attack(ctx, &target)],
        };
        ctx.attacks.extend(attacks);
        ctx.attack_timer = ctx.stats.attack_cooldown;
        Status::Success
    }
}

/// Drifts between random points near the current position.
pub struct Wander;

impl Behavior<Blackboard> for Wander {
    fn tick(&self, ctx: &mut Blackboard) -> Status {
        ctx.ai_state = AiState::Idle;
        ctx.wander.timer -= ctx.dt;
        if ctx.wander.timer <= 0.0 || ctx.wander.point.is_none() {
            let angle = ctx.rolls[0] * std::f32::consts::TAU;
            let distance = ctx.rolls[1] * ctx.wander_radius;
            ctx.wander.point = Some(ctx.position + Vec2::from_angle(angle) * distance);
            ctx.wander.timer = ctx.wander_interval;
        }

        let Some(point) = ctx.wander.point else {
            return Status::Failure;
        };
        let offset = point - ctx.position;
        if offset.length() <= WANDER_ARRIVAL {
            ctx.velocity = Vec2::ZERO;
        } else {
            let dir = offset.normalize_or_zero();
            ctx.velocity = dir * ctx.speed * WANDER_SPEED;
            ctx.facing = direction_or(dir, ctx.facing);
        }
        Status::Running
    }
}

// ============================================================================
// Attack construction
// ============================================================================

fn basic_attack(ctx: &Blackboard, target: &TargetInfo) -> AttackDescriptor {
    let desc = if ctx.stats.attack_range <= ctx.melee_threshold {
        AttackDescriptor::melee(
            ctx.owner,
            ctx.position,
            ctx.facing,
            ctx.stats.attack_range,
            ctx.stats.damage,
        )
    } else {
        AttackDescriptor::projectile(
            ctx.owner,
            ctx.position,
            Aim::Point(target.position),
            PROJECTILE_SPEED,
            ctx.stats.damage,
        )
    };
    desc.with_element(ctx.element)
}

fn ability_attacks(ctx: &Blackboard, kind: AbilityKind, target: &TargetInfo) -> Vec<AttackDescriptor> {
    let damage = ctx.stats.damage;
    let toward = direction_or(target.position - ctx.position, ctx.facing);
    let attacks = match kind {
        AbilityKind::Bolt => vec![AttackDescriptor::projectile(
            ctx.owner,
            ctx.position,
            Aim::Point(target.position),
            340.0,
            damage * 1.2,
        )],
        AbilityKind::Volley => fan_directions(toward.to_angle(), 3, Some(0.5))
            .map(|dir| {
                AttackDescriptor::projectile(
                    ctx.owner,
                    ctx.position,
                    Aim::Direction(dir),
                    PROJECTILE_SPEED,
                    damage * 0.8,
                )
            })
            .collect(),
        AbilityKind::Slam => vec![
            AttackDescriptor::aoe(ctx.owner, ctx.position, 70.0, damage * 1.5)
                .with_payload(HitPayload::knockback(180.0)),
        ],
        AbilityKind::Lunge => vec![
            AttackDescriptor::melee(
                ctx.owner,
                ctx.position,
                toward,
                ctx.stats.attack_range * 1.5,
                damage * 1.3,
            )
            .with_payload(HitPayload::knockback(120.0)),
        ],
        AbilityKind::Spit => vec![
            AttackDescriptor::projectile(
                ctx.owner,
                ctx.position,
                Aim::Point(target.position),
                220.0,
                damage * 0.6,
            )
            .with_payload(HitPayload::effect(StatusEffect::poison(4.0), 3.0)),
        ],
    };
    attacks
        .into_iter()
        .map(|desc| desc.with_element(ctx.element))
        .collect()
}
