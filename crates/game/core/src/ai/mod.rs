//! Per-tick combatant decisions.
//!
//! - [`BossDirector`]: phase controller, targeting, pattern engine, movement
//! - [`BasicAi`]: behavior tree for everything else
//!
//! Both read a [`WorldView`](crate::state::WorldView) snapshot and return an
//! [`AiOutput`]; neither touches the resolution pipeline or presentation.

mod basic;
mod director;
mod intent;
mod phase;
mod targeting;

pub use basic::{
    AttackTarget, BasicAi, BasicTree, Blackboard, ChaseTarget, Wander, has_target, hold_still,
    in_attack_range, is_stunned, standard_tree,
};
pub use director::BossDirector;
pub use intent::{AiOutput, SpawnRequest, VisualIntent};
pub use phase::{PhaseController, PhaseEvents};
pub use targeting::update_target;
