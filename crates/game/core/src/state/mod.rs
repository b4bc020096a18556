//! Combatant state owned by an encounter.
//!
//! Everything here is plain data plus local invariants (clamped health,
//! bounded status lists, history eviction). Decision logic lives in
//! [`crate::ai`] and [`crate::pattern`]; resolution lives in
//! [`crate::combat`].
mod boss;
mod combatant;
mod common;
mod roster;
mod status;
mod telegraph;
mod view;

pub use boss::{BossState, MovementMode, PatternHistory, PhaseTriggers};
pub use combatant::{
    Ability, AbilityKind, AiState, CombatStats, Combatant, Control, WanderState,
};
pub use common::{EntityId, Side, Vec2, direction_or};
pub use roster::{Roster, RosterError};
pub use status::{ActiveStatus, MIN_SPEED_MULTIPLIER, StatusEffect, StatusEffects, StatusKind};
pub use telegraph::{Telegraph, TelegraphShape};
pub use view::{TargetInfo, Threat, WorldView};
