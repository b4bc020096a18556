//! Read-only snapshot of the encounter used for AI decisions.
//!
//! AI for one combatant runs while others are mutably borrowed, so decisions
//! read from this snapshot instead of the live roster.

use glam::Vec2;

use crate::state::{Combatant, EntityId, Side};

/// What AI needs to know about another combatant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetInfo {
    pub id: EntityId,
    pub side: Side,
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
    pub active: bool,
    pub is_boss: bool,
    pub health_ratio: f32,
    pub summoner: Option<EntityId>,
    pub bound_to_phase: bool,
}

impl TargetInfo {
    pub fn of(combatant: &Combatant) -> Self {
        Self {
            id: combatant.id,
            side: combatant.side,
            position: combatant.position,
            velocity: combatant.velocity,
            radius: combatant.radius,
            active: combatant.is_alive(),
            is_boss: combatant.is_boss(),
            health_ratio: combatant.stats.health_ratio(),
            summoner: combatant.summoner,
            bound_to_phase: combatant.bound_to_phase,
        }
    }
}

/// A live hostile projectile the dodge logic can react to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Threat {
    pub owner_side: Side,
    pub position: Vec2,
    pub velocity: Vec2,
}

#[derive(Clone, Debug, Default)]
pub struct WorldView {
    pub targets: Vec<TargetInfo>,
    pub threats: Vec<Threat>,
}

impl WorldView {
    pub fn from_combatants<'a>(combatants: impl IntoIterator<Item = &'a Combatant>) -> Self {
        Self {
            targets: combatants.into_iter().map(TargetInfo::of).collect(),
            threats: Vec::new(),
        }
    }

    pub fn with_threats(mut self, threats: Vec<Threat>) -> Self {
        self.threats = threats;
        self
    }

    pub fn get(&self, id: EntityId) -> Option<&TargetInfo> {
        self.targets.iter().find(|t| t.id == id)
    }

    /// Active combatants opposed to `side`.
    pub fn opponents_of(&self, side: Side) -> impl Iterator<Item = &TargetInfo> + '_ {
        self.targets
            .iter()
            .filter(move |t| t.active && side.is_opposed(t.side))
    }

    /// Living minions summoned by `boss` during a phase transition.
    pub fn live_bound_minions(&self, boss: EntityId) -> u32 {
        self.targets
            .iter()
            .filter(|t| t.active && t.bound_to_phase && t.summoner == Some(boss))
            .count() as u32
    }

    /// Projectiles owned by sides hostile to `side`.
    pub fn threats_to(&self, side: Side) -> impl Iterator<Item = &Threat> + '_ {
        self.threats
            .iter()
            .filter(move |t| t.owner_side.is_opposed(side))
    }
}
