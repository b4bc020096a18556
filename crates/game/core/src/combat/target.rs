//! The seam between the resolution pipeline and whatever it hits.

use glam::Vec2;

use crate::combat::DamageOutcome;
use crate::state::{Combatant, EntityId, Side, StatusEffect};

/// Anything the pipeline can collide with.
///
/// Only identity and geometry are required. Reaction hooks default to
/// ignoring the interaction, so props and training dummies can opt in to
/// just what they need.
pub trait CombatTarget {
    fn id(&self) -> EntityId;
    fn side(&self) -> Side;
    fn position(&self) -> Vec2;
    fn radius(&self) -> f32;
    fn is_active(&self) -> bool;

    /// Unit facing, used to anchor melee hitboxes of this entity.
    fn facing(&self) -> Vec2 {
        Vec2::X
    }

    fn defense(&self) -> f32 {
        0.0
    }

    /// Fraction of incoming damage absorbed before mitigation.
    fn damage_reduction(&self) -> f32 {
        0.0
    }

    fn receive_damage(&mut self, _amount: f32, _source: EntityId) -> DamageOutcome {
        DamageOutcome::BLOCKED
    }

    /// Returns health restored.
    fn receive_heal(&mut self, _amount: f32) -> f32 {
        0.0
    }

    fn receive_status(&mut self, _effect: StatusEffect, _duration: f32, _source: EntityId) {}

    fn receive_knockback(&mut self, _impulse: Vec2) {}
}

impl CombatTarget for Combatant {
    fn id(&self) -> EntityId {
        self.id
    }

    fn side(&self) -> Side {
        self.side
    }

    fn position(&self) -> Vec2 {
        self.position
    }

    fn radius(&self) -> f32 {
        self.radius
    }

    fn is_active(&self) -> bool {
        self.is_alive()
    }

    fn facing(&self) -> Vec2 {
        self.facing
    }

    fn defense(&self) -> f32 {
        self.stats.defense
    }

    fn damage_reduction(&self) -> f32 {
        self.status.damage_reduction()
    }

    fn receive_damage(&mut self, amount: f32, source: EntityId) -> DamageOutcome {
        self.take_damage(amount, source)
    }

    fn receive_heal(&mut self, amount: f32) -> f32 {
        self.heal(amount)
    }

    fn receive_status(&mut self, effect: StatusEffect, duration: f32, source: EntityId) {
        if self.is_invulnerable() {
            return;
        }
        self.apply_status(effect, duration, Some(source));
    }

    fn receive_knockback(&mut self, impulse: Vec2) {
        if self.is_invulnerable() || !impulse.is_finite() {
            return;
        }
        self.knockback += impulse;
    }
}
