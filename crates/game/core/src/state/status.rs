//! Status effect tracking for combatants.
//!
//! Effects carry a remaining duration in seconds and a magnitude whose meaning
//! depends on the kind (slow fraction, damage per second, haste bonus, damage
//! reduction). Re-applying a kind never stacks a second entry: the existing
//! entry keeps the longer remaining duration and the stronger magnitude.

use arrayvec::ArrayVec;
use tracing::warn;

use crate::config::CombatConfig;
use crate::state::EntityId;

/// Lowest speed multiplier slows can push a combatant to.
pub const MIN_SPEED_MULTIPLIER: f32 = 0.1;

/// Types of status effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum StatusKind {
    /// Movement speed reduced by `magnitude` (fraction, 0..1).
    Slow,
    /// Cannot move or act.
    Stun,
    /// `magnitude` damage per second.
    Poison,
    /// `magnitude` damage per second.
    Burn,
    /// Movement speed increased by `magnitude` (fraction).
    Haste,
    /// Incoming damage reduced by `magnitude` (fraction, 0..1).
    Shield,
}

impl StatusKind {
    /// True for kinds that deal periodic damage.
    #[inline]
    pub const fn is_damage_over_time(self) -> bool {
        matches!(self, StatusKind::Poison | StatusKind::Burn)
    }
}

/// An effect to apply: kind plus magnitude.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffect {
    pub kind: StatusKind,
    pub magnitude: f32,
}

impl StatusEffect {
    pub const STUN: Self = Self {
        kind: StatusKind::Stun,
        magnitude: 0.0,
    };

    pub fn slow(fraction: f32) -> Self {
        Self {
            kind: StatusKind::Slow,
            magnitude: fraction.clamp(0.0, 1.0),
        }
    }

    pub fn poison(dps: f32) -> Self {
        Self {
            kind: StatusKind::Poison,
            magnitude: dps.max(0.0),
        }
    }

    pub fn burn(dps: f32) -> Self {
        Self {
            kind: StatusKind::Burn,
            magnitude: dps.max(0.0),
        }
    }

    pub fn haste(bonus: f32) -> Self {
        Self {
            kind: StatusKind::Haste,
            magnitude: bonus.max(0.0),
        }
    }

    pub fn shield(reduction: f32) -> Self {
        Self {
            kind: StatusKind::Shield,
            magnitude: reduction.clamp(0.0, 1.0),
        }
    }
}

/// A live effect with its remaining duration.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveStatus {
    pub kind: StatusKind,
    pub magnitude: f32,
    /// Seconds until expiry.
    pub remaining: f32,
    /// Who applied it (used to attribute damage-over-time kills).
    pub source: Option<EntityId>,
}

/// Active status effects on a combatant.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffects {
    effects: ArrayVec<ActiveStatus, { CombatConfig::MAX_STATUS_EFFECTS }>,
}

impl StatusEffects {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Applies or refreshes an effect.
    ///
    /// Returns false when the list is full and the new kind was dropped.
    pub fn apply(&mut self, effect: StatusEffect, duration: f32, source: Option<EntityId>) -> bool {
        if !(duration > 0.0) || !effect.magnitude.is_finite() {
            return false;
        }

        if let Some(existing) = self.effects.iter_mut().find(|e| e.kind == effect.kind) {
            existing.remaining = existing.remaining.max(duration);
            if effect.magnitude > existing.magnitude {
                existing.magnitude = effect.magnitude;
                existing.source = source.or(existing.source);
            }
            return true;
        }

        let entry = ActiveStatus {
            kind: effect.kind,
            magnitude: effect.magnitude,
            remaining: duration,
            source,
        };
        if self.effects.try_push(entry).is_err() {
            warn!(kind = %effect.kind, "status list full, effect dropped");
            return false;
        }
        true
    }

    /// Advances timers by `dt` and returns damage-over-time dealt this tick.
    ///
    /// Damage is accumulated before expired entries are removed, so an effect
    /// expiring mid-tick still deals damage for the part of the tick it was
    /// alive.
    pub fn tick(&mut self, dt: f32) -> f32 {
        let mut damage = 0.0;
        for effect in self.effects.iter_mut() {
            let active = effect.remaining.min(dt).max(0.0);
            if effect.kind.is_damage_over_time() {
                damage += effect.magnitude * active;
            }
            effect.remaining -= dt;
        }
        self.effects.retain(|e| e.remaining > 0.0);
        damage
    }

    pub fn has(&self, kind: StatusKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    pub fn get(&self, kind: StatusKind) -> Option<&ActiveStatus> {
        self.effects.iter().find(|e| e.kind == kind)
    }

    pub fn is_stunned(&self) -> bool {
        self.has(StatusKind::Stun)
    }

    /// Product of slow and haste modifiers, floored at
    /// [`MIN_SPEED_MULTIPLIER`].
    pub fn speed_multiplier(&self) -> f32 {
        let multiplier = self.effects.iter().fold(1.0, |acc, e| match e.kind {
            StatusKind::Slow => acc * (1.0 - e.magnitude),
            StatusKind::Haste => acc * (1.0 + e.magnitude),
            _ => acc,
        });
        multiplier.max(MIN_SPEED_MULTIPLIER)
    }

    /// Fraction of incoming damage absorbed by a shield.
    pub fn damage_reduction(&self) -> f32 {
        self.get(StatusKind::Shield)
            .map(|e| e.magnitude)
            .unwrap_or(0.0)
    }

    /// Source of the strongest damage-over-time effect, if any.
    pub fn dot_source(&self) -> Option<EntityId> {
        self.effects
            .iter()
            .filter(|e| e.kind.is_damage_over_time())
            .max_by(|a, b| a.magnitude.total_cmp(&b.magnitude))
            .and_then(|e| e.source)
    }

    pub fn remove(&mut self, kind: StatusKind) {
        self.effects.retain(|e| e.kind != kind);
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActiveStatus> {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}
