use std::fmt;

pub use glam::Vec2;

/// Unique identifier for any combatant tracked by an encounter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub u32);

impl EntityId {
    /// Reserved identifier for environment-originated damage (hazards, DoT
    /// without a known source).
    pub const ENVIRONMENT: Self = Self(u32::MAX);

    #[inline]
    pub const fn is_environment(self) -> bool {
        self.0 == Self::ENVIRONMENT.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Team membership used by the hostility filter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Side {
    Players,
    #[default]
    Hostile,
    /// Never targeted and never targets.
    Neutral,
}

impl Side {
    /// Players and hostiles oppose each other. Neutral opposes nobody.
    #[inline]
    pub const fn is_opposed(self, other: Side) -> bool {
        matches!(
            (self, other),
            (Side::Players, Side::Hostile) | (Side::Hostile, Side::Players)
        )
    }
}

/// Unit vector for `v`, or `fallback` when `v` is zero or non-finite.
#[inline]
pub fn direction_or(v: Vec2, fallback: Vec2) -> Vec2 {
    let n = v.normalize_or_zero();
    if n == Vec2::ZERO { fallback } else { n }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hostility_is_symmetric_and_excludes_neutral() {
        assert!(Side::Players.is_opposed(Side::Hostile));
        assert!(Side::Hostile.is_opposed(Side::Players));
        assert!(!Side::Hostile.is_opposed(Side::Hostile));
        assert!(!Side::Neutral.is_opposed(Side::Players));
        assert!(!Side::Players.is_opposed(Side::Neutral));
    }

    #[test]
    fn direction_falls_back_on_zero() {
        assert_eq!(direction_or(Vec2::ZERO, Vec2::Y), Vec2::Y);
        assert_eq!(direction_or(Vec2::new(3.0, 0.0), Vec2::Y), Vec2::X);
    }
}
