//! Damage calculation and element tags.

use crate::config::ResolutionConfig;

// ============================================================================
// Element
// ============================================================================

/// Element tag carried by every attack.
///
/// Elements only affect presentation (telegraph colors) and which status
/// payload an archetype's patterns attach. Mitigation is element-agnostic.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Element {
    #[default]
    Physical,
    Fire,
    Frost,
    Lightning,
    Poison,
    Shadow,
    Arcane,
}

impl Element {
    /// RGB color hint used for telegraphs of this element.
    pub const fn color(self) -> u32 {
        match self {
            Element::Physical => 0xd0d0d0,
            Element::Fire => 0xff5a1f,
            Element::Frost => 0x7fd4ff,
            Element::Lightning => 0xfff05a,
            Element::Poison => 0x6ee05a,
            Element::Shadow => 0x7a3cff,
            Element::Arcane => 0xe05aff,
        }
    }
}

// ============================================================================
// Damage Calculation
// ============================================================================

/// Result of applying damage to a combatant.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DamageOutcome {
    /// Health actually removed.
    pub dealt: f32,
    /// True when this hit brought health to zero.
    pub killed: bool,
    /// True when the target ignored the hit (invulnerable or already dead).
    pub blocked: bool,
}

impl DamageOutcome {
    pub const BLOCKED: Self = Self {
        dealt: 0.0,
        killed: false,
        blocked: true,
    };
}

/// Mitigate incoming damage by defense.
///
/// # Formula
///
/// ```text
/// dealt = max(minimum, incoming - defense * defense_factor)
/// ```
///
/// Negative inputs are clamped to zero first, so the result is always at
/// least `minimum` (1 by default). NaN counts as zero; infinite defense
/// mitigates down to the floor.
pub fn calculate_damage(incoming: f32, defense: f32, config: &ResolutionConfig) -> f32 {
    let incoming = if incoming.is_finite() { incoming.max(0.0) } else { 0.0 };
    if defense == f32::INFINITY {
        return config.minimum_damage;
    }
    let defense = if defense.is_nan() { 0.0 } else { defense.max(0.0) };
    (incoming - defense * config.defense_factor).max(config.minimum_damage)
}

/// Flat damage taken by entities caught in a chained explosion.
pub fn splash_damage(base: f32, config: &ResolutionConfig) -> f32 {
    base.max(0.0) * config.splash_factor
}
