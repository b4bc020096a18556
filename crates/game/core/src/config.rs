//! Combat configuration constants and tunable parameters.
//!
//! Capacity limits are compile-time constants used as `ArrayVec` type
//! parameters. Everything else is grouped into runtime-tunable sections whose
//! `Default` values are the canonical balance numbers. With the `serde`
//! feature every section deserializes with `#[serde(default)]`, so a partial
//! TOML file only overrides the keys it names.

/// Root configuration shared by the AI layer and the resolution pipeline.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct CombatConfig {
    pub watchdog: WatchdogConfig,
    pub selection: SelectionConfig,
    pub phase: PhaseConfig,
    pub resolution: ResolutionConfig,
    pub movement: MovementConfig,
    pub targeting: TargetingConfig,
}

impl CombatConfig {
    // ===== compile-time constants used as type parameters =====
    pub const MAX_STATUS_EFFECTS: usize = 8;
    pub const MAX_ABILITIES: usize = 6;
    /// Recent-selection window used by the anti-repetition policy.
    pub const PATTERN_HISTORY: usize = 5;
    pub const MAX_PHASE: u8 = 3;

    pub fn new() -> Self {
        Self::default()
    }
}

/// Liveness watchdogs for boss pattern execution.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct WatchdogConfig {
    /// Seconds without an active pattern before selection is forced.
    pub idle_timeout: f32,
    /// Seconds an active pattern may run before it is force-ended.
    pub pattern_timeout: f32,
    /// Brief cooldown applied whenever a pattern ends.
    pub recovery: f32,
}

impl Default for WatchdogConfig {
    fn default() -> Self {
        Self {
            idle_timeout: 0.5,
            pattern_timeout: 3.0,
            recovery: 0.25,
        }
    }
}

/// Pattern selection policy knobs.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct SelectionConfig {
    /// Per-selection probability of preferring the archetype signature move.
    pub signature_chance: f32,
    /// Cooldown (seconds) started each time the signature move is selected.
    pub signature_cooldown: f32,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            signature_chance: 0.3,
            signature_cooldown: 12.0,
        }
    }
}

/// Health-threshold phase controller.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct PhaseConfig {
    /// Health ratios entering phase 2 and phase 3, in that order.
    pub thresholds: [f32; 2],
    /// Health ratio at which the boss permanently enrages.
    pub enrage_threshold: f32,
    /// Invulnerability granted on each phase transition (seconds).
    pub invulnerability: f32,
    /// Minions requested on each phase transition.
    pub transition_minions: u32,
    /// Fraction of max health healed per second with every transition minion alive.
    pub minion_heal_rate: f32,
    /// Attack cooldown multiplier applied once enraged.
    pub enrage_cooldown_multiplier: f32,
    /// Seconds between reinforcement requests from phase 2 onward.
    pub reinforcement_interval: f32,
    /// Reinforcement interval once enraged.
    pub enraged_reinforcement_interval: f32,
    pub reinforcement_count: u32,
}

impl Default for PhaseConfig {
    fn default() -> Self {
        Self {
            thresholds: [0.66, 0.33],
            enrage_threshold: 0.25,
            invulnerability: 2.0,
            transition_minions: 10,
            minion_heal_rate: 0.02,
            enrage_cooldown_multiplier: 0.7,
            reinforcement_interval: 20.0,
            enraged_reinforcement_interval: 10.0,
            reinforcement_count: 2,
        }
    }
}

/// Damage resolution parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ResolutionConfig {
    /// Share of defense subtracted from incoming damage.
    pub defense_factor: f32,
    /// Floor applied after defense; defense never fully negates an attack.
    pub minimum_damage: f32,
    /// Damage multiplier for chained sub-explosions.
    pub splash_factor: f32,
    pub crit_multiplier: f32,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            defense_factor: 0.3,
            minimum_damage: 1.0,
            splash_factor: 0.7,
            crit_multiplier: 1.5,
        }
    }
}

/// Boss locomotion: dash, dodge, teleport, and the anti-stuck watchdog.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct MovementConfig {
    /// Distance to target beyond which a boss dashes in.
    pub dash_trigger_distance: f32,
    pub dash_speed_multiplier: f32,
    pub dash_duration: f32,
    pub dash_cooldown: f32,
    /// Radius within which incoming projectiles trigger a dodge.
    pub dodge_radius: f32,
    pub dodge_speed_multiplier: f32,
    pub dodge_duration: f32,
    pub dodge_cooldown: f32,
    /// Teleport when the target is farther than `aggro_range * factor`.
    pub teleport_distance_factor: f32,
    pub teleport_cooldown: f32,
    /// Window (seconds) over which displacement is measured.
    pub stuck_window: f32,
    /// Minimum displacement inside one window while trying to move.
    pub stuck_min_displacement: f32,
    /// Seconds between strafe direction flips.
    pub strafe_flip_interval: f32,
    /// Per-second decay applied to knockback impulses.
    pub knockback_decay: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            dash_trigger_distance: 260.0,
            dash_speed_multiplier: 3.5,
            dash_duration: 0.3,
            dash_cooldown: 4.0,
            dodge_radius: 90.0,
            dodge_speed_multiplier: 3.0,
            dodge_duration: 0.2,
            dodge_cooldown: 2.5,
            teleport_distance_factor: 2.0,
            teleport_cooldown: 6.0,
            stuck_window: 1.0,
            stuck_min_displacement: 4.0,
            strafe_flip_interval: 2.5,
            knockback_decay: 8.0,
        }
    }
}

/// Target acquisition and basic AI ranges.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct TargetingConfig {
    /// Sampling step (world units) of the line-of-sight ray.
    pub los_step: f32,
    /// Non-bosses drop targets beyond `aggro_range * leash_factor`.
    pub leash_factor: f32,
    /// Attack ranges at or below this use melee hitboxes.
    pub melee_range_threshold: f32,
    pub wander_radius: f32,
    pub wander_interval: f32,
}

impl Default for TargetingConfig {
    fn default() -> Self {
        Self {
            los_step: 8.0,
            leash_factor: 1.5,
            melee_range_threshold: 64.0,
            wander_radius: 48.0,
            wander_interval: 3.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_balance_sheet() {
        let config = CombatConfig::default();
        assert_eq!(config.watchdog.idle_timeout, 0.5);
        assert_eq!(config.watchdog.pattern_timeout, 3.0);
        assert_eq!(config.phase.thresholds, [0.66, 0.33]);
        assert_eq!(config.phase.transition_minions, 10);
        assert_eq!(config.resolution.defense_factor, 0.3);
        assert_eq!(config.resolution.splash_factor, 0.7);
    }

    #[test]
    fn recovery_is_shorter_than_idle_watchdog() {
        let watchdog = WatchdogConfig::default();
        assert!(watchdog.recovery < watchdog.idle_timeout);
    }
}
