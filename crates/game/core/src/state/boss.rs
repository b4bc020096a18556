//! Boss-only state carried alongside a [`Combatant`](super::Combatant).

use arrayvec::ArrayVec;
use bitflags::bitflags;
use glam::Vec2;

use crate::config::CombatConfig;
use crate::pattern::{ArchetypeId, PatternId, PatternRun};
use crate::state::Telegraph;

bitflags! {
    /// One-shot health thresholds that have already fired.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct PhaseTriggers: u8 {
        const PHASE_TWO = 0b0001;
        const PHASE_THREE = 0b0010;
        const ENRAGE = 0b0100;
    }
}

/// Ring buffer of the most recent pattern selections, oldest first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PatternHistory {
    entries: ArrayVec<PatternId, { CombatConfig::PATTERN_HISTORY }>,
}

impl PatternHistory {
    /// Records a selection, evicting the oldest entry when full.
    pub fn push(&mut self, id: PatternId) {
        if self.entries.is_full() {
            self.entries.remove(0);
        }
        self.entries.push(id);
    }

    pub fn contains(&self, id: PatternId) -> bool {
        self.entries.contains(&id)
    }

    /// Most recent selection.
    pub fn last(&self) -> Option<PatternId> {
        self.entries.last().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = PatternId> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// How the director positions the boss when no pattern drives movement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum MovementMode {
    Approach,
    Strafe,
    Retreat,
    #[default]
    Hold,
}

/// Per-boss decision state.
#[derive(Clone, Debug, PartialEq)]
pub struct BossState {
    pub archetype: ArchetypeId,
    /// 1..=3.
    pub phase: u8,
    /// Number of phase transitions so far.
    pub stage: u8,
    pub triggers: PhaseTriggers,
    pub unlocked: Vec<PatternId>,
    pub history: PatternHistory,
    pub active: Option<PatternRun>,

    // ===== watchdogs & cooldowns (seconds) =====
    pub idle_timer: f32,
    /// Post-pattern recovery before the next selection.
    pub recovery: f32,
    pub signature_cooldown: f32,
    pub dash_cooldown: f32,
    pub dodge_cooldown: f32,
    pub teleport_cooldown: f32,

    // ===== movement =====
    pub movement: MovementMode,
    /// Remaining seconds of an in-progress dash or dodge.
    pub dash_remaining: f32,
    pub dash_velocity: Vec2,
    /// +1 or -1.
    pub strafe_sign: f32,
    pub strafe_timer: f32,
    pub stuck_timer: f32,
    pub stuck_anchor: Vec2,

    // ===== phase bookkeeping =====
    /// Multiplier applied to recovery after each pattern (lowered by enrage).
    pub cooldown_multiplier: f32,
    pub reinforcement_timer: f32,

    pub telegraph: Option<Telegraph>,
    /// Total selections made, for diagnostics.
    pub selections: u32,
}

impl BossState {
    pub fn new(archetype: ArchetypeId) -> Self {
        Self {
            archetype,
            phase: 1,
            stage: 0,
            triggers: PhaseTriggers::empty(),
            unlocked: PatternId::unlocked_at(1).collect(),
            history: PatternHistory::default(),
            active: None,
            idle_timer: 0.0,
            recovery: 0.0,
            signature_cooldown: 0.0,
            dash_cooldown: 0.0,
            dodge_cooldown: 0.0,
            teleport_cooldown: 0.0,
            movement: MovementMode::Hold,
            dash_remaining: 0.0,
            dash_velocity: Vec2::ZERO,
            strafe_sign: 1.0,
            strafe_timer: 0.0,
            stuck_timer: 0.0,
            stuck_anchor: Vec2::ZERO,
            cooldown_multiplier: 1.0,
            reinforcement_timer: 0.0,
            telegraph: None,
            selections: 0,
        }
    }

    #[inline]
    pub fn is_enraged(&self) -> bool {
        self.triggers.contains(PhaseTriggers::ENRAGE)
    }

    #[inline]
    pub fn active_pattern(&self) -> Option<PatternId> {
        self.active.as_ref().map(|run| run.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_evicts_oldest() {
        let mut history = PatternHistory::default();
        let ids = [
            PatternId::AimedVolley,
            PatternId::SpreadShot,
            PatternId::RadialBurst,
            PatternId::ChargeSlam,
            PatternId::CleaveCombo,
            PatternId::GroundPound,
        ];
        for id in ids {
            history.push(id);
        }
        assert_eq!(history.len(), CombatConfig::PATTERN_HISTORY);
        assert!(!history.contains(PatternId::AimedVolley));
        assert_eq!(history.last(), Some(PatternId::GroundPound));
    }

    #[test]
    fn new_boss_starts_in_phase_one_with_base_pool() {
        let boss = BossState::new(ArchetypeId::FlameWarden);
        assert_eq!(boss.phase, 1);
        assert!(boss.unlocked.contains(&PatternId::AimedVolley));
        assert!(!boss.unlocked.contains(&PatternId::MeteorRain));
        assert!(!boss.unlocked.contains(&PatternId::FlameWave));
    }
}
