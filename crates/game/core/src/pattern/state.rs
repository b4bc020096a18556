//! Per-run pattern progress.

use glam::Vec2;

use crate::pattern::PatternId;

/// One precomputed formation spawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FormationEntry {
    /// Absolute world position.
    pub position: Vec2,
    /// Seconds after pattern start.
    pub delay: f32,
    /// Launch direction for projectile formations.
    pub heading: Vec2,
}

/// Scratch state of the active pattern, built on entry and dropped on exit.
#[derive(Clone, Debug, PartialEq)]
pub enum PatternState {
    Burst {
        fired: u32,
        /// Seconds until the next shot.
        timer: f32,
        /// Accumulated spin in radians.
        heading: f32,
    },
    Choreography {
        step_elapsed: f32,
        /// Committed destination of the current charge.
        locked: Option<Vec2>,
    },
    Telegraph {
        elapsed: f32,
        center: Vec2,
        dir: Vec2,
    },
    Formation {
        entries: Vec<FormationEntry>,
        elapsed: f32,
        /// Index of the next entry to fire.
        next: usize,
    },
}

/// The active pattern of a boss.
#[derive(Clone, Debug, PartialEq)]
pub struct PatternRun {
    pub id: PatternId,
    pub step: u32,
    pub state: PatternState,
    /// Seconds since selection.
    pub elapsed: f32,
}

impl PatternRun {
    pub fn new(id: PatternId, state: PatternState) -> Self {
        Self {
            id,
            step: 0,
            state,
            elapsed: 0.0,
        }
    }
}
