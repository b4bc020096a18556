//! Boss attack patterns.
//!
//! A pattern is a step machine: the engine keeps a [`PatternRun`] (step index
//! plus tagged [`PatternState`]) on the boss and calls
//! [`Pattern::tick`] once per simulation tick until it reports
//! [`Progress::Done`] or a watchdog ends it.
//!
//! Patterns are registered in a [`PatternCatalog`] keyed by [`PatternId`].
//! The four generic shapes in [`shapes`] cover every entry of the standard
//! library; new patterns only need to implement [`Pattern`].

mod archetype;
mod catalog;
mod engine;
mod id;
mod library;
mod select;
pub mod shapes;
mod state;

pub use archetype::{ArchetypeError, ArchetypeId, ArchetypeInfo};
pub use catalog::{CatalogError, PatternCatalog};
pub use engine::{EndReason, EngineTick, PatternEngine};
pub use id::{PatternId, Tier};
pub use library::standard_catalog;
pub use select::select_pattern;
pub use state::{FormationEntry, PatternRun, PatternState};

use glam::Vec2;

use crate::combat::{AttackDescriptor, Element, Owner};
use crate::env::RngOracle;
use crate::state::{Telegraph, TargetInfo};

/// Static facts about a pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PatternMeta {
    pub tier: Tier,
    /// End the pattern as soon as the target disappears.
    pub requires_target: bool,
}

/// Read-only inputs for one pattern tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PatternContext {
    pub owner: Owner,
    pub position: Vec2,
    pub facing: Vec2,
    /// Movement speed after status modifiers.
    pub speed: f32,
    /// Base damage patterns scale from.
    pub damage: f32,
    pub element: Element,
    pub phase: u8,
    pub target: Option<TargetInfo>,
    pub dt: f32,
}

impl PatternContext {
    /// Target position, or a point ahead of the boss when there is none.
    pub fn aim_point(&self) -> Vec2 {
        self.target
            .map(|t| t.position)
            .unwrap_or(self.position + self.facing * 100.0)
    }

    /// Unit vector toward the target, falling back to facing.
    pub fn aim_dir(&self) -> Vec2 {
        crate::state::direction_or(self.aim_point() - self.position, self.facing)
    }
}

/// What a pattern asks for this tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PatternOutput {
    pub attacks: Vec<AttackDescriptor>,
    /// `None` leaves movement to the director.
    pub velocity: Option<Vec2>,
    pub telegraph: Option<Telegraph>,
    pub teleport: Option<Vec2>,
    pub facing: Option<Vec2>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Progress {
    Continue,
    Done,
}

/// A named attack procedure.
pub trait Pattern: Send + Sync {
    fn id(&self) -> PatternId;

    fn meta(&self) -> PatternMeta {
        PatternMeta {
            tier: self.id().tier(),
            requires_target: true,
        }
    }

    /// Builds fresh scratch state at selection.
    fn enter(&self, ctx: &PatternContext, rng: &mut dyn RngOracle) -> PatternState;

    /// Advances the run by one tick.
    fn tick(
        &self,
        run: &mut PatternRun,
        ctx: &PatternContext,
        rng: &mut dyn RngOracle,
        out: &mut PatternOutput,
    ) -> Progress;
}
