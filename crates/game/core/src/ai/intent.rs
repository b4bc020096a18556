//! Outbound AI signals: presentation intents and spawn requests.

use glam::Vec2;

use crate::combat::AttackDescriptor;
use crate::pattern::PatternId;
use crate::state::{EntityId, MovementMode, Telegraph};

/// Ask the host to spawn combatants. The core never spawns on its own.
#[derive(Clone, Debug, PartialEq)]
pub struct SpawnRequest {
    /// Template key (for bosses, the archetype's minion kind).
    pub kind: String,
    pub count: u32,
    /// Preferred spawn point; `None` lets the host decide.
    pub position: Option<Vec2>,
    pub summoner: EntityId,
    /// Spawned minions keep the summoner healing while they live.
    pub bound_to_phase: bool,
}

/// Per-tick presentation hints for one boss.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VisualIntent {
    pub entity: EntityId,
    pub telegraph: Option<Telegraph>,
    /// Draw a dash trail this tick.
    pub dash_trail: bool,
    /// A phase transition fired this tick.
    pub phase_flash: bool,
    pub enraged: bool,
    /// Destination of a blink this tick.
    pub teleport: Option<Vec2>,
    pub pattern: Option<PatternId>,
    pub movement: MovementMode,
}

/// Everything an AI produced in one tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AiOutput {
    pub attacks: Vec<AttackDescriptor>,
    pub spawn_requests: Vec<SpawnRequest>,
    pub intent: Option<VisualIntent>,
}
