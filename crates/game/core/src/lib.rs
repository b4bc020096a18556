//! Decision and resolution core for real-time action combat.
//!
//! `deluge-core` decides what hostile combatants do each tick (multi-phase
//! bosses through [`ai::BossDirector`] and the pattern engine, everything else
//! through a behavior tree) and turns those decisions into damage,
//! projectiles, and area effects via [`combat::ResolutionPipeline`].
//! [`encounter::Encounter`] composes both halves; hosts drive it with `dt`
//! and fulfil the [`SpawnRequest`]s and [`VisualIntent`]s it reports.
pub mod ai;
pub mod combat;
pub mod config;
pub mod encounter;
pub mod env;
pub mod error;
pub mod pattern;
pub mod state;

pub use ai::{AiOutput, BasicAi, BossDirector, PhaseController, SpawnRequest, VisualIntent};
pub use combat::{
    AttackDescriptor, AttackKind, AttackQueue, CombatTarget, Element, HitKind, HitPayload,
    HitRecord, ObjectId, OnHit, Owner, ResolutionPipeline, calculate_damage,
};
pub use config::{
    CombatConfig, MovementConfig, PhaseConfig, ResolutionConfig, SelectionConfig,
    TargetingConfig, WatchdogConfig,
};
pub use encounter::{Death, Encounter, EncounterHooks, TickReport};
pub use env::{GridTiles, PcgRng, RngOracle, TerrainKind, TileOracle, line_of_sight};
pub use error::{CoreError, ErrorSeverity};
pub use pattern::{
    ArchetypeId, CatalogError, Pattern, PatternCatalog, PatternEngine, PatternId,
    standard_catalog,
};
pub use state::{
    Ability, AbilityKind, AiState, BossState, CombatStats, Combatant, Control, EntityId, Roster,
    RosterError, Side, StatusEffect, StatusKind, Telegraph, TelegraphShape, Vec2, WorldView,
};
