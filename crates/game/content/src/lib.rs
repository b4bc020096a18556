//! Data-driven content for encounters.
//!
//! This crate provides loaders for RON/TOML data files:
//! - Combat tuning (TOML, partial files fall back to defaults)
//! - Combatant templates (RON), used to fulfil spawn requests
//! - Arenas (RON tile grids plus named spawn points)
//!
//! All loaders deserialize deluge-core types directly via its `serde` feature.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    AbilitySpec, Arena, ArenaLoader, CombatantTemplate, ConfigLoader, ContentFactory, SpawnPoint,
    TemplateLoader, TemplateRegistry,
};
