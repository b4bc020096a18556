//! Content loaders for reading encounter data from files.

pub mod arena;
pub mod config;
pub mod factory;
pub mod templates;

pub use arena::{Arena, ArenaLoader, SpawnPoint};
pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use templates::{AbilitySpec, CombatantTemplate, TemplateLoader, TemplateRegistry};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
