//! Content factory for loading encounter data from a directory.

use std::path::{Path, PathBuf};

use deluge_core::CombatConfig;

use crate::loaders::{Arena, ArenaLoader, ConfigLoader, LoadResult, TemplateLoader, TemplateRegistry};

/// Content factory that loads all encounter content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── templates.ron
/// └── arenas/
///     └── ember_hall.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Load combat configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<CombatConfig> {
        ConfigLoader::load(&self.data_dir.join("config.toml"))
    }

    /// Load combatant templates from `templates.ron`.
    pub fn load_templates(&self) -> LoadResult<TemplateRegistry> {
        TemplateLoader::load(&self.data_dir.join("templates.ron"))
    }

    /// Load an arena from `arenas/<name>.ron`.
    pub fn load_arena(&self, name: &str) -> LoadResult<Arena> {
        let path = self.data_dir.join("arenas").join(format!("{name}.ron"));
        ArenaLoader::load(&path)
    }
}
