//! Arena loader.
//!
//! An arena is a tile grid plus named spawn points. Cells not listed in the
//! file are floor.

use std::path::Path;

use deluge_core::{GridTiles, TerrainKind, TileOracle, Vec2};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::loaders::{LoadResult, read_file};

/// Where the host places combatants when the encounter starts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnPoint {
    /// Template key.
    pub template: String,
    /// Cell coordinates.
    pub cell: (i32, i32),
    #[serde(default = "default_count")]
    pub count: u32,
}

fn default_count() -> u32 {
    1
}

fn default_tile_size() -> f32 {
    32.0
}

/// Arena data structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ArenaRon {
    dimensions: (u32, u32),
    #[serde(default = "default_tile_size")]
    tile_size: f32,
    #[serde(default)]
    tiles: Vec<(i32, i32, TerrainKind)>, // (x, y, terrain)
    #[serde(default)]
    spawns: Vec<SpawnPoint>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Arena {
    pub tiles: GridTiles,
    pub spawns: Vec<SpawnPoint>,
}

impl Arena {
    /// World position of a spawn point (its cell center).
    pub fn spawn_position(&self, point: &SpawnPoint) -> Vec2 {
        self.tiles.cell_center(point.cell.0, point.cell.1)
    }
}

/// Loader for arenas from RON files.
pub struct ArenaLoader;

impl ArenaLoader {
    pub fn load(path: &Path) -> LoadResult<Arena> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parses an arena.
    ///
    /// Out-of-range tiles are skipped with a warning. Spawn points on opaque
    /// cells are an error.
    pub fn parse(content: &str) -> LoadResult<Arena> {
        let data: ArenaRon = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse arena RON: {}", e))?;

        let (width, height) = data.dimensions;
        if width == 0 || height == 0 {
            anyhow::bail!("Arena dimensions must be non-zero, got {}x{}", width, height);
        }
        if !(data.tile_size.is_finite() && data.tile_size > 0.0) {
            anyhow::bail!("Arena tile_size must be positive, got {}", data.tile_size);
        }

        let mut tiles = GridTiles::new(width, height, data.tile_size);
        for (x, y, terrain) in data.tiles {
            if x < 0 || y < 0 || x >= width as i32 || y >= height as i32 {
                warn!(x, y, "arena tile outside dimensions, skipping");
                continue;
            }
            tiles.set(x, y, terrain);
        }

        for spawn in &data.spawns {
            let (x, y) = spawn.cell;
            if tiles.is_opaque(x, y) {
                anyhow::bail!(
                    "Spawn point for '{}' at ({}, {}) is not walkable",
                    spawn.template,
                    x,
                    y
                );
            }
        }

        Ok(Arena {
            tiles,
            spawns: data.spawns,
        })
    }
}
