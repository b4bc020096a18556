//! Traits describing read-only world data.
//!
//! Oracles expose the tile layout and the random source. The core reads them
//! but never mutates them, so the same arena can back many encounters.
mod rng;
mod tiles;

pub use rng::{PcgRng, RngOracle, compute_seed};
pub use tiles::{GridTiles, TerrainKind, TileOracle, line_of_sight};
