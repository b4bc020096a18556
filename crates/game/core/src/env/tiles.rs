//! Tile provider oracle and line-of-sight sampling.
//!
//! The combat core never owns level geometry. It only asks an external
//! provider whether a cell blocks sight.

use glam::Vec2;

/// Static tile oracle exposing opacity per cell.
pub trait TileOracle {
    /// Returns true if the cell at `(cell_x, cell_y)` blocks line of sight.
    fn is_opaque(&self, cell_x: i32, cell_y: i32) -> bool;

    /// Edge length of one cell in world units.
    fn tile_size(&self) -> f32 {
        32.0
    }

    /// Cell coordinates containing a world-space point.
    fn cell_of(&self, point: Vec2) -> (i32, i32) {
        let size = self.tile_size();
        ((point.x / size).floor() as i32, (point.y / size).floor() as i32)
    }
}

/// Canonical terrain classes for arena cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TerrainKind {
    #[default]
    Floor,
    Wall,
    Void,
    Water,
}

impl TerrainKind {
    /// Walls and void both break sight. Water is see-through.
    pub fn is_opaque(self) -> bool {
        matches!(self, TerrainKind::Wall | TerrainKind::Void)
    }
}

/// Dense in-memory tile grid. Cells outside the grid count as void.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridTiles {
    width: u32,
    height: u32,
    tile_size: f32,
    cells: Vec<TerrainKind>,
}

impl GridTiles {
    /// Creates an all-floor grid.
    pub fn new(width: u32, height: u32, tile_size: f32) -> Self {
        Self {
            width,
            height,
            tile_size,
            cells: vec![TerrainKind::Floor; (width * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some((y as u32 * self.width + x as u32) as usize)
    }

    pub fn terrain(&self, x: i32, y: i32) -> TerrainKind {
        self.index(x, y)
            .map(|i| self.cells[i])
            .unwrap_or(TerrainKind::Void)
    }

    /// Overwrites one cell. Out-of-range writes are ignored.
    pub fn set(&mut self, x: i32, y: i32, terrain: TerrainKind) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = terrain;
        }
    }

    /// Center of a cell in world units.
    pub fn cell_center(&self, x: i32, y: i32) -> Vec2 {
        Vec2::new(
            (x as f32 + 0.5) * self.tile_size,
            (y as f32 + 0.5) * self.tile_size,
        )
    }
}

impl TileOracle for GridTiles {
    fn is_opaque(&self, cell_x: i32, cell_y: i32) -> bool {
        self.terrain(cell_x, cell_y).is_opaque()
    }

    fn tile_size(&self) -> f32 {
        self.tile_size
    }
}

/// Samples the segment `from → to` at a fixed step and reports whether every
/// sampled cell is transparent.
pub fn line_of_sight(from: Vec2, to: Vec2, tiles: &(impl TileOracle + ?Sized), step: f32) -> bool {
    let distance = from.distance(to);
    let step = if step > 0.0 { step } else { 1.0 };
    let samples = ((distance / step).ceil() as u32).max(1);

    for i in 0..=samples {
        let point = from.lerp(to, i as f32 / samples as f32);
        let (cx, cy) = tiles.cell_of(point);
        if tiles.is_opaque(cx, cy) {
            return false;
        }
    }
    true
}
