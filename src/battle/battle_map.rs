//! Tactical map: terrain tiles plus unit occupancy
//!
//! Topology is fixed once the map is generated. Every lookup is range-checked;
//! out-of-bounds queries behave like a blocked tile.

use serde::{Deserialize, Serialize};

use crate::battle::grid::TileCoord;
use crate::battle::terrain::{CoverClass, TerrainKind};
use crate::battle::units::UnitId;

/// A single map tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub terrain: TerrainKind,
    pub movement_cost: u32,
    pub cover: CoverClass,
    pub walkable: bool,
}

impl Tile {
    pub fn new(terrain: TerrainKind) -> Self {
        Self {
            terrain,
            movement_cost: terrain.movement_cost(),
            cover: terrain.cover(),
            walkable: terrain.walkable(),
        }
    }

    pub fn open() -> Self {
        Self::new(TerrainKind::Grass)
    }

    /// Override the TU cost of entering this tile
    pub fn with_movement_cost(mut self, cost: u32) -> Self {
        self.movement_cost = cost;
        self
    }

    pub fn blocks_los(&self) -> bool {
        self.cover == CoverClass::Full
    }
}

impl Default for Tile {
    fn default() -> Self {
        Self::open()
    }
}

/// The full tactical map
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridMap {
    pub width: u32,
    pub height: u32,
    tiles: Vec<Tile>,
    occupancy: Vec<Option<UnitId>>,
}

impl GridMap {
    /// Create a map of open grass
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Tile::open())
    }

    /// Create a map where every tile is `tile`
    pub fn filled(width: u32, height: u32, tile: Tile) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            tiles: vec![tile; len],
            occupancy: vec![None; len],
        }
    }

    /// Check if coordinate is within map bounds
    pub fn in_bounds(&self, coord: TileCoord) -> bool {
        coord.x >= 0 && coord.y >= 0 && coord.x < self.width as i32 && coord.y < self.height as i32
    }

    fn index(&self, coord: TileCoord) -> Option<usize> {
        if self.in_bounds(coord) {
            Some(coord.y as usize * self.width as usize + coord.x as usize)
        } else {
            None
        }
    }

    pub fn tile(&self, coord: TileCoord) -> Option<&Tile> {
        self.index(coord).map(|i| &self.tiles[i])
    }

    /// Replace the tile at a coordinate (map construction only)
    pub fn set_tile(&mut self, coord: TileCoord, tile: Tile) {
        if let Some(i) = self.index(coord) {
            self.tiles[i] = tile;
        }
    }

    pub fn set_terrain(&mut self, coord: TileCoord, terrain: TerrainKind) {
        self.set_tile(coord, Tile::new(terrain));
    }

    /// Terrain allows standing here (ignores occupancy)
    pub fn is_walkable(&self, coord: TileCoord) -> bool {
        self.tile(coord).is_some_and(|t| t.walkable)
    }

    /// TU to enter the tile, `None` when blocked or out of bounds
    pub fn cost_of(&self, coord: TileCoord) -> Option<u32> {
        self.tile(coord)
            .filter(|t| t.walkable)
            .map(|t| t.movement_cost)
    }

    /// Out-of-bounds tiles count as blocking
    pub fn blocks_los(&self, coord: TileCoord) -> bool {
        self.tile(coord).map_or(true, |t| t.blocks_los())
    }

    pub fn unit_at(&self, coord: TileCoord) -> Option<UnitId> {
        self.index(coord).and_then(|i| self.occupancy[i])
    }

    /// Set or clear the occupant of a tile. Returns false when out of bounds.
    pub fn set_unit_at(&mut self, coord: TileCoord, unit: Option<UnitId>) -> bool {
        match self.index(coord) {
            Some(i) => {
                self.occupancy[i] = unit;
                true
            }
            None => false,
        }
    }

    /// Walkable and nobody standing on it
    pub fn is_free(&self, coord: TileCoord) -> bool {
        self.is_walkable(coord) && self.unit_at(coord).is_none()
    }

    /// Check line of sight between two tiles (endpoints never block)
    pub fn has_line_of_sight(&self, from: TileCoord, to: TileCoord) -> bool {
        let line = from.line_to(&to);

        for coord in line.iter().skip(1).take(line.len().saturating_sub(2)) {
            if self.blocks_los(*coord) {
                return false;
            }
        }

        true
    }

    pub fn coords(&self) -> impl Iterator<Item = TileCoord> + '_ {
        (0..self.height as i32)
            .flat_map(move |y| (0..self.width as i32).map(move |x| TileCoord::new(x, y)))
    }

    /// One line of glyphs per row, occupied tiles shown as `@`
    pub fn render_ascii(&self) -> String {
        let mut out = String::with_capacity((self.width as usize + 1) * self.height as usize);
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                let coord = TileCoord::new(x, y);
                let glyph = match (self.unit_at(coord), self.tile(coord)) {
                    (Some(_), _) => '@',
                    (None, Some(tile)) => tile.terrain.glyph(),
                    (None, None) => ' ',
                };
                out.push(glyph);
            }
            out.push('\n');
        }
        out
    }
}
