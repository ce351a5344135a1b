//! Square grid coordinates for tactical maps
//!
//! Tiles are 8-connected. Lines of sight are rasterized with Bresenham.

use serde::{Deserialize, Serialize};

/// Tile coordinate on the tactical map (x = column, y = row)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct TileCoord {
    pub x: i32,
    pub y: i32,
}

impl TileCoord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Straight-line distance in tiles
    pub fn euclidean(&self, other: &Self) -> f32 {
        let dx = (self.x - other.x) as f32;
        let dy = (self.y - other.y) as f32;
        (dx * dx + dy * dy).sqrt()
    }

    /// Step count when diagonals are allowed
    pub fn chebyshev(&self, other: &Self) -> u32 {
        let dx = (self.x - other.x).unsigned_abs();
        let dy = (self.y - other.y).unsigned_abs();
        dx.max(dy)
    }

    /// Is `other` one diagonal step away?
    pub fn is_diagonal_to(&self, other: &Self) -> bool {
        (self.x - other.x).abs() == 1 && (self.y - other.y).abs() == 1
    }

    /// Is `other` one of the 8 surrounding tiles?
    pub fn is_adjacent(&self, other: &Self) -> bool {
        self != other && self.chebyshev(other) == 1
    }

    /// All 8 surrounding coordinates, orthogonals first
    pub fn neighbors(&self) -> [TileCoord; 8] {
        [
            TileCoord::new(self.x + 1, self.y),
            TileCoord::new(self.x - 1, self.y),
            TileCoord::new(self.x, self.y + 1),
            TileCoord::new(self.x, self.y - 1),
            TileCoord::new(self.x + 1, self.y + 1),
            TileCoord::new(self.x + 1, self.y - 1),
            TileCoord::new(self.x - 1, self.y + 1),
            TileCoord::new(self.x - 1, self.y - 1),
        ]
    }

    /// Bresenham line from self to other (inclusive of both ends)
    pub fn line_to(&self, other: &Self) -> Vec<TileCoord> {
        let dx = (other.x - self.x).abs();
        let dy = -(other.y - self.y).abs();
        let sx = if self.x < other.x { 1 } else { -1 };
        let sy = if self.y < other.y { 1 } else { -1 };

        let mut results = Vec::with_capacity((dx.max(-dy) + 1) as usize);
        let mut err = dx + dy;
        let (mut x, mut y) = (self.x, self.y);

        loop {
            results.push(TileCoord::new(x, y));
            if x == other.x && y == other.y {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
        results
    }

    /// All coordinates whose Euclidean distance is within `range` (may be out of bounds)
    pub fn tiles_in_radius(&self, range: u32) -> Vec<TileCoord> {
        let r = range as i32;
        let limit = (range * range) as i32;
        let mut results = Vec::new();
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy <= limit {
                    results.push(TileCoord::new(self.x + dx, self.y + dy));
                }
            }
        }
        results
    }
}
