//! Terrain kinds and their effects
//!
//! Movement costs are expressed directly in time units (TU).

use serde::{Deserialize, Serialize};

/// Cover class of a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CoverClass {
    #[default]
    None,
    Partial,
    /// Blocks line of sight
    Full,
}

/// Terrain kind for a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TerrainKind {
    #[default]
    Grass,
    Road,
    Brush,
    Fence,
    Tree,
    Wall,
}

impl TerrainKind {
    /// TU to enter a tile of this kind orthogonally
    pub fn movement_cost(&self) -> u32 {
        match self {
            TerrainKind::Grass => 4,
            TerrainKind::Road => 4,
            TerrainKind::Brush => 6,
            TerrainKind::Fence => 8,
            TerrainKind::Tree | TerrainKind::Wall => 0,
        }
    }

    pub fn cover(&self) -> CoverClass {
        match self {
            TerrainKind::Grass | TerrainKind::Road => CoverClass::None,
            TerrainKind::Brush | TerrainKind::Fence => CoverClass::Partial,
            TerrainKind::Tree | TerrainKind::Wall => CoverClass::Full,
        }
    }

    pub fn walkable(&self) -> bool {
        !matches!(self, TerrainKind::Tree | TerrainKind::Wall)
    }

    /// Glyph used by text dumps of the map
    pub fn glyph(&self) -> char {
        match self {
            TerrainKind::Grass => '.',
            TerrainKind::Road => '=',
            TerrainKind::Brush => '"',
            TerrainKind::Fence => '+',
            TerrainKind::Tree => 'T',
            TerrainKind::Wall => '#',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grass_costs_four() {
        assert_eq!(TerrainKind::Grass.movement_cost(), 4);
    }

    #[test]
    fn test_full_cover_is_unwalkable() {
        for kind in [TerrainKind::Tree, TerrainKind::Wall] {
            assert_eq!(kind.cover(), CoverClass::Full);
            assert!(!kind.walkable());
        }
    }

    #[test]
    fn test_partial_cover_slows_movement() {
        assert_eq!(TerrainKind::Brush.cover(), CoverClass::Partial);
        assert!(TerrainKind::Brush.movement_cost() > TerrainKind::Grass.movement_cost());
        assert!(TerrainKind::Fence.walkable());
    }
}
