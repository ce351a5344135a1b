//! Procedural map generation and deployment zones
//!
//! Maps are generated once per mission from a seed and never change afterwards.
//! The leftmost and rightmost [`DEPLOYMENT_DEPTH`] columns are always open grass:
//! the squad lands on the left strip, the aliens hold the right half.

use std::ops::Range;

use rand::seq::SliceRandom;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::battle::battle_map::GridMap;
use crate::battle::constants::DEPLOYMENT_DEPTH;
use crate::battle::grid::TileCoord;
use crate::battle::terrain::TerrainKind;
use crate::battle::unit_type::Faction;

/// Generate a map; identical inputs give an identical map
pub fn generate_map(width: u32, height: u32, seed: u64) -> GridMap {
    let mut map = GridMap::new(width, height);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let Some(columns) = interior_columns(width) else {
        return map;
    };

    let area = width as usize * height as usize;

    if height >= 8 && rng.gen_bool(0.5) {
        let y = rng.gen_range(1..height as i32 - 1);
        for x in columns.clone() {
            map.set_terrain(TileCoord::new(x, y), TerrainKind::Road);
        }
    }

    for _ in 0..area / 150 {
        place_building(&mut map, &columns, &mut rng);
    }
    for _ in 0..area / 90 {
        place_fence(&mut map, &columns, &mut rng);
    }
    scatter(&mut map, &columns, TerrainKind::Tree, area / 25, &mut rng);
    scatter(&mut map, &columns, TerrainKind::Brush, area / 20, &mut rng);

    tracing::debug!("Generated {}x{} map from seed {}", width, height, seed);
    map
}

/// Free tiles in a faction's deployment zone, best spawn first
///
/// The player strip is ordered from the middle row outwards, column by column;
/// the enemy zone (right half) is returned in row-major order.
pub fn deployment_tiles(map: &GridMap, faction: Faction) -> Vec<TileCoord> {
    let (width, height) = (map.width as i32, map.height as i32);
    let depth = (DEPLOYMENT_DEPTH as i32).min(width);

    match faction {
        Faction::Player => {
            let mut tiles: Vec<TileCoord> = (0..depth)
                .flat_map(|x| (0..height).map(move |y| TileCoord::new(x, y)))
                .filter(|coord| map.is_free(*coord))
                .collect();
            let mid = height / 2;
            tiles.sort_by_key(|c| ((c.y - mid).abs(), c.x, c.y));
            tiles
        }
        Faction::Enemy => (0..height)
            .flat_map(|y| (width / 2..width).map(move |x| TileCoord::new(x, y)))
            .filter(|coord| map.is_free(*coord))
            .collect(),
    }
}

/// Pick `count` distinct enemy spawn tiles at random
pub fn random_enemy_tiles<R: Rng + ?Sized>(
    map: &GridMap,
    count: usize,
    rng: &mut R,
) -> Vec<TileCoord> {
    let mut tiles = deployment_tiles(map, Faction::Enemy);
    tiles.shuffle(rng);
    tiles.truncate(count);
    tiles
}

/// Columns where terrain may be placed, `None` if the map is all deployment strip
fn interior_columns(width: u32) -> Option<Range<i32>> {
    let start = DEPLOYMENT_DEPTH as i32;
    let end = width as i32 - DEPLOYMENT_DEPTH as i32;
    (end > start).then_some(start..end)
}

fn is_open_rect(map: &GridMap, x0: i32, y0: i32, w: i32, h: i32) -> bool {
    (y0..y0 + h).all(|y| {
        (x0..x0 + w).all(|x| {
            let coord = TileCoord::new(x, y);
            map.tile(coord).is_some_and(|t| t.terrain == TerrainKind::Grass)
        })
    })
}

/// Walled building with a road-surfaced floor and one doorway
fn place_building<R: Rng + ?Sized>(map: &mut GridMap, columns: &Range<i32>, rng: &mut R) {
    let w = rng.gen_range(4..=7);
    let h = rng.gen_range(4..=6);
    if columns.end - columns.start < w + 2 || (map.height as i32) < h + 2 {
        return;
    }
    let x0 = rng.gen_range(columns.start + 1..=columns.end - w - 1);
    let y0 = rng.gen_range(1..=map.height as i32 - h - 1);

    // Keep a one-tile gap around buildings so they never seal each other off
    if !is_open_rect(map, x0 - 1, y0 - 1, w + 2, h + 2) {
        return;
    }

    for y in y0..y0 + h {
        for x in x0..x0 + w {
            let edge = x == x0 || x == x0 + w - 1 || y == y0 || y == y0 + h - 1;
            let kind = if edge { TerrainKind::Wall } else { TerrainKind::Road };
            map.set_terrain(TileCoord::new(x, y), kind);
        }
    }

    // Doorway on a side wall, never a corner
    let door = match rng.gen_range(0..4) {
        0 => TileCoord::new(rng.gen_range(x0 + 1..x0 + w - 1), y0),
        1 => TileCoord::new(rng.gen_range(x0 + 1..x0 + w - 1), y0 + h - 1),
        2 => TileCoord::new(x0, rng.gen_range(y0 + 1..y0 + h - 1)),
        _ => TileCoord::new(x0 + w - 1, rng.gen_range(y0 + 1..y0 + h - 1)),
    };
    map.set_terrain(door, TerrainKind::Road);
}

/// Short straight fence run
fn place_fence<R: Rng + ?Sized>(map: &mut GridMap, columns: &Range<i32>, rng: &mut R) {
    let len = rng.gen_range(3..=6);
    let horizontal = rng.gen_bool(0.5);
    let x0 = rng.gen_range(columns.clone());
    let y0 = rng.gen_range(0..map.height as i32);

    for i in 0..len {
        let coord = if horizontal {
            TileCoord::new(x0 + i, y0)
        } else {
            TileCoord::new(x0, y0 + i)
        };
        if !columns.contains(&coord.x) {
            break;
        }
        if map.tile(coord).is_some_and(|t| t.terrain == TerrainKind::Grass) {
            map.set_terrain(coord, TerrainKind::Fence);
        }
    }
}

fn scatter<R: Rng + ?Sized>(
    map: &mut GridMap,
    columns: &Range<i32>,
    kind: TerrainKind,
    count: usize,
    rng: &mut R,
) {
    for _ in 0..count {
        let coord = TileCoord::new(
            rng.gen_range(columns.clone()),
            rng.gen_range(0..map.height as i32),
        );
        if map.tile(coord).is_some_and(|t| t.terrain == TerrainKind::Grass) {
            map.set_terrain(coord, kind);
        }
    }
}
