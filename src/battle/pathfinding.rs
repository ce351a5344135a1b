//! Weighted A* pathfinding over the 8-connected tile grid
//!
//! g-cost accumulates the TU cost of each destination tile as `f32`, with diagonal
//! steps charged 1.4x. A path's TU total is rounded to the nearest whole TU once,
//! over the whole route, never per step. The heuristic is Euclidean distance
//! times [`HEURISTIC_WEIGHT`]. Because the weight is above 1 the heuristic is NOT
//! admissible: the search converges quickly on a walkable path, but that path is
//! not guaranteed to be the cheapest one. Callers must not rely on optimality.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use ahash::{AHashMap, AHashSet};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::battle::battle_map::GridMap;
use crate::battle::constants::{DIAGONAL_COST_MULTIPLIER, HEURISTIC_WEIGHT};
use crate::battle::grid::TileCoord;

/// A route across the map: start tile first, goal tile last
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathResult {
    pub steps: Vec<TileCoord>,
    /// Total TU to walk the whole route
    pub cost: u32,
}

impl PathResult {
    pub fn start(&self) -> Option<TileCoord> {
        self.steps.first().copied()
    }

    pub fn goal(&self) -> Option<TileCoord> {
        self.steps.last().copied()
    }

    /// Number of tiles moved (excludes the start tile)
    pub fn moves(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    /// Longest prefix whose rounded cost fits in `budget` TU
    pub fn truncate_to_budget(&self, map: &GridMap, budget: u32) -> PathResult {
        let mut steps = Vec::with_capacity(self.steps.len());
        let mut raw = 0.0;

        if let Some(first) = self.start() {
            steps.push(first);
        }
        for pair in self.steps.windows(2) {
            let Some(step) = step_cost(map, pair[0], pair[1]) else {
                break;
            };
            if round_tu(raw + step) > budget {
                break;
            }
            raw += step;
            steps.push(pair[1]);
        }

        PathResult {
            steps,
            cost: round_tu(raw),
        }
    }
}

/// Node in the A* open set
#[derive(Debug, Clone)]
struct PathNode {
    coord: TileCoord,
    f_cost: OrderedFloat<f32>,
    seq: u64, // insertion order, breaks f-cost ties
}

impl PartialEq for PathNode {
    fn eq(&self, other: &Self) -> bool {
        self.f_cost == other.f_cost && self.seq == other.seq
    }
}

impl Eq for PathNode {}

impl Ord for PathNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap
        other
            .f_cost
            .cmp(&self.f_cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for PathNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Unrounded TU to step from `from` into the adjacent tile `to`
///
/// Returns `None` if `to` is blocked or not adjacent, or if a diagonal step would
/// cut the corner of an unwalkable tile.
pub fn step_cost(map: &GridMap, from: TileCoord, to: TileCoord) -> Option<f32> {
    if !from.is_adjacent(&to) {
        return None;
    }
    let base = map.cost_of(to)?;

    if from.is_diagonal_to(&to) {
        let corner_a = TileCoord::new(from.x, to.y);
        let corner_b = TileCoord::new(to.x, from.y);
        if !map.is_walkable(corner_a) || !map.is_walkable(corner_b) {
            return None;
        }
        return Some(base as f32 * DIAGONAL_COST_MULTIPLIER);
    }

    Some(base as f32)
}

/// Whole TU charged for an accumulated raw cost: nearest, halves round up
pub fn round_tu(raw: f32) -> u32 {
    raw.round() as u32
}

/// Total TU of a sequence of steps, `None` if any step is illegal
pub fn path_cost(map: &GridMap, steps: &[TileCoord]) -> Option<u32> {
    steps
        .windows(2)
        .map(|pair| step_cost(map, pair[0], pair[1]))
        .sum::<Option<f32>>()
        .map(round_tu)
}

fn heuristic(from: TileCoord, goal: TileCoord) -> f32 {
    from.euclidean(&goal) * HEURISTIC_WEIGHT
}

/// Find a path to a free goal tile
///
/// Returns `None` if the goal is unwalkable, occupied, or unreachable. Other units
/// block movement.
pub fn find_path(map: &GridMap, start: TileCoord, goal: TileCoord) -> Option<PathResult> {
    if start == goal {
        return Some(PathResult {
            steps: vec![start],
            cost: 0,
        });
    }
    if !map.is_free(goal) {
        return None;
    }
    search(map, start, goal)
}

/// Find a path that ends next to `goal`, which may be occupied
///
/// Used to close in on another unit. The returned path stops on the last free tile
/// before the goal.
pub fn find_approach_path(map: &GridMap, start: TileCoord, goal: TileCoord) -> Option<PathResult> {
    if start == goal || !map.is_walkable(goal) {
        return None;
    }
    if start.is_adjacent(&goal) {
        return Some(PathResult {
            steps: vec![start],
            cost: 0,
        });
    }

    let mut path = search(map, start, goal)?;
    path.steps.pop();
    path.cost = path_cost(map, &path.steps)?;
    Some(path)
}

fn search(map: &GridMap, start: TileCoord, goal: TileCoord) -> Option<PathResult> {
    let mut open_set = BinaryHeap::new();
    let mut closed: AHashSet<TileCoord> = AHashSet::new();
    let mut came_from: AHashMap<TileCoord, TileCoord> = AHashMap::new();
    let mut g_scores: AHashMap<TileCoord, f32> = AHashMap::new();
    let mut seq = 0u64;

    g_scores.insert(start, 0.0);
    open_set.push(PathNode {
        coord: start,
        f_cost: OrderedFloat(heuristic(start, goal)),
        seq,
    });

    while let Some(current) = open_set.pop() {
        if current.coord == goal {
            let cost = g_scores.get(&goal).copied().map_or(0, round_tu);
            return Some(PathResult {
                steps: reconstruct_path(&came_from, goal),
                cost,
            });
        }
        if !closed.insert(current.coord) {
            continue;
        }

        let current_g = g_scores.get(&current.coord).copied().unwrap_or(f32::INFINITY);

        for neighbor in current.coord.neighbors() {
            if closed.contains(&neighbor) {
                continue;
            }
            // The goal may hold a unit when approaching; everything else must be free
            if neighbor != goal && map.unit_at(neighbor).is_some() {
                continue;
            }
            let Some(move_cost) = step_cost(map, current.coord, neighbor) else {
                continue;
            };

            let tentative_g = current_g + move_cost;
            let neighbor_g = g_scores.get(&neighbor).copied().unwrap_or(f32::INFINITY);

            if tentative_g < neighbor_g {
                came_from.insert(neighbor, current.coord);
                g_scores.insert(neighbor, tentative_g);

                seq += 1;
                open_set.push(PathNode {
                    coord: neighbor,
                    f_cost: OrderedFloat(tentative_g + heuristic(neighbor, goal)),
                    seq,
                });
            }
        }
    }

    None // No path found
}

/// Reconstruct path from came_from map
fn reconstruct_path(
    came_from: &AHashMap<TileCoord, TileCoord>,
    mut current: TileCoord,
) -> Vec<TileCoord> {
    let mut path = vec![current];
    while let Some(&prev) = came_from.get(&current) {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}
