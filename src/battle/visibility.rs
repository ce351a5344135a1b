//! Line of sight and fog of war
//!
//! The player's view is the union of what every living soldier can see. Visible
//! tiles are rebuilt from scratch on each refresh; explored tiles only accumulate.

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::battle::battle_map::GridMap;
use crate::battle::grid::TileCoord;
use crate::battle::registry::UnitRegistry;
use crate::battle::unit_type::Faction;
use crate::battle::units::{Unit, UnitId};

/// Fog-of-war state for the player faction
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VisibilityState {
    /// Currently visible tiles
    pub visible: AHashSet<TileCoord>,
    /// Every tile ever seen (never shrinks)
    pub explored: AHashSet<TileCoord>,
}

impl VisibilityState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Is this tile currently visible?
    pub fn is_visible(&self, coord: TileCoord) -> bool {
        self.visible.contains(&coord)
    }

    /// Has this tile been seen before?
    pub fn is_explored(&self, coord: TileCoord) -> bool {
        self.explored.contains(&coord)
    }

    /// Replace the visible set and fold it into explored memory
    pub fn update(&mut self, new_visible: AHashSet<TileCoord>) {
        self.explored.extend(new_visible.iter().copied());
        self.visible = new_visible;
    }

    /// Recompute from the current unit positions
    pub fn refresh(&mut self, map: &GridMap, registry: &UnitRegistry) {
        self.update(faction_visible_tiles(map, registry, Faction::Player));
    }
}

/// Can `observer` see `target` from where it stands?
pub fn can_see(map: &GridMap, observer: &Unit, target: TileCoord) -> bool {
    observer.alive
        && observer.position.euclidean(&target) <= observer.vision_range as f32
        && map.in_bounds(target)
        && map.has_line_of_sight(observer.position, target)
}

/// Every in-bounds tile within the unit's vision range with a clear ray to it
pub fn unit_visible_tiles(map: &GridMap, unit: &Unit) -> Vec<TileCoord> {
    if !unit.alive {
        return Vec::new();
    }
    unit.position
        .tiles_in_radius(unit.vision_range)
        .into_iter()
        .filter(|coord| map.in_bounds(*coord) && map.has_line_of_sight(unit.position, *coord))
        .collect()
}

/// Union of the visible tiles of every living unit of `faction`
pub fn faction_visible_tiles(
    map: &GridMap,
    registry: &UnitRegistry,
    faction: Faction,
) -> AHashSet<TileCoord> {
    let mut visible = AHashSet::new();
    for unit in registry.living(faction) {
        visible.extend(unit_visible_tiles(map, unit));
    }
    visible
}

/// Fresh player visibility with no prior memory
pub fn compute_visibility(map: &GridMap, registry: &UnitRegistry) -> VisibilityState {
    let mut state = VisibilityState::new();
    state.refresh(map, registry);
    state
}

/// Set each living enemy's `spotted` flag from the player's visible set
///
/// Returns the enemies that went from unspotted to spotted, in ascending id order.
pub fn update_spotted(registry: &mut UnitRegistry, visibility: &VisibilityState) -> Vec<UnitId> {
    let mut newly_spotted = Vec::new();
    for id in registry.living_ids(Faction::Enemy) {
        let Some(unit) = registry.get_mut(id) else {
            continue;
        };
        let now_spotted = visibility.is_visible(unit.position);
        if now_spotted && !unit.spotted {
            newly_spotted.push(id);
        }
        unit.spotted = now_spotted;
    }
    newly_spotted
}
