//! An alien's filtered view of the mission
//!
//! Respects fog of war unless the personality ignores it: only soldiers standing
//! on a tile some living alien can see are offered as targets.

use ahash::AHashSet;
use ordered_float::OrderedFloat;

use crate::battle::execution::GameState;
use crate::battle::grid::TileCoord;
use crate::battle::units::{Unit, UnitId};
use crate::battle::visibility::faction_visible_tiles;

pub struct DecisionContext<'a> {
    pub state: &'a GameState,
    pub unit: &'a Unit,
    sighted: AHashSet<TileCoord>,
    ignores_fog: bool,
}

impl<'a> DecisionContext<'a> {
    /// `None` if the unit does not exist or is dead
    pub fn new(state: &'a GameState, unit_id: UnitId, ignores_fog: bool) -> Option<Self> {
        let unit = state.units.get(unit_id).filter(|u| u.alive)?;
        let sighted = if ignores_fog {
            AHashSet::new()
        } else {
            faction_visible_tiles(&state.map, &state.units, unit.faction())
        };
        Some(Self {
            state,
            unit,
            sighted,
            ignores_fog,
        })
    }

    /// Living opponents this side knows about, nearest first
    pub fn visible_targets(&self) -> Vec<&'a Unit> {
        let mut targets: Vec<&Unit> = self
            .state
            .units
            .living(self.unit.faction().opponent())
            .filter(|u| self.ignores_fog || self.sighted.contains(&u.position))
            .collect();
        targets.sort_by_key(|u| (OrderedFloat(self.distance_to(u)), u.id));
        targets
    }

    pub fn nearest_target(&self) -> Option<&'a Unit> {
        self.visible_targets().into_iter().next()
    }

    pub fn distance_to(&self, other: &Unit) -> f32 {
        self.unit.position.euclidean(&other.position)
    }
}
