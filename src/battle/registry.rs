//! Unit registry: owns every combatant for the mission
//!
//! Ids are dense indices into the backing vector, so iteration is always in
//! ascending id order. Occupancy on the map is kept in step with unit positions
//! by routing every placement change through this type.

use serde::{Deserialize, Serialize};

use crate::battle::battle_map::GridMap;
use crate::battle::grid::TileCoord;
use crate::battle::unit_type::{Faction, UnitKind};
use crate::battle::units::{Unit, UnitId};
use crate::core::error::{Result, TacticsError};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UnitRegistry {
    units: Vec<Unit>,
}

impl UnitRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a unit on a free tile and mark the tile occupied
    pub fn spawn(
        &mut self,
        map: &mut GridMap,
        kind: UnitKind,
        position: TileCoord,
    ) -> Result<UnitId> {
        if !map.is_free(position) {
            return Err(TacticsError::TileBlocked(position));
        }

        let id = UnitId(self.units.len() as u32);
        self.units.push(Unit::new(id, kind, position));
        map.set_unit_at(position, Some(id));

        tracing::debug!("Spawned {:?} {} at {:?}", kind, id, position);
        Ok(id)
    }

    /// Add a fully built unit (its id is reassigned)
    pub fn insert(&mut self, map: &mut GridMap, mut unit: Unit) -> Result<UnitId> {
        if !map.is_free(unit.position) {
            return Err(TacticsError::TileBlocked(unit.position));
        }

        let id = UnitId(self.units.len() as u32);
        unit.id = id;
        map.set_unit_at(unit.position, Some(id));
        self.units.push(unit);
        Ok(id)
    }

    pub fn get(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.get_mut(id.0 as usize)
    }

    pub fn require(&self, id: UnitId) -> Result<&Unit> {
        self.get(id).ok_or(TacticsError::UnitNotFound(id))
    }

    pub fn require_mut(&mut self, id: UnitId) -> Result<&mut Unit> {
        self.get_mut(id).ok_or(TacticsError::UnitNotFound(id))
    }

    /// Borrow two distinct units mutably at once
    pub fn pair_mut(&mut self, a: UnitId, b: UnitId) -> Option<(&mut Unit, &mut Unit)> {
        let (ia, ib) = (a.0 as usize, b.0 as usize);
        if ia == ib || ia >= self.units.len() || ib >= self.units.len() {
            return None;
        }
        if ia < ib {
            let (left, right) = self.units.split_at_mut(ib);
            Some((&mut left[ia], &mut right[0]))
        } else {
            let (left, right) = self.units.split_at_mut(ia);
            Some((&mut right[0], &mut left[ib]))
        }
    }

    /// Every unit ever spawned, dead or alive
    pub fn all(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter()
    }

    /// Living units of a faction in ascending id order
    pub fn living(&self, faction: Faction) -> impl Iterator<Item = &Unit> {
        self.units
            .iter()
            .filter(move |u| u.alive && u.faction() == faction)
    }

    pub fn living_ids(&self, faction: Faction) -> Vec<UnitId> {
        self.living(faction).map(|u| u.id).collect()
    }

    pub fn living_count(&self, faction: Faction) -> usize {
        self.living(faction).count()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Move a unit to another free tile, updating occupancy on both ends
    pub fn relocate(&mut self, map: &mut GridMap, id: UnitId, to: TileCoord) -> Result<()> {
        let from = self.require(id)?.position;
        if from == to {
            return Ok(());
        }
        if !map.is_free(to) {
            return Err(TacticsError::TileBlocked(to));
        }

        map.set_unit_at(from, None);
        map.set_unit_at(to, Some(id));
        self.require_mut(id)?.position = to;
        Ok(())
    }

    /// Mark a unit dead and remove it from the map
    pub fn remove_from_play(&mut self, map: &mut GridMap, id: UnitId) -> Result<()> {
        let unit = self.require_mut(id)?;
        unit.alive = false;
        unit.overwatch = false;
        unit.health.current = 0;
        let position = unit.position;

        if map.unit_at(position) == Some(id) {
            map.set_unit_at(position, None);
        }
        Ok(())
    }

    /// Reset TU of every living unit in a faction
    pub fn replenish(&mut self, faction: Faction) {
        for unit in self.units.iter_mut().filter(|u| u.alive && u.faction() == faction) {
            unit.reset_tu();
        }
    }

    /// Occupancy and positions agree, and no tile holds two units
    pub fn occupancy_consistent(&self, map: &GridMap) -> bool {
        let mut occupied = 0;
        for coord in map.coords() {
            if let Some(id) = map.unit_at(coord) {
                occupied += 1;
                match self.get(id) {
                    Some(unit) if unit.alive && unit.position == coord => {}
                    _ => return false,
                }
            }
        }
        occupied == self.units.iter().filter(|u| u.alive).count()
    }
}
