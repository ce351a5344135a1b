//! Walking a unit along a path
//!
//! A path is checked end to end before the unit takes a single step: every step
//! must be adjacent, walkable and unoccupied, and the whole route must be
//! affordable. Only then is the unit relocated and charged.

use serde::{Deserialize, Serialize};

use crate::battle::battle_map::GridMap;
use crate::battle::events::{BattleEventLog, BattleEventType};
use crate::battle::grid::TileCoord;
use crate::battle::pathfinding::{round_tu, step_cost, PathResult};
use crate::battle::registry::UnitRegistry;
use crate::battle::units::UnitId;
use crate::core::error::{Result, TacticsError};

/// Result of a completed move
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOutcome {
    pub unit: UnitId,
    pub from: TileCoord,
    pub to: TileCoord,
    pub tu_spent: u32,
    pub tiles_moved: usize,
}

/// Check a path for `unit_id` without moving it; returns the TU it would cost
pub fn validate_path(
    map: &GridMap,
    registry: &UnitRegistry,
    unit_id: UnitId,
    path: &PathResult,
) -> Result<u32> {
    let unit = registry.require(unit_id)?;
    unit.ensure_alive()?;

    let Some(start) = path.start() else {
        return Err(TacticsError::InvalidState("empty path".to_string()));
    };
    if start != unit.position {
        return Err(TacticsError::InvalidState(format!(
            "path starts at {:?} but unit {} stands at {:?}",
            start, unit_id, unit.position
        )));
    }

    let mut raw = 0.0;
    for pair in path.steps.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        if !from.is_adjacent(&to) {
            return Err(TacticsError::InvalidState(format!(
                "path jumps from {:?} to {:?}",
                from, to
            )));
        }
        if map.unit_at(to).is_some() {
            return Err(TacticsError::TileBlocked(to));
        }
        raw += step_cost(map, from, to).ok_or(TacticsError::TileBlocked(to))?;
    }
    let cost = round_tu(raw);

    unit.ensure_tu(cost)?;
    Ok(cost)
}

/// Move a unit along `path`, spending the TU it costs
pub fn move_unit(
    map: &mut GridMap,
    registry: &mut UnitRegistry,
    unit_id: UnitId,
    path: &PathResult,
    log: &mut BattleEventLog,
    turn: u32,
) -> Result<MoveOutcome> {
    let cost = validate_path(map, registry, unit_id, path)?;
    let from = registry.require(unit_id)?.position;
    let to = path.goal().unwrap_or(from);

    let outcome = MoveOutcome {
        unit: unit_id,
        from,
        to,
        tu_spent: cost,
        tiles_moved: path.moves(),
    };
    if from == to {
        return Ok(outcome);
    }

    registry.relocate(map, unit_id, to)?;
    registry.require_mut(unit_id)?.spend_tu(cost)?;

    tracing::debug!("Unit {} moved {:?} -> {:?} for {} TU", unit_id, from, to, cost);
    log.push(
        BattleEventType::UnitMoved {
            unit: unit_id,
            from,
            to,
            tu_spent: cost,
        },
        format!("Unit {} moves to ({}, {})", unit_id, to.x, to.y),
        turn,
    );
    Ok(outcome)
}
