//! Non-movement unit orders: stance, reload and overwatch
//!
//! Each order returns the TU it spent so the caller can feed the reaction check.

use crate::battle::constants::{KNEEL_TU, RELOAD_TU, STAND_TU};
use crate::battle::events::{BattleEventLog, BattleEventType};
use crate::battle::reaction::reaction_mode;
use crate::battle::registry::UnitRegistry;
use crate::battle::units::{Stance, UnitId};
use crate::core::error::{Result, TacticsError};

/// TU to change into `stance`
pub fn stance_cost(stance: Stance) -> u32 {
    match stance {
        Stance::Kneeling => KNEEL_TU,
        Stance::Standing => STAND_TU,
    }
}

/// Kneel or stand up. Asking for the current stance is free and does nothing.
pub fn set_stance(
    registry: &mut UnitRegistry,
    unit_id: UnitId,
    stance: Stance,
    log: &mut BattleEventLog,
    turn: u32,
) -> Result<u32> {
    let unit = registry.require_mut(unit_id)?;
    unit.ensure_alive()?;
    if unit.stance == stance {
        return Ok(0);
    }

    let cost = stance_cost(stance);
    unit.spend_tu(cost)?;
    unit.stance = stance;

    log.push(
        BattleEventType::StanceChanged {
            unit: unit_id,
            stance,
        },
        format!("Unit {} is now {:?}", unit_id, stance),
        turn,
    );
    Ok(cost)
}

/// Swap in a spare clip
pub fn reload(
    registry: &mut UnitRegistry,
    unit_id: UnitId,
    log: &mut BattleEventLog,
    turn: u32,
) -> Result<u32> {
    let unit = registry.require_mut(unit_id)?;
    unit.ensure_alive()?;
    if unit.weapon.ammo.current == unit.weapon.ammo.base {
        return Err(TacticsError::InvalidState(format!(
            "unit {} already has a full magazine",
            unit_id
        )));
    }
    if unit.weapon.spare_clips == 0 {
        return Err(TacticsError::insufficient("spare clips", 1, 0));
    }
    unit.ensure_tu(RELOAD_TU)?;

    unit.spend_tu(RELOAD_TU)?;
    unit.weapon.load_clip();

    tracing::debug!("Unit {} reloaded, {} clips left", unit_id, unit.weapon.spare_clips);
    log.push(
        BattleEventType::WeaponReloaded { unit: unit_id },
        format!("Unit {} reloads", unit_id),
        turn,
    );
    Ok(RELOAD_TU)
}

/// Hold fire for the opponent's turn, doubling the reaction score
///
/// Costs no TU, but the unit must be able to pay for a reaction shot now.
pub fn declare_overwatch(
    registry: &mut UnitRegistry,
    unit_id: UnitId,
    log: &mut BattleEventLog,
    turn: u32) -> Result<()> {
    let unit = registry.require_mut(unit_id)?;
    unit.ensure_alive()?;
    if unit.overwatch {
        return Ok(());
    }
    if unit.weapon.is_empty() {
        return Err(TacticsError::insufficient("ammo", 1, 0));
    }
    let profile = reaction_mode(unit)
        .and_then(|mode| unit.weapon.profile(mode))
        .ok_or_else(|| {
            TacticsError::InvalidState(format!("unit {} has no usable fire mode", unit_id))
        })?;
    unit.ensure_tu(profile.tu_cost(unit.time_units.base))?;

    unit.overwatch = true;
    log.push(
        BattleEventType::OverwatchDeclared { unit: unit_id },
        format!("Unit {} is on overwatch", unit_id),
        turn,
    );
    Ok(())
}

pub fn cancel_overwatch(
    registry: &mut UnitRegistry,
    unit_id: UnitId,
    log: &mut BattleEventLog,
    turn: u32) -> Result<()> {
    let unit = registry.require_mut(unit_id)?;
    if !unit.overwatch {
        return Ok(());
    }
    unit.overwatch = false;
    log.push(
        BattleEventType::OverwatchCleared { unit: unit_id },
        format!("Unit {} stands down from overwatch", unit_id),
        turn,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::battle_map::GridMap;
    use crate::battle::grid::TileCoord;
    use crate::battle::unit_type::UnitKind;
    use crate::core::error::ErrorKind;

    fn setup() -> (UnitRegistry, UnitId) {
        let mut map = GridMap::new(5, 5);
        let mut registry = UnitRegistry::new();
        let id = registry.spawn(&mut map, UnitKind::Soldier, TileCoord::new(1, 1)).unwrap();
        (registry, id)
    }

    #[test]
    fn test_kneel_then_stand() {
        let (mut registry, id) = setup();
        let mut log = BattleEventLog::new();
        let base = registry.get(id).unwrap().time_units.base;

        assert_eq!(set_stance(&mut registry, id, Stance::Kneeling, &mut log, 1).unwrap(), KNEEL_TU);
        assert!(registry.get(id).unwrap().is_kneeling());
        assert_eq!(set_stance(&mut registry, id, Stance::Standing, &mut log, 1).unwrap(), STAND_TU);

        assert_eq!(registry.get(id).unwrap().time_units.current, base - KNEEL_TU - STAND_TU);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_same_stance_is_free() {
        let (mut registry, id) = setup();
        let mut log = BattleEventLog::new();
        assert_eq!(set_stance(&mut registry, id, Stance::Standing, &mut log, 1).unwrap(), 0);
        assert!(log.is_empty());
    }

    #[test]
    fn test_stance_needs_tu() {
        let (mut registry, id) = setup();
        registry.get_mut(id).unwrap().time_units.current = 2;
        let mut log = BattleEventLog::new();

        let err = set_stance(&mut registry, id, Stance::Kneeling, &mut log, 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientResource);
        assert!(!registry.get(id).unwrap().is_kneeling());
    }

    #[test]
    fn test_reload_refills_magazine() {
        let (mut registry, id) = setup();
        registry.get_mut(id).unwrap().weapon.ammo.current = 0;
        let clips = registry.get(id).unwrap().weapon.spare_clips;
        let mut log = BattleEventLog::new();

        assert_eq!(reload(&mut registry, id, &mut log, 1).unwrap(), RELOAD_TU);

        let unit = registry.get(id).unwrap();
        assert_eq!(unit.weapon.ammo.current, unit.weapon.ammo.base);
        assert_eq!(unit.weapon.spare_clips, clips - 1);
    }

    #[test]
    fn test_reload_without_clips() {
        let (mut registry, id) = setup();
        {
            let unit = registry.get_mut(id).unwrap();
            unit.weapon.ammo.current = 0;
            unit.weapon.spare_clips = 0;
        }
        let mut log = BattleEventLog::new();

        let err = reload(&mut registry, id, &mut log, 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InsufficientResource);
        let unit = registry.get(id).unwrap();
        assert_eq!(unit.time_units.current, unit.time_units.base);
    }

    #[test]
    fn test_reload_full_magazine_rejected() {
        let (mut registry, id) = setup();
        let mut log = BattleEventLog::new();
        let err = reload(&mut registry, id, &mut log, 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidState);
    }

    #[test]
    fn test_overwatch_round_trip() {
        let (mut registry, id) = setup();
        let mut log = BattleEventLog::new();

        declare_overwatch(&mut registry, id, &mut log, 1).unwrap();
        assert!(registry.get(id).unwrap().overwatch);
        let unit = registry.get(id).unwrap();
        assert_eq!(unit.time_units.current, unit.time_units.base);

        cancel_overwatch(&mut registry, id, &mut log, 1).unwrap();
        assert!(!registry.get(id).unwrap().overwatch);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_overwatch_needs_snap_tu() {
        let (mut registry, id) = setup();
        registry.get_mut(id).unwrap().time_units.current = 5;
        let mut log = BattleEventLog::new();

        assert!(declare_overwatch(&mut registry, id, &mut log, 1).is_err());
        assert!(!registry.get(id).unwrap().overwatch);
    }
}
