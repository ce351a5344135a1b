//! Casualty aftermath: morale loss and field promotions
//!
//! Losing a soldier shakes the rest of the squad. Killing an alien counts toward
//! the next rank, and each rank gained sharpens reactions and aim.

use crate::battle::battle_map::GridMap;
use crate::battle::constants::{
    MORALE_LOSS_ALLY_DEATH, PROMOTION_ACCURACY_BONUS, PROMOTION_REACTION_BONUS,
};
use crate::battle::events::{BattleEventLog, BattleEventType};
use crate::battle::registry::UnitRegistry;
use crate::battle::unit_type::Faction;
use crate::battle::units::{Rank, UnitId};
use crate::core::error::Result;

/// Remove a dead unit from play and apply everything its death causes
///
/// `killer` is credited only when it is hostile to the victim.
pub fn resolve_casualty(
    map: &mut GridMap,
    registry: &mut UnitRegistry,
    victim: UnitId,
    killer: Option<UnitId>,
    log: &mut BattleEventLog,
    turn: u32,
) -> Result<()> {
    registry.remove_from_play(map, victim)?;
    let victim_faction = registry.require(victim)?.faction();

    tracing::info!("Unit {} killed", victim);
    log.push(
        BattleEventType::UnitKilled {
            unit: victim,
            killer,
        },
        format!("Unit {} was killed", victim),
        turn,
    );

    if victim_faction == Faction::Player {
        apply_ally_death(registry, victim, log, turn);
    }

    if let Some(killer) = killer {
        let hostile = registry.require(killer)?.faction() != victim_faction;
        if hostile {
            credit_kill(registry, killer, log, turn)?;
        }
    }
    Ok(())
}

/// Lower the morale of every surviving member of the victim's faction
pub fn apply_ally_death(
    registry: &mut UnitRegistry,
    victim: UnitId,
    log: &mut BattleEventLog,
    turn: u32,
) {
    let Some(faction) = registry.get(victim).map(|u| u.faction()) else {
        return;
    };

    for id in registry.living_ids(faction) {
        let Some(unit) = registry.get_mut(id) else {
            continue;
        };
        unit.lower_morale(MORALE_LOSS_ALLY_DEATH);
        let morale = unit.morale;
        log.push(
            BattleEventType::MoraleLowered { unit: id, morale },
            format!("Unit {} morale falls to {}", id, morale),
            turn,
        );
    }
}

/// Count a kill and promote if a new rank threshold was reached
///
/// Returns the new rank when a promotion happened. Units without a rank
/// (aliens) only have their kill tally updated.
pub fn credit_kill(
    registry: &mut UnitRegistry,
    killer: UnitId,
    log: &mut BattleEventLog,
    turn: u32,
) -> Result<Option<Rank>> {
    let unit = registry.require_mut(killer)?;
    unit.kills += 1;

    let Some(current) = unit.rank else {
        return Ok(None);
    };
    let earned = Rank::for_kills(unit.kills);
    if earned <= current {
        return Ok(None);
    }

    let steps = earned as u32 - current as u32;
    unit.rank = Some(earned);
    unit.reactions += PROMOTION_REACTION_BONUS * steps;
    unit.firing_accuracy += PROMOTION_ACCURACY_BONUS * steps;

    tracing::info!("Unit {} promoted to {:?}", killer, earned);
    log.push(
        BattleEventType::Promoted {
            unit: killer,
            rank: earned,
        },
        format!("Unit {} promoted to {:?}", killer, earned),
        turn,
    );
    Ok(Some(earned))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::constants::MAX_MORALE;
    use crate::battle::grid::TileCoord;
    use crate::battle::unit_type::{AlienSpecies, UnitKind};

    fn setup() -> (GridMap, UnitRegistry, UnitId, UnitId, UnitId) {
        let mut map = GridMap::new(10, 10);
        let mut registry = UnitRegistry::new();
        let a = registry.spawn(&mut map, UnitKind::Soldier, TileCoord::new(0, 0)).unwrap();
        let b = registry.spawn(&mut map, UnitKind::Soldier, TileCoord::new(1, 0)).unwrap();
        let alien = registry
            .spawn(&mut map, UnitKind::Alien(AlienSpecies::Sectoid), TileCoord::new(8, 8))
            .unwrap();
        (map, registry, a, b, alien)
    }

    #[test]
    fn test_soldier_death_lowers_squad_morale() {
        let (mut map, mut registry, a, b, alien) = setup();
        let mut log = BattleEventLog::new();

        resolve_casualty(&mut map, &mut registry, a, Some(alien), &mut log, 1).unwrap();

        assert!(!registry.get(a).unwrap().alive);
        assert_eq!(registry.get(b).unwrap().morale, MAX_MORALE - MORALE_LOSS_ALLY_DEATH);
        assert_eq!(registry.get(alien).unwrap().kills, 1);
        assert_eq!(map.unit_at(TileCoord::new(0, 0)), None);
        assert_eq!(
            log.count_where(|e| matches!(e, BattleEventType::UnitKilled { .. })),
            1
        );
    }

    #[test]
    fn test_alien_death_promotes_rookie() {
        let (mut map, mut registry, a, _b, alien) = setup();
        let mut log = BattleEventLog::new();
        let before = registry.get(a).unwrap().clone();

        resolve_casualty(&mut map, &mut registry, alien, Some(a), &mut log, 1).unwrap();

        let after = registry.get(a).unwrap();
        assert_eq!(after.kills, 1);
        assert_eq!(after.rank, Some(Rank::Squaddie));
        assert_eq!(after.reactions, before.reactions + PROMOTION_REACTION_BONUS);
        assert_eq!(after.firing_accuracy, before.firing_accuracy + PROMOTION_ACCURACY_BONUS);
        // Alien deaths do not touch player morale
        assert_eq!(after.morale, MAX_MORALE);
    }

    #[test]
    fn test_no_promotion_between_thresholds() {
        let (_map, mut registry, a, _b, _alien) = setup();
        let mut log = BattleEventLog::new();

        assert_eq!(credit_kill(&mut registry, a, &mut log, 1).unwrap(), Some(Rank::Squaddie));
        assert_eq!(credit_kill(&mut registry, a, &mut log, 1).unwrap(), None);
        assert_eq!(credit_kill(&mut registry, a, &mut log, 1).unwrap(), Some(Rank::Sergeant));
    }

    #[test]
    fn test_friendly_fire_gives_no_credit() {
        let (mut map, mut registry, a, b, _alien) = setup();
        let mut log = BattleEventLog::new();

        resolve_casualty(&mut map, &mut registry, b, Some(a), &mut log, 1).unwrap();

        assert_eq!(registry.get(a).unwrap().kills, 0);
    }
}
