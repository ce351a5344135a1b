//! Reaction fire: out-of-turn snap shots at a unit that just spent TU
//!
//! After every TU-consuming command, each alert opponent that can see the acting
//! unit compares `reactions × current TU` (doubled on overwatch) against
//! `acting reactions × TU spent`. Reactors resolve in ascending id order, and a
//! reaction shot never triggers reactions of its own.

use rand::Rng;

use crate::battle::battle_map::GridMap;
use crate::battle::constants::{OVERWATCH_MULTIPLIER, REACTION_MIN_TU};
use crate::battle::events::{BattleEventLog, BattleEventType};
use crate::battle::ranged::{fire_weapon, plan_shot};
use crate::battle::registry::UnitRegistry;
use crate::battle::units::{Unit, UnitId};
use crate::battle::visibility::can_see;
use crate::battle::weapons::ShotMode;
use crate::core::error::Result;

pub fn reaction_score(reactor: &Unit) -> u32 {
    let score = reactor.reactions * reactor.time_units.current;
    if reactor.overwatch {
        score * OVERWATCH_MULTIPLIER
    } else {
        score
    }
}

pub fn acting_score(acting: &Unit, tu_spent: u32) -> u32 {
    acting.reactions * tu_spent
}

/// Resource and score test, ignoring position and alertness
pub fn reaction_triggers(reactor: &Unit, acting: &Unit, tu_spent: u32) -> bool {
    reactor.alive
        && reactor.time_units.current >= REACTION_MIN_TU
        && !reactor.weapon.is_empty()
        && reaction_score(reactor) > acting_score(acting, tu_spent)
}

/// Shot mode used for reactions: snap, or the first mode the weapon has
pub fn reaction_mode(reactor: &Unit) -> Option<ShotMode> {
    if reactor.weapon.supports(ShotMode::Snap) {
        return Some(ShotMode::Snap);
    }
    ShotMode::ALL.into_iter().find(|mode| reactor.weapon.supports(*mode))
}

/// Opponents that would interrupt `acting_id`, in ascending id order
pub fn eligible_reactors(
    map: &GridMap,
    registry: &UnitRegistry,
    acting_id: UnitId,
    tu_spent: u32,
) -> Vec<UnitId> {
    let Some(acting) = registry.get(acting_id).filter(|u| u.alive) else {
        return Vec::new();
    };
    if tu_spent == 0 {
        return Vec::new();
    }

    registry
        .living(acting.faction().opponent())
        .filter(|reactor| reactor.is_alert())
        .filter(|reactor| can_see(map, reactor, acting.position))
        .filter(|reactor| reaction_triggers(reactor, acting, tu_spent))
        .map(|reactor| reactor.id)
        .collect()
}

/// Run the reaction check for a unit that just spent `tu_spent` TU
///
/// Returns the ids of the units that actually fired. Processing stops as soon as
/// the acting unit is dead. A reactor whose shot fails validation (out of range,
/// snap cost over its remaining TU) is skipped.
#[allow(clippy::too_many_arguments)]
pub fn check_reactions<R: Rng + ?Sized>(
    map: &mut GridMap,
    registry: &mut UnitRegistry,
    acting_id: UnitId,
    tu_spent: u32,
    rng: &mut R,
    log: &mut BattleEventLog,
    turn: u32,
) -> Result<Vec<UnitId>> {
    let reactors = eligible_reactors(map, registry, acting_id, tu_spent);
    let mut fired = Vec::new();

    for reactor_id in reactors {
        if !registry.require(acting_id)?.alive {
            break;
        }
        let Some(mode) = reaction_mode(registry.require(reactor_id)?) else {
            continue;
        };
        if let Err(err) = plan_shot(map, registry, reactor_id, acting_id, mode) {
            tracing::debug!("Unit {} cannot react: {}", reactor_id, err);
            continue;
        }

        tracing::debug!("Unit {} reacts to {}", reactor_id, acting_id);
        log.push(
            BattleEventType::ReactionFire {
                reactor: reactor_id,
                target: acting_id,
            },
            format!("Unit {} takes a reaction shot at {}", reactor_id, acting_id),
            turn,
        );
        fire_weapon(map, registry, reactor_id, acting_id, mode, rng, log, turn)?;
        fired.push(reactor_id);

        let reactor = registry.require_mut(reactor_id)?;
        if reactor.overwatch {
            reactor.overwatch = false;
            log.push(
                BattleEventType::OverwatchCleared { unit: reactor_id },
                format!("Unit {} leaves overwatch", reactor_id),
                turn,
            );
        }
    }
    Ok(fired)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::grid::TileCoord;
    use crate::battle::terrain::TerrainKind;
    use crate::battle::unit_type::{AlienSpecies, UnitKind};
    use crate::battle::units::Pool;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn unit_with(reactions: u32, tu: u32) -> Unit {
        let mut unit = Unit::new(UnitId(0), UnitKind::Soldier, TileCoord::new(0, 0));
        unit.reactions = reactions;
        unit.time_units = Pool::full(tu);
        unit
    }

    #[test]
    fn test_high_score_interrupts() {
        let reactor = unit_with(50, 50);
        let acting = unit_with(10, 50);
        assert!(reaction_triggers(&reactor, &acting, 5));
    }

    #[test]
    fn test_low_tu_never_reacts() {
        let reactor = unit_with(1_000, 10);
        let acting = unit_with(1, 50);
        assert!(!reaction_triggers(&reactor, &acting, 1));
    }

    #[test]
    fn test_empty_weapon_never_reacts() {
        let mut reactor = unit_with(50, 50);
        reactor.weapon.ammo.current = 0;
        let acting = unit_with(10, 50);
        assert!(!reaction_triggers(&reactor, &acting, 5));
    }

    #[test]
    fn test_overwatch_doubles_score() {
        let mut reactor = unit_with(10, 20);
        let acting = unit_with(50, 50);
        assert!(!reaction_triggers(&reactor, &acting, 5));

        reactor.overwatch = true;
        assert_eq!(reaction_score(&reactor), 400);
        assert!(reaction_triggers(&reactor, &acting, 5));
    }

    fn standoff() -> (GridMap, UnitRegistry, UnitId, UnitId) {
        let mut map = GridMap::new(30, 10);
        let mut registry = UnitRegistry::new();
        let soldier = registry.spawn(&mut map, UnitKind::Soldier, TileCoord::new(2, 5)).unwrap();
        let alien = registry
            .spawn(&mut map, UnitKind::Alien(AlienSpecies::Sectoid), TileCoord::new(8, 5))
            .unwrap();
        registry.get_mut(soldier).unwrap().health = Pool::full(10_000);
        registry.get_mut(alien).unwrap().health = Pool::full(10_000);
        (map, registry, soldier, alien)
    }

    #[test]
    fn test_spotted_alien_reacts_to_move() {
        let (mut map, mut registry, soldier, alien) = standoff();
        registry.get_mut(alien).unwrap().spotted = true;
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut log = BattleEventLog::new();

        let fired = check_reactions(
            &mut map,
            &mut registry,
            soldier,
            12,
            &mut rng,
            &mut log,
            1,
        )
        .unwrap();

        assert_eq!(fired, vec![alien]);
        let reactor = registry.get(alien).unwrap();
        // Plasma pistol snap: 30% of 54 TU
        assert_eq!(reactor.time_units.current, 54 - 16);
        assert!(matches!(
            log.events[0].event_type,
            BattleEventType::ReactionFire { .. }
        ));
        assert!(matches!(log.events[1].event_type, BattleEventType::ShotFired { .. }));
    }

    #[test]
    fn test_unspotted_alien_holds_fire() {
        let (mut map, mut registry, soldier, _alien) = standoff();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut log = BattleEventLog::new();

        let fired = check_reactions(
            &mut map,
            &mut registry,
            soldier,
            12,
            &mut rng,
            &mut log,
            1,
        )
        .unwrap();
        assert!(fired.is_empty());
        assert!(log.is_empty());
    }

    #[test]
    fn test_no_reaction_without_line_of_sight() {
        let (mut map, mut registry, soldier, alien) = standoff();
        registry.get_mut(alien).unwrap().spotted = true;
        map.set_terrain(TileCoord::new(5, 5), TerrainKind::Wall);

        assert!(eligible_reactors(&map, &registry, soldier, 12).is_empty());
    }

    #[test]
    fn test_reactors_in_ascending_id_order() {
        let (mut map, mut registry, _soldier, alien) = standoff();
        let second = registry.spawn(&mut map, UnitKind::Soldier, TileCoord::new(2, 6)).unwrap();
        registry.get_mut(alien).unwrap().reactions = 1;
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut log = BattleEventLog::new();

        let fired = check_reactions(
            &mut map,
            &mut registry,
            alien,
            10,
            &mut rng,
            &mut log,
            1,
        )
        .unwrap();

        assert_eq!(fired, vec![UnitId(0), second]);
        let order: Vec<UnitId> = log
            .iter()
            .filter_map(|e| match e.event_type {
                BattleEventType::ReactionFire { reactor, .. } => Some(reactor),
                _ => None,
            })
            .collect();
        assert_eq!(order, fired);
    }

    #[test]
    fn test_stops_once_acting_unit_dies() {
        let mut killed = false;
        for seed in 0..50 {
            let (mut map, mut registry, _soldier, alien) = standoff();
            let second = registry.spawn(&mut map, UnitKind::Soldier, TileCoord::new(2, 6)).unwrap();
            registry.get_mut(UnitId(0)).unwrap().firing_accuracy = 1_000;
            {
                let acting = registry.get_mut(alien).unwrap();
                acting.reactions = 1;
                acting.health = Pool::full(1);
            }
            let second_before = registry.get(second).unwrap().clone();
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut log = BattleEventLog::new();

            let fired = check_reactions(
                &mut map,
                &mut registry,
                alien,
                10,
                &mut rng,
                &mut log,
                1,
            )
            .unwrap();

            if registry.get(alien).unwrap().alive {
                continue;
            }
            killed = true;
            assert_eq!(fired, vec![UnitId(0)]);
            let second_after = registry.get(second).unwrap();
            assert_eq!(second_after.time_units, second_before.time_units);
            assert_eq!(second_after.weapon.ammo, second_before.weapon.ammo);
            assert_eq!(
                log.count_where(|e| matches!(e, BattleEventType::ReactionFire { .. })),
                1
            );
            let second_shots = log.count_where(|e| {
                matches!(e, BattleEventType::ShotFired { shooter, .. } if *shooter == second)
            });
            assert_eq!(second_shots, 0);
            break;
        }
        assert!(killed);
    }

    #[test]
    fn test_overwatch_cleared_after_firing() {
        let (mut map, mut registry, soldier, alien) = standoff();
        registry.get_mut(soldier).unwrap().overwatch = true;
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut log = BattleEventLog::new();

        let fired = check_reactions(
            &mut map,
            &mut registry,
            alien,
            10,
            &mut rng,
            &mut log,
            1,
        )
        .unwrap();

        assert_eq!(fired, vec![soldier]);
        assert!(!registry.get(soldier).unwrap().overwatch);
        assert_eq!(
            log.count_where(|e| matches!(e, BattleEventType::OverwatchCleared { .. })),
            1
        );
    }

    #[test]
    fn test_zero_tu_spent_triggers_nothing() {
        let (map, mut registry, soldier, alien) = standoff();
        registry.get_mut(alien).unwrap().spotted = true;
        assert!(eligible_reactors(&map, &registry, soldier, 0).is_empty());
    }
}
