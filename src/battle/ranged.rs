//! Ranged fire resolution
//!
//! A shot is validated in full before anything changes. Once it passes, TU are
//! spent and each round of the shot is rolled on its own: bursts stop early when
//! the magazine runs dry or the target drops.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::battle::battle_map::GridMap;
use crate::battle::constants::{
    CRITICAL_CHANCE, CRITICAL_MULTIPLIER, DAMAGE_SPREAD_MIN, DAMAGE_SPREAD_RANGE,
    DISTANCE_PENALTY_PER_TILE, KNEELING_ACCURACY_PERCENT, MAX_HIT_CHANCE, MIN_HIT_CHANCE,
};
use crate::battle::events::{BattleEventLog, BattleEventType};
use crate::battle::morale::resolve_casualty;
use crate::battle::registry::UnitRegistry;
use crate::battle::units::UnitId;
use crate::battle::weapons::{ShotMode, ShotProfile};
use crate::core::error::{Result, TacticsError};

/// Result of one trigger pull (all rounds of a burst combined)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatOutcome {
    /// At least one round hit
    pub hit: bool,
    /// Total damage dealt across all rounds
    pub damage: u32,
    /// At least one hit was critical
    pub critical: bool,
    pub target_died: bool,
    pub hit_chance: u32,
    pub rounds_fired: u32,
    pub hits: u32,
}

/// A validated shot, ready to execute
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotPlan {
    pub profile: ShotProfile,
    pub tu_cost: u32,
    pub distance: f32,
    pub hit_chance: u32,
}

/// Percent chance for one round to hit, always within [5, 95]
///
/// The kneeling bonus is applied before the clamp.
pub fn hit_chance(firing_accuracy: u32, mode_accuracy: u32, distance: f32, kneeling: bool) -> u32 {
    let skill = firing_accuracy as f32 * mode_accuracy as f32 / 100.0;
    let mut chance = (skill - distance * DISTANCE_PENALTY_PER_TILE).floor() as i32;
    if kneeling {
        chance = (chance * KNEELING_ACCURACY_PERCENT).div_euclid(100);
    }
    chance.clamp(MIN_HIT_CHANCE, MAX_HIT_CHANCE) as u32
}

/// Roll uniform [0, 100) against the hit chance
pub fn roll_hit<R: Rng + ?Sized>(chance: u32, rng: &mut R) -> bool {
    rng.gen_range(0.0..100.0) < chance as f64
}

/// Damage for one hit, and whether it was critical
pub fn roll_damage<R: Rng + ?Sized>(base_damage: u32, rng: &mut R) -> (u32, bool) {
    let spread = DAMAGE_SPREAD_MIN + rng.gen::<f64>() * DAMAGE_SPREAD_RANGE;
    let mut damage = (base_damage as f64 * spread).floor() as u32;
    let critical = rng.gen_bool(CRITICAL_CHANCE);
    if critical {
        damage *= CRITICAL_MULTIPLIER;
    }
    (damage, critical)
}

/// Check every precondition of a shot without touching state
pub fn plan_shot(
    map: &GridMap,
    registry: &UnitRegistry,
    shooter_id: UnitId,
    target_id: UnitId,
    mode: ShotMode,
) -> Result<ShotPlan> {
    let shooter = registry.require(shooter_id)?;
    let target = registry.require(target_id)?;

    shooter.ensure_alive()?;
    if !target.alive {
        return Err(TacticsError::InvalidTarget(format!(
            "unit {} is already dead",
            target_id
        )));
    }
    if !shooter.is_hostile_to(target) {
        return Err(TacticsError::InvalidTarget(format!(
            "unit {} is not hostile to {}",
            target_id, shooter_id
        )));
    }

    let profile = shooter.weapon.profile(mode).ok_or_else(|| {
        TacticsError::InvalidState(format!(
            "{:?} cannot fire in {:?} mode",
            shooter.weapon.kind, mode
        ))
    })?;
    let tu_cost = profile.tu_cost(shooter.time_units.base);
    shooter.ensure_tu(tu_cost)?;
    if shooter.weapon.is_empty() {
        return Err(TacticsError::insufficient("ammo", 1, 0));
    }

    let distance = shooter.position.euclidean(&target.position);
    if distance > shooter.weapon.range as f32 {
        return Err(TacticsError::InvalidTarget(format!(
            "unit {} is out of range ({:.1} > {})",
            target_id, distance, shooter.weapon.range
        )));
    }
    if !map.has_line_of_sight(shooter.position, target.position) {
        return Err(TacticsError::InvalidTarget(format!(
            "no line of sight from {} to {}",
            shooter_id, target_id
        )));
    }

    Ok(ShotPlan {
        profile,
        tu_cost,
        distance,
        hit_chance: hit_chance(
            shooter.firing_accuracy,
            profile.accuracy,
            distance,
            shooter.is_kneeling(),
        ),
    })
}

/// Fire `shooter`'s weapon at `target`
///
/// On error nothing is mutated. On success the shot is logged and, if the
/// target died, the casualty is resolved (occupancy, morale, kill credit).
#[allow(clippy::too_many_arguments)]
pub fn fire_weapon<R: Rng + ?Sized>(
    map: &mut GridMap,
    registry: &mut UnitRegistry,
    shooter_id: UnitId,
    target_id: UnitId,
    mode: ShotMode,
    rng: &mut R,
    log: &mut BattleEventLog,
    turn: u32,
) -> Result<CombatOutcome> {
    let plan = plan_shot(map, registry, shooter_id, target_id, mode)?;

    let (shooter, target) = registry
        .pair_mut(shooter_id, target_id)
        .ok_or_else(|| {
            TacticsError::InvalidTarget(format!("unit {} cannot target itself", shooter_id))
        })?;

    shooter.spend_tu(plan.tu_cost)?;

    let mut outcome = CombatOutcome {
        hit_chance: plan.hit_chance,
        ..Default::default()
    };
    for _ in 0..plan.profile.rounds {
        if !shooter.weapon.consume_round() {
            break;
        }
        outcome.rounds_fired += 1;

        if !roll_hit(plan.hit_chance, rng) {
            continue;
        }
        let (damage, critical) = roll_damage(shooter.weapon.base_damage, rng);
        outcome.hit = true;
        outcome.hits += 1;
        outcome.damage += damage;
        outcome.critical |= critical;

        if target.take_damage(damage) {
            outcome.target_died = true;
            break;
        }
    }

    tracing::debug!(
        "Unit {} fires {:?} at {}: {}/{} hits for {} damage ({}%)",
        shooter_id,
        mode,
        target_id,
        outcome.hits,
        outcome.rounds_fired,
        outcome.damage,
        outcome.hit_chance
    );
    log.push(
        BattleEventType::ShotFired {
            shooter: shooter_id,
            target: target_id,
            mode,
            outcome,
        },
        format!(
            "Unit {} fires at {}: {} damage{}",
            shooter_id,
            target_id,
            outcome.damage,
            if outcome.critical { " (critical)" } else { "" }
        ),
        turn,
    );

    if outcome.target_died {
        resolve_casualty(map, registry, target_id, Some(shooter_id), log, turn)?;
    }
    Ok(outcome)
}
