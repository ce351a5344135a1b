//! Combatants: soldiers and aliens
//!
//! A unit is never deleted. Death clears `alive` and frees its tile, but the
//! record stays in the registry for after-action reporting.

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::battle::constants::{MAX_MORALE, RANK_KILL_THRESHOLDS};
use crate::battle::grid::TileCoord;
use crate::battle::unit_type::{Faction, UnitKind};
use crate::battle::weapons::Weapon;
use crate::core::error::{Result, TacticsError};

/// Unique identifier for units, allocated in ascending order
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[display(fmt = "#{}", _0)]
pub struct UnitId(pub u32);

/// Bounded resource with a base (maximum) and a current value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    pub base: u32,
    pub current: u32,
}

impl Pool {
    pub fn full(base: u32) -> Self {
        Self {
            base,
            current: base,
        }
    }

    pub fn refill(&mut self) {
        self.current = self.base;
    }

    pub fn can_afford(&self, amount: u32) -> bool {
        amount <= self.current
    }
}

/// Body posture; kneeling steadies aim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Stance {
    #[default]
    Standing,
    Kneeling,
}

/// Soldier rank, earned through kills
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Rank {
    #[default]
    Rookie,
    Squaddie,
    Sergeant,
    Captain,
    Colonel,
}

impl Rank {
    /// Rank earned by a kill count
    pub fn for_kills(kills: u32) -> Rank {
        let reached = RANK_KILL_THRESHOLDS
            .iter()
            .take_while(|threshold| kills >= **threshold)
            .count();
        match reached {
            0 => Rank::Rookie,
            1 => Rank::Squaddie,
            2 => Rank::Sergeant,
            3 => Rank::Captain,
            _ => Rank::Colonel,
        }
    }
}

/// A single combatant on the tactical map
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub kind: UnitKind,
    pub name: String,

    // Position
    pub position: TileCoord,
    pub stance: Stance,

    // Stats
    pub time_units: Pool,
    pub health: Pool,
    pub reactions: u32,
    pub firing_accuracy: u32,
    pub vision_range: u32,
    pub morale: u32,

    // State
    pub alive: bool,
    /// Enemy units only: currently inside the player's visible set
    pub spotted: bool,
    pub overwatch: bool,

    pub weapon: Weapon,

    // Career
    pub kills: u32,
    pub rank: Option<Rank>,
}

impl Unit {
    pub fn new(id: UnitId, kind: UnitKind, position: TileCoord) -> Self {
        let profile = kind.default_profile();
        Self {
            id,
            kind,
            name: String::new(),
            position,
            stance: Stance::default(),
            time_units: Pool::full(profile.time_units),
            health: Pool::full(profile.health),
            reactions: profile.reactions,
            firing_accuracy: profile.firing_accuracy,
            vision_range: profile.vision_range,
            morale: MAX_MORALE,
            alive: true,
            spotted: false,
            overwatch: false,
            weapon: Weapon::new(profile.weapon),
            kills: 0,
            rank: matches!(kind, UnitKind::Soldier).then_some(Rank::Rookie),
        }
    }

    pub fn faction(&self) -> Faction {
        self.kind.faction()
    }

    pub fn is_hostile_to(&self, other: &Unit) -> bool {
        self.faction() != other.faction()
    }

    /// Player units are always alert; aliens only once spotted
    pub fn is_alert(&self) -> bool {
        match self.faction() {
            Faction::Player => true,
            Faction::Enemy => self.spotted,
        }
    }

    pub fn is_kneeling(&self) -> bool {
        self.stance == Stance::Kneeling
    }

    /// Fail unless the unit can act at all
    pub fn ensure_alive(&self) -> Result<()> {
        if self.alive {
            Ok(())
        } else {
            Err(TacticsError::InvalidState(format!("unit {} is dead", self.id)))
        }
    }

    /// Fail without mutating if `cost` exceeds the remaining TU
    pub fn ensure_tu(&self, cost: u32) -> Result<()> {
        if self.time_units.can_afford(cost) {
            Ok(())
        } else {
            Err(TacticsError::insufficient(
                "time units",
                cost,
                self.time_units.current,
            ))
        }
    }

    /// Deduct TU after validation
    pub fn spend_tu(&mut self, cost: u32) -> Result<()> {
        self.ensure_tu(cost)?;
        self.time_units.current -= cost;
        Ok(())
    }

    pub fn reset_tu(&mut self) {
        self.time_units.refill();
    }

    /// Subtract health; returns true when this blow is fatal
    pub fn take_damage(&mut self, damage: u32) -> bool {
        self.health.current = self.health.current.saturating_sub(damage);
        self.health.current == 0
    }

    pub fn lower_morale(&mut self, amount: u32) {
        self.morale = self.morale.saturating_sub(amount);
    }
}
