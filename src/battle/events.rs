//! Battle events handed to the presentation layer
//!
//! Every command appends to a [`BattleEventLog`] in the order things happened, so
//! a client can replay them one by one (animate a move, then the reaction shot).

use serde::{Deserialize, Serialize};

use crate::battle::execution::TurnPhase;
use crate::battle::grid::TileCoord;
use crate::battle::ranged::CombatOutcome;
use crate::battle::units::{Rank, Stance, UnitId};
use crate::battle::weapons::ShotMode;

/// Log entry for battle events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleEvent {
    pub turn: u32,
    pub event_type: BattleEventType,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BattleEventType {
    TurnStarted {
        phase: TurnPhase,
    },
    UnitMoved {
        unit: UnitId,
        from: TileCoord,
        to: TileCoord,
        tu_spent: u32,
    },
    ShotFired {
        shooter: UnitId,
        target: UnitId,
        mode: ShotMode,
        outcome: CombatOutcome,
    },
    ReactionFire {
        reactor: UnitId,
        target: UnitId,
    },
    UnitKilled {
        unit: UnitId,
        killer: Option<UnitId>,
    },
    UnitSpotted {
        unit: UnitId,
        at: TileCoord,
    },
    StanceChanged {
        unit: UnitId,
        stance: Stance,
    },
    WeaponReloaded {
        unit: UnitId,
    },
    OverwatchDeclared {
        unit: UnitId,
    },
    OverwatchCleared {
        unit: UnitId,
    },
    MoraleLowered {
        unit: UnitId,
        morale: u32,
    },
    Promoted {
        unit: UnitId,
        rank: Rank,
    },
}

/// Ordered events from one command or one enemy turn
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BattleEventLog {
    pub events: Vec<BattleEvent>,
}

impl BattleEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event_type: BattleEventType, description: String, turn: u32) {
        self.events.push(BattleEvent {
            turn,
            event_type,
            description,
        });
    }

    pub fn extend(&mut self, other: BattleEventLog) {
        self.events.extend(other.events);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BattleEvent> {
        self.events.iter()
    }

    /// Count events matching a predicate on the event type
    pub fn count_where(&self, predicate: impl Fn(&BattleEventType) -> bool) -> usize {
        self.events.iter().filter(|e| predicate(&e.event_type)).count()
    }
}
