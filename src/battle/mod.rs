//! Battle system - turn-based squad tactics on a tile grid
//!
//! Soldiers and aliens spend time units (TU) to move, shoot, kneel and reload.
//!
//! Key mechanics:
//! - Weighted A* over 8-connected tiles, charged per destination tile
//! - Fog of war: visible tiles are recomputed, explored tiles are remembered
//! - Per-round hit and damage rolls from an injected, seeded RNG
//! - Reaction fire interrupts a unit right after it spends TU

pub mod ai;
pub mod battle_map;
pub mod constants;
pub mod events;
pub mod execution;
pub mod generation;
pub mod grid;
pub mod mission;
pub mod morale;
pub mod movement;
pub mod orders;
pub mod pathfinding;
pub mod ranged;
pub mod reaction;
pub mod registry;
pub mod terrain;
pub mod unit_type;
pub mod units;
pub mod visibility;
pub mod weapons;

// Re-exports for convenient access
pub use ai::{AiIntent, AlienCommander, AlienPersonality, TacticalAi};
pub use battle_map::{GridMap, Tile};
pub use constants::*;
pub use events::{BattleEvent, BattleEventLog, BattleEventType};
pub use execution::{Command, CommandOutcome, GameState, TurnController, TurnPhase, TurnResult};
pub use generation::{deployment_tiles, generate_map};
pub use grid::TileCoord;
pub use mission::{mission_status, Mission, MissionStatus};
pub use morale::{credit_kill, resolve_casualty};
pub use movement::{move_unit, validate_path, MoveOutcome};
pub use orders::{cancel_overwatch, declare_overwatch, reload, set_stance};
pub use pathfinding::{find_approach_path, find_path, path_cost, PathResult};
pub use ranged::{fire_weapon, hit_chance, plan_shot, CombatOutcome};
pub use reaction::{check_reactions, reaction_triggers};
pub use registry::UnitRegistry;
pub use terrain::{CoverClass, TerrainKind};
pub use unit_type::{AlienSpecies, Faction, UnitKind};
pub use units::{Pool, Rank, Stance, Unit, UnitId};
pub use visibility::{compute_visibility, VisibilityState};
pub use weapons::{ShotMode, Weapon, WeaponKind};
