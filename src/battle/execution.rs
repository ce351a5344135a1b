//! Turn controller: the only entry point that mutates a mission
//!
//! Every command runs the same pipeline: validate against the active faction,
//! mutate, recompute player visibility (emitting spotted transitions), then run
//! the reaction check with the TU the command spent. `end_turn` plays the whole
//! enemy turn synchronously and hands control back to the player.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::battle::ai::{AiIntent, AlienCommander, TacticalAi};
use crate::battle::battle_map::GridMap;
use crate::battle::constants::MAX_AI_ACTIONS_PER_UNIT;
use crate::battle::events::{BattleEventLog, BattleEventType};
use crate::battle::grid::TileCoord;
use crate::battle::movement::move_unit;
use crate::battle::orders::{cancel_overwatch, declare_overwatch, reload, set_stance};
use crate::battle::pathfinding::{find_path, PathResult};
use crate::battle::ranged::{fire_weapon, CombatOutcome};
use crate::battle::reaction::check_reactions;
use crate::battle::registry::UnitRegistry;
use crate::battle::unit_type::Faction;
use crate::battle::units::{Stance, UnitId};
use crate::battle::visibility::{update_spotted, VisibilityState};
use crate::battle::weapons::ShotMode;
use crate::core::error::{Result, TacticsError};

/// Whose turn it is. There is no terminal phase; win/loss is the caller's call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnPhase {
    PlayerTurn,
    EnemyTurn,
}

impl TurnPhase {
    pub fn active_faction(&self) -> Faction {
        match self {
            TurnPhase::PlayerTurn => Faction::Player,
            TurnPhase::EnemyTurn => Faction::Enemy,
        }
    }
}

/// Anything a unit can be told to do
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    Move(PathResult),
    Fire { target: UnitId, mode: ShotMode },
    SetStance(Stance),
    Reload,
    Overwatch,
    CancelOverwatch,
}

/// What a successful command did
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandOutcome {
    pub tu_spent: u32,
    /// Present for `Command::Fire`
    pub shot: Option<CombatOutcome>,
    pub events: BattleEventLog,
}

/// Result of `end_turn`: the complete enemy turn, in order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnResult {
    pub turn: u32,
    pub phase: TurnPhase,
    pub events: BattleEventLog,
}

/// Complete mission state
#[derive(Debug, Clone)]
pub struct GameState {
    pub map: GridMap,
    pub units: UnitRegistry,
    pub visibility: VisibilityState,
    pub phase: TurnPhase,
    pub turn: u32,
    pub rng: ChaCha8Rng,
    /// Events raised before any command ran (aliens in view at deployment)
    pending: BattleEventLog,
}

impl GameState {
    /// Start a mission on turn 1 with the player to move
    pub fn new(map: GridMap, units: UnitRegistry, seed: u64) -> Self {
        let mut state = Self {
            map,
            units,
            visibility: VisibilityState::new(),
            phase: TurnPhase::PlayerTurn,
            turn: 1,
            rng: ChaCha8Rng::seed_from_u64(seed),
            pending: BattleEventLog::new(),
        };
        state.units.replenish(Faction::Player);
        let mut opening = BattleEventLog::new();
        state.refresh_visibility(&mut opening);
        state.pending = opening;
        state
    }

    /// Hand over events not yet delivered to the caller
    ///
    /// Called implicitly by the next successful command or `end_turn`, so the
    /// mission-start spotting events always reach whoever drives the mission.
    pub fn take_pending_events(&mut self) -> BattleEventLog {
        std::mem::take(&mut self.pending)
    }

    pub fn active_faction(&self) -> Faction {
        self.phase.active_faction()
    }

    /// Recompute the player's view and enemy spotted flags
    pub fn refresh_visibility(&mut self, log: &mut BattleEventLog) {
        self.visibility.refresh(&self.map, &self.units);
        for id in update_spotted(&mut self.units, &self.visibility) {
            let Some(unit) = self.units.get(id) else {
                continue;
            };
            tracing::debug!("Unit {} spotted at {:?}", id, unit.position);
            log.push(
                BattleEventType::UnitSpotted {
                    unit: id,
                    at: unit.position,
                },
                format!("Enemy {} spotted at ({}, {})", id, unit.position.x, unit.position.y),
                self.turn,
            );
        }
    }

    /// Run one command for `unit_id` through the full action pipeline
    pub fn execute(&mut self, unit_id: UnitId, command: Command) -> Result<CommandOutcome> {
        let unit = self.units.require(unit_id)?;
        unit.ensure_alive()?;
        if unit.faction() != self.active_faction() {
            return Err(TacticsError::InvalidState(format!(
                "unit {} cannot act during {:?}",
                unit_id, self.phase
            )));
        }
        let tu_before = unit.time_units.current;

        let turn = self.turn;
        let mut log = BattleEventLog::new();
        let mut shot = None;
        match command {
            Command::Move(path) => {
                move_unit(&mut self.map, &mut self.units, unit_id, &path, &mut log, turn)?;
            }
            Command::Fire { target, mode } => {
                shot = Some(fire_weapon(
                    &mut self.map,
                    &mut self.units,
                    unit_id,
                    target,
                    mode,
                    &mut self.rng,
                    &mut log,
                    turn,
                )?);
            }
            Command::SetStance(stance) => {
                set_stance(&mut self.units, unit_id, stance, &mut log, turn)?;
            }
            Command::Reload => {
                reload(&mut self.units, unit_id, &mut log, turn)?;
            }
            Command::Overwatch => declare_overwatch(&mut self.units, unit_id, &mut log, turn)?,
            Command::CancelOverwatch => cancel_overwatch(&mut self.units, unit_id, &mut log, turn)?,
        }

        let tu_spent = tu_before.saturating_sub(self.units.require(unit_id)?.time_units.current);
        self.refresh_visibility(&mut log);

        if tu_spent > 0 {
            let fired = check_reactions(
                &mut self.map,
                &mut self.units,
                unit_id,
                tu_spent,
                &mut self.rng,
                &mut log,
                turn,
            )?;
            if !fired.is_empty() {
                self.refresh_visibility(&mut log);
            }
        }

        let mut events = self.take_pending_events();
        events.extend(log);
        Ok(CommandOutcome {
            tu_spent,
            shot,
            events,
        })
    }

    /// Reset TU for the faction whose turn begins and log the transition
    fn begin_phase(&mut self, phase: TurnPhase, log: &mut BattleEventLog) {
        self.phase = phase;
        self.units.replenish(phase.active_faction());
        tracing::info!("Turn {}: {:?}", self.turn, phase);
        log.push(
            BattleEventType::TurnStarted { phase },
            format!("Turn {} begins: {:?}", self.turn, phase),
            self.turn,
        );
    }
}

/// Owns the mission state and the enemy AI
pub struct TurnController {
    state: GameState,
    ai: Box<dyn TacticalAi>,
}

impl TurnController {
    pub fn new(state: GameState) -> Self {
        Self::with_ai(state, Box::new(AlienCommander::default()))
    }

    pub fn with_ai(state: GameState, ai: Box<dyn TacticalAi>) -> Self {
        Self { state, ai }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct access for mission scripting and tests
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn into_state(self) -> GameState {
        self.state
    }

    pub fn phase(&self) -> TurnPhase {
        self.state.phase
    }

    pub fn turn(&self) -> u32 {
        self.state.turn
    }

    /// Path for a unit to a free tile, without moving it
    pub fn plan_path(&self, unit_id: UnitId, goal: TileCoord) -> Result<PathResult> {
        let from = self.state.units.require(unit_id)?.position;
        find_path(&self.state.map, from, goal).ok_or(TacticsError::NoPathFound { from, to: goal })
    }

    pub fn execute(&mut self, unit_id: UnitId, command: Command) -> Result<CommandOutcome> {
        self.state.execute(unit_id, command)
    }

    pub fn move_unit(&mut self, unit_id: UnitId, path: PathResult) -> Result<CommandOutcome> {
        self.execute(unit_id, Command::Move(path))
    }

    /// Path to `goal` and walk there in one command
    pub fn move_to(&mut self, unit_id: UnitId, goal: TileCoord) -> Result<CommandOutcome> {
        let path = self.plan_path(unit_id, goal)?;
        self.move_unit(unit_id, path)
    }

    pub fn fire(
        &mut self,
        shooter: UnitId,
        target: UnitId,
        mode: ShotMode,
    ) -> Result<CommandOutcome> {
        self.execute(shooter, Command::Fire { target, mode })
    }

    pub fn set_stance(&mut self, unit_id: UnitId, stance: Stance) -> Result<CommandOutcome> {
        self.execute(unit_id, Command::SetStance(stance))
    }

    pub fn reload(&mut self, unit_id: UnitId) -> Result<CommandOutcome> {
        self.execute(unit_id, Command::Reload)
    }

    pub fn declare_overwatch(&mut self, unit_id: UnitId) -> Result<CommandOutcome> {
        self.execute(unit_id, Command::Overwatch)
    }

    pub fn cancel_overwatch(&mut self, unit_id: UnitId) -> Result<CommandOutcome> {
        self.execute(unit_id, Command::CancelOverwatch)
    }

    /// End the player's turn, play the enemy turn, and return to the player
    ///
    /// Player TU are only restored after every enemy has acted.
    pub fn end_turn(&mut self) -> TurnResult {
        let mut log = self.state.take_pending_events();

        self.state.begin_phase(TurnPhase::EnemyTurn, &mut log);
        for id in self.state.units.living_ids(Faction::Enemy) {
            self.run_enemy_unit(id, &mut log);
        }

        self.state.turn += 1;
        self.state.begin_phase(TurnPhase::PlayerTurn, &mut log);

        TurnResult {
            turn: self.state.turn,
            phase: self.state.phase,
            events: log,
        }
    }

    fn run_enemy_unit(&mut self, id: UnitId, log: &mut BattleEventLog) {
        for _ in 0..MAX_AI_ACTIONS_PER_UNIT {
            let alive = self.state.units.get(id).is_some_and(|u| u.alive);
            if !alive || self.state.units.living_count(Faction::Player) == 0 {
                return;
            }

            let command = match self.ai.plan(&self.state, id) {
                AiIntent::Act(command) => command,
                AiIntent::Done => return,
            };
            match self.state.execute(id, command) {
                Ok(outcome) => log.extend(outcome.events),
                Err(err) => {
                    tracing::debug!("Enemy {} action rejected: {}", id, err);
                    return;
                }
            }
        }
    }
}
