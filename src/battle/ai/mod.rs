//! Enemy AI for the alien turn
//!
//! Architecture: Trait + Data hybrid
//! - TacticalAi trait defines the interface for swappable implementations
//! - AlienPersonality holds TOML-loaded preferences
//! - DecisionContext provides a fog-of-war-filtered view of the mission

mod commander;
mod decision_context;
mod personality;

pub use commander::AlienCommander;
pub use decision_context::DecisionContext;
pub use personality::{
    load_personality, load_personality_from, AlienPersonality, DifficultyConfig, FiringConfig,
    TargetPriority, TargetingConfig,
};

use crate::battle::execution::{Command, GameState};
use crate::battle::units::UnitId;

/// What an AI wants one unit to do next
#[derive(Debug, Clone, PartialEq)]
pub enum AiIntent {
    Act(Command),
    /// Nothing more this turn
    Done,
}

/// Trait for enemy AI implementations
pub trait TacticalAi {
    /// Plan the next command for `unit`; called repeatedly until `Done`
    fn plan(&mut self, state: &GameState, unit: UnitId) -> AiIntent;

    fn name(&self) -> &str;
}
