use thiserror::Error;

use crate::battle::grid::TileCoord;
use crate::battle::units::UnitId;

/// Coarse classification the presentation layer branches on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Out of weapon range, no line of sight, or not a hostile target
    InvalidTarget,
    /// Not enough TU, ammo or spare clips
    InsufficientResource,
    /// Dead unit, wrong turn, bad path or bad setup
    InvalidState,
    /// Pathfinder could not reach the goal
    NoPathFound,
}

#[derive(Error, Debug)]
pub enum TacticsError {
    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    #[error("Insufficient {resource}: needed {needed}, available {available}")]
    InsufficientResource {
        resource: &'static str,
        needed: u32,
        available: u32,
    },

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("No path from {from:?} to {to:?}")]
    NoPathFound { from: TileCoord, to: TileCoord },

    #[error("Unit not found: {0}")]
    UnitNotFound(UnitId),

    #[error("Tile blocked: {0:?}")]
    TileBlocked(TileCoord),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl TacticsError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TacticsError::InvalidTarget(_) => ErrorKind::InvalidTarget,
            TacticsError::InsufficientResource { .. } => ErrorKind::InsufficientResource,
            TacticsError::NoPathFound { .. } => ErrorKind::NoPathFound,
            TacticsError::InvalidState(_)
            | TacticsError::UnitNotFound(_)
            | TacticsError::TileBlocked(_)
            | TacticsError::Config(_)
            | TacticsError::IoError(_)
            | TacticsError::TomlError(_) => ErrorKind::InvalidState,
        }
    }

    pub(crate) fn insufficient(resource: &'static str, needed: u32, available: u32) -> Self {
        TacticsError::InsufficientResource {
            resource,
            needed,
            available,
        }
    }
}

pub type Result<T> = std::result::Result<T, TacticsError>;
