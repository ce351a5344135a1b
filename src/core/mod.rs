pub mod config;
pub mod error;

pub use config::{load_mission_config, MissionConfig};
pub use error::{ErrorKind, Result, TacticsError};
