//! Mission configuration loaded from TOML
//!
//! The only external input the engine takes: map size, RNG seed, the starting
//! squad and the size of the opposition. Every section has defaults, so a file
//! only needs to list what it changes.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::battle::constants::{
    DEFAULT_MAP_HEIGHT, DEFAULT_MAP_WIDTH, DEPLOYMENT_DEPTH, MAX_MAP_DIMENSION,
};
use crate::battle::unit_type::AlienSpecies;
use crate::battle::weapons::WeaponKind;
use crate::core::error::{Result, TacticsError};

/// Map dimensions and generation seed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Tiles along x
    ///
    /// Must leave room for both deployment strips plus at least two columns of
    /// open ground between them.
    pub width: u32,

    /// Tiles along y
    pub height: u32,

    /// Seeds both map generation and the combat RNG
    ///
    /// Same seed and same commands give the same mission, event for event.
    pub seed: u64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_MAP_WIDTH,
            height: DEFAULT_MAP_HEIGHT,
            seed: 1,
        }
    }
}

/// One member of the starting squad
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoldierConfig {
    pub name: String,

    /// Overrides the standard-issue rifle
    #[serde(default)]
    pub weapon: Option<WeaponKind>,
}

impl SoldierConfig {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            weapon: None,
        }
    }
}

/// Procedurally placed alien force
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OppositionConfig {
    /// Number of aliens
    pub count: u32,

    /// Species to draw from, cycled in order
    ///
    /// Empty means every species is picked at random from the mission RNG.
    pub species: Vec<AlienSpecies>,
}

impl Default for OppositionConfig {
    fn default() -> Self {
        Self {
            count: 6,
            species: Vec::new(),
        }
    }
}

/// Complete mission setup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionConfig {
    #[serde(default)]
    pub map: MapConfig,

    #[serde(default = "default_squad")]
    pub squad: Vec<SoldierConfig>,

    #[serde(default)]
    pub opposition: OppositionConfig,

    /// Name of a file in `data/ai_personalities/`; built-in default when unset
    #[serde(default)]
    pub ai_personality: Option<String>,
}

fn default_squad() -> Vec<SoldierConfig> {
    ["Alvarez", "Becker", "Chen", "Dubois"]
        .into_iter()
        .map(SoldierConfig::named)
        .collect()
}

impl Default for MissionConfig {
    fn default() -> Self {
        Self {
            map: MapConfig::default(),
            squad: default_squad(),
            opposition: OppositionConfig::default(),
            ai_personality: None,
        }
    }
}

impl MissionConfig {
    /// Reject setups the mission builder could not honour
    pub fn validate(&self) -> Result<()> {
        let min_width = DEPLOYMENT_DEPTH * 2 + 2;
        if self.map.width < min_width || self.map.height == 0 {
            return Err(TacticsError::Config(format!(
                "map must be at least {}x1, got {}x{}",
                min_width, self.map.width, self.map.height
            )));
        }
        if self.map.width > MAX_MAP_DIMENSION || self.map.height > MAX_MAP_DIMENSION {
            return Err(TacticsError::Config(format!(
                "map may be at most {0}x{0}, got {1}x{2}",
                MAX_MAP_DIMENSION, self.map.width, self.map.height
            )));
        }
        if self.squad.is_empty() {
            return Err(TacticsError::Config("squad is empty".to_string()));
        }

        let strip = (DEPLOYMENT_DEPTH * self.map.height) as usize;
        if self.squad.len() > strip {
            return Err(TacticsError::Config(format!(
                "{} soldiers do not fit a deployment strip of {} tiles",
                self.squad.len(),
                strip
            )));
        }
        if self.opposition.count == 0 {
            return Err(TacticsError::Config("opposition count must be at least 1".to_string()));
        }
        if self.opposition.count as usize > strip {
            return Err(TacticsError::Config(format!(
                "{} aliens do not fit a deployment strip of {} tiles",
                self.opposition.count, strip
            )));
        }
        Ok(())
    }
}

/// Read, parse and validate a mission file
pub fn load_mission_config(path: &Path) -> Result<MissionConfig> {
    let contents = fs::read_to_string(path)?;
    let config: MissionConfig = toml::from_str(&contents)?;
    config.validate()?;
    Ok(config)
}
