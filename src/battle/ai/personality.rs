//! Alien personality configuration loaded from TOML
//!
//! A personality decides which targets an alien prefers, which fire modes it
//! tries first, and whether it keeps TU back for a snap shot when closing in.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::battle::weapons::ShotMode;
use crate::core::error::{Result, TacticsError};

/// Which visible target to engage first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetPriority {
    #[default]
    Nearest,
    Weakest,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FiringConfig {
    /// Modes tried in order; the first affordable one is used
    pub mode_preference: Vec<ShotMode>,
    /// Stop an approach early enough to still afford a snap shot
    pub reserve_snap_tu: bool,
}

impl Default for FiringConfig {
    fn default() -> Self {
        Self {
            mode_preference: vec![ShotMode::Aimed, ShotMode::Auto, ShotMode::Snap],
            reserve_snap_tu: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetingConfig {
    pub priority: TargetPriority,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DifficultyConfig {
    /// Know where every soldier is, seen or not
    pub ignores_fog_of_war: bool,
}

/// Complete alien personality
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlienPersonality {
    /// Set from the file name when loaded
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub firing: FiringConfig,
    #[serde(default)]
    pub targeting: TargetingConfig,
    #[serde(default)]
    pub difficulty: DifficultyConfig,
}

impl Default for AlienPersonality {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            firing: FiringConfig::default(),
            targeting: TargetingConfig::default(),
            difficulty: DifficultyConfig::default(),
        }
    }
}

/// Load `data/ai_personalities/{name}.toml`
pub fn load_personality(name: &str) -> Result<AlienPersonality> {
    let mut personality = load_personality_from(&personality_path(name))?;
    personality.name = name.to_string();
    Ok(personality)
}

pub fn load_personality_from(path: &Path) -> Result<AlienPersonality> {
    let contents = fs::read_to_string(path)?;
    let personality: AlienPersonality = toml::from_str(&contents)?;
    if personality.firing.mode_preference.is_empty() {
        return Err(TacticsError::Config(format!(
            "personality {:?} lists no fire modes",
            path
        )));
    }
    Ok(personality)
}

fn personality_path(name: &str) -> PathBuf {
    PathBuf::from("data/ai_personalities").join(format!("{}.toml", name))
}
