//! Unit kinds and their default properties
//!
//! Soldiers and aliens are distinct variants; the faction is derived from the kind.

use serde::{Deserialize, Serialize};

use crate::battle::constants::{ALIEN_VISION_RANGE, SOLDIER_VISION_RANGE};
use crate::battle::weapons::WeaponKind;

/// Side a unit fights for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    Player,
    Enemy,
}

impl Faction {
    pub fn opponent(&self) -> Faction {
        match self {
            Faction::Player => Faction::Enemy,
            Faction::Enemy => Faction::Player,
        }
    }
}

/// Alien species fielded by the opposition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlienSpecies {
    Sectoid,  // Frail, sharp reactions
    Floater,  // Balanced
    Snakeman, // Tough, slow
    Muton,    // Heavy hitter
}

impl AlienSpecies {
    pub const ALL: [AlienSpecies; 4] = [
        AlienSpecies::Sectoid,
        AlienSpecies::Floater,
        AlienSpecies::Snakeman,
        AlienSpecies::Muton,
    ];
}

/// Type of combatant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    Soldier,
    Alien(AlienSpecies),
}

/// Default stats for a unit kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitProfile {
    pub time_units: u32,
    pub health: u32,
    pub reactions: u32,
    pub firing_accuracy: u32,
    pub vision_range: u32,
    pub weapon: WeaponKind,
}

impl UnitKind {
    pub fn faction(&self) -> Faction {
        match self {
            UnitKind::Soldier => Faction::Player,
            UnitKind::Alien(_) => Faction::Enemy,
        }
    }

    /// Get default properties for this unit kind
    pub fn default_profile(&self) -> UnitProfile {
        match self {
            UnitKind::Soldier => UnitProfile {
                time_units: 55,
                health: 35,
                reactions: 45,
                firing_accuracy: 55,
                vision_range: SOLDIER_VISION_RANGE,
                weapon: WeaponKind::Rifle,
            },
            UnitKind::Alien(AlienSpecies::Sectoid) => UnitProfile {
                time_units: 54,
                health: 30,
                reactions: 63,
                firing_accuracy: 52,
                vision_range: ALIEN_VISION_RANGE,
                weapon: WeaponKind::PlasmaPistol,
            },
            UnitKind::Alien(AlienSpecies::Floater) => UnitProfile {
                time_units: 55,
                health: 40,
                reactions: 50,
                firing_accuracy: 50,
                vision_range: ALIEN_VISION_RANGE,
                weapon: WeaponKind::PlasmaRifle,
            },
            UnitKind::Alien(AlienSpecies::Snakeman) => UnitProfile {
                time_units: 40,
                health: 45,
                reactions: 40,
                firing_accuracy: 60,
                vision_range: ALIEN_VISION_RANGE,
                weapon: WeaponKind::PlasmaRifle,
            },
            UnitKind::Alien(AlienSpecies::Muton) => UnitProfile {
                time_units: 60,
                health: 125,
                reactions: 68,
                firing_accuracy: 60,
                vision_range: ALIEN_VISION_RANGE,
                weapon: WeaponKind::PlasmaRifle,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_faction_from_kind() {
        assert_eq!(UnitKind::Soldier.faction(), Faction::Player);
        assert_eq!(
            UnitKind::Alien(AlienSpecies::Muton).faction(),
            Faction::Enemy
        );
    }

    #[test]
    fn test_opponent() {
        assert_eq!(Faction::Player.opponent(), Faction::Enemy);
        assert_eq!(Faction::Enemy.opponent(), Faction::Player);
    }

    #[test]
    fn test_muton_is_toughest() {
        let muton = UnitKind::Alien(AlienSpecies::Muton).default_profile();
        for species in AlienSpecies::ALL {
            assert!(UnitKind::Alien(species).default_profile().health <= muton.health);
        }
    }

    #[test]
    fn test_every_kind_can_see() {
        assert!(UnitKind::Soldier.default_profile().vision_range > 0);
        for species in AlienSpecies::ALL {
            assert!(UnitKind::Alien(species).default_profile().vision_range > 0);
        }
    }
}
