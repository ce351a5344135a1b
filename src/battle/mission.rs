//! Mission setup and win/loss evaluation
//!
//! The turn controller never ends a mission on its own. Callers check
//! [`mission_status`] after each command or enemy turn.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::battle::ai::{load_personality, AlienCommander, TacticalAi};
use crate::battle::execution::{GameState, TurnController};
use crate::battle::generation::{deployment_tiles, generate_map, random_enemy_tiles};
use crate::battle::registry::UnitRegistry;
use crate::battle::unit_type::{AlienSpecies, Faction, UnitKind};
use crate::battle::units::{Unit, UnitId};
use crate::battle::weapons::Weapon;
use crate::core::config::MissionConfig;
use crate::core::error::{Result, TacticsError};

/// Offsets the placement RNG so it does not replay the map generator's stream
const PLACEMENT_SEED_OFFSET: u64 = 0x5eed;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissionStatus {
    InProgress,
    Victory,
    Defeat,
}

pub fn mission_status(state: &GameState) -> MissionStatus {
    if state.units.living_count(Faction::Player) == 0 {
        MissionStatus::Defeat
    } else if state.units.living_count(Faction::Enemy) == 0 {
        MissionStatus::Victory
    } else {
        MissionStatus::InProgress
    }
}

/// A configured mission ready to play
pub struct Mission {
    pub config: MissionConfig,
    pub controller: TurnController,
}

impl Mission {
    /// Generate the map, deploy the squad and place the opposition
    pub fn from_config(config: &MissionConfig) -> Result<Self> {
        config.validate()?;
        let seed = config.map.seed;
        let mut map = generate_map(config.map.width, config.map.height, seed);
        let mut units = UnitRegistry::new();

        let slots = deployment_tiles(&map, Faction::Player);
        if slots.len() < config.squad.len() {
            return Err(TacticsError::Config(format!(
                "only {} deployment tiles for {} soldiers",
                slots.len(),
                config.squad.len()
            )));
        }
        for (soldier, position) in config.squad.iter().zip(slots) {
            let mut unit = Unit::new(UnitId(0), UnitKind::Soldier, position);
            unit.name = soldier.name.clone();
            if let Some(kind) = soldier.weapon {
                unit.weapon = Weapon::new(kind);
            }
            units.insert(&mut map, unit)?;
        }

        let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(PLACEMENT_SEED_OFFSET));
        let count = config.opposition.count as usize;
        let tiles = random_enemy_tiles(&map, count, &mut rng);
        if tiles.len() < count {
            return Err(TacticsError::Config(format!(
                "only {} free tiles for {} aliens",
                tiles.len(),
                count
            )));
        }
        for (i, position) in tiles.into_iter().enumerate() {
            let species = match config.opposition.species.as_slice() {
                [] => AlienSpecies::ALL[rng.gen_range(0..AlienSpecies::ALL.len())],
                list => list[i % list.len()],
            };
            let mut unit = Unit::new(UnitId(0), UnitKind::Alien(species), position);
            unit.name = format!("{:?}", species);
            units.insert(&mut map, unit)?;
        }

        let ai: Box<dyn TacticalAi> = match &config.ai_personality {
            Some(name) => Box::new(AlienCommander::new(load_personality(name)?)),
            None => Box::new(AlienCommander::default()),
        };

        tracing::info!(
            "Mission ready: {}x{} map, {} soldiers vs {} aliens (seed {})",
            config.map.width,
            config.map.height,
            config.squad.len(),
            count,
            seed
        );
        Ok(Self {
            config: config.clone(),
            controller: TurnController::with_ai(GameState::new(map, units, seed), ai),
        })
    }

    pub fn status(&self) -> MissionStatus {
        mission_status(self.controller.state())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::grid::TileCoord;
    use crate::battle::weapons::WeaponKind;
    use crate::core::config::SoldierConfig;

    #[test]
    fn test_default_mission_deploys_both_sides() {
        let mission = Mission::from_config(&MissionConfig::default()).unwrap();
        let state = mission.controller.state();

        assert_eq!(state.units.living_count(Faction::Player), 4);
        assert_eq!(state.units.living_count(Faction::Enemy), 6);
        assert!(state.units.living(Faction::Player).all(|u| u.position.x < 3));
        assert!(state.units.living(Faction::Enemy).all(|u| u.position.x >= 15));
        assert!(state.units.occupancy_consistent(&state.map));
        assert_eq!(mission.status(), MissionStatus::InProgress);
    }

    #[test]
    fn test_same_seed_same_deployment() {
        let positions = |config: &MissionConfig| -> Vec<TileCoord> {
            let mission = Mission::from_config(config).unwrap();
            mission.controller.state().units.all().map(|u| u.position).collect()
        };
        let config = MissionConfig::default();
        assert_eq!(positions(&config), positions(&config));
    }

    #[test]
    fn test_squad_names_and_weapons() {
        let mut config = MissionConfig::default();
        config.squad = vec![SoldierConfig {
            name: "Okafor".to_string(),
            weapon: Some(WeaponKind::HeavyCannon),
        }];
        let mission = Mission::from_config(&config).unwrap();
        let soldier = mission.controller.state().units.get(UnitId(0)).unwrap();

        assert_eq!(soldier.name, "Okafor");
        assert_eq!(soldier.weapon.kind, WeaponKind::HeavyCannon);
    }

    #[test]
    fn test_species_cycle() {
        let mut config = MissionConfig::default();
        config.opposition.species = vec![AlienSpecies::Muton];
        let mission = Mission::from_config(&config).unwrap();

        assert!(mission
            .controller
            .state()
            .units
            .living(Faction::Enemy)
            .all(|u| u.kind == UnitKind::Alien(AlienSpecies::Muton)));
    }

    #[test]
    fn test_status_tracks_casualties() {
        let mut mission = Mission::from_config(&MissionConfig::default()).unwrap();
        let state = mission.controller.state_mut();

        for id in state.units.living_ids(Faction::Enemy) {
            state.units.remove_from_play(&mut state.map, id).unwrap();
        }
        assert_eq!(mission_status(state), MissionStatus::Victory);

        for id in state.units.living_ids(Faction::Player) {
            state.units.remove_from_play(&mut state.map, id).unwrap();
        }
        assert_eq!(mission_status(state), MissionStatus::Defeat);
    }

    #[test]
    fn test_unknown_personality_fails() {
        let mut config = MissionConfig::default();
        config.ai_personality = Some("no_such_personality".to_string());
        assert!(Mission::from_config(&config).is_err());
    }
}
