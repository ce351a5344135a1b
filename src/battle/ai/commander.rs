//! Alien commander - default enemy AI
//!
//! Each call plans one command for one alien. The turn controller keeps asking
//! until the alien is done, so "move, then re-check and fire" falls out of
//! calling `plan` again after the move lands.

use ordered_float::OrderedFloat;

use crate::battle::ai::decision_context::DecisionContext;
use crate::battle::ai::personality::{AlienPersonality, TargetPriority};
use crate::battle::ai::{AiIntent, TacticalAi};
use crate::battle::constants::RELOAD_TU;
use crate::battle::execution::{Command, GameState};
use crate::battle::pathfinding::{find_approach_path, PathResult};
use crate::battle::ranged::plan_shot;
use crate::battle::reaction::reaction_mode;
use crate::battle::units::{Unit, UnitId};
use crate::battle::weapons::ShotMode;

#[derive(Debug, Clone, Default)]
pub struct AlienCommander {
    personality: AlienPersonality,
}

impl AlienCommander {
    pub fn new(personality: AlienPersonality) -> Self {
        Self { personality }
    }

    pub fn personality(&self) -> &AlienPersonality {
        &self.personality
    }

    /// Best (target, mode) pair that passes every shot check right now
    fn choose_shot(&self, ctx: &DecisionContext) -> Option<(UnitId, ShotMode)> {
        let mut targets = ctx.visible_targets();
        if self.personality.targeting.priority == TargetPriority::Weakest {
            targets.sort_by_key(|u| (u.health.current, OrderedFloat(ctx.distance_to(u)), u.id));
        }

        targets.into_iter().find_map(|target| {
            self.personality
                .firing
                .mode_preference
                .iter()
                .copied()
                .find(|mode| {
                    plan_shot(&ctx.state.map, &ctx.state.units, ctx.unit.id, target.id, *mode)
                        .is_ok()
                })
                .map(|mode| (target.id, mode))
        })
    }

    /// TU held back so a snap shot stays affordable after moving
    fn reserve(&self, unit: &Unit) -> u32 {
        if !self.personality.firing.reserve_snap_tu {
            return 0;
        }
        reaction_mode(unit)
            .and_then(|mode| unit.weapon.profile(mode))
            .map(|profile| profile.tu_cost(unit.time_units.base))
            .unwrap_or(0)
    }

    /// Affordable partial path toward the nearest known soldier
    fn approach(&self, ctx: &DecisionContext) -> Option<PathResult> {
        let target = ctx.nearest_target()?;
        let full = find_approach_path(&ctx.state.map, ctx.unit.position, target.position)?;
        let budget = ctx.unit.time_units.current.saturating_sub(self.reserve(ctx.unit));
        let path = full.truncate_to_budget(&ctx.state.map, budget);
        (path.moves() > 0).then_some(path)
    }
}

impl TacticalAi for AlienCommander {
    fn plan(&mut self, state: &GameState, unit_id: UnitId) -> AiIntent {
        let ignores_fog = self.personality.difficulty.ignores_fog_of_war;
        let Some(ctx) = DecisionContext::new(state, unit_id, ignores_fog) else {
            return AiIntent::Done;
        };

        if ctx.unit.weapon.is_empty() {
            let can_reload =
                ctx.unit.weapon.spare_clips > 0 && ctx.unit.time_units.can_afford(RELOAD_TU);
            return if can_reload {
                AiIntent::Act(Command::Reload)
            } else {
                AiIntent::Done
            };
        }

        if let Some((target, mode)) = self.choose_shot(&ctx) {
            tracing::debug!("Alien {} fires {:?} at {}", unit_id, mode, target);
            return AiIntent::Act(Command::Fire { target, mode });
        }

        if let Some(path) = self.approach(&ctx) {
            tracing::debug!("Alien {} closes in, {} tiles", unit_id, path.moves());
            return AiIntent::Act(Command::Move(path));
        }

        AiIntent::Done
    }

    fn name(&self) -> &str {
        &self.personality.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::ai::personality::load_personality;
    use crate::battle::battle_map::GridMap;
    use crate::battle::grid::TileCoord;
    use crate::battle::registry::UnitRegistry;
    use crate::battle::unit_type::{AlienSpecies, UnitKind};

    fn state_with(alien_x: i32) -> GameState {
        let mut map = GridMap::new(60, 10);
        let mut units = UnitRegistry::new();
        units.spawn(&mut map, UnitKind::Soldier, TileCoord::new(2, 5)).unwrap();
        units
            .spawn(&mut map, UnitKind::Alien(AlienSpecies::Sectoid), TileCoord::new(alien_x, 5))
            .unwrap();
        GameState::new(map, units, 3)
    }

    #[test]
    fn test_fires_when_in_range() {
        let state = state_with(10);
        let mut ai = AlienCommander::default();

        match ai.plan(&state, UnitId(1)) {
            AiIntent::Act(Command::Fire { target, mode }) => {
                assert_eq!(target, UnitId(0));
                assert_eq!(mode, ShotMode::Aimed);
            }
            other => panic!("expected a shot, got {:?}", other),
        }
    }

    #[test]
    fn test_approaches_when_out_of_range() {
        // Seen (distance 17 <= 18) but out of plasma pistol range (15)
        let state = state_with(19);
        let mut ai = AlienCommander::default();

        match ai.plan(&state, UnitId(1)) {
            AiIntent::Act(Command::Move(path)) => {
                assert_eq!(path.start(), Some(TileCoord::new(19, 5)));
                assert!(path.moves() > 0);
                // Snap shot (16 TU) still affordable afterwards
                assert!(path.cost <= 54 - 16);
            }
            other => panic!("expected a move, got {:?}", other),
        }
    }

    #[test]
    fn test_holds_when_nothing_seen() {
        let state = state_with(50);
        let mut ai = AlienCommander::default();
        assert!(matches!(ai.plan(&state, UnitId(1)), AiIntent::Done));
    }

    #[test]
    fn test_reloads_empty_weapon() {
        let mut state = state_with(10);
        state.units.get_mut(UnitId(1)).unwrap().weapon.ammo.current = 0;
        let mut ai = AlienCommander::default();
        assert!(matches!(ai.plan(&state, UnitId(1)), AiIntent::Act(Command::Reload)));
    }

    #[test]
    fn test_falls_back_to_cheaper_mode() {
        let mut state = state_with(10);
        // Aimed costs 32 TU and auto 16; leave only enough for auto or snap
        state.units.get_mut(UnitId(1)).unwrap().time_units.current = 20;
        let mut ai = AlienCommander::default();

        assert!(matches!(
            ai.plan(&state, UnitId(1)),
            AiIntent::Act(Command::Fire {
                mode: ShotMode::Auto,
                ..
            })
        ));
    }

    #[test]
    fn test_aggressive_spends_all_tu_on_approach() {
        let state = state_with(19);
        let mut ai = AlienCommander::new(load_personality("aggressive").unwrap());
        assert_eq!(ai.name(), "aggressive");

        match ai.plan(&state, UnitId(1)) {
            AiIntent::Act(Command::Move(path)) => assert!(path.cost > 54 - 16),
            other => panic!("expected a move, got {:?}", other),
        }
    }
}
