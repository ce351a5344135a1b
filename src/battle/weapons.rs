//! Firearms and their shot-mode tables
//!
//! Each weapon carries a table indexed by [`ShotMode`]; a `None` entry means the
//! weapon cannot fire in that mode.

use serde::{Deserialize, Serialize};

use crate::battle::units::Pool;

/// How a shot is taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShotMode {
    Snap,
    Aimed,
    Auto,
}

impl ShotMode {
    pub const ALL: [ShotMode; 3] = [ShotMode::Snap, ShotMode::Aimed, ShotMode::Auto];

    fn index(self) -> usize {
        match self {
            ShotMode::Snap => 0,
            ShotMode::Aimed => 1,
            ShotMode::Auto => 2,
        }
    }
}

/// Per-mode firing parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShotProfile {
    /// Accuracy modifier in percent of the shooter's firing accuracy
    pub accuracy: u32,
    /// TU cost in percent of the shooter's base TU
    pub tu_percent: u32,
    /// Rounds fired per trigger pull
    pub rounds: u32,
}

impl ShotProfile {
    const fn single(accuracy: u32, tu_percent: u32) -> Self {
        Self {
            accuracy,
            tu_percent,
            rounds: 1,
        }
    }

    const fn burst(accuracy: u32, tu_percent: u32, rounds: u32) -> Self {
        Self {
            accuracy,
            tu_percent,
            rounds,
        }
    }

    /// TU cost for a shooter with `base_tu`
    pub fn tu_cost(&self, base_tu: u32) -> u32 {
        base_tu * self.tu_percent / 100
    }
}

/// Weapon catalogue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    Pistol,
    Rifle,
    HeavyCannon,
    AutoCannon,
    PlasmaPistol,
    PlasmaRifle,
}

/// A carried weapon with its magazine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weapon {
    pub kind: WeaponKind,
    pub base_damage: u32,
    /// Maximum engagement distance in tiles
    pub range: u32,
    pub ammo: Pool,
    pub spare_clips: u32,
    modes: [Option<ShotProfile>; 3],
}

impl Weapon {
    pub fn new(kind: WeaponKind) -> Self {
        use ShotProfile as P;
        let (base_damage, range, capacity, spare_clips, modes) = match kind {
            WeaponKind::Pistol => (
                26,
                15,
                12,
                2,
                [Some(P::single(60, 18)), Some(P::single(78, 30)), None],
            ),
            WeaponKind::Rifle => (
                30,
                25,
                20,
                2,
                [Some(P::single(60, 25)), Some(P::single(110, 80)), Some(P::burst(35, 35, 3))],
            ),
            WeaponKind::HeavyCannon => (
                56,
                25,
                6,
                1,
                [Some(P::single(60, 33)), Some(P::single(90, 80)), None],
            ),
            WeaponKind::AutoCannon => (
                42,
                25,
                14,
                1,
                [Some(P::single(56, 33)), Some(P::single(82, 80)), Some(P::burst(32, 40, 3))],
            ),
            WeaponKind::PlasmaPistol => (
                52,
                15,
                26,
                1,
                [Some(P::single(65, 30)), Some(P::single(85, 60)), Some(P::burst(50, 30, 3))],
            ),
            WeaponKind::PlasmaRifle => (
                80,
                25,
                28,
                1,
                [Some(P::single(86, 30)), Some(P::single(100, 60)), Some(P::burst(55, 36, 3))],
            ),
        };

        Self {
            kind,
            base_damage,
            range,
            ammo: Pool::full(capacity),
            spare_clips,
            modes,
        }
    }

    /// Profile for a shot mode, `None` if unsupported
    pub fn profile(&self, mode: ShotMode) -> Option<ShotProfile> {
        self.modes[mode.index()]
    }

    pub fn supports(&self, mode: ShotMode) -> bool {
        self.profile(mode).is_some()
    }

    /// Replace one entry of the shot table
    pub fn with_profile(mut self, mode: ShotMode, profile: Option<ShotProfile>) -> Self {
        self.modes[mode.index()] = profile;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.ammo.current == 0
    }

    /// Take one round from the magazine. Returns false when empty.
    pub fn consume_round(&mut self) -> bool {
        if self.ammo.current == 0 {
            return false;
        }
        self.ammo.current -= 1;
        true
    }

    /// Swap in a spare clip. Returns false when none are left.
    pub fn load_clip(&mut self) -> bool {
        if self.spare_clips == 0 {
            return false;
        }
        self.spare_clips -= 1;
        self.ammo.refill();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rifle_supports_all_modes() {
        let rifle = Weapon::new(WeaponKind::Rifle);
        assert!(ShotMode::ALL.iter().all(|m| rifle.supports(*m)));
        assert_eq!(rifle.profile(ShotMode::Auto).map(|p| p.rounds), Some(3));
    }

    #[test]
    fn test_pistol_has_no_auto() {
        let pistol = Weapon::new(WeaponKind::Pistol);
        assert!(!pistol.supports(ShotMode::Auto));
        assert!(pistol.supports(ShotMode::Snap));
    }

    #[test]
    fn test_tu_cost_rounds_down() {
        let profile = ShotProfile::single(60, 25);
        assert_eq!(profile.tu_cost(50), 12);
        assert_eq!(profile.tu_cost(54), 13);
    }

    #[test]
    fn test_consume_round_stops_at_zero() {
        let mut weapon = Weapon::new(WeaponKind::HeavyCannon);
        for _ in 0..6 {
            assert!(weapon.consume_round());
        }
        assert!(weapon.is_empty());
        assert!(!weapon.consume_round());
        assert_eq!(weapon.ammo.current, 0);
    }

    #[test]
    fn test_load_clip() {
        let mut weapon = Weapon::new(WeaponKind::HeavyCannon);
        weapon.ammo.current = 0;
        assert!(weapon.load_clip());
        assert_eq!(weapon.ammo.current, weapon.ammo.base);
        assert_eq!(weapon.spare_clips, 0);
        assert!(!weapon.load_clip());
    }

    #[test]
    fn test_with_profile_removes_mode() {
        let rifle = Weapon::new(WeaponKind::Rifle).with_profile(ShotMode::Aimed, None);
        assert!(!rifle.supports(ShotMode::Aimed));
    }
}
