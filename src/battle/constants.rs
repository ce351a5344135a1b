//! Battle system constants - all tunable values in one place
//!
//! TU values are absolute; percentages are integer percent.

// Map scale
pub const DEFAULT_MAP_WIDTH: u32 = 30;
pub const DEFAULT_MAP_HEIGHT: u32 = 30;
/// Largest width or height a mission config may ask for
pub const MAX_MAP_DIMENSION: u32 = 1_000;
/// Columns on each map edge kept clear for deployment
pub const DEPLOYMENT_DEPTH: u32 = 3;

// Pathfinding
/// Weight on the Euclidean heuristic (> 1, so the search is not admissible)
pub const HEURISTIC_WEIGHT: f32 = 4.0;
/// Diagonal steps cost this multiple of the destination tile's cost
pub const DIAGONAL_COST_MULTIPLIER: f32 = 1.4;

// Vision (tiles)
pub const SOLDIER_VISION_RANGE: u32 = 20;
pub const ALIEN_VISION_RANGE: u32 = 18;

// Action costs (TU)
pub const KNEEL_TU: u32 = 4;
pub const STAND_TU: u32 = 8;
pub const RELOAD_TU: u32 = 15;

// Hit resolution (percent)
pub const MIN_HIT_CHANCE: i32 = 5;
pub const MAX_HIT_CHANCE: i32 = 95;
pub const DISTANCE_PENALTY_PER_TILE: f32 = 2.0;
/// Kneeling multiplies hit chance by this percentage
pub const KNEELING_ACCURACY_PERCENT: i32 = 115;
pub const CRITICAL_CHANCE: f64 = 0.15;
pub const CRITICAL_MULTIPLIER: u32 = 2;
pub const DAMAGE_SPREAD_MIN: f64 = 0.5;
pub const DAMAGE_SPREAD_RANGE: f64 = 1.5;

// Reactions
/// A unit needs at least this much TU left to react
pub const REACTION_MIN_TU: u32 = 15;
pub const OVERWATCH_MULTIPLIER: u32 = 2;

// Enemy AI
/// Upper bound on commands one alien issues per turn
pub const MAX_AI_ACTIONS_PER_UNIT: usize = 8;

// Morale
pub const MAX_MORALE: u32 = 100;
pub const MORALE_LOSS_ALLY_DEATH: u32 = 10;

// Promotions: kills needed for Squaddie, Sergeant, Captain, Colonel
pub const RANK_KILL_THRESHOLDS: [u32; 4] = [1, 3, 6, 10];
pub const PROMOTION_REACTION_BONUS: u32 = 3;
pub const PROMOTION_ACCURACY_BONUS: u32 = 4;
