//! Property-based tests for combat math, pathfinding and fog of war

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use squad_tactics::battle::ranged::roll_damage;
use squad_tactics::battle::*;

fn uniform_map(width: u32, height: u32) -> GridMap {
    GridMap::filled(width, height, Tile::open().with_movement_cost(1))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_hit_chance_always_clamped(
        accuracy in 0u32..500,
        mode_accuracy in 0u32..300,
        distance in 0.0f32..500.0,
        kneeling in any::<bool>(),
    ) {
        let chance = hit_chance(accuracy, mode_accuracy, distance, kneeling);
        prop_assert!((5..=95).contains(&chance), "chance {} out of range", chance);
    }

    #[test]
    fn prop_kneeling_never_hurts(
        accuracy in 0u32..200,
        mode_accuracy in 0u32..150,
        distance in 0.0f32..40.0,
    ) {
        prop_assert!(
            hit_chance(accuracy, mode_accuracy, distance, true)
                >= hit_chance(accuracy, mode_accuracy, distance, false)
        );
    }

    #[test]
    fn prop_damage_within_spread(base in 0u32..200, seed in any::<u64>()) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let (damage, critical) = roll_damage(base, &mut rng);
        let multiplier = if critical { CRITICAL_MULTIPLIER } else { 1 };
        prop_assert!(damage >= base / 2 * multiplier);
        prop_assert!(damage <= base * 2 * multiplier);
    }

    #[test]
    fn prop_uniform_grid_path_is_straightest(
        sx in 0i32..20, sy in 0i32..20,
        gx in 0i32..20, gy in 0i32..20,
    ) {
        let map = uniform_map(20, 20);
        let start = TileCoord::new(sx, sy);
        let goal = TileCoord::new(gx, gy);

        let path = find_path(&map, start, goal);
        prop_assert!(path.is_some());
        let path = path.unwrap();

        prop_assert!(!path.steps.is_empty());
        prop_assert_eq!(path.start(), Some(start));
        prop_assert_eq!(path.goal(), Some(goal));
        prop_assert_eq!(path.moves() as u32, start.chebyshev(&goal));
        prop_assert!(path.steps.windows(2).all(|w| w[0].is_adjacent(&w[1])));
        prop_assert_eq!(path_cost(&map, &path.steps), Some(path.cost));
    }

    #[test]
    fn prop_pathfinding_is_deterministic(seed in 0u64..500, gy in 0i32..20) {
        let map = generate_map(30, 20, seed);
        let start = TileCoord::new(0, 10);
        let goal = TileCoord::new(29, gy);

        let first = find_path(&map, start, goal);
        let second = find_path(&map, start, goal);
        prop_assert_eq!(&first, &second);
        if let Some(path) = first {
            prop_assert_eq!(path_cost(&map, &path.steps), Some(path.cost));
            prop_assert!(path.steps.iter().all(|c| map.is_walkable(*c)));
        }
    }

    #[test]
    fn prop_explored_never_shrinks(
        moves in prop::collection::vec((0i32..30, 0i32..30), 1..8),
        seed in 0u64..50,
    ) {
        let mut map = generate_map(30, 30, seed);
        let mut units = UnitRegistry::new();
        let soldier = units.spawn(&mut map, UnitKind::Soldier, TileCoord::new(0, 15)).unwrap();
        let mut visibility = compute_visibility(&map, &units);

        for (x, y) in moves {
            let target = TileCoord::new(x, y);
            if !map.is_free(target) {
                continue;
            }
            units.relocate(&mut map, soldier, target).unwrap();

            let before = visibility.explored.clone();
            visibility.refresh(&map, &units);

            prop_assert!(before.iter().all(|c| visibility.is_explored(*c)));
            prop_assert!(visibility.visible.iter().all(|c| visibility.is_explored(*c)));
            prop_assert!(visibility.is_visible(target));
        }
    }
}
