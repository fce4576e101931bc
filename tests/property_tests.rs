//! Property-based tests for the public layout and catalog API.
//!
//! Tests validate:
//! 1. The solver seats every tile and never beats its own candidates
//! 2. Ties between equally large candidates go to the smaller grid
//! 3. Catalog lookups return the smallest covering entry
//! 4. Scanning forward then back returns to the starting tile

use camgrid::layout::{candidates, solve};
use camgrid::model::{ContainerSize, ResolutionCatalog, TileSet};
use camgrid::state::GridController;
use proptest::prelude::*;

const EPSILON: f64 = 1e-6;

fn arb_container() -> impl Strategy<Value = ContainerSize> {
    (1.0f64..5000.0, 1.0f64..5000.0).prop_map(|(w, h)| ContainerSize::new(w, h))
}

fn arb_aspect() -> impl Strategy<Value = (f64, f64)> {
    prop_oneof![
        Just((4.0, 3.0)),
        Just((16.0, 9.0)),
        Just((1.0, 1.0)),
        (1.0f64..32.0, 1.0f64..32.0),
    ]
}

// ===== Property 1: Feasibility and optimality =====

proptest! {
    #[test]
    fn solution_seats_every_tile(
        container in arb_container(),
        num_tiles in 1usize..=64,
        (aw, ah) in arb_aspect(),
    ) {
        let solution = solve(container, num_tiles, aw, ah).expect("valid inputs solve");
        let shape = solution.shape;

        prop_assert!(
            shape.cell_count() as usize >= num_tiles,
            "{}x{} cannot seat {} tiles",
            shape.columns,
            shape.rows,
            num_tiles
        );
    }

    #[test]
    fn cells_fit_inside_container(
        container in arb_container(),
        num_tiles in 1usize..=64,
        (aw, ah) in arb_aspect(),
    ) {
        let shape = solve(container, num_tiles, aw, ah).expect("valid inputs solve").shape;

        prop_assert!(f64::from(shape.columns) * shape.cell_width_px <= container.width * (1.0 + EPSILON));
        prop_assert!(f64::from(shape.rows) * shape.cell_height_px <= container.height * (1.0 + EPSILON));
        prop_assert!(((shape.cell_width_px / shape.cell_height_px) - aw / ah).abs() < EPSILON * (aw / ah).max(1.0));
    }

    #[test]
    fn chosen_scale_is_best_feasible_candidate(
        container in arb_container(),
        num_tiles in 1usize..=64,
        (aw, ah) in arb_aspect(),
    ) {
        let shape = solve(container, num_tiles, aw, ah).expect("valid inputs solve").shape;
        let chosen_scale = shape.cell_width_px / aw;

        for candidate in candidates(container, num_tiles, aw, ah).expect("valid inputs") {
            if candidate.feasible {
                prop_assert!(
                    chosen_scale >= candidate.scale,
                    "{}x{} at {} beats chosen {}x{} at {}",
                    candidate.columns,
                    candidate.rows,
                    candidate.scale,
                    shape.columns,
                    shape.rows,
                    chosen_scale
                );
            }
        }
    }
}

// ===== Property 2: Tie-break =====

proptest! {
    #[test]
    fn ties_prefer_fewest_cells_then_generation_order(
        container in arb_container(),
        num_tiles in 1usize..=64,
        (aw, ah) in arb_aspect(),
    ) {
        let shape = solve(container, num_tiles, aw, ah).expect("valid inputs solve").shape;
        let all = candidates(container, num_tiles, aw, ah).expect("valid inputs");

        let best_scale = all
            .iter()
            .filter(|c| c.feasible)
            .map(|c| c.scale)
            .fold(f64::MIN, f64::max);
        let fewest_cells = all
            .iter()
            .filter(|c| c.feasible && c.scale == best_scale)
            .map(|c| c.cell_count())
            .min()
            .expect("at least one feasible candidate");
        let expected = all
            .iter()
            .find(|c| c.feasible && c.scale == best_scale && c.cell_count() == fewest_cells)
            .expect("winner exists");

        prop_assert_eq!((shape.columns, shape.rows), (expected.columns, expected.rows));
        prop_assert_eq!(shape.constraint, expected.constraint);
    }
}

// ===== Property 3: Smallest covering =====

proptest! {
    #[test]
    fn covering_is_minimal(width in 0.0f64..2000.0, height in 0.0f64..1500.0) {
        let catalog = ResolutionCatalog::default();
        let covering = catalog.smallest_covering(width, height);
        let entries = catalog.entries();
        let position = entries
            .iter()
            .position(|r| *r == covering.resolution)
            .expect("result comes from the catalog");

        if covering.upscaled {
            prop_assert_eq!(covering.resolution, catalog.largest());
            prop_assert!(!catalog.largest().covers(width, height));
        } else {
            prop_assert!(covering.resolution.covers(width, height));
            for smaller in &entries[..position] {
                prop_assert!(!smaller.covers(width, height), "{} also covers", smaller);
            }
        }
    }
}

// ===== Property 4: Scan navigation =====

proptest! {
    #[test]
    fn scan_next_then_previous_returns_to_start(
        num_tiles in prop_oneof![Just(1usize), Just(2usize), Just(5usize)],
        start in 0usize..5,
        steps in 1usize..12,
    ) {
        let start = start % num_tiles;
        let feeds: Vec<String> = (0..num_tiles).map(|i| format!("http://cam{}/", i)).collect();
        let tiles = TileSet::from_descriptors(&feeds).expect("non-empty feeds");
        let mut controller = GridController::new(tiles, ResolutionCatalog::default());
        controller.select_tile(start);

        for _ in 0..steps {
            controller.scan_next();
        }
        prop_assert_eq!(controller.selected(), Some((start + steps) % num_tiles));

        for _ in 0..steps {
            controller.scan_previous();
        }
        prop_assert_eq!(controller.selected(), Some(start));
        prop_assert!(!controller.is_scanning());
    }
}
