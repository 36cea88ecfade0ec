//! Queries through the public API.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rstar_index::{Point, Rectangle};
use rstar_int_test::test_util::{
    create_test_context, create_test_context_with, random_rectangle, run_test, verify_and_clear,
};

fn sorted(mut values: Vec<u64>) -> Vec<u64> {
    values.sort();
    values
}

#[test]
fn test_search_empty_tree() {
    run_test(
        || create_test_context(),
        |ctx| {
            let tree = ctx.tree();
            assert!(tree.search(&Rectangle::new(0.0, 0.0, 100.0, 100.0)).is_empty());
            assert!(tree.search_point(Point::new(1.0, 1.0)).is_empty());
            assert!(tree.search_contained(&Rectangle::new(0.0, 0.0, 1.0, 1.0)).is_empty());
            Ok(())
        },
        |ctx| verify_and_clear(ctx),
    )
}

#[test]
fn test_touching_edges_intersect() {
    run_test(
        || create_test_context(),
        |ctx| {
            let tree = ctx.tree();
            tree.insert(1, Rectangle::new(0.0, 0.0, 2.0, 2.0));
            tree.insert(2, Rectangle::new(10.0, 10.0, 2.0, 2.0));

            assert_eq!(tree.search(&Rectangle::new(2.0, 2.0, 3.0, 3.0)), vec![1]);
            assert_eq!(tree.search(&Rectangle::new(5.0, 5.0, 5.0, 5.0)), vec![2]);
            assert_eq!(tree.search_point(Point::new(2.0, 0.0)), vec![1]);
            assert!(tree.search(&Rectangle::new(3.0, 3.0, 6.0, 6.0)).is_empty());
            Ok(())
        },
        |ctx| verify_and_clear(ctx),
    )
}

#[test]
fn test_queries_match_linear_scan() {
    run_test(
        || create_test_context_with(12, 4),
        |ctx| {
            let tree = ctx.tree();
            let mut rng = StdRng::seed_from_u64(5);
            let entries: Vec<(u64, Rectangle)> = (0..1500u64)
                .map(|id| (id, random_rectangle(&mut rng, 1000, 25)))
                .collect();
            for (id, rect) in &entries {
                tree.insert(*id, *rect);
            }

            for _ in 0..40 {
                let query = random_rectangle(&mut rng, 900, 120);

                let intersecting: Vec<u64> = entries
                    .iter()
                    .filter(|(_, rect)| rect.intersects(&query))
                    .map(|(id, _)| *id)
                    .collect();
                assert_eq!(sorted(tree.search(&query)), sorted(intersecting));

                let contained: Vec<u64> = entries
                    .iter()
                    .filter(|(_, rect)| query.contains(rect))
                    .map(|(id, _)| *id)
                    .collect();
                assert_eq!(sorted(tree.search_contained(&query)), sorted(contained));
            }

            for _ in 0..40 {
                // half-integer points never sit on an integer edge
                let q = random_rectangle(&mut rng, 1000, 0).center();
                let point = Point::new(q.x + 0.5, q.y + 0.5);
                let covering: Vec<u64> = entries
                    .iter()
                    .filter(|(_, rect)| rect.contains_point(point))
                    .map(|(id, _)| *id)
                    .collect();
                assert_eq!(sorted(tree.search_point(point)), sorted(covering));
            }
            Ok(())
        },
        |ctx| verify_and_clear(ctx),
    )
}

#[test]
fn test_node_boundaries_nest() {
    run_test(
        || create_test_context_with(4, 1),
        |ctx| {
            let tree = ctx.tree();
            let mut rng = StdRng::seed_from_u64(8);
            for id in 0..200u64 {
                tree.insert(id, random_rectangle(&mut rng, 300, 5));
            }

            let boundaries = tree.read(|t| t.node_boundaries());
            assert_eq!(boundaries.len() as u64, tree.stats().node_count);
            let root = boundaries[0];
            assert!(boundaries.iter().all(|b| root.contains(b)));
            Ok(())
        },
        |ctx| verify_and_clear(ctx),
    )
}

#[test]
fn test_edge_queries_with_fractional_coordinates() {
    run_test(
        || create_test_context_with(4, 1),
        |ctx| {
            let tree = ctx.tree();
            let mut rng = StdRng::seed_from_u64(36);
            let entries: Vec<(u64, Rectangle)> = (0..400u64)
                .map(|id| {
                    let rect = Rectangle::new(
                        rng.random_range(-500.0..500.0),
                        rng.random_range(-500.0..500.0),
                        rng.random_range(0.0..10.0),
                        rng.random_range(0.0..10.0),
                    );
                    (id, rect)
                })
                .collect();
            for (id, rect) in &entries {
                tree.insert(*id, *rect);
            }

            for (id, rect) in &entries {
                let corner = rect.right_lower();
                assert!(
                    tree.search(&Rectangle::new(corner.x, corner.y, 0.0, 0.0)).contains(id),
                    "value {} at {} missed by its right-lower corner",
                    id,
                    rect
                );
                assert!(tree.search_point(corner).contains(id));
            }
            Ok(())
        },
        |ctx| verify_and_clear(ctx),
    )
}
