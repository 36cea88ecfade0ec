//! Removal and tree condensation through the public API.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rstar_index::Rectangle;
use rstar_int_test::test_util::{
    create_test_context, create_test_context_with, grid_rectangles, random_rectangle, run_test,
    verify_and_clear,
};

#[test]
fn test_remove_everything_in_random_order() {
    run_test(
        || create_test_context_with(6, 2),
        |ctx| {
            let tree = ctx.tree();
            let mut rng = StdRng::seed_from_u64(17);
            let mut entries: Vec<(u64, Rectangle)> = (0..600u64)
                .map(|id| (id, random_rectangle(&mut rng, 500, 10)))
                .collect();
            for (id, rect) in &entries {
                tree.insert(*id, *rect);
            }

            entries.shuffle(&mut rng);
            for (removed, (id, rect)) in entries.iter().enumerate() {
                assert!(tree.remove(id, rect), "value {} not removed", id);
                if removed % 100 == 0 {
                    let report = tree.check_integrity();
                    assert!(report.is_valid, "{:?}", report.errors);
                }
            }

            assert!(tree.is_empty());
            assert_eq!(tree.read(|t| t.height()), 0);
            assert_eq!(tree.stats().node_count, 1);
            Ok(())
        },
        |ctx| verify_and_clear(ctx),
    )
}

#[test]
fn test_remove_missing_entries() {
    run_test(
        || create_test_context(),
        |ctx| {
            let tree = ctx.tree();
            let rect = Rectangle::new(1.0, 1.0, 1.0, 1.0);
            assert!(!tree.remove(&1, &rect));

            tree.insert(1, rect);
            assert!(!tree.remove(&2, &rect));
            assert!(!tree.remove(&1, &Rectangle::new(1.0, 1.0, 2.0, 1.0)));
            assert_eq!(tree.len(), 1);
            Ok(())
        },
        |ctx| verify_and_clear(ctx),
    )
}

#[test]
fn test_remove_one_duplicate_at_a_time() {
    run_test(
        || create_test_context_with(4, 1),
        |ctx| {
            let tree = ctx.tree();
            let rect = Rectangle::new(0.0, 0.0, 3.0, 3.0);
            for _ in 0..12 {
                tree.insert(5, rect);
            }

            for remaining in (0..12).rev() {
                assert!(tree.remove(&5, &rect));
                assert_eq!(tree.search(&rect).len(), remaining);
            }
            assert!(!tree.remove(&5, &rect));
            Ok(())
        },
        |ctx| verify_and_clear(ctx),
    )
}

#[test]
fn test_tree_shrinks_after_mass_removal() {
    run_test(
        || create_test_context_with(4, 2),
        |ctx| {
            let tree = ctx.tree();
            let cells = grid_rectangles(16, 16, 2.0);
            for (id, rect) in &cells {
                tree.insert(*id, *rect);
            }
            let grown = tree.stats().tree_height;
            assert!(grown >= 3);

            for (id, rect) in cells.iter().skip(3) {
                assert!(tree.remove(id, rect));
            }

            let stats = tree.stats();
            assert_eq!(stats.total_entries, 3);
            assert_eq!(stats.tree_height, 0);
            assert!(stats.root_shrinks > 0);
            for (id, rect) in cells.iter().take(3) {
                assert!(tree.search(rect).contains(id));
            }
            Ok(())
        },
        |ctx| verify_and_clear(ctx),
    )
}

#[test]
fn test_search_agrees_with_model_under_churn() {
    run_test(
        || create_test_context_with(5, 2),
        |ctx| {
            let tree = ctx.tree();
            let mut rng = StdRng::seed_from_u64(99);
            let mut model: Vec<(u64, Rectangle)> = Vec::new();

            for id in 0..800u64 {
                let rect = random_rectangle(&mut rng, 200, 8);
                tree.insert(id, rect);
                model.push((id, rect));

                if id % 4 == 3 {
                    model.shuffle(&mut rng);
                    if let Some((victim, rect)) = model.pop() {
                        assert!(tree.remove(&victim, &rect));
                    }
                }
            }

            let query = Rectangle::new(50.0, 50.0, 60.0, 60.0);
            let mut expected: Vec<u64> = model
                .iter()
                .filter(|(_, rect)| rect.intersects(&query))
                .map(|(id, _)| *id)
                .collect();
            expected.sort();
            let mut found = tree.search(&query);
            found.sort();
            assert_eq!(found, expected);
            assert_eq!(tree.len(), model.len());
            Ok(())
        },
        |ctx| verify_and_clear(ctx),
    )
}
