//! Insertion through the public API.

use rstar_index::{Point, RStarTree, Rectangle};
use rstar_int_test::test_util::{
    create_test_context, create_test_context_with, grid_rectangles, run_test, verify_and_clear,
};

#[test]
fn test_insert_grid_and_find_each() {
    run_test(
        || create_test_context_with(8, 3),
        |ctx| {
            let tree = ctx.tree();
            let cells = grid_rectangles(20, 20, 3.0);
            for (id, rect) in &cells {
                tree.insert(*id, *rect);
            }

            assert_eq!(tree.len(), 400);
            for (id, rect) in &cells {
                let centre = rect.center();
                assert_eq!(tree.search_point(centre), vec![*id]);
            }
            Ok(())
        },
        |ctx| verify_and_clear(ctx),
    )
}

#[test]
fn test_duplicates_are_kept() {
    run_test(
        || create_test_context(),
        |ctx| {
            let tree = ctx.tree();
            let rect = Rectangle::new(4.0, 4.0, 2.0, 2.0);
            for _ in 0..3 {
                tree.insert(9, rect);
            }
            tree.insert(10, rect);

            let mut found = tree.search(&rect);
            found.sort();
            assert_eq!(found, vec![9, 9, 9, 10]);
            Ok(())
        },
        |ctx| verify_and_clear(ctx),
    )
}

#[test]
fn test_height_stays_logarithmic() {
    run_test(
        || create_test_context_with(4, 2),
        |ctx| {
            let tree = ctx.tree();
            for (id, rect) in grid_rectangles(40, 25, 2.0) {
                tree.insert(id, rect);
            }

            let stats = tree.stats();
            assert_eq!(stats.total_entries, 1000);
            // 250 full leaves need at least four levels above them
            assert!(stats.tree_height >= 4, "height {}", stats.tree_height);
            // every non-root node holds at least two entries
            assert!(stats.tree_height <= 9, "height {}", stats.tree_height);
            Ok(())
        },
        |ctx| verify_and_clear(ctx),
    )
}

#[test]
fn test_stats_track_structural_work() {
    run_test(
        || create_test_context_with(4, 1),
        |ctx| {
            let tree = ctx.tree();
            for (id, rect) in grid_rectangles(10, 10, 2.0) {
                tree.insert(id, rect);
            }

            let stats = tree.stats();
            assert!(stats.splits > 0);
            assert!(stats.forced_reinsertions > 0);
            assert_eq!(stats.root_growths, u64::from(stats.tree_height));
            assert_eq!(stats.root_shrinks, 0);
            Ok(())
        },
        |ctx| verify_and_clear(ctx),
    )
}

#[test]
fn test_zero_area_rectangles() {
    run_test(
        || create_test_context_with(4, 1),
        |ctx| {
            let tree = ctx.tree();
            for i in 0..50u64 {
                let p = Point::new((i % 7) as f64, (i / 7) as f64);
                tree.insert(i, Rectangle::around_point(p, 0.0));
            }

            assert_eq!(tree.search_point(Point::new(3.0, 2.0)), vec![17]);
            // a horizontal segment of width zero height
            let segment = Rectangle::new(0.0, 1.0, 6.0, 0.0);
            let mut found = tree.search(&segment);
            found.sort();
            assert_eq!(found, (7..14).collect::<Vec<u64>>());
            Ok(())
        },
        |ctx| verify_and_clear(ctx),
    )
}

#[test]
fn test_invalid_capacity_rejected() {
    assert!(RStarTree::<u64>::with_capacity(10, 6).is_err());
    assert!(RStarTree::<u64>::with_capacity(10, 0).is_err());
    assert!(RStarTree::<u64>::with_capacity(10, 5).is_ok());
}
