//! Shared-handle access from several threads.

use rstar_index::{Point, Rectangle};
use rstar_int_test::test_util::{create_test_context_with, run_test, verify_and_clear};
use std::thread;

#[test]
fn test_parallel_writers_and_readers() {
    run_test(
        || create_test_context_with(8, 3),
        |ctx| {
            let writers: Vec<_> = (0..4u64)
                .map(|t| {
                    let tree = ctx.tree();
                    thread::spawn(move || {
                        for i in 0..300u64 {
                            let id = t * 10_000 + i;
                            let rect = Rectangle::new(i as f64 * 2.0, t as f64 * 50.0, 1.0, 1.0);
                            tree.insert(id, rect);
                            if i % 3 == 0 {
                                assert!(tree.remove(&id, &rect));
                            }
                        }
                    })
                })
                .collect();

            let readers: Vec<_> = (0..2)
                .map(|_| {
                    let tree = ctx.tree();
                    thread::spawn(move || {
                        for _ in 0..100 {
                            let hits = tree.search(&Rectangle::new(0.0, 0.0, 1000.0, 200.0));
                            assert!(hits.len() <= 1200);
                        }
                    })
                })
                .collect();

            for handle in writers.into_iter().chain(readers) {
                handle.join().expect("worker thread panicked");
            }

            let tree = ctx.tree();
            assert_eq!(tree.len(), 4 * 200);
            // i = 1 survives, i = 0 was removed
            assert_eq!(tree.search_point(Point::new(2.5, 100.5)), vec![20_001]);
            assert!(tree.search_point(Point::new(0.5, 100.5)).is_empty());
            Ok(())
        },
        |ctx| verify_and_clear(ctx),
    )
}
