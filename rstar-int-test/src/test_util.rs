use rand::Rng;
use rstar_index::{RStarTree, RTreeConfig, Rectangle, SharedRTree, SpatialResult};
use std::panic::AssertUnwindSafe;
use std::time::Instant;

/// Runs a test between a setup and a teardown step.
///
/// The teardown runs even when the test body fails or panics, so integrity
/// problems left behind by a failing test are reported as well.
pub fn run_test<T, B, A>(before: B, test: T, after: A)
where
    T: Fn(TestContext) -> SpatialResult<()> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
    B: Fn() -> SpatialResult<TestContext> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
    A: Fn(TestContext) -> SpatialResult<()> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
{
    let start_time = Instant::now();

    let ctx = match before() {
        Ok(ctx) => ctx,
        Err(e) => panic!("Before run failed: {:?}", e),
    };

    let test_ctx = ctx.clone();
    let result = std::panic::catch_unwind(AssertUnwindSafe(move || test(test_ctx)));
    let after_result = after(ctx);

    log::debug!("Test finished in {:?}", start_time.elapsed());

    match result {
        Ok(Ok(())) => {}
        Ok(Err(e)) => panic!("Test failed: {:?}", e),
        Err(panic_err) => {
            let err_msg = if let Some(s) = panic_err.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = panic_err.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            };
            panic!("Test panicked: {}", err_msg);
        }
    }

    if let Err(e) = after_result {
        panic!("After run failed: {:?}", e);
    }
}

#[derive(Clone)]
pub struct TestContext {
    tree: SharedRTree<u64>,
}

impl TestContext {
    pub fn new(tree: RStarTree<u64>) -> Self {
        Self {
            tree: SharedRTree::new(tree),
        }
    }

    pub fn tree(&self) -> SharedRTree<u64> {
        self.tree.clone()
    }
}

pub fn create_test_context() -> SpatialResult<TestContext> {
    Ok(TestContext::new(RStarTree::new()))
}

pub fn create_test_context_with(max_entries: usize, min_entries: usize) -> SpatialResult<TestContext> {
    let config = RTreeConfig::new(max_entries, min_entries)?;
    Ok(TestContext::new(RStarTree::with_config(config)?))
}

/// Asserts the tree is structurally sound, then empties it.
pub fn verify_and_clear(ctx: TestContext) -> SpatialResult<()> {
    let tree = ctx.tree();
    let report = tree.check_integrity();
    assert!(
        report.is_valid,
        "Integrity check failed after {} nodes: {:?}",
        report.nodes_checked, report.errors
    );
    tree.write(|t| t.clear());
    Ok(())
}

/// Unit squares on a `cols` x `rows` grid with the given spacing, keyed by
/// row-major index.
pub fn grid_rectangles(cols: u64, rows: u64, spacing: f64) -> Vec<(u64, Rectangle)> {
    (0..rows)
        .flat_map(|row| {
            (0..cols).map(move |col| {
                let id = row * cols + col;
                let rect = Rectangle::new(col as f64 * spacing, row as f64 * spacing, 1.0, 1.0);
                (id, rect)
            })
        })
        .collect()
}

/// Rectangle with integer corners inside `[0, extent)` and sides up to `max_side`.
pub fn random_rectangle<R: Rng>(rng: &mut R, extent: u32, max_side: u32) -> Rectangle {
    Rectangle::new(
        rng.random_range(0..extent) as f64,
        rng.random_range(0..extent) as f64,
        rng.random_range(0..=max_side) as f64,
        rng.random_range(0..=max_side) as f64,
    )
}
