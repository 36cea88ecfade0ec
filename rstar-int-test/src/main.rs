use rstar_index::{RStarTree, Rectangle, SpatialResult};
use rstar_int_test::test_util::random_rectangle;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> SpatialResult<()> {
    println!("Starting stress test...");
    let mut rng = StdRng::seed_from_u64(2024);
    let mut tree = RStarTree::with_capacity(16, 6)?;

    let count = 200_000u64;
    let rects: Vec<Rectangle> = (0..count)
        .map(|_| random_rectangle(&mut rng, 100_000, 50))
        .collect();

    let start = std::time::Instant::now();
    for (id, rect) in rects.iter().enumerate() {
        tree.insert(id as u64, *rect);
    }
    println!("Inserted {} rectangles in {:?}", count, start.elapsed());
    println!("Stats after insert: {:?}", tree.stats());

    let start = std::time::Instant::now();
    let mut hits = 0usize;
    for rect in rects.iter().take(10_000) {
        hits += tree.search(rect).len();
    }
    println!("Ran 10000 queries with {} hits in {:?}", hits, start.elapsed());

    let start = std::time::Instant::now();
    for (id, rect) in rects.iter().enumerate().step_by(2) {
        tree.remove(&(id as u64), rect);
    }
    println!("Removed half of the rectangles in {:?}", start.elapsed());

    let report = tree.check_integrity();
    println!(
        "Integrity: valid={}, nodes={}, entries={}",
        report.is_valid, report.nodes_checked, report.entries_checked
    );
    println!("Final stats: {:?}", tree.stats());
    Ok(())
}
