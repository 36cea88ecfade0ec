//! # rstar-index - In-Memory R*-Tree
//!
//! This crate provides a two-dimensional R*-tree that maps axis-aligned
//! rectangles to arbitrary values and answers intersection, containment and
//! point queries.
//!
//! ## Features
//!
//! - **R\* Insertion**: Overlap-aware subtree choice and forced reinsertion
//! - **R\* Split**: Margin-minimizing axis, overlap-minimizing distribution
//! - **Condensation**: Underflowing nodes dissolved and their entries reinserted
//! - **Integrity Checks**: Structural invariants verified on demand
//! - **Thread Safe Handle**: [`SharedRTree`] for concurrent readers and writers
//!
//! ## Quick Start
//!
//! ```rust
//! use rstar_index::{Point, RStarTree, RTreeConfig, Rectangle};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut tree = RStarTree::with_config(RTreeConfig::new(8, 3)?)?;
//!
//! for i in 0..100u32 {
//!     let x = (i % 10) as f64 * 5.0;
//!     let y = (i / 10) as f64 * 5.0;
//!     tree.insert(i, Rectangle::new(x, y, 2.0, 2.0));
//! }
//!
//! let hits = tree.search(&Rectangle::new(0.0, 0.0, 6.0, 6.0));
//! assert_eq!(hits.len(), 4);
//!
//! assert_eq!(tree.search_point(Point::new(46.0, 46.0)), vec![99]);
//! assert!(tree.check_integrity().is_valid);
//! # Ok(())
//! # }
//! ```

pub mod geometry;
pub mod rtree;

// Re-export geometry types
pub use geometry::{Axis, Point, Rectangle, POINT_QUERY_EXTENT};

// Re-export R*-tree types
pub use rtree::{
    IntegrityReport, RStarTree, RTreeConfig, RTreeStats, SharedRTree, SpatialError,
    SpatialResult,
};
