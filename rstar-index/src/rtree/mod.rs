//! In-memory R*-tree over axis-aligned rectangles.
//!
//! The tree keeps every node in an arena and links nodes by id:
//! - Forced reinsertion once per level and operation before splitting
//! - Margin-driven split axis, overlap-driven split position
//! - Underflowing nodes dissolved on removal and their entries reinserted
//! - Optional shared handle guarded by a read/write lock

pub mod rtree_constants;
pub mod rtree_config;
pub mod rtree_types;
pub mod shared;
mod entry;
mod integrity;
mod node;
mod rtree_impl;
mod split;

pub use integrity::IntegrityReport;
pub use rtree_config::{default_reinsert_count, RTreeConfig};
pub use rtree_constants::{DEFAULT_MAX_ENTRIES, DEFAULT_MIN_ENTRIES, REINSERT_FACTOR};
pub use rtree_impl::RStarTree;
pub use rtree_types::{RTreeStats, SpatialError, SpatialResult};
pub use shared::SharedRTree;
