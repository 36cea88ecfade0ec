//! Constants for the in-memory R*-tree.

/// Default maximum number of entries per node
pub const DEFAULT_MAX_ENTRIES: usize = 5;

/// Default minimum number of entries per non-root node
pub const DEFAULT_MIN_ENTRIES: usize = 1;

/// Share of `max_entries` pulled out of an overflowing node for forced reinsertion
pub const REINSERT_FACTOR: f64 = 0.35;
