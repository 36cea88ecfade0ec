//! Core types shared across the R*-tree implementation.
//!
//! This module defines:
//! - Error types and result types
//! - Statistics structures

use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur in spatial indexing operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpatialError {
    /// The node capacity configuration violates the tree's preconditions.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Result type for spatial operations
pub type SpatialResult<T> = Result<T, SpatialError>;

// ============================================================================
// Statistics
// ============================================================================

/// Statistics about R*-tree shape and the structural work done so far
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RTreeStats {
    /// Number of data entries stored
    pub total_entries: u64,
    /// Number of live nodes, root included
    pub node_count: u64,
    /// Level of the root (leaves are 0)
    pub tree_height: u32,
    /// Node splits performed
    pub splits: u64,
    /// Forced reinsertions performed on overflowing nodes
    pub forced_reinsertions: u64,
    /// Times a new root was created above a split root
    pub root_growths: u64,
    /// Times an internal root with a single child was collapsed
    pub root_shrinks: u64,
}

/// Running counters kept by the tree between operations
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct RTreeCounters {
    pub(crate) splits: u64,
    pub(crate) forced_reinsertions: u64,
    pub(crate) root_growths: u64,
    pub(crate) root_shrinks: u64,
}
