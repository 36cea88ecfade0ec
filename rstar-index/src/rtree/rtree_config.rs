//! Node capacity configuration for the R*-tree.

use serde::{Deserialize, Serialize};

use super::rtree_constants::{DEFAULT_MAX_ENTRIES, DEFAULT_MIN_ENTRIES, REINSERT_FACTOR};
use super::rtree_types::{SpatialError, SpatialResult};

/// Capacity configuration shared by every node of a tree.
///
/// The struct is plain data so it can be loaded from any serde format; it is
/// validated when a tree is built from it. Missing fields take their defaults,
/// and a missing `reinsert_count` is derived from the loaded `max_entries`.
///
/// # Examples
///
/// ```rust
/// use rstar_index::RTreeConfig;
///
/// let config = RTreeConfig::new(8, 3).unwrap();
/// assert_eq!(config.reinsert_count, 2);
///
/// assert!(RTreeConfig::new(4, 3).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RTreeConfigFields")]
pub struct RTreeConfig {
    /// Maximum number of entries per node
    pub max_entries: usize,
    /// Minimum number of entries per non-root node
    pub min_entries: usize,
    /// Number of entries pulled out of an overflowing node for forced reinsertion
    pub reinsert_count: usize,
}

impl Default for RTreeConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            min_entries: DEFAULT_MIN_ENTRIES,
            reinsert_count: default_reinsert_count(DEFAULT_MAX_ENTRIES),
        }
    }
}

/// Deserialized form of [`RTreeConfig`] with every field optional.
#[derive(Debug, Deserialize)]
struct RTreeConfigFields {
    max_entries: Option<usize>,
    min_entries: Option<usize>,
    reinsert_count: Option<usize>,
}

impl From<RTreeConfigFields> for RTreeConfig {
    fn from(fields: RTreeConfigFields) -> Self {
        let max_entries = fields.max_entries.unwrap_or(DEFAULT_MAX_ENTRIES);
        Self {
            max_entries,
            min_entries: fields.min_entries.unwrap_or(DEFAULT_MIN_ENTRIES),
            reinsert_count: fields
                .reinsert_count
                .unwrap_or_else(|| default_reinsert_count(max_entries)),
        }
    }
}

impl RTreeConfig {
    /// Creates a validated configuration with the default reinsertion count.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::InvalidConfiguration`] if `min_entries < 1`,
    /// `max_entries < min_entries` or `min_entries > max_entries / 2`.
    pub fn new(max_entries: usize, min_entries: usize) -> SpatialResult<Self> {
        let config = Self {
            max_entries,
            min_entries,
            reinsert_count: default_reinsert_count(max_entries),
        };
        config.validate()?;
        Ok(config)
    }

    /// Returns a validated copy using `reinsert_count` for forced reinsertion.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::InvalidConfiguration`] if the count is zero or
    /// would leave an overflowing node with fewer than `min_entries` entries.
    pub fn with_reinsert_count(self, reinsert_count: usize) -> SpatialResult<Self> {
        let config = Self {
            reinsert_count,
            ..self
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks the capacity preconditions.
    pub fn validate(&self) -> SpatialResult<()> {
        if self.min_entries < 1 {
            return Err(SpatialError::InvalidConfiguration(format!(
                "min_entries must be at least 1, got {}",
                self.min_entries
            )));
        }
        if self.max_entries < self.min_entries {
            return Err(SpatialError::InvalidConfiguration(format!(
                "max_entries ({}) must not be below min_entries ({})",
                self.max_entries, self.min_entries
            )));
        }
        if self.min_entries > self.max_entries / 2 {
            return Err(SpatialError::InvalidConfiguration(format!(
                "min_entries ({}) must not exceed half of max_entries ({})",
                self.min_entries, self.max_entries
            )));
        }
        // an overflowing node holds max + 1 entries and must keep min of them
        let reinsert_limit = self.max_entries + 1 - self.min_entries;
        if self.reinsert_count < 1 || self.reinsert_count > reinsert_limit {
            return Err(SpatialError::InvalidConfiguration(format!(
                "reinsert_count must be within 1..={}, got {}",
                reinsert_limit, self.reinsert_count
            )));
        }
        Ok(())
    }
}

/// `max(1, floor(REINSERT_FACTOR * max_entries))`
pub fn default_reinsert_count(max_entries: usize) -> usize {
    ((max_entries as f64 * REINSERT_FACTOR).floor() as usize).max(1)
}
