//! Thread-safe handle around an [`RStarTree`].

use std::sync::Arc;

use parking_lot::RwLock;

use crate::geometry::{Point, Rectangle};

use super::integrity::IntegrityReport;
use super::rtree_impl::RStarTree;
use super::rtree_types::RTreeStats;

/// A cloneable handle sharing one tree between threads.
///
/// Queries take a read lock and may run concurrently; `insert` and `remove`
/// take the write lock and run one at a time, each to completion.
#[derive(Debug)]
pub struct SharedRTree<V> {
    inner: Arc<RwLock<RStarTree<V>>>,
}

impl<V> Clone for SharedRTree<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V> From<RStarTree<V>> for SharedRTree<V> {
    fn from(tree: RStarTree<V>) -> Self {
        Self::new(tree)
    }
}

impl<V> SharedRTree<V> {
    pub fn new(tree: RStarTree<V>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(tree)),
        }
    }

    pub fn insert(&self, value: V, boundary: Rectangle) {
        self.inner.write().insert(value, boundary);
    }

    pub fn remove(&self, value: &V, boundary: &Rectangle) -> bool
    where
        V: PartialEq,
    {
        self.inner.write().remove(value, boundary)
    }

    pub fn search(&self, query: &Rectangle) -> Vec<V>
    where
        V: Clone,
    {
        self.inner.read().search(query)
    }

    pub fn search_point(&self, point: Point) -> Vec<V>
    where
        V: Clone,
    {
        self.inner.read().search_point(point)
    }

    pub fn search_contained(&self, query: &Rectangle) -> Vec<V>
    where
        V: Clone,
    {
        self.inner.read().search_contained(query)
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn stats(&self) -> RTreeStats {
        self.inner.read().stats()
    }

    pub fn check_integrity(&self) -> IntegrityReport {
        self.inner.read().check_integrity()
    }

    /// Runs `f` under the read lock.
    pub fn read<R>(&self, f: impl FnOnce(&RStarTree<V>) -> R) -> R {
        f(&self.inner.read())
    }

    /// Runs `f` under the write lock, e.g. to apply a batch atomically.
    pub fn write<R>(&self, f: impl FnOnce(&mut RStarTree<V>) -> R) -> R {
        f(&mut self.inner.write())
    }

    /// Returns the tree if this is the last handle.
    pub fn into_inner(self) -> Option<RStarTree<V>> {
        Arc::try_unwrap(self.inner).ok().map(RwLock::into_inner)
    }
}
