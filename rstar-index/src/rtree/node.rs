//! Nodes and the arena that owns them.
//!
//! Every node lives in a [`NodeArena`] slot addressed by a [`NodeId`]. A
//! branch entry owns its child by id and a child refers back to its parent by
//! id, so detaching a node never leaves a dangling reference behind: released
//! slots are parked on a free list and recycled by later allocations.

use std::ops::{Index, IndexMut};

use crate::geometry::Rectangle;

use super::entry::Entry;

/// Address of a node inside its arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(usize);

impl NodeId {
    pub(crate) const fn new(index: usize) -> Self {
        Self(index)
    }

    pub(crate) const fn index(self) -> usize {
        self.0
    }
}

/// A node of the tree holding entries of a single kind.
#[derive(Debug, Clone)]
pub(crate) struct Node<V> {
    level: usize,
    entries: Vec<Entry<V>>,
    bounding_rectangle: Rectangle,
    parent: Option<NodeId>,
}

impl<V> Node<V> {
    /// Creates an empty node at `level` (leaves are 0).
    pub(crate) fn new(level: usize, parent: Option<NodeId>) -> Self {
        Self {
            level,
            entries: Vec::new(),
            bounding_rectangle: Rectangle::empty(),
            parent,
        }
    }

    /// Creates a node from `entries` with a freshly computed bounding rectangle.
    pub(crate) fn with_entries(level: usize, parent: Option<NodeId>, entries: Vec<Entry<V>>) -> Self {
        let mut node = Self::new(level, parent);
        node.entries = entries;
        node.recompute_bounds();
        node
    }

    pub(crate) fn level(&self) -> usize {
        self.level
    }

    pub(crate) fn is_leaf(&self) -> bool {
        self.level == 0
    }

    pub(crate) fn entries(&self) -> &[Entry<V>] {
        &self.entries
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn bounding_rectangle(&self) -> &Rectangle {
        &self.bounding_rectangle
    }

    pub(crate) fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: Option<NodeId>) {
        self.parent = parent;
    }

    /// Appends an entry and widens the bounding rectangle to cover it.
    pub(crate) fn push(&mut self, entry: Entry<V>) {
        debug_assert_eq!(
            entry.is_data(),
            self.is_leaf(),
            "entry kind must match node kind"
        );
        self.bounding_rectangle = if self.entries.is_empty() {
            *entry.boundary()
        } else {
            self.bounding_rectangle.merge(entry.boundary())
        };
        self.entries.push(entry);
    }

    /// Removes the entry at `index`; the bounding rectangle is left stale.
    pub(crate) fn remove(&mut self, index: usize) -> Entry<V> {
        self.entries.remove(index)
    }

    /// Takes all entries out, leaving the node empty.
    pub(crate) fn take_entries(&mut self) -> Vec<Entry<V>> {
        self.bounding_rectangle = Rectangle::empty();
        std::mem::take(&mut self.entries)
    }

    /// Replaces all entries and recomputes the bounding rectangle.
    pub(crate) fn replace_entries(&mut self, entries: Vec<Entry<V>>) {
        self.entries = entries;
        self.recompute_bounds();
    }

    /// Position of the branch entry pointing at `child`.
    pub(crate) fn position_of_child(&self, child: NodeId) -> Option<usize> {
        self.entries.iter().position(|e| e.child() == Some(child))
    }

    /// Sets the rectangle of the branch entry at `index` and recomputes bounds.
    pub(crate) fn refresh_entry(&mut self, index: usize, rectangle: Rectangle) {
        self.entries[index].refresh_boundary(rectangle);
        self.recompute_bounds();
    }

    /// Recomputes the tight cover of all entry rectangles.
    pub(crate) fn recompute_bounds(&mut self) {
        self.bounding_rectangle = Rectangle::cover(self.entries.iter().map(Entry::boundary));
    }

    pub(crate) fn is_overflowing(&self, max_entries: usize) -> bool {
        self.entries.len() > max_entries
    }

    pub(crate) fn is_underflowing(&self, min_entries: usize) -> bool {
        self.entries.len() < min_entries
    }
}

/// Slot storage owning every node of one tree.
#[derive(Debug, Clone)]
pub(crate) struct NodeArena<V> {
    slots: Vec<Option<Node<V>>>,
    free: Vec<NodeId>,
}

impl<V> Default for NodeArena<V> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }
}

impl<V> NodeArena<V> {
    /// Stores `node`, reusing a released slot when one is available.
    pub(crate) fn allocate(&mut self, node: Node<V>) -> NodeId {
        if let Some(id) = self.free.pop() {
            self.slots[id.index()] = Some(node);
            return id;
        }
        let id = NodeId::new(self.slots.len());
        self.slots.push(Some(node));
        id
    }

    /// Removes the node from the arena and returns it.
    pub(crate) fn release(&mut self, id: NodeId) -> Node<V> {
        let node = self.slots[id.index()]
            .take()
            .unwrap_or_else(|| panic!("node {:?} released twice", id));
        self.free.push(id);
        node
    }

    pub(crate) fn contains(&self, id: NodeId) -> bool {
        matches!(self.slots.get(id.index()), Some(Some(_)))
    }

    /// Number of live nodes.
    pub(crate) fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }
}

impl<V> Index<NodeId> for NodeArena<V> {
    type Output = Node<V>;

    fn index(&self, id: NodeId) -> &Node<V> {
        self.slots[id.index()]
            .as_ref()
            .unwrap_or_else(|| panic!("node {:?} is not live", id))
    }
}

impl<V> IndexMut<NodeId> for NodeArena<V> {
    fn index_mut(&mut self, id: NodeId) -> &mut Node<V> {
        self.slots[id.index()]
            .as_mut()
            .unwrap_or_else(|| panic!("node {:?} is not live", id))
    }
}
