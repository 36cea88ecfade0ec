//! Entries stored in R*-tree nodes.

use crate::geometry::Rectangle;

use super::node::NodeId;

/// An entry of a node: a payload at the leaf level or a subtree pointer above it.
#[derive(Debug, Clone)]
pub(crate) enum Entry<V> {
    /// Leaf-level payload keyed by its rectangle
    Data { boundary: Rectangle, value: V },
    /// Internal-level pointer; the entry is the only owner of `child`
    Branch { boundary: Rectangle, child: NodeId },
}

impl<V> Entry<V> {
    pub(crate) fn boundary(&self) -> &Rectangle {
        match self {
            Entry::Data { boundary, .. } | Entry::Branch { boundary, .. } => boundary,
        }
    }

    /// Returns the child id of a branch entry.
    pub(crate) fn child(&self) -> Option<NodeId> {
        match self {
            Entry::Data { .. } => None,
            Entry::Branch { child, .. } => Some(*child),
        }
    }

    pub(crate) fn is_data(&self) -> bool {
        matches!(self, Entry::Data { .. })
    }

    /// Overwrites the rectangle of a branch entry; data rectangles never change.
    pub(crate) fn refresh_boundary(&mut self, rectangle: Rectangle) {
        match self {
            Entry::Branch { boundary, .. } => *boundary = rectangle,
            Entry::Data { .. } => panic!("data entry boundaries are immutable"),
        }
    }
}
