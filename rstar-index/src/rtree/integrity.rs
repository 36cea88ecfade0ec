//! Structural integrity checking for the R*-tree.
//!
//! A check walks every node reachable from the root and reports violations
//! instead of stopping at the first one:
//! - capacity: non-root nodes hold between `min_entries` and `max_entries`
//! - tightness: a node's rectangle is exactly the cover of its entries and
//!   contains every one of them
//! - linkage: every child names its parent and sits one level below it
//! - reachability: no live node is left outside the tree

use std::collections::HashSet;

use crate::geometry::Rectangle;

use super::entry::Entry;
use super::node::{NodeArena, NodeId};
use super::rtree_config::RTreeConfig;

// ============================================================================
// Integrity Checking
// ============================================================================

/// Result of an integrity check
#[derive(Debug, Clone)]
pub struct IntegrityReport {
    /// Nodes reachable from the root
    pub nodes_checked: u64,
    /// Entries visited, data and branch
    pub entries_checked: u64,
    /// Live nodes not reachable from the root
    pub orphaned_nodes: u64,
    /// Summary of findings
    pub is_valid: bool,
    /// Detailed error messages
    pub errors: Vec<String>,
}

impl IntegrityReport {
    pub fn new() -> Self {
        Self {
            nodes_checked: 0,
            entries_checked: 0,
            orphaned_nodes: 0,
            is_valid: true,
            errors: Vec::new(),
        }
    }

    fn fail(&mut self, message: String) {
        self.is_valid = false;
        self.errors.push(message);
    }
}

impl Default for IntegrityReport {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn check_tree<V>(
    nodes: &NodeArena<V>,
    root: NodeId,
    config: &RTreeConfig,
    size: usize,
) -> IntegrityReport {
    let mut report = IntegrityReport::new();

    if !nodes.contains(root) {
        report.fail(format!("Root {:?} is not a live node", root));
        return report;
    }
    if let Some(parent) = nodes[root].parent() {
        report.fail(format!("Root {:?} has parent {:?}", root, parent));
    }

    let mut visited = HashSet::new();
    let mut data_entries = 0usize;
    let mut stack = vec![root];

    while let Some(node_id) = stack.pop() {
        if !visited.insert(node_id) {
            report.fail(format!("Node {:?} is reachable more than once", node_id));
            continue;
        }
        report.nodes_checked += 1;

        let node = &nodes[node_id];
        let len = node.len();

        if len > config.max_entries {
            report.fail(format!(
                "Node {:?} holds {} entries, more than {}",
                node_id, len, config.max_entries
            ));
        }
        if node_id != root && len < config.min_entries {
            report.fail(format!(
                "Node {:?} holds {} entries, fewer than {}",
                node_id, len, config.min_entries
            ));
        }
        if node_id == root && !node.is_leaf() && len < 2 {
            report.fail(format!("Internal root {:?} holds {} entries", node_id, len));
        }

        let cover = Rectangle::cover(node.entries().iter().map(Entry::boundary));
        if *node.bounding_rectangle() != cover {
            report.fail(format!(
                "Node {:?} has bounds {} but its entries cover {}",
                node_id,
                node.bounding_rectangle(),
                cover
            ));
        }

        for entry in node.entries() {
            report.entries_checked += 1;
            if !node.bounding_rectangle().contains(entry.boundary()) {
                report.fail(format!(
                    "Node {:?} bounded by {} does not contain entry {}",
                    node_id,
                    node.bounding_rectangle(),
                    entry.boundary()
                ));
            }
            match entry {
                Entry::Data { .. } => {
                    data_entries += 1;
                    if !node.is_leaf() {
                        report.fail(format!(
                            "Internal node {:?} at level {} holds a data entry",
                            node_id,
                            node.level()
                        ));
                    }
                }
                Entry::Branch { boundary, child } => {
                    if node.is_leaf() {
                        report.fail(format!("Leaf {:?} holds a branch entry", node_id));
                    }
                    if !nodes.contains(*child) {
                        report.fail(format!(
                            "Node {:?} points at released node {:?}",
                            node_id, child
                        ));
                        continue;
                    }

                    let child_node = &nodes[*child];
                    if child_node.parent() != Some(node_id) {
                        report.fail(format!(
                            "Node {:?} names parent {:?} instead of {:?}",
                            child,
                            child_node.parent(),
                            node_id
                        ));
                    }
                    if child_node.level() + 1 != node.level() {
                        report.fail(format!(
                            "Node {:?} at level {} is a child of level {}",
                            child,
                            child_node.level(),
                            node.level()
                        ));
                    }
                    if boundary != child_node.bounding_rectangle() {
                        report.fail(format!(
                            "Branch to {:?} records {} but the child is bounded by {}",
                            child,
                            boundary,
                            child_node.bounding_rectangle()
                        ));
                    }
                    stack.push(*child);
                }
            }
        }
    }

    if data_entries != size {
        report.fail(format!(
            "Tree reports {} values but holds {} data entries",
            size, data_entries
        ));
    }

    report.orphaned_nodes = nodes.len().saturating_sub(visited.len()) as u64;
    if report.orphaned_nodes > 0 {
        report.fail(format!(
            "{} live nodes are unreachable from the root",
            report.orphaned_nodes
        ));
    }

    if !report.is_valid {
        log::debug!("Integrity check found {} problems", report.errors.len());
    }
    report
}
