//! RStarTree implementation.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::geometry::{Point, Rectangle, POINT_QUERY_EXTENT};

use super::entry::Entry;
use super::integrity::{check_tree, IntegrityReport};
use super::node::{Node, NodeArena, NodeId};
use super::rtree_config::RTreeConfig;
use super::rtree_types::{RTreeCounters, RTreeStats, SpatialResult};
use super::split::{compare_edges, plan_split};

/// An in-memory R*-tree mapping rectangles to values.
///
/// Nodes are owned by an arena; branch entries refer to their child and
/// children refer back to their parent by [`NodeId`](super::node::NodeId).
/// All operations are synchronous and run to completion; wrap the tree in a
/// [`SharedRTree`](super::shared::SharedRTree) to share it between threads.
///
/// # Example
///
/// ```rust
/// use rstar_index::{Point, RStarTree, Rectangle};
///
/// let mut tree = RStarTree::with_capacity(4, 1).unwrap();
/// tree.insert("a", Rectangle::new(0.0, 0.0, 2.0, 2.0));
/// tree.insert("b", Rectangle::new(10.0, 10.0, 2.0, 2.0));
///
/// assert_eq!(tree.search(&Rectangle::new(-1.0, -1.0, 4.0, 4.0)), vec!["a"]);
/// assert_eq!(tree.search_point(Point::new(11.0, 11.0)), vec!["b"]);
///
/// assert!(tree.remove(&"a", &Rectangle::new(0.0, 0.0, 2.0, 2.0)));
/// assert!(!tree.remove(&"a", &Rectangle::new(0.0, 0.0, 2.0, 2.0)));
/// ```
#[derive(Debug, Clone)]
pub struct RStarTree<V> {
    config: RTreeConfig,
    nodes: NodeArena<V>,
    root: NodeId,
    size: usize,
    counters: RTreeCounters,
}

/// Levels already force-reinserted during one top-level insert or remove.
///
/// Created at the top of each operation and dropped when it returns; a second
/// overflow on a marked level is resolved by splitting.
#[derive(Debug, Default)]
struct InsertionState {
    reinserted_levels: HashSet<usize>,
}

impl InsertionState {
    fn new() -> Self {
        Self::default()
    }

    /// Marks `level` as reinserted; returns `false` if it already was.
    fn mark_reinsertion(&mut self, level: usize) -> bool {
        self.reinserted_levels.insert(level)
    }
}

impl<V> Default for RStarTree<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> RStarTree<V> {
    /// Creates an empty tree with the default configuration.
    pub fn new() -> Self {
        Self::build(RTreeConfig::default())
    }

    /// Creates an empty tree with a custom configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::InvalidConfiguration`](super::rtree_types::SpatialError)
    /// if the configuration fails validation.
    pub fn with_config(config: RTreeConfig) -> SpatialResult<Self> {
        config.validate()?;
        log::debug!(
            "Creating R*-tree with max_entries={}, min_entries={}, reinsert_count={}",
            config.max_entries,
            config.min_entries,
            config.reinsert_count
        );
        Ok(Self::build(config))
    }

    /// Creates an empty tree with the given node capacity and the default
    /// reinsertion count.
    pub fn with_capacity(max_entries: usize, min_entries: usize) -> SpatialResult<Self> {
        Self::with_config(RTreeConfig::new(max_entries, min_entries)?)
    }

    fn build(config: RTreeConfig) -> Self {
        let mut nodes = NodeArena::default();
        let root = nodes.allocate(Node::new(0, None));
        Self {
            config,
            nodes,
            root,
            size: 0,
            counters: RTreeCounters::default(),
        }
    }

    pub fn config(&self) -> &RTreeConfig {
        &self.config
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Level of the root node; a tree whose root is a leaf has height 0.
    pub fn height(&self) -> usize {
        self.nodes[self.root].level()
    }

    /// Removes every value and resets the tree to an empty leaf root.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = self.nodes.allocate(Node::new(0, None));
        self.size = 0;
        self.counters = RTreeCounters::default();
    }

    pub fn stats(&self) -> RTreeStats {
        RTreeStats {
            total_entries: self.size as u64,
            node_count: self.nodes.len() as u64,
            tree_height: self.height() as u32,
            splits: self.counters.splits,
            forced_reinsertions: self.counters.forced_reinsertions,
            root_growths: self.counters.root_growths,
            root_shrinks: self.counters.root_shrinks,
        }
    }

    /// Bounding rectangle of every node, root first, in depth-first order.
    ///
    /// Meant for debugging and visualization.
    pub fn node_boundaries(&self) -> Vec<Rectangle> {
        let mut boundaries = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(node_id) = stack.pop() {
            let node = &self.nodes[node_id];
            boundaries.push(*node.bounding_rectangle());
            stack.extend(node.entries().iter().rev().filter_map(Entry::child));
        }
        boundaries
    }

    /// Verifies capacity, tightness, parent and level invariants of every node.
    pub fn check_integrity(&self) -> IntegrityReport {
        check_tree(&self.nodes, self.root, &self.config, self.size)
    }

    // ------------------------------------------------------------------------
    // Insertion
    // ------------------------------------------------------------------------

    /// Inserts `value` keyed by `boundary`.
    ///
    /// The same value may be stored several times, under equal or different
    /// rectangles.
    ///
    /// # Panics
    ///
    /// Panics if `boundary` has a non-finite coordinate or a negative extent.
    pub fn insert(&mut self, value: V, boundary: Rectangle) {
        assert!(boundary.is_valid(), "invalid boundary {}", boundary);

        let entry = Entry::Data { boundary, value };
        self.size += 1;

        let root = &mut self.nodes[self.root];
        if root.is_leaf() && root.is_empty() {
            root.push(entry);
            return;
        }

        let mut state = InsertionState::new();
        self.insert_entry(entry, 0, &mut state);
    }

    /// Places `entry` into a node at `level`, descending from the root.
    fn insert_entry(&mut self, entry: Entry<V>, level: usize, state: &mut InsertionState) {
        debug_assert!(
            level <= self.height(),
            "entry level {} above root level {}",
            level,
            self.height()
        );

        let mut node_id = self.root;
        while self.nodes[node_id].level() > level {
            let next = self.choose_subtree(node_id, entry.boundary());
            assert_ne!(next, node_id, "no subtree to descend into below {:?}", node_id);
            node_id = next;
        }

        self.attach(node_id, entry);

        if self.nodes[node_id].is_overflowing(self.config.max_entries) {
            self.treat_overflow(node_id, state);
        } else {
            self.adjust_tree(node_id, None, state);
        }
    }

    /// Appends `entry` to a node, claiming the child of a branch entry.
    fn attach(&mut self, node_id: NodeId, entry: Entry<V>) {
        if let Some(child) = entry.child() {
            self.nodes[child].set_parent(Some(node_id));
        }
        self.nodes[node_id].push(entry);
    }

    /// Level an entry belongs to: data entries live at the leaves, branch
    /// entries one level above their child.
    fn entry_level(&self, entry: &Entry<V>) -> usize {
        match entry {
            Entry::Data { .. } => 0,
            Entry::Branch { child, .. } => self.nodes[*child].level() + 1,
        }
    }

    /// Child of `node_id` best suited to receive `boundary`.
    ///
    /// A leaf or an entry-less node is its own target.
    fn choose_subtree(&self, node_id: NodeId, boundary: &Rectangle) -> NodeId {
        let node = &self.nodes[node_id];
        if node.is_leaf() || node.is_empty() {
            return node_id;
        }

        let entries = node.entries();
        let best = if node.level() == 1 {
            least_overlap_enlargement(entries, boundary)
        } else {
            least_area_enlargement(entries, boundary)
        };

        let child = entries[best]
            .child()
            .unwrap_or_else(|| panic!("internal node {:?} holds a data entry", node_id));
        log::trace!("Descending from {:?} into {:?}", node_id, child);
        child
    }

    // ------------------------------------------------------------------------
    // Overflow treatment
    // ------------------------------------------------------------------------

    /// Resolves an overflowing node by forced reinsertion, once per level and
    /// operation, or by splitting.
    fn treat_overflow(&mut self, node_id: NodeId, state: &mut InsertionState) {
        let level = self.nodes[node_id].level();
        if node_id != self.root && state.mark_reinsertion(level) {
            self.reinsert(node_id, state);
        } else {
            self.split_node(node_id, state);
        }
    }

    /// Pulls the entries farthest from the node's centre out and inserts them
    /// again from the root.
    fn reinsert(&mut self, node_id: NodeId, state: &mut InsertionState) {
        let node = &mut self.nodes[node_id];
        node.recompute_bounds();
        let bounds = *node.bounding_rectangle();
        let level = node.level();

        let mut entries = node.take_entries();
        entries.sort_by(|a, b| {
            let da = a.boundary().distance_squared_to_center(&bounds);
            let db = b.boundary().distance_squared_to_center(&bounds);
            db.partial_cmp(&da).unwrap_or(Ordering::Equal)
        });

        let count = self.config.reinsert_count.min(entries.len());
        let remaining = entries.split_off(count);
        self.nodes[node_id].replace_entries(remaining);

        self.counters.forced_reinsertions += 1;
        log::debug!(
            "Forced reinsertion of {} entries from node {:?} at level {}",
            count,
            node_id,
            level
        );

        self.adjust_tree(node_id, None, state);

        for entry in entries {
            let level = self.entry_level(&entry);
            self.insert_entry(entry, level, state);
        }
    }

    /// Splits an overflowing node in two and hands the new sibling upward.
    fn split_node(&mut self, node_id: NodeId, state: &mut InsertionState) {
        let node = &mut self.nodes[node_id];
        let level = node.level();
        let parent = node.parent();

        let mut entries = node.take_entries();
        let boundaries: Vec<Rectangle> = entries.iter().map(|e| *e.boundary()).collect();
        let plan = plan_split(&boundaries, self.config.min_entries);
        entries.sort_by(|a, b| compare_edges(a.boundary(), b.boundary(), plan.axis, plan.edge));
        let moved = entries.split_off(plan.split_at);

        self.nodes[node_id].replace_entries(entries);
        let sibling = self.nodes.allocate(Node::with_entries(level, parent, moved));

        let children: Vec<NodeId> = self.nodes[sibling]
            .entries()
            .iter()
            .filter_map(Entry::child)
            .collect();
        for child in children {
            self.nodes[child].set_parent(Some(sibling));
        }

        self.counters.splits += 1;
        log::debug!(
            "Split node {:?} at level {} along {:?}: {} + {} entries",
            node_id,
            level,
            plan.axis,
            self.nodes[node_id].len(),
            self.nodes[sibling].len()
        );

        self.adjust_tree(node_id, Some(sibling), state);
    }

    /// Propagates bounding rectangles, and a pending sibling, toward the root.
    fn adjust_tree(&mut self, node_id: NodeId, sibling: Option<NodeId>, state: &mut InsertionState) {
        let mut current = node_id;
        let mut sibling = sibling;

        loop {
            if current == self.root {
                if let Some(sibling) = sibling {
                    self.grow_root(sibling);
                }
                return;
            }

            let parent = self.parent_of(current);
            let index = self.branch_index(parent, current);
            let bounds = *self.nodes[current].bounding_rectangle();
            self.nodes[parent].refresh_entry(index, bounds);

            if let Some(new_node) = sibling.take() {
                let boundary = *self.nodes[new_node].bounding_rectangle();
                self.attach(
                    parent,
                    Entry::Branch {
                        boundary,
                        child: new_node,
                    },
                );
                if self.nodes[parent].is_overflowing(self.config.max_entries) {
                    self.treat_overflow(parent, state);
                    return;
                }
            }

            current = parent;
        }
    }

    /// Places a new root above the old root and its split sibling.
    fn grow_root(&mut self, sibling: NodeId) {
        let old_root = self.root;
        let level = self.nodes[old_root].level() + 1;
        let new_root = self.nodes.allocate(Node::new(level, None));

        for child in [old_root, sibling] {
            let boundary = *self.nodes[child].bounding_rectangle();
            self.attach(new_root, Entry::Branch { boundary, child });
        }

        self.root = new_root;
        self.counters.root_growths += 1;
        log::debug!("Root split, tree height is now {}", level);
    }

    fn parent_of(&self, node_id: NodeId) -> NodeId {
        self.nodes[node_id]
            .parent()
            .unwrap_or_else(|| panic!("non-root node {:?} has no parent", node_id))
    }

    fn branch_index(&self, parent: NodeId, child: NodeId) -> usize {
        self.nodes[parent]
            .position_of_child(child)
            .unwrap_or_else(|| panic!("node {:?} is not a child of {:?}", child, parent))
    }

    // ------------------------------------------------------------------------
    // Removal
    // ------------------------------------------------------------------------

    /// Removes one entry holding `value` under exactly `boundary`.
    ///
    /// Returns `false` if no such entry exists.
    pub fn remove(&mut self, value: &V, boundary: &Rectangle) -> bool
    where
        V: PartialEq,
    {
        let Some((leaf, index)) = self.find_entry(self.root, value, boundary) else {
            return false;
        };

        let node = &mut self.nodes[leaf];
        node.remove(index);
        node.recompute_bounds();
        self.size -= 1;

        self.condense_tree(leaf);
        true
    }

    /// Depth-first lookup of the leaf and position holding `value` at `boundary`.
    fn find_entry(&self, node_id: NodeId, value: &V, boundary: &Rectangle) -> Option<(NodeId, usize)>
    where
        V: PartialEq,
    {
        for (index, entry) in self.nodes[node_id].entries().iter().enumerate() {
            match entry {
                Entry::Data {
                    boundary: candidate,
                    value: stored,
                } => {
                    if candidate == boundary && stored == value {
                        return Some((node_id, index));
                    }
                }
                Entry::Branch {
                    boundary: candidate,
                    child,
                } => {
                    if candidate.intersects(boundary) {
                        if let Some(found) = self.find_entry(*child, value, boundary) {
                            return Some(found);
                        }
                    }
                }
            }
        }
        None
    }

    /// Walks from a leaf to the root dissolving underflowing nodes, then
    /// reinserts their entries and collapses a single-child root.
    fn condense_tree(&mut self, leaf: NodeId) {
        assert!(self.nodes[leaf].is_leaf(), "condensation must start at a leaf");

        let mut orphans = Vec::new();
        let mut current = leaf;

        while current != self.root {
            let parent = self.parent_of(current);
            let index = self.branch_index(parent, current);

            if self.nodes[current].is_underflowing(self.config.min_entries) {
                let parent_node = &mut self.nodes[parent];
                parent_node.remove(index);
                parent_node.recompute_bounds();
                let mut dissolved = self.nodes.release(current);
                orphans.extend(dissolved.take_entries());
            } else {
                let bounds = *self.nodes[current].bounding_rectangle();
                self.nodes[parent].refresh_entry(index, bounds);
            }

            current = parent;
        }

        if !orphans.is_empty() {
            log::debug!("Reinserting {} orphaned entries", orphans.len());
            let mut state = InsertionState::new();
            for entry in orphans {
                let level = self.entry_level(&entry);
                self.insert_entry(entry, level, &mut state);
            }
        }

        while !self.nodes[self.root].is_leaf() && self.nodes[self.root].len() == 1 {
            let old_root = self.root;
            let child = self.nodes[old_root].entries()[0]
                .child()
                .unwrap_or_else(|| panic!("internal root {:?} holds a data entry", old_root));
            self.nodes.release(old_root);
            self.nodes[child].set_parent(None);
            self.root = child;
            self.counters.root_shrinks += 1;
            log::debug!("Root collapsed, tree height is now {}", self.height());
        }
    }

    // ------------------------------------------------------------------------
    // Search
    // ------------------------------------------------------------------------

    /// Values whose rectangle intersects `query`, edges included.
    pub fn search(&self, query: &Rectangle) -> Vec<V>
    where
        V: Clone,
    {
        let mut results = Vec::new();
        self.collect(
            self.root,
            query,
            &|boundary: &Rectangle| boundary.intersects(query),
            &mut results,
        );
        results
    }

    /// Values whose rectangle covers `point`.
    pub fn search_point(&self, point: Point) -> Vec<V>
    where
        V: Clone,
    {
        self.search(&Rectangle::around_point(point, POINT_QUERY_EXTENT))
    }

    /// Values whose rectangle lies entirely inside `query`.
    pub fn search_contained(&self, query: &Rectangle) -> Vec<V>
    where
        V: Clone,
    {
        let mut results = Vec::new();
        self.collect(
            self.root,
            query,
            &|boundary: &Rectangle| query.contains(boundary),
            &mut results,
        );
        results
    }

    /// Collects values of data entries accepted by `matches`, descending only
    /// into subtrees that intersect `query`.
    fn collect<F>(&self, node_id: NodeId, query: &Rectangle, matches: &F, results: &mut Vec<V>)
    where
        V: Clone,
        F: Fn(&Rectangle) -> bool,
    {
        for entry in self.nodes[node_id].entries() {
            match entry {
                Entry::Data { boundary, value } => {
                    if matches(boundary) {
                        results.push(value.clone());
                    }
                }
                Entry::Branch { boundary, child } => {
                    if boundary.intersects(query) {
                        self.collect(*child, query, matches, results);
                    }
                }
            }
        }
    }
}

/// R* choice among leaf children: least overlap enlargement, then least area
/// enlargement, then least area.
fn least_overlap_enlargement<V>(entries: &[Entry<V>], boundary: &Rectangle) -> usize {
    let mut best = 0;
    let mut best_key = (f64::INFINITY, f64::INFINITY, f64::INFINITY);

    for (i, candidate) in entries.iter().enumerate() {
        let rect = candidate.boundary();
        let enlarged = rect.merge(boundary);

        let mut overlap_before = 0.0;
        let mut overlap_after = 0.0;
        for (j, sibling) in entries.iter().enumerate() {
            if i == j {
                continue;
            }
            overlap_before += rect.intersection_area(sibling.boundary());
            overlap_after += enlarged.intersection_area(sibling.boundary());
        }

        let key = (
            overlap_after - overlap_before,
            rect.enlargement_area(boundary),
            rect.area(),
        );
        if key < best_key {
            best_key = key;
            best = i;
        }
    }

    best
}

/// Classic R-tree choice among internal children: least area enlargement,
/// then least area.
fn least_area_enlargement<V>(entries: &[Entry<V>], boundary: &Rectangle) -> usize {
    let mut best = 0;
    let mut best_key = (f64::INFINITY, f64::INFINITY);

    for (i, candidate) in entries.iter().enumerate() {
        let rect = candidate.boundary();
        let key = (rect.enlargement_area(boundary), rect.area());
        if key < best_key {
            best_key = key;
            best = i;
        }
    }

    best
}

// ============================================================================
// Tests
// ============================================================================
