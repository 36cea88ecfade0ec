//! R*-tree split heuristics.
//!
//! Both steps work on the rectangles of an overflowing node only. For an
//! ordering of `n` rectangles a split position `s` puts the first `s`
//! rectangles into the first group and the rest into the second; legal
//! positions are `min_entries..=n - min_entries`. Group covers for every
//! position are read from prefix/suffix cover tables built in O(n) per
//! ordering.
//!
//! 1. [`choose_split_axis`] sums the margins of both groups over every legal
//!    position of the lower-edge and upper-edge orderings, per axis, and
//!    keeps the axis with the smallest sum.
//! 2. [`choose_split_index`] scans both orderings along that axis and keeps
//!    the position with the least overlap between the groups, then the least
//!    combined area.
//!
//! Ties always go to the candidate evaluated first.

use std::cmp::Ordering;

use crate::geometry::{Axis, Rectangle};

/// Which edge of the rectangles an ordering sorts by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SortEdge {
    Lower,
    Upper,
}

impl SortEdge {
    const ALL: [SortEdge; 2] = [SortEdge::Lower, SortEdge::Upper];
}

/// The partition chosen for an overflowing node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SplitPlan {
    pub(crate) axis: Axis,
    pub(crate) edge: SortEdge,
    /// Size of the first group in the sorted order
    pub(crate) split_at: usize,
}

/// Orders two rectangles by one edge along one axis.
pub(crate) fn compare_edges(a: &Rectangle, b: &Rectangle, axis: Axis, edge: SortEdge) -> Ordering {
    let (ka, kb) = match edge {
        SortEdge::Lower => (a.lower(axis), b.lower(axis)),
        SortEdge::Upper => (a.upper(axis), b.upper(axis)),
    };
    ka.partial_cmp(&kb).unwrap_or(Ordering::Equal)
}

/// Picks axis, ordering and position for splitting `boundaries`.
pub(crate) fn plan_split(boundaries: &[Rectangle], min_entries: usize) -> SplitPlan {
    assert!(
        boundaries.len() >= 2 * min_entries,
        "cannot split {} entries into two groups of at least {}",
        boundaries.len(),
        min_entries
    );
    let axis = choose_split_axis(boundaries, min_entries);
    let (edge, split_at) = choose_split_index(boundaries, axis, min_entries);
    SplitPlan {
        axis,
        edge,
        split_at,
    }
}

/// Axis whose orderings produce the smallest margin sum.
pub(crate) fn choose_split_axis(boundaries: &[Rectangle], min_entries: usize) -> Axis {
    let mut best_axis = Axis::X;
    let mut best_margin = f64::INFINITY;

    for axis in Axis::ALL {
        let mut margin_sum = 0.0;
        for edge in SortEdge::ALL {
            let covers = GroupCovers::new(boundaries, axis, edge);
            for split_at in split_positions(boundaries.len(), min_entries) {
                let (first, second) = covers.at(split_at);
                margin_sum += first.margin() + second.margin();
            }
        }
        if margin_sum < best_margin {
            best_margin = margin_sum;
            best_axis = axis;
        }
    }

    best_axis
}

/// Ordering and position along `axis` with minimal overlap, then minimal area.
pub(crate) fn choose_split_index(
    boundaries: &[Rectangle],
    axis: Axis,
    min_entries: usize,
) -> (SortEdge, usize) {
    let mut best = (SortEdge::Lower, min_entries);
    let mut best_overlap = f64::INFINITY;
    let mut best_area = f64::INFINITY;

    for edge in SortEdge::ALL {
        let covers = GroupCovers::new(boundaries, axis, edge);
        for split_at in split_positions(boundaries.len(), min_entries) {
            let (first, second) = covers.at(split_at);
            let overlap = first.intersection_area(&second);
            let area = first.area() + second.area();

            if overlap < best_overlap || (overlap == best_overlap && area < best_area) {
                best_overlap = overlap;
                best_area = area;
                best = (edge, split_at);
            }
        }
    }

    best
}

fn split_positions(len: usize, min_entries: usize) -> std::ops::RangeInclusive<usize> {
    min_entries..=len - min_entries
}

/// Prefix and suffix covers of one ordering of the rectangles.
struct GroupCovers {
    prefix: Vec<Rectangle>,
    suffix: Vec<Rectangle>,
}

impl GroupCovers {
    fn new(boundaries: &[Rectangle], axis: Axis, edge: SortEdge) -> Self {
        let mut order: Vec<&Rectangle> = boundaries.iter().collect();
        order.sort_by(|a, b| compare_edges(a, b, axis, edge));

        let mut prefix: Vec<Rectangle> = Vec::with_capacity(order.len());
        for rect in &order {
            let cover = match prefix.last() {
                Some(acc) => acc.merge(rect),
                None => **rect,
            };
            prefix.push(cover);
        }

        let len = order.len();
        let mut suffix = vec![Rectangle::empty(); len];
        for i in (0..len).rev() {
            suffix[i] = if i + 1 < len {
                suffix[i + 1].merge(order[i])
            } else {
                *order[i]
            };
        }

        Self { prefix, suffix }
    }

    /// Covers of the first `split_at` rectangles and of the remainder.
    fn at(&self, split_at: usize) -> (Rectangle, Rectangle) {
        (self.prefix[split_at - 1], self.suffix[split_at])
    }
}
