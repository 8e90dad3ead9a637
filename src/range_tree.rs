//! Range tree with rank/select cascading.
//!
//! # Query
//!
//! A closed rectangle is first mapped to half-open slot and y-rank intervals.
//! The two boundary leaves of the x interval meet at their lowest common
//! ancestor; the walk down to it carries the y interval along using the
//! cascade, never re-searching. From the LCA two disjoint chains hang down:
//!
//! - the lower chain goes left and walks to the lower boundary leaf,
//!   reporting every right subtree it passes over;
//! - the upper chain goes right and walks to the upper boundary leaf,
//!   reporting every left subtree it passes over.
//!
//! A reported subtree contributes a contiguous slice of its ball inheritance
//! list, so the total cost is $O(\log n + k)$.

use std::ops::Range;

use log::{debug, trace};

use crate::cascade::CascadeIndex;
use crate::error::{Error, Result};
use crate::rank_space::RankSpace;
use crate::xtree::{branches_to, lowest_common_ancestor, Key, XTree};
use crate::{validate_rect, Point, RangeSearch};

/// Receives the original indices found by a query.
trait Sink {
    fn push(&mut self, index: usize);
    fn extend_from(&mut self, indices: &[usize]);
}

impl Sink for Vec<usize> {
    fn push(&mut self, index: usize) {
        Vec::push(self, index);
    }

    fn extend_from(&mut self, indices: &[usize]) {
        self.extend_from_slice(indices);
    }
}

/// Counts instead of collecting.
#[derive(Default)]
struct Tally(usize);

impl Sink for Tally {
    fn push(&mut self, _index: usize) {
        self.0 += 1;
    }

    fn extend_from(&mut self, indices: &[usize]) {
        self.0 += indices.len();
    }
}

/// Everything derived from the points by [`RangeTree::build`].
#[derive(Debug)]
struct Index {
    space: RankSpace,
    tree: XTree,
    cascade: CascadeIndex,
}

impl Index {
    fn new(points: &[Point]) -> Self {
        let space = RankSpace::new(points);
        let tree = XTree::new(space.len());
        let cascade = CascadeIndex::build(&tree, &space);
        Self {
            space,
            tree,
            cascade,
        }
    }

    fn leaf_point(&self, node: usize) -> Option<usize> {
        self.tree
            .slot_of(node)
            .map(|slot| self.space.x_order()[slot])
    }

    fn search<S: Sink>(&self, points: &[Point], bottom_left: Point, top_right: Point, sink: &mut S) {
        let n = self.space.len();
        if n == 0 {
            return;
        }
        let rect = self.space.map_rect(bottom_left, top_right);

        let lo_leaf = self.tree.leaf(rect.x_from);
        let mut hi_leaf = self.tree.leaf(rect.x_to);
        // An upper bound past the last point is open; step back onto real data.
        if rect.x_to == n {
            hi_leaf -= 1;
        }

        if lo_leaf >= hi_leaf {
            if rect.x_from < n {
                let index = self.space.x_order()[rect.x_from];
                if points[index].is_within(bottom_left, top_right) {
                    sink.push(index);
                }
            }
            trace!("query {rect:?}: single leaf {lo_leaf}");
            return;
        }

        let lca = lowest_common_ancestor(lo_leaf, hi_leaf);
        trace!("query {rect:?}: leaves {lo_leaf}..={hi_leaf}, lca {lca}");

        let mut node = 0;
        let mut ys = rect.y_from..rect.y_to;
        for right in branches_to(lca) {
            ys = self.cascade.child_range(node, &ys, right);
            node = 2 * node + 1 + right as usize;
        }
        debug_assert_eq!(node, lca);

        let left_ys = self.cascade.child_range(lca, &ys, false);
        let right_ys = self.cascade.child_range(lca, &ys, true);
        self.report_lower(2 * lca + 1, left_ys, rect.x_from, sink);
        self.report_upper(2 * lca + 2, right_ys, rect.x_to, sink);
    }

    /// Report every point of `node`'s subtree whose y position is in `ys`.
    fn report_subtree<S: Sink>(&self, node: usize, ys: Range<usize>, sink: &mut S) {
        if ys.is_empty() {
            return;
        }
        if self.tree.is_leaf(node) {
            if let Some(index) = self.leaf_point(node) {
                sink.push(index);
            }
        } else {
            sink.extend_from(&self.cascade.balls(node)[ys]);
        }
    }

    /// Walk toward the leaf of slot `x_from`, reporting slots `>= x_from`.
    fn report_lower<S: Sink>(&self, mut node: usize, mut ys: Range<usize>, x_from: usize, sink: &mut S) {
        while !ys.is_empty() {
            if self.tree.is_leaf(node) {
                if let Some(slot) = self.tree.slot_of(node).filter(|&slot| slot >= x_from) {
                    sink.push(self.space.x_order()[slot]);
                }
                return;
            }
            let key = self.tree.key(node);
            if key == Key::Empty {
                return;
            }
            if key.routes_left(x_from) {
                let right_ys = self.cascade.child_range(node, &ys, true);
                self.report_subtree(2 * node + 2, right_ys, sink);
                ys = self.cascade.child_range(node, &ys, false);
                node = 2 * node + 1;
            } else {
                ys = self.cascade.child_range(node, &ys, true);
                node = 2 * node + 2;
            }
        }
    }

    /// Walk toward the leaf of slot `x_to`, reporting slots `< x_to`.
    fn report_upper<S: Sink>(&self, mut node: usize, mut ys: Range<usize>, x_to: usize, sink: &mut S) {
        while !ys.is_empty() {
            if self.tree.is_leaf(node) {
                if let Some(slot) = self.tree.slot_of(node).filter(|&slot| slot < x_to) {
                    sink.push(self.space.x_order()[slot]);
                }
                return;
            }
            let key = self.tree.key(node);
            if key == Key::Empty {
                return;
            }
            if key.is_below(x_to) {
                let left_ys = self.cascade.child_range(node, &ys, false);
                self.report_subtree(2 * node + 1, left_ys, sink);
                ys = self.cascade.child_range(node, &ys, true);
                node = 2 * node + 2;
            } else {
                ys = self.cascade.child_range(node, &ys, false);
                node = 2 * node + 1;
            }
        }
    }
}

/// Static 2-D range search in $O(\log n + k)$ per query.
///
/// ```
/// use orsearch::{Point, RangeSearch, RangeTree};
///
/// let mut tree = RangeTree::new(vec![
///     Point::new(0.0, 0.0),
///     Point::new(5.0, 5.0),
///     Point::new(10.0, 10.0),
/// ]);
/// tree.build();
/// let mut found = tree.query(Point::new(1.0, 1.0), Point::new(10.0, 10.0)).unwrap();
/// found.sort_unstable();
/// assert_eq!(found, vec![1, 2]);
/// ```
#[derive(Debug)]
pub struct RangeTree {
    points: Vec<Point>,
    index: Option<Index>,
}

impl RangeTree {
    /// Wrap `points` without preprocessing them. Call
    /// [`build`](RangeSearch::build) before querying.
    pub fn new(points: Vec<Point>) -> Self {
        Self {
            points,
            index: None,
        }
    }

    /// Copy `points` and build immediately.
    pub fn from_points(points: &[Point]) -> Self {
        let mut tree = Self::new(points.to_vec());
        tree.build();
        tree
    }

    /// Return true once [`build`](RangeSearch::build) has run.
    pub fn is_built(&self) -> bool {
        self.index.is_some()
    }

    /// The indexed points, in input order.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Nodes on a root-to-leaf path, or `None` before build.
    pub fn height(&self) -> Option<usize> {
        self.index.as_ref().map(|index| index.tree.height())
    }

    /// Number of nodes in the tree array, or `None` before build.
    pub fn tree_len(&self) -> Option<usize> {
        self.index.as_ref().map(|index| index.tree.len())
    }

    /// Number of points inside the closed rectangle, without collecting them.
    pub fn count(&self, bottom_left: Point, top_right: Point) -> Result<usize> {
        let index = self.index.as_ref().ok_or(Error::NotBuilt)?;
        validate_rect(bottom_left, top_right)?;
        let mut tally = Tally::default();
        index.search(&self.points, bottom_left, top_right, &mut tally);
        Ok(tally.0)
    }

    /// Approximate heap memory usage in bytes.
    pub fn heap_bytes(&self) -> usize {
        let derived = self.index.as_ref().map_or(0, |index| {
            index.space.heap_bytes() + index.tree.heap_bytes() + index.cascade.heap_bytes()
        });
        self.points.capacity() * std::mem::size_of::<Point>() + derived
    }
}

impl RangeSearch for RangeTree {
    fn build(&mut self) {
        if self.index.is_some() {
            debug!("range tree over {} points already built", self.points.len());
            return;
        }
        let index = Index::new(&self.points);
        debug!(
            "built range tree: points={}, nodes={}, height={}, cascade_bits={}",
            self.points.len(),
            index.tree.len(),
            index.tree.height(),
            index.cascade.total_bits()
        );
        self.index = Some(index);
    }

    fn query(&self, bottom_left: Point, top_right: Point) -> Result<Vec<usize>> {
        let index = self.index.as_ref().ok_or(Error::NotBuilt)?;
        validate_rect(bottom_left, top_right)?;
        let mut found = Vec::new();
        index.search(&self.points, bottom_left, top_right, &mut found);
        Ok(found)
    }

    fn len(&self) -> usize {
        self.points.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut v: Vec<usize>) -> Vec<usize> {
        v.sort_unstable();
        v
    }

    #[test]
    fn test_eleven_point_query() {
        let points: Vec<Point> = [
            (3.0, 4.0),
            (5.0, 5.0),
            (4.5, 7.0),
            (10.0, 3.0),
            (9.0, 8.0),
            (2.0, 9.5),
            (4.0, 10.0),
            (2.5, 2.0),
            (8.0, 6.0),
            (7.0, 3.5),
            (6.0, 9.0),
        ]
        .iter()
        .map(|&p| Point::from(p))
        .collect();
        let tree = RangeTree::from_points(&points);
        let found = tree
            .query(Point::new(1.9, 3.9), Point::new(6.5, 9.2))
            .unwrap();
        assert_eq!(sorted(found), vec![0, 1, 2, 10]);
        assert_eq!(tree.count(Point::new(1.9, 3.9), Point::new(6.5, 9.2)).unwrap(), 4);
    }

    #[test]
    fn test_not_built() {
        let tree = RangeTree::new(vec![Point::new(1.0, 1.0)]);
        assert!(!tree.is_built());
        assert!(tree.height().is_none());
        let err = tree.query(Point::new(0.0, 0.0), Point::new(2.0, 2.0));
        assert!(matches!(err, Err(Error::NotBuilt)));
        assert!(matches!(
            tree.count(Point::new(0.0, 0.0), Point::new(2.0, 2.0)),
            Err(Error::NotBuilt)
        ));
    }

    #[test]
    fn test_build_is_idempotent() {
        let mut tree = RangeTree::new((0..7).map(|i| Point::new(i as f64, 0.0)).collect());
        tree.build();
        let first = tree.query(Point::new(2.0, 0.0), Point::new(4.0, 0.0)).unwrap();
        tree.build();
        let second = tree.query(Point::new(2.0, 0.0), Point::new(4.0, 0.0)).unwrap();
        assert_eq!(sorted(first), vec![2, 3, 4]);
        assert_eq!(sorted(second), vec![2, 3, 4]);
        assert_eq!(tree.tree_len(), Some(15));
    }

    #[test]
    fn test_small_sizes() {
        for n in 0..6 {
            let points: Vec<Point> = (0..n).map(|i| Point::new(i as f64, -(i as f64))).collect();
            let tree = RangeTree::from_points(&points);
            let all = tree
                .query(Point::new(-1.0, -10.0), Point::new(10.0, 1.0))
                .unwrap();
            assert_eq!(sorted(all), (0..n).collect::<Vec<_>>());
            for (i, &p) in points.iter().enumerate() {
                assert_eq!(tree.query(p, p).unwrap(), vec![i]);
            }
        }
    }

    #[test]
    fn test_duplicates_on_both_axes() {
        let points: Vec<Point> = (0..20)
            .map(|i| Point::new((i % 3) as f64, (i % 4) as f64))
            .collect();
        let tree = RangeTree::from_points(&points);
        let found = tree
            .query(Point::new(1.0, 1.0), Point::new(1.0, 2.0))
            .unwrap();
        let expected: Vec<usize> = (0..20).filter(|i| i % 3 == 1 && (1..=2).contains(&(i % 4))).collect();
        assert_eq!(sorted(found), expected);
    }
}
