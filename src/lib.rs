//! # Orthogonal Range Search
//!
//! *Preprocess a static point set once, then report the points inside any
//! axis-aligned rectangle in $O(\log n + k)$.*
//!
//! ## Intuition First
//!
//! Sort the points by x and hang them off a balanced binary tree. Any x
//! interval is then the union of $O(\log n)$ subtrees. If every subtree also
//! kept its points sorted by y, each one would answer the y half of the
//! question with a binary search: $O(\log^2 n)$ in total.
//!
//! The trick is to binary search only once, at the root. Each node stores a
//! bit per point telling whether it went left or right; counting 1-bits
//! before a position translates a y interval from a node to its child in
//! constant time. The interval found at the root is carried all the way down.
//!
//! ## Historical Context
//!
//! ```text
//! 1979  Bentley     Multidimensional range trees
//! 1986  Chazelle &  Fractional cascading: one search, many catalogues
//!       Guibas
//! 1988  Chazelle    Functional approach; rank-space reduction and
//!                   "ball inheritance"
//! 1989  Jacobson    Succinct rank/select bit vectors
//! 2008  Vigna       Rank9: broadword rank in two cache lines
//! ```
//!
//! ## Mathematical Formulation
//!
//! Given $P = \{p_0, \ldots, p_{n-1}\} \subset \mathbb{R}^2$ and a query
//! $[x_1, x_2] \times [y_1, y_2]$, report
//! $\{ i : x_1 \le p_i.x \le x_2,\ y_1 \le p_i.y \le y_2 \}$.
//!
//! ## Complexity Analysis
//!
//! - **Build**: $O(n \log n)$ time, $O(n \log n)$ words.
//! - **Query**: $O(\log n + k)$ for $k$ reported points.
//!
//! ## What Could Go Wrong
//!
//! 1. **Duplicate coordinates**: ranks collapse, so leaves are addressed by
//!    slot (position in x order, ties by input index) rather than by rank.
//! 2. **Static only**: inserting a point means rebuilding everything.
//!
//! ## Implementation Notes
//!
//! - [`RangeTree`]: the cascaded range tree.
//! - [`BruteForce`]: linear scan with the same interface, used as an oracle.
//! - [`BitVector`]: Rank9 rank support for the per-node bit vectors.
//!
//! ## References
//!
//! - Chazelle, B. (1988). "A functional approach to data structures and its
//!   use in multidimensional searching."
//! - Vigna, S. (2008). "Broadword implementation of rank/select queries."

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bitvec;
pub mod brute_force;
pub mod cascade;
pub mod error;
pub mod range_tree;
pub mod rank_space;
pub mod xtree;

pub use bitvec::BitVector;
pub use brute_force::BruteForce;
pub use error::{Error, Result};
pub use range_tree::RangeTree;

/// A point in the plane.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Create a point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Return true if the point lies in the closed rectangle spanned by the
    /// two corners.
    pub fn is_within(&self, bottom_left: Point, top_right: Point) -> bool {
        self.x >= bottom_left.x
            && self.x <= top_right.x
            && self.y >= bottom_left.y
            && self.y <= top_right.y
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// A static structure answering orthogonal range queries over a fixed
/// point set.
pub trait RangeSearch {
    /// Preprocess the points. Calling it again is a no-op.
    fn build(&mut self);

    /// Indices of all points `p` with `bottom_left.x <= p.x <= top_right.x`
    /// and `bottom_left.y <= p.y <= top_right.y`.
    ///
    /// Indices are distinct and returned in no particular order.
    fn query(&self, bottom_left: Point, top_right: Point) -> Result<Vec<usize>>;

    /// Number of indexed points.
    fn len(&self) -> usize;

    /// Return true if no points are indexed.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Reject corners that do not span a rectangle, NaN included.
pub(crate) fn validate_rect(bottom_left: Point, top_right: Point) -> Result<()> {
    if bottom_left.x <= top_right.x && bottom_left.y <= top_right.y {
        Ok(())
    } else {
        Err(Error::InvalidRectangle {
            bottom_left,
            top_right,
        })
    }
}
