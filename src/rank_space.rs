//! Rank-space reduction of float coordinates.
//!
//! Every coordinate is replaced by its lower-bound position in the sorted
//! sequence of that axis, so the tree only ever handles dense integers in
//! `[0, n)`. Equal coordinates share a rank.
//!
//! The canonical [`RankedPoint`] list stays in input order. The two sorted
//! views the builders need are index permutations, ordered by
//! `(rank, original index)` so that points sharing a coordinate are placed
//! deterministically.
//!
//! NaN coordinates sort after every number and never fall inside a query
//! rectangle.

use std::cmp::Ordering;

use crate::Point;

/// A point expressed in rank space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankedPoint {
    /// Lower-bound position of `x` among all x coordinates.
    pub x_rank: usize,
    /// Lower-bound position of `y` among all y coordinates.
    pub y_rank: usize,
    /// Position of the point in the input collection.
    pub index: usize,
}

/// A query rectangle mapped to half-open rank intervals on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankRect {
    /// First x rank inside the rectangle.
    pub x_from: usize,
    /// One past the last x rank inside the rectangle.
    pub x_to: usize,
    /// First y rank inside the rectangle.
    pub y_from: usize,
    /// One past the last y rank inside the rectangle.
    pub y_to: usize,
}

/// Rank-space mapping of a fixed point set.
#[derive(Debug, Clone, Default)]
pub struct RankSpace {
    ranked: Vec<RankedPoint>,
    x_coords: Vec<f64>,
    y_coords: Vec<f64>,
    x_order: Vec<usize>,
    y_order: Vec<usize>,
}

/// Numeric order with NaN above everything. `-0.0` and `0.0` compare equal.
fn coord_cmp(a: &f64, b: &f64) -> Ordering {
    a.partial_cmp(b)
        .unwrap_or_else(|| a.is_nan().cmp(&b.is_nan()))
}

/// First index whose value is `>= target`.
pub fn lower_bound(sorted: &[f64], target: f64) -> usize {
    sorted.partition_point(|c| coord_cmp(c, &target) == Ordering::Less)
}

/// First index whose value is `> target`.
pub fn upper_bound(sorted: &[f64], target: f64) -> usize {
    sorted.partition_point(|c| coord_cmp(c, &target) != Ordering::Greater)
}

impl RankSpace {
    /// Map `points` to rank space. O(n log n).
    pub fn new(points: &[Point]) -> Self {
        let mut x_coords: Vec<f64> = points.iter().map(|p| p.x).collect();
        let mut y_coords: Vec<f64> = points.iter().map(|p| p.y).collect();
        x_coords.sort_unstable_by(coord_cmp);
        y_coords.sort_unstable_by(coord_cmp);

        let ranked: Vec<RankedPoint> = points
            .iter()
            .enumerate()
            .map(|(index, p)| RankedPoint {
                x_rank: lower_bound(&x_coords, p.x),
                y_rank: lower_bound(&y_coords, p.y),
                index,
            })
            .collect();

        let mut x_order: Vec<usize> = (0..ranked.len()).collect();
        let mut y_order = x_order.clone();
        x_order.sort_unstable_by_key(|&i| (ranked[i].x_rank, i));
        y_order.sort_unstable_by_key(|&i| (ranked[i].y_rank, i));

        Self {
            ranked,
            x_coords,
            y_coords,
            x_order,
            y_order,
        }
    }

    /// Number of mapped points.
    pub fn len(&self) -> usize {
        self.ranked.len()
    }

    /// Return true if no points were mapped.
    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }

    /// Ranked points, in input order.
    pub fn ranked(&self) -> &[RankedPoint] {
        &self.ranked
    }

    /// Original indices sorted by `(x_rank, index)`.
    ///
    /// Position `j` in this view is the point's *x slot*: the leaf it
    /// occupies in the tree.
    pub fn x_order(&self) -> &[usize] {
        &self.x_order
    }

    /// Original indices sorted by `(y_rank, index)`.
    pub fn y_order(&self) -> &[usize] {
        &self.y_order
    }

    /// Inverse of [`x_order`](Self::x_order): the x slot of every point.
    pub fn x_slots(&self) -> Vec<usize> {
        let mut slots = vec![0; self.x_order.len()];
        for (slot, &i) in self.x_order.iter().enumerate() {
            slots[i] = slot;
        }
        slots
    }

    /// Map a closed rectangle to half-open rank intervals.
    ///
    /// The lower corner maps by lower bound, the upper corner by strict upper
    /// bound, so duplicate coordinates and values between grid points are
    /// handled without special cases. Because ties are contiguous in both
    /// sorted views, the same intervals are valid as slot ranges.
    pub fn map_rect(&self, bottom_left: Point, top_right: Point) -> RankRect {
        RankRect {
            x_from: lower_bound(&self.x_coords, bottom_left.x),
            x_to: upper_bound(&self.x_coords, top_right.x),
            y_from: lower_bound(&self.y_coords, bottom_left.y),
            y_to: upper_bound(&self.y_coords, top_right.y),
        }
    }

    /// Approximate heap memory usage in bytes.
    pub fn heap_bytes(&self) -> usize {
        self.ranked.capacity() * std::mem::size_of::<RankedPoint>()
            + (self.x_coords.capacity() + self.y_coords.capacity()) * 8
            + (self.x_order.capacity() + self.y_order.capacity()) * std::mem::size_of::<usize>()
    }
}
