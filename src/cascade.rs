//! Per-node bit vectors and ball inheritance lists.
//!
//! Every internal node keeps the points below it in y order, as two parallel
//! sequences: one bit per point saying which child it continues to, and the
//! point's original index. A y interval `[lo, hi)` at a node maps to its
//! children with two rank queries, which replaces a binary search at every
//! level of the tree:
//!
//! - left child: `[lo - rank1(lo), hi - rank1(hi))`
//! - right child: `[rank1(lo), rank1(hi))`
//!
//! This is the same descent a wavelet tree uses for `rank`, applied to point
//! ids instead of symbols.

use std::ops::Range;

use crate::bitvec::BitVector;
use crate::rank_space::RankSpace;
use crate::xtree::XTree;

/// Rank/select cascade over the internal nodes of an [`XTree`].
#[derive(Debug, Default)]
pub struct CascadeIndex {
    /// One per internal node; `None` when no point reaches the node.
    bits: Vec<Option<BitVector>>,
    /// Original indices reaching each internal node, in y order.
    balls: Vec<Vec<usize>>,
}

impl CascadeIndex {
    /// Route every point from the root to its leaf in y order. O(n log n).
    pub fn build(tree: &XTree, space: &RankSpace) -> Self {
        let internal = tree.internal_nodes();
        let mut raw: Vec<Vec<bool>> = vec![Vec::new(); internal];
        let mut balls: Vec<Vec<usize>> = vec![Vec::new(); internal];
        let slots = space.x_slots();

        for &index in space.y_order() {
            let slot = slots[index];
            let mut node = 0;
            while !tree.is_leaf(node) {
                let left = tree.key(node).routes_left(slot);
                raw[node].push(!left);
                balls[node].push(index);
                node = if left { 2 * node + 1 } else { 2 * node + 2 };
            }
            debug_assert_eq!(tree.slot_of(node), Some(slot));
        }

        let bits = raw
            .into_iter()
            .map(|b| (!b.is_empty()).then(|| BitVector::from_bits(b)))
            .collect();

        Self { bits, balls }
    }

    /// Bit vector of internal `node`, if any point reaches it.
    pub fn bits(&self, node: usize) -> Option<&BitVector> {
        self.bits.get(node).and_then(Option::as_ref)
    }

    /// Original indices reaching internal `node`, in y order.
    pub fn balls(&self, node: usize) -> &[usize] {
        &self.balls[node]
    }

    fn ones_before(&self, node: usize, i: usize) -> usize {
        self.bits(node).map_or(0, |bv| bv.rank1(i))
    }

    /// Position `i` at `node`, remapped into the left child.
    pub fn descend_left(&self, node: usize, i: usize) -> usize {
        i - self.ones_before(node, i)
    }

    /// Position `i` at `node`, remapped into the right child.
    pub fn descend_right(&self, node: usize, i: usize) -> usize {
        self.ones_before(node, i)
    }

    /// Remap a y interval at `node` into one of its children.
    pub fn child_range(&self, node: usize, ys: &Range<usize>, right: bool) -> Range<usize> {
        if right {
            self.descend_right(node, ys.start)..self.descend_right(node, ys.end)
        } else {
            self.descend_left(node, ys.start)..self.descend_left(node, ys.end)
        }
    }

    /// Total number of bits over all nodes.
    pub fn total_bits(&self) -> usize {
        self.bits.iter().flatten().map(BitVector::len).sum()
    }

    /// Approximate heap memory usage in bytes.
    pub fn heap_bytes(&self) -> usize {
        let bits: usize = self.bits.iter().flatten().map(BitVector::heap_bytes).sum();
        let balls: usize = self
            .balls
            .iter()
            .map(|b| b.capacity() * std::mem::size_of::<usize>())
            .sum();
        bits + balls + self.bits.capacity() * std::mem::size_of::<Option<BitVector>>()
    }
}
