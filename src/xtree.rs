//! Complete binary tree over x slots, stored in heap order.
//!
//! Node `i` has children `2i + 1` and `2i + 2`. For `P` leaves the array
//! holds `2P - 1` nodes: `[0, P - 1)` are internal, `[P - 1, 2P - 1)` are
//! leaves. Leaf `P - 1 + j` holds x slot `j` for `j < n`; the remaining
//! leaves are empty. An internal node's key is the largest slot in its left
//! subtree, which is exactly the routing rule used by the cascade:
//! `slot <= key` goes left.
//!
//! # Theory
//!
//! Since the populated leaves form a contiguous prefix, two leaves at equal
//! depth share the ancestors spelled by the common prefix of their 1-based
//! heap indices. The lowest common ancestor is therefore one XOR, one
//! leading-zero count and one shift away.

/// Key stored in a tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// No populated leaf below this node.
    Empty,
    /// The left subtree is empty but the right one is not.
    Infinity,
    /// Leaf: its own slot. Internal node: the largest slot in the left subtree.
    Slot(usize),
}

impl Key {
    /// Return true if `slot` is routed to the left child of a node with this key.
    pub fn routes_left(self, slot: usize) -> bool {
        match self {
            Key::Empty => false,
            Key::Infinity => true,
            Key::Slot(key) => slot <= key,
        }
    }

    /// Return true if every slot of the left subtree is strictly below `bound`.
    pub fn is_below(self, bound: usize) -> bool {
        matches!(self, Key::Slot(key) if key < bound)
    }
}

/// Smallest power of two `>= n`, with `n <= 2` returned unchanged.
pub fn next_power_of_two(n: usize) -> usize {
    if n <= 2 {
        n
    } else {
        n.next_power_of_two()
    }
}

/// Lowest common ancestor of two nodes at the same depth.
pub fn lowest_common_ancestor(left: usize, right: usize) -> usize {
    let xor = ((left + 1) ^ (right + 1)) as u64;
    let shift = u64::BITS - xor.leading_zeros();
    ((left + 1) >> shift) - 1
}

/// Branches taken on the way from the root to `node`: `false` for left,
/// `true` for right.
pub fn branches_to(node: usize) -> impl Iterator<Item = bool> {
    let heap = node + 1;
    let depth = usize::BITS - 1 - heap.leading_zeros();
    (0..depth).rev().map(move |k| (heap >> k) & 1 == 1)
}

/// Heap-ordered tree over the x slots `[0, n)`.
#[derive(Debug, Clone, Default)]
pub struct XTree {
    nodes: Vec<Key>,
    leaves: usize,
    points: usize,
    height: usize,
}

impl XTree {
    /// Build the tree for `n` points.
    pub fn new(n: usize) -> Self {
        let leaves = next_power_of_two(n);
        if leaves == 0 {
            return Self::default();
        }
        let len = 2 * leaves - 1;
        let first_leaf = leaves - 1;

        let mut nodes = vec![Key::Empty; len];
        // Largest populated slot below each node.
        let mut max_slot: Vec<Option<usize>> = vec![None; len];
        for slot in 0..n {
            nodes[first_leaf + slot] = Key::Slot(slot);
            max_slot[first_leaf + slot] = Some(slot);
        }

        for i in (0..first_leaf).rev() {
            let (left, right) = (max_slot[2 * i + 1], max_slot[2 * i + 2]);
            nodes[i] = match (left, right) {
                (None, None) => Key::Empty,
                (Some(key), _) => Key::Slot(key),
                (None, Some(_)) => Key::Infinity,
            };
            max_slot[i] = right.or(left);
        }

        let mut height = 1;
        while (1usize << height) < len {
            height += 1;
        }

        Self {
            nodes,
            leaves,
            points: n,
            height,
        }
    }

    /// Number of nodes in the array.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Return true if the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes on a root-to-leaf path, both ends included.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of populated leaves.
    pub fn points(&self) -> usize {
        self.points
    }

    /// Number of internal nodes; also the index of the first leaf.
    pub fn internal_nodes(&self) -> usize {
        self.leaves.saturating_sub(1)
    }

    /// All keys, in heap order.
    pub fn keys(&self) -> &[Key] {
        &self.nodes
    }

    /// Key of `node`.
    pub fn key(&self, node: usize) -> Key {
        self.nodes[node]
    }

    /// Return true if `node` is a leaf.
    pub fn is_leaf(&self, node: usize) -> bool {
        node >= self.internal_nodes()
    }

    /// Heap index of the leaf for `slot`. May point one past the array.
    pub fn leaf(&self, slot: usize) -> usize {
        self.internal_nodes() + slot
    }

    /// Slot stored at leaf `node`, or `None` for an empty leaf.
    pub fn slot_of(&self, node: usize) -> Option<usize> {
        match self.nodes.get(node) {
            Some(Key::Slot(slot)) if self.is_leaf(node) => Some(*slot),
            _ => None,
        }
    }

    /// Approximate heap memory usage in bytes.
    pub fn heap_bytes(&self) -> usize {
        self.nodes.capacity() * std::mem::size_of::<Key>()
    }
}
