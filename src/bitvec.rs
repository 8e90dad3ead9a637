//! Rank-only succinct bit vector backing the cascade.
//!
//! Implements the Rank9 indexing scheme with an interleaved (blocked) layout.
//! Every internal node of the range tree owns one of these; the query path
//! only ever asks "how many 1-bits precede position `i`", so no select index
//! is kept.
//!
//! # Layout
//!
//! Each 512-bit block is stored as 10 x 64-bit words:
//! - Word 0: Absolute rank (number of 1s before this block)
//! - Word 1: Relative ranks (7 x 9-bit cumulative counts within the block)
//! - Word 2-9: Raw data (512 bits)
//!
//! A trailing sentinel block makes `rank1(len)` branch-free when `len` is a
//! multiple of 512.

const BLOCK_BITS: usize = 512;
const BLOCK_WORDS: usize = 10;

/// A succinct bit vector with constant-time `rank1`.
pub struct BitVector {
    /// Interleaved data: [abs_rank, rel_ranks, data0, ..., data7, ...]
    storage: Vec<u64>,
    len: usize,
}

impl std::fmt::Debug for BitVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BitVector")
            .field("len", &self.len)
            .field("ones", &self.rank1(self.len))
            .finish()
    }
}

impl BitVector {
    /// Create a new BitVector from packed little-endian words.
    ///
    /// Bit `i` is bit `i % 64` of `bits[i / 64]`. Words past `bits.len()` read
    /// as zero.
    pub fn new(bits: &[u64], len: usize) -> Self {
        let num_blocks = len.div_ceil(BLOCK_BITS);
        let mut storage = vec![0u64; (num_blocks + 1) * BLOCK_WORDS];
        let mut total_rank = 0u64;

        for i in 0..num_blocks {
            let base = i * BLOCK_WORDS;
            storage[base] = total_rank;

            let mut relative_ranks = 0u64;
            let mut current_rel = 0u64;
            for j in 0..8 {
                let word = bits.get(i * 8 + j).copied().unwrap_or(0);
                storage[base + 2 + j] = word;
                if j > 0 {
                    relative_ranks |= current_rel << (9 * (j - 1));
                }
                current_rel += word.count_ones() as u64;
            }
            storage[base + 1] = relative_ranks;
            total_rank += current_rel;
        }
        storage[num_blocks * BLOCK_WORDS] = total_rank;

        Self { storage, len }
    }

    /// Create a BitVector from a sequence of bits, first bit at position 0.
    pub fn from_bits<I: IntoIterator<Item = bool>>(bits: I) -> Self {
        let mut words = Vec::new();
        let mut len = 0usize;
        for bit in bits {
            if len % 64 == 0 {
                words.push(0u64);
            }
            if bit {
                words[len / 64] |= 1u64 << (len % 64);
            }
            len += 1;
        }
        Self::new(&words, len)
    }

    /// Return the total number of bits in the vector.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Return true if the bit-vector has length 0.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Approximate heap memory usage in bytes.
    pub fn heap_bytes(&self) -> usize {
        self.storage.capacity() * 8
    }

    /// Return true if the bit at index `i` is set.
    pub fn get(&self, i: usize) -> bool {
        if i >= self.len {
            return false;
        }
        let word = self.storage[(i / BLOCK_BITS) * BLOCK_WORDS + 2 + (i % BLOCK_BITS) / 64];
        (word & (1u64 << (i % 64))) != 0
    }

    /// Return the number of set bits in the range [0, i).
    ///
    /// `i` is clamped to `len`.
    pub fn rank1(&self, i: usize) -> usize {
        if i == 0 {
            return 0;
        }
        let i = i.min(self.len);
        let block_idx = i / BLOCK_BITS;
        let sub_block_idx = (i % BLOCK_BITS) / 64;
        let bit_offset = i % 64;

        let base = block_idx * BLOCK_WORDS;
        let mut rank = self.storage[base] as usize;

        if sub_block_idx > 0 {
            let relative_ranks = self.storage[base + 1];
            rank += ((relative_ranks >> (9 * (sub_block_idx - 1))) & 0x1FF) as usize;
        }

        let word = self.storage[base + 2 + sub_block_idx];
        rank += (word & ((1u64 << bit_offset) - 1)).count_ones() as usize;

        rank
    }

    /// Return the number of unset bits in the range [0, i).
    pub fn rank0(&self, i: usize) -> usize {
        i.min(self.len) - self.rank1(i)
    }
}
