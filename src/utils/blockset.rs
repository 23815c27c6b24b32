//! Dense block membership sets.
//!
//! Traversals over a method body need a "seen" set keyed by [`BlockId`]. Block
//! ids are dense arena indices, so a bit vector with 64 blocks per word is
//! both smaller and faster than a hash set.

use crate::graph::BlockId;

/// A fixed-capacity set of blocks backed by a bit vector.
///
/// The capacity is the block count of the graph the set describes. Blocks at
/// or beyond the capacity are never members: [`contains`](BlockSet::contains)
/// reports `false` for them and [`insert`](BlockSet::insert) refuses them.
///
/// # Example
///
/// ```rust
/// use cfgdom::{graph::BlockId, utils::BlockSet};
///
/// let mut seen = BlockSet::new(100);
/// assert!(seen.insert(BlockId::new(50)));
/// assert!(!seen.insert(BlockId::new(50)));
/// assert!(!seen.insert(BlockId::new(100)));
///
/// assert!(seen.contains(BlockId::new(50)));
/// assert_eq!(seen.count(), 1);
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BlockSet {
    /// The bits, stored as a vector of words.
    words: Vec<u64>,
    /// The number of addressable blocks.
    len: usize,
}

impl BlockSet {
    /// Creates an empty set able to hold blocks `0..capacity`.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            words: vec![0; capacity.div_ceil(64)],
            len: capacity,
        }
    }

    /// Returns the capacity of this set.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no block is a member.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Adds `block` to the set.
    ///
    /// Returns `true` if the block was newly added, `false` if it was already a
    /// member or lies outside the capacity.
    pub fn insert(&mut self, block: BlockId) -> bool {
        let index = block.index();
        if index >= self.len {
            return false;
        }
        let mask = 1u64 << (index % 64);
        let word = &mut self.words[index / 64];
        let fresh = *word & mask == 0;
        *word |= mask;
        fresh
    }

    /// Returns `true` if `block` is a member.
    #[must_use]
    pub fn contains(&self, block: BlockId) -> bool {
        let index = block.index();
        index < self.len && (self.words[index / 64] & (1u64 << (index % 64))) != 0
    }

    /// Returns the number of member blocks.
    #[must_use]
    pub fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Returns the member blocks in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = BlockId> + '_ {
        self.words.iter().enumerate().flat_map(|(word_idx, &word)| {
            (0..64)
                .filter(move |bit| word & (1u64 << bit) != 0)
                .map(move |bit| BlockId::new(word_idx * 64 + bit))
        })
    }
}

impl std::fmt::Debug for BlockSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
