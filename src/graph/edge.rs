//! Flowgraph edges.
//!
//! An [`Edge`] is the ordered pair of blocks a control transfer connects. It
//! carries no payload and exists so traversals can remember which transfers
//! they already followed. Two edges are equal iff both endpoints are the same
//! blocks.

use std::fmt;

use crate::graph::BlockId;

/// A directed control-flow edge `from -> to`.
///
/// # Examples
///
/// ```rust
/// use std::collections::HashSet;
/// use cfgdom::graph::{BlockId, Edge};
///
/// let mut taken = HashSet::new();
/// assert!(taken.insert(Edge::new(BlockId::new(0), BlockId::new(1))));
/// assert!(!taken.insert(Edge::new(BlockId::new(0), BlockId::new(1))));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Edge {
    /// Block the transfer leaves.
    pub from: BlockId,
    /// Block the transfer enters.
    pub to: BlockId,
}

impl Edge {
    /// Creates the edge `from -> to`.
    #[must_use]
    #[inline]
    pub const fn new(from: BlockId, to: BlockId) -> Self {
        Edge { from, to }
    }

    /// Returns `true` if the edge leaves and enters the same block.
    #[must_use]
    #[inline]
    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }

    /// Returns the edge with its endpoints swapped.
    #[must_use]
    #[inline]
    pub const fn reversed(self) -> Self {
        Edge {
            from: self.to,
            to: self.from,
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

impl From<(BlockId, BlockId)> for Edge {
    #[inline]
    fn from((from, to): (BlockId, BlockId)) -> Self {
        Edge { from, to }
    }
}
