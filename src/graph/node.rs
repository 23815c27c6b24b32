//! Basic block identifiers.
//!
//! Blocks are compared by identity, never by content: two blocks holding the
//! same instructions are still different blocks. [`BlockId`] makes that
//! identity explicit as a stable arena index assigned when the block is added
//! to a graph, and every analysis keys its tables by it.

use std::fmt;

/// A strongly-typed identifier for a basic block within a flowgraph.
///
/// `BlockId` wraps a `usize` arena index. Ids are assigned sequentially starting
/// from 0 as blocks are added to a [`DirectedGraph`](crate::graph::DirectedGraph)
/// and stay valid for the lifetime of that graph.
///
/// # Examples
///
/// ```rust
/// use cfgdom::graph::{BlockId, DirectedGraph};
///
/// let mut graph: DirectedGraph<&str, ()> = DirectedGraph::new();
/// let entry: BlockId = graph.add_node("entry");
/// let exit: BlockId = graph.add_node("exit");
///
/// assert_ne!(entry, exit);
/// assert_eq!(exit.index(), 1);
/// ```
///
/// # Thread Safety
///
/// `BlockId` is [`Copy`], [`Send`], and [`Sync`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockId(pub(crate) usize);

impl BlockId {
    /// Creates a new `BlockId` from a raw arena index.
    ///
    /// Normal usage obtains ids from [`DirectedGraph::add_node`](crate::graph::DirectedGraph::add_node);
    /// this constructor exists for tests and for graphs built outside this crate.
    #[must_use]
    #[inline]
    pub const fn new(index: usize) -> Self {
        BlockId(index)
    }

    /// Returns the raw arena index of this block.
    #[must_use]
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockId({})", self.0)
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bb{}", self.0)
    }
}

impl From<usize> for BlockId {
    #[inline]
    fn from(index: usize) -> Self {
        BlockId(index)
    }
}

impl From<BlockId> for usize {
    #[inline]
    fn from(block: BlockId) -> Self {
        block.0
    }
}
