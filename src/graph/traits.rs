//! Trait definitions for the flowgraph abstraction.
//!
//! The dominator core never owns blocks; it only reads edges. These traits are
//! the whole contract a code generator has to satisfy to hand its flowgraph to
//! the algorithms in [`algorithms`](crate::graph::algorithms).
//!
//! - [`GraphBase`] - Block count and block iteration
//! - [`Successors`] - Ordered outgoing edges of a block
//! - [`Predecessors`] - Incoming edges of a block
//! - [`Flowgraph`] - Graphs with one or more designated root blocks
//!
//! # Successor Order
//!
//! `successors` must yield targets in a stable order. The depth-first numbering
//! that feeds Lengauer-Tarjan follows that order, so a graph that reorders its
//! successors between calls produces a different (still valid) numbering.

use crate::graph::BlockId;

/// Base trait providing core graph properties.
pub trait GraphBase {
    /// Returns the number of blocks in the graph.
    ///
    /// Block ids of this graph are exactly `0..node_count()`.
    fn node_count(&self) -> usize;

    /// Returns an iterator over all block identifiers, in ascending order.
    fn node_ids(&self) -> impl Iterator<Item = BlockId>;
}

/// Trait for graphs that support forward edge traversal.
///
/// # Examples
///
/// ```rust
/// use cfgdom::graph::{BlockId, DirectedGraph, Successors};
///
/// let mut graph: DirectedGraph<&str, ()> = DirectedGraph::new();
/// let cond = graph.add_node("if");
/// let then = graph.add_node("then");
/// let other = graph.add_node("else");
/// graph.add_edge(cond, then, ())?;
/// graph.add_edge(cond, other, ())?;
///
/// let targets: Vec<BlockId> = graph.successors(cond).collect();
/// assert_eq!(targets, vec![then, other]);
/// # Ok::<(), cfgdom::Error>(())
/// ```
pub trait Successors: GraphBase {
    /// Returns the successor blocks of `node`, in edge insertion order.
    ///
    /// A block reached by several parallel edges is yielded once per edge.
    ///
    /// # Panics
    ///
    /// May panic if `node` is not a block of the graph.
    fn successors(&self, node: BlockId) -> impl Iterator<Item = BlockId>;
}

/// Trait for graphs that support backward edge traversal.
pub trait Predecessors: GraphBase {
    /// Returns the predecessor blocks of `node`.
    ///
    /// # Panics
    ///
    /// May panic if `node` is not a block of the graph.
    fn predecessors(&self, node: BlockId) -> impl Iterator<Item = BlockId>;
}

/// Trait for flowgraphs with designated root blocks.
///
/// A method body ordinarily has exactly one real entry. Exception handler
/// entries are additional roots: no normal control transfer reaches them, yet
/// the runtime can dispatch to them, so they must be analyzed as reachable.
///
/// # Examples
///
/// ```rust
/// use cfgdom::graph::{BlockId, DirectedGraph, Flowgraph, GraphBase, Successors};
///
/// struct MethodBody {
///     graph: DirectedGraph<&'static str, ()>,
///     handlers: Vec<BlockId>,
/// }
///
/// impl GraphBase for MethodBody {
///     fn node_count(&self) -> usize { self.graph.node_count() }
///     fn node_ids(&self) -> impl Iterator<Item = BlockId> { self.graph.node_ids() }
/// }
///
/// impl Successors for MethodBody {
///     fn successors(&self, node: BlockId) -> impl Iterator<Item = BlockId> {
///         self.graph.successors(node)
///     }
/// }
///
/// impl Flowgraph for MethodBody {
///     fn roots(&self) -> impl Iterator<Item = BlockId> {
///         std::iter::once(BlockId::new(0)).chain(self.handlers.iter().copied())
///     }
/// }
/// ```
pub trait Flowgraph: Successors {
    /// Returns the root blocks: the entry first, then any handler entries.
    fn roots(&self) -> impl Iterator<Item = BlockId>;

    /// Returns the first root, which is the normal entry of the body.
    fn entry(&self) -> Option<BlockId> {
        self.roots().next()
    }
}
