//! Adjacency-list flowgraph storage.
//!
//! [`DirectedGraph`] is the concrete graph the code generator fills while it
//! splits emitted instructions into basic blocks. Blocks live in an arena and
//! are addressed by [`BlockId`]; edges keep their insertion order per source
//! block because that order drives the depth-first numbering of the dominator
//! computation.

use crate::{
    graph::{
        edge::Edge,
        node::BlockId,
        traits::{GraphBase, Predecessors, Successors},
    },
    Error, Result,
};

/// Internal storage for edge data and endpoints.
#[derive(Debug, Clone)]
struct EdgeData<E> {
    /// Endpoints of the edge
    edge: Edge,
    /// User-provided edge data
    data: E,
}

/// A directed multigraph with typed block and edge data.
///
/// - Block data (`N`) - whatever the emitter keeps per basic block
/// - Edge data (`E`) - e.g. the kind of control transfer
///
/// Parallel edges are allowed; a two-way branch whose targets coincide yields
/// the same successor twice.
///
/// # Thread Safety
///
/// `DirectedGraph<N, E>` is [`Send`] and [`Sync`] when both `N` and `E` are.
/// Build it single-threaded, then share it immutably.
///
/// # Examples
///
/// ```rust
/// use cfgdom::graph::{DirectedGraph, Predecessors, Successors};
///
/// let mut graph: DirectedGraph<&str, ()> = DirectedGraph::new();
/// let head = graph.add_node("loop.head");
/// let body = graph.add_node("loop.body");
/// let exit = graph.add_node("loop.exit");
///
/// graph.add_edge(head, body, ())?;
/// graph.add_edge(body, head, ())?;
/// graph.add_edge(head, exit, ())?;
///
/// assert_eq!(graph.successors(head).collect::<Vec<_>>(), vec![body, exit]);
/// assert_eq!(graph.predecessors(head).collect::<Vec<_>>(), vec![body]);
/// # Ok::<(), cfgdom::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct DirectedGraph<N, E> {
    /// Block data storage, indexed by `BlockId`
    nodes: Vec<N>,
    /// Edge storage in insertion order
    edges: Vec<EdgeData<E>>,
    /// Outgoing edge indices per block
    outgoing: Vec<Vec<usize>>,
    /// Incoming edge indices per block
    incoming: Vec<Vec<usize>>,
}

impl<N, E> Default for DirectedGraph<N, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N, E> DirectedGraph<N, E> {
    /// Creates a new empty graph.
    #[must_use]
    pub fn new() -> Self {
        DirectedGraph {
            nodes: Vec::new(),
            edges: Vec::new(),
            outgoing: Vec::new(),
            incoming: Vec::new(),
        }
    }

    /// Creates a new graph with pre-allocated capacity.
    ///
    /// # Arguments
    ///
    /// * `node_capacity` - Expected number of blocks
    /// * `edge_capacity` - Expected number of edges
    #[must_use]
    pub fn with_capacity(node_capacity: usize, edge_capacity: usize) -> Self {
        DirectedGraph {
            nodes: Vec::with_capacity(node_capacity),
            edges: Vec::with_capacity(edge_capacity),
            outgoing: Vec::with_capacity(node_capacity),
            incoming: Vec::with_capacity(node_capacity),
        }
    }

    /// Adds a block and returns its id.
    ///
    /// Ids are assigned sequentially starting from 0.
    pub fn add_node(&mut self, data: N) -> BlockId {
        let id = BlockId::new(self.nodes.len());
        self.nodes.push(data);
        self.outgoing.push(Vec::new());
        self.incoming.push(Vec::new());
        id
    }

    /// Returns the data of `node`, or `None` if the block does not exist.
    #[must_use]
    pub fn node(&self, node: BlockId) -> Option<&N> {
        self.nodes.get(node.index())
    }

    /// Returns mutable data of `node`, or `None` if the block does not exist.
    pub fn node_mut(&mut self, node: BlockId) -> Option<&mut N> {
        self.nodes.get_mut(node.index())
    }

    /// Returns the number of blocks.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns all block ids in ascending order.
    pub fn node_ids(&self) -> impl Iterator<Item = BlockId> + '_ {
        (0..self.nodes.len()).map(BlockId::new)
    }

    /// Returns all blocks together with their data.
    pub fn nodes(&self) -> impl Iterator<Item = (BlockId, &N)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, data)| (BlockId::new(i), data))
    }

    /// Adds the edge `source -> target` with the given data.
    ///
    /// The new edge is appended to the end of `source`'s successor list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBlock`] if either endpoint does not exist.
    pub fn add_edge(&mut self, source: BlockId, target: BlockId, data: E) -> Result<()> {
        if !self.contains_node(source) {
            return Err(Error::InvalidBlock(source));
        }
        if !self.contains_node(target) {
            return Err(Error::InvalidBlock(target));
        }

        let index = self.edges.len();
        self.edges.push(EdgeData {
            edge: Edge::new(source, target),
            data,
        });
        self.outgoing[source.index()].push(index);
        self.incoming[target.index()].push(index);
        Ok(())
    }

    /// Returns the number of edges, counting parallel edges separately.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns every edge with its data, in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (Edge, &E)> + '_ {
        self.edges.iter().map(|e| (e.edge, &e.data))
    }

    /// Returns the successors of `node` in insertion order.
    ///
    /// Yields nothing for blocks that do not exist.
    pub fn successors(&self, node: BlockId) -> impl Iterator<Item = BlockId> + '_ {
        self.outgoing
            .get(node.index())
            .into_iter()
            .flatten()
            .map(move |&index| self.edges[index].edge.to)
    }

    /// Returns the predecessors of `node` in edge insertion order.
    ///
    /// Yields nothing for blocks that do not exist.
    pub fn predecessors(&self, node: BlockId) -> impl Iterator<Item = BlockId> + '_ {
        self.incoming
            .get(node.index())
            .into_iter()
            .flatten()
            .map(move |&index| self.edges[index].edge.from)
    }

    /// Returns the outgoing edges of `node` with their data.
    pub fn outgoing_edges(&self, node: BlockId) -> impl Iterator<Item = (Edge, &E)> + '_ {
        self.outgoing
            .get(node.index())
            .into_iter()
            .flatten()
            .map(move |&index| {
                let stored = &self.edges[index];
                (stored.edge, &stored.data)
            })
    }

    /// Returns the number of outgoing edges of `node`.
    #[must_use]
    pub fn out_degree(&self, node: BlockId) -> usize {
        self.outgoing.get(node.index()).map_or(0, Vec::len)
    }

    /// Returns the number of incoming edges of `node`.
    #[must_use]
    pub fn in_degree(&self, node: BlockId) -> usize {
        self.incoming.get(node.index()).map_or(0, Vec::len)
    }

    /// Returns `true` if the graph has no blocks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the blocks without predecessors.
    ///
    /// In an emitted method body these are the entry block, exception handler
    /// entries, and dead code that nothing jumps to.
    pub fn entry_nodes(&self) -> impl Iterator<Item = BlockId> + '_ {
        self.node_ids().filter(|&n| self.in_degree(n) == 0)
    }

    /// Returns the blocks without successors (returns, throws, dead ends).
    pub fn exit_nodes(&self) -> impl Iterator<Item = BlockId> + '_ {
        self.node_ids().filter(|&n| self.out_degree(n) == 0)
    }

    /// Returns `true` if `node` is a block of this graph.
    #[must_use]
    pub fn contains_node(&self, node: BlockId) -> bool {
        node.index() < self.nodes.len()
    }
}

impl<N, E> GraphBase for DirectedGraph<N, E> {
    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn node_ids(&self) -> impl Iterator<Item = BlockId> {
        (0..self.nodes.len()).map(BlockId::new)
    }
}

impl<N, E> Successors for DirectedGraph<N, E> {
    fn successors(&self, node: BlockId) -> impl Iterator<Item = BlockId> {
        DirectedGraph::successors(self, node)
    }
}

impl<N, E> Predecessors for DirectedGraph<N, E> {
    fn predecessors(&self, node: BlockId) -> impl Iterator<Item = BlockId> {
        DirectedGraph::predecessors(self, node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn if_else() -> (DirectedGraph<&'static str, &'static str>, [BlockId; 4]) {
        let mut graph = DirectedGraph::new();
        let cond = graph.add_node("cond");
        let then = graph.add_node("then");
        let other = graph.add_node("else");
        let join = graph.add_node("join");
        graph.add_edge(cond, then, "true").unwrap();
        graph.add_edge(cond, other, "false").unwrap();
        graph.add_edge(then, join, "jump").unwrap();
        graph.add_edge(other, join, "fallthrough").unwrap();
        (graph, [cond, then, other, join])
    }

    #[test]
    fn test_new_graph_is_empty() {
        let graph: DirectedGraph<(), ()> = DirectedGraph::new();
        assert!(graph.is_empty());
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);

        let sized: DirectedGraph<(), ()> = DirectedGraph::with_capacity(8, 16);
        assert!(sized.is_empty());
    }

    #[test]
    fn test_add_node_assigns_sequential_ids() {
        let mut graph: DirectedGraph<&str, ()> = DirectedGraph::new();
        assert_eq!(graph.add_node("a"), BlockId::new(0));
        assert_eq!(graph.add_node("b"), BlockId::new(1));
        assert_eq!(graph.node(BlockId::new(1)), Some(&"b"));
        assert_eq!(graph.node(BlockId::new(2)), None);

        if let Some(data) = graph.node_mut(BlockId::new(0)) {
            *data = "entry";
        }
        assert_eq!(graph.node(BlockId::new(0)), Some(&"entry"));
    }

    #[test]
    fn test_successor_and_predecessor_order() {
        let (graph, [cond, then, other, join]) = if_else();

        assert_eq!(graph.successors(cond).collect::<Vec<_>>(), vec![then, other]);
        assert_eq!(graph.predecessors(join).collect::<Vec<_>>(), vec![then, other]);
        assert_eq!(graph.out_degree(cond), 2);
        assert_eq!(graph.in_degree(join), 2);
        assert_eq!(graph.edge_count(), 4);
    }

    #[test]
    fn test_outgoing_edges_carry_data() {
        let (graph, [cond, then, other, _]) = if_else();
        let edges: Vec<(Edge, &&str)> = graph.outgoing_edges(cond).collect();
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0], (Edge::new(cond, then), &"true"));
        assert_eq!(edges[1], (Edge::new(cond, other), &"false"));
        assert_eq!(graph.edges().count(), 4);
    }

    #[test]
    fn test_add_edge_rejects_unknown_blocks() {
        let mut graph: DirectedGraph<(), ()> = DirectedGraph::new();
        let a = graph.add_node(());

        let err = graph.add_edge(a, BlockId::new(5), ()).unwrap_err();
        assert!(matches!(err, Error::InvalidBlock(b) if b == BlockId::new(5)));

        let err = graph.add_edge(BlockId::new(9), a, ()).unwrap_err();
        assert!(matches!(err, Error::InvalidBlock(b) if b == BlockId::new(9)));
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_parallel_edges_are_kept() {
        let mut graph: DirectedGraph<(), ()> = DirectedGraph::new();
        let a = graph.add_node(());
        let b = graph.add_node(());
        graph.add_edge(a, b, ()).unwrap();
        graph.add_edge(a, b, ()).unwrap();

        assert_eq!(graph.successors(a).collect::<Vec<_>>(), vec![b, b]);
        assert_eq!(graph.in_degree(b), 2);
    }

    #[test]
    fn test_entry_and_exit_nodes() {
        let (mut graph, [cond, _, _, join]) = if_else();
        let handler = graph.add_node("catch");
        graph.add_edge(handler, join, "jump").unwrap();

        assert_eq!(graph.entry_nodes().collect::<Vec<_>>(), vec![cond, handler]);
        assert_eq!(graph.exit_nodes().collect::<Vec<_>>(), vec![join]);
    }

    #[test]
    fn test_missing_block_has_no_edges() {
        let (graph, _) = if_else();
        let ghost = BlockId::new(100);
        assert_eq!(graph.successors(ghost).count(), 0);
        assert_eq!(graph.predecessors(ghost).count(), 0);
        assert_eq!(graph.out_degree(ghost), 0);
        assert!(!graph.contains_node(ghost));
    }
}
