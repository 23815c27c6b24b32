//! Depth-first preorder traversal over flowgraphs with several entries.
//!
//! The dominator computation numbers blocks in the order this module yields
//! them. The traversal is an explicit stack, not recursion, so the depth of a
//! long chain of generated basic blocks never turns into native stack depth.
//!
//! # Order
//!
//! The traversal is LIFO: when block `b` is yielded, its successors are pushed
//! in the order `b` lists them, so the *last* successor is visited next. For a
//! block with successors `[A, B, C]` the subtree under `C` is explored before
//! `A` and `B`. Callers must not assume left-to-right sibling order.

use std::collections::HashSet;

use log::warn;

use crate::{
    graph::{BlockId, Edge, Successors},
    utils::BlockSet,
    Error, Result,
};

/// Lazy, single-pass depth-first preorder over one or more root blocks.
///
/// Every block reachable from a root is yielded exactly once, and every edge is
/// followed at most once. Roots are seeded onto the stack in the order given,
/// which means the last root is visited first.
///
/// # Examples
///
/// ```rust
/// use cfgdom::graph::{DirectedGraph, algorithms::DepthFirstPreorderIterator};
///
/// // Diamond: A -> B, A -> C, B -> D, C -> D
/// let mut graph: DirectedGraph<&str, ()> = DirectedGraph::new();
/// let a = graph.add_node("A");
/// let b = graph.add_node("B");
/// let c = graph.add_node("C");
/// let d = graph.add_node("D");
/// graph.add_edge(a, b, ())?;
/// graph.add_edge(a, c, ())?;
/// graph.add_edge(b, d, ())?;
/// graph.add_edge(c, d, ())?;
///
/// let mut iter = DepthFirstPreorderIterator::new(&graph, [a]);
/// let order: Vec<_> = iter.by_ref().collect();
/// assert_eq!(order, vec![a, c, d, b]);
/// assert!(!iter.has_next());
/// assert!(iter.try_next().is_err());
/// # Ok::<(), cfgdom::Error>(())
/// ```
pub struct DepthFirstPreorderIterator<'g, G: Successors> {
    graph: &'g G,
    /// Blocks waiting to be visited; the top is never an already-yielded block
    stack: Vec<BlockId>,
    /// Edges whose target has been pushed
    edges: HashSet<Edge>,
    /// Blocks already yielded
    visited: BlockSet,
}

impl<'g, G: Successors> DepthFirstPreorderIterator<'g, G> {
    /// Creates an iterator seeded with `roots`.
    ///
    /// Roots that are not blocks of `graph` are ignored.
    pub fn new<I>(graph: &'g G, roots: I) -> Self
    where
        I: IntoIterator<Item = BlockId>,
    {
        let node_count = graph.node_count();
        let stack = roots
            .into_iter()
            .filter(|root| {
                let valid = root.index() < node_count;
                if !valid {
                    warn!("ignoring root {root}: graph only has {node_count} blocks");
                }
                valid
            })
            .collect();

        let mut iter = DepthFirstPreorderIterator {
            graph,
            stack,
            edges: HashSet::new(),
            visited: BlockSet::new(node_count),
        };
        iter.discard_visited();
        iter
    }

    /// Returns `true` if another block will be yielded.
    #[must_use]
    pub fn has_next(&self) -> bool {
        !self.stack.is_empty()
    }

    /// Returns the next block in preorder.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Exhausted`] if every reachable block was already yielded.
    pub fn try_next(&mut self) -> Result<BlockId> {
        self.next().ok_or(Error::Exhausted)
    }

    /// Returns the edges followed so far.
    #[must_use]
    pub fn edges_taken(&self) -> &HashSet<Edge> {
        &self.edges
    }

    /// Pops blocks that were already yielded through another edge.
    fn discard_visited(&mut self) {
        while self
            .stack
            .last()
            .is_some_and(|&top| self.visited.contains(top))
        {
            self.stack.pop();
        }
    }
}

impl<G: Successors> Iterator for DepthFirstPreorderIterator<'_, G> {
    type Item = BlockId;

    fn next(&mut self) -> Option<Self::Item> {
        let block = self.stack.pop()?;
        self.visited.insert(block);

        for succ in self.graph.successors(block) {
            if self.visited.contains(succ) {
                continue;
            }
            if self.edges.insert(Edge::new(block, succ)) {
                self.stack.push(succ);
            }
        }

        self.discard_visited();
        Some(block)
    }
}

impl<G: Successors> std::iter::FusedIterator for DepthFirstPreorderIterator<'_, G> {}

/// Collects the depth-first preorder of everything reachable from `roots`.
///
/// # Examples
///
/// ```rust
/// use cfgdom::graph::{DirectedGraph, algorithms::preorder};
///
/// let mut graph: DirectedGraph<(), ()> = DirectedGraph::new();
/// let entry = graph.add_node(());
/// let body = graph.add_node(());
/// let dead = graph.add_node(());
/// graph.add_edge(entry, body, ())?;
///
/// assert_eq!(preorder(&graph, [entry]), vec![entry, body]);
/// assert!(!preorder(&graph, [entry]).contains(&dead));
/// # Ok::<(), cfgdom::Error>(())
/// ```
pub fn preorder<G, I>(graph: &G, roots: I) -> Vec<BlockId>
where
    G: Successors,
    I: IntoIterator<Item = BlockId>,
{
    DepthFirstPreorderIterator::new(graph, roots).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::DirectedGraph;

    fn diamond() -> (DirectedGraph<&'static str, ()>, [BlockId; 4]) {
        let mut graph = DirectedGraph::new();
        let a = graph.add_node("A");
        let b = graph.add_node("B");
        let c = graph.add_node("C");
        let d = graph.add_node("D");
        graph.add_edge(a, b, ()).unwrap();
        graph.add_edge(a, c, ()).unwrap();
        graph.add_edge(b, d, ()).unwrap();
        graph.add_edge(c, d, ()).unwrap();
        (graph, [a, b, c, d])
    }

    #[test]
    fn test_preorder_diamond_visits_each_block_once() {
        let (graph, [a, b, c, d]) = diamond();
        let mut iter = DepthFirstPreorderIterator::new(&graph, [a]);

        let mut seen = Vec::new();
        while iter.has_next() {
            seen.push(iter.try_next().unwrap());
        }

        assert_eq!(seen, vec![a, c, d, b]);
        assert!(matches!(iter.try_next(), Err(Error::Exhausted)));
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn test_preorder_last_successor_first() {
        let mut graph: DirectedGraph<(), ()> = DirectedGraph::new();
        let root = graph.add_node(());
        let first = graph.add_node(());
        let second = graph.add_node(());
        let third = graph.add_node(());
        let nested = graph.add_node(());
        graph.add_edge(root, first, ()).unwrap();
        graph.add_edge(root, second, ()).unwrap();
        graph.add_edge(root, third, ()).unwrap();
        graph.add_edge(third, nested, ()).unwrap();

        assert_eq!(
            preorder(&graph, [root]),
            vec![root, third, nested, second, first]
        );
    }

    #[test]
    fn test_preorder_multiple_roots_last_root_first() {
        let mut graph: DirectedGraph<(), ()> = DirectedGraph::new();
        let entry = graph.add_node(());
        let body = graph.add_node(());
        let handler = graph.add_node(());
        graph.add_edge(entry, body, ()).unwrap();
        graph.add_edge(handler, body, ()).unwrap();

        let order = preorder(&graph, [entry, handler]);
        assert_eq!(order, vec![handler, body, entry]);
    }

    #[test]
    fn test_preorder_cycle_terminates() {
        let mut graph: DirectedGraph<(), ()> = DirectedGraph::new();
        let a = graph.add_node(());
        let b = graph.add_node(());
        let c = graph.add_node(());
        graph.add_edge(a, b, ()).unwrap();
        graph.add_edge(b, c, ()).unwrap();
        graph.add_edge(c, b, ()).unwrap();
        graph.add_edge(c, c, ()).unwrap();

        assert_eq!(preorder(&graph, [a]), vec![a, b, c]);
    }

    #[test]
    fn test_preorder_edges_taken_once() {
        let (graph, [a, b, c, d]) = diamond();
        let mut iter = DepthFirstPreorderIterator::new(&graph, [a]);
        iter.by_ref().for_each(drop);

        let edges = iter.edges_taken();
        assert!(edges.contains(&Edge::new(a, b)));
        assert!(edges.contains(&Edge::new(a, c)));
        assert!(edges.contains(&Edge::new(c, d)));
        // D was already yielded when B was visited
        assert!(!edges.contains(&Edge::new(b, d)));
    }

    #[test]
    fn test_preorder_has_next_exact_with_duplicates_on_stack() {
        // Both A and B push C before it is visited
        let mut graph: DirectedGraph<(), ()> = DirectedGraph::new();
        let a = graph.add_node(());
        let b = graph.add_node(());
        let c = graph.add_node(());
        graph.add_edge(a, c, ()).unwrap();
        graph.add_edge(a, b, ()).unwrap();
        graph.add_edge(b, c, ()).unwrap();

        let mut iter = DepthFirstPreorderIterator::new(&graph, [a]);
        assert_eq!(iter.next(), Some(a));
        assert_eq!(iter.next(), Some(b));
        assert_eq!(iter.next(), Some(c));
        assert!(!iter.has_next());
    }

    #[test]
    fn test_preorder_duplicate_and_invalid_roots() {
        let (graph, [a, b, c, d]) = diamond();
        let order = preorder(&graph, [a, BlockId::new(99), a]);
        assert_eq!(order, vec![a, c, d, b]);

        let mut empty = DepthFirstPreorderIterator::new(&graph, [BlockId::new(42)]);
        assert!(!empty.has_next());
        assert!(empty.try_next().is_err());
    }
}
