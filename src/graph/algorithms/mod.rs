//! Graph algorithms for code generation.
//!
//! # Available Algorithms
//!
//! ## Traversal
//!
//! - [`DepthFirstPreorderIterator`] - Lazy depth-first preorder over several roots
//! - [`preorder`] - Collects that preorder into a vector
//!
//! ## Dominator Analysis
//!
//! - [`compute_dominators`] - Dominator tree of everything reachable from one root
//! - [`compute_dominators_rooted`] - Dominator tree from all roots of a [`Flowgraph`](crate::graph::Flowgraph)
//! - [`DominatorTree`] - Immediate dominators, dominator tree, dominance
//!   frontiers and dominator-respecting traversal orders
//!
//! # Algorithm Selection
//!
//! | Algorithm | Time Complexity | Use Case |
//! |-----------|-----------------|----------|
//! | Preorder | O(V + E) | Numbering, reachability |
//! | Dominators | O((V + E) log V) | Verification, code motion, SSA placement |
//! | Frontiers | O(V + E + size of DF) | Phi placement, merge points |
//!
//! # Examples
//!
//! ```rust
//! use cfgdom::graph::{DirectedGraph, algorithms};
//!
//! let mut graph: DirectedGraph<&str, ()> = DirectedGraph::new();
//! let entry = graph.add_node("entry");
//! let body = graph.add_node("body");
//! let handler = graph.add_node("handler");
//! graph.add_edge(entry, body, ())?;
//! graph.add_edge(handler, body, ())?;
//!
//! let order = algorithms::preorder(&graph, [entry, handler]);
//! assert_eq!(order.len(), 3);
//!
//! let tree = algorithms::DominatorTree::with_roots(&graph, [entry, handler])?;
//! assert_eq!(tree.immediate_dominator(entry), None);
//! assert_eq!(tree.immediate_dominator(handler), None);
//! assert!(tree.immediate_dominator(body).is_some());
//! # Ok::<(), cfgdom::Error>(())
//! ```

mod dominators;
mod traversal;

pub use dominators::{
    compute_dominators, compute_dominators_rooted, DominatorIterator, DominatorTree,
};
pub use traversal::{preorder, DepthFirstPreorderIterator};
