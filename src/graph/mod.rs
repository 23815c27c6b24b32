//! Flowgraph model and dominance algorithms.
//!
//! The module is split into an abstract side and a concrete side:
//!
//! - [`GraphBase`], [`Successors`], [`Predecessors`] and [`Flowgraph`] describe
//!   what the algorithms need from a graph. Any code generator representation
//!   can implement them.
//! - [`DirectedGraph`] is a ready-made adjacency-list graph with node and edge
//!   payloads that implements those traits.
//!
//! Blocks are identified by [`BlockId`], an index into the graph's block
//! arena. Two blocks are the same block exactly when their ids are equal.
//!
//! # Example
//!
//! ```rust
//! use cfgdom::graph::{DirectedGraph, algorithms::compute_dominators};
//!
//! let mut graph: DirectedGraph<&str, ()> = DirectedGraph::new();
//! let entry = graph.add_node("entry");
//! let exit = graph.add_node("exit");
//! graph.add_edge(entry, exit, ())?;
//!
//! let tree = compute_dominators(&graph, entry);
//! assert!(tree.dominates(entry, exit));
//! # Ok::<(), cfgdom::Error>(())
//! ```

mod directed;
mod edge;
mod multimap;
mod node;
mod traits;

pub mod algorithms;

pub use directed::DirectedGraph;
pub use edge::Edge;
pub use multimap::Multimap;
pub use node::BlockId;
pub use traits::{Flowgraph, GraphBase, Predecessors, Successors};
