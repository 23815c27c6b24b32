//! # cfgdom Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the cfgdom library. Import this module to get quick access to the flowgraph model,
//! the dominator tree and the method-body CFG.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all cfgdom operations
pub use crate::Error;

/// The result type used throughout cfgdom
pub use crate::Result;

/// Configuration for dominator tree construction
pub use crate::DominatorConfig;

// ================================================================================================
// Flowgraph Model
// ================================================================================================

/// Block identity, edges and the ordered one-to-many map
pub use crate::graph::{BlockId, Edge, Multimap};

/// Graph abstraction traits
pub use crate::graph::{Flowgraph, GraphBase, Predecessors, Successors};

/// Concrete adjacency-list graph
pub use crate::graph::DirectedGraph;

// ================================================================================================
// Algorithms
// ================================================================================================

/// Depth-first preorder traversal
pub use crate::graph::algorithms::{preorder, DepthFirstPreorderIterator};

/// Dominator analysis
pub use crate::graph::algorithms::{
    compute_dominators, compute_dominators_rooted, DominatorIterator, DominatorTree,
};

// ================================================================================================
// Control Flow Graphs
// ================================================================================================

/// Method-body flowgraph and edge kinds
pub use crate::cfg::{precompute_dominators, CfgEdgeKind, ControlFlowGraph};
