//! Control flow graphs of method bodies.
//!
//! - [`ControlFlowGraph`] - Blocks, typed edges, handler roots and cached dominators
//! - [`CfgEdgeKind`] - How control transfers along an edge
//! - [`precompute_dominators`] - Parallel dominator computation for many bodies

mod edge;
mod graph;

pub use edge::CfgEdgeKind;
pub use graph::{precompute_dominators, ControlFlowGraph};
