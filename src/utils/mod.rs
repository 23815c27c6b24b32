//! Small utilities shared by the graph algorithms and the CFG front.

mod blockset;
mod dot;

pub use blockset::BlockSet;
pub use dot::{dot_node_name, escape_dot};
