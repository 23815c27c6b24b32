use thiserror::Error;

use crate::graph::BlockId;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which covers every failure this library can report.
///
/// The dominator core is a pure computation over caller-supplied graphs, so the
/// taxonomy is narrow: misuse of the preorder iterator, invalid input (no roots,
/// blocks that are not part of the graph), and inconsistencies detected by
/// [`DominatorTree::verify`](crate::graph::algorithms::DominatorTree::verify).
///
/// # Error Categories
///
/// ## Traversal Errors
/// - [`Error::Exhausted`] - A preorder iterator was advanced past its last block
///
/// ## Input Errors
/// - [`Error::NoRoots`] - A dominator tree was requested without any root block
/// - [`Error::InvalidBlock`] - A block id does not belong to the graph
/// - [`Error::TooManyBlocks`] - The reachable region exceeds the configured limit
/// - [`Error::GraphError`] - General graph construction failure
///
/// ## Verification Errors
/// - [`Error::Malformed`] - A computed structure violates a dominance invariant
///
/// # Examples
///
/// ```rust
/// use cfgdom::{Error, graph::{DirectedGraph, algorithms::DominatorTree}};
///
/// let graph: DirectedGraph<(), ()> = DirectedGraph::new();
/// match DominatorTree::with_roots(&graph, Vec::new()) {
///     Err(Error::NoRoots) => println!("nothing to analyze"),
///     Err(e) => println!("Other error: {e}"),
///     Ok(tree) => println!("{} reachable blocks", tree.len()),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The depth-first preorder iterator has no more blocks.
    ///
    /// Requesting another block after `has_next()` returned `false` is a
    /// programming error on the caller's side; it is never retried.
    #[error("Depth-first iterator is exhausted")]
    Exhausted,

    /// A dominator tree needs at least one root block.
    #[error("At least one root block is required")]
    NoRoots,

    /// The block is not part of the graph.
    ///
    /// Raised when an edge endpoint, a root, or an exception handler entry
    /// refers to an index the graph never allocated.
    #[error("Block {0} is not part of the graph")]
    InvalidBlock(BlockId),

    /// The reachable region is larger than the configured maximum.
    ///
    /// The associated value is the limit that was exceeded.
    #[error("Flowgraph exceeds the maximum of {0} reachable blocks")]
    TooManyBlocks(usize),

    /// A computed dominance structure is inconsistent.
    ///
    /// This error indicates that the input graph changed underneath the
    /// computation or that a dominance invariant does not hold. The error
    /// includes the source location where the violation was detected.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of the violated invariant
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// General graph construction error.
    #[error("{0}")]
    GraphError(String),
}
