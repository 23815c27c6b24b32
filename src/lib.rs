// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]

//! # cfgdom
//!
//! Flowgraph traversal and dominator analysis for bytecode code generators.
//!
//! A code generator that emits stack-machine bytecode needs to know, for every
//! basic block, which blocks must run before it. `cfgdom` answers that with the
//! Lengauer-Tarjan algorithm and derives the views a backend uses from it:
//! the dominator tree, dominance frontiers, and traversal orders in which every
//! block comes after (or before) its immediate dominator.
//!
//! ## Features
//!
//! - **Multiple roots** - Exception handler entries are analyzed as extra roots
//! - **Explicit-stack traversal** - No recursion, so deep block chains cannot overflow the stack
//! - **Lazy views** - Tree, frontiers and orders are computed on first use and cached
//! - **Parallel warm-up** - Dominators of many method bodies computed with rayon
//! - **Self-checking** - [`DominatorTree::verify`](graph::algorithms::DominatorTree::verify) validates the result
//!
//! ## Quick Start
//!
//! ```rust
//! use cfgdom::prelude::*;
//!
//! // entry -> loop; loop -> loop; loop -> exit; handler -> exit
//! let mut cfg = ControlFlowGraph::new();
//! let entry = cfg.add_block("entry");
//! let body = cfg.add_block("loop");
//! let exit = cfg.add_block("exit");
//! let handler = cfg.add_block("catch");
//! cfg.add_edge(entry, body, CfgEdgeKind::Unconditional)?;
//! cfg.add_edge(body, body, CfgEdgeKind::ConditionalTrue)?;
//! cfg.add_edge(body, exit, CfgEdgeKind::ConditionalFalse)?;
//! cfg.add_edge(handler, exit, CfgEdgeKind::Unconditional)?;
//! cfg.add_exception_handler(handler)?;
//!
//! let dominators = cfg.dominators()?;
//! assert_eq!(dominators.immediate_dominator(body), Some(entry));
//! assert!(dominators.dominance_frontiers().contains(&body, &body));
//!
//! for block in dominators.topological_traversal() {
//!     println!("{block}");
//! }
//! # Ok::<(), cfgdom::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`graph`] - Block ids, flowgraph traits, [`graph::DirectedGraph`] and [`graph::Multimap`]
//! - [`graph::algorithms`] - Depth-first preorder and the dominator tree
//! - [`cfg`] - A concrete method-body flowgraph with handler roots and Graphviz output
//! - [`config`] - Validation settings for dominator construction
//! - [`Error`] and [`Result`] - Error handling
//!
//! ## Logging
//!
//! The crate logs through the [`log`](https://docs.rs/log) facade and never
//! installs a logger. Tree construction is reported at `debug`, bucket
//! resolution at `trace`, and ignored roots or unreachable blocks at `warn`.
//!
//! ## Development
//!
//! ```bash
//! cargo test
//! cargo bench --bench dominators
//! ```

#[macro_use]
pub(crate) mod error;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use cfgdom::prelude::*;
///
/// let mut graph: DirectedGraph<(), ()> = DirectedGraph::new();
/// let root = graph.add_node(());
/// let tree = DominatorTree::new(&graph, root);
/// assert_eq!(tree.len(), 1);
/// ```
pub mod prelude;

/// Flowgraph model and dominance algorithms.
pub mod graph;

/// Control flow graphs of method bodies.
///
/// [`cfg::ControlFlowGraph`] is a ready-to-use flowgraph: block 0 is the
/// method entry, exception handler entries are extra roots, and the dominator
/// tree is cached until the graph changes.
pub mod cfg;

/// Configuration for dominator tree construction.
pub mod config;

/// Helpers for rendering flowgraphs and tracking visited blocks.
pub mod utils;

/// `cfgdom` Result type
///
/// A type alias for `std::result::Result<T, Error>`.
///
/// # Examples
///
/// ```rust
/// use cfgdom::{Result, graph::{BlockId, DirectedGraph, algorithms::DominatorTree}};
///
/// fn analyze(graph: &DirectedGraph<(), ()>, roots: &[BlockId]) -> Result<usize> {
///     let tree = DominatorTree::with_roots(graph, roots.iter().copied())?;
///     Ok(tree.len())
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// `cfgdom` Error type
///
/// The main error type for all operations in this crate.
///
/// # Examples
///
/// ```rust
/// use cfgdom::{Error, cfg::ControlFlowGraph};
///
/// let cfg: ControlFlowGraph<()> = ControlFlowGraph::new();
/// match cfg.dominators() {
///     Ok(tree) => println!("{} reachable blocks", tree.len()),
///     Err(Error::GraphError(message)) => println!("Graph error: {message}"),
///     Err(e) => println!("Error: {e}"),
/// }
/// ```
pub use error::Error;

pub use config::DominatorConfig;
