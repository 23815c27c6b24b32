//! Control flow graph of one method body.
//!
//! This module provides [`ControlFlowGraph`], the flowgraph a code generator
//! fills while it splits a method body into basic blocks. It owns the block
//! data, knows which blocks are exception handler entries, and caches the
//! dominator tree computed from the entry and those handlers.

use std::{collections::BTreeSet, fmt::Write, sync::OnceLock};

use log::{debug, warn};
use rayon::prelude::*;

use crate::{
    cfg::CfgEdgeKind,
    graph::{
        algorithms::DominatorTree, BlockId, DirectedGraph, Edge, Flowgraph, GraphBase, Multimap,
        Predecessors, Successors,
    },
    utils::{dot_node_name, escape_dot},
    Error::{self, GraphError},
    Result,
};

/// A control flow graph with block data `B`.
///
/// Block 0 is the method entry. Exception handler entries are registered with
/// [`add_exception_handler`](Self::add_exception_handler) and become additional
/// roots of the dominator computation.
///
/// # Lazy Computation
///
/// - [`dominators`](Self::dominators) - Dominator tree (computed on first access)
/// - [`dominance_frontiers`](Self::dominance_frontiers) - Cached inside the tree
///
/// Any structural change ([`add_block`](Self::add_block),
/// [`add_edge`](Self::add_edge), [`add_exception_handler`](Self::add_exception_handler))
/// drops the cached tree.
///
/// # Thread Safety
///
/// `ControlFlowGraph<B>` is [`Send`] and [`Sync`] when `B` is. The cache is a
/// [`OnceLock`], so concurrent readers share one computation.
///
/// # Examples
///
/// ```rust
/// use cfgdom::cfg::{CfgEdgeKind, ControlFlowGraph};
///
/// // try { body } catch { handler }; both continue at join
/// let mut cfg = ControlFlowGraph::new();
/// let entry = cfg.add_block("entry");
/// let body = cfg.add_block("body");
/// let handler = cfg.add_block("handler");
/// let join = cfg.add_block("join");
///
/// cfg.add_edge(entry, body, CfgEdgeKind::Unconditional)?;
/// cfg.add_edge(body, join, CfgEdgeKind::Unconditional)?;
/// cfg.add_edge(handler, join, CfgEdgeKind::Unconditional)?;
/// cfg.add_exception_handler(handler)?;
///
/// let dominators = cfg.dominators()?;
/// assert_eq!(dominators.immediate_dominator(handler), None);
/// assert!(dominators.contains(join));
/// assert!(cfg.unreachable_blocks()?.is_empty());
/// # Ok::<(), cfgdom::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct ControlFlowGraph<B> {
    /// The underlying directed graph structure.
    graph: DirectedGraph<B, CfgEdgeKind>,
    /// Exception handler entry blocks, in registration order.
    handlers: Vec<BlockId>,
    /// Lazily computed dominator tree.
    dominators: OnceLock<DominatorTree>,
}

impl<B> Default for ControlFlowGraph<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B> ControlFlowGraph<B> {
    /// Creates an empty control flow graph.
    #[must_use]
    pub fn new() -> Self {
        Self {
            graph: DirectedGraph::new(),
            handlers: Vec::new(),
            dominators: OnceLock::new(),
        }
    }

    /// Creates an empty control flow graph with room for `block_count` blocks.
    #[must_use]
    pub fn with_capacity(block_count: usize) -> Self {
        Self {
            graph: DirectedGraph::with_capacity(block_count, block_count * 2),
            handlers: Vec::new(),
            dominators: OnceLock::new(),
        }
    }

    /// Adds a basic block and returns its id. The first block added is the entry.
    pub fn add_block(&mut self, data: B) -> BlockId {
        self.dominators.take();
        self.graph.add_node(data)
    }

    /// Adds a control transfer from `from` to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBlock`] if either block does not exist.
    pub fn add_edge(&mut self, from: BlockId, to: BlockId, kind: CfgEdgeKind) -> Result<()> {
        self.graph.add_edge(from, to, kind)?;
        self.dominators.take();
        Ok(())
    }

    /// Registers `block` as the entry of an exception handler.
    ///
    /// Registering the method entry or an already registered handler again
    /// has no effect.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBlock`] if the block does not exist.
    pub fn add_exception_handler(&mut self, block: BlockId) -> Result<()> {
        if !self.graph.contains_node(block) {
            return Err(Error::InvalidBlock(block));
        }
        if self.entry() == Some(block) || self.handlers.contains(&block) {
            debug!("{block} is already a root of the flowgraph");
            return Ok(());
        }

        self.handlers.push(block);
        self.dominators.take();
        Ok(())
    }

    /// Returns the entry block, or `None` if the graph has no blocks.
    #[must_use]
    pub fn entry(&self) -> Option<BlockId> {
        (!self.graph.is_empty()).then_some(BlockId::new(0))
    }

    /// Returns the exception handler entries, in registration order.
    #[must_use]
    pub fn exception_handlers(&self) -> &[BlockId] {
        &self.handlers
    }

    /// Returns the data of `block`, or `None` if the id is invalid.
    #[must_use]
    pub fn block(&self, block: BlockId) -> Option<&B> {
        self.graph.node(block)
    }

    /// Returns mutable data of `block`. Block data does not affect dominance,
    /// so the cached tree is kept.
    pub fn block_mut(&mut self, block: BlockId) -> Option<&mut B> {
        self.graph.node_mut(block)
    }

    /// Returns the number of blocks.
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the successors of `block`, in the order their edges were added.
    pub fn successors(&self, block: BlockId) -> impl Iterator<Item = BlockId> + '_ {
        self.graph.successors(block)
    }

    /// Returns the predecessors of `block`.
    pub fn predecessors(&self, block: BlockId) -> impl Iterator<Item = BlockId> + '_ {
        self.graph.predecessors(block)
    }

    /// Returns the outgoing edges of `block` with their kinds.
    pub fn outgoing_edges(
        &self,
        block: BlockId,
    ) -> impl Iterator<Item = (Edge, &CfgEdgeKind)> + '_ {
        self.graph.outgoing_edges(block)
    }

    /// Returns the dominator tree for this CFG.
    ///
    /// The tree is computed from the entry and every exception handler on
    /// first access and cached until the graph changes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GraphError`] if the graph has no blocks.
    pub fn dominators(&self) -> Result<&DominatorTree> {
        if let Some(tree) = self.dominators.get() {
            return Ok(tree);
        }
        if self.graph.is_empty() {
            return Err(GraphError(
                "Cannot compute dominators of an empty CFG".to_string(),
            ));
        }

        let tree = DominatorTree::from_flowgraph(self)?;
        Ok(self.dominators.get_or_init(|| tree))
    }

    /// Returns the dominance frontiers for this CFG.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GraphError`] if the graph has no blocks.
    pub fn dominance_frontiers(&self) -> Result<&Multimap<BlockId, BlockId>> {
        Ok(self.dominators()?.dominance_frontiers())
    }

    /// Returns the blocks that neither the entry nor any handler reaches.
    ///
    /// A verified method body has none; a non-empty result means the
    /// generator emitted dead code.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GraphError`] if the graph has no blocks.
    pub fn unreachable_blocks(&self) -> Result<Vec<BlockId>> {
        let dominators = self.dominators()?;
        let unreachable: Vec<BlockId> = self
            .graph
            .node_ids()
            .filter(|&block| !dominators.contains(block))
            .collect();

        if !unreachable.is_empty() {
            warn!(
                "{} of {} blocks are unreachable",
                unreachable.len(),
                self.block_count()
            );
        }
        Ok(unreachable)
    }

    /// Generates a DOT representation of the dominator tree.
    ///
    /// Roots are drawn as double octagons; every edge runs from an immediate
    /// dominator to a block it dominates.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GraphError`] if the graph has no blocks.
    pub fn dominator_tree_to_dot(&self, title: Option<&str>) -> Result<String> {
        let dominators = self.dominators()?;
        let mut dot = String::new();

        dot.push_str("digraph DominatorTree {\n");
        if let Some(name) = title {
            let _ = writeln!(dot, "    label=\"Dominators: {}\";", escape_dot(name));
        }
        dot.push_str("    labelloc=t;\n");
        dot.push_str("    node [shape=box, fontname=\"Courier\", fontsize=10];\n\n");

        for block in dominators.topological_traversal() {
            let shape = if dominators.is_root(*block) {
                ", shape=doubleoctagon"
            } else {
                ""
            };
            let _ = writeln!(
                dot,
                "    {} [label=\"{block}\"{shape}];",
                dot_node_name(block.index())
            );
        }

        dot.push('\n');

        for (dominator, children) in dominators.dominator_tree() {
            for child in children {
                let _ = writeln!(
                    dot,
                    "    {} -> {};",
                    dot_node_name(dominator.index()),
                    dot_node_name(child.index())
                );
            }
        }

        dot.push_str("}\n");
        Ok(dot)
    }
}

impl<B: std::fmt::Display> ControlFlowGraph<B> {
    /// Generates a DOT representation of this CFG for visualization with Graphviz.
    ///
    /// Each block is labeled with its id and the `Display` output of its data.
    /// The entry is filled green, handler entries are drawn as double
    /// octagons, and blocks no root reaches are dashed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cfgdom::cfg::{CfgEdgeKind, ControlFlowGraph};
    ///
    /// let mut cfg = ControlFlowGraph::new();
    /// let entry = cfg.add_block("iftrue L1");
    /// let exit = cfg.add_block("returnvoid");
    /// cfg.add_edge(entry, exit, CfgEdgeKind::ConditionalTrue)?;
    ///
    /// let dot = cfg.to_dot(Some("main"));
    /// assert!(dot.contains("bb0 -> bb1 [label=\"true\", color=green];"));
    /// # Ok::<(), cfgdom::Error>(())
    /// ```
    #[must_use]
    pub fn to_dot(&self, title: Option<&str>) -> String {
        let reachable: Option<BTreeSet<BlockId>> = self
            .dominators()
            .ok()
            .map(|tree| tree.dfs_order().iter().copied().collect());

        let mut dot = String::new();

        dot.push_str("digraph CFG {\n");
        if let Some(name) = title {
            let _ = writeln!(dot, "    label=\"CFG: {}\";", escape_dot(name));
        }
        dot.push_str("    labelloc=t;\n");
        dot.push_str("    node [shape=box, fontname=\"Courier\", fontsize=10];\n");
        dot.push_str("    edge [fontname=\"Courier\", fontsize=9];\n\n");

        for (block, data) in self.graph.nodes() {
            let is_entry = self.entry() == Some(block);
            let is_handler = self.handlers.contains(&block);
            let is_reachable = reachable.as_ref().map_or(true, |r| r.contains(&block));

            let mut label = block.to_string();
            if is_entry {
                label.push_str(" (entry)");
            } else if is_handler {
                label.push_str(" (handler)");
            }
            label.push_str("\\l");
            for line in data.to_string().lines() {
                label.push_str(&escape_dot(line));
                label.push_str("\\l");
            }

            let style = if is_entry {
                ", style=filled, fillcolor=lightgreen"
            } else if is_handler {
                ", shape=doubleoctagon"
            } else if !is_reachable {
                ", style=dashed, color=gray"
            } else {
                ""
            };

            let _ = writeln!(
                dot,
                "    {} [label=\"{label}\"{style}];",
                dot_node_name(block.index())
            );
        }

        dot.push('\n');

        for (edge, kind) in self.graph.edges() {
            let _ = writeln!(
                dot,
                "    {} -> {} [label=\"{}\", color={}];",
                dot_node_name(edge.from.index()),
                dot_node_name(edge.to.index()),
                escape_dot(&kind.label()),
                kind.color()
            );
        }

        dot.push_str("}\n");
        dot
    }
}

impl<B> GraphBase for ControlFlowGraph<B> {
    fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    fn node_ids(&self) -> impl Iterator<Item = BlockId> {
        self.graph.node_ids()
    }
}

impl<B> Successors for ControlFlowGraph<B> {
    fn successors(&self, node: BlockId) -> impl Iterator<Item = BlockId> {
        self.graph.successors(node)
    }
}

impl<B> Predecessors for ControlFlowGraph<B> {
    fn predecessors(&self, node: BlockId) -> impl Iterator<Item = BlockId> {
        self.graph.predecessors(node)
    }
}

impl<B> Flowgraph for ControlFlowGraph<B> {
    fn roots(&self) -> impl Iterator<Item = BlockId> {
        self.entry().into_iter().chain(self.handlers.iter().copied())
    }
}

/// Computes and caches the dominator tree of every method body in parallel.
///
/// Each body is processed by one rayon task; bodies share nothing, so the
/// per-method trees need no synchronization beyond their own cache.
///
/// # Errors
///
/// Returns the first error encountered, e.g. [`Error::GraphError`] for an
/// empty body. Trees computed before the error stay cached.
///
/// # Examples
///
/// ```rust
/// use cfgdom::cfg::{precompute_dominators, CfgEdgeKind, ControlFlowGraph};
///
/// let methods: Vec<ControlFlowGraph<()>> = (0..8)
///     .map(|_| {
///         let mut cfg = ControlFlowGraph::new();
///         let a = cfg.add_block(());
///         let b = cfg.add_block(());
///         cfg.add_edge(a, b, CfgEdgeKind::Unconditional).unwrap();
///         cfg
///     })
///     .collect();
///
/// precompute_dominators(&methods)?;
/// # Ok::<(), cfgdom::Error>(())
/// ```
pub fn precompute_dominators<B: Sync>(methods: &[ControlFlowGraph<B>]) -> Result<()> {
    methods.par_iter().try_for_each(|cfg| {
        cfg.dominators()?;
        Ok(())
    })?;

    debug!("precomputed dominators for {} method bodies", methods.len());
    Ok(())
}
