//! Dominator tree computation using the Lengauer-Tarjan algorithm.
//!
//! The code generator uses dominance to verify control flow, to find which
//! blocks an exception handler can reach, and to decide where redundant
//! computations can be hoisted or eliminated.
//!
//! # Theory
//!
//! A block `d` **dominates** a block `n` if every path from a root to `n`
//! passes through `d`. The **immediate dominator** of `n` (idom(n)) is the
//! closest strict dominator of `n`. Making every block's immediate dominator
//! its parent yields the dominator tree; roots have no parent.
//!
//! # Multiple Roots
//!
//! A method body has one real entry, but exception handler entries are only
//! reached through runtime dispatch. Those entries are passed as additional
//! roots. Internally the graph gets a virtual entry with an edge to every
//! root, so dominance is computed against all roots at once. Roots never
//! receive an immediate dominator, even if a block has an edge to them.
//!
//! A block reached from several roots along paths with no block in common has
//! no real dominator besides itself. Such a block is [shared](DominatorTree::is_shared)
//! and hangs below the root at the head of its depth-first tree, so the
//! dominator tree stays a forest with one tree per root.
//!
//! # Algorithm
//!
//! 1. Number blocks in depth-first preorder ([`DepthFirstPreorderIterator`]),
//!    recording predecessors and depth-first tree parents. Roots seeded onto
//!    the stack are children of the virtual entry.
//! 2. Walk the numbering backwards, computing semidominators with a
//!    path-compressed link/eval forest and resolving bucket entries to implicit
//!    immediate dominators.
//! 3. Walk the numbering forwards, resolving deferred entries with one more hop
//!    through the already final idom of their candidate.
//!
//! Derived views (tree, frontiers, topological order) are computed on first
//! request and cached for the life of the instance.

use std::{
    collections::{BTreeSet, HashMap, HashSet},
    sync::OnceLock,
};

use log::{debug, trace};

use crate::{
    config::DominatorConfig,
    graph::{
        algorithms::traversal::DepthFirstPreorderIterator, BlockId, Flowgraph, Multimap,
        Successors,
    },
    Error, Result,
};

/// Dominance information for every block reachable from a set of roots.
///
/// The immediate dominators are computed eagerly at construction. The
/// dominator tree, dominance frontiers and topological orders are computed on
/// first access and cached in [`OnceLock`]s, so a shared instance may be
/// queried from several threads.
///
/// Blocks that no root reaches are absent from every table; queries about them
/// return `None`, `false` or nothing.
///
/// # Examples
///
/// ```rust
/// use cfgdom::graph::{DirectedGraph, algorithms::DominatorTree};
///
/// // Loop: A -> B, B -> C, C -> B, C -> D
/// let mut graph: DirectedGraph<&str, ()> = DirectedGraph::new();
/// let a = graph.add_node("A");
/// let b = graph.add_node("B");
/// let c = graph.add_node("C");
/// let d = graph.add_node("D");
/// graph.add_edge(a, b, ())?;
/// graph.add_edge(b, c, ())?;
/// graph.add_edge(c, b, ())?;
/// graph.add_edge(c, d, ())?;
///
/// let tree = DominatorTree::new(&graph, a);
/// assert_eq!(tree.immediate_dominator(b), Some(a));
/// assert_eq!(tree.immediate_dominator(c), Some(b));
/// assert_eq!(tree.immediate_dominator(d), Some(c));
///
/// // The loop header is in the frontier of the latch
/// assert!(tree.dominance_frontiers().contains(&c, &b));
/// # Ok::<(), cfgdom::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct DominatorTree {
    /// Supplied roots that were discovered, in the order given
    roots: Vec<BlockId>,
    /// Blocks in depth-first preorder, indexed by DFS number
    vertex: Vec<BlockId>,
    /// DFS number of each reachable block (inverse of `vertex`)
    dfnum: HashMap<BlockId, usize>,
    /// DFS-tree parent, by DFS number; `None` below the virtual entry
    parent: Vec<Option<usize>>,
    /// Semidominator DFS number, by DFS number; the head of the depth-first
    /// tree stands in for the virtual entry
    semi: Vec<usize>,
    /// Blocks whose only real dominator is themselves, by DFS number
    shared: Vec<bool>,
    /// Successor snapshot taken during numbering, by DFS number
    successors: Vec<Vec<BlockId>>,
    /// Immediate dominator of each non-root reachable block
    idom: HashMap<BlockId, BlockId>,
    /// Dominator tree children, by DFS number, in ascending DFS order
    children: Vec<Vec<usize>>,
    dominator_tree: OnceLock<Multimap<BlockId, BlockId>>,
    dominance_frontiers: OnceLock<Multimap<BlockId, BlockId>>,
    topological: OnceLock<Vec<BlockId>>,
}

impl DominatorTree {
    /// Computes the dominator tree of everything reachable from `root`.
    pub fn new<G: Successors>(graph: &G, root: BlockId) -> Self {
        Self::compute(graph, vec![root])
    }

    /// Computes the dominator tree of everything reachable from `roots`.
    ///
    /// The first root is normally the method entry; the others are exception
    /// handler entries. Duplicate roots are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoRoots`] if `roots` is empty.
    pub fn with_roots<G, I>(graph: &G, roots: I) -> Result<Self>
    where
        G: Successors,
        I: IntoIterator<Item = BlockId>,
    {
        let roots: Vec<BlockId> = roots.into_iter().collect();
        if roots.is_empty() {
            return Err(Error::NoRoots);
        }
        Ok(Self::compute(graph, roots))
    }

    /// Computes the dominator tree of a [`Flowgraph`] from all of its roots.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoRoots`] if the flowgraph reports no root.
    pub fn from_flowgraph<G: Flowgraph>(graph: &G) -> Result<Self> {
        Self::with_roots(graph, graph.roots())
    }

    /// Computes the dominator tree with explicit validation settings.
    ///
    /// # Errors
    ///
    /// - [`Error::NoRoots`] / [`Error::InvalidBlock`] when structural validation
    ///   is enabled and the roots are empty or not part of `graph`
    /// - [`Error::TooManyBlocks`] when more blocks are reachable than allowed;
    ///   numbering stops as soon as the limit is passed
    /// - [`Error::Malformed`] when result validation is enabled and
    ///   [`verify`](Self::verify) fails
    pub fn with_config<G, I>(graph: &G, roots: I, config: &DominatorConfig) -> Result<Self>
    where
        G: Successors,
        I: IntoIterator<Item = BlockId>,
    {
        let roots: Vec<BlockId> = roots.into_iter().collect();
        if config.enable_structural_validation {
            if roots.is_empty() {
                return Err(Error::NoRoots);
            }
            if let Some(&invalid) = roots.iter().find(|r| r.index() >= graph.node_count()) {
                return Err(Error::InvalidBlock(invalid));
            }
        }

        // Number one block past the limit to detect overflow without
        // walking the rest of the graph
        let cap = match config.max_block_count {
            0 => usize::MAX,
            max => max.saturating_add(1),
        };
        let mut lt = LengauerTarjan::number(graph, &roots, cap);
        if config.max_block_count > 0 && lt.vertex.len() > config.max_block_count {
            return Err(Error::TooManyBlocks(config.max_block_count));
        }
        lt.run();
        let tree = lt.finish(&roots);

        if config.enable_result_validation {
            tree.verify()?;
        }
        Ok(tree)
    }

    fn compute<G: Successors>(graph: &G, roots: Vec<BlockId>) -> Self {
        let mut lt = LengauerTarjan::number(graph, &roots, usize::MAX);
        lt.run();
        lt.finish(&roots)
    }

    /// Returns the roots the tree was built from, in the order given.
    ///
    /// Duplicates and roots that are not part of the graph are left out.
    #[must_use]
    pub fn roots(&self) -> &[BlockId] {
        &self.roots
    }

    /// Returns `true` if `block` is one of the roots.
    #[must_use]
    pub fn is_root(&self, block: BlockId) -> bool {
        self.roots.contains(&block)
    }

    /// Returns the number of reachable blocks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vertex.len()
    }

    /// Returns `true` if no block is reachable (all roots were invalid).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertex.is_empty()
    }

    /// Returns `true` if `block` is reachable from some root.
    #[must_use]
    pub fn contains(&self, block: BlockId) -> bool {
        self.dfnum.contains_key(&block)
    }

    /// Returns the reachable blocks in the depth-first preorder used for numbering.
    #[must_use]
    pub fn dfs_order(&self) -> &[BlockId] {
        &self.vertex
    }

    /// Returns the depth-first number of `block`.
    #[must_use]
    pub fn dfs_number(&self, block: BlockId) -> Option<usize> {
        self.dfnum.get(&block).copied()
    }

    /// Returns the depth-first tree parent of `block`.
    ///
    /// `None` for roots at the head of a depth-first tree. A root first reached
    /// through another block's edge has that block as its parent.
    #[must_use]
    pub fn dfs_parent(&self, block: BlockId) -> Option<BlockId> {
        let w = self.dfs_number(block)?;
        self.parent[w].map(|p| self.vertex[p])
    }

    /// Returns the semidominator of `block`.
    ///
    /// A root is its own semidominator. A block whose semidominator is the
    /// virtual entry above all roots reports the head of its depth-first tree.
    #[must_use]
    pub fn semidominator(&self, block: BlockId) -> Option<BlockId> {
        let w = self.dfs_number(block)?;
        Some(self.vertex[self.semi[w]])
    }

    /// Returns the immediate dominator map.
    ///
    /// Every reachable non-root block has an entry; roots and unreachable
    /// blocks have none. [Shared](Self::is_shared) blocks map to the root at
    /// the head of their depth-first tree.
    #[must_use]
    pub fn idoms(&self) -> &HashMap<BlockId, BlockId> {
        &self.idom
    }

    /// Returns the immediate dominator of `block`, or `None` for roots and
    /// unreachable blocks.
    #[must_use]
    pub fn immediate_dominator(&self, block: BlockId) -> Option<BlockId> {
        self.idom.get(&block).copied()
    }

    /// Returns `true` if `block` is reached from several roots along paths
    /// with no block in common.
    ///
    /// No other block dominates a shared block, so its immediate dominator is
    /// only the root it hangs below in the tree. Never `true` for roots, for
    /// unreachable blocks, or with a single root.
    #[must_use]
    pub fn is_shared(&self, block: BlockId) -> bool {
        self.dfs_number(block).is_some_and(|w| self.shared[w])
    }

    /// Checks if block `a` dominates block `b`.
    ///
    /// A reachable block dominates itself. Unreachable blocks dominate nothing
    /// and are dominated by nothing.
    ///
    /// # Complexity
    ///
    /// O(depth) where depth is the depth of `b` in the dominator tree.
    #[must_use]
    pub fn dominates(&self, a: BlockId, b: BlockId) -> bool {
        if !self.contains(a) {
            return false;
        }
        self.dominators(b).any(|d| d == a)
    }

    /// Checks if block `a` dominates block `b` and `a != b`.
    #[must_use]
    pub fn strictly_dominates(&self, a: BlockId, b: BlockId) -> bool {
        a != b && self.dominates(a, b)
    }

    /// Returns the dominators of `block`, from the block itself up to its root.
    ///
    /// Yields nothing for unreachable blocks.
    pub fn dominators(&self, block: BlockId) -> DominatorIterator<'_> {
        DominatorIterator {
            tree: self,
            current: self.contains(block).then_some(block),
        }
    }

    /// Returns the depth of `block` in the dominator tree; roots have depth 0.
    #[must_use]
    pub fn depth(&self, block: BlockId) -> Option<usize> {
        self.contains(block)
            .then(|| self.dominators(block).count() - 1)
    }

    /// Returns the blocks `block` immediately dominates, in block order.
    pub fn children(&self, block: BlockId) -> impl Iterator<Item = BlockId> + '_ {
        self.dominator_tree().values(&block)
    }

    /// Returns the dominator tree as a map from each dominator to the blocks it
    /// immediately dominates.
    ///
    /// Only blocks with at least one child have an entry. Built on first call.
    pub fn dominator_tree(&self) -> &Multimap<BlockId, BlockId> {
        self.dominator_tree.get_or_init(|| {
            let mut tree = Multimap::new();
            for &block in &self.vertex {
                if let Some(&dominator) = self.idom.get(&block) {
                    tree.insert(dominator, block);
                }
            }
            tree
        })
    }

    /// Returns all reachable blocks ordered so that every block's immediate
    /// dominator comes before it.
    ///
    /// The order is the one obtained by visiting blocks in depth-first order and
    /// inserting each directly after its immediate dominator (roots are
    /// appended). Built on first call.
    pub fn topological_traversal(&self) -> &[BlockId] {
        self.topological.get_or_init(|| {
            let mut order = Vec::with_capacity(self.vertex.len());
            let mut stack: Vec<usize> = (0..self.vertex.len())
                .rev()
                .filter(|&w| !self.idom.contains_key(&self.vertex[w]))
                .collect();

            while let Some(w) = stack.pop() {
                order.push(self.vertex[w]);
                // Highest DFS number ends up on top; it was inserted last
                stack.extend(self.children[w].iter().copied());
            }
            order
        })
    }

    /// Returns the topological order backwards: every block before its
    /// immediate dominator.
    ///
    /// Each call starts a fresh pass over the cached order.
    pub fn reverse_topological_traversal(&self) -> impl Iterator<Item = BlockId> + '_ {
        self.topological_traversal().iter().rev().copied()
    }

    /// Returns the dominance frontier of every reachable block.
    ///
    /// `DF(x)` holds the blocks `y` where `x` dominates a predecessor of `y` but
    /// does not strictly dominate `y`. Every reachable block has an entry, empty
    /// if its frontier is. Built on first call, bottom-up over the dominator
    /// tree (Cytron et al.).
    pub fn dominance_frontiers(&self) -> &Multimap<BlockId, BlockId> {
        self.dominance_frontiers.get_or_init(|| {
            let mut frontiers: Multimap<BlockId, BlockId> = Multimap::new();

            for x in self.reverse_topological_traversal() {
                let not_idom_of = |y: &BlockId| self.idom.get(y) != Some(&x);

                let mut frontier: BTreeSet<BlockId> = self
                    .successors_of(x)
                    .iter()
                    .copied()
                    .filter(|y| self.contains(*y) && not_idom_of(y))
                    .collect();

                for z in self.children(x) {
                    if let Some(child_frontier) = frontiers.get(&z) {
                        frontier.extend(child_frontier.iter().copied().filter(not_idom_of));
                    }
                }

                frontiers.get_or_insert_default(x).extend(frontier);
            }
            frontiers
        })
    }

    /// Returns the dominance frontier of `block`, or `None` if it is unreachable.
    #[must_use]
    pub fn dominance_frontier(&self, block: BlockId) -> Option<&BTreeSet<BlockId>> {
        self.dominance_frontiers().get(&block)
    }

    fn successors_of(&self, block: BlockId) -> &[BlockId] {
        self.dfnum
            .get(&block)
            .map_or(&[][..], |&w| self.successors[w].as_slice())
    }

    /// Checks the dominance invariants of the computed tables.
    ///
    /// - no root has an immediate dominator and every other reachable block does
    /// - `semi(w)` is numbered no later than `w`
    /// - `idom(w)` is numbered before `w`, so idom chains end at a root
    /// - `idom(w)` dominates the semidominator of `w` (Lengauer-Tarjan)
    /// - a shared block hangs below a root
    /// - the topological order lists every block once, after its idom
    ///
    /// # Errors
    ///
    /// Returns [`Error::Malformed`] describing the first violated invariant.
    pub fn verify(&self) -> Result<()> {
        let roots: HashSet<BlockId> = self.roots.iter().copied().collect();

        for (w, &block) in self.vertex.iter().enumerate() {
            if self.semi[w] > w {
                return Err(malformed_error!(
                    "semidominator of {} is numbered {} but the block is numbered {}",
                    block,
                    self.semi[w],
                    w
                ));
            }

            let Some(&dominator) = self.idom.get(&block) else {
                if roots.contains(&block) {
                    continue;
                }
                return Err(malformed_error!(
                    "reachable block {} has no immediate dominator",
                    block
                ));
            };

            if roots.contains(&block) {
                return Err(malformed_error!(
                    "root {} has immediate dominator {}",
                    block,
                    dominator
                ));
            }

            match self.dfnum.get(&dominator) {
                Some(&d) if d < w => {}
                _ => {
                    return Err(malformed_error!(
                        "immediate dominator {} of {} is not numbered before it",
                        dominator,
                        block
                    ))
                }
            }

            if self.shared[w] {
                if !roots.contains(&dominator) {
                    return Err(malformed_error!(
                        "shared block {} hangs below {}, which is not a root",
                        block,
                        dominator
                    ));
                }
                continue;
            }

            let sdom = self.vertex[self.semi[w]];
            if !self.dominates(dominator, sdom) {
                return Err(malformed_error!(
                    "immediate dominator {} of {} does not dominate its semidominator {}",
                    dominator,
                    block,
                    sdom
                ));
            }
        }

        let order = self.topological_traversal();
        if order.len() != self.vertex.len() {
            return Err(malformed_error!(
                "topological order has {} blocks, expected {}",
                order.len(),
                self.vertex.len()
            ));
        }
        let position: HashMap<BlockId, usize> =
            order.iter().enumerate().map(|(i, &b)| (b, i)).collect();
        for (block, dominator) in &self.idom {
            match (position.get(dominator), position.get(block)) {
                (Some(d), Some(b)) if d < b => {}
                _ => {
                    return Err(malformed_error!(
                        "topological order places {} before its immediate dominator {}",
                        block,
                        dominator
                    ))
                }
            }
        }

        Ok(())
    }
}

/// Iterator over the dominators of a block, from the block up to its root.
pub struct DominatorIterator<'a> {
    tree: &'a DominatorTree,
    current: Option<BlockId>,
}

impl Iterator for DominatorIterator<'_> {
    type Item = BlockId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current?;
        self.current = self.tree.immediate_dominator(current);
        Some(current)
    }
}

/// Computes the dominator tree for the blocks reachable from `root`.
///
/// # Complexity
///
/// - Time: O((V + E) log V) with the simple link/eval forest
/// - Space: O(V + E)
///
/// # Examples
///
/// ```rust
/// use cfgdom::graph::{DirectedGraph, algorithms::compute_dominators};
///
/// // Diamond CFG:
/// //      entry
/// //      /   \
/// //     a     b
/// //      \   /
/// //       exit
/// let mut graph: DirectedGraph<&str, ()> = DirectedGraph::new();
/// let entry = graph.add_node("entry");
/// let a = graph.add_node("a");
/// let b = graph.add_node("b");
/// let exit = graph.add_node("exit");
///
/// graph.add_edge(entry, a, ())?;
/// graph.add_edge(entry, b, ())?;
/// graph.add_edge(a, exit, ())?;
/// graph.add_edge(b, exit, ())?;
///
/// let dom_tree = compute_dominators(&graph, entry);
///
/// assert!(dom_tree.dominates(entry, exit));
/// assert!(!dom_tree.strictly_dominates(a, exit));
/// assert_eq!(dom_tree.immediate_dominator(exit), Some(entry));
/// # Ok::<(), cfgdom::Error>(())
/// ```
pub fn compute_dominators<G: Successors>(graph: &G, root: BlockId) -> DominatorTree {
    DominatorTree::new(graph, root)
}

/// Computes the dominator tree of a [`Flowgraph`] from all of its roots.
///
/// # Errors
///
/// Returns [`Error::NoRoots`] if the flowgraph reports no root.
pub fn compute_dominators_rooted<G: Flowgraph>(graph: &G) -> Result<DominatorTree> {
    DominatorTree::from_flowgraph(graph)
}

/// Number of the virtual entry in [`LengauerTarjan`]; it has an edge to every root.
const VIRTUAL_ROOT: usize = 0;

/// Working state of the Lengauer-Tarjan algorithm.
///
/// Everything is indexed by DFS number in a graph extended with a virtual
/// entry: number 0 is the virtual entry, `vertex[i]` has number `i + 1`. The
/// `ancestor`/`label` forest only lives for the duration of the computation.
struct LengauerTarjan {
    /// Reachable blocks in depth-first preorder
    vertex: Vec<BlockId>,
    /// Position of each discovered block in `vertex`
    dfnum: HashMap<BlockId, usize>,
    /// Supplied roots
    roots: HashSet<BlockId>,
    /// DFS-tree parent; the virtual entry for roots at the head of a tree
    parent: Vec<usize>,
    /// Distinct predecessors, including the virtual entry for roots
    pred: Vec<Vec<usize>>,
    /// Successors in graph order, by position in `vertex`
    successors: Vec<Vec<BlockId>>,
    /// Semidominator; initially the block's own number
    semi: Vec<usize>,
    /// Parent in the link/eval forest
    ancestor: Vec<Option<usize>>,
    /// Least-semidominator block on the compressed path
    label: Vec<usize>,
    /// Blocks waiting for their semidominator's subtree to be linked
    bucket: Multimap<usize, usize>,
    /// Implicit, then explicit, immediate dominator
    idom: Vec<usize>,
}

impl LengauerTarjan {
    /// DFS numbering pass. Stops after `cap` blocks.
    fn number<G: Successors>(graph: &G, roots: &[BlockId], cap: usize) -> Self {
        let root_set: HashSet<BlockId> = roots.iter().copied().collect();
        let mut vertex = Vec::new();
        let mut dfnum: HashMap<BlockId, usize> = HashMap::new();
        let mut parent_of: HashMap<BlockId, BlockId> = HashMap::new();
        let mut pred_of: Multimap<BlockId, BlockId> = Multimap::new();
        let mut successors = Vec::new();

        for block in DepthFirstPreorderIterator::new(graph, roots.iter().copied()).take(cap) {
            dfnum.insert(block, vertex.len());
            vertex.push(block);

            let targets: Vec<BlockId> = graph.successors(block).collect();
            for &child in &targets {
                pred_of.insert(child, block);
                // The last block to see `child` undiscovered pushed the copy
                // the stack pops first. A root reached this way gets a real
                // parent; otherwise the virtual entry pushed it.
                if !dfnum.contains_key(&child) {
                    parent_of.insert(child, block);
                }
            }
            successors.push(targets);
        }

        let count = vertex.len() + 1;
        let mut parent = vec![VIRTUAL_ROOT; count];
        let mut pred = vec![Vec::new(); count];
        for (i, block) in vertex.iter().enumerate() {
            if let Some(&p) = parent_of.get(block).and_then(|p| dfnum.get(p)) {
                parent[i + 1] = p + 1;
            }
            pred[i + 1] = pred_of
                .values(block)
                .filter_map(|p| dfnum.get(&p).map(|&n| n + 1))
                .collect();
            if root_set.contains(block) {
                pred[i + 1].push(VIRTUAL_ROOT);
            }
        }

        LengauerTarjan {
            vertex,
            dfnum,
            roots: root_set,
            parent,
            pred,
            successors,
            semi: (0..count).collect(),
            ancestor: vec![None; count],
            label: (0..count).collect(),
            bucket: Multimap::new(),
            idom: vec![VIRTUAL_ROOT; count],
        }
    }

    /// Semidominator, implicit idom and explicit idom passes.
    fn run(&mut self) {
        let count = self.semi.len();

        for w in (1..count).rev() {
            let p = self.parent[w];

            let preds = std::mem::take(&mut self.pred[w]);
            let mut semi = self.semi[w];
            for &v in &preds {
                let u = self.eval(v);
                semi = semi.min(self.semi[u]);
            }
            self.pred[w] = preds;
            self.semi[w] = semi;

            self.bucket.insert(semi, w);
            self.link(p, w);

            if let Some(bucket) = self.bucket.take(&p) {
                for v in bucket {
                    self.resolve(v, p);
                }
            }
        }

        for w in 1..count {
            let d = self.idom[w];
            if d != self.semi[w] {
                self.idom[w] = self.idom[d];
            }
        }
    }

    /// Implicitly defines the immediate dominator of `v`, whose
    /// semidominator is `p`.
    fn resolve(&mut self, v: usize, p: usize) {
        let u = self.eval(v);
        let candidate = if self.semi[u] < self.semi[v] { u } else { p };
        trace!(
            "{:?}: semi {:?} candidate idom {:?}",
            self.block(v),
            self.block(self.semi[v]),
            self.block(candidate)
        );
        self.idom[v] = candidate;
    }

    /// Block with DFS number `n`; `None` for the virtual entry.
    fn block(&self, n: usize) -> Option<BlockId> {
        n.checked_sub(1).map(|i| self.vertex[i])
    }

    /// Adds `w` to the forest as a child of `p`.
    fn link(&mut self, p: usize, w: usize) {
        self.ancestor[w] = Some(p);
    }

    /// Returns the block with the least semidominator on the forest path above `v`.
    fn eval(&mut self, v: usize) -> usize {
        if self.ancestor[v].is_none() {
            return v;
        }
        self.compress(v);
        self.label[v]
    }

    /// Path compression, iterative so long ancestor chains stay off the call stack.
    fn compress(&mut self, v: usize) {
        let mut path = Vec::new();
        let mut x = v;
        while let Some(a) = self.ancestor[x] {
            if self.ancestor[a].is_none() {
                break;
            }
            path.push(x);
            x = a;
        }

        // Top-down, so each ancestor is already compressed when its child is
        while let Some(y) = path.pop() {
            let Some(a) = self.ancestor[y] else {
                continue;
            };
            if self.semi[self.label[a]] < self.semi[self.label[y]] {
                self.label[y] = self.label[a];
            }
            self.ancestor[y] = self.ancestor[a];
        }
    }

    /// Translates the virtual-entry numbering back to blocks.
    ///
    /// Roots lose the virtual entry as idom. Any other block whose idom is the
    /// virtual entry is reached from several roots through disjoint paths; it
    /// is marked shared and hangs below the head of its depth-first tree.
    fn finish(self, requested: &[BlockId]) -> DominatorTree {
        let mut roots = Vec::new();
        for &root in requested {
            if self.dfnum.contains_key(&root) && !roots.contains(&root) {
                roots.push(root);
            }
        }

        let n = self.vertex.len();
        let mut parent = vec![None; n];
        let mut head: Vec<usize> = (0..n).collect();
        for i in 0..n {
            let p = self.parent[i + 1];
            if p != VIRTUAL_ROOT {
                parent[i] = Some(p - 1);
                head[i] = head[p - 1];
            }
        }

        let mut semi = Vec::with_capacity(n);
        let mut shared = vec![false; n];
        let mut idom = HashMap::with_capacity(n);
        let mut children = vec![Vec::new(); n];
        for (i, &block) in self.vertex.iter().enumerate() {
            let is_root = self.roots.contains(&block);
            semi.push(match self.semi[i + 1] {
                VIRTUAL_ROOT if is_root => i,
                VIRTUAL_ROOT => head[i],
                s => s - 1,
            });

            let d = match self.idom[i + 1] {
                VIRTUAL_ROOT if is_root => continue,
                VIRTUAL_ROOT => {
                    shared[i] = true;
                    head[i]
                }
                d => d - 1,
            };
            idom.insert(block, self.vertex[d]);
            children[d].push(i);
        }

        debug!(
            "dominator tree: {} root(s), {} reachable block(s), {} shared",
            roots.len(),
            n,
            shared.iter().filter(|&&s| s).count()
        );

        DominatorTree {
            roots,
            vertex: self.vertex,
            dfnum: self.dfnum,
            parent,
            semi,
            shared,
            successors: self.successors,
            idom,
            children,
            dominator_tree: OnceLock::new(),
            dominance_frontiers: OnceLock::new(),
            topological: OnceLock::new(),
        }
    }
}
