//! Integration tests for dominator analysis.
//!
//! Covers the documented dominance properties on hand-built method shapes and
//! cross-checks the Lengauer-Tarjan results against a naive iterative
//! dataflow solution on pseudo-random flowgraphs.

use std::collections::{BTreeSet, HashMap};

use cfgdom::{
    graph::algorithms::{compute_dominators_rooted, preorder},
    prelude::*,
};

fn graph_with(count: usize, edges: &[(usize, usize)]) -> Result<(DirectedGraph<(), ()>, Vec<BlockId>)> {
    let mut graph = DirectedGraph::new();
    let blocks: Vec<BlockId> = (0..count).map(|_| graph.add_node(())).collect();
    for &(from, to) in edges {
        graph.add_edge(blocks[from], blocks[to], ())?;
    }
    Ok((graph, blocks))
}

/// Deterministic 64-bit LCG so failures are reproducible from the seed.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        self.0 >> 33
    }

    fn below(&mut self, bound: usize) -> usize {
        (self.next() % bound as u64) as usize
    }
}

fn random_graph(rng: &mut Lcg, count: usize) -> Result<DirectedGraph<(), ()>> {
    let mut graph = DirectedGraph::new();
    let blocks: Vec<BlockId> = (0..count).map(|_| graph.add_node(())).collect();
    for index in 0..count {
        // Mostly fall through to the next block, plus a few arbitrary jumps
        if index + 1 < count && rng.below(4) != 0 {
            graph.add_edge(blocks[index], blocks[index + 1], ())?;
        }
        for _ in 0..rng.below(3) {
            let target = blocks[rng.below(count)];
            graph.add_edge(blocks[index], target, ())?;
        }
    }
    Ok(graph)
}

/// Dominator sets by iterating `Dom(n) = {n} ∪ ⋂ Dom(p)` to a fixed point.
///
/// Every root hangs below an implicit entry whose dominator set is empty, so a
/// root is dominated only by itself.
fn naive_dominators(
    graph: &DirectedGraph<(), ()>,
    roots: &[BlockId],
) -> HashMap<BlockId, BTreeSet<BlockId>> {
    let reachable: BTreeSet<BlockId> = preorder(graph, roots.iter().copied()).into_iter().collect();
    let mut dom: HashMap<BlockId, BTreeSet<BlockId>> = reachable
        .iter()
        .map(|&block| (block, reachable.clone()))
        .collect();
    for &root in roots {
        dom.insert(root, BTreeSet::from([root]));
    }

    let mut changed = true;
    while changed {
        changed = false;
        for &block in &reachable {
            if roots.contains(&block) {
                continue;
            }
            let mut meet: Option<BTreeSet<BlockId>> = None;
            for pred in graph.predecessors(block) {
                if !reachable.contains(&pred) {
                    continue;
                }
                let pred_dom = &dom[&pred];
                meet = Some(match meet {
                    None => pred_dom.clone(),
                    Some(acc) => acc.intersection(pred_dom).copied().collect(),
                });
            }
            let mut updated = meet.unwrap_or_default();
            updated.insert(block);
            if updated != dom[&block] {
                dom.insert(block, updated);
                changed = true;
            }
        }
    }
    dom
}

fn naive_idom(dom: &HashMap<BlockId, BTreeSet<BlockId>>, block: BlockId) -> Option<BlockId> {
    let strict: BTreeSet<BlockId> = dom[&block].iter().copied().filter(|&d| d != block).collect();
    strict.iter().copied().find(|d| dom[d] == strict)
}

fn assert_topological(tree: &DominatorTree) {
    let order = tree.topological_traversal();
    assert_eq!(order.len(), tree.len());

    let position: HashMap<BlockId, usize> =
        order.iter().enumerate().map(|(i, &b)| (b, i)).collect();
    for (block, dominator) in tree.idoms() {
        assert!(
            position[dominator] < position[block],
            "{dominator} must precede {block}"
        );
    }

    let mut reversed: Vec<BlockId> = order.to_vec();
    reversed.reverse();
    assert_eq!(tree.reverse_topological_traversal().collect::<Vec<_>>(), reversed);
}

#[test]
fn test_idom_chains_reach_a_root() -> Result<()> {
    let (graph, b) = graph_with(
        6,
        &[(0, 1), (1, 2), (2, 1), (2, 3), (3, 4), (4, 2), (3, 5)],
    )?;
    let tree = DominatorTree::new(&graph, b[0]);

    for &block in tree.dfs_order() {
        let chain: Vec<BlockId> = tree.dominators(block).collect();
        assert!(chain.len() <= tree.len());
        assert_eq!(chain.last(), Some(&b[0]));
        // No block appears twice on its own chain
        let distinct: BTreeSet<BlockId> = chain.iter().copied().collect();
        assert_eq!(distinct.len(), chain.len());
    }
    tree.verify()
}

#[test]
fn test_roots_have_no_idom() -> Result<()> {
    let (graph, b) = graph_with(5, &[(0, 1), (1, 0), (3, 1), (3, 4), (4, 3)])?;
    let tree = DominatorTree::with_roots(&graph, [b[0], b[3]])?;

    assert!(!tree.idoms().contains_key(&b[0]));
    assert!(!tree.idoms().contains_key(&b[3]));
    assert_eq!(tree.idoms().len(), tree.len() - 2);
    tree.verify()
}

#[test]
fn test_linear_chain() -> Result<()> {
    let (graph, b) = graph_with(4, &[(0, 1), (1, 2), (2, 3)])?;
    let tree = DominatorTree::new(&graph, b[0]);

    assert_eq!(tree.idoms().get(&b[1]), Some(&b[0]));
    assert_eq!(tree.idoms().get(&b[2]), Some(&b[1]));
    assert_eq!(tree.idoms().get(&b[3]), Some(&b[2]));
    assert_eq!(tree.dominance_frontiers().value_count(), 0);
    assert_eq!(tree.dominance_frontiers().len(), 4);
    Ok(())
}

#[test]
fn test_diamond() -> Result<()> {
    let (graph, b) = graph_with(4, &[(0, 1), (0, 2), (1, 3), (2, 3)])?;
    let tree = DominatorTree::new(&graph, b[0]);

    assert_eq!(tree.immediate_dominator(b[1]), Some(b[0]));
    assert_eq!(tree.immediate_dominator(b[2]), Some(b[0]));
    assert_eq!(tree.immediate_dominator(b[3]), Some(b[0]));

    let df = tree.dominance_frontiers();
    assert_eq!(df.get(&b[1]), Some(&BTreeSet::from([b[3]])));
    assert_eq!(df.get(&b[2]), Some(&BTreeSet::from([b[3]])));
    assert_eq!(df.get(&b[0]), Some(&BTreeSet::new()));
    assert_eq!(df.get(&b[3]), Some(&BTreeSet::new()));
    Ok(())
}

#[test]
fn test_loop_header_in_frontier() -> Result<()> {
    let (graph, b) = graph_with(4, &[(0, 1), (1, 2), (2, 1), (2, 3)])?;
    let tree = DominatorTree::new(&graph, b[0]);

    assert_eq!(tree.immediate_dominator(b[1]), Some(b[0]));
    assert_eq!(tree.immediate_dominator(b[2]), Some(b[1]));
    assert_eq!(tree.immediate_dominator(b[3]), Some(b[2]));
    assert_eq!(tree.dominance_frontier(b[2]), Some(&BTreeSet::from([b[1]])));
    Ok(())
}

#[test]
fn test_exception_handler_root() -> Result<()> {
    // Roots {A, H}; A -> B and H -> B
    let (graph, b) = graph_with(3, &[(0, 1), (2, 1)])?;
    let (a, body, h) = (b[0], b[1], b[2]);

    let tree = DominatorTree::with_roots(&graph, [a, h])?;
    assert_eq!(tree.immediate_dominator(a), None);
    assert_eq!(tree.immediate_dominator(h), None);
    assert!(tree.is_shared(body));
    assert!(!tree.dominates(a, body));
    assert_eq!(tree.immediate_dominator(body), Some(h));

    // Same input, same answer
    for _ in 0..8 {
        let again = DominatorTree::with_roots(&graph, [a, h])?;
        assert_eq!(again.idoms(), tree.idoms());
        assert_eq!(again.topological_traversal(), tree.topological_traversal());
    }

    // Root order decides which root B hangs below
    let swapped = DominatorTree::with_roots(&graph, [h, a])?;
    assert_eq!(swapped.immediate_dominator(body), Some(a));
    Ok(())
}

#[test]
fn test_preorder_exhaustion() -> Result<()> {
    let (graph, b) = graph_with(4, &[(0, 1), (0, 2), (1, 3), (2, 3)])?;
    let mut iter = DepthFirstPreorderIterator::new(&graph, [b[0]]);

    let mut seen = BTreeSet::new();
    for _ in 0..4 {
        assert!(iter.has_next());
        assert!(seen.insert(iter.try_next()?));
    }
    assert_eq!(seen, b.iter().copied().collect::<BTreeSet<_>>());
    assert!(!iter.has_next());
    assert!(matches!(iter.try_next(), Err(Error::Exhausted)));
    Ok(())
}

#[test]
fn test_topological_traversal_respects_idoms() -> Result<()> {
    let (graph, b) = graph_with(
        8,
        &[
            (0, 1),
            (0, 2),
            (1, 3),
            (2, 3),
            (3, 4),
            (4, 5),
            (5, 4),
            (4, 6),
            (6, 7),
            (2, 7),
        ],
    )?;
    let tree = DominatorTree::new(&graph, b[0]);
    assert_topological(&tree);
    assert_eq!(tree.topological_traversal().first(), Some(&b[0]));
    Ok(())
}

#[test]
fn test_memoized_views_are_identical() -> Result<()> {
    let (graph, b) = graph_with(5, &[(0, 1), (0, 2), (1, 3), (2, 3), (3, 4)])?;
    let tree = DominatorTree::new(&graph, b[0]);

    assert!(std::ptr::eq(tree.dominator_tree(), tree.dominator_tree()));
    assert!(std::ptr::eq(
        tree.dominance_frontiers(),
        tree.dominance_frontiers()
    ));
    assert!(std::ptr::eq(
        tree.topological_traversal(),
        tree.topological_traversal()
    ));
    assert_eq!(tree.dominator_tree().clone(), *tree.dominator_tree());
    Ok(())
}

#[test]
fn test_unreachable_blocks_are_not_in_any_view() -> Result<()> {
    let (graph, b) = graph_with(4, &[(0, 1), (2, 3), (3, 1)])?;
    let tree = DominatorTree::new(&graph, b[0]);

    for dead in [b[2], b[3]] {
        assert!(!tree.contains(dead));
        assert_eq!(tree.immediate_dominator(dead), None);
        assert!(!tree.dominance_frontiers().contains_key(&dead));
        assert!(!tree.topological_traversal().contains(&dead));
    }
    // The dead predecessor 3 does not make 1 a merge point
    assert_eq!(tree.dominance_frontier(b[0]), Some(&BTreeSet::new()));
    Ok(())
}

#[test]
fn test_deep_chain_does_not_recurse() -> Result<()> {
    let count = 50_000;
    let mut graph: DirectedGraph<(), ()> = DirectedGraph::with_capacity(count, count);
    let blocks: Vec<BlockId> = (0..count).map(|_| graph.add_node(())).collect();
    for pair in blocks.windows(2) {
        graph.add_edge(pair[0], pair[1], ())?;
    }
    // A back edge from the bottom keeps the link/eval paths long
    graph.add_edge(blocks[count - 1], blocks[1], ())?;

    let tree = DominatorTree::new(&graph, blocks[0]);
    assert_eq!(tree.len(), count);
    assert_eq!(tree.immediate_dominator(blocks[count - 1]), Some(blocks[count - 2]));
    assert_eq!(tree.depth(blocks[count - 1]), Some(count - 1));
    assert_eq!(tree.topological_traversal().len(), count);
    Ok(())
}

#[test]
fn test_random_graphs_match_naive_dominators() -> Result<()> {
    let mut rng = Lcg(0x5eed);
    for round in 0..200 {
        let count = 1 + rng.below(40);
        let graph = random_graph(&mut rng, count)?;
        let root = BlockId::new(0);

        let tree = DominatorTree::new(&graph, root);
        let dom = naive_dominators(&graph, &[root]);

        assert_eq!(tree.len(), dom.len(), "round {round}");
        for (&block, dominators) in &dom {
            assert_eq!(
                tree.immediate_dominator(block),
                naive_idom(&dom, block),
                "round {round}: idom of {block}"
            );
            for &other in dom.keys() {
                assert_eq!(
                    tree.dominates(other, block),
                    dominators.contains(&other),
                    "round {round}: {other} dom {block}"
                );
            }
        }

        // DF(x) = { y | x dominates a reachable pred of y, x does not strictly dominate y }
        for &x in dom.keys() {
            let expected: BTreeSet<BlockId> = dom
                .keys()
                .copied()
                .filter(|&y| {
                    let strictly = x != y && dom[&y].contains(&x);
                    !strictly
                        && graph
                            .predecessors(y)
                            .any(|p| dom.get(&p).is_some_and(|d| d.contains(&x)))
                })
                .collect();
            assert_eq!(
                tree.dominance_frontier(x),
                Some(&expected),
                "round {round}: DF({x})"
            );
        }

        assert_topological(&tree);
        tree.verify()?;
    }
    Ok(())
}

#[test]
fn test_random_multi_root_graphs_match_naive_dominators() -> Result<()> {
    let mut rng = Lcg(0xc0ffee);
    for round in 0..400 {
        let count = 1 + rng.below(30);
        let graph = random_graph(&mut rng, count)?;
        let mut roots = vec![BlockId::new(0)];
        for _ in 0..1 + rng.below(3) {
            let root = BlockId::new(rng.below(count));
            if !roots.contains(&root) {
                roots.push(root);
            }
        }

        let tree = DominatorTree::with_roots(&graph, roots.iter().copied())?;
        tree.verify()?;
        assert_topological(&tree);

        let dom = naive_dominators(&graph, &roots);
        assert_eq!(tree.len(), dom.len(), "round {round}");
        for (&block, dominators) in &dom {
            if roots.contains(&block) {
                assert_eq!(tree.immediate_dominator(block), None, "round {round}: root {block}");
                continue;
            }

            match naive_idom(&dom, block) {
                Some(idom) => {
                    assert!(!tree.is_shared(block), "round {round}: {block} is dominated");
                    assert_eq!(
                        tree.immediate_dominator(block),
                        Some(idom),
                        "round {round}: idom of {block}"
                    );
                }
                None => {
                    // Only the implicit entry dominates it; it hangs below a root
                    assert!(tree.is_shared(block), "round {round}: {block} is shared");
                    let fallback = tree.immediate_dominator(block);
                    assert!(
                        fallback.is_some_and(|root| roots.contains(&root)),
                        "round {round}: {block} hangs below {fallback:?}"
                    );
                }
            }

            // The chain minus a final hop from a shared block is exactly Dom(block)
            let mut chain: Vec<BlockId> = tree.dominators(block).collect();
            if chain.len() >= 2 && tree.is_shared(chain[chain.len() - 2]) {
                chain.pop();
            }
            let chain: BTreeSet<BlockId> = chain.into_iter().collect();
            assert_eq!(&chain, dominators, "round {round}: dominators of {block}");
        }

        let again = DominatorTree::with_roots(&graph, roots.iter().copied())?;
        assert_eq!(again.idoms(), tree.idoms());
    }
    Ok(())
}

#[test]
fn test_strict_config_on_control_flow_graph() -> Result<()> {
    let mut cfg = ControlFlowGraph::new();
    let entry = cfg.add_block("entry");
    let body = cfg.add_block("body");
    let handler = cfg.add_block("handler");
    cfg.add_edge(entry, body, CfgEdgeKind::Unconditional)?;
    cfg.add_edge(handler, body, CfgEdgeKind::Unconditional)?;
    cfg.add_exception_handler(handler)?;

    let tree = DominatorTree::with_config(&cfg, cfg.roots(), &DominatorConfig::strict())?;
    let rooted = compute_dominators_rooted(&cfg)?;
    assert_eq!(tree.idoms(), rooted.idoms());
    assert_eq!(tree.roots(), &[entry, handler]);
    Ok(())
}
