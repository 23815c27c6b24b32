#![no_main]

use libfuzzer_sys::fuzz_target;
use cfgdom::{
    graph::{algorithms::DominatorTree, BlockId, DirectedGraph},
    DominatorConfig,
};

// Byte 0: block count, byte 1: root count, then root indices, then edge pairs.
fuzz_target!(|data: &[u8]| {
    let Some((&count, rest)) = data.split_first() else {
        return;
    };
    let count = usize::from(count) + 1;
    let Some((&root_count, rest)) = rest.split_first() else {
        return;
    };
    let root_count = usize::from(root_count % 4) + 1;
    if rest.len() < root_count {
        return;
    }
    let (roots, edges) = rest.split_at(root_count);

    let mut graph: DirectedGraph<(), ()> = DirectedGraph::with_capacity(count, edges.len() / 2);
    for _ in 0..count {
        graph.add_node(());
    }
    for pair in edges.chunks_exact(2) {
        let from = BlockId::new(usize::from(pair[0]) % count);
        let to = BlockId::new(usize::from(pair[1]) % count);
        let _ = graph.add_edge(from, to, ());
    }

    let roots = roots
        .iter()
        .map(|&r| BlockId::new(usize::from(r) % count));
    let tree = DominatorTree::with_config(&graph, roots, &DominatorConfig::strict())
        .expect("dominator tree of a valid graph must verify");

    let _ = tree.dominance_frontiers();
    assert_eq!(tree.topological_traversal().len(), tree.len());
});
