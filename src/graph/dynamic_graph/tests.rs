use super::*;
use crate::graph::edge::GraphEdge;
use crate::graph::nodes::Weighted;
use crate::graph::weight::Shared;

fn targets<F, W, N, M, S>(g: &DynamicGraph<F, W, N, M, S>, node: usize) -> Vec<usize>
where
    F: Flavour,
    W: WeightHandle,
    N: NodeStorage,
    M: Clone + PartialEq,
    S: StorageKind,
{
    g.edges(node).unwrap().iter().map(GraphEdge::target).collect()
}

#[test]
fn test_directed_basics() {
    let mut g = DirectedGraph::<Independent<f64>>::with_order(3);
    g.join(0, 1, 0.5).unwrap();
    g.join(1, 2, 1.5).unwrap();
    g.join(2, 2, 2.5).unwrap();
    assert_eq!(g.order(), 3);
    assert_eq!(g.size(), 3);
    assert_eq!(g.flavour(), GraphFlavour::Directed);
    assert_eq!(targets(&g, 2), vec![2]);
    assert_eq!(*g.edge(1, 0).unwrap().weight(), 1.5);
    assert_eq!(g.partner(0, 0).unwrap(), None);
    g.validate().unwrap();
}

#[test]
fn test_out_of_range_errors() {
    let mut g = UndirectedGraph::<Independent<i32>>::with_order(2);
    g.join(0, 1, 1).unwrap();

    assert!(matches!(g.join(0, 2, 1), Err(GraphError::NodeOutOfRange { index: 2, order: 2, .. })));
    assert!(matches!(
        g.erase_node(5),
        Err(GraphError::NodeOutOfRange { operation: "erase_node", .. })
    ));
    assert!(matches!(g.swap_nodes(0, 2), Err(GraphError::NodeOutOfRange { .. })));
    assert!(matches!(
        g.swap_edges(0, 0, 1),
        Err(GraphError::EdgeOutOfRange { node: 0, index: 1, len: 1, .. })
    ));
    assert!(matches!(g.erase_edge(1, 3), Err(GraphError::EdgeOutOfRange { .. })));
    assert!(matches!(g.set_node_weight(2, ()), Err(GraphError::NodeOutOfRange { .. })));
    assert!(g.edges(2).is_err());
    assert!(g.node_weight(2).is_err());

    // Nothing changed.
    assert_eq!(g.size(), 1);
    g.validate().unwrap();
}

#[test]
fn test_undirected_join_mirrors_and_counts_once() {
    let mut g = UndirectedGraph::<Independent<i32>>::with_order(2);
    g.join(0, 1, 7).unwrap();
    g.join(1, 1, 3).unwrap();
    assert_eq!(g.size(), 2);
    assert_eq!(targets(&g, 0), vec![1]);
    assert_eq!(targets(&g, 1), vec![0, 1, 1]);
    assert_eq!(g.partner(0, 0).unwrap(), Some((1, 0)));
    assert_eq!(g.partner(1, 2).unwrap(), Some((1, 1)));
    g.validate().unwrap();
}

#[test]
fn test_erase_node_shifts_targets_and_weights() {
    let mut g = DirectedGraph::<Independent<()>, Weighted<char>>::from_edges_and_nodes(
        vec![
            vec![EdgeInit::to(3), EdgeInit::to(1)],
            vec![EdgeInit::to(2)],
            vec![EdgeInit::to(3)],
            vec![EdgeInit::to(0)],
        ],
        vec!['a', 'b', 'c', 'd'],
    )
    .unwrap();

    g.erase_node(1).unwrap();
    assert_eq!(g.order(), 3);
    assert_eq!(g.size(), 3);
    assert_eq!(targets(&g, 0), vec![2]);
    assert_eq!(targets(&g, 1), vec![2]);
    assert_eq!(targets(&g, 2), vec![0]);
    assert_eq!(g.node_weights().copied().collect::<String>(), "acd");
}

#[test]
fn test_insert_node_shifts_targets() {
    let mut g = UndirectedEmbeddedGraph::<Independent<()>, Weighted<u8>>::new();
    g.add_node(1);
    g.add_node(2);
    g.join(0, 1, ()).unwrap();
    assert_eq!(g.insert_node(1, 9).unwrap(), 1);
    assert_eq!(targets(&g, 0), vec![2]);
    assert_eq!(targets(&g, 2), vec![0]);
    assert!(targets(&g, 1).is_empty());
    assert_eq!(g.node_weight(1).unwrap(), &9);
    g.validate().unwrap();
}

#[test]
fn test_swap_nodes_relabels_edges_and_weights() {
    let mut g = UndirectedGraph::<Independent<i32>, Weighted<&str>>::new();
    for name in ["x", "y", "z"] {
        g.add_node(name);
    }
    g.join(0, 1, 1).unwrap();
    g.join(1, 2, 2).unwrap();
    g.swap_nodes(0, 2).unwrap();
    assert_eq!(g.node_weights().copied().collect::<Vec<_>>(), vec!["z", "y", "x"]);
    assert_eq!(targets(&g, 0), vec![1]);
    assert_eq!(targets(&g, 2), vec![1]);
    assert_eq!(targets(&g, 1), vec![2, 0]);
    g.validate().unwrap();
}

#[test]
fn test_insert_join_through_graph() {
    let mut g = DirectedEmbeddedGraph::<Independent<i32>>::with_order(2);
    g.join(0, 1, 1).unwrap();
    let (pu, pv) = g.insert_join(1, 0, 0, 0, 2).unwrap();
    assert_eq!((pu, pv), (0, 0));
    let front = g.edge(0, 0).unwrap();
    assert_eq!((front.source(), front.target()), (Some(1), 0));
    assert_eq!(g.size(), 2);
    g.validate().unwrap();
}

#[test]
fn test_edge_metadata_is_per_half() {
    let mut g = UndirectedEmbeddedGraph::<Independent<i32>, Unweighted, String>::with_order(2);
    g.join_with_meta(0, 1, 4, String::from("m")).unwrap();
    g.set_edge_meta(0, 0, String::from("left")).unwrap();
    let len = g.mutate_edge_meta(1, 0, |m| {
        m.push('!');
        m.len()
    })
    .unwrap();
    assert_eq!(len, 2);
    assert_eq!(g.edge(0, 0).unwrap().meta(), "left");
    assert_eq!(g.edge(1, 0).unwrap().meta(), "m!");
    g.validate().unwrap();
}

#[test]
fn test_clone_of_shared_graph_is_deep_and_deduplicated() {
    let mut g = UndirectedGraph::<Shared<Vec<u8>>>::with_order(3);
    g.join(0, 1, vec![1]).unwrap();
    g.join(1, 2, vec![2]).unwrap();

    let copy = g.clone();
    assert_eq!(copy, g);

    let a = copy.edge(0, 0).unwrap().weight_handle();
    let b = copy.edge(1, 0).unwrap().weight_handle();
    assert!(a.ptr_eq(b));
    assert_eq!(a.share_count(), 2);
    assert!(!a.ptr_eq(g.edge(0, 0).unwrap().weight_handle()));

    g.mutate_edge_weight(1, 1, |w| w.push(3)).unwrap();
    assert_eq!(*g.edge(2, 0).unwrap().weight(), vec![2, 3]);
    assert_eq!(*copy.edge(2, 0).unwrap().weight(), vec![2]);
    assert_ne!(copy, g);
}

#[test]
fn test_from_edges_rejects_bad_input() {
    let mismatched = UndirectedGraph::<Independent<i32>, Weighted<i32>>::from_edges_and_nodes(
        vec![vec![], vec![]],
        vec![1],
    );
    assert_eq!(
        mismatched.unwrap_err(),
        GraphError::InconsistentInitialization { nodes: 1, partitions: 2 }
    );

    let unmatched = UndirectedGraph::<Independent<i32>>::from_edges(vec![
        vec![EdgeInit::weighted(1, 1)],
        vec![],
    ]);
    assert!(matches!(unmatched, Err(GraphError::InvalidEdgeList { node: 0, .. })));
}

#[test]
fn test_from_edges_inverted_loop_is_kept() {
    let g = DirectedEmbeddedGraph::<Independent<()>>::from_edges(vec![vec![
        EdgeInit::to(0).comp(1).inverted(),
        EdgeInit::to(0).comp(0).inverted(),
    ]])
    .unwrap();
    assert!(g.edge(0, 0).unwrap().inverted());
    assert_eq!(g.size(), 1);
}

#[test]
fn test_equality_is_structural() {
    let mut a = UndirectedGraph::<Independent<i32>, Unweighted, (), Bucketed>::with_order(2);
    let mut b = UndirectedGraph::<Independent<i32>, Unweighted, (), Bucketed>::with_order(2);
    a.join(0, 1, 1).unwrap();
    b.join(1, 0, 1).unwrap();
    assert_eq!(a, b);
    b.set_edge_weight(0, 0, 2).unwrap();
    assert_ne!(a, b);
}

#[test]
fn test_capacity_operations() {
    let mut g = UndirectedGraph::<Independent<i32>, Weighted<i32>>::new();
    g.reserve_nodes(16);
    assert!(g.node_capacity() >= 16);
    g.reserve_edges(64);
    assert!(g.edge_capacity() >= 64);
    g.add_node(0);
    g.shrink_to_fit();
    assert_eq!(g.order(), 1);

    let mut b = DirectedGraph::<Independent<()>, Unweighted, (), Bucketed>::with_order(2);
    b.reserve_edges_at(1, 8).unwrap();
    assert!(b.edge_capacity_at(1).unwrap() >= 8);
    assert!(b.reserve_edges_at(2, 1).is_err());
}

#[test]
fn test_debug_lists_partitions() {
    let mut g = DirectedGraph::<Independent<u8>>::with_order(2);
    g.join(0, 1, 3).unwrap();
    let text = format!("{g:?}");
    assert!(text.contains("Directed"));
    assert!(text.contains("target: 1"));
}

#[test]
fn test_erase_nodes_range() {
    let mut g = UndirectedEmbeddedGraph::<Independent<i32>, Weighted<u8>>::from_edges_and_nodes(
        vec![vec![], vec![], vec![], vec![]],
        vec![0, 1, 2, 3],
    )
    .unwrap();
    g.join(0, 3, 1).unwrap();
    g.join(1, 2, 2).unwrap();
    g.join(0, 2, 3).unwrap();

    g.erase_nodes(1, 3).unwrap();
    assert_eq!(g.order(), 2);
    assert_eq!(g.size(), 1);
    assert_eq!(targets(&g, 0), vec![1]);
    assert_eq!(g.node_weights().copied().collect::<Vec<_>>(), vec![0, 3]);
    g.validate().unwrap();

    assert!(matches!(g.erase_nodes(2, 1), Err(GraphError::InvalidRange { first: 2, last: 1, .. })));
    assert!(g.erase_nodes(0, 3).is_err());
    assert_eq!(g.order(), 2);
}
