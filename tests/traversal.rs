use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use grove::concurrency::{Asynchronous, Serial, ThreadPool};
use grove::graph::traversal::{breadth_first_search, depth_first_search, Traversal};
use grove::graph::{
    DirectedGraph, GraphEdge, Independent, Network, StaticGraph, Undirected,
    UndirectedEmbeddedGraph, UndirectedGraph,
};
use grove::TaskError;
use petgraph::graph::{DiGraph, NodeIndex, UnGraph};
use petgraph::visit::{Bfs, Dfs};
use proptest::prelude::*;

#[test]
fn directed_path_visits_in_order() -> Result<()> {
    let mut g = DirectedGraph::<Independent<()>>::with_order(3);
    g.join(0, 1, ())?;
    g.join(1, 2, ())?;

    let nodes = Traversal::new(&g).node_before_edges(|n| n).breadth_first(Serial::new())?;
    assert_eq!(nodes, vec![0, 1, 2]);

    let edges = Traversal::new(&g)
        .edge_first_traversal(|e| (e.host, e.edge.target()))
        .breadth_first(Serial::new())?;
    assert_eq!(edges, vec![(0, 1), (1, 2)]);
    Ok(())
}

#[test]
fn undirected_edge_is_met_from_each_end() -> Result<()> {
    let mut g = UndirectedGraph::<Independent<()>>::with_order(2);
    g.join(0, 1, ())?;

    let passes = Traversal::new(&g)
        .edge_first_traversal(|e| ("first", e.host))
        .edge_second_traversal(|e| ("second", e.host))
        .breadth_first(Serial::new())?;
    assert_eq!(passes, vec![("first", 0), ("second", 1)]);
    Ok(())
}

#[test]
fn undirected_loop_is_met_once_each_way() -> Result<()> {
    let mut g = UndirectedGraph::<Independent<()>>::with_order(1);
    g.join(0, 0, ())?;

    let passes = Traversal::new(&g)
        .edge_first_traversal(|_| "first")
        .edge_second_traversal(|_| "second")
        .breadth_first(Serial::new())?;
    assert_eq!(passes, vec!["first", "second"]);
    Ok(())
}

#[test]
fn connected_graph_counts() -> Result<()> {
    let mut g = UndirectedEmbeddedGraph::<Independent<u32>>::with_order(6);
    for (i, (u, v)) in [(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 5), (2, 2), (0, 3), (0, 3)]
        .into_iter()
        .enumerate()
    {
        g.join(u, v, u32::try_from(i)?)?;
    }

    let befores = Arc::new(AtomicUsize::new(0));
    let firsts = Arc::new(AtomicUsize::new(0));
    let seconds = Arc::new(AtomicUsize::new(0));
    let (b, f, s) = (Arc::clone(&befores), Arc::clone(&firsts), Arc::clone(&seconds));
    Traversal::new(&g)
        .node_before_edges(move |_| {
            b.fetch_add(1, Ordering::Relaxed);
        })
        .edge_first_traversal(move |_| {
            f.fetch_add(1, Ordering::Relaxed);
        })
        .edge_second_traversal(move |_| {
            s.fetch_add(1, Ordering::Relaxed);
        })
        .depth_first(ThreadPool::new(3))??;

    assert_eq!(befores.load(Ordering::Relaxed), g.order());
    assert_eq!(firsts.load(Ordering::Relaxed), g.size());
    assert_eq!(seconds.load(Ordering::Relaxed), g.size());
    Ok(())
}

#[test]
fn static_graph_traverses_like_its_source() -> Result<()> {
    let mut g = UndirectedGraph::<Independent<u8>>::with_order(4);
    g.join(0, 1, 1)?;
    g.join(1, 2, 2)?;
    g.join(2, 3, 3)?;
    g.join(3, 3, 4)?;

    let frozen = StaticGraph::<Undirected, 4, 4, Independent<u8>>::try_from(g.clone())?;
    let dynamic = Traversal::new(&g)
        .edge_first_traversal(|e| *e.edge.weight())
        .breadth_first(Serial::new())?;
    let fixed = Traversal::new(&frozen)
        .edge_first_traversal(|e| *e.edge.weight())
        .breadth_first(Serial::new())?;
    assert_eq!(dynamic, fixed);
    assert_eq!(fixed, vec![1, 2, 3, 4]);
    Ok(())
}

#[test]
fn execution_models_agree() -> Result<()> {
    let mut g = UndirectedGraph::<Independent<u16>>::with_order(40);
    for n in 0..40u16 {
        let u = usize::from(n);
        g.join(u, (u * 7 + 3) % 40, n)?;
        g.join(u, (u * 11 + 5) % 40, n + 100)?;
    }
    let traversal = Traversal::new(&g)
        .disconnected(true)
        .node_before_edges(|n| (n, 0u16))
        .edge_first_traversal(|e| (e.host, *e.edge.weight()))
        .edge_second_traversal(|e| (e.host, *e.edge.weight() + 1000));

    let serial = traversal.depth_first(Serial::new())?;
    let mut pool = ThreadPool::with_push_cycles(4, 1);
    assert_eq!(traversal.depth_first(&mut pool)?, Ok(serial.clone()));
    // Reusing a pool after an explicit join restarts its workers.
    pool.join();
    assert_eq!(traversal.depth_first(&mut pool)?, Ok(serial.clone()));
    assert_eq!(traversal.depth_first(ThreadPool::single_queue(3))?, Ok(serial.clone()));
    assert_eq!(traversal.depth_first(Asynchronous::new())?, Ok(serial));
    Ok(())
}

#[test]
fn hook_panic_reaches_get() -> Result<()> {
    let mut g = DirectedGraph::<Independent<()>>::with_order(3);
    g.join(0, 1, ())?;
    g.join(1, 2, ())?;

    let outcome = Traversal::new(&g)
        .edge_first_traversal(|e| {
            assert!(e.host != 1, "edge from {} refused", e.host);
            e.host
        })
        .breadth_first(Asynchronous::new())?;
    assert_eq!(
        outcome,
        Err(TaskError::Panicked {
            message: "edge from 1 refused".into()
        })
    );
    Ok(())
}

fn reachable<G: Network>(graph: &G, start: usize) -> grove::Result<BTreeSet<usize>> {
    Ok(breadth_first_search(graph, start)?.into_iter().collect())
}

proptest! {
    #[test]
    fn test_directed_reachability_matches_petgraph(
        order in 1usize..12,
        edges in prop::collection::vec((0usize..12, 0usize..12), 0..40),
        start in 0usize..12,
    ) {
        let start = start % order;
        let mut g = DirectedGraph::<Independent<()>>::with_order(order);
        let mut oracle = DiGraph::<(), ()>::new();
        let nodes: Vec<NodeIndex> = (0..order).map(|_| oracle.add_node(())).collect();
        for &(u, v) in &edges {
            let (u, v) = (u % order, v % order);
            g.join(u, v, ()).unwrap();
            oracle.add_edge(nodes[u], nodes[v], ());
        }

        let mut expected = BTreeSet::new();
        let mut bfs = Bfs::new(&oracle, nodes[start]);
        while let Some(nx) = bfs.next(&oracle) {
            expected.insert(nx.index());
        }
        prop_assert_eq!(reachable(&g, start).unwrap(), expected.clone());

        let dfs: BTreeSet<usize> = depth_first_search(&g, start).unwrap().into_iter().collect();
        prop_assert_eq!(dfs, expected);
    }

    #[test]
    fn test_undirected_reachability_matches_petgraph(
        order in 1usize..12,
        edges in prop::collection::vec((0usize..12, 0usize..12), 0..30),
        start in 0usize..12,
    ) {
        let start = start % order;
        let mut g = UndirectedGraph::<Independent<()>>::with_order(order);
        let mut oracle = UnGraph::<(), ()>::new_undirected();
        let nodes: Vec<NodeIndex> = (0..order).map(|_| oracle.add_node(())).collect();
        for &(u, v) in &edges {
            let (u, v) = (u % order, v % order);
            g.join(u, v, ()).unwrap();
            oracle.add_edge(nodes[u], nodes[v], ());
        }

        let mut expected = BTreeSet::new();
        let mut dfs = Dfs::new(&oracle, nodes[start]);
        while let Some(nx) = dfs.next(&oracle) {
            expected.insert(nx.index());
        }
        prop_assert_eq!(reachable(&g, start).unwrap(), expected);
    }

    #[test]
    fn test_disconnected_traversal_visits_every_node_once(
        order in 1usize..15,
        edges in prop::collection::vec((0usize..15, 0usize..15), 0..20),
        start in 0usize..15,
    ) {
        let mut g = UndirectedGraph::<Independent<()>>::with_order(order);
        for &(u, v) in &edges {
            g.join(u % order, v % order, ()).unwrap();
        }
        let mut visited = Traversal::new(&g)
            .start(start % order)
            .disconnected(true)
            .node_before_edges(|n| n)
            .depth_first(Serial::new())
            .unwrap();
        prop_assert_eq!(visited[0], start % order);
        visited.sort_unstable();
        prop_assert_eq!(visited, (0..order).collect::<Vec<_>>());
    }

    #[test]
    fn test_serial_runs_repeat_exactly(
        edges in prop::collection::vec((0usize..8, 0usize..8), 0..25),
    ) {
        let mut g = UndirectedGraph::<Independent<()>>::with_order(8);
        for &(u, v) in &edges {
            g.join(u, v, ()).unwrap();
        }
        let traversal = Traversal::new(&g)
            .disconnected(true)
            .edge_first_traversal(|e| (true, e.host, e.position))
            .edge_second_traversal(|e| (false, e.host, e.position));
        let first = traversal.breadth_first(Serial::new()).unwrap();
        prop_assert_eq!(first.len(), 2 * g.size());
        prop_assert_eq!(traversal.breadth_first(Serial::new()).unwrap(), first);
    }
}
