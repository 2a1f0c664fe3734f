//! Flavour-correct graph traversal.
//!
//! A [`Traversal`] borrows a graph, collects up to four hooks and then runs breadth-first,
//! depth-first or priority-first. Every edge is reported once per partial edge the flavour
//! counts as a traversal:
//! - directed: once, as a first traversal
//! - undirected (plain or embedded): once as a first and once as a second traversal
//! - directed embedded: once, from the half hosted at the source
//!
//! Hooks are handed to an [`ExecutionModel`]; bookkeeping stays on the calling thread and
//! the graph stays borrowed until the runner returns.
//!
//! # Example
//! ```
//! use grove::concurrency::Serial;
//! use grove::graph::traversal::Traversal;
//! use grove::graph::{Independent, UndirectedGraph};
//!
//! let mut g = UndirectedGraph::<Independent<()>>::with_order(3);
//! g.join(0, 1, ()).unwrap();
//! g.join(1, 2, ()).unwrap();
//!
//! let order = Traversal::new(&g)
//!     .node_before_edges(|node| node)
//!     .breadth_first(Serial::new())
//!     .unwrap();
//! assert_eq!(order, vec![0, 1, 2]);
//! ```

mod containers;
mod hooks;

use std::cmp::Ordering;

use tracing::{debug, trace};

use super::access::visited::VisitedSet;
use super::edge::GraphEdge;
use super::flavour::{Flavour, GraphFlavour, Symmetric};
use super::Network;
use crate::concurrency::{ExecutionModel, Serial};
use crate::error::{check_node, Result};

use containers::{Fifo, Lifo, NodeQueue, PriorityQueue};
pub use hooks::{EdgeHook, Hook, NoHook, NodeHook, TraversedEdge};

/// Which hook, if any, an edge fires while its host is visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    First,
    Second,
    Silent,
}

/// Classifies the edge at `pos` of `node`.
///
/// `loop_matched` alternates on every plain undirected loop and is reset per node.
fn classify<E: GraphEdge>(
    flavour: GraphFlavour,
    node: usize,
    pos: usize,
    edge: &E,
    processed: &VisitedSet,
    loop_matched: &mut bool,
) -> Pass {
    let target = edge.target();
    let looped = target == node;
    let complementary = edge.complementary_index().unwrap_or_default();
    match flavour {
        GraphFlavour::Directed => Pass::First,
        GraphFlavour::Undirected if looped => {
            *loop_matched = !*loop_matched;
            if *loop_matched {
                Pass::Second
            } else {
                Pass::First
            }
        }
        GraphFlavour::UndirectedEmbedded if looped => {
            if complementary < pos {
                Pass::Second
            } else {
                Pass::First
            }
        }
        GraphFlavour::Undirected | GraphFlavour::UndirectedEmbedded => {
            if processed.is_visited(target) {
                Pass::Second
            } else {
                Pass::First
            }
        }
        GraphFlavour::DirectedEmbedded => {
            if edge.source().unwrap_or(node) != node {
                Pass::Silent
            } else if looped && (complementary < pos) != edge.inverted() {
                Pass::Silent
            } else {
                Pass::First
            }
        }
    }
}

/// Bookkeeping of one run.
struct Search {
    discovered: VisitedSet,
    processed: VisitedSet,
}

/// A configured traversal over `graph`.
///
/// The four trailing parameters are the hook slots, each [`NoHook`] or a [`Hook`].
pub struct Traversal<'g, G, B = NoHook, A = NoHook, E1 = NoHook, E2 = NoHook> {
    graph: &'g G,
    start: usize,
    disconnected: bool,
    before: B,
    after: A,
    first: E1,
    second: E2,
}

impl<'g, G: Network> Traversal<'g, G> {
    /// A traversal from node 0 of the start node's component, with no hooks.
    pub fn new(graph: &'g G) -> Self {
        Self {
            graph,
            start: 0,
            disconnected: false,
            before: NoHook,
            after: NoHook,
            first: NoHook,
            second: NoHook,
        }
    }
}

impl<'g, G, B, A, E1, E2> Traversal<'g, G, B, A, E1, E2>
where
    G: Network,
{
    /// Node the search starts from.
    #[must_use]
    pub fn start(mut self, node: usize) -> Self {
        self.start = node;
        self
    }

    /// Whether to continue into components unreachable from the start node.
    ///
    /// Each restart begins at the lowest-indexed undiscovered node.
    #[must_use]
    pub fn disconnected(mut self, enabled: bool) -> Self {
        self.disconnected = enabled;
        self
    }

    /// Called when a node is popped, before its edges.
    pub fn node_before_edges<F, R>(self, hook: F) -> Traversal<'g, G, Hook<F>, A, E1, E2>
    where
        F: Fn(usize) -> R + Send + Sync + 'static,
    {
        Traversal {
            graph: self.graph,
            start: self.start,
            disconnected: self.disconnected,
            before: Hook::new(hook),
            after: self.after,
            first: self.first,
            second: self.second,
        }
    }

    /// Called after all edges of a node.
    pub fn node_after_edges<F, R>(self, hook: F) -> Traversal<'g, G, B, Hook<F>, E1, E2>
    where
        F: Fn(usize) -> R + Send + Sync + 'static,
    {
        Traversal {
            graph: self.graph,
            start: self.start,
            disconnected: self.disconnected,
            before: self.before,
            after: Hook::new(hook),
            first: self.first,
            second: self.second,
        }
    }

    /// Called the first time an edge is traversed.
    pub fn edge_first_traversal<F, R>(self, hook: F) -> Traversal<'g, G, B, A, Hook<F>, E2>
    where
        F: Fn(TraversedEdge<G::Edge>) -> R + Send + Sync + 'static,
    {
        Traversal {
            graph: self.graph,
            start: self.start,
            disconnected: self.disconnected,
            before: self.before,
            after: self.after,
            first: Hook::new(hook),
            second: self.second,
        }
    }
}

impl<'g, G, B, A, E1, E2> Traversal<'g, G, B, A, E1, E2>
where
    G: Network,
    G::Flavour: Symmetric,
{
    /// Called when an undirected edge is reached again from its other end.
    ///
    /// Only undirected flavours traverse an edge twice, so directed graphs lack this method.
    pub fn edge_second_traversal<F, R>(self, hook: F) -> Traversal<'g, G, B, A, E1, Hook<F>>
    where
        F: Fn(TraversedEdge<G::Edge>) -> R + Send + Sync + 'static,
    {
        Traversal {
            graph: self.graph,
            start: self.start,
            disconnected: self.disconnected,
            before: self.before,
            after: self.after,
            first: self.first,
            second: Hook::new(hook),
        }
    }
}

impl<'g, G, B, A, E1, E2> Traversal<'g, G, B, A, E1, E2>
where
    G: Network,
{
    /// Visits nodes in breadth-first order.
    ///
    /// # Errors
    /// Returns [`GraphError::NodeOutOfRange`](crate::GraphError::NodeOutOfRange) if the start
    /// node does not exist in a non-empty graph.
    pub fn breadth_first<X>(&self, model: X) -> Result<X::Output>
    where
        X: ExecutionModel,
        B: NodeHook<X::Return>,
        A: NodeHook<X::Return>,
        E1: EdgeHook<G::Edge, X::Return>,
        E2: EdgeHook<G::Edge, X::Return>,
    {
        self.run(Fifo::default(), model)
    }

    /// Visits nodes in depth-first order, walking each node's edges back to front.
    ///
    /// # Errors
    /// As [`breadth_first`](Self::breadth_first).
    pub fn depth_first<X>(&self, model: X) -> Result<X::Output>
    where
        X: ExecutionModel,
        B: NodeHook<X::Return>,
        A: NodeHook<X::Return>,
        E1: EdgeHook<G::Edge, X::Return>,
        E2: EdgeHook<G::Edge, X::Return>,
    {
        self.run(Lifo::default(), model)
    }

    /// Visits discovered nodes greatest-weight first, as ranked by `compare`.
    ///
    /// Ties go to the lower node index.
    ///
    /// # Errors
    /// As [`breadth_first`](Self::breadth_first).
    pub fn priority_first<X, C>(&self, compare: C, model: X) -> Result<X::Output>
    where
        X: ExecutionModel,
        C: Fn(&G::NodeWeight, &G::NodeWeight) -> Ordering,
        B: NodeHook<X::Return>,
        A: NodeHook<X::Return>,
        E1: EdgeHook<G::Edge, X::Return>,
        E2: EdgeHook<G::Edge, X::Return>,
    {
        let graph = self.graph;
        let queue = PriorityQueue::new(|a: usize, b: usize| {
            match (graph.node_weight_at(a), graph.node_weight_at(b)) {
                (Some(x), Some(y)) => compare(x, y),
                _ => Ordering::Equal,
            }
        });
        self.run(queue, model)
    }

    /// [`priority_first`](Self::priority_first) ranked by the natural order of node weights.
    ///
    /// # Errors
    /// As [`breadth_first`](Self::breadth_first).
    pub fn priority_first_by_weight<X>(&self, model: X) -> Result<X::Output>
    where
        X: ExecutionModel,
        G::NodeWeight: Ord,
        B: NodeHook<X::Return>,
        A: NodeHook<X::Return>,
        E1: EdgeHook<G::Edge, X::Return>,
        E2: EdgeHook<G::Edge, X::Return>,
    {
        self.priority_first(|a: &G::NodeWeight, b: &G::NodeWeight| a.cmp(b), model)
    }

    fn run<Q, X>(&self, mut queue: Q, mut model: X) -> Result<X::Output>
    where
        Q: NodeQueue,
        X: ExecutionModel,
        B: NodeHook<X::Return>,
        A: NodeHook<X::Return>,
        E1: EdgeHook<G::Edge, X::Return>,
        E2: EdgeHook<G::Edge, X::Return>,
    {
        let order = self.graph.order();
        if order == 0 {
            return Ok(model.get());
        }
        check_node("traversal", self.start, order)?;
        trace!(order, start = self.start, disconnected = self.disconnected, "starting traversal");

        let mut search = Search {
            discovered: VisitedSet::new(order),
            processed: VisitedSet::new(order),
        };
        let mut root = self.start;
        loop {
            search.discovered.try_visit(root);
            queue.push(root);
            while let Some(node) = queue.pop() {
                self.visit(node, &mut search, &mut queue, &mut model);
            }
            if !self.disconnected {
                break;
            }
            match search.discovered.first_unvisited_from(0) {
                Some(next) => {
                    debug!(component_root = next, "restarting traversal in unreached component");
                    root = next;
                }
                None => break,
            }
        }
        Ok(model.get())
    }

    fn visit<Q, X>(&self, node: usize, search: &mut Search, queue: &mut Q, model: &mut X)
    where
        Q: NodeQueue,
        X: ExecutionModel,
        B: NodeHook<X::Return>,
        A: NodeHook<X::Return>,
        E1: EdgeHook<G::Edge, X::Return>,
        E2: EdgeHook<G::Edge, X::Return>,
    {
        self.before.dispatch(model, node);

        let flavour = <G::Flavour as Flavour>::FLAVOUR;
        let edges = self.graph.partition(node);
        let mut loop_matched = true;
        let mut step = |pos: usize| {
            let edge = &edges[pos];
            match classify(flavour, node, pos, edge, &search.processed, &mut loop_matched) {
                Pass::First => self.first.dispatch(model, node, pos, edge),
                Pass::Second => self.second.dispatch(model, node, pos, edge),
                Pass::Silent => {}
            }
            let target = edge.target();
            if search.discovered.try_visit(target) {
                queue.push(target);
            }
        };
        if Q::REVERSE {
            (0..edges.len()).rev().for_each(&mut step);
        } else {
            (0..edges.len()).for_each(&mut step);
        }

        self.after.dispatch(model, node);
        search.processed.try_visit(node);
    }
}

/// Nodes reachable from `start` in breadth-first order.
///
/// # Errors
/// Returns [`GraphError::NodeOutOfRange`](crate::GraphError::NodeOutOfRange) if `start` is
/// not a node of a non-empty graph.
pub fn breadth_first_search<G: Network>(graph: &G, start: usize) -> Result<Vec<usize>> {
    Traversal::new(graph)
        .start(start)
        .node_before_edges(|node| node)
        .breadth_first(Serial::new())
}

/// Nodes reachable from `start` in depth-first order.
///
/// # Errors
/// As [`breadth_first_search`].
pub fn depth_first_search<G: Network>(graph: &G, start: usize) -> Result<Vec<usize>> {
    Traversal::new(graph)
        .start(start)
        .node_before_edges(|node| node)
        .depth_first(Serial::new())
}

/// Nodes reachable from `start`, always expanding the discovered node ranked greatest by
/// `compare`.
///
/// # Errors
/// As [`breadth_first_search`].
pub fn priority_search<G, C>(graph: &G, start: usize, compare: C) -> Result<Vec<usize>>
where
    G: Network,
    C: Fn(&G::NodeWeight, &G::NodeWeight) -> Ordering,
{
    Traversal::new(graph)
        .start(start)
        .node_before_edges(|node| node)
        .priority_first(compare, Serial::new())
}
