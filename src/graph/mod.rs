//! Flavour-polymorphic graphs and their traversal.
//!
//! Graphs are organized in layers:
//! - `edge`, `weight`, `nodes`: what a partial edge and a node carry
//! - `storage`: how partial edges are laid out in memory
//! - `DynamicGraph` / `StaticGraph`: the graph families, sharing one connectivity engine
//! - `traversal`: the flavour-correct search driving user hooks through an execution model

pub(crate) mod access;
mod connectivity;
mod dynamic_graph;
pub mod edge;
pub mod flavour;
pub mod nodes;
mod static_graph;
pub mod storage;
pub mod traversal;
pub mod weight;

pub use connectivity::EdgeOf;
pub use dynamic_graph::{
    DirectedEmbeddedGraph, DirectedGraph, DynamicGraph, UndirectedEmbeddedGraph, UndirectedGraph,
};
pub use edge::{EdgeInit, GraphEdge};
pub use flavour::{
    Directed, DirectedEmbedded, Embedded, Flavour, GraphFlavour, Symmetric, Undirected,
    UndirectedEmbedded,
};
pub use nodes::{NodeStorage, Unweighted, Weighted};
pub use static_graph::StaticGraph;
pub use storage::{Bucketed, Contiguous};
pub use weight::{Independent, Shared, WeightHandle};

/// Read-only view of a graph used by algorithms.
pub trait Network {
    /// Flavour of the graph.
    type Flavour: Flavour;
    /// Stored edge type.
    type Edge: GraphEdge;
    /// Node weight type.
    type NodeWeight;

    /// Number of nodes.
    fn order(&self) -> usize;

    /// Number of edges.
    fn size(&self) -> usize;

    /// Edges hosted by `node`.
    ///
    /// # Panics
    /// Panics if `node >= self.order()`.
    fn partition(&self, node: usize) -> &[Self::Edge];

    /// Weight of `node`, if it exists.
    fn node_weight_at(&self, node: usize) -> Option<&Self::NodeWeight>;
}
