//! Graphs with order and size fixed at construction.
//!
//! A [`StaticGraph`] is a frozen view over contiguous storage. Nodes and edges can be
//! reordered and reweighted, but never added or removed, so the const parameters stay true
//! for the lifetime of the value.

use std::cmp::Ordering;
use std::fmt;

use super::connectivity::{Connectivity, EdgeOf};
use super::dynamic_graph::DynamicGraph;
use super::edge::EdgeInit;
use super::flavour::{Flavour, GraphFlavour};
use super::nodes::{NodeStorage, Unweighted};
use super::storage::{Contiguous, ContiguousEdges, EdgeStorage};
use super::weight::{Independent, WeightHandle};
use super::Network;
use crate::error::{GraphError, Result};

/// A graph of exactly `ORDER` nodes and `SIZE` edges.
///
/// Mirrored pairs count once towards `SIZE`, as they do for [`DynamicGraph::size`].
pub struct StaticGraph<
    F,
    const ORDER: usize,
    const SIZE: usize,
    W = Independent<()>,
    N = Unweighted,
    M = (),
>
where
    F: Flavour,
    W: WeightHandle,
    N: NodeStorage,
    M: Clone + PartialEq,
{
    connectivity: Connectivity<F, W, M, Contiguous>,
    nodes: N,
}

impl<F, const ORDER: usize, const SIZE: usize, W, N, M> StaticGraph<F, ORDER, SIZE, W, N, M>
where
    F: Flavour,
    W: WeightHandle,
    N: NodeStorage,
    M: Clone + PartialEq,
{
    fn from_parts(connectivity: Connectivity<F, W, M, Contiguous>, nodes: N) -> Result<Self> {
        let (order, size) = (connectivity.order(), connectivity.size());
        if order != ORDER || size != SIZE {
            return Err(GraphError::StaticShapeMismatch {
                expected_order: ORDER,
                expected_size: SIZE,
                order,
                size,
            });
        }
        Ok(Self {
            connectivity,
            nodes,
        })
    }

    /// Builds a graph from per-node edge lists with default node weights.
    ///
    /// # Errors
    /// Returns [`GraphError::StaticShapeMismatch`] if the lists do not describe exactly
    /// `ORDER` nodes and `SIZE` edges, or any validation error of
    /// [`DynamicGraph::from_edges`].
    pub fn from_edges(partitions: Vec<Vec<EdgeInit<W::Value, M>>>) -> Result<Self>
    where
        N::Weight: Default,
    {
        let (connectivity, nodes) =
            DynamicGraph::<F, W, N, M, Contiguous>::from_edges(partitions)?.into_parts();
        Self::from_parts(connectivity, nodes)
    }

    /// Builds a graph from per-node edge lists and node weights.
    ///
    /// # Errors
    /// As [`from_edges`](Self::from_edges), plus
    /// [`GraphError::InconsistentInitialization`] if the counts differ.
    pub fn from_edges_and_nodes(
        partitions: Vec<Vec<EdgeInit<W::Value, M>>>,
        node_weights: Vec<N::Weight>,
    ) -> Result<Self> {
        let (connectivity, nodes) =
            DynamicGraph::<F, W, N, M, Contiguous>::from_edges_and_nodes(partitions, node_weights)?
                .into_parts();
        Self::from_parts(connectivity, nodes)
    }

    /// Number of nodes.
    #[inline]
    pub const fn order(&self) -> usize {
        ORDER
    }

    /// Number of edges; each mirrored pair counts once.
    #[inline]
    pub const fn size(&self) -> usize {
        SIZE
    }

    /// Runtime flavour tag.
    pub const fn flavour(&self) -> GraphFlavour {
        F::FLAVOUR
    }

    /// Edges hosted by `node`.
    pub fn edges(&self, node: usize) -> Result<&[EdgeOf<F, W, M>]> {
        self.connectivity.edges(node)
    }

    /// Edge at position `pos` of `node`.
    pub fn edge(&self, node: usize, pos: usize) -> Result<&EdgeOf<F, W, M>> {
        self.connectivity.edge(node, pos)
    }

    /// Every partial edge, partition by partition.
    pub fn all_edges(&self) -> &[EdgeOf<F, W, M>] {
        let storage: &ContiguousEdges<EdgeOf<F, W, M>> = self.connectivity.storage();
        storage.as_slice()
    }

    /// Partition offsets into [`all_edges`](Self::all_edges); `ORDER + 1` entries.
    pub fn offsets(&self) -> &[usize] {
        let storage: &ContiguousEdges<EdgeOf<F, W, M>> = self.connectivity.storage();
        storage.offsets()
    }

    /// Location `(node, position)` of the other half of an edge; `None` for directed graphs.
    pub fn partner(&self, node: usize, pos: usize) -> Result<Option<(usize, usize)>> {
        self.connectivity.partner_location(node, pos)
    }

    /// Weight of `node`.
    pub fn node_weight(&self, node: usize) -> Result<&N::Weight> {
        self.nodes.node_weight(node).ok_or(GraphError::NodeOutOfRange {
            operation: "node_weight",
            index: node,
            order: ORDER,
        })
    }

    /// Node weights in node order.
    pub fn node_weights(&self) -> N::Iter<'_> {
        self.nodes.iter()
    }

    /// Replaces the weight of `node`.
    pub fn set_node_weight(&mut self, node: usize, weight: N::Weight) -> Result<()> {
        self.nodes.set_node_weight(node, weight)
    }

    /// Applies `f` to the weight of `node`.
    pub fn mutate_node_weight<R>(
        &mut self,
        node: usize,
        f: impl FnOnce(&mut N::Weight) -> R,
    ) -> Result<R> {
        self.nodes.mutate_node_weight(node, f)
    }

    /// Exchanges two nodes, relabelling every edge.
    pub fn swap_nodes(&mut self, i: usize, j: usize) -> Result<()> {
        self.connectivity.swap_nodes(i, j)?;
        self.nodes.swap_nodes(i, j)
    }

    /// Exchanges two edges of `node`.
    pub fn swap_edges(&mut self, node: usize, i: usize, j: usize) -> Result<()> {
        self.connectivity.swap_edges(node, i, j)
    }

    /// Stably sorts the edges of `node`.
    pub fn sort_edges<C>(&mut self, node: usize, compare: C) -> Result<()>
    where
        C: FnMut(&EdgeOf<F, W, M>, &EdgeOf<F, W, M>) -> Ordering,
    {
        self.connectivity.sort_edges(node, compare)
    }

    /// Replaces the weight of an edge; mirrored copies are kept in step.
    pub fn set_edge_weight(&mut self, node: usize, pos: usize, weight: W::Value) -> Result<()> {
        self.connectivity.set_edge_weight(node, pos, weight)
    }

    /// Applies `f` to the weight of an edge; mirrored copies are kept in step.
    pub fn mutate_edge_weight<R>(
        &mut self,
        node: usize,
        pos: usize,
        f: impl FnOnce(&mut W::Value) -> R,
    ) -> Result<R> {
        self.connectivity.mutate_edge_weight(node, pos, f)
    }

    /// Replaces the metadata of one partial edge.
    pub fn set_edge_meta(&mut self, node: usize, pos: usize, meta: M) -> Result<()> {
        self.connectivity.set_edge_meta(node, pos, meta)
    }

    /// Applies `f` to the metadata of one partial edge.
    pub fn mutate_edge_meta<R>(
        &mut self,
        node: usize,
        pos: usize,
        f: impl FnOnce(&mut M) -> R,
    ) -> Result<R> {
        self.connectivity.mutate_edge_meta(node, pos, f)
    }

    /// Checks every structural invariant of the flavour.
    pub fn validate(&self) -> Result<()> {
        self.connectivity.audit()
    }
}

impl<F, const ORDER: usize, const SIZE: usize, W, N, M>
    TryFrom<DynamicGraph<F, W, N, M, Contiguous>> for StaticGraph<F, ORDER, SIZE, W, N, M>
where
    F: Flavour,
    W: WeightHandle,
    N: NodeStorage,
    M: Clone + PartialEq,
{
    type Error = GraphError;

    fn try_from(graph: DynamicGraph<F, W, N, M, Contiguous>) -> Result<Self> {
        let (connectivity, nodes) = graph.into_parts();
        Self::from_parts(connectivity, nodes)
    }
}

impl<F, const ORDER: usize, const SIZE: usize, W, N, M> Clone
    for StaticGraph<F, ORDER, SIZE, W, N, M>
where
    F: Flavour,
    W: WeightHandle,
    N: NodeStorage + Clone,
    M: Clone + PartialEq,
{
    fn clone(&self) -> Self {
        Self {
            connectivity: self.connectivity.deep_copy(),
            nodes: self.nodes.clone(),
        }
    }
}

impl<F, const ORDER: usize, const SIZE: usize, W, N, M> PartialEq
    for StaticGraph<F, ORDER, SIZE, W, N, M>
where
    F: Flavour,
    W: WeightHandle,
    N: NodeStorage,
    M: Clone + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.nodes.iter().eq(other.nodes.iter())
            && self.connectivity.same_edges(&other.connectivity)
    }
}

impl<F, const ORDER: usize, const SIZE: usize, W, N, M> fmt::Debug
    for StaticGraph<F, ORDER, SIZE, W, N, M>
where
    F: Flavour,
    W: WeightHandle,
    N: NodeStorage,
    N::Weight: fmt::Debug,
    M: Clone + PartialEq,
    EdgeOf<F, W, M>: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticGraph")
            .field("flavour", &F::FLAVOUR)
            .field("order", &ORDER)
            .field("size", &SIZE)
            .field("nodes", &self.nodes.iter().collect::<Vec<_>>())
            .field("edges", &self.connectivity.storage().partitions().collect::<Vec<_>>())
            .finish()
    }
}

impl<F, const ORDER: usize, const SIZE: usize, W, N, M> Network
    for StaticGraph<F, ORDER, SIZE, W, N, M>
where
    F: Flavour,
    W: WeightHandle,
    N: NodeStorage,
    M: Clone + PartialEq,
{
    type Flavour = F;
    type Edge = EdgeOf<F, W, M>;
    type NodeWeight = N::Weight;

    #[inline]
    fn order(&self) -> usize {
        ORDER
    }

    #[inline]
    fn size(&self) -> usize {
        SIZE
    }

    #[inline]
    fn partition(&self, node: usize) -> &[Self::Edge] {
        self.connectivity.partition(node)
    }

    #[inline]
    fn node_weight_at(&self, node: usize) -> Option<&N::Weight> {
        self.nodes.node_weight(node)
    }
}
