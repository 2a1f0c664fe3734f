//! Growable graphs.

use std::cmp::Ordering;
use std::fmt;

use super::connectivity::{Connectivity, EdgeOf};
use super::edge::EdgeInit;
use super::flavour::{
    Directed, DirectedEmbedded, Embedded, Flavour, GraphFlavour, Undirected, UndirectedEmbedded,
};
use super::nodes::{NodeStorage, Unweighted};
use super::storage::{
    Bucketed, BucketedEdges, Contiguous, ContiguousEdges, EdgeStorage, StorageKind,
};
use super::weight::{Independent, WeightHandle};
use super::Network;
use crate::error::{check_node, GraphError, Result};

/// A graph whose nodes and edges can be added and removed at runtime.
///
/// Type parameters:
/// - `F`: flavour ([`Directed`], [`Undirected`], [`DirectedEmbedded`], [`UndirectedEmbedded`])
/// - `W`: edge weight handle; [`Independent<()>`] for unweighted edges
/// - `N`: node storage; [`Unweighted`] stores nothing per node
/// - `M`: per-partial-edge metadata
/// - `S`: edge storage layout ([`Contiguous`] or [`Bucketed`])
///
/// ### Performance Characteristics
/// | Operation | Contiguous | Bucketed |
/// |-----------|------------|----------|
/// | `join` | \(O(E)\) worst case | \(O(1)\) amortized |
/// | `erase_edge` | \(O(E)\) | \(O(\deg)\) |
/// | `erase_node` | \(O(E)\) | \(O(E)\) |
/// | `edges(n)` | \(O(1)\) | \(O(1)\) |
pub struct DynamicGraph<F, W = Independent<()>, N = Unweighted, M = (), S = Contiguous>
where
    F: Flavour,
    W: WeightHandle,
    N: NodeStorage,
    M: Clone + PartialEq,
    S: StorageKind,
{
    connectivity: Connectivity<F, W, M, S>,
    nodes: N,
}

/// Directed graph.
pub type DirectedGraph<W = Independent<()>, N = Unweighted, M = (), S = Contiguous> =
    DynamicGraph<Directed, W, N, M, S>;

/// Undirected graph.
pub type UndirectedGraph<W = Independent<()>, N = Unweighted, M = (), S = Contiguous> =
    DynamicGraph<Undirected, W, N, M, S>;

/// Directed graph hosting each edge at both endpoints.
pub type DirectedEmbeddedGraph<W = Independent<()>, N = Unweighted, M = (), S = Contiguous> =
    DynamicGraph<DirectedEmbedded, W, N, M, S>;

/// Undirected graph whose edge halves know each other's position.
pub type UndirectedEmbeddedGraph<W = Independent<()>, N = Unweighted, M = (), S = Contiguous> =
    DynamicGraph<UndirectedEmbedded, W, N, M, S>;

impl<F, W, N, M, S> DynamicGraph<F, W, N, M, S>
where
    F: Flavour,
    W: WeightHandle,
    N: NodeStorage,
    M: Clone + PartialEq,
    S: StorageKind,
{
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self {
            connectivity: Connectivity::with_order(0),
            nodes: N::default(),
        }
    }

    /// Creates a graph of `order` isolated nodes with default weights.
    pub fn with_order(order: usize) -> Self
    where
        N::Weight: Default,
    {
        let mut nodes = N::default();
        nodes.reserve(order);
        for _ in 0..order {
            nodes.add_node(N::Weight::default());
        }
        Self {
            connectivity: Connectivity::with_order(order),
            nodes,
        }
    }

    /// Builds a graph from per-node edge lists, validating them for the flavour.
    ///
    /// Nodes get default weights.
    ///
    /// # Errors
    /// Returns [`GraphError::InvalidEdgeList`] or [`GraphError::NodeOutOfRange`] if the lists
    /// break an invariant of the flavour.
    pub fn from_edges(partitions: Vec<Vec<EdgeInit<W::Value, M>>>) -> Result<Self>
    where
        N::Weight: Default,
    {
        let order = partitions.len();
        let weights = (0..order).map(|_| N::Weight::default()).collect();
        Self::from_edges_and_nodes(partitions, weights)
    }

    /// Builds a graph from per-node edge lists and node weights.
    ///
    /// # Errors
    /// Returns [`GraphError::InconsistentInitialization`] if the counts differ, or any error
    /// of [`from_edges`](Self::from_edges).
    pub fn from_edges_and_nodes(
        partitions: Vec<Vec<EdgeInit<W::Value, M>>>,
        node_weights: Vec<N::Weight>,
    ) -> Result<Self> {
        if partitions.len() != node_weights.len() {
            return Err(GraphError::InconsistentInitialization {
                nodes: node_weights.len(),
                partitions: partitions.len(),
            });
        }
        let connectivity = Connectivity::from_inits(partitions)?;
        let mut nodes = N::default();
        nodes.reserve(node_weights.len());
        for weight in node_weights {
            nodes.add_node(weight);
        }
        Ok(Self {
            connectivity,
            nodes,
        })
    }

    /// Number of nodes.
    #[inline]
    pub fn order(&self) -> usize {
        self.connectivity.order()
    }

    /// Number of edges; each mirrored pair counts once.
    #[inline]
    pub fn size(&self) -> usize {
        self.connectivity.size()
    }

    /// Whether the graph has no nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order() == 0
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

    /// Location `(node, position)` of the other half of an edge; `None` for directed graphs.
    pub fn partner(&self, node: usize, pos: usize) -> Result<Option<(usize, usize)>> {
        self.connectivity.partner_location(node, pos)
    }

    /// Weight of `node`.
    pub fn node_weight(&self, node: usize) -> Result<&N::Weight> {
        let order = self.order();
        self.nodes.node_weight(node).ok_or(GraphError::NodeOutOfRange {
            operation: "node_weight",
            index: node,
            order,
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

    /// Appends a node and returns its index.
    pub fn add_node(&mut self, weight: N::Weight) -> usize {
        self.nodes.add_node(weight);
        self.connectivity.add_node()
    }

    /// Inserts a node at `node`, shifting later nodes up by one.
    pub fn insert_node(&mut self, node: usize, weight: N::Weight) -> Result<usize> {
        self.nodes.insert_node(node, weight)?;
        self.connectivity.insert_node(node)?;
        Ok(node)
    }

    /// Removes `node` and every edge touching it; later nodes shift down by one.
    pub fn erase_node(&mut self, node: usize) -> Result<()> {
        check_node("erase_node", node, self.order())?;
        self.nodes.erase_node(node)?;
        self.connectivity.erase_node(node)
    }

    /// Removes the nodes in `first..last` and every edge touching them.
    pub fn erase_nodes(&mut self, first: usize, last: usize) -> Result<()> {
        self.nodes.erase_nodes(first, last)?;
        for node in (first..last).rev() {
            self.connectivity.erase_node(node)?;
        }
        Ok(())
    }

    /// Joins `u` to `v`.
    pub fn join(&mut self, u: usize, v: usize, weight: W::Value) -> Result<()>
    where
        M: Default,
    {
        self.connectivity.join(u, v, weight, M::default())
    }

    /// Joins `u` to `v`, attaching `meta` to every partial edge created.
    pub fn join_with_meta(&mut self, u: usize, v: usize, weight: W::Value, meta: M) -> Result<()> {
        self.connectivity.join(u, v, weight, meta)
    }

    /// Removes the edge at position `pos` of `node`, together with its other half.
    pub fn erase_edge(&mut self, node: usize, pos: usize) -> Result<()> {
        self.connectivity.erase_edge(node, pos)
    }

    /// Exchanges two nodes, relabelling every edge.
    pub fn swap_nodes(&mut self, i: usize, j: usize) -> Result<()> {
        check_node("swap_nodes", i, self.order())?;
        check_node("swap_nodes", j, self.order())?;
        self.nodes.swap_nodes(i, j)?;
        self.connectivity.swap_nodes(i, j)
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

    /// Reserves room for `additional` more nodes.
    pub fn reserve_nodes(&mut self, additional: usize) {
        self.nodes.reserve(additional);
        self.connectivity.storage_mut().reserve_partitions(additional);
    }

    /// Number of nodes storable without reallocating.
    pub fn node_capacity(&self) -> usize {
        self.nodes.capacity().min(self.connectivity.storage().partition_capacity())
    }

    /// Releases unused node and edge capacity.
    pub fn shrink_to_fit(&mut self) {
        self.nodes.shrink_to_fit();
        self.connectivity.storage_mut().shrink_to_fit();
    }

    /// Checks every structural invariant of the flavour.
    ///
    /// Graph operations maintain these; this is an audit for tests and debugging.
    pub fn validate(&self) -> Result<()> {
        self.connectivity.audit()
    }

    pub(crate) fn into_parts(self) -> (Connectivity<F, W, M, S>, N) {
        (self.connectivity, self.nodes)
    }
}

impl<F, W, N, M, S> DynamicGraph<F, W, N, M, S>
where
    F: Embedded,
    W: WeightHandle,
    N: NodeStorage,
    M: Clone + PartialEq,
    S: StorageKind,
{
    /// Joins `u` to `v`, placing the new halves at chosen positions.
    ///
    /// The half at `u` goes to position `pu` first; `pv` then refers to `v`'s edges as
    /// they stand after that insertion. Returns the final positions of both halves.
    pub fn insert_join(
        &mut self,
        u: usize,
        pu: usize,
        v: usize,
        pv: usize,
        weight: W::Value,
    ) -> Result<(usize, usize)>
    where
        M: Default,
    {
        self.connectivity.insert_join(u, pu, v, pv, weight, M::default())
    }

    /// As [`insert_join`](Self::insert_join), attaching `meta` to both halves.
    pub fn insert_join_with_meta(
        &mut self,
        u: usize,
        pu: usize,
        v: usize,
        pv: usize,
        weight: W::Value,
        meta: M,
    ) -> Result<(usize, usize)> {
        self.connectivity.insert_join(u, pu, v, pv, weight, meta)
    }
}

impl<F, W, N, M> DynamicGraph<F, W, N, M, Contiguous>
where
    F: Flavour,
    W: WeightHandle,
    N: NodeStorage,
    M: Clone + PartialEq,
{
    /// Reserves room for `additional` more partial edges.
    pub fn reserve_edges(&mut self, additional: usize) {
        let storage: &mut ContiguousEdges<EdgeOf<F, W, M>> = self.connectivity.storage_mut();
        storage.reserve_edges(additional);
    }

    /// Number of partial edges storable without reallocating.
    pub fn edge_capacity(&self) -> usize {
        let storage: &ContiguousEdges<EdgeOf<F, W, M>> = self.connectivity.storage();
        storage.edge_capacity()
    }
}

impl<F, W, N, M> DynamicGraph<F, W, N, M, Bucketed>
where
    F: Flavour,
    W: WeightHandle,
    N: NodeStorage,
    M: Clone + PartialEq,
{
    /// Reserves room for `additional` more partial edges at `node`.
    pub fn reserve_edges_at(&mut self, node: usize, additional: usize) -> Result<()> {
        check_node("reserve_edges_at", node, self.order())?;
        let storage: &mut BucketedEdges<EdgeOf<F, W, M>> = self.connectivity.storage_mut();
        storage.reserve_edges_at(node, additional);
        Ok(())
    }

    /// Number of partial edges `node` can host without reallocating.
    pub fn edge_capacity_at(&self, node: usize) -> Result<usize> {
        check_node("edge_capacity_at", node, self.order())?;
        let storage: &BucketedEdges<EdgeOf<F, W, M>> = self.connectivity.storage();
        Ok(storage.edge_capacity_at(node))
    }
}

impl<F, W, N, M, S> Default for DynamicGraph<F, W, N, M, S>
where
    F: Flavour,
    W: WeightHandle,
    N: NodeStorage,
    M: Clone + PartialEq,
    S: StorageKind,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Copies are deep: shared weights are duplicated, each pair of halves sharing its new copy.
impl<F, W, N, M, S> Clone for DynamicGraph<F, W, N, M, S>
where
    F: Flavour,
    W: WeightHandle,
    N: NodeStorage + Clone,
    M: Clone + PartialEq,
    S: StorageKind,
{
    fn clone(&self) -> Self {
        Self {
            connectivity: self.connectivity.deep_copy(),
            nodes: self.nodes.clone(),
        }
    }
}

impl<F, W, N, M, S> PartialEq for DynamicGraph<F, W, N, M, S>
where
    F: Flavour,
    W: WeightHandle,
    N: NodeStorage,
    M: Clone + PartialEq,
    S: StorageKind,
{
    fn eq(&self, other: &Self) -> bool {
        self.nodes.iter().eq(other.nodes.iter())
            && self.connectivity.same_edges(&other.connectivity)
    }
}

impl<F, W, N, M, S> fmt::Debug for DynamicGraph<F, W, N, M, S>
where
    F: Flavour,
    W: WeightHandle,
    N: NodeStorage,
    N::Weight: fmt::Debug,
    M: Clone + PartialEq,
    S: StorageKind,
    EdgeOf<F, W, M>: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicGraph")
            .field("flavour", &F::FLAVOUR)
            .field("nodes", &self.nodes.iter().collect::<Vec<_>>())
            .field("edges", &self.connectivity.storage().partitions().collect::<Vec<_>>())
            .finish()
    }
}

impl<F, W, N, M, S> Network for DynamicGraph<F, W, N, M, S>
where
    F: Flavour,
    W: WeightHandle,
    N: NodeStorage,
    M: Clone + PartialEq,
    S: StorageKind,
{
    type Flavour = F;
    type Edge = EdgeOf<F, W, M>;
    type NodeWeight = N::Weight;

    #[inline]
    fn order(&self) -> usize {
        self.connectivity.order()
    }

    #[inline]
    fn size(&self) -> usize {
        self.connectivity.size()
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

#[cfg(test)]
mod tests;
