//! Flavour-aware edge bookkeeping.
//!
//! `Connectivity` owns the partitioned edge storage of a graph and is the only place that
//! mutates it. Every routine keeps the structural invariants of its flavour:
//! - mirrored flavours store each edge twice, once per endpoint (twice at the node for loops)
//! - embedded flavours keep `complementary_index` of each half pointing at the other half
//! - every target (and source) is below the order
//!
//! Embedded mutations funnel through [`Connectivity::remove_slot`],
//! [`Connectivity::insert_slot`] and [`Connectivity::reorder_partition`], which repair the
//! partner indices disturbed by a shift or permutation.

mod validation;

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use std::marker::PhantomData;

use tracing::trace;

use super::edge::{EdgeInit, EdgeParts, GraphEdge};
use super::flavour::{Flavour, GraphFlavour};
use super::storage::{EdgeStorage, StorageKind};
use super::weight::WeightHandle;
use crate::error::{check_edge, check_node, GraphError, Result};

use validation::{validate, Stored};

/// Edge type of flavour `F` with weight handle `W` and metadata `M`.
pub type EdgeOf<F, W, M> = <F as Flavour>::Edge<W, M>;

/// Storage type holding edges of flavour `F` in layout `S`.
pub(crate) type StorageOf<F, W, M, S> = <S as StorageKind>::Storage<EdgeOf<F, W, M>>;

#[inline]
fn comp<E: GraphEdge>(edge: &E) -> usize {
    edge.complementary_index().unwrap_or_default()
}

/// Rearranges `slice` so that `slice[new] == old_slice[new_to_old[new]]`.
fn apply_permutation<E>(slice: &mut [E], new_to_old: &[usize]) {
    let mut placed = vec![false; slice.len()];
    for start in 0..slice.len() {
        if placed[start] {
            continue;
        }
        let mut current = start;
        loop {
            placed[current] = true;
            let source = new_to_old[current];
            if source == start {
                break;
            }
            slice.swap(current, source);
            current = source;
        }
    }
}

pub(crate) struct Connectivity<F, W, M, S>
where
    F: Flavour,
    W: WeightHandle,
    M: Clone + PartialEq,
    S: StorageKind,
{
    edges: StorageOf<F, W, M, S>,
    _flavour: PhantomData<F>,
}

impl<F, W, M, S> Connectivity<F, W, M, S>
where
    F: Flavour,
    W: WeightHandle,
    M: Clone + PartialEq,
    S: StorageKind,
{
    pub(crate) fn with_order(order: usize) -> Self {
        Self::from_storage(StorageOf::<F, W, M, S>::from_partitions(
            (0..order).map(|_| Vec::new()).collect(),
        ))
    }

    pub(crate) fn from_storage(edges: StorageOf<F, W, M, S>) -> Self {
        Self {
            edges,
            _flavour: PhantomData,
        }
    }

    /// Builds connectivity from per-node edge lists after validating them.
    pub(crate) fn from_inits(partitions: Vec<Vec<EdgeInit<W::Value, M>>>) -> Result<Self> {
        let pairing = validate(F::FLAVOUR, &partitions)?;
        let mut built: Vec<Vec<EdgeOf<F, W, M>>> = Vec::with_capacity(partitions.len());
        for (n, partition) in partitions.into_iter().enumerate() {
            let mut edges: Vec<EdgeOf<F, W, M>> = Vec::with_capacity(partition.len());
            for (p, init) in partition.into_iter().enumerate() {
                let weight = match pairing[n][p] {
                    Some((m, q)) if (m, q) < (n, p) => {
                        let partner = if m == n { &edges[q] } else { &built[m][q] };
                        partner.weight_handle().partner()
                    }
                    _ => W::make(init.weight),
                };
                let source = init.source.unwrap_or(n);
                edges.push(<EdgeOf<F, W, M> as GraphEdge>::from_parts(EdgeParts {
                    source,
                    target: init.target,
                    complementary_index: init.complementary_index.unwrap_or_default(),
                    inverted: init.inverted && source == init.target,
                    weight,
                    meta: init.meta,
                }));
            }
            built.push(edges);
        }
        Ok(Self::from_storage(StorageOf::<F, W, M, S>::from_partitions(built)))
    }

    #[inline]
    pub(crate) fn order(&self) -> usize {
        self.edges.num_partitions()
    }

    #[inline]
    pub(crate) fn size(&self) -> usize {
        let stored = self.edges.num_edges();
        if F::FLAVOUR.is_mirrored() {
            stored / 2
        } else {
            stored
        }
    }

    #[inline]
    pub(crate) fn storage(&self) -> &StorageOf<F, W, M, S> {
        &self.edges
    }

    #[inline]
    pub(crate) fn storage_mut(&mut self) -> &mut StorageOf<F, W, M, S> {
        &mut self.edges
    }

    /// Edges hosted by `node`; `node` must be in range.
    #[inline]
    pub(crate) fn partition(&self, node: usize) -> &[EdgeOf<F, W, M>] {
        self.edges.partition(node)
    }

    pub(crate) fn edges(&self, node: usize) -> Result<&[EdgeOf<F, W, M>]> {
        check_node("edges", node, self.order())?;
        Ok(self.edges.partition(node))
    }

    fn check_edge(&self, operation: &'static str, node: usize, pos: usize) -> Result<()> {
        check_node(operation, node, self.order())?;
        check_edge(operation, node, pos, self.edges.partition(node).len())
    }

    pub(crate) fn edge(&self, node: usize, pos: usize) -> Result<&EdgeOf<F, W, M>> {
        self.check_edge("edge", node, pos)?;
        Ok(&self.edges.partition(node)[pos])
    }

    pub(crate) fn add_node(&mut self) -> usize {
        self.edges.add_partition();
        self.order() - 1
    }

    pub(crate) fn insert_node(&mut self, node: usize) -> Result<()> {
        check_node("insert_node", node, self.order() + 1)?;
        self.renumber(|i| if i >= node { i + 1 } else { i });
        self.edges.insert_partition(node);
        Ok(())
    }

    pub(crate) fn erase_node(&mut self, node: usize) -> Result<()> {
        check_node("erase_node", node, self.order())?;
        trace!(node, order = self.order(), "erasing node");

        match F::FLAVOUR {
            GraphFlavour::Directed => {
                for other in (0..self.order()).filter(|&i| i != node) {
                    self.remove_matching(other, |e| e.target() == node);
                }
            }
            GraphFlavour::Undirected => {
                for other in self.partner_nodes(node) {
                    self.remove_matching(other, |e| e.target() == node);
                }
            }
            GraphFlavour::DirectedEmbedded | GraphFlavour::UndirectedEmbedded => {
                for other in self.partner_nodes(node) {
                    let doomed: Vec<usize> = self
                        .edges
                        .partition(other)
                        .iter()
                        .enumerate()
                        .filter(|(_, e)| e.partner_node(other) == node)
                        .map(|(q, _)| q)
                        .collect();
                    for &q in doomed.iter().rev() {
                        self.remove_slot(other, q);
                    }
                }
            }
        }

        self.edges.erase_partition(node);
        self.renumber(|i| if i > node { i - 1 } else { i });
        Ok(())
    }

    /// Joins `u` and `v`, appending the new halves.
    pub(crate) fn join(&mut self, u: usize, v: usize, weight: W::Value, meta: M) -> Result<()> {
        check_node("join", u, self.order())?;
        check_node("join", v, self.order())?;

        match F::FLAVOUR {
            GraphFlavour::Directed => {
                self.edges.push_to_partition(u, Self::make_edge(u, v, 0, W::make(weight), meta));
            }
            GraphFlavour::Undirected => {
                let handle = W::make(weight);
                let mirror = handle.partner();
                self.edges.push_to_partition(u, Self::make_edge(u, v, 0, handle, meta.clone()));
                self.edges.push_to_partition(v, Self::make_edge(v, u, 0, mirror, meta));
            }
            GraphFlavour::DirectedEmbedded | GraphFlavour::UndirectedEmbedded => {
                let pu = self.edges.partition(u).len();
                let pv = self.edges.partition(v).len() + usize::from(u == v);
                self.insert_join(u, pu, v, pv, weight, meta)?;
            }
        }
        Ok(())
    }

    /// Inserts an edge between `u` and `v` at chosen positions.
    ///
    /// The half at `u` is inserted first at `pu`; `pv` is then interpreted against `v`'s
    /// edges as they stand after that insertion. Returns the final positions of both halves.
    pub(crate) fn insert_join(
        &mut self,
        u: usize,
        pu: usize,
        v: usize,
        pv: usize,
        weight: W::Value,
        meta: M,
    ) -> Result<(usize, usize)> {
        const OPERATION: &str = "insert_join";
        check_node(OPERATION, u, self.order())?;
        check_node(OPERATION, v, self.order())?;
        let u_len = self.edges.partition(u).len();
        if pu > u_len {
            return Err(GraphError::InsertionOutOfRange {
                operation: OPERATION,
                node: u,
                index: pu,
                len: u_len,
            });
        }
        let v_len = self.edges.partition(v).len() + usize::from(u == v);
        if pv > v_len {
            return Err(GraphError::InsertionOutOfRange {
                operation: OPERATION,
                node: v,
                index: pv,
                len: v_len,
            });
        }

        let handle = W::make(weight);
        let mirror = handle.partner();
        let (second_host, second_target) = match F::FLAVOUR {
            GraphFlavour::DirectedEmbedded => (u, v),
            _ => (v, u),
        };

        self.insert_slot(u, pu, Self::make_edge(u, v, 0, handle, meta.clone()), None);
        self.insert_slot(
            v,
            pv,
            Self::make_edge(second_host, second_target, 0, mirror, meta),
            (u == v).then_some(pu),
        );

        let pu = if u == v && pv <= pu { pu + 1 } else { pu };
        self.edges.partition_mut(u)[pu].set_complementary_index(pv);
        self.edges.partition_mut(v)[pv].set_complementary_index(pu);
        Ok((pu, pv))
    }

    pub(crate) fn erase_edge(&mut self, node: usize, pos: usize) -> Result<()> {
        self.check_edge("erase_edge", node, pos)?;
        match F::FLAVOUR {
            GraphFlavour::Directed => {
                self.edges.remove_from_partition(node, pos);
            }
            GraphFlavour::Undirected => {
                let (other, q) = self.undirected_partner(node, pos)?;
                self.remove_pair(node, pos, other, q, |s, n, p| {
                    s.edges.remove_from_partition(n, p);
                });
            }
            GraphFlavour::DirectedEmbedded | GraphFlavour::UndirectedEmbedded => {
                let edge = &self.edges.partition(node)[pos];
                let (other, q) = (edge.partner_node(node), comp(edge));
                self.remove_pair(node, pos, other, q, |s, n, p| {
                    s.remove_slot(n, p);
                });
            }
        }
        Ok(())
    }

    pub(crate) fn swap_nodes(&mut self, i: usize, j: usize) -> Result<()> {
        check_node("swap_nodes", i, self.order())?;
        check_node("swap_nodes", j, self.order())?;
        if i == j {
            return Ok(());
        }
        self.renumber(|k| {
            if k == i {
                j
            } else if k == j {
                i
            } else {
                k
            }
        });
        self.edges.swap_partitions(i, j);
        Ok(())
    }

    pub(crate) fn swap_edges(&mut self, node: usize, i: usize, j: usize) -> Result<()> {
        self.check_edge("swap_edges", node, i)?;
        self.check_edge("swap_edges", node, j)?;
        if i == j {
            return Ok(());
        }
        if F::FLAVOUR.is_embedded() {
            let mut new_to_old: Vec<usize> = (0..self.edges.partition(node).len()).collect();
            new_to_old.swap(i, j);
            self.reorder_partition(node, &new_to_old);
        } else {
            self.edges.partition_mut(node).swap(i, j);
        }
        Ok(())
    }

    pub(crate) fn sort_edges<C>(&mut self, node: usize, mut compare: C) -> Result<()>
    where
        C: FnMut(&EdgeOf<F, W, M>, &EdgeOf<F, W, M>) -> Ordering,
    {
        check_node("sort_edges", node, self.order())?;
        let partition = self.edges.partition(node);
        let mut new_to_old: Vec<usize> = (0..partition.len()).collect();
        new_to_old.sort_by(|&a, &b| compare(&partition[a], &partition[b]));
        if F::FLAVOUR.is_embedded() {
            self.reorder_partition(node, &new_to_old);
        } else {
            apply_permutation(self.edges.partition_mut(node), &new_to_old);
        }
        Ok(())
    }

    /// Location of the other half of the edge at `(node, pos)`; `None` for directed graphs.
    pub(crate) fn partner_location(
        &self,
        node: usize,
        pos: usize,
    ) -> Result<Option<(usize, usize)>> {
        self.check_edge("partner_location", node, pos)?;
        match F::FLAVOUR {
            GraphFlavour::Directed => Ok(None),
            GraphFlavour::Undirected => self.undirected_partner(node, pos).map(Some),
            GraphFlavour::DirectedEmbedded | GraphFlavour::UndirectedEmbedded => {
                let edge = &self.edges.partition(node)[pos];
                Ok(Some((edge.partner_node(node), comp(edge))))
            }
        }
    }

    /// Location of a half whose weight must be written alongside `(node, pos)`.
    fn weight_mirror(
        &self,
        operation: &'static str,
        node: usize,
        pos: usize,
    ) -> Result<Option<(usize, usize)>> {
        self.check_edge(operation, node, pos)?;
        if W::SHARED {
            return Ok(None);
        }
        self.partner_location(node, pos)
    }

    pub(crate) fn set_edge_weight(
        &mut self,
        node: usize,
        pos: usize,
        value: W::Value,
    ) -> Result<()> {
        if let Some((other, q)) = self.weight_mirror("set_edge_weight", node, pos)? {
            self.edges.partition_mut(other)[q].weight_handle_mut().set(value.clone());
        }
        self.edges.partition_mut(node)[pos].weight_handle_mut().set(value);
        Ok(())
    }

    pub(crate) fn mutate_edge_weight<R>(
        &mut self,
        node: usize,
        pos: usize,
        f: impl FnOnce(&mut W::Value) -> R,
    ) -> Result<R> {
        let mirror = self.weight_mirror("mutate_edge_weight", node, pos)?;
        let result = self.edges.partition_mut(node)[pos].weight_handle_mut().mutate(f);
        if let Some((other, q)) = mirror {
            let value = (*self.edges.partition(node)[pos].weight()).clone();
            self.edges.partition_mut(other)[q].weight_handle_mut().set(value);
        }
        Ok(result)
    }

    pub(crate) fn set_edge_meta(&mut self, node: usize, pos: usize, meta: M) -> Result<()> {
        self.check_edge("set_edge_meta", node, pos)?;
        *self.edges.partition_mut(node)[pos].meta_mut() = meta;
        Ok(())
    }

    pub(crate) fn mutate_edge_meta<R>(
        &mut self,
        node: usize,
        pos: usize,
        f: impl FnOnce(&mut M) -> R,
    ) -> Result<R> {
        self.check_edge("mutate_edge_meta", node, pos)?;
        Ok(f(self.edges.partition_mut(node)[pos].meta_mut()))
    }

    /// Copies the connectivity, giving the copy its own shared weights.
    pub(crate) fn deep_copy(&self) -> Self {
        let mut seen = HashMap::new();
        let partitions = self
            .edges
            .partitions()
            .map(|partition| {
                partition
                    .iter()
                    .map(|edge| {
                        let mut copy = edge.clone();
                        *copy.weight_handle_mut() = edge.weight_handle().deep_copy(&mut seen);
                        copy
                    })
                    .collect()
            })
            .collect();
        Self::from_storage(StorageOf::<F, W, M, S>::from_partitions(partitions))
    }

    /// Re-checks every structural invariant of the stored edges.
    pub(crate) fn audit(&self) -> Result<()> {
        let views: Vec<Vec<Stored<'_, EdgeOf<F, W, M>>>> = self
            .edges
            .partitions()
            .map(|partition| partition.iter().map(Stored).collect())
            .collect();
        validate(F::FLAVOUR, &views).map(|_| ())
    }

    pub(crate) fn same_edges(&self, other: &Self) -> bool {
        self.order() == other.order()
            && self
                .edges
                .partitions()
                .zip(other.edges.partitions())
                .all(|(a, b)| a == b)
    }

    fn make_edge(
        source: usize,
        target: usize,
        complementary_index: usize,
        weight: W,
        meta: M,
    ) -> EdgeOf<F, W, M> {
        <EdgeOf<F, W, M> as GraphEdge>::from_parts(EdgeParts {
            source,
            target,
            complementary_index,
            inverted: false,
            weight,
            meta,
        })
    }

    /// Distinct nodes other than `node` that share an edge with it.
    fn partner_nodes(&self, node: usize) -> BTreeSet<usize> {
        self.edges
            .partition(node)
            .iter()
            .map(|e| e.partner_node(node))
            .filter(|&other| other != node)
            .collect()
    }

    /// Removes every edge of `node` matching `doomed`; non-embedded flavours only.
    fn remove_matching(&mut self, node: usize, doomed: impl Fn(&EdgeOf<F, W, M>) -> bool) {
        let positions: Vec<usize> = self
            .edges
            .partition(node)
            .iter()
            .enumerate()
            .filter(|(_, e)| doomed(e))
            .map(|(q, _)| q)
            .collect();
        for &q in positions.iter().rev() {
            self.edges.remove_from_partition(node, q);
        }
    }

    /// Removes both halves of an edge, the later one first when they share a node.
    fn remove_pair(
        &mut self,
        node: usize,
        pos: usize,
        other: usize,
        q: usize,
        mut remove: impl FnMut(&mut Self, usize, usize),
    ) {
        if node == other {
            remove(self, node, pos.max(q));
            remove(self, node, pos.min(q));
        } else {
            remove(self, node, pos);
            remove(self, other, q);
        }
    }

    /// Finds the mirror of an undirected half: the first half at the target pointing back
    /// with the same weight.
    fn undirected_partner(&self, node: usize, pos: usize) -> Result<(usize, usize)> {
        let edge = &self.edges.partition(node)[pos];
        let target = edge.target();
        self.edges
            .partition(target)
            .iter()
            .enumerate()
            .find(|&(q, candidate)| {
                candidate.target() == node
                    && (target != node || q != pos)
                    && candidate.weight_handle().same_weight(edge.weight_handle())
            })
            .map(|(q, _)| (target, q))
            .ok_or(GraphError::MissingPartner {
                node,
                index: pos,
                partner: target,
            })
    }

    /// Removes one embedded half, pulling back the partner index of every half it shifts.
    fn remove_slot(&mut self, node: usize, pos: usize) -> EdgeOf<F, W, M> {
        let shifted: Vec<(usize, usize)> = self.edges.partition(node)[pos + 1..]
            .iter()
            .map(|e| (e.partner_node(node), comp(e)))
            .collect();
        for (other, q) in shifted {
            let partner = &mut self.edges.partition_mut(other)[q];
            let index = comp(partner);
            partner.set_complementary_index(index - 1);
        }
        self.edges.remove_from_partition(node, pos)
    }

    /// Inserts one embedded half, pushing forward the partner index of every half it
    /// shifts. The half at `skip` is a placeholder whose partner does not exist yet.
    fn insert_slot(&mut self, node: usize, pos: usize, edge: EdgeOf<F, W, M>, skip: Option<usize>) {
        let shifted: Vec<(usize, usize)> = self.edges.partition(node)[pos..]
            .iter()
            .enumerate()
            .filter(|&(offset, _)| skip != Some(pos + offset))
            .map(|(_, e)| (e.partner_node(node), comp(e)))
            .collect();
        for (other, q) in shifted {
            let partner = &mut self.edges.partition_mut(other)[q];
            let index = comp(partner);
            partner.set_complementary_index(index + 1);
        }
        self.edges.insert_into_partition(node, pos, edge);
    }

    /// Permutes the edges of `node`, keeping embedded partner indices consistent.
    fn reorder_partition(&mut self, node: usize, new_to_old: &[usize]) {
        let mut old_to_new = vec![0; new_to_old.len()];
        for (new, &old) in new_to_old.iter().enumerate() {
            old_to_new[old] = new;
        }
        for old in 0..new_to_old.len() {
            let edge = &self.edges.partition(node)[old];
            let (other, q) = (edge.partner_node(node), comp(edge));
            if other == node {
                self.edges.partition_mut(node)[old].set_complementary_index(old_to_new[q]);
            } else {
                self.edges.partition_mut(other)[q].set_complementary_index(old_to_new[old]);
            }
        }
        apply_permutation(self.edges.partition_mut(node), new_to_old);
    }

    /// Rewrites every node index stored in an edge.
    fn renumber(&mut self, map: impl Fn(usize) -> usize) {
        trace!(order = self.order(), "renumbering edge endpoints");
        let directed_embedded = F::FLAVOUR == GraphFlavour::DirectedEmbedded;
        for node in 0..self.order() {
            for edge in self.edges.partition_mut(node) {
                edge.set_target(map(edge.target()));
                if directed_embedded {
                    if let Some(source) = edge.source() {
                        edge.set_source(map(source));
                    }
                }
            }
        }
    }
}

impl<F, W, M, S> Clone for Connectivity<F, W, M, S>
where
    F: Flavour,
    W: WeightHandle,
    M: Clone + PartialEq,
    S: StorageKind,
{
    fn clone(&self) -> Self {
        self.deep_copy()
    }
}
