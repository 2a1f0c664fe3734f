//! Contiguous edge storage: one vector of edges with per-node partition offsets.

use super::EdgeStorage;

/// All edges in a single vector; partition `i` spans `offsets[i]..offsets[i + 1]`.
///
/// Favors locality: a full sweep over the graph walks one allocation. Inserting into an
/// early partition shifts every later edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContiguousEdges<E> {
    edges: Vec<E>,
    offsets: Vec<usize>,
}

impl<E> Default for ContiguousEdges<E> {
    fn default() -> Self {
        Self {
            edges: Vec::new(),
            offsets: vec![0],
        }
    }
}

impl<E> ContiguousEdges<E> {
    #[inline]
    fn bounds(&self, i: usize) -> (usize, usize) {
        (self.offsets[i], self.offsets[i + 1])
    }

    fn shift_offsets_after(&mut self, i: usize, grow: bool) {
        for offset in &mut self.offsets[i + 1..] {
            if grow {
                *offset += 1;
            } else {
                *offset -= 1;
            }
        }
    }

    /// Reserves room for `additional` more edges.
    pub fn reserve_edges(&mut self, additional: usize) {
        self.edges.reserve(additional);
    }

    /// Number of edges storable without reallocating.
    pub fn edge_capacity(&self) -> usize {
        self.edges.capacity()
    }

    /// Every edge, partition by partition.
    pub fn as_slice(&self) -> &[E] {
        &self.edges
    }

    /// Partition offsets; one more entry than there are partitions.
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }
}

impl<E> EdgeStorage<E> for ContiguousEdges<E> {
    fn from_partitions(partitions: Vec<Vec<E>>) -> Self {
        let total = partitions.iter().map(Vec::len).sum();
        let mut edges = Vec::with_capacity(total);
        let mut offsets = Vec::with_capacity(partitions.len() + 1);
        offsets.push(0);
        for partition in partitions {
            edges.extend(partition);
            offsets.push(edges.len());
        }
        Self { edges, offsets }
    }

    #[inline]
    fn num_partitions(&self) -> usize {
        self.offsets.len() - 1
    }

    #[inline]
    fn num_edges(&self) -> usize {
        self.edges.len()
    }

    #[inline]
    fn partition(&self, i: usize) -> &[E] {
        let (start, end) = self.bounds(i);
        &self.edges[start..end]
    }

    #[inline]
    fn partition_mut(&mut self, i: usize) -> &mut [E] {
        let (start, end) = self.bounds(i);
        &mut self.edges[start..end]
    }

    fn add_partition(&mut self) {
        self.offsets.push(self.edges.len());
    }

    fn insert_partition(&mut self, i: usize) {
        let start = self.offsets[i];
        self.offsets.insert(i, start);
    }

    fn erase_partition(&mut self, i: usize) {
        let (start, end) = self.bounds(i);
        let removed = end - start;
        self.edges.drain(start..end);
        self.offsets.remove(i + 1);
        for offset in &mut self.offsets[i + 1..] {
            *offset -= removed;
        }
    }

    fn swap_partitions(&mut self, i: usize, j: usize) {
        if i == j {
            return;
        }
        let (i, j) = if i < j { (i, j) } else { (j, i) };
        let (a_start, a_end) = self.bounds(i);
        let (b_start, b_end) = self.bounds(j);
        let a_len = a_end - a_start;
        let b_len = b_end - b_start;
        let middle = b_start - a_end;

        // [A M B] -> [M B A] -> [B M A]
        self.edges[a_start..b_end].rotate_left(a_len);
        self.edges[a_start..a_start + middle + b_len].rotate_left(middle);

        for offset in &mut self.offsets[i + 1..=j] {
            *offset = *offset - a_len + b_len;
        }
    }

    fn push_to_partition(&mut self, i: usize, edge: E) {
        let end = self.offsets[i + 1];
        self.edges.insert(end, edge);
        self.shift_offsets_after(i, true);
    }

    fn insert_into_partition(&mut self, i: usize, pos: usize, edge: E) {
        let start = self.offsets[i];
        self.edges.insert(start + pos, edge);
        self.shift_offsets_after(i, true);
    }

    fn remove_from_partition(&mut self, i: usize, pos: usize) -> E {
        let start = self.offsets[i];
        let edge = self.edges.remove(start + pos);
        self.shift_offsets_after(i, false);
        edge
    }

    fn reserve_partitions(&mut self, additional: usize) {
        self.offsets.reserve(additional);
    }

    fn partition_capacity(&self) -> usize {
        self.offsets.capacity() - 1
    }

    fn shrink_to_fit(&mut self) {
        self.edges.shrink_to_fit();
        self.offsets.shrink_to_fit();
    }
}
