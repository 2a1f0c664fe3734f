//! Bucketed edge storage: one vector per node.

use super::EdgeStorage;

/// One independently allocated edge list per node.
///
/// Insertions and removals only move edges of the affected node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketedEdges<E> {
    buckets: Vec<Vec<E>>,
}

impl<E> Default for BucketedEdges<E> {
    fn default() -> Self {
        Self {
            buckets: Vec::new(),
        }
    }
}

impl<E> BucketedEdges<E> {
    /// Reserves room for `additional` more edges at node `i`.
    pub fn reserve_edges_at(&mut self, i: usize, additional: usize) {
        self.buckets[i].reserve(additional);
    }

    /// Number of edges node `i` can hold without reallocating.
    pub fn edge_capacity_at(&self, i: usize) -> usize {
        self.buckets[i].capacity()
    }
}

impl<E> EdgeStorage<E> for BucketedEdges<E> {
    fn from_partitions(partitions: Vec<Vec<E>>) -> Self {
        Self {
            buckets: partitions,
        }
    }

    #[inline]
    fn num_partitions(&self) -> usize {
        self.buckets.len()
    }

    fn num_edges(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    #[inline]
    fn partition(&self, i: usize) -> &[E] {
        &self.buckets[i]
    }

    #[inline]
    fn partition_mut(&mut self, i: usize) -> &mut [E] {
        &mut self.buckets[i]
    }

    fn add_partition(&mut self) {
        self.buckets.push(Vec::new());
    }

    fn insert_partition(&mut self, i: usize) {
        self.buckets.insert(i, Vec::new());
    }

    fn erase_partition(&mut self, i: usize) {
        self.buckets.remove(i);
    }

    fn swap_partitions(&mut self, i: usize, j: usize) {
        self.buckets.swap(i, j);
    }

    fn push_to_partition(&mut self, i: usize, edge: E) {
        self.buckets[i].push(edge);
    }

    fn insert_into_partition(&mut self, i: usize, pos: usize, edge: E) {
        self.buckets[i].insert(pos, edge);
    }

    fn remove_from_partition(&mut self, i: usize, pos: usize) -> E {
        self.buckets[i].remove(pos)
    }

    fn reserve_partitions(&mut self, additional: usize) {
        self.buckets.reserve(additional);
    }

    fn partition_capacity(&self) -> usize {
        self.buckets.capacity()
    }

    fn shrink_to_fit(&mut self) {
        self.buckets.shrink_to_fit();
        for bucket in &mut self.buckets {
            bucket.shrink_to_fit();
        }
    }
}
