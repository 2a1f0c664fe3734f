//! Edge storage backends.
//!
//! Edges are grouped into one *partition* per node. Two layouts are provided:
//! - [`ContiguousEdges`]: every edge in one vector plus CSR-style partition offsets
//! - [`BucketedEdges`]: one vector per node
//!
//! Graph code only sees partitions as slices, so the layouts are interchangeable. Index
//! arguments are preconditions here; the graph layer validates them first.

mod bucketed;
mod contiguous;

pub use bucketed::BucketedEdges;
pub use contiguous::ContiguousEdges;

/// Partitioned edge storage.
pub trait EdgeStorage<E>: Default {
    /// Builds storage from per-node edge lists.
    fn from_partitions(partitions: Vec<Vec<E>>) -> Self;

    /// Number of partitions.
    fn num_partitions(&self) -> usize;

    /// Total number of stored edges.
    fn num_edges(&self) -> usize;

    /// Edges of partition `i`.
    fn partition(&self, i: usize) -> &[E];

    /// Mutable edges of partition `i`.
    fn partition_mut(&mut self, i: usize) -> &mut [E];

    /// Appends an empty partition.
    fn add_partition(&mut self);

    /// Inserts an empty partition before `i`.
    fn insert_partition(&mut self, i: usize);

    /// Removes partition `i` together with its edges.
    fn erase_partition(&mut self, i: usize);

    /// Exchanges the contents of two partitions.
    fn swap_partitions(&mut self, i: usize, j: usize);

    /// Appends an edge to partition `i`.
    fn push_to_partition(&mut self, i: usize, edge: E);

    /// Inserts an edge into partition `i` before `pos`.
    fn insert_into_partition(&mut self, i: usize, pos: usize, edge: E);

    /// Removes the edge at `pos` of partition `i`.
    fn remove_from_partition(&mut self, i: usize, pos: usize) -> E;

    /// Reserves room for `additional` more partitions.
    fn reserve_partitions(&mut self, additional: usize);

    /// Number of partitions storable without reallocating.
    fn partition_capacity(&self) -> usize;

    /// Releases unused capacity.
    fn shrink_to_fit(&mut self);

    /// Iterates over all partitions in order.
    fn partitions(&self) -> Partitions<'_, E, Self>
    where
        Self: Sized,
    {
        Partitions {
            storage: self,
            front: 0,
            back: self.num_partitions(),
            _edge: std::marker::PhantomData,
        }
    }
}

/// Iterator over the partitions of an [`EdgeStorage`].
pub struct Partitions<'a, E, S> {
    storage: &'a S,
    front: usize,
    back: usize,
    _edge: std::marker::PhantomData<&'a [E]>,
}

impl<'a, E: 'a, S: EdgeStorage<E>> Iterator for Partitions<'a, E, S> {
    type Item = &'a [E];

    fn next(&mut self) -> Option<&'a [E]> {
        if self.front == self.back {
            return None;
        }
        let part = self.storage.partition(self.front);
        self.front += 1;
        Some(part)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.back - self.front;
        (n, Some(n))
    }
}

impl<'a, E: 'a, S: EdgeStorage<E>> DoubleEndedIterator for Partitions<'a, E, S> {
    fn next_back(&mut self) -> Option<&'a [E]> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        Some(self.storage.partition(self.back))
    }
}

impl<'a, E: 'a, S: EdgeStorage<E>> ExactSizeIterator for Partitions<'a, E, S> {}

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Contiguous {}
    impl Sealed for super::Bucketed {}
}

/// Type-level choice of edge storage layout.
pub trait StorageKind: sealed::Sealed + Copy + Default + std::fmt::Debug + Send + Sync + 'static {
    /// Storage type for edges of type `E`.
    type Storage<E: Clone>: EdgeStorage<E> + Clone;
}

/// Selects [`ContiguousEdges`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Contiguous;

/// Selects [`BucketedEdges`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Bucketed;

impl StorageKind for Contiguous {
    type Storage<E: Clone> = ContiguousEdges<E>;
}

impl StorageKind for Bucketed {
    type Storage<E: Clone> = BucketedEdges<E>;
}
