//! Node weight storage.
//!
//! [`Weighted`] keeps one value per node. [`Unweighted`] is used when nodes carry no
//! information and degenerates to a counter with no allocation.

use std::marker::PhantomData;
use std::slice;

use crate::error::{GraphError, Result};

/// Ordered storage of node weights.
pub trait NodeStorage: Default {
    /// Node weight type.
    type Weight: Clone + PartialEq;

    /// Forward and reverse iteration over the weights.
    type Iter<'a>: DoubleEndedIterator<Item = &'a Self::Weight> + ExactSizeIterator
    where
        Self: 'a;

    /// Number of nodes.
    fn len(&self) -> usize;

    /// Whether there are no nodes.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends a node.
    fn add_node(&mut self, weight: Self::Weight);

    /// Inserts a node before `pos`; `pos == len()` appends.
    fn insert_node(&mut self, pos: usize, weight: Self::Weight) -> Result<()>;

    /// Removes the node at `pos`.
    fn erase_node(&mut self, pos: usize) -> Result<()>;

    /// Removes the nodes in `[first, last)`.
    fn erase_nodes(&mut self, first: usize, last: usize) -> Result<()>;

    /// Exchanges two nodes.
    fn swap_nodes(&mut self, i: usize, j: usize) -> Result<()>;

    /// Weight of the node at `pos`.
    fn node_weight(&self, pos: usize) -> Option<&Self::Weight>;

    /// Replaces the weight of the node at `pos`.
    fn set_node_weight(&mut self, pos: usize, weight: Self::Weight) -> Result<()>;

    /// Applies `f` to the weight of the node at `pos`.
    fn mutate_node_weight<R>(
        &mut self,
        pos: usize,
        f: impl FnOnce(&mut Self::Weight) -> R,
    ) -> Result<R>;

    /// Iterates over the weights in node order.
    fn iter(&self) -> Self::Iter<'_>;

    /// Reserves room for `additional` more nodes.
    fn reserve(&mut self, additional: usize);

    /// Number of nodes storable without reallocating.
    fn capacity(&self) -> usize;

    /// Releases unused capacity.
    fn shrink_to_fit(&mut self);
}

fn check_pos(operation: &'static str, pos: usize, len: usize) -> Result<()> {
    crate::error::check_node(operation, pos, len)
}

fn check_range(operation: &'static str, first: usize, last: usize, len: usize) -> Result<()> {
    if first > last {
        return Err(GraphError::InvalidRange {
            operation,
            first,
            last,
        });
    }
    if last > len {
        return Err(GraphError::NodeOutOfRange {
            operation,
            index: last - 1,
            order: len,
        });
    }
    Ok(())
}

/// One stored weight per node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Weighted<T> {
    weights: Vec<T>,
}

impl<T> Default for Weighted<T> {
    fn default() -> Self {
        Self {
            weights: Vec::new(),
        }
    }
}

impl<T> Weighted<T> {
    /// Storage holding `weights`, one per node.
    pub fn from_weights(weights: Vec<T>) -> Self {
        Self { weights }
    }

    /// Mutable iteration over the weights.
    pub fn iter_mut(&mut self) -> slice::IterMut<'_, T> {
        self.weights.iter_mut()
    }

    /// The weights as a slice.
    pub fn as_slice(&self) -> &[T] {
        &self.weights
    }
}

impl<T: Clone + PartialEq> NodeStorage for Weighted<T> {
    type Weight = T;
    type Iter<'a> = slice::Iter<'a, T> where Self: 'a;

    #[inline]
    fn len(&self) -> usize {
        self.weights.len()
    }

    fn add_node(&mut self, weight: T) {
        self.weights.push(weight);
    }

    fn insert_node(&mut self, pos: usize, weight: T) -> Result<()> {
        check_pos("insert_node", pos, self.weights.len() + 1)?;
        self.weights.insert(pos, weight);
        Ok(())
    }

    fn erase_node(&mut self, pos: usize) -> Result<()> {
        check_pos("erase_node", pos, self.weights.len())?;
        self.weights.remove(pos);
        Ok(())
    }

    fn erase_nodes(&mut self, first: usize, last: usize) -> Result<()> {
        check_range("erase_nodes", first, last, self.weights.len())?;
        self.weights.drain(first..last);
        Ok(())
    }

    fn swap_nodes(&mut self, i: usize, j: usize) -> Result<()> {
        check_pos("swap_nodes", i, self.weights.len())?;
        check_pos("swap_nodes", j, self.weights.len())?;
        self.weights.swap(i, j);
        Ok(())
    }

    #[inline]
    fn node_weight(&self, pos: usize) -> Option<&T> {
        self.weights.get(pos)
    }

    fn set_node_weight(&mut self, pos: usize, weight: T) -> Result<()> {
        check_pos("set_node_weight", pos, self.weights.len())?;
        self.weights[pos] = weight;
        Ok(())
    }

    fn mutate_node_weight<R>(&mut self, pos: usize, f: impl FnOnce(&mut T) -> R) -> Result<R> {
        check_pos("mutate_node_weight", pos, self.weights.len())?;
        Ok(f(&mut self.weights[pos]))
    }

    fn iter(&self) -> slice::Iter<'_, T> {
        self.weights.iter()
    }

    fn reserve(&mut self, additional: usize) {
        self.weights.reserve(additional);
    }

    fn capacity(&self) -> usize {
        self.weights.capacity()
    }

    fn shrink_to_fit(&mut self) {
        self.weights.shrink_to_fit();
    }
}

/// Node storage for nodes without weights: just a count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Unweighted {
    len: usize,
}

impl Unweighted {
    /// Storage for `len` nodes.
    pub const fn with_len(len: usize) -> Self {
        Self { len }
    }
}

/// Iterator yielding `&()` once per node.
#[derive(Debug, Clone)]
pub struct UnitIter<'a> {
    remaining: usize,
    _marker: PhantomData<&'a ()>,
}

impl<'a> Iterator for UnitIter<'a> {
    type Item = &'a ();

    fn next(&mut self) -> Option<&'a ()> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(&())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a> DoubleEndedIterator for UnitIter<'a> {
    fn next_back(&mut self) -> Option<&'a ()> {
        self.next()
    }
}

impl ExactSizeIterator for UnitIter<'_> {}

impl NodeStorage for Unweighted {
    type Weight = ();
    type Iter<'a> = UnitIter<'a>;

    #[inline]
    fn len(&self) -> usize {
        self.len
    }

    fn add_node(&mut self, _weight: ()) {
        self.len += 1;
    }

    fn insert_node(&mut self, pos: usize, _weight: ()) -> Result<()> {
        check_pos("insert_node", pos, self.len + 1)?;
        self.len += 1;
        Ok(())
    }

    fn erase_node(&mut self, pos: usize) -> Result<()> {
        check_pos("erase_node", pos, self.len)?;
        self.len -= 1;
        Ok(())
    }

    fn erase_nodes(&mut self, first: usize, last: usize) -> Result<()> {
        check_range("erase_nodes", first, last, self.len)?;
        self.len -= last - first;
        Ok(())
    }

    fn swap_nodes(&mut self, i: usize, j: usize) -> Result<()> {
        check_pos("swap_nodes", i, self.len)?;
        check_pos("swap_nodes", j, self.len)
    }

    #[inline]
    fn node_weight(&self, pos: usize) -> Option<&()> {
        (pos < self.len).then_some(&())
    }

    fn set_node_weight(&mut self, pos: usize, _weight: ()) -> Result<()> {
        check_pos("set_node_weight", pos, self.len)
    }

    fn mutate_node_weight<R>(&mut self, pos: usize, f: impl FnOnce(&mut ()) -> R) -> Result<R> {
        check_pos("mutate_node_weight", pos, self.len)?;
        Ok(f(&mut ()))
    }

    fn iter(&self) -> UnitIter<'_> {
        UnitIter {
            remaining: self.len,
            _marker: PhantomData,
        }
    }

    fn reserve(&mut self, _additional: usize) {}

    fn capacity(&self) -> usize {
        usize::MAX
    }

    fn shrink_to_fit(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weighted_insert_erase_swap() {
        let mut nodes = Weighted::from_weights(vec![1, 2, 3]);
        nodes.insert_node(3, 4).unwrap();
        nodes.insert_node(0, 0).unwrap();
        assert_eq!(nodes.as_slice(), &[0, 1, 2, 3, 4]);

        nodes.swap_nodes(0, 4).unwrap();
        assert_eq!(nodes.as_slice(), &[4, 1, 2, 3, 0]);

        nodes.erase_nodes(1, 3).unwrap();
        assert_eq!(nodes.as_slice(), &[4, 3, 0]);
        assert_eq!(nodes.iter().rev().copied().collect::<Vec<_>>(), vec![0, 3, 4]);
    }

    #[test]
    fn test_weighted_errors() {
        let mut nodes = Weighted::from_weights(vec!['a', 'b']);
        assert!(matches!(nodes.erase_node(2), Err(GraphError::NodeOutOfRange { .. })));
        assert!(matches!(nodes.swap_nodes(0, 2), Err(GraphError::NodeOutOfRange { .. })));
        assert!(matches!(nodes.set_node_weight(2, 'c'), Err(GraphError::NodeOutOfRange { .. })));
        assert!(matches!(
            nodes.erase_nodes(2, 1),
            Err(GraphError::InvalidRange { first: 2, last: 1, .. })
        ));
        assert!(matches!(nodes.insert_node(3, 'z'), Err(GraphError::NodeOutOfRange { .. })));
    }

    #[test]
    fn test_weighted_mutate_returns_result() {
        let mut nodes = Weighted::from_weights(vec![10]);
        let old = nodes.mutate_node_weight(0, |w| std::mem::replace(w, 11)).unwrap();
        assert_eq!(old, 10);
        assert_eq!(nodes.node_weight(0), Some(&11));
        for w in nodes.iter_mut() {
            *w += 1;
        }
        assert_eq!(nodes.node_weight(0), Some(&12));
    }

    #[test]
    fn test_unweighted_is_a_counter() {
        let mut nodes = Unweighted::default();
        nodes.add_node(());
        nodes.add_node(());
        nodes.insert_node(1, ()).unwrap();
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes.iter().len(), 3);
        assert_eq!(nodes.iter().rev().count(), 3);
        assert_eq!(nodes.node_weight(2), Some(&()));
        assert_eq!(nodes.node_weight(3), None);

        nodes.erase_nodes(0, 2).unwrap();
        assert_eq!(nodes.len(), 1);
        assert!(nodes.erase_node(1).is_err());
        assert!(nodes.swap_nodes(0, 1).is_err());
        assert!(nodes.erase_nodes(1, 0).is_err());
        assert_eq!(std::mem::size_of::<Unweighted>(), std::mem::size_of::<usize>());
    }

    fn weights_of<N: NodeStorage>(nodes: &N) -> Vec<N::Weight> {
        nodes.iter().cloned().collect()
    }

    #[test]
    fn test_unweighted_iterates_through_the_trait() {
        let nodes = Unweighted::with_len(2);
        assert_eq!(weights_of(&nodes), vec![(), ()]);
        let borrowed: Vec<&()> = nodes.iter().rev().collect();
        assert_eq!(borrowed.len(), 2);
    }
}
