//! Edge weight ownership policies.
//!
//! Each partial edge holds a weight *handle*. With [`Independent`] the two halves of a
//! mirrored edge carry their own copies, kept in step by the graph. With [`Shared`] both
//! halves point at one value, so a write through either side is seen by the other.

use std::collections::HashMap;
use std::fmt;
use std::ops::Deref;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

/// Read/write access to an edge weight, independent of how it is owned.
pub trait WeightHandle: Clone {
    /// The weight value.
    type Value: Clone + PartialEq;

    /// Read guard returned by [`get`](Self::get).
    type Ref<'a>: Deref<Target = Self::Value>
    where
        Self: 'a;

    /// Whether partner halves alias one value.
    const SHARED: bool;

    /// Wraps a value in a fresh handle.
    fn make(value: Self::Value) -> Self;

    /// Borrows the weight.
    fn get(&self) -> Self::Ref<'_>;

    /// Replaces the weight.
    fn set(&mut self, value: Self::Value);

    /// Applies `f` to the weight in place and returns its result.
    fn mutate<R>(&mut self, f: impl FnOnce(&mut Self::Value) -> R) -> R;

    /// Handle for the partner half of a mirrored edge.
    ///
    /// Shared handles alias; independent handles copy.
    fn partner(&self) -> Self {
        self.clone()
    }

    /// Whether two handles may belong to the two halves of one edge.
    ///
    /// Shared handles compare by identity, independent ones by value.
    fn same_weight(&self, other: &Self) -> bool;

    /// Value equality.
    fn value_eq(&self, other: &Self) -> bool {
        *self.get() == *other.get()
    }

    /// Copies the handle into a new graph.
    ///
    /// `seen` maps the identity of each shared value already copied to its copy, so both
    /// halves of an edge end up sharing the same new value.
    fn deep_copy(&self, seen: &mut HashMap<usize, Self>) -> Self;
}

/// A weight owned by value; copying the edge copies the weight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Independent<T>(T);

impl<T> Independent<T> {
    /// Wraps `value`.
    pub const fn new(value: T) -> Self {
        Self(value)
    }

    /// Unwraps the value.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: Clone + PartialEq> WeightHandle for Independent<T> {
    type Value = T;
    type Ref<'a> = &'a T where Self: 'a;
    const SHARED: bool = false;

    #[inline]
    fn make(value: T) -> Self {
        Self(value)
    }

    #[inline]
    fn get(&self) -> &T {
        &self.0
    }

    #[inline]
    fn set(&mut self, value: T) {
        self.0 = value;
    }

    #[inline]
    fn mutate<R>(&mut self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.0)
    }

    #[inline]
    fn same_weight(&self, other: &Self) -> bool {
        self.0 == other.0
    }

    fn deep_copy(&self, _seen: &mut HashMap<usize, Self>) -> Self {
        self.clone()
    }
}

/// A weight shared between the two halves of an edge.
///
/// Cloning the handle aliases the value. Copying a whole graph does not: see
/// [`WeightHandle::deep_copy`].
pub struct Shared<T>(Arc<RwLock<T>>);

impl<T> Shared<T> {
    /// Wraps `value` in a new shared cell.
    pub fn new(value: T) -> Self {
        Self(Arc::new(RwLock::new(value)))
    }

    /// Whether both handles refer to the same value.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Number of handles currently sharing the value.
    pub fn share_count(&self) -> usize {
        Arc::strong_count(&self.0)
    }

    fn identity(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }
}

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T: fmt::Debug> fmt::Debug for Shared<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let guard = self.0.read().unwrap_or_else(PoisonError::into_inner);
        f.debug_tuple("Shared").field(&*guard).finish()
    }
}

impl<T: Clone + PartialEq> WeightHandle for Shared<T> {
    type Value = T;
    type Ref<'a> = RwLockReadGuard<'a, T> where Self: 'a;
    const SHARED: bool = true;

    fn make(value: T) -> Self {
        Self::new(value)
    }

    fn get(&self) -> RwLockReadGuard<'_, T> {
        self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn set(&mut self, value: T) {
        *self.0.write().unwrap_or_else(PoisonError::into_inner) = value;
    }

    fn mutate<R>(&mut self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = self.0.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    fn same_weight(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }

    fn value_eq(&self, other: &Self) -> bool {
        // Avoid taking the same read lock twice.
        self.ptr_eq(other) || *self.get() == *other.get()
    }

    fn deep_copy(&self, seen: &mut HashMap<usize, Self>) -> Self {
        seen.entry(self.identity())
            .or_insert_with(|| Self::new((*self.get()).clone()))
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_independent_partner_is_a_copy() {
        let mut a = Independent::make(3);
        let b = a.partner();
        a.set(5);
        assert_eq!(*a.get(), 5);
        assert_eq!(*b.get(), 3);
        assert!(!a.same_weight(&b));
    }

    #[test]
    fn test_shared_partner_aliases() {
        let mut a = Shared::make(String::from("x"));
        let b = a.partner();
        a.mutate(|s| s.push('y'));
        assert_eq!(&*b.get(), "xy");
        assert!(a.same_weight(&b));
        assert!(a.value_eq(&b));
        assert_eq!(a.share_count(), 2);
    }

    #[test]
    fn test_shared_same_weight_is_identity() {
        let a = Shared::make(1);
        let b = Shared::make(1);
        assert!(!a.same_weight(&b));
        assert!(a.value_eq(&b));
    }

    #[test]
    fn test_deep_copy_deduplicates_shared() {
        let a = Shared::make(7);
        let b = a.partner();
        let mut seen = HashMap::new();
        let a2 = a.deep_copy(&mut seen);
        let b2 = b.deep_copy(&mut seen);
        assert!(a2.ptr_eq(&b2));
        assert!(!a2.ptr_eq(&a));
        assert_eq!(*a2.get(), 7);
        assert_eq!(seen.len(), 1);
    }
}
