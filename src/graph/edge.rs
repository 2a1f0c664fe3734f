//! Edge representations.
//!
//! A graph stores *partial edges*: the view of an edge from the node hosting it. Directed
//! graphs host each edge once, at its source. The other flavours host it at both ends, and
//! the embedded ones additionally record the position of the partner half inside the
//! other endpoint's edge list.

use std::fmt;

use super::weight::WeightHandle;

/// Everything needed to build any edge type; fields a type has no use for are ignored.
#[derive(Debug, Clone)]
pub struct EdgeParts<W, M> {
    /// Source node (directed-embedded only).
    pub source: usize,
    /// Target node.
    pub target: usize,
    /// Position of the partner half (embedded only).
    pub complementary_index: usize,
    /// Loop orientation flag (directed-embedded only).
    pub inverted: bool,
    /// Weight handle.
    pub weight: W,
    /// Metadata.
    pub meta: M,
}

/// Common interface over the edge types.
pub trait GraphEdge: Clone + PartialEq {
    /// Weight handle type.
    type Weight: WeightHandle;
    /// Per-partial-edge metadata.
    type Meta: Clone + PartialEq;

    /// Builds an edge from its parts.
    fn from_parts(parts: EdgeParts<Self::Weight, Self::Meta>) -> Self;

    /// Target node.
    fn target(&self) -> usize;

    /// Retargets the edge.
    fn set_target(&mut self, target: usize);

    /// Source node, for edges that record it.
    fn source(&self) -> Option<usize> {
        None
    }

    /// Sets the source, for edges that record it.
    fn set_source(&mut self, _source: usize) {}

    /// Position of the partner half, for embedded edges.
    fn complementary_index(&self) -> Option<usize> {
        None
    }

    /// Moves the partner position, for embedded edges.
    fn set_complementary_index(&mut self, _index: usize) {}

    /// Whether a directed-embedded loop fires from its other half.
    fn inverted(&self) -> bool {
        false
    }

    /// Weight handle.
    fn weight_handle(&self) -> &Self::Weight;

    /// Mutable weight handle.
    fn weight_handle_mut(&mut self) -> &mut Self::Weight;

    /// Metadata.
    fn meta(&self) -> &Self::Meta;

    /// Mutable metadata.
    fn meta_mut(&mut self) -> &mut Self::Meta;

    /// Borrows the weight value.
    fn weight(&self) -> <Self::Weight as WeightHandle>::Ref<'_> {
        self.weight_handle().get()
    }

    /// Replaces the weight of this half only.
    ///
    /// A shared weight is seen by the partner half too; an independent one is not. Use the
    /// graph's `set_edge_weight` to keep mirrored halves in step.
    fn set_weight(&mut self, value: <Self::Weight as WeightHandle>::Value) {
        self.weight_handle_mut().set(value);
    }

    /// Applies `f` to the weight of this half and returns its result.
    fn mutate_weight<R>(
        &mut self,
        f: impl FnOnce(&mut <Self::Weight as WeightHandle>::Value) -> R,
    ) -> R {
        self.weight_handle_mut().mutate(f)
    }

    /// Node at the other end, seen from `host`.
    #[inline]
    fn partner_node(&self, host: usize) -> usize {
        match self.source() {
            Some(source) if source != host => source,
            _ => self.target(),
        }
    }

    /// Whether both ends are the same node.
    #[inline]
    fn is_loop(&self, host: usize) -> bool {
        self.partner_node(host) == host
    }
}

/// A partial edge of a directed or undirected graph.
#[derive(Clone)]
pub struct PartialEdge<W, M = ()> {
    target: usize,
    weight: W,
    meta: M,
}

impl<W: WeightHandle, M> PartialEdge<W, M> {
    /// Creates a partial edge pointing at `target`.
    pub fn new(target: usize, weight: W::Value, meta: M) -> Self {
        Self {
            target,
            weight: W::make(weight),
            meta,
        }
    }
}

impl<W: WeightHandle, M: Clone + PartialEq> GraphEdge for PartialEdge<W, M> {
    type Weight = W;
    type Meta = M;

    fn from_parts(parts: EdgeParts<W, M>) -> Self {
        Self {
            target: parts.target,
            weight: parts.weight,
            meta: parts.meta,
        }
    }

    #[inline]
    fn target(&self) -> usize {
        self.target
    }

    #[inline]
    fn set_target(&mut self, target: usize) {
        self.target = target;
    }

    #[inline]
    fn weight_handle(&self) -> &W {
        &self.weight
    }

    #[inline]
    fn weight_handle_mut(&mut self) -> &mut W {
        &mut self.weight
    }

    #[inline]
    fn meta(&self) -> &M {
        &self.meta
    }

    #[inline]
    fn meta_mut(&mut self) -> &mut M {
        &mut self.meta
    }
}

impl<W: WeightHandle, M: PartialEq> PartialEq for PartialEdge<W, M> {
    fn eq(&self, other: &Self) -> bool {
        self.target == other.target
            && self.weight.value_eq(&other.weight)
            && self.meta == other.meta
    }
}

impl<W: fmt::Debug, M: fmt::Debug> fmt::Debug for PartialEdge<W, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartialEdge")
            .field("target", &self.target)
            .field("weight", &self.weight)
            .field("meta", &self.meta)
            .finish()
    }
}

/// A partial edge of an undirected embedded graph.
#[derive(Clone)]
pub struct EmbeddedPartialEdge<W, M = ()> {
    target: usize,
    complementary_index: usize,
    weight: W,
    meta: M,
}

impl<W: WeightHandle, M: Clone + PartialEq> GraphEdge for EmbeddedPartialEdge<W, M> {
    type Weight = W;
    type Meta = M;

    fn from_parts(parts: EdgeParts<W, M>) -> Self {
        Self {
            target: parts.target,
            complementary_index: parts.complementary_index,
            weight: parts.weight,
            meta: parts.meta,
        }
    }

    #[inline]
    fn target(&self) -> usize {
        self.target
    }

    #[inline]
    fn set_target(&mut self, target: usize) {
        self.target = target;
    }

    #[inline]
    fn complementary_index(&self) -> Option<usize> {
        Some(self.complementary_index)
    }

    #[inline]
    fn set_complementary_index(&mut self, index: usize) {
        self.complementary_index = index;
    }

    #[inline]
    fn weight_handle(&self) -> &W {
        &self.weight
    }

    #[inline]
    fn weight_handle_mut(&mut self) -> &mut W {
        &mut self.weight
    }

    #[inline]
    fn meta(&self) -> &M {
        &self.meta
    }

    #[inline]
    fn meta_mut(&mut self) -> &mut M {
        &mut self.meta
    }
}

impl<W: WeightHandle, M: PartialEq> PartialEq for EmbeddedPartialEdge<W, M> {
    fn eq(&self, other: &Self) -> bool {
        self.target == other.target
            && self.complementary_index == other.complementary_index
            && self.weight.value_eq(&other.weight)
            && self.meta == other.meta
    }
}

impl<W: fmt::Debug, M: fmt::Debug> fmt::Debug for EmbeddedPartialEdge<W, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmbeddedPartialEdge")
            .field("target", &self.target)
            .field("complementary_index", &self.complementary_index)
            .field("weight", &self.weight)
            .field("meta", &self.meta)
            .finish()
    }
}

/// A full edge of a directed embedded graph; both endpoints host a copy.
#[derive(Clone)]
pub struct EmbeddedEdge<W, M = ()> {
    source: usize,
    target: usize,
    complementary_index: usize,
    inverted: bool,
    weight: W,
    meta: M,
}

impl<W: WeightHandle, M: Clone + PartialEq> GraphEdge for EmbeddedEdge<W, M> {
    type Weight = W;
    type Meta = M;

    fn from_parts(parts: EdgeParts<W, M>) -> Self {
        Self {
            source: parts.source,
            target: parts.target,
            complementary_index: parts.complementary_index,
            inverted: parts.inverted,
            weight: parts.weight,
            meta: parts.meta,
        }
    }

    #[inline]
    fn target(&self) -> usize {
        self.target
    }

    #[inline]
    fn set_target(&mut self, target: usize) {
        self.target = target;
    }

    #[inline]
    fn source(&self) -> Option<usize> {
        Some(self.source)
    }

    #[inline]
    fn set_source(&mut self, source: usize) {
        self.source = source;
    }

    #[inline]
    fn complementary_index(&self) -> Option<usize> {
        Some(self.complementary_index)
    }

    #[inline]
    fn set_complementary_index(&mut self, index: usize) {
        self.complementary_index = index;
    }

    #[inline]
    fn inverted(&self) -> bool {
        self.inverted
    }

    #[inline]
    fn weight_handle(&self) -> &W {
        &self.weight
    }

    #[inline]
    fn weight_handle_mut(&mut self) -> &mut W {
        &mut self.weight
    }

    #[inline]
    fn meta(&self) -> &M {
        &self.meta
    }

    #[inline]
    fn meta_mut(&mut self) -> &mut M {
        &mut self.meta
    }
}

impl<W: WeightHandle, M: PartialEq> PartialEq for EmbeddedEdge<W, M> {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
            && self.target == other.target
            && self.complementary_index == other.complementary_index
            && self.inverted == other.inverted
            && self.weight.value_eq(&other.weight)
            && self.meta == other.meta
    }
}

impl<W: fmt::Debug, M: fmt::Debug> fmt::Debug for EmbeddedEdge<W, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmbeddedEdge")
            .field("source", &self.source)
            .field("target", &self.target)
            .field("complementary_index", &self.complementary_index)
            .field("inverted", &self.inverted)
            .field("weight", &self.weight)
            .field("meta", &self.meta)
            .finish()
    }
}

/// One entry of an edge list handed to a graph constructor.
///
/// Which fields matter depends on the flavour: embedded graphs need
/// `complementary_index`; directed-embedded graphs use `source` (defaulting to the host
/// node) and, for loops, `inverted`.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeInit<T = (), M = ()> {
    /// Target node.
    pub target: usize,
    /// Source node; `None` means the hosting node.
    pub source: Option<usize>,
    /// Position of the partner entry.
    pub complementary_index: Option<usize>,
    /// Loop orientation flag.
    pub inverted: bool,
    /// Weight value.
    pub weight: T,
    /// Metadata.
    pub meta: M,
}

impl<T: Default, M: Default> EdgeInit<T, M> {
    /// An entry pointing at `target` with default weight and metadata.
    pub fn to(target: usize) -> Self {
        Self::weighted(target, T::default())
    }
}

impl<T, M: Default> EdgeInit<T, M> {
    /// An entry pointing at `target` carrying `weight`.
    pub fn weighted(target: usize, weight: T) -> Self {
        Self {
            target,
            source: None,
            complementary_index: None,
            inverted: false,
            weight,
            meta: M::default(),
        }
    }
}

impl<T, M> EdgeInit<T, M> {
    /// Sets the partner position.
    #[must_use]
    pub fn comp(mut self, index: usize) -> Self {
        self.complementary_index = Some(index);
        self
    }

    /// Sets the source node.
    #[must_use]
    pub fn from_node(mut self, source: usize) -> Self {
        self.source = Some(source);
        self
    }

    /// Flags a directed-embedded loop as inverted.
    #[must_use]
    pub fn inverted(mut self) -> Self {
        self.inverted = true;
        self
    }

    /// Replaces the metadata.
    #[must_use]
    pub fn meta<N>(self, meta: N) -> EdgeInit<T, N> {
        EdgeInit {
            target: self.target,
            source: self.source,
            complementary_index: self.complementary_index,
            inverted: self.inverted,
            weight: self.weight,
            meta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::weight::{Independent, Shared};

    fn parts<W: WeightHandle>(
        source: usize,
        target: usize,
        comp: usize,
        weight: W::Value,
    ) -> EdgeParts<W, ()> {
        EdgeParts {
            source,
            target,
            complementary_index: comp,
            inverted: false,
            weight: W::make(weight),
            meta: (),
        }
    }

    #[test]
    fn test_partial_edge_ignores_embedding() {
        let e = PartialEdge::<Independent<i32>>::from_parts(parts(9, 2, 4, 5));
        assert_eq!(e.target(), 2);
        assert_eq!(e.source(), None);
        assert_eq!(e.complementary_index(), None);
        assert_eq!(*e.weight(), 5);
        assert_eq!(e.partner_node(0), 2);
    }

    #[test]
    fn test_embedded_edge_partner_node() {
        let e = EmbeddedEdge::<Independent<()>>::from_parts(parts(1, 3, 0, ()));
        assert_eq!(e.partner_node(1), 3);
        assert_eq!(e.partner_node(3), 1);
        assert!(!e.is_loop(1));

        let l = EmbeddedEdge::<Independent<()>>::from_parts(parts(2, 2, 1, ()));
        assert!(l.is_loop(2));
    }

    #[test]
    fn test_equality_compares_weight_values() {
        let a = EmbeddedPartialEdge::<Shared<i32>>::from_parts(parts(0, 1, 0, 3));
        let b = EmbeddedPartialEdge::<Shared<i32>>::from_parts(parts(0, 1, 0, 3));
        let c = EmbeddedPartialEdge::<Shared<i32>>::from_parts(parts(0, 1, 1, 3));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_edge_init_builders() {
        let init: EdgeInit<f64> = EdgeInit::weighted(3, 1.5).comp(2).from_node(1).inverted();
        assert_eq!(init.target, 3);
        assert_eq!(init.source, Some(1));
        assert_eq!(init.complementary_index, Some(2));
        assert!(init.inverted);
        let tagged = init.meta("x");
        assert_eq!(tagged.meta, "x");
    }

    #[test]
    fn test_weight_writes_through_the_edge() {
        let mut own = PartialEdge::<Independent<i32>>::from_parts(parts(0, 1, 0, 1));
        let copy = own.clone();
        own.set_weight(4);
        assert_eq!(own.mutate_weight(|w| std::mem::replace(w, 6)), 4);
        assert_eq!((*own.weight(), *copy.weight()), (6, 1));

        let mut half = EmbeddedPartialEdge::<Shared<i32>>::from_parts(parts(0, 1, 0, 1));
        let other = EmbeddedPartialEdge::from_parts(EdgeParts {
            source: 1,
            target: 0,
            complementary_index: 0,
            inverted: false,
            weight: half.weight_handle().partner(),
            meta: (),
        });
        half.set_weight(9);
        half.mutate_weight(|w| *w += 1);
        assert_eq!(*other.weight(), 10);
    }
}
