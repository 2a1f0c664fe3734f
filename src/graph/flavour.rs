//! Graph flavours.
//!
//! A flavour fixes how many partial edges represent one logical edge and how a traversal
//! classifies them. Flavours are zero-sized marker types; each one names its edge type and
//! maps to a [`GraphFlavour`] tag that the algorithms match on exhaustively.

use std::fmt::Debug;

use super::edge::{EmbeddedEdge, EmbeddedPartialEdge, GraphEdge, PartialEdge};
use super::weight::WeightHandle;

/// The closed set of graph flavours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GraphFlavour {
    /// One partial edge per edge, hosted at the source.
    Directed,
    /// Two partial edges per edge, one per endpoint.
    Undirected,
    /// Two full edges per edge, each knowing where its partner lives.
    DirectedEmbedded,
    /// Two partial edges per edge, each knowing where its partner lives.
    UndirectedEmbedded,
}

impl GraphFlavour {
    /// Whether edges have a direction.
    pub const fn is_directed(self) -> bool {
        matches!(self, Self::Directed | Self::DirectedEmbedded)
    }

    /// Whether partial edges carry a complementary index.
    pub const fn is_embedded(self) -> bool {
        matches!(self, Self::DirectedEmbedded | Self::UndirectedEmbedded)
    }

    /// Whether every edge is stored twice.
    pub const fn is_mirrored(self) -> bool {
        !matches!(self, Self::Directed)
    }
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Directed {}
    impl Sealed for super::Undirected {}
    impl Sealed for super::DirectedEmbedded {}
    impl Sealed for super::UndirectedEmbedded {}
}

/// Type-level flavour selector.
pub trait Flavour: sealed::Sealed + Copy + Default + Debug + Send + Sync + 'static {
    /// Runtime tag.
    const FLAVOUR: GraphFlavour;

    /// Edge type stored by graphs of this flavour.
    type Edge<W: WeightHandle, M: Clone + PartialEq>: GraphEdge<Weight = W, Meta = M>;
}

/// Flavours where each edge is seen from both endpoints, so a traversal meets it twice.
pub trait Symmetric: Flavour {}

/// Flavours whose partial edges record the position of their partner.
pub trait Embedded: Flavour {}

/// Edges point from source to target; only the source hosts them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Directed;

/// Edges have no direction; each endpoint hosts one half.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Undirected;

/// Directed edges hosted at both endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DirectedEmbedded;

/// Undirected edges whose halves know each other's position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct UndirectedEmbedded;

impl Flavour for Directed {
    const FLAVOUR: GraphFlavour = GraphFlavour::Directed;
    type Edge<W: WeightHandle, M: Clone + PartialEq> = PartialEdge<W, M>;
}

impl Flavour for Undirected {
    const FLAVOUR: GraphFlavour = GraphFlavour::Undirected;
    type Edge<W: WeightHandle, M: Clone + PartialEq> = PartialEdge<W, M>;
}

impl Flavour for DirectedEmbedded {
    const FLAVOUR: GraphFlavour = GraphFlavour::DirectedEmbedded;
    type Edge<W: WeightHandle, M: Clone + PartialEq> = EmbeddedEdge<W, M>;
}

impl Flavour for UndirectedEmbedded {
    const FLAVOUR: GraphFlavour = GraphFlavour::UndirectedEmbedded;
    type Edge<W: WeightHandle, M: Clone + PartialEq> = EmbeddedPartialEdge<W, M>;
}

impl Symmetric for Undirected {}
impl Symmetric for UndirectedEmbedded {}

impl Embedded for DirectedEmbedded {}
impl Embedded for UndirectedEmbedded {}
