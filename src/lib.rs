//! # `grove` - flavour-polymorphic graphs
//!
//! One graph engine serving four flavours of connectivity, a traversal engine that honours
//! the visiting rules of each flavour, and interchangeable execution models deciding where
//! traversal hooks run.
//!
//! ## Flavours
//!
//! | Flavour | Stored per edge | Traversal reports |
//! |---------|-----------------|-------------------|
//! | [`Directed`](graph::Directed) | one half at the source | first traversal once |
//! | [`Undirected`](graph::Undirected) | a mirrored half at each end | first and second traversal |
//! | [`UndirectedEmbedded`](graph::UndirectedEmbedded) | mirrored halves knowing each other's position | first and second traversal |
//! | [`DirectedEmbedded`](graph::DirectedEmbedded) | a half at source and target, both recording the source | first traversal once |
//!
//! The flavour is a zero-sized type parameter. It selects the partial-edge type and, through
//! the [`Symmetric`](graph::Symmetric) marker, whether a second-traversal hook may be given.
//!
//! ## Architecture
//!
//! 1. **Storage** ([`graph::storage`]): edges are partitioned per node, either in one
//!    contiguous vector or one vector per node.
//! 2. **Weights** ([`graph::weight`]): edge weights are held by value ([`Independent`](graph::Independent))
//!    or shared between mirrored halves ([`Shared`](graph::Shared)).
//! 3. **Graphs**: [`DynamicGraph`](graph::DynamicGraph) grows and shrinks;
//!    [`StaticGraph`](graph::StaticGraph) fixes order and size in its type.
//! 4. **Traversal** ([`graph::traversal`]): breadth-, depth- and priority-first search with
//!    up to four hooks.
//! 5. **Execution models** ([`concurrency`]): serial, one thread per task, or a thread pool.
//!
//! ## Example
//!
//! ```rust
//! use grove::concurrency::ThreadPool;
//! use grove::graph::traversal::Traversal;
//! use grove::graph::{DirectedGraph, GraphEdge, Independent};
//!
//! let mut g = DirectedGraph::<Independent<u32>>::with_order(3);
//! g.join(0, 1, 10).unwrap();
//! g.join(1, 2, 20).unwrap();
//!
//! let weights = Traversal::new(&g)
//!     .edge_first_traversal(|e| *e.edge.weight())
//!     .breadth_first(ThreadPool::new(2))
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(weights, vec![10, 20]);
//! ```

#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod concurrency;
pub mod error;
pub mod graph;

pub use error::{GraphError, Result, TaskError};

// Compile-time layout checks for the zero-information cases.
const _: () = {
    use core::mem;

    assert!(mem::size_of::<graph::Unweighted>() == mem::size_of::<usize>());
    assert!(mem::size_of::<graph::Independent<()>>() == 0);
    assert!(mem::size_of::<graph::traversal::NoHook>() == 0);

    // An unweighted directed partial edge is just its target.
    assert!(
        mem::size_of::<graph::edge::PartialEdge<graph::Independent<()>>>()
            == mem::size_of::<usize>()
    );
};
