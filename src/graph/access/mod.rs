//! Internal building blocks shared by graph algorithms.
//!
//! `pub(crate)` so traversal bookkeeping stays out of the public API surface.

pub(crate) mod visited;
