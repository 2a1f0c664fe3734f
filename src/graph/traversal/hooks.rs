//! Traversal hooks and their dispatch through an execution model.
//!
//! A hook slot holds either [`NoHook`], which dispatches nothing and compiles away, or a
//! [`Hook`] wrapping a caller closure. Dispatch clones what the task needs and hands a
//! `'static` closure to the model, so the same hooks run serially or on worker threads.

use std::sync::Arc;

use crate::concurrency::ExecutionModel;

/// Marker for an absent hook.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoHook;

/// A caller-supplied hook closure.
pub struct Hook<F>(pub(crate) Arc<F>);

impl<F> Hook<F> {
    pub(crate) fn new(f: F) -> Self {
        Self(Arc::new(f))
    }
}

impl<F> Clone for Hook<F> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

/// An edge as seen by an edge hook: the partial edge at position `position` of `host`.
#[derive(Debug, Clone, PartialEq)]
pub struct TraversedEdge<E> {
    /// Node whose edge list holds the edge.
    pub host: usize,
    /// Position of the edge in that list.
    pub position: usize,
    /// Copy of the partial edge.
    pub edge: E,
}

/// A hook slot taking a node index.
pub trait NodeHook<R> {
    /// Hands the hook call for `node` to `model`.
    fn dispatch<X>(&self, model: &mut X, node: usize)
    where
        X: ExecutionModel<Return = R>;
}

impl<R> NodeHook<R> for NoHook {
    #[inline(always)]
    fn dispatch<X>(&self, _model: &mut X, _node: usize)
    where
        X: ExecutionModel<Return = R>,
    {
    }
}

impl<R, F> NodeHook<R> for Hook<F>
where
    F: Fn(usize) -> R + Send + Sync + 'static,
{
    #[inline]
    fn dispatch<X>(&self, model: &mut X, node: usize)
    where
        X: ExecutionModel<Return = R>,
    {
        let hook = Arc::clone(&self.0);
        model.push(move || hook(node));
    }
}

/// A hook slot taking a traversed edge.
pub trait EdgeHook<E, R> {
    /// Hands the hook call for `edge`, found at `position` of `host`, to `model`.
    fn dispatch<X>(&self, model: &mut X, host: usize, position: usize, edge: &E)
    where
        X: ExecutionModel<Return = R>;
}

impl<E, R> EdgeHook<E, R> for NoHook {
    #[inline(always)]
    fn dispatch<X>(&self, _model: &mut X, _host: usize, _position: usize, _edge: &E)
    where
        X: ExecutionModel<Return = R>,
    {
    }
}

impl<E, R, F> EdgeHook<E, R> for Hook<F>
where
    E: Clone + Send + 'static,
    F: Fn(TraversedEdge<E>) -> R + Send + Sync + 'static,
{
    #[inline]
    fn dispatch<X>(&self, model: &mut X, host: usize, position: usize, edge: &E)
    where
        X: ExecutionModel<Return = R>,
    {
        let hook = Arc::clone(&self.0);
        let edge = TraversedEdge {
            host,
            position,
            edge: edge.clone(),
        };
        model.push(move || hook(edge));
    }
}
