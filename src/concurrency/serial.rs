//! Execution on the caller's thread.

use std::mem;

use super::ExecutionModel;

/// Runs every task as soon as it is pushed.
///
/// Results come back in push order, so a serial traversal yields its hook calls in the
/// order they were made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Serial<R> {
    results: Vec<R>,
}

impl<R> Serial<R> {
    /// Creates a model with no results.
    pub const fn new() -> Self {
        Self { results: Vec::new() }
    }

    /// Number of results accumulated since the last [`get`](ExecutionModel::get).
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Whether no result is pending.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

impl<R> Default for Serial<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Send + 'static> ExecutionModel for Serial<R> {
    type Return = R;
    type Output = Vec<R>;

    #[inline]
    fn push<F>(&mut self, task: F)
    where
        F: FnOnce() -> R + Send + 'static,
    {
        self.results.push(task());
    }

    fn get(&mut self) -> Vec<R> {
        mem::take(&mut self.results)
    }
}
