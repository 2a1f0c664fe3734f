//! Execution models deciding where and when traversal hooks run.
//!
//! Every model implements [`ExecutionModel`]: `push` hands over a unit of work and `get`
//! collects what the work produced.
//! - [`Serial`] runs each task immediately on the caller's thread
//! - [`Asynchronous`] gives each task its own thread
//! - [`ThreadPool`] feeds a fixed set of workers through [`TaskQueue`]s
//!
//! Panics inside tasks run by the threaded models are captured as [`TaskError`] and only
//! surface from `get`.
//!
//! [`TaskError`]: crate::TaskError

mod asynchronous;
mod oneshot;
mod serial;
mod task_queue;
mod thread_pool;

use std::sync::{Mutex, MutexGuard, PoisonError};

pub use asynchronous::Asynchronous;
pub use serial::Serial;
pub use task_queue::TaskQueue;
pub use thread_pool::{ThreadPool, DEFAULT_PUSH_CYCLES};

/// Runs units of work and accumulates their results.
pub trait ExecutionModel {
    /// Value produced by one unit of work.
    type Return: Send + 'static;

    /// What [`get`](Self::get) yields.
    type Output;

    /// Enqueues `task`, or runs it immediately, recording its eventual result.
    fn push<F>(&mut self, task: F)
    where
        F: FnOnce() -> Self::Return + Send + 'static;

    /// Waits for outstanding work and moves out the accumulated results, in push order.
    fn get(&mut self) -> Self::Output;
}

impl<X: ExecutionModel> ExecutionModel for &mut X {
    type Return = X::Return;
    type Output = X::Output;

    #[inline]
    fn push<F>(&mut self, task: F)
    where
        F: FnOnce() -> Self::Return + Send + 'static,
    {
        (**self).push(task);
    }

    #[inline]
    fn get(&mut self) -> Self::Output {
        (**self).get()
    }
}

/// Locks `mutex`, recovering the data if a panicking thread poisoned it.
///
/// Tasks run under `catch_unwind`, so a poisoned lock only ever guards consistent data.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
