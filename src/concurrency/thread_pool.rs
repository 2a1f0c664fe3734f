//! Fixed set of worker threads fed through blocking queues.
//!
//! Two layouts are supported:
//! - single queue: every worker blocks on one shared queue
//! - multi queue: one queue per worker; pushes go round-robin and, once every queue has been
//!   used, probe the queues without blocking before settling on the assigned one; idle
//!   workers steal from their neighbours before blocking on their own queue
//!
//! Joining marks every queue finished. Workers drain what is left and exit; the next push
//! starts a fresh set of workers.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_utils::CachePadded;
use tracing::{debug, trace, warn};

use super::oneshot::{self, Receiver};
use super::task_queue::TaskQueue;
use super::ExecutionModel;
use crate::error::TaskError;

/// Non-blocking probe rounds per worker before a push blocks on its assigned queue.
pub const DEFAULT_PUSH_CYCLES: usize = 46;

type Job = Box<dyn FnOnce() + Send + 'static>;
type Queues = Arc<[CachePadded<TaskQueue<Job>>]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    Single,
    Multi { push_cycles: usize },
}

/// A pool of worker threads executing pushed tasks.
///
/// [`get`](ExecutionModel::get) waits for every task pushed since the previous `get` and
/// returns their results in push order, or the first failure in that order. Dropping the
/// pool joins its workers after they drain the queues.
pub struct ThreadPool<R> {
    queues: Queues,
    workers: Vec<JoinHandle<()>>,
    worker_count: usize,
    layout: Layout,
    next_queue: usize,
    pending: Vec<Receiver<Result<R, TaskError>>>,
}

impl<R> ThreadPool<R> {
    /// A multi-queue pool of `workers` threads (at least one) with
    /// [`DEFAULT_PUSH_CYCLES`].
    pub fn new(workers: usize) -> Self {
        Self::with_push_cycles(workers, DEFAULT_PUSH_CYCLES)
    }

    /// A multi-queue pool probing `push_cycles` rounds before a push blocks.
    pub fn with_push_cycles(workers: usize, push_cycles: usize) -> Self {
        let workers = workers.max(1);
        Self::build(workers, workers, Layout::Multi { push_cycles })
    }

    /// A pool of `workers` threads (at least one) sharing a single queue.
    pub fn single_queue(workers: usize) -> Self {
        Self::build(workers.max(1), 1, Layout::Single)
    }

    fn build(worker_count: usize, queue_count: usize, layout: Layout) -> Self {
        let queues: Queues = (0..queue_count).map(|_| CachePadded::new(TaskQueue::new())).collect();
        let mut pool = Self {
            queues,
            workers: Vec::with_capacity(worker_count),
            worker_count,
            layout,
            next_queue: 0,
            pending: Vec::new(),
        };
        pool.spawn_workers();
        pool
    }

    /// Number of worker threads.
    pub fn workers(&self) -> usize {
        self.worker_count
    }

    /// Number of work queues.
    pub fn queues(&self) -> usize {
        self.queues.len()
    }

    /// Whether the workers are running.
    pub fn is_running(&self) -> bool {
        !self.workers.is_empty()
    }

    fn spawn_workers(&mut self) {
        for queue in self.queues.iter() {
            queue.reopen();
        }
        let steal = matches!(self.layout, Layout::Multi { .. });
        for worker in 0..self.worker_count {
            let queues = Arc::clone(&self.queues);
            let own = worker % queues.len();
            self.workers.push(thread::spawn(move || run_worker(&queues, own, steal)));
        }
        debug!(workers = self.worker_count, queues = self.queues.len(), "thread pool started");
    }

    /// Finishes every queue and waits for the workers to drain them and exit.
    ///
    /// Results stay available to [`get`](ExecutionModel::get). The next push restarts the
    /// workers.
    pub fn join(&mut self) {
        if self.workers.is_empty() {
            return;
        }
        for queue in self.queues.iter() {
            queue.finish();
        }
        for worker in self.workers.drain(..) {
            if worker.join().is_err() {
                warn!("thread pool worker terminated by a panic");
            }
        }
        self.next_queue = 0;
        debug!(workers = self.worker_count, "thread pool joined");
    }

    fn dispatch(&mut self, job: Job) {
        let Layout::Multi { push_cycles } = self.layout else {
            self.queues[0].push(job);
            return;
        };
        let count = self.queues.len();
        let index = self.next_queue;
        self.next_queue = self.next_queue.wrapping_add(1);
        if index < count {
            self.queues[index].push(job);
            return;
        }

        let mut job = job;
        for probe in 0..count * push_cycles {
            match self.queues[(index + probe) % count].try_push(job) {
                Ok(()) => return,
                Err(back) => job = back,
            }
        }
        trace!(queue = index % count, "probes exhausted, blocking push");
        self.queues[index % count].push(job);
    }
}

fn run_worker(queues: &[CachePadded<TaskQueue<Job>>], own: usize, steal: bool) {
    let count = queues.len();
    loop {
        let stolen = if steal {
            (0..count).find_map(|offset| queues[(own + offset) % count].try_pop())
        } else {
            None
        };
        match stolen.or_else(|| queues[own].pop()) {
            Some(job) => job(),
            None => break,
        }
    }
}

impl<R: Send + 'static> ExecutionModel for ThreadPool<R> {
    type Return = R;
    type Output = Result<Vec<R>, TaskError>;

    fn push<F>(&mut self, task: F)
    where
        F: FnOnce() -> R + Send + 'static,
    {
        if !self.is_running() {
            self.spawn_workers();
        }
        let (sender, receiver) = oneshot::channel();
        let job: Job = Box::new(move || {
            let result = panic::catch_unwind(AssertUnwindSafe(task)).map_err(|payload| {
                let error = TaskError::from_panic(payload.as_ref());
                warn!(%error, "task panicked in thread pool worker");
                error
            });
            if sender.send(result).is_err() {
                trace!("task result abandoned by its pool");
            }
        });
        self.pending.push(receiver);
        self.dispatch(job);
    }

    fn get(&mut self) -> Result<Vec<R>, TaskError> {
        let mut results = Vec::with_capacity(self.pending.len());
        let mut failure = None;
        for receiver in self.pending.drain(..) {
            match receiver.recv() {
                Ok(Ok(value)) => results.push(value),
                Ok(Err(error)) => {
                    failure.get_or_insert(error);
                }
                Err(oneshot::RecvError) => {
                    failure.get_or_insert(TaskError::Disconnected);
                }
            }
        }
        match failure {
            Some(error) => Err(error),
            None => Ok(results),
        }
    }
}

impl<R> Drop for ThreadPool<R> {
    fn drop(&mut self) {
        self.join();
    }
}

impl<R> std::fmt::Debug for ThreadPool<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreadPool")
            .field("workers", &self.worker_count)
            .field("queues", &self.queues.len())
            .field("layout", &self.layout)
            .field("running", &self.is_running())
            .field("pending", &self.pending.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn squares<X: ExecutionModel<Return = u64>>(model: &mut X, n: u64) {
        for i in 0..n {
            model.push(move || i * i);
        }
    }

    #[test]
    fn test_multi_queue_matches_serial() {
        let mut pool = ThreadPool::new(4);
        assert_eq!((pool.workers(), pool.queues()), (4, 4));
        squares(&mut pool, 500);
        let expected: Vec<u64> = (0..500).map(|i| i * i).collect();
        assert_eq!(pool.get().unwrap(), expected);
    }

    #[test]
    fn test_single_queue_matches_serial() {
        let mut pool = ThreadPool::single_queue(3);
        assert_eq!((pool.workers(), pool.queues()), (3, 1));
        squares(&mut pool, 200);
        assert_eq!(pool.get().unwrap().len(), 200);
    }

    #[test]
    fn test_zero_workers_means_one() {
        let mut pool = ThreadPool::with_push_cycles(0, 1);
        assert_eq!(pool.workers(), 1);
        squares(&mut pool, 10);
        assert_eq!(pool.get().unwrap()[9], 81);
    }

    #[test]
    fn test_panic_is_captured_and_worker_survives() {
        let mut pool = ThreadPool::new(2);
        pool.push(|| 1u64);
        pool.push(|| panic!("hook failed"));
        pool.push(|| 3u64);
        assert_eq!(
            pool.get(),
            Err(TaskError::Panicked {
                message: "hook failed".into()
            })
        );
        pool.push(|| 4u64);
        assert_eq!(pool.get(), Ok(vec![4]));
    }

    #[test]
    fn test_join_then_push_restarts() {
        let ran = Arc::new(AtomicUsize::new(0));
        let mut pool = ThreadPool::new(2);
        for _ in 0..10 {
            let ran = Arc::clone(&ran);
            pool.push(move || {
                ran.fetch_add(1, Ordering::SeqCst);
            });
        }
        pool.join();
        assert!(!pool.is_running());
        assert_eq!(ran.load(Ordering::SeqCst), 10);

        pool.push(|| ());
        assert!(pool.is_running());
        assert_eq!(pool.get().unwrap().len(), 11);
    }

    #[test]
    fn test_drop_drains_queues() {
        let ran = Arc::new(AtomicUsize::new(0));
        {
            let mut pool = ThreadPool::single_queue(1);
            for _ in 0..25 {
                let ran = Arc::clone(&ran);
                pool.push(move || {
                    ran.fetch_add(1, Ordering::SeqCst);
                });
            }
        }
        assert_eq!(ran.load(Ordering::SeqCst), 25);
    }
}
