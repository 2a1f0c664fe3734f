//! One thread per task.

use std::thread::{self, JoinHandle};

use tracing::{trace, warn};

use super::ExecutionModel;
use crate::error::TaskError;

/// Starts every task on its own thread as soon as it is pushed.
///
/// [`get`](ExecutionModel::get) joins all outstanding threads and returns their results in
/// push order, or the first failure in that order. Threads still running when the model is
/// dropped are joined and their results discarded.
#[derive(Debug)]
pub struct Asynchronous<R> {
    handles: Vec<JoinHandle<R>>,
}

impl<R> Asynchronous<R> {
    /// Creates a model with no outstanding work.
    pub const fn new() -> Self {
        Self { handles: Vec::new() }
    }

    /// Number of tasks started since the last [`get`](ExecutionModel::get).
    pub fn outstanding(&self) -> usize {
        self.handles.len()
    }
}

impl<R> Default for Asynchronous<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Send + 'static> ExecutionModel for Asynchronous<R> {
    type Return = R;
    type Output = Result<Vec<R>, TaskError>;

    fn push<F>(&mut self, task: F)
    where
        F: FnOnce() -> R + Send + 'static,
    {
        trace!(task = self.handles.len(), "spawning asynchronous task");
        self.handles.push(thread::spawn(task));
    }

    fn get(&mut self) -> Result<Vec<R>, TaskError> {
        let mut results = Vec::with_capacity(self.handles.len());
        let mut failure = None;
        for (task, handle) in self.handles.drain(..).enumerate() {
            match handle.join() {
                Ok(value) => results.push(value),
                Err(payload) => {
                    let error = TaskError::from_panic(payload.as_ref());
                    warn!(task, %error, "asynchronous task panicked");
                    failure.get_or_insert(error);
                }
            }
        }
        match failure {
            Some(error) => Err(error),
            None => Ok(results),
        }
    }
}

impl<R> Drop for Asynchronous<R> {
    fn drop(&mut self) {
        for handle in self.handles.drain(..) {
            if handle.join().is_err() {
                warn!("asynchronous task panicked after its results were abandoned");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_results_in_push_order() {
        let mut model = Asynchronous::new();
        for i in 0..8u64 {
            model.push(move || {
                thread::sleep(std::time::Duration::from_millis(8 - i));
                i * i
            });
        }
        assert_eq!(model.outstanding(), 8);
        assert_eq!(model.get().unwrap(), vec![0, 1, 4, 9, 16, 25, 36, 49]);
        assert_eq!(model.outstanding(), 0);
    }

    #[test]
    fn test_first_failure_is_reported() {
        let mut model = Asynchronous::new();
        model.push(|| 1);
        model.push(|| panic!("first"));
        model.push(|| panic!("second"));
        assert_eq!(
            model.get(),
            Err(TaskError::Panicked {
                message: "first".into()
            })
        );
        model.push(|| 3);
        assert_eq!(model.get(), Ok(vec![3]));
    }

    #[test]
    fn test_drop_joins_outstanding_tasks() {
        let done = Arc::new(AtomicUsize::new(0));
        {
            let mut model = Asynchronous::new();
            for _ in 0..4 {
                let done = Arc::clone(&done);
                model.push(move || {
                    done.fetch_add(1, Ordering::SeqCst);
                });
            }
        }
        assert_eq!(done.load(Ordering::SeqCst), 4);
    }
}
