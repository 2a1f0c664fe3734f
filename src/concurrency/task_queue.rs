//! Blocking FIFO work queue with a "finished" shutdown signal.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, PoisonError, TryLockError};

use super::lock;

struct State<T> {
    items: VecDeque<T>,
    finished: bool,
}

/// A multi-producer, multi-consumer FIFO queue.
///
/// [`pop`](Self::pop) blocks while the queue is empty and unfinished. After
/// [`finish`](Self::finish) consumers drain what is left and then receive `None`.
/// The `try_` variants never wait for the internal lock.
pub struct TaskQueue<T> {
    state: Mutex<State<T>>,
    available: Condvar,
}

impl<T> TaskQueue<T> {
    /// Creates an empty, open queue.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                items: VecDeque::new(),
                finished: false,
            }),
            available: Condvar::new(),
        }
    }

    /// Appends `task`, waking one blocked consumer.
    pub fn push(&self, task: T) {
        lock(&self.state).items.push_back(task);
        self.available.notify_one();
    }

    /// Appends `task` unless the lock is held elsewhere, in which case the task is handed back.
    pub fn try_push(&self, task: T) -> Result<(), T> {
        let mut state = match self.state.try_lock() {
            Ok(state) => state,
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
            Err(TryLockError::WouldBlock) => return Err(task),
        };
        state.items.push_back(task);
        drop(state);
        self.available.notify_one();
        Ok(())
    }

    /// Takes the oldest task, waiting while the queue is empty and unfinished.
    ///
    /// Returns `None` once the queue is finished and drained.
    pub fn pop(&self) -> Option<T> {
        let mut state = lock(&self.state);
        loop {
            if let Some(task) = state.items.pop_front() {
                return Some(task);
            }
            if state.finished {
                return None;
            }
            state = self.available.wait(state).unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Takes the oldest task if one is present and the lock is free.
    pub fn try_pop(&self) -> Option<T> {
        match self.state.try_lock() {
            Ok(mut state) => state.items.pop_front(),
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner().items.pop_front(),
            Err(TryLockError::WouldBlock) => None,
        }
    }

    /// Marks the queue finished and wakes every blocked consumer.
    pub fn finish(&self) {
        lock(&self.state).finished = true;
        self.available.notify_all();
    }

    /// Clears the finished mark so consumers block again.
    pub fn reopen(&self) {
        lock(&self.state).finished = false;
    }

    /// Whether [`finish`](Self::finish) was called since the last reopen.
    pub fn is_finished(&self) -> bool {
        lock(&self.state).finished
    }

    /// Number of queued tasks.
    pub fn len(&self) -> usize {
        lock(&self.state).items.len()
    }

    /// Whether no task is queued.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for TaskQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for TaskQueue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = lock(&self.state);
        f.debug_struct("TaskQueue")
            .field("len", &state.items.len())
            .field("finished", &state.finished)
            .finish()
    }
}
