//! Single-value channel carrying one task result back to its submitter.

use std::mem;
use std::sync::{Arc, Condvar, Mutex, PoisonError};

use super::lock;

/// Where the one result stands. Every transition happens under the slot's mutex.
enum State<T> {
    Pending,
    Sent(T),
    /// The sender was dropped without sending.
    Abandoned,
    /// The receiver was dropped; sends bounce.
    Closed,
}

struct Slot<T> {
    state: Mutex<State<T>>,
    changed: Condvar,
}

/// Sending half; consumed by [`Sender::send`].
pub(crate) struct Sender<T> {
    slot: Arc<Slot<T>>,
}

/// Receiving half; consumed by [`Receiver::recv`].
pub(crate) struct Receiver<T> {
    slot: Arc<Slot<T>>,
}

/// The sender went away without sending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RecvError;

pub(crate) fn channel<T>() -> (Sender<T>, Receiver<T>) {
    let slot = Arc::new(Slot {
        state: Mutex::new(State::Pending),
        changed: Condvar::new(),
    });
    (
        Sender {
            slot: Arc::clone(&slot),
        },
        Receiver { slot },
    )
}

impl<T> Sender<T> {
    /// Delivers `value`, handing it back if the receiver is gone.
    pub(crate) fn send(self, value: T) -> Result<(), T> {
        let mut state = lock(&self.slot.state);
        if matches!(*state, State::Closed) {
            return Err(value);
        }
        *state = State::Sent(value);
        self.slot.changed.notify_one();
        Ok(())
    }
}

impl<T> Drop for Sender<T> {
    fn drop(&mut self) {
        let mut state = lock(&self.slot.state);
        // Still pending means `send` never ran.
        if matches!(*state, State::Pending) {
            *state = State::Abandoned;
            self.slot.changed.notify_one();
        }
    }
}

impl<T> Receiver<T> {
    /// Blocks until the value arrives or the sender is dropped.
    pub(crate) fn recv(self) -> Result<T, RecvError> {
        let mut state = lock(&self.slot.state);
        loop {
            match mem::replace(&mut *state, State::Closed) {
                State::Sent(value) => return Ok(value),
                State::Pending => *state = State::Pending,
                State::Abandoned | State::Closed => return Err(RecvError),
            }
            state = self.slot.changed.wait(state).unwrap_or_else(PoisonError::into_inner);
        }
    }
}

impl<T> Drop for Receiver<T> {
    fn drop(&mut self) {
        // An unreceived value is dropped here, outside the lock.
        let _unreceived = mem::replace(&mut *lock(&self.slot.state), State::Closed);
    }
}
