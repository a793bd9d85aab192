//! Cooperative cancellation for the simulation worker.

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

#[derive(Debug, Default)]
struct State {
    done: Mutex<bool>,
    wake: Condvar,
}

/// A cloneable stop signal shared between the worker and whoever stops it.
///
/// Besides the flag itself, [`sleep`](Context::sleep) lets the worker pause
/// without delaying a stop request: a cancel wakes every sleeper.
#[derive(Clone, Debug, Default)]
pub struct Context {
    state: Arc<State>,
}

impl Context {
    /// Create a new, non-cancelled context.
    pub fn new() -> Self {
        Self::default()
    }

    fn done(&self) -> MutexGuard<'_, bool> {
        self.state.done.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether cancellation has been requested.
    #[inline]
    pub fn is_done(&self) -> bool {
        *self.done()
    }

    /// Request cancellation and wake any sleeper.
    pub fn cancel(&self) {
        *self.done() = true;
        self.state.wake.notify_all();
    }

    /// Block for up to `timeout`, returning early on cancellation.
    ///
    /// Returns `true` if the context is cancelled.
    pub fn sleep(&self, timeout: Duration) -> bool {
        let guard = self.done();
        if timeout.is_zero() {
            return *guard;
        }
        let (guard, _) = self
            .state
            .wake
            .wait_timeout_while(guard, timeout, |done| !*done)
            .unwrap_or_else(PoisonError::into_inner);
        *guard
    }
}
