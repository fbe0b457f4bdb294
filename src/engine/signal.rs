//! Completion signal for synchronous callers.
//!
//! A counter the caller raises with [`CompletionSignal::add`] before
//! submitting orders it expects to trade. The matching thread calls
//! [`CompletionSignal::done`] once for every order whose processing executed
//! at least one trade; orders that only rest never touch it.

use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

#[derive(Debug, Default)]
pub struct CompletionSignal {
    pending: Mutex<usize>,
    cond: Condvar,
}

impl CompletionSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expect `n` more trading orders
    pub fn add(&self, n: usize) {
        *self.pending.lock() += n;
    }

    /// Mark one trading order as processed
    pub fn done(&self) {
        let mut pending = self.pending.lock();
        if *pending == 0 {
            tracing::warn!("completion signalled with nothing pending");
            return;
        }
        *pending -= 1;
        if *pending == 0 {
            self.cond.notify_all();
        }
    }

    /// Outstanding count
    pub fn pending(&self) -> usize {
        *self.pending.lock()
    }

    /// Block until the count reaches zero
    pub fn wait(&self) {
        let mut pending = self.pending.lock();
        while *pending > 0 {
            self.cond.wait(&mut pending);
        }
    }

    /// Block until the count reaches zero or the timeout elapses.
    ///
    /// Returns `true` if the count reached zero.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut pending = self.pending.lock();
        while *pending > 0 {
            if self.cond.wait_until(&mut pending, deadline).timed_out() {
                return *pending == 0;
            }
        }
        true
    }
}
