// Copyright © 2026 The OSAL Authors
//
// SPDX-License-Identifier: Apache-2.0
//

use std::cell::UnsafeCell;
use std::fmt;

use crate::{LockGuard, ReentrantLock, ScopedReentry};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateState {
    Running,
    Stopped,
}

/// Stop/resume aware critical section.
///
/// Every entry goes through [`acquire`](Self::acquire), which serialises the
/// read of the stop flag with the critical section itself:
///
/// ```
/// use sync_gate::SyncGate;
///
/// let gate = SyncGate::new();
/// let guard = gate.acquire();
/// if guard.is_locked() {
///     // do stuff
/// }
/// ```
///
/// [`stop`](Self::stop) only affects later calls to `acquire`. A thread
/// already inside the critical section keeps its guard until it drops it.
pub struct SyncGate {
    lock: ReentrantLock,
    // Read and written only while `lock` is held.
    stopped: UnsafeCell<bool>,
}

// SAFETY: `stopped` is only accessed by the thread holding `lock`.
unsafe impl Sync for SyncGate {}

impl SyncGate {
    pub fn new() -> Self {
        Self {
            lock: ReentrantLock::new(),
            stopped: UnsafeCell::new(false),
        }
    }

    /// Locks the gate and returns the guard still holding it, unless the gate
    /// is stopped, in which case the guard comes back already released.
    ///
    /// This blocks while another thread is inside the critical section, even
    /// when the gate is stopped.
    pub fn acquire(&self) -> LockGuard<'_> {
        let mut guard = LockGuard::new(&self.lock);
        if self.read_stopped(&guard) {
            guard.unlock();
        }
        guard
    }

    /// Lets later `acquire` calls into the critical section again.
    pub fn resume(&self) {
        if self.set_stopped(false) {
            debug!("Sync gate resumed");
        }
    }

    /// Notifies anyone using this gate to stop processing: later `acquire`
    /// calls return a released guard until [`resume`](Self::resume).
    pub fn stop(&self) {
        if self.set_stopped(true) {
            debug!("Sync gate stopped");
        }
    }

    pub fn is_stopped(&self) -> bool {
        let guard = LockGuard::new(&self.lock);
        self.read_stopped(&guard)
    }

    pub fn state(&self) -> GateState {
        if self.is_stopped() {
            GateState::Stopped
        } else {
            GateState::Running
        }
    }

    /// Gives back the level held by `guard` until the returned value goes
    /// out of scope.
    ///
    /// # Panics
    ///
    /// Panics if `guard` does not hold this gate.
    pub fn temporary_unlock<'g, 'a>(
        &'a self,
        guard: &'g mut LockGuard<'a>,
    ) -> ScopedReentry<'g, 'a> {
        ScopedReentry::new(self, guard)
    }

    pub fn is_held_by_current_thread(&self) -> bool {
        self.lock.is_held_by_current_thread()
    }

    /// Reentrancy depth of the calling thread on this gate.
    pub fn held_depth(&self) -> usize {
        self.lock.held_depth()
    }

    pub(crate) fn raw_lock(&self) -> &ReentrantLock {
        &self.lock
    }

    fn read_stopped(&self, guard: &LockGuard<'_>) -> bool {
        debug_assert!(guard.is_locked());
        // SAFETY: the guard proves the calling thread holds the lock, and no
        // reference to the flag outlives this read.
        unsafe { *self.stopped.get() }
    }

    // Returns whether the flag changed.
    fn set_stopped(&self, stopped: bool) -> bool {
        let _guard = LockGuard::new(&self.lock);
        // SAFETY: the lock is held for the whole swap.
        let previous = unsafe { std::ptr::replace(self.stopped.get(), stopped) };
        previous != stopped
    }
}

impl Default for SyncGate {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SyncGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncGate")
            .field("lock", &self.lock)
            .finish_non_exhaustive()
    }
}
