// Copyright © 2026 The OSAL Authors
//
// SPDX-License-Identifier: Apache-2.0
//

use std::ptr;

use crate::{LockGuard, SyncGate};

/// Gives back the level of a [`SyncGate`] held by a guard until the end of
/// the local scope.
///
/// This lets a thread that sits inside the critical section for a long time
/// give a contending thread a chance to get in, then pick the gate back up
/// at the same reentrancy depth:
///
/// ```
/// use sync_gate::SyncGate;
///
/// let gate = SyncGate::new();
/// let mut guard = gate.acquire();
/// {
///     let _reentry = gate.temporary_unlock(&mut guard);
///     // other threads may acquire the gate here
/// }
/// assert!(guard.is_locked());
/// assert!(gate.is_held_by_current_thread());
/// ```
///
/// The guard stays mutably borrowed for the whole scope, so it cannot be
/// dropped or unlocked while its level is given back. When the gate is held
/// at a depth greater than one, it stays locked for other threads inside
/// the scope.
#[must_use = "the gate is reacquired as soon as the ScopedReentry is dropped"]
#[derive(Debug)]
pub struct ScopedReentry<'g, 'a> {
    guard: &'g mut LockGuard<'a>,
}

impl<'g, 'a> ScopedReentry<'g, 'a> {
    /// # Panics
    ///
    /// Panics if `guard` is not a guard of `gate` currently holding it on
    /// the calling thread.
    pub fn new(gate: &'a SyncGate, guard: &'g mut LockGuard<'a>) -> Self {
        let lock = gate.raw_lock();
        assert!(
            ptr::eq(lock, guard.raw_lock())
                && guard.is_locked()
                && lock.is_held_by_current_thread(),
            "ScopedReentry requires a guard holding the sync gate on the calling thread"
        );

        // SAFETY: ownership was checked right above.
        unsafe { lock.unlock() };

        Self { guard }
    }
}

impl Drop for ScopedReentry<'_, '_> {
    fn drop(&mut self) {
        self.guard.raw_lock().lock();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_depth_restored() {
        let gate = SyncGate::new();
        let _outer = gate.acquire();
        let mut inner = gate.acquire();
        assert_eq!(gate.held_depth(), 2);

        {
            let _reentry = ScopedReentry::new(&gate, &mut inner);
            assert_eq!(gate.held_depth(), 1);
        }
        assert_eq!(gate.held_depth(), 2);
        assert!(inner.is_locked());
    }

    #[test]
    fn test_other_thread_enters_during_reentry() {
        let gate = SyncGate::new();
        let mut guard = gate.acquire();
        assert!(guard.is_locked());

        thread::scope(|s| {
            let _reentry = gate.temporary_unlock(&mut guard);
            assert!(!gate.is_held_by_current_thread());

            let entered = s
                .spawn(|| {
                    let guard = gate.acquire();
                    guard.is_locked()
                })
                .join()
                .unwrap();
            assert!(entered);
        });

        // Back in the critical section: another thread has to wait for us.
        assert!(gate.is_held_by_current_thread());
        assert_eq!(gate.held_depth(), 1);

        let entered = AtomicBool::new(false);
        thread::scope(|s| {
            s.spawn(|| {
                let _guard = gate.acquire();
                entered.store(true, Ordering::SeqCst);
            });

            thread::sleep(Duration::from_millis(100));
            assert!(!entered.load(Ordering::SeqCst));
            drop(guard);
        });
        assert!(entered.load(Ordering::SeqCst));
    }

    #[test]
    fn test_nested_reentry_keeps_gate_locked() {
        let gate = SyncGate::new();
        let outer = gate.acquire();
        let mut inner = gate.acquire();
        let entered = AtomicBool::new(false);

        thread::scope(|s| {
            let reentry = gate.temporary_unlock(&mut inner);
            s.spawn(|| {
                let _guard = gate.acquire();
                entered.store(true, Ordering::SeqCst);
            });

            // One level is still held, so the other thread keeps waiting.
            thread::sleep(Duration::from_millis(100));
            assert!(!entered.load(Ordering::SeqCst));

            drop(reentry);
            assert_eq!(gate.held_depth(), 2);
            drop(inner);
            drop(outer);
        });
        assert!(entered.load(Ordering::SeqCst));
    }

    #[test]
    fn test_reentry_while_stopped() {
        let gate = SyncGate::new();
        let mut guard = gate.acquire();
        gate.stop();

        {
            let _reentry = gate.temporary_unlock(&mut guard);
            thread::scope(|s| {
                let locked = s.spawn(|| gate.acquire().is_locked()).join().unwrap();
                assert!(!locked);
            });
        }
        assert_eq!(gate.held_depth(), 1);
    }

    #[test]
    fn test_leaked_reentry_keeps_other_holder_intact() {
        let gate = SyncGate::new();
        let mut guard = gate.acquire();
        std::mem::forget(gate.temporary_unlock(&mut guard));
        assert_eq!(gate.held_depth(), 0);

        thread::scope(|s| {
            let (entered_tx, entered_rx) = mpsc::channel();
            let (dropped_tx, dropped_rx) = mpsc::channel();
            let gate = &gate;
            let holder = s.spawn(move || {
                let mut guard = gate.acquire();
                entered_tx.send(()).unwrap();
                dropped_rx.recv().unwrap();

                // The other thread dropping its stale guard must not touch
                // this thread's ownership.
                assert!(guard.is_locked());
                assert!(gate.is_held_by_current_thread());
                assert_eq!(gate.held_depth(), 1);
                {
                    let _reentry = gate.temporary_unlock(&mut guard);
                    assert_eq!(gate.held_depth(), 0);
                }
                assert_eq!(gate.held_depth(), 1);
            });

            entered_rx.recv().unwrap();
            drop(guard);
            assert!(!gate.is_held_by_current_thread());
            dropped_tx.send(()).unwrap();
            holder.join().unwrap();
        });

        assert!(gate.acquire().is_locked());
    }

    #[test]
    #[should_panic(expected = "requires a guard holding the sync gate")]
    fn test_reentry_with_released_guard() {
        let gate = SyncGate::new();
        gate.stop();
        let mut guard = gate.acquire();
        let _reentry = gate.temporary_unlock(&mut guard);
    }

    #[test]
    #[should_panic(expected = "requires a guard holding the sync gate")]
    fn test_reentry_with_guard_of_another_gate() {
        let gate = SyncGate::new();
        let other = SyncGate::new();
        let mut guard = other.acquire();
        let _reentry = gate.temporary_unlock(&mut guard);
    }
}
