// Copyright © 2026 The OSAL Authors
//
// SPDX-License-Identifier: Apache-2.0
//

use std::fmt;
use std::io;
use std::mem::MaybeUninit;
use std::sync::atomic::{AtomicUsize, Ordering};

thread_local! {
    static THREAD_MARKER: u8 = const { 0 };
}

// Token for the calling thread: the address of its thread local marker.
// Non-zero and unique among live threads. A thread spawned after another
// one exited may get the same token back, which only matters for a lock the
// exited thread still held, and such a lock can never be released anyway.
fn current_thread() -> usize {
    THREAD_MARKER.with(|marker| marker as *const u8 as usize)
}

fn check(ret: libc::c_int, op: &str) {
    assert!(
        ret == 0,
        "{op} failed: {}",
        io::Error::from_raw_os_error(ret)
    );
}

/// Platform recursive mutex.
///
/// The owning thread may call [`lock`](Self::lock) any number of times
/// without deadlocking itself, and must balance every call with
/// [`unlock`](Self::unlock) before another thread can take ownership.
///
/// There is no timeout and no try-lock: `lock` either returns with the
/// mutex held or blocks the OS thread until it can.
pub struct ReentrantLock {
    // Heap allocated so the native mutex keeps a fixed address when the
    // owning structure moves.
    raw: *mut libc::pthread_mutex_t,
    // Only written by the holder, while it holds `raw`.
    owner: AtomicUsize,
    depth: AtomicUsize,
}

// SAFETY: pthread mutexes are meant to be shared between threads and the
// raw pointer is owned exclusively by this structure.
unsafe impl Send for ReentrantLock {}
// SAFETY: all shared access goes through the pthread API or atomics.
unsafe impl Sync for ReentrantLock {}

impl ReentrantLock {
    pub fn new() -> Self {
        let raw = Box::into_raw(Box::new(libc::PTHREAD_MUTEX_INITIALIZER));
        let mut attr = MaybeUninit::<libc::pthread_mutexattr_t>::uninit();

        // SAFETY: attr is initialised by pthread_mutexattr_init before any
        // other use and destroyed once the mutex has been built from it. raw
        // points to a live heap allocation owned by this structure.
        unsafe {
            check(
                libc::pthread_mutexattr_init(attr.as_mut_ptr()),
                "pthread_mutexattr_init",
            );
            check(
                libc::pthread_mutexattr_settype(attr.as_mut_ptr(), libc::PTHREAD_MUTEX_RECURSIVE),
                "pthread_mutexattr_settype",
            );
            check(
                libc::pthread_mutex_init(raw, attr.as_ptr()),
                "pthread_mutex_init",
            );
            libc::pthread_mutexattr_destroy(attr.as_mut_ptr());
        }

        Self {
            raw,
            owner: AtomicUsize::new(0),
            depth: AtomicUsize::new(0),
        }
    }

    /// Blocks until the calling thread owns the lock, then adds one level of
    /// ownership.
    pub fn lock(&self) {
        // SAFETY: raw was initialised in new() and lives until drop.
        let ret = unsafe { libc::pthread_mutex_lock(self.raw) };
        check(ret, "pthread_mutex_lock");

        let me = current_thread();
        if self.owner.load(Ordering::Relaxed) == me {
            self.depth.fetch_add(1, Ordering::Relaxed);
        } else {
            self.owner.store(me, Ordering::Relaxed);
            self.depth.store(1, Ordering::Relaxed);
        }
    }

    /// Releases one level of ownership. The lock becomes available to other
    /// threads once every `lock` call has been matched.
    ///
    /// # Safety
    ///
    /// The calling thread must currently hold the lock. Releasing a lock the
    /// thread does not own is undefined for the native mutex.
    pub unsafe fn unlock(&self) {
        debug_assert!(
            self.is_held_by_current_thread(),
            "unlock of a ReentrantLock not held by the calling thread"
        );

        if self.depth.fetch_sub(1, Ordering::Relaxed) == 1 {
            self.owner.store(0, Ordering::Relaxed);
        }

        // SAFETY: raw is valid and the caller guarantees ownership.
        let ret = unsafe { libc::pthread_mutex_unlock(self.raw) };
        debug_assert_eq!(ret, 0, "pthread_mutex_unlock failed");
    }

    /// Releases one level if the calling thread holds the lock. Returns
    /// false, leaving the lock untouched, otherwise.
    pub(crate) fn release(&self) -> bool {
        if !self.is_held_by_current_thread() {
            return false;
        }
        // SAFETY: the calling thread holds the lock, checked right above.
        unsafe { self.unlock() };
        true
    }

    pub fn is_held_by_current_thread(&self) -> bool {
        self.owner.load(Ordering::Relaxed) == current_thread()
    }

    /// Number of unmatched `lock` calls made by the calling thread, 0 when
    /// another thread owns the lock or nobody does.
    pub fn held_depth(&self) -> usize {
        if self.is_held_by_current_thread() {
            self.depth.load(Ordering::Relaxed)
        } else {
            0
        }
    }
}

impl Default for ReentrantLock {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ReentrantLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReentrantLock")
            .field("held", &(self.owner.load(Ordering::Relaxed) != 0))
            .field("held_by_current_thread", &self.is_held_by_current_thread())
            .finish()
    }
}

impl Drop for ReentrantLock {
    fn drop(&mut self) {
        if *self.owner.get_mut() != 0 {
            // A forgotten guard left the mutex locked. Destroying a locked
            // pthread mutex is undefined, so leak it instead.
            warn!("Leaking ReentrantLock dropped while still held");
            return;
        }

        // SAFETY: raw came from Box::into_raw in new(), it is unlocked, and
        // no guard can reference it since we have exclusive access.
        unsafe {
            libc::pthread_mutex_destroy(self.raw);
            drop(Box::from_raw(self.raw));
        }
    }
}
