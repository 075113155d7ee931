// Copyright © 2026 The OSAL Authors
//
// SPDX-License-Identifier: Apache-2.0
//

use std::marker::PhantomData;

use crate::ReentrantLock;

/// Scoped ownership of one level of a [`ReentrantLock`].
///
/// The guard is "truthy" (see [`is_locked`](Self::is_locked)) exactly while
/// it holds its level of the lock. Dropping a truthy guard releases that
/// level once; dropping a released guard does nothing.
///
/// Moving a guard hands the ticket over without any lock traffic. A guard is
/// never cloned, and it cannot be sent to another thread since the lock must
/// be released by the thread that acquired it.
#[derive(Debug)]
#[must_use = "if unused the lock is released immediately"]
pub struct LockGuard<'a> {
    lock: &'a ReentrantLock,
    locked: bool,
    _not_send: PhantomData<*const ()>,
}

impl<'a> LockGuard<'a> {
    /// Blocks until `lock` is held by the calling thread.
    pub fn new(lock: &'a ReentrantLock) -> Self {
        lock.lock();
        Self {
            lock,
            locked: true,
            _not_send: PhantomData,
        }
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Releases the lock ahead of the end of scope. Calling it on a guard
    /// that is already released is a no-op.
    pub fn unlock(&mut self) {
        if self.locked {
            self.locked = false;
            // The level may already be gone if a ScopedReentry borrowing
            // this guard was leaked.
            if !self.lock.release() {
                warn!("LockGuard released on a thread not holding its lock");
            }
        }
    }

    pub(crate) fn raw_lock(&self) -> &'a ReentrantLock {
        self.lock
    }

    /// Moves the ticket out of `self` into a new guard, leaving `self`
    /// released. The underlying lock is not touched.
    pub fn take(&mut self) -> LockGuard<'a> {
        LockGuard {
            lock: self.lock,
            locked: std::mem::replace(&mut self.locked, false),
            _not_send: PhantomData,
        }
    }
}

impl Drop for LockGuard<'_> {
    fn drop(&mut self) {
        self.unlock();
    }
}
