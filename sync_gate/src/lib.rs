// Copyright © 2026 The OSAL Authors
//
// SPDX-License-Identifier: Apache-2.0
//

//! Thread synchronization gate built on a native recursive mutex.
//!
//! * [`ReentrantLock`]: the platform recursive mutex.
//! * [`LockGuard`]: scoped ownership of one level of a `ReentrantLock`.
//! * [`SyncGate`]: a `ReentrantLock` plus a stop flag deciding whether new
//!   entries into the critical section are allowed.
//! * [`ScopedReentry`]: temporarily gives back the level a `LockGuard` holds on a
//!   `SyncGate`.

#[macro_use]
extern crate log;

mod gate;
mod guard;
mod mutex;
mod reentry;

pub use gate::{GateState, SyncGate};
pub use guard::LockGuard;
pub use mutex::ReentrantLock;
pub use reentry::ScopedReentry;
