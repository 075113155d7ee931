// Copyright © 2026 The OSAL Authors
//
// SPDX-License-Identifier: Apache-2.0
//

//! Operating-system abstraction layer.
//!
//! [`file`] holds the filesystem primitives, the synchronization gate types
//! are re-exported at the crate root.

use std::error::Error;
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

pub use os_file as file;
pub use sync_gate::{GateState, LockGuard, ReentrantLock, ScopedReentry, SyncGate};

/// Blocks the calling thread for `ms` milliseconds.
pub fn sleep(ms: u32) {
    thread::sleep(Duration::from_millis(u64::from(ms)));
}

/// Whole seconds elapsed since the Unix epoch, 0 if the clock is set before
/// it.
pub fn time_since_epoch() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// Prints a chain of errors to the user in a consistent manner.
/// The user will see a clear chain of errors, followed by debug output
/// for opening issues.
pub fn cli_print_error_chain(top_error: &dyn Error, component: &str) {
    eprint!("Error: {component} failed with the following ");
    if top_error.source().is_none() {
        eprintln!("error:");
        eprintln!("  {top_error}");
    } else {
        eprintln!("chain of errors:");
        std::iter::successors(Some(top_error), |sub_error| (*sub_error).source())
            .enumerate()
            .for_each(|(level, error)| {
                eprintln!("  {level}: {error}");
            });
    }

    eprintln!();
    eprintln!("Debug Info: {top_error:?}");
}
