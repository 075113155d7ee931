// Copyright © 2026 The OSAL Authors
//
// SPDX-License-Identifier: Apache-2.0
//

#[cfg(test)]
pub mod tests {
    use std::cmp::Ordering;

    use clap::{Arg, Command};

    pub fn assert_args_sorted<'a, F: Fn() -> R, R: Iterator<Item = &'a Arg>>(get_base_iter: F) {
        let iter = get_base_iter().zip(get_base_iter().skip(1));
        for (arg, next) in iter {
            assert_ne!(
                arg.get_id().cmp(next.get_id()),
                Ordering::Greater,
                "args not alphabetically sorted: arg={}, next={}",
                arg.get_id(),
                next.get_id()
            );
        }
    }

    pub fn assert_subcommands_sorted(cmd: &Command) {
        let names: Vec<&str> = cmd.get_subcommands().map(|c| c.get_name()).collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted, "subcommands not alphabetically sorted");
    }
}
