// Copyright © 2026 The OSAL Authors
//
// SPDX-License-Identifier: Apache-2.0
//

use std::fs::OpenOptions;
use std::str::FromStr;

use crate::Error;

/// fopen-style access mode.
///
/// Parsed from the classic mode strings (`"r"`, `"wb"`, `"a+"`, `"r+b"`,
/// ...). The `b` flag is accepted anywhere after the first character and has
/// no effect.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OpenMode {
    /// `r`: read an existing file.
    Read,
    /// `w`: create or truncate, write only.
    #[default]
    Write,
    /// `a`: create if needed, every write goes to the end.
    Append,
    /// `r+`: read and write an existing file.
    ReadUpdate,
    /// `w+`: create or truncate, read and write.
    WriteUpdate,
    /// `a+`: create if needed, read anywhere, write at the end.
    AppendUpdate,
}

impl OpenMode {
    pub fn options(self) -> OpenOptions {
        let mut options = OpenOptions::new();
        match self {
            OpenMode::Read => options.read(true),
            OpenMode::Write => options.write(true).create(true).truncate(true),
            OpenMode::Append => options.append(true).create(true),
            OpenMode::ReadUpdate => options.read(true).write(true),
            OpenMode::WriteUpdate => options.read(true).write(true).create(true).truncate(true),
            OpenMode::AppendUpdate => options.read(true).append(true).create(true),
        };
        options
    }
}

impl FromStr for OpenMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let base = chars.next();

        let mut update = false;
        for c in chars {
            match c {
                'b' => {}
                '+' if !update => update = true,
                _ => return Err(Error::InvalidMode(s.to_owned())),
            }
        }

        match (base, update) {
            (Some('r'), false) => Ok(OpenMode::Read),
            (Some('w'), false) => Ok(OpenMode::Write),
            (Some('a'), false) => Ok(OpenMode::Append),
            (Some('r'), true) => Ok(OpenMode::ReadUpdate),
            (Some('w'), true) => Ok(OpenMode::WriteUpdate),
            (Some('a'), true) => Ok(OpenMode::AppendUpdate),
            _ => Err(Error::InvalidMode(s.to_owned())),
        }
    }
}
