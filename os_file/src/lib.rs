// Copyright © 2026 The OSAL Authors
//
// SPDX-License-Identifier: Apache-2.0
//

//! File and directory primitives over UTF-8 path strings.
//!
//! These are thin wrappers around the native calls: no permission model,
//! symlink policy or atomic rename on top of what the OS provides.

#[macro_use]
extern crate log;

mod mode;
mod path;

use std::fs::{self, DirBuilder, File};
use std::io::{self, Write};
use std::os::unix::fs::DirBuilderExt;
use std::os::unix::io::IntoRawFd;

use thiserror::Error;

pub use mode::OpenMode;
pub use path::{get_filename, get_stem, join, separator};

/// Permission bits used by [`create_dir`] callers without an opinion.
pub const DEFAULT_DIR_MODE: u32 = 0o777;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid open mode: {0:?}")]
    InvalidMode(String),
    #[error("Cannot open {0}")]
    Open(String, #[source] io::Error),
    #[error("Cannot close file")]
    Close(#[source] io::Error),
    #[error("Cannot read {0}")]
    Read(String, #[source] io::Error),
    #[error("Cannot write {0}")]
    Write(String, #[source] io::Error),
    #[error("Cannot copy {0} to {1}")]
    Copy(String, String, #[source] io::Error),
    #[error("Cannot delete file {0}")]
    DeleteFile(String, #[source] io::Error),
    #[error("Cannot delete directory {0}")]
    DeleteDir(String, #[source] io::Error),
    #[error("Cannot create directory {0}")]
    CreateDir(String, #[source] io::Error),
    #[error("Cannot list directory {0}")]
    ListDir(String, #[source] io::Error),
    #[error("Cannot stat {0}")]
    Stat(String, #[source] io::Error),
}
pub type Result<T> = std::result::Result<T, Error>;

pub fn open(path: &str, mode: OpenMode) -> Result<File> {
    mode.options()
        .open(path)
        .map_err(|e| Error::Open(path.to_owned(), e))
}

/// Closes `file`, reporting the error `close(2)` returns, which dropping a
/// `File` silently discards.
pub fn close(file: File) -> Result<()> {
    let fd = file.into_raw_fd();
    // SAFETY: fd was just released by `file`, nothing else owns it.
    let ret = unsafe { libc::close(fd) };
    if ret < 0 {
        return Err(Error::Close(io::Error::last_os_error()));
    }
    Ok(())
}

/// Creates `path` as an empty file, truncating it if it already exists.
pub fn touch(path: &str) -> Result<()> {
    open(path, OpenMode::Write).and_then(close)
}

pub fn is_reg_file(path: &str) -> bool {
    fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
}

pub fn is_dir(path: &str) -> bool {
    fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false)
}

/// Creates a single directory level with the `mode` permission bits (before
/// umask). An existing entry at `path` counts as success.
pub fn create_dir(path: &str, mode: u32) -> Result<()> {
    match DirBuilder::new().mode(mode).create(path) {
        Ok(()) => {
            debug!("Created directory {}", path);
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(()),
        Err(e) => Err(Error::CreateDir(path.to_owned(), e)),
    }
}

/// Copies the content of `src` over `dst` and returns the number of bytes
/// copied.
pub fn copy_file(src: &str, dst: &str) -> Result<u64> {
    fs::copy(src, dst).map_err(|e| Error::Copy(src.to_owned(), dst.to_owned(), e))
}

pub fn delete_file(path: &str) -> Result<()> {
    fs::remove_file(path).map_err(|e| Error::DeleteFile(path.to_owned(), e))?;
    debug!("Deleted file {}", path);
    Ok(())
}

/// Deletes the directory at `path` with everything below it. Nothing to
/// delete, because `path` does not exist or is not a directory, is a
/// success.
pub fn delete_dir(path: &str) -> Result<()> {
    if !is_dir(path) {
        return Ok(());
    }

    fs::remove_dir_all(path).map_err(|e| Error::DeleteDir(path.to_owned(), e))?;
    debug!("Deleted directory {}", path);
    Ok(())
}

pub fn size(path: &str) -> Result<u64> {
    fs::metadata(path)
        .map(|m| m.len())
        .map_err(|e| Error::Stat(path.to_owned(), e))
}

/// Writes `data` to `path` opened with `mode` and returns the number of
/// bytes written.
pub fn dump(path: &str, data: &[u8], mode: OpenMode) -> Result<usize> {
    let mut file = open(path, mode)?;
    file.write_all(data)
        .and_then(|_| file.flush())
        .map_err(|e| Error::Write(path.to_owned(), e))?;
    close(file)?;
    Ok(data.len())
}

pub fn read(path: &str) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| Error::Read(path.to_owned(), e))
}

/// Names of the regular files directly inside `path`, in the order the OS
/// enumerates them. Directories and other special entries are left out.
pub fn list_dir(path: &str) -> Result<Vec<String>> {
    let entries = fs::read_dir(path).map_err(|e| Error::ListDir(path.to_owned(), e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::ListDir(path.to_owned(), e))?;
        if !entry.path().is_file() {
            continue;
        }

        match entry.file_name().into_string() {
            Ok(name) => files.push(name),
            Err(name) => warn!("Skipping non UTF-8 file name {:?} in {}", name, path),
        }
    }

    Ok(files)
}
