// Copyright © 2026 The OSAL Authors
//
// SPDX-License-Identifier: Apache-2.0
//

#[macro_use]
extern crate log;

mod test_util;

use std::io::{self, Write};
use std::num::ParseIntError;
use std::process;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::thread;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use log::LevelFilter;
use osal::file::{self, OpenMode};
use osal::SyncGate;
use thiserror::Error;

#[derive(Error, Debug)]
enum Error {
    #[error("Invalid directory mode {0:?}, expected an octal value")]
    InvalidDirMode(String, #[source] ParseIntError),
    #[error("No such file or directory: {0}")]
    NotFound(String),
    #[error("File operation failed")]
    File(#[source] file::Error),
    #[error("Error spawning gate worker thread")]
    ThreadSpawn(#[source] io::Error),
    #[error("Error writing to stdout")]
    Stdout(#[source] io::Error),
    #[error("Sync gate check failed: {0}")]
    Gate(String),
}

fn create_app() -> Command {
    let path = || Arg::new("path").help("UTF-8 path").required(true);

    Command::new("osal")
        .version(env!("BUILD_VERSION"))
        .author(env!("CARGO_PKG_AUTHORS"))
        .about("Inspect and manipulate files through the OS abstraction layer.")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("v")
                .short('v')
                .action(ArgAction::Count)
                .global(true)
                .help("Sets the level of debugging output"),
        )
        .subcommand(
            Command::new("cat")
                .about("Write the content of a file to stdout")
                .arg(path()),
        )
        .subcommand(
            Command::new("cp")
                .about("Copy a file")
                .arg(Arg::new("dst").help("Destination file").index(2).required(true))
                .arg(Arg::new("src").help("Source file").index(1).required(true)),
        )
        .subcommand(
            Command::new("dump")
                .about("Write a string to a file")
                .arg(
                    Arg::new("append")
                        .long("append")
                        .action(ArgAction::SetTrue)
                        .help("Append instead of truncating"),
                )
                .arg(Arg::new("data").help("Data to write").index(2).required(true))
                .arg(path().index(1)),
        )
        .subcommand(
            Command::new("filename")
                .about("Print the last component of a path")
                .arg(path()),
        )
        .subcommand(
            Command::new("gate")
                .about("Exercise a sync gate from several threads")
                .arg(
                    Arg::new("iterations")
                        .long("iterations")
                        .help("Critical sections entered by each worker")
                        .value_parser(value_parser!(u64).range(1..))
                        .default_value("1000"),
                )
                .arg(
                    Arg::new("workers")
                        .long("workers")
                        .help("Number of worker threads")
                        .value_parser(value_parser!(u64).range(1..=256))
                        .default_value("4"),
                ),
        )
        .subcommand(
            Command::new("ls")
                .about("List the regular files of a directory")
                .arg(path()),
        )
        .subcommand(
            Command::new("mkdir")
                .about("Create a directory")
                .arg(
                    Arg::new("mode")
                        .long("mode")
                        .help("Octal permission bits")
                        .default_value("777"),
                )
                .arg(path()),
        )
        .subcommand(
            Command::new("rm")
                .about("Delete a file")
                .arg(path()),
        )
        .subcommand(
            Command::new("rmdir")
                .about("Delete a directory and everything below it")
                .arg(path()),
        )
        .subcommand(
            Command::new("stat")
                .about("Print the kind and size of a path")
                .arg(path()),
        )
        .subcommand(
            Command::new("stem")
                .about("Print the last component of a path without extension")
                .arg(path()),
        )
        .subcommand(
            Command::new("touch")
                .about("Create or truncate a file")
                .arg(path()),
        )
}

// clap enforces required arguments and defaults before we get here.
fn arg<'a>(matches: &'a ArgMatches, id: &str) -> &'a str {
    matches
        .get_one::<String>(id)
        .map(String::as_str)
        .unwrap_or_default()
}

fn print(out: &mut impl Write, text: &str) -> Result<(), Error> {
    writeln!(out, "{text}").map_err(Error::Stdout)
}

fn stat(out: &mut impl Write, path: &str) -> Result<(), Error> {
    if file::is_dir(path) {
        print(out, "directory")
    } else if file::is_reg_file(path) {
        let size = file::size(path).map_err(Error::File)?;
        print(out, &format!("file {size}"))
    } else {
        Err(Error::NotFound(path.to_owned()))
    }
}

// Counter bumped with a separate load and store: only mutual exclusion keeps
// updates from getting lost.
fn bump(counter: &AtomicU64) {
    let value = counter.load(Ordering::Relaxed);
    thread::yield_now();
    counter.store(value + 1, Ordering::Relaxed);
}

fn run_gate(out: &mut impl Write, workers: u64, iterations: u64) -> Result<(), Error> {
    let gate = SyncGate::new();
    let counter = AtomicU64::new(0);

    thread::scope(|s| {
        (0..workers)
            .map(|id| {
                let (gate, counter) = (&gate, &counter);
                thread::Builder::new()
                    .name(format!("gate-worker-{id}"))
                    .spawn_scoped(s, move || {
                        for _ in 0..iterations {
                            let guard = gate.acquire();
                            if guard.is_locked() {
                                bump(counter);
                            }
                        }
                    })
                    .map(|_| ())
            })
            .collect::<io::Result<Vec<()>>>()
    })
    .map_err(Error::ThreadSpawn)?;

    let expected = workers * iterations;
    let count = counter.load(Ordering::SeqCst);
    if count != expected {
        return Err(Error::Gate(format!("lost updates: {count} != {expected}")));
    }
    info!("{} workers entered the gate {} times", workers, count);

    gate.stop();
    let refused = AtomicUsize::new(0);
    thread::scope(|s| {
        for _ in 0..workers {
            s.spawn(|| {
                if !gate.acquire().is_locked() {
                    refused.fetch_add(1, Ordering::SeqCst);
                }
            });
        }
    });
    let refused = refused.load(Ordering::SeqCst) as u64;
    if refused != workers {
        return Err(Error::Gate(format!(
            "stopped gate let {} workers in",
            workers - refused
        )));
    }
    info!("Stopped gate refused {} workers", refused);

    gate.resume();
    let mut guard = gate.acquire();
    if !guard.is_locked() {
        return Err(Error::Gate("resumed gate refused entry".to_owned()));
    }
    let helper_entered = AtomicBool::new(false);
    {
        let _reentry = gate.temporary_unlock(&mut guard);
        thread::scope(|s| {
            s.spawn(|| {
                let guard = gate.acquire();
                helper_entered.store(guard.is_locked(), Ordering::SeqCst);
            });
        });
    }
    if !helper_entered.load(Ordering::SeqCst) || !gate.is_held_by_current_thread() {
        return Err(Error::Gate("temporary unlock did not hand over the gate".to_owned()));
    }
    drop(guard);

    print(
        out,
        &format!("workers={workers} iterations={iterations} count={count} refused={refused}"),
    )
}

fn run(matches: &ArgMatches) -> Result<(), Error> {
    let mut out = io::stdout().lock();

    match matches.subcommand() {
        Some(("cat", m)) => {
            let data = file::read(arg(m, "path")).map_err(Error::File)?;
            out.write_all(&data).map_err(Error::Stdout)
        }
        Some(("cp", m)) => {
            let (src, dst) = (arg(m, "src"), arg(m, "dst"));
            let copied = file::copy_file(src, dst).map_err(Error::File)?;
            info!("Copied {} bytes from {} to {}", copied, src, dst);
            Ok(())
        }
        Some(("dump", m)) => {
            let mode = if m.get_flag("append") {
                OpenMode::Append
            } else {
                OpenMode::Write
            };
            let written =
                file::dump(arg(m, "path"), arg(m, "data").as_bytes(), mode).map_err(Error::File)?;
            info!("Wrote {} bytes to {}", written, arg(m, "path"));
            Ok(())
        }
        Some(("filename", m)) => print(&mut out, file::get_filename(arg(m, "path"))),
        Some(("gate", m)) => {
            let workers = m.get_one::<u64>("workers").copied().unwrap_or(4);
            let iterations = m.get_one::<u64>("iterations").copied().unwrap_or(1000);
            run_gate(&mut out, workers, iterations)
        }
        Some(("ls", m)) => {
            for name in file::list_dir(arg(m, "path")).map_err(Error::File)? {
                print(&mut out, &name)?;
            }
            Ok(())
        }
        Some(("mkdir", m)) => {
            let mode = arg(m, "mode");
            let mode = u32::from_str_radix(mode, 8)
                .map_err(|e| Error::InvalidDirMode(mode.to_owned(), e))?;
            file::create_dir(arg(m, "path"), mode).map_err(Error::File)
        }
        Some(("rm", m)) => file::delete_file(arg(m, "path")).map_err(Error::File),
        Some(("rmdir", m)) => file::delete_dir(arg(m, "path")).map_err(Error::File),
        Some(("stat", m)) => stat(&mut out, arg(m, "path")),
        Some(("stem", m)) => print(&mut out, file::get_stem(arg(m, "path"))),
        Some(("touch", m)) => file::touch(arg(m, "path")).map_err(Error::File),
        _ => unreachable!("subcommand_required is set"),
    }
}

fn main() {
    let matches = create_app().get_matches();

    let log_level = match matches.get_count("v") {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .parse_default_env()
        .init();

    if let Err(e) = run(&matches) {
        osal::cli_print_error_chain(&e, "osal");
        process::exit(1);
    }
}
