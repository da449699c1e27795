// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command line interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// jobsweep — deletes failed print jobs so one jammed printer does not block
/// its queue forever.
#[derive(Debug, Parser)]
#[command(name = "jobsweep", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Configuration file. Defaults to `Config.json` next to the executable.
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Append logs to this file instead of stderr.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Sweep the printers until Enter or Ctrl-C is pressed (default).
    Run,

    /// Sweep every printer once and exit.
    Once,

    /// Print the failed jobs of every printer without deleting anything.
    List,
}

impl Cli {
    pub fn command_or_default(&self) -> Command {
        self.command.unwrap_or(Command::Run)
    }
}
