//! Command-line interface for guestbook.
//!
//! This module provides the CLI structure, the terminal surface and the
//! interactive shell for the `guestbook` binary.

mod commands;
pub mod shell;
pub mod terminal;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AddCommand, ClearCommand, ConfigCommand, IdCommand, ListCommand, OutputFormat, StatusCommand,
};

/// guestbook - Sign in, leave a message, keep track of who came
///
/// Visitor entries are kept in a local database. Use `shell` for an
/// interactive session that keeps the search filter between actions.
#[derive(Debug, Parser)]
#[command(name = "guestbook")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign the guestbook
    Add(AddCommand),

    /// List visitors, optionally filtered
    List(ListCommand),

    /// Toggle a visitor's attendance
    Toggle(IdCommand),

    /// Remove a visitor
    Delete(IdCommand),

    /// Remove every visitor
    Clear(ClearCommand),

    /// Interactive guestbook session
    Shell,

    /// Show guestbook and storage status
    Status(StatusCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                2 => crate::logging::Verbosity::Debug,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
