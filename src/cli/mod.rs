//! CLI module
//!
//! Provides command-line interface for:
//! - serve: connect, migrate, serve HTTP until Ctrl-C
//! - migrate: connect, migrate, exit

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command, DatabaseArgs, HttpArgs};
pub use commands::{migrate, run, run_command, serve};
pub use errors::{CliError, CliErrorCode, CliResult};
