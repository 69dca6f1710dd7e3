//! Line-oriented shell that drives a [`ProgressEngine`](crate::ProgressEngine).

pub mod commands;
mod completion;
pub mod context;
pub mod io;
pub mod output;
pub mod registry;
mod shell;

pub use context::{CliMode, CommandError, CommandResult, ShellContext};
pub use shell::run_cli;
