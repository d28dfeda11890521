//! Command-line driver: configuration and subcommands.

pub mod commands;
pub mod config;

pub use commands::{reconcile, run};
pub use config::{Cli, Command};
