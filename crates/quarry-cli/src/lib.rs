//! Quarry CLI library.
//!
//! This library provides the core functionality for the Quarry command-line interface,
//! including configuration management, game data discovery, command execution,
//! and output formatting.

pub mod cli;
pub mod commands;
pub mod config;
pub mod discovery;
pub mod error;
pub mod output;
pub mod writer;

pub use cli::{Cli, Command};
pub use config::Config;
pub use discovery::DirectorySource;
pub use error::{CliError, Result};
pub use output::Formatter;
