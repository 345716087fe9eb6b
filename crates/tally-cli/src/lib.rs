//! Personal dashboard CLI library.
//!
//! This crate provides the `tally` command-line interface over the core
//! engine and its `SQLite` store.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands};
pub use config::Config;
