//! Command line interface

/// Argument parsing and subcommands
pub mod cli;
pub mod ui;
