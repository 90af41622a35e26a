//! Library exports for cfgtree-cli.
//!
//! This module exports the CLI structure so documentation tooling can
//! inspect the command definitions.

pub mod cli;
pub mod commands;
pub mod error;
pub mod utils;

// Re-export CLI for documentation tooling
pub use cli::Cli;
