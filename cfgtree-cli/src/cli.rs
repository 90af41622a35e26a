//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use crate::commands::{
    CommentCommand, CompletionsCommand, DumpCommand, GetCommand, ImportCommand, KeysCommand,
    RegisterCommand, SetCommand, UnregisterCommand,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line tool for inspecting and editing configuration trees.
#[derive(Parser)]
#[command(name = "cfgtree")]
#[command(version, about = "Inspect and edit hierarchical configuration files", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Configuration file to operate on
    #[arg(long, value_name = "PATH", global = true, env = "CFGTREE_FILE")]
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Resolve a setting, falling back one level per namespace
    Get(GetCommand),

    /// List the keys of a namespace
    Keys(KeysCommand),

    /// Register a new setting
    Register(RegisterCommand),

    /// Update a setting, overriding inherited values locally
    Set(SetCommand),

    /// Remove a setting and its comment
    Unregister(UnregisterCommand),

    /// Show the comment of a setting
    Comment(CommentCommand),

    /// Print the whole document
    Dump(DumpCommand),

    /// Import legacy key=value files
    Import(ImportCommand),

    /// Generate shell completion scripts
    Completions(CompletionsCommand),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_get_with_flags() {
        let cli = Cli::parse_from([
            "cfgtree",
            "--file",
            "/tmp/x.yaml",
            "get",
            "roaches.r114.ip",
            "--no-inherit",
            "--default",
            "0",
        ]);
        assert_eq!(cli.file, Some(PathBuf::from("/tmp/x.yaml")));
        match cli.command {
            Command::Get(cmd) => {
                assert_eq!(cmd.path, "roaches.r114.ip");
                assert!(cmd.no_inherit);
                assert_eq!(cmd.default.as_deref(), Some("0"));
                assert!(!cmd.all);
            }
            _ => panic!("expected get"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["cfgtree", "keys", "--quiet"]);
        assert!(cli.quiet);
        match cli.command {
            Command::Keys(cmd) => assert!(cmd.path.is_none()),
            _ => panic!("expected keys"),
        }
    }
}
