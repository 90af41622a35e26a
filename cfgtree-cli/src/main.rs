//! Main entry point for the cfgtree CLI.
//!
//! This is the command-line interface for cfgtree configuration files.
//! It provides commands for reading and editing a document:
//! - `get`: Resolve a setting
//! - `register` / `set` / `unregister`: Edit settings
//! - `dump`: Print the document
//! - `import`: Import legacy files

mod cli;
mod commands;
mod error;
mod utils;

use clap::Parser;
use cli::Cli;
use utils::GlobalOptions;

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Route library log records to stderr at the requested verbosity
    if let Err(e) = cfgtree::init_logger(cli.verbose, cli.quiet).install() {
        eprintln!("Warning: logging unavailable: {e}");
    }

    let global = GlobalOptions {
        verbose: cli.verbose,
        quiet: cli.quiet,
        file: cli.file,
    };

    let result = match cli.command {
        cli::Command::Get(cmd) => cmd.execute(&global),
        cli::Command::Keys(cmd) => cmd.execute(&global),
        cli::Command::Register(cmd) => cmd.execute(&global),
        cli::Command::Set(cmd) => cmd.execute(&global),
        cli::Command::Unregister(cmd) => cmd.execute(&global),
        cli::Command::Comment(cmd) => cmd.execute(&global),
        cli::Command::Dump(cmd) => cmd.execute(&global),
        cli::Command::Import(cmd) => cmd.execute(&global),
        cli::Command::Completions(cmd) => cmd.execute(&global),
    };

    // Handle errors and set exit code
    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
