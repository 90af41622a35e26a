//! Build script for cfgtree-cli.
//!
//! This script generates the man page at build time using clap_mangen.
//! The generated man page is placed in OUT_DIR for inclusion in release builds.
//!
//! Build scripts cannot depend on the crate being built, so the command
//! structure is declared again here.

use clap::{Arg, Command};
use clap_mangen::Man;
use std::fs;
use std::path::PathBuf;

/// Build the CLI command structure for man page generation.
///
/// Keep this structure synchronized with src/cli.rs.
fn build_cli() -> Command {
    Command::new("cfgtree")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Inspect and edit hierarchical configuration files")
        .long_about(
            "Command-line tool for reading and editing dotted-key configuration trees \
             stored as commented YAML",
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Enable verbose output")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .help("Suppress non-essential output")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("file")
                .long("file")
                .help("Configuration file to operate on")
                .value_name("PATH")
                .global(true)
                .env("CFGTREE_FILE"),
        )
        .subcommands(vec![
            Command::new("get")
                .about("Resolve a setting")
                .long_about("Resolve a setting, falling back one level per namespace"),
            Command::new("keys")
                .about("List the keys of a namespace")
                .long_about("List the visible keys of a namespace, one per line"),
            Command::new("register")
                .about("Register a new setting")
                .long_about("Register a new setting, creating namespaces as needed"),
            Command::new("set")
                .about("Update a setting")
                .long_about("Update a setting, overriding inherited values locally"),
            Command::new("unregister")
                .about("Remove a setting")
                .long_about("Remove a setting together with its comment"),
            Command::new("comment")
                .about("Show the comment of a setting")
                .long_about("Print the comment attached to a registered setting"),
            Command::new("dump")
                .about("Print the whole document")
                .long_about("Print the document as commented YAML or as JSON"),
            Command::new("import")
                .about("Import legacy key=value files")
                .long_about("Import legacy key=value files under their file stem or a namespace"),
            Command::new("completions")
                .about("Generate shell completion scripts")
                .long_about("Generate shell completion scripts for bash, zsh, fish, or PowerShell"),
        ])
}

fn main() {
    let out_dir = PathBuf::from(std::env::var("OUT_DIR").unwrap());
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir).unwrap();

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();
    man.render(&mut buffer).unwrap();

    fs::write(man_dir.join("cfgtree.1"), buffer).unwrap();

    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-changed=src/commands/");
}
