//! Command to register a new setting.

use crate::error::CliError;
use crate::utils::{open_tree, resolve_file, save_tree, shorten_path, GlobalOptions};
use cfgtree::{canonicalize_value, Registration};
use clap::Args;

/// Register a new setting, creating namespaces as needed.
#[derive(Args)]
pub struct RegisterCommand {
    /// Dotted key path
    #[arg(value_name = "PATH")]
    pub path: String,

    /// Value; numbers are stored as numbers unless quoted
    #[arg(value_name = "VALUE")]
    pub value: String,

    /// Comment to attach to the setting
    #[arg(long, value_name = "TEXT")]
    pub comment: Option<String>,

    /// Overwrite the setting if it is already registered
    #[arg(long)]
    pub update: bool,
}

impl RegisterCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let file = resolve_file(global)?;
        let tree = open_tree(&file)?;

        let mut registration = Registration::new().update(self.update);
        if let Some(comment) = self.comment {
            registration = registration.comment(comment);
        }

        let fresh = tree.register_with(&self.path, canonicalize_value(&self.value), registration)?;

        if !fresh && !self.update {
            if !global.quiet {
                eprintln!(
                    "'{}' is already registered; use --update to overwrite",
                    self.path
                );
            }
            return Ok(());
        }

        save_tree(&tree, &file)?;
        if global.verbose {
            eprintln!("Registered '{}' in {}", self.path, shorten_path(&file));
        }
        Ok(())
    }
}
