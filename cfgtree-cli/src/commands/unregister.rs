//! Command to remove a setting.

use crate::error::CliError;
use crate::utils::{open_existing_tree, resolve_file, save_tree, GlobalOptions};
use clap::Args;

/// Remove a setting together with its comment and allowed values.
#[derive(Args)]
pub struct UnregisterCommand {
    /// Dotted key path
    #[arg(value_name = "PATH")]
    pub path: String,
}

impl UnregisterCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let file = resolve_file(global)?;
        let tree = open_existing_tree(&file)?;

        if !tree.contains(&self.path) {
            log::warn!("'{}' is not registered", self.path);
            return Ok(());
        }

        tree.unregister(&self.path)?;
        save_tree(&tree, &file)
    }
}
