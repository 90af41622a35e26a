//! Command to update a setting.

use crate::error::CliError;
use crate::utils::{open_existing_tree, resolve_file, save_tree, GlobalOptions};
use cfgtree::canonicalize_value;
use clap::Args;

/// Update a registered setting, or override an inherited one locally.
#[derive(Args)]
pub struct SetCommand {
    /// Dotted key path
    #[arg(value_name = "PATH")]
    pub path: String,

    /// New value; numbers are stored as numbers unless quoted
    #[arg(value_name = "VALUE")]
    pub value: String,

    /// Replace the comment (an empty string removes it)
    #[arg(long, value_name = "TEXT")]
    pub comment: Option<String>,
}

impl SetCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let file = resolve_file(global)?;
        let tree = open_existing_tree(&file)?;

        tree.update_with_comment(
            &self.path,
            canonicalize_value(&self.value),
            self.comment.as_deref(),
        )?;

        save_tree(&tree, &file)
    }
}
