//! Command to show the comment of a setting.

use crate::error::CliError;
use crate::utils::{open_existing_tree, resolve_file, GlobalOptions};
use clap::Args;

/// Print the comment attached to a registered setting.
#[derive(Args)]
pub struct CommentCommand {
    /// Dotted key path
    #[arg(value_name = "PATH")]
    pub path: String,
}

impl CommentCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let file = resolve_file(global)?;
        let tree = open_existing_tree(&file)?;

        if let Some(comment) = tree.comment(&self.path)? {
            println!("{comment}");
        }
        Ok(())
    }
}
