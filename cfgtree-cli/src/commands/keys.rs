//! Command to list the keys of a namespace.

use crate::error::CliError;
use crate::utils::{open_existing_tree, resolve_file, GlobalOptions};
use cfgtree::Value;
use clap::Args;

/// List the keys of a namespace, one per line.
#[derive(Args)]
pub struct KeysCommand {
    /// Namespace to list (defaults to the top level)
    #[arg(value_name = "PATH")]
    pub path: Option<String>,
}

impl KeysCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let file = resolve_file(global)?;
        let tree = open_existing_tree(&file)?;

        let path = self.path.unwrap_or_default();
        match tree.lookup(&path)? {
            Value::Tree(namespace) => {
                for key in namespace.keys() {
                    println!("{key}");
                }
                Ok(())
            }
            other => Err(CliError::InvalidArguments(format!(
                "'{}' is a {} setting, not a namespace",
                path,
                other.type_name()
            ))),
        }
    }
}
