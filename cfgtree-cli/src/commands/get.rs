//! Command to resolve a setting.

use crate::error::CliError;
use crate::utils::{open_existing_tree, resolve_file, GlobalOptions};
use cfgtree::{canonicalize_value, LookupOptions, Value};
use clap::Args;

/// Resolve a setting and print its value.
#[derive(Args)]
pub struct GetCommand {
    /// Dotted key path (empty for the whole document)
    #[arg(value_name = "PATH")]
    pub path: String,

    /// Only consider settings registered at exactly this path
    #[arg(long)]
    pub no_inherit: bool,

    /// Value to print when the setting cannot be resolved
    #[arg(long, value_name = "VALUE")]
    pub default: Option<String>,

    /// Print value, comment and allowed values as JSON
    #[arg(long)]
    pub all: bool,
}

impl GetCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let file = resolve_file(global)?;
        let tree = open_existing_tree(&file)?;

        let mut opts = LookupOptions::new().inherit(!self.no_inherit);
        if let Some(ref raw) = self.default {
            opts = opts.with_default(canonicalize_value(raw));
        }

        let entry = tree.get_entry(&self.path, &opts)?;

        if self.all {
            let rendered = serde_json::json!({
                "value": entry.value,
                "comment": entry.comment,
                "allowed": entry.allowed,
            });
            let text = serde_json::to_string_pretty(&rendered).map_err(std::io::Error::from)?;
            println!("{text}");
            return Ok(());
        }

        match entry.value {
            Value::Tree(ref subtree) => print!("{}", subtree.dump()?),
            ref other => println!("{other}"),
        }
        Ok(())
    }
}
