//! Command to print the whole document.

use crate::error::CliError;
use crate::utils::{open_existing_tree, resolve_file, GlobalOptions};
use clap::{Args, ValueEnum};

/// Output format for `dump`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DumpFormat {
    /// YAML with end-of-line comments
    Yaml,
    /// Pretty-printed JSON (comments are omitted)
    Json,
}

/// Print the configuration document.
#[derive(Args)]
pub struct DumpCommand {
    /// Output format
    #[arg(long, value_enum, default_value = "yaml")]
    pub format: DumpFormat,
}

impl DumpCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let file = resolve_file(global)?;
        let tree = open_existing_tree(&file)?;

        match self.format {
            DumpFormat::Yaml => print!("{}", tree.dump()?),
            DumpFormat::Json => {
                let text = serde_json::to_string_pretty(&tree).map_err(std::io::Error::from)?;
                println!("{text}");
            }
        }
        Ok(())
    }
}
