//! Command to import legacy `key=value` files.

use crate::error::CliError;
use crate::utils::{open_tree, resolve_file, save_tree, GlobalOptions};
use cfgtree::{consolidate_sections, import_legacy_file, ingest_legacy_files_into, Value};
use clap::Args;
use std::path::PathBuf;

/// Import legacy configuration files into the document.
///
/// Without `--namespace`, each file is placed under its file stem. Board and
/// sweep sections are consolidated into `roaches` and `sweeps`.
#[derive(Args)]
pub struct ImportCommand {
    /// Legacy files to import
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,

    /// Place every file under this namespace
    #[arg(long, value_name = "NAMESPACE")]
    pub namespace: Option<String>,
}

impl ImportCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let file = resolve_file(global)?;
        let tree = open_tree(&file)?;

        match self.namespace {
            Some(ref namespace) => {
                for legacy in &self.files {
                    import_legacy_file(&tree, legacy, namespace)?;
                }
                if let Ok(Value::Tree(section)) = tree.lookup(namespace) {
                    consolidate_sections(&section)?;
                }
            }
            None => ingest_legacy_files_into(&tree, &self.files)?,
        }

        if !global.quiet {
            eprintln!("Imported {} file(s)", self.files.len());
        }
        save_tree(&tree, &file)
    }
}
