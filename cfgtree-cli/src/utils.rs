//! Utility functions for CLI operations.
//!
//! This module resolves the configuration file a command works on and
//! handles loading and saving it.

use crate::error::CliError;
use cfgtree::persist::expand_tilde;
use cfgtree::{default_config_path, load, ConfigTree};
use std::path::{Path, PathBuf};

/// Global CLI options shared across all commands.
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,

    /// Override the configuration file location.
    pub file: Option<PathBuf>,
}

/// Resolve the configuration file from global options.
///
/// Priority: `--file` (or `CFGTREE_FILE`) > `~/.cfgtree/config.yaml`.
pub fn resolve_file(global: &GlobalOptions) -> Result<PathBuf, CliError> {
    match global.file {
        Some(ref file) => Ok(expand_tilde(file)?),
        None => Ok(default_config_path()?),
    }
}

/// Load the configuration file, starting empty if it does not exist yet.
pub fn open_tree(path: &Path) -> Result<ConfigTree, CliError> {
    if !path.exists() {
        log::debug!("{} does not exist, starting empty", path.display());
        return Ok(ConfigTree::new());
    }
    Ok(load(path, None)?)
}

/// Load the configuration file, which must exist.
pub fn open_existing_tree(path: &Path) -> Result<ConfigTree, CliError> {
    Ok(load(path, None)?)
}

/// Write the tree back to its file.
pub fn save_tree(tree: &ConfigTree, path: &Path) -> Result<(), CliError> {
    tree.save(path)?;
    log::info!("wrote {}", path.display());
    Ok(())
}

/// Shorten a path for display.
///
/// If the path is within the home directory, show it as ~/...
/// Otherwise, show the full path.
pub fn shorten_path(path: &Path) -> String {
    if let Some(home) = home::home_dir() {
        if let Ok(relative) = path.strip_prefix(&home) {
            return format!("~/{}", relative.display());
        }
    }
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn global(file: Option<&str>) -> GlobalOptions {
        GlobalOptions {
            verbose: false,
            quiet: false,
            file: file.map(PathBuf::from),
        }
    }

    #[test]
    fn test_resolve_file_prefers_flag() {
        let path = resolve_file(&global(Some("/etc/cfg.yaml"))).unwrap();
        assert_eq!(path, PathBuf::from("/etc/cfg.yaml"));
    }

    #[test]
    fn test_resolve_file_default() {
        let path = resolve_file(&global(None)).unwrap();
        assert!(path.ends_with(".cfgtree/config.yaml"));
    }

    #[test]
    fn test_open_tree_missing_file_is_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let tree = open_tree(&temp_dir.path().join("none.yaml")).unwrap();
        assert!(tree.is_empty());
        assert!(open_existing_tree(&temp_dir.path().join("none.yaml")).is_err());
    }

    #[test]
    fn test_shorten_path_outside_home() {
        assert_eq!(shorten_path(Path::new("/opt/x.yaml")), "/opt/x.yaml");
    }
}
