//! Reading and writing configuration trees as YAML.
//!
//! Documents are plain YAML mappings. A key's comment is written at the end
//! of the key's line (`key: value  # comment`) and recovered from there when
//! the document is loaded again. Allowed-value specifications are not
//! persisted.

mod comments;
mod emit;

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::legacy;
use crate::tree::ConfigTree;
use crate::value::Value;

/// Directory under the home directory holding the default document.
pub const DEFAULT_DIR: &str = ".cfgtree";

/// File name of the default document.
pub const DEFAULT_FILE: &str = "config.yaml";

/// Setting naming a separate document that holds the `roaches` tree.
pub const ROACH_FILE_KEY: &str = "roaches.value";

impl ConfigTree {
    /// Renders the tree as a YAML document with end-of-line comments.
    ///
    /// # Errors
    ///
    /// Returns an error if a scalar cannot be rendered.
    ///
    /// # Examples
    ///
    /// ```
    /// use cfgtree::{ConfigTree, Registration};
    ///
    /// let cfg = ConfigTree::new();
    /// cfg.register_with("roaches.ip", "10.0.0.1", Registration::new().comment("board"))
    ///     .unwrap();
    /// assert_eq!(cfg.dump().unwrap(), "roaches:\n  ip: 10.0.0.1  # board\n");
    /// ```
    pub fn dump(&self) -> Result<String> {
        self.locked(|| emit::emit_document(self))
    }

    /// Writes [`dump`](Self::dump) to `path`, creating parent directories.
    ///
    /// The tree lock is held while the file is written, so the document is a
    /// consistent snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPath`] if the file cannot be written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.locked(|| {
            let text = self.dump()?;
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| Error::InvalidPath {
                    path: parent.to_path_buf(),
                    reason: format!("Failed to create directory: {e}"),
                })?;
            }
            fs::write(path, text).map_err(|e| Error::InvalidPath {
                path: path.to_path_buf(),
                reason: format!("Failed to write configuration file: {e}"),
            })?;
            log::debug!("saved configuration to {}", path.display());
            Ok(())
        })
    }

    /// Parses a YAML document into a new tree with its own lock.
    ///
    /// An empty document yields an empty tree. Comments at the end of key
    /// lines become the comments of those keys.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Yaml`] for malformed YAML and
    /// [`Error::InvalidDocument`] if the top level is not a mapping.
    ///
    /// # Examples
    ///
    /// ```
    /// use cfgtree::ConfigTree;
    ///
    /// let cfg = ConfigTree::from_yaml_str("roaches:\n  ip: 10.0.0.1  # board\n").unwrap();
    /// assert_eq!(cfg.comment("roaches.ip").unwrap().as_deref(), Some("board"));
    /// ```
    pub fn from_yaml_str(text: &str) -> Result<ConfigTree> {
        let document: serde_yaml::Value = serde_yaml::from_str(text)?;
        let tree = match Value::from(document) {
            Value::Null => ConfigTree::new(),
            Value::Tree(tree) => tree,
            other => {
                return Err(Error::InvalidDocument(format!(
                    "expected a mapping at the top level, found {}",
                    other.type_name()
                )))
            }
        };
        comments::attach(&tree, comments::scan(text));
        tree.reset_lock();
        Ok(tree)
    }
}

/// Loads a configuration file.
///
/// Files ending in `.yaml` or `.yml` are read as YAML documents. If such a
/// document sets [`ROACH_FILE_KEY`], the YAML file it names replaces the
/// `roaches` tree; a relative name that does not exist as given is resolved
/// against the directory of `path`. Any other file is read as a legacy
/// `key=value` file and placed under `namespace`, which is then required.
///
/// # Errors
///
/// Returns [`Error::InvalidPath`] if the file (or the roach file it names)
/// cannot be read,
/// [`Error::MissingNamespace`] for a legacy file without a namespace, and
/// parse errors from the respective format.
pub fn load(path: impl AsRef<Path>, namespace: Option<&str>) -> Result<ConfigTree> {
    let path = path.as_ref();
    if is_yaml_path(path) {
        let text = fs::read_to_string(path).map_err(|e| Error::InvalidPath {
            path: path.to_path_buf(),
            reason: format!("Failed to read configuration file: {e}"),
        })?;
        log::debug!("loading YAML configuration from {}", path.display());
        let tree = ConfigTree::from_yaml_str(&text)?;
        load_roach_file(&tree, path)?;
        return Ok(tree);
    }

    let namespace = namespace.ok_or_else(|| Error::MissingNamespace {
        path: path.to_path_buf(),
    })?;
    let tree = ConfigTree::new();
    legacy::import_legacy_file(&tree, path, namespace)?;
    Ok(tree)
}

/// Replace `roaches` with the document named by `roaches.value`, if set.
///
/// The named file is used as is when it exists, otherwise it is looked up
/// next to the configuration file.
fn load_roach_file(tree: &ConfigTree, config_path: &Path) -> Result<()> {
    let Ok(Value::String(target)) = tree.lookup(ROACH_FILE_KEY) else {
        return Ok(());
    };

    let target = PathBuf::from(target);
    let roach_path = if target.exists() {
        target
    } else {
        config_path
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(target)
    };

    let text = fs::read_to_string(&roach_path).map_err(|e| Error::InvalidPath {
        path: roach_path.clone(),
        reason: format!("Failed to read roach configuration: {e}"),
    })?;
    log::debug!("loading roach configuration from {}", roach_path.display());
    tree.update("roaches", ConfigTree::from_yaml_str(&text)?)
}

fn is_yaml_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
}

/// Default location of the configuration document, `~/.cfgtree/config.yaml`.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn default_config_path() -> Result<PathBuf> {
    let home = home::home_dir().ok_or_else(|| Error::InvalidPath {
        path: PathBuf::from("~"),
        reason: "Cannot determine home directory".to_string(),
    })?;
    Ok(home.join(DEFAULT_DIR).join(DEFAULT_FILE))
}

/// Expand a leading `~` or `~/` to the home directory.
///
/// `~user` syntax is not supported.
///
/// # Errors
///
/// Returns an error if the path is not UTF-8, the home directory cannot be
/// determined, or the path uses `~user`.
///
/// # Examples
///
/// ```
/// use cfgtree::persist::expand_tilde;
/// use std::path::Path;
///
/// let expanded = expand_tilde(Path::new("~/cfg.yaml")).unwrap();
/// assert!(expanded.ends_with("cfg.yaml"));
/// assert_eq!(expand_tilde(Path::new("/etc/x.yaml")).unwrap(), Path::new("/etc/x.yaml"));
/// ```
pub fn expand_tilde(path: &Path) -> Result<PathBuf> {
    let path_str = path.to_str().ok_or_else(|| Error::InvalidPath {
        path: path.to_path_buf(),
        reason: "Path contains invalid UTF-8".to_string(),
    })?;

    if !path_str.starts_with('~') {
        return Ok(path.to_path_buf());
    }

    let home = home::home_dir().ok_or_else(|| Error::InvalidPath {
        path: path.to_path_buf(),
        reason: "Cannot determine home directory".to_string(),
    })?;

    match path_str.strip_prefix("~/") {
        _ if path_str == "~" => Ok(home),
        Some(rest) => Ok(home.join(rest)),
        None => Err(Error::InvalidPath {
            path: path.to_path_buf(),
            reason: "~user syntax is not supported; use ~ or ~/path".to_string(),
        }),
    }
}
