//! Registration, update and removal of settings.
//!
//! `register` is the only way to create a key; `update` only changes keys
//! that already resolve, creating a local override when the current value is
//! inherited.

use crate::error::{Error, Result};
use crate::key::{allowed_key, canonicalize_key, comment_key, split_first, split_last, validate_key};
use crate::value::{canonicalize_value, Value};

use super::{adopt_lock, ConfigTree, LookupOptions, Slot};

/// Options for [`ConfigTree::register_with`].
///
/// # Examples
///
/// ```
/// use cfgtree::{ConfigTree, Registration};
///
/// let cfg = ConfigTree::new();
/// let created = cfg
///     .register_with("beammap.sweep.imgdir", "/data", Registration::new().comment("image root"))
///     .unwrap();
/// assert!(created);
/// assert_eq!(cfg.comment("beammap.sweep.imgdir").unwrap().as_deref(), Some("image root"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Registration {
    allowed: Option<Value>,
    comment: Option<String>,
    update: bool,
}

impl Registration {
    /// Plain registration: no sidecars, existing keys are left alone.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a comment. Empty comments are not stored.
    ///
    /// Comments live on a single line: line breaks become spaces and
    /// trailing whitespace is dropped when the comment is stored.
    #[must_use]
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Attach an allowed-value specification.
    #[must_use]
    pub fn allowed(mut self, allowed: impl Into<Value>) -> Self {
        self.allowed = Some(allowed.into());
        self
    }

    /// Overwrite the key if it already exists.
    #[must_use]
    pub fn update(mut self, update: bool) -> Self {
        self.update = update;
        self
    }
}

impl ConfigTree {
    /// Register a new setting; see [`register_with`](Self::register_with).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKey`] or [`Error::StructuralConflict`].
    pub fn register(&self, path: &str, value: impl Into<Value>) -> Result<bool> {
        self.register_with(path, value, Registration::new())
    }

    /// Register a setting, creating intermediate namespaces as needed.
    ///
    /// The path is canonicalized first. Returns `true` if the key was new.
    /// An existing key is left untouched (and `false` returned) unless the
    /// registration asks to update it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKey`] for a non-canonical path and
    /// [`Error::StructuralConflict`] if an intermediate segment is a leaf or
    /// the value is a tree that contains this one.
    pub fn register_with(
        &self,
        path: &str,
        value: impl Into<Value>,
        registration: Registration,
    ) -> Result<bool> {
        let key = canonicalize_key(path);
        validate_key(&key)?;
        let value = value.into();

        self.locked(|| {
            let fresh = !self.contains_path(&key);
            if !fresh && !registration.update {
                return Ok(false);
            }
            self.insert_path(&key, value, registration.allowed, registration.comment)?;
            Ok(fresh)
        })
    }

    /// Change an existing or inherited setting.
    ///
    /// # Errors
    ///
    /// See [`update_with_comment`](Self::update_with_comment).
    pub fn update(&self, path: &str, value: impl Into<Value>) -> Result<()> {
        self.update_with_comment(path, value, None)
    }

    /// Change a setting, optionally replacing its comment.
    ///
    /// If `path` is registered it is overwritten in place after checking the
    /// key's allowed values. If it only resolves through inheritance, a new
    /// local key is registered at `path`, seeded with the inherited allowed
    /// values and comment (unless a comment is given); the ancestor is left
    /// unchanged. An empty comment removes the existing one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if the path neither exists nor is
    /// inherited, [`Error::DisallowedValue`] if the value is rejected, and
    /// [`Error::InvalidKey`] for a non-canonical path.
    pub fn update_with_comment(
        &self,
        path: &str,
        value: impl Into<Value>,
        comment: Option<&str>,
    ) -> Result<()> {
        validate_key(path)?;
        let value = value.into();

        self.locked(|| {
            if self.contains_path(path) {
                return self.overwrite_path(path, value, comment);
            }

            let inherited = self
                .get_entry(path, &LookupOptions::new())
                .map_err(|_| Error::not_found(path))?;
            let comment = comment.map(str::to_string).or(inherited.comment);
            log::debug!("overriding inherited setting {path} locally");
            self.insert_path(path, value, inherited.allowed, comment)
        })
    }

    /// Remove a setting and both of its sidecars.
    ///
    /// Removing a path that does not exist is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKey`] for a non-canonical path.
    pub fn unregister(&self, path: &str) -> Result<()> {
        validate_key(path)?;

        self.locked(|| {
            let (parent, leaf) = split_last(path);
            let Some(node) = self.strict_node(parent) else {
                return Ok(());
            };
            node.raw_remove(leaf);
            node.raw_remove(&comment_key(leaf));
            node.raw_remove(&allowed_key(leaf));
            log::debug!("unregistered {path}");
            Ok(())
        })
    }

    /// The comment attached to a registered key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if the key was never registered and
    /// [`Error::InvalidKey`] for a non-canonical path.
    pub fn comment(&self, path: &str) -> Result<Option<String>> {
        validate_key(path)?;

        self.locked(|| {
            if !self.contains_path(path) {
                return Err(Error::not_found(path));
            }
            let (parent, leaf) = split_last(path);
            Ok(self
                .strict_node(parent)
                .and_then(|node| node.local_comment(leaf)))
        })
    }

    /// Check `value` against the allowed-value specification of `path`.
    ///
    /// Enforcement is not implemented: the check always passes, and a
    /// warning is logged when a specification exists.
    #[must_use]
    pub fn allowed(&self, path: &str, value: &Value) -> bool {
        self.locked(|| {
            let (parent, leaf) = split_last(path);
            self.strict_node(parent)
                .map_or(true, |node| node.allows(leaf, value))
        })
    }

    /// Register every `(key, value)` pair under `namespace`, overwriting.
    ///
    /// Keys are joined to the namespace and canonicalized; string values are
    /// passed through [`canonicalize_value`]. An empty namespace registers
    /// at the root. Later pairs win on collision, including replacing a
    /// whole namespace with a leaf.
    ///
    /// # Errors
    ///
    /// Returns the first registration error; earlier pairs stay registered.
    ///
    /// # Examples
    ///
    /// ```
    /// use cfgtree::{ConfigTree, Value};
    ///
    /// let cfg = ConfigTree::new();
    /// cfg.register_from_pairs([("port", "50000"), ("host", "'localhost'")], "templar")
    ///     .unwrap();
    /// assert_eq!(cfg.get("templar.port").unwrap(), Value::Int(50000));
    /// assert_eq!(cfg.get("templar.host").unwrap(), Value::from("localhost"));
    /// ```
    pub fn register_from_pairs<K, V, I>(&self, pairs: I, namespace: &str) -> Result<&Self>
    where
        K: AsRef<str>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let prefix = if namespace.is_empty() || namespace.ends_with('.') {
            namespace.to_string()
        } else {
            format!("{namespace}.")
        };

        self.locked(|| {
            for (key, value) in pairs {
                let value = match value.into() {
                    Value::String(raw) => canonicalize_value(&raw),
                    other => other,
                };
                let full = format!("{prefix}{}", key.as_ref());
                self.register_with(&full, value, Registration::new().update(true))?;
            }
            Ok(self)
        })
    }

    // ---- internals; callers hold the tree lock ----

    /// The tree at `path` without inheritance; the empty path is `self`.
    pub(super) fn strict_node(&self, path: &str) -> Option<ConfigTree> {
        if path.is_empty() {
            return Some(self.clone());
        }
        let (head, rest) = split_first(path);
        match self.slot(head)? {
            Slot::Tree(child) => child.strict_node(rest),
            Slot::Leaf => None,
        }
    }

    fn allows(&self, key: &str, value: &Value) -> bool {
        if self.raw_contains(&allowed_key(key)) {
            log::warn!(
                "{key} has restricted allowed values but checking is not implemented; accepting {value}"
            );
        }
        true
    }

    fn insert_path(
        &self,
        path: &str,
        value: Value,
        allowed: Option<Value>,
        comment: Option<String>,
    ) -> Result<()> {
        let (head, rest) = split_first(path);

        if !rest.is_empty() {
            let (child, created) = match self.slot(head) {
                Some(Slot::Tree(child)) => (child, false),
                Some(Slot::Leaf) => {
                    return Err(Error::conflict(
                        path,
                        format!("'{head}' is a setting, not a namespace"),
                    ));
                }
                None => {
                    // the new namespace is not linked yet, so check the
                    // deepest existing node instead
                    if super::value_reaches(&value, self) {
                        return Err(Error::conflict(
                            path,
                            "a namespace cannot be attached inside itself",
                        ));
                    }
                    (ConfigTree::with_lock(self.current_lock()), true)
                }
            };
            child.insert_path(rest, value, allowed, comment)?;
            if created {
                self.raw_insert(head, Value::Tree(child));
            }
            return Ok(());
        }

        self.attach(head, &value)?;
        log::debug!("registering {head}={value}");
        self.raw_insert(head, value);
        if let Some(comment) = comment.as_deref().and_then(normalize_comment) {
            self.raw_insert(&comment_key(head), Value::String(comment));
        }
        if let Some(allowed) = allowed {
            self.raw_insert(&allowed_key(head), allowed);
        }
        Ok(())
    }

    fn overwrite_path(&self, path: &str, value: Value, comment: Option<&str>) -> Result<()> {
        let (parent, leaf) = split_last(path);
        let node = self
            .strict_node(parent)
            .ok_or_else(|| Error::not_found(path))?;

        if !node.allows(leaf, &value) {
            return Err(Error::DisallowedValue {
                key: path.to_string(),
                value: value.to_string(),
            });
        }
        node.attach(leaf, &value)?;
        log::debug!("updating {path}={value}");
        node.raw_insert(leaf, value);
        if let Some(comment) = comment {
            match normalize_comment(comment) {
                Some(comment) => node.raw_insert(&comment_key(leaf), Value::String(comment)),
                None => {
                    node.raw_remove(&comment_key(leaf));
                }
            }
        }
        Ok(())
    }

    /// Prepare `value` for storage under `key` of this node.
    ///
    /// Trees adopt this tree's lock. A tree that contains this node would
    /// form a cycle and is rejected.
    fn attach(&self, key: &str, value: &Value) -> Result<()> {
        if super::value_reaches(value, self) {
            return Err(Error::conflict(
                key,
                "a namespace cannot be attached inside itself",
            ));
        }
        if value.is_tree() || matches!(value, Value::Sequence(_)) {
            log::debug!("updating lock for key {key}");
            adopt_lock(value, &self.current_lock());
        }
        Ok(())
    }
}

/// The stored form of a comment, `None` if nothing visible is left.
fn normalize_comment(comment: &str) -> Option<String> {
    let line = comment.replace(['\n', '\r'], " ");
    let line = line.trim_end();
    (!line.is_empty()).then(|| line.to_string())
}
