//! Path resolution with defaults and one-level inheritance.

use crate::error::{Error, Result};
use crate::key::{allowed_key, split_first, split_last};
use crate::value::Value;

use super::{ConfigTree, Slot};

/// Options controlling [`ConfigTree::get_with`] and [`ConfigTree::get_entry`].
///
/// # Examples
///
/// ```
/// use cfgtree::LookupOptions;
///
/// let opts = LookupOptions::new().with_default(50).inherit(false);
/// assert!(!opts.inherits());
/// ```
#[derive(Debug, Clone)]
pub struct LookupOptions {
    default: Option<Value>,
    inherit: bool,
}

impl Default for LookupOptions {
    fn default() -> Self {
        Self {
            default: None,
            inherit: true,
        }
    }
}

impl LookupOptions {
    /// Inheriting lookup without a default.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lookup that neither inherits nor falls back to a default.
    #[must_use]
    pub fn strict() -> Self {
        Self::new().inherit(false)
    }

    /// Value returned when the path cannot be resolved.
    ///
    /// A default takes precedence over inherited values.
    #[must_use]
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Enable or disable the inheritance fallback.
    #[must_use]
    pub fn inherit(mut self, inherit: bool) -> Self {
        self.inherit = inherit;
        self
    }

    /// Whether the inheritance fallback is enabled.
    #[must_use]
    pub fn inherits(&self) -> bool {
        self.inherit
    }

    fn fallback(&self) -> Option<Entry> {
        self.default.clone().map(Entry::bare)
    }
}

/// A resolved setting together with its sidecars.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    /// The setting's value.
    pub value: Value,
    /// The comment attached to the key that supplied the value.
    pub comment: Option<String>,
    /// The allowed-value specification of that key.
    pub allowed: Option<Value>,
}

impl Entry {
    fn bare(value: Value) -> Self {
        Self {
            value,
            comment: None,
            allowed: None,
        }
    }
}

/// Why a resolution failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Miss {
    Absent,
    /// The path tried to descend through a leaf; never inherited around.
    ThroughLeaf,
}

impl ConfigTree {
    /// Resolve `path` with inheritance and no default.
    ///
    /// The empty path resolves to the tree itself.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if the path cannot be resolved.
    ///
    /// # Examples
    ///
    /// ```
    /// use cfgtree::ConfigTree;
    ///
    /// let cfg = ConfigTree::new();
    /// cfg.register("a.b", 5).unwrap();
    /// assert_eq!(cfg.get("a.b").unwrap().as_i64(), Some(5));
    /// assert_eq!(cfg.get("a.c.b").unwrap().as_i64(), Some(5)); // inherited
    /// assert!(cfg.get("a.x").is_err());
    /// ```
    pub fn get(&self, path: &str) -> Result<Value> {
        self.get_with(path, &LookupOptions::new())
    }

    /// Resolve `path`, returning `default` when it cannot be resolved.
    ///
    /// The default takes precedence over inherited values.
    pub fn get_or(&self, path: &str, default: impl Into<Value>) -> Value {
        let opts = LookupOptions::new().with_default(default);
        match self.get_with(path, &opts) {
            Ok(value) => value,
            Err(_) => opts.default.unwrap_or(Value::Null),
        }
    }

    /// Resolve `path` under explicit options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if the path cannot be resolved and no
    /// default was supplied.
    pub fn get_with(&self, path: &str, opts: &LookupOptions) -> Result<Value> {
        self.get_entry(path, opts).map(|entry| entry.value)
    }

    /// Resolve `path` and return the value with its comment and allowed-value
    /// sidecars.
    ///
    /// Sidecars come from the key that supplied the value, which for an
    /// inherited value is the ancestor's key. Defaults carry no sidecars.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if the path cannot be resolved and no
    /// default was supplied. Paths with an empty segment (`.a`, `a..b`,
    /// `a.`) never resolve.
    pub fn get_entry(&self, path: &str, opts: &LookupOptions) -> Result<Entry> {
        // a path with an empty segment names nothing; never inherit for it
        if !path.is_empty() && path.split('.').any(str::is_empty) {
            return opts.fallback().ok_or_else(|| Error::not_found(path));
        }
        self.locked(|| self.resolve(path, opts))
            .map_err(|_| Error::not_found(path))
    }

    /// Strict navigation: no inheritance and no default.
    ///
    /// This is the explicit counterpart of chained attribute access.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if any segment is missing.
    pub fn lookup(&self, path: &str) -> Result<Value> {
        self.get_with(path, &LookupOptions::strict())
    }

    /// Explicit containment: true iff every segment of `path` is present.
    ///
    /// Inheritance is never consulted. A path ending in a sidecar suffix
    /// (`k._c`) tests for that sidecar.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.locked(|| self.contains_path(path))
    }

    pub(super) fn contains_path(&self, path: &str) -> bool {
        let (head, rest) = split_first(path);
        if rest == "_c" || rest == "_a" {
            return self.raw_contains(path);
        }
        match self.slot(head) {
            None => false,
            Some(_) if rest.is_empty() => true,
            Some(Slot::Tree(child)) => child.contains_path(rest),
            Some(Slot::Leaf) => false,
        }
    }

    pub(super) fn entry_for(&self, key: &str, value: Value) -> Entry {
        Entry {
            value,
            comment: self.local_comment(key),
            allowed: self.raw_get(&allowed_key(key)),
        }
    }

    /// One resolution step at this node.
    ///
    /// When the remaining path cannot be resolved below this node, the leaf
    /// name alone is tried here. Every level on the way back up repeats that
    /// check, so a setting is found at the nearest level that defines it.
    fn resolve(&self, path: &str, opts: &LookupOptions) -> std::result::Result<Entry, Miss> {
        if path.is_empty() {
            return Ok(Entry::bare(Value::Tree(self.clone())));
        }

        let (head, rest) = split_first(path);
        let found = self.raw_get(head);

        if rest.is_empty() {
            return match found {
                Some(value) => Ok(self.entry_for(head, value)),
                None => opts.fallback().ok_or(Miss::Absent),
            };
        }

        let below = match found {
            Some(Value::Tree(child)) => child.resolve(rest, opts),
            Some(_) => return opts.fallback().ok_or(Miss::ThroughLeaf),
            None => Err(Miss::Absent),
        };

        match below {
            Ok(entry) => Ok(entry),
            Err(miss) => {
                if let Some(entry) = opts.fallback() {
                    return Ok(entry);
                }
                if !opts.inherit || miss == Miss::ThroughLeaf {
                    return Err(miss);
                }
                let (_, leaf) = split_last(rest);
                self.raw_get(leaf)
                    .map(|value| self.entry_for(leaf, value))
                    .ok_or(Miss::Absent)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Registration;

    fn sample() -> ConfigTree {
        let cfg = ConfigTree::new();
        cfg.register_from_pairs(
            [
                ("a", Value::Int(1)),
                ("b.c.d", Value::Int(3)),
                ("b.c.c", Value::Int(2)),
                ("b.d", Value::Int(0)),
            ],
            "",
        )
        .unwrap();
        cfg
    }

    #[test]
    fn test_get_direct() {
        let cfg = sample();
        assert_eq!(cfg.get("a").unwrap(), Value::Int(1));
        assert_eq!(cfg.get("b.c.d").unwrap(), Value::Int(3));
    }

    #[test]
    fn test_get_after_unregister_uses_default_then_inheritance() {
        let cfg = sample();
        cfg.unregister("b.c.d").unwrap();

        let err = cfg.get_with("b.c.d", &LookupOptions::strict()).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(cfg.get_or("b.c.d", 50), Value::Int(50));
        assert_eq!(cfg.get("b.c.d").unwrap(), Value::Int(0));
    }

    #[test]
    fn test_default_beats_inheritance() {
        let cfg = ConfigTree::new();
        cfg.register("a.b", 5).unwrap();
        cfg.register("a.c.x", 1).unwrap();
        assert_eq!(cfg.get_or("a.c.b", 7), Value::Int(7));
        assert_eq!(cfg.get("a.c.b").unwrap(), Value::Int(5));
    }

    #[test]
    fn test_inherits_through_missing_intermediate() {
        let cfg = ConfigTree::new();
        cfg.register("roaches.ip", "10.0.0.1").unwrap();
        assert_eq!(
            cfg.get("roaches.r114.ip").unwrap(),
            Value::from("10.0.0.1")
        );
        assert!(cfg
            .get_with("roaches.r114.ip", &LookupOptions::strict())
            .is_err());
    }

    #[test]
    fn test_inheritance_reaches_nearest_ancestor() {
        let cfg = ConfigTree::new();
        cfg.register("x", 1).unwrap();
        cfg.register("a.b.c.other", 2).unwrap();
        assert_eq!(cfg.get("a.b.c.x").unwrap(), Value::Int(1));

        cfg.register("a.x", 3).unwrap();
        assert_eq!(cfg.get("a.b.c.x").unwrap(), Value::Int(3));
    }

    #[test]
    fn test_inheritance_only_uses_leaf_name() {
        // the fallback checks the leaf name one level up, not the full
        // remaining path
        let cfg = ConfigTree::new();
        cfg.register("a.c.b", 1).unwrap();
        cfg.register("n.a.other", 0).unwrap();
        let err = cfg.get("n.a.c.b").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_no_inheritance_across_leaf() {
        let cfg = ConfigTree::new();
        cfg.register("a", 5).unwrap();
        cfg.register("b", 6).unwrap();
        assert!(cfg.get("a.b").unwrap_err().is_not_found());

        cfg.register("x.a", 5).unwrap();
        assert!(cfg.get("x.a.b").unwrap_err().is_not_found());
    }

    #[test]
    fn test_empty_segments_never_resolve() {
        let cfg = ConfigTree::new();
        cfg.register("a", 1).unwrap();
        cfg.register("n.a", 2).unwrap();
        for path in [".a", "a.", "n..a", "x..a", ".n.a"] {
            assert!(cfg.get(path).unwrap_err().is_not_found(), "{path}");
        }
        assert_eq!(cfg.get_or(".a", 9), Value::Int(9));
        assert!(!cfg.contains(".a"));
    }

    #[test]
    fn test_empty_path_is_self() {
        let cfg = sample();
        let value = cfg.get("").unwrap();
        assert!(value.as_tree().unwrap().ptr_eq(&cfg));
    }

    #[test]
    fn test_get_entry_returns_sidecars() {
        let cfg = ConfigTree::new();
        cfg.register_with(
            "mode",
            "fast",
            Registration::new()
                .comment("readout mode")
                .allowed(vec!["fast", "slow"]),
        )
        .unwrap();

        let entry = cfg.get_entry("mode", &LookupOptions::new()).unwrap();
        assert_eq!(entry.value, Value::from("fast"));
        assert_eq!(entry.comment.as_deref(), Some("readout mode"));
        assert_eq!(entry.allowed, Some(Value::from(vec!["fast", "slow"])));

        let inherited = cfg.get_entry("sub.mode", &LookupOptions::new()).unwrap();
        assert_eq!(inherited.comment.as_deref(), Some("readout mode"));
    }

    #[test]
    fn test_get_entry_without_sidecars() {
        let cfg = ConfigTree::new();
        cfg.register("plain", 1).unwrap();
        let entry = cfg.get_entry("plain", &LookupOptions::new()).unwrap();
        assert_eq!(entry.comment, None);
        assert_eq!(entry.allowed, None);
    }

    #[test]
    fn test_contains_is_explicit() {
        let cfg = ConfigTree::new();
        cfg.register_with("a.b", 1, Registration::new().comment("c"))
            .unwrap();
        assert!(cfg.contains("a"));
        assert!(cfg.contains("a.b"));
        assert!(cfg.contains("a.b._c"));
        assert!(!cfg.contains("a.b._a"));
        assert!(!cfg.contains("a.c.b"));
        assert!(!cfg.contains("a.b.c"));
    }

    #[test]
    fn test_lookup_is_strict() {
        let cfg = ConfigTree::new();
        cfg.register("a.b", 1).unwrap();
        cfg.register("a.c.d", 2).unwrap();
        assert_eq!(cfg.lookup("a.c.d").unwrap(), Value::Int(2));
        assert!(cfg.lookup("a.c.b").is_err());
    }
}
