//! The configuration tree.
//!
//! A [`ConfigTree`] is an ordered mapping from key to [`Value`], where values
//! may themselves be trees. Settings are addressed by dotted key paths and
//! resolved with one-level inheritance (see [`ConfigTree::get`]).
//!
//! # Locking
//!
//! Every node of a tree references the *same* reentrant lock. Public
//! operations hold it for their full duration, including recursion into
//! child nodes, so a single-key operation is atomic with respect to every
//! other operation on the tree. Attaching a subtree rebinds it to the
//! parent's lock; [`ConfigTree::copy`] and loading from text install one
//! fresh lock over the whole result.
//!
//! # Sidecar keys
//!
//! Comments and allowed-value specifications are stored in the node beside
//! their owner as `<key>._c` and `<key>._a`. They are hidden from
//! [`keys`](ConfigTree::keys), [`items`](ConfigTree::items) and the default
//! [`asdict`](ConfigTree::asdict) view. [`todict`](ConfigTree::todict) is a
//! structural conversion and keeps them.
//!
//! # Examples
//!
//! ```
//! use cfgtree::{ConfigTree, Registration};
//!
//! let cfg = ConfigTree::new();
//! cfg.register_with("roaches.ip", "10.0.0.1", Registration::new().comment("board address"))
//!     .unwrap();
//! cfg.register("roaches.r114.port", 50000).unwrap();
//!
//! // r114 has no ip of its own and inherits the namespace-wide one
//! assert_eq!(cfg.get("roaches.r114.ip").unwrap().as_str(), Some("10.0.0.1"));
//!
//! // updating an inherited setting creates a local override
//! cfg.update("roaches.r114.ip", "10.0.0.2").unwrap();
//! assert_eq!(cfg.get("roaches.ip").unwrap().as_str(), Some("10.0.0.1"));
//! assert_eq!(cfg.get("roaches.r114.ip").unwrap().as_str(), Some("10.0.0.2"));
//! ```

mod lookup;
mod mutation;

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::{Mutex, ReentrantMutex};

use crate::key::{canonicalize_key, comment_key, is_reserved, sidecar_owner, COMMENT_SUFFIX};
use crate::value::Value;

pub use lookup::{Entry, LookupOptions};
pub use mutation::Registration;

/// The lock shared by every node of one tree.
pub(crate) type TreeLock = Arc<ReentrantMutex<()>>;

struct Node {
    /// Rebindable reference to the tree-wide lock.
    lock: Mutex<TreeLock>,
    entries: Mutex<IndexMap<String, Value>>,
}

/// What a key holds, without cloning leaf values.
enum Slot {
    Tree(ConfigTree),
    Leaf,
}

/// A hierarchical, dotted-key configuration namespace.
///
/// `ConfigTree` is a cheap handle: clones refer to the same node. Use
/// [`copy`](Self::copy) for an independent duplicate.
#[derive(Clone)]
pub struct ConfigTree {
    node: Arc<Node>,
}

impl ConfigTree {
    /// Creates an empty tree with its own lock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_lock(Arc::new(ReentrantMutex::new(())))
    }

    pub(crate) fn with_lock(lock: TreeLock) -> Self {
        Self {
            node: Arc::new(Node {
                lock: Mutex::new(lock),
                entries: Mutex::new(IndexMap::new()),
            }),
        }
    }

    /// Creates a tree from literal key/value pairs.
    ///
    /// Keys are canonicalized but not split: a key containing `.` is stored
    /// as a single literal key. Values are stored as given. Use
    /// [`register_from_pairs`](Self::register_from_pairs) to build nested
    /// namespaces from dotted keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use cfgtree::ConfigTree;
    ///
    /// let cfg = ConfigTree::from_pairs([("Data Dir", "/data"), ("mode", "fast")]);
    /// assert_eq!(cfg.keys(), vec!["data_dir", "mode"]);
    /// ```
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: AsRef<str>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self::from_entries(
            pairs
                .into_iter()
                .map(|(k, v)| (canonicalize_key(k.as_ref()), v.into())),
        )
    }

    /// Builds a node from raw entries and binds nested trees to its lock.
    pub(crate) fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        let tree = Self::new();
        tree.node.entries.lock().extend(entries);
        let lock = tree.current_lock();
        for value in tree.snapshot().values() {
            adopt_lock(value, &lock);
        }
        tree
    }

    // ---- locking ----

    fn current_lock(&self) -> TreeLock {
        Arc::clone(&*self.node.lock.lock())
    }

    /// Runs `f` while holding the tree-wide lock.
    ///
    /// The lock reference is re-read after acquisition; if the node was
    /// rebound to another tree in the meantime, the new lock is taken instead.
    pub(crate) fn locked<R>(&self, f: impl FnOnce() -> R) -> R {
        let lock = self.current_lock();
        let guard = lock.lock();
        if Arc::ptr_eq(&lock, &*self.node.lock.lock()) {
            f()
        } else {
            drop(guard);
            self.locked(f)
        }
    }

    /// Binds this node and every nested tree to `lock`.
    pub(crate) fn set_lock(&self, lock: &TreeLock) {
        *self.node.lock.lock() = Arc::clone(lock);
        for value in self.snapshot().values() {
            adopt_lock(value, lock);
        }
    }

    /// Installs one fresh lock over the whole tree.
    pub(crate) fn reset_lock(&self) {
        self.set_lock(&Arc::new(ReentrantMutex::new(())));
    }

    /// Returns true if both handles are guarded by the same lock instance.
    #[must_use]
    pub fn shares_lock_with(&self, other: &ConfigTree) -> bool {
        Arc::ptr_eq(&self.current_lock(), &other.current_lock())
    }

    /// Returns true if both handles refer to the same node.
    #[must_use]
    pub fn ptr_eq(&self, other: &ConfigTree) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }

    /// Returns true if `other` is this node or is reachable from it.
    pub(crate) fn reaches(&self, other: &ConfigTree) -> bool {
        self.ptr_eq(other) || self.snapshot().values().any(|v| value_reaches(v, other))
    }

    // ---- raw node access; never held across calls into other nodes ----

    fn snapshot(&self) -> IndexMap<String, Value> {
        self.node.entries.lock().clone()
    }

    fn raw_get(&self, key: &str) -> Option<Value> {
        self.node.entries.lock().get(key).cloned()
    }

    fn raw_contains(&self, key: &str) -> bool {
        self.node.entries.lock().contains_key(key)
    }

    fn raw_insert(&self, key: &str, value: Value) {
        self.node.entries.lock().insert(key.to_string(), value);
    }

    fn raw_remove(&self, key: &str) -> Option<Value> {
        self.node.entries.lock().shift_remove(key)
    }

    /// Stores a sidecar entry without validation; used when loading documents.
    pub(crate) fn set_sidecar(&self, key: &str, value: Value) {
        debug_assert!(is_reserved(key));
        self.locked(|| self.raw_insert(key, value));
    }

    fn slot(&self, key: &str) -> Option<Slot> {
        match self.node.entries.lock().get(key)? {
            Value::Tree(tree) => Some(Slot::Tree(tree.clone())),
            _ => Some(Slot::Leaf),
        }
    }

    fn local_comment(&self, key: &str) -> Option<String> {
        match self.raw_get(&comment_key(key))? {
            Value::Null => None,
            Value::String(s) => Some(s),
            other => Some(other.to_string()),
        }
    }

    // ---- views ----

    /// Visible keys of this level, in insertion order.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.locked(|| {
            self.node
                .entries
                .lock()
                .keys()
                .filter(|k| !is_reserved(k))
                .cloned()
                .collect()
        })
    }

    /// Visible entries of this level, in insertion order.
    #[must_use]
    pub fn items(&self) -> Vec<(String, Value)> {
        self.locked(|| {
            self.node
                .entries
                .lock()
                .iter()
                .filter(|(k, _)| !is_reserved(k))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect()
        })
    }

    /// Number of visible keys at this level.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys().len()
    }

    /// Returns true if this level has no visible keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Shallow snapshot of this level.
    ///
    /// Sidecar keys are dropped unless `keep_internal` is set. Nested trees
    /// are returned as shared handles.
    #[must_use]
    pub fn asdict(&self, keep_internal: bool) -> IndexMap<String, Value> {
        self.locked(|| {
            let mut dict = self.snapshot();
            if !keep_internal {
                dict.retain(|k, _| !is_reserved(k));
            }
            dict
        })
    }

    /// Recursive conversion into plain nested YAML mappings.
    ///
    /// Unlike [`asdict`](Self::asdict) this is structural: sidecar keys are
    /// kept at every level.
    #[must_use]
    pub fn todict(&self) -> serde_yaml::Mapping {
        self.locked(|| {
            self.snapshot()
                .iter()
                .map(|(k, v)| (serde_yaml::Value::String(k.clone()), v.to_yaml()))
                .collect()
        })
    }

    /// Comments attached to keys of this level, keyed by owner.
    ///
    /// Comments of nested trees are not included; ask the nested tree.
    #[must_use]
    pub fn comment_map(&self) -> IndexMap<String, String> {
        self.locked(|| {
            self.snapshot()
                .into_iter()
                .filter(|(k, _)| k.ends_with(COMMENT_SUFFIX))
                .filter_map(|(k, v)| {
                    let owner = sidecar_owner(&k)?.to_string();
                    match v {
                        Value::Null => None,
                        Value::String(s) => Some((owner, s)),
                        other => Some((owner, other.to_string())),
                    }
                })
                .collect()
        })
    }

    /// Independent deep copy with its own lock.
    ///
    /// Mutations of the copy never affect the original and vice versa.
    #[must_use]
    pub fn copy(&self) -> ConfigTree {
        let copied = self.copy_structure();
        copied.reset_lock();
        copied
    }

    pub(crate) fn copy_structure(&self) -> ConfigTree {
        self.locked(|| {
            let entries = self
                .snapshot()
                .into_iter()
                .map(|(k, v)| (k, v.deep_copy()))
                .collect::<Vec<_>>();
            let copied = ConfigTree::new();
            copied.node.entries.lock().extend(entries);
            copied
        })
    }
}

/// Binds every tree reachable from `value` (directly or inside sequences).
fn adopt_lock(value: &Value, lock: &TreeLock) {
    match value {
        Value::Tree(tree) => tree.set_lock(lock),
        Value::Sequence(items) => {
            for item in items {
                adopt_lock(item, lock);
            }
        }
        _ => {}
    }
}

fn value_reaches(value: &Value, target: &ConfigTree) -> bool {
    match value {
        Value::Tree(tree) => tree.reaches(target),
        Value::Sequence(items) => items.iter().any(|v| value_reaches(v, target)),
        _ => false,
    }
}

impl Default for ConfigTree {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ConfigTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.snapshot()).finish()
    }
}

impl PartialEq for ConfigTree {
    /// Structural equality over all entries, sidecars included, in any order.
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.snapshot() == other.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tree_is_empty() {
        let cfg = ConfigTree::new();
        assert!(cfg.is_empty());
        assert!(cfg.keys().is_empty());
        assert_eq!(cfg, ConfigTree::default());
    }

    #[test]
    fn test_from_pairs_canonicalizes_without_nesting() {
        let cfg = ConfigTree::from_pairs([("A.B", 1), ("Some Key", 2)]);
        assert_eq!(cfg.keys(), vec!["a.b", "some_key"]);
        assert!(!cfg.contains("a"));
    }

    #[test]
    fn test_reserved_keys_hidden_from_views() {
        let cfg = ConfigTree::new();
        cfg.register_with("k", 1, Registration::new().comment("c"))
            .unwrap();

        assert_eq!(cfg.keys(), vec!["k"]);
        assert_eq!(cfg.items(), vec![("k".to_string(), Value::Int(1))]);
        assert!(!cfg.asdict(false).contains_key("k._c"));
        assert!(cfg.asdict(true).contains_key("k._c"));
        assert!(cfg.todict().contains_key("k._c"));
    }

    #[test]
    fn test_comment_map_is_per_level() {
        let cfg = ConfigTree::new();
        cfg.register_with("a", 1, Registration::new().comment("top"))
            .unwrap();
        cfg.register_with("b.c", 2, Registration::new().comment("nested"))
            .unwrap();

        let comments = cfg.comment_map();
        assert_eq!(comments.get("a").map(String::as_str), Some("top"));
        assert!(!comments.contains_key("b"));
        assert!(!comments.contains_key("c"));
    }

    #[test]
    fn test_nested_trees_share_root_lock() {
        let cfg = ConfigTree::new();
        cfg.register("a.b.c", 1).unwrap();
        let a = cfg.get("a").unwrap();
        let b = cfg.get("a.b").unwrap();
        assert!(a.as_tree().unwrap().shares_lock_with(&cfg));
        assert!(b.as_tree().unwrap().shares_lock_with(&cfg));
    }

    #[test]
    fn test_copy_is_independent() {
        let cfg = ConfigTree::new();
        cfg.register("a.b", 1).unwrap();
        let copy = cfg.copy();

        assert_eq!(copy, cfg);
        assert!(!copy.shares_lock_with(&cfg));
        let nested = copy.get("a").unwrap();
        assert!(nested.as_tree().unwrap().shares_lock_with(&copy));

        copy.update("a.b", 2).unwrap();
        assert_eq!(cfg.get("a.b").unwrap(), Value::Int(1));
        assert_eq!(copy.get("a.b").unwrap(), Value::Int(2));
    }

    #[test]
    fn test_clone_shares_node() {
        let cfg = ConfigTree::new();
        let handle = cfg.clone();
        handle.register("x", 1).unwrap();
        assert!(cfg.contains("x"));
        assert!(cfg.ptr_eq(&handle));
    }

    #[test]
    fn test_equality_ignores_order() {
        let left = ConfigTree::new();
        left.register("a", 1).unwrap();
        left.register("b", 2).unwrap();
        let right = ConfigTree::new();
        right.register("b", 2).unwrap();
        right.register("a", 1).unwrap();
        assert_eq!(left, right);
    }

    #[test]
    fn test_debug_lists_entries() {
        let cfg = ConfigTree::new();
        cfg.register("a", 1).unwrap();
        let rendered = format!("{cfg:?}");
        assert!(rendered.contains("\"a\""));
    }
}
