#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # cfgtree
//!
//! A hierarchical, dotted-key configuration tree shared across the threads
//! of a process.
//!
//! Settings live at paths such as `roaches.r114.ip`. A lookup that misses
//! in a nested namespace falls back one level to the enclosing namespace,
//! so common settings are written once and specialized where needed.
//! Every key can carry a comment, which is kept at the end of the key's
//! line when the tree is saved as YAML.
//!
//! ## Core Types
//!
//! - [`ConfigTree`]: the tree, a cheap shareable handle
//! - [`Value`]: scalars, sequences and nested trees
//! - [`LookupOptions`], [`Entry`] and [`Registration`]: options and results
//!   of lookups and registrations
//! - [`Error`] and [`Result`]: error handling types
//! - [`Logger`] and [`LogLevel`]: a stderr backend for the `log` facade
//!
//! ## Examples
//!
//! ```
//! use cfgtree::{ConfigTree, LookupOptions, Value};
//!
//! let cfg = ConfigTree::new();
//! cfg.register("a.b", 1).unwrap();
//! cfg.register("a.c.d", 2).unwrap();
//!
//! // a.c has no `b` and inherits it from `a`
//! assert_eq!(cfg.get("a.c.b").unwrap(), Value::Int(1));
//! assert!(cfg.get_with("a.c.b", &LookupOptions::strict()).is_err());
//!
//! let text = cfg.dump().unwrap();
//! let loaded = ConfigTree::from_yaml_str(&text).unwrap();
//! assert_eq!(loaded, cfg);
//! ```

pub mod error;
pub mod key;
pub mod legacy;
pub mod logging;
pub mod persist;
pub mod tags;
pub mod tree;
pub mod value;

#[cfg(all(test, feature = "property-tests"))]
mod proptests;

// Re-export key types at crate root for convenience
pub use error::{Error, Result};
pub use key::{canonicalize_key, validate_key};
pub use legacy::{
    consolidate_sections, import_legacy_file, ingest_legacy_files, ingest_legacy_files_into,
};
pub use logging::{init_logger, LogLevel, Logger};
pub use persist::{default_config_path, load};
pub use tags::tag_string;
pub use tree::{ConfigTree, Entry, LookupOptions, Registration};
pub use value::{canonicalize_value, Value};
