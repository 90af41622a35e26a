//! Error types for the cfgtree library.
//!
//! This module provides the error hierarchy for all operations on a
//! configuration tree, using `thiserror` for ergonomic error handling.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for operations that may fail with a cfgtree error.
///
/// # Examples
///
/// ```
/// use cfgtree::{Error, Result};
///
/// fn example_operation() -> Result<i64> {
///     Ok(42)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the cfgtree library.
#[derive(Debug, Error)]
pub enum Error {
    /// A key path could not be resolved directly, through a child node, or
    /// through inheritance, and no default was supplied.
    #[error("setting '{key}' not found")]
    KeyNotFound {
        /// The key path that could not be resolved.
        key: String,
    },

    /// A key path is not in canonical form.
    #[error("invalid key '{key}': {reason}")]
    InvalidKey {
        /// The offending key path.
        key: String,
        /// Why the key was rejected.
        reason: String,
    },

    /// A value is not in the allowed set of its key.
    #[error("{value} is not an allowed value for '{key}'")]
    DisallowedValue {
        /// The key being updated.
        key: String,
        /// The rejected value, rendered for display.
        value: String,
    },

    /// A registration would descend through a leaf or clobber an aggregate key.
    #[error("structural conflict at '{key}': {details}")]
    StructuralConflict {
        /// The key at which the conflict was detected.
        key: String,
        /// Details about the conflict.
        details: String,
    },

    /// A YAML document could not be parsed or emitted.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A document parsed but does not describe a configuration tree.
    #[error("invalid document: {0}")]
    InvalidDocument(String),

    /// A file could not be read or written.
    #[error("invalid path {}: {reason}", path.display())]
    InvalidPath {
        /// The path involved.
        path: PathBuf,
        /// The reason the operation failed.
        reason: String,
    },

    /// A legacy `key=value` file contained a malformed line.
    #[error("{}:{line}: {reason}", path.display())]
    LegacyParse {
        /// The file being parsed.
        path: PathBuf,
        /// One-based line number.
        line: usize,
        /// What was wrong with the line.
        reason: String,
    },

    /// A legacy file was loaded without a namespace to place it under.
    #[error("namespace required when loading legacy config {}", path.display())]
    MissingNamespace {
        /// The legacy file.
        path: PathBuf,
    },
}

impl Error {
    pub(crate) fn not_found(key: impl Into<String>) -> Self {
        Self::KeyNotFound { key: key.into() }
    }

    pub(crate) fn conflict(key: impl Into<String>, details: impl Into<String>) -> Self {
        Self::StructuralConflict {
            key: key.into(),
            details: details.into(),
        }
    }

    /// Check if error indicates an unresolvable key.
    ///
    /// # Examples
    ///
    /// ```
    /// use cfgtree::Error;
    ///
    /// let err = Error::KeyNotFound { key: "a.b".to_string() };
    /// assert!(err.is_not_found());
    /// ```
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::KeyNotFound { .. })
    }

    /// Check if error is a key validation failure.
    ///
    /// # Examples
    ///
    /// ```
    /// use cfgtree::Error;
    ///
    /// let err = Error::InvalidKey { key: "a._c".to_string(), reason: "reserved".to_string() };
    /// assert!(err.is_invalid_key());
    /// ```
    #[must_use]
    pub fn is_invalid_key(&self) -> bool {
        matches!(self, Self::InvalidKey { .. })
    }
}
