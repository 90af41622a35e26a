//! Key-path algebra.
//!
//! A key path is a string of dot-separated segments such as `roaches.r114.ip`.
//! Every user key may carry two hidden sidecar entries stored alongside it in
//! the same node: `<key>._c` holds a comment and `<key>._a` holds an
//! allowed-value specification.
//!
//! Canonicalization (lowercase, whitespace to underscores) is applied once,
//! when a key is registered. Lookups use the path exactly as given.
//!
//! # Examples
//!
//! ```
//! use cfgtree::key::{canonicalize_key, validate_key};
//!
//! assert_eq!(canonicalize_key(" Beam Map.Sweep Dir "), "beam_map.sweep_dir");
//! assert!(validate_key("a.b.c").is_ok());
//! assert!(validate_key("a.b._c").is_err());
//! ```

use crate::error::{Error, Result};

/// Suffix of the comment sidecar key.
pub const COMMENT_SUFFIX: &str = "._c";

/// Suffix of the allowed-value sidecar key.
pub const ALLOWED_SUFFIX: &str = "._a";

/// All reserved suffixes.
pub const RESERVED: [&str; 2] = [COMMENT_SUFFIX, ALLOWED_SUFFIX];

/// Returns true if `key` names a sidecar entry.
#[must_use]
pub fn is_reserved(key: &str) -> bool {
    RESERVED.iter().any(|suffix| key.ends_with(suffix))
}

/// Check that `key` may be used as a registration target.
///
/// # Errors
///
/// Returns [`Error::InvalidKey`] if the path is empty, starts or ends with
/// `.`, contains an empty segment, or ends with a reserved suffix.
pub fn validate_key(key: &str) -> Result<()> {
    let reason = if key.is_empty() {
        "keys may not be empty"
    } else if key.starts_with('.') {
        "keys may not start with '.'"
    } else if key.ends_with('.') {
        "keys may not end with '.'"
    } else if is_reserved(key) {
        "keys may not end with '._c' or '._a'"
    } else if key.split('.').any(str::is_empty) {
        "keys may not contain empty segments"
    } else {
        return Ok(());
    };

    Err(Error::InvalidKey {
        key: key.to_string(),
        reason: reason.to_string(),
    })
}

/// Returns true if [`validate_key`] would accept `key`.
#[must_use]
pub fn is_valid_key(key: &str) -> bool {
    validate_key(key).is_ok()
}

/// Normalize a raw key path.
///
/// Each segment is trimmed, lowercased, and has every remaining whitespace
/// character replaced by `_`.
#[must_use]
pub fn canonicalize_key(key: &str) -> String {
    key.split('.')
        .map(|segment| {
            segment
                .trim()
                .chars()
                .map(|c| if c.is_whitespace() { '_' } else { c })
                .collect::<String>()
                .to_lowercase()
        })
        .collect::<Vec<_>>()
        .join(".")
}

/// Split a path at its first `.` into `(head, rest)`.
///
/// `rest` is empty for single-segment paths.
#[must_use]
pub fn split_first(path: &str) -> (&str, &str) {
    path.split_once('.').unwrap_or((path, ""))
}

/// Split a path at its last `.` into `(parent, leaf)`.
///
/// `parent` is empty for single-segment paths.
#[must_use]
pub fn split_last(path: &str) -> (&str, &str) {
    path.rsplit_once('.').unwrap_or(("", path))
}

/// Name of the comment sidecar for `key`.
#[must_use]
pub fn comment_key(key: &str) -> String {
    format!("{key}{COMMENT_SUFFIX}")
}

/// Name of the allowed-value sidecar for `key`.
#[must_use]
pub fn allowed_key(key: &str) -> String {
    format!("{key}{ALLOWED_SUFFIX}")
}

/// Name of the user key owning a sidecar, if `key` is one.
#[must_use]
pub fn sidecar_owner(key: &str) -> Option<&str> {
    RESERVED.iter().find_map(|suffix| key.strip_suffix(suffix))
}
