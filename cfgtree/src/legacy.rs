//! Import of legacy `key=value` configuration files.
//!
//! Legacy files are INI-like: an optional run of `key = value` lines
//! followed by `[Section]` blocks. Entries before the first header (or in a
//! `[DEFAULT]` block) become `namespace.key`; entries of a section become
//! `namespace.section.key`. Values are coerced with
//! [`canonicalize_value`](crate::value::canonicalize_value) on registration.
//!
//! Instrument files describe readout boards as `[Roach_<n>]` sections and
//! frequency sweeps as `[sweep<n>]` sections;
//! [`consolidate_sections`] folds those into a `roaches` tree and a `sweeps`
//! sequence.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::key::canonicalize_key;
use crate::tree::{ConfigTree, Registration};
use crate::value::Value;

/// Name of the section whose entries are treated as defaults.
const DEFAULT_SECTION: &str = "default";

/// The entries of a parsed legacy file, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegacySections {
    /// Entries outside any section or in the `[DEFAULT]` section.
    pub defaults: Vec<(String, String)>,
    /// Named sections with their entries. Repeated headers are merged.
    pub sections: Vec<(String, Vec<(String, String)>)>,
}

impl LegacySections {
    /// Flattens the sections into `(key, raw value)` pairs.
    ///
    /// Defaults map to `key` and section entries to `section.key`, with the
    /// section name canonicalized. Defaults are not repeated inside each
    /// section; inheritance resolves `section.key` to `key` on lookup.
    ///
    /// # Examples
    ///
    /// ```
    /// use cfgtree::legacy::parse_legacy;
    ///
    /// let sections = parse_legacy("ip = 10.0.0.1\n[Roach 114]\nport = 50000\n", "x.cfg").unwrap();
    /// assert_eq!(
    ///     sections.to_pairs(),
    ///     vec![
    ///         ("ip".to_string(), "10.0.0.1".to_string()),
    ///         ("roach_114.port".to_string(), "50000".to_string()),
    ///     ]
    /// );
    /// ```
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = self.defaults.clone();
        for (section, entries) in &self.sections {
            let section = canonicalize_key(section);
            pairs.extend(
                entries
                    .iter()
                    .map(|(k, v)| (format!("{section}.{k}"), v.clone())),
            );
        }
        pairs
    }

    fn section_mut(&mut self, name: &str) -> &mut Vec<(String, String)> {
        let index = match self.sections.iter().position(|(s, _)| s == name) {
            Some(index) => index,
            None => {
                self.sections.push((name.to_string(), Vec::new()));
                self.sections.len() - 1
            }
        };
        &mut self.sections[index].1
    }
}

/// Parse the text of a legacy file.
///
/// `origin` names the file in error messages.
///
/// # Errors
///
/// Returns [`Error::LegacyParse`] for an unterminated section header, a line
/// without a `=` or `:` separator, or an entry with an empty key.
pub fn parse_legacy(text: &str, origin: impl AsRef<Path>) -> Result<LegacySections> {
    let origin = origin.as_ref();
    let fail = |line: usize, reason: &str| Error::LegacyParse {
        path: origin.to_path_buf(),
        line,
        reason: reason.to_string(),
    };

    let mut parsed = LegacySections::default();
    let mut current: Option<String> = None;

    for (number, raw) in text.lines().enumerate() {
        let number = number + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(header) = line.strip_prefix('[') {
            let name = header
                .strip_suffix(']')
                .ok_or_else(|| fail(number, "unterminated section header"))?
                .trim();
            current = if name.eq_ignore_ascii_case(DEFAULT_SECTION) {
                None
            } else {
                Some(name.to_string())
            };
            continue;
        }

        let split = line
            .find(['=', ':'])
            .ok_or_else(|| fail(number, "expected key = value"))?;
        let key = line[..split].trim();
        let value = line[split + 1..].trim();
        if key.is_empty() {
            return Err(fail(number, "empty key"));
        }

        let entry = (key.to_lowercase(), value.to_string());
        match &current {
            Some(section) => parsed.section_mut(section).push(entry),
            None => parsed.defaults.push(entry),
        }
    }

    Ok(parsed)
}

/// Register the contents of a legacy file under `namespace`.
///
/// Existing keys are overwritten.
///
/// # Errors
///
/// Returns [`Error::InvalidPath`] if the file cannot be read, parse errors,
/// and registration errors.
pub fn import_legacy_file(tree: &ConfigTree, path: impl AsRef<Path>, namespace: &str) -> Result<()> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| Error::InvalidPath {
        path: path.to_path_buf(),
        reason: format!("Failed to read legacy config: {e}"),
    })?;
    let sections = parse_legacy(&text, path)?;
    log::debug!(
        "importing {} into namespace '{namespace}'",
        path.display()
    );
    tree.register_from_pairs(sections.to_pairs(), namespace)?;
    Ok(())
}

/// Namespace a legacy file is ingested under: its canonicalized file stem.
fn namespace_for(path: &Path) -> Result<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(canonicalize_key)
        .filter(|ns| !ns.is_empty())
        .ok_or_else(|| Error::MissingNamespace {
            path: path.to_path_buf(),
        })
}

/// Build one tree from several legacy files.
///
/// Each file is placed under its file stem (`beammap.sweep.cfg` becomes the
/// `beammap.sweep` namespace) and each namespace is then consolidated with
/// [`consolidate_sections`]. Later files win on collision.
///
/// # Errors
///
/// Returns the first import or consolidation error.
pub fn ingest_legacy_files<P: AsRef<Path>>(paths: &[P]) -> Result<ConfigTree> {
    let tree = ConfigTree::new();
    ingest_legacy_files_into(&tree, paths)?;
    Ok(tree)
}

/// Like [`ingest_legacy_files`], but merges into an existing tree.
///
/// Settings outside the ingested namespaces are left alone.
///
/// # Errors
///
/// Returns the first import or consolidation error. Consolidation fails
/// with [`Error::StructuralConflict`] if a namespace already holds the
/// `roaches` or `sweeps` aggregate and the files add more boards or sweeps.
pub fn ingest_legacy_files_into<P: AsRef<Path>>(tree: &ConfigTree, paths: &[P]) -> Result<()> {
    let mut namespaces: Vec<String> = Vec::new();

    for path in paths {
        let path = path.as_ref();
        let namespace = namespace_for(path)?;
        log::debug!("assuming namespace '{namespace}' for {}", path.display());
        import_legacy_file(tree, path, &namespace)?;
        if !namespaces.contains(&namespace) {
            namespaces.push(namespace);
        }
    }

    for namespace in &namespaces {
        if let Ok(Value::Tree(section)) = tree.lookup(namespace) {
            consolidate_sections(&section)?;
        }
    }
    Ok(())
}

/// Numeric suffix of `key` after `prefix`, if it is all digits.
fn numbered<'a>(key: &'a str, prefix: &str) -> Option<(&'a str, i64)> {
    let digits = key.strip_prefix(prefix)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok().map(|n| (digits, n))
}

/// Fold `roach_<n>` and `sweep<n>` sections of `tree` into aggregates.
///
/// Each `roach_<n>` tree moves to `roaches.r<n>` and gains `roachnum = n`;
/// each `sweep<n>` tree is appended to the `sweeps` sequence, ordered by
/// `n`, and gains `num = n`. Keys that match the pattern but hold leaves are
/// left alone. Returns the number of sections moved.
///
/// # Errors
///
/// Returns [`Error::StructuralConflict`] without changing anything when an
/// aggregate key that would be written already exists.
pub fn consolidate_sections(tree: &ConfigTree) -> Result<usize> {
    tree.locked(|| {
        let mut roaches = Vec::new();
        let mut sweeps = Vec::new();
        for (key, value) in tree.items() {
            let Value::Tree(section) = value else {
                continue;
            };
            if let Some((digits, n)) = numbered(&key, "roach_") {
                roaches.push((key.clone(), format!("r{digits}"), n, section));
            } else if let Some((_, n)) = numbered(&key, "sweep") {
                sweeps.push((key.clone(), n, section));
            }
        }

        if !roaches.is_empty() && tree.contains("roaches") {
            return Err(Error::conflict("roaches", "aggregate key already registered"));
        }
        if !sweeps.is_empty() && tree.contains("sweeps") {
            return Err(Error::conflict("sweeps", "aggregate key already registered"));
        }

        let moved = roaches.len() + sweeps.len();

        if !roaches.is_empty() {
            let aggregate = ConfigTree::new();
            for (key, name, n, section) in roaches {
                tree.unregister(&key)?;
                section.register_with("roachnum", n, Registration::new().update(true))?;
                aggregate.register(&name, section)?;
            }
            tree.register("roaches", aggregate)?;
        }

        if !sweeps.is_empty() {
            sweeps.sort_by_key(|(_, n, _)| *n);
            let mut items = Vec::with_capacity(sweeps.len());
            for (key, n, section) in sweeps {
                log::debug!("matched sweep section '{key}'");
                tree.unregister(&key)?;
                section.register_with("num", n, Registration::new().update(true))?;
                items.push(Value::Tree(section));
            }
            tree.register("sweeps", Value::Sequence(items))?;
        }

        Ok(moved)
    })
}

/// Paths of the files [`ingest_legacy_files`] would read from `dir`, sorted.
///
/// Only files with a `.cfg` extension are returned.
///
/// # Errors
///
/// Returns [`Error::InvalidPath`] if the directory cannot be listed.
pub fn legacy_files_in(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let read_err = |e: std::io::Error| Error::InvalidPath {
        path: dir.to_path_buf(),
        reason: format!("Failed to list directory: {e}"),
    };
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_err)? {
        let path = entry.map_err(read_err)?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "cfg") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
