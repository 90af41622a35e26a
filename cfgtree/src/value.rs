//! Setting values and the text-to-value coercion pipeline.
//!
//! A [`Value`] is a scalar, a sequence, or a nested [`ConfigTree`]. Trees are
//! held by handle: cloning a `Value::Tree` shares the node, and only
//! [`ConfigTree::copy`] produces an independent tree.

use std::fmt;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::tree::ConfigTree;

/// A configuration value.
///
/// # Examples
///
/// ```
/// use cfgtree::Value;
///
/// let port: Value = 8080.into();
/// assert_eq!(port.as_i64(), Some(8080));
///
/// let name = Value::from("mec");
/// assert_eq!(name.as_str(), Some("mec"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Explicitly unset.
    Null,
    /// A boolean flag.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// A floating point number.
    Float(f64),
    /// A string.
    String(String),
    /// An ordered list of values.
    Sequence(Vec<Value>),
    /// A nested configuration namespace.
    Tree(ConfigTree),
}

impl Value {
    /// Short name of the value's kind, for messages.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Sequence(_) => "sequence",
            Self::Tree(_) => "tree",
        }
    }

    /// Returns true for [`Value::Null`].
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns true for [`Value::Tree`].
    #[must_use]
    pub fn is_tree(&self) -> bool {
        matches!(self, Self::Tree(_))
    }

    /// The string contents, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// The integer, if this is an integer.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// The number as a float, if this is numeric.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// The flag, if this is a boolean.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The items, if this is a sequence.
    #[must_use]
    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// The node handle, if this is a tree.
    #[must_use]
    pub fn as_tree(&self) -> Option<&ConfigTree> {
        match self {
            Self::Tree(tree) => Some(tree),
            _ => None,
        }
    }

    /// Structural deep copy: nested trees are duplicated rather than shared.
    ///
    /// Copied trees each get their own lock; [`ConfigTree::copy`] rebinds the
    /// whole result to one lock afterwards.
    #[must_use]
    pub(crate) fn deep_copy(&self) -> Self {
        match self {
            Self::Sequence(items) => Self::Sequence(items.iter().map(Self::deep_copy).collect()),
            Self::Tree(tree) => Self::Tree(tree.copy_structure()),
            other => other.clone(),
        }
    }

    /// Structural conversion to a YAML value.
    ///
    /// Trees become mappings of *all* their entries, sidecar keys included.
    #[must_use]
    pub fn to_yaml(&self) -> serde_yaml::Value {
        match self {
            Self::Null => serde_yaml::Value::Null,
            Self::Bool(b) => serde_yaml::Value::Bool(*b),
            Self::Int(i) => serde_yaml::Value::Number((*i).into()),
            Self::Float(f) => serde_yaml::Value::Number((*f).into()),
            Self::String(s) => serde_yaml::Value::String(s.clone()),
            Self::Sequence(items) => {
                serde_yaml::Value::Sequence(items.iter().map(Self::to_yaml).collect())
            }
            Self::Tree(tree) => serde_yaml::Value::Mapping(tree.todict()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::String(s) => write!(f, "{s}"),
            Self::Sequence(_) | Self::Tree(_) => {
                let rendered = serde_json::to_string(self).map_err(|_| fmt::Error)?;
                write!(f, "{rendered}")
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Int(i) => serializer.serialize_i64(*i),
            Self::Float(f) => serializer.serialize_f64(*f),
            Self::String(s) => serializer.serialize_str(s),
            Self::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Tree(tree) => tree.serialize(serializer),
        }
    }
}

impl Serialize for ConfigTree {
    /// Serializes the public view: sidecar keys are hidden.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let items = self.items();
        let mut map = serializer.serialize_map(Some(items.len()))?;
        for (key, value) in &items {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl From<serde_yaml::Value> for Value {
    fn from(value: serde_yaml::Value) -> Self {
        match value {
            serde_yaml::Value::Null => Self::Null,
            serde_yaml::Value::Bool(b) => Self::Bool(b),
            serde_yaml::Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_yaml::Value::String(s) => Self::String(s),
            serde_yaml::Value::Sequence(items) => {
                Self::Sequence(items.into_iter().map(Self::from).collect())
            }
            serde_yaml::Value::Mapping(mapping) => {
                let entries = mapping
                    .into_iter()
                    .map(|(k, v)| (yaml_key_to_string(k), Self::from(v)));
                Self::Tree(ConfigTree::from_entries(entries))
            }
            // Older writers tag every namespace; the tag carries no information
            serde_yaml::Value::Tagged(tagged) => Self::from(tagged.value),
        }
    }
}

fn yaml_key_to_string(key: serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s,
        serde_yaml::Value::Null => "null".to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Number(n) => n.to_string(),
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<ConfigTree> for Value {
    fn from(tree: ConfigTree) -> Self {
        Self::Tree(tree)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::Null, Into::into)
    }
}

/// Strip one pair of matching surrounding quotes.
///
/// # Examples
///
/// ```
/// use cfgtree::value::dequote;
///
/// assert_eq!(dequote("'foo'"), "foo");
/// assert_eq!(dequote("\"foo\""), "foo");
/// assert_eq!(dequote("'foo\""), "'foo\"");
/// ```
#[must_use]
pub fn dequote(raw: &str) -> &str {
    let bytes = raw.as_bytes();
    if bytes.len() >= 2 && (bytes[0] == b'\'' || bytes[0] == b'"') && bytes[0] == bytes[bytes.len() - 1]
    {
        &raw[1..raw.len() - 1]
    } else {
        raw
    }
}

/// Coerce raw text into a typed value.
///
/// The pipeline is ordered and each stage is final:
///
/// 1. text wrapped in matching quotes is unquoted and kept as a string
/// 2. text that parses as an integer becomes [`Value::Int`]
/// 3. text containing a digit that parses as a float becomes [`Value::Float`]
/// 4. anything else stays a string
///
/// # Examples
///
/// ```
/// use cfgtree::value::{canonicalize_value, Value};
///
/// assert_eq!(canonicalize_value("42"), Value::Int(42));
/// assert_eq!(canonicalize_value("4.5"), Value::Float(4.5));
/// assert_eq!(canonicalize_value("'42'"), Value::String("42".into()));
/// assert_eq!(canonicalize_value("nan"), Value::String("nan".into()));
/// ```
#[must_use]
pub fn canonicalize_value(raw: &str) -> Value {
    let trimmed = raw.trim();
    let unquoted = dequote(trimmed);
    if unquoted.len() != trimmed.len() {
        return Value::String(unquoted.to_string());
    }
    if let Ok(i) = trimmed.parse::<i64>() {
        return Value::Int(i);
    }
    if trimmed.bytes().any(|b| b.is_ascii_digit()) {
        if let Ok(f) = trimmed.parse::<f64>() {
            return Value::Float(f);
        }
    }
    Value::String(trimmed.to_string())
}
