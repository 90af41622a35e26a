//! Recovery of end-of-line comments from YAML text.
//!
//! `serde_yaml` discards comments, so after the structure is loaded this
//! scanner walks the text line by line, tracking the mapping keys and
//! sequence indices that lead to each line by indentation. A comment that
//! ends a `key: value` line is reported against the path of that key.
//!
//! The scanner understands block mappings and block sequences (including
//! the compact `- key: value` form). Lines inside literal or folded block
//! scalars are skipped. Comments on their own line are ignored.

use crate::key::comment_key;
use crate::tree::ConfigTree;
use crate::value::Value;

/// One step from a node to its child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment {
    Key(String),
    Index(usize),
}

/// A comment found at the end of a key's line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct KeyComment {
    pub path: Vec<Segment>,
    pub text: String,
}

#[derive(Default)]
struct Scanner {
    /// Open segments with the column they started at.
    stack: Vec<(usize, Segment)>,
    /// Column of the key owning an open block scalar.
    block_scalar: Option<usize>,
    found: Vec<KeyComment>,
}

/// Find every end-of-line key comment in `text`.
pub(crate) fn scan(text: &str) -> Vec<KeyComment> {
    let mut scanner = Scanner::default();

    for line in text.lines() {
        let content = line.trim_start();
        let column = line.len() - content.len();

        if let Some(owner) = scanner.block_scalar {
            if content.is_empty() || column > owner {
                continue;
            }
            scanner.block_scalar = None;
        }

        if content.is_empty()
            || content.starts_with('#')
            || content.starts_with("---")
            || content.starts_with("...")
        {
            continue;
        }

        scanner.line(content, column);
    }

    scanner.found
}

impl Scanner {
    fn line(&mut self, content: &str, column: usize) {
        if content == "-" || content.starts_with("- ") {
            self.sequence_item(content, column);
        } else {
            self.mapping_entry(content, column);
        }
    }

    fn sequence_item(&mut self, content: &str, column: usize) {
        let mut index = 0;
        while let Some((open, segment)) = self.stack.last() {
            if *open > column {
                self.stack.pop();
                continue;
            }
            if *open == column {
                if let Segment::Index(previous) = segment {
                    index = previous + 1;
                    self.stack.pop();
                }
            }
            break;
        }
        self.stack.push((column, Segment::Index(index)));

        let rest = content[1..].trim_start();
        if !rest.is_empty() {
            let rest_column = column + (content.len() - rest.len());
            self.line(rest, rest_column);
        }
    }

    fn mapping_entry(&mut self, content: &str, column: usize) {
        let Some((key, value)) = parse_key(content) else {
            return;
        };

        while self.stack.last().is_some_and(|(open, _)| *open >= column) {
            self.stack.pop();
        }
        self.stack.push((column, Segment::Key(key)));

        let value = value.trim_start();
        let comment = if let Some(text) = value.strip_prefix('#') {
            Some(text)
        } else {
            find_comment(value)
        };

        if value.starts_with('|') || value.starts_with('>') {
            self.block_scalar = Some(column);
        }

        if let Some(text) = comment {
            let text = text.strip_prefix(' ').unwrap_or(text).trim_end();
            self.found.push(KeyComment {
                path: self.stack.iter().map(|(_, s)| s.clone()).collect(),
                text: text.to_string(),
            });
        }
    }
}

/// Split `key: rest` into the unquoted key and the text after the colon.
fn parse_key(content: &str) -> Option<(String, &str)> {
    let first = content.chars().next()?;

    if first == '"' || first == '\'' {
        let end = closing_quote(content, first)?;
        let token = &content[..=end];
        let key: String = serde_yaml::from_str(token).ok()?;
        let rest = content[end + 1..].trim_start();
        return rest.strip_prefix(':').map(|after| (key, after));
    }

    if matches!(first, '[' | '{' | '#' | '|' | '>' | '&' | '*' | '!' | '?') {
        return None;
    }

    let bytes = content.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if b == b'#' && i > 0 && bytes[i - 1].is_ascii_whitespace() {
            return None;
        }
        if b == b':' && bytes.get(i + 1).map_or(true, u8::is_ascii_whitespace) {
            let key = content[..i].trim_end();
            if key.is_empty() {
                return None;
            }
            return Some((key.to_string(), &content[i + 1..]));
        }
    }
    None
}

/// Byte index of the quote closing the scalar that starts at index 0.
fn closing_quote(content: &str, quote: char) -> Option<usize> {
    let bytes = content.as_bytes();
    let mut i = 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if quote == '"' => i += 2,
            b'\'' if quote == '\'' => {
                if bytes.get(i + 1) == Some(&b'\'') {
                    i += 2;
                } else {
                    return Some(i);
                }
            }
            b'"' if quote == '"' => return Some(i),
            _ => i += 1,
        }
    }
    None
}

/// The text after a ` #` that is not inside a quoted scalar.
///
/// A quote opens a quoted scalar only where a scalar can start: at the
/// beginning of the value, or after `[`, `{`, `,` or `:` when the value is
/// a flow collection. Anywhere else it is part of a plain scalar, as is a quote
/// that is never closed.
fn find_comment(value: &str) -> Option<&str> {
    let bytes = value.as_bytes();
    let flow = matches!(bytes.first(), Some(b'[' | b'{'));
    let mut i = 0;
    let mut scalar_start = true;

    while i < bytes.len() {
        let b = bytes[i];
        if scalar_start && (b == b'"' || b == b'\'') {
            if let Some(end) = closing_quote(&value[i..], char::from(b)) {
                i += end + 1;
                scalar_start = false;
                continue;
            }
        }
        if b == b'#' && i > 0 && bytes[i - 1].is_ascii_whitespace() {
            return Some(&value[i + 1..]);
        }
        scalar_start = if b.is_ascii_whitespace() {
            scalar_start
        } else {
            flow && matches!(b, b'[' | b'{' | b',' | b':')
        };
        i += 1;
    }
    None
}

/// Store each recovered comment as the sidecar of the key it followed.
///
/// Paths that no longer match the loaded structure are skipped.
pub(crate) fn attach(root: &ConfigTree, comments: Vec<KeyComment>) {
    for KeyComment { path, text } in comments {
        let Some((Segment::Key(leaf), parents)) = path.split_last() else {
            continue;
        };

        let mut current = Value::Tree(root.clone());
        let mut reachable = true;
        for segment in parents {
            let next = match (segment, &current) {
                (Segment::Key(key), Value::Tree(tree)) => tree.asdict(true).get(key).cloned(),
                (Segment::Index(index), Value::Sequence(items)) => items.get(*index).cloned(),
                _ => None,
            };
            match next {
                Some(value) => current = value,
                None => {
                    reachable = false;
                    break;
                }
            }
        }

        if let (true, Value::Tree(owner)) = (reachable, &current) {
            if owner.asdict(true).contains_key(leaf) && !text.is_empty() {
                owner.set_sidecar(&comment_key(leaf), Value::String(text));
            }
        }
    }
}
