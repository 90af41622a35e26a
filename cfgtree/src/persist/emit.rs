//! YAML emitter that keeps comments on the line of the key they describe.
//!
//! `serde_yaml` cannot write comments, so the document skeleton is written
//! here and only scalars are rendered by `serde_yaml`. Strings that
//! `serde_yaml` would spread over several lines are written as JSON string
//! literals instead, which YAML reads as double-quoted scalars; this keeps
//! every key on exactly one line for the comment scanner.

use crate::error::Result;
use crate::tree::ConfigTree;
use crate::value::Value;

const INDENT: usize = 2;

/// Render `tree` as a YAML document.
pub(crate) fn emit_document(tree: &ConfigTree) -> Result<String> {
    if tree.is_empty() {
        return Ok("{}\n".to_string());
    }
    let mut lines = Vec::new();
    emit_tree(tree, 0, &mut lines)?;
    lines.push(String::new());
    Ok(lines.join("\n"))
}

fn emit_tree(tree: &ConfigTree, indent: usize, lines: &mut Vec<String>) -> Result<()> {
    let comments = tree.comment_map();
    let pad = " ".repeat(indent);

    for (key, value) in tree.items() {
        let key_text = render_string(&key)?;
        let comment = comments
            .get(&key)
            .map(|c| format!("  # {}", c.replace(['\n', '\r'], " ")))
            .unwrap_or_default();

        match &value {
            Value::Tree(child) if !child.is_empty() => {
                lines.push(format!("{pad}{key_text}:{comment}"));
                emit_tree(child, indent + INDENT, lines)?;
            }
            Value::Sequence(items) if !items.is_empty() => {
                lines.push(format!("{pad}{key_text}:{comment}"));
                emit_sequence(items, indent + INDENT, lines)?;
            }
            other => {
                let scalar = render_inline(other)?;
                lines.push(format!("{pad}{key_text}: {scalar}{comment}"));
            }
        }
    }
    Ok(())
}

fn emit_sequence(items: &[Value], indent: usize, lines: &mut Vec<String>) -> Result<()> {
    let pad = " ".repeat(indent);

    for item in items {
        match item {
            Value::Tree(child) if !child.is_empty() => {
                lines.push(format!("{pad}-"));
                emit_tree(child, indent + INDENT, lines)?;
            }
            Value::Sequence(inner) if !inner.is_empty() => {
                lines.push(format!("{pad}-"));
                emit_sequence(inner, indent + INDENT, lines)?;
            }
            other => {
                let scalar = render_inline(other)?;
                lines.push(format!("{pad}- {scalar}"));
            }
        }
    }
    Ok(())
}

/// Single-line rendering of scalars and empty collections.
fn render_inline(value: &Value) -> Result<String> {
    Ok(match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => render_yaml(&serde_yaml::Value::Number((*f).into()))?,
        Value::String(s) => render_string(s)?,
        Value::Sequence(_) => "[]".to_string(),
        Value::Tree(_) => "{}".to_string(),
    })
}

fn render_string(s: &str) -> Result<String> {
    let rendered = render_yaml(&serde_yaml::Value::String(s.to_string()))?;
    if rendered.contains('\n') {
        Ok(serde_json::to_string(s).unwrap_or_else(|_| format!("{s:?}")))
    } else {
        Ok(rendered)
    }
}

fn render_yaml(value: &serde_yaml::Value) -> Result<String> {
    let text = serde_yaml::to_string(value)?;
    Ok(text
        .strip_prefix("--- ")
        .unwrap_or(&text)
        .trim_end_matches('\n')
        .to_string())
}
