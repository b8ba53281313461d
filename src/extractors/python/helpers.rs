/// Helper utilities for Python declaration extraction
/// Docstring lookup, decorator rendering and string delimiter handling
use tree_sitter::Node;

use super::super::base::{BaseExtractor, CanonicalText};
use super::expressions;

/// Extract the docstring of a function or class body.
///
/// Python docstrings are the first string expression of the body, wrapped
/// in an expression_statement node.
pub(crate) fn extract_docstring(base: &BaseExtractor, node: &Node) -> Option<String> {
    let body = node.child_by_field_name("body")?;

    let mut cursor = body.walk();
    for child in body.named_children(&mut cursor) {
        if child.kind() == "comment" {
            continue;
        }
        if child.kind() == "expression_statement" {
            let mut expr_cursor = child.walk();
            for expr_child in child.named_children(&mut expr_cursor) {
                if expr_child.kind() == "string" {
                    let docstring = strip_string_delimiters(&base.node_text(&expr_child));
                    return Some(docstring.trim().to_string());
                }
            }
        }
        // Anything else before a string means there is no docstring
        return None;
    }

    None
}

/// Render the decorators of a definition.
///
/// `outer` is the decorated_definition wrapper when one exists; a bare
/// definition has no decorators.
pub(crate) fn extract_decorators(base: &BaseExtractor, outer: &Node) -> Vec<CanonicalText> {
    let mut decorators = Vec::new();
    if outer.kind() != "decorated_definition" {
        return decorators;
    }

    let mut cursor = outer.walk();
    for child in outer.children(&mut cursor) {
        if child.kind() == "decorator" {
            if let Some(expr) = child.named_child(0) {
                decorators.push(expressions::canonicalize(base, expr));
            }
        }
    }

    decorators
}

/// Helper to strip string delimiters (quotes) from Python strings
/// Handles triple quotes (""" or '''), double quotes ("), and single quotes (')
pub(crate) fn strip_string_delimiters(s: &str) -> String {
    let delimiters = [("\"\"\"", 3), ("'''", 3), ("\"", 1), ("'", 1)];

    for (delimiter, strip_count) in &delimiters {
        if s.starts_with(delimiter) && s.ends_with(delimiter) && s.len() >= strip_count * 2 {
            return s[*strip_count..s.len() - strip_count].to_string();
        }
    }

    s.to_string()
}
