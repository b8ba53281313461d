//! Language Support - Shared tree-sitter parser configuration
//!
//! Scribe extracts from Python sources only; this module is the single
//! source of truth for grammar and parser setup so no caller wires up
//! tree-sitter on its own.

use anyhow::{anyhow, Result};
use tree_sitter::{Parser, Tree};

/// Get the tree-sitter language for Python
pub fn python() -> tree_sitter::Language {
    tree_sitter_python::LANGUAGE.into()
}

/// Build a parser configured for Python source
pub fn parser() -> Result<Parser> {
    let mut parser = Parser::new();
    parser
        .set_language(&python())
        .map_err(|e| anyhow!("Failed to load Python grammar: {e}"))?;
    Ok(parser)
}

/// Parse Python source text into a syntax tree
pub fn parse(source: &str) -> Result<Tree> {
    parser()?
        .parse(source, None)
        .ok_or_else(|| anyhow!("Parser produced no syntax tree"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_python_source() {
        let tree = parse("x = 1\n").unwrap();
        assert_eq!(tree.root_node().kind(), "module");
        assert!(!tree.root_node().has_error());
    }
}
