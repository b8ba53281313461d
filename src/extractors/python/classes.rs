/// Class record extraction
/// Handles base classes, keyword arguments, decorators and the owned
/// method list
use tree_sitter::Node;

use super::super::base::{CanonicalText, DeclarationRecord, ExtractError, FunctionRecord};
use super::{expressions, functions, helpers, PythonExtractor};

/// Build the record for a class definition.
///
/// `outer` is the decorated_definition wrapper when one exists. Only
/// name-shaped bases make it into the base-class list; anything else
/// (subscripts, attribute chains) is omitted without blocking the record.
pub(crate) fn extract_class(
    extractor: &PythonExtractor,
    node: Node,
    outer: Option<Node>,
) -> Result<DeclarationRecord, ExtractError> {
    let base = extractor.base();
    let snippet_node = outer.unwrap_or(node);

    let name = node
        .child_by_field_name("name")
        .map(|n| base.node_text(&n))
        .unwrap_or_default();

    let mut base_classes: Vec<CanonicalText> = Vec::new();
    let mut keyword_parts: Vec<String> = Vec::new();
    if let Some(superclasses) = node.child_by_field_name("superclasses") {
        let mut cursor = superclasses.walk();
        for child in superclasses.named_children(&mut cursor) {
            match child.kind() {
                "identifier" => base_classes.push(expressions::canonicalize(base, child)),
                "keyword_argument" => keyword_parts.push(base.node_text(&child)),
                _ => {}
            }
        }
    }
    let keyword_args = CanonicalText::new(keyword_parts.join(", "));

    let decorators = helpers::extract_decorators(base, &snippet_node);
    let docstring = helpers::extract_docstring(base, &node);
    let methods = collect_methods(extractor, node)?;
    let source_text = base.node_text(&snippet_node);

    Ok(DeclarationRecord::ClassDef {
        name,
        docstring,
        base_classes,
        decorators,
        keyword_args,
        methods,
        source_text,
    })
}

/// Enumerate the functions sitting directly in the class body.
///
/// These are the class's methods; the traversal never emits them as
/// top-level records.
fn collect_methods(
    extractor: &PythonExtractor,
    node: Node,
) -> Result<Vec<FunctionRecord>, ExtractError> {
    let mut methods = Vec::new();

    if let Some(body) = node.child_by_field_name("body") {
        let mut cursor = body.walk();
        for child in body.named_children(&mut cursor) {
            match child.kind() {
                "function_definition" => {
                    methods.push(functions::extract_function(extractor, child, None, true)?);
                }
                "decorated_definition" => {
                    if let Some(definition) = child.child_by_field_name("definition") {
                        if definition.kind() == "function_definition" {
                            methods.push(functions::extract_function(
                                extractor,
                                definition,
                                Some(child),
                                true,
                            )?);
                        }
                    }
                }
                _ => {}
            }
        }
    }

    Ok(methods)
}
