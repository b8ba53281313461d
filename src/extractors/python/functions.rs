/// Function and method record extraction
/// Handles sync and async definitions, generator detection and the aligned
/// parameter list
use tree_sitter::Node;

use super::super::base::{ExtractError, FunctionCategory, FunctionRecord};
use super::{expressions, helpers, signatures, PythonExtractor};

/// Build the record for a function definition.
///
/// `outer` is the decorated_definition wrapper when one exists (it carries
/// the decorators and the full source snippet); `in_class` marks a
/// definition sitting directly in a class body.
pub(crate) fn extract_function(
    extractor: &PythonExtractor,
    node: Node,
    outer: Option<Node>,
    in_class: bool,
) -> Result<FunctionRecord, ExtractError> {
    let base = extractor.base();
    let snippet_node = outer.unwrap_or(node);

    let name = node
        .child_by_field_name("name")
        .map(|n| base.node_text(&n))
        .unwrap_or_default();

    let decorators = helpers::extract_decorators(base, &snippet_node);

    let return_type = node
        .child_by_field_name("return_type")
        .map(|n| expressions::canonicalize_type(base, n));

    let parameters = match node.child_by_field_name("parameters") {
        Some(parameters_node) => {
            let decl = signatures::collect_parameters(base, parameters_node);
            signatures::align(base, &decl)?
        }
        None => Vec::new(),
    };

    let docstring = helpers::extract_docstring(base, &node);
    let category = function_category(node, in_class);
    let source_text = base.node_text(&snippet_node);

    Ok(FunctionRecord {
        name,
        category,
        docstring,
        decorators,
        return_type,
        parameters,
        source_text,
    })
}

/// Coroutine for `async def`; otherwise generator if the body yields,
/// method if directly inside a class body, plain function last.
fn function_category(node: Node, in_class: bool) -> FunctionCategory {
    if has_async_keyword(&node) {
        FunctionCategory::Coroutine
    } else if body_yields(&node) {
        FunctionCategory::Generator
    } else if in_class {
        FunctionCategory::Method
    } else {
        FunctionCategory::Function
    }
}

fn has_async_keyword(node: &Node) -> bool {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "async" {
            return true;
        }
    }
    false
}

fn body_yields(node: &Node) -> bool {
    match node.child_by_field_name("body") {
        Some(body) => contains_yield(body),
        None => false,
    }
}

/// A yield in a nested def, lambda or class does not make this function a
/// generator
fn contains_yield(node: Node) -> bool {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "yield" => return true,
            "function_definition" | "lambda" | "class_definition" => {}
            _ => {
                if contains_yield(child) {
                    return true;
                }
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::super::tests::extract_source;
    use super::*;
    use crate::extractors::DeclarationRecord;

    fn first_function(source: &str) -> FunctionRecord {
        extract_source(source)
            .into_iter()
            .find_map(|record| match record {
                DeclarationRecord::FunctionDef(function) => Some(function),
                _ => None,
            })
            .expect("expected a function record")
    }

    #[test]
    fn plain_definition_is_a_function() {
        let function = first_function("def run(): pass\n");
        assert_eq!(function.name, "run");
        assert_eq!(function.category, FunctionCategory::Function);
        assert_eq!(function.source_text, "def run(): pass");
    }

    #[test]
    fn async_definition_is_a_coroutine() {
        let function = first_function("async def fetch(url): pass\n");
        assert_eq!(function.category, FunctionCategory::Coroutine);
    }

    #[test]
    fn yielding_body_is_a_generator() {
        let function = first_function("def walk(tree):\n    yield tree\n");
        assert_eq!(function.category, FunctionCategory::Generator);
    }

    #[test]
    fn nested_yield_does_not_leak_outward() {
        let source = "def outer():\n    def inner():\n        yield 1\n    return inner\n";
        let function = first_function(source);
        assert_eq!(function.category, FunctionCategory::Function);
    }

    #[test]
    fn return_type_and_docstring_are_extracted() {
        let source = "def f(x: int) -> str:\n    \"\"\"Turn a number into text.\"\"\"\n    return str(x)\n";
        let function = first_function(source);
        assert_eq!(function.return_type.as_ref().unwrap().as_str(), "str");
        assert_eq!(function.docstring.as_deref(), Some("Turn a number into text."));
    }

    #[test]
    fn decorators_are_canonicalized_with_the_statement_snippet() {
        let source = "@cache\n@retry(times=3)\ndef f(): pass\n";
        let function = first_function(source);
        let decorators: Vec<&str> = function.decorators.iter().map(|d| d.as_str()).collect();
        assert_eq!(decorators, vec!["cache", "retry(3=times)"]);
        assert!(function.source_text.starts_with("@cache"));
    }
}
