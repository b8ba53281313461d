/// Expression canonicalization
///
/// Recursively renders arbitrary expression subtrees into stable text:
/// defaults, annotations, assigned values, decorators and base classes all
/// come through here. Rendering is pure; the same subtree always yields the
/// same text. Unsupported expression kinds fall back to the verbatim source
/// text so the renderer is total over anything the grammar produces.
use tree_sitter::Node;

use super::super::base::{BaseExtractor, CanonicalText};

pub(crate) fn canonicalize(base: &BaseExtractor, node: Node) -> CanonicalText {
    CanonicalText::new(render(base, node))
}

/// Canonicalize the expression wrapped inside a grammar `type` node
pub(crate) fn canonicalize_type(base: &BaseExtractor, node: Node) -> CanonicalText {
    match node.named_child(0) {
        Some(inner) if node.kind() == "type" => canonicalize(base, inner),
        _ => canonicalize(base, node),
    }
}

fn render(base: &BaseExtractor, node: Node) -> String {
    match node.kind() {
        // Literals render as their literal text, names as the identifier
        "identifier" | "integer" | "float" | "string" | "concatenated_string" | "true"
        | "false" | "none" | "ellipsis" => base.node_text(&node),
        "attribute" => render_attribute(base, node),
        "call" => render_call(base, node),
        "binary_operator" => render_binary(base, node),
        "comparison_operator" => render_comparison(base, node),
        "list" => format!("[{}]", render_elements(base, node)),
        "tuple" => format!("({})", render_elements(base, node)),
        "set" => format!("{{{}}}", render_elements(base, node)),
        "dictionary" => render_dictionary(base, node),
        "subscript" => render_subscript(base, node),
        "slice" => render_slice(base, node),
        "parenthesized_expression" => match node.named_child(0) {
            Some(inner) => render(base, inner),
            None => String::new(),
        },
        // Anything else keeps its verbatim source text
        _ => base.node_text(&node),
    }
}

fn render_attribute(base: &BaseExtractor, node: Node) -> String {
    let object = node
        .child_by_field_name("object")
        .map(|n| render(base, n))
        .unwrap_or_default();
    let attribute = node
        .child_by_field_name("attribute")
        .map(|n| base.node_text(&n))
        .unwrap_or_default();
    format!("{object}.{attribute}")
}

/// Callee, then positional args, then `*`-spreads, then `value=key` pairs,
/// then `**`-spreads
fn render_call(base: &BaseExtractor, node: Node) -> String {
    let callee = node
        .child_by_field_name("function")
        .map(|n| render(base, n))
        .unwrap_or_default();

    let mut positional: Vec<String> = Vec::new();
    let mut starred: Vec<String> = Vec::new();
    let mut keywords: Vec<String> = Vec::new();
    let mut spreads: Vec<String> = Vec::new();

    if let Some(arguments) = node.child_by_field_name("arguments") {
        if arguments.kind() == "argument_list" {
            let mut cursor = arguments.walk();
            for child in arguments.named_children(&mut cursor) {
                match child.kind() {
                    "list_splat" => starred.push(format!("*{}", render_splat(base, child))),
                    "dictionary_splat" => {
                        spreads.push(format!("**{}", render_splat(base, child)))
                    }
                    "keyword_argument" => {
                        let name = child
                            .child_by_field_name("name")
                            .map(|n| base.node_text(&n))
                            .unwrap_or_default();
                        let value = child
                            .child_by_field_name("value")
                            .map(|n| render(base, n))
                            .unwrap_or_default();
                        keywords.push(format!("{value}={name}"));
                    }
                    "comment" => {}
                    _ => positional.push(render(base, child)),
                }
            }
        } else {
            // Bare generator argument: f(x for x in xs)
            positional.push(base.node_text(&arguments));
        }
    }

    let mut rendered = positional;
    rendered.extend(starred);
    rendered.extend(keywords);
    rendered.extend(spreads);

    format!("{}({})", callee, rendered.join(", "))
}

fn render_splat(base: &BaseExtractor, node: Node) -> String {
    node.named_child(0)
        .map(|inner| render(base, inner))
        .unwrap_or_default()
}

fn render_binary(base: &BaseExtractor, node: Node) -> String {
    let left = node
        .child_by_field_name("left")
        .map(|n| render(base, n))
        .unwrap_or_default();
    let right = node
        .child_by_field_name("right")
        .map(|n| render(base, n))
        .unwrap_or_default();
    let op = match node.child_by_field_name("operator") {
        // Operators outside the table keep their literal token
        Some(op) => binop_symbol(op.kind())
            .map(str::to_string)
            .unwrap_or_else(|| base.node_text(&op)),
        None => String::new(),
    };
    format!("{left} {op} {right}")
}

/// Left operand followed by the (operator, right-operand) chain
fn render_comparison(base: &BaseExtractor, node: Node) -> String {
    let mut out = String::new();
    let mut cursor = node.walk();

    if cursor.goto_first_child() {
        loop {
            let child = cursor.node();
            if cursor.field_name() == Some("operators") {
                let symbol = comparator_symbol(child.kind()).unwrap_or(child.kind());
                out.push(' ');
                out.push_str(symbol);
            } else if child.is_named() && child.kind() != "comment" {
                if !out.is_empty() {
                    out.push(' ');
                }
                out.push_str(&render(base, child));
            }
            if !cursor.goto_next_sibling() {
                break;
            }
        }
    }

    out
}

fn render_elements(base: &BaseExtractor, node: Node) -> String {
    let mut cursor = node.walk();
    let elements: Vec<String> = node
        .named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .map(|child| render(base, child))
        .collect();
    elements.join(", ")
}

/// Key/value pairs in order; a spread entry renders its value prefixed `**`
fn render_dictionary(base: &BaseExtractor, node: Node) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "pair" => {
                let key = child
                    .child_by_field_name("key")
                    .map(|n| render(base, n))
                    .unwrap_or_default();
                let value = child
                    .child_by_field_name("value")
                    .map(|n| render(base, n))
                    .unwrap_or_default();
                parts.push(format!("{key}: {value}"));
            }
            "dictionary_splat" => parts.push(format!("**{}", render_splat(base, child))),
            _ => {}
        }
    }
    format!("{{{}}}", parts.join(", "))
}

fn render_subscript(base: &BaseExtractor, node: Node) -> String {
    let value = node
        .child_by_field_name("value")
        .map(|n| render(base, n))
        .unwrap_or_default();
    let mut cursor = node.walk();
    let subscripts: Vec<String> = node
        .children_by_field_name("subscript", &mut cursor)
        .map(|child| render(base, child))
        .collect();
    format!("{}[{}]", value, subscripts.join(", "))
}

/// `lower:upper`, or `lower:upper,step` when a step is present; absent
/// bounds render as empty segments
fn render_slice(base: &BaseExtractor, node: Node) -> String {
    let mut segments: Vec<String> = vec![String::new()];
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == ":" {
            segments.push(String::new());
        } else if child.is_named() {
            if let Some(last) = segments.last_mut() {
                *last = render(base, child);
            }
        }
    }

    match segments.len() {
        0 | 1 => segments.join(":"),
        2 => format!("{}:{}", segments[0], segments[1]),
        _ => format!("{}:{},{}", segments[0], segments[1], segments[2]),
    }
}

fn binop_symbol(kind: &str) -> Option<&'static str> {
    Some(match kind {
        "+" => "+",
        "-" => "-",
        "*" => "*",
        "/" => "/",
        "//" => "//",
        "%" => "%",
        "**" => "**",
        "<<" => "<<",
        ">>" => ">>",
        "|" => "|",
        "^" => "^",
        "&" => "&",
        _ => return None,
    })
}

fn comparator_symbol(kind: &str) -> Option<&'static str> {
    Some(match kind {
        "==" => "=",
        "!=" => "!=",
        "<" => "<",
        "<=" => "<=",
        ">" => ">",
        ">=" => ">=",
        "is" => "is",
        "is not" => "is not",
        "in" => "in",
        "not in" => "not in",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Canonicalize the first expression statement of a snippet
    fn canon(source: &str) -> String {
        let tree = crate::language::parse(source).unwrap();
        let stmt = tree.root_node().named_child(0).unwrap();
        let expr = stmt.named_child(0).unwrap();
        let base = BaseExtractor::new("test.py".to_string(), source.to_string());
        canonicalize(&base, expr).as_str().to_string()
    }

    #[test]
    fn literals_and_names_render_verbatim() {
        assert_eq!(canon("42"), "42");
        assert_eq!(canon("3.14"), "3.14");
        assert_eq!(canon("'text'"), "'text'");
        assert_eq!(canon("True"), "True");
        assert_eq!(canon("None"), "None");
        assert_eq!(canon("answer"), "answer");
    }

    #[test]
    fn attribute_access_joins_with_dots() {
        assert_eq!(canon("os.path.join"), "os.path.join");
    }

    #[test]
    fn calls_render_positional_then_starred_then_keywords_then_spreads() {
        assert_eq!(canon("f(1, x)"), "f(1, x)");
        assert_eq!(canon("f(1, key=2)"), "f(1, 2=key)");
        assert_eq!(canon("f(a, *rest, flag=True, **extra)"), "f(a, *rest, True=flag, **extra)");
        assert_eq!(canon("f(a, *rest, b)"), "f(a, b, *rest)");
    }

    #[test]
    fn binary_operations_use_the_operator_table() {
        assert_eq!(canon("1 + 2"), "1 + 2");
        assert_eq!(canon("a ** b"), "a ** b");
        assert_eq!(canon("x << 3 | y"), "x << 3 | y");
        // Outside the table the literal token survives
        assert_eq!(canon("m @ n"), "m @ n");
    }

    #[test]
    fn comparisons_render_left_then_operator_chain() {
        assert_eq!(canon("1 == 2"), "1 = 2");
        assert_eq!(canon("x is not None"), "x is not None");
        assert_eq!(canon("a < b <= c"), "a < b <= c");
        assert_eq!(canon("key not in table"), "key not in table");
    }

    #[test]
    fn containers_render_elements_in_order() {
        assert_eq!(canon("[1, 2, 3]"), "[1, 2, 3]");
        assert_eq!(canon("(1, 'two')"), "(1, 'two')");
        assert_eq!(canon("{1, 2}"), "{1, 2}");
        assert_eq!(canon("{'a': 1, 'b': f()}"), "{'a': 1, 'b': f()}");
        assert_eq!(canon("{'a': 1, **rest}"), "{'a': 1, **rest}");
    }

    #[test]
    fn subscripts_and_slices() {
        assert_eq!(canon("table[key]"), "table[key]");
        assert_eq!(canon("items[1:10]"), "items[1:10]");
        assert_eq!(canon("items[1:10:2]"), "items[1:10,2]");
        assert_eq!(canon("items[:5]"), "items[:5]");
        assert_eq!(canon("items[2:]"), "items[2:]");
    }

    #[test]
    fn nested_expressions_recurse() {
        assert_eq!(canon("f(g(1), [a, b.c])"), "f(g(1), [a, b.c])");
        assert_eq!(canon("(1 + 2) * 3"), "1 + 2 * 3");
    }

    #[test]
    fn canonicalization_is_idempotent() {
        let source = "f(1, *args, key=g(x), **extra)";
        let tree = crate::language::parse(source).unwrap();
        let expr = tree.root_node().named_child(0).unwrap().named_child(0).unwrap();
        let base = BaseExtractor::new("test.py".to_string(), source.to_string());

        let first = canonicalize(&base, expr);
        let second = canonicalize(&base, expr);
        assert_eq!(first, second);
    }
}
