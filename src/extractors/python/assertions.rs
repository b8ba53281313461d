/// Assertion record extraction
use tree_sitter::Node;

use super::super::base::DeclarationRecord;
use super::{expressions, PythonExtractor};

/// Extract an assert statement: the canonicalized test and the optional
/// failure message. A comparison test renders as its left operand followed
/// by the operator/right-operand chain.
pub(crate) fn extract_assert(
    extractor: &PythonExtractor,
    node: Node,
    records: &mut Vec<DeclarationRecord>,
) {
    let base = extractor.base();

    let mut cursor = node.walk();
    let expressions_in_order: Vec<Node> = node
        .named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect();

    let Some(test_node) = expressions_in_order.first() else {
        return;
    };
    let test = expressions::canonicalize(base, *test_node);
    let message = expressions_in_order
        .get(1)
        .map(|m| expressions::canonicalize(base, *m));

    records.push(DeclarationRecord::Assert {
        test,
        message,
        source_text: base.node_text(&node),
    });
}
