/// Constant binding extraction
/// Plain and annotated assignments, gated by the constant-naming filter
/// policy: bindings that fail the policy produce no record at all
use tree_sitter::Node;

use super::super::base::DeclarationRecord;
use super::{expressions, PythonExtractor};

/// Lower-case names treated as constants despite their casing.
///
/// Web-framework entry points and similar module-level singletons that the
/// documentation should surface next to real constants.
pub(crate) static ACCEPTABLE_LOWER_CONSTANTS: &[&str] = &[
    "api",
    "app",
    "application",
    "cli",
    "config",
    "logger",
    "main",
    "router",
    "settings",
    "urlpatterns",
];

/// Extract an assignment statement, annotated or plain.
///
/// The grammar folds both into one `assignment` node kind; a `type` field
/// marks the annotated form.
pub(crate) fn extract_assignment(
    extractor: &PythonExtractor,
    node: Node,
    records: &mut Vec<DeclarationRecord>,
) {
    if let Some(type_node) = node.child_by_field_name("type") {
        extract_ann_assign(extractor, node, type_node, records);
    } else {
        extract_plain_assign(extractor, node, records);
    }
}

fn extract_plain_assign(
    extractor: &PythonExtractor,
    node: Node,
    records: &mut Vec<DeclarationRecord>,
) {
    let base = extractor.base();

    let mut target_names: Vec<String> = Vec::new();
    let mut value_node: Option<Node> = None;
    collect_targets(extractor, node, &mut target_names, &mut value_node);

    if target_names.is_empty() {
        return;
    }
    // Filter policy: at least one target must look like a constant
    if !target_names.iter().any(|name| is_constant_name(name)) {
        return;
    }

    let value = value_node
        .map(|v| expressions::canonicalize(base, v))
        .unwrap_or_default();

    records.push(DeclarationRecord::Assign {
        target_names,
        value,
        source_text: base.node_text(&node),
    });
}

/// Gather target names across `A = B = value` chains and tuple targets;
/// the innermost right-hand side is the assigned value. Attribute and
/// subscript targets are not constant bindings and contribute nothing.
fn collect_targets<'tree>(
    extractor: &PythonExtractor,
    node: Node<'tree>,
    target_names: &mut Vec<String>,
    value_node: &mut Option<Node<'tree>>,
) {
    let base = extractor.base();

    if let Some(left) = node.child_by_field_name("left") {
        match left.kind() {
            "identifier" => target_names.push(base.node_text(&left)),
            "pattern_list" | "tuple_pattern" => {
                let mut cursor = left.walk();
                for child in left.named_children(&mut cursor) {
                    if child.kind() == "identifier" {
                        target_names.push(base.node_text(&child));
                    }
                }
            }
            _ => {}
        }
    }

    if let Some(right) = node.child_by_field_name("right") {
        if right.kind() == "assignment" {
            collect_targets(extractor, right, target_names, value_node);
        } else {
            *value_node = Some(right);
        }
    }
}

fn extract_ann_assign(
    extractor: &PythonExtractor,
    node: Node,
    type_node: Node,
    records: &mut Vec<DeclarationRecord>,
) {
    let base = extractor.base();

    let Some(left) = node.child_by_field_name("left") else {
        return;
    };
    if left.kind() != "identifier" {
        return;
    }
    let name = base.node_text(&left);
    // Annotated bindings qualify on upper-case names only
    if !is_upper(&name) {
        return;
    }

    let annotation = expressions::canonicalize_type(base, type_node);
    let value = node
        .child_by_field_name("right")
        .map(|v| expressions::canonicalize(base, v));

    records.push(DeclarationRecord::AnnAssign {
        name,
        annotation,
        value,
        source_text: base.node_text(&node),
    });
}

pub(crate) fn is_constant_name(name: &str) -> bool {
    is_upper(name) || ACCEPTABLE_LOWER_CONSTANTS.contains(&name)
}

/// `str.isupper` semantics: at least one cased character and none of them
/// lower-case
fn is_upper(name: &str) -> bool {
    let mut has_cased = false;
    for ch in name.chars() {
        if ch.is_lowercase() {
            return false;
        }
        if ch.is_uppercase() {
            has_cased = true;
        }
    }
    has_cased
}
