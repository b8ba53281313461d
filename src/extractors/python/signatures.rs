/// Parameter list collection and alignment
///
/// Collects the raw parameter declaration from a `parameters` node - ordered
/// positional names, a right-aligned default list, the optional `*args`,
/// keyword-only names with their own right-aligned defaults and the optional
/// `**kwargs` - then binds the default lists back onto their parameters and
/// flattens everything into role order.
use tree_sitter::Node;

use super::super::base::{BaseExtractor, CanonicalText, ExtractError, ParameterRole, ParameterSpec};
use super::expressions;

pub(crate) struct RawParameter<'tree> {
    pub name: String,
    pub annotation: Option<Node<'tree>>,
}

/// The ast-shaped parameter declaration the aligner consumes
pub(crate) struct ParameterDecl<'tree> {
    pub positional: Vec<RawParameter<'tree>>,
    pub defaults: Vec<Node<'tree>>,
    pub vararg: Option<RawParameter<'tree>>,
    pub kwonly: Vec<RawParameter<'tree>>,
    pub kw_defaults: Vec<Node<'tree>>,
    pub kwarg: Option<RawParameter<'tree>>,
}

/// Walk a `parameters` node into a raw declaration.
///
/// Everything after the bare `*` separator or after `*args` is
/// keyword-only; the `/` positional-only separator changes nothing about
/// how names are recorded.
pub(crate) fn collect_parameters<'tree>(
    base: &BaseExtractor,
    parameters: Node<'tree>,
) -> ParameterDecl<'tree> {
    let mut positional: Vec<(RawParameter<'tree>, Option<Node<'tree>>)> = Vec::new();
    let mut kwonly: Vec<(RawParameter<'tree>, Option<Node<'tree>>)> = Vec::new();
    let mut vararg = None;
    let mut kwarg = None;
    let mut keyword_section = false;

    let mut cursor = parameters.walk();
    for child in parameters.children(&mut cursor) {
        match child.kind() {
            "identifier" => {
                let param = RawParameter {
                    name: base.node_text(&child),
                    annotation: None,
                };
                if keyword_section {
                    kwonly.push((param, None));
                } else {
                    positional.push((param, None));
                }
            }
            "typed_parameter" => {
                let annotation = child.child_by_field_name("type");
                match child.named_child(0) {
                    Some(inner) if inner.kind() == "list_splat_pattern" => {
                        vararg = splat_parameter(base, inner, annotation);
                        keyword_section = true;
                    }
                    Some(inner) if inner.kind() == "dictionary_splat_pattern" => {
                        kwarg = splat_parameter(base, inner, annotation);
                    }
                    Some(inner) if inner.kind() == "identifier" => {
                        let param = RawParameter {
                            name: base.node_text(&inner),
                            annotation,
                        };
                        if keyword_section {
                            kwonly.push((param, None));
                        } else {
                            positional.push((param, None));
                        }
                    }
                    _ => {}
                }
            }
            "default_parameter" | "typed_default_parameter" => {
                let Some(name_node) = child.child_by_field_name("name") else {
                    continue;
                };
                if name_node.kind() != "identifier" {
                    continue;
                }
                let param = RawParameter {
                    name: base.node_text(&name_node),
                    annotation: child.child_by_field_name("type"),
                };
                let default = child.child_by_field_name("value");
                if keyword_section {
                    kwonly.push((param, default));
                } else {
                    positional.push((param, default));
                }
            }
            "list_splat_pattern" => {
                vararg = splat_parameter(base, child, None);
                keyword_section = true;
            }
            "dictionary_splat_pattern" => {
                kwarg = splat_parameter(base, child, None);
            }
            "keyword_separator" => keyword_section = true,
            _ => {}
        }
    }

    let (positional, defaults) = right_aligned(positional);
    let (kwonly, kw_defaults) = right_aligned(kwonly);

    ParameterDecl {
        positional,
        defaults,
        vararg,
        kwonly,
        kw_defaults,
        kwarg,
    }
}

fn splat_parameter<'tree>(
    base: &BaseExtractor,
    pattern: Node<'tree>,
    annotation: Option<Node<'tree>>,
) -> Option<RawParameter<'tree>> {
    pattern.named_child(0).map(|name_node| RawParameter {
        name: base.node_text(&name_node),
        annotation,
    })
}

/// Split a parameter section into its name list and the right-aligned
/// default list. Only the trailing run of defaulted parameters is
/// representable; earlier defaults (legal for keyword-only parameters)
/// are dropped.
fn right_aligned<'tree>(
    section: Vec<(RawParameter<'tree>, Option<Node<'tree>>)>,
) -> (Vec<RawParameter<'tree>>, Vec<Node<'tree>>) {
    let trailing = section
        .iter()
        .rev()
        .take_while(|(_, default)| default.is_some())
        .count();
    let split = section.len() - trailing;

    let mut params = Vec::with_capacity(section.len());
    let mut defaults = Vec::with_capacity(trailing);
    for (index, (param, default)) in section.into_iter().enumerate() {
        if index >= split {
            if let Some(default) = default {
                defaults.push(default);
            }
        }
        params.push(param);
    }
    (params, defaults)
}

/// Produce the ordered parameter list: positionals, `*args`, keyword-only
/// parameters, `**kwargs`.
///
/// Defaults bind to the last D parameters of their section, in supplied
/// order; supplying more defaults than parameters is a caller contract
/// violation and fails fast.
pub(crate) fn align(
    base: &BaseExtractor,
    decl: &ParameterDecl,
) -> Result<Vec<ParameterSpec>, ExtractError> {
    let mut specs = bind_section(
        base,
        &decl.positional,
        &decl.defaults,
        ParameterRole::Positional,
        "positional",
    )?;

    if let Some(vararg) = &decl.vararg {
        specs.push(variadic_spec(base, vararg, ParameterRole::VarPositional));
    }

    specs.extend(bind_section(
        base,
        &decl.kwonly,
        &decl.kw_defaults,
        ParameterRole::KeywordOnly,
        "keyword-only",
    )?);

    if let Some(kwarg) = &decl.kwarg {
        specs.push(variadic_spec(base, kwarg, ParameterRole::VarKeyword));
    }

    Ok(specs)
}

fn bind_section(
    base: &BaseExtractor,
    params: &[RawParameter],
    defaults: &[Node],
    role: ParameterRole,
    section: &'static str,
) -> Result<Vec<ParameterSpec>, ExtractError> {
    let declared = params.len();
    let supplied = defaults.len();
    if supplied > declared {
        return Err(ExtractError::DefaultOverflow {
            section,
            supplied,
            declared,
        });
    }

    let first_bound = declared - supplied;
    Ok(params
        .iter()
        .enumerate()
        .map(|(index, param)| ParameterSpec {
            name: param.name.clone(),
            annotation: param
                .annotation
                .map(|node| expressions::canonicalize_type(base, node)),
            default: if index >= first_bound {
                render_default(base, defaults[index - first_bound])
            } else {
                None
            },
            role,
        })
        .collect())
}

fn variadic_spec(base: &BaseExtractor, param: &RawParameter, role: ParameterRole) -> ParameterSpec {
    ParameterSpec {
        name: param.name.clone(),
        annotation: param
            .annotation
            .map(|node| expressions::canonicalize_type(base, node)),
        default: None,
        role,
    }
}

/// Only literal and call-shaped defaults are rendered; every other shape is
/// left absent (documented behavior carried over from the doc pipeline).
fn render_default(base: &BaseExtractor, node: Node) -> Option<CanonicalText> {
    match node.kind() {
        "integer" | "float" | "string" | "concatenated_string" | "true" | "false" | "none"
        | "call" => Some(expressions::canonicalize(base, node)),
        _ => None,
    }
}
