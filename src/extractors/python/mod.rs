//! Python declaration extraction
//!
//! Walks a parsed Python tree in traversal order and dispatches each node by
//! its structural kind. Unsupported kinds yield no record, which is normal.
//!
//! The module is organized into focused sub-modules:
//! - expressions: recursive canonicalization of expression subtrees
//! - signatures: parameter collection and default alignment
//! - imports: import / from-import record builders
//! - functions: function and method record builder
//! - classes: class record builder and method ownership
//! - assignments: constant bindings and the naming filter policy
//! - assertions: assert record builder
//! - helpers: docstrings, decorators, string delimiters

pub(crate) mod assertions;
pub(crate) mod assignments;
pub(crate) mod classes;
pub(crate) mod expressions;
pub(crate) mod functions;
pub(crate) mod helpers;
pub(crate) mod imports;
pub(crate) mod signatures;

use std::sync::Arc;

use tracing::trace;
use tree_sitter::{Node, Tree};

use super::base::{BaseExtractor, DeclarationRecord, ExtractError};
use crate::modules::{self, PackageProbe};

/// The scope a statement is dispatched under.
///
/// Threaded explicitly through the traversal instead of annotating parent
/// pointers onto the nodes: a function definition dispatched under
/// `Owner::Class` belongs to that class and is never emitted top-level.
#[derive(Debug, Clone, Copy)]
enum Owner<'a> {
    Module,
    Class(&'a str),
}

/// Extractor for one Python source file
pub struct PythonExtractor {
    base: BaseExtractor,
    probe: Arc<dyn PackageProbe>,
}

impl PythonExtractor {
    /// Extractor backed by the shared environment probe
    pub fn new(file_path: String, content: String) -> Self {
        Self::with_probe(file_path, content, modules::env_probe())
    }

    /// Extractor with an explicit package probe (tests, hermetic runs)
    pub fn with_probe(
        file_path: String,
        content: String,
        probe: Arc<dyn PackageProbe>,
    ) -> Self {
        Self {
            base: BaseExtractor::new(file_path, content),
            probe,
        }
    }

    /// Extract every notable declaration in traversal order
    pub fn extract(&self, tree: &Tree) -> Result<Vec<DeclarationRecord>, ExtractError> {
        let mut records = Vec::new();
        self.traverse(tree.root_node(), Owner::Module, &mut records)?;
        Ok(records)
    }

    fn traverse(
        &self,
        node: Node,
        owner: Owner<'_>,
        records: &mut Vec<DeclarationRecord>,
    ) -> Result<(), ExtractError> {
        match node.kind() {
            "import_statement" => {
                imports::extract_import(self, node, records);
                Ok(())
            }
            "import_from_statement" => {
                imports::extract_import_from(self, node, records);
                Ok(())
            }
            "assignment" => {
                // Chained right-hand sides are handled inside the builder
                assignments::extract_assignment(self, node, records);
                Ok(())
            }
            "assert_statement" => {
                assertions::extract_assert(self, node, records);
                Ok(())
            }
            "function_definition" => self.visit_function(node, None, owner, records),
            "class_definition" => self.visit_class(node, None, records),
            "decorated_definition" => {
                let Some(definition) = node.child_by_field_name("definition") else {
                    return Ok(());
                };
                match definition.kind() {
                    "function_definition" => {
                        self.visit_function(definition, Some(node), owner, records)
                    }
                    "class_definition" => self.visit_class(definition, Some(node), records),
                    _ => Ok(()),
                }
            }
            _ => self.walk_children(node, owner, records),
        }
    }

    /// Emit a function record unless the definition is owned by a class,
    /// then keep walking its body (asserts and constants inside function
    /// bodies still surface). Scope resets: a def nested in a method body
    /// is a plain function again.
    fn visit_function(
        &self,
        node: Node,
        outer: Option<Node>,
        owner: Owner<'_>,
        records: &mut Vec<DeclarationRecord>,
    ) -> Result<(), ExtractError> {
        match owner {
            Owner::Module => {
                let function = functions::extract_function(self, node, outer, false)?;
                records.push(DeclarationRecord::FunctionDef(function));
            }
            Owner::Class(class_name) => {
                trace!("skipping method of {class_name}: owned by its class record");
            }
        }

        if let Some(body) = node.child_by_field_name("body") {
            self.walk_children(body, Owner::Module, records)?;
        }
        Ok(())
    }

    fn visit_class(
        &self,
        node: Node,
        outer: Option<Node>,
        records: &mut Vec<DeclarationRecord>,
    ) -> Result<(), ExtractError> {
        records.push(classes::extract_class(self, node, outer)?);

        let class_name = node
            .child_by_field_name("name")
            .map(|n| self.base.node_text(&n))
            .unwrap_or_default();
        if let Some(body) = node.child_by_field_name("body") {
            self.walk_children(body, Owner::Class(&class_name), records)?;
        }
        Ok(())
    }

    fn walk_children(
        &self,
        node: Node,
        owner: Owner<'_>,
        records: &mut Vec<DeclarationRecord>,
    ) -> Result<(), ExtractError> {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.traverse(child, owner, records)?;
        }
        Ok(())
    }

    pub(crate) fn base(&self) -> &BaseExtractor {
        &self.base
    }

    pub(crate) fn probe(&self) -> &dyn PackageProbe {
        self.probe.as_ref()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::extractors::FunctionCategory;

    struct StubProbe {
        installed: Vec<&'static str>,
    }

    impl PackageProbe for StubProbe {
        fn is_installed(&self, name: &str) -> bool {
            self.installed.contains(&name)
        }
    }

    /// Extract a snippet with no packages installed
    pub(crate) fn extract_source(source: &str) -> Vec<DeclarationRecord> {
        extract_with_installed(source, &[])
    }

    /// Extract a snippet against a fixed fake package index
    pub(crate) fn extract_with_installed(
        source: &str,
        installed: &[&'static str],
    ) -> Vec<DeclarationRecord> {
        let tree = crate::language::parse(source).unwrap();
        let extractor = PythonExtractor::with_probe(
            "test.py".to_string(),
            source.to_string(),
            Arc::new(StubProbe {
                installed: installed.to_vec(),
            }),
        );
        extractor.extract(&tree).unwrap()
    }

    #[test]
    fn unsupported_statements_yield_no_records() {
        let records = extract_source("for i in range(3):\n    print(i)\n");
        assert!(records.is_empty());
    }

    #[test]
    fn records_appear_in_traversal_order() {
        let source = "import os\n\nLIMIT = 10\n\ndef run():\n    pass\n\nclass App:\n    pass\n";
        let kinds: Vec<&str> = extract_source(source)
            .iter()
            .map(|record| match record {
                DeclarationRecord::Import { .. } => "import",
                DeclarationRecord::ImportFrom { .. } => "import_from",
                DeclarationRecord::Assign { .. } => "assign",
                DeclarationRecord::AnnAssign { .. } => "ann_assign",
                DeclarationRecord::FunctionDef(_) => "function",
                DeclarationRecord::ClassDef { .. } => "class",
                DeclarationRecord::Assert { .. } => "assert",
            })
            .collect();
        assert_eq!(kinds, vec!["import", "assign", "function", "class"]);
    }

    #[test]
    fn methods_never_surface_as_top_level_functions() {
        let source = "class Store:\n    def get(self, key):\n        return self.data[key]\n";
        let records = extract_source(source);

        assert!(records
            .iter()
            .all(|r| !matches!(r, DeclarationRecord::FunctionDef(_))));
        match &records[0] {
            DeclarationRecord::ClassDef { methods, .. } => {
                assert_eq!(methods.len(), 1);
                assert_eq!(methods[0].name, "get");
                assert_eq!(methods[0].category, FunctionCategory::Method);
            }
            other => panic!("expected class record, got {other:?}"),
        }
    }

    #[test]
    fn nested_definitions_reset_scope() {
        // A def inside a method body is a plain function, not a method
        let source = "class Outer:\n    def method(self):\n        def local():\n            pass\n        return local\n";
        let records = extract_source(source);

        let functions: Vec<&str> = records
            .iter()
            .filter_map(|r| match r {
                DeclarationRecord::FunctionDef(f) => Some(f.name.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(functions, vec!["local"]);
    }

    #[test]
    fn class_level_constants_still_surface() {
        let source = "class Config:\n    RETRIES = 3\n";
        let records = extract_source(source);
        assert!(records
            .iter()
            .any(|r| matches!(r, DeclarationRecord::Assign { .. })));
    }

    #[test]
    fn every_record_carries_its_source_snippet() {
        let source = "import os\nLIMIT = 10\nassert LIMIT > 0\n";
        for record in extract_source(source) {
            let snippet = match &record {
                DeclarationRecord::Import { source_text, .. }
                | DeclarationRecord::ImportFrom { source_text, .. }
                | DeclarationRecord::Assign { source_text, .. }
                | DeclarationRecord::AnnAssign { source_text, .. }
                | DeclarationRecord::ClassDef { source_text, .. }
                | DeclarationRecord::Assert { source_text, .. } => source_text,
                DeclarationRecord::FunctionDef(f) => &f.source_text,
            };
            assert!(source.contains(snippet.as_str()));
        }
    }
}
