/// Import record extraction
/// One record per imported identifier; categorization runs per statement
/// root and is shared by every identifier the statement binds
use tracing::trace;
use tree_sitter::Node;

use super::super::base::DeclarationRecord;
use super::PythonExtractor;
use crate::modules;

/// Extract `import a, b` statements: one record per dotted module path.
///
/// Aliases bind a different local name but the record keeps the imported
/// module itself.
pub(crate) fn extract_import(
    extractor: &PythonExtractor,
    node: Node,
    records: &mut Vec<DeclarationRecord>,
) {
    let base = extractor.base();
    let source_text = base.node_text(&node);

    let mut cursor = node.walk();
    for child in node.children_by_field_name("name", &mut cursor) {
        let module_node = match child.kind() {
            "dotted_name" => Some(child),
            "aliased_import" => child.child_by_field_name("name"),
            _ => None,
        };
        let Some(module_node) = module_node else {
            continue;
        };

        let module_name = base.node_text(&module_node);
        let category = modules::categorize(&module_name, extractor.probe());
        trace!("import {module_name}: {category}");

        records.push(DeclarationRecord::Import {
            module_name,
            path: None,
            category,
            source_text: source_text.clone(),
        });
    }
}

/// Extract `from m import a, b` statements: one record per imported
/// identifier, all sharing the from-path and its category.
pub(crate) fn extract_import_from(
    extractor: &PythonExtractor,
    node: Node,
    records: &mut Vec<DeclarationRecord>,
) {
    let base = extractor.base();
    let source_text = base.node_text(&node);

    let module_path = node
        .child_by_field_name("module_name")
        .map(|m| base.node_text(&m))
        .unwrap_or_default();
    let category = modules::categorize(&module_path, extractor.probe());
    trace!("from {module_path} import ...: {category}");

    let mut pushed = false;
    let mut cursor = node.walk();
    for child in node.children_by_field_name("name", &mut cursor) {
        let identifier = match child.kind() {
            "dotted_name" => base.node_text(&child),
            "aliased_import" => match child.child_by_field_name("name") {
                Some(name_node) => base.node_text(&name_node),
                None => continue,
            },
            _ => continue,
        };

        records.push(DeclarationRecord::ImportFrom {
            identifier,
            module_path: module_path.clone(),
            category,
            source_text: source_text.clone(),
        });
        pushed = true;
    }

    if !pushed {
        // `from m import *` carries no name field
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.kind() == "wildcard_import" {
                records.push(DeclarationRecord::ImportFrom {
                    identifier: "*".to_string(),
                    module_path: module_path.clone(),
                    category,
                    source_text: source_text.clone(),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{extract_source, extract_with_installed};
    use crate::extractors::DeclarationRecord;
    use crate::modules::ModuleCategory;

    #[test]
    fn one_record_per_imported_module() {
        let records = extract_source("import os, sys\n");
        assert_eq!(records.len(), 2);
        for (record, expected) in records.iter().zip(["os", "sys"]) {
            match record {
                DeclarationRecord::Import {
                    module_name,
                    path,
                    category,
                    source_text,
                } => {
                    assert_eq!(module_name, expected);
                    assert_eq!(*path, None);
                    assert_eq!(*category, ModuleCategory::Native);
                    assert_eq!(source_text, "import os, sys");
                }
                other => panic!("expected import record, got {other:?}"),
            }
        }
    }

    #[test]
    fn from_import_emits_one_record_per_identifier() {
        let records = extract_source("from collections import defaultdict, namedtuple\n");
        assert_eq!(records.len(), 2);
        for (record, expected) in records.iter().zip(["defaultdict", "namedtuple"]) {
            match record {
                DeclarationRecord::ImportFrom {
                    identifier,
                    module_path,
                    category,
                    ..
                } => {
                    assert_eq!(identifier, expected);
                    assert_eq!(module_path, "collections");
                    assert_eq!(*category, ModuleCategory::Native);
                }
                other => panic!("expected from-import record, got {other:?}"),
            }
        }
    }

    #[test]
    fn relative_imports_are_local_regardless_of_name() {
        let records = extract_source("from .utils import helper\nfrom . import models\n");
        assert_eq!(records.len(), 2);
        for record in &records {
            match record {
                DeclarationRecord::ImportFrom { category, .. } => {
                    assert_eq!(*category, ModuleCategory::Local);
                }
                other => panic!("expected from-import record, got {other:?}"),
            }
        }
    }

    #[test]
    fn installed_distributions_categorize_as_third_party() {
        let records = extract_with_installed("import requests\n", &["requests"]);
        match &records[0] {
            DeclarationRecord::Import { category, .. } => {
                assert_eq!(*category, ModuleCategory::ThirdParty);
            }
            other => panic!("expected import record, got {other:?}"),
        }
    }

    #[test]
    fn aliases_keep_the_imported_module() {
        let records = extract_source("import numpy as np\nfrom json import dumps as to_text\n");
        match &records[0] {
            DeclarationRecord::Import { module_name, .. } => assert_eq!(module_name, "numpy"),
            other => panic!("expected import record, got {other:?}"),
        }
        match &records[1] {
            DeclarationRecord::ImportFrom { identifier, .. } => assert_eq!(identifier, "dumps"),
            other => panic!("expected from-import record, got {other:?}"),
        }
    }

    #[test]
    fn wildcard_import_records_a_star() {
        let records = extract_source("from os.path import *\n");
        match &records[0] {
            DeclarationRecord::ImportFrom {
                identifier,
                module_path,
                category,
                ..
            } => {
                assert_eq!(identifier, "*");
                assert_eq!(module_path, "os.path");
                assert_eq!(*category, ModuleCategory::Native);
            }
            other => panic!("expected from-import record, got {other:?}"),
        }
    }
}
