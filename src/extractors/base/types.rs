// Declaration record types for Scribe
//
// All data structures produced by extraction: the tagged record union over
// notable statements, parameter specs, function categories and the error
// type shared across builders. Records are immutable value objects built
// bottom-up; nothing mutates them after construction.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::modules::ModuleCategory;

/// Deterministic textual rendering of an expression subtree.
///
/// Structurally identical subtrees always render to the same text; the
/// string is opaque to everything downstream of the canonicalizer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalText(String);

impl CanonicalText {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for CanonicalText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for CanonicalText {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl From<&str> for CanonicalText {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

/// Structural position class of a function parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterRole {
    Positional,
    VarPositional,
    KeywordOnly,
    VarKeyword,
}

/// One aligned function parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec {
    pub name: String,
    pub annotation: Option<CanonicalText>,
    pub default: Option<CanonicalText>,
    pub role: ParameterRole,
}

/// What kind of callable a definition is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionCategory {
    Function,
    Method,
    Generator,
    Coroutine,
}

impl std::fmt::Display for FunctionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FunctionCategory::Function => write!(f, "function"),
            FunctionCategory::Method => write!(f, "method"),
            FunctionCategory::Generator => write!(f, "generator"),
            FunctionCategory::Coroutine => write!(f, "coroutine"),
        }
    }
}

/// A function or method definition.
///
/// Shared between top-level `FunctionDef` records and the method list of a
/// `ClassDef`; a method never appears in both places.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionRecord {
    pub name: String,
    pub category: FunctionCategory,
    pub docstring: Option<String>,
    pub decorators: Vec<CanonicalText>,
    pub return_type: Option<CanonicalText>,
    pub parameters: Vec<ParameterSpec>,
    pub source_text: String,
}

/// A normalized, structured summary of one syntactic statement of interest.
///
/// Every variant carries `source_text`, the verbatim snippet the record was
/// derived from; the structured fields are a view of that text, never a
/// substitute for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeclarationRecord {
    Import {
        module_name: String,
        path: Option<String>,
        category: ModuleCategory,
        source_text: String,
    },
    ImportFrom {
        identifier: String,
        module_path: String,
        category: ModuleCategory,
        source_text: String,
    },
    Assign {
        target_names: Vec<String>,
        value: CanonicalText,
        source_text: String,
    },
    AnnAssign {
        name: String,
        annotation: CanonicalText,
        value: Option<CanonicalText>,
        source_text: String,
    },
    FunctionDef(FunctionRecord),
    ClassDef {
        name: String,
        docstring: Option<String>,
        base_classes: Vec<CanonicalText>,
        decorators: Vec<CanonicalText>,
        keyword_args: CanonicalText,
        methods: Vec<FunctionRecord>,
        source_text: String,
    },
    Assert {
        test: CanonicalText,
        message: Option<CanonicalText>,
        source_text: String,
    },
}

/// Errors surfaced by the extraction engine.
///
/// Unsupported node kinds and filter-policy rejections are not errors; they
/// simply produce no record.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// More defaults were supplied than parameters to bind them to
    #[error("{section} default list overflow: {supplied} defaults for {declared} parameters")]
    DefaultOverflow {
        section: &'static str,
        supplied: usize,
        declared: usize,
    },
    #[error("tree-sitter produced no syntax tree for {path}")]
    Parse { path: String },
}
