//! Scribe's extraction module
//!
//! Tree-sitter based extraction of notable Python declarations. The
//! sub-modules split the work the way the pipeline consumes it:
//!
//! - `base` - record types, errors and source-text plumbing
//! - `python` - the statement dispatcher and per-kind record builders

pub mod base;
pub mod python;

// Re-export the public API
pub use base::{
    CanonicalText, DeclarationRecord, ExtractError, FunctionCategory, FunctionRecord,
    ParameterRole, ParameterSpec,
};
pub use python::PythonExtractor;
