// Base extraction layer shared by the Python declaration builders
//
// - types.rs: the record union, parameter specs and the error type
// - extractor.rs: source-text ownership and low-level node helpers

pub mod extractor;
pub mod types;

pub use extractor::BaseExtractor;
pub use types::{
    CanonicalText, DeclarationRecord, ExtractError, FunctionCategory, FunctionRecord,
    ParameterRole, ParameterSpec,
};
