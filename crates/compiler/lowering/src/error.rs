//! Fatal lowering errors.
//!
//! These abort the current run. Non-fatal findings are reported as
//! diagnostics on the generation context instead.

use flatgen_decls::ArraySize;

/// Why a type reference has no name in the output schema
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeNameError {
    #[error("nested declaration #{0} can only be used directly as a field type")]
    NestedDeclaration(usize),
}

/// Errors that abort lowering
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoweringError {
    #[error(
        "field '{field}' of '{owner}' refers to nested declaration #{index}, \
         but '{owner}' has only {declared} nested declarations"
    )]
    DanglingNestedReference {
        owner: String,
        field: String,
        index: usize,
        declared: usize,
    },
    #[error("field '{field}' of '{owner}' is an array of {size} size")]
    UnsupportedArraySize {
        owner: String,
        field: String,
        size: ArraySize,
    },
    #[error("cannot name the type of field '{field}' of '{owner}': {source}")]
    UnresolvableType {
        owner: String,
        field: String,
        source: TypeNameError,
    },
}

pub type LoweringResult<T> = Result<T, LoweringError>;
