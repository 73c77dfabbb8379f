//! # flatgen lowering
//!
//! This crate lowers a hierarchical declaration tree (structs and unions with
//! nested anonymous aggregates, enumerations and fixed-size arrays) into a
//! flat, ordered register of independent definitions that a target language
//! without nested aggregate types or fixed-array members can express.
//!
//! ## Architecture
//!
//! ```text
//! TranslationUnit ── driver::process ──> StructureLowerer ──> GenerationContext
//!   aliases                                lower_aggregate       units: UnitRegister
//!   declarations                           lower_field           diagnostics
//!                                           ├─ resolve_type_name
//!                                           └─ lower_enumeration
//! ```
//!
//! ## Ordering
//!
//! Lowering a field may register units as a side effect (nested aggregates and
//! enumerations). The owning structure is registered only once all its fields
//! are lowered, so every unit appears before the structures that embed it.
//!
//! ## Error Handling
//!
//! - Bit-fields are lowered to a plain field of their storage type and reported
//!   as a warning diagnostic; lowering continues.
//! - Dangling nested references, non-constant array sizes and unnameable
//!   types abort the run with a [`LoweringError`].

pub use context::GenerationContext;
pub use definition::{
    EnumerationDefinition, EnumerationItem, StructureDefinition, StructureField, Unit,
};
pub use driver::{generate, process};
pub use enumeration::lower_enumeration;
pub use error::{LoweringError, LoweringResult, TypeNameError};
pub use register::{ForwardReference, UnitRegister};
pub use structure::StructureLowerer;
pub use type_name::resolve_type_name;

pub mod context;
pub mod definition;
pub mod driver;
pub mod enumeration;
pub mod error;
pub mod register;
pub mod structure;
pub mod type_name;


index_vec::define_index_type! {
    /// Position of a unit within the register
    pub struct UnitId = usize;
}

/// Trait for pretty-printing lowered units
pub trait PrettyPrint {
    fn pretty_print(&self, indent: usize) -> String;
}

/// Helper function to create indentation
pub(crate) fn indent_str(level: usize) -> String {
    "  ".repeat(level)
}
