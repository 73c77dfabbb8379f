//! flatgen library
//!
//! Ties the declaration loader, the lowering stage and the output emitters
//! together. The `flatgen` binary is a thin shell over [`translate_file`] and
//! [`emit`].

use std::path::Path;

pub use flatgen_decls::{LoadError, TranslationUnit};
use flatgen_diagnostics::Diagnostic;
pub use flatgen_diagnostics::{format_diagnostics, DiagnosticCollection, DiagnosticSeverity};
pub use flatgen_lowering::{LoweringError, PrettyPrint, Unit, UnitRegister};
pub use flatgen_project::EmitFormat;
use tracing::{debug, info};

/// Result type for translation operations
pub type Result<T> = std::result::Result<T, TranslatorError>;

/// Errors that can occur during translation
#[derive(Debug, thiserror::Error)]
pub enum TranslatorError {
    /// The declaration tree could not be read or parsed
    #[error(transparent)]
    Load(#[from] LoadError),
    /// Lowering hit a fatal condition
    #[error(transparent)]
    Lowering(#[from] LoweringError),
    /// Warnings were produced while warnings are denied
    #[error("{} warning(s) denied", .0.errors().len())]
    WarningsDenied(DiagnosticCollection),
    #[error("failed to serialize units: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Options for translation
#[derive(Debug, Clone, Default)]
pub struct TranslatorOptions {
    /// Treat warning diagnostics as fatal
    pub deny_warnings: bool,
}

/// Translation output including the register and any diagnostics
#[derive(Debug)]
pub struct TranslationOutput {
    /// The lowered units, in dependency order
    pub units: UnitRegister,
    /// Fidelity gaps and other findings
    pub diagnostics: DiagnosticCollection,
}

/// Translates a declaration tree into an ordered unit register
///
/// # Arguments
/// * `unit` - The declaration tree to lower
/// * `options` - Translation options
///
/// # Returns
/// * `Ok(TranslationOutput)` - The register with any non-fatal diagnostics,
///   including a warning per field that embeds a unit emitted after it
/// * `Err(TranslatorError)` - Lowering failed, or warnings were produced with
///   `deny_warnings` set
pub fn translate(unit: &TranslationUnit, options: &TranslatorOptions) -> Result<TranslationOutput> {
    let (units, mut diagnostics) = flatgen_lowering::generate(unit)?.finish();

    for reference in units.forward_references() {
        debug!("{}", reference);
        diagnostics.add(Diagnostic::forward_reference(
            reference.structure,
            reference.field,
            reference.target,
            reference.position.index(),
            reference.target_position.index(),
        ));
    }

    if options.deny_warnings {
        diagnostics.deny_warnings();
        if diagnostics.has_errors() {
            return Err(TranslatorError::WarningsDenied(diagnostics));
        }
    }

    info!(
        "Translated {} aliases into {} units",
        unit.aliases.len(),
        units.len()
    );
    Ok(TranslationOutput { units, diagnostics })
}

/// Reads a declaration tree from `path` and translates it
pub fn translate_file(path: &Path, options: &TranslatorOptions) -> Result<TranslationOutput> {
    debug!("Loading declaration tree from {}", path.display());
    let unit = flatgen_decls::load(path)?;
    translate(&unit, options)
}

/// Renders the register in the requested format
///
/// Both formats end with a newline, except for an empty listing.
pub fn emit(units: &UnitRegister, format: EmitFormat) -> Result<String> {
    match format {
        EmitFormat::Listing => Ok(units.pretty_print(0)),
        EmitFormat::Json => {
            let mut json = serde_json::to_string_pretty(units)?;
            json.push('\n');
            Ok(json)
        }
    }
}

#[cfg(test)]
mod tests {
    use flatgen_decls::{AggregateDecl, Declaration, FieldDecl, PrimitiveType, TypeAlias, TypeRef};
    use flatgen_diagnostics::DiagnosticCode;

    use super::*;

    fn bit_field_unit() -> TranslationUnit {
        TranslationUnit::new().with_alias(TypeAlias::to_aggregate(
            "AVFlags",
            AggregateDecl::anonymous().with_field(
                FieldDecl::new("keyframe", TypeRef::primitive(PrimitiveType::Uint))
                    .with_bit_width(1),
            ),
        ))
    }

    #[test]
    fn test_translate_collects_warnings() {
        let output = translate(&bit_field_unit(), &TranslatorOptions::default()).unwrap();
        assert_eq!(output.units.len(), 1);
        assert_eq!(output.diagnostics.warnings().len(), 1);
    }

    #[test]
    fn test_deny_warnings() {
        let options = TranslatorOptions {
            deny_warnings: true,
        };
        let err = translate(&bit_field_unit(), &options).unwrap_err();
        assert_eq!(err.to_string(), "1 warning(s) denied");
        let TranslatorError::WarningsDenied(diagnostics) = err else {
            panic!("expected denied warnings, got {err:?}");
        };
        assert_eq!(diagnostics.errors()[0].code, DiagnosticCode::BitFieldFlattened);
    }

    #[test]
    fn test_lowering_errors_propagate() {
        let unit = TranslationUnit::new().with_alias(TypeAlias::to_aggregate(
            "Broken",
            AggregateDecl::anonymous().with_field(FieldDecl::new("inner", TypeRef::nested(3))),
        ));
        let err = translate(&unit, &TranslatorOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            TranslatorError::Lowering(LoweringError::DanglingNestedReference { .. })
        ));
    }

    /// `AVStream` embeds `AVRational` by value, but its alias comes first
    fn late_typedef_unit() -> TranslationUnit {
        TranslationUnit::new()
            .with_declaration(Declaration::Aggregate(
                AggregateDecl::structure("AVRational")
                    .with_field(FieldDecl::new("num", TypeRef::primitive(PrimitiveType::Int))),
            ))
            .with_alias(TypeAlias::to_aggregate(
                "AVStream",
                AggregateDecl::structure("AVStream")
                    .with_field(FieldDecl::new("tb", TypeRef::named("AVRational"))),
            ))
            .with_alias(TypeAlias::to_type("AVRational", TypeRef::named("AVRational")))
    }

    #[test]
    fn test_late_typedef_is_emitted_in_alias_order() {
        let output = translate(&late_typedef_unit(), &TranslatorOptions::default()).unwrap();

        let names: Vec<_> = output.units.iter().map(Unit::name).collect();
        assert_eq!(names, vec!["AVStream", "AVRational"]);

        let warnings = output.diagnostics.warnings();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code, DiagnosticCode::ForwardReference);
        assert_eq!(warnings[0].location.as_deref(), Some("AVStream.tb"));
    }

    #[test]
    fn test_late_typedef_with_denied_warnings() {
        let options = TranslatorOptions {
            deny_warnings: true,
        };
        let err = translate(&late_typedef_unit(), &options).unwrap_err();
        assert!(matches!(err, TranslatorError::WarningsDenied(_)));
    }

    #[test]
    fn test_emit_listing() {
        let output = translate(&bit_field_unit(), &TranslatorOptions::default()).unwrap();
        assert_eq!(
            emit(&output.units, EmitFormat::Listing).unwrap(),
            "struct AVFlags {\n  keyframe: uint\n}\n"
        );
    }

    #[test]
    fn test_emit_json() {
        let output = translate(&bit_field_unit(), &TranslatorOptions::default()).unwrap();
        let json = emit(&output.units, EmitFormat::Json).unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["kind"], "structure");
        assert_eq!(value[0]["name"], "AVFlags");
        assert_eq!(value[0]["fields"][0]["type_name"], "uint");
        assert!(json.ends_with('\n'));
    }

    #[test]
    fn test_emit_empty_register() {
        let units = UnitRegister::new();
        assert_eq!(emit(&units, EmitFormat::Listing).unwrap(), "");
        assert_eq!(emit(&units, EmitFormat::Json).unwrap(), "[]\n");
    }
}
