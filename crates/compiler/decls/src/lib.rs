//! # flatgen declaration tree
//!
//! Input model for the lowering stage. The header parser produces a
//! [`TranslationUnit`]; this crate owns its shape and its JSON encoding.

pub mod ast;

pub use ast::{
    AggregateDecl, AggregateKind, AliasTarget, ArraySize, Declaration, EnumerationDecl,
    EnumeratorDecl, FieldDecl, NestedId, PrimitiveType, TranslationUnit, TypeAlias, TypeRef,
};

use std::path::Path;

/// Errors raised while loading a declaration tree
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed declaration tree: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parses a declaration tree from its JSON encoding
pub fn from_json(content: &str) -> Result<TranslationUnit, LoadError> {
    Ok(serde_json::from_str(content)?)
}

/// Reads and parses a declaration tree from a JSON file
pub fn load(path: &Path) -> Result<TranslationUnit, LoadError> {
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    from_json(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_alias_to_inline_aggregate() {
        let unit = from_json(
            r#"{
                "aliases": [{
                    "name": "AVRational",
                    "target": { "aggregate": {
                        "name": "AVRational",
                        "fields": [
                            { "name": "num", "ty": { "primitive": "int" } },
                            { "name": "den", "ty": { "primitive": "int" } }
                        ]
                    }}
                }]
            }"#,
        )
        .unwrap();

        assert!(unit.declarations.is_empty());
        assert_eq!(unit.aliases.len(), 1);
        let aggregate = unit.aliased_aggregate(&unit.aliases[0]).unwrap();
        assert_eq!(aggregate.fields.len(), 2);
        assert_eq!(aggregate.kind, AggregateKind::Struct);
        assert_eq!(aggregate.fields[1].ty, TypeRef::primitive(PrimitiveType::Int));
    }

    #[test]
    fn test_parse_type_shapes() {
        let field: FieldDecl = serde_json::from_str(
            r#"{ "name": "data", "ty": { "array": {
                "element": { "primitive": "uint8" },
                "size": { "constant": 4 }
            }}}"#,
        )
        .unwrap();
        assert_eq!(field.ty, TypeRef::array(TypeRef::primitive(PrimitiveType::Uint8), 4));
        assert_eq!(field.bit_width, None);

        let field: FieldDecl = serde_json::from_str(
            r#"{ "name": "tail", "ty": { "array": {
                "element": { "primitive": "int" },
                "size": "incomplete"
            }}}"#,
        )
        .unwrap();
        assert!(matches!(
            field.ty,
            TypeRef::Array {
                size: ArraySize::Incomplete,
                ..
            }
        ));

        let field: FieldDecl = serde_json::from_str(
            r#"{ "name": "flags", "ty": { "primitive": "uint" }, "bit_width": 3 }"#,
        )
        .unwrap();
        assert_eq!(field.bit_width, Some(3));

        let ty: TypeRef = serde_json::from_str(r#"{ "pointer": { "named": "AVFrame" } }"#).unwrap();
        assert_eq!(ty, TypeRef::pointer(TypeRef::named("AVFrame")));

        let ty: TypeRef = serde_json::from_str(r#"{ "nested": 2 }"#).unwrap();
        assert_eq!(ty, TypeRef::nested(2));
    }

    #[test]
    fn test_aliased_aggregate_resolution() {
        let unit = TranslationUnit::new()
            .with_declaration(Declaration::Aggregate(
                AggregateDecl::structure("AVPacket")
                    .with_field(FieldDecl::new("pts", TypeRef::primitive(PrimitiveType::Int64))),
            ))
            .with_declaration(Declaration::Enumeration(
                EnumerationDecl::named("AVMediaType").with_member("AVMEDIA_TYPE_VIDEO", 0),
            ))
            .with_alias(TypeAlias::to_type("AVPacket", TypeRef::named("AVPacket")))
            .with_alias(TypeAlias::to_type("AVMediaType", TypeRef::named("AVMediaType")))
            .with_alias(TypeAlias::to_type(
                "AVPacketPtr",
                TypeRef::pointer(TypeRef::named("AVPacket")),
            ));

        let resolved: Vec<_> = unit
            .aliases
            .iter()
            .map(|alias| unit.aliased_aggregate(alias).map(|a| a.display_name().to_string()))
            .collect();

        assert_eq!(resolved, vec![Some("AVPacket".to_string()), None, None]);
    }

    #[test]
    fn test_forward_declaration_does_not_shadow_definition() {
        let unit = TranslationUnit::new()
            .with_declaration(Declaration::Aggregate(AggregateDecl::structure(
                "AVCodecInternal",
            )))
            .with_declaration(Declaration::Aggregate(
                AggregateDecl::structure("AVCodecInternal")
                    .with_field(FieldDecl::new("is_copy", TypeRef::primitive(PrimitiveType::Int))),
            ))
            .with_declaration(Declaration::Aggregate(AggregateDecl::structure("AVOpaque")))
            .with_alias(TypeAlias::to_type("AVCodecInternal", TypeRef::named("AVCodecInternal")))
            .with_alias(TypeAlias::to_type("AVOpaque", TypeRef::named("AVOpaque")));

        let internal = unit.aliased_aggregate(&unit.aliases[0]).unwrap();
        assert_eq!(internal.fields.len(), 1);
        assert_eq!(internal.fields[0].name, "is_copy");

        let opaque = unit.find_aggregate("AVOpaque").unwrap();
        assert!(!opaque.has_body());
        assert!(unit.find_aggregate("AVMissing").is_none());
    }

    #[test]
    fn test_malformed_document_is_reported() {
        let err = from_json(r#"{ "aliases": [{ "name": 3 }] }"#).unwrap_err();
        assert!(err.to_string().starts_with("malformed declaration tree"));
    }
}
