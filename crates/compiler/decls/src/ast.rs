//! # Declaration Tree
//!
//! This module contains the read-only declaration tree produced by the header
//! parser: top-level type aliases, aggregate (struct/union) declarations with
//! their fields and lexically nested declarations, and enumerations.
//!
//! The tree is deserializable from JSON so the parser can run as a separate
//! process and hand its output over as a document.

use serde::{Deserialize, Serialize};

/// Scalar types known to the native side.
///
/// The serialized form of each variant is also its canonical output name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveType {
    Void,
    Bool,
    Char,
    Int8,
    Uint8,
    Int16,
    Uint16,
    Int,
    Uint,
    Long,
    Ulong,
    Int64,
    Uint64,
    Float,
    Double,
}

impl PrimitiveType {
    /// Canonical scalar name used in the output schema
    pub const fn name(self) -> &'static str {
        match self {
            Self::Void => "void",
            Self::Bool => "bool",
            Self::Char => "char",
            Self::Int8 => "int8",
            Self::Uint8 => "uint8",
            Self::Int16 => "int16",
            Self::Uint16 => "uint16",
            Self::Int => "int",
            Self::Uint => "uint",
            Self::Long => "long",
            Self::Ulong => "ulong",
            Self::Int64 => "int64",
            Self::Uint64 => "uint64",
            Self::Float => "float",
            Self::Double => "double",
        }
    }
}

impl std::fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Size of a fixed array as reported by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArraySize {
    /// Compile-time constant size (e.g., `uint8_t data[4]`)
    Constant(usize),
    /// Flexible array member or unsized declaration (e.g., `int tail[]`)
    Incomplete,
    /// Size given by a non-constant expression
    Variable,
}

impl std::fmt::Display for ArraySize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Constant(size) => write!(f, "{size}"),
            Self::Incomplete => write!(f, "incomplete"),
            Self::Variable => write!(f, "variable"),
        }
    }
}

/// Index of a declaration inside its owning aggregate's `declarations`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NestedId(pub usize);

impl NestedId {
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Reference to a type, as written at a field or alias site.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeRef {
    /// A scalar (e.g., `int`, `uint8_t`)
    Primitive(PrimitiveType),
    /// A pointer to another type (e.g., `AVFrame *`)
    Pointer(Box<TypeRef>),
    /// A fixed array (e.g., `int64_t pts[8]`)
    Array {
        element: Box<TypeRef>,
        size: ArraySize,
    },
    /// A declaration lexically nested in the owning aggregate
    Nested(NestedId),
    /// A named aggregate or enumeration declared elsewhere
    Named(String),
}

impl TypeRef {
    pub const fn primitive(ty: PrimitiveType) -> Self {
        Self::Primitive(ty)
    }

    pub fn pointer(pointee: Self) -> Self {
        Self::Pointer(Box::new(pointee))
    }

    pub fn array(element: Self, size: usize) -> Self {
        Self::Array {
            element: Box::new(element),
            size: ArraySize::Constant(size),
        }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    pub const fn nested(index: usize) -> Self {
        Self::Nested(NestedId(index))
    }
}

/// Whether an aggregate was declared as a `struct` or a `union`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregateKind {
    #[default]
    Struct,
    Union,
}

/// A field of an aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldDecl {
    pub name: String,
    pub ty: TypeRef,
    /// Declared width in bits; present only for bit-fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bit_width: Option<u32>,
    /// Brief documentation attached to the field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
}

impl FieldDecl {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            bit_width: None,
            documentation: None,
        }
    }

    /// Marks this field as a bit-field of the given width
    pub const fn with_bit_width(mut self, width: u32) -> Self {
        self.bit_width = Some(width);
        self
    }

    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }
}

/// A struct or union declaration.
///
/// Nested declarations are owned by the aggregate they are written in and are
/// referenced from its fields through [`TypeRef::Nested`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AggregateDecl {
    /// `None` for anonymous aggregates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub kind: AggregateKind,
    #[serde(default)]
    pub fields: Vec<FieldDecl>,
    #[serde(default)]
    pub declarations: Vec<Declaration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
}

impl AggregateDecl {
    /// Creates a named struct declaration
    pub fn structure(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Creates an anonymous struct declaration
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Creates an anonymous union declaration
    pub fn anonymous_union() -> Self {
        Self {
            kind: AggregateKind::Union,
            ..Self::default()
        }
    }

    pub fn with_field(mut self, field: FieldDecl) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_declaration(mut self, declaration: Declaration) -> Self {
        self.declarations.push(declaration);
        self
    }

    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }

    /// Gets a lexically nested declaration by id
    pub fn nested(&self, id: NestedId) -> Option<&Declaration> {
        self.declarations.get(id.index())
    }

    /// Name of the aggregate, or `<anonymous>` for display purposes
    /// Whether this declares any members, as opposed to `struct X;`
    pub fn has_body(&self) -> bool {
        !self.fields.is_empty() || !self.declarations.is_empty()
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<anonymous>")
    }
}

/// A member of an enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnumeratorDecl {
    pub name: String,
    pub value: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
}

/// An enumeration declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnumerationDecl {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub members: Vec<EnumeratorDecl>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
}

impl EnumerationDecl {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_member(mut self, name: impl Into<String>, value: i64) -> Self {
        self.members.push(EnumeratorDecl {
            name: name.into(),
            value,
            documentation: None,
        });
        self
    }
}

/// A declaration that can appear at top level or nested in an aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Declaration {
    Aggregate(AggregateDecl),
    Enumeration(EnumerationDecl),
}

impl Declaration {
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Aggregate(aggregate) => aggregate.name.as_deref(),
            Self::Enumeration(enumeration) => enumeration.name.as_deref(),
        }
    }
}

/// What a type alias is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AliasTarget {
    /// `typedef struct { ... } Name;`
    Aggregate(AggregateDecl),
    /// `typedef <type> Name;`
    Type(TypeRef),
}

/// A top-level `typedef`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeAlias {
    pub name: String,
    pub target: AliasTarget,
}

impl TypeAlias {
    pub fn new(name: impl Into<String>, target: AliasTarget) -> Self {
        Self {
            name: name.into(),
            target,
        }
    }

    /// Alias bound to an inline aggregate
    pub fn to_aggregate(name: impl Into<String>, aggregate: AggregateDecl) -> Self {
        Self::new(name, AliasTarget::Aggregate(aggregate))
    }

    /// Alias bound to a type reference
    pub fn to_type(name: impl Into<String>, ty: TypeRef) -> Self {
        Self::new(name, AliasTarget::Type(ty))
    }
}

/// The parsed contents of one or more headers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TranslationUnit {
    /// Top-level declarations, in source order
    #[serde(default)]
    pub declarations: Vec<Declaration>,
    /// Top-level type aliases, in source order
    #[serde(default)]
    pub aliases: Vec<TypeAlias>,
}

impl TranslationUnit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_declaration(mut self, declaration: Declaration) -> Self {
        self.declarations.push(declaration);
        self
    }

    pub fn with_alias(mut self, alias: TypeAlias) -> Self {
        self.aliases.push(alias);
        self
    }

    /// Looks up a top-level aggregate by its declared name
    ///
    /// A definition with a body wins over forward declarations of the same
    /// name; if there are only forward declarations, the first one is returned.
    pub fn find_aggregate(&self, name: &str) -> Option<&AggregateDecl> {
        let mut candidates = self
            .declarations
            .iter()
            .filter_map(|declaration| match declaration {
                Declaration::Aggregate(aggregate) if aggregate.name.as_deref() == Some(name) => {
                    Some(aggregate)
                }
                _ => None,
            });
        let first = candidates.next()?;
        if first.has_body() {
            return Some(first);
        }
        Some(candidates.find(|aggregate| aggregate.has_body()).unwrap_or(first))
    }

    /// Resolves the aggregate an alias is bound to, if any
    ///
    /// Only inline aggregates and direct `Named` references to a top-level
    /// aggregate count; pointers, primitives and arrays do not.
    pub fn aliased_aggregate<'a>(&'a self, alias: &'a TypeAlias) -> Option<&'a AggregateDecl> {
        match &alias.target {
            AliasTarget::Aggregate(aggregate) => Some(aggregate),
            AliasTarget::Type(TypeRef::Named(name)) => self.find_aggregate(name),
            AliasTarget::Type(_) => None,
        }
    }
}
