//! # Output Definitions
//!
//! The flat, name-resolved units produced by lowering. Every unit stands on its
//! own: nested aggregates have been given names and hoisted out, and fixed
//! arrays have been unrolled into scalar fields.

use serde::Serialize;

use crate::{indent_str, PrettyPrint};

/// A single field of a lowered structure
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct StructureField {
    pub name: String,
    /// Primitive name, pointer form, or the name of another unit
    pub type_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
}

impl StructureField {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            documentation: None,
        }
    }

    pub fn with_documentation(mut self, documentation: Option<String>) -> Self {
        self.documentation = documentation;
        self
    }
}

/// A lowered aggregate
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct StructureDefinition {
    pub name: String,
    pub fields: Vec<StructureField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
}

impl StructureDefinition {
    /// Gets a field by name
    pub fn field(&self, name: &str) -> Option<&StructureField> {
        self.fields.iter().find(|field| field.name == name)
    }
}

/// A member of a lowered enumeration
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct EnumerationItem {
    pub name: String,
    pub value: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
}

/// A lowered enumeration
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct EnumerationDefinition {
    pub name: String,
    pub members: Vec<EnumerationItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
}

/// One entry of the unit register
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Unit {
    Structure(StructureDefinition),
    Enumeration(EnumerationDefinition),
}

impl Unit {
    pub fn name(&self) -> &str {
        match self {
            Self::Structure(structure) => &structure.name,
            Self::Enumeration(enumeration) => &enumeration.name,
        }
    }

    pub const fn as_structure(&self) -> Option<&StructureDefinition> {
        match self {
            Self::Structure(structure) => Some(structure),
            Self::Enumeration(_) => None,
        }
    }

    pub const fn as_enumeration(&self) -> Option<&EnumerationDefinition> {
        match self {
            Self::Enumeration(enumeration) => Some(enumeration),
            Self::Structure(_) => None,
        }
    }
}

impl From<StructureDefinition> for Unit {
    fn from(structure: StructureDefinition) -> Self {
        Self::Structure(structure)
    }
}

impl From<EnumerationDefinition> for Unit {
    fn from(enumeration: EnumerationDefinition) -> Self {
        Self::Enumeration(enumeration)
    }
}

fn push_documentation(result: &mut String, indent: &str, documentation: Option<&str>) {
    if let Some(documentation) = documentation {
        for line in documentation.lines() {
            result.push_str(&format!("{indent}/// {line}\n"));
        }
    }
}

impl PrettyPrint for StructureDefinition {
    fn pretty_print(&self, indent: usize) -> String {
        let base_indent = indent_str(indent);
        let field_indent = indent_str(indent + 1);
        let mut result = String::new();

        push_documentation(&mut result, &base_indent, self.documentation.as_deref());
        result.push_str(&format!("{base_indent}struct {} {{\n", self.name));
        for field in &self.fields {
            push_documentation(&mut result, &field_indent, field.documentation.as_deref());
            result.push_str(&format!(
                "{field_indent}{}: {}\n",
                field.name, field.type_name
            ));
        }
        result.push_str(&format!("{base_indent}}}\n"));
        result
    }
}

impl PrettyPrint for EnumerationDefinition {
    fn pretty_print(&self, indent: usize) -> String {
        let base_indent = indent_str(indent);
        let member_indent = indent_str(indent + 1);
        let mut result = String::new();

        push_documentation(&mut result, &base_indent, self.documentation.as_deref());
        result.push_str(&format!("{base_indent}enum {} {{\n", self.name));
        for member in &self.members {
            push_documentation(&mut result, &member_indent, member.documentation.as_deref());
            result.push_str(&format!(
                "{member_indent}{} = {}\n",
                member.name, member.value
            ));
        }
        result.push_str(&format!("{base_indent}}}\n"));
        result
    }
}

impl PrettyPrint for Unit {
    fn pretty_print(&self, indent: usize) -> String {
        match self {
            Self::Structure(structure) => structure.pretty_print(indent),
            Self::Enumeration(enumeration) => enumeration.pretty_print(indent),
        }
    }
}
