//! # Unit Register
//!
//! The ordered, append-only collection of every unit produced during one
//! translation run. Order is part of the output contract: a unit is always
//! registered before any structure that embeds it by value.

use std::fmt;

use index_vec::IndexVec;
use rustc_hash::FxHashMap;
use serde::{Serialize, Serializer};

use crate::{EnumerationDefinition, PrettyPrint, StructureDefinition, Unit, UnitId};

/// A field naming a unit that is not registered before the structure holding it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForwardReference<'a> {
    pub structure: &'a str,
    pub field: &'a str,
    pub target: &'a str,
    /// Position of the structure holding the field
    pub position: UnitId,
    /// First position of the referenced unit
    pub target_position: UnitId,
}

impl fmt::Display for ForwardReference<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Field '{}.{}' refers to '{}' (unit #{}), which is not registered before unit #{}",
            self.structure,
            self.field,
            self.target,
            self.target_position.index(),
            self.position.index()
        )
    }
}

/// Append-only, ordered sequence of lowered units
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitRegister {
    units: IndexVec<UnitId, Unit>,
}

impl UnitRegister {
    /// Creates an empty register
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a unit and returns its position
    pub fn push(&mut self, unit: impl Into<Unit>) -> UnitId {
        self.units.push(unit.into())
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Iterates units in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter()
    }

    /// Iterates only the structure definitions, in registration order
    pub fn structures(&self) -> impl Iterator<Item = &StructureDefinition> {
        self.units.iter().filter_map(Unit::as_structure)
    }

    /// Iterates only the enumeration definitions, in registration order
    pub fn enumerations(&self) -> impl Iterator<Item = &EnumerationDefinition> {
        self.units.iter().filter_map(Unit::as_enumeration)
    }

    /// Fields that name a unit registered at or after their own structure
    ///
    /// A name registered more than once is checked against its first
    /// registration.
    pub fn forward_references(&self) -> Vec<ForwardReference<'_>> {
        let mut first_seen: FxHashMap<&str, UnitId> = FxHashMap::default();
        for (id, unit) in self.units.iter_enumerated() {
            first_seen.entry(unit.name()).or_insert(id);
        }

        let mut references = Vec::new();
        for (id, unit) in self.units.iter_enumerated() {
            let Unit::Structure(structure) = unit else {
                continue;
            };
            for field in &structure.fields {
                let Some(&target) = first_seen.get(field.type_name.as_str()) else {
                    continue;
                };
                if target >= id {
                    references.push(ForwardReference {
                        structure: &structure.name,
                        field: &field.name,
                        target: &field.type_name,
                        position: id,
                        target_position: target,
                    });
                }
            }
        }
        references
    }

    /// Validates the register ordering
    ///
    /// Checks that every field whose type names a registered unit refers to a
    /// unit registered strictly earlier than the structure holding the field.
    pub fn validate(&self) -> Result<(), String> {
        match self.forward_references().first() {
            Some(reference) => Err(reference.to_string()),
            None => Ok(()),
        }
    }
}

impl IntoIterator for UnitRegister {
    type Item = Unit;
    type IntoIter = std::vec::IntoIter<Unit>;

    fn into_iter(self) -> Self::IntoIter {
        self.units.into_iter()
    }
}

impl<'a> IntoIterator for &'a UnitRegister {
    type Item = &'a Unit;
    type IntoIter = std::slice::Iter<'a, Unit>;

    fn into_iter(self) -> Self::IntoIter {
        self.units.iter()
    }
}

impl Serialize for UnitRegister {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.units.iter())
    }
}

impl PrettyPrint for UnitRegister {
    fn pretty_print(&self, indent: usize) -> String {
        self.units
            .iter()
            .map(|unit| unit.pretty_print(indent))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StructureField;

    fn structure(name: &str, fields: &[(&str, &str)]) -> StructureDefinition {
        StructureDefinition {
            name: name.to_string(),
            fields: fields
                .iter()
                .map(|(name, ty)| StructureField::new(*name, *ty))
                .collect(),
            documentation: None,
        }
    }

    #[test]
    fn test_push_preserves_order() {
        let mut register = UnitRegister::new();
        let first = register.push(structure("A", &[]));
        let second = register.push(structure("B", &[]));

        assert_eq!(first.index(), 0);
        assert_eq!(second.index(), 1);
        let names: Vec<_> = register.iter().map(Unit::name).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn test_validate_accepts_backward_references() {
        let mut register = UnitRegister::new();
        register.push(structure("Foo_bar", &[("x", "int")]));
        register.push(structure("Foo", &[("bar", "Foo_bar"), ("next", "Foo*")]));

        assert_eq!(register.validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_forward_references() {
        let mut register = UnitRegister::new();
        register.push(structure("Foo", &[("bar", "Foo_bar")]));
        register.push(structure("Foo_bar", &[("x", "int")]));

        let err = register.validate().unwrap_err();
        assert!(err.contains("'Foo.bar'"), "{err}");
        assert!(err.contains("unit #1"), "{err}");
    }

    #[test]
    fn test_forward_references_lists_every_violation() {
        let mut register = UnitRegister::new();
        register.push(structure("AVStream", &[("tb", "AVRational"), ("codec", "AVCodec*")]));
        register.push(structure("AVRational", &[("num", "int")]));
        register.push(structure("Node", &[("inner", "Node"), ("rate", "AVRational")]));

        let references = register.forward_references();
        assert_eq!(references.len(), 2);
        assert_eq!(
            (references[0].structure, references[0].field, references[0].target),
            ("AVStream", "tb", "AVRational")
        );
        assert_eq!(
            (references[0].position.index(), references[0].target_position.index()),
            (0, 1)
        );
        assert_eq!((references[1].structure, references[1].field), ("Node", "inner"));
    }

    #[test]
    fn test_validate_rejects_self_containment() {
        let mut register = UnitRegister::new();
        register.push(structure("Node", &[("inner", "Node")]));

        assert!(register.validate().is_err());
    }
}
