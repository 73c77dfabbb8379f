//! # Structure Lowering
//!
//! Turns one aggregate declaration into a flat [`StructureDefinition`]:
//!
//! - bit-fields become a single field of their storage type, with a warning
//!   diagnostic
//! - constant-size arrays `T v[N]` become `v0 .. v{N-1}` of type `T`
//! - fields typed by a nested declaration get a synthesized type name
//!   `{owner}_{field}`; the nested declaration is lowered under that name and
//!   registered before the owner
//! - everything else keeps its name and resolved type name

use flatgen_decls::{AggregateDecl, ArraySize, Declaration, FieldDecl, NestedId, TypeRef};
use flatgen_diagnostics::Diagnostic;
use tracing::{debug, trace};

use crate::enumeration::lower_enumeration;
use crate::error::{LoweringError, LoweringResult};
use crate::type_name::resolve_type_name;
use crate::{GenerationContext, StructureDefinition, StructureField, UnitId};

/// Lowers aggregates into the register of a [`GenerationContext`]
#[derive(Debug)]
pub struct StructureLowerer<'ctx> {
    ctx: &'ctx mut GenerationContext,
}

impl<'ctx> StructureLowerer<'ctx> {
    pub fn new(ctx: &'ctx mut GenerationContext) -> Self {
        Self { ctx }
    }

    /// Lowers an aggregate under `assigned_name` and registers it
    ///
    /// Units discovered while lowering its fields are registered first.
    pub fn lower_and_register(
        &mut self,
        aggregate: &AggregateDecl,
        assigned_name: &str,
    ) -> LoweringResult<UnitId> {
        let definition = self.lower_aggregate(aggregate, assigned_name)?;
        Ok(self.ctx.units.push(definition))
    }

    /// Lowers an aggregate under `assigned_name`
    ///
    /// The returned definition is not registered; nested units found along the
    /// way are.
    pub fn lower_aggregate(
        &mut self,
        aggregate: &AggregateDecl,
        assigned_name: &str,
    ) -> LoweringResult<StructureDefinition> {
        debug!(
            "Lowering aggregate '{}' as '{}' ({} fields)",
            aggregate.display_name(),
            assigned_name,
            aggregate.fields.len()
        );

        let mut fields = Vec::with_capacity(aggregate.fields.len());
        for field in &aggregate.fields {
            fields.extend(self.lower_field(aggregate, assigned_name, field)?);
        }

        Ok(StructureDefinition {
            name: assigned_name.to_string(),
            fields,
            documentation: aggregate.documentation.clone(),
        })
    }

    /// Lowers one field of `owner`, registered as `owner_name`
    ///
    /// Returns one output field per input field, except for constant-size
    /// arrays which expand to one field per element.
    pub fn lower_field(
        &mut self,
        owner: &AggregateDecl,
        owner_name: &str,
        field: &FieldDecl,
    ) -> LoweringResult<Vec<StructureField>> {
        if let Some(width) = field.bit_width {
            let lowered = self.lower_single(owner, owner_name, field)?;
            debug!(
                "Bit-field '{}.{}' ({} bits) lowered as a plain field",
                owner_name, field.name, width
            );
            self.ctx.diagnostics.add(Diagnostic::bit_field_flattened(
                owner_name,
                &field.name,
                width,
                &lowered.type_name,
            ));
            return Ok(vec![lowered]);
        }

        if let TypeRef::Array { element, size } = &field.ty {
            return match size {
                ArraySize::Constant(len) => unroll_array(owner_name, field, element, *len),
                ArraySize::Incomplete | ArraySize::Variable => {
                    Err(LoweringError::UnsupportedArraySize {
                        owner: owner_name.to_string(),
                        field: field.name.clone(),
                        size: *size,
                    })
                }
            };
        }

        Ok(vec![self.lower_single(owner, owner_name, field)?])
    }

    /// Lowers a field that maps to exactly one output field
    fn lower_single(
        &mut self,
        owner: &AggregateDecl,
        owner_name: &str,
        field: &FieldDecl,
    ) -> LoweringResult<StructureField> {
        let type_name = match &field.ty {
            TypeRef::Nested(id) => self.lower_nested(owner, owner_name, field, *id)?,
            ty => resolve_type_name(ty).map_err(|source| LoweringError::UnresolvableType {
                owner: owner_name.to_string(),
                field: field.name.clone(),
                source,
            })?,
        };
        trace!("  {}.{}: {}", owner_name, field.name, type_name);

        Ok(StructureField::new(&field.name, type_name)
            .with_documentation(field.documentation.clone()))
    }

    /// Registers the nested declaration behind `field` and returns its name
    fn lower_nested(
        &mut self,
        owner: &AggregateDecl,
        owner_name: &str,
        field: &FieldDecl,
        id: NestedId,
    ) -> LoweringResult<String> {
        let type_name = format!("{owner_name}_{}", field.name);

        match owner.nested(id) {
            Some(Declaration::Aggregate(aggregate)) => {
                self.lower_and_register(aggregate, &type_name)?;
            }
            Some(Declaration::Enumeration(enumeration)) => {
                debug!("Lowering nested enumeration as '{}'", type_name);
                self.ctx
                    .units
                    .push(lower_enumeration(enumeration, &type_name));
            }
            None => {
                return Err(LoweringError::DanglingNestedReference {
                    owner: owner_name.to_string(),
                    field: field.name.clone(),
                    index: id.index(),
                    declared: owner.declarations.len(),
                });
            }
        }

        Ok(type_name)
    }
}

/// Expands `T name[len]` into `name0 .. name{len-1}` of type `T`
fn unroll_array(
    owner_name: &str,
    field: &FieldDecl,
    element: &TypeRef,
    len: usize,
) -> LoweringResult<Vec<StructureField>> {
    let element_type_name =
        resolve_type_name(element).map_err(|source| LoweringError::UnresolvableType {
            owner: owner_name.to_string(),
            field: field.name.clone(),
            source,
        })?;
    trace!(
        "  {}.{}: {}[{}] unrolled",
        owner_name,
        field.name,
        element_type_name,
        len
    );

    Ok((0..len)
        .map(|i| StructureField::new(format!("{}{i}", field.name), element_type_name.clone()))
        .collect())
}
