//! Maps type references to the names the renderer emits verbatim.

use flatgen_decls::{ArraySize, TypeRef};

use crate::error::TypeNameError;

/// Resolves the output name of a type reference
///
/// Primitives map to their canonical scalar name, pointers to `{pointee}*`,
/// and named references to the declared name. Arrays below a field's top level
/// (inner dimensions, pointees) are named `{element}[N]`, `{element}[]` for
/// incomplete and `{element}[*]` for variable sizes. Nested declarations have
/// no standalone name; the structure lowerer synthesizes one.
pub fn resolve_type_name(ty: &TypeRef) -> Result<String, TypeNameError> {
    match ty {
        TypeRef::Primitive(primitive) => Ok(primitive.name().to_string()),
        TypeRef::Pointer(pointee) => Ok(format!("{}*", resolve_type_name(pointee)?)),
        TypeRef::Named(name) => Ok(name.clone()),
        TypeRef::Nested(id) => Err(TypeNameError::NestedDeclaration(id.index())),
        TypeRef::Array { element, size } => {
            let element = resolve_type_name(element)?;
            Ok(match size {
                ArraySize::Constant(len) => format!("{element}[{len}]"),
                ArraySize::Incomplete => format!("{element}[]"),
                ArraySize::Variable => format!("{element}[*]"),
            })
        }
    }
}
