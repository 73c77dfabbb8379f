//! Entry point of a translation run: lowers every aggregate-valued top-level
//! type alias of a translation unit, in alias order.

use flatgen_decls::{AliasTarget, TranslationUnit, TypeRef};
use flatgen_diagnostics::Diagnostic;
use tracing::{debug, trace};

use crate::error::LoweringResult;
use crate::{GenerationContext, StructureLowerer};

/// Lowers all aggregate aliases of `unit` into `ctx`
///
/// Each aggregate is emitted under its alias name. Aliases that name an
/// aggregate missing from the unit are reported as info diagnostics; all
/// other non-aggregate aliases are skipped silently.
pub fn process(ctx: &mut GenerationContext, unit: &TranslationUnit) -> LoweringResult<()> {
    for alias in &unit.aliases {
        let Some(aggregate) = unit.aliased_aggregate(alias) else {
            match &alias.target {
                AliasTarget::Type(TypeRef::Named(target))
                    if !unit.declarations.iter().any(|d| d.name() == Some(target.as_str())) =>
                {
                    debug!("Alias '{}' names undefined '{}'", alias.name, target);
                    ctx.diagnostics
                        .add(Diagnostic::alias_skipped(&alias.name, target));
                }
                _ => trace!("Skipping non-aggregate alias '{}'", alias.name),
            }
            continue;
        };

        StructureLowerer::new(ctx).lower_and_register(aggregate, &alias.name)?;
    }

    debug!(
        "Translation unit lowered: {} units, {} diagnostics",
        ctx.units.len(),
        ctx.diagnostics.len()
    );
    Ok(())
}

/// Lowers `unit` into a fresh generation context
pub fn generate(unit: &TranslationUnit) -> LoweringResult<GenerationContext> {
    let mut ctx = GenerationContext::new();
    process(&mut ctx, unit)?;
    Ok(ctx)
}
