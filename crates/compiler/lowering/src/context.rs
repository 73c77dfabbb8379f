use flatgen_diagnostics::DiagnosticCollection;

use crate::UnitRegister;

/// Shared state of one translation run
///
/// Threaded by `&mut` through every lowering call. Units are appended in the
/// order they are completed, so nested units always precede their owners.
#[derive(Debug, Default)]
pub struct GenerationContext {
    pub units: UnitRegister,
    pub diagnostics: DiagnosticCollection,
}

impl GenerationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Splits the context into its register and diagnostics
    pub fn finish(self) -> (UnitRegister, DiagnosticCollection) {
        (self.units, self.diagnostics)
    }
}
