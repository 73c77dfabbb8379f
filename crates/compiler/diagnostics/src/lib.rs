mod diagnostics;
mod reporting;

pub use diagnostics::{Diagnostic, DiagnosticCode, DiagnosticCollection, DiagnosticSeverity};
pub use reporting::{build_diagnostic_message, format_diagnostics};
