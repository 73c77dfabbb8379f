//! # Diagnostic Reporting
//!
//! Formatting helpers used by the command-line driver.

use crate::Diagnostic;

/// Build a formatted message for a lowering diagnostic
pub fn build_diagnostic_message(diagnostic: &Diagnostic) -> String {
    let code: u32 = diagnostic.code.into();
    let mut message = format!("{}[F{code:04}]: {}", diagnostic.severity, diagnostic.message);
    if let Some(location) = &diagnostic.location {
        message.push_str(&format!("\n  --> {location}"));
    }
    for note in &diagnostic.notes {
        message.push_str(&format!("\n  = note: {note}"));
    }
    message
}

/// Formats a list of diagnostics, one block per diagnostic
pub fn format_diagnostics<'a>(diagnostics: impl IntoIterator<Item = &'a Diagnostic>) -> String {
    diagnostics
        .into_iter()
        .map(build_diagnostic_message)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DiagnosticCollection;

    #[test]
    fn test_build_message() {
        let diag = Diagnostic::bit_field_flattened("AVFrame", "key_frame", 1, "int");
        assert_eq!(
            build_diagnostic_message(&diag),
            "warning[F1001]: Bit-field 'key_frame' (1 bits) lowered as a plain 'int' field; \
             width and offset are not preserved\n  --> AVFrame.key_frame"
        );
    }

    #[test]
    fn test_notes_are_rendered() {
        let mut collection =
            DiagnosticCollection::from(vec![Diagnostic::bit_field_flattened("X", "y", 2, "int")]);
        collection.deny_warnings();
        let message = build_diagnostic_message(&collection.all()[0]);
        assert!(message.starts_with("error[F1001]"));
        assert!(message.ends_with("  --> X.y\n  = note: warnings are denied for this run"));
    }
}
