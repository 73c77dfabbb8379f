//! # Diagnostic System for Lowering
//!
//! This module provides the diagnostic infrastructure for reporting fidelity
//! gaps and other non-fatal findings while lowering a declaration tree.
//! Fatal conditions are not diagnostics; they abort the run as errors.

use serde::Serialize;
use std::fmt;

/// A diagnostic message produced during lowering
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Diagnostic {
    pub severity: DiagnosticSeverity,
    pub code: DiagnosticCode,
    pub message: String,
    /// Declaration path this diagnostic applies to (e.g. `AVPacket.flags`)
    pub location: Option<String>,
    /// Additional notes
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Error,
    Warning,
    Info,
    Hint,
}

impl fmt::Display for DiagnosticSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
            Self::Info => write!(f, "info"),
            Self::Hint => write!(f, "hint"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DiagnosticCode {
    // Fidelity gaps (1000-1999)
    BitFieldFlattened,

    // Translation notes (2000-2999)
    AliasSkipped,

    // Output ordering (3000-3999)
    ForwardReference,
}

impl From<DiagnosticCode> for u32 {
    fn from(code: DiagnosticCode) -> Self {
        match code {
            DiagnosticCode::BitFieldFlattened => 1001,
            DiagnosticCode::AliasSkipped => 2001,
            DiagnosticCode::ForwardReference => 3001,
        }
    }
}

impl Diagnostic {
    /// Create a warning diagnostic
    pub fn warning(code: DiagnosticCode, message: String) -> Self {
        Self::new(DiagnosticSeverity::Warning, code, message)
    }

    /// Create an info diagnostic
    pub fn info(code: DiagnosticCode, message: String) -> Self {
        Self::new(DiagnosticSeverity::Info, code, message)
    }

    const fn new(severity: DiagnosticSeverity, code: DiagnosticCode, message: String) -> Self {
        Self {
            severity,
            code,
            message,
            location: None,
            notes: Vec::new(),
        }
    }

    /// Attach the declaration path this diagnostic refers to
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Bit-field lowered to a plain field of its storage type
    pub fn bit_field_flattened(owner: &str, field: &str, width: u32, storage: &str) -> Self {
        Self::warning(
            DiagnosticCode::BitFieldFlattened,
            format!(
                "Bit-field '{field}' ({width} bits) lowered as a plain '{storage}' field; \
                 width and offset are not preserved"
            ),
        )
        .with_location(format!("{owner}.{field}"))
    }

    /// Type alias naming a type that has no definition in the translation unit
    pub fn alias_skipped(alias: &str, target: &str) -> Self {
        Self::info(
            DiagnosticCode::AliasSkipped,
            format!("Type alias '{alias}' names '{target}', which is not defined here; skipped"),
        )
        .with_location(alias)
    }

    /// Field embedding a definition that is emitted after its own structure
    pub fn forward_reference(
        structure: &str,
        field: &str,
        target: &str,
        position: usize,
        target_position: usize,
    ) -> Self {
        Self::warning(
            DiagnosticCode::ForwardReference,
            format!("Field '{field}' of '{structure}' uses '{target}', which is emitted after it"),
        )
        .with_location(format!("{structure}.{field}"))
        .with_note(format!(
            "'{structure}' is unit #{position}, '{target}' is unit #{target_position}"
        ))
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)?;
        if let Some(location) = &self.location {
            write!(f, " (at {location})")?;
        }
        for note in &self.notes {
            write!(f, "\n  note: {note}")?;
        }
        Ok(())
    }
}

/// Collection of diagnostics from one translation run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DiagnosticCollection {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic to the collection
    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Get all diagnostics in the order they were reported
    pub fn all(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Get only error diagnostics
    pub fn errors(&self) -> Vec<&Diagnostic> {
        self.with_severity(DiagnosticSeverity::Error)
    }

    /// Get only warning diagnostics
    pub fn warnings(&self) -> Vec<&Diagnostic> {
        self.with_severity(DiagnosticSeverity::Warning)
    }

    fn with_severity(&self, severity: DiagnosticSeverity) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .collect()
    }

    /// Check if there are any errors
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == DiagnosticSeverity::Error)
    }

    /// Promote every warning to an error
    pub fn deny_warnings(&mut self) {
        for diagnostic in &mut self.diagnostics {
            if diagnostic.severity == DiagnosticSeverity::Warning {
                diagnostic.severity = DiagnosticSeverity::Error;
                diagnostic.notes.push("warnings are denied for this run".to_string());
            }
        }
    }

    /// Get the total number of diagnostics
    pub const fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Check if the collection is empty
    pub const fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Get summary statistics
    pub fn summary(&self) -> String {
        let errors = self.errors().len();
        let warnings = self.warnings().len();

        if self.diagnostics.is_empty() {
            "No issues found".to_string()
        } else {
            format!("{errors} errors, {warnings} warnings")
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.diagnostics.iter()
    }
}

impl From<Vec<Diagnostic>> for DiagnosticCollection {
    fn from(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }
}

impl IntoIterator for DiagnosticCollection {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.into_iter()
    }
}

impl<'a> IntoIterator for &'a DiagnosticCollection {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.iter()
    }
}
