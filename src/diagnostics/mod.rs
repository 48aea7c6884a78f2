//! Diagnostics for a punch sheet run
//!
//! Advisory findings about a performance on a given instrument: notes that
//! repeat too quickly for the mechanism, an imperfect transposition, notes
//! that had to be snapped. None of them stop the layout; they are logged and
//! handed back to the caller in the run report.

pub mod collisions;

use serde::{Deserialize, Serialize};

/// Severity level for diagnostics
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Warning,
    Info,
}

/// A single advisory finding
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Diagnostic {
    /// Severity level
    pub severity: DiagnosticSeverity,
    /// Kind identifier (e.g., "note_collision", "imperfect_transposition")
    pub kind: String,
    /// Human-readable message
    pub message: String,
}

impl Diagnostic {
    pub fn new(severity: DiagnosticSeverity, kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity,
            kind: kind.into(),
            message: message.into(),
        }
    }

    pub fn warning(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(DiagnosticSeverity::Warning, kind, message)
    }

    pub fn info(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(DiagnosticSeverity::Info, kind, message)
    }

    /// Emit through the `log` facade at the matching level
    pub fn log(&self) {
        match self.severity {
            DiagnosticSeverity::Warning => log::warn!("{}", self.message),
            DiagnosticSeverity::Info => log::info!("{}", self.message),
        }
    }
}

/// Collection of diagnostics for a run
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Diagnostics {
    pub items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Add a diagnostic and log it
    pub fn add(&mut self, diagnostic: Diagnostic) {
        diagnostic.log();
        self.items.push(diagnostic);
    }

    pub fn has_warnings(&self) -> bool {
        self.items
            .iter()
            .any(|d| d.severity == DiagnosticSeverity::Warning)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Find the first diagnostic of a kind
    pub fn find(&self, kind: &str) -> Option<&Diagnostic> {
        self.items.iter().find(|d| d.kind == kind)
    }
}
