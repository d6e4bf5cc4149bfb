//! Diagnostics reported while expanding macros
//!
//! The core never decides where an error points; the caller supplies the span
//! of the triggering attribute when it records the diagnostic.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::{error::SetterError, syntax::Span};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Stable machine-readable code
    pub code: String,
    pub message: String,
    pub span: Span,
}

impl Diagnostic {
    pub fn error(error: SetterError, span: Span) -> Self {
        Self {
            severity: Severity::Error,
            code: error.kind().to_string(),
            message: error.to_string(),
            span,
        }
    }
}

/// Sink the macro reports into
pub trait ExpansionContext {
    fn diagnose(&mut self, diagnostic: Diagnostic);
}

/// Context that simply keeps everything it is told
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl ExpansionContext for DiagnosticCollector {
    fn diagnose(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}

/// Render diagnostics compiler-style:
///
/// ```text
/// Model.swift:2:5: error: This macro cannot be used on a constant
///     @setterFunction
///     ^~~~~~~~~~~~~~~
/// ```
pub fn render_diagnostics(source: &str, file_name: &str, diagnostics: &[Diagnostic]) -> String {
    let mut out = String::new();
    for diagnostic in diagnostics {
        let (line, column) = diagnostic.span.line_col(source);
        let _ = writeln!(
            out,
            "{file_name}:{line}:{column}: {}: {}",
            diagnostic.severity.as_str(),
            diagnostic.message
        );

        let Some(text) = source.lines().nth(line - 1) else {
            continue;
        };
        let width = source
            .get(diagnostic.span.start..diagnostic.span.end)
            .map(|s| s.chars().count())
            .unwrap_or(0)
            .max(1);
        let _ = writeln!(out, "{text}");
        let _ = writeln!(
            out,
            "{}^{}",
            " ".repeat(column - 1),
            "~".repeat(width - 1)
        );
    }
    out
}
