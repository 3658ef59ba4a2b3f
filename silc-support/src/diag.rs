//! `emit(loc, kind, args…) -> InFlight` (spec §6): a diagnostic sink whose
//! `emit` returns a builder that accepts `highlight`/`fix_it_*` calls
//! before being flushed into the owning [`DiagnosticEngine`].
//!
//! This sits directly on top of the existing [`Diagnostic`]/[`Suggestion`]
//! types (`vex-diagnostics`'s pre-existing, already Rust-idiomatic
//! representation) rather than replacing them — it only adds the
//! fluent-builder shape spec §6 names as the consumed interface.

use crate::{Diagnostic, DiagnosticEngine, ErrorLevel, Span};

/// A diagnostic kind: code + default message template. Real diagnostic
/// catalogs (spec §1: "a sink with a structured error catalog") are a
/// collaborator's concern; this is the minimal closed set the core itself
/// raises, named the way `vex-diagnostics::error_codes` names its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagKind {
    OverrideLetProperty,
    OverrideMismatchedSelector,
    InvalidRedecl,
    InvalidRedeclPrevious,
    RequiredInitializerMissing,
    InheritanceCycle,
    AccessibilityViolation,
    VerifierFailure,
    DeserializationError,
}

impl DiagKind {
    pub fn code(self) -> &'static str {
        match self {
            DiagKind::OverrideLetProperty => "E1001",
            DiagKind::OverrideMismatchedSelector => "E1002",
            DiagKind::InvalidRedecl => "E1003",
            DiagKind::InvalidRedeclPrevious => "E1004",
            DiagKind::RequiredInitializerMissing => "E1005",
            DiagKind::InheritanceCycle => "E1006",
            DiagKind::AccessibilityViolation => "E1007",
            DiagKind::VerifierFailure => "E1008",
            DiagKind::DeserializationError => "E1009",
        }
    }

    pub fn level(self) -> ErrorLevel {
        ErrorLevel::Error
    }

    pub fn default_message(self, args: &[String]) -> String {
        match self {
            DiagKind::OverrideLetProperty => format!(
                "cannot override `let` property `{}` with `var`",
                args.first().map(String::as_str).unwrap_or("?")
            ),
            DiagKind::OverrideMismatchedSelector => format!(
                "override of `{}` has a selector that does not match the overridden declaration",
                args.first().map(String::as_str).unwrap_or("?")
            ),
            DiagKind::InvalidRedecl => format!(
                "invalid redeclaration of `{}`",
                args.first().map(String::as_str).unwrap_or("?")
            ),
            DiagKind::InvalidRedeclPrevious => "previous declaration is here".to_string(),
            DiagKind::RequiredInitializerMissing => format!(
                "'required' initializer `{}` must be provided by subclass",
                args.first().map(String::as_str).unwrap_or("?")
            ),
            DiagKind::InheritanceCycle => format!(
                "circular inheritance: {}",
                args.join(" -> ")
            ),
            DiagKind::AccessibilityViolation => format!(
                "`{}` is {} but its type uses a less accessible type",
                args.first().map(String::as_str).unwrap_or("?"),
                args.get(1).map(String::as_str).unwrap_or("?"),
            ),
            DiagKind::VerifierFailure => format!(
                "SIL verification failed: {}",
                args.first().map(String::as_str).unwrap_or("")
            ),
            DiagKind::DeserializationError => format!(
                "malformed module file: {}",
                args.first().map(String::as_str).unwrap_or("")
            ),
        }
    }
}

/// Builder returned by `DiagnosticSink::emit`; accumulates highlights and
/// Fix-Its before being dropped into the engine by [`InFlight::flush`] (or
/// automatically on `Drop`, matching the spirit of a scoped RAII resource
/// per spec §9 — callers that never explicitly flush still get the
/// diagnostic recorded).
pub struct InFlight<'e> {
    engine: &'e mut DiagnosticEngine,
    diagnostic: Option<Diagnostic>,
}

impl<'e> InFlight<'e> {
    fn new(engine: &'e mut DiagnosticEngine, diagnostic: Diagnostic) -> Self {
        Self {
            engine,
            diagnostic: Some(diagnostic),
        }
    }

    pub fn highlight(mut self, span: Span) -> Self {
        if let Some(d) = &mut self.diagnostic {
            d.notes.push(format!("at {span}"));
        }
        self
    }

    pub fn fix_it_replace(mut self, span: Span, text: impl Into<String>) -> Self {
        if let Some(d) = &mut self.diagnostic {
            d.suggestion = Some(crate::Suggestion {
                message: format!("replace with `{}`", text.into()),
                replacement: String::new(),
                span,
            });
        }
        self
    }

    pub fn fix_it_insert(mut self, span: Span, text: impl Into<String>) -> Self {
        if let Some(d) = &mut self.diagnostic {
            d.suggestion = Some(crate::Suggestion {
                message: "insert".to_string(),
                replacement: text.into(),
                span,
            });
        }
        self
    }

    pub fn fix_it_remove(mut self, span: Span) -> Self {
        if let Some(d) = &mut self.diagnostic {
            d.suggestion = Some(crate::Suggestion {
                message: "remove".to_string(),
                replacement: String::new(),
                span,
            });
        }
        self
    }

    /// Flush explicitly; returns the index assigned in the engine.
    pub fn flush(mut self) -> usize {
        let diagnostic = self.diagnostic.take().expect("flushed twice");
        self.engine.emit(diagnostic);
        self.engine.diagnostics().len() - 1
    }
}

impl<'e> Drop for InFlight<'e> {
    fn drop(&mut self) {
        if let Some(diagnostic) = self.diagnostic.take() {
            self.engine.emit(diagnostic);
        }
    }
}

/// `emit(loc, kind, args…) -> InFlight` (spec §6). `loc` here is a `Span`
/// rather than the opaque `SourceLoc` — callers that only have a
/// `SourceLoc`/`SourceRange` resolve it through [`crate::SourceMap`] first,
/// the same separation the original collaborator interface draws between
/// location opacity and diagnostic rendering.
pub trait DiagnosticSink {
    fn emit(&mut self, span: Span, kind: DiagKind, args: &[String]) -> InFlight<'_>;
}

impl DiagnosticSink for DiagnosticEngine {
    fn emit(&mut self, span: Span, kind: DiagKind, args: &[String]) -> InFlight<'_> {
        let message = kind.default_message(args);
        let diagnostic = Diagnostic::new(kind.level(), kind.code(), message, span);
        InFlight::new(self, diagnostic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Span;

    #[test]
    fn emit_then_flush_records_one_diagnostic() {
        let mut engine = DiagnosticEngine::new();
        DiagnosticSink::emit(
            &mut engine,
            Span::unknown(),
            DiagKind::InvalidRedecl,
            &["f".to_string()],
        )
        .flush();
        assert_eq!(engine.error_count(), 1);
    }

    #[test]
    fn emit_drops_unflushed_still_records() {
        let mut engine = DiagnosticEngine::new();
        {
            let _inflight = DiagnosticSink::emit(
                &mut engine,
                Span::unknown(),
                DiagKind::InheritanceCycle,
                &["A".to_string(), "B".to_string(), "A".to_string()],
            )
            .highlight(Span::unknown());
        }
        assert_eq!(engine.error_count(), 1);
    }
}
