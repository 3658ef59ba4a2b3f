//! Semantic-analysis error catalog, in the shape `vex-compiler`'s
//! `borrow_checker::errors::BorrowError` uses: one `thiserror` enum per
//! analysis phase's family of failures, each convertible into a
//! `silc_support::Diagnostic` for the engine.

use silc_ast::DeclId;
use silc_support::{Diagnostic, Span};

pub type SemaResult<T> = Result<T, SemaError>;

#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum SemaError {
    #[error("circular inheritance involving `{0}`")]
    InheritanceCycle(String, Vec<String>),

    #[error("invalid redeclaration of `{name}`")]
    InvalidRedeclaration { name: String, previous: DeclId },

    #[error("cannot override `let` property `{name}` with a settable member")]
    OverrideLetProperty { name: String },

    #[error("override of `{name}` does not override any member of its superclass")]
    OverrideMismatch { name: String },

    #[error("`{name}` overrides a `final` member and cannot be overridden")]
    OverrideOfFinal { name: String },

    #[error("class `{class}` does not implement required initializer `{name}`")]
    RequiredInitializerMissing {
        class: String,
        name: String,
        /// Fix-It insertion text: `required init(...)` plus a `fatalError` body.
        fix_it: String,
    },

    #[error("`{name}` uses type `{ty}` which is less accessible")]
    AccessibilityViolation { name: String, ty: String },

    #[error("`{attr}` cannot be combined with `{other}` on `{name}`")]
    ConflictingAttributes {
        name: String,
        attr: String,
        other: String,
    },
}

impl SemaError {
    pub fn to_diagnostic(&self, span: Span) -> Diagnostic {
        let code = match self {
            SemaError::InheritanceCycle(..) => "E2001",
            SemaError::InvalidRedeclaration { .. } => "E2002",
            SemaError::OverrideLetProperty { .. } => "E2003",
            SemaError::OverrideMismatch { .. } => "E2004",
            SemaError::OverrideOfFinal { .. } => "E2005",
            SemaError::RequiredInitializerMissing { .. } => "E2006",
            SemaError::AccessibilityViolation { .. } => "E2007",
            SemaError::ConflictingAttributes { .. } => "E2008",
        };
        let diagnostic = Diagnostic::error(code, self.to_string(), span);
        match self {
            SemaError::RequiredInitializerMissing { fix_it, .. } => diagnostic.with_suggestion(
                "add the required initializer".to_string(),
                fix_it.clone(),
                span,
            ),
            _ => diagnostic,
        }
    }
}
