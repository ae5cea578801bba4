//! Parse error types.

use thiserror::Error;

use crate::span::Span;

/// Why a script failed to parse.
///
/// Each variant is a static error: it is reported before any evaluation
/// happens, and a program that parses successfully can never raise one of
/// these at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// A digit-shaped token whose value does not fit in a 32-bit word.
    #[error("integer literal does not fit in a 32-bit word")]
    MalformedInteger,

    /// The same label name appeared twice.
    #[error("duplicate label `{0}`")]
    DuplicateLabel(String),

    /// A label at the end of the script, with no operator to name.
    #[error("label `{0}` does not precede any operator")]
    DanglingLabel(String),

    /// A reference whose name matches no label.
    #[error("reference `@{0}` does not match any label")]
    UnresolvedReference(String),
}

/// A parse failure with its source location.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} ({span})")]
pub struct ParseError {
    /// What went wrong.
    pub kind: ParseErrorKind,
    /// Where in the script text.
    pub span: Span,
}

impl ParseError {
    pub(crate) fn new(kind: ParseErrorKind, span: Span) -> Self {
        Self { kind, span }
    }
}
