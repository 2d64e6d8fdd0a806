use std::fmt;

use thiserror::Error;

/// Represents a byte span within a source file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceSpan {
    pub start: usize,
    pub end: usize,
}

impl SourceSpan {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Smallest span covering both `self` and `other`.
    pub fn to(self, other: SourceSpan) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// Classification of a diagnostic event.
///
/// There is no kind for an unsupported node: the AST is a closed enum and the
/// evaluator matches it exhaustively, so that case cannot be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// Unrecognised character in the source text.
    Lex,
    /// Grammar or token-expectation violation.
    Parse,
    DuplicateDeclaration,
    UnresolvedName,
    ConstReassignment,
    InvalidAssignmentTarget,
    /// Zero divisor under [`DivisionPolicy::Error`](crate::runtime::DivisionPolicy).
    DivisionByZero,
}

/// Rich diagnostic information surfaced to end users.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    pub span: Option<SourceSpan>,
    pub notes: Vec<String>,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            span: None,
            notes: Vec::new(),
        }
    }

    pub fn with_span(mut self, span: SourceSpan) -> Self {
        self.span = Some(span);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)?;
        if let Some(span) = self.span {
            write!(f, " ({}..{})", span.start, span.end)?;
        }
        for note in &self.notes {
            write!(f, "\n  note: {note}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Diagnostic {}

/// Unified error type for the Hybrid toolchain.
#[derive(Debug, Error)]
pub enum HybridError {
    #[error("{0}")]
    Diagnostic(#[from] Diagnostic),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HybridError {
    /// The diagnostic kind, if this error came from the language core.
    pub fn kind(&self) -> Option<DiagnosticKind> {
        match self {
            HybridError::Diagnostic(diag) => Some(diag.kind),
            HybridError::Io(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, HybridError>;
