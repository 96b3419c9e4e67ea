//! Error types for spec parsing and resolution.

use std::fmt;

/// Failures raised while parsing or resolving a spec.
///
/// The two variants are the full taxonomy: either the spec text itself
/// violates the grammar (`Syntax`), or the spec is well formed but the
/// addressed structure does not exist, has the wrong kind, or violates an
/// operation precondition (`Match`). Both are fatal to the enclosing
/// operation and never retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecError {
    /// The spec text does not conform to the grammar.
    Syntax { message: String },
    /// The spec does not match the document.
    Match { message: String },
}

impl SpecError {
    pub fn syntax(message: impl Into<String>) -> Self {
        SpecError::Syntax {
            message: message.into(),
        }
    }

    pub fn no_match(message: impl Into<String>) -> Self {
        SpecError::Match {
            message: message.into(),
        }
    }

    pub fn is_syntax(&self) -> bool {
        matches!(self, SpecError::Syntax { .. })
    }

    pub fn is_match(&self) -> bool {
        matches!(self, SpecError::Match { .. })
    }

    pub fn message(&self) -> &str {
        match self {
            SpecError::Syntax { message } | SpecError::Match { message } => message,
        }
    }

    /// Re-wraps the failure with the full spec, the offset consumed so
    /// far, and a short rendering of the node being matched, keeping the
    /// error kind.
    pub(crate) fn wrap(self, spec: &str, offset: usize, context: &str) -> Self {
        let message = format!(
            "applying spec \"{spec}\" at offset {offset} on \"{context}\": {}",
            self.message()
        );
        match self {
            SpecError::Syntax { .. } => SpecError::Syntax { message },
            SpecError::Match { .. } => SpecError::Match { message },
        }
    }
}

impl fmt::Display for SpecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecError::Syntax { message } => write!(f, "spec syntax error: {message}"),
            SpecError::Match { message } => write!(f, "spec match error: {message}"),
        }
    }
}

impl std::error::Error for SpecError {}
