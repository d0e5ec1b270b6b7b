//! Errors raised while discovering compat providers.

use thiserror::Error;

use crate::diagnostics::Diagnostic;
use crate::span::Span;

/// A fatal error in a class's provider declaration.
///
/// Every variant is reported at the marker annotation. None of them stops
/// analysis of unrelated classes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompatError {
    #[error("compat annotation on `{class}` must have a `{argument}` argument")]
    MissingValue {
        class: String,
        argument: String,
        span: Span,
    },

    #[error("compat annotation value on `{class}` must be a string, found {found}")]
    NonStringValue {
        class: String,
        found: String,
        span: Span,
    },

    #[error("compat provider `{provider}` of `{class}` cannot be resolved")]
    UnresolvedProvider {
        class: String,
        provider: String,
        span: Span,
    },

    #[error("compat provider `{provider}` of `{class}` must be a class")]
    ProviderNotAClass {
        class: String,
        provider: String,
        span: Span,
    },
}

impl CompatError {
    pub fn span(&self) -> Span {
        match self {
            CompatError::MissingValue { span, .. }
            | CompatError::NonStringValue { span, .. }
            | CompatError::UnresolvedProvider { span, .. }
            | CompatError::ProviderNotAClass { span, .. } => *span,
        }
    }

    /// The diagnostic code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            CompatError::MissingValue { .. } | CompatError::NonStringValue { .. } => "E0701",
            CompatError::UnresolvedProvider { .. } => "E0702",
            CompatError::ProviderNotAClass { .. } => "E0703",
        }
    }

    /// Whether the annotation itself is malformed, as opposed to naming a
    /// provider that does not resolve to a class.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            CompatError::MissingValue { .. } | CompatError::NonStringValue { .. }
        )
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let span = self.span();
        let label = match self {
            CompatError::MissingValue { .. } | CompatError::NonStringValue { .. } => {
                "provider annotation declared here"
            }
            CompatError::UnresolvedProvider { .. } => "provider referenced here",
            CompatError::ProviderNotAClass { .. } => "provider must be a class",
        };
        Diagnostic::error(self.to_string(), span)
            .with_code(self.code())
            .with_label(span, label)
    }
}

impl From<CompatError> for Diagnostic {
    fn from(err: CompatError) -> Self {
        err.to_diagnostic()
    }
}
