//! Compiler diagnostics.
//!
//! Diagnostics are the single channel through which declaration-level
//! problems (a malformed or unresolvable provider annotation) and internal
//! compiler errors leave this crate. Rendering goes through ariadne.

use std::fmt;
use std::ops::Range;

use crate::span::Span;

/// The severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    Error,
    Warning,
    Note,
    Help,
}

/// A secondary location attached to a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub span: Span,
    pub message: String,
}

/// A diagnostic message with a primary location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    pub span: Span,
    /// Stable error code, e.g. `E0701`.
    pub code: Option<String>,
    pub labels: Vec<Label>,
    pub notes: Vec<String>,
}

/// Error code used for internal compiler errors.
pub const ICE_CODE: &str = "ICE";

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            message: message.into(),
            span,
            code: None,
            labels: Vec::new(),
            notes: Vec::new(),
        }
    }

    pub fn error(message: impl Into<String>, span: Span) -> Self {
        Self::new(DiagnosticKind::Error, message, span)
    }

    pub fn warning(message: impl Into<String>, span: Span) -> Self {
        Self::new(DiagnosticKind::Warning, message, span)
    }

    /// An internal compiler error. These are never recoverable.
    pub fn ice(message: impl Into<String>, span: Span) -> Self {
        Self::error(format!("internal compiler error: {}", message.into()), span)
            .with_code(ICE_CODE)
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label {
            span,
            message: message.into(),
        });
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.kind == DiagnosticKind::Error
    }

    pub fn is_ice(&self) -> bool {
        self.code.as_deref() == Some(ICE_CODE)
    }

    /// Render this diagnostic against its source text.
    pub fn render(&self, source_name: &str, source: &str) -> String {
        use ariadne::{Config, Label as ReportLabel, Report, ReportKind, Source};

        let id = source_name.to_string();
        let kind = match self.kind {
            DiagnosticKind::Error => ReportKind::Error,
            DiagnosticKind::Warning => ReportKind::Warning,
            DiagnosticKind::Note | DiagnosticKind::Help => ReportKind::Advice,
        };

        let mut builder =
            Report::<(String, Range<usize>)>::build(kind, id.clone(), self.span.start)
                .with_config(Config::default().with_color(false))
                .with_message(&self.message)
                .with_label(
                    ReportLabel::new((id.clone(), self.span.range())).with_message(&self.message),
                );

        if let Some(code) = &self.code {
            builder = builder.with_code(code);
        }
        for label in &self.labels {
            builder = builder
                .with_label(ReportLabel::new((id.clone(), label.span.range())).with_message(&label.message));
        }
        if !self.notes.is_empty() {
            builder = builder.with_note(self.notes.join("\n"));
        }

        let mut out = Vec::new();
        if builder
            .finish()
            .write((id, Source::from(source.to_string())), &mut out)
            .is_err()
        {
            return self.to_string();
        }
        String::from_utf8_lossy(&out).into_owned()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            DiagnosticKind::Error => "error",
            DiagnosticKind::Warning => "warning",
            DiagnosticKind::Note => "note",
            DiagnosticKind::Help => "help",
        };
        match &self.code {
            Some(code) => write!(f, "{}[{}]: {} at {}", kind, code, self.message, self.span),
            None => write!(f, "{}: {} at {}", kind, self.message, self.span),
        }
    }
}

/// Build an internal compiler error diagnostic, optionally with
/// `"key" => value` notes.
#[macro_export]
macro_rules! ice_err {
    ($span:expr, $msg:expr) => {
        $crate::diagnostics::Diagnostic::ice($msg, $span)
    };
    ($span:expr, $msg:expr; $($key:expr => $value:expr),+ $(,)?) => {{
        let mut diag = $crate::diagnostics::Diagnostic::ice($msg, $span);
        $(
            diag = diag.with_note(format!("{}: {}", $key, $value));
        )+
        diag
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ice_macro_notes() {
        let diag = ice_err!(Span::new(1, 4), "bad state"; "expected" => "a provider function");
        assert!(diag.is_ice());
        assert!(diag.message.contains("bad state"));
        assert_eq!(diag.notes, vec!["expected: a provider function".to_string()]);
    }

    #[test]
    fn test_display_with_code() {
        let diag = Diagnostic::error("provider must be a class", Span::new(3, 9)).with_code("E0703");
        assert_eq!(diag.to_string(), "error[E0703]: provider must be a class at 3..9");
    }

    #[test]
    fn test_render_contains_message() {
        let source = "@Compat(\"Missing\")\nclass View";
        let diag = Diagnostic::error("cannot find provider class `Missing`", Span::new(8, 17))
            .with_code("E0702")
            .with_note("providers are looked up by fully qualified name");
        let rendered = diag.render("View.kt", source);
        assert!(rendered.contains("cannot find provider class `Missing`"));
        assert!(rendered.contains("E0702"));
    }
}
