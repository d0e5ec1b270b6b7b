//! Annotations and their constant arguments.

use super::name::FqName;
use crate::span::Span;

/// A compile-time constant annotation argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstValue {
    String(String),
    Int(i64),
    Bool(bool),
    Class(FqName),
    Array(Vec<ConstValue>),
}

impl ConstValue {
    pub fn string(value: impl Into<String>) -> Self {
        ConstValue::String(value.into())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConstValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Short description used in diagnostics.
    pub fn describe(&self) -> String {
        match self {
            ConstValue::String(s) => format!("\"{}\"", s),
            ConstValue::Int(i) => i.to_string(),
            ConstValue::Bool(b) => b.to_string(),
            ConstValue::Class(fq) => format!("{}::class", fq),
            ConstValue::Array(items) => format!("array of {} elements", items.len()),
        }
    }
}

/// An annotation applied to a declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub fq_name: FqName,
    /// Named arguments in source order.
    pub arguments: Vec<(String, ConstValue)>,
    pub span: Span,
}

impl Annotation {
    pub fn new(fq_name: &str) -> Self {
        Self {
            fq_name: FqName::new(fq_name),
            arguments: Vec::new(),
            span: Span::dummy(),
        }
    }

    pub fn with_argument(mut self, name: &str, value: ConstValue) -> Self {
        self.arguments.push((name.to_string(), value));
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn argument(&self, name: &str) -> Option<&ConstValue> {
        self.arguments
            .iter()
            .find(|(arg, _)| arg == name)
            .map(|(_, value)| value)
    }
}
