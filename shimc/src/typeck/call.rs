//! Resolved calls handed from call resolution to code generation.

use crate::hir::{Expr, Name};
use crate::scope::FunctionSymbol;
use crate::span::Span;

/// An argument at a call site, positional or named.
#[derive(Debug, Clone, PartialEq)]
pub struct CallArgument {
    pub name: Option<Name>,
    pub expr: Expr,
}

impl CallArgument {
    pub fn positional(expr: Expr) -> Self {
        Self { name: None, expr }
    }

    pub fn named(name: Name, expr: Expr) -> Self {
        Self {
            name: Some(name),
            expr,
        }
    }
}

/// The value supplied for one parameter of the chosen candidate.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedValueArgument {
    Expression(Expr),
    /// The parameter's default value is used.
    Default,
    /// Elements of a vararg parameter; may be empty.
    Vararg(Vec<Expr>),
}

/// The receiver a member call is dispatched on.
#[derive(Debug, Clone, PartialEq)]
pub struct Receiver {
    pub expr: Expr,
}

/// A call bound to one candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCall {
    /// The chosen function, possibly wrapped in a SAM adapter.
    pub candidate: FunctionSymbol,
    pub dispatch_receiver: Option<Receiver>,
    /// One entry per parameter of `candidate`, by index.
    pub value_arguments: Vec<ResolvedValueArgument>,
    pub span: Span,
}

impl ResolvedCall {
    /// Whether any parameter takes its default value.
    pub fn uses_defaults(&self) -> bool {
        self.value_arguments
            .iter()
            .any(|arg| matches!(arg, ResolvedValueArgument::Default))
    }
}
