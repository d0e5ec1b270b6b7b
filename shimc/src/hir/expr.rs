//! Call-site expressions handed to code generation.
//!
//! Only the expression forms that appear as receivers and arguments of
//! calls are modelled here.

use super::ty::Type;
use crate::span::Span;

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Bool(bool),
    Int(i32),
    Long(i64),
    Char(char),
    Str(String),
    Null,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Literal(Literal),
    /// A local variable slot.
    Local { index: u32 },
    This,
    /// A function literal.
    Lambda { arity: usize },
}

/// A typed expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub ty: Type,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, ty: Type) -> Self {
        Self {
            kind,
            ty,
            span: Span::dummy(),
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn int(value: i32) -> Self {
        Self::new(ExprKind::Literal(Literal::Int(value)), Type::int())
    }

    pub fn long(value: i64) -> Self {
        Self::new(ExprKind::Literal(Literal::Long(value)), Type::long())
    }

    pub fn bool(value: bool) -> Self {
        Self::new(ExprKind::Literal(Literal::Bool(value)), Type::boolean())
    }

    pub fn string(value: &str, string_ty: Type) -> Self {
        Self::new(ExprKind::Literal(Literal::Str(value.to_string())), string_ty)
    }

    pub fn null(ty: Type) -> Self {
        Self::new(ExprKind::Literal(Literal::Null), ty)
    }

    pub fn local(index: u32, ty: Type) -> Self {
        Self::new(ExprKind::Local { index }, ty)
    }

    pub fn this(ty: Type) -> Self {
        Self::new(ExprKind::This, ty)
    }

    pub fn lambda(params: Vec<Type>, ret: Type) -> Self {
        let arity = params.len();
        Self::new(ExprKind::Lambda { arity }, Type::function(params, ret))
    }

    pub fn is_lambda(&self) -> bool {
        matches!(self.kind, ExprKind::Lambda { .. })
    }
}
