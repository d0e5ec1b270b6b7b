//! Call resolution over the functions a member scope contributes.
//!
//! # Algorithm
//!
//! 1. Map the call's arguments onto each candidate's parameters: positional
//!    arguments first, then named ones; unfilled parameters take their
//!    default, a trailing vararg collects the remaining positional
//!    arguments and may be empty.
//! 2. Keep the candidates whose mapped arguments are assignable to the
//!    parameter types. A candidate that rejects a lambda argument is retried
//!    through a [`SamAdapter`].
//! 3. Among the applicable candidates keep the maximally specific ones and
//!    pick the earliest. Scopes list synthesized members first, so on a tie
//!    a synthesized member wins over the original it sits next to.

use std::sync::Arc;

use thiserror::Error;
use tracing::trace;

use crate::diagnostics::Diagnostic;
use crate::hir::{Expr, Name, SymbolGraph, ValueParam};
use crate::scope::FunctionSymbol;
use crate::span::Span;

use super::call::{CallArgument, Receiver, ResolvedCall, ResolvedValueArgument};
use super::sam::SamAdapter;
use super::subtype::TypeChecker;

/// Errors from call resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("unresolved reference: `{name}`")]
    UnresolvedReference { name: String, span: Span },

    #[error("none of the {candidates} candidates for `{name}` accepts these arguments")]
    NoApplicableCandidate {
        name: String,
        candidates: usize,
        span: Span,
    },
}

impl ResolveError {
    pub fn span(&self) -> Span {
        match self {
            ResolveError::UnresolvedReference { span, .. }
            | ResolveError::NoApplicableCandidate { span, .. } => *span,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(self.to_string(), self.span())
    }
}

/// Resolves calls against a list of candidate functions.
#[derive(Debug, Clone, Copy)]
pub struct CallResolver<'g> {
    checker: TypeChecker<'g>,
}

impl<'g> CallResolver<'g> {
    pub fn new(graph: &'g SymbolGraph) -> Self {
        Self {
            checker: TypeChecker::new(graph),
        }
    }

    /// Resolve a call of `name` among `candidates`, which are in scope order.
    pub fn resolve(
        &self,
        name: Name,
        candidates: &[FunctionSymbol],
        receiver: Option<&Expr>,
        arguments: &[CallArgument],
        span: Span,
    ) -> Result<ResolvedCall, ResolveError> {
        let graph = self.checker.graph();
        if candidates.is_empty() {
            return Err(ResolveError::UnresolvedReference {
                name: graph.name_str(name).to_string(),
                span,
            });
        }

        // Step 1 and 2: applicable candidates, SAM-adapted where needed
        let applicable: Vec<(FunctionSymbol, Vec<ResolvedValueArgument>)> = candidates
            .iter()
            .filter_map(|candidate| self.applicable(candidate, receiver, arguments))
            .collect();

        if applicable.is_empty() {
            return Err(ResolveError::NoApplicableCandidate {
                name: graph.name_str(name).to_string(),
                candidates: candidates.len(),
                span,
            });
        }

        // Step 3: the earliest maximally specific candidate
        let chosen = (0..applicable.len())
            .find(|&i| {
                !applicable
                    .iter()
                    .enumerate()
                    .any(|(j, (other, _))| {
                        i != j && self.is_more_specific(other, &applicable[i].0)
                    })
            })
            .unwrap_or(0);
        let (candidate, value_arguments) = applicable.into_iter().nth(chosen).ok_or_else(|| {
            ResolveError::NoApplicableCandidate {
                name: graph.name_str(name).to_string(),
                candidates: candidates.len(),
                span,
            }
        })?;

        trace!(
            name = graph.name_str(name),
            synthetic = candidate.unwrap_sam_adapter().is_synthetic(),
            sam_adapted = matches!(candidate, FunctionSymbol::SamAdapted(_)),
            "resolved call"
        );

        let dispatch_receiver = if candidate.is_static() {
            None
        } else {
            receiver.map(|expr| Receiver { expr: expr.clone() })
        };
        Ok(ResolvedCall {
            candidate,
            dispatch_receiver,
            value_arguments,
            span,
        })
    }

    fn applicable(
        &self,
        candidate: &FunctionSymbol,
        receiver: Option<&Expr>,
        arguments: &[CallArgument],
    ) -> Option<(FunctionSymbol, Vec<ResolvedValueArgument>)> {
        if !candidate.is_static() && receiver.is_none() {
            return None;
        }

        if let Some(mapped) = self.map_arguments(candidate.params(), arguments) {
            return Some((candidate.clone(), mapped));
        }

        if !arguments.iter().any(|arg| arg.expr.is_lambda()) {
            return None;
        }
        let adapter = SamAdapter::adapt(self.checker.graph(), candidate)?;
        let mapped = self.map_arguments(adapter.params(), arguments)?;
        Some((FunctionSymbol::SamAdapted(Arc::new(adapter)), mapped))
    }

    /// Map `arguments` onto `params`, or `None` if they do not fit.
    pub fn map_arguments(
        &self,
        params: &[ValueParam],
        arguments: &[CallArgument],
    ) -> Option<Vec<ResolvedValueArgument>> {
        let mut slots: Vec<Option<ResolvedValueArgument>> = vec![None; params.len()];

        let positional_count = arguments.iter().take_while(|arg| arg.name.is_none()).count();
        let (positional, named) = arguments.split_at(positional_count);

        let mut position = 0;
        while position < positional.len() {
            let param = params.get(position)?;
            if param.is_vararg() {
                let elements = positional[position..].iter().map(|arg| arg.expr.clone()).collect();
                slots[position] = Some(ResolvedValueArgument::Vararg(elements));
                break;
            }
            let expr = positional[position].expr.clone();
            slots[position] = Some(ResolvedValueArgument::Expression(expr));
            position += 1;
        }

        for arg in named {
            // Positional arguments after a named one are not supported
            let name = arg.name?;
            let index = params.iter().position(|p| p.name == name)?;
            if slots[index].is_some() {
                return None;
            }
            slots[index] = Some(if params[index].is_vararg() {
                ResolvedValueArgument::Vararg(vec![arg.expr.clone()])
            } else {
                ResolvedValueArgument::Expression(arg.expr.clone())
            });
        }

        let mut mapped = Vec::with_capacity(params.len());
        for (param, slot) in params.iter().zip(slots) {
            let value = match slot {
                Some(value) => value,
                None if param.has_default => ResolvedValueArgument::Default,
                None if param.is_vararg() => ResolvedValueArgument::Vararg(Vec::new()),
                None => return None,
            };
            if !self.accepts(param, &value) {
                return None;
            }
            mapped.push(value);
        }
        Some(mapped)
    }

    fn accepts(&self, param: &ValueParam, value: &ResolvedValueArgument) -> bool {
        match value {
            ResolvedValueArgument::Expression(expr) => self.checker.is_assignable(&expr.ty, &param.ty),
            ResolvedValueArgument::Default => true,
            ResolvedValueArgument::Vararg(elements) => {
                let Some(element_ty) = &param.vararg_element else {
                    return false;
                };
                elements
                    .iter()
                    .all(|e| self.checker.is_assignable(&e.ty, element_ty))
            }
        }
    }

    /// Check if `f1` is more specific than `f2`.
    ///
    /// `f1` is more specific than `f2` if:
    /// - Every parameter of `f1` is a subtype of the matching one of `f2`
    /// - At least one of them is strictly more specific
    pub fn is_more_specific(&self, f1: &FunctionSymbol, f2: &FunctionSymbol) -> bool {
        let (p1, p2) = (f1.params(), f2.params());
        if p1.len() != p2.len() {
            return false;
        }

        let mut some_strictly = false;
        for (a, b) in p1.iter().zip(p2) {
            if !self.checker.is_subtype(&a.ty, &b.ty) {
                return false;
            }
            if !self.checker.is_subtype(&b.ty, &a.ty) {
                some_strictly = true;
            }
        }
        some_strictly
    }
}
