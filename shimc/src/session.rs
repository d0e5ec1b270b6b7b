//! Compat Session
//!
//! Wires the compat machinery for one compilation: the shared
//! [`CompatContext`], the synthetic scope chain with the
//! [`CompatScopeProvider`] registered, and the call generator with the
//! [`CompatCallRedirector`] registered.
//!
//! The session also drives the two host-side steps the shims plug into,
//! member call resolution and call emission, so that a call can be taken
//! from source-level arguments to instructions in one place.

use std::sync::Arc;

use tracing::debug;

use crate::codegen::{
    CallGenerator, CompatCallRedirector, ExpressionCodegen, InstructionAdapter, Insn, StackValue,
};
use crate::compat::resolver::resolve_provider;
use crate::compat::CompatContext;
use crate::config::CompatConfig;
use crate::diagnostics::Diagnostic;
use crate::hir::{DefId, Expr, Name, SymbolGraph, Type};
use crate::scope::{
    ClassMemberScope, CompatScopeProvider, MemberKinds, ResolutionScope, SyntheticScopes,
    SyntheticScopesMetadata,
};
use crate::span::Span;
use crate::storage::MemoizedFunction;
use crate::typeck::{CallArgument, CallResolver, ResolvedCall};

/// Per-compilation compat state.
#[derive(Debug)]
pub struct CompatSession {
    context: Arc<CompatContext>,
    scopes: SyntheticScopes,
    call_generator: CallGenerator,
    /// Undecorated instance member scopes, one per type.
    member_scopes: MemoizedFunction<Type, ResolutionScope>,
}

impl CompatSession {
    pub fn new(graph: Arc<SymbolGraph>, config: CompatConfig) -> Self {
        let context = Arc::new(CompatContext::new(graph, config));

        let mut scopes = SyntheticScopes::new();
        scopes.register(Arc::new(CompatScopeProvider::new(context.clone())));

        let mut call_generator = CallGenerator::new();
        call_generator.register(Arc::new(CompatCallRedirector::new()));

        Self {
            context,
            scopes,
            call_generator,
            member_scopes: MemoizedFunction::new(),
        }
    }

    pub fn context(&self) -> &Arc<CompatContext> {
        &self.context
    }

    pub fn graph(&self) -> &Arc<SymbolGraph> {
        self.context.graph()
    }

    pub fn synthetic_scopes(&self) -> &SyntheticScopes {
        &self.scopes
    }

    /// The code generation extension point, with the redirector registered.
    pub fn call_generator(&self) -> &CallGenerator {
        &self.call_generator
    }

    /// The member scope of `ty` for a lookup after `needs`, decorated by the
    /// synthetic scope chain.
    pub fn member_scope(&self, ty: &Type, needs: MemberKinds) -> ResolutionScope {
        let base = self.member_scopes.get_or_compute(ty, |ty| {
            ResolutionScope::base(ClassMemberScope::instance(self.graph().clone(), ty.clone()))
        });
        let metadata = SyntheticScopesMetadata::new(Some(ty.clone()), needs);
        self.scopes.apply(base, &metadata)
    }

    /// The static scope of `class`. Static lookups are never decorated.
    pub fn static_scope(&self, class: DefId) -> ResolutionScope {
        ResolutionScope::base(ClassMemberScope::statics(self.graph().clone(), class))
    }

    /// Resolve `receiver.name(arguments)` against the receiver's member
    /// scope, synthesized members included.
    pub fn resolve_member_call(
        &self,
        receiver: &Expr,
        name: Name,
        arguments: &[CallArgument],
        span: Span,
    ) -> Result<ResolvedCall, Vec<Diagnostic>> {
        let scope = self.member_scope(&receiver.ty, MemberKinds::MEMBER_FUNCTIONS);
        let candidates = scope
            .contributed_functions(name)
            .map_err(|err| vec![Diagnostic::from(err)])?;

        CallResolver::new(self.graph())
            .resolve(name, &candidates, Some(receiver), arguments, span)
            .map_err(|err| vec![err.to_diagnostic()])
    }

    /// Resolve `Class.name(arguments)` against the static scope of `class`.
    pub fn resolve_static_call(
        &self,
        class: DefId,
        name: Name,
        arguments: &[CallArgument],
        span: Span,
    ) -> Result<ResolvedCall, Vec<Diagnostic>> {
        let scope = self.static_scope(class);
        let candidates = scope
            .contributed_functions(name)
            .map_err(|err| vec![Diagnostic::from(err)])?;

        CallResolver::new(self.graph())
            .resolve(name, &candidates, None, arguments, span)
            .map_err(|err| vec![err.to_diagnostic()])
    }

    /// Emit `call`, returning the instructions and the value they leave on
    /// the stack.
    pub fn generate_call(
        &self,
        call: &ResolvedCall,
    ) -> Result<(Vec<Insn>, StackValue), Vec<Diagnostic>> {
        let mut codegen = ExpressionCodegen::new(self.graph());
        let mut v = InstructionAdapter::new();
        let value = self.call_generator.gen_call(&mut codegen, call, &mut v)?;
        Ok((v.into_insns(), value))
    }

    /// Check every class carrying the marker annotation.
    ///
    /// All problems are reported; a bad class does not stop the check of
    /// the others.
    pub fn validate_declarations(&self) -> Vec<Diagnostic> {
        let graph = self.graph();
        let mut diagnostics = Vec::new();
        let mut checked = 0usize;

        for class in graph.classes().filter(|class| !class.is_interface()) {
            let association = match self.context.find_provider(class) {
                Ok(Some(association)) => association,
                Ok(None) => continue,
                Err(err) => {
                    diagnostics.push(err.into());
                    continue;
                }
            };
            checked += 1;
            if let Err(err) = resolve_provider(graph, class, &association) {
                diagnostics.push(err.into());
            }
        }

        debug!(
            checked,
            errors = diagnostics.len(),
            "validated compat provider declarations"
        );
        diagnostics
    }
}
