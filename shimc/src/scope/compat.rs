//! The compat member scope.
//!
//! Decorates a member scope with the members synthesized from the receiver
//! type's providers:
//!
//! ```text
//! contributed_functions(name) =
//!     synthesized(name) ++ originals(name).filter(not shadowed by any synthesized)
//! ```
//!
//! A synthesized member shadows an original when both have the same name,
//! the same owner, the same arity and type-equal parameter and return types.
//! Members inherited by the receiving class count as members of it.

use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::compat::{CompatContext, CompatError, SyntheticFunction};
use crate::hir::{ClassDef, Name, Type};
use crate::storage::MemoizedFunction;
use crate::typeck::TypeChecker;

use super::member::ResolutionScope;
use super::symbol::FunctionSymbol;

/// A scope that adds compat members to the scope it wraps.
pub struct CompatMemberScope {
    context: Arc<CompatContext>,
    ty: Type,
    owner: Option<Arc<ClassDef>>,
    wrapped: ResolutionScope,
    functions: MemoizedFunction<Name, Result<Arc<[FunctionSymbol]>, CompatError>>,
}

impl CompatMemberScope {
    pub fn new(context: Arc<CompatContext>, ty: Type, wrapped: ResolutionScope) -> Self {
        let owner = ty
            .class_def()
            .and_then(|id| context.graph().class(id))
            .cloned();
        Self {
            context,
            ty,
            owner,
            wrapped,
            functions: MemoizedFunction::new(),
        }
    }

    pub fn ty(&self) -> &Type {
        &self.ty
    }

    pub fn wrapped(&self) -> &ResolutionScope {
        &self.wrapped
    }

    /// Synthesized members first, then the originals they do not shadow.
    pub fn contributed_functions(&self, name: Name) -> Result<Arc<[FunctionSymbol]>, CompatError> {
        self.functions
            .get_or_compute(&name, |name| self.compute_functions(*name))
    }

    fn compute_functions(&self, name: Name) -> Result<Arc<[FunctionSymbol]>, CompatError> {
        let originals = self.wrapped.contributed_functions(name)?;
        if self.owner.is_none() {
            return Ok(originals);
        }

        let synthesized = self.context.synthesize(&self.ty, name)?;
        if synthesized.is_empty() {
            return Ok(originals);
        }

        let mut result: Vec<FunctionSymbol> = Vec::with_capacity(synthesized.len() + originals.len());
        result.extend(synthesized.iter().cloned().map(FunctionSymbol::Synthetic));
        for original in originals.iter() {
            if synthesized.iter().any(|s| self.shadows(s, original)) {
                trace!(
                    name = self.context.graph().name_str(name),
                    "original member shadowed by compat member"
                );
                continue;
            }
            result.push(original.clone());
        }
        Ok(result.into())
    }

    /// Whether `synthetic` replaces `original` in this scope.
    pub fn shadows(&self, synthetic: &SyntheticFunction, original: &FunctionSymbol) -> bool {
        let checker = self.context.type_checker();
        synthetic.name == original.name()
            && self.same_owner(&checker, synthetic, original)
            && synthetic.params.len() == original.params().len()
            && match (&synthetic.return_type, original.return_type()) {
                (Some(a), Some(b)) => checker.equal_types(a, b),
                (None, None) => true,
                _ => false,
            }
            && synthetic
                .param_types()
                .zip(original.params().iter().map(|p| &p.ty))
                .all(|(a, b)| checker.equal_types(a, b))
    }

    fn same_owner(
        &self,
        checker: &TypeChecker<'_>,
        synthetic: &SyntheticFunction,
        original: &FunctionSymbol,
    ) -> bool {
        let original_owner = original.owner();
        if original_owner == synthetic.owner {
            return true;
        }
        // Inherited members are members of the receiving class too
        checker
            .graph()
            .class(original_owner)
            .is_some_and(|class| checker.is_subtype(&self.ty, &class.this_type()))
    }
}

impl fmt::Debug for CompatMemberScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompatMemberScope")
            .field("ty", &self.context.graph().display_type(&self.ty))
            .field("wrapped", &self.wrapped)
            .field("cached", &self.functions.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CompatConfig;
    use crate::fixtures::ViewFixture;
    use crate::scope::ClassMemberScope;
    use pretty_assertions::assert_eq;

    fn compat_scope(fx: &ViewFixture, ty: Type) -> CompatMemberScope {
        let context = Arc::new(CompatContext::new(fx.graph.clone(), CompatConfig::default()));
        let base = ResolutionScope::base(ClassMemberScope::instance(fx.graph.clone(), ty.clone()));
        CompatMemberScope::new(context, ty, base)
    }

    fn lookup(fx: &ViewFixture, scope: &CompatMemberScope, name: &str) -> Arc<[FunctionSymbol]> {
        scope.contributed_functions(fx.graph.name(name).unwrap()).unwrap()
    }

    #[test]
    fn test_equal_signature_is_shadowed() {
        let fx = ViewFixture::new();
        let scope = compat_scope(&fx, Type::class(fx.view));

        let functions = lookup(&fx, &scope, "shadowed");
        assert_eq!(functions.len(), 1);
        assert!(functions[0].is_synthetic());
    }

    #[test]
    fn test_different_parameter_type_is_not_shadowed() {
        let fx = ViewFixture::new();
        let scope = compat_scope(&fx, Type::class(fx.view));

        let functions = lookup(&fx, &scope, "differentParamType");
        assert_eq!(functions.len(), 2);
        assert!(functions[0].is_synthetic());
        assert_eq!(functions[0].params()[0].ty, Type::long());
        assert!(!functions[1].is_synthetic());
        assert_eq!(functions[1].params()[0].ty, Type::int());
    }

    #[test]
    fn test_different_return_type_is_not_shadowed() {
        let fx = ViewFixture::new();
        let scope = compat_scope(&fx, Type::class(fx.view));

        assert_eq!(lookup(&fx, &scope, "differentReturnType").len(), 2);
        // Boolean vs boolean are not type-equal either
        assert_eq!(lookup(&fx, &scope, "boxingResult").len(), 2);
    }

    #[test]
    fn test_inherited_member_is_shadowed_on_subclass() {
        let fx = ViewFixture::new();
        let scope = compat_scope(&fx, Type::class(fx.sub_view));

        let functions = lookup(&fx, &scope, "shadowed");
        assert_eq!(functions.len(), 1);
        assert_eq!(functions[0].owner(), fx.sub_view);
    }

    #[test]
    fn test_synthesized_only() {
        let fx = ViewFixture::new();
        let scope = compat_scope(&fx, Type::class(fx.view));

        let functions = lookup(&fx, &scope, "noArgs");
        assert_eq!(functions.len(), 1);
        assert!(functions[0].params().is_empty());
    }

    #[test]
    fn test_pass_through_for_non_class_type() {
        let fx = ViewFixture::new();
        let scope = compat_scope(&fx, Type::intersection(vec![Type::class(fx.view)]));

        assert!(lookup(&fx, &scope, "noArgs").is_empty());
    }

    #[test]
    fn test_lookup_is_memoized() {
        let fx = ViewFixture::new();
        let scope = compat_scope(&fx, Type::class(fx.view));

        let first = lookup(&fx, &scope, "noArgs");
        let second = lookup(&fx, &scope, "noArgs");
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_broken_provider_surfaces_as_error() {
        let mut b = crate::hir::SymbolGraphBuilder::new();
        let view = b.class("View");
        b.annotate(view, crate::fixtures::compat_annotation("Nowhere"));
        b.function(view, "draw").finish();
        let graph = Arc::new(b.build());
        let context = Arc::new(CompatContext::new(graph.clone(), CompatConfig::default()));
        let ty = Type::class(view);
        let base = ResolutionScope::base(ClassMemberScope::instance(graph.clone(), ty.clone()));
        let scope = CompatMemberScope::new(context, ty, base);

        let err = scope.contributed_functions(graph.name("draw").unwrap()).unwrap_err();
        assert!(matches!(err, CompatError::UnresolvedProvider { .. }));
    }
}
