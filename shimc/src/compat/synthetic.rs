//! Synthesized member functions.
//!
//! A [`SyntheticFunction`] looks like an instance member of the receiving
//! class but forwards to a static function of a provider class. Its value
//! parameters are the provider function's parameters without the first one,
//! which is where the receiver goes at the call site.
//!
//! Construction is two-step: [`SyntheticSkeleton::mirror`] copies the shape
//! of the provider function, and [`SyntheticSkeleton::finalize`] attaches the
//! forwarded function. A [`SyntheticFunction`] only exists once both steps
//! are done.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use tracing::trace;

use crate::hir::{
    Annotation, ClassDef, DefId, FnDef, Modality, Name, SymbolGraph, TyVarId, Type, ValueParam,
    Visibility,
};
use crate::span::Span;
use crate::typeck::TypeChecker;

/// A member function that forwards to a static provider function.
///
/// Identity is `(owner, name, parameter types, return type)`. Two
/// synthesized functions built by separate lookups of the same key compare
/// equal.
#[derive(Debug, Clone)]
pub struct SyntheticFunction {
    /// The receiving class the function appears to be a member of.
    pub owner: DefId,
    pub name: Name,
    /// Provider parameters `[1..]`, re-indexed from zero.
    pub params: Vec<ValueParam>,
    pub return_type: Option<Type>,
    pub type_params: Vec<TyVarId>,
    pub modality: Modality,
    pub visibility: Visibility,
    pub annotations: Vec<Annotation>,
    pub span: Span,
    base: Arc<FnDef>,
}

impl SyntheticFunction {
    /// The provider function this one forwards to.
    pub fn base(&self) -> &Arc<FnDef> {
        &self.base
    }

    pub fn param_types(&self) -> impl Iterator<Item = &Type> {
        self.params.iter().map(|p| &p.ty)
    }

    pub fn has_defaults(&self) -> bool {
        self.params.iter().any(|p| p.has_default)
    }
}

impl PartialEq for SyntheticFunction {
    fn eq(&self, other: &Self) -> bool {
        self.owner == other.owner
            && self.name == other.name
            && self.return_type == other.return_type
            && self.params.len() == other.params.len()
            && self.param_types().zip(other.param_types()).all(|(a, b)| a == b)
    }
}

impl Eq for SyntheticFunction {}

impl Hash for SyntheticFunction {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.owner.hash(state);
        self.name.hash(state);
        for ty in self.param_types() {
            ty.hash(state);
        }
        self.return_type.hash(state);
    }
}

/// The shape of a synthesized function before it is bound to the function
/// it forwards to.
#[derive(Debug, Clone)]
pub struct SyntheticSkeleton {
    owner: DefId,
    name: Name,
    params: Vec<ValueParam>,
    return_type: Option<Type>,
    type_params: Vec<TyVarId>,
    modality: Modality,
    visibility: Visibility,
    annotations: Vec<Annotation>,
    span: Span,
    mirrored: DefId,
}

impl SyntheticSkeleton {
    /// Mirror `candidate` as a member of `owner`, dropping its first
    /// parameter. Returns `None` if `candidate` has no parameters.
    pub fn mirror(owner: DefId, candidate: &FnDef) -> Option<Self> {
        let (_, rest) = candidate.params.split_first()?;
        let params = rest
            .iter()
            .map(|param| ValueParam {
                index: param.index - 1,
                ..param.clone()
            })
            .collect();

        Some(Self {
            owner,
            name: candidate.name,
            params,
            return_type: candidate.return_type.clone(),
            type_params: candidate.type_params.clone(),
            modality: candidate.modality,
            visibility: candidate.visibility,
            annotations: candidate.annotations.clone(),
            span: candidate.span,
            mirrored: candidate.def_id,
        })
    }

    /// Bind the skeleton to the function it forwards to.
    ///
    /// Returns `None` if `base` is not the function this skeleton mirrors.
    pub fn finalize(self, base: Arc<FnDef>) -> Option<SyntheticFunction> {
        if base.def_id != self.mirrored || base.params.len() != self.params.len() + 1 {
            return None;
        }
        Some(SyntheticFunction {
            owner: self.owner,
            name: self.name,
            params: self.params,
            return_type: self.return_type,
            type_params: self.type_params,
            modality: self.modality,
            visibility: self.visibility,
            annotations: self.annotations,
            span: self.span,
            base,
        })
    }
}

/// Whether a provider function can back a synthesized member of `owner_ty`.
pub fn is_eligible(checker: &TypeChecker<'_>, owner_ty: &Type, candidate: &FnDef) -> bool {
    candidate.visibility == Visibility::Public
        && candidate
            .params
            .first()
            .is_some_and(|receiver| checker.is_subtype(owner_ty, &receiver.ty))
}

/// Synthesize the members named `name` that `providers` contribute to
/// `owner_ty`.
///
/// Providers are visited in order and each provider's static functions in
/// declaration order.
pub fn synthesize(
    graph: &SymbolGraph,
    owner: &ClassDef,
    owner_ty: &Type,
    providers: &[Arc<ClassDef>],
    name: Name,
) -> Vec<Arc<SyntheticFunction>> {
    let checker = TypeChecker::new(graph);
    let mut result = Vec::new();

    for provider in providers {
        for candidate in graph.functions_named(&provider.statics, name) {
            if !is_eligible(&checker, owner_ty, candidate) {
                trace!(
                    provider = graph.name_str(provider.name),
                    function = graph.name_str(name),
                    "provider function not eligible"
                );
                continue;
            }
            let synthesized = SyntheticSkeleton::mirror(owner.def_id, candidate)
                .and_then(|skeleton| skeleton.finalize(candidate.clone()));
            if let Some(synthesized) = synthesized {
                result.push(Arc::new(synthesized));
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::ViewFixture;
    use pretty_assertions::assert_eq;

    fn synthesize_named(fx: &ViewFixture, owner: DefId, name: &str) -> Vec<Arc<SyntheticFunction>> {
        let graph = &fx.graph;
        let class = graph.class(owner).unwrap();
        let provider = graph.class(fx.view_compat).unwrap().clone();
        synthesize(
            graph,
            class,
            &class.this_type(),
            &[provider],
            graph.name(name).unwrap(),
        )
    }

    #[test]
    fn test_parameters_are_shifted_and_reindexed() {
        let fx = ViewFixture::new();
        let functions = synthesize_named(&fx, fx.view, "withDefaults");

        assert_eq!(functions.len(), 1);
        let f = &functions[0];
        assert_eq!(f.params.len(), f.base().params.len() - 1);
        assert_eq!(f.params.iter().map(|p| p.index).collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(
            f.params.iter().map(|p| fx.graph.name_str(p.name)).collect::<Vec<_>>(),
            vec!["count", "label"]
        );
        assert!(f.params.iter().all(|p| p.has_default));
        assert_eq!(f.owner, fx.view);
        assert_eq!(f.base().owner, fx.view_compat);
    }

    #[test]
    fn test_first_parameter_must_accept_owner() {
        let fx = ViewFixture::new();

        // boxing(Integer) is not eligible, boxing(View, Integer) is
        let functions = synthesize_named(&fx, fx.view, "boxing");
        assert_eq!(functions.len(), 1);
        assert_eq!(functions[0].params.len(), 1);
        assert_eq!(functions[0].params[0].ty, Type::class(fx.integer));
    }

    #[test]
    fn test_supertype_first_parameter_is_eligible() {
        let fx = ViewFixture::new();
        let functions = synthesize_named(&fx, fx.sub_view, "noArgs");

        assert_eq!(functions.len(), 1);
        assert_eq!(functions[0].owner, fx.sub_view);
        assert!(functions[0].params.is_empty());
    }

    #[test]
    fn test_non_public_is_not_eligible() {
        let fx = ViewFixture::new();
        assert!(synthesize_named(&fx, fx.view, "hidden").is_empty());
    }

    #[test]
    fn test_vararg_element_is_copied() {
        let fx = ViewFixture::new();
        let functions = synthesize_named(&fx, fx.view, "vararg");

        assert_eq!(functions.len(), 1);
        assert_eq!(functions[0].params[0].vararg_element, Some(Type::int()));
    }

    #[test]
    fn test_identity_ignores_base_instance() {
        let fx = ViewFixture::new();
        let first = synthesize_named(&fx, fx.view, "noArgs");
        let second = synthesize_named(&fx, fx.view, "noArgs");

        assert!(!Arc::ptr_eq(&first[0], &second[0]));
        assert_eq!(first, second);
    }

    #[test]
    fn test_finalize_rejects_other_function() {
        let fx = ViewFixture::new();
        let graph = &fx.graph;
        let compat = graph.class(fx.view_compat).unwrap();
        let no_args_name = graph.name("noArgs").unwrap();
        let vararg_name = graph.name("vararg").unwrap();
        let no_args = graph.functions_named(&compat.statics, no_args_name).next().unwrap();
        let vararg = graph.functions_named(&compat.statics, vararg_name).next().unwrap();

        let skeleton = SyntheticSkeleton::mirror(fx.view, no_args).unwrap();
        assert!(skeleton.clone().finalize(vararg.clone()).is_none());
        assert!(skeleton.finalize(no_args.clone()).is_some());
    }
}
