//! Compat Set Resolver: the provider classes visible to a receiver type.

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;

use crate::hir::{ClassDef, Classifier, DefId, SymbolGraph, Type};
use crate::storage::MemoizedFunction;

use super::annotation::{AnnotationIndex, ProviderAssociation};
use super::error::CompatError;

/// The distinct provider classes of a type, in discovery order.
pub type CompatSet = Arc<[Arc<ClassDef>]>;

/// Memoized class -> compat set lookup.
#[derive(Debug, Default)]
pub struct CompatSetResolver {
    sets: MemoizedFunction<DefId, Result<CompatSet, CompatError>>,
}

impl CompatSetResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect the providers of every class in `ty`'s supertype chain and of
    /// `ty` itself.
    ///
    /// Supertypes are visited nearest first and `ty` last. Interfaces are
    /// skipped. A type with no class declaration has no providers.
    pub fn compat_providers(
        &self,
        graph: &SymbolGraph,
        index: &AnnotationIndex,
        ty: &Type,
    ) -> Result<CompatSet, CompatError> {
        let Some(def_id) = ty.class_def() else {
            return Ok(Arc::from(Vec::new()));
        };
        self.sets
            .get_or_compute(&def_id, |_| Self::collect(graph, index, ty))
    }

    fn collect(
        graph: &SymbolGraph,
        index: &AnnotationIndex,
        ty: &Type,
    ) -> Result<CompatSet, CompatError> {
        let mut chain = graph.all_supertypes(ty);
        chain.push(ty.clone());

        let mut providers: IndexMap<DefId, Arc<ClassDef>> = IndexMap::new();
        for class in chain
            .iter()
            .filter_map(|t| t.class_def())
            .filter_map(|id| graph.class(id))
            .filter(|class| !class.is_interface())
        {
            let Some(association) = index.find_provider(graph, class)? else {
                continue;
            };
            let provider = resolve_provider(graph, class, &association)?;
            providers.entry(provider.def_id).or_insert(provider);
        }

        debug!(
            ty = %graph.display_type(ty),
            providers = providers.len(),
            "resolved compat set"
        );
        Ok(providers.into_values().collect())
    }
}

/// Resolve an association's provider name to a class declaration.
pub fn resolve_provider(
    graph: &SymbolGraph,
    origin: &ClassDef,
    association: &ProviderAssociation,
) -> Result<Arc<ClassDef>, CompatError> {
    match graph.classifier(&association.package, &association.simple_name) {
        Some(Classifier::Class(class)) => Ok(class),
        Some(Classifier::TypeAlias(_)) => Err(CompatError::ProviderNotAClass {
            class: graph.fq_name(origin).to_string(),
            provider: association.provider_name().to_string(),
            span: association.span,
        }),
        None => Err(CompatError::UnresolvedProvider {
            class: graph.fq_name(origin).to_string(),
            provider: association.provider_name().to_string(),
            span: association.span,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_MARKER_ANNOTATION;
    use crate::fixtures::{compat_annotation, ViewFixture};
    use crate::hir::{FqName, SymbolGraphBuilder};
    use pretty_assertions::assert_eq;

    fn index() -> AnnotationIndex {
        AnnotationIndex::new(FqName::new(DEFAULT_MARKER_ANNOTATION), "value")
    }

    fn provider_ids(set: &CompatSet) -> Vec<DefId> {
        set.iter().map(|c| c.def_id).collect()
    }

    #[test]
    fn test_own_provider() {
        let fx = ViewFixture::new();
        let set = CompatSetResolver::new()
            .compat_providers(&fx.graph, &index(), &Type::class(fx.view))
            .unwrap();
        assert_eq!(provider_ids(&set), vec![fx.view_compat]);
    }

    #[test]
    fn test_inherited_provider() {
        let fx = ViewFixture::new();
        let set = CompatSetResolver::new()
            .compat_providers(&fx.graph, &index(), &Type::class(fx.sub_view))
            .unwrap();
        assert_eq!(provider_ids(&set), vec![fx.view_compat]);
    }

    #[test]
    fn test_no_provider() {
        let fx = ViewFixture::new();
        let set = CompatSetResolver::new()
            .compat_providers(&fx.graph, &index(), &Type::class(fx.widget))
            .unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_interface_annotations_are_ignored() {
        let fx = ViewFixture::new();
        // Drawable names a provider that does not exist.
        let set = CompatSetResolver::new()
            .compat_providers(&fx.graph, &index(), &Type::class(fx.drawable))
            .unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_supertype_providers_come_before_own() {
        let mut b = SymbolGraphBuilder::new();
        let base_compat = b.class("BaseCompat");
        let leaf_compat = b.class("LeafCompat");
        let base = b.class("Base");
        b.annotate(base, compat_annotation("BaseCompat"));
        let leaf = b.class("Leaf");
        b.add_supertype(leaf, Type::class(base));
        b.annotate(leaf, compat_annotation("LeafCompat"));
        let graph = b.build();

        let set = CompatSetResolver::new()
            .compat_providers(&graph, &index(), &Type::class(leaf))
            .unwrap();
        assert_eq!(provider_ids(&set), vec![base_compat, leaf_compat]);
    }

    #[test]
    fn test_shared_provider_is_listed_once() {
        let mut b = SymbolGraphBuilder::new();
        let shared = b.class("SharedCompat");
        let base = b.class("Base");
        b.annotate(base, compat_annotation("SharedCompat"));
        let leaf = b.class("Leaf");
        b.add_supertype(leaf, Type::class(base));
        b.annotate(leaf, compat_annotation("SharedCompat"));
        let graph = b.build();

        let set = CompatSetResolver::new()
            .compat_providers(&graph, &index(), &Type::class(leaf))
            .unwrap();
        assert_eq!(provider_ids(&set), vec![shared]);
    }

    #[test]
    fn test_unresolved_provider() {
        let mut b = SymbolGraphBuilder::new();
        let view = b.class("View");
        b.annotate(view, compat_annotation("missing.ViewCompat"));
        let graph = b.build();

        let err = CompatSetResolver::new()
            .compat_providers(&graph, &index(), &Type::class(view))
            .unwrap_err();
        assert_eq!(
            err,
            CompatError::UnresolvedProvider {
                class: "View".into(),
                provider: "missing.ViewCompat".into(),
                span: crate::span::Span::dummy(),
            }
        );
    }

    #[test]
    fn test_alias_provider_is_not_a_class() {
        let mut b = SymbolGraphBuilder::new();
        let real = b.class("RealCompat");
        b.type_alias("ViewCompat", Type::class(real));
        let view = b.class("View");
        b.annotate(view, compat_annotation("ViewCompat"));
        let graph = b.build();

        let err = CompatSetResolver::new()
            .compat_providers(&graph, &index(), &Type::class(view))
            .unwrap_err();
        assert!(matches!(err, CompatError::ProviderNotAClass { .. }));
        assert_eq!(err.code(), "E0703");
    }

    #[test]
    fn test_error_in_supertype_surfaces_on_subtype() {
        let mut b = SymbolGraphBuilder::new();
        let base = b.class("Base");
        b.annotate(base, compat_annotation("Nowhere"));
        let leaf = b.class("Leaf");
        b.add_supertype(leaf, Type::class(base));
        let graph = b.build();

        let result = CompatSetResolver::new().compat_providers(&graph, &index(), &Type::class(leaf));
        assert!(matches!(result, Err(CompatError::UnresolvedProvider { .. })));
    }

    #[test]
    fn test_type_parameter_has_no_providers() {
        let mut b = SymbolGraphBuilder::new();
        let t = b.type_param("T", vec![]);
        let graph = b.build();

        let set = CompatSetResolver::new()
            .compat_providers(&graph, &index(), &Type::param(t))
            .unwrap();
        assert!(set.is_empty());
    }
}
