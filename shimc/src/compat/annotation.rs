//! Annotation Index: reads a class's provider association from its marker
//! annotation.

use tracing::debug;

use crate::hir::{ClassDef, DefId, FqName, SymbolGraph};
use crate::span::Span;
use crate::storage::MemoizedFunction;

use super::error::CompatError;

/// A class's declared association with an external provider class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderAssociation {
    pub origin: DefId,
    /// Package part of the provider name; the root package if unqualified.
    pub package: FqName,
    pub simple_name: String,
    /// Span of the marker annotation.
    pub span: Span,
}

impl ProviderAssociation {
    fn parse(origin: DefId, provider: &str, span: Span) -> Self {
        let fq_name = FqName::new(provider);
        let (package, simple_name) = fq_name.split_last();
        Self {
            origin,
            package,
            simple_name: simple_name.to_string(),
            span,
        }
    }

    /// The provider's name as written in the annotation.
    pub fn provider_name(&self) -> FqName {
        self.package.child(&self.simple_name)
    }
}

/// Memoized class -> provider association lookup.
#[derive(Debug)]
pub struct AnnotationIndex {
    marker: FqName,
    value_argument: String,
    associations: MemoizedFunction<DefId, Result<Option<ProviderAssociation>, CompatError>>,
}

impl AnnotationIndex {
    pub fn new(marker: FqName, value_argument: impl Into<String>) -> Self {
        Self {
            marker,
            value_argument: value_argument.into(),
            associations: MemoizedFunction::new(),
        }
    }

    pub fn marker(&self) -> &FqName {
        &self.marker
    }

    /// Find the provider declared on `class`.
    ///
    /// Only the class's own annotations are consulted. Callers are expected
    /// to have filtered out interfaces.
    pub fn find_provider(
        &self,
        graph: &SymbolGraph,
        class: &ClassDef,
    ) -> Result<Option<ProviderAssociation>, CompatError> {
        self.associations
            .get_or_compute(&class.def_id, |_| self.read_association(graph, class))
    }

    fn read_association(
        &self,
        graph: &SymbolGraph,
        class: &ClassDef,
    ) -> Result<Option<ProviderAssociation>, CompatError> {
        let Some(annotation) = class.annotation(&self.marker) else {
            return Ok(None);
        };

        let class_name = || graph.fq_name(class).to_string();
        let value = annotation
            .argument(&self.value_argument)
            .ok_or_else(|| CompatError::MissingValue {
                class: class_name(),
                argument: self.value_argument.clone(),
                span: annotation.span,
            })?;
        let provider = value.as_str().ok_or_else(|| CompatError::NonStringValue {
            class: class_name(),
            found: value.describe(),
            span: annotation.span,
        })?;

        let association = ProviderAssociation::parse(class.def_id, provider, annotation.span);
        debug!(
            class = %graph.fq_name(class),
            provider = %association.provider_name(),
            "found compat provider association"
        );
        Ok(Some(association))
    }
}
