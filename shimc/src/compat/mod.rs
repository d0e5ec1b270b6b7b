//! Compat provider discovery and member synthesis.
//!
//! # Module Structure
//!
//! - [`annotation`] - Annotation Index: class -> provider association
//! - [`resolver`] - Compat Set Resolver: type -> provider classes
//! - [`synthetic`] - Synthesized member functions and their factory
//! - [`error`] - Declaration errors
//!
//! [`CompatContext`] bundles the symbol graph, the configuration and the
//! memoized lookups so every scope and provider of a session shares them.

pub mod annotation;
pub mod error;
pub mod resolver;
pub mod synthetic;

use std::sync::Arc;

use tracing::debug;

pub use annotation::{AnnotationIndex, ProviderAssociation};
pub use error::CompatError;
pub use resolver::{CompatSet, CompatSetResolver};
pub use synthetic::{SyntheticFunction, SyntheticSkeleton};

use crate::config::CompatConfig;
use crate::hir::{ClassDef, Name, SymbolGraph, Type};
use crate::typeck::TypeChecker;

/// Shared state of the compat machinery for one compilation.
#[derive(Debug)]
pub struct CompatContext {
    graph: Arc<SymbolGraph>,
    config: CompatConfig,
    annotations: AnnotationIndex,
    providers: CompatSetResolver,
}

impl CompatContext {
    pub fn new(graph: Arc<SymbolGraph>, config: CompatConfig) -> Self {
        let annotations = AnnotationIndex::new(config.marker_fq_name(), config.value_argument.clone());
        Self {
            graph,
            config,
            annotations,
            providers: CompatSetResolver::new(),
        }
    }

    pub fn graph(&self) -> &Arc<SymbolGraph> {
        &self.graph
    }

    pub fn config(&self) -> &CompatConfig {
        &self.config
    }

    pub fn type_checker(&self) -> TypeChecker<'_> {
        TypeChecker::new(&self.graph)
    }

    pub fn find_provider(&self, class: &ClassDef) -> Result<Option<ProviderAssociation>, CompatError> {
        self.annotations.find_provider(&self.graph, class)
    }

    pub fn compat_providers(&self, ty: &Type) -> Result<CompatSet, CompatError> {
        self.providers
            .compat_providers(&self.graph, &self.annotations, ty)
    }

    /// Synthesize the members named `name` that `ty`'s providers contribute.
    ///
    /// Returns nothing for types without a class declaration.
    pub fn synthesize(&self, ty: &Type, name: Name) -> Result<Vec<Arc<SyntheticFunction>>, CompatError> {
        let Some(owner) = ty.class_def().and_then(|id| self.graph.class(id)) else {
            return Ok(Vec::new());
        };
        let providers = self.compat_providers(ty)?;
        if providers.is_empty() {
            return Ok(Vec::new());
        }

        let functions = synthetic::synthesize(&self.graph, owner, ty, &providers, name);
        debug!(
            ty = %self.graph.display_type(ty),
            name = self.graph.name_str(name),
            count = functions.len(),
            "synthesized compat members"
        );
        Ok(functions)
    }
}
