//! Synthetic scope providers.
//!
//! A [`SyntheticScopeProvider`] gets a chance to decorate every member scope
//! handed to call resolution. [`SyntheticScopes`] runs the registered
//! providers in registration order, each one seeing the previous one's
//! result.

use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;
use tracing::debug;

use crate::compat::CompatContext;
use crate::hir::Type;
use crate::storage::MemoizedFunction;

use super::compat::CompatMemberScope;
use super::member::ResolutionScope;

bitflags! {
    /// The kinds of members a lookup is after.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MemberKinds: u8 {
        const MEMBER_FUNCTIONS = 1 << 0;
        const EXTENSION_FUNCTIONS = 1 << 1;
        /// Properties are read through their getter, itself a function.
        const EXTENSION_PROPERTIES = 1 << 2;
        const STATIC_FUNCTIONS = 1 << 3;
    }
}

/// What the caller of a scope lookup is after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntheticScopesMetadata {
    /// The type whose members are looked up, if known.
    pub ty: Option<Type>,
    pub needs: MemberKinds,
}

impl SyntheticScopesMetadata {
    pub fn new(ty: Option<Type>, needs: MemberKinds) -> Self {
        Self { ty, needs }
    }

    pub fn member_functions(ty: Type) -> Self {
        Self::new(Some(ty), MemberKinds::MEMBER_FUNCTIONS)
    }
}

/// A decoration point for member scopes. Implementations must not mutate
/// the scope they are given.
pub trait SyntheticScopeProvider: Send + Sync + fmt::Debug {
    fn provide_synthetic_scope(
        &self,
        scope: ResolutionScope,
        metadata: &SyntheticScopesMetadata,
    ) -> ResolutionScope;
}

/// Wraps class member scopes with [`CompatMemberScope`].
///
/// The provider itself is stateless; the wrapped scopes are memoized per
/// `(type, wrapped scope)` so repeated lookups share one compat scope and
/// its caches.
pub struct CompatScopeProvider {
    context: Arc<CompatContext>,
    /// Keyed by the wrapped scope's address. Each entry holds that scope
    /// alive, so an address is never reused while its entry exists; every
    /// distinct base scope passed in stays pinned for the provider's life.
    scopes: MemoizedFunction<(Type, usize), Arc<CompatMemberScope>>,
}

impl CompatScopeProvider {
    pub fn new(context: Arc<CompatContext>) -> Self {
        Self {
            context,
            scopes: MemoizedFunction::new(),
        }
    }

    pub fn context(&self) -> &Arc<CompatContext> {
        &self.context
    }

    /// Whether a lookup described by `metadata` gets compat members.
    pub fn should_wrap(&self, metadata: &SyntheticScopesMetadata) -> bool {
        if !self.context.config().enabled {
            return false;
        }
        let Some(ty) = &metadata.ty else {
            return false;
        };
        let is_class = ty
            .class_def()
            .and_then(|id| self.context.graph().class(id))
            .is_some();
        is_class
            && metadata
                .needs
                .intersects(MemberKinds::MEMBER_FUNCTIONS | MemberKinds::EXTENSION_PROPERTIES)
    }
}

impl SyntheticScopeProvider for CompatScopeProvider {
    fn provide_synthetic_scope(
        &self,
        scope: ResolutionScope,
        metadata: &SyntheticScopesMetadata,
    ) -> ResolutionScope {
        let Some(ty) = metadata.ty.as_ref().filter(|_| self.should_wrap(metadata)) else {
            return scope;
        };

        let key = (ty.clone(), scope.identity());
        let compat = self.scopes.get_or_compute(&key, |(ty, _)| {
            debug!(ty = %self.context.graph().display_type(ty), "installing compat member scope");
            Arc::new(CompatMemberScope::new(self.context.clone(), ty.clone(), scope.clone()))
        });
        ResolutionScope::Compat(compat)
    }
}

impl fmt::Debug for CompatScopeProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompatScopeProvider")
            .field("enabled", &self.context.config().enabled)
            .field("scopes", &self.scopes.len())
            .finish()
    }
}

/// The registered synthetic scope providers.
#[derive(Debug, Clone, Default)]
pub struct SyntheticScopes {
    providers: Vec<Arc<dyn SyntheticScopeProvider>>,
}

impl SyntheticScopes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, provider: Arc<dyn SyntheticScopeProvider>) {
        self.providers.push(provider);
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Run `scope` through every registered provider.
    pub fn apply(&self, scope: ResolutionScope, metadata: &SyntheticScopesMetadata) -> ResolutionScope {
        self.providers
            .iter()
            .fold(scope, |scope, provider| provider.provide_synthetic_scope(scope, metadata))
    }
}
