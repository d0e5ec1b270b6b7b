//! Member scopes and the synthetic scope decoration point.
//!
//! # Module Structure
//!
//! - [`symbol`] - Function symbols: declared, synthesized, SAM-adapted
//! - [`member`] - The member scope contract and class member scopes
//! - [`compat`] - The scope that adds synthesized compat members
//! - [`provider`] - Providers deciding which lookups get decorated

pub mod compat;
pub mod member;
pub mod provider;
pub mod symbol;

pub use compat::CompatMemberScope;
pub use member::{ClassMemberScope, MemberScope, ResolutionScope};
pub use provider::{
    CompatScopeProvider, MemberKinds, SyntheticScopeProvider, SyntheticScopes,
    SyntheticScopesMetadata,
};
pub use symbol::FunctionSymbol;
