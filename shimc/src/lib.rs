//! Compatibility shims for the compiler.
//!
//! A class can name an external *provider* class through a marker annotation.
//! Public static functions of the provider whose first parameter accepts the
//! class are then visible as if they were members of the class, and calls to
//! them are compiled as static calls on the provider.
//!
//! # Architecture
//!
//! ```text
//!            resolution time                          code generation time
//! ┌────────────────┐   ┌──────────────────┐        ┌──────────────────────┐
//! │ AnnotationIndex│──►│ CompatSetResolver│        │ CallGenerator        │
//! └────────────────┘   └────────┬─────────┘        │  └ CompatCallRedirector
//!                               ▼                  └──────────▲───────────┘
//! ┌────────────────┐   ┌──────────────────┐                   │
//! │ SyntheticScopes│──►│ CompatMemberScope│── ResolvedCall ───┘
//! └────────────────┘   └──────────────────┘
//! ```
//!
//! # Module Structure
//!
//! - [`hir`] - The read-only symbol graph the shims are computed from
//! - [`typeck`] - Subtyping, SAM adapters and the reference call resolver
//! - [`compat`] - Provider discovery and synthesized member construction
//! - [`scope`] - Member scopes and the synthetic scope providers
//! - [`codegen`] - Call emission and the compat call redirector
//! - [`session`] - Wiring of all of the above for one compilation

pub mod codegen;
pub mod compat;
pub mod config;
pub mod diagnostics;
pub mod hir;
pub mod scope;
pub mod session;
pub mod span;
pub mod storage;
pub mod typeck;

#[doc(hidden)]
pub mod fixtures;

pub use compat::{CompatContext, CompatError, SyntheticFunction};
pub use config::CompatConfig;
pub use diagnostics::{Diagnostic, DiagnosticKind};
pub use scope::{
    CompatScopeProvider, FunctionSymbol, MemberKinds, ResolutionScope, SyntheticScopesMetadata,
};
pub use session::CompatSession;
pub use span::Span;
