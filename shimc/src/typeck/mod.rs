//! Type checking services used by the compat machinery.
//!
//! # Module Structure
//!
//! - [`subtype`] - Subtyping and type equality
//! - [`sam`] - SAM adapters for lambda arguments
//! - [`call`] - Call arguments and resolved calls
//! - [`overload`] - Call resolution among scope contributions

pub mod call;
pub mod overload;
pub mod sam;
pub mod subtype;

pub use call::{CallArgument, Receiver, ResolvedCall, ResolvedValueArgument};
pub use overload::{CallResolver, ResolveError};
pub use sam::{sam_function_type, SamAdapter};
pub use subtype::TypeChecker;
