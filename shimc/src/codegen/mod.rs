//! JVM call-site code generation.
//!
//! Lowers resolved calls to instruction lists. Calls of synthesized compat
//! members never reach the default dispatch: the [`CompatCallRedirector`]
//! extension rewrites them into static calls of the provider function with
//! the receiver passed as the first argument.
//!
//! # Module Structure
//!
//! - [`types`] - `AsmType`, descriptors, and the type mapper
//! - [`insn`] - Instructions and the instruction adapter
//! - [`stack`] - Stack values and type conversions
//! - [`args`] - Argument and receiver generation contracts, default masks
//! - [`expr`] - Expression emission
//! - [`extension`] - Codegen extensions and the compat call redirector
//! - [`call`] - Call emission with extension dispatch
//!
//! # Pipeline
//!
//! ```text
//! ResolvedCall ──► CallGenerator ──► extensions (CompatCallRedirector, ...)
//!                        │                    │ declined
//!                        ▼                    ▼
//!                 default dispatch ◄──────────┘
//!                        │
//!                        ▼
//!                 InstructionAdapter ──► Vec<Insn>
//! ```

pub mod args;
pub mod call;
pub mod expr;
pub mod extension;
pub mod insn;
pub mod stack;
pub mod types;

pub use args::{ArgumentGenerator, DefaultMask, ReceiverGenerator};
pub use call::CallGenerator;
pub use expr::ExpressionCodegen;
pub use extension::{CompatCallRedirector, ExpressionCodegenExtension, ExtensionContext};
pub use insn::{InstructionAdapter, Insn, InvokeOpcode};
pub use stack::StackValue;
pub use types::{AsmType, CallableMethod, TypeMapper};
