//! Shared symbol graph and helpers for the integration tests.
//!
//! The graph mirrors a typical compat setup: `View` names `ViewCompat` as
//! its provider, `SubView` inherits it, `Widget` has no provider at all.
//! Classes live in the Android packages so listings show real paths.

#![allow(dead_code)]

use std::ops::Deref;

use shimc::fixtures::ViewFixture;
use shimc::hir::{Expr, Name, Type};
use shimc::typeck::CallArgument;
use shimc::{CompatConfig, CompatSession, Diagnostic, Span};

pub use shimc::fixtures::compat_annotation;

/// The Android-named view fixture.
pub struct Graph(ViewFixture);

impl Deref for Graph {
    type Target = ViewFixture;

    fn deref(&self) -> &ViewFixture {
        &self.0
    }
}

/// Install a test subscriber once; `RUST_LOG` selects the output.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn build() -> Graph {
    Graph(ViewFixture::android())
}

impl Graph {
    pub fn session(&self) -> CompatSession {
        CompatSession::new(self.graph.clone(), CompatConfig::default())
    }

    pub fn name(&self, text: &str) -> Name {
        self.graph
            .name(text)
            .unwrap_or_else(|| panic!("`{}` is not interned", text))
    }

    pub fn view_local(&self) -> Expr {
        Expr::local(1, Type::class(self.view))
    }

    pub fn string_lit(&self, value: &str) -> Expr {
        Expr::string(value, Type::class(self.string))
    }
}

/// Resolve `receiver.name(arguments)` and emit it, returning the listing.
pub fn compile_member_call(
    session: &CompatSession,
    receiver: &Expr,
    name: Name,
    arguments: &[CallArgument],
) -> Result<String, Vec<Diagnostic>> {
    let call = session.resolve_member_call(receiver, name, arguments, Span::dummy())?;
    let (insns, _) = session.generate_call(&call)?;
    Ok(insns
        .iter()
        .map(|insn| insn.to_string())
        .collect::<Vec<_>>()
        .join("\n"))
}
