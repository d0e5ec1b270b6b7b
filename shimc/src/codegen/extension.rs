//! Call generation hooks and the compat call redirector.
//!
//! Extensions see every resolved call before the default dispatch and may
//! emit it themselves. [`CompatCallRedirector`] claims calls to synthesized
//! members and lowers them to a static call of the provider function:
//!
//! ```text
//! view.multipleArgs(1, 2L)        aload 1
//!                          ==>    iconst 1
//!                                 lconst 2
//!                                 invokestatic ViewCompat.multipleArgs(LView;IJ)V
//! ```

use std::fmt;

use tracing::debug;

use crate::diagnostics::Diagnostic;
use crate::ice_err;
use crate::scope::FunctionSymbol;
use crate::typeck::ResolvedCall;

use super::args::{ArgumentGenerator, ReceiverGenerator};
use super::expr::ExpressionCodegen;
use super::insn::InstructionAdapter;
use super::stack::StackValue;

/// Codegen state handed to extensions.
pub struct ExtensionContext<'a, 'g> {
    pub codegen: &'a mut ExpressionCodegen<'g>,
    pub v: &'a mut InstructionAdapter,
}

/// A hook that may take over the emission of a call.
pub trait ExpressionCodegenExtension: Send + Sync + fmt::Debug {
    /// Emit `call` and return its result, or return `Ok(None)` to leave the
    /// call to the next extension or the default dispatch. Nothing may be
    /// emitted when declining.
    fn apply_function(
        &self,
        call: &ResolvedCall,
        c: &mut ExtensionContext<'_, '_>,
    ) -> Result<Option<StackValue>, Vec<Diagnostic>>;
}

/// Redirects calls of synthesized members to their provider functions.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompatCallRedirector;

impl CompatCallRedirector {
    pub fn new() -> Self {
        Self
    }
}

impl ExpressionCodegenExtension for CompatCallRedirector {
    fn apply_function(
        &self,
        call: &ResolvedCall,
        c: &mut ExtensionContext<'_, '_>,
    ) -> Result<Option<StackValue>, Vec<Diagnostic>> {
        let FunctionSymbol::Synthetic(compat) = call.candidate.unwrap_sam_adapter() else {
            return Ok(None);
        };
        let base = compat.base();

        let receiver = call.dispatch_receiver.as_ref().ok_or_else(|| {
            vec![ice_err!(call.span, "call of a synthesized member has no dispatch receiver";
                "function" => c.codegen.graph().name_str(compat.name))]
        })?;

        let graph = c.codegen.graph();
        let mapper = c.codegen.type_mapper();
        let owner = graph.class(compat.owner).ok_or_else(|| {
            vec![ice_err!(call.span, "synthesized member owner is not in the symbol graph";
                "function" => graph.name_str(compat.name))]
        })?;

        c.codegen.put_receiver(&receiver.expr, &mapper.map_class(owner), c.v)?;

        let lowered = mapper.map_synthetic(compat)?;
        let mask = c.codegen.generate_arguments(
            &compat.params,
            &lowered.value_parameter_types,
            &call.value_arguments,
            c.v,
        )?;

        let method = if mask.is_empty() {
            mapper.map_to_callable_method(base)?
        } else {
            // The provider takes the receiver as its first parameter
            for word in mask.shifted(1, base.params.len()).words() {
                c.v.iconst(*word as i32);
            }
            c.v.aconst_null();
            mapper.map_default_method(base)?
        };
        c.v.invokestatic(&method.owner, &method.name, &method.descriptor, false);

        debug!(
            member = graph.name_str(compat.name),
            target = %format_args!("{}.{}{}", method.owner, method.name, method.descriptor),
            "redirected synthesized member call"
        );
        Ok(Some(StackValue::new(method.return_type)))
    }
}
