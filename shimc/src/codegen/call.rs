//! Call emission.

use std::sync::Arc;

use crate::diagnostics::Diagnostic;
use crate::ice_err;
use crate::scope::FunctionSymbol;
use crate::typeck::ResolvedCall;

use super::args::{ArgumentGenerator, ReceiverGenerator};
use super::expr::ExpressionCodegen;
use super::extension::{ExpressionCodegenExtension, ExtensionContext};
use super::insn::InstructionAdapter;
use super::stack::StackValue;

/// Emits resolved calls, offering each to the registered extensions first.
#[derive(Debug, Clone, Default)]
pub struct CallGenerator {
    extensions: Vec<Arc<dyn ExpressionCodegenExtension>>,
}

impl CallGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extensions are consulted in registration order.
    pub fn register(&mut self, extension: Arc<dyn ExpressionCodegenExtension>) {
        self.extensions.push(extension);
    }

    pub fn extensions(&self) -> &[Arc<dyn ExpressionCodegenExtension>] {
        &self.extensions
    }

    pub fn gen_call(
        &self,
        codegen: &mut ExpressionCodegen<'_>,
        call: &ResolvedCall,
        v: &mut InstructionAdapter,
    ) -> Result<StackValue, Vec<Diagnostic>> {
        for extension in &self.extensions {
            let mut c = ExtensionContext {
                codegen: &mut *codegen,
                v: &mut *v,
            };
            if let Some(value) = extension.apply_function(call, &mut c)? {
                return Ok(value);
            }
        }
        self.gen_default(codegen, call, v)
    }

    fn gen_default(
        &self,
        codegen: &mut ExpressionCodegen<'_>,
        call: &ResolvedCall,
        v: &mut InstructionAdapter,
    ) -> Result<StackValue, Vec<Diagnostic>> {
        let graph = codegen.graph();
        let function = match call.candidate.unwrap_sam_adapter() {
            FunctionSymbol::Declared(function) => function,
            FunctionSymbol::Synthetic(function) => {
                return Err(vec![ice_err!(call.span,
                    "synthesized member reached default call emission";
                    "function" => graph.name_str(function.name))]);
            }
            FunctionSymbol::SamAdapted(_) => {
                return Err(vec![ice_err!(call.span, "nested SAM adapter in resolved call")]);
            }
        };

        // Members seen through a parameterized type keep the erased
        // descriptor of their declaration.
        let declaration = graph.function(function.def_id).unwrap_or(function);
        let mapper = codegen.type_mapper();
        let method = mapper.map_to_callable_method(declaration)?;

        if !function.is_static {
            let receiver = call.dispatch_receiver.as_ref().ok_or_else(|| {
                vec![ice_err!(call.span, "member call has no dispatch receiver";
                    "function" => graph.name_str(function.name))]
            })?;
            let owner = graph.class(function.owner).ok_or_else(|| {
                vec![ice_err!(call.span, "function owner is not in the symbol graph";
                    "function" => graph.name_str(function.name))]
            })?;
            codegen.put_receiver(&receiver.expr, &mapper.map_class(owner), v)?;
        }

        let mask = codegen.generate_arguments(
            &function.params,
            &method.value_parameter_types,
            &call.value_arguments,
            v,
        )?;

        if mask.is_empty() {
            v.invoke(
                method.opcode,
                &method.owner,
                &method.name,
                &method.descriptor,
                method.is_interface,
            );
            return Ok(StackValue::new(method.return_type));
        }

        for word in mask.words() {
            v.iconst(*word as i32);
        }
        v.aconst_null();
        let bridge = mapper.map_default_method(declaration)?;
        v.invokestatic(&bridge.owner, &bridge.name, &bridge.descriptor, false);
        Ok(StackValue::new(bridge.return_type))
    }
}
