//! Expression code generation for call receivers and arguments.

use crate::diagnostics::Diagnostic;
use crate::hir::{Expr, ExprKind, Literal, SymbolGraph, Type, ValueParam};
use crate::ice_err;
use crate::span::Span;
use crate::typeck::{sam_function_type, ResolvedValueArgument};

use super::args::{ArgumentGenerator, DefaultMask, ReceiverGenerator};
use super::insn::{InstructionAdapter, Insn};
use super::stack::{coerce, push_default_placeholder, StackValue};
use super::types::{AsmType, TypeMapper, OBJECT_INTERNAL_NAME};

/// Emits expressions and implements the argument and receiver generation
/// contracts on top of them.
#[derive(Debug, Clone, Copy)]
pub struct ExpressionCodegen<'g> {
    graph: &'g SymbolGraph,
    mapper: TypeMapper<'g>,
}

impl<'g> ExpressionCodegen<'g> {
    pub fn new(graph: &'g SymbolGraph) -> Self {
        Self {
            graph,
            mapper: TypeMapper::new(graph),
        }
    }

    pub fn graph(&self) -> &'g SymbolGraph {
        self.graph
    }

    pub fn type_mapper(&self) -> TypeMapper<'g> {
        self.mapper
    }

    /// Emit `expr` as a value of its own type.
    pub fn gen_expr(&mut self, expr: &Expr, v: &mut InstructionAdapter) -> StackValue {
        let ty = self.mapper.map_type(&expr.ty);
        match &expr.kind {
            ExprKind::Literal(Literal::Bool(value)) => v.iconst(i32::from(*value)),
            ExprKind::Literal(Literal::Int(value)) => v.iconst(*value),
            ExprKind::Literal(Literal::Long(value)) => v.emit(Insn::LConst(*value)),
            ExprKind::Literal(Literal::Char(value)) => v.iconst(*value as i32),
            ExprKind::Literal(Literal::Str(value)) => v.emit(Insn::Ldc(value.clone())),
            ExprKind::Literal(Literal::Null) => v.aconst_null(),
            ExprKind::Local { index } => v.emit(Insn::Load {
                ty: ty.clone(),
                index: *index,
            }),
            ExprKind::This => v.emit(Insn::Load {
                ty: ty.clone(),
                index: 0,
            }),
            ExprKind::Lambda { arity } => v.emit(Insn::Lambda {
                interface: ty.internal_name(),
                arity: *arity,
            }),
        }
        StackValue::new(ty)
    }

    /// Emit `expr` converted to `target`, the lowering of `target_ty`.
    pub fn put_value(
        &mut self,
        expr: &Expr,
        target_ty: &Type,
        target: &AsmType,
        v: &mut InstructionAdapter,
    ) {
        // Function literals passed for SAM interfaces implement the interface
        if let ExprKind::Lambda { arity } = expr.kind {
            if sam_function_type(self.graph, target_ty).is_some() {
                v.emit(Insn::Lambda {
                    interface: target.internal_name(),
                    arity,
                });
                return;
            }
        }

        let value = self.gen_expr(expr, v);
        if matches!(expr.kind, ExprKind::Literal(Literal::Null)) && target.is_reference() {
            return;
        }
        if value.ty.is_reference()
            && target.is_reference()
            && self.is_instance_of(&expr.ty, target)
        {
            return;
        }
        coerce(&value.ty, target, v);
    }

    /// Whether every value of `ty` is already an instance of `target`.
    fn is_instance_of(&self, ty: &Type, target: &AsmType) -> bool {
        if target.internal_name() == OBJECT_INTERNAL_NAME {
            return true;
        }
        let mapped = self.mapper.map_type(ty);
        if &mapped == target {
            return true;
        }
        ty.class_def().is_some()
            && self
                .graph
                .all_supertypes(ty)
                .iter()
                .any(|sup| &self.mapper.map_type(sup) == target)
    }

    fn put_vararg(
        &mut self,
        param: &ValueParam,
        elements: &[Expr],
        v: &mut InstructionAdapter,
    ) -> Result<(), Vec<Diagnostic>> {
        let element_ty = param.vararg_element.as_ref().ok_or_else(|| {
            let span = elements.first().map_or_else(Span::dummy, |e| e.span);
            vec![ice_err!(span, "vararg arguments for a non-vararg parameter";
                "parameter" => self.graph.name_str(param.name))]
        })?;
        let element = self.mapper.map_type(element_ty);

        v.iconst(i32::try_from(elements.len()).unwrap_or(i32::MAX));
        v.emit(Insn::NewArray(element.clone()));
        for (index, expr) in elements.iter().enumerate() {
            v.emit(Insn::Dup);
            v.iconst(i32::try_from(index).unwrap_or(i32::MAX));
            self.put_value(expr, element_ty, &element, v);
            v.emit(Insn::ArrayStore(element.clone()));
        }
        Ok(())
    }
}

impl ArgumentGenerator for ExpressionCodegen<'_> {
    fn generate_arguments(
        &mut self,
        params: &[ValueParam],
        param_types: &[AsmType],
        arguments: &[ResolvedValueArgument],
        v: &mut InstructionAdapter,
    ) -> Result<DefaultMask, Vec<Diagnostic>> {
        if params.len() != param_types.len() || params.len() != arguments.len() {
            return Err(vec![ice_err!(Span::dummy(), "call arguments do not match parameters";
                "parameters" => params.len(),
                "lowered" => param_types.len(),
                "arguments" => arguments.len())]);
        }

        let mut mask = DefaultMask::new(params.len());
        for (index, ((param, target), argument)) in
            params.iter().zip(param_types).zip(arguments).enumerate()
        {
            match argument {
                ResolvedValueArgument::Expression(expr) => {
                    self.put_value(expr, &param.ty, target, v)
                }
                ResolvedValueArgument::Default => {
                    push_default_placeholder(target, v);
                    mask.set(index);
                }
                ResolvedValueArgument::Vararg(elements) => self.put_vararg(param, elements, v)?,
            }
        }
        Ok(mask)
    }
}

impl ReceiverGenerator for ExpressionCodegen<'_> {
    fn put_receiver(
        &mut self,
        receiver: &Expr,
        target: &AsmType,
        v: &mut InstructionAdapter,
    ) -> Result<(), Vec<Diagnostic>> {
        if target.is_void() {
            return Err(vec![ice_err!(receiver.span, "call receiver lowered to void";
                "receiver" => self.graph.display_type(&receiver.ty))]);
        }
        let value = self.gen_expr(receiver, v);
        if value.ty.is_reference() && self.is_instance_of(&receiver.ty, target) {
            return Ok(());
        }
        coerce(&value.ty, target, v);
        Ok(())
    }
}
