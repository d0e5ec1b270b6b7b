//! Values on the operand stack and conversions between their types.

use super::insn::{InstructionAdapter, Insn};
use super::types::{method_descriptor, AsmType, OBJECT_INTERNAL_NAME};

/// The result of an emitted expression or call: a value of type `ty` on
/// top of the stack, nothing for `void`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackValue {
    pub ty: AsmType,
}

impl StackValue {
    pub fn new(ty: AsmType) -> Self {
        Self { ty }
    }

    pub fn void() -> Self {
        Self::new(AsmType::Void)
    }

    /// Convert the value to `target` in place.
    pub fn put(&self, target: &AsmType, v: &mut InstructionAdapter) {
        coerce(&self.ty, target, v);
    }
}

/// Convert the value on top of the stack from `from` to `to`.
///
/// Reference-to-reference conversions always `checkcast` unless the target
/// is `java/lang/Object`; callers that know the value is already an
/// instance of the target skip the call.
pub fn coerce(from: &AsmType, to: &AsmType, v: &mut InstructionAdapter) {
    if from == to {
        return;
    }

    if to.is_void() {
        if from.size() > 0 {
            v.emit(Insn::Pop(from.clone()));
        }
        return;
    }

    if from.is_void() {
        push_unit_or_zero(to, v);
        return;
    }

    match (from.as_primitive(), to.as_primitive()) {
        (Some(_), Some(_)) => v.emit(Insn::Cast {
            from: from.clone(),
            to: to.clone(),
        }),
        (Some(prim), None) => {
            let boxed = AsmType::boxed(prim);
            v.invokestatic(
                &boxed.internal_name(),
                "valueOf",
                &method_descriptor(&[from.clone()], &boxed),
                false,
            );
            if !is_implicit_upcast(&boxed, to) {
                v.checkcast(to.internal_name());
            }
        }
        (None, Some(prim)) => {
            let boxed = AsmType::boxed(prim);
            if from != &boxed {
                v.checkcast(boxed.internal_name());
            }
            let method = format!("{}Value", prim.name().to_lowercase());
            v.invokevirtual(&boxed.internal_name(), &method, &method_descriptor(&[], to));
        }
        (None, None) => {
            if !is_implicit_upcast(from, to) {
                v.checkcast(to.internal_name());
            }
        }
    }
}

fn is_implicit_upcast(from: &AsmType, to: &AsmType) -> bool {
    from == to
        || to.internal_name() == OBJECT_INTERNAL_NAME
        || (to.internal_name() == "java/lang/Number"
            && from
                .internal_name()
                .strip_prefix("java/lang/")
                .is_some_and(|name| {
                    matches!(name, "Byte" | "Short" | "Integer" | "Long" | "Float" | "Double")
                }))
}

fn push_unit_or_zero(to: &AsmType, v: &mut InstructionAdapter) {
    match to {
        AsmType::Long => v.emit(Insn::LConst(0)),
        AsmType::Float => v.emit(Insn::FConstZero),
        AsmType::Double => v.emit(Insn::DConstZero),
        AsmType::Object(_) | AsmType::Array(_) => v.emit(Insn::GetStatic {
            owner: "kotlin/Unit".to_string(),
            name: "INSTANCE".to_string(),
            descriptor: "Lkotlin/Unit;".to_string(),
        }),
        _ => v.iconst(0),
    }
}

/// Push the placeholder passed for a parameter that takes its default.
pub fn push_default_placeholder(ty: &AsmType, v: &mut InstructionAdapter) {
    match ty {
        AsmType::Long => v.emit(Insn::LConst(0)),
        AsmType::Float => v.emit(Insn::FConstZero),
        AsmType::Double => v.emit(Insn::DConstZero),
        AsmType::Object(_) | AsmType::Array(_) => v.aconst_null(),
        AsmType::Void => {}
        _ => v.iconst(0),
    }
}
