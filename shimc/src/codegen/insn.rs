//! JVM-style instructions.
//!
//! The backend emits a flat instruction list per call site. Only the
//! instructions needed to evaluate call arguments and perform calls are
//! modelled.

use std::fmt;

use super::types::AsmType;

/// Invocation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvokeOpcode {
    Static,
    Virtual,
    Interface,
    Special,
}

impl InvokeOpcode {
    pub fn mnemonic(self) -> &'static str {
        match self {
            InvokeOpcode::Static => "invokestatic",
            InvokeOpcode::Virtual => "invokevirtual",
            InvokeOpcode::Interface => "invokeinterface",
            InvokeOpcode::Special => "invokespecial",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Insn {
    /// Push an int-sized constant (`iconst`/`bipush`/`sipush`/`ldc`).
    IConst(i32),
    LConst(i64),
    FConstZero,
    DConstZero,
    /// Push a string constant.
    Ldc(String),
    AConstNull,
    Load { ty: AsmType, index: u32 },
    /// Discard the top value; two slots for long and double.
    Pop(AsmType),
    Dup,
    /// Primitive conversion (`i2l`, `l2i`, ...).
    Cast { from: AsmType, to: AsmType },
    CheckCast(String),
    NewArray(AsmType),
    ArrayStore(AsmType),
    GetStatic {
        owner: String,
        name: String,
        descriptor: String,
    },
    Invoke {
        opcode: InvokeOpcode,
        owner: String,
        name: String,
        descriptor: String,
        is_interface: bool,
    },
    /// Create an instance of `interface` from a function literal.
    Lambda { interface: String, arity: usize },
}

impl fmt::Display for Insn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Insn::IConst(value) => write!(f, "iconst {}", value),
            Insn::LConst(value) => write!(f, "lconst {}", value),
            Insn::FConstZero => f.write_str("fconst_0"),
            Insn::DConstZero => f.write_str("dconst_0"),
            Insn::Ldc(value) => write!(f, "ldc {:?}", value),
            Insn::AConstNull => f.write_str("aconst_null"),
            Insn::Load { ty, index } => write!(f, "{}load {}", ty.opcode_prefix(), index),
            Insn::Pop(ty) if ty.size() == 2 => f.write_str("pop2"),
            Insn::Pop(_) => f.write_str("pop"),
            Insn::Dup => f.write_str("dup"),
            Insn::Cast { from, to } => write!(f, "{}2{}", from.opcode_prefix(), to.opcode_prefix()),
            Insn::CheckCast(ty) => write!(f, "checkcast {}", ty),
            Insn::NewArray(element) => write!(f, "newarray {}", element.descriptor()),
            Insn::ArrayStore(element) => write!(f, "{}astore", element.opcode_prefix()),
            Insn::GetStatic {
                owner,
                name,
                descriptor,
            } => write!(f, "getstatic {}.{}:{}", owner, name, descriptor),
            Insn::Invoke {
                opcode,
                owner,
                name,
                descriptor,
                ..
            } => write!(f, "{} {}.{}{}", opcode.mnemonic(), owner, name, descriptor),
            Insn::Lambda { interface, arity } => write!(f, "lambda {}/{}", interface, arity),
        }
    }
}

/// Accumulates the instructions of one method body.
#[derive(Debug, Clone, Default)]
pub struct InstructionAdapter {
    insns: Vec<Insn>,
}

impl InstructionAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, insn: Insn) {
        self.insns.push(insn);
    }

    pub fn iconst(&mut self, value: i32) {
        self.emit(Insn::IConst(value));
    }

    pub fn aconst_null(&mut self) {
        self.emit(Insn::AConstNull);
    }

    pub fn checkcast(&mut self, internal_name: impl Into<String>) {
        self.emit(Insn::CheckCast(internal_name.into()));
    }

    pub fn invokestatic(&mut self, owner: &str, name: &str, descriptor: &str, is_interface: bool) {
        self.invoke(InvokeOpcode::Static, owner, name, descriptor, is_interface);
    }

    pub fn invokevirtual(&mut self, owner: &str, name: &str, descriptor: &str) {
        self.invoke(InvokeOpcode::Virtual, owner, name, descriptor, false);
    }

    pub fn invoke(
        &mut self,
        opcode: InvokeOpcode,
        owner: &str,
        name: &str,
        descriptor: &str,
        is_interface: bool,
    ) {
        self.emit(Insn::Invoke {
            opcode,
            owner: owner.to_string(),
            name: name.to_string(),
            descriptor: descriptor.to_string(),
            is_interface,
        });
    }

    pub fn insns(&self) -> &[Insn] {
        &self.insns
    }

    pub fn into_insns(self) -> Vec<Insn> {
        self.insns
    }

    /// One instruction per line, for logs and test failures.
    pub fn listing(&self) -> String {
        self.insns
            .iter()
            .map(|insn| insn.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing() {
        let mut v = InstructionAdapter::new();
        v.emit(Insn::Load {
            ty: AsmType::object("View"),
            index: 1,
        });
        v.iconst(3);
        v.emit(Insn::Cast {
            from: AsmType::Int,
            to: AsmType::Long,
        });
        v.invokestatic("ViewCompat", "multipleArgs", "(LView;J)V", false);
        v.emit(Insn::Pop(AsmType::Long));

        assert_eq!(
            v.listing(),
            "aload 1\niconst 3\ni2l\ninvokestatic ViewCompat.multipleArgs(LView;J)V\npop2"
        );
    }
}
