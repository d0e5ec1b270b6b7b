//! Argument and receiver generation contracts.

use crate::diagnostics::Diagnostic;
use crate::hir::{Expr, ValueParam};
use crate::typeck::ResolvedValueArgument;

use super::insn::InstructionAdapter;
use super::types::AsmType;

/// Emits the value arguments of a call.
pub trait ArgumentGenerator {
    /// Emit `arguments` against `params`, whose JVM types are `param_types`.
    ///
    /// Every argument is converted to its parameter's type. Parameters that
    /// take their default get a placeholder value and a bit in the returned
    /// mask; vararg parameters get an array of their elements.
    fn generate_arguments(
        &mut self,
        params: &[ValueParam],
        param_types: &[AsmType],
        arguments: &[ResolvedValueArgument],
        v: &mut InstructionAdapter,
    ) -> Result<DefaultMask, Vec<Diagnostic>>;
}

/// Emits the receiver of a call.
pub trait ReceiverGenerator {
    /// Evaluate `receiver` and leave it on the stack as `target`.
    fn put_receiver(
        &mut self,
        receiver: &Expr,
        target: &AsmType,
        v: &mut InstructionAdapter,
    ) -> Result<(), Vec<Diagnostic>>;
}

/// Which parameters of a call take their default value.
///
/// Stored as one 32-bit word per 32 parameters, the layout of the masks
/// passed to `$default` bridges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultMask {
    words: Vec<u32>,
}

impl DefaultMask {
    /// Number of mask words for a function with `param_count` parameters.
    pub fn word_count(param_count: usize) -> usize {
        param_count.div_ceil(32).max(1)
    }

    pub fn new(param_count: usize) -> Self {
        Self {
            words: vec![0; Self::word_count(param_count)],
        }
    }

    pub fn set(&mut self, index: usize) {
        let word = index / 32;
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        self.words[word] |= 1 << (index % 32);
    }

    pub fn is_set(&self, index: usize) -> bool {
        self.words
            .get(index / 32)
            .is_some_and(|word| word & (1 << (index % 32)) != 0)
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|word| *word == 0)
    }

    /// The mask for a function with `by` more leading parameters and
    /// `param_count` parameters in total.
    pub fn shifted(&self, by: usize, param_count: usize) -> Self {
        let mut shifted = Self::new(param_count);
        for index in 0..self.words.len() * 32 {
            if self.is_set(index) {
                shifted.set(index + by);
            }
        }
        shifted
    }

    pub fn words(&self) -> &[u32] {
        &self.words
    }
}
