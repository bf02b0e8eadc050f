use super::{CodegenError, CodegenErrorKind, CodegenRes};
use crate::assembly::Register;

/// Registers that may hold the left operand of a binary operation while the right one is
/// computed, in the order they are handed out.
pub const SCRATCH_REGISTERS: [Register; 8] = [
    Register::Rcx,
    Register::Rsi,
    Register::Rdi,
    Register::R8,
    Register::R9,
    Register::R10,
    Register::R11,
    Register::R12,
];

/// Fixed pool of scratch registers. Nothing is ever spilled: running out is a compile error.
#[derive(Debug, Clone)]
pub struct RegisterManager {
    pool: Vec<(Register, bool)>,
}

impl RegisterManager {
    pub fn new() -> Self {
        Self::with_limit(SCRATCH_REGISTERS.len())
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            pool: SCRATCH_REGISTERS
                .iter()
                .take(limit)
                .map(|&register| (register, false))
                .collect(),
        }
    }

    pub fn acquire(&mut self) -> CodegenRes<Register> {
        let pool_size = self.pool.len();
        let (register, in_use) = self
            .pool
            .iter_mut()
            .find(|(_, in_use)| !*in_use)
            .ok_or_else(|| {
                CodegenError::new(CodegenErrorKind::RegisterExhaustion { pool_size })
            })?;
        *in_use = true;
        tracing::trace!(target: "codegen::registers", "acquired {register}");
        Ok(*register)
    }

    pub fn release(&mut self, register: Register) {
        let slot = self.pool.iter_mut().find(|(reg, _)| *reg == register);
        debug_assert!(
            matches!(slot, Some((_, true))),
            "released {register} which was not handed out"
        );
        if let Some((_, in_use)) = slot {
            *in_use = false;
        }
        tracing::trace!(target: "codegen::registers", "released {register}");
    }

    pub fn available(&self) -> usize {
        self.pool.iter().filter(|(_, in_use)| !in_use).count()
    }

    pub fn pool_size(&self) -> usize {
        self.pool.len()
    }
}

impl Default for RegisterManager {
    fn default() -> Self {
        Self::new()
    }
}
