mod block;
mod expr;
pub mod labels;
mod program;
pub mod registers;
pub mod stack;

use crate::assembly::*;
use crate::error::Error;
use itertools::Itertools;
use registers::RegisterManager;
use stack::StackManager;
use std::collections::VecDeque;
use std::fmt;
use thiserror::Error;

pub use program::generate;

/// Every lowered node leaves its value here.
pub const ACCUMULATOR: Register = Register::Rax;

pub trait Compile {
    fn compile(&self) -> CodegenRes<AssemblyOutput>;
}

pub trait CompileWith<State> {
    fn compile(&self, state: &mut State) -> CodegenRes<AssemblyOutput>;
}

pub type CodegenRes<T> = Result<T, CodegenError>;
pub type CodegenError = Error<CodegenErrorKind>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodegenErrorKind {
    #[error("variable {0:?} is read before anything is assigned to it")]
    UseBeforeAssign(String),
    #[error("expression needs more than the {pool_size} available scratch registers")]
    RegisterExhaustion { pool_size: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodegenOptions {
    /// How many of the scratch registers may be handed out, clamped to the size of the pool.
    pub scratch_registers: usize,
}

impl Default for CodegenOptions {
    fn default() -> Self {
        Self {
            scratch_registers: registers::SCRATCH_REGISTERS.len(),
        }
    }
}

/// Everything one code generation pass owns. A fresh one is made per program.
pub struct CompilerState<'source> {
    pub registers: RegisterManager,
    pub stack: StackManager<'source>,
}

impl<'source> CompilerState<'source> {
    pub fn new(options: &CodegenOptions) -> Self {
        Self {
            registers: RegisterManager::with_limit(options.scratch_registers),
            stack: StackManager::new(),
        }
    }

    /// Lends a scratch register to `cont` and takes it back afterwards, whether `cont` failed or
    /// not.
    pub fn with_scratch_register<F>(&mut self, cont: F) -> CodegenRes<AssemblyOutput>
    where
        F: FnOnce(&mut Self, Register) -> CodegenRes<AssemblyOutput>,
    {
        let register = self.registers.acquire()?;
        let out = cont(self, register);
        self.registers.release(register);
        out
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[repr(transparent)]
pub struct AssemblyOutput {
    inner: VecDeque<Assembly>,
}

impl AssemblyOutput {
    pub fn new() -> Self {
        Self {
            inner: VecDeque::new(),
        }
    }
    pub fn singleton_instruction(instruction: Instruction) -> Self {
        let mut out = Self::new();
        out.push_instruction(instruction);
        out
    }
    #[inline]
    pub fn push_asm(&mut self, asm: Assembly) {
        self.inner.push_back(asm);
    }
    #[inline]
    pub fn cons_asm(&mut self, asm: Assembly) {
        self.inner.push_front(asm);
    }
    #[inline]
    pub fn push_instruction(&mut self, instruction: Instruction) {
        self.push_asm(Assembly::Instruction(instruction))
    }
    #[inline]
    pub fn cons_instruction(&mut self, instruction: Instruction) {
        self.cons_asm(Assembly::Instruction(instruction))
    }
    #[inline]
    pub fn push_directive(&mut self, directive: Directive) {
        self.push_asm(Assembly::Directive(directive))
    }
    #[inline]
    pub fn push_label(&mut self, label: Label) {
        self.push_asm(Assembly::Label(label))
    }
    pub fn extend(&mut self, other: Self) {
        self.inner.extend(other.inner);
    }
    pub fn iter(&self) -> impl Iterator<Item = &Assembly> {
        self.inner.iter()
    }
    pub fn len(&self) -> usize {
        self.inner.len()
    }
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
    /// The listing, one rendered line per item
    pub fn lines(&self) -> Vec<String> {
        self.inner.iter().map(ToString::to_string).collect()
    }
}

impl IntoIterator for AssemblyOutput {
    type Item = Assembly;
    type IntoIter = std::collections::vec_deque::IntoIter<Assembly>;
    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

impl From<Instruction> for AssemblyOutput {
    fn from(instruction: Instruction) -> Self {
        Self::singleton_instruction(instruction)
    }
}

impl fmt::Display for AssemblyOutput {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.inner.iter().join("\n"))
    }
}
