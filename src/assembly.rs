use crate::{format_instr, format_instr_args, write_instruction};
use std::fmt;

// AT&T syntax for the GNU assembler: the source operand comes first.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assembly {
    Directive(Directive),
    Label(Label),
    Instruction(Instruction),
}

impl fmt::Display for Assembly {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Directive(direct) => write!(f, "\t.{}", direct),
            Self::Instruction(instr) => write!(f, "\t{}", instr),
            Self::Label(label) => write!(f, "{}:", label),
        }
    }
}

impl From<Instruction> for Assembly {
    fn from(instr: Instruction) -> Self {
        Self::Instruction(instr)
    }
}

impl From<Directive> for Assembly {
    fn from(directive: Directive) -> Self {
        Self::Directive(directive)
    }
}

impl From<Label> for Assembly {
    fn from(label: Label) -> Self {
        Self::Label(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Text,
    Global(String),
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Global(name) => write!(f, "global {}", name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Label {
    /// A symbol visible to the linker, like `main`
    Symbol(String),
    /// Assembler local label derived from the id of the node that owns it
    Local { kind: LabelKind, id: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    Else,
    EndIf,
    While,
    EndWhile,
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Symbol(name) => f.write_str(name),
            Self::Local { kind, id } => {
                let kind = match kind {
                    LabelKind::Else => "else",
                    LabelKind::EndIf => "endif",
                    LabelKind::While => "while",
                    LabelKind::EndWhile => "endwhile",
                };
                write!(f, ".L{}{}", kind, id)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// Return from a function
    Ret,
    /// Push a 64 bit register onto the stack
    Push(Register),
    /// Pop the top of the stack into a register
    Pop(Register),
    /// Copy data into a register or memory
    Mov { source: Data, target: Data },
    /// Swap two registers
    Xchg { lhs: Register, rhs: Register },
    /// `target += source`
    Add { source: Data, target: Register },
    /// `target -= source`
    Sub { source: Data, target: Register },
    /// `target *= source`, signed, keeping the low 64 bits
    Imul { source: Data, target: Register },
    /// Set flags from `target - source`
    Cmp { source: Data, target: Register },
    /// Set a byte register to 1 or 0 depending on the flags
    Set { condition: Condition, target: Register },
    /// Zero extend a byte register into a 64 bit one
    Movzb { source: Register, target: Register },
    /// Jump if the condition holds, always when `None`
    Jump {
        condition: Option<Condition>,
        label: Label,
    },
    /// Call a routine by symbol
    Call(String),
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Ret => write_instruction!(f, "ret"),
            Self::Push(register) => write_instruction!(f, "pushq", register),
            Self::Pop(register) => write_instruction!(f, "popq", register),
            Self::Mov { source, target } => write_instruction!(f, "movq", source, target),
            Self::Xchg { lhs, rhs } => write_instruction!(f, "xchgq", lhs, rhs),
            Self::Add { source, target } => write_instruction!(f, "addq", source, target),
            Self::Sub { source, target } => write_instruction!(f, "subq", source, target),
            Self::Imul { source, target } => write_instruction!(f, "imulq", source, target),
            Self::Cmp { source, target } => write_instruction!(f, "cmpq", source, target),
            Self::Set { condition, target } => {
                write_instruction!(f, format!("set{}", condition), target)
            }
            Self::Movzb { source, target } => write_instruction!(f, "movzbq", source, target),
            Self::Jump {
                condition: Some(condition),
                label,
            } => write_instruction!(f, format!("j{}", condition), label),
            Self::Jump {
                condition: None,
                label,
            } => write_instruction!(f, "jmp", label),
            Self::Call(symbol) => write_instruction!(f, "call", symbol),
        }
    }
}

#[macro_export]
macro_rules! format_instr_args {
    () => { "" };
    ($arg:expr) => { "{}" };
    ($first:expr, $($rest:expr),+) => {
        concat!("{}, ", format_instr_args!($($rest),+))
    }
}

#[macro_export]
macro_rules! format_instr {
    ($name:expr) => { format_args!("{}", $name) };
    ($name:expr, $($args:expr),+) => {
        format_args!(concat!("{} ", format_instr_args!($($args),+)), $name, $($args),+)
    };
}

#[macro_export]
macro_rules! write_instruction {
    ($formatter:expr, $name:expr) => {
        $formatter.write_fmt(format_instr!($name))
    };
    ($formatter:expr, $name:expr, $($args:expr),+) => { $formatter.write_fmt(format_instr!($name, $($args),+)) }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Data {
    /// Take data from register
    Register(Register),
    /// Take data from an immediate value
    Immediate(i64),
    /// Memory at a register plus a displacement
    Memory(Memory),
}

impl fmt::Display for Data {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Immediate(value) => write!(f, "${}", value),
            Self::Register(reg) => write!(f, "{}", reg),
            Self::Memory(mem) => write!(f, "{}", mem),
        }
    }
}

impl From<Register> for Data {
    fn from(register: Register) -> Self {
        Self::Register(register)
    }
}

impl From<Memory> for Data {
    fn from(memory: Memory) -> Self {
        Self::Memory(memory)
    }
}

/// Flag conditions after a `cmp`. Signed comparisons only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    Equals,
    LessThan,
    GreaterThan,
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Equals => write!(f, "e"),
            Self::LessThan => write!(f, "l"),
            Self::GreaterThan => write!(f, "g"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Register {
    /// Accumulator. Every lowered node leaves its value here.
    Rax,
    /// Low byte of the accumulator
    Al,
    Rbp,
    Rsp,
    Rcx,
    Rsi,
    Rdi,
    R8,
    R9,
    R10,
    R11,
    R12,
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Self::Rax => "rax",
            Self::Al => "al",
            Self::Rbp => "rbp",
            Self::Rsp => "rsp",
            Self::Rcx => "rcx",
            Self::Rsi => "rsi",
            Self::Rdi => "rdi",
            Self::R8 => "r8",
            Self::R9 => "r9",
            Self::R10 => "r10",
            Self::R11 => "r11",
            Self::R12 => "r12",
        };
        write!(f, "%{}", name)
    }
}

/// `offset(register)`, e.g. `-8(%rbp)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Memory {
    pub register: Register,
    pub offset: i64,
}

impl Memory {
    pub const fn frame_slot(offset: i64) -> Self {
        Self {
            register: Register::Rbp,
            offset,
        }
    }
}

impl fmt::Display for Memory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.offset == 0 {
            write!(f, "({})", self.register)
        } else {
            write!(f, "{}({})", self.offset, self.register)
        }
    }
}
