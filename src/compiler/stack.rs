use super::{AssemblyOutput, CodegenError, CodegenErrorKind, CodegenRes};
use crate::assembly::*;
use crate::ast::Identifier;
use std::collections::{HashMap, HashSet};

pub const SLOT_SIZE: usize = 8;

/// Names assigned on every path leading to some point of the program.
pub type AssignedSet<'source> = HashSet<&'source str>;

/// Variable table: every variable gets an 8 byte slot below the frame pointer, in the order the
/// variables are first assigned. There is a single flat scope, so slots live for the whole
/// program.
///
/// Having a slot is not enough to be read: the variable must also be in the assigned set, which
/// the statement lowering narrows at the joins of branches and loops.
#[derive(Debug, Default)]
pub struct StackManager<'source> {
    slots: HashMap<&'source str, Memory>,
    assigned: AssignedSet<'source>,
}

impl<'source> StackManager<'source> {
    pub fn new() -> Self {
        Self {
            slots: HashMap::new(),
            assigned: HashSet::new(),
        }
    }

    /// Where a variable lives when it is read.
    pub fn read(&self, Identifier(name): Identifier<'source>) -> CodegenRes<Memory> {
        match self.slots.get(name) {
            Some(slot) if self.assigned.contains(name) => Ok(*slot),
            _ => Err(CodegenError::new(CodegenErrorKind::UseBeforeAssign(
                name.to_string(),
            ))),
        }
    }

    /// Where a variable lives when it is written, giving it the next slot the first time.
    pub fn assign(&mut self, Identifier(name): Identifier<'source>) -> Memory {
        self.assigned.insert(name);
        let next_offset = -(((self.slots.len() + 1) * SLOT_SIZE) as i64);
        *self.slots.entry(name).or_insert_with(|| {
            tracing::debug!(target: "codegen::stack", "variable {name:?} lives at {next_offset}(%rbp)");
            Memory::frame_slot(next_offset)
        })
    }

    pub fn assigned(&self) -> &AssignedSet<'source> {
        &self.assigned
    }

    /// Swaps in another assigned set, handing back the current one.
    pub fn replace_assigned(&mut self, assigned: AssignedSet<'source>) -> AssignedSet<'source> {
        std::mem::replace(&mut self.assigned, assigned)
    }

    /// Keeps only the names that were also assigned along `other`.
    pub fn join_assigned(&mut self, other: &AssignedSet<'source>) {
        self.assigned.retain(|name| other.contains(name));
    }

    pub fn variable_count(&self) -> usize {
        self.slots.len()
    }

    /// Bytes reserved below the frame pointer, kept at a multiple of 16 so calls stay aligned.
    pub fn frame_size(&self) -> usize {
        align_to_stack(self.slots.len() * SLOT_SIZE)
    }

    /// Reserves the whole frame in front of the instructions that use it.
    pub fn finalize(self, mut instructions: AssemblyOutput) -> AssemblyOutput {
        let frame_size = self.frame_size();
        if frame_size != 0 {
            instructions.cons_instruction(Instruction::Sub {
                source: Data::Immediate(frame_size as i64),
                target: Register::Rsp,
            });
        }
        instructions
    }
}

fn align_to_stack(amount: usize) -> usize {
    (amount + 15) / 16 * 16
}
