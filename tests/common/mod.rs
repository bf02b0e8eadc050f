//! Just enough of an x86-64 machine to run the listings the compiler produces.
use doglang::assembly::{Assembly, Condition, Data, Instruction, Memory, Register};
use doglang::compiler::AssemblyOutput;
use std::collections::HashMap;

const STACK_TOP: i64 = 0x7fff_0000;

#[derive(Debug, Default)]
pub struct Machine {
    registers: HashMap<Register, i64>,
    memory: HashMap<i64, i64>,
    /// Operands of the last `cmp`, as `(target, source)`
    flags: (i64, i64),
    /// Every value handed to `print`
    pub printed: Vec<i64>,
}

impl Machine {
    pub fn new() -> Self {
        let mut machine = Self::default();
        // as if `main` had just been called: only the return address is on the stack
        machine.registers.insert(Register::Rsp, STACK_TOP - 8);
        machine
    }

    fn get(&self, register: Register) -> i64 {
        match register {
            Register::Al => self.get(Register::Rax) & 0xff,
            other => self.registers.get(&other).copied().unwrap_or(0),
        }
    }

    fn set(&mut self, register: Register, value: i64) {
        match register {
            Register::Al => {
                let rax = self.get(Register::Rax);
                self.registers
                    .insert(Register::Rax, (rax & !0xff) | (value & 0xff));
            }
            other => {
                self.registers.insert(other, value);
            }
        }
    }

    fn address(&self, memory: Memory) -> i64 {
        self.get(memory.register) + memory.offset
    }

    fn load(&self, data: &Data) -> i64 {
        match data {
            Data::Register(register) => self.get(*register),
            Data::Immediate(value) => *value,
            Data::Memory(memory) => {
                let address = self.address(*memory);
                assert!(
                    address < STACK_TOP && address >= self.get(Register::Rsp),
                    "access to {address:#x} outside the reserved frame"
                );
                *self
                    .memory
                    .get(&address)
                    .unwrap_or_else(|| panic!("read of uninitialised memory at {memory}"))
            }
        }
    }

    fn store(&mut self, data: &Data, value: i64) {
        match data {
            Data::Register(register) => self.set(*register, value),
            Data::Immediate(_) => panic!("store into an immediate"),
            Data::Memory(memory) => {
                let address = self.address(*memory);
                assert!(
                    address < STACK_TOP && address >= self.get(Register::Rsp),
                    "access to {address:#x} outside the reserved frame"
                );
                self.memory.insert(address, value);
            }
        }
    }

    fn push(&mut self, value: i64) {
        let rsp = self.get(Register::Rsp) - 8;
        self.set(Register::Rsp, rsp);
        self.memory.insert(rsp, value);
    }

    fn pop(&mut self) -> i64 {
        let rsp = self.get(Register::Rsp);
        self.set(Register::Rsp, rsp + 8);
        self.memory.remove(&rsp).unwrap_or(0)
    }

    fn holds(&self, condition: Condition) -> bool {
        let (target, source) = self.flags;
        match condition {
            Condition::Equals => target == source,
            Condition::LessThan => target < source,
            Condition::GreaterThan => target > source,
        }
    }

    /// Runs `main` until it returns, giving up after `step_limit` instructions.
    pub fn run(&mut self, listing: &AssemblyOutput, step_limit: usize) {
        let items: Vec<&Assembly> = listing.iter().collect();
        let labels: HashMap<String, usize> = items
            .iter()
            .enumerate()
            .filter_map(|(i, item)| match item {
                Assembly::Label(label) => Some((label.to_string(), i)),
                _ => None,
            })
            .collect();
        let mut pc = labels["main"];
        let entry_rsp = self.get(Register::Rsp);

        for _ in 0..step_limit {
            let instruction = match items[pc] {
                Assembly::Instruction(instruction) => instruction,
                _ => {
                    pc += 1;
                    continue;
                }
            };
            pc += 1;
            match instruction {
                Instruction::Ret => {
                    assert_eq!(self.get(Register::Rsp), entry_rsp, "unbalanced stack");
                    return;
                }
                Instruction::Push(register) => self.push(self.get(*register)),
                Instruction::Pop(register) => {
                    let value = self.pop();
                    self.set(*register, value);
                }
                Instruction::Mov { source, target } => {
                    let value = self.load(source);
                    self.store(target, value);
                }
                Instruction::Xchg { lhs, rhs } => {
                    let (a, b) = (self.get(*lhs), self.get(*rhs));
                    self.set(*lhs, b);
                    self.set(*rhs, a);
                }
                Instruction::Add { source, target } => {
                    let value = self.get(*target).wrapping_add(self.load(source));
                    self.set(*target, value);
                }
                Instruction::Sub { source, target } => {
                    let value = self.get(*target).wrapping_sub(self.load(source));
                    self.set(*target, value);
                }
                Instruction::Imul { source, target } => {
                    let value = self.get(*target).wrapping_mul(self.load(source));
                    self.set(*target, value);
                }
                Instruction::Cmp { source, target } => {
                    self.flags = (self.get(*target), self.load(source));
                }
                Instruction::Set { condition, target } => {
                    let value = i64::from(self.holds(*condition));
                    self.set(*target, value);
                }
                Instruction::Movzb { source, target } => {
                    let value = self.get(*source) & 0xff;
                    self.set(*target, value);
                }
                Instruction::Jump { condition, label } => {
                    if condition.map_or(true, |condition| self.holds(condition)) {
                        pc = labels[&label.to_string()];
                    }
                }
                Instruction::Call(symbol) => {
                    assert_eq!(symbol, "print");
                    assert_eq!(self.get(Register::Rsp) % 16, 0, "misaligned call");
                    assert_eq!(self.get(Register::Rdi), self.get(Register::Rax));
                    self.printed.push(self.get(Register::Rdi));
                }
            }
        }
        panic!("program still running after {step_limit} instructions");
    }
}

/// Compiles `source` and runs it, returning what it printed.
pub fn run_compiled(source: &str) -> i64 {
    let listing = doglang::compile(source).unwrap();
    let mut machine = Machine::new();
    machine.run(&listing, 100_000);
    assert_eq!(machine.printed.len(), 1);
    machine.printed[0]
}

pub fn program(name: &str) -> String {
    let path = format!("{}/programs/{}.dog", env!("CARGO_MANIFEST_DIR"), name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("could not read {path}: {e}"))
}
