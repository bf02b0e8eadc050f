use super::{AssemblyOutput, CodegenRes, CompileWith, CompilerState, ACCUMULATOR};
use crate::assembly::{Condition, Data, Instruction, Register};
use crate::ast::{BinaryOp, Expr};

impl<'source> CompileWith<CompilerState<'source>> for Expr<'source> {
    fn compile(&self, state: &mut CompilerState<'source>) -> CodegenRes<AssemblyOutput> {
        match self {
            Expr::Integer(value) => Ok(Instruction::Mov {
                source: Data::Immediate(*value),
                target: ACCUMULATOR.into(),
            }
            .into()),
            Expr::Variable(name) => {
                let slot = state.stack.read(*name)?;
                Ok(Instruction::Mov {
                    source: slot.into(),
                    target: ACCUMULATOR.into(),
                }
                .into())
            }
            Expr::Binary { operator, lhs, rhs } => {
                // binary rx:
                //   <lhs -> rax>
                //   movq %rax, rx
                //   <rhs -> rax>
                //   <rx op rax -> rax>
                let mut out = lhs.compile(state)?;
                out.extend(state.with_scratch_register(|state, scratch| {
                    let mut out = AssemblyOutput::singleton_instruction(Instruction::Mov {
                        source: ACCUMULATOR.into(),
                        target: scratch.into(),
                    });
                    out.extend(rhs.compile(state)?);
                    out.extend(combine(*operator, scratch));
                    Ok(out)
                })?);
                Ok(out)
            }
        }
    }
}

/// Combines the left operand held in `lhs` with the right operand in the accumulator.
fn combine(operator: BinaryOp, lhs: Register) -> AssemblyOutput {
    let mut out = AssemblyOutput::new();
    match operator {
        BinaryOp::Add => out.push_instruction(Instruction::Add {
            source: lhs.into(),
            target: ACCUMULATOR,
        }),
        BinaryOp::Subtract => {
            out.push_instruction(Instruction::Xchg {
                lhs: ACCUMULATOR,
                rhs: lhs,
            });
            out.push_instruction(Instruction::Sub {
                source: lhs.into(),
                target: ACCUMULATOR,
            });
        }
        BinaryOp::Multiply => out.push_instruction(Instruction::Imul {
            source: lhs.into(),
            target: ACCUMULATOR,
        }),
        BinaryOp::Less | BinaryOp::Greater => {
            let condition = if let BinaryOp::Less = operator {
                Condition::LessThan
            } else {
                Condition::GreaterThan
            };
            out.push_instruction(Instruction::Cmp {
                source: ACCUMULATOR.into(),
                target: lhs,
            });
            out.push_instruction(Instruction::Set {
                condition,
                target: Register::Al,
            });
            out.push_instruction(Instruction::Movzb {
                source: Register::Al,
                target: ACCUMULATOR,
            });
        }
    }
    out
}
