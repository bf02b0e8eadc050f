use super::labels::{IfLabels, WhileLabels};
use super::{AssemblyOutput, CodegenRes, CompileWith, CompilerState, ACCUMULATOR};
use crate::assembly::{Condition, Data, Instruction, Label};
use crate::ast::{Block, Expr, Statement};

impl<'source> CompileWith<CompilerState<'source>> for Block<'source> {
    fn compile(&self, state: &mut CompilerState<'source>) -> CodegenRes<AssemblyOutput> {
        let mut out = AssemblyOutput::new();
        for statement in &self.0 {
            out.extend(statement.compile(state)?);
        }
        Ok(out)
    }
}

impl<'source> CompileWith<CompilerState<'source>> for Statement<'source> {
    fn compile(&self, state: &mut CompilerState<'source>) -> CodegenRes<AssemblyOutput> {
        match self {
            Statement::Assign { target, value } => {
                // the value goes first: `x AWOO x WOOF 1` must not see its own slot
                let mut out = value
                    .compile(state)
                    .map_err(|e| e.add_context("compiling assigned value"))?;
                let slot = state.stack.assign(*target);
                out.push_instruction(Instruction::Mov {
                    source: ACCUMULATOR.into(),
                    target: slot.into(),
                });
                Ok(out)
            }
            Statement::If {
                id,
                condition,
                then_branch,
                else_branch,
            } => {
                let IfLabels {
                    else_branch: else_label,
                    end,
                } = IfLabels::for_node(*id);
                let mut out = compile_condition(condition, state, else_label.clone())
                    .map_err(|e| e.add_context("compiling if statement's condition"))?;
                let before = state.stack.assigned().clone();
                out.extend(
                    then_branch
                        .compile(state)
                        .map_err(|e| e.add_context("compiling if statement's then branch"))?,
                );
                out.push_instruction(jump(end.clone()));
                out.push_label(else_label);
                // the else branch starts from what was assigned before the if
                let after_then = state.stack.replace_assigned(before);
                out.extend(
                    else_branch
                        .compile(state)
                        .map_err(|e| e.add_context("compiling if statement's else branch"))?,
                );
                state.stack.join_assigned(&after_then);
                out.push_label(end);
                Ok(out)
            }
            Statement::While {
                id,
                condition,
                body,
            } => {
                let WhileLabels { head, end } = WhileLabels::for_node(*id);
                let before = state.stack.assigned().clone();
                let mut out = AssemblyOutput::new();
                out.push_label(head.clone());
                out.extend(
                    compile_condition(condition, state, end.clone())
                        .map_err(|e| e.add_context("compiling while loop's condition"))?,
                );
                out.extend(
                    body.compile(state)
                        .map_err(|e| e.add_context("compiling while loop's body"))?,
                );
                out.push_instruction(jump(head));
                out.push_label(end);
                // the body may never have run
                state.stack.replace_assigned(before);
                Ok(out)
            }
            Statement::Bare(name) => {
                tracing::trace!(target: "codegen::block", "bare name {name} was never assigned, nothing to emit");
                Ok(AssemblyOutput::new())
            }
        }
    }
}

/// Evaluates `condition` and jumps to `when_false` if it came out as zero.
fn compile_condition<'source>(
    condition: &Expr<'source>,
    state: &mut CompilerState<'source>,
    when_false: Label,
) -> CodegenRes<AssemblyOutput> {
    let mut out = condition.compile(state)?;
    out.push_instruction(Instruction::Cmp {
        source: Data::Immediate(0),
        target: ACCUMULATOR,
    });
    out.push_instruction(Instruction::Jump {
        condition: Some(Condition::Equals),
        label: when_false,
    });
    Ok(out)
}

fn jump(label: Label) -> Instruction {
    Instruction::Jump {
        condition: None,
        label,
    }
}
