use super::{
    AssemblyOutput, CodegenOptions, CodegenRes, Compile, CompileWith, CompilerState, ACCUMULATOR,
};
use crate::assembly::{Directive, Instruction, Label, Register};
use crate::ast::Program;

/// Name of the external routine that receives the final value.
pub const PRINT_ROUTINE: &str = "print";

/// Lowers the whole program into a listing for `main`. The value left in the accumulator at the
/// end is handed to `print` (in `%rax`, and in `%rdi` for System V callees).
pub fn generate(program: &Program, options: &CodegenOptions) -> CodegenRes<AssemblyOutput> {
    let Program(body) = program;
    let mut state = CompilerState::new(options);
    let body = body.compile(&mut state)?;
    let CompilerState { stack, .. } = state;
    tracing::debug!(target: "codegen", "{} variables, frame of {} bytes", stack.variable_count(), stack.frame_size());

    let mut output = AssemblyOutput::new();
    output.push_directive(Directive::Text);
    output.push_directive(Directive::Global("_main".to_string()));
    output.push_directive(Directive::Global("main".to_string()));
    output.push_label(Label::Symbol("_main".to_string()));
    output.push_label(Label::Symbol("main".to_string()));
    output.push_instruction(Instruction::Push(Register::Rbp));
    output.push_instruction(Instruction::Mov {
        source: Register::Rsp.into(),
        target: Register::Rbp.into(),
    });
    output.extend(stack.finalize(body));
    output.push_instruction(Instruction::Mov {
        source: ACCUMULATOR.into(),
        target: Register::Rdi.into(),
    });
    output.push_instruction(Instruction::Call(PRINT_ROUTINE.to_string()));
    output.push_instruction(Instruction::Mov {
        source: Register::Rbp.into(),
        target: Register::Rsp.into(),
    });
    output.push_instruction(Instruction::Pop(Register::Rbp));
    output.push_instruction(Instruction::Ret);
    Ok(output)
}

impl Compile for Program<'_> {
    fn compile(&self) -> CodegenRes<AssemblyOutput> {
        generate(self, &CodegenOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Block, Expr, Identifier, Statement};

    #[test]
    fn empty_program_is_just_prologue_and_epilogue() {
        let out = Program(Block::default()).compile().unwrap();
        assert_eq!(
            out.lines(),
            [
                "\t.text",
                "\t.global _main",
                "\t.global main",
                "_main:",
                "main:",
                "\tpushq %rbp",
                "\tmovq %rsp, %rbp",
                "\tmovq %rax, %rdi",
                "\tcall print",
                "\tmovq %rbp, %rsp",
                "\tpopq %rbp",
                "\tret",
            ]
        );
    }

    #[test]
    fn frame_is_reserved_after_the_frame_pointer() {
        let program = Program(Block(vec![
            Statement::Assign {
                target: Identifier("a"),
                value: Expr::Integer(1),
            },
            Statement::Assign {
                target: Identifier("b"),
                value: Expr::Integer(2),
            },
            Statement::Assign {
                target: Identifier("c"),
                value: Expr::Integer(3),
            },
        ]));
        let lines = program.compile().unwrap().lines();
        assert_eq!(lines[6], "\tmovq %rsp, %rbp");
        assert_eq!(lines[7], "\tsubq $32, %rsp");
        assert_eq!(lines[9], "\tmovq %rax, -8(%rbp)");
        assert_eq!(lines[13], "\tmovq %rax, -24(%rbp)");
    }
}
