pub mod assembly;
pub mod ast;
pub mod compiler;
pub mod error;
pub mod eval;
pub mod grammar;

use ast::Program;
use compiler::{AssemblyOutput, CodegenError, CodegenOptions};
use grammar::{ParseError, Parser};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompileError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("codegen error: {0}")]
    Codegen(#[from] CodegenError),
}

pub fn parse(source: &str) -> Result<Program, ParseError> {
    Parser::from_source(source).parse()
}

/// Source text in, assembly listing out.
pub fn compile(source: &str) -> Result<AssemblyOutput, CompileError> {
    compile_with(source, &CodegenOptions::default())
}

pub fn compile_with(source: &str, options: &CodegenOptions) -> Result<AssemblyOutput, CompileError> {
    let program = parse(source)?;
    let Program(body) = &program;
    tracing::debug!(target: "compile", "parsed {} top level statements", body.0.len());
    Ok(compiler::generate(&program, options)?)
}
