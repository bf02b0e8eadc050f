//! Tree-walking evaluator. It follows the same accumulator rules as the generated code, so the
//! value it returns is the one a compiled program would print.
use crate::ast::{BinaryOp, Block, Expr, Program, Statement};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("variable {0:?} is read before anything is assigned to it")]
    UnassignedVariable(String),
    #[error("program did not finish within {0} steps")]
    StepLimitExceeded(u64),
}

pub type EvalRes<T> = Result<T, EvalError>;

#[derive(Debug, Default)]
pub struct Evaluator<'source> {
    variables: HashMap<&'source str, i64>,
    accumulator: Option<i64>,
    steps: u64,
    step_limit: Option<u64>,
}

impl<'source> Evaluator<'source> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every executed statement and every loop test counts as one step.
    pub fn with_step_limit(limit: u64) -> Self {
        Self {
            step_limit: Some(limit),
            ..Self::default()
        }
    }

    /// Runs the program, returning what ends up in the accumulator. `None` if no expression was
    /// ever evaluated.
    pub fn run(&mut self, Program(body): &Program<'source>) -> EvalRes<Option<i64>> {
        self.block(body)?;
        tracing::debug!(target: "eval", "finished after {} steps", self.steps);
        Ok(self.accumulator)
    }

    pub fn variable(&self, name: &str) -> Option<i64> {
        self.variables.get(name).copied()
    }

    fn step(&mut self) -> EvalRes<()> {
        self.steps += 1;
        match self.step_limit {
            Some(limit) if self.steps > limit => Err(EvalError::StepLimitExceeded(limit)),
            _ => Ok(()),
        }
    }

    fn block(&mut self, Block(statements): &Block<'source>) -> EvalRes<()> {
        statements.iter().try_for_each(|stmt| self.statement(stmt))
    }

    fn statement(&mut self, statement: &Statement<'source>) -> EvalRes<()> {
        self.step()?;
        match statement {
            Statement::Assign { target, value } => {
                let value = self.expr(value)?;
                self.variables.insert(target.0, value);
            }
            Statement::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                if self.expr(condition)? != 0 {
                    self.block(then_branch)?;
                } else {
                    self.block(else_branch)?;
                }
            }
            Statement::While {
                condition, body, ..
            } => {
                while self.expr(condition)? != 0 {
                    self.block(body)?;
                    self.step()?;
                }
            }
            Statement::Bare(_) => {}
        }
        Ok(())
    }

    fn expr(&mut self, expr: &Expr<'source>) -> EvalRes<i64> {
        let value = match expr {
            Expr::Integer(value) => *value,
            Expr::Variable(name) => self
                .variable(name.0)
                .ok_or_else(|| EvalError::UnassignedVariable(name.to_string()))?,
            Expr::Binary { operator, lhs, rhs } => {
                let lhs = self.expr(lhs)?;
                let rhs = self.expr(rhs)?;
                apply(*operator, lhs, rhs)
            }
        };
        self.accumulator = Some(value);
        Ok(value)
    }
}

pub fn apply(operator: BinaryOp, lhs: i64, rhs: i64) -> i64 {
    match operator {
        BinaryOp::Add => lhs.wrapping_add(rhs),
        BinaryOp::Subtract => lhs.wrapping_sub(rhs),
        BinaryOp::Multiply => lhs.wrapping_mul(rhs),
        BinaryOp::Less => i64::from(lhs < rhs),
        BinaryOp::Greater => i64::from(lhs > rhs),
    }
}

pub fn evaluate(program: &Program) -> EvalRes<Option<i64>> {
    Evaluator::new().run(program)
}
