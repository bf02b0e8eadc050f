use crate::ast::{NodeId, Program};
use crate::error::Error;
use thiserror::Error;

mod block;
pub mod cursor;
mod expr;
pub mod lexer;
mod statement;

pub use block::Terminator;
pub use expr::fix_precedence;

use cursor::TokenCursor;
use lexer::Symbol;

pub struct Parser<'source> {
    tokens: TokenCursor<'source>,
    next_id: usize,
}

impl<'source> Parser<'source> {
    pub fn new(tokens: TokenCursor<'source>) -> Self {
        Self { tokens, next_id: 0 }
    }
    pub fn from_source(source: &'source str) -> Self {
        Self::new(lexer::tokenize(source))
    }

    pub fn tokens(&mut self) -> &mut TokenCursor<'source> {
        &mut self.tokens
    }

    /// Hands out ids in construction order, so the same program always gets the same labels.
    pub fn new_node_id(&mut self) -> NodeId {
        let current = self.next_id;
        self.next_id += 1;
        NodeId(current)
    }

    pub fn parse<T>(&mut self) -> ParseRes<T>
    where
        T: Parse<'source>,
    {
        T::parse(self)
    }
    pub fn with_context<F, T>(&mut self, context: &'static str, mut cont: F) -> ParseRes<T>
    where
        F: FnMut(&mut Self) -> ParseRes<T>,
    {
        cont(self).map_err(|x| x.add_context(context))
    }

    pub fn emit_error<T>(&self, kind: ParseErrorKind) -> ParseRes<T> {
        Err(ParseError::new(kind))
    }
}

pub type ParseRes<T> = Result<T, ParseError>;
pub type ParseError = Error<ParseErrorKind>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    #[error("unexpected end of input")]
    ExhaustedInput,
    #[error("assignment needs a variable name right before it, found {found}")]
    MalformedAssignment { found: &'static str },
    #[error("expected {wanted}, but found nothing")]
    MissingOperand { wanted: &'static str },
    #[error("unexpected {found:?} at the start of a statement")]
    UnexpectedToken { found: String },
    #[error("{0} without an open block")]
    UnbalancedTerminator(Symbol),
    #[error("integer literal {0} does not fit in 64 bits")]
    IntegerOutOfRange(String),
}

pub trait Parse<'source>: Sized {
    fn parse(parser: &mut Parser<'source>) -> ParseRes<Self>;
}

impl<'source> Parse<'source> for Program<'source> {
    fn parse(parser: &mut Parser<'source>) -> ParseRes<Self> {
        parser.with_context("parsing program", |parser| {
            let (body, terminator) = block::parse_block(parser, false)?;
            match terminator {
                Terminator::EndOfInput => Ok(Program(body)),
                Terminator::Symbol(symbol) => {
                    parser.emit_error(ParseErrorKind::UnbalancedTerminator(symbol))
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BinaryOp, Block, Expr, Identifier, Statement};

    pub(crate) fn parse(source: &str) -> ParseRes<Program> {
        Parser::from_source(source).parse()
    }

    #[test]
    fn empty_source_is_an_empty_program() {
        assert_eq!(parse(" \n ").unwrap(), Program(Block::default()));
    }

    #[test]
    fn stray_terminator_at_top_level() {
        let err = parse("x AWOO 1 BORF").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnbalancedTerminator(Symbol::End));
        let err = parse("ROWH").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnbalancedTerminator(Symbol::Else));
    }

    #[test]
    fn node_ids_follow_construction_order() {
        let Program(Block(statements)) =
            parse("RUF? 1 VUH ROWH ARRUF GRRR 0 BOW ARRUF RUF? 1 VUH ROWH ARRUF").unwrap();
        let ids: Vec<_> = statements
            .iter()
            .map(|stmt| match stmt {
                Statement::If { id, .. } | Statement::While { id, .. } => id.0,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(ids, [0, 1, 2]);
    }

    #[test]
    fn full_program() {
        let program = parse("x AWOO 3 WOOF 4 ARF 2").unwrap();
        assert_eq!(
            program,
            Program(Block(vec![Statement::Assign {
                target: Identifier("x"),
                value: Expr::binary(
                    BinaryOp::Add,
                    Expr::Integer(3),
                    Expr::binary(BinaryOp::Multiply, Expr::Integer(4), Expr::Integer(2)),
                ),
            }]))
        );
    }

    #[test]
    fn errors_carry_what_the_parser_was_doing() {
        let err = parse("GRRR x YIP 3 BOW x AWOO x WOOF 1").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::ExhaustedInput);
        assert_eq!(
            err.contexts(),
            &["parsing while loop's body", "parsing program"]
        );
    }
}
