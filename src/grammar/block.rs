use super::lexer::{classify, Symbol, TokenClass};
use super::{statement, ParseErrorKind, ParseRes, Parser};
use crate::ast::{Block, Identifier, Statement};

/// What made a block stop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminator {
    /// `ROWH` or one of the end spellings. It is consumed along with the block.
    Symbol(Symbol),
    /// Only possible for the top level block
    EndOfInput,
}

/// Reads statements until a terminator. A nested block (branch or loop body) that runs out of
/// tokens before its terminator fails with `ExhaustedInput`; the top level block simply ends.
pub(super) fn parse_block<'source>(
    parser: &mut Parser<'source>,
    nested: bool,
) -> ParseRes<(Block<'source>, Terminator)> {
    let mut statements = Vec::new();
    loop {
        if !nested && !parser.tokens().has_next() {
            return Ok((Block(statements), Terminator::EndOfInput));
        }
        let token = parser.tokens().next()?;
        let statement = match classify(token) {
            TokenClass::Keyword(symbol) if symbol.is_terminator() => {
                tracing::trace!(target: "parser::block", "block of {} statements closed by {symbol:?}", statements.len());
                return Ok((Block(statements), Terminator::Symbol(symbol)));
            }
            // clause separators after a condition
            TokenClass::Keyword(Symbol::Then | Symbol::Do) => continue,
            TokenClass::Keyword(Symbol::Assign) => {
                statement::parse_assignment(parser, statements.pop())?
            }
            TokenClass::Keyword(Symbol::If) => statement::parse_if(parser)?,
            TokenClass::Keyword(Symbol::While) => statement::parse_while(parser)?,
            TokenClass::Keyword(_) => {
                return parser.emit_error(ParseErrorKind::UnexpectedToken {
                    found: token.to_string(),
                })
            }
            // any other token is a name waiting for a possible `AWOO`
            TokenClass::Integer | TokenClass::Plain => Statement::Bare(Identifier(token)),
        };
        statements.push(statement);
    }
}
