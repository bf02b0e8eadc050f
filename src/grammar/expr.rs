use super::lexer::{classify, TokenClass};
use super::{ParseErrorKind, ParseRes, Parser};
use crate::ast::{BinaryOp, Expr};

/// Greedily reads one expression. Operands are parsed by plain right recursion, so every freshly
/// built binary node goes through [`fix_precedence`] before the loop continues.
///
/// Returns `None` when the very first token can't start an expression. That token is pushed back.
pub(super) fn parse_expression<'source>(
    parser: &mut Parser<'source>,
) -> ParseRes<Option<Expr<'source>>> {
    let mut expression: Option<Expr<'source>> = None;
    while parser.tokens().has_next() {
        let token = parser.tokens().next()?;
        let next = match classify(token) {
            // two operands in a row: the second one starts the next statement
            TokenClass::Integer | TokenClass::Plain if expression.is_some() => {
                parser.tokens().push_back();
                break;
            }
            TokenClass::Integer => token.parse().map(Expr::Integer).map_err(|_| {
                ParseErrorKind::IntegerOutOfRange(token.to_string())
            })?,
            TokenClass::Plain => Expr::variable(token),
            TokenClass::Keyword(symbol) => match BinaryOp::from_symbol(symbol) {
                Some(operator) => {
                    let lhs = match expression.take() {
                        Some(lhs) => lhs,
                        None => {
                            return parser.emit_error(ParseErrorKind::MissingOperand {
                                wanted: "a left operand",
                            })
                        }
                    };
                    let rhs = parse_required(parser, "a right operand")?;
                    fix_precedence(Expr::binary(operator, lhs, rhs))
                }
                None => {
                    parser.tokens().push_back();
                    break;
                }
            },
        };
        expression = Some(next);
    }
    Ok(expression)
}

/// Like [`parse_expression`], but nothing is an error.
pub(super) fn parse_required<'source>(
    parser: &mut Parser<'source>,
    wanted: &'static str,
) -> ParseRes<Expr<'source>> {
    match parse_expression(parser)? {
        Some(expr) => Ok(expr),
        None if !parser.tokens().has_next() => parser.emit_error(ParseErrorKind::ExhaustedInput),
        None => parser.emit_error(ParseErrorKind::MissingOperand { wanted }),
    }
}

/// Rotates `(op, l, (op2, l2, r2))` into `((op, l, l2), op2, r2)` whenever `op` binds at least as
/// tight as `op2`, repairing the new left child the same way. Equal priorities rotate too, which
/// is what makes the operators left associative. A tree that is already well shaped comes back
/// untouched.
pub fn fix_precedence(expr: Expr<'_>) -> Expr<'_> {
    match expr {
        Expr::Binary { operator, lhs, rhs } => match *rhs {
            Expr::Binary {
                operator: right_op,
                lhs: right_lhs,
                rhs: right_rhs,
            } if operator.priority() <= right_op.priority() => {
                tracing::trace!(target: "parser::fixup", "rotating {operator} over {right_op}");
                Expr::Binary {
                    operator: right_op,
                    lhs: Box::new(fix_precedence(Expr::Binary {
                        operator,
                        lhs,
                        rhs: right_lhs,
                    })),
                    rhs: right_rhs,
                }
            }
            rhs => Expr::Binary {
                operator,
                lhs,
                rhs: Box::new(rhs),
            },
        },
        leaf => leaf,
    }
}
