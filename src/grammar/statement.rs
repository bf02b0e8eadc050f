use super::block::parse_block;
use super::expr::parse_required;
use super::{ParseErrorKind, ParseRes, Parser};
use crate::ast::Statement;

/// `previous` is the statement just before `AWOO`; only a bare name can be assigned to.
pub(super) fn parse_assignment<'source>(
    parser: &mut Parser<'source>,
    previous: Option<Statement<'source>>,
) -> ParseRes<Statement<'source>> {
    let target = match previous {
        Some(Statement::Bare(target)) => target,
        other => {
            let found = match other {
                None => "nothing",
                Some(Statement::Assign { .. }) => "another assignment",
                Some(Statement::If { .. }) => "an if statement",
                Some(Statement::While { .. }) => "a while loop",
                Some(Statement::Bare(_)) => unreachable!(),
            };
            return parser.emit_error(ParseErrorKind::MalformedAssignment { found });
        }
    };
    let value = parser.with_context("parsing assigned value", |parser| {
        parse_required(parser, "a value to assign")
    })?;
    Ok(Statement::Assign { target, value })
}

/// Both halves are always parsed: an if closed by an end spelling still owns the block up to
/// the next terminator as its (usually empty) else branch.
pub(super) fn parse_if<'source>(parser: &mut Parser<'source>) -> ParseRes<Statement<'source>> {
    let id = parser.new_node_id();
    let condition = parser.with_context("parsing if statement's condition", |parser| {
        parse_required(parser, "a condition")
    })?;
    let (then_branch, then_end) = parser.with_context("parsing if statement's then branch", |parser| {
        parse_block(parser, true)
    })?;
    let (else_branch, _) = parser.with_context("parsing if statement's else branch", |parser| {
        parse_block(parser, true)
    })?;
    tracing::trace!(target: "parser::if", "if #{id}: {condition}, then branch closed by {then_end:?}");
    Ok(Statement::If {
        id,
        condition,
        then_branch,
        else_branch,
    })
}

pub(super) fn parse_while<'source>(parser: &mut Parser<'source>) -> ParseRes<Statement<'source>> {
    let id = parser.new_node_id();
    let condition = parser.with_context("parsing while loop's condition", |parser| {
        parse_required(parser, "a condition")
    })?;
    let (body, _) = parser.with_context("parsing while loop's body", |parser| {
        parse_block(parser, true)
    })?;
    tracing::trace!(target: "parser::while", "while #{id}: {condition}");
    Ok(Statement::While {
        id,
        condition,
        body,
    })
}

#[cfg(test)]
mod tests {
    use crate::ast::{BinaryOp, Block, Expr, Identifier, NodeId, Program, Statement};
    use crate::grammar::{ParseErrorKind, ParseRes, Parser};

    fn parse(source: &str) -> ParseRes<Vec<Statement>> {
        let Program(Block(statements)) = Parser::from_source(source).parse()?;
        Ok(statements)
    }

    fn assign<'a>(name: &'a str, value: Expr<'a>) -> Statement<'a> {
        Statement::Assign {
            target: Identifier(name),
            value,
        }
    }

    #[test]
    fn if_with_else() {
        let statements = parse("RUF? 1 YIP 2 VUH x AWOO 10 ROWH x AWOO 20 ARRUF").unwrap();
        assert_eq!(
            statements,
            [Statement::If {
                id: NodeId(0),
                condition: Expr::binary(BinaryOp::Less, Expr::Integer(1), Expr::Integer(2)),
                then_branch: Block(vec![assign("x", Expr::Integer(10))]),
                else_branch: Block(vec![assign("x", Expr::Integer(20))]),
            }]
        );
    }

    #[test]
    fn if_closed_by_end_takes_the_next_block_as_else() {
        let statements = parse("RUF? 1 VUH x AWOO 1 ARRUF BORF y AWOO 2").unwrap();
        assert_eq!(statements.len(), 2);
        match &statements[0] {
            Statement::If {
                then_branch,
                else_branch,
                ..
            } => {
                assert_eq!(then_branch.0.len(), 1);
                assert!(else_branch.is_empty());
            }
            other => panic!("expected an if, got {other:?}"),
        }
    }

    #[test]
    fn if_without_second_terminator_exhausts_input() {
        let err = parse("RUF? 1 VUH x AWOO 1 ARRUF").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::ExhaustedInput);
        assert_eq!(err.contexts()[0], "parsing if statement's else branch");
    }

    #[test]
    fn while_loop() {
        let statements = parse("x AWOO 0 GRRR x YIP 5 BOW x AWOO x WOOF 1 ARRUF").unwrap();
        assert_eq!(
            statements[1],
            Statement::While {
                id: NodeId(0),
                condition: Expr::binary(BinaryOp::Less, Expr::variable("x"), Expr::Integer(5)),
                body: Block(vec![assign(
                    "x",
                    Expr::binary(BinaryOp::Add, Expr::variable("x"), Expr::Integer(1))
                )]),
            }
        );
    }

    #[test]
    fn nested_blocks_share_the_terminator_rule() {
        let statements =
            parse("GRRR a BOW RUF? b VUH c AWOO 1 ROWH c AWOO 2 BORF ARRUF d AWOO 3").unwrap();
        assert_eq!(statements.len(), 2);
        match &statements[0] {
            Statement::While { id, body, .. } => {
                assert_eq!(*id, NodeId(0));
                assert!(matches!(body.0.as_slice(), [Statement::If { id: NodeId(1), .. }]));
            }
            other => panic!("expected a while, got {other:?}"),
        }
    }

    #[test]
    fn assignment_without_a_name() {
        let err = parse("AWOO 3").unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::MalformedAssignment { found: "nothing" }
        );
        let err = parse("x AWOO 1 AWOO 2").unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::MalformedAssignment {
                found: "another assignment"
            }
        );
    }

    #[test]
    fn assignment_without_a_value() {
        let err = parse("x AWOO").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::ExhaustedInput);
        let err = parse("RUF? 1 VUH x AWOO ROWH ARRUF").unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::MissingOperand {
                wanted: "a value to assign"
            }
        );
    }

    #[test]
    fn while_without_condition() {
        let err = parse("GRRR BOW ARRUF").unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::MissingOperand {
                wanted: "a condition"
            }
        );
    }
}
