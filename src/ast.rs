//! Abstract syntax tree handed from the parser to the compiler and the evaluator
use crate::grammar::lexer::Symbol;

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program<'source>(pub Block<'source>);

#[derive(Clone, Default, PartialEq, Eq)]
pub struct Block<'source>(pub Vec<Statement<'source>>);

impl fmt::Debug for Block<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut dbg_struct = f.debug_struct("Block");
        for (i, stmt) in self.0.iter().enumerate() {
            dbg_struct.field(&i.to_string(), stmt);
        }
        dbg_struct.finish()
    }
}

impl Block<'_> {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Identity given to control flow nodes when they are built, used to name their labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement<'source> {
    Assign {
        target: Identifier<'source>,
        value: Expr<'source>,
    },
    If {
        id: NodeId,
        condition: Expr<'source>,
        then_branch: Block<'source>,
        /// Always present; empty when the source had nothing between the two terminators.
        else_branch: Block<'source>,
    },
    While {
        id: NodeId,
        condition: Expr<'source>,
        body: Block<'source>,
    },
    /// A name that was never followed by an assignment. Compiles to nothing.
    Bare(Identifier<'source>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Identifier<'source>(pub &'source str);

impl fmt::Display for Identifier<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr<'source> {
    Integer(i64),
    Variable(Identifier<'source>),
    Binary {
        operator: BinaryOp,
        lhs: Box<Expr<'source>>,
        rhs: Box<Expr<'source>>,
    },
}

impl<'source> Expr<'source> {
    pub fn binary(operator: BinaryOp, lhs: Self, rhs: Self) -> Self {
        Self::Binary {
            operator,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }
    pub const fn variable(name: &'source str) -> Self {
        Self::Variable(Identifier(name))
    }
}

/// Fully parenthesised infix form, e.g. `(3 + (4 * 2))`
impl fmt::Display for Expr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(value) => write!(f, "{}", value),
            Self::Variable(name) => write!(f, "{}", name),
            Self::Binary { operator, lhs, rhs } => write!(f, "({} {} {})", lhs, operator, rhs),
        }
    }
}

/// Includes any kind of operator that needs two values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// `WOOF`
    Add,
    /// `BARK`
    Subtract,
    /// `ARF`
    Multiply,
    /// `YIP`
    Less,
    /// `YAP`
    Greater,
}

impl BinaryOp {
    /// Lower binds tighter. Never zero, zero is reserved for symbols that end an expression.
    pub const fn priority(self) -> u8 {
        match self {
            Self::Multiply => 1,
            Self::Add | Self::Subtract => 2,
            Self::Less | Self::Greater => 3,
        }
    }
    pub const fn from_symbol(symbol: Symbol) -> Option<Self> {
        Some(match symbol {
            Symbol::Add => Self::Add,
            Symbol::Subtract => Self::Subtract,
            Symbol::Multiply => Self::Multiply,
            Symbol::LessThan => Self::Less,
            Symbol::GreaterThan => Self::Greater,
            Symbol::Assign
            | Symbol::While
            | Symbol::Do
            | Symbol::If
            | Symbol::Then
            | Symbol::Else
            | Symbol::End => return None,
        })
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Less => "<",
            Self::Greater => ">",
        })
    }
}
