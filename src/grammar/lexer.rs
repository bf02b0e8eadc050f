use super::cursor::TokenCursor;
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::fmt;

lazy_static! {
    /// Surface spelling of every keyword. Both `ARRUF` and `BORF` close whichever block is open.
    static ref KEYWORDS: HashMap<&'static str, Symbol> = {
        let mut map = HashMap::new();
        map.insert("AWOO", Symbol::Assign);
        map.insert("GRRR", Symbol::While);
        map.insert("YIP", Symbol::LessThan);
        map.insert("BOW", Symbol::Do);
        map.insert("RUF?", Symbol::If);
        map.insert("YAP", Symbol::GreaterThan);
        map.insert("VUH", Symbol::Then);
        map.insert("BARK", Symbol::Subtract);
        map.insert("ROWH", Symbol::Else);
        map.insert("WOOF", Symbol::Add);
        map.insert("ARF", Symbol::Multiply);
        map.insert("ARRUF", Symbol::End);
        map.insert("BORF", Symbol::End);
        map
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    Assign,
    While,
    LessThan,
    Do,
    If,
    GreaterThan,
    Then,
    Subtract,
    Else,
    Add,
    Multiply,
    End,
}

impl Symbol {
    pub fn from_token(token: &str) -> Option<Self> {
        KEYWORDS.get(token).copied()
    }

    /// Binding strength of the symbol inside an expression. Zero means the symbol can't
    /// continue an expression and hands control back to the statement parser.
    pub const fn priority(self) -> u8 {
        match crate::ast::BinaryOp::from_symbol(self) {
            Some(op) => op.priority(),
            None => 0,
        }
    }

    pub const fn is_terminator(self) -> bool {
        matches!(self, Self::End | Self::Else)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::Assign => "assignment `AWOO`",
            Self::While => "`GRRR`",
            Self::LessThan => "operator `YIP`",
            Self::Do => "`BOW`",
            Self::If => "`RUF?`",
            Self::GreaterThan => "operator `YAP`",
            Self::Then => "`VUH`",
            Self::Subtract => "operator `BARK`",
            Self::Else => "`ROWH`",
            Self::Add => "operator `WOOF`",
            Self::Multiply => "operator `ARF`",
            Self::End => "block end",
        })
    }
}

/// What a raw token means to the parser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenClass {
    Keyword(Symbol),
    Integer,
    Plain,
}

pub fn classify(token: &str) -> TokenClass {
    if let Some(symbol) = Symbol::from_token(token) {
        TokenClass::Keyword(symbol)
    } else if !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) {
        TokenClass::Integer
    } else {
        TokenClass::Plain
    }
}

pub fn tokenize(source: &str) -> TokenCursor<'_> {
    TokenCursor::new(source.split_whitespace().collect())
}
