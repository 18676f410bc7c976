use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::Span;

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("Function", TokenKind::Function);
        map.insert("end", TokenKind::End);
        map.insert("for", TokenKind::For);
        map.insert("in", TokenKind::In);
        map.insert("return", TokenKind::Return);
        map.insert("break", TokenKind::Break);
        map.insert("true", TokenKind::True);
        map.insert("false", TokenKind::False);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    Number,
    String,
    Identifier,

    OpenBracket,
    CloseBracket,
    OpenParen,
    CloseParen,
    OpenDict,  // <<
    CloseDict, // >>

    Assignment, // =
    Equals,     // ==
    Not,        // !
    NotEquals,  // !=

    Less,
    LessEquals,
    Greater,
    GreaterEquals,

    Or,
    And,

    Colon,
    Question,
    Comma,
    Dot,
    Arrow,

    PlusEquals,
    MinusEquals,
    StarEquals,
    SlashEquals,
    PercentEquals,

    Plus,
    Dash,
    Slash,
    Star,
    StarStar,
    Percent,

    // Reserved
    Function,
    End,
    For,
    In,
    Return,
    Break,
    True,
    False,
}

impl TokenKind {
    /// The binary operator a compound assignment token stands for.
    pub fn compound_operator(&self) -> Option<TokenKind> {
        match self {
            TokenKind::PlusEquals => Some(TokenKind::Plus),
            TokenKind::MinusEquals => Some(TokenKind::Dash),
            TokenKind::StarEquals => Some(TokenKind::Star),
            TokenKind::SlashEquals => Some(TokenKind::Slash),
            TokenKind::PercentEquals => Some(TokenKind::Percent),
            _ => None,
        }
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub span: Span,
    /// Set when at least one line break separates this token from the previous one.
    pub newline_before: bool,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            TokenKind::String | TokenKind::Identifier | TokenKind::Number => {
                write!(f, "{} ({}) @ {}", self.kind, self.value, self.span.start)
            }
            _ => write!(f, "{} @ {}", self.kind, self.span.start),
        }
    }
}

impl Token {
    pub fn is_one_of_many(&self, tokens: &[TokenKind]) -> bool {
        tokens.contains(&self.kind)
    }
}
