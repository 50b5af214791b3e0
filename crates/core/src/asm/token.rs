//! Lexical tokens.

use std::fmt;

/// Token classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// A label declaration (`name:`), without the colon.
    Label(String),
    /// The instruction mnemonic of a line.
    Mnemonic(String),
    /// A register operand, resolved to its index.
    Register(u8),
    /// An integer operand.
    Immediate(i32),
    /// A label reference used as an operand.
    Symbol(String),
    /// `(` opening a memory operand base.
    OpenParen,
    /// `)` closing a memory operand base.
    CloseParen,
}

/// A lexical unit with its literal text and 1-based source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Classification and decoded value.
    pub kind: TokenKind,
    /// Text exactly as written in the source.
    pub text: String,
    /// 1-based source line.
    pub line: usize,
}

impl Token {
    /// Creates a token.
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
        }
    }

    /// Whether this token begins a new statement (label or mnemonic).
    pub const fn starts_statement(&self) -> bool {
        matches!(self.kind, TokenKind::Label(_) | TokenKind::Mnemonic(_))
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Label(name) => write!(f, "LABEL({name})"),
            Self::Mnemonic(name) => write!(f, "MNEMONIC({name})"),
            Self::Register(idx) => write!(f, "REGISTER({idx})"),
            Self::Immediate(val) => write!(f, "IMMEDIATE({val})"),
            Self::Symbol(name) => write!(f, "SYMBOL({name})"),
            Self::OpenParen => f.write_str("LPAREN"),
            Self::CloseParen => f.write_str("RPAREN"),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>4}  {:<20} {}", self.line, self.kind.to_string(), self.text)
    }
}
