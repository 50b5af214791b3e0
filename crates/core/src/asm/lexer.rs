//! Lexer: assembly source text to tokens.
//!
//! The lexer works one line at a time. Whitespace and commas separate tokens
//! and `#` starts a comment that runs to the end of the line. On each line the
//! first bare identifier (after an optional `label:`) is the mnemonic; later
//! identifiers are label references.

use crate::asm::token::{Token, TokenKind};
use crate::common::error::LexError;
use crate::isa::abi;

/// Comment marker; the rest of the line is ignored.
const COMMENT: u8 = b'#';

#[inline]
const fn is_separator(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\r' | b',')
}

#[inline]
const fn is_ident_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_' || c == b'.'
}

#[inline]
const fn is_ident_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_' || c == b'.'
}

/// Lexes a complete source text.
///
/// # Examples
///
/// ```
/// use mipsim_core::asm::lexer::lex;
/// use mipsim_core::asm::token::TokenKind;
///
/// let tokens = lex("loop: addi $t0, $t0, -1").unwrap();
/// assert_eq!(tokens[0].kind, TokenKind::Label("loop".into()));
/// assert_eq!(tokens[1].kind, TokenKind::Mnemonic("addi".into()));
/// assert_eq!(tokens[2].kind, TokenKind::Register(8));
/// assert_eq!(tokens[4].kind, TokenKind::Immediate(-1));
/// ```
///
/// # Errors
///
/// Returns the first [`LexError`] encountered; no tokens are produced.
pub fn lex(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).lex()
}

/// Single-use lexer over one source text.
#[derive(Debug)]
pub struct Lexer<'a> {
    source: &'a str,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer over `source`.
    pub const fn new(source: &'a str) -> Self {
        Self {
            source,
            tokens: Vec::new(),
        }
    }

    /// Consumes the lexer, returning every token in source order.
    ///
    /// # Errors
    ///
    /// Returns the first [`LexError`] encountered.
    pub fn lex(mut self) -> Result<Vec<Token>, LexError> {
        for (idx, raw) in self.source.lines().enumerate() {
            self.lex_line(raw, idx + 1)?;
        }
        Ok(self.tokens)
    }

    fn lex_line(&mut self, raw: &str, line: usize) -> Result<(), LexError> {
        let code = raw.find(char::from(COMMENT)).map_or(raw, |i| &raw[..i]);
        let bytes = code.as_bytes();
        let mut seen_mnemonic = false;
        let mut pos = 0;

        while let Some(&c) = bytes.get(pos) {
            if is_separator(c) {
                pos += 1;
                continue;
            }

            let start = pos;
            match c {
                b'(' => {
                    pos += 1;
                    self.push(TokenKind::OpenParen, "(", line);
                }
                b')' => {
                    pos += 1;
                    self.push(TokenKind::CloseParen, ")", line);
                }
                b'$' => {
                    pos = scan(bytes, pos + 1, is_ident_char);
                    let text = &code[start..pos];
                    let idx = abi::index(&text[1..]).ok_or_else(|| LexError::UnknownRegister {
                        line,
                        text: text.to_string(),
                    })?;
                    self.push(TokenKind::Register(idx as u8), text, line);
                }
                b'-' | b'+' | b'0'..=b'9' => {
                    pos = scan(bytes, pos + 1, |b| b.is_ascii_alphanumeric() || b == b'_');
                    let text = &code[start..pos];
                    let value = parse_integer(text, line)?;
                    self.push(TokenKind::Immediate(value), text, line);
                }
                c if is_ident_start(c) => {
                    pos = scan(bytes, pos, is_ident_char);
                    let text = &code[start..pos];
                    if bytes.get(pos) == Some(&b':') {
                        pos += 1;
                        self.push(TokenKind::Label(text.to_string()), &code[start..pos], line);
                    } else if seen_mnemonic {
                        self.push(TokenKind::Symbol(text.to_string()), text, line);
                    } else {
                        seen_mnemonic = true;
                        self.push(TokenKind::Mnemonic(text.to_ascii_lowercase()), text, line);
                    }
                }
                _ => {
                    let text = code[start..].chars().next().map(String::from).unwrap_or_default();
                    return Err(LexError::UnrecognizedToken { line, text });
                }
            }
        }
        Ok(())
    }

    fn push(&mut self, kind: TokenKind, text: &str, line: usize) {
        self.tokens.push(Token::new(kind, text, line));
    }
}

/// Advances past every byte matching `pred`, returning the first index that does not.
fn scan(bytes: &[u8], mut pos: usize, pred: impl Fn(u8) -> bool) -> usize {
    while bytes.get(pos).is_some_and(|&b| pred(b)) {
        pos += 1;
    }
    pos
}

/// Parses an optionally signed decimal or `0x` hexadecimal integer.
///
/// Any value in `i32::MIN..=u32::MAX` is accepted; values above `i32::MAX`
/// are taken as a 32-bit pattern (`0xFFFFFFFF` is -1).
fn parse_integer(text: &str, line: usize) -> Result<i32, LexError> {
    let unrecognized = || LexError::UnrecognizedToken {
        line,
        text: text.to_string(),
    };

    let (negative, unsigned) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let (radix, digits) = match unsigned.get(..2) {
        Some("0x" | "0X") => (16, &unsigned[2..]),
        _ => (10, unsigned),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(unrecognized());
    }

    let magnitude = u64::from_str_radix(digits, radix).map_err(|_| LexError::IntegerOutOfRange {
        line,
        text: text.to_string(),
    })?;
    let value = if negative {
        -i128::from(magnitude)
    } else {
        i128::from(magnitude)
    };
    if value < i128::from(i32::MIN) || value > i128::from(u32::MAX) {
        return Err(LexError::IntegerOutOfRange {
            line,
            text: text.to_string(),
        });
    }
    Ok(value as u32 as i32)
}
