//! Assembler front end.
//!
//! Source text flows one way through this module: [`lexer::lex`] produces
//! [`token::Token`]s and [`parser::parse`] turns them into a
//! [`parser::Program`] of decoded instructions plus its [`labels::LabelTable`].

/// Label name to instruction index bindings.
pub mod labels;

/// Line-oriented lexer.
pub mod lexer;

/// Two-pass parser with label resolution.
pub mod parser;

/// Token types.
pub mod token;

pub use labels::LabelTable;
pub use lexer::lex;
pub use parser::{Program, parse};
pub use token::{Token, TokenKind};

use crate::common::error::SimError;

/// Lexes and parses `source` in one call.
///
/// # Errors
///
/// Returns a [`SimError::Lex`] or [`SimError::Parse`] for the first fault.
pub fn assemble(source: &str) -> Result<(Vec<Token>, Program), SimError> {
    let tokens = lex(source)?;
    let program = parse(&tokens)?;
    Ok((tokens, program))
}
