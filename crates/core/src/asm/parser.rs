//! Two-pass parser: tokens to a decoded [`Program`].
//!
//! Tokens are first grouped into statements (a label declaration, or a
//! mnemonic plus the operand tokens that follow it on the same line). The
//! first pass binds every label to the index of the next instruction, so the
//! table is complete before any operand is decoded; forward and backward
//! references therefore resolve identically. The second pass matches each
//! statement's operands against the opcode's [`OperandShape`].
//!
//! A line holding only a label emits no instruction: in `main:\nnop\nnext:\nnop`
//! the label `next` names instruction 1, not 2.

use std::fmt;

use crate::asm::labels::LabelTable;
use crate::asm::token::{Token, TokenKind};
use crate::common::error::ParseError;
use crate::isa::instruction::Instruction;
use crate::isa::opcode::{Opcode, OperandShape};

/// Largest constant shift amount.
const MAX_SHAMT: i32 = 31;

/// Parser output: the instruction sequence and its label table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    /// Decoded instructions; an instruction's index is its address.
    pub instructions: Vec<Instruction>,
    /// Label declarations.
    pub labels: LabelTable,
}

impl Program {
    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Whether the program has no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, inst) in self.instructions.iter().enumerate() {
            writeln!(
                f,
                "{idx:>4}  [{:>2}] line {:<4} {inst}",
                inst.opcode.code(),
                inst.line_number
            )?;
        }
        Ok(())
    }
}

/// Parses a token stream.
///
/// # Examples
///
/// ```
/// use mipsim_core::asm::{lexer::lex, parser::parse};
///
/// let program = parse(&lex("loop: addi $t0, $t0, -1\nbne $t0, $zero, loop").unwrap()).unwrap();
/// assert_eq!(program.labels.resolve("loop"), Some(0));
/// assert_eq!(program.instructions[1].immediate, -2);
/// ```
///
/// # Errors
///
/// Returns the first [`ParseError`]; no partial program is produced.
pub fn parse(tokens: &[Token]) -> Result<Program, ParseError> {
    Parser::new(tokens).parse()
}

/// A grouped source statement.
#[derive(Debug)]
enum Statement<'t> {
    Label { name: &'t str, line: usize },
    Instruction { mnemonic: &'t str, line: usize, operands: &'t [Token] },
}

/// A decoded operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operand<'t> {
    Reg(u8),
    Imm(i32),
    Sym(&'t str),
    Mem { offset: i32, base: u8 },
}

impl fmt::Display for Operand<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reg(r) => write!(f, "${r}"),
            Self::Imm(v) => write!(f, "{v}"),
            Self::Sym(s) => f.write_str(s),
            Self::Mem { offset, base } => write!(f, "{offset}(${base})"),
        }
    }
}

/// Parser over a borrowed token slice.
#[derive(Debug)]
pub struct Parser<'t> {
    tokens: &'t [Token],
}

impl<'t> Parser<'t> {
    /// Creates a parser over `tokens`.
    pub const fn new(tokens: &'t [Token]) -> Self {
        Self { tokens }
    }

    /// Runs both passes.
    ///
    /// # Errors
    ///
    /// Returns the first [`ParseError`].
    pub fn parse(self) -> Result<Program, ParseError> {
        let statements = self.group()?;

        // Pass 1: bind labels to the index of the next instruction. Label
        // statements do not advance the index.
        let mut labels = LabelTable::new();
        let mut next_index = 0;
        for stmt in &statements {
            match *stmt {
                Statement::Label { name, line } => labels.declare(name, next_index, line)?,
                Statement::Instruction { .. } => next_index += 1,
            }
        }

        // Pass 2: decode operands with the complete table.
        let mut instructions = Vec::with_capacity(next_index);
        for stmt in &statements {
            if let Statement::Instruction {
                mnemonic,
                line,
                operands,
            } = *stmt
            {
                let index = instructions.len();
                let mut inst = decode(mnemonic, line, operands, index, &labels)?;
                inst.label = labels.name_at(index).map(str::to_string);
                instructions.push(inst);
            }
        }

        Ok(Program {
            instructions,
            labels,
        })
    }

    /// Splits the token stream into statements.
    fn group(&self) -> Result<Vec<Statement<'t>>, ParseError> {
        let tokens = self.tokens;
        let mut statements = Vec::new();
        let mut pos = 0;

        while let Some(tok) = tokens.get(pos) {
            match &tok.kind {
                TokenKind::Label(name) => {
                    statements.push(Statement::Label {
                        name,
                        line: tok.line,
                    });
                    pos += 1;
                }
                TokenKind::Mnemonic(mnemonic) => {
                    let start = pos + 1;
                    let mut end = start;
                    while tokens
                        .get(end)
                        .is_some_and(|t| t.line == tok.line && !t.starts_statement())
                    {
                        end += 1;
                    }
                    statements.push(Statement::Instruction {
                        mnemonic,
                        line: tok.line,
                        operands: &tokens[start..end],
                    });
                    pos = end;
                }
                _ => {
                    return Err(ParseError::ExpectedMnemonic {
                        line: tok.line,
                        found: tok.text.clone(),
                    });
                }
            }
        }
        Ok(statements)
    }
}

/// Groups operand tokens into operands; `None` if parentheses are malformed.
fn operands(tokens: &[Token]) -> Option<Vec<Operand<'_>>> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut pos = 0;

    while let Some(tok) = tokens.get(pos) {
        let operand = match (&tok.kind, tokens.get(pos + 1).map(|t| &t.kind)) {
            // `imm($reg)`
            (TokenKind::Immediate(offset), Some(TokenKind::OpenParen)) => {
                let base = mem_base(tokens.get(pos + 2..pos + 4)?)?;
                pos += 4;
                Operand::Mem {
                    offset: *offset,
                    base,
                }
            }
            // `($reg)`
            (TokenKind::OpenParen, _) => {
                let base = mem_base(tokens.get(pos + 1..pos + 3)?)?;
                pos += 3;
                Operand::Mem { offset: 0, base }
            }
            (TokenKind::Register(r), _) => {
                pos += 1;
                Operand::Reg(*r)
            }
            (TokenKind::Immediate(v), _) => {
                pos += 1;
                Operand::Imm(*v)
            }
            (TokenKind::Symbol(s), _) => {
                pos += 1;
                Operand::Sym(s)
            }
            _ => return None,
        };
        out.push(operand);
    }
    Some(out)
}

/// Matches `$reg )`.
fn mem_base(tokens: &[Token]) -> Option<u8> {
    match tokens {
        [
            Token {
                kind: TokenKind::Register(r),
                ..
            },
            Token {
                kind: TokenKind::CloseParen,
                ..
            },
        ] => Some(*r),
        _ => None,
    }
}

/// Decodes one instruction statement at address `index`.
fn decode(
    mnemonic: &str,
    line: usize,
    tokens: &[Token],
    index: usize,
    labels: &LabelTable,
) -> Result<Instruction, ParseError> {
    let opcode = Opcode::from_mnemonic(mnemonic).ok_or_else(|| ParseError::UnknownMnemonic {
        line,
        mnemonic: mnemonic.to_string(),
    })?;
    let shape = opcode.shape();

    let mismatch = |found: String| ParseError::OperandMismatch {
        line,
        mnemonic: opcode.mnemonic().to_string(),
        expected: shape.template(),
        found,
    };
    let Some(ops) = operands(tokens) else {
        let found: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        return Err(mismatch(found.join(" ")));
    };

    // Branches store an offset from the next instruction; jumps store the index.
    let target = |op: Operand<'_>| -> Result<i32, ParseError> {
        match op {
            Operand::Imm(v) => Ok(v),
            Operand::Sym(name) => {
                let dest = labels
                    .resolve(name)
                    .ok_or_else(|| ParseError::UnresolvedLabel {
                        line,
                        label: name.to_string(),
                    })?;
                if opcode.is_branch() {
                    Ok(dest as i32 - (index as i32 + 1))
                } else {
                    Ok(dest as i32)
                }
            }
            Operand::Reg(_) | Operand::Mem { .. } => Err(mismatch(op.to_string())),
        }
    };

    let mut inst = Instruction::new(opcode, line);
    match (shape, ops.as_slice()) {
        (OperandShape::None, []) => {}
        (OperandShape::RdRsRt, &[Operand::Reg(d), Operand::Reg(s), Operand::Reg(t)]) => {
            inst.rd = d as i8;
            inst.rs = s as i8;
            inst.rt = t as i8;
        }
        (OperandShape::RdRsImm, &[Operand::Reg(d), Operand::Reg(s), Operand::Imm(v)]) => {
            inst.rd = d as i8;
            inst.rs = s as i8;
            inst.immediate = v;
        }
        (OperandShape::RdRsShamt, &[Operand::Reg(d), Operand::Reg(s), Operand::Imm(v)]) => {
            if !(0..=MAX_SHAMT).contains(&v) {
                return Err(ParseError::ShiftOutOfRange { line, amount: v });
            }
            inst.rd = d as i8;
            inst.rs = s as i8;
            inst.immediate = v;
        }
        (OperandShape::RsRtTarget, &[Operand::Reg(s), Operand::Reg(t), dest]) => {
            inst.rs = s as i8;
            inst.rt = t as i8;
            inst.immediate = target(dest)?;
        }
        (OperandShape::RsTarget, &[Operand::Reg(s), dest]) => {
            inst.rs = s as i8;
            inst.immediate = target(dest)?;
        }
        (OperandShape::Target, &[dest]) => {
            inst.immediate = target(dest)?;
        }
        (OperandShape::RdRs, &[Operand::Reg(d), Operand::Reg(s)]) => {
            inst.rd = d as i8;
            inst.rs = s as i8;
        }
        (OperandShape::Rs, &[Operand::Reg(s)]) => {
            inst.rs = s as i8;
        }
        (OperandShape::RdImm, &[Operand::Reg(d), Operand::Imm(v)]) => {
            inst.rd = d as i8;
            inst.immediate = v;
        }
        (OperandShape::RdMem, &[Operand::Reg(d), Operand::Mem { offset, base }]) => {
            inst.rd = d as i8;
            inst.rs = base as i8;
            inst.immediate = offset;
        }
        (OperandShape::RtMem, &[Operand::Reg(t), Operand::Mem { offset, base }]) => {
            inst.rt = t as i8;
            inst.rs = base as i8;
            inst.immediate = offset;
        }
        (_, ops) => {
            let found: Vec<String> = ops.iter().map(ToString::to_string).collect();
            return Err(mismatch(found.join(", ")));
        }
    }
    Ok(inst)
}
