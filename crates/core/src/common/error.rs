//! Error taxonomy for the simulator.
//!
//! This module defines the error types for every layer of the pipeline. It provides:
//! 1. **Lexing:** `LexError` for unrecognized characters, registers, and integers.
//! 2. **Parsing:** `ParseError` for unknown mnemonics, shape mismatches, and labels.
//! 3. **Execution:** `ExecutionError` for runtime faults raised by the virtual machine.
//! 4. **Top level:** `SimError` aggregating the above plus I/O and configuration failures.
//!
//! Every variant carries the source line (or program counter) needed to locate
//! the fault in the assembly text.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Lexical errors. Lexing stops at the first one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    /// A character sequence that does not start any known token.
    #[error("line {line}: unrecognized token `{text}`")]
    UnrecognizedToken {
        /// 1-based source line.
        line: usize,
        /// The offending text.
        text: String,
    },

    /// A `$`-prefixed name that is neither an ABI name nor `$0`..`$31`.
    #[error("line {line}: unknown register `{text}`")]
    UnknownRegister {
        /// 1-based source line.
        line: usize,
        /// The offending text, including the `$`.
        text: String,
    },

    /// An integer literal that does not fit in 32 bits.
    #[error("line {line}: integer `{text}` does not fit in 32 bits")]
    IntegerOutOfRange {
        /// 1-based source line.
        line: usize,
        /// The offending literal.
        text: String,
    },
}

impl LexError {
    /// Returns the source line the error was raised on.
    pub const fn line(&self) -> usize {
        match self {
            Self::UnrecognizedToken { line, .. }
            | Self::UnknownRegister { line, .. }
            | Self::IntegerOutOfRange { line, .. } => *line,
        }
    }
}

/// Parse errors. Parsing is all-or-nothing: no partial program is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The mnemonic is not in the opcode table.
    #[error("line {line}: unknown mnemonic `{mnemonic}`")]
    UnknownMnemonic {
        /// 1-based source line.
        line: usize,
        /// The unrecognized mnemonic.
        mnemonic: String,
    },

    /// Operands do not match the shape the mnemonic expects.
    #[error("line {line}: `{mnemonic}` expects `{expected}`, found `{found}`")]
    OperandMismatch {
        /// 1-based source line.
        line: usize,
        /// The instruction mnemonic.
        mnemonic: String,
        /// Operand template for the mnemonic, e.g. `$rd, $rs, $rt`.
        expected: &'static str,
        /// The operands actually supplied.
        found: String,
    },

    /// A label operand with no matching declaration.
    #[error("line {line}: unresolved label `{label}`")]
    UnresolvedLabel {
        /// 1-based source line of the reference.
        line: usize,
        /// The referenced label name.
        label: String,
    },

    /// A label declared more than once.
    #[error("line {line}: label `{label}` already declared on line {first}")]
    DuplicateLabel {
        /// 1-based source line of the second declaration.
        line: usize,
        /// The label name.
        label: String,
        /// Line of the first declaration.
        first: usize,
    },

    /// An operand appeared where a mnemonic or label was expected.
    #[error("line {line}: expected a mnemonic, found `{found}`")]
    ExpectedMnemonic {
        /// 1-based source line.
        line: usize,
        /// The token found instead.
        found: String,
    },

    /// A constant shift amount outside 0..=31.
    #[error("line {line}: shift amount {amount} is outside 0..=31")]
    ShiftOutOfRange {
        /// 1-based source line.
        line: usize,
        /// The rejected amount.
        amount: i32,
    },
}

impl ParseError {
    /// Returns the source line the error was raised on.
    pub const fn line(&self) -> usize {
        match self {
            Self::UnknownMnemonic { line, .. }
            | Self::OperandMismatch { line, .. }
            | Self::UnresolvedLabel { line, .. }
            | Self::DuplicateLabel { line, .. }
            | Self::ExpectedMnemonic { line, .. }
            | Self::ShiftOutOfRange { line, .. } => *line,
        }
    }
}

/// Runtime faults raised while executing a single instruction.
///
/// When one of these is returned, the instruction that raised it has had no
/// effect and the program counter still points at it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    /// Integer division with a zero divisor.
    #[error("line {line}: division by zero")]
    DivisionByZero {
        /// Source line of the faulting instruction.
        line: usize,
    },

    /// Effective address outside the memory array.
    #[error("line {line}: {size}-byte access at address {addr} is out of bounds (memory is {limit} bytes)")]
    MemoryOutOfBounds {
        /// Source line of the faulting instruction.
        line: usize,
        /// Effective address (may be negative).
        addr: i64,
        /// Access width in bytes.
        size: usize,
        /// Memory size in bytes.
        limit: usize,
    },

    /// Word access at an address that is not a multiple of 4.
    #[error("line {line}: misaligned {size}-byte access at address {addr}")]
    MisalignedAccess {
        /// Source line of the faulting instruction.
        line: usize,
        /// Effective address.
        addr: i64,
        /// Access width in bytes.
        size: usize,
    },

    /// A register field outside 0..=31 in an operand slot the opcode uses.
    #[error("line {line}: register index {index} is invalid for `{mnemonic}`")]
    InvalidRegister {
        /// Source line of the faulting instruction.
        line: usize,
        /// The instruction mnemonic.
        mnemonic: &'static str,
        /// The raw register field.
        index: i8,
    },

    /// A jump or branch whose target lies before the start of the program.
    #[error("line {line}: jump target {target} is before the start of the program")]
    InvalidJumpTarget {
        /// Source line of the faulting instruction.
        line: usize,
        /// The computed target.
        target: i64,
    },

    /// The program counter does not address an instruction.
    #[error("program counter {pc} is outside the program ({len} instructions)")]
    PcOutOfRange {
        /// Current program counter.
        pc: usize,
        /// Number of instructions in the program.
        len: usize,
    },

    /// The configured per-run instruction budget ran out.
    #[error("step limit of {limit} instructions exceeded at line {line}")]
    StepLimitExceeded {
        /// Configured budget.
        limit: u64,
        /// Line of the next instruction that would have executed.
        line: usize,
    },
}

/// An integer that does not name any opcode in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown opcode {0}")]
pub struct UnknownOpcode(pub u8);

/// A configuration that deserialized but cannot describe a simulator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Memory larger than any effective address can reach.
    #[error("memory.size_bytes {size} exceeds the maximum of {max} bytes")]
    MemoryTooLarge {
        /// Requested size in bytes.
        size: usize,
        /// Largest accepted size.
        max: usize,
    },

    /// An initial stack pointer outside the memory array.
    #[error("memory.initial_sp {sp} is outside memory of {size} bytes")]
    StackPointerOutOfRange {
        /// Requested stack pointer.
        sp: i32,
        /// Memory size in bytes.
        size: usize,
    },
}

/// Top-level error for simulator operations.
#[derive(Debug, Error)]
pub enum SimError {
    /// Lexing the current source failed.
    #[error("lex error: {0}")]
    Lex(#[from] LexError),

    /// Parsing the current source failed.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// The virtual machine raised a runtime fault.
    #[error("execution error: {0}")]
    Execution(#[from] ExecutionError),

    /// A source or configuration file could not be read.
    #[error("could not read `{}`: {source}", .path.display())]
    Io {
        /// The path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A configuration document could not be deserialized.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// A configuration document held values outside their accepted range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}

impl SimError {
    /// Returns the source line associated with the error, if any.
    pub const fn line(&self) -> Option<usize> {
        match self {
            Self::Lex(e) => Some(e.line()),
            Self::Parse(e) => Some(e.line()),
            Self::Execution(
                ExecutionError::DivisionByZero { line }
                | ExecutionError::MemoryOutOfBounds { line, .. }
                | ExecutionError::MisalignedAccess { line, .. }
                | ExecutionError::InvalidRegister { line, .. }
                | ExecutionError::InvalidJumpTarget { line, .. }
                | ExecutionError::StepLimitExceeded { line, .. },
            ) => Some(*line),
            Self::Execution(ExecutionError::PcOutOfRange { .. })
            | Self::Io { .. }
            | Self::Config(_)
            | Self::InvalidConfig(_) => None,
        }
    }
}
