//! Instruction Set Architecture (ISA) Definitions.
//!
//! Contains the opcode table, operand shapes, the decoded instruction record,
//! ABI register names, and the disassembler.

/// Application Binary Interface (ABI) register name mappings.
pub mod abi;

/// Instruction disassembler for listings and diagnostics.
pub mod disasm;

/// Decoded instruction record and the unused-register sentinel.
pub mod instruction;

/// Opcode table: codes, mnemonics, operand shapes, and classes.
pub mod opcode;

pub use instruction::{Instruction, NO_REG};
pub use opcode::{InstrClass, Opcode, OperandShape};
