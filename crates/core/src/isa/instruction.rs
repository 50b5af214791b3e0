//! Decoded instruction records.
//!
//! An [`Instruction`] is what the parser emits and the virtual machine
//! executes. Its position in the program is its address. Register slots the
//! opcode does not use hold [`NO_REG`] rather than 0, so `$zero` and "unused"
//! are never confused.

use std::fmt;

use crate::isa::opcode::{Opcode, OperandShape};
use crate::isa::disasm;

/// Sentinel stored in `rd`/`rs`/`rt` when the opcode does not use the slot.
pub const NO_REG: i8 = -1;

/// A decoded instruction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Instruction {
    /// Operation to perform.
    pub opcode: Opcode,
    /// Destination register, or [`NO_REG`].
    pub rd: i8,
    /// First source register (or memory base), or [`NO_REG`].
    pub rs: i8,
    /// Second source register (or store value), or [`NO_REG`].
    pub rt: i8,
    /// Immediate, shift amount, branch offset, jump index, or memory offset.
    /// Zero when unused.
    pub immediate: i32,
    /// 1-based source line the instruction came from.
    pub line_number: usize,
    /// Label declared at this instruction's address, if any.
    pub label: Option<String>,
}

impl Instruction {
    /// Creates an instruction with every register slot unused.
    pub const fn new(opcode: Opcode, line_number: usize) -> Self {
        Self {
            opcode,
            rd: NO_REG,
            rs: NO_REG,
            rt: NO_REG,
            immediate: 0,
            line_number,
            label: None,
        }
    }

    /// Operand shape of the opcode.
    #[inline]
    pub const fn shape(&self) -> OperandShape {
        self.opcode.shape()
    }

    /// Absolute target of a branch or direct jump at address `pc`.
    ///
    /// Branch immediates are offsets from `pc + 1`; `j`/`jal` immediates are
    /// absolute indices. Returns `None` for every other opcode.
    pub fn target(&self, pc: usize) -> Option<i64> {
        match self.shape() {
            OperandShape::RsRtTarget | OperandShape::RsTarget => {
                Some(pc as i64 + 1 + i64::from(self.immediate))
            }
            OperandShape::Target => Some(i64::from(self.immediate)),
            _ => None,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(label) = &self.label {
            write!(f, "{label}: ")?;
        }
        f.write_str(&disasm::disassemble(self))
    }
}
