//! Arithmetic Logic Unit (ALU).
//!
//! This module implements the integer ALU used by the execute stage. All
//! operands and results are signed 32-bit values.
//!
//! Operations are organized into submodules by category:
//! - [`arithmetic`]: Add, Sub, Mul, Div, Divu
//! - [`logic`]:      And, Or, Xor, Nor, Slt, Sltu
//! - [`shifts`]:     Sll, Srl, Sra

/// Integer arithmetic operations (add, subtract, multiply, divide).
pub mod arithmetic;

/// Bitwise logical and comparison operations (and, or, xor, nor, slt).
pub mod logic;

/// Shift operations (sll, srl, sra).
pub mod shifts;

/// ALU operation selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AluOp {
    /// Wrapping addition.
    Add,
    /// Wrapping subtraction.
    Sub,
    /// Wrapping multiplication (low 32 bits).
    Mul,
    /// Signed truncating division.
    Div,
    /// Unsigned division.
    Divu,
    /// Bitwise AND.
    And,
    /// Bitwise OR.
    Or,
    /// Bitwise XOR.
    Xor,
    /// Bitwise NOR.
    Nor,
    /// Signed set-less-than.
    Slt,
    /// Unsigned set-less-than.
    Sltu,
    /// Shift left logical.
    Sll,
    /// Shift right logical.
    Srl,
    /// Shift right arithmetic.
    Sra,
}

/// Arithmetic Logic Unit for integer operations.
#[derive(Debug)]
pub struct Alu;

impl Alu {
    /// Executes an integer ALU operation.
    ///
    /// Dispatches to the appropriate submodule based on the operation type.
    ///
    /// # Arguments
    ///
    /// * `op` - The ALU operation to perform
    /// * `a`  - First operand
    /// * `b`  - Second operand (also used as shift amount)
    ///
    /// # Returns
    ///
    /// The result, or `None` when a division has a zero divisor.
    ///
    /// # Examples
    ///
    /// ```
    /// use mipsim_core::vm::alu::{Alu, AluOp};
    ///
    /// assert_eq!(Alu::execute(AluOp::Add, i32::MAX, 1), Some(i32::MIN));
    /// assert_eq!(Alu::execute(AluOp::Sll, 1, 4), Some(0x10));
    /// assert_eq!(Alu::execute(AluOp::Slt, -5, 10), Some(1));
    /// assert_eq!(Alu::execute(AluOp::Divu, -1, 2), Some(i32::MAX));
    /// assert_eq!(Alu::execute(AluOp::Div, 7, 0), None);
    /// ```
    pub fn execute(op: AluOp, a: i32, b: i32) -> Option<i32> {
        match op {
            AluOp::Add | AluOp::Sub | AluOp::Mul | AluOp::Div | AluOp::Divu => {
                arithmetic::execute(op, a, b)
            }
            AluOp::And | AluOp::Or | AluOp::Xor | AluOp::Nor | AluOp::Slt | AluOp::Sltu => {
                Some(logic::execute(op, a, b))
            }
            AluOp::Sll | AluOp::Srl | AluOp::Sra => Some(shifts::execute(op, a, b)),
        }
    }
}
