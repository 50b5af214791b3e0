//! ALU logical and comparison operations.
//!
//! Implements bitwise AND, OR, XOR, NOR, and set-less-than (signed and
//! unsigned). Comparison results are always 0 or 1.

use super::AluOp;

/// Executes a logical or comparison operation.
///
/// # Arguments
///
/// * `op` - The ALU operation to perform (must be a logic/comparison variant).
/// * `a`  - First operand.
/// * `b`  - Second operand.
///
/// # Returns
///
/// The 32-bit result. Returns `0` for non-logic opcodes.
pub fn execute(op: AluOp, a: i32, b: i32) -> i32 {
    match op {
        AluOp::And => a & b,
        AluOp::Or => a | b,
        AluOp::Xor => a ^ b,
        AluOp::Nor => !(a | b),
        AluOp::Slt => (a < b) as i32,
        AluOp::Sltu => ((a as u32) < (b as u32)) as i32,
        _ => 0,
    }
}
