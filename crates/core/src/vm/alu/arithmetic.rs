//! ALU arithmetic operations.
//!
//! Implements 32-bit addition, subtraction, multiplication, and signed and
//! unsigned division. Overflow wraps; there are no overflow traps.

use super::AluOp;

/// Executes an integer arithmetic operation.
///
/// # Arguments
///
/// * `op` - The ALU operation to perform (must be an arithmetic variant).
/// * `a`  - First operand.
/// * `b`  - Second operand.
///
/// # Returns
///
/// The result, or `None` for division by zero. `i32::MIN / -1` wraps to
/// `i32::MIN`. Returns `Some(0)` for non-arithmetic opcodes.
pub fn execute(op: AluOp, a: i32, b: i32) -> Option<i32> {
    match op {
        AluOp::Add => Some(a.wrapping_add(b)),
        AluOp::Sub => Some(a.wrapping_sub(b)),
        AluOp::Mul => Some(a.wrapping_mul(b)),
        AluOp::Div => {
            if b == 0 {
                None
            } else {
                Some(a.wrapping_div(b))
            }
        }
        AluOp::Divu => (a as u32).checked_div(b as u32).map(|q| q as i32),
        _ => Some(0),
    }
}
