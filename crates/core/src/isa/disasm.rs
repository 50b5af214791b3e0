//! Instruction Disassembler.
//!
//! Converts a decoded [`Instruction`] back into assembly text for listings,
//! debug tracing, and test diagnostics. The output uses ABI register names
//! and numeric branch/jump targets, and re-assembles to the same instruction.
//!
//! # Usage
//!
//! ```
//! use mipsim_core::isa::disasm::disassemble;
//! use mipsim_core::{Instruction, Opcode};
//!
//! let mut inst = Instruction::new(Opcode::Sll, 3);
//! inst.rd = 9;
//! inst.rs = 9;
//! inst.immediate = 4;
//! assert_eq!(disassemble(&inst), "sll $t1, $t1, 4");
//! ```

use crate::isa::abi;
use crate::isa::instruction::Instruction;
use crate::isa::opcode::OperandShape;

/// Returns `$name` for a register field, or `$??` when it is out of range.
#[inline]
fn reg(idx: i8) -> String {
    let name = usize::try_from(idx).map_or("??", abi::name);
    format!("${name}")
}

/// Disassembles an instruction into `mnemonic operands` text.
///
/// The label attached to the instruction is not included; see the
/// `Display` impl on [`Instruction`] for the labelled form.
pub fn disassemble(inst: &Instruction) -> String {
    let mn = inst.opcode.mnemonic();
    let (rd, rs, rt, imm) = (inst.rd, inst.rs, inst.rt, inst.immediate);

    match inst.shape() {
        OperandShape::None => mn.to_string(),

        // ── Register / immediate arithmetic ───────────────
        OperandShape::RdRsRt => format!("{mn} {}, {}, {}", reg(rd), reg(rs), reg(rt)),
        OperandShape::RdRsImm | OperandShape::RdRsShamt => {
            format!("{mn} {}, {}, {imm}", reg(rd), reg(rs))
        }
        OperandShape::RdRs => format!("{mn} {}, {}", reg(rd), reg(rs)),
        OperandShape::Rs => format!("{mn} {}", reg(rs)),
        OperandShape::RdImm => format!("{mn} {}, {imm}", reg(rd)),

        // ── Control flow ──────────────────────────────────
        OperandShape::RsRtTarget => format!("{mn} {}, {}, {imm}", reg(rs), reg(rt)),
        OperandShape::RsTarget => format!("{mn} {}, {imm}", reg(rs)),
        OperandShape::Target => format!("{mn} {imm}"),

        // ── Memory ────────────────────────────────────────
        OperandShape::RdMem => format!("{mn} {}, {imm}({})", reg(rd), reg(rs)),
        OperandShape::RtMem => format!("{mn} {}, {imm}({})", reg(rt), reg(rs)),
    }
}
