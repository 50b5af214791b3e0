//! Execute Stage.
//!
//! This module implements single-instruction execution. It performs:
//! 1. **Fetch:** Reads the instruction at the program counter from the borrowed program.
//! 2. **Operand Read:** Validates register fields and reads source registers.
//! 3. **Dispatch:** Applies the opcode's semantics to registers, memory, or the output log.
//! 4. **PC Update:** Advances by one, or redirects for taken branches and jumps.
//!
//! Every fault is detected before any state is written, so a failed
//! instruction leaves the machine exactly as it found it.

use tracing::debug;

use super::memory::{AccessFault, WORD_BYTES};
use super::{PAUSE_MESSAGE, VirtualMachine};
use crate::common::error::ExecutionError;
use crate::common::reg::NUM_REGS;
use crate::isa::abi;
use crate::isa::instruction::Instruction;
use crate::isa::opcode::Opcode;
use crate::vm::alu::{Alu, AluOp};

/// Bits `lui` shifts its immediate left by.
const LUI_SHIFT: u32 = 16;

/// Result of executing one instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Execution may continue.
    Continue,
    /// A `break` executed; the driving loop should pause.
    Break,
}

impl VirtualMachine {
    /// Executes the instruction at the program counter.
    ///
    /// # Errors
    ///
    /// Returns an [`ExecutionError`] if the program counter is out of range or
    /// the instruction faults. The machine state is unchanged in that case.
    pub fn run_instruction(&mut self, program: &[Instruction]) -> Result<Outcome, ExecutionError> {
        let pc = self.pc;
        let inst = program.get(pc).ok_or(ExecutionError::PcOutOfRange {
            pc,
            len: program.len(),
        })?;
        if self.trace {
            debug!(pc, line = inst.line_number, "{inst}");
        }

        let mut next_pc = pc + 1;
        let mut outcome = Outcome::Continue;
        let mut taken = false;

        match inst.opcode {
            Opcode::Nop => {}

            Opcode::Break => {
                self.outputs.push(PAUSE_MESSAGE.to_string());
                self.stats.breakpoints += 1;
                outcome = Outcome::Break;
            }

            // ── Register-register ALU ─────────────────────────
            Opcode::Add | Opcode::Addu => self.alu_reg(inst, AluOp::Add)?,
            Opcode::Sub | Opcode::Subu => self.alu_reg(inst, AluOp::Sub)?,
            Opcode::Mul => self.alu_reg(inst, AluOp::Mul)?,
            Opcode::Div => self.alu_reg(inst, AluOp::Div)?,
            Opcode::Divu => self.alu_reg(inst, AluOp::Divu)?,
            Opcode::And => self.alu_reg(inst, AluOp::And)?,
            Opcode::Or => self.alu_reg(inst, AluOp::Or)?,
            Opcode::Xor => self.alu_reg(inst, AluOp::Xor)?,
            Opcode::Nor => self.alu_reg(inst, AluOp::Nor)?,
            Opcode::Slt => self.alu_reg(inst, AluOp::Slt)?,
            Opcode::Sltu => self.alu_reg(inst, AluOp::Sltu)?,
            Opcode::Sllv => self.alu_reg(inst, AluOp::Sll)?,
            Opcode::Srlv => self.alu_reg(inst, AluOp::Srl)?,
            Opcode::Srav => self.alu_reg(inst, AluOp::Sra)?,

            // ── Register-immediate ALU and constant shifts ────
            Opcode::Addi | Opcode::Addiu => self.alu_imm(inst, AluOp::Add)?,
            Opcode::Andi => self.alu_imm(inst, AluOp::And)?,
            Opcode::Ori => self.alu_imm(inst, AluOp::Or)?,
            Opcode::Xori => self.alu_imm(inst, AluOp::Xor)?,
            Opcode::Slti => self.alu_imm(inst, AluOp::Slt)?,
            Opcode::Sll => self.alu_imm(inst, AluOp::Sll)?,
            Opcode::Srl => self.alu_imm(inst, AluOp::Srl)?,
            Opcode::Sra => self.alu_imm(inst, AluOp::Sra)?,

            Opcode::Lui => {
                let rd = reg_index(inst, inst.rd)?;
                self.regs.write(rd, inst.immediate.wrapping_shl(LUI_SHIFT));
            }
            Opcode::Li => {
                let rd = reg_index(inst, inst.rd)?;
                self.regs.write(rd, inst.immediate);
            }
            Opcode::Move => {
                let rd = reg_index(inst, inst.rd)?;
                let val = self.read(inst, inst.rs)?;
                self.regs.write(rd, val);
            }

            // ── Branches ──────────────────────────────────────
            Opcode::Beq | Opcode::Bne => {
                let a = self.read(inst, inst.rs)?;
                let b = self.read(inst, inst.rt)?;
                taken = (a == b) == (inst.opcode == Opcode::Beq);
                if taken {
                    next_pc = jump_target(inst, inst.target(pc))?;
                }
            }
            Opcode::Bgez | Opcode::Bgtz | Opcode::Blez | Opcode::Bltz => {
                let a = self.read(inst, inst.rs)?;
                taken = match inst.opcode {
                    Opcode::Bgez => a >= 0,
                    Opcode::Bgtz => a > 0,
                    Opcode::Blez => a <= 0,
                    _ => a < 0,
                };
                if taken {
                    next_pc = jump_target(inst, inst.target(pc))?;
                }
            }

            // ── Jumps ─────────────────────────────────────────
            Opcode::J => {
                next_pc = jump_target(inst, inst.target(pc))?;
            }
            Opcode::Jal => {
                next_pc = jump_target(inst, inst.target(pc))?;
                self.regs.write(abi::REG_RA, link(pc));
            }
            Opcode::Jr => {
                let dest = self.read(inst, inst.rs)?;
                next_pc = jump_target(inst, Some(i64::from(dest)))?;
            }
            Opcode::Jalr => {
                let rd = reg_index(inst, inst.rd)?;
                let dest = self.read(inst, inst.rs)?;
                next_pc = jump_target(inst, Some(i64::from(dest)))?;
                self.regs.write(rd, link(pc));
            }

            // ── Loads ─────────────────────────────────────────
            Opcode::Lw | Opcode::Lb | Opcode::Lbu => {
                let rd = reg_index(inst, inst.rd)?;
                let addr = self.effective_address(inst)?;
                let limit = self.memory.len();
                let val = match inst.opcode {
                    Opcode::Lw => self
                        .memory
                        .read_word(addr)
                        .map_err(|f| fault(inst, f, addr, WORD_BYTES, limit))?,
                    Opcode::Lb => self
                        .memory
                        .read_u8(addr)
                        .map(|b| i32::from(b as i8))
                        .map_err(|f| fault(inst, f, addr, 1, limit))?,
                    _ => self
                        .memory
                        .read_u8(addr)
                        .map(i32::from)
                        .map_err(|f| fault(inst, f, addr, 1, limit))?,
                };
                self.regs.write(rd, val);
            }

            // ── Stores ────────────────────────────────────────
            Opcode::Sw | Opcode::Sb => {
                let val = self.read(inst, inst.rt)?;
                let addr = self.effective_address(inst)?;
                let limit = self.memory.len();
                if inst.opcode == Opcode::Sw {
                    self.memory
                        .write_word(addr, val)
                        .map_err(|f| fault(inst, f, addr, WORD_BYTES, limit))?;
                } else {
                    self.memory
                        .write_u8(addr, val as u8)
                        .map_err(|f| fault(inst, f, addr, 1, limit))?;
                }
            }

            Opcode::Print => {
                let val = self.read(inst, inst.rs)?;
                self.outputs.push(val.to_string());
            }
        }

        self.pc = next_pc;
        self.stats.record(inst.opcode.class(), taken);
        Ok(outcome)
    }

    /// `rd = rs <op> rt`
    fn alu_reg(&mut self, inst: &Instruction, op: AluOp) -> Result<(), ExecutionError> {
        let rd = reg_index(inst, inst.rd)?;
        let a = self.read(inst, inst.rs)?;
        let b = self.read(inst, inst.rt)?;
        self.regs.write(rd, alu(inst, op, a, b)?);
        Ok(())
    }

    /// `rd = rs <op> immediate`
    fn alu_imm(&mut self, inst: &Instruction, op: AluOp) -> Result<(), ExecutionError> {
        let rd = reg_index(inst, inst.rd)?;
        let a = self.read(inst, inst.rs)?;
        self.regs.write(rd, alu(inst, op, a, inst.immediate)?);
        Ok(())
    }

    /// Reads the register named by `field`, validating the index.
    fn read(&self, inst: &Instruction, field: i8) -> Result<i32, ExecutionError> {
        Ok(self.regs.read(reg_index(inst, field)?))
    }

    /// `rs + immediate` as a signed 64-bit address.
    fn effective_address(&self, inst: &Instruction) -> Result<i64, ExecutionError> {
        let base = self.read(inst, inst.rs)?;
        Ok(i64::from(base) + i64::from(inst.immediate))
    }
}

/// Validates a register field and converts it to an index.
fn reg_index(inst: &Instruction, field: i8) -> Result<usize, ExecutionError> {
    usize::try_from(field)
        .ok()
        .filter(|&idx| idx < NUM_REGS)
        .ok_or(ExecutionError::InvalidRegister {
            line: inst.line_number,
            mnemonic: inst.opcode.mnemonic(),
            index: field,
        })
}

/// Runs `op`, mapping a zero divisor to an error.
fn alu(inst: &Instruction, op: AluOp, a: i32, b: i32) -> Result<i32, ExecutionError> {
    Alu::execute(op, a, b).ok_or(ExecutionError::DivisionByZero {
        line: inst.line_number,
    })
}

/// Converts a computed target into a program counter value.
fn jump_target(inst: &Instruction, target: Option<i64>) -> Result<usize, ExecutionError> {
    let target = target.unwrap_or_default();
    usize::try_from(target).map_err(|_| ExecutionError::InvalidJumpTarget {
        line: inst.line_number,
        target,
    })
}

/// Return address stored by `jal`/`jalr`.
#[inline]
const fn link(pc: usize) -> i32 {
    (pc + 1) as i32
}

/// Maps a memory fault to an execution error for `inst`.
const fn fault(
    inst: &Instruction,
    fault: AccessFault,
    addr: i64,
    size: usize,
    limit: usize,
) -> ExecutionError {
    match fault {
        AccessFault::OutOfBounds => ExecutionError::MemoryOutOfBounds {
            line: inst.line_number,
            addr,
            size,
            limit,
        },
        AccessFault::Misaligned => ExecutionError::MisalignedAccess {
            line: inst.line_number,
            addr,
            size,
        },
    }
}
