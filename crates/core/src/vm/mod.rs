//! Virtual Machine Definition.
//!
//! This module defines the `VirtualMachine` structure, the single owner of all
//! mutable machine state. It coordinates the following:
//! 1. **State Management:** Register file, program counter, and data memory.
//! 2. **Execution:** One instruction at a time via [`VirtualMachine::run_instruction`].
//! 3. **Output:** An ordered log of strings produced by `print` and `break`.
//! 4. **Statistics:** Retired-instruction counts by class.
//!
//! The VM never owns or mutates the program; it reads instructions through a
//! borrowed slice supplied on every call.

/// Integer ALU.
pub mod alu;

/// Instruction dispatch and semantics.
pub mod execute;

/// Byte-addressable data memory.
pub mod memory;

pub use execute::Outcome;
pub use memory::Memory;

use crate::common::RegisterFile;
use crate::config::Config;
use crate::isa::abi;
use crate::stats::ExecStats;

/// Output log entry appended when a `break` instruction executes.
pub const PAUSE_MESSAGE: &str = "Execution paused";

/// Machine state: registers, program counter, memory, and output log.
#[derive(Debug, Clone)]
pub struct VirtualMachine {
    regs: RegisterFile,
    pc: usize,
    memory: Memory,
    outputs: Vec<String>,
    trace: bool,
    stats: ExecStats,
}

impl VirtualMachine {
    /// Creates a VM in its reset state for the given configuration.
    ///
    /// All registers are zero except `$sp`, which holds the configured
    /// initial stack pointer.
    pub fn new(config: &Config) -> Self {
        let mut regs = RegisterFile::new();
        regs.write(abi::REG_SP, config.memory.stack_pointer());
        Self {
            regs,
            pc: 0,
            memory: Memory::new(config.memory.size_bytes),
            outputs: Vec::new(),
            trace: config.general.trace_instructions,
            stats: ExecStats::default(),
        }
    }

    /// Program counter (index of the next instruction).
    #[inline]
    pub const fn pc(&self) -> usize {
        self.pc
    }

    /// Register file.
    #[inline]
    pub const fn regs(&self) -> &RegisterFile {
        &self.regs
    }

    /// Reads register `idx` (0-31).
    ///
    /// # Panics
    ///
    /// Panics if `idx` is 32 or greater.
    #[inline]
    pub const fn reg(&self, idx: usize) -> i32 {
        self.regs.read(idx)
    }

    /// Writes register `idx` (0-31). Writes to `$zero` are discarded.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is 32 or greater.
    pub const fn set_reg(&mut self, idx: usize, val: i32) {
        self.regs.write(idx, val);
    }

    /// Data memory.
    pub const fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Output log in production order.
    pub fn outputs(&self) -> &[String] {
        &self.outputs
    }

    /// Empties the output log.
    pub fn clear_outputs(&mut self) {
        self.outputs.clear();
    }

    /// Execution statistics.
    pub const fn stats(&self) -> &ExecStats {
        &self.stats
    }

    /// Mutable execution statistics.
    pub const fn stats_mut(&mut self) -> &mut ExecStats {
        &mut self.stats
    }

    /// Dumps the program counter and register file to stdout.
    pub fn dump_state(&self) {
        println!("pc = {}", self.pc);
        self.regs.dump();
    }
}
