//! General-Purpose Register File.
//!
//! This module provides the `RegisterFile` struct holding the 32 integer
//! registers of the virtual machine. It performs the following:
//! 1. **Storage:** Maintains 32 signed 32-bit registers (`$0`-`$31`).
//! 2. **Invariant Enforcement:** Register `$0` is hardwired to zero; writes are discarded.
//! 3. **Observability:** Dumps the register state using ABI names.

use std::fmt;

use crate::isa::abi;

/// Number of architectural integer registers.
pub const NUM_REGS: usize = 32;

/// General-purpose register file.
///
/// Register `$zero` always reads as 0 and cannot be modified.
#[derive(Clone, PartialEq, Eq)]
pub struct RegisterFile {
    regs: [i32; NUM_REGS],
}

impl RegisterFile {
    /// Creates a new register file with all registers initialized to zero.
    pub const fn new() -> Self {
        Self {
            regs: [0; NUM_REGS],
        }
    }

    /// Reads a register.
    ///
    /// # Arguments
    ///
    /// * `idx` - Register index (0-31). Register `$zero` always returns 0.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is 32 or greater; callers validate indices first.
    pub const fn read(&self, idx: usize) -> i32 {
        if idx == abi::REG_ZERO { 0 } else { self.regs[idx] }
    }

    /// Writes a register. Writes to `$zero` are ignored.
    ///
    /// # Arguments
    ///
    /// * `idx` - Register index (0-31).
    /// * `val` - The value to write.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is 32 or greater; callers validate indices first.
    pub const fn write(&mut self, idx: usize, val: i32) {
        if idx != abi::REG_ZERO {
            self.regs[idx] = val;
        }
    }

    /// Dumps the register file to stdout, four registers per row.
    pub fn dump(&self) {
        print!("{self}");
    }
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RegisterFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..NUM_REGS).step_by(4) {
            for idx in row..row + 4 {
                let name = format!("${}", abi::name(idx));
                write!(f, "{name:<6}={:>12}  ", self.read(idx))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Debug for RegisterFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.regs
                    .iter()
                    .enumerate()
                    .filter(|&(_, &v)| v != 0)
                    .map(|(i, v)| (abi::name(i), v)),
            )
            .finish()
    }
}
