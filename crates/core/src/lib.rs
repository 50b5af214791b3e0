//! MIPS-like assembly simulator library.
//!
//! This crate implements a step-capable simulator for a simplified MIPS-like
//! assembly language with the following:
//! 1. **Assembler front end:** Lexer and two-pass parser with label resolution.
//! 2. **ISA:** Opcode table, operand shapes, ABI register names, and disassembly.
//! 3. **Virtual machine:** Register file, byte-addressable memory, and the execute stage.
//! 4. **Simulation:** Run/step/pause control, source loading, and line mapping.
//! 5. **Statistics:** Retired-instruction counts and run timing.
//!
//! # Example
//!
//! ```
//! use mipsim_core::Simulator;
//!
//! let mut sim = Simulator::new("li $t0, 5\naddi $t1, $t0, 2\nprint $t1");
//! sim.run().unwrap();
//! assert_eq!(sim.outputs(), ["7"]);
//! assert!(!sim.is_running());
//! ```

/// Assembler front end (tokens, lexer, parser, label table).
pub mod asm;
/// Common types (error taxonomy, register file).
pub mod common;
/// Simulator configuration (defaults and JSON-deserializable structures).
pub mod config;
/// Instruction set (opcodes, operand shapes, decoded instructions, ABI, disassembly).
pub mod isa;
/// Source loading and the stepping simulator.
pub mod sim;
/// Execution statistics collection and reporting.
pub mod stats;
/// Virtual machine (memory, ALU, execute stage).
pub mod vm;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Top-level error type returned by `Simulator` operations.
pub use crate::common::error::SimError;
/// Decoded instruction record.
pub use crate::isa::instruction::Instruction;
/// Instruction opcode sum type.
pub use crate::isa::opcode::Opcode;
/// Stepping simulator; construct with `Simulator::new`.
pub use crate::sim::Simulator;
/// Virtual machine holding registers, memory, PC, and output log.
pub use crate::vm::VirtualMachine;
