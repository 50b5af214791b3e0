//! Common types shared across the simulator.
//!
//! This module provides the building blocks used by every layer. It includes:
//! 1. **Error Handling:** Lex, parse, execution, and top-level simulator errors.
//! 2. **Register Management:** The 32-entry integer register file.

/// Error types for every pipeline stage.
pub mod error;

/// Register file implementation.
pub mod reg;

pub use error::{ConfigError, ExecutionError, LexError, ParseError, SimError, UnknownOpcode};
pub use reg::{NUM_REGS, RegisterFile};
