//! Simulation control and source loading.
//!
//! Provides the stepping [`Simulator`] and utilities for loading assembly
//! source from disk.

pub mod loader;
pub mod simulator;

pub use simulator::{ExecState, Simulator};
