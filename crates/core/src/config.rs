//! Configuration system for the simulator.
//!
//! This module defines the configuration structures used to parameterize a
//! simulation. It provides:
//! 1. **Defaults:** Baseline constants (memory size, initial stack pointer).
//! 2. **Structures:** `GeneralConfig` (tracing, step budget) and `MemoryConfig`.
//! 3. **Loading:** JSON deserialization from a string or a file.
//!
//! Every field is optional in JSON; missing fields take their defaults.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::common::error::{ConfigError, SimError};

/// Default configuration constants for the simulator.
mod defaults {
    /// Size of data memory in bytes (64 KiB).
    pub const MEMORY_SIZE: usize = 64 * 1024;

    /// Largest memory whose top address still fits the default `$sp`.
    pub const MAX_MEMORY_SIZE: usize = i32::MAX as usize;
}

/// Root configuration structure.
///
/// # Example (JSON)
///
/// ```
/// use mipsim_core::config::Config;
///
/// let json = r#"{
///     "general": { "trace_instructions": true, "max_steps": 1000 },
///     "memory": { "size_bytes": 4096 }
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert!(config.general.trace_instructions);
/// assert_eq!(config.general.max_steps, Some(1000));
/// assert_eq!(config.memory.size_bytes, 4096);
/// assert_eq!(config.memory.stack_pointer(), 4096);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// General simulation settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Data memory configuration.
    #[serde(default)]
    pub memory: MemoryConfig,
}

impl Config {
    /// Deserializes a configuration from JSON text and validates it.
    ///
    /// # Errors
    ///
    /// [`SimError::Config`] if the document is malformed,
    /// [`SimError::InvalidConfig`] if a value is out of range.
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the memory size and stack pointer describe a usable VM.
    ///
    /// Configurations built in code should be validated before they reach
    /// [`Simulator::with_config`](crate::Simulator::with_config), which
    /// allocates `memory.size_bytes` up front.
    ///
    /// # Errors
    ///
    /// [`ConfigError::MemoryTooLarge`] if `size_bytes` exceeds `i32::MAX`,
    /// [`ConfigError::StackPointerOutOfRange`] if `initial_sp` is negative or
    /// past the end of memory.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.memory.validate()
    }

    /// Reads and deserializes a JSON configuration file.
    ///
    /// # Errors
    ///
    /// [`SimError::Io`] if the file cannot be read, [`SimError::Config`] if
    /// it is malformed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| SimError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }
}

/// General simulation settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GeneralConfig {
    /// Log every executed instruction at `debug` level.
    #[serde(default)]
    pub trace_instructions: bool,

    /// Maximum instructions a single `run` may execute before failing with
    /// `StepLimitExceeded`. `None` means unbounded.
    #[serde(default)]
    pub max_steps: Option<u64>,
}

/// Data memory configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MemoryConfig {
    /// Size of the byte-addressable data memory.
    #[serde(default = "MemoryConfig::default_size_bytes")]
    pub size_bytes: usize,

    /// Initial `$sp`. Defaults to `size_bytes` (empty descending stack).
    #[serde(default)]
    pub initial_sp: Option<i32>,
}

impl MemoryConfig {
    /// Returns the default memory size.
    const fn default_size_bytes() -> usize {
        defaults::MEMORY_SIZE
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.size_bytes > defaults::MAX_MEMORY_SIZE {
            return Err(ConfigError::MemoryTooLarge {
                size: self.size_bytes,
                max: defaults::MAX_MEMORY_SIZE,
            });
        }
        if let Some(sp) = self.initial_sp
            && (sp < 0 || sp as usize > self.size_bytes)
        {
            return Err(ConfigError::StackPointerOutOfRange {
                sp,
                size: self.size_bytes,
            });
        }
        Ok(())
    }

    /// Initial stack pointer value.
    ///
    /// Saturates at `i32::MAX` for sizes that [`Config::validate`] rejects.
    pub fn stack_pointer(&self) -> i32 {
        self.initial_sp
            .unwrap_or_else(|| i32::try_from(self.size_bytes).unwrap_or(i32::MAX))
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            size_bytes: defaults::MEMORY_SIZE,
            initial_sp: None,
        }
    }
}
