//! Data memory.
//!
//! A flat, zero-initialized, little-endian byte array. Addresses are signed
//! effective addresses (`base + offset`); anything negative or past the end
//! faults. Word accesses must be 4-byte aligned.

use std::fmt;

/// Bytes in a word.
pub const WORD_BYTES: usize = 4;

/// Why a memory access was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessFault {
    /// The access falls outside the array.
    OutOfBounds,
    /// A word access at an address that is not a multiple of 4.
    Misaligned,
}

/// Byte-addressable data memory.
#[derive(Clone, PartialEq, Eq)]
pub struct Memory {
    bytes: Vec<u8>,
}

impl Memory {
    /// Creates `size` bytes of zeroed memory.
    pub fn new(size: usize) -> Self {
        Self {
            bytes: vec![0; size],
        }
    }

    /// Size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the memory has zero size.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Raw contents.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Validates an access of `size` bytes at `addr` and returns its start index.
    fn check(&self, addr: i64, size: usize) -> Result<usize, AccessFault> {
        let start = usize::try_from(addr).map_err(|_| AccessFault::OutOfBounds)?;
        if start.checked_add(size).is_none_or(|end| end > self.bytes.len()) {
            return Err(AccessFault::OutOfBounds);
        }
        if size > 1 && start % size != 0 {
            return Err(AccessFault::Misaligned);
        }
        Ok(start)
    }

    /// Reads one byte.
    ///
    /// # Errors
    ///
    /// [`AccessFault::OutOfBounds`] if `addr` is outside the array.
    pub fn read_u8(&self, addr: i64) -> Result<u8, AccessFault> {
        let i = self.check(addr, 1)?;
        Ok(self.bytes[i])
    }

    /// Writes one byte.
    ///
    /// # Errors
    ///
    /// [`AccessFault::OutOfBounds`] if `addr` is outside the array.
    pub fn write_u8(&mut self, addr: i64, val: u8) -> Result<(), AccessFault> {
        let i = self.check(addr, 1)?;
        self.bytes[i] = val;
        Ok(())
    }

    /// Reads an aligned little-endian word.
    ///
    /// # Errors
    ///
    /// [`AccessFault`] if the access is out of bounds or misaligned.
    pub fn read_word(&self, addr: i64) -> Result<i32, AccessFault> {
        let i = self.check(addr, WORD_BYTES)?;
        let mut word = [0; WORD_BYTES];
        word.copy_from_slice(&self.bytes[i..i + WORD_BYTES]);
        Ok(i32::from_le_bytes(word))
    }

    /// Writes an aligned little-endian word.
    ///
    /// # Errors
    ///
    /// [`AccessFault`] if the access is out of bounds or misaligned.
    pub fn write_word(&mut self, addr: i64, val: i32) -> Result<(), AccessFault> {
        let i = self.check(addr, WORD_BYTES)?;
        self.bytes[i..i + WORD_BYTES].copy_from_slice(&val.to_le_bytes());
        Ok(())
    }
}

impl fmt::Debug for Memory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let used = self.bytes.iter().filter(|&&b| b != 0).count();
        f.debug_struct("Memory")
            .field("size", &self.bytes.len())
            .field("nonzero_bytes", &used)
            .finish()
    }
}
