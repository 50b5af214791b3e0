//! MIPS Application Binary Interface (ABI) register names.
//!
//! Defines the conventional symbolic register names, their fixed indices,
//! and lookups in both directions. Names are written without the `$` sigil.

/// Register $0 (constant zero).
pub const REG_ZERO: usize = 0;
/// Register $29 (stack pointer, sp).
pub const REG_SP: usize = 29;
/// Register $30 (frame pointer, fp).
pub const REG_FP: usize = 30;
/// Register $31 (return address, ra).
pub const REG_RA: usize = 31;

/// ABI register names for $0–$31.
pub const REG_NAMES: [&str; 32] = [
    "zero", "at", "v0", "v1", "a0", "a1", "a2", "a3", "t0", "t1", "t2", "t3", "t4", "t5", "t6",
    "t7", "s0", "s1", "s2", "s3", "s4", "s5", "s6", "s7", "t8", "t9", "k0", "k1", "gp", "sp",
    "fp", "ra",
];

/// Returns the ABI name for a register index, or `"??"` when out of range.
#[inline]
pub fn name(idx: usize) -> &'static str {
    REG_NAMES.get(idx).copied().unwrap_or("??")
}

/// Resolves a register name written without the `$` sigil.
///
/// Accepts ABI names (`t0`, `sp`, ...) in any ASCII case, the alias `s8`
/// for `fp`, and numeric forms `0`..`31`.
///
/// # Examples
///
/// ```
/// use mipsim_core::isa::abi;
///
/// assert_eq!(abi::index("s0"), Some(16));
/// assert_eq!(abi::index("31"), Some(31));
/// assert_eq!(abi::index("SP"), Some(29));
/// assert_eq!(abi::index("32"), None);
/// ```
pub fn index(name: &str) -> Option<usize> {
    if name.bytes().all(|b| b.is_ascii_digit()) {
        return name.parse::<usize>().ok().filter(|&n| n < REG_NAMES.len());
    }
    if name.eq_ignore_ascii_case("s8") {
        return Some(REG_FP);
    }
    REG_NAMES.iter().position(|n| n.eq_ignore_ascii_case(name))
}
