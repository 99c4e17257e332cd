//! Core types for SURFMEM
//!
//! Gantree: L0_Foundation → CoreTypes
//!
//! Type aliases, classical bit addressing, and the [`Bitstring`] used
//! for register outcomes and syndromes.

use crate::error::{SurfaceError, SurfaceResult};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Type Aliases
// ============================================================================

/// Qubit identifier (0-indexed, flat across all quantum registers)
/// Gantree: QubitId // pub type QubitId = usize
pub type QubitId = usize;

/// Classical register identifier (declaration index)
/// Gantree: RegisterId // pub type RegisterId = usize
pub type RegisterId = usize;

/// Classical bit: bit `bit` of register `register`
/// Gantree: Clbit // (레지스터, 비트)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Clbit {
    /// Register declaration index
    pub register: RegisterId,
    /// Bit position inside the register
    pub bit: usize,
}

impl Clbit {
    /// Create a classical bit address
    pub fn new(register: RegisterId, bit: usize) -> Self {
        Self { register, bit }
    }
}

// ============================================================================
// Bitstring
// ============================================================================

/// Bit vector for register outcomes and syndromes
/// Gantree: Bitstring // 비트열 타입
///
/// Bit `k` is stored at index `k` (LSB first). Text form is written
/// most-significant bit first, matching the usual counts-key layout.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bitstring {
    bits: Vec<bool>,
}

impl Bitstring {
    /// Create from a vector of bools (index 0 = bit 0)
    pub fn new(bits: Vec<bool>) -> Self {
        Self { bits }
    }

    /// Create zero bitstring of given length
    pub fn zeros(n: usize) -> Self {
        Self {
            bits: vec![false; n],
        }
    }

    /// Parse from text, most significant bit first (e.g., "0110")
    /// Gantree: parse(s) -> Self // 파싱
    pub fn parse(s: &str) -> SurfaceResult<Self> {
        let bits: Result<Vec<bool>, _> = s
            .chars()
            .rev()
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                _ => Err(SurfaceError::InvalidBitstring(s.to_string())),
            })
            .collect();
        Ok(Self { bits: bits? })
    }

    /// Create from an integer value truncated to `width` bits
    pub fn from_value(value: u128, width: usize) -> Self {
        let bits = (0..width)
            .map(|k| k < 128 && (value >> k) & 1 == 1)
            .collect();
        Self { bits }
    }

    /// Integer value, if every set bit fits in 128 bits
    pub fn value(&self) -> Option<u128> {
        let mut value = 0u128;
        for (k, &b) in self.bits.iter().enumerate() {
            if b {
                if k >= 128 {
                    return None;
                }
                value |= 1 << k;
            }
        }
        Some(value)
    }

    /// Get the number of bits
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Get bit at index
    pub fn get(&self, index: usize) -> Option<bool> {
        self.bits.get(index).copied()
    }

    /// Bit at index, reading positions past the end as clear
    #[inline]
    pub fn is_set(&self, index: usize) -> bool {
        self.get(index).unwrap_or(false)
    }

    /// Set bit at index; out-of-range writes are rejected
    pub fn set(&mut self, index: usize, value: bool) -> SurfaceResult<()> {
        let width = self.bits.len();
        let slot = self
            .bits
            .get_mut(index)
            .ok_or_else(|| SurfaceError::ClbitOutOfRange {
                register: "bitstring".into(),
                bit: index,
                width,
            })?;
        *slot = value;
        Ok(())
    }

    /// Count number of 1s (Hamming weight)
    /// Gantree: popcount() -> usize // 1 카운트
    pub fn popcount(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// Get parity (true if odd number of 1s)
    pub fn parity(&self) -> bool {
        self.popcount() % 2 == 1
    }

    /// Positions of set bits, ascending
    pub fn ones(&self) -> Vec<usize> {
        self.bits
            .iter()
            .enumerate()
            .filter(|(_, &b)| b)
            .map(|(i, _)| i)
            .collect()
    }

    /// XOR with another bitstring of the same width
    /// Gantree: xor(&self, other) -> Result<Self> // 배타적 논리합
    pub fn xor(&self, other: &Bitstring) -> SurfaceResult<Bitstring> {
        if self.len() != other.len() {
            return Err(SurfaceError::shape("bitstring width", self.len(), other.len()));
        }
        let bits = self
            .bits
            .iter()
            .zip(&other.bits)
            .map(|(&a, &b)| a ^ b)
            .collect();
        Ok(Bitstring { bits })
    }

    /// Iterate bits, index 0 first
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter().copied()
    }
}

impl fmt::Display for Bitstring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in self.bits.iter().rev() {
            write!(f, "{}", if b { '1' } else { '0' })?;
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bitstring_parse_msb_first() {
        let bs = Bitstring::parse("0110").unwrap();
        assert_eq!(bs.len(), 4);
        assert!(!bs.is_set(0));
        assert!(bs.is_set(1));
        assert!(bs.is_set(2));
        assert!(!bs.is_set(3));
        assert_eq!(bs.value(), Some(6));
        assert_eq!(bs.to_string(), "0110");
    }

    #[test]
    fn test_bitstring_invalid() {
        assert!(Bitstring::parse("01a1").is_err());
    }

    #[test]
    fn test_bitstring_from_value() {
        let bs = Bitstring::from_value(0b1011, 8);
        assert_eq!(bs.len(), 8);
        assert_eq!(bs.ones(), vec![0, 1, 3]);
        assert_eq!(bs.popcount(), 3);
        assert!(bs.parity());
    }

    #[test]
    fn test_bitstring_is_set_past_end() {
        let bs = Bitstring::from_value(1, 2);
        assert!(bs.is_set(0));
        assert!(!bs.is_set(100));
    }

    #[test]
    fn test_bitstring_xor() {
        let a = Bitstring::parse("1100").unwrap();
        let b = Bitstring::parse("1010").unwrap();
        assert_eq!(a.xor(&b).unwrap().to_string(), "0110");
        assert!(a.xor(&Bitstring::zeros(3)).is_err());
    }

    #[test]
    fn test_bitstring_wide_value() {
        let mut bs = Bitstring::zeros(130);
        bs.set(129, true).unwrap();
        assert_eq!(bs.value(), None);
        assert!(bs.set(130, true).is_err());
    }
}
