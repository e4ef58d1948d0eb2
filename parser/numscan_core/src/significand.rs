//! Mutable fixed-width significand accumulator.
//!
//! The iterative digit-range regime folds eight-digit groups into a
//! single big integer with `significand = significand · 10⁸ + group`.
//! Allocating a fresh bigint per group would make that quadratic in
//! allocations, so [`BigSignificand`] performs every step in place on a
//! fixed array of 32-bit limbs and exports one bigint at the very end.
//!
//! # Limb orientation
//!
//! Limb 0 is the **most significant** limb (big-endian by index). The
//! array is sized with one 64-bit word of headroom above the requested
//! capacity, so limb 0 stays zero for any value within that capacity
//! and the final two's-complement serialization is always non-negative.

use num_bigint::BigInt;

/// In-place mutable unsigned integer with caller-fixed bit capacity.
///
/// Operations never allocate. Writing past the reserved capacity is a
/// programmer error and panics via the out-of-range limb index.
pub struct BigSignificand {
    /// Big-endian limbs; `limbs[0]` is the most significant.
    limbs: Vec<u32>,
    /// Index of the first limb that may be nonzero. Invariant:
    /// `limbs[i] == 0` for all `i < first_nonzero`.
    first_nonzero: usize,
}

const LIMB_MASK: u64 = 0xFFFF_FFFF;

impl BigSignificand {
    /// Reserves capacity for `num_bits` bits plus one word of headroom.
    ///
    /// # Panics
    ///
    /// Panics if `num_bits` is zero or does not fit a signed 32-bit
    /// integer.
    pub fn new(num_bits: u64) -> Self {
        assert!(
            num_bits > 0 && num_bits < i32::MAX as u64,
            "invalid significand capacity: {num_bits} bits"
        );
        let num_words = ((num_bits + 63) >> 6) + 1;
        let num_limbs = (num_words << 1) as usize;
        BigSignificand {
            limbs: vec![0; num_limbs],
            first_nonzero: num_limbs,
        }
    }

    /// Multiplies the value by `factor` in place.
    pub fn mul_small(&mut self, factor: u32) {
        self.fma_small(factor, 0);
    }

    /// Multiplies the value by `factor` and adds `addend`, in place.
    ///
    /// This is the iterative regime's workhorse:
    /// `fma_small(100_000_000, eight_digit_group)`.
    pub fn fma_small(&mut self, factor: u32, addend: u32) {
        let factor = u64::from(factor);
        let mut carry = u64::from(addend);
        let mut i = self.limbs.len();
        while i > self.first_nonzero {
            i -= 1;
            let product = factor * u64::from(self.limbs[i]) + carry;
            self.limbs[i] = (product & LIMB_MASK) as u32;
            carry = product >> 32;
        }
        if carry != 0 {
            // Capacity overflow walks off the front and panics here.
            let i = i - 1;
            self.limbs[i] = carry as u32;
            self.first_nonzero = i;
        }
    }

    /// Adds `value` in place.
    pub fn add_small(&mut self, value: u32) {
        if value == 0 {
            return;
        }
        let mut carry = u64::from(value);
        let mut i = self.limbs.len();
        while carry != 0 {
            i -= 1;
            let sum = u64::from(self.limbs[i]) + carry;
            self.limbs[i] = (sum & LIMB_MASK) as u32;
            carry = sum >> 32;
        }
        self.first_nonzero = self.first_nonzero.min(i);
    }

    /// Exports the accumulated value as a canonical bigint.
    ///
    /// Limbs are serialized most-significant-first and interpreted as a
    /// big-endian two's-complement integer. Limb 0 is headroom and thus
    /// zero, so the result is non-negative.
    pub fn to_bigint(&self) -> BigInt {
        let mut bytes = Vec::with_capacity(self.limbs.len() * 4);
        for limb in &self.limbs {
            bytes.extend_from_slice(&limb.to_be_bytes());
        }
        BigInt::from_signed_bytes_be(&bytes)
    }

    /// Upper bound on the bits needed for `num_decimal_digits` digits.
    ///
    /// `(n · 3402) >> 10 + 1` over-approximates `n · log2(10)` (3.3219…,
    /// and 3402/1024 = 3.3223…) for every `n ≥ 0`, so a significand
    /// sized with this estimate never overflows its capacity.
    pub fn estimate_num_bits(num_decimal_digits: u64) -> u64 {
        ((num_decimal_digits * 3402) >> 10) + 1
    }
}

impl std::fmt::Debug for BigSignificand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BigSignificand({})", self.to_bigint())
    }
}
