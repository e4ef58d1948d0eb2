//! Cache of powers of ten with exponents that are multiples of 16.
//!
//! The divide-and-conquer digit parser combines a high and a low half as
//! `high · 10^(to − mid) + low`. The split rule below always makes the
//! right half's length a multiple of 16, so every power of ten the whole
//! tree can ever need has an exponent that is a multiple of 16 — exactly
//! the key set of this cache. Pre-filling walks the same split tree the
//! parse will walk, composing each power bottom-up from smaller cached
//! entries; no one-off powers are ever computed.
//!
//! The cache is shared read-mostly during a parse. Writes happen during
//! pre-fill and lazy composition and are idempotent: any two populations
//! of the same key produce the identical exact integer, so concurrent
//! insertion through the lock needs no coordination beyond `or_insert`.

use std::collections::BTreeMap;

use num_bigint::BigInt;
use num_traits::One;
use parking_lot::RwLock;
use tracing::trace;

/// Exact values of `10^0 ..= 10^16`; `10^16` is the largest that pairs
/// with the floor-16 keys without leaving `u64`.
pub const SMALL_POWERS_OF_TEN: [u64; 17] = [
    1,
    10,
    100,
    1_000,
    10_000,
    100_000,
    1_000_000,
    10_000_000,
    100_000_000,
    1_000_000_000,
    10_000_000_000,
    100_000_000_000,
    1_000_000_000_000,
    10_000_000_000_000,
    100_000_000_000_000,
    1_000_000_000_000_000,
    10_000_000_000_000_000,
];

/// Ranges at or below this digit count never split, so the fill tree
/// stops recursing here (the parse handles them in a packed `u64`).
const FILL_BASE_CASE: usize = 18;

/// Minimum range length before a pre-fill forks its subtrees.
const PARALLEL_FILL_THRESHOLD: usize = 1024;

/// Splits `[from, to)` so the right half's length is a multiple of 16.
///
/// `mid = to − (((to − from + 1) / 2) rounded down to a multiple of 16)`.
/// Every key the parse tree requests is therefore `to − mid`, a multiple
/// of 16.
#[inline]
pub fn split_floor_16(from: usize, to: usize) -> usize {
    to - (((to - from + 1) / 2) & !15)
}

/// `10^exp` without a cache, for small assembler exponents.
pub fn pow10(exp: usize) -> BigInt {
    let mut result = BigInt::from(SMALL_POWERS_OF_TEN[exp & 15]);
    if exp >= 16 {
        let ten_pow_16 = BigInt::from(SMALL_POWERS_OF_TEN[16]);
        for _ in 0..exp >> 4 {
            result *= &ten_pow_16;
        }
    }
    result
}

/// Ordered map from exponent (multiple of 16) to the exact `10^exponent`.
pub struct Pow10Cache {
    map: RwLock<BTreeMap<usize, BigInt>>,
}

impl Pow10Cache {
    /// A cache seeded with `10^0` and `10^16`.
    pub fn new() -> Self {
        let mut map = BTreeMap::new();
        map.insert(0, BigInt::one());
        map.insert(16, BigInt::from(SMALL_POWERS_OF_TEN[16]));
        Pow10Cache {
            map: RwLock::new(map),
        }
    }

    /// Returns `true` if `exp` is already cached.
    pub fn contains(&self, exp: usize) -> bool {
        self.map.read().contains_key(&exp)
    }

    /// The cached `10^exp`, if present.
    pub fn get(&self, exp: usize) -> Option<BigInt> {
        self.map.read().get(&exp).cloned()
    }

    /// `10^exp` for an exponent that is a multiple of 16, composing and
    /// caching it from floor entries when absent.
    pub fn pow10_floor16(&self, exp: usize) -> BigInt {
        debug_assert_eq!(exp & 15, 0, "floor-16 key must be a multiple of 16");
        if let Some(value) = self.get(exp) {
            return value;
        }
        let value = self.compose(exp);
        self.map
            .write()
            .entry(exp)
            .or_insert_with(|| value.clone());
        value
    }

    /// `10^exp` for an arbitrary non-negative exponent: the floor-16
    /// entry times a small-power remainder.
    pub fn power_of_ten(&self, exp: usize) -> BigInt {
        let floor = exp & !15;
        let rem = exp & 15;
        let base = if floor == 0 {
            BigInt::one()
        } else {
            self.pow10_floor16(floor)
        };
        if rem == 0 {
            base
        } else {
            base * SMALL_POWERS_OF_TEN[rem]
        }
    }

    /// Pre-fills every key the divide-and-conquer parse of `[from, to)`
    /// will request. With `parallel`, independent subtrees fill on the
    /// work-stealing pool.
    pub fn prefill(&self, from: usize, to: usize, parallel: bool) {
        trace!(num_digits = to - from, parallel, "pre-filling powers of ten");
        self.prefill_recursive(from, to, parallel);
    }

    fn prefill_recursive(&self, from: usize, to: usize, parallel: bool) {
        let num_digits = to - from;
        if num_digits <= FILL_BASE_CASE {
            return;
        }
        let mid = split_floor_16(from, to);
        let key = to - mid;
        if self.contains(key) {
            return;
        }
        if parallel && num_digits >= PARALLEL_FILL_THRESHOLD {
            rayon::join(
                || self.prefill_recursive(from, mid, parallel),
                || self.prefill_recursive(mid, to, parallel),
            );
        } else {
            self.prefill_recursive(from, mid, parallel);
            self.prefill_recursive(mid, to, parallel);
        }
        let value = self.compose(key);
        self.map
            .write()
            .entry(key)
            .or_insert(value);
    }

    /// Composes `10^exp` (`exp` a multiple of 16) as a product of cached
    /// floor entries, walking down the remaining exponent.
    ///
    /// After a pre-fill the cached keys are dense across scales, so the
    /// walk shrinks geometrically; against a bare cache it degrades to
    /// `exp / 16` steps of the `10^16` seed, still exact.
    fn compose(&self, exp: usize) -> BigInt {
        let mut result = BigInt::one();
        let mut remaining = exp;
        while remaining > 0 {
            let (floor_exp, floor_value) = {
                let map = self.map.read();
                match map.range(1..=remaining).next_back() {
                    Some((k, v)) => (*k, v.clone()),
                    None => break,
                }
            };
            result *= floor_value;
            remaining -= floor_exp;
        }
        result
    }
}

impl Default for Pow10Cache {
    fn default() -> Self {
        Self::new()
    }
}
