//! Digit-sequence to bigint conversion in three execution regimes.
//!
//! A contiguous range of ASCII digits becomes a [`BigInt`] through one
//! of:
//!
//! - **packed** (≤ 18 digits): the whole value fits a `u64`; eight-digit
//!   SWAR groups fold into a register.
//! - **iterative** (≤ [`RECURSION_THRESHOLD`]): in-place accumulation on
//!   a [`BigSignificand`], `fma(10⁸, group)` per SWAR group. Quadratic in
//!   limbs but with a tiny constant; wins below the crossover.
//! - **recursive / parallel** (above): divide and conquer on the
//!   [`split_floor_16`] midpoint, combining halves as
//!   `high · 10^(to − mid) + low` with the power drawn from the
//!   [`Pow10Cache`]. The parallel regime forks one half onto the
//!   work-stealing pool and computes the other locally; the fork tree is
//!   structurally deterministic, so results are bit-identical for any
//!   worker count.
//!
//! The caller guarantees `[from, to)` contains only ASCII digits.

use num_bigint::BigInt;
use tracing::trace;

use crate::input::CodeUnits;
use crate::pow10::{split_floor_16, Pow10Cache};
use crate::significand::BigSignificand;

/// Digit count at or below which the iterative regime replaces the
/// divide-and-conquer recursion.
pub const RECURSION_THRESHOLD: usize = 128;

/// Default digit count at which a parse starts forking subtrees.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 1024;

/// Converts the digit range `[from, to)` into a bigint.
///
/// `powers` may be `None` for ranges the caller knows stay at or below
/// [`RECURSION_THRESHOLD`]; longer ranges fall back to a locally seeded
/// cache if none was provided. Passing `usize::MAX` as
/// `parallel_threshold` keeps the parse single-threaded.
///
/// # Contract
///
/// Every code unit in `[from, to)` is an ASCII digit.
pub fn parse_digits<B: CodeUnits + ?Sized>(
    buf: &B,
    from: usize,
    to: usize,
    powers: Option<&Pow10Cache>,
    parallel_threshold: usize,
) -> BigInt {
    let num_digits = to - from;
    if num_digits <= 18 {
        return parse_digits_packed(buf, from, to);
    }
    if num_digits <= RECURSION_THRESHOLD {
        return parse_digits_iterative(buf, from, to);
    }
    let local;
    let powers = match powers {
        Some(cache) => cache,
        None => {
            local = Pow10Cache::new();
            &local
        }
    };
    if num_digits < parallel_threshold {
        trace!(num_digits, "parsing digit range recursively");
        parse_digits_recursive(buf, from, to, powers)
    } else {
        trace!(num_digits, "parsing digit range on the fork-join pool");
        parse_digits_parallel(buf, from, to, powers, parallel_threshold)
    }
}

/// Decodes the eight digits at `index`; the caller's all-digit contract
/// makes failure unreachable.
#[inline]
fn eight_digits<B: CodeUnits + ?Sized>(buf: &B, index: usize) -> u32 {
    match buf.try_eight_digits(index) {
        Some(group) => group,
        None => unreachable!("digit range contract violated at index {index}"),
    }
}

/// Accumulates `to - from` (at most 7) digits into a register.
#[inline]
fn parse_up_to_seven_digits<B: CodeUnits + ?Sized>(buf: &B, from: usize, to: usize) -> u32 {
    let mut value = 0u32;
    for index in from..to {
        let unit = buf.unit(index);
        debug_assert!(unit.wrapping_sub(u16::from(b'0')) < 10);
        value = value * 10 + u32::from(unit - u16::from(b'0'));
    }
    value
}

/// ≤ 18 digits: the exact value fits an unsigned 64-bit register.
fn parse_digits_packed<B: CodeUnits + ?Sized>(buf: &B, from: usize, to: usize) -> BigInt {
    let num_digits = to - from;
    debug_assert!(num_digits <= 18);
    let preroll = from + (num_digits & 7);
    let mut significand = u64::from(parse_up_to_seven_digits(buf, from, preroll));
    let mut index = preroll;
    while index < to {
        significand = significand * 100_000_000 + u64::from(eight_digits(buf, index));
        index += 8;
    }
    BigInt::from(significand)
}

/// In-place accumulation on a capacity-estimated [`BigSignificand`].
fn parse_digits_iterative<B: CodeUnits + ?Sized>(buf: &B, from: usize, to: usize) -> BigInt {
    let num_digits = to - from;
    let mut significand =
        BigSignificand::new(BigSignificand::estimate_num_bits(num_digits as u64));
    let preroll = from + (num_digits & 7);
    significand.add_small(parse_up_to_seven_digits(buf, from, preroll));
    let mut index = preroll;
    while index < to {
        significand.fma_small(100_000_000, eight_digits(buf, index));
        index += 8;
    }
    significand.to_bigint()
}

/// Single-threaded divide and conquer over the split-floor-16 tree.
fn parse_digits_recursive<B: CodeUnits + ?Sized>(
    buf: &B,
    from: usize,
    to: usize,
    powers: &Pow10Cache,
) -> BigInt {
    let num_digits = to - from;
    if num_digits <= 18 {
        return parse_digits_packed(buf, from, to);
    }
    if num_digits <= RECURSION_THRESHOLD {
        return parse_digits_iterative(buf, from, to);
    }
    let mid = split_floor_16(from, to);
    let high = parse_digits_recursive(buf, from, mid, powers);
    let low = parse_digits_recursive(buf, mid, to, powers);
    high * powers.pow10_floor16(to - mid) + low
}

/// Fork-join divide and conquer: one half forked, the other computed on
/// the current worker.
fn parse_digits_parallel<B: CodeUnits + ?Sized>(
    buf: &B,
    from: usize,
    to: usize,
    powers: &Pow10Cache,
    parallel_threshold: usize,
) -> BigInt {
    let num_digits = to - from;
    if num_digits <= parallel_threshold {
        return parse_digits_recursive(buf, from, to, powers);
    }
    let mid = split_floor_16(from, to);
    let (high, low) = rayon::join(
        || parse_digits_parallel(buf, from, mid, powers, parallel_threshold),
        || parse_digits_parallel(buf, mid, to, powers, parallel_threshold),
    );
    high * powers.pow10_floor16(to - mid) + low
}
