//! Parser for big-integer literals.
//!
//! Grammar: optional `+`/`-` sign, then either a `0x`/`0X`-prefixed hex
//! digit string or a decimal digit string. No whitespace, no point, no
//! exponent.
//!
//! The hex path never multiplies: nibble pairs become bytes (one odd
//! leading nibble, then pairs, then eight digits at a time through the
//! SWAR block writing four big-endian bytes) and the result is read as
//! a big-endian two's-complement integer whose leading byte is zero.
//! The decimal path skips leading zeroes, enforces the digit ceiling,
//! pre-fills the powers-of-ten cache, and hands the range to the
//! three-regime digit engine.

use num_bigint::BigInt;
use num_traits::Zero;
use tracing::trace;

use numscan_core::swar::hex_digit_value;
use numscan_core::{parse_digits, CodeUnits, Pow10Cache, RECURSION_THRESHOLD};

use crate::error::{ParseNumberError, Result};
use crate::scan::{check_digits, skip_zeroes, u, unit_or_zero};
use crate::MAX_DECIMAL_DIGITS;

/// Parses a big-integer literal occupying the whole window
/// `[offset, end)`; `parallel_threshold` is `usize::MAX` for a
/// sequential parse.
pub(crate) fn parse_bigint_literal<B: CodeUnits + ?Sized>(
    buf: &B,
    offset: usize,
    end: usize,
    parallel_threshold: usize,
) -> Result<BigInt> {
    let mut index = offset;
    let mut ch = unit_or_zero(buf, index, end);

    let is_negative = ch == u(b'-');
    if is_negative || ch == u(b'+') {
        index += 1;
        ch = unit_or_zero(buf, index, end);
        if ch == 0 {
            return Err(ParseNumberError::syntax());
        }
    }

    if ch == u(b'0') {
        let next = unit_or_zero(buf, index + 1, end);
        if next == u(b'x') || next == u(b'X') {
            return parse_hex_digits(buf, index + 2, end, is_negative);
        }
    }

    parse_dec_digits(buf, index, end, is_negative, parallel_threshold)
}

fn parse_dec_digits<B: CodeUnits + ?Sized>(
    buf: &B,
    from: usize,
    to: usize,
    is_negative: bool,
    parallel_threshold: usize,
) -> Result<BigInt> {
    if from == to {
        return Err(ParseNumberError::syntax());
    }
    let from = skip_zeroes(buf, from, to);
    let num_digits = to - from;
    if num_digits > MAX_DECIMAL_DIGITS {
        return Err(ParseNumberError::value_exceeds_limits());
    }
    check_digits(buf, from, to)?;
    trace!(num_digits, "parsing decimal big-integer literal");
    let powers = Pow10Cache::new();
    if num_digits > RECURSION_THRESHOLD {
        powers.prefill(from, to, parallel_threshold != usize::MAX);
    }
    let result = parse_digits(buf, from, to, Some(&powers), parallel_threshold);
    Ok(if is_negative { -result } else { result })
}

fn parse_hex_digits<B: CodeUnits + ?Sized>(
    buf: &B,
    from: usize,
    to: usize,
    is_negative: bool,
) -> Result<BigInt> {
    if to == from {
        return Err(ParseNumberError::syntax());
    }
    let mut from = skip_zeroes(buf, from, to);
    let num_digits = to - from;
    if num_digits == 0 {
        return Ok(BigInt::zero());
    }
    trace!(num_digits, "parsing hex big-integer literal");

    // One leading zero byte keeps the two's-complement reading
    // non-negative.
    let mut bytes = vec![0u8; ((num_digits + 1) >> 1) + 1];
    let mut write = 1;
    let mut illegal = false;

    if num_digits & 1 != 0 {
        let nibble = hex_digit_value(buf.unit(from));
        from += 1;
        illegal |= nibble < 0;
        bytes[write] = nibble as u8 & 0xF;
        write += 1;
    }
    let preroll_limit = from + ((to - from) & 7);
    while from < preroll_limit {
        let high = hex_digit_value(buf.unit(from));
        let low = hex_digit_value(buf.unit(from + 1));
        illegal |= high < 0 || low < 0;
        bytes[write] = (high as u8) << 4 | (low as u8 & 0xF);
        write += 1;
        from += 2;
    }
    while from < to {
        match buf.try_eight_hex_digits(from) {
            Some(value) => bytes[write..write + 4].copy_from_slice(&value.to_be_bytes()),
            None => illegal = true,
        }
        write += 4;
        from += 8;
    }
    if illegal {
        return Err(ParseNumberError::syntax());
    }

    let result = BigInt::from_signed_bytes_be(&bytes);
    Ok(if is_negative { -result } else { result })
}
