//! Parser for big-decimal literals.
//!
//! Two scanner variants share one value assembler:
//!
//! - the **short** scanner, for windows below
//!   [`MANY_DIGITS_THRESHOLD`](crate::MANY_DIGITS_THRESHOLD): packs the
//!   significand into a `u64` on the fly (four fraction digits per SWAR
//!   step) and short-circuits to a small `BigDecimal` when at most 18
//!   digits are present;
//! - the **many-digits** scanner: skips leading-zero runs eight units
//!   at a time in both the integer and fraction parts, then counts
//!   digits with the eight-wide digit predicate, recording the
//!   `nonzero_*` starts so the assembler never feeds redundant zeroes
//!   to the digit engine.
//!
//! Assembly: `significand = integer_part · 10^(fraction digits) +
//! fractional_part`, then `BigDecimal::new(significand, −exponent)`,
//! with the powers-of-ten cache created and pre-filled only when a
//! digit range exceeds the recursion threshold.

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::Zero;
use tracing::trace;

use numscan_core::{parse_digits, pow10, CodeUnits, Pow10Cache, RECURSION_THRESHOLD};

use crate::error::{ParseNumberError, Result};
use crate::scan::{is_digit, skip_zeroes, u, unit_or_zero};
use crate::{MANY_DIGITS_THRESHOLD, MAX_DIGIT_COUNT, MAX_EXPONENT_NUMBER};

/// Parses a big-decimal literal occupying the whole window
/// `[offset, end)`; `parallel_threshold` is `usize::MAX` for a
/// sequential parse.
pub(crate) fn parse_bigdecimal_literal<B: CodeUnits + ?Sized>(
    buf: &B,
    offset: usize,
    end: usize,
    parallel_threshold: usize,
) -> Result<BigDecimal> {
    if end - offset >= MANY_DIGITS_THRESHOLD {
        return parse_many_digits(buf, offset, end, parallel_threshold);
    }

    let mut index = offset;
    let mut ch = unit_or_zero(buf, index, end);
    let mut illegal = false;

    let is_negative = ch == u(b'-');
    if is_negative || ch == u(b'+') {
        index += 1;
        ch = unit_or_zero(buf, index, end);
        if ch == 0 {
            return Err(ParseNumberError::syntax());
        }
    }

    // Significand; may wrap beyond 18 digits, in which case the value
    // is rebuilt from the recorded ranges instead.
    let integer_part_index = index;
    let mut significand: u64 = 0;
    let mut point_index: Option<usize> = None;
    while index < end {
        ch = buf.unit(index);
        if is_digit(ch) {
            significand = significand
                .wrapping_mul(10)
                .wrapping_add(u64::from(ch - u(b'0')));
        } else if ch == u(b'.') {
            illegal |= point_index.is_some();
            point_index = Some(index);
            while index + 5 <= end {
                match buf.try_four_digits(index + 1) {
                    Some(group) => {
                        significand = significand
                            .wrapping_mul(10_000)
                            .wrapping_add(u64::from(group));
                        index += 4;
                    }
                    None => break,
                }
            }
        } else {
            break;
        }
        index += 1;
    }

    let significand_end = index;
    let (digit_count, decimal_point_index, mut exponent) = match point_index {
        None => (
            significand_end - integer_part_index,
            significand_end,
            0i64,
        ),
        Some(point) => (
            significand_end - integer_part_index - 1,
            point,
            point as i64 - significand_end as i64 + 1,
        ),
    };

    let exponent_indicator_index;
    let mut exp_number: i64 = 0;
    if ch == u(b'e') || ch == u(b'E') {
        exponent_indicator_index = index;
        index += 1;
        ch = unit_or_zero(buf, index, end);
        let exp_negative = ch == u(b'-');
        if exp_negative || ch == u(b'+') {
            index += 1;
            ch = unit_or_zero(buf, index, end);
        }
        illegal |= !is_digit(ch);
        loop {
            if exp_number < MAX_EXPONENT_NUMBER {
                exp_number = 10 * exp_number + (i64::from(ch) - i64::from(b'0'));
            }
            index += 1;
            ch = unit_or_zero(buf, index, end);
            if !is_digit(ch) {
                break;
            }
        }
        if exp_negative {
            exp_number = -exp_number;
        }
        exponent += exp_number;
    } else {
        exponent_indicator_index = end;
    }

    if illegal
        || index < end
        || digit_count == 0
        || exponent < i64::from(i32::MIN)
        || exponent > i64::from(i32::MAX)
        || digit_count > MAX_DIGIT_COUNT
    {
        return Err(ParseNumberError::syntax());
    }

    if digit_count <= 18 {
        let signed = if is_negative {
            -(significand as i64)
        } else {
            significand as i64
        };
        return Ok(BigDecimal::new(BigInt::from(signed), -exponent));
    }
    Ok(value_of(
        buf,
        integer_part_index,
        decimal_point_index,
        decimal_point_index + 1,
        exponent_indicator_index,
        is_negative,
        exponent,
        parallel_threshold,
    ))
}

/// The leading-zero-skipping scanner for long windows.
fn parse_many_digits<B: CodeUnits + ?Sized>(
    buf: &B,
    offset: usize,
    end: usize,
    parallel_threshold: usize,
) -> Result<BigDecimal> {
    let mut index = offset;
    let mut ch = unit_or_zero(buf, index, end);
    let mut illegal = false;

    let is_negative = ch == u(b'-');
    if is_negative || ch == u(b'+') {
        index += 1;
        ch = unit_or_zero(buf, index, end);
        if ch == 0 {
            return Err(ParseNumberError::syntax());
        }
    }

    let integer_part_index = index;
    let swar_limit = end.saturating_sub(8);

    // Integer part: skip the zero run, then count digits.
    index = skip_zeroes(buf, index, end);
    let nonzero_integer_index = index;
    while index < swar_limit && buf.is_eight_digits(index) {
        index += 8;
    }
    while index < end {
        ch = buf.unit(index);
        if !is_digit(ch) {
            break;
        }
        index += 1;
    }

    // Fraction part, same shape: point, zero run, digit count.
    let mut fraction: Option<(usize, usize)> = None;
    if index < end && ch == u(b'.') {
        let point = index;
        index += 1;
        index = skip_zeroes(buf, index, end);
        let nonzero_fraction_index = index;
        while index < swar_limit && buf.is_eight_digits(index) {
            index += 8;
        }
        while index < end {
            ch = buf.unit(index);
            if !is_digit(ch) {
                break;
            }
            index += 1;
        }
        fraction = Some((point, nonzero_fraction_index));
    }

    let significand_end = index;
    let (digit_count, decimal_point_index, nonzero_fraction_index, mut exponent) =
        match fraction {
            None => (
                significand_end - nonzero_integer_index,
                significand_end,
                significand_end,
                0i64,
            ),
            Some((point, nonzero_fraction_index)) => {
                let count = if nonzero_integer_index == point {
                    significand_end - nonzero_fraction_index
                } else {
                    significand_end - nonzero_integer_index - 1
                };
                (
                    count,
                    point,
                    nonzero_fraction_index,
                    point as i64 - significand_end as i64 + 1,
                )
            }
        };

    let exponent_indicator_index;
    let mut exp_number: i64 = 0;
    if index < end && (ch == u(b'e') || ch == u(b'E')) {
        exponent_indicator_index = index;
        index += 1;
        ch = unit_or_zero(buf, index, end);
        let exp_negative = ch == u(b'-');
        if exp_negative || ch == u(b'+') {
            index += 1;
            ch = unit_or_zero(buf, index, end);
        }
        illegal |= !is_digit(ch);
        loop {
            if exp_number < MAX_EXPONENT_NUMBER {
                exp_number = 10 * exp_number + (i64::from(ch) - i64::from(b'0'));
            }
            index += 1;
            ch = unit_or_zero(buf, index, end);
            if !is_digit(ch) {
                break;
            }
        }
        if exp_negative {
            exp_number = -exp_number;
        }
        exponent += exp_number;
    } else {
        exponent_indicator_index = end;
    }

    if illegal || index < end {
        return Err(ParseNumberError::syntax());
    }
    if exponent_indicator_index == integer_part_index {
        // Empty significand region: nothing before the exponent at all.
        return Err(ParseNumberError::syntax());
    }
    if exponent < i64::from(i32::MIN)
        || exponent > i64::from(i32::MAX)
        || digit_count > MAX_DIGIT_COUNT
    {
        return Err(ParseNumberError::value_exceeds_limits());
    }
    trace!(digit_count, "assembling big-decimal literal");
    Ok(value_of(
        buf,
        nonzero_integer_index,
        decimal_point_index,
        nonzero_fraction_index,
        exponent_indicator_index,
        is_negative,
        exponent,
        parallel_threshold,
    ))
}

/// Combines scanned index ranges into the final value:
/// `(integer · 10^fraction_digits + fraction) · 10^(−scale)`.
#[allow(clippy::too_many_arguments)]
fn value_of<B: CodeUnits + ?Sized>(
    buf: &B,
    integer_start: usize,
    decimal_point_index: usize,
    fraction_start: usize,
    exponent_indicator_index: usize,
    is_negative: bool,
    exponent: i64,
    parallel_threshold: usize,
) -> BigDecimal {
    let integer_exponent = exponent_indicator_index as i64 - decimal_point_index as i64 - 1;
    let integer_count = decimal_point_index as i64 - integer_start as i64;
    let fraction_count = exponent_indicator_index as i64 - fraction_start as i64;
    let parallel = parallel_threshold != usize::MAX;
    let threshold = RECURSION_THRESHOLD as i64;

    let mut powers: Option<Pow10Cache> = None;
    let integer_part = if integer_count > 0 {
        if integer_count > threshold {
            let cache = powers.get_or_insert_with(Pow10Cache::new);
            cache.prefill(integer_start, decimal_point_index, parallel);
        }
        parse_digits(
            buf,
            integer_start,
            decimal_point_index,
            powers.as_ref(),
            parallel_threshold,
        )
    } else {
        BigInt::zero()
    };

    let significand = if fraction_count > 0 {
        if fraction_count > threshold {
            let cache = powers.get_or_insert_with(Pow10Cache::new);
            cache.prefill(fraction_start, exponent_indicator_index, parallel);
        }
        let fractional_part = parse_digits(
            buf,
            fraction_start,
            exponent_indicator_index,
            powers.as_ref(),
            parallel_threshold,
        );
        if integer_part.is_zero() {
            fractional_part
        } else {
            let integer_factor = match &powers {
                Some(cache) => cache.power_of_ten(integer_exponent as usize),
                None => pow10(integer_exponent as usize),
            };
            integer_part * integer_factor + fractional_part
        }
    } else {
        integer_part
    };

    let result = BigDecimal::new(significand, -exponent);
    if is_negative {
        -result
    } else {
        result
    }
}
