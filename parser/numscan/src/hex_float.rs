//! Scanner for hexadecimal floating-point literals.
//!
//! Grammar after the `0x`/`0X` prefix: hex digits with at most one
//! radix point, a **mandatory** binary exponent `p`/`P` with optional
//! sign and at least one decimal digit, an optional `f|F|d|D` suffix,
//! and trailing whitespace. `0x3`, `0x3.`, and `0x3p` are all syntax
//! errors.
//!
//! Scanning validates and locates; a second pass folds the significand
//! into 64 bits. At most sixteen significant hex digits are retained,
//! anything below them collapses into a sticky bit, and the radix-point
//! shift moves into the binary exponent (four bits per digit). The
//! final conversion is exact bit assembly — hex floats never round
//! through the decimal oracle.

use numscan_core::swar::hex_digit_value;
use numscan_core::CodeUnits;

use crate::error::{ParseNumberError, Result};
use crate::rounding::{self, RawFloat};
use crate::scan::{is_digit, skip_whitespace, u, unit_or_zero};
use crate::MAX_EXPONENT_NUMBER;

/// Parses a hex float literal with the cursor just past the `0x`
/// prefix. `is_negative` was consumed by the caller.
pub(crate) fn parse_hex_float_literal<B: CodeUnits + ?Sized, F: RawFloat>(
    buf: &B,
    start: usize,
    end: usize,
    is_negative: bool,
) -> Result<F> {
    let mut index = start;
    let mut ch = 0u16;
    let mut illegal = false;

    // Locate the significand; values are folded in the second pass.
    let significand_start = index;
    let mut point_index: Option<usize> = None;
    while index < end {
        ch = buf.unit(index);
        if hex_digit_value(ch) >= 0 {
            // scanning only
        } else if ch == u(b'.') {
            illegal |= point_index.is_some();
            point_index = Some(index);
            while index + 9 <= end && buf.try_eight_hex_digits(index + 1).is_some() {
                index += 8;
            }
        } else {
            break;
        }
        index += 1;
    }
    let significand_end = index;
    let digit_count = match point_index {
        None => significand_end - significand_start,
        Some(_) => significand_end - significand_start - 1,
    };

    // Mandatory binary exponent.
    let mut exp_number: i64 = 0;
    let has_exponent = ch == u(b'p') || ch == u(b'P');
    if has_exponent {
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
    }

    if ch == u(b'd') || ch == u(b'D') || ch == u(b'f') || ch == u(b'F') {
        index += 1;
    }
    index = skip_whitespace(buf, index, end);

    if illegal || index < end || digit_count == 0 || !has_exponent {
        return Err(ParseNumberError::syntax());
    }

    // Fold the significand: at most 16 significant digits into 64 bits,
    // the rest into a sticky bit and an exponent correction.
    let mut significand: u64 = 0;
    let mut kept = 0u32;
    let mut seen_nonzero = false;
    let mut sticky = false;
    let mut fraction_digits: i64 = 0;
    let mut dropped: i64 = 0;
    let mut after_point = false;
    for i in significand_start..significand_end {
        let unit = buf.unit(i);
        if unit == u(b'.') {
            after_point = true;
            continue;
        }
        let digit = hex_digit_value(unit) as u64;
        if after_point {
            fraction_digits += 1;
        }
        if !seen_nonzero && digit == 0 {
            continue;
        }
        seen_nonzero = true;
        if kept < 16 {
            significand = significand << 4 | digit;
            kept += 1;
        } else {
            dropped += 1;
            sticky |= digit != 0;
        }
    }
    let exponent2 = exp_number + 4 * (dropped - fraction_digits);

    Ok(rounding::hex_to_float(
        is_negative,
        significand,
        sticky,
        exponent2,
    ))
}
