//! Fast parsing of numeric literals.
//!
//! numscan converts textual number syntax into precise values: decimal
//! and hexadecimal floating-point literals into correctly rounded
//! `f64`/`f32`, and arbitrarily long integer and decimal literals into
//! [`BigInt`]/[`BigDecimal`] with bit-exact results.
//!
//! Input is a read-only window into a buffer of 8-bit or 16-bit code
//! units (see [`CodeUnits`]); the parser never copies the buffer and
//! never reads outside the window.
//!
//! # Examples
//!
//! ```
//! assert_eq!(numscan::parse_double_str("1.2e3"), Ok(1200.0));
//! assert_eq!(numscan::parse_double_str("0x1.0p8"), Ok(256.0));
//! assert_eq!(numscan::parse_double_str(" 1.2e3  "), Ok(1200.0));
//! assert!(numscan::parse_json_number_str(" 1.2e3  ").is_err());
//!
//! let big = numscan::parse_bigint_literal_str("123456789012345678901234567890", false).unwrap();
//! assert_eq!(big.to_string(), "123456789012345678901234567890");
//! ```
//!
//! # Architecture
//!
//! Each public operation runs a single-pass scanner over the window,
//! producing index ranges and flags. Short literals are assembled from
//! a packed 64-bit significand; long ones go through `numscan_core`'s
//! divide-and-conquer digit engine and its powers-of-ten cache, on the
//! work-stealing pool when the caller allows parallelism. Given
//! identical input, results are bit-identical regardless of thread
//! count.
//!
//! Scanner variants differ by grammar: [`parse_double`]/[`parse_float`]
//! accept the permissive float-literal dialect (whitespace, signs,
//! leading zeroes, `f|F|d|D` suffixes, `NaN`/`Infinity`, hex floats),
//! [`parse_json_number`] the JSON `number` production, and the bigint /
//! bigdecimal parsers their plain-integer and scientific-decimal
//! grammars. Each function documents its variant.

mod big_decimal;
mod bigint;
mod error;
mod float;
mod hex_float;
mod json;
mod rounding;
mod scan;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;

pub use error::{ParseNumberError, ParseNumberErrorKind};
pub use numscan_core::{CodeUnits, DEFAULT_PARALLEL_THRESHOLD, RECURSION_THRESHOLD};

/// Ceiling on the length of a parse window, in code units.
pub const MAX_INPUT_LENGTH: usize = i32::MAX as usize - 4;

/// Ceiling on significant digits in a big-integer literal (the decimal
/// digit count of 2^(2^31 − 1)).
pub const MAX_DECIMAL_DIGITS: usize = 646_456_993;

/// Ceiling on significant digits in a big-decimal literal.
pub const MAX_DIGIT_COUNT: usize = 1_292_782_621;

/// Saturation cap for exponent accumulation; the combined exponent must
/// also fit a signed 32-bit integer.
pub const MAX_EXPONENT_NUMBER: i64 = i32::MAX as i64;

/// Window length from which the big-decimal parser switches to the
/// leading-zero-skipping scanner.
pub const MANY_DIGITS_THRESHOLD: usize = 32;

/// Validates the window and returns its end index.
fn check_window<B: CodeUnits + ?Sized>(
    buf: &B,
    offset: usize,
    length: usize,
) -> Result<usize, ParseNumberError> {
    let end = offset
        .checked_add(length)
        .ok_or_else(ParseNumberError::illegal_window)?;
    if end > buf.len() || length > MAX_INPUT_LENGTH {
        return Err(ParseNumberError::illegal_window());
    }
    Ok(end)
}

fn threshold_for(parallel: bool) -> usize {
    if parallel {
        DEFAULT_PARALLEL_THRESHOLD
    } else {
        usize::MAX
    }
}

/// Parses a float literal from `buf[offset..offset + length]` into a
/// correctly rounded `f64`.
///
/// Accepts the permissive float dialect: surrounding whitespace, an
/// optional sign, decimal or `0x…p…` hexadecimal notation, an optional
/// `f|F|d|D` suffix, and the `NaN`/`Infinity` keywords.
pub fn parse_double<B: CodeUnits + ?Sized>(
    buf: &B,
    offset: usize,
    length: usize,
) -> Result<f64, ParseNumberError> {
    let end = check_window(buf, offset, length)?;
    float::parse_float_literal(buf, offset, end)
}

/// Parses a float literal into a correctly rounded `f32`.
///
/// Same grammar as [`parse_double`]; rounding goes directly from the
/// decimal (or binary) digits to `f32`, never through a double.
pub fn parse_float<B: CodeUnits + ?Sized>(
    buf: &B,
    offset: usize,
    length: usize,
) -> Result<f32, ParseNumberError> {
    let end = check_window(buf, offset, length)?;
    float::parse_float_literal(buf, offset, end)
}

/// Parses a JSON `number` production into a correctly rounded `f64`.
///
/// The JSON variant permits no whitespace, no `+` sign, no second
/// leading zero, no hex, and no type suffix.
pub fn parse_json_number<B: CodeUnits + ?Sized>(
    buf: &B,
    offset: usize,
    length: usize,
) -> Result<f64, ParseNumberError> {
    let end = check_window(buf, offset, length)?;
    json::parse_json_number(buf, offset, end)
}

/// Parses a decimal or `0x`-prefixed hex integer literal with optional
/// sign into a [`BigInt`].
///
/// With `parallel`, ranges of [`DEFAULT_PARALLEL_THRESHOLD`] or more
/// digits are converted on the work-stealing pool; the result is
/// bit-identical either way.
pub fn parse_bigint_literal<B: CodeUnits + ?Sized>(
    buf: &B,
    offset: usize,
    length: usize,
    parallel: bool,
) -> Result<BigInt, ParseNumberError> {
    let end = check_window(buf, offset, length)?;
    bigint::parse_bigint_literal(buf, offset, end, threshold_for(parallel))
}

/// Parses a decimal literal with optional fraction and exponent into a
/// [`BigDecimal`] of value `unscaled · 10^(−scale)`.
pub fn parse_bigdecimal_literal<B: CodeUnits + ?Sized>(
    buf: &B,
    offset: usize,
    length: usize,
    parallel: bool,
) -> Result<BigDecimal, ParseNumberError> {
    let end = check_window(buf, offset, length)?;
    big_decimal::parse_bigdecimal_literal(buf, offset, end, threshold_for(parallel))
}

/// [`parse_double`] over a whole string.
pub fn parse_double_str(text: &str) -> Result<f64, ParseNumberError> {
    parse_double(text.as_bytes(), 0, text.len())
}

/// [`parse_float`] over a whole string.
pub fn parse_float_str(text: &str) -> Result<f32, ParseNumberError> {
    parse_float(text.as_bytes(), 0, text.len())
}

/// [`parse_json_number`] over a whole string.
pub fn parse_json_number_str(text: &str) -> Result<f64, ParseNumberError> {
    parse_json_number(text.as_bytes(), 0, text.len())
}

/// [`parse_bigint_literal`] over a whole string.
pub fn parse_bigint_literal_str(text: &str, parallel: bool) -> Result<BigInt, ParseNumberError> {
    parse_bigint_literal(text.as_bytes(), 0, text.len(), parallel)
}

/// [`parse_bigdecimal_literal`] over a whole string.
pub fn parse_bigdecimal_literal_str(
    text: &str,
    parallel: bool,
) -> Result<BigDecimal, ParseNumberError> {
    parse_bigdecimal_literal(text.as_bytes(), 0, text.len(), parallel)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_validation_is_eager() {
        let buf = b"3.14".as_slice();
        let illegal = Err(ParseNumberError::illegal_window());
        assert_eq!(parse_double(buf, 8, 4), illegal);
        assert_eq!(parse_double(buf, 0, 8), illegal);
        assert_eq!(parse_double(buf, 4, 1), illegal);
        assert_eq!(parse_double(buf, usize::MAX, 2), illegal);
        assert_eq!(parse_json_number(buf, 0, 5), illegal);
        assert_eq!(
            parse_bigint_literal(buf, 2, 3, false).unwrap_err(),
            ParseNumberError::illegal_window()
        );
    }

    #[test]
    fn empty_window_is_a_syntax_error_not_a_window_error() {
        let buf = b"3.14".as_slice();
        assert_eq!(parse_double(buf, 0, 0), Err(ParseNumberError::syntax()));
        assert_eq!(parse_double(buf, 4, 0), Err(ParseNumberError::syntax()));
        assert_eq!(
            parse_bigdecimal_literal(buf, 2, 0, false).map_err(|e| e.kind),
            Err(ParseNumberErrorKind::SyntaxError)
        );
    }

    #[test]
    fn windows_never_read_neighboring_bytes() {
        // The digits around the window must not affect the result.
        let buf = b"9991.5e2999".as_slice();
        assert_eq!(parse_double(buf, 3, 5), Ok(150.0));
        assert_eq!(parse_json_number(buf, 3, 5), Ok(150.0));
        assert_eq!(
            parse_bigint_literal(buf, 3, 1, false),
            Ok(num_bigint::BigInt::from(1))
        );
    }

    #[test]
    fn spec_scenarios_end_to_end() {
        assert_eq!(parse_double_str("1.2e3"), Ok(1200.0));
        assert_eq!(parse_double_str("0x1.0p8"), Ok(256.0));
        assert_eq!(parse_double_str(" 1.2e3  "), Ok(1200.0));
        assert!(parse_json_number_str(" 1.2e3  ").is_err());

        let big = parse_bigint_literal_str("123456789012345678901234567890", false).unwrap();
        assert_eq!(big.to_string(), "123456789012345678901234567890");

        let small = parse_bigdecimal_literal_str(
            "0.0000000000000000000000000000000000000001",
            true,
        )
        .unwrap();
        let (unscaled, scale) = small.as_bigint_and_exponent();
        assert_eq!((unscaled, scale), (num_bigint::BigInt::from(1), 40));
    }

    #[test]
    fn error_display_matches_kinds() {
        let err = parse_double_str("bogus").unwrap_err();
        assert_eq!(err.kind, ParseNumberErrorKind::SyntaxError);
        assert_eq!(err.to_string(), "illegal syntax");
    }
}
