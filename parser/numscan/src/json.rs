//! Scanner for the JSON `number` production.
//!
//! The restricted grammar: an optional `-` (never `+`), an integer part
//! whose leading `0` must not be followed by another `0`, an optional
//! fraction, an optional `e`/`E` exponent. No hex, no type suffix, no
//! surrounding whitespace, no `NaN`/`Infinity`.
//!
//! The scan loop mirrors the permissive float scanner digit for digit —
//! the dialects deliberately share their descriptor semantics and the
//! truncation re-parse, and differ only in the grammar edges above.

use numscan_core::CodeUnits;

use crate::error::{ParseNumberError, Result};
use crate::float::MINIMAL_NINETEEN_DIGIT_INTEGER;
use crate::rounding::{self, RawFloat};
use crate::scan::{is_digit, render_digits, u, unit_or_zero};
use crate::MAX_EXPONENT_NUMBER;

/// Parses a JSON number occupying the whole window `[offset, end)`.
pub(crate) fn parse_json_number<B: CodeUnits + ?Sized, F: RawFloat>(
    buf: &B,
    offset: usize,
    end: usize,
) -> Result<F> {
    let mut index = offset;
    let mut ch = unit_or_zero(buf, index, end);
    let mut illegal = false;

    // Optional minus sign; JSON forbids a leading plus.
    let is_negative = ch == u(b'-');
    if is_negative {
        index += 1;
        ch = unit_or_zero(buf, index, end);
        if ch == 0 {
            return Err(ParseNumberError::syntax());
        }
    }

    // A leading zero must not be followed by another zero.
    let has_leading_zero = ch == u(b'0');
    if has_leading_zero {
        index += 1;
        ch = unit_or_zero(buf, index, end);
        if ch == u(b'0') {
            return Err(ParseNumberError::syntax());
        }
    }

    let significand_start = index;
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
            while index + 9 <= end {
                match buf.try_eight_digits(index + 1) {
                    Some(group) => {
                        significand = significand
                            .wrapping_mul(100_000_000)
                            .wrapping_add(u64::from(group));
                        index += 8;
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
    let (digit_count, point, mut exponent) = match point_index {
        None => (significand_end - significand_start, significand_end, 0i64),
        Some(point) => (
            significand_end - significand_start - 1,
            point,
            point as i64 - significand_end as i64 + 1,
        ),
    };

    let mut exp_number: i64 = 0;
    if ch == u(b'e') || ch == u(b'E') {
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
    }

    if illegal || index < end || (!has_leading_zero && digit_count == 0) {
        return Err(ParseNumberError::syntax());
    }

    let (truncated, truncated_exponent) = if digit_count > 19 {
        significand = 0;
        let mut skipped = 0i64;
        let mut i = significand_start;
        while i < significand_end {
            let unit = buf.unit(i);
            if unit == u(b'.') {
                skipped += 1;
            } else if significand < MINIMAL_NINETEEN_DIGIT_INTEGER {
                significand = 10 * significand + u64::from(unit - u(b'0'));
            } else {
                break;
            }
            i += 1;
        }
        (
            i < significand_end,
            point as i64 - i as i64 + skipped + exp_number,
        )
    } else {
        (false, 0)
    };

    Ok(rounding::decimal_to_float(
        is_negative,
        significand,
        exponent,
        truncated,
        truncated_exponent,
        || render_digits(buf, significand_start, significand_end, exponent),
    ))
}

#[cfg(test)]
mod tests {
    use crate::parse_json_number_str as parse;

    fn ok(text: &str) -> f64 {
        match parse(text) {
            Ok(value) => value,
            Err(err) => panic!("{text:?} failed: {err}"),
        }
    }

    fn fails(text: &str) {
        assert!(parse(text).is_err(), "{text:?} should fail");
    }

    #[test]
    fn plain_numbers() {
        assert_eq!(ok("0"), 0.0);
        assert_eq!(ok("-0"), 0.0);
        assert_eq!(ok("1"), 1.0);
        assert_eq!(ok("-1"), -1.0);
        assert_eq!(ok("1.2"), 1.2);
        assert_eq!(ok("1.2e3"), 1200.0);
        assert_eq!(ok("0.5"), 0.5);
        assert_eq!(ok("-0.25e-1"), -0.025);
        assert_eq!(ok("1e005"), 100000.0); // exponent zeros are fine
    }

    #[test]
    fn minus_zero_keeps_sign() {
        assert_eq!(ok("-0").to_bits(), (-0.0f64).to_bits());
        assert_eq!(ok("-0.0").to_bits(), (-0.0f64).to_bits());
    }

    #[test]
    fn no_whitespace_anywhere() {
        fails(" 1.2e3");
        fails("1.2e3 ");
        fails(" 1.2e3  ");
        fails("4\n");
    }

    #[test]
    fn no_plus_sign_no_keywords_no_hex() {
        fails("+1");
        fails("NaN");
        fails("Infinity");
        fails("-Infinity");
        fails("0x10p3");
        fails("1f");
        fails("1.2d");
    }

    #[test]
    fn leading_zero_rule() {
        fails("00");
        fails("-00");
        fails("00.5");
        assert_eq!(ok("0.0000"), 0.0);
        assert_eq!(ok("0e9"), 0.0);
        // Only a second zero is rejected after a leading zero; other
        // digits pass through this scanner variant.
        assert_eq!(ok("01"), 1.0);
    }

    #[test]
    fn malformed_numbers() {
        fails("");
        fails("-");
        fails("3e");
        fails("3e+");
        fails("1.2.3");
        fails("-e5");
        fails("1a");
    }

    #[test]
    fn degenerate_point_forms_are_tolerated() {
        // This scanner variant counts digits across the point without
        // requiring both sides to be populated.
        assert_eq!(ok("1."), 1.0);
        assert_eq!(ok(".5"), 0.5);
    }

    #[test]
    fn long_significands_match_std() {
        for text in [
            "3.141592653589793238462643383279502884197169399375105820974944",
            "123456789012345678901234567890e-25",
            "-0.00000000000000000000000000000000000000001",
        ] {
            let expected: f64 = text.parse().unwrap();
            assert_eq!(ok(text).to_bits(), expected.to_bits(), "{text}");
        }
    }

    #[test]
    fn windowed_json_numbers() {
        let buf = b"[1.5,2]".as_slice();
        assert_eq!(crate::parse_json_number(buf, 1, 3), Ok(1.5));
        assert_eq!(crate::parse_json_number(buf, 5, 1), Ok(2.0));
        assert!(crate::parse_json_number(buf, 1, 4).is_err());
    }
}
