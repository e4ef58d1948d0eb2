//! Scanner for decimal floating-point literals (Java dialect).
//!
//! One forward pass over the window extracts sign, significand digit
//! ranges, the virtual radix point, the exponent, and an optional type
//! suffix. Grammar deviations accumulate in an `illegal` flag that is
//! checked once at the end, so the hot loop never branches on errors.
//!
//! The dialect accepted here is the permissive float-literal grammar:
//! surrounding whitespace, `+`/`-` signs, unlimited leading zeroes,
//! `3.` and `.5` forms, `e`/`E` exponents, an optional `f|F|d|D` type
//! suffix, the `NaN` and `Infinity` keywords, and `0x…p…` hexadecimal
//! floats (handed off to [`crate::hex_float`]). For the JSON-restricted
//! grammar see [`crate::json`].

use numscan_core::CodeUnits;
use tracing::trace;

use crate::error::{ParseNumberError, Result};
use crate::hex_float;
use crate::rounding::{self, RawFloat};
use crate::scan::{is_digit, render_digits, skip_whitespace, u, unit_or_zero};
use crate::MAX_EXPONENT_NUMBER;

/// Smallest 19-digit integer; the truncation re-parse keeps appending
/// digits while the significand is still below this.
pub(crate) const MINIMAL_NINETEEN_DIGIT_INTEGER: u64 = 1_000_000_000_000_000_000;

/// Parses a float literal in `[offset, end)`. The window has already
/// been bounds-checked.
pub(crate) fn parse_float_literal<B: CodeUnits + ?Sized, F: RawFloat>(
    buf: &B,
    offset: usize,
    end: usize,
) -> Result<F> {
    let mut index = skip_whitespace(buf, offset, end);
    if index == end {
        return Err(ParseNumberError::syntax());
    }
    let mut ch = buf.unit(index);

    // Optional sign; something must follow it.
    let is_negative = ch == u(b'-');
    if is_negative || ch == u(b'+') {
        index += 1;
        ch = unit_or_zero(buf, index, end);
        if ch == 0 {
            return Err(ParseNumberError::syntax());
        }
    }

    if ch == u(b'N') {
        return parse_nan(buf, index, end);
    }
    if ch == u(b'I') {
        return parse_infinity(buf, index, end, is_negative);
    }

    // A leading zero may introduce a hexadecimal literal.
    if ch == u(b'0') {
        let next = unit_or_zero(buf, index + 1, end);
        if next == u(b'x') || next == u(b'X') {
            return hex_float::parse_hex_float_literal(buf, index + 2, end, is_negative);
        }
    }

    parse_decimal_float_literal(buf, index, end, is_negative)
}

fn parse_decimal_float_literal<B: CodeUnits + ?Sized, F: RawFloat>(
    buf: &B,
    start: usize,
    end: usize,
    is_negative: bool,
) -> Result<F> {
    let mut index = start;
    let mut ch = 0u16;
    let mut illegal = false;

    // Significand digits, with the radix point folded into a virtual
    // exponent. Overflow beyond 19 digits is repaired by the re-parse
    // below, so the accumulation may wrap freely.
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
            // Fractions are the common long tail; take eight digits per
            // step while they last.
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

    // Optional decimal exponent. The accumulator saturates; the
    // combined exponent still uses the unsaturated point shift.
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

    // Optional type suffix, then trailing whitespace.
    if ch == u(b'd') || ch == u(b'D') || ch == u(b'f') || ch == u(b'F') {
        index += 1;
    }
    index = skip_whitespace(buf, index, end);

    if illegal || index < end || digit_count == 0 {
        return Err(ParseNumberError::syntax());
    }

    // More than 19 digits cannot be exact in a u64: re-parse the first
    // 19 and note whether anything was left over.
    let (truncated, truncated_exponent) = if digit_count > 19 {
        trace!(digit_count, "re-parsing truncated significand");
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

/// `NaN`, case-sensitive, cursor on the `N`. The sign is ignored.
fn parse_nan<B: CodeUnits + ?Sized, F: RawFloat>(buf: &B, index: usize, end: usize) -> Result<F> {
    if index + 2 < end && buf.unit(index + 1) == u(b'a') && buf.unit(index + 2) == u(b'N') {
        let rest = skip_whitespace(buf, index + 3, end);
        if rest == end {
            return Ok(F::NAN);
        }
    }
    Err(ParseNumberError::syntax())
}

/// `Infinity`, case-sensitive, cursor on the `I`.
fn parse_infinity<B: CodeUnits + ?Sized, F: RawFloat>(
    buf: &B,
    index: usize,
    end: usize,
    is_negative: bool,
) -> Result<F> {
    const TAIL: &[u8; 7] = b"nfinity";
    if index + 8 <= end
        && TAIL
            .iter()
            .enumerate()
            .all(|(i, &b)| buf.unit(index + 1 + i) == u(b))
    {
        let rest = skip_whitespace(buf, index + 8, end);
        if rest == end {
            return Ok(if is_negative {
                F::NEG_INFINITY
            } else {
                F::INFINITY
            });
        }
    }
    Err(ParseNumberError::syntax())
}

#[cfg(test)]
mod tests {
    use crate::{parse_double, parse_double_str, parse_float_str};

    fn ok(text: &str) -> f64 {
        match parse_double_str(text) {
            Ok(value) => value,
            Err(err) => panic!("{text:?} failed: {err}"),
        }
    }

    fn bits(text: &str) -> u64 {
        ok(text).to_bits()
    }

    fn fails(text: &str) {
        assert!(parse_double_str(text).is_err(), "{text:?} should fail");
    }

    #[test]
    fn plain_literals() {
        assert_eq!(ok("0"), 0.0);
        assert_eq!(ok("1"), 1.0);
        assert_eq!(ok("1.2"), 1.2);
        assert_eq!(ok("1.2e3"), 1200.0);
        assert_eq!(ok("1.2E3"), 1200.0);
        assert_eq!(ok("1.2e-3"), 1.2e-3);
        assert_eq!(ok("1.2e+3"), 1200.0);
        assert_eq!(ok("1234567890"), 1234567890.0);
    }

    #[test]
    fn signs() {
        assert_eq!(ok("+1.2e3"), 1200.0);
        assert_eq!(ok("-1.2e3"), -1200.0);
        assert_eq!(bits("-0"), (-0.0f64).to_bits());
        assert_eq!(bits("+0"), 0.0f64.to_bits());
    }

    #[test]
    fn leading_zeroes_are_permitted() {
        assert_eq!(ok("007"), 7.0);
        assert_eq!(ok("00"), 0.0);
        assert_eq!(ok("03"), 3.0);
        assert_eq!(ok("000000000"), 0.0);
        assert_eq!(ok("0000.0000"), 0.0);
    }

    #[test]
    fn bare_point_forms() {
        assert_eq!(ok("3."), 3.0);
        assert_eq!(ok(".5"), 0.5);
        assert_eq!(ok("-.5"), -0.5);
        fails(".");
        fails(". z");
    }

    #[test]
    fn type_suffixes() {
        assert_eq!(ok("1d"), 1.0);
        assert_eq!(ok("1.2D"), 1.2);
        assert_eq!(ok("1f"), 1.0);
        assert_eq!(ok("-1.2e-3F"), -1.2e-3);
        assert_eq!(ok("1.2e3d "), 1200.0);
        fails("1.2e3z");
        fails("1.2e3dd");
    }

    #[test]
    fn surrounding_whitespace() {
        assert_eq!(ok(" 1.2e3"), 1200.0);
        assert_eq!(ok("1.2e3  "), 1200.0);
        assert_eq!(ok("   1.2e3   "), 1200.0);
        assert_eq!(ok("   3"), 3.0);
        assert_eq!(ok("\n42\t"), 42.0);
        fails("");
        fails("   ");
        fails("45\ne6"); // interior whitespace splits the literal
        fails("-0. 5");
    }

    #[test]
    fn named_values() {
        assert!(ok("NaN").is_nan());
        assert!(ok("+NaN").is_nan());
        assert!(ok("-NaN").is_nan());
        assert!(ok(" NaN ").is_nan());
        assert_eq!(ok("Infinity"), f64::INFINITY);
        assert_eq!(ok("+Infinity"), f64::INFINITY);
        assert_eq!(ok("-Infinity"), f64::NEG_INFINITY);
        fails("nan");
        fails("Nan");
        fails("Na");
        fails("NaNf");
        fails("infinity");
        fails("Infinit");
        fails("InfinitY");
        fails("+Infinityd");
        fails("NaNInfinity");
    }

    #[test]
    fn malformed_literals() {
        fails("+");
        fails("-");
        fails("+e");
        fails("+e123");
        fails("3e");
        fails("3E");
        fails("3e+");
        fails("3E-");
        fails("3e   ");
        fails("d");
        fails(".f");
        fails("78 e9");
        fails("- 1");
        fails("1..2");
        fails("7_8e90");
        fails("12e3_4");
        fails("0x3"); // hex requires a binary exponent
        fails("0X3");
    }

    #[test]
    fn exponent_magnitudes_saturate() {
        // Exponent magnitudes beyond i32::MAX saturate instead of
        // wrapping, so these stay well-defined.
        assert_eq!(ok(&format!("1e{}", u64::from(u32::MAX) * 2)), f64::INFINITY);
        assert_eq!(ok(&format!("1e-{}", u64::from(u32::MAX) * 2)), 0.0);
        assert_eq!(ok("1e2147483647"), f64::INFINITY);
    }

    #[test]
    fn twenty_significant_digits() {
        assert_eq!(ok("12345678901234567890"), 12345678901234567890.0);
        assert_eq!(bits("1234567890.1234567890"), 1234567890.1234567890f64.to_bits());
    }

    #[test]
    fn long_significands_round_correctly() {
        let cases = [
            "9007199254740993".to_string(), // 2^53 + 1
            "2.2250738585072011e-308".to_string(), // near the subnormal boundary
            "2.2250738585072012e-308".to_string(),
            format!("0.{}1", "0".repeat(400)),
            format!("1{}e-600", "0".repeat(600)),
            "3.141592653589793238462643383279502884197169399375105820974944592307816406286".to_string(),
        ];
        for text in cases {
            assert_eq!(bits(&text), text.parse::<f64>().unwrap().to_bits(), "{text}");
        }
    }

    #[test]
    fn a_million_nines_is_infinity() {
        let text = "9".repeat(1_000_000);
        assert_eq!(ok(&text), f64::INFINITY);
        assert_eq!(parse_float_str(&text), Ok(f32::INFINITY));
    }

    #[test]
    fn non_ascii_in_digits_is_rejected() {
        fails("12345678901234567890￡");
        fails("１２３"); // fullwidth digits
        fails("12\u{660}3"); // arabic-indic digit
    }

    #[test]
    fn windowed_parses_respect_offsets() {
        let buf = b"x1y".as_slice();
        assert_eq!(parse_double(buf, 1, 1), Ok(1.0));
        let buf = b"xx-0.5yyy".as_slice();
        assert_eq!(parse_double(buf, 2, 4), Ok(-0.5));
        assert!(parse_double(buf, 2, 5).is_err()); // window ends in 'y'
    }

    #[test]
    fn utf16_input_parses_identically() {
        for text in ["1.2e3", "-0.5", " 42 ", "9007199254740993", "NaN"] {
            let units: Vec<u16> = text.encode_utf16().collect();
            let from_units = crate::parse_double(units.as_slice(), 0, units.len());
            let from_bytes = parse_double_str(text);
            match (from_units, from_bytes) {
                (Ok(a), Ok(b)) => assert_eq!(a.to_bits(), b.to_bits(), "{text}"),
                (a, b) => panic!("{text}: {a:?} vs {b:?}"),
            }
        }
    }

    #[test]
    fn float_narrowing_is_correct() {
        assert_eq!(parse_float_str("1.2e3"), Ok(1200.0f32));
        assert_eq!(parse_float_str("3.4028236e38"), Ok(f32::INFINITY));
        assert_eq!(
            parse_float_str("16777217").map(f32::to_bits), // 2^24 + 1
            Ok(16777216.0f32.to_bits())
        );
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(256))]

            /// Every literal std accepts that is also in our grammar
            /// must round identically.
            #[test]
            fn agrees_with_std_f64(
                sig in any::<u64>(),
                frac in 0u32..=9_999_999,
                exp in -400i64..400,
            ) {
                let text = format!("{sig}.{frac:07}e{exp}");
                let expected: f64 = text.parse().unwrap();
                prop_assert_eq!(ok(&text).to_bits(), expected.to_bits(), "{}", text);
            }

            #[test]
            fn agrees_with_std_f32(
                sig in any::<u32>(),
                exp in -60i64..60,
            ) {
                let text = format!("{sig}e{exp}");
                let expected: f32 = text.parse().unwrap();
                let got = parse_float_str(&text).unwrap();
                prop_assert_eq!(got.to_bits(), expected.to_bits(), "{}", text);
            }
        }
    }
}
