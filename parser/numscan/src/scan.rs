//! Primitives shared by the literal scanners.
//!
//! Every scanner is a single forward pass that reads `ch = buf[index]`
//! with an end-of-window sentinel of `0`, accumulates an `illegal` flag
//! instead of branching per character, and checks completeness once at
//! the end. These helpers keep that style uniform across the decimal
//! float, hex float, JSON, big-integer, and big-decimal variants.

use numscan_core::CodeUnits;

/// The code unit at `index`, or `0` past the window end.
///
/// `0` can never be part of a literal, so it doubles as the scanners'
/// end sentinel, mirroring the `index < end ? str[index] : 0` reads of
/// byte-oriented parsers.
#[inline]
pub(crate) fn unit_or_zero<B: CodeUnits + ?Sized>(buf: &B, index: usize, end: usize) -> u16 {
    if index < end {
        buf.unit(index)
    } else {
        0
    }
}

/// Returns `true` for ASCII `'0'..='9'`.
#[inline]
pub(crate) fn is_digit(ch: u16) -> bool {
    ch.wrapping_sub(u16::from(b'0')) < 10
}

/// Widened byte constant, for comparing units against ASCII characters.
#[inline]
pub(crate) fn u(ch: u8) -> u16 {
    u16::from(ch)
}

/// Skips code units at or below U+0020 and returns the new index.
///
/// The Java float grammar treats everything at or below the space
/// character as ignorable surrounding whitespace.
#[inline]
pub(crate) fn skip_whitespace<B: CodeUnits + ?Sized>(
    buf: &B,
    mut index: usize,
    end: usize,
) -> usize {
    while index < end && buf.unit(index) <= 0x20 {
        index += 1;
    }
    index
}

/// Skips ASCII `'0'` runs, eight units at a time where possible, and
/// returns the index of the first non-zero unit (or `end`).
#[inline]
pub(crate) fn skip_zeroes<B: CodeUnits + ?Sized>(buf: &B, mut index: usize, end: usize) -> usize {
    let swar_limit = end.saturating_sub(8);
    while index < swar_limit && buf.is_eight_zeroes(index) {
        index += 8;
    }
    while index < end && buf.unit(index) == u(b'0') {
        index += 1;
    }
    index
}

/// Returns `Ok(())` when `[from, to)` holds only ASCII digits, checking
/// eight units per step where possible.
pub(crate) fn check_digits<B: CodeUnits + ?Sized>(
    buf: &B,
    mut from: usize,
    to: usize,
) -> crate::error::Result<()> {
    while from + 8 <= to {
        if !buf.is_eight_digits(from) {
            return Err(crate::error::ParseNumberError::syntax());
        }
        from += 8;
    }
    while from < to {
        if !is_digit(buf.unit(from)) {
            return Err(crate::error::ParseNumberError::syntax());
        }
        from += 1;
    }
    Ok(())
}

/// Renders the digits of `[from, to)` (skipping at most one radix
/// point) followed by `e<exponent>`: the canonical form handed to the
/// correctly rounded fallback parser when a significand was truncated.
pub(crate) fn render_digits<B: CodeUnits + ?Sized>(
    buf: &B,
    from: usize,
    to: usize,
    exponent: i64,
) -> String {
    let mut rendered = String::with_capacity(to - from + 8);
    for index in from..to {
        let unit = buf.unit(index);
        if unit != u(b'.') {
            rendered.push(char::from(unit as u8));
        }
    }
    rendered.push('e');
    rendered.push_str(&exponent.to_string());
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_or_zero_returns_sentinel_past_end() {
        let buf = b"12".as_slice();
        assert_eq!(unit_or_zero(buf, 0, 2), u(b'1'));
        assert_eq!(unit_or_zero(buf, 1, 2), u(b'2'));
        assert_eq!(unit_or_zero(buf, 2, 2), 0);
        assert_eq!(unit_or_zero(buf, 1, 1), 0); // window end before buffer end
    }

    #[test]
    fn digit_classification() {
        for b in 0u8..=255 {
            assert_eq!(is_digit(u(b)), b.is_ascii_digit(), "{b:#x}");
        }
        assert!(!is_digit(0xFF10)); // fullwidth digit zero
    }

    #[test]
    fn whitespace_skipping_is_at_or_below_space() {
        let buf = b" \t\n\r 7 ".as_slice();
        assert_eq!(skip_whitespace(buf, 0, buf.len()), 5);
        assert_eq!(skip_whitespace(buf, 5, buf.len()), 5);
        assert_eq!(skip_whitespace(buf, 6, buf.len()), 7);
    }

    #[test]
    fn zero_skipping_handles_long_runs() {
        let text = format!("{}123", "0".repeat(29));
        let buf = text.as_bytes();
        assert_eq!(skip_zeroes(buf, 0, buf.len()), 29);
        let all_zeroes = "0".repeat(40);
        assert_eq!(skip_zeroes(all_zeroes.as_bytes(), 0, 40), 40);
        assert_eq!(skip_zeroes(b"12".as_slice(), 0, 2), 0);
    }

    #[test]
    fn digit_checking_rejects_interior_garbage() {
        assert!(check_digits(b"123456789012345".as_slice(), 0, 15).is_ok());
        assert!(check_digits(b"12345678901234x".as_slice(), 0, 15).is_err());
        assert!(check_digits(b"x23456789012345".as_slice(), 0, 15).is_err());
        assert!(check_digits(b"".as_slice(), 0, 0).is_ok());
    }

    #[test]
    fn rendering_strips_the_point() {
        let buf = b"12.345".as_slice();
        assert_eq!(render_digits(buf, 0, 6, -3), "12345e-3");
        assert_eq!(render_digits(buf, 0, 2, 7), "12e7");
    }
}
