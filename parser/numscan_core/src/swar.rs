//! Word-parallel digit blocks ("SWAR": SIMD within a register).
//!
//! Every routine here is a pure function of a packed word. Eight ASCII
//! code units are processed as one `u64` (four as one `u32`), using
//! carry-free range checks and multiply-shift collapses instead of
//! per-byte branches. Buffer loading and the 8-bit/16-bit distinction
//! live in [`crate::input`]; this module never touches a slice except
//! for the hex-nibble table.
//!
//! # Technique
//!
//! Validation: `word - 0x3030…` underflows the high bit of every byte
//! lane that is below `'0'`, and `word + 0x4646…` overflows the high bit
//! of every lane above `'9'`. ORing the two and masking `0x8080…` yields
//! zero exactly when all eight lanes are ASCII digits.
//!
//! Decoding: after subtracting the all-`'0'` pattern, `v·10 + (v >> 8)`
//! collapses adjacent digit pairs into two-digit values, and a pair of
//! multiply-shifts collapses pairs into quads and quads into the final
//! packed integer in `[0, 99_999_999]`.

/// All-`'0'` pattern for eight byte lanes.
const ZEROES: u64 = 0x3030_3030_3030_3030;

/// Returns `true` if all eight byte lanes of `word` are ASCII digits.
#[inline]
pub const fn is_eight_digits(word: u64) -> bool {
    let below = word.wrapping_sub(ZEROES);
    let above = word.wrapping_add(0x4646_4646_4646_4646);
    (below | above) & 0x8080_8080_8080_8080 == 0
}

/// Returns `true` if all eight byte lanes of `word` are ASCII `'0'`.
#[inline]
pub const fn is_eight_zeroes(word: u64) -> bool {
    word == ZEROES
}

/// Decodes eight ASCII digits packed in `word` (first digit in the
/// lowest byte) into an integer in `[0, 99_999_999]`.
///
/// # Contract
///
/// All eight lanes must be ASCII digits; use [`try_parse_eight_digits`]
/// for unvalidated input.
#[inline]
pub const fn parse_eight_digits(word: u64) -> u32 {
    const MASK: u64 = 0x0000_00FF_0000_00FF;
    const MUL1: u64 = 0x000F_4240_0000_0064; // 100 + (1_000_000 << 32)
    const MUL2: u64 = 0x0000_2710_0000_0001; // 1 + (10_000 << 32)
    let mut v = word.wrapping_sub(ZEROES);
    // Collapse digit pairs: lane k becomes 10·d[k] + d[k+1].
    v = v.wrapping_mul(10).wrapping_add(v >> 8);
    let v1 = (v & MASK).wrapping_mul(MUL1);
    let v2 = ((v >> 16) & MASK).wrapping_mul(MUL2);
    (v1.wrapping_add(v2) >> 32) as u32
}

/// Decodes eight ASCII digits, or returns `None` if any lane is not a
/// digit. The sentinel-free counterpart of the `-1`-returning routine in
/// byte-oriented parsers.
#[inline]
pub fn try_parse_eight_digits(word: u64) -> Option<u32> {
    if is_eight_digits(word) {
        Some(parse_eight_digits(word))
    } else {
        None
    }
}

/// Returns `true` if all four byte lanes of `word` are ASCII digits.
#[inline]
pub const fn is_four_digits(word: u32) -> bool {
    let below = word.wrapping_sub(0x3030_3030);
    let above = word.wrapping_add(0x4646_4646);
    (below | above) & 0x8080_8080 == 0
}

/// Decodes four ASCII digits packed in `word` (first digit in the
/// lowest byte) into an integer in `[0, 9999]`.
///
/// # Contract
///
/// All four lanes must be ASCII digits.
#[inline]
pub const fn parse_four_digits(word: u32) -> u32 {
    let mut v = word.wrapping_sub(0x3030_3030);
    v = v.wrapping_mul(10).wrapping_add(v >> 8);
    (v & 0xFF).wrapping_mul(100).wrapping_add((v >> 16) & 0xFF)
}

/// Decodes four ASCII digits, or returns `None` if any lane is not a digit.
#[inline]
pub fn try_parse_four_digits(word: u32) -> Option<u32> {
    if is_four_digits(word) {
        Some(parse_four_digits(word))
    } else {
        None
    }
}

const INVALID_HEX: i8 = -1;

/// Maps a byte to its hex-digit value, `-1` for non-hex-digit bytes.
static HEX_VALUES: [i8; 256] = {
    let mut table = [INVALID_HEX; 256];
    let mut b = 0usize;
    while b < 256 {
        table[b] = match b as u8 {
            b'0'..=b'9' => b as i8 - b'0' as i8,
            b'a'..=b'f' => b as i8 - b'a' as i8 + 10,
            b'A'..=b'F' => b as i8 - b'A' as i8 + 10,
            _ => INVALID_HEX,
        };
        b += 1;
    }
    table
};

/// Hex value of a single code unit, `-1` if it is not a hex digit.
/// Units above U+00FF are never hex digits.
#[inline]
pub fn hex_digit_value(unit: u16) -> i8 {
    if unit > 0xFF {
        INVALID_HEX
    } else {
        HEX_VALUES[unit as usize]
    }
}

/// Decodes eight hex digits (first digit in `chunk[0]`, i.e. the most
/// significant nibble of the result) into a `u32`, or `None` if any byte
/// is not a hex digit.
///
/// The invalid case is detected once after the loop by folding the table
/// sentinels, keeping the hot path free of per-digit branches.
#[inline]
pub fn try_parse_eight_hex_digits(chunk: [u8; 8]) -> Option<u32> {
    let mut value: u32 = 0;
    let mut folded: i8 = 0;
    let mut i = 0;
    while i < 8 {
        let nibble = HEX_VALUES[chunk[i] as usize];
        folded |= nibble;
        value = (value << 4) | (nibble as u32 & 0xF);
        i += 1;
    }
    if folded < 0 {
        None
    } else {
        Some(value)
    }
}

/// Compresses four 16-bit code units (unit `k` at bits `16k..16k+16`)
/// into four bytes, or `None` if any unit is above U+00FF.
///
/// Two of these loads side by side turn eight UTF-16 units into the
/// same packed word the 8-bit routines consume.
#[inline]
pub fn pack_four_units(word: u64) -> Option<u32> {
    if word & 0xFF00_FF00_FF00_FF00 != 0 {
        return None;
    }
    let v = (word | (word >> 8)) & 0x0000_FFFF_0000_FFFF;
    let v = (v | (v >> 16)) & 0xFFFF_FFFF;
    Some(v as u32)
}
