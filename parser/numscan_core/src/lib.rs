//! Digit-sequence engine for the numscan literal parsers.
//!
//! This crate is the numeric half of numscan's two-layer architecture:
//! it converts ranges of ASCII digits into arbitrary-precision integers,
//! fast, and knows nothing about literal grammars. The scanning half
//! (the `numscan` crate) owns signs, radix points, exponents, suffixes,
//! and error reporting.
//!
//! # Architecture
//!
//! - [`input`] — zero-copy access to 8-bit and 16-bit code-unit buffers
//!   behind the sealed [`CodeUnits`] trait.
//! - [`swar`] — branchless eight-digit validation and decoding on packed
//!   64-bit words.
//! - [`significand`] — [`BigSignificand`], the in-place fixed-capacity
//!   accumulator of the iterative regime.
//! - [`pow10`] — the [`Pow10Cache`] of powers of ten with exponents that
//!   are multiples of 16, plus the [`split_floor_16`] midpoint rule that
//!   guarantees the cache covers every power a parse can request.
//! - [`digits`] — [`parse_digits`], selecting between packed, iterative,
//!   recursive, and fork-join parallel regimes by digit count.
//!
//! # Usage
//!
//! ```
//! use numscan_core::parse_digits;
//!
//! let text = "123456789012345678901234567890";
//! let value = parse_digits(text.as_bytes(), 0, text.len(), None, usize::MAX);
//! assert_eq!(value.to_string(), text);
//! ```

pub mod digits;
pub mod input;
pub mod pow10;
pub mod significand;
pub mod swar;

pub use digits::{parse_digits, DEFAULT_PARALLEL_THRESHOLD, RECURSION_THRESHOLD};
pub use input::CodeUnits;
pub use pow10::{pow10, split_floor_16, Pow10Cache};
pub use significand::BigSignificand;
