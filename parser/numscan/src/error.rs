//! Error type for the public parsing operations.
//!
//! Internal routines signal failures with sentinels (`Option`, scanner
//! `illegal` flags); only the public boundary converts them into a
//! [`ParseNumberError`]. Partial results are never exposed.

use std::error::Error;
use std::fmt;

/// Why a parse operation failed.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ParseNumberErrorKind {
    /// The caller's window falls outside the buffer or exceeds
    /// [`MAX_INPUT_LENGTH`](crate::MAX_INPUT_LENGTH). Reported eagerly,
    /// before any scanning.
    IllegalOffsetOrLength,
    /// The window does not match the grammar.
    SyntaxError,
    /// The literal is syntactically fine but `digit_count` or the
    /// combined exponent exceeds a grammar ceiling.
    ValueExceedsLimits,
}

/// A failed parse of a numeric literal.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct ParseNumberError {
    /// WHAT went wrong.
    pub kind: ParseNumberErrorKind,
}

impl ParseNumberError {
    pub(crate) fn illegal_window() -> Self {
        ParseNumberError {
            kind: ParseNumberErrorKind::IllegalOffsetOrLength,
        }
    }

    pub(crate) fn syntax() -> Self {
        ParseNumberError {
            kind: ParseNumberErrorKind::SyntaxError,
        }
    }

    pub(crate) fn value_exceeds_limits() -> Self {
        ParseNumberError {
            kind: ParseNumberErrorKind::ValueExceedsLimits,
        }
    }
}

impl fmt::Display for ParseNumberError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self.kind {
            ParseNumberErrorKind::IllegalOffsetOrLength => "illegal offset or illegal length",
            ParseNumberErrorKind::SyntaxError => "illegal syntax",
            ParseNumberErrorKind::ValueExceedsLimits => "value exceeds limits",
        };
        f.write_str(message)
    }
}

impl Error for ParseNumberError {}

pub(crate) type Result<T> = std::result::Result<T, ParseNumberError>;
