//! Codec error taxonomy.
//!
//! Every failure a codec call can produce is a variant of [`CodecError`].
//! All errors are fatal for the current call only; the registry stays usable.

use std::fmt;

use thiserror::Error;

use crate::value::Kind;

/// Result type for codec operations.
pub type CodecResult<T> = std::result::Result<T, CodecError>;

/// Which walk hit the recursion bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Import,
    Encode,
    Decode,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Import => "import",
            Direction::Encode => "encode",
            Direction::Decode => "decode",
        })
    }
}

fn member(in_array: &bool) -> &'static str {
    if *in_array {
        "array member "
    } else {
        ""
    }
}

/// Errors raised by schema import, encode, and decode.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// An array-typed field was given a non-sequence value.
    #[error("field:{field} expect table, not {kind}")]
    BadArrayType { field: String, kind: Kind },

    /// An array field held more elements than the `u16` count prefix can carry.
    #[error("field:{field} array size more than 0xffff")]
    BadArraySize { field: String },

    /// A value's kind did not match the field's type.
    #[error("field:{field} {}expect {expect}, not {kind}", member(.in_array))]
    BadField {
        field: String,
        in_array: bool,
        expect: &'static str,
        kind: Kind,
    },

    /// An integer outside the varint7 range `[-(2^56-1), 2^56-1]`.
    #[error("field:{field} {}int out of range, {value}", member(.in_array))]
    BadInt {
        field: String,
        in_array: bool,
        value: i64,
    },

    /// A string longer than the `u16` length prefix can carry.
    #[error("field:{field} string size more than 0xffff:{size}")]
    BadString { field: String, size: usize },

    /// A schema field carried a type code outside the known enumeration.
    #[error("unknown field:{field}, type:{code}")]
    BadType { field: String, code: i64 },

    /// The byte buffer ran out mid-read, or a varint tag was malformed.
    #[error("invalid message")]
    BadDecode,

    /// Recursion exceeded [`MAX_DEPTH`](crate::constants::MAX_DEPTH).
    #[error("pto {direction} too depth")]
    TooDepth { direction: Direction },

    /// No protocol registered under the requested id.
    #[error("no such pto:{id}")]
    NoSuchPto { id: u16 },

    /// Decode finished with bytes left over.
    #[error("decode protocol:{protocol} error")]
    Trailing { protocol: String },

    /// Attempted to register a protocol at the reserved id `0xFFFF`.
    #[error("id must less than 0xffff")]
    BadPtoId,

    /// The schema value tree was structurally malformed.
    #[error("bad schema: {reason}")]
    BadSchema { reason: String },
}
