//! # Protocol Constants - Codec Core Limits
//!
//! Central registry of protocol-level constants. These values define the wire
//! format limits and must remain stable: peers that disagree on any of them
//! cannot interoperate.

/// Maximum nesting depth for message fields.
///
/// Both the encode and decode walks are recursive; this bound keeps a
/// hostile or accidental deeply-nested schema from exhausting the stack.
/// Schema import enforces the same bound while walking the field tree.
pub const MAX_DEPTH: usize = 128;

/// Largest magnitude representable by the varint7 integer encoding.
///
/// The varint7 tag byte carries a length of at most 7, so the magnitude is
/// limited to 7 little-endian bytes: `2^56 - 1`. Values outside
/// `[-MAX_INT, MAX_INT]` are rejected at encode time.
pub const MAX_INT: i64 = 0x00ff_ffff_ffff_ffff;

/// Inline capacity of the encoder's write buffer, in bytes.
///
/// Encoding starts in a stack-resident region of this size and only touches
/// the heap when a message outgrows it. Most messages never do.
pub const ENCODE_BUFFER_SIZE: usize = 128;

/// Maximum element count of an array field (the count prefix is a `u16`).
pub const MAX_ARRAY_LEN: usize = 0xffff;

/// Maximum byte length of a string field (the length prefix is a `u16`).
pub const MAX_STRING_LEN: usize = 0xffff;

/// The one protocol id that can never be registered.
///
/// Valid ids cover `[0, 0xFFFF)`; `0xFFFF` is reserved as unreachable.
pub const INVALID_PTO_ID: u16 = 0xffff;
