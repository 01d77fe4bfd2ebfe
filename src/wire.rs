//! # Wire Primitives - Byte-Level Read/Write
//!
//! ## Purpose
//!
//! Byte-level building blocks shared by the encode and decode walks:
//! fixed-width little-endian scalars, `u16`-length-prefixed byte strings,
//! and the varint7 signed-integer codec. Everything above this module is
//! schema-directed; everything in it is plain bytes.
//!
//! ## Varint7
//!
//! Signed integers in `[-(2^56-1), 2^56-1]` encode in 1 to 8 bytes. Zero is
//! the single byte `0x00`. Any other value emits a tag byte
//! `(length << 1) | sign` (`sign` = 1 for positive) followed by `length`
//! little-endian magnitude bytes, where `length ∈ [1..7]` is minimal.
//!
//! Decoding rejects tags whose length exceeds 7: the accumulator is 64-bit
//! and a conforming encoder never produces them.

use smallvec::SmallVec;

use crate::constants::{ENCODE_BUFFER_SIZE, MAX_INT, MAX_STRING_LEN};
use crate::error::{CodecError, CodecResult};

/// Growable write buffer with a stack-resident inline region.
///
/// Writes go to the inline region until the message outgrows
/// [`ENCODE_BUFFER_SIZE`] bytes, then spill to a geometrically grown heap
/// allocation. The inline region is part of the writer itself and is never
/// freed.
pub struct WireWriter {
    buf: SmallVec<[u8; ENCODE_BUFFER_SIZE]>,
}

impl WireWriter {
    pub fn new() -> Self {
        Self {
            buf: SmallVec::new(),
        }
    }

    pub fn put_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    pub fn put_bool(&mut self, v: bool) {
        self.buf.push(v as u8);
    }

    pub fn put_u16(&mut self, v: u16) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn put_i16(&mut self, v: i16) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn put_f32(&mut self, v: f32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn put_f64(&mut self, v: f64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    /// `u16` length prefix followed by the raw bytes. The caller has already
    /// checked the length cap.
    pub fn put_str(&mut self, bytes: &[u8]) {
        debug_assert!(bytes.len() <= MAX_STRING_LEN);
        self.put_u16(bytes.len() as u16);
        self.buf.extend_from_slice(bytes);
    }

    /// Varint7 encoding. The caller has already range-checked `val`.
    pub fn put_varint(&mut self, val: i64) {
        debug_assert!((-MAX_INT..=MAX_INT).contains(&val));
        if val == 0 {
            self.put_u8(0);
            return;
        }
        let mag = val.unsigned_abs();
        let length = varint_magnitude_len(mag);
        let tag = ((length as u8) << 1) | (val > 0) as u8;
        self.put_u8(tag);
        self.buf.extend_from_slice(&mag.to_le_bytes()[..length]);
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The exact written byte range.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf.into_vec()
    }
}

impl Default for WireWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Minimal little-endian byte count for a nonzero magnitude, in `[1..7]`.
fn varint_magnitude_len(mag: u64) -> usize {
    (64 - mag.leading_zeros() as usize).div_ceil(8)
}

/// Bounds-checked read cursor over an input buffer.
///
/// Every read verifies `remaining >= needed` first; shortfall is
/// [`CodecError::BadDecode`]. The reader borrows the buffer and retains
/// nothing after the walk.
pub struct WireReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> WireReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn take(&mut self, n: usize) -> CodecResult<&'a [u8]> {
        if self.remaining() < n {
            return Err(CodecError::BadDecode);
        }
        let bytes = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    fn take_array<const N: usize>(&mut self) -> CodecResult<[u8; N]> {
        let bytes = self.take(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    pub fn get_u8(&mut self) -> CodecResult<u8> {
        Ok(self.take_array::<1>()?[0])
    }

    pub fn get_bool(&mut self) -> CodecResult<bool> {
        Ok(self.get_u8()? != 0)
    }

    pub fn get_u16(&mut self) -> CodecResult<u16> {
        Ok(u16::from_le_bytes(self.take_array()?))
    }

    pub fn get_i16(&mut self) -> CodecResult<i16> {
        Ok(i16::from_le_bytes(self.take_array()?))
    }

    pub fn get_f32(&mut self) -> CodecResult<f32> {
        Ok(f32::from_le_bytes(self.take_array()?))
    }

    pub fn get_f64(&mut self) -> CodecResult<f64> {
        Ok(f64::from_le_bytes(self.take_array()?))
    }

    /// Varint7 decoding; see the module docs for the format.
    pub fn get_varint(&mut self) -> CodecResult<i64> {
        let tag = self.get_u8()?;
        if tag == 0 {
            return Ok(0);
        }
        let length = (tag >> 1) as usize;
        if length > 7 {
            return Err(CodecError::BadDecode);
        }
        let bytes = self.take(length)?;
        let mut mag = [0u8; 8];
        mag[..length].copy_from_slice(bytes);
        let mag = u64::from_le_bytes(mag) as i64;
        Ok(if tag & 1 == 1 { mag } else { -mag })
    }

    /// `u16` length prefix followed by that many raw bytes.
    pub fn get_str(&mut self) -> CodecResult<&'a [u8]> {
        let len = self.get_u16()? as usize;
        self.take(len)
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// True once the cursor has consumed the whole buffer.
    pub fn is_exhausted(&self) -> bool {
        self.pos == self.buf.len()
    }
}
