//! # pto-codec - Schema-Driven Binary Message Codec
//!
//! ## Purpose
//!
//! A compact binary serialization codec for structured messages. Protocols
//! are registered in a [`Registry`] under a `u16` id as ordered, typed field
//! lists (including nested messages and arrays); records are encoded into a
//! self-delimiting byte sequence and decoded back into a [`Value`] tree.
//! The wire carries no type tags, no magic, and no outer length: the schema
//! alone determines the layout, and the decoder is told the id out of band.
//!
//! ## Wire Format
//!
//! All multi-byte values are little-endian:
//!
//! ```text
//! Bool      : u8 (0 or 1)
//! Short     : i16
//! Int       : varint7 (1-8 bytes, range ±(2^56 - 1))
//! Float     : f32 (IEEE 754 binary32)
//! Double    : f64 (IEEE 754 binary64)
//! String    : u16 length ; raw bytes
//! Message   : concatenation of child fields, in schema order
//! Array     : u16 count ; count element layouts back-to-back
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use pto_codec::{FieldType, Registry, Value};
//!
//! # fn main() -> pto_codec::CodecResult<()> {
//! // Schemas arrive as a value tree: a list of field descriptors.
//! let schema = Value::Array(vec![
//!     Value::from_fields([
//!         ("name", Value::from("id")),
//!         ("type", Value::Int(FieldType::Int as i64)),
//!         ("array", Value::Bool(false)),
//!     ]),
//!     Value::from_fields([
//!         ("name", Value::from("nick")),
//!         ("type", Value::Int(FieldType::String as i64)),
//!         ("array", Value::Bool(false)),
//!     ]),
//! ]);
//!
//! let mut registry = Registry::new();
//! registry.import(1, "player", &schema)?;
//!
//! let record = Value::from_fields([
//!     ("id", Value::Int(1007)),
//!     ("nick", Value::from("kaori")),
//! ]);
//! let bytes = registry.encode(1, &record)?;
//! assert_eq!(registry.decode(1, &bytes)?, record);
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`schema`] - protocol/field model, the id-keyed [`Registry`], schema import
//! - [`value`] - the dynamic [`Value`] tree the codec consumes and produces
//! - [`wire`] - byte-level primitives: fixed-width scalars, strings, varint7
//! - [`encoder`] / [`decoder`] - the schema-directed walks
//! - [`error`] - the [`CodecError`] taxonomy
//! - [`constants`] - wire-format limits
//!
//! ## Concurrency
//!
//! A registry is mutable only while schemas are being registered. Encode and
//! decode take `&self` and allocate only call-private state, so a populated
//! `&Registry` can be shared freely across threads.

pub mod constants;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod schema;
pub mod value;
pub mod wire;

pub use constants::{
    ENCODE_BUFFER_SIZE, INVALID_PTO_ID, MAX_ARRAY_LEN, MAX_DEPTH, MAX_INT, MAX_STRING_LEN,
};
pub use error::{CodecError, CodecResult, Direction};
pub use schema::{Field, FieldType, Protocol, Registry};
pub use value::{Kind, Value};
