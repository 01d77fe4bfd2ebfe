//! # Decoder - Schema-Directed Deserialization
//!
//! ## Purpose
//!
//! Walks a protocol's field list in order against a borrowed byte buffer and
//! builds a fresh keyed record. The same schema that produced the bytes must
//! drive the walk; the wire carries no type tags.
//!
//! ## Strictness
//!
//! Every primitive read is bounds-checked (`BadDecode` on shortfall), message
//! nesting is bounded at [`MAX_DEPTH`], and the cursor must land exactly on
//! the end of the buffer. Leftover bytes fail the whole call (`Trailing`).

use std::collections::HashMap;

use tracing::trace;

use crate::constants::MAX_DEPTH;
use crate::error::{CodecError, CodecResult, Direction};
use crate::schema::{Field, FieldType, Protocol};
use crate::value::Value;
use crate::wire::WireReader;

/// Decode `bytes` against `protocol` into a keyed record.
pub fn decode(protocol: &Protocol, bytes: &[u8]) -> CodecResult<Value> {
    trace!(protocol = %protocol.name, len = bytes.len(), "decode");
    let mut r = WireReader::new(bytes);
    let mut record = HashMap::with_capacity(protocol.fields.len());
    for field in &protocol.fields {
        let value = decode_field(&mut r, field, 1)?;
        record.insert(field.name.clone(), value);
    }
    if !r.is_exhausted() {
        return Err(CodecError::Trailing {
            protocol: protocol.name.clone(),
        });
    }
    Ok(Value::Table(record))
}

fn decode_field(r: &mut WireReader<'_>, field: &Field, depth: usize) -> CodecResult<Value> {
    if field.array {
        let count = r.get_u16()? as usize;
        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            items.push(decode_scalar(r, field, depth)?);
        }
        Ok(Value::Array(items))
    } else {
        decode_scalar(r, field, depth)
    }
}

fn decode_scalar(r: &mut WireReader<'_>, field: &Field, depth: usize) -> CodecResult<Value> {
    match field.ty {
        FieldType::Bool => Ok(Value::Bool(r.get_bool()?)),
        FieldType::Short => Ok(Value::Int(r.get_i16()? as i64)),
        FieldType::Int => Ok(Value::Int(r.get_varint()?)),
        FieldType::Float => Ok(Value::Float(r.get_f32()? as f64)),
        FieldType::Double => Ok(Value::Float(r.get_f64()?)),
        FieldType::String => Ok(Value::String(r.get_str()?.to_vec())),
        FieldType::Message => decode_message(r, field, depth),
    }
}

fn decode_message(r: &mut WireReader<'_>, field: &Field, depth: usize) -> CodecResult<Value> {
    let depth = depth + 1;
    if depth > MAX_DEPTH {
        return Err(CodecError::TooDepth {
            direction: Direction::Decode,
        });
    }
    let mut table = HashMap::with_capacity(field.children.len());
    for child in &field.children {
        table.insert(child.name.clone(), decode_field(r, child, depth)?);
    }
    Ok(Value::Table(table))
}
