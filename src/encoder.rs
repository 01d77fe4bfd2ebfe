//! # Encoder - Schema-Directed Serialization
//!
//! ## Purpose
//!
//! Walks a protocol's field list in order against an input record and emits
//! the wire bytes through a [`WireWriter`]. The schema alone determines the
//! layout; nothing on the wire is self-describing.
//!
//! ## Validation
//!
//! Every field is validated before any of its bytes are written: kind
//! mismatches, absent values, oversized arrays/strings, out-of-range
//! integers, and excessive message nesting all abort the call. The caller
//! never observes partial output; the buffer is discarded with the error.

use tracing::trace;

use crate::constants::{MAX_ARRAY_LEN, MAX_DEPTH, MAX_INT, MAX_STRING_LEN};
use crate::error::{CodecError, CodecResult, Direction};
use crate::schema::{Field, FieldType, Protocol};
use crate::value::{Kind, Value};
use crate::wire::WireWriter;

/// Encode `record` against `protocol`, returning the exact written bytes.
pub fn encode(protocol: &Protocol, record: &Value) -> CodecResult<Vec<u8>> {
    trace!(protocol = %protocol.name, "encode");
    if record.kind() != Kind::Table {
        return Err(CodecError::BadField {
            field: protocol.name.clone(),
            in_array: false,
            expect: "table",
            kind: record.kind(),
        });
    }
    let mut w = WireWriter::new();
    for field in &protocol.fields {
        encode_field(&mut w, field, record.get(&field.name), 1)?;
    }
    Ok(w.into_bytes())
}

fn encode_field(w: &mut WireWriter, field: &Field, value: &Value, depth: usize) -> CodecResult<()> {
    match field.ty {
        FieldType::Bool => encode_bool(w, field, value),
        FieldType::Short => encode_short(w, field, value),
        FieldType::Int => encode_int(w, field, value),
        FieldType::Float => encode_float(w, field, value),
        FieldType::Double => encode_double(w, field, value),
        FieldType::String => encode_string(w, field, value),
        FieldType::Message => encode_message(w, field, value, depth),
    }
}

fn bad_field(field: &Field, in_array: bool, kind: Kind) -> CodecError {
    CodecError::BadField {
        field: field.name.clone(),
        in_array,
        expect: field.ty.expect_name(),
        kind,
    }
}

/// Validate the sequence value, write its `u16` count, and hand back the
/// elements for per-element encoding.
fn begin_array<'v>(w: &mut WireWriter, field: &Field, value: &'v Value) -> CodecResult<&'v [Value]> {
    let items = value.as_array().ok_or_else(|| CodecError::BadArrayType {
        field: field.name.clone(),
        kind: value.kind(),
    })?;
    if items.len() > MAX_ARRAY_LEN {
        return Err(CodecError::BadArraySize {
            field: field.name.clone(),
        });
    }
    w.put_u16(items.len() as u16);
    Ok(items)
}

fn encode_bool(w: &mut WireWriter, field: &Field, value: &Value) -> CodecResult<()> {
    if field.array {
        for item in begin_array(w, field, value)? {
            let v = item.as_bool().ok_or_else(|| bad_field(field, true, item.kind()))?;
            w.put_bool(v);
        }
    } else {
        let v = value
            .as_bool()
            .ok_or_else(|| bad_field(field, false, value.kind()))?;
        w.put_bool(v);
    }
    Ok(())
}

fn encode_short(w: &mut WireWriter, field: &Field, value: &Value) -> CodecResult<()> {
    if field.array {
        for item in begin_array(w, field, value)? {
            let v = item.as_int().ok_or_else(|| bad_field(field, true, item.kind()))?;
            w.put_i16(v as i16);
        }
    } else {
        let v = value
            .as_int()
            .ok_or_else(|| bad_field(field, false, value.kind()))?;
        w.put_i16(v as i16);
    }
    Ok(())
}

fn encode_int(w: &mut WireWriter, field: &Field, value: &Value) -> CodecResult<()> {
    if field.array {
        for item in begin_array(w, field, value)? {
            let v = item.as_int().ok_or_else(|| bad_field(field, true, item.kind()))?;
            check_int_range(field, true, v)?;
            w.put_varint(v);
        }
    } else {
        let v = value
            .as_int()
            .ok_or_else(|| bad_field(field, false, value.kind()))?;
        check_int_range(field, false, v)?;
        w.put_varint(v);
    }
    Ok(())
}

fn check_int_range(field: &Field, in_array: bool, value: i64) -> CodecResult<()> {
    if !(-MAX_INT..=MAX_INT).contains(&value) {
        return Err(CodecError::BadInt {
            field: field.name.clone(),
            in_array,
            value,
        });
    }
    Ok(())
}

fn encode_float(w: &mut WireWriter, field: &Field, value: &Value) -> CodecResult<()> {
    if field.array {
        for item in begin_array(w, field, value)? {
            let v = item
                .as_float()
                .ok_or_else(|| bad_field(field, true, item.kind()))?;
            w.put_f32(v as f32);
        }
    } else {
        let v = value
            .as_float()
            .ok_or_else(|| bad_field(field, false, value.kind()))?;
        w.put_f32(v as f32);
    }
    Ok(())
}

fn encode_double(w: &mut WireWriter, field: &Field, value: &Value) -> CodecResult<()> {
    if field.array {
        for item in begin_array(w, field, value)? {
            let v = item
                .as_float()
                .ok_or_else(|| bad_field(field, true, item.kind()))?;
            w.put_f64(v);
        }
    } else {
        let v = value
            .as_float()
            .ok_or_else(|| bad_field(field, false, value.kind()))?;
        w.put_f64(v);
    }
    Ok(())
}

fn encode_string(w: &mut WireWriter, field: &Field, value: &Value) -> CodecResult<()> {
    if field.array {
        for item in begin_array(w, field, value)? {
            let bytes = item
                .as_bytes()
                .ok_or_else(|| bad_field(field, true, item.kind()))?;
            check_string_len(field, bytes.len())?;
            w.put_str(bytes);
        }
    } else {
        let bytes = value
            .as_bytes()
            .ok_or_else(|| bad_field(field, false, value.kind()))?;
        check_string_len(field, bytes.len())?;
        w.put_str(bytes);
    }
    Ok(())
}

fn check_string_len(field: &Field, size: usize) -> CodecResult<()> {
    if size > MAX_STRING_LEN {
        return Err(CodecError::BadString {
            field: field.name.clone(),
            size,
        });
    }
    Ok(())
}

fn encode_message(
    w: &mut WireWriter,
    field: &Field,
    value: &Value,
    depth: usize,
) -> CodecResult<()> {
    let depth = depth + 1;
    if depth > MAX_DEPTH {
        return Err(CodecError::TooDepth {
            direction: Direction::Encode,
        });
    }

    if field.array {
        for item in begin_array(w, field, value)? {
            if item.kind() != Kind::Table {
                return Err(bad_field(field, true, item.kind()));
            }
            for child in &field.children {
                encode_field(w, child, item.get(&child.name), depth)?;
            }
        }
    } else {
        if value.kind() != Kind::Table {
            return Err(bad_field(field, false, value.kind()));
        }
        for child in &field.children {
            encode_field(w, child, value.get(&child.name), depth)?;
        }
    }
    Ok(())
}
