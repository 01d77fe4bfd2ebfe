//! # Schema Model - Protocols, Fields, and the Registry
//!
//! ## Purpose
//!
//! The immutable schema tree the codec walks: a [`Registry`] maps `u16`
//! protocol ids to [`Protocol`]s, each an ordered list of [`Field`]s,
//! where `Message` fields carry their own ordered child list. Field order is
//! significant: it is the wire order for both encode and decode.
//!
//! Schemas arrive either as a value tree through [`Registry::import`]
//! (the embedder-facing path) or as directly constructed [`Field`] trees
//! through [`Registry::register`].
//!
//! ## Ownership
//!
//! The registry owns its protocols, protocols own their top-level fields,
//! fields own their children. There are no shared or cyclic references;
//! dropping the registry releases the whole tree.

use std::collections::HashMap;

use num_enum::TryFromPrimitive;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{INVALID_PTO_ID, MAX_DEPTH};
use crate::decoder;
use crate::encoder;
use crate::error::{CodecError, CodecResult, Direction};
use crate::value::{Kind, Value};

/// Closed enumeration of field types. The discriminants are the wire codes
/// used by the schema import format.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, Serialize, Deserialize,
)]
#[repr(u8)]
pub enum FieldType {
    Bool = 0,
    Short = 1,
    Int = 2,
    Float = 3,
    Double = 4,
    String = 5,
    Message = 6,
}

impl FieldType {
    /// The kind name this type expects from the value tree, as it appears in
    /// `BadField` diagnostics.
    pub fn expect_name(&self) -> &'static str {
        match self {
            FieldType::Bool => "bool",
            FieldType::Short => "short",
            FieldType::Int => "int",
            FieldType::Float => "float",
            FieldType::Double => "double",
            FieldType::String => "string",
            FieldType::Message => "table",
        }
    }
}

/// A named, typed schema node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub array: bool,
    pub ty: FieldType,
    /// Non-empty exactly when `ty` is [`FieldType::Message`].
    pub children: Vec<Field>,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            array: false,
            ty,
            children: Vec::new(),
        }
    }

    /// Mark this field as an array of its base type.
    pub fn array(mut self) -> Self {
        self.array = true;
        self
    }

    /// Attach the child field list of a `Message` field.
    pub fn with_children(mut self, children: Vec<Field>) -> Self {
        self.children = children;
        self
    }
}

/// A named, ordered list of top-level fields. The name is diagnostic only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Protocol {
    pub name: String,
    pub fields: Vec<Field>,
}

/// Id-keyed protocol registry and owner of every schema tree.
///
/// Mutable only through registration; encode and decode take `&self`, so a
/// populated registry can be shared across threads.
#[derive(Debug, Default)]
pub struct Registry {
    protocols: HashMap<u16, Protocol>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a protocol described as a value tree.
    ///
    /// The schema is a sequence of field descriptors, each a table with
    /// entries `type` (integer code 0..=6), `array` (bool, absent means
    /// false), `name` (string), and, for `Message` fields only, `pto`,
    /// the nested descriptor sequence. Registration at an id that is
    /// already taken replaces the previous protocol.
    pub fn import(&mut self, id: u16, name: impl Into<String>, schema: &Value) -> CodecResult<()> {
        if id == INVALID_PTO_ID {
            return Err(CodecError::BadPtoId);
        }
        let fields = import_fields(schema, 1)?;
        self.register(
            id,
            Protocol {
                name: name.into(),
                fields,
            },
        )
    }

    /// Register an already-built protocol.
    pub fn register(&mut self, id: u16, protocol: Protocol) -> CodecResult<()> {
        if id == INVALID_PTO_ID {
            return Err(CodecError::BadPtoId);
        }
        debug!(
            id,
            protocol = %protocol.name,
            fields = protocol.fields.len(),
            "registered protocol"
        );
        self.protocols.insert(id, protocol);
        Ok(())
    }

    /// Look up a protocol by id.
    pub fn get(&self, id: u16) -> CodecResult<&Protocol> {
        self.protocols.get(&id).ok_or(CodecError::NoSuchPto { id })
    }

    /// Encode `record` against the protocol registered at `id`.
    pub fn encode(&self, id: u16, record: &Value) -> CodecResult<Vec<u8>> {
        encoder::encode(self.get(id)?, record)
    }

    /// Decode `bytes` against the protocol registered at `id`.
    pub fn decode(&self, id: u16, bytes: &[u8]) -> CodecResult<Value> {
        decoder::decode(self.get(id)?, bytes)
    }
}

fn import_fields(schema: &Value, depth: usize) -> CodecResult<Vec<Field>> {
    if depth > MAX_DEPTH {
        return Err(CodecError::TooDepth {
            direction: Direction::Import,
        });
    }
    let items = schema.as_array().ok_or_else(|| CodecError::BadSchema {
        reason: format!("expect field list, not {}", schema.kind()),
    })?;

    let mut fields = Vec::with_capacity(items.len());
    for item in items {
        if item.kind() != Kind::Table {
            return Err(CodecError::BadSchema {
                reason: format!("field descriptor must be a table, not {}", item.kind()),
            });
        }

        let name = match item.get("name").as_bytes() {
            Some(bytes) => std::str::from_utf8(bytes)
                .map_err(|_| CodecError::BadSchema {
                    reason: "field name is not valid utf-8".into(),
                })?
                .to_owned(),
            None => {
                return Err(CodecError::BadSchema {
                    reason: "field descriptor missing name".into(),
                })
            }
        };
        if name.is_empty() {
            return Err(CodecError::BadSchema {
                reason: "field name is empty".into(),
            });
        }

        let code = match item.get("type").as_int() {
            Some(code) => code,
            None => {
                return Err(CodecError::BadSchema {
                    reason: format!("field {name} missing type code"),
                })
            }
        };
        let ty = u8::try_from(code)
            .ok()
            .and_then(|code| FieldType::try_from(code).ok())
            .ok_or_else(|| CodecError::BadType {
                field: name.clone(),
                code,
            })?;

        let array = item.get("array").as_bool().unwrap_or(false);

        let mut field = Field::new(name, ty);
        field.array = array;
        if ty == FieldType::Message {
            let nested = item.get("pto");
            if nested.kind() == Kind::Nil {
                return Err(CodecError::BadSchema {
                    reason: format!("message field {} missing pto list", field.name),
                });
            }
            field.children = import_fields(nested, depth + 1)?;
            if field.children.is_empty() {
                return Err(CodecError::BadSchema {
                    reason: format!("message field {} has no child fields", field.name),
                });
            }
        }
        fields.push(field);
    }
    Ok(fields)
}
