//! Wire-format conformance and structural round-trip tests.
//!
//! The hex vectors here are normative: they pin the exact byte layout so any
//! implementation change that breaks interoperability fails loudly.

use pto_codec::{Field, FieldType, Protocol, Registry, Value, MAX_INT};

/// `P1 = { a: Bool, b: Short, c: Int, d: String }`
fn p1_registry() -> Registry {
    let mut registry = Registry::new();
    registry
        .register(
            1,
            Protocol {
                name: "P1".into(),
                fields: vec![
                    Field::new("a", FieldType::Bool),
                    Field::new("b", FieldType::Short),
                    Field::new("c", FieldType::Int),
                    Field::new("d", FieldType::String),
                ],
            },
        )
        .unwrap();
    registry
}

fn p1_record(a: bool, b: i64, c: i64, d: &str) -> Value {
    Value::from_fields([
        ("a", Value::Bool(a)),
        ("b", Value::Int(b)),
        ("c", Value::Int(c)),
        ("d", Value::from(d)),
    ])
}

#[test]
fn p1_vector_bool_short_int_string() {
    let registry = p1_registry();
    let record = p1_record(true, -1, 0, "hi");
    let bytes = registry.encode(1, &record).unwrap();
    assert_eq!(hex::encode(&bytes), "01ffff0002006869");
    assert_eq!(registry.decode(1, &bytes).unwrap(), record);
}

#[test]
fn p1_vector_positive_varint() {
    let registry = p1_registry();
    let record = p1_record(false, 0, 300, "");
    let bytes = registry.encode(1, &record).unwrap();
    assert_eq!(hex::encode(&bytes), "000000052c010000");
    assert_eq!(registry.decode(1, &bytes).unwrap(), record);
}

#[test]
fn p1_vector_negative_varint() {
    let registry = p1_registry();
    let record = p1_record(false, 0, -1, "");
    let bytes = registry.encode(1, &record).unwrap();
    assert_eq!(hex::encode(&bytes), "00000002010000");
    assert_eq!(registry.decode(1, &bytes).unwrap(), record);
}

#[test]
fn p2_vector_int_array() {
    let mut registry = Registry::new();
    registry
        .register(
            2,
            Protocol {
                name: "P2".into(),
                fields: vec![Field::new("xs", FieldType::Int).array()],
            },
        )
        .unwrap();

    let record = Value::from_fields([(
        "xs",
        Value::Array(vec![
            Value::Int(0),
            Value::Int(1),
            Value::Int(-1),
            Value::Int(256),
        ]),
    )]);
    let bytes = registry.encode(2, &record).unwrap();
    assert_eq!(hex::encode(&bytes), "04000003010201050001");
    assert_eq!(registry.decode(2, &bytes).unwrap(), record);
}

#[test]
fn p3_vector_message_array() {
    let mut registry = Registry::new();
    registry
        .register(
            3,
            Protocol {
                name: "P3".into(),
                fields: vec![Field::new("inner", FieldType::Message)
                    .array()
                    .with_children(vec![
                        Field::new("x", FieldType::Short),
                        Field::new("y", FieldType::Short),
                    ])],
            },
        )
        .unwrap();

    let record = Value::from_fields([(
        "inner",
        Value::Array(vec![
            Value::from_fields([("x", Value::Int(1)), ("y", Value::Int(2))]),
            Value::from_fields([("x", Value::Int(3)), ("y", Value::Int(4))]),
        ]),
    )]);
    let bytes = registry.encode(3, &record).unwrap();
    assert_eq!(hex::encode(&bytes), "02000100020003000400");
    assert_eq!(registry.decode(3, &bytes).unwrap(), record);
}

#[test]
fn kitchen_sink_roundtrip() {
    let mut registry = Registry::new();
    registry
        .register(
            10,
            Protocol {
                name: "kitchen".into(),
                fields: vec![
                    Field::new("alive", FieldType::Bool),
                    Field::new("level", FieldType::Short),
                    Field::new("exp", FieldType::Int),
                    Field::new("speed", FieldType::Float),
                    Field::new("ratio", FieldType::Double),
                    Field::new("nick", FieldType::String),
                    Field::new("flags", FieldType::Bool).array(),
                    Field::new("scores", FieldType::Int).array(),
                    Field::new("tags", FieldType::String).array(),
                    Field::new("pos", FieldType::Message).with_children(vec![
                        Field::new("x", FieldType::Double),
                        Field::new("y", FieldType::Double),
                    ]),
                    Field::new("items", FieldType::Message)
                        .array()
                        .with_children(vec![
                            Field::new("id", FieldType::Int),
                            Field::new("count", FieldType::Short),
                        ]),
                ],
            },
        )
        .unwrap();

    let record = Value::from_fields([
        ("alive", Value::Bool(true)),
        ("level", Value::Int(-32768)),
        ("exp", Value::Int(MAX_INT)),
        ("speed", Value::Float(1.5)),
        ("ratio", Value::Float(-0.25)),
        ("nick", Value::from("kaori")),
        (
            "flags",
            Value::Array(vec![Value::Bool(true), Value::Bool(false)]),
        ),
        (
            "scores",
            Value::Array(vec![Value::Int(-MAX_INT), Value::Int(0), Value::Int(77)]),
        ),
        (
            "tags",
            Value::Array(vec![Value::from(""), Value::from("guild")]),
        ),
        (
            "pos",
            Value::from_fields([("x", Value::Float(3.0)), ("y", Value::Float(-4.0))]),
        ),
        (
            "items",
            Value::Array(vec![
                Value::from_fields([("id", Value::Int(501)), ("count", Value::Int(3))]),
                Value::from_fields([("id", Value::Int(502)), ("count", Value::Int(1))]),
            ]),
        ),
    ]);

    let bytes = registry.encode(10, &record).unwrap();
    assert_eq!(registry.decode(10, &bytes).unwrap(), record);
}

#[test]
fn empty_arrays_and_strings_roundtrip() {
    let mut registry = Registry::new();
    registry
        .register(
            4,
            Protocol {
                name: "empties".into(),
                fields: vec![
                    Field::new("xs", FieldType::Int).array(),
                    Field::new("s", FieldType::String),
                    Field::new("msgs", FieldType::Message)
                        .array()
                        .with_children(vec![Field::new("v", FieldType::Bool)]),
                ],
            },
        )
        .unwrap();

    let record = Value::from_fields([
        ("xs", Value::array()),
        ("s", Value::from("")),
        ("msgs", Value::array()),
    ]);
    let bytes = registry.encode(4, &record).unwrap();
    // three u16 zero counts/lengths
    assert_eq!(hex::encode(&bytes), "000000000000");
    assert_eq!(registry.decode(4, &bytes).unwrap(), record);
}

#[test]
fn strings_are_raw_bytes() {
    let mut registry = Registry::new();
    registry
        .register(
            5,
            Protocol {
                name: "blob".into(),
                fields: vec![Field::new("data", FieldType::String)],
            },
        )
        .unwrap();

    let payload = vec![0x00, 0xff, 0x80, 0x7f];
    let record = Value::from_fields([("data", Value::String(payload.clone()))]);
    let bytes = registry.encode(5, &record).unwrap();
    assert_eq!(bytes, [&[0x04, 0x00][..], &payload[..]].concat());
    assert_eq!(registry.decode(5, &bytes).unwrap(), record);
}

#[test]
fn field_order_determines_the_wire_layout() {
    let fields = |first: &str, second: &str| Protocol {
        name: "ordered".into(),
        fields: vec![
            Field::new(first, FieldType::Short),
            Field::new(second, FieldType::Short),
        ],
    };

    let mut forward = Registry::new();
    forward.register(1, fields("a", "b")).unwrap();
    let mut swapped = Registry::new();
    swapped.register(1, fields("b", "a")).unwrap();

    let record = Value::from_fields([("a", Value::Int(1)), ("b", Value::Int(2))]);
    let lhs = forward.encode(1, &record).unwrap();
    let rhs = swapped.encode(1, &record).unwrap();
    assert_ne!(lhs, rhs);
    assert_eq!(lhs, vec![0x01, 0x00, 0x02, 0x00]);
    assert_eq!(rhs, vec![0x02, 0x00, 0x01, 0x00]);
}

#[test]
fn imported_schema_matches_hand_built_protocol() {
    let schema = Value::Array(vec![
        Value::from_fields([
            ("name", Value::from("a")),
            ("type", Value::Int(FieldType::Bool as i64)),
            ("array", Value::Bool(false)),
        ]),
        Value::from_fields([
            ("name", Value::from("b")),
            ("type", Value::Int(FieldType::Short as i64)),
            ("array", Value::Bool(false)),
        ]),
        Value::from_fields([
            ("name", Value::from("c")),
            ("type", Value::Int(FieldType::Int as i64)),
            ("array", Value::Bool(false)),
        ]),
        Value::from_fields([
            ("name", Value::from("d")),
            ("type", Value::Int(FieldType::String as i64)),
            ("array", Value::Bool(false)),
        ]),
    ]);

    let mut registry = Registry::new();
    registry.import(1, "P1", &schema).unwrap();

    let record = p1_record(true, -1, 0, "hi");
    let bytes = registry.encode(1, &record).unwrap();
    assert_eq!(hex::encode(&bytes), "01ffff0002006869");

    let hand_built = p1_registry();
    assert_eq!(
        hand_built.encode(1, &record).unwrap(),
        bytes,
        "imported and hand-built schemas must agree on the wire"
    );
}

#[test]
fn short_roundtrip_truncates_out_of_range_values() {
    let mut registry = Registry::new();
    registry
        .register(
            6,
            Protocol {
                name: "narrow".into(),
                fields: vec![Field::new("s", FieldType::Short)],
            },
        )
        .unwrap();

    let bytes = registry
        .encode(6, &Value::from_fields([("s", Value::Int(0x1_0005))]))
        .unwrap();
    let decoded = registry.decode(6, &bytes).unwrap();
    assert_eq!(decoded.get("s"), &Value::Int(5));
}
