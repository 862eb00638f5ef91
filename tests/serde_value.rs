#![cfg(feature = "serde")]

use streamcbor::Value;

#[test]
fn value_serializes_to_json() {
    let v = Value::Map(vec![
        (Value::Text("n".into()), Value::Unsigned(1)),
        (
            Value::Text("items".into()),
            Value::Array(vec![Value::Bool(true), Value::Null]),
        ),
    ]);
    let json = serde_json::to_string(&v).unwrap();
    assert_eq!(json, r#"{"n":1,"items":[true,null]}"#);
}

#[test]
fn value_deserializes_from_json() {
    let v: Value = serde_json::from_str(r#"{"a": [1, -2, "x"]}"#).unwrap();
    assert_eq!(
        v,
        Value::Map(vec![(
            Value::Text("a".into()),
            Value::Array(vec![
                Value::Unsigned(1),
                Value::Signed(-2),
                Value::Text("x".into()),
            ]),
        )])
    );
}

#[test]
fn tagged_values_refuse_serialization() {
    let v = Value::Epoch(0);
    assert!(serde_json::to_string(&v).is_err());
}

#[test]
fn json_to_cbor_through_value() {
    let v: Value = serde_json::from_str(r#"[1, 2, 3]"#).unwrap();
    let mut buf = [0u8; 16];
    let n = streamcbor::encode(&v, &mut buf).unwrap();
    assert_eq!(&buf[..n], &[0x9f, 0x01, 0x02, 0x03, 0xff]);
}
