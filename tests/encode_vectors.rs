use streamcbor::{encode, BigNum, Config, ContainerEncoding, ErrorCode, Value};

fn enc(value: &Value) -> Vec<u8> {
    let mut buf = [0u8; 4096];
    let n = encode(value, &mut buf).unwrap();
    buf[..n].to_vec()
}

fn enc_with(config: &Config, value: &Value) -> Vec<u8> {
    let mut buf = [0u8; 4096];
    let n = config.encode(value, &mut buf).unwrap();
    buf[..n].to_vec()
}

#[test]
fn encode_uint_boundaries() {
    assert_eq!(enc(&Value::Unsigned(0)), vec![0x00]);
    assert_eq!(enc(&Value::Unsigned(23)), vec![0x17]);
    assert_eq!(enc(&Value::Unsigned(24)), vec![0x18, 0x18]);
    assert_eq!(enc(&Value::Unsigned(255)), vec![0x18, 0xff]);
    assert_eq!(enc(&Value::Unsigned(256)), vec![0x19, 0x01, 0x00]);
    assert_eq!(enc(&Value::Unsigned(65_535)), vec![0x19, 0xff, 0xff]);
    assert_eq!(enc(&Value::Unsigned(65_536)), vec![0x1a, 0x00, 0x01, 0x00, 0x00]);
    assert_eq!(
        enc(&Value::Unsigned(4_294_967_295)),
        vec![0x1a, 0xff, 0xff, 0xff, 0xff]
    );
    assert_eq!(
        enc(&Value::Unsigned(4_294_967_296)),
        vec![0x1b, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00]
    );
    assert_eq!(
        enc(&Value::Unsigned(u64::MAX)),
        vec![0x1b, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]
    );
}

#[test]
fn encode_nint_boundaries() {
    assert_eq!(enc(&Value::Signed(-1)), vec![0x20]);
    assert_eq!(enc(&Value::Signed(-24)), vec![0x37]);
    assert_eq!(enc(&Value::Signed(-25)), vec![0x38, 0x18]);
    assert_eq!(enc(&Value::Signed(-256)), vec![0x38, 0xff]);
    assert_eq!(enc(&Value::Signed(-257)), vec![0x39, 0x01, 0x00]);
    assert_eq!(enc(&Value::Signed(-65_536)), vec![0x39, 0xff, 0xff]);
    assert_eq!(enc(&Value::Signed(-65_537)), vec![0x3a, 0x00, 0x01, 0x00, 0x00]);
    assert_eq!(
        enc(&Value::Signed(-4_294_967_296)),
        vec![0x3a, 0xff, 0xff, 0xff, 0xff]
    );
    assert_eq!(
        enc(&Value::Signed(-4_294_967_297)),
        vec![0x3b, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00]
    );
    assert_eq!(
        enc(&Value::Signed(i64::MIN)),
        vec![0x3b, 0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]
    );
}

#[test]
fn encode_signed_positive_collapses_to_unsigned() {
    assert_eq!(enc(&Value::Signed(0)), vec![0x00]);
    assert_eq!(enc(&Value::Signed(24)), vec![0x18, 0x18]);
    assert_eq!(enc(&Value::Signed(1000)), vec![0x19, 0x03, 0xe8]);
}

#[test]
fn encode_simples() {
    assert_eq!(enc(&Value::Bool(false)), vec![0xf4]);
    assert_eq!(enc(&Value::Bool(true)), vec![0xf5]);
    assert_eq!(enc(&Value::Null), vec![0xf6]);
    assert_eq!(enc(&Value::Undefined), vec![0xf7]);
    assert_eq!(enc(&Value::Simple(16)), vec![0xf0]);
    assert_eq!(enc(&Value::Simple(160)), vec![0xf8, 0xa0]);
    assert_eq!(enc(&Value::BreakStop), vec![0xff]);
}

#[test]
fn encode_floats_keep_their_width() {
    assert_eq!(
        enc(&Value::F32(100_000.0)),
        vec![0xfa, 0x47, 0xc3, 0x50, 0x00]
    );
    assert_eq!(
        enc(&Value::F64(1.1)),
        vec![0xfb, 0x3f, 0xf1, 0x99, 0x99, 0x99, 0x99, 0x99, 0x9a]
    );
    // A float32-representable value still encodes as float64 when given as one.
    assert_eq!(
        enc(&Value::F64(0.0)),
        vec![0xfb, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]
    );
}

#[test]
fn encode_strings() {
    assert_eq!(enc(&Value::Bytes(vec![1, 2, 3, 4])), vec![0x44, 1, 2, 3, 4]);
    assert_eq!(
        enc(&Value::Text("IETF".into())),
        vec![0x64, 0x49, 0x45, 0x54, 0x46]
    );
    assert_eq!(enc(&Value::Text(String::new())), vec![0x60]);

    // Length widths follow the integer cascade.
    let long = "a".repeat(256);
    let mut expected = vec![0x79, 0x01, 0x00];
    expected.extend_from_slice(long.as_bytes());
    assert_eq!(enc(&Value::Text(long)), expected);
}

#[test]
fn encode_array_stream_and_length_prefix() {
    let arr = Value::Array(vec![
        Value::Unsigned(1),
        Value::Unsigned(2),
        Value::Unsigned(3),
    ]);

    let stream = Config::new().set_container_encoding(ContainerEncoding::Stream);
    assert_eq!(enc_with(&stream, &arr), vec![0x9f, 0x01, 0x02, 0x03, 0xff]);

    let prefix = Config::new().set_container_encoding(ContainerEncoding::LengthPrefix);
    assert_eq!(enc_with(&prefix, &arr), vec![0x83, 0x01, 0x02, 0x03]);
}

#[test]
fn encode_map_stream_and_length_prefix() {
    let map = Value::Map(vec![(Value::Text("a".into()), Value::Unsigned(1))]);

    assert_eq!(enc(&map), vec![0xbf, 0x61, 0x61, 0x01, 0xff]);

    let prefix = Config::new().set_container_encoding(ContainerEncoding::LengthPrefix);
    assert_eq!(enc_with(&prefix, &map), vec![0xa1, 0x61, 0x61, 0x01]);
}

#[test]
fn encode_map_preserves_order_and_duplicates() {
    let map = Value::Map(vec![
        (Value::Text("b".into()), Value::Unsigned(2)),
        (Value::Text("a".into()), Value::Unsigned(1)),
        (Value::Text("b".into()), Value::Unsigned(3)),
    ]);
    assert_eq!(
        enc(&map),
        vec![0xbf, 0x61, 0x62, 0x02, 0x61, 0x61, 0x01, 0x61, 0x62, 0x03, 0xff]
    );
}

#[test]
fn encode_max_keys_is_enforced() {
    let config = Config::new().set_max_keys(2);
    let pairs: Vec<_> = (0..3)
        .map(|i| (Value::Unsigned(i), Value::Unsigned(i)))
        .collect();

    let mut buf = [0u8; 64];
    let err = config.encode(&Value::Map(pairs.clone()), &mut buf).unwrap_err();
    assert_eq!(err.code, ErrorCode::MaxKeysExceeded);

    let err = config.mapslice_to_cbor(&pairs, &mut buf).unwrap_err();
    assert_eq!(err.code, ErrorCode::MaxKeysExceeded);

    assert!(config.mapslice_to_cbor(&pairs[..2], &mut buf).is_ok());
}

#[test]
fn encode_tagged_items() {
    // tag 0: RFC 3339 text
    let dt = Value::DateTime("2013-03-21T20:04:00Z".into());
    let mut expected = vec![0xc0, 0x74];
    expected.extend_from_slice(b"2013-03-21T20:04:00Z");
    assert_eq!(enc(&dt), expected);

    // tag 1: epoch seconds, integer and fractional
    assert_eq!(
        enc(&Value::Epoch(1_363_896_240)),
        vec![0xc1, 0x1a, 0x51, 0x4b, 0x67, 0xb0]
    );
    assert_eq!(
        enc(&Value::EpochMicro(1_363_896_240.5)),
        vec![0xc1, 0xfb, 0x41, 0xd4, 0x52, 0xd9, 0xec, 0x20, 0x00, 0x00]
    );

    // tags 2/3: bignums
    assert_eq!(
        enc(&Value::BigNum(BigNum::new(false, vec![0x01, 0x00]))),
        vec![0xc2, 0x42, 0x01, 0x00]
    );
    assert_eq!(
        enc(&Value::BigNum(BigNum::new(true, vec![0x01, 0x00]))),
        vec![0xc3, 0x42, 0x01, 0x00]
    );

    // tags 4/5: [exponent, mantissa] pairs
    assert_eq!(
        enc(&Value::DecimalFraction {
            exponent: -2,
            mantissa: 27315
        }),
        vec![0xc4, 0x82, 0x21, 0x19, 0x6a, 0xb3]
    );
    assert_eq!(
        enc(&Value::BigFloat {
            exponent: -1,
            mantissa: 3
        }),
        vec![0xc5, 0x82, 0x20, 0x03]
    );

    // tag 24: embedded CBOR
    assert_eq!(
        enc(&Value::EmbeddedCbor(vec![0x01, 0x02])),
        vec![0xd8, 0x18, 0x42, 0x01, 0x02]
    );

    // tag 55799: self-describe prefix
    assert_eq!(
        enc(&Value::SelfDescribe(vec![0x01])),
        vec![0xd9, 0xd9, 0xf7, 0x41, 0x01]
    );
}

#[test]
fn encode_streaming_primitives() {
    use streamcbor::IndefiniteKind;

    assert_eq!(enc(&Value::IndefiniteStart(IndefiniteKind::Bytes)), vec![0x5f]);
    assert_eq!(enc(&Value::IndefiniteStart(IndefiniteKind::Text)), vec![0x7f]);
    assert_eq!(enc(&Value::IndefiniteStart(IndefiniteKind::Array)), vec![0x9f]);
    assert_eq!(enc(&Value::IndefiniteStart(IndefiniteKind::Map)), vec![0xbf]);
}

#[test]
fn encode_reports_output_too_small() {
    let mut buf = [0u8; 2];
    let err = encode(&Value::Text("hello".into()), &mut buf).unwrap_err();
    assert_eq!(err.code, ErrorCode::OutputTooSmall);
}
