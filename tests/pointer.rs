use streamcbor::{
    del, encode, from_json_pointer, get, items_end, lookup, set, to_json_pointer, Config,
    ErrorCode, Value,
};

fn ptr(path: &str) -> Vec<u8> {
    let mut buf = [0u8; 256];
    let n = from_json_pointer(path, &mut buf).unwrap();
    buf[..n].to_vec()
}

fn text(bin: &[u8]) -> String {
    let mut buf = [0u8; 256];
    let n = to_json_pointer(bin, &mut buf).unwrap();
    String::from_utf8(buf[..n].to_vec()).unwrap()
}

fn enc(value: &Value) -> Vec<u8> {
    let mut buf = [0u8; 4096];
    let n = encode(value, &mut buf).unwrap();
    buf[..n].to_vec()
}

#[test]
fn empty_pointer_is_frame_only() {
    assert_eq!(ptr(""), vec![0x7f, 0xff]);
}

#[test]
fn pointer_segments_are_tagged_text() {
    // "/a/0": indefinite text frame of tag-33 segments.
    assert_eq!(
        ptr("/a/0"),
        vec![0x7f, 0xd8, 0x21, 0x61, 0x61, 0xd8, 0x21, 0x61, 0x30, 0xff]
    );
    // Trailing slash closes an empty final segment.
    assert_eq!(ptr("/"), vec![0x7f, 0xd8, 0x21, 0x60, 0xff]);
}

#[test]
fn pointer_unescapes_tilde_sequences() {
    // "~1" is '/', "~0" is '~' inside a segment.
    assert_eq!(
        ptr("/a~1b"),
        vec![0x7f, 0xd8, 0x21, 0x63, 0x61, 0x2f, 0x62, 0xff]
    );
    assert_eq!(
        ptr("/m~0n"),
        vec![0x7f, 0xd8, 0x21, 0x63, 0x6d, 0x7e, 0x6e, 0xff]
    );
}

#[test]
fn pointer_text_roundtrip() {
    for path in ["", "/", "/a", "/a/0", "/a~1b/c", "/x~0y", "/a/b/c/d", "/-"] {
        assert_eq!(text(&ptr(path)), path, "path {path:?}");
    }
}

#[test]
fn pointer_syntax_errors() {
    let mut buf = [0u8; 64];
    assert_eq!(
        from_json_pointer("a/b", &mut buf).unwrap_err().code,
        ErrorCode::ExpectedJsonPointer
    );
    assert_eq!(
        from_json_pointer("/a~", &mut buf).unwrap_err().code,
        ErrorCode::ExpectedJsonPointer
    );
    assert_eq!(
        from_json_pointer("/a~2b", &mut buf).unwrap_err().code,
        ErrorCode::ExpectedJsonPointer
    );
    assert_eq!(
        to_json_pointer(&[0x60, 0xff], &mut buf).unwrap_err().code,
        ErrorCode::ExpectedCborPointer
    );
}

#[test]
fn config_caps_pointer_length() {
    let config = Config::new().set_max_pointer_len(4);
    let mut buf = [0u8; 64];
    assert_eq!(
        config.from_json_pointer("/long", &mut buf).unwrap_err().code,
        ErrorCode::PointerTooLong
    );
    assert!(config.from_json_pointer("/ok", &mut buf).is_ok());
}

#[test]
fn items_end_walks_the_supported_subset() {
    assert_eq!(items_end(&[0x01]).unwrap(), 1);
    assert_eq!(items_end(&[0x18, 0x2a]).unwrap(), 2);
    assert_eq!(items_end(&[0x39, 0x01, 0x00]).unwrap(), 3);
    assert_eq!(items_end(&[0x63, 0x61, 0x62, 0x63]).unwrap(), 4);
    assert_eq!(items_end(&[0xf6]).unwrap(), 1);
    assert_eq!(items_end(&[0xfa, 0, 0, 0, 0]).unwrap(), 5);
    assert_eq!(items_end(&[0xfb, 0, 0, 0, 0, 0, 0, 0, 0]).unwrap(), 9);
    // tag-33 wrapped key
    assert_eq!(items_end(&[0xd8, 0x21, 0x61, 0x61]).unwrap(), 4);
    // indefinite array and map, nested
    assert_eq!(items_end(&[0x9f, 0x01, 0x02, 0xff]).unwrap(), 4);
    assert_eq!(
        items_end(&[0xbf, 0x61, 0x61, 0x9f, 0x01, 0xff, 0xff]).unwrap(),
        7
    );
}

#[test]
fn items_end_rejects_unwalkable_shapes() {
    // Definite containers are outside the pointer engine's subset.
    assert_eq!(
        items_end(&[0x83, 0x01, 0x02, 0x03]).unwrap_err().code,
        ErrorCode::InvalidDocument
    );
    assert_eq!(
        items_end(&[0xa1, 0x61, 0x61, 0x01]).unwrap_err().code,
        ErrorCode::InvalidDocument
    );
    // Byte strings never appear in transcoded documents.
    assert_eq!(
        items_end(&[0x41, 0x01]).unwrap_err().code,
        ErrorCode::InvalidDocument
    );
    // Truncated text payload.
    assert_eq!(
        items_end(&[0x63, 0x61]).unwrap_err().code,
        ErrorCode::MalformedDocument
    );
}

#[test]
fn lookup_empty_pointer_is_whole_document() {
    let doc = [0x9f, 0x01, 0xff];
    assert_eq!(lookup(&ptr(""), &doc).unwrap(), (0, 3));
    assert_eq!(get(&doc, &ptr("")).unwrap(), &doc[..]);
}

#[test]
fn get_array_element() {
    let doc = [0x9f, 0x01, 0x02, 0x03, 0xff];
    assert_eq!(get(&doc, &ptr("/0")).unwrap(), &[0x01]);
    assert_eq!(get(&doc, &ptr("/1")).unwrap(), &[0x02]);
    assert_eq!(get(&doc, &ptr("/2")).unwrap(), &[0x03]);
    assert_eq!(
        get(&doc, &ptr("/3")).unwrap_err().code,
        ErrorCode::InvalidArrayOffset
    );
    assert_eq!(
        get(&doc, &ptr("/x")).unwrap_err().code,
        ErrorCode::InvalidArrayOffset
    );
}

#[test]
fn get_map_value() {
    // {"a": 1, "b": [2]}
    let doc = enc(&Value::Map(vec![
        (Value::Text("a".into()), Value::Unsigned(1)),
        (
            Value::Text("b".into()),
            Value::Array(vec![Value::Unsigned(2)]),
        ),
    ]));
    assert_eq!(get(&doc, &ptr("/a")).unwrap(), &[0x01]);
    assert_eq!(get(&doc, &ptr("/b")).unwrap(), &[0x9f, 0x02, 0xff]);
    assert_eq!(get(&doc, &ptr("/b/0")).unwrap(), &[0x02]);
    assert_eq!(get(&doc, &ptr("/c")).unwrap_err().code, ErrorCode::NoKey);
}

#[test]
fn get_with_tag_wrapped_keys() {
    // {"a": 1} with the key wrapped in tag 33, as the JSON bridge emits it.
    let doc = [0xbf, 0xd8, 0x21, 0x61, 0x61, 0x01, 0xff];
    assert_eq!(get(&doc, &ptr("/a")).unwrap(), &[0x01]);
}

#[test]
fn get_escaped_keys() {
    // {"x/y": 1, "m~n": 2}
    let doc = enc(&Value::Map(vec![
        (Value::Text("x/y".into()), Value::Unsigned(1)),
        (Value::Text("m~n".into()), Value::Unsigned(2)),
    ]));
    assert_eq!(get(&doc, &ptr("/x~1y")).unwrap(), &[0x01]);
    assert_eq!(get(&doc, &ptr("/m~0n")).unwrap(), &[0x02]);
}

#[test]
fn nested_lookup_offsets_are_absolute() {
    // {"a": {"b": [10, 20]}}
    let doc = enc(&Value::Map(vec![(
        Value::Text("a".into()),
        Value::Map(vec![(
            Value::Text("b".into()),
            Value::Array(vec![Value::Unsigned(10), Value::Unsigned(20)]),
        )]),
    )]));
    let (start, end) = lookup(&ptr("/a/b/1"), &doc).unwrap();
    assert_eq!(&doc[start..end], &[0x14]);
    // The range indexes the original document, not the sub-window.
    assert_eq!(get(&doc, &ptr("/a/b/1")).unwrap(), &[0x14]);
}

#[test]
fn set_splices_replacement() {
    let doc = [0x9f, 0x01, 0x02, 0x03, 0xff];
    let item = [0x18, 0x2a]; // 42
    let mut out = [0u8; 16];
    let n = set(&doc, &ptr("/1"), &item, &mut out).unwrap();
    assert_eq!(&out[..n], &[0x9f, 0x01, 0x18, 0x2a, 0x03, 0xff]);

    // get over the spliced document sees the replacement.
    assert_eq!(get(&out[..n], &ptr("/1")).unwrap(), &item[..]);
}

#[test]
fn set_at_dash_appends() {
    let doc = [0x9f, 0x01, 0x02, 0xff];
    let mut out = [0u8; 16];
    let n = set(&doc, &ptr("/-"), &[0x03], &mut out).unwrap();
    assert_eq!(&out[..n], &[0x9f, 0x01, 0x02, 0x03, 0xff]);
}

#[test]
fn set_nested_value() {
    // {"a": [1]} -> {"a": [99]}
    let doc = enc(&Value::Map(vec![(
        Value::Text("a".into()),
        Value::Array(vec![Value::Unsigned(1)]),
    )]));
    let mut out = [0u8; 32];
    let n = set(&doc, &ptr("/a/0"), &[0x18, 0x63], &mut out).unwrap();
    assert_eq!(get(&out[..n], &ptr("/a/0")).unwrap(), &[0x18, 0x63]);
}

#[test]
fn del_splices_out_the_item() {
    let doc = [0x9f, 0x01, 0x02, 0x03, 0xff];
    let mut out = [0u8; 16];
    let n = del(&doc, &ptr("/1"), &mut out).unwrap();
    assert_eq!(&out[..n], &[0x9f, 0x01, 0x03, 0xff]);
}

#[test]
fn del_map_value_keeps_the_key() {
    // Deleting a map *value* is a raw splice; the pointer engine does not
    // rewrite the key, mirroring the splice contract.
    let doc = [0x9f, 0xbf, 0x61, 0x61, 0x01, 0xff, 0xff];
    let mut out = [0u8; 16];
    let n = del(&doc, &ptr("/0/a"), &mut out).unwrap();
    assert_eq!(&out[..n], &[0x9f, 0xbf, 0x61, 0x61, 0xff, 0xff]);
}

#[test]
fn lookup_on_scalars_is_invalid_pointer() {
    let doc = [0x01];
    assert_eq!(
        lookup(&ptr("/0"), &doc).unwrap_err().code,
        ErrorCode::InvalidPointer
    );
}

#[test]
fn lookup_rejects_definite_documents() {
    // The walker only understands stream-encoded containers.
    let doc = [0x83, 0x01, 0x02, 0x03];
    assert_eq!(
        lookup(&ptr("/0"), &doc).unwrap_err().code,
        ErrorCode::InvalidPointer
    );
}

#[test]
fn lookup_rejects_non_pointer_bytes() {
    let doc = [0x9f, 0xff];
    assert_eq!(
        lookup(&[0x01], &doc).unwrap_err().code,
        ErrorCode::ExpectedCborPointer
    );
    assert_eq!(
        lookup(&[0x7f, 0x01, 0xff], &doc).unwrap_err().code,
        ErrorCode::InvalidPointer
    );
}

#[test]
fn set_reports_output_too_small() {
    let doc = [0x9f, 0x01, 0xff];
    let mut out = [0u8; 2];
    assert_eq!(
        set(&doc, &ptr("/0"), &[0x18, 0x2a], &mut out).unwrap_err().code,
        ErrorCode::OutputTooSmall
    );
}
