#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // First byte splits the input into pointer and document halves.
    let Some((&split, rest)) = data.split_first() else {
        return;
    };
    let mid = (split as usize).min(rest.len());
    let (pointer, doc) = rest.split_at(mid);

    if let Ok((start, end)) = streamcbor::lookup(pointer, doc) {
        assert!(start <= end && end <= doc.len());
        let item = &doc[start..end];

        let mut out = vec![0u8; doc.len() + item.len()];
        let n = streamcbor::set(doc, pointer, item, &mut out).expect("set after lookup");
        assert_eq!(&out[..n], doc);
    }

    let mut text = vec![0u8; 4 * pointer.len() + 8];
    let _ = streamcbor::to_json_pointer(pointer, &mut text);
});
