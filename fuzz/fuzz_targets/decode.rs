#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok((value, consumed)) = streamcbor::decode(data) {
        assert!(consumed <= data.len());

        // A decoded value must re-encode, and the re-encoding must decode
        // back to the same value (modulo NaN payloads, which we skip by
        // comparing the bytes instead).
        let mut buf = vec![0u8; 2 * consumed + 16];
        if let Ok(n) = streamcbor::encode(&value, &mut buf) {
            let (again, m) = streamcbor::decode(&buf[..n]).expect("re-decode");
            let mut buf2 = vec![0u8; n + 16];
            let n2 = streamcbor::encode(&again, &mut buf2).expect("re-encode");
            assert_eq!(&buf[..n], &buf2[..n2]);
            assert_eq!(m, n);
        }
    }
});
