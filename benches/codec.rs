#![allow(clippy::unwrap_used)]

use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use streamcbor::{decode, encode, from_json_pointer, get, Value};

fn sample_medium() -> Value {
    let mut pairs = Vec::new();
    for i in 0..64_u64 {
        pairs.push((
            Value::Text(format!("k{i:03}")),
            Value::Array(vec![Value::Unsigned(i), Value::Signed(-(i as i64) - 1)]),
        ));
    }
    Value::Map(pairs)
}

fn bench_codec(c: &mut Criterion) {
    let value = sample_medium();
    let mut buf = vec![0u8; 1 << 16];

    c.bench_function("encode_medium", |b| {
        b.iter(|| {
            let n = encode(black_box(&value), &mut buf).unwrap();
            black_box(n);
        })
    });

    let n = encode(&value, &mut buf).unwrap();
    let doc = buf[..n].to_vec();

    c.bench_function("decode_medium", |b| {
        b.iter(|| {
            let v = decode(black_box(&doc)).unwrap();
            black_box(v);
        })
    });

    let mut ptr = [0u8; 32];
    let p = from_json_pointer("/k032/1", &mut ptr).unwrap();
    let pointer = &ptr[..p];

    c.bench_function("pointer_get_medium", |b| {
        b.iter(|| {
            let item = get(black_box(&doc), black_box(pointer)).unwrap();
            black_box(item);
        })
    });
}

criterion_group!(benches, bench_codec);
criterion_main!(benches);
