//! Benchmarks for the bit-packed record codec.
//!
//! Run with: cargo bench

use criterion::{criterion_group, criterion_main, Criterion};

use allisbns::codec::{encode_record, Decoder};

fn sample_positions(n: usize) -> Vec<u32> {
    (0..n as u32).map(|i| i * 7).collect()
}

fn bench_encode_small_record(c: &mut Criterion) {
    let positions = sample_positions(3);
    c.bench_function("encode_small_record", |b| {
        b.iter(|| encode_record(&positions, Some(5), Some(2010)));
    });
}

fn bench_encode_multi_chunk_record(c: &mut Criterion) {
    let positions = sample_positions(200);
    c.bench_function("encode_multi_chunk_record", |b| {
        b.iter(|| encode_record(&positions, Some(5), Some(2010)));
    });
}

fn bench_decode_multi_chunk_record(c: &mut Criterion) {
    let positions = sample_positions(200);
    let bytes = encode_record(&positions, Some(5), Some(2010));
    c.bench_function("decode_multi_chunk_record", |b| {
        b.iter(|| {
            let mut decoder = Decoder::new(&bytes);
            while decoder.next_chunk().unwrap().is_some() {}
        });
    });
}

criterion_group!(
    benches,
    bench_encode_small_record,
    bench_encode_multi_chunk_record,
    bench_decode_multi_chunk_record,
);
criterion_main!(benches);
