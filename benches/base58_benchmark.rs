//! Base58 encode/decode throughput for device identifiers.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use loginwatch::base58;

fn payload(len: usize) -> Vec<u8> {
    // A couple of leading zeros to exercise the '1' prefix path
    let mut bytes = vec![0u8, 0u8];
    bytes.extend((0..len.saturating_sub(2)).map(|i| (i * 31 + 7) as u8));
    bytes
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("base58_encode");

    for size in [16, 32, 64, 256].iter() {
        let input = payload(*size);
        group.throughput(Throughput::Bytes(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &input, |b, input| {
            b.iter(|| base58::encode(black_box(input)))
        });
    }

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("base58_decode");

    for size in [16, 32, 64, 256].iter() {
        let encoded = base58::encode(&payload(*size));
        group.throughput(Throughput::Bytes(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &encoded, |b, encoded| {
            b.iter(|| base58::decode(black_box(encoded)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
