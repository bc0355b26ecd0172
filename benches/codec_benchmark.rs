//! Codec benchmark suite.
//!
//! Measures encode throughput (systematic plus parity) and decode
//! throughput under loss for representative batch shapes. Packet sizes
//! follow typical datagram MTUs.

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use cauchy_fec::{Codec, Decoder, Encoder};

/// Batch shapes: (batch size, packet length, parity packets).
const SHAPES: [(usize, usize, usize); 3] = [(8, 1200, 4), (32, 1200, 16), (64, 256, 32)];

fn make_sources(k: usize, len: usize) -> Vec<Vec<u8>> {
    (0..k)
        .map(|i| (0..len).map(|j| (i * 31 + j * 7 + 1) as u8).collect())
        .collect()
}

fn encode_all(sources: &[Vec<u8>], total: usize) -> Vec<Vec<u8>> {
    let mut encoder = Encoder::new(sources.len()).unwrap();
    encoder.feed_many(sources).unwrap();
    let mut out = Vec::new();
    encoder.draw(total, &mut out).unwrap();
    out
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    for (k, len, parity) in SHAPES {
        let sources = make_sources(k, len);
        group.throughput(Throughput::Bytes((k * len) as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("k{k}/len{len}/p{parity}")),
            &sources,
            |b, sources| {
                b.iter(|| black_box(encode_all(sources, k + parity)));
            },
        );
    }
    group.finish();
}

fn bench_decode_under_loss(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    for (k, len, parity) in SHAPES {
        let sources = make_sources(k, len);
        let emitted = encode_all(&sources, k + parity);
        // Drop every other systematic packet, fill up with parity.
        let received: Vec<&Vec<u8>> = emitted[..k]
            .iter()
            .step_by(2)
            .chain(emitted[k..].iter())
            .take(k)
            .collect();
        group.throughput(Throughput::Bytes((k * len) as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("k{k}/len{len}/p{parity}")),
            &received,
            |b, received| {
                b.iter(|| {
                    let mut decoder = Decoder::new();
                    for &packet in received.iter() {
                        decoder.feed(packet);
                    }
                    let mut out = Vec::new();
                    assert_eq!(decoder.draw(k, &mut out), k);
                    black_box(out)
                });
            },
        );
    }
    group.finish();
}

fn bench_systematic_passthrough(c: &mut Criterion) {
    let mut group = c.benchmark_group("systematic");
    let (k, len) = (32, 1200);
    let sources = make_sources(k, len);
    let emitted = encode_all(&sources, k);
    group.throughput(Throughput::Bytes((k * len) as u64));
    group.bench_function("lossless", |b| {
        b.iter(|| {
            let mut receiver = Codec::new();
            receiver.reset_decode();
            receiver.feed_many(&emitted).unwrap();
            let mut out = Vec::new();
            receiver.draw(k, &mut out).unwrap();
            black_box(out)
        });
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_encode,
    bench_decode_under_loss,
    bench_systematic_passthrough
);
criterion_main!(benches);
