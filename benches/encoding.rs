use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use std::sync::Arc;
use widebase::{Alphabet, LiteralOracle, StreamCodec};

fn python_codec() -> StreamCodec {
    let alphabet = Alphabet::build(&LiteralOracle::python()).unwrap();
    StreamCodec::new(Arc::new(alphabet), 347).unwrap()
}

fn bench_charset_build(c: &mut Criterion) {
    c.bench_function("charset_build_python", |b| {
        b.iter(|| Alphabet::build(black_box(&LiteralOracle::python())).unwrap());
    });
}

fn bench_encode(c: &mut Criterion) {
    let codec = python_codec();
    let mut group = c.benchmark_group("encode");

    for size in [347usize, 4096, 65536].iter() {
        group.throughput(Throughput::Bytes(*size as u64));
        let data: Vec<u8> = (0..*size).map(|i| (i % 256) as u8).collect();

        group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
            b.iter(|| codec.encode(black_box(data)).unwrap());
        });
    }
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let codec = python_codec();
    let mut group = c.benchmark_group("decode");

    for size in [347usize, 4096, 65536].iter() {
        let data: Vec<u8> = (0..*size).map(|i| (i % 256) as u8).collect();
        let encoded = codec.encode(&data).unwrap();

        group.throughput(Throughput::Bytes(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &encoded, |b, encoded| {
            b.iter(|| codec.decode(black_box(encoded), Some(*size)).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_charset_build, bench_encode, bench_decode);
criterion_main!(benches);
