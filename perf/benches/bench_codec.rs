use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use morse_codec::{Tokens, decode, encode};
use morse_perf::{sample_morse, sample_text};

const SIZES: [usize; 3] = [19, 256, 4096];

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec/encode");
    for len in SIZES {
        let text = sample_text(len);
        group.throughput(Throughput::Bytes(len as u64));
        group.bench_with_input(BenchmarkId::from_parameter(len), &text, |b, text| {
            b.iter(|| black_box(encode(black_box(text))));
        });
    }
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec/decode");
    for len in SIZES {
        let morse = sample_morse(len);
        group.throughput(Throughput::Bytes(morse.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(len), &morse, |b, morse| {
            b.iter(|| black_box(decode(black_box(morse))));
        });
    }
    group.finish();
}

fn bench_tokenize(c: &mut Criterion) {
    let morse = sample_morse(4096);
    let mut group = c.benchmark_group("codec");
    group.throughput(Throughput::Bytes(morse.len() as u64));
    group.bench_function("tokenize 4096", |b| {
        b.iter(|| black_box(Tokens::new(black_box(&morse)).count()));
    });
    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode, bench_tokenize);
criterion_main!(benches);
