use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use hashdrbg::{HashDrbg, SplitMix};
use std::hint::black_box;

fn bench_generate(c: &mut Criterion) {
    let drbg = HashDrbg::from_entropy(SplitMix::new(42));
    let mut group = c.benchmark_group("generate");
    for size in [16_usize, 64, 1024, 64 * 1024] {
        let mut buffer = vec![0_u8; size];
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| drbg.generate(black_box(&mut buffer)).unwrap());
        });
    }
    group.finish();
}

fn bench_reseed(c: &mut Criterion) {
    let drbg = HashDrbg::from_entropy(SplitMix::new(42));
    c.bench_function("reseed", |b| b.iter(|| drbg.reseed().unwrap()));
}

fn bench_system_entropy(c: &mut Criterion) {
    let drbg = HashDrbg::new();
    let mut buffer = [0_u8; 32];
    c.bench_function("generate 32 bytes, system entropy", |b| {
        b.iter(|| drbg.generate(black_box(&mut buffer)).unwrap());
    });
}

criterion_group!(benches, bench_generate, bench_reseed, bench_system_entropy);
criterion_main!(benches);
