use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use hashmark_core::{fingerprint, FingerprintHasher};

fn bench_fingerprint(c: &mut Criterion) {
    let mut group = c.benchmark_group("fingerprint");

    for size in [1024usize, 64 * 1024, 1024 * 1024] {
        let data = vec![0x5au8; size];
        group.throughput(Throughput::Bytes(size as u64));

        group.bench_with_input(BenchmarkId::new("one_shot", size), &data, |b, data| {
            b.iter(|| fingerprint(black_box(data)))
        });

        group.bench_with_input(BenchmarkId::new("chunked_8k", size), &data, |b, data| {
            b.iter(|| {
                let mut hasher = FingerprintHasher::new();
                for chunk in data.chunks(8 * 1024) {
                    hasher.update(black_box(chunk));
                }
                hasher.finalize()
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_fingerprint);
criterion_main!(benches);
