//! Codec Benchmarks
//!
//! Run with: cargo bench --bench format

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tempfile::tempdir;

use attune::{factory, read_index, write_index};
use attune::{BinarySegment, BinarySet, IndexFamily, IndexParams};

fn populated_index(segment_kib: usize) -> attune::VectorIndex {
    let mut rng = StdRng::seed_from_u64(42);
    let mut segments = BinarySet::new();
    for name in ["raw_vectors", "centroids", "codebook", "ids"] {
        let payload: Vec<u8> = (0..segment_kib * 1024).map(|_| rng.gen()).collect();
        segments.append(BinarySegment::new(name, payload));
    }
    let mut index = factory::create(IndexFamily::IvfPqCpu, &IndexParams::new()).unwrap();
    index.load(segments).unwrap();
    index
}

fn bench_write(c: &mut Criterion) {
    let mut group = c.benchmark_group("format_write");
    let dir = tempdir().unwrap();

    for segment_kib in [16, 256, 1024] {
        let index = populated_index(segment_kib);
        let path = dir.path().join(format!("write_{segment_kib}.idx"));
        group.bench_with_input(
            BenchmarkId::from_parameter(segment_kib),
            &segment_kib,
            |b, _| {
                b.iter(|| {
                    write_index(&index, &path).unwrap();
                    black_box(())
                })
            },
        );
    }
    group.finish();
}

fn bench_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("format_read");
    let dir = tempdir().unwrap();

    for segment_kib in [16, 256, 1024] {
        let index = populated_index(segment_kib);
        let path = dir.path().join(format!("read_{segment_kib}.idx"));
        write_index(&index, &path).unwrap();
        group.bench_with_input(
            BenchmarkId::from_parameter(segment_kib),
            &segment_kib,
            |b, _| {
                b.iter(|| {
                    let loaded = read_index(&path).unwrap().unwrap();
                    black_box(loaded.family())
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_write, bench_read);
criterion_main!(benches);
