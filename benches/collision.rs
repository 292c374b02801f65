//! Collision resolver throughput for scenes of increasing size.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use reef::core::{Bounds, SeededRng};
use reef::engine::{Collider, CollisionResolver};

fn scatter(count: usize, seed: u64) -> Vec<Collider> {
    let mut rng = SeededRng::new(seed);
    (0..count)
        .map(|slot| Collider {
            slot,
            bounds: Bounds::new(rng.next_range(0.0, 1000.0), rng.next_range(0.0, 750.0), 20.0, 20.0),
        })
        .collect()
}

fn bench_contacts(c: &mut Criterion) {
    let mut group = c.benchmark_group("contacts");
    for count in [16, 64, 256] {
        let colliders = scatter(count, 42);
        let mut resolver = CollisionResolver::default();
        group.bench_with_input(BenchmarkId::from_parameter(count), &colliders, |b, colliders| {
            b.iter(|| resolver.contacts(black_box(colliders)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_contacts);
criterion_main!(benches);
