use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use hearth::index::{BlendWeights, DistanceIndex, SimilaritySignals, SimilarityStore};
use hearth::recommend::RecommendationEngine;
use hearth::types::RankingScope;

fn names(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("apt_{i}")).collect()
}

fn random_matrix(n: usize, rng: &mut StdRng) -> Vec<Vec<f64>> {
    (0..n)
        .map(|_| (0..n).map(|_| rng.gen_range(0.0..1.0)).collect())
        .collect()
}

fn engine(n: usize) -> RecommendationEngine {
    let mut rng = StdRng::seed_from_u64(42);
    let signals = SimilaritySignals {
        facility: random_matrix(n, &mut rng),
        price: random_matrix(n, &mut rng),
        location: random_matrix(n, &mut rng),
    };
    let store = SimilarityStore::new(names(n), signals, BlendWeights::default()).unwrap();
    RecommendationEngine::new(Arc::new(store))
}

fn bench_recommend(c: &mut Criterion) {
    let mut group = c.benchmark_group("recommend");
    for n in [500usize, 2_000] {
        let engine = engine(n);
        let candidates: Vec<String> = names(n).into_iter().step_by(10).collect();

        group.bench_with_input(BenchmarkId::new("universe", n), &n, |b, _| {
            b.iter(|| {
                engine
                    .recommend(black_box("apt_17"), 5, RankingScope::Universe)
                    .unwrap()
            })
        });
        group.bench_with_input(BenchmarkId::new("candidates", n), &n, |b, _| {
            b.iter(|| {
                engine
                    .recommend(black_box("apt_17"), 5, RankingScope::Candidates(&candidates))
                    .unwrap()
            })
        });
    }
    group.finish();
}

fn bench_radius_query(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(7);
    let n = 5_000;
    let rows = (0..n)
        .map(|_| (0..100).map(|_| rng.gen_range(0.0..20_000.0)).collect())
        .collect();
    let locations = (0..100).map(|i| format!("sector {i}")).collect();
    let index = DistanceIndex::new(names(n), locations, rows).unwrap();

    c.bench_function("radius_query_5000x100", |b| {
        b.iter(|| index.query(black_box("sector 42"), black_box(3.0)).unwrap())
    });
}

criterion_group!(benches, bench_recommend, bench_radius_query);
criterion_main!(benches);
