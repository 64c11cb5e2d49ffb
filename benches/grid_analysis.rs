//! Full-pipeline benchmarks on synthetic layers
//!
//! ```bash
//! cargo bench --bench grid_analysis
//! ```
//!
//! - `analyze_solar/N`: solar analysis over an N x N synthetic area
//! - `terrain/N`: slope and aspect alone
//! - `compare_energy_types`: all four energy types over a 40 x 40 area

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use site_scorer_rust::data::LayerName;
use site_scorer_rust::terrain::TerrainDerivatives;
use site_scorer_rust::{
    generate_grid, synthetic_store, AnalysisConfig, AnalysisRequest, EnergyType, Polygon, SiteScorer,
    SYNTHETIC_CELL_SIZE,
};

fn area(size: usize) -> Polygon {
    let max = size as f64 - 1.0;
    Polygon::from_coords(&[(0.0, 0.0), (max, 0.0), (max, max), (0.0, max)])
}

fn scorer() -> SiteScorer {
    SiteScorer::new(AnalysisConfig {
        cell_size: SYNTHETIC_CELL_SIZE,
        ..AnalysisConfig::default()
    })
    .expect("default config is valid")
}

fn bench_analyze(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze_solar");
    group.sample_size(20);
    let scorer = scorer();

    for size in [25usize, 50, 100] {
        let store = synthetic_store(size, size, 42);
        let request = AnalysisRequest::new(area(size), EnergyType::Solar);
        group.throughput(Throughput::Elements((size * size) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| black_box(scorer.analyze(&store, &request).expect("analysis succeeds")))
        });
    }

    group.finish();
}

fn bench_terrain(c: &mut Criterion) {
    let mut group = c.benchmark_group("terrain");

    for size in [50usize, 100, 200] {
        let store = synthetic_store(size, size, 42);
        let elevation = store.layer(LayerName::Elevation).expect("synthetic elevation");
        let points = generate_grid(&area(size), 1.0).expect("valid grid");
        group.throughput(Throughput::Elements(points.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &points, |b, points| {
            b.iter(|| {
                black_box(TerrainDerivatives::compute(
                    elevation,
                    points,
                    SYNTHETIC_CELL_SIZE,
                    store.frame(),
                ))
            })
        });
    }

    group.finish();
}

fn bench_compare(c: &mut Criterion) {
    let store = synthetic_store(40, 40, 42);
    let polygon = area(40);
    let scorer = scorer();

    c.bench_function("compare_energy_types", |b| {
        b.iter(|| black_box(scorer.compare_energy_types(&store, &polygon).expect("comparison succeeds")))
    });
}

criterion_group!(benches, bench_analyze, bench_terrain, bench_compare);
criterion_main!(benches);
