//! Criterion benchmarks for the integration engine.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use wiggle_core::physics::ToyPartonDistribution;
use wiggle_mc::bins::{BinSampling, Dispatch};
use wiggle_mc::domain::IntegrationDomain;
use wiggle_mc::params::{DileptonParameters, HistogramAxis, InclusiveJetParameters};
use wiggle_mc::pipeline::run_histogram;
use wiggle_mc::process::{DileptonProcess, InclusiveJetProcess, Process};
use wiggle_mc::rng::SamplerRng;
use wiggle_mc::vegas::{integrate, FnIntegrand, Stage, VegasConfig, VegasState};
use wiggle_mc::ObservableMode;

fn bench_dilepton_integrand(c: &mut Criterion) {
    let process = DileptonProcess::new(DileptonParameters::default(), BinSampling::Midpoint)
        .expect("default parameters are valid");
    let snapshot = process.snapshot(&process.histogram()[0]);
    let point = [0.02, 0.3, 0.03, 1.1, 0.1, -0.2, 5.0, 0.7, 0.05, 2.0, 100.0];
    c.bench_function("dilepton_evaluate", |b| {
        b.iter(|| process.evaluate(black_box(&point), &snapshot))
    });
}

fn bench_inclusive_jet_integrand(c: &mut Criterion) {
    let process = InclusiveJetProcess::new(
        InclusiveJetParameters::default(),
        ToyPartonDistribution::default(),
    )
    .expect("default parameters are valid");
    c.bench_function("inclusive_jet_evaluate", |b| {
        b.iter(|| process.differential(black_box(0.3), black_box(0.5), black_box(50.0)))
    });
}

fn bench_vegas_iteration(c: &mut Criterion) {
    let mut group = c.benchmark_group("vegas_iteration");
    for dims in [2usize, 6, 11] {
        let config = VegasConfig::builder()
            .warm_up(1_000, 1)
            .refine(1_000, 1)
            .build()
            .expect("valid config");
        let f = FnIntegrand::new(dims, |x: &[f64]| x.iter().map(|v| v * v).sum::<f64>());
        let domain = IntegrationDomain::unit(dims);
        group.bench_with_input(BenchmarkId::from_parameter(dims), &dims, |b, &dims| {
            b.iter(|| {
                let mut state = VegasState::new(dims, &config);
                let mut rng = SamplerRng::from_seed(1);
                integrate(&f, &domain, 1_000, Stage::WarmUp, 1, &mut rng, &mut state)
            })
        });
    }
    group.finish();
}

fn bench_histogram_dispatch(c: &mut Criterion) {
    let params = DileptonParameters {
        mode: ObservableMode::Imbalance,
        imbalance: HistogramAxis::new(0.0, 0.1, 8),
        ..DileptonParameters::default()
    };
    let process = DileptonProcess::new(params, BinSampling::Midpoint).expect("valid parameters");
    let config = VegasConfig::builder()
        .warm_up(200, 2)
        .refine(1_000, 1)
        .build()
        .expect("valid config");

    let mut group = c.benchmark_group("histogram_dispatch");
    group.sample_size(10);
    group.bench_function("sequential", |b| {
        b.iter(|| run_histogram(&process, &config, Dispatch::Sequential))
    });
    group.bench_function("parallel", |b| {
        b.iter(|| run_histogram(&process, &config, Dispatch::default()))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_dilepton_integrand,
    bench_inclusive_jet_integrand,
    bench_vegas_iteration,
    bench_histogram_dispatch
);
criterion_main!(benches);
