//! Criterion benchmarks for wiggle_core hot-path functions.
//!
//! Every integrand evaluation builds several transverse vectors, two
//! photon-flux products and one Bessel kernel; these benches track each.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use wiggle_core::kinematics::KinematicVector;
use wiggle_core::math::bessel_j0;
use wiggle_core::physics::Nucleus;

fn bench_vector_arithmetic(c: &mut Criterion) {
    c.bench_function("vector_polar_sum_magnitude", |b| {
        b.iter(|| {
            let a = KinematicVector::from_polar(black_box(1.3), black_box(0.4));
            let d = KinematicVector::from_polar(black_box(0.7), black_box(-2.2));
            let s = &a - &d;
            black_box(s.r() + s.phi())
        })
    });
}

fn bench_bessel_j0(c: &mut Criterion) {
    let mut group = c.benchmark_group("bessel_j0");
    group.bench_function("rational_branch", |b| b.iter(|| bessel_j0(black_box(3.7))));
    group.bench_function("asymptotic_branch", |b| b.iter(|| bessel_j0(black_box(42.0))));
    group.finish();
}

fn bench_photon_flux(c: &mut Criterion) {
    let lead = Nucleus::lead();
    c.bench_function("photon_flux", |b| {
        b.iter(|| lead.photon_flux(black_box(0.012), black_box(0.034)))
    });
}

criterion_group!(benches, bench_vector_arithmetic, bench_bessel_j0, bench_photon_flux);
criterion_main!(benches);
