//! Hot-path micro-benchmarks: gate admission and lux estimation
//!
//! Both run once per raw sample on the capture worker, so they need to
//! stay trivially cheap compared to the acquisition itself.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use luxbridge_core::estimator::LuxEstimator;
use luxbridge_core::source::{ExposureMetadata, RawSample};
use luxbridge_core::throttle::ThrottleGate;

fn gate_admission(c: &mut Criterion) {
    c.bench_function("gate_admit_dense_stream", |b| {
        let mut gate = ThrottleGate::new(400);
        let mut timestamp = 0u64;
        b.iter(|| {
            timestamp += 16; // ~60Hz candidate stream
            black_box(gate.admit(black_box(timestamp)))
        });
    });
}

fn lux_estimation(c: &mut Criterion) {
    let estimator = LuxEstimator::new(50.0);
    let exposure = RawSample::Exposure(ExposureMetadata::new(2.0, 0.01, 100.0));
    let hardware = RawSample::Illuminance { lux: 320.0 };

    c.bench_function("estimate_exposure_triple", |b| {
        b.iter(|| black_box(estimator.estimate(black_box(&exposure))))
    });

    c.bench_function("estimate_hardware_passthrough", |b| {
        b.iter(|| black_box(estimator.estimate(black_box(&hardware))))
    });
}

criterion_group!(benches, gate_admission, lux_estimation);
criterion_main!(benches);
