//! Benchmarks for the heavy analysis stages

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fr_spectra::audio::PinkNoiseGenerator;
use fr_spectra::filters::FftConvolver;
use fr_spectra::spectrum::{smooth_fractional_octave, WelchEstimator};

fn bench_welch(c: &mut Criterion) {
    let signal = PinkNoiseGenerator::seeded(1).generate_samples(48000, 10.0);
    let filtered: Vec<f32> = signal.iter().map(|s| s * 0.5).collect();
    let mut welch = WelchEstimator::default();

    c.bench_function("welch_single_10s", |b| {
        b.iter(|| welch.estimate(black_box(&signal), None, 48000))
    });
    c.bench_function("welch_pair_10s", |b| {
        b.iter(|| welch.estimate(black_box(&signal), Some(filtered.as_slice()), 48000))
    });
}

fn bench_convolution(c: &mut Criterion) {
    let signal = PinkNoiseGenerator::seeded(2).generate_samples(48000, 10.0);
    let mut convolver = FftConvolver::new();
    let mut group = c.benchmark_group("fft_convolution");

    for ir_len in [256usize, 4096, 48000] {
        let ir: Vec<f32> = (0..ir_len).map(|i| (-(i as f32) / 500.0).exp()).collect();
        group.bench_with_input(BenchmarkId::from_parameter(ir_len), &ir, |b, ir| {
            b.iter(|| convolver.convolve(black_box(&signal), ir))
        });
    }
    group.finish();
}

fn bench_smoothing(c: &mut Criterion) {
    let freqs: Vec<f32> = (27..27307).map(|k| k as f32 * 48000.0 / 65536.0).collect();
    let db: Vec<f32> = freqs.iter().map(|f| -10.0 * f.log10()).collect();

    c.bench_function("smooth_third_octave", |b| {
        b.iter(|| smooth_fractional_octave(black_box(&freqs), &db, 3.0))
    });
}

criterion_group!(benches, bench_welch, bench_convolution, bench_smoothing);
criterion_main!(benches);
