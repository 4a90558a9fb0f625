//! Benchmarks for the simulation, analysis and sonification pipeline

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use rootstar_sonify_core::types::{BrainState, EegBand, EegSignal};
use rootstar_sonify_native::processing::{
    decompose, fft::SpectralAnalyzer, filters::BandpassFilter, hjorth, power_spectrum, Taper,
};
use rootstar_sonify_native::simulation::generate;
use rootstar_sonify_native::sonification::{multiband_synthesis, tone_mapping};

/// Synthetic EEG: alpha sine with pseudo-noise
fn eeg_signal(n: usize, sample_rate: f64) -> EegSignal {
    use std::f64::consts::PI;

    let samples = (0..n)
        .map(|i| {
            let t = i as f64 / sample_rate;
            let signal = (2.0 * PI * 10.0 * t).sin();
            let noise = (i as f64 * 0.123).sin() * 0.1;
            (signal + noise) * 50.0
        })
        .collect();
    EegSignal::new(samples, sample_rate).expect("valid benchmark signal")
}

fn bench_bandpass(c: &mut Criterion) {
    let mut group = c.benchmark_group("bandpass_filtfilt");

    let filter = BandpassFilter::for_band(256.0, EegBand::Alpha).expect("alpha fits at 256 Hz");
    for size in [512, 2560, 15360].iter() {
        let signal = eeg_signal(*size, 256.0);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| black_box(filter.filtfilt(black_box(signal.samples()))));
        });
    }

    group.finish();
}

fn bench_decompose(c: &mut Criterion) {
    let signal = eeg_signal(2560, 256.0);
    c.bench_function("decompose_10s", |b| {
        b.iter(|| black_box(decompose(black_box(&signal))));
    });
}

fn bench_welch(c: &mut Criterion) {
    let mut group = c.benchmark_group("welch_psd");

    for size in [256, 2560, 15360].iter() {
        let signal = eeg_signal(*size, 256.0);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| black_box(power_spectrum(black_box(&signal))));
        });
    }

    group.finish();
}

fn bench_segment_psd(c: &mut Criterion) {
    let signal = eeg_signal(256, 256.0);
    let mut analyzer = SpectralAnalyzer::new(256, 256.0, Taper::Hann).expect("valid analyzer");
    c.bench_function("segment_psd_256", |b| {
        b.iter(|| black_box(analyzer.segment_psd(black_box(signal.samples()))));
    });
}

fn bench_hjorth(c: &mut Criterion) {
    let signal = eeg_signal(2560, 256.0);
    c.bench_function("hjorth_10s", |b| {
        b.iter(|| black_box(hjorth(black_box(&signal))));
    });
}

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_10s");

    for state in BrainState::ALL {
        group.bench_with_input(BenchmarkId::from_parameter(state), &state, |b, &state| {
            let mut rng = StdRng::seed_from_u64(42);
            b.iter(|| black_box(generate(state, 256.0, 10.0, &mut rng)));
        });
    }

    group.finish();
}

fn bench_sonification(c: &mut Criterion) {
    let mut group = c.benchmark_group("sonification");
    group.sample_size(10);

    let signal = eeg_signal(2560, 256.0);
    let bands = decompose(&signal).expect("decomposition at 256 Hz");

    group.bench_function("tone_mapping_10s", |b| {
        b.iter(|| black_box(tone_mapping(black_box(&signal), 10.0)));
    });

    group.bench_function("multiband_10s", |b| {
        let mut rng = StdRng::seed_from_u64(7);
        b.iter(|| black_box(multiband_synthesis(black_box(&bands), &mut rng)));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_bandpass,
    bench_decompose,
    bench_welch,
    bench_segment_psd,
    bench_hjorth,
    bench_generate,
    bench_sonification,
);

criterion_main!(benches);
