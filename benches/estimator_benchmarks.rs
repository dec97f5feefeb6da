use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use voice_screen_lib::biomarkers::{estimate, SessionAggregator};
use voice_screen_lib::wav::sine_tone;
use voice_screen_lib::{analyze, AudioFrame, FrameEstimate, SessionAggregate};

fn frame_from(samples: Vec<f32>, rate: u32) -> AudioFrame {
    AudioFrame::new(samples, rate).unwrap()
}

fn benchmark_estimate_frame_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("Estimate 16kHz");

    for size in [512usize, 1024, 2048, 4096].iter() {
        let mut samples = sine_tone(180.0, 0.3, 16000, 1000);
        samples.truncate(*size);
        let frame = frame_from(samples, 16000);

        group.bench_with_input(BenchmarkId::new("sine_180hz", size), &frame, |b, frame| {
            b.iter(|| black_box(estimate(black_box(frame))));
        });
    }

    group.finish();
}

fn benchmark_estimate_sample_rates(c: &mut Criterion) {
    let mut group = c.benchmark_group("Estimate Various Rates");

    for rate in [8000u32, 16000, 44100, 48000].iter() {
        let mut samples = sine_tone(220.0, 0.3, *rate, 1000);
        samples.truncate(2048);
        let frame = frame_from(samples, *rate);

        group.bench_with_input(BenchmarkId::new("rate", rate), &frame, |b, frame| {
            b.iter(|| black_box(estimate(black_box(frame))));
        });
    }

    group.finish();
}

fn benchmark_estimate_signals(c: &mut Criterion) {
    let mut group = c.benchmark_group("Estimate Signal Types");

    // Speech-like signal (mix of frequencies)
    let speech: Vec<f32> = (0..2048)
        .map(|i| {
            let t = i as f32 / 16000.0;
            let f1 = (2.0 * std::f32::consts::PI * 200.0 * t).sin() * 0.3;
            let f2 = (2.0 * std::f32::consts::PI * 500.0 * t).sin() * 0.2;
            let f3 = (2.0 * std::f32::consts::PI * 1500.0 * t).sin() * 0.1;
            f1 + f2 + f3
        })
        .collect();
    let speech = frame_from(speech, 16000);
    group.bench_function("speech_like_signal", |b| {
        b.iter(|| black_box(estimate(black_box(&speech))));
    });

    // Below the energy floor, returns before any pitch search
    let silence = frame_from(vec![0.0; 2048], 16000);
    group.bench_function("silence", |b| {
        b.iter(|| black_box(estimate(black_box(&silence))));
    });

    group.finish();
}

fn benchmark_session(c: &mut Criterion) {
    let mut group = c.benchmark_group("Session");

    let estimates: Vec<FrameEstimate> = (0..40)
        .map(|i| FrameEstimate {
            rms: 0.05,
            pitch_hz: Some(150.0 + (i % 7) as f64),
        })
        .collect();

    group.bench_function("observe_40_frames", |b| {
        b.iter(|| {
            let mut aggregator = SessionAggregator::new(100);
            aggregator.start();
            for e in &estimates {
                black_box(aggregator.observe(e));
            }
            black_box(aggregator.finish())
        });
    });

    let aggregate = SessionAggregate::new(0.03, Some(110.0), Some(0.09))
        .with_pitch_history((0..100).map(|i| 110.0 + (i % 5) as f64 * 3.0).collect());
    group.bench_function("analyze", |b| {
        b.iter(|| black_box(analyze(black_box(&aggregate))));
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_estimate_frame_sizes,
    benchmark_estimate_sample_rates,
    benchmark_estimate_signals,
    benchmark_session,
);
criterion_main!(benches);
