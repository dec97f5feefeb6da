//! Pitch & energy estimation for a single frame
//!
//! ## Algorithm
//! 1. RMS over the frame; below the energy floor there is no pitch
//! 2. Remove the DC offset
//! 3. Normalized autocorrelation `sum(x[i]*x[i+lag]) / sum(x[i]^2)` over the
//!    lag range of 50-800 Hz, searched only after the zero-lag lobe has decayed
//! 4. Refine the best lag by parabolic interpolation
//! 5. If that is inconclusive, pick the magnitude-spectrum peak in 80-800 Hz
//! 6. Reject anything outside 50-800 Hz

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;
use std::f64::consts::PI;

use crate::biomarkers::FrameEstimate;
use crate::frame::AudioFrame;

/// Frames quieter than this are treated as silence
pub const ENERGY_FLOOR: f64 = 0.001;

/// Lowest plausible voiced F0 in Hz
pub const MIN_PITCH_HZ: f64 = 50.0;

/// Highest plausible voiced F0 in Hz
pub const MAX_PITCH_HZ: f64 = 800.0;

/// Minimum normalized correlation to accept a lag (low for noisy microphones)
const MIN_CORRELATION: f64 = 0.01;

/// Spectral fallback band
const SPECTRAL_MIN_HZ: f64 = 80.0;
const SPECTRAL_MAX_HZ: f64 = 800.0;

/// Minimum peak amplitude (in sample units) for the spectral fallback
const SPECTRAL_PEAK_THRESHOLD: f64 = 0.01;

/// Estimate RMS energy and fundamental frequency of one frame.
pub fn estimate(frame: &AudioFrame) -> FrameEstimate {
    let samples = frame.samples();
    let sample_rate = frame.sample_rate() as f64;

    let rms = rms(samples);
    if rms < ENERGY_FLOOR {
        return FrameEstimate { rms, pitch_hz: None };
    }

    let centered = remove_dc(samples);
    let pitch_hz = autocorrelation_pitch(&centered, sample_rate)
        .or_else(|| spectral_pitch(&centered, sample_rate))
        .filter(|f| (MIN_PITCH_HZ..=MAX_PITCH_HZ).contains(f));

    FrameEstimate { rms, pitch_hz }
}

/// Root-mean-square amplitude
pub fn rms(samples: &[f32]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
    (sum_sq / samples.len() as f64).sqrt()
}

fn remove_dc(samples: &[f32]) -> Vec<f64> {
    let mean = samples.iter().map(|&s| s as f64).sum::<f64>() / samples.len() as f64;
    samples.iter().map(|&s| s as f64 - mean).collect()
}

/// Autocorrelation pitch on a DC-free signal
pub(crate) fn autocorrelation_pitch(x: &[f64], sample_rate: f64) -> Option<f64> {
    let n = x.len();
    if n < 3 {
        return None;
    }

    let energy: f64 = x.iter().map(|v| v * v).sum();
    if energy <= 0.0 {
        return None;
    }

    // Lag range for 50-800 Hz; the longest lag needs one neighbour to its right
    let min_lag = ((sample_rate / MAX_PITCH_HZ).floor() as usize).max(1);
    let max_lag = ((sample_rate / MIN_PITCH_HZ).ceil() as usize).min(n - 2);
    if min_lag >= max_lag {
        return None;
    }

    let corr: Vec<f64> = (0..=max_lag + 1)
        .map(|lag| {
            x[..n - lag]
                .iter()
                .zip(&x[lag..])
                .map(|(a, b)| a * b)
                .sum::<f64>()
                / energy
        })
        .collect();

    // Short lags sit on the zero-lag lobe and would always win
    let lobe_end = zero_lag_lobe_end(&corr)?;
    let search_from = lobe_end.max(min_lag);
    if search_from > max_lag {
        return None;
    }

    let (best_lag, best_corr) = (search_from..=max_lag).fold(
        (search_from, f64::NEG_INFINITY),
        |(best_lag, best_corr), lag| {
            if corr[lag] > best_corr {
                (lag, corr[lag])
            } else {
                (best_lag, best_corr)
            }
        },
    );

    if best_corr <= MIN_CORRELATION {
        return None;
    }

    let offset = parabolic_offset(corr[best_lag - 1], corr[best_lag], corr[best_lag + 1]);
    let period = best_lag as f64 + offset;
    if period <= 0.0 {
        return None;
    }
    Some(sample_rate / period)
}

/// First lag past the zero-lag lobe: the first non-positive correlation,
/// or failing that the first local minimum.
fn zero_lag_lobe_end(corr: &[f64]) -> Option<usize> {
    if let Some(lag) = (1..corr.len()).find(|&lag| corr[lag] <= 0.0) {
        return Some(lag);
    }
    (1..corr.len().saturating_sub(1))
        .find(|&lag| corr[lag] < corr[lag - 1] && corr[lag] <= corr[lag + 1])
}

/// Vertex offset of the parabola through three equally spaced points
fn parabolic_offset(left: f64, center: f64, right: f64) -> f64 {
    let denom = left - 2.0 * center + right;
    if denom.abs() < 1e-12 {
        return 0.0;
    }
    (0.5 * (left - right) / denom).clamp(-0.5, 0.5)
}

/// Spectral fallback: Hann-windowed magnitude spectrum peak in 80-800 Hz
pub(crate) fn spectral_pitch(x: &[f64], sample_rate: f64) -> Option<f64> {
    let len = x.len();
    if len < 2 {
        return None;
    }

    // Pad to next power of 2 for efficient FFT
    let n = len.next_power_of_two();

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(n);

    let window: Vec<f64> = (0..len)
        .map(|i| 0.5 - 0.5 * (2.0 * PI * i as f64 / len as f64).cos())
        .collect();
    let window_sum: f64 = window.iter().sum();
    if window_sum <= 0.0 {
        return None;
    }

    let mut spectrum: Vec<Complex<f64>> = x
        .iter()
        .zip(&window)
        .map(|(&s, &w)| Complex::new(s * w, 0.0))
        .chain(std::iter::repeat(Complex::new(0.0, 0.0)).take(n - len))
        .collect();

    fft.process(&mut spectrum);

    let bin_hz = sample_rate / n as f64;
    let lo = ((SPECTRAL_MIN_HZ / bin_hz).ceil() as usize).max(1);
    let hi = ((SPECTRAL_MAX_HZ / bin_hz).floor() as usize).min(n / 2 - 1);
    if lo > hi {
        return None;
    }

    // A sinusoid of amplitude A peaks at roughly A * window_sum / 2
    let scale = 2.0 / window_sum;
    let magnitude = |k: usize| spectrum[k].norm() * scale;

    let (peak_bin, peak_mag) = (lo..=hi).fold((lo, 0.0f64), |(best_bin, best_mag), k| {
        let mag = magnitude(k);
        if mag > best_mag {
            (k, mag)
        } else {
            (best_bin, best_mag)
        }
    });

    if peak_mag <= SPECTRAL_PEAK_THRESHOLD {
        return None;
    }

    let offset = parabolic_offset(magnitude(peak_bin - 1), peak_mag, magnitude(peak_bin + 1));
    Some((peak_bin as f64 + offset) * bin_hz)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SAMPLE_RATE: u32 = 16000;
    const FRAME_SIZE: usize = 2048;

    /// Generate a sine frame at a given frequency
    fn sine_frame(freq: f64, amplitude: f64, sample_rate: u32, len: usize) -> AudioFrame {
        let samples = (0..len)
            .map(|i| {
                let t = i as f64 / sample_rate as f64;
                ((2.0 * PI * freq * t).sin() * amplitude) as f32
            })
            .collect();
        AudioFrame::new(samples, sample_rate).unwrap()
    }

    fn assert_within(actual: f64, expected: f64, tolerance: f64) {
        let err = (actual - expected).abs() / expected;
        assert!(
            err <= tolerance,
            "expected {:.2} Hz within {:.1}%, got {:.2} Hz",
            expected,
            tolerance * 100.0,
            actual
        );
    }

    #[test]
    fn test_rms_of_sine() {
        let frame = sine_frame(200.0, 0.5, SAMPLE_RATE, 16000);
        let r = rms(frame.samples());
        // 0.5 / sqrt(2)
        assert!((r - 0.353_553).abs() < 1e-3, "rms was {}", r);
    }

    #[test]
    fn test_silence_has_no_pitch() {
        let frame = AudioFrame::new(vec![0.0; FRAME_SIZE], SAMPLE_RATE).unwrap();
        let est = estimate(&frame);
        assert_eq!(est.rms, 0.0);
        assert!(est.pitch_hz.is_none());
    }

    #[test]
    fn test_quiet_tone_is_gated() {
        // Periodic, but below the energy floor
        let frame = sine_frame(200.0, 0.001, SAMPLE_RATE, FRAME_SIZE);
        let est = estimate(&frame);
        assert!(est.rms < ENERGY_FLOOR);
        assert!(est.pitch_hz.is_none());
    }

    #[test]
    fn test_sine_pitch_accuracy() {
        for &freq in &[60.0, 85.0, 110.0, 150.0, 220.0, 330.0, 440.0, 600.0, 750.0] {
            let frame = sine_frame(freq, 0.5, SAMPLE_RATE, FRAME_SIZE);
            let est = estimate(&frame);
            let pitch = est
                .pitch_hz
                .unwrap_or_else(|| panic!("no pitch detected for {} Hz", freq));
            assert_within(pitch, freq, 0.02);
        }
    }

    #[test]
    fn test_sine_pitch_at_44100() {
        for &freq in &[100.0, 250.0, 500.0] {
            let frame = sine_frame(freq, 0.3, 44100, 4096);
            let pitch = estimate(&frame).pitch_hz.unwrap();
            assert_within(pitch, freq, 0.02);
        }
    }

    #[test]
    fn test_dc_offset_does_not_shift_pitch() {
        let frame = sine_frame(180.0, 0.4, SAMPLE_RATE, FRAME_SIZE);
        let shifted: Vec<f32> = frame.samples().iter().map(|s| s + 0.2).collect();
        let frame = AudioFrame::new(shifted, SAMPLE_RATE).unwrap();
        let pitch = estimate(&frame).pitch_hz.unwrap();
        assert_within(pitch, 180.0, 0.02);
    }

    #[test]
    fn test_harmonic_signal_reports_fundamental() {
        // Fundamental + 2nd + 3rd harmonic (typical voice)
        let fundamental = 150.0;
        let samples: Vec<f32> = (0..FRAME_SIZE)
            .map(|i| {
                let t = i as f64 / SAMPLE_RATE as f64;
                ((2.0 * PI * fundamental * t).sin() * 0.5
                    + (2.0 * PI * fundamental * 2.0 * t).sin() * 0.25
                    + (2.0 * PI * fundamental * 3.0 * t).sin() * 0.125) as f32
            })
            .collect();
        let frame = AudioFrame::new(samples, SAMPLE_RATE).unwrap();
        let pitch = estimate(&frame).pitch_hz.unwrap();
        assert_within(pitch, fundamental, 0.02);
    }

    #[test]
    fn test_autocorrelation_needs_a_full_lag_range() {
        // Too short to hold even the shortest lag
        let x: Vec<f64> = (0..16).map(|i| (i as f64 * 0.7).sin()).collect();
        assert!(autocorrelation_pitch(&x, 16000.0).is_none());
    }

    #[test]
    fn test_spectral_pitch_finds_tone() {
        let frame = sine_frame(300.0, 0.5, SAMPLE_RATE, FRAME_SIZE);
        let x = remove_dc(frame.samples());
        let pitch = spectral_pitch(&x, SAMPLE_RATE as f64).unwrap();
        assert_within(pitch, 300.0, 0.03);
    }

    #[test]
    fn test_spectral_pitch_ignores_out_of_band_tone() {
        // 2 kHz tone leaves nothing above threshold in 80-800 Hz
        let frame = sine_frame(2000.0, 0.5, SAMPLE_RATE, FRAME_SIZE);
        let x = remove_dc(frame.samples());
        assert!(spectral_pitch(&x, SAMPLE_RATE as f64).is_none());
    }

    #[test]
    fn test_estimate_falls_back_to_spectrum() {
        // 128 samples cannot hold a 100 Hz period, so autocorrelation declines
        let frame = sine_frame(100.0, 0.5, SAMPLE_RATE, 128);
        let x = remove_dc(frame.samples());
        assert!(autocorrelation_pitch(&x, SAMPLE_RATE as f64).is_none());

        let spectral = spectral_pitch(&x, SAMPLE_RATE as f64);
        assert!(spectral.is_some());

        let est = estimate(&frame);
        assert!(est.rms >= ENERGY_FLOOR);
        assert_eq!(est.pitch_hz, spectral);
        let pitch = est.pitch_hz.unwrap();
        assert!((MIN_PITCH_HZ..=MAX_PITCH_HZ).contains(&pitch), "pitch {}", pitch);
    }

    #[test]
    fn test_estimate_without_periodicity_or_peak() {
        // Loud but constant: nothing left once the DC offset is removed
        let frame = AudioFrame::new(vec![0.5; FRAME_SIZE], SAMPLE_RATE).unwrap();
        let x = remove_dc(frame.samples());
        assert!(autocorrelation_pitch(&x, SAMPLE_RATE as f64).is_none());
        assert!(spectral_pitch(&x, SAMPLE_RATE as f64).is_none());

        let est = estimate(&frame);
        assert!(est.rms >= ENERGY_FLOOR);
        assert!(est.pitch_hz.is_none());
    }

    #[test]
    fn test_parabolic_offset() {
        assert_eq!(parabolic_offset(1.0, 2.0, 1.0), 0.0);
        assert!(parabolic_offset(1.0, 2.0, 1.5) > 0.0);
        assert!(parabolic_offset(1.5, 2.0, 1.0) < 0.0);
        assert_eq!(parabolic_offset(1.0, 1.0, 1.0), 0.0);
    }

    #[test]
    fn test_estimate_is_pure() {
        let frame = sine_frame(210.0, 0.3, SAMPLE_RATE, FRAME_SIZE);
        assert_eq!(estimate(&frame), estimate(&frame));
    }

    proptest! {
        #[test]
        fn prop_energy_gate(
            samples in proptest::collection::vec(-0.0009f32..0.0009, 1..4096)
        ) {
            let frame = AudioFrame::new(samples, SAMPLE_RATE).unwrap();
            let est = estimate(&frame);
            prop_assert!(est.rms < ENERGY_FLOOR);
            prop_assert!(est.pitch_hz.is_none());
        }

        #[test]
        fn prop_accepted_pitch_is_plausible(
            samples in proptest::collection::vec(-1.0f32..1.0, 64..2048)
        ) {
            let frame = AudioFrame::new(samples, SAMPLE_RATE).unwrap();
            let est = estimate(&frame);
            prop_assert!(est.rms.is_finite());
            if let Some(pitch) = est.pitch_hz {
                prop_assert!((MIN_PITCH_HZ..=MAX_PITCH_HZ).contains(&pitch));
            }
        }

        #[test]
        fn prop_sine_within_two_percent(freq in 60.0f64..780.0) {
            let frame = sine_frame(freq, 0.5, SAMPLE_RATE, FRAME_SIZE);
            let pitch = estimate(&frame).pitch_hz;
            prop_assert!(pitch.is_some());
            let pitch = pitch.unwrap();
            prop_assert!((pitch - freq).abs() / freq <= 0.02, "{} vs {}", pitch, freq);
        }
    }
}
