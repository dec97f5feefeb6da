//! Stability metrics: jitter and pitch stability over a rolling history
//!
//! ## Concept
//! Cycle-to-cycle variability of F0 is a marker of vocal fold instability.
//! Frame-level pitch estimates are kept in a bounded FIFO so that a long
//! session cannot grow memory and recent frames dominate.
//!
//! ## Metrics
//! - **Relative jitter**: standard deviation of the absolute successive
//!   differences divided by their mean
//! - **Stability**: `1 - sqrt(mean(successive diff^2)) / 100`, clamped to 0-1
//! - **Spread**: standard deviation of the pitch values themselves (Hz)

use std::collections::VecDeque;

/// Minimum history length before jitter is reported
pub const MIN_JITTER_SAMPLES: usize = 10;

/// Pitch difference (Hz RMS) at which stability reaches zero
const STABILITY_SCALE_HZ: f64 = 100.0;

/// Bounded history of accepted pitch estimates
#[derive(Debug, Clone)]
pub struct PitchTracker {
    history: VecDeque<f64>,
    capacity: usize,
}

impl PitchTracker {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            history: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push an accepted pitch, evicting the oldest when over capacity
    pub fn accept(&mut self, pitch_hz: f64) {
        if self.history.len() >= self.capacity {
            self.history.pop_front();
        }
        self.history.push_back(pitch_hz);
    }

    /// Relative jitter, once at least `MIN_JITTER_SAMPLES` pitches are held
    pub fn jitter(&self) -> Option<f64> {
        relative_jitter(&self.history)
    }

    /// Stability score in 0-1 (1.0 until two pitches exist)
    pub fn stability(&self) -> f64 {
        pitch_stability(&self.history).unwrap_or(1.0)
    }

    /// Standard deviation of the held pitches in Hz
    pub fn spread(&self) -> Option<f64> {
        pitch_spread(&self.history)
    }

    /// Copy of the history, oldest first
    pub fn snapshot(&self) -> Vec<f64> {
        self.history.iter().copied().collect()
    }

    /// Clear the history (start of a new session)
    pub fn reset(&mut self) {
        self.history.clear();
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

fn successive_diffs<'a, I>(values: I) -> Vec<f64>
where
    I: IntoIterator<Item = &'a f64>,
{
    let mut diffs = Vec::new();
    let mut prev: Option<f64> = None;
    for &v in values {
        if let Some(p) = prev {
            diffs.push((v - p).abs());
        }
        prev = Some(v);
    }
    diffs
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Relative jitter of a pitch sequence.
///
/// `None` with fewer than `MIN_JITTER_SAMPLES` values or when every
/// successive difference is zero.
pub fn relative_jitter<'a, I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a f64>,
{
    let diffs = successive_diffs(values);
    if diffs.len() + 1 < MIN_JITTER_SAMPLES {
        return None;
    }

    let mean_diff = mean(&diffs);
    if mean_diff == 0.0 {
        return None;
    }

    let variance = diffs.iter().map(|d| (d - mean_diff).powi(2)).sum::<f64>() / diffs.len() as f64;
    Some(variance.sqrt() / mean_diff)
}

/// Stability score of a pitch sequence, `None` with fewer than two values
pub fn pitch_stability<'a, I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a f64>,
{
    let diffs = successive_diffs(values);
    if diffs.is_empty() {
        return None;
    }
    let mean_sq = diffs.iter().map(|d| d * d).sum::<f64>() / diffs.len() as f64;
    Some((1.0 - mean_sq.sqrt() / STABILITY_SCALE_HZ).clamp(0.0, 1.0))
}

/// Standard deviation of the pitch values in Hz, `None` with fewer than two
pub fn pitch_spread<'a, I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a f64>,
{
    let values: Vec<f64> = values.into_iter().copied().collect();
    if values.len() < 2 {
        return None;
    }
    let m = mean(&values);
    let variance = values.iter().map(|p| (p - m).powi(2)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_capacity_is_enforced() {
        let mut tracker = PitchTracker::new(5);
        for i in 0..12 {
            tracker.accept(100.0 + i as f64);
        }
        assert_eq!(tracker.len(), 5);
        // Oldest values were evicted
        assert_eq!(tracker.snapshot(), vec![107.0, 108.0, 109.0, 110.0, 111.0]);
    }

    #[test]
    fn test_zero_capacity_is_raised_to_one() {
        let mut tracker = PitchTracker::new(0);
        tracker.accept(120.0);
        tracker.accept(130.0);
        assert_eq!(tracker.capacity(), 1);
        assert_eq!(tracker.snapshot(), vec![130.0]);
    }

    #[test]
    fn test_jitter_needs_ten_values() {
        let mut tracker = PitchTracker::new(100);
        for i in 0..9 {
            tracker.accept(if i % 2 == 0 { 150.0 } else { 155.0 + i as f64 });
        }
        assert!(tracker.jitter().is_none());

        tracker.accept(149.0);
        assert!(tracker.jitter().is_some());
    }

    #[test]
    fn test_jitter_constant_pitch_is_none() {
        let mut tracker = PitchTracker::new(100);
        for _ in 0..20 {
            tracker.accept(200.0);
        }
        // Mean successive difference is zero
        assert!(tracker.jitter().is_none());
        assert_eq!(tracker.stability(), 1.0);
    }

    #[test]
    fn test_jitter_uniform_steps_is_zero() {
        // Every step is exactly 5 Hz, so the differences have no spread
        let values: Vec<f64> = (0..12).map(|i| 150.0 + 5.0 * i as f64).collect();
        assert_eq!(relative_jitter(&values), Some(0.0));
    }

    #[test]
    fn test_jitter_irregular_steps() {
        let values = [150.0, 152.0, 150.0, 160.0, 150.0, 151.0, 150.0, 165.0, 150.0, 152.0];
        let jitter = relative_jitter(&values).unwrap();
        assert!(jitter > 0.5, "expected large relative jitter, got {}", jitter);
    }

    #[test]
    fn test_stability_alternating_pitch() {
        // |diff| = 50 Hz every step -> 1 - 50/100
        let values: Vec<f64> = (0..20).map(|i| if i % 2 == 0 { 100.0 } else { 150.0 }).collect();
        let stability = pitch_stability(&values).unwrap();
        assert!((stability - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_stability_is_clamped() {
        let values = [80.0, 400.0, 80.0, 400.0];
        assert_eq!(pitch_stability(&values), Some(0.0));
    }

    #[test]
    fn test_stability_defaults_to_one() {
        let mut tracker = PitchTracker::new(10);
        assert_eq!(tracker.stability(), 1.0);
        tracker.accept(100.0);
        assert_eq!(tracker.stability(), 1.0);
    }

    #[test]
    fn test_spread() {
        let values = [100.0, 200.0];
        assert_eq!(pitch_spread(&values), Some(50.0));
        assert!(pitch_spread(&[100.0]).is_none());
    }

    #[test]
    fn test_reset_clears_history() {
        let mut tracker = PitchTracker::new(10);
        for _ in 0..5 {
            tracker.accept(100.0);
        }
        tracker.reset();
        assert!(tracker.is_empty());
        assert!(tracker.jitter().is_none());
    }

    proptest! {
        #[test]
        fn prop_history_never_exceeds_capacity(
            capacity in 1usize..200,
            pitches in proptest::collection::vec(50.0f64..800.0, 0..1000)
        ) {
            let mut tracker = PitchTracker::new(capacity);
            for p in pitches {
                tracker.accept(p);
                prop_assert!(tracker.len() <= capacity);
            }
        }

        #[test]
        fn prop_jitter_is_non_negative(
            pitches in proptest::collection::vec(50.0f64..800.0, 0..150)
        ) {
            let mut tracker = PitchTracker::new(100);
            for p in &pitches {
                tracker.accept(*p);
            }
            match tracker.jitter() {
                Some(j) => {
                    prop_assert!(tracker.len() >= MIN_JITTER_SAMPLES);
                    prop_assert!(j >= 0.0);
                }
                None => {
                    // Only short histories or perfectly flat steps yield None
                    let flat = tracker.snapshot().windows(2).all(|w| w[0] == w[1]);
                    prop_assert!(tracker.len() < MIN_JITTER_SAMPLES || flat);
                }
            }
            let s = tracker.stability();
            prop_assert!((0.0..=1.0).contains(&s));
        }
    }
}
