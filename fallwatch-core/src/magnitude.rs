//! Total acceleration magnitude
//!
//! A single spike in `sqrt(x² + y² + z²)` is the first stage of detection.
//! The computation is pure and has no failure mode: finite input gives a
//! finite, non-negative result, and NaN or infinite input propagates.

use crate::sample::Sample;

/// Magnitude of the acceleration vector in m/s²
#[inline]
pub fn magnitude(sample: &Sample) -> f64 {
    libm::sqrt(sample.x * sample.x + sample.y * sample.y + sample.z * sample.z)
}

/// Compares sample magnitudes against a fixed fall threshold
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MagnitudeEvaluator {
    threshold: f64,
}

impl MagnitudeEvaluator {
    /// Evaluator for the given threshold (m/s²)
    pub const fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Threshold this evaluator compares against
    pub const fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Magnitude of `sample`
    #[inline]
    pub fn evaluate(&self, sample: &Sample) -> f64 {
        magnitude(sample)
    }

    /// Magnitude of `sample` if it is strictly above the threshold
    ///
    /// NaN never exceeds the threshold.
    #[inline]
    pub fn exceeds(&self, sample: &Sample) -> Option<f64> {
        let value = magnitude(sample);
        (value > self.threshold).then_some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_at_rest_reads_one_axis() {
        let sample = Sample::new(0.0, 0.0, 10.0, 0);
        assert_eq!(magnitude(&sample), 10.0);
    }

    #[test]
    fn free_fall_reads_zero() {
        assert_eq!(magnitude(&Sample::new(0.0, 0.0, 0.0, 0)), 0.0);
    }

    #[test]
    fn pythagorean_triple() {
        let sample = Sample::new(3.0, -4.0, 12.0, 0);
        assert_eq!(magnitude(&sample), 13.0);
    }

    #[test]
    fn threshold_is_strict() {
        let evaluator = MagnitudeEvaluator::new(13.0);
        assert_eq!(evaluator.exceeds(&Sample::new(3.0, 4.0, 12.0, 0)), None);
        assert_eq!(evaluator.exceeds(&Sample::new(0.0, 0.0, 13.5, 0)), Some(13.5));
    }

    #[test]
    fn non_finite_propagates() {
        assert!(magnitude(&Sample::new(f64::NAN, 0.0, 0.0, 0)).is_nan());
        assert!(magnitude(&Sample::new(f64::INFINITY, 0.0, 0.0, 0)).is_infinite());

        let evaluator = MagnitudeEvaluator::new(25.0);
        assert_eq!(evaluator.exceeds(&Sample::new(f64::NAN, 0.0, 0.0, 0)), None);
    }
}
