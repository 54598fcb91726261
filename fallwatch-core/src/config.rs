//! Detection configuration
//!
//! A [`DetectionConfig`] is checked once, when it is built, and is
//! immutable afterwards. A monitor holding one can never hit a
//! configuration error mid-stream.

use core::time::Duration;

use crate::constants::detection::{
    DEFAULT_FALL_THRESHOLD, DEFAULT_MONITORING_WINDOW_MS, DEFAULT_Y_STABILITY_BAND,
    SENSITIVE_FALL_THRESHOLD, SENSITIVE_Y_STABILITY_BAND, TOLERANT_Y_STABILITY_BAND,
};
use crate::errors::{ConfigError, ConfigResult};
use crate::time::duration_ms;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Thresholds and timing for one fall monitor
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "RawDetectionConfig", into = "RawDetectionConfig")
)]
pub struct DetectionConfig {
    /// Magnitude above which a fall is suspected (m/s²)
    fall_threshold: f64,

    /// Half-width of the y-axis range considered at rest (m/s²)
    y_stability_band: f64,

    /// Delay between the trigger and the settle check
    monitoring_window: Duration,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            fall_threshold: DEFAULT_FALL_THRESHOLD,
            y_stability_band: DEFAULT_Y_STABILITY_BAND,
            monitoring_window: Duration::from_millis(DEFAULT_MONITORING_WINDOW_MS),
        }
    }
}

impl DetectionConfig {
    /// Build a configuration, rejecting values that cannot describe a working detector
    pub fn new(
        fall_threshold: f64,
        y_stability_band: f64,
        monitoring_window: Duration,
    ) -> ConfigResult<Self> {
        if !fall_threshold.is_finite() {
            return Err(ConfigError::NonFinite { field: "fall_threshold" });
        }
        if !y_stability_band.is_finite() {
            return Err(ConfigError::NonFinite { field: "y_stability_band" });
        }
        if fall_threshold <= 0.0 {
            return Err(ConfigError::NonPositiveThreshold { threshold: fall_threshold });
        }
        if y_stability_band <= 0.0 {
            return Err(ConfigError::NonPositiveBand { band: y_stability_band });
        }
        if monitoring_window.is_zero() {
            return Err(ConfigError::ZeroWindow);
        }
        if fall_threshold <= y_stability_band {
            return Err(ConfigError::ThresholdWithinBand {
                threshold: fall_threshold,
                band: y_stability_band,
            });
        }

        Ok(Self {
            fall_threshold,
            y_stability_band,
            monitoring_window,
        })
    }

    /// Lower threshold with a wider band, for softer falls
    pub fn sensitive() -> Self {
        Self {
            fall_threshold: SENSITIVE_FALL_THRESHOLD,
            y_stability_band: SENSITIVE_Y_STABILITY_BAND,
            ..Self::default()
        }
    }

    /// Default threshold with a wider settle band
    pub fn tolerant_settle() -> Self {
        Self {
            y_stability_band: TOLERANT_Y_STABILITY_BAND,
            ..Self::default()
        }
    }

    /// Same thresholds with a different window
    pub fn with_window(self, monitoring_window: Duration) -> ConfigResult<Self> {
        Self::new(self.fall_threshold, self.y_stability_band, monitoring_window)
    }

    /// Magnitude above which a fall is suspected (m/s²)
    pub const fn fall_threshold(&self) -> f64 {
        self.fall_threshold
    }

    /// Half-width of the at-rest y-axis range (m/s²)
    pub const fn y_stability_band(&self) -> f64 {
        self.y_stability_band
    }

    /// Delay between trigger and settle check
    pub const fn monitoring_window(&self) -> Duration {
        self.monitoring_window
    }

    /// Monitoring window in milliseconds
    pub fn monitoring_window_ms(&self) -> u64 {
        duration_ms(self.monitoring_window)
    }

    /// True when `y` lies inside `[-band, +band]`
    ///
    /// NaN is never stable.
    pub fn is_stable(&self, y: f64) -> bool {
        (-self.y_stability_band..=self.y_stability_band).contains(&y)
    }
}

/// Serialized form, with the window as plain milliseconds
#[cfg(feature = "serde")]
#[derive(Serialize, Deserialize)]
struct RawDetectionConfig {
    fall_threshold: f64,
    y_stability_band: f64,
    monitoring_window_ms: u64,
}

#[cfg(feature = "serde")]
impl TryFrom<RawDetectionConfig> for DetectionConfig {
    type Error = ConfigError;

    fn try_from(raw: RawDetectionConfig) -> ConfigResult<Self> {
        Self::new(
            raw.fall_threshold,
            raw.y_stability_band,
            Duration::from_millis(raw.monitoring_window_ms),
        )
    }
}

#[cfg(feature = "serde")]
impl From<DetectionConfig> for RawDetectionConfig {
    fn from(config: DetectionConfig) -> Self {
        Self {
            fall_threshold: config.fall_threshold,
            y_stability_band: config.y_stability_band,
            monitoring_window_ms: config.monitoring_window_ms(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_preset_values() {
        let config = DetectionConfig::default();
        assert_eq!(config.fall_threshold(), 25.0);
        assert_eq!(config.y_stability_band(), 4.0);
        assert_eq!(config.monitoring_window(), Duration::from_secs(10));
    }

    #[test]
    fn presets_pass_validation() {
        for preset in [
            DetectionConfig::default(),
            DetectionConfig::sensitive(),
            DetectionConfig::tolerant_settle(),
        ] {
            let rebuilt = DetectionConfig::new(
                preset.fall_threshold(),
                preset.y_stability_band(),
                preset.monitoring_window(),
            );
            assert_eq!(rebuilt, Ok(preset));
        }
    }

    #[test]
    fn rejects_non_positive_values() {
        let window = Duration::from_secs(10);
        assert_eq!(
            DetectionConfig::new(0.0, 4.0, window),
            Err(ConfigError::NonPositiveThreshold { threshold: 0.0 })
        );
        assert_eq!(
            DetectionConfig::new(-25.0, 4.0, window),
            Err(ConfigError::NonPositiveThreshold { threshold: -25.0 })
        );
        assert_eq!(
            DetectionConfig::new(25.0, 0.0, window),
            Err(ConfigError::NonPositiveBand { band: 0.0 })
        );
        assert_eq!(
            DetectionConfig::new(25.0, 4.0, Duration::ZERO),
            Err(ConfigError::ZeroWindow)
        );
    }

    #[test]
    fn rejects_non_finite_values() {
        let window = Duration::from_secs(10);
        assert_eq!(
            DetectionConfig::new(f64::NAN, 4.0, window),
            Err(ConfigError::NonFinite { field: "fall_threshold" })
        );
        assert_eq!(
            DetectionConfig::new(25.0, f64::INFINITY, window),
            Err(ConfigError::NonFinite { field: "y_stability_band" })
        );
    }

    #[test]
    fn rejects_threshold_inside_band() {
        assert_eq!(
            DetectionConfig::new(4.0, 4.0, Duration::from_secs(1)),
            Err(ConfigError::ThresholdWithinBand { threshold: 4.0, band: 4.0 })
        );
    }

    #[test]
    fn band_is_inclusive() {
        let config = DetectionConfig::default();
        assert!(config.is_stable(4.0));
        assert!(config.is_stable(-4.0));
        assert!(config.is_stable(0.0));
        assert!(!config.is_stable(4.000_1));
        assert!(!config.is_stable(-8.0));
        assert!(!config.is_stable(f64::NAN));
    }

    #[test]
    fn with_window_revalidates() {
        let config = DetectionConfig::default();
        assert_eq!(
            config.with_window(Duration::from_secs(3)).map(|c| c.monitoring_window_ms()),
            Ok(3_000)
        );
        assert_eq!(config.with_window(Duration::ZERO), Err(ConfigError::ZeroWindow));
    }
}
