//! Error Types for Detection Configuration
//!
//! The detection core has exactly one failure mode: a [`DetectionConfig`]
//! that cannot describe a working detector. Everything after construction
//! is infallible; the state machine reports outcomes through
//! [`MonitorNotification`](crate::MonitorNotification), never through `Err`.
//!
//! Errors follow the same embedded-friendly rules as the rest of the core:
//! `Copy`, no heap data, `&'static str` for field names.
//!
//! ```rust
//! use core::time::Duration;
//! use fallwatch_core::{ConfigError, DetectionConfig};
//!
//! match DetectionConfig::new(0.0, 4.0, Duration::from_secs(10)) {
//!     Err(ConfigError::NonPositiveThreshold { .. }) => { /* reject settings */ }
//!     _ => unreachable!(),
//! }
//! ```
//!
//! [`DetectionConfig`]: crate::DetectionConfig

use thiserror_no_std::Error;

/// Result type for configuration checks
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Reasons a detection configuration is rejected at construction
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// Fall threshold must be strictly positive
    #[error("Fall threshold {threshold} must be greater than zero")]
    NonPositiveThreshold {
        /// The rejected threshold (m/s²)
        threshold: f64,
    },

    /// Stability band must be strictly positive
    #[error("Stability band {band} must be greater than zero")]
    NonPositiveBand {
        /// The rejected half-width of the y-axis band (m/s²)
        band: f64,
    },

    /// Monitoring window must be longer than zero
    #[error("Monitoring window must be longer than zero")]
    ZeroWindow,

    /// A numeric field is NaN or infinite
    #[error("Field {field} is not a finite number")]
    NonFinite {
        /// Name of the offending field
        field: &'static str,
    },

    /// Threshold does not exceed the stability band
    ///
    /// A device resting inside the band already reads a magnitude close to
    /// the band, so a threshold at or below it would trigger on stillness.
    #[error("Fall threshold {threshold} must exceed stability band {band}")]
    ThresholdWithinBand {
        /// Configured fall threshold
        threshold: f64,
        /// Configured stability band
        band: f64,
    },
}
