//! Constants for FallWatch Core
//!
//! Centralized numeric values for fall detection. Each constant documents
//! its unit and where the value comes from.
//!
//! ## Organization
//!
//! - **Detection**: Thresholds, stability bands and windows, including the
//!   named presets exposed on [`DetectionConfig`](crate::DetectionConfig)
//! - **Time**: Unit conversions
//!
//! Always use these constants instead of magic numbers.

/// Fall thresholds, stability bands and monitoring windows.
pub mod detection;

/// Time unit conversions.
pub mod time;

// Re-export commonly used constants for convenience
pub use detection::{
    DEFAULT_FALL_THRESHOLD, DEFAULT_MONITORING_WINDOW_MS, DEFAULT_Y_STABILITY_BAND,
    STANDARD_GRAVITY,
};

pub use time::MS_PER_SECOND;
