//! Detection Thresholds and Windows
//!
//! All accelerations are in m/s², as reported by platform accelerometer
//! APIs (gravity included). A phone lying still reads a magnitude of about
//! [`STANDARD_GRAVITY`].
//!
//! Three threshold/band combinations have been used in the field. None of
//! them is canonical, so each is kept as a preset and the choice is left
//! to configuration.

use super::time::MS_PER_SECOND;

/// Standard gravity (m/s²).
///
/// Source: CGPM 1901 conventional value
pub const STANDARD_GRAVITY: f64 = 9.806_65;

// ===== DEFAULT PRESET =====

/// Default fall threshold (m/s²).
///
/// About 2.5 g. Walking and sitting stay well below; impacts from a fall
/// onto a hard floor exceed it.
pub const DEFAULT_FALL_THRESHOLD: f64 = 25.0;

/// Default y-axis stability band half-width (m/s²).
///
/// An upright phone reads y ≈ g; a phone lying flat after a fall reads
/// y ≈ 0. Values inside ±4.0 mean the device is no longer held upright.
pub const DEFAULT_Y_STABILITY_BAND: f64 = 4.0;

/// Default monitoring window (milliseconds).
///
/// Long enough for a person who stumbled to recover and pick the device up.
pub const DEFAULT_MONITORING_WINDOW_MS: u64 = 10 * MS_PER_SECOND;

// ===== ALTERNATIVE PRESETS =====

/// Lower threshold for users whose falls are softer (m/s²).
pub const SENSITIVE_FALL_THRESHOLD: f64 = 15.0;

/// Band paired with [`SENSITIVE_FALL_THRESHOLD`] (m/s²).
pub const SENSITIVE_Y_STABILITY_BAND: f64 = 5.0;

/// Wider settle band paired with the default threshold (m/s²).
///
/// Accepts devices that come to rest at a steeper tilt.
pub const TOLERANT_Y_STABILITY_BAND: f64 = 5.0;
