//! Core fall detection engine for FallWatch
//!
//! Turns a continuous tri-axial accelerometer stream into discrete,
//! debounced fall decisions. Designed to run inside a sensor callback:
//!
//! - No I/O and no clock ownership; the caller drives the monitoring window
//! - No heap allocation per sample
//! - Every transition is reported as a [`MonitorNotification`]
//!
//! ```no_run
//! use fallwatch_core::{DetectionConfig, FallMonitor, MonitorNotification, Sample};
//!
//! let mut monitor = FallMonitor::new(DetectionConfig::default()).unwrap();
//!
//! // Feed samples from the sensor callback
//! let sample = Sample::new(18.0, 15.0, 17.0, 0);
//! if let Some(MonitorNotification::WatchStarted { .. }) = monitor.on_sample(sample, 0) {
//!     // Arm a timer for `monitor.config().monitoring_window()`
//! }
//!
//! // When the timer fires
//! match monitor.on_monitoring_window_elapsed(1.0) {
//!     Some(MonitorNotification::FallConfirmed(event)) => { /* dispatch alerts */ }
//!     _ => {}
//! }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[cfg(not(feature = "std"))]
extern crate alloc;

// Optional logging shims, so the state machine compiles without `log`
#[cfg(feature = "log")]
macro_rules! log_info {
    ($($arg:tt)*) => { log::info!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_info {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "log")]
macro_rules! log_debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {};
}

pub mod alert;
pub mod config;
pub mod constants;
pub mod errors;
pub mod events;
pub mod magnitude;
pub mod monitor;
pub mod sample;
pub mod time;

// Public API
pub use alert::{EmergencyContact, FallEvent};
pub use config::DetectionConfig;
pub use errors::{ConfigError, ConfigResult};
pub use events::MonitorNotification;
pub use magnitude::{magnitude, MagnitudeEvaluator};
pub use monitor::{FallMonitor, MonitorState, MonitorStats};
pub use sample::Sample;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
