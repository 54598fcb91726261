//! Accelerometer samples

use crate::time::Timestamp;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One tri-axial accelerometer reading
///
/// Axes are in m/s² in the device frame, gravity included. Samples are
/// evaluated once and not retained, except for the one that opens a
/// monitoring window.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Sample {
    /// Acceleration along the device x axis
    pub x: f64,
    /// Acceleration along the device y axis (long edge of a phone)
    pub y: f64,
    /// Acceleration along the device z axis
    pub z: f64,
    /// When the sensor produced the reading
    #[cfg_attr(feature = "serde", serde(rename = "t"))]
    pub timestamp: Timestamp,
}

impl Sample {
    /// Create a sample from raw axis values
    pub const fn new(x: f64, y: f64, z: f64, timestamp: Timestamp) -> Self {
        Self { x, y, z, timestamp }
    }

    /// Create a sample from the `[x, y, z]` array layout most sensor APIs use
    pub const fn from_axes(axes: [f64; 3], timestamp: Timestamp) -> Self {
        Self::new(axes[0], axes[1], axes[2], timestamp)
    }

    /// True when all three axes are finite numbers
    ///
    /// The monitor does not filter non-finite data; callers whose hardware
    /// can report NaN should drop such samples before forwarding them.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}
