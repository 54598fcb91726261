//! Data handed from detection to alert delivery

#[cfg(not(feature = "std"))]
use alloc::string::String;

use crate::time::Timestamp;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A confirmed fall
///
/// Created exactly once per confirmed fall and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FallEvent {
    /// When the triggering impact was observed
    pub timestamp: Timestamp,
    /// Best-known location, if the caller attached one
    pub last_known_location: Option<String>,
    /// Magnitude of the triggering sample (m/s²)
    pub trigger_magnitude: f64,
}

impl FallEvent {
    /// Location text, or `None` when not available
    pub fn location(&self) -> Option<&str> {
        self.last_known_location.as_deref()
    }
}

/// Who to alert
///
/// Supplied by the caller and read-only to the core. A missing field
/// means the channels that need it are skipped, not that anything failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EmergencyContact {
    /// Number for SMS and voice calls
    #[cfg_attr(feature = "serde", serde(default))]
    pub phone_number: Option<String>,
    /// Address for email alerts
    #[cfg_attr(feature = "serde", serde(default))]
    pub email: Option<String>,
}

impl EmergencyContact {
    /// Contact with both fields set
    pub fn new(phone_number: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            phone_number: Some(phone_number.into()),
            email: Some(email.into()),
        }
    }

    /// Contact reachable by phone only
    pub fn phone(phone_number: impl Into<String>) -> Self {
        Self {
            phone_number: Some(phone_number.into()),
            email: None,
        }
    }

    /// Contact reachable by email only
    pub fn email(email: impl Into<String>) -> Self {
        Self {
            phone_number: None,
            email: Some(email.into()),
        }
    }

    /// Phone number, treating blank strings as absent
    pub fn phone_number(&self) -> Option<&str> {
        non_blank(self.phone_number.as_deref())
    }

    /// Email address, treating blank strings as absent
    pub fn email_address(&self) -> Option<&str> {
        non_blank(self.email.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
