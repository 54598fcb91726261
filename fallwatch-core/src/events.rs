//! Notifications emitted by the fall monitor
//!
//! ## Overview
//!
//! The monitor reports every state change as a value instead of exposing
//! mutable flags for a UI to poll. Callers match on the notification and
//! decide what to do:
//!
//! ```text
//!                WatchStarted                FallConfirmed
//!   sample > T ───────────────► Monitoring ───────────────► dispatch alerts
//!                                   │  │
//!                      FalseAlarm ◄─┘  └─► Cancelled
//!                   (y outside band)       (user dismissed)
//! ```
//!
//! | Notification    | Typical reaction                                   |
//! |-----------------|----------------------------------------------------|
//! | `WatchStarted`  | arm the window timer, start a location lookup, show a banner |
//! | `FallConfirmed` | call the alert dispatcher with the carried event   |
//! | `FalseAlarm`    | clear the banner                                   |
//! | `Cancelled`     | clear the banner, disarm the timer                 |

use crate::alert::FallEvent;
use crate::sample::Sample;
use crate::time::Timestamp;

/// Observable outcome of a monitor transition
#[derive(Debug, Clone, PartialEq)]
pub enum MonitorNotification {
    /// A sample crossed the fall threshold; the monitoring window is open
    WatchStarted {
        /// When the window opened
        since: Timestamp,
        /// The sample that crossed the threshold
        trigger: Sample,
    },

    /// The device settled inside the stability band when the window closed
    FallConfirmed(FallEvent),

    /// The device was still moving when the window closed
    FalseAlarm,

    /// The caller dismissed the open window
    Cancelled,
}

impl MonitorNotification {
    /// Short label for logs and UI
    pub const fn name(&self) -> &'static str {
        match self {
            MonitorNotification::WatchStarted { .. } => "watch_started",
            MonitorNotification::FallConfirmed(_) => "fall_confirmed",
            MonitorNotification::FalseAlarm => "false_alarm",
            MonitorNotification::Cancelled => "cancelled",
        }
    }

    /// The confirmed fall, if this is `FallConfirmed`
    pub fn fall_event(&self) -> Option<&FallEvent> {
        match self {
            MonitorNotification::FallConfirmed(event) => Some(event),
            _ => None,
        }
    }

    /// True for notifications that close a monitoring window
    pub const fn ends_watch(&self) -> bool {
        !matches!(self, MonitorNotification::WatchStarted { .. })
    }
}
