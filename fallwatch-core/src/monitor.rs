//! Fall Monitor State Machine
//!
//! ## Overview
//!
//! A magnitude spike alone is a poor fall signal: jumping, dropping the
//! phone or sitting down hard all exceed typical thresholds. The monitor
//! therefore decides in two stages:
//!
//! 1. **Trigger**: a sample whose magnitude is strictly above the fall
//!    threshold opens a monitoring window.
//! 2. **Settle check**: when the caller reports that the window has
//!    elapsed, the latest y-axis reading decides. Inside the stability band
//!    means the device came to rest after the impact (fall confirmed);
//!    outside means it is still being carried or moved (false alarm).
//!
//! ```text
//!            on_sample (magnitude > threshold)
//!   ┌──────┐ ─────────────────────────────────► ┌────────────┐
//!   │ Idle │                                    │ Monitoring │ ◄── on_sample (ignored)
//!   └──────┘ ◄───────────────────────────────── └────────────┘
//!            on_monitoring_window_elapsed / cancel
//! ```
//!
//! ## Clock Ownership
//!
//! The monitor owns no timer. The caller schedules the window (for
//! example with [`FallMonitor::deadline`]) and calls
//! [`FallMonitor::on_monitoring_window_elapsed`] once it expires. The
//! monitor trusts that timing and does not check elapsed time itself, so
//! tests can drive every transition with synthetic timestamps.
//!
//! ## Concurrency
//!
//! All transitions take `&mut self`: one monitor is driven by one logical
//! sensor stream. `on_sample` performs arithmetic only and never blocks.

#[cfg(not(feature = "std"))]
use alloc::string::String;

use crate::alert::FallEvent;
use crate::config::DetectionConfig;
use crate::errors::ConfigResult;
use crate::events::MonitorNotification;
use crate::magnitude::MagnitudeEvaluator;
use crate::sample::Sample;
use crate::time::{deadline, Timestamp};

/// Externally visible detection state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MonitorState {
    /// Waiting for a threshold crossing
    Idle,
    /// A window is open
    Monitoring {
        /// When the window opened
        since: Timestamp,
        /// Sample that opened it
        trigger: Sample,
    },
}

/// Counters for monitor activity
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MonitorStats {
    /// Samples passed to `on_sample`
    pub samples_seen: u64,
    /// Windows opened
    pub watches_started: u64,
    /// Above-threshold samples ignored because a window was already open
    pub ignored_triggers: u64,
    /// Windows that ended in a confirmed fall
    pub falls_confirmed: u64,
    /// Windows that ended in a false alarm
    pub false_alarms: u64,
    /// Windows dismissed by the caller
    pub cancellations: u64,
}

/// Bookkeeping for the open window
#[derive(Debug, Clone, Copy)]
struct Window {
    since: Timestamp,
    trigger: Sample,
    trigger_magnitude: f64,
    latest_y: f64,
}

#[derive(Debug, Clone, Copy)]
enum State {
    Idle,
    Monitoring(Window),
}

/// Debounced fall detector for one accelerometer feed
#[derive(Debug, Clone)]
pub struct FallMonitor {
    config: DetectionConfig,
    evaluator: MagnitudeEvaluator,
    state: State,
    location: Option<String>,
    stats: MonitorStats,
}

impl FallMonitor {
    /// Create an idle monitor
    ///
    /// The configuration is re-checked so that a value deserialized or
    /// assembled field by field cannot bypass validation.
    pub fn new(config: DetectionConfig) -> ConfigResult<Self> {
        let config = DetectionConfig::new(
            config.fall_threshold(),
            config.y_stability_band(),
            config.monitoring_window(),
        )?;

        Ok(Self {
            evaluator: MagnitudeEvaluator::new(config.fall_threshold()),
            config,
            state: State::Idle,
            location: None,
            stats: MonitorStats::default(),
        })
    }

    /// Feed one sample
    ///
    /// While idle, a sample above the threshold opens a window at `now`
    /// and returns `WatchStarted`. While monitoring, samples only update
    /// the latest y reading; further threshold crossings do not re-arm or
    /// extend the window.
    pub fn on_sample(&mut self, sample: Sample, now: Timestamp) -> Option<MonitorNotification> {
        self.stats.samples_seen += 1;

        match &mut self.state {
            State::Idle => {
                let trigger_magnitude = self.evaluator.exceeds(&sample)?;

                self.state = State::Monitoring(Window {
                    since: now,
                    trigger: sample,
                    trigger_magnitude,
                    latest_y: sample.y,
                });
                self.stats.watches_started += 1;

                log_info!(
                    "Possible fall: magnitude {:.2} above {:.2}, monitoring for {} ms",
                    trigger_magnitude,
                    self.config.fall_threshold(),
                    self.config.monitoring_window_ms()
                );

                Some(MonitorNotification::WatchStarted {
                    since: now,
                    trigger: sample,
                })
            }
            State::Monitoring(window) => {
                window.latest_y = sample.y;
                if self.evaluator.exceeds(&sample).is_some() {
                    self.stats.ignored_triggers += 1;
                }
                None
            }
        }
    }

    /// Settle check, called by the caller's timer when the window elapses
    ///
    /// `latest_y` is the most recent y-axis reading. Returns `FallConfirmed`
    /// if it lies inside the stability band (inclusive), `FalseAlarm`
    /// otherwise. Returns `None` when idle, which is how an expiry that
    /// races a [`cancel`](Self::cancel) is suppressed.
    pub fn on_monitoring_window_elapsed(&mut self, latest_y: f64) -> Option<MonitorNotification> {
        let window = match core::mem::replace(&mut self.state, State::Idle) {
            State::Idle => return None,
            State::Monitoring(window) => window,
        };

        if self.config.is_stable(latest_y) {
            self.stats.falls_confirmed += 1;
            log_info!(
                "Fall confirmed: y {:.2} settled within ±{:.2}",
                latest_y,
                self.config.y_stability_band()
            );

            Some(MonitorNotification::FallConfirmed(FallEvent {
                timestamp: window.since,
                last_known_location: self.location.clone(),
                trigger_magnitude: window.trigger_magnitude,
            }))
        } else {
            self.stats.false_alarms += 1;
            log_debug!(
                "False alarm: y {:.2} outside ±{:.2}",
                latest_y,
                self.config.y_stability_band()
            );

            Some(MonitorNotification::FalseAlarm)
        }
    }

    /// Settle check using the last y reading seen during the window
    ///
    /// Falls back to the trigger sample's y when no sample arrived after it.
    pub fn window_elapsed_with_latest(&mut self) -> Option<MonitorNotification> {
        let latest_y = match self.state {
            State::Idle => return None,
            State::Monitoring(window) => window.latest_y,
        };
        self.on_monitoring_window_elapsed(latest_y)
    }

    /// Dismiss the open window (user tapped "false alarm")
    ///
    /// No-op while idle, including after the window has already fired.
    pub fn cancel(&mut self) -> Option<MonitorNotification> {
        match self.state {
            State::Idle => None,
            State::Monitoring(_) => {
                self.state = State::Idle;
                self.stats.cancellations += 1;
                log_debug!("Open watch cancelled by caller");
                Some(MonitorNotification::Cancelled)
            }
        }
    }

    /// Attach the best-known location to future fall events
    ///
    /// `None` means "not available" and is not an error.
    pub fn set_location(&mut self, location: Option<String>) {
        self.location = location;
    }

    /// Location that the next confirmed fall will carry
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Current state
    pub fn state(&self) -> MonitorState {
        match self.state {
            State::Idle => MonitorState::Idle,
            State::Monitoring(window) => MonitorState::Monitoring {
                since: window.since,
                trigger: window.trigger,
            },
        }
    }

    /// True while a window is open
    pub fn is_monitoring(&self) -> bool {
        matches!(self.state, State::Monitoring(_))
    }

    /// When the open window is due to elapse
    pub fn deadline(&self) -> Option<Timestamp> {
        match self.state {
            State::Idle => None,
            State::Monitoring(window) => {
                Some(deadline(window.since, self.config.monitoring_window()))
            }
        }
    }

    /// Configuration this monitor was built with
    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Activity counters
    pub fn stats(&self) -> MonitorStats {
        self.stats
    }
}
