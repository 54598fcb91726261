//! Common test utilities for fall monitor integration tests
//!
//! Provides:
//! - Sample traces shaped like real activity (walking, falls, jumps)
//! - A small driver that replays a trace against a monitor with a
//!   synthetic clock and collects every notification

#![allow(dead_code)]

use fallwatch_core::{
    time::{FixedTime, TimeSource, Timestamp},
    FallMonitor, MonitorNotification, Sample,
};

pub mod traces;

/// Replays samples against a monitor, firing the window at its deadline
pub struct Replay {
    pub monitor: FallMonitor,
    pub clock: FixedTime,
    pub notifications: Vec<(Timestamp, MonitorNotification)>,
}

impl Replay {
    pub fn new(monitor: FallMonitor) -> Self {
        Self {
            monitor,
            clock: FixedTime::new(0),
            notifications: Vec::new(),
        }
    }

    /// Feed samples in order, acting as the caller's scheduler
    ///
    /// Before each sample, an expired window is closed with the last y
    /// reading, just as a timer firing between sensor callbacks would.
    pub fn run(&mut self, samples: &[Sample]) {
        for sample in samples {
            self.clock.set(sample.timestamp);
            self.fire_due();

            let now = self.clock.now();
            if let Some(notification) = self.monitor.on_sample(*sample, now) {
                self.notifications.push((now, notification));
            }
        }
    }

    /// Advance the clock and fire any due window
    pub fn advance_to(&mut self, t: Timestamp) {
        self.clock.set(t);
        self.fire_due();
    }

    fn fire_due(&mut self) {
        if let Some(deadline) = self.monitor.deadline() {
            if self.clock.now() >= deadline {
                if let Some(notification) = self.monitor.window_elapsed_with_latest() {
                    self.notifications.push((deadline, notification));
                }
            }
        }
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.notifications.iter().map(|(_, n)| n.name()).collect()
    }

    pub fn confirmed(&self) -> usize {
        self.notifications
            .iter()
            .filter(|(_, n)| n.fall_event().is_some())
            .count()
    }
}
