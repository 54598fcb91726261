//! Tokio-driven fall watch session
//!
//! ## Overview
//!
//! [`FallMonitor`] owns no clock and sends nothing. A [`FallWatch`] is the
//! caller that supplies both: it feeds samples from a channel into the
//! monitor, arms a runtime timer when a watch starts, closes the window
//! when the timer fires, and dispatches alerts exactly once per confirmed
//! fall.
//!
//! ```text
//!  samples ──► on_sample ──► WatchStarted ──► sleep(window) ──► window elapsed
//!                                                                   │
//!  commands ──► Cancel (disarms timer)              FallConfirmed ──┴──► dispatch
//!                                                                   │
//!  subscribers ◄──────────────── SessionEvent ◄─────────────────────┘
//! ```
//!
//! Every notification and dispatch report is published on a broadcast
//! channel so UI layers can subscribe instead of polling state.
//!
//! ## Ordering
//!
//! The loop prefers commands over the timer and the timer over samples.
//! A cancel that arrives at the same instant as the window expiry wins,
//! and the expiry is then ignored by the monitor.
//!
//! Dispatch runs on its own task so a slow channel never stalls detection:
//! samples keep flowing and a second fall can be watched while the first
//! one's alerts are still going out. The session joins every in-flight
//! dispatch before it finishes.
//!
//! ## Clocks
//!
//! The injected [`TimeSource`] stamps transitions. The window timer waits
//! for the monitor's deadline as measured on that same clock, converted to
//! a runtime sleep when the watch opens.

use std::sync::Arc;

use fallwatch_core::{
    time::{TimeSource, Timestamp},
    ConfigError, DetectionConfig, EmergencyContact, FallMonitor, MonitorNotification,
    MonitorStats, Sample,
};
use log::{debug, warn};
use thiserror::Error;
use tokio::sync::{broadcast, mpsc};
use tokio::task::{JoinError, JoinHandle, JoinSet};
use tokio::time::{sleep_until, Duration, Instant};

use crate::dispatcher::{AlertDispatcher, DispatchReport};
use crate::NotificationChannel;

/// Capacity of the subscriber broadcast channel
pub const EVENT_BUFFER: usize = 64;

/// Capacity of the sample channel created by [`FallWatch::start`]
pub const SAMPLE_BUFFER: usize = 256;

/// Capacity of the command channel created by [`FallWatch::start`]
pub const COMMAND_BUFFER: usize = 16;

/// Session-level errors
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Invalid detection config: {0}")]
    Config(#[from] ConfigError),

    #[error("Session has stopped")]
    Closed,

    #[error("Session task failed: {0}")]
    Task(String),
}

/// Caller instructions to a running session
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Dismiss the open window (user tapped "false alarm")
    Cancel,
    /// Best-known location for alerts; `None` when unavailable
    SetLocation(Option<String>),
    /// Replace the emergency contact
    SetContact(EmergencyContact),
}

/// What subscribers observe
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A monitor transition
    Monitor(MonitorNotification),
    /// Alerts for a confirmed fall have been dispatched
    Dispatched(DispatchReport),
}

/// Final state of a finished session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    /// Monitor counters at shutdown
    pub stats: MonitorStats,
    /// One report per confirmed fall, in completion order
    pub reports: Vec<DispatchReport>,
}

/// Milliseconds on the runtime clock since the session was created
///
/// Follows tokio's paused clock in tests.
#[derive(Debug, Clone)]
pub struct RuntimeClock {
    start: Instant,
}

impl RuntimeClock {
    /// Clock starting at zero now
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for RuntimeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for RuntimeClock {
    fn now(&self) -> Timestamp {
        u64::try_from(self.start.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

/// A monitor wired to a timer and an alert dispatcher
pub struct FallWatch {
    monitor: FallMonitor,
    dispatcher: AlertDispatcher,
    contact: EmergencyContact,
    channels: Vec<Arc<dyn NotificationChannel>>,
    clock: Box<dyn TimeSource + Send>,
    events: broadcast::Sender<SessionEvent>,
    window_deadline: Option<Instant>,
    in_flight: JoinSet<DispatchReport>,
    reports: Vec<DispatchReport>,
}

impl FallWatch {
    /// Build a session; the configuration is validated here
    pub fn new(
        config: DetectionConfig,
        contact: EmergencyContact,
        channels: Vec<Arc<dyn NotificationChannel>>,
    ) -> Result<Self, SessionError> {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        Ok(Self {
            monitor: FallMonitor::new(config)?,
            dispatcher: AlertDispatcher::new(),
            contact,
            channels,
            clock: Box::new(RuntimeClock::new()),
            events,
            window_deadline: None,
            in_flight: JoinSet::new(),
            reports: Vec::new(),
        })
    }

    /// Stamp transitions with `clock` instead of the runtime clock
    pub fn with_clock(mut self, clock: impl TimeSource + Send + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Use a shared dispatcher, e.g. to aggregate statistics across sessions
    pub fn with_dispatcher(mut self, dispatcher: AlertDispatcher) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    /// Receive every notification and report from now on
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Run on a new task, returning a handle that feeds it
    pub fn start(self) -> SessionHandle {
        let (samples_tx, samples_rx) = mpsc::channel(SAMPLE_BUFFER);
        let (commands_tx, commands_rx) = mpsc::channel(COMMAND_BUFFER);
        let task = tokio::spawn(self.run(samples_rx, commands_rx));

        SessionHandle {
            samples: samples_tx,
            commands: commands_tx,
            task,
        }
    }

    /// Drive the session until the sample channel closes
    ///
    /// A window still open at that point is cancelled, since no further
    /// y readings can arrive to settle it. Dispatches already under way
    /// are awaited before the summary is returned.
    pub async fn run(
        mut self,
        mut samples: mpsc::Receiver<Sample>,
        mut commands: mpsc::Receiver<Command>,
    ) -> SessionSummary {
        loop {
            let deadline = self.window_deadline;

            tokio::select! {
                biased;

                Some(command) = commands.recv() => self.handle_command(command),

                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    self.window_elapsed();
                }

                Some(joined) = self.in_flight.join_next(), if !self.in_flight.is_empty() => {
                    self.dispatch_finished(joined);
                }

                sample = samples.recv() => match sample {
                    Some(sample) => self.handle_sample(sample),
                    None => break,
                },
            }
        }

        if self.monitor.is_monitoring() {
            warn!("Sample stream closed during an open watch; cancelling it");
            self.window_deadline = None;
            if let Some(notification) = self.monitor.cancel() {
                self.publish(SessionEvent::Monitor(notification));
            }
        }

        while let Some(joined) = self.in_flight.join_next().await {
            self.dispatch_finished(joined);
        }

        SessionSummary {
            stats: self.monitor.stats(),
            reports: self.reports,
        }
    }

    fn handle_sample(&mut self, sample: Sample) {
        let now = self.clock.now();
        let Some(notification) = self.monitor.on_sample(sample, now) else {
            return;
        };

        if let MonitorNotification::WatchStarted { .. } = notification {
            let remaining = self
                .monitor
                .deadline()
                .map_or(0, |due| due.saturating_sub(self.clock.now()));
            self.window_deadline = Some(Instant::now() + Duration::from_millis(remaining));
        }
        self.publish(SessionEvent::Monitor(notification));
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Cancel => {
                if let Some(notification) = self.monitor.cancel() {
                    self.window_deadline = None;
                    self.publish(SessionEvent::Monitor(notification));
                } else {
                    debug!("Cancel ignored: no open watch");
                }
            }
            Command::SetLocation(location) => self.monitor.set_location(location),
            Command::SetContact(contact) => self.contact = contact,
        }
    }

    fn window_elapsed(&mut self) {
        self.window_deadline = None;

        let Some(notification) = self.monitor.window_elapsed_with_latest() else {
            return;
        };
        let event = notification.fall_event().cloned();
        self.publish(SessionEvent::Monitor(notification));

        if let Some(event) = event {
            let dispatcher = self.dispatcher.clone();
            let contact = self.contact.clone();
            let channels = self.channels.clone();
            self.in_flight
                .spawn(async move { dispatcher.dispatch(event, &contact, &channels).await });
        }
    }

    fn dispatch_finished(&mut self, joined: Result<DispatchReport, JoinError>) {
        match joined {
            Ok(report) => {
                self.publish(SessionEvent::Dispatched(report.clone()));
                self.reports.push(report);
            }
            Err(err) => warn!("Alert dispatch task did not complete: {}", err),
        }
    }

    fn publish(&self, event: SessionEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}

/// Feeds a session running on its own task
#[derive(Debug)]
pub struct SessionHandle {
    samples: mpsc::Sender<Sample>,
    commands: mpsc::Sender<Command>,
    task: JoinHandle<SessionSummary>,
}

impl SessionHandle {
    /// Forward one sample, waiting if the session is behind
    pub async fn send_sample(&self, sample: Sample) -> Result<(), SessionError> {
        self.samples
            .send(sample)
            .await
            .map_err(|_| SessionError::Closed)
    }

    /// Send a command
    pub async fn command(&self, command: Command) -> Result<(), SessionError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| SessionError::Closed)
    }

    /// Dismiss the open window
    pub async fn cancel(&self) -> Result<(), SessionError> {
        self.command(Command::Cancel).await
    }

    /// Attach a location to future alerts
    pub async fn set_location(&self, location: impl Into<String>) -> Result<(), SessionError> {
        self.command(Command::SetLocation(Some(location.into()))).await
    }

    /// Close the sample stream and wait for the session to finish
    pub async fn finish(self) -> Result<SessionSummary, SessionError> {
        let SessionHandle {
            samples,
            commands,
            task,
        } = self;
        drop(samples);
        drop(commands);

        task.await.map_err(|e| SessionError::Task(e.to_string()))
    }
}
