//! Concurrent fan-out of a confirmed fall to notification channels

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use fallwatch_core::{time::Timestamp, EmergencyContact, FallEvent};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use tokio::task::JoinSet;

use crate::{ChannelKind, NotificationChannel};

/// Terminal outcome of one channel in one dispatch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum DeliveryOutcome {
    /// The channel reported success
    Delivered,
    /// Not attempted: the contact lacks the field this channel needs
    Skipped,
    /// Attempted and failed
    Failed(String),
}

impl DeliveryOutcome {
    /// True for `Delivered`
    pub fn is_delivered(&self) -> bool {
        matches!(self, DeliveryOutcome::Delivered)
    }

    /// True for `Failed`
    pub fn is_failed(&self) -> bool {
        matches!(self, DeliveryOutcome::Failed(_))
    }
}

/// Outcome for a single channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchResult {
    /// Channel the outcome belongs to
    pub channel: ChannelKind,
    /// What happened
    pub outcome: DeliveryOutcome,
}

/// Per-channel outcomes of one dispatch
///
/// One entry per channel handed to [`AlertDispatcher::dispatch`], in the
/// order they were handed over, regardless of completion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchReport {
    /// Timestamp of the fall the alerts were for
    pub fall_timestamp: Timestamp,
    /// Outcomes in channel order
    pub results: Vec<DispatchResult>,
}

impl DispatchReport {
    /// Outcome recorded for the first channel of `kind`
    pub fn outcome_for(&self, kind: ChannelKind) -> Option<&DeliveryOutcome> {
        self.results
            .iter()
            .find(|r| r.channel == kind)
            .map(|r| &r.outcome)
    }

    /// Number of delivered channels
    pub fn delivered(&self) -> usize {
        self.count(DeliveryOutcome::is_delivered)
    }

    /// Number of failed channels
    pub fn failed(&self) -> usize {
        self.count(DeliveryOutcome::is_failed)
    }

    /// Number of skipped channels
    pub fn skipped(&self) -> usize {
        self.count(|o| *o == DeliveryOutcome::Skipped)
    }

    /// True when at least one channel was attempted and none failed
    pub fn all_delivered(&self) -> bool {
        self.delivered() > 0 && self.failed() == 0
    }

    /// JSON form for logs and UI
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    fn count(&self, predicate: impl Fn(&DeliveryOutcome) -> bool) -> usize {
        self.results.iter().filter(|r| predicate(&r.outcome)).count()
    }
}

impl fmt::Display for DispatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.results.is_empty() {
            return f.write_str("no channels");
        }
        for (i, result) in self.results.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match &result.outcome {
                DeliveryOutcome::Delivered => write!(f, "{}: ok", result.channel)?,
                DeliveryOutcome::Skipped => write!(f, "{}: skipped", result.channel)?,
                DeliveryOutcome::Failed(reason) => {
                    write!(f, "{}: failed ({})", result.channel, reason)?
                }
            }
        }
        Ok(())
    }
}

/// Dispatch statistics across the dispatcher's lifetime
#[derive(Debug, Default, Clone)]
pub struct DispatchStats {
    /// Calls to `dispatch`
    pub dispatches: u64,
    /// Channel deliveries that succeeded
    pub delivered: u64,
    /// Channel deliveries that failed
    pub failed: u64,
    /// Channels skipped for a missing contact field
    pub skipped: u64,
    /// Last failure reason
    pub last_error: Option<String>,
}

/// Fans a fall event out to notification channels
///
/// Holds no channels itself; each call names the channel set, so a caller
/// retrying a partial failure can pass only the channels that failed.
#[derive(Debug, Default, Clone)]
pub struct AlertDispatcher {
    stats: Arc<Mutex<DispatchStats>>,
}

const PANICKED: &str = "channel task panicked";

impl AlertDispatcher {
    /// Create a dispatcher with empty statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Send `event` on every addressable channel concurrently
    ///
    /// Returns once every attempted channel has finished. Never fails:
    /// channel errors, and channel panics, are recorded in the report.
    /// Must be called from within a tokio runtime.
    pub async fn dispatch(
        &self,
        event: FallEvent,
        contact: &EmergencyContact,
        channels: &[Arc<dyn NotificationChannel>],
    ) -> DispatchReport {
        let fall_timestamp = event.timestamp;
        let event = Arc::new(event);
        let contact = Arc::new(contact.clone());

        let mut outcomes: Vec<Option<DeliveryOutcome>> = vec![None; channels.len()];
        let mut tasks = JoinSet::new();

        for (index, channel) in channels.iter().enumerate() {
            let kind = channel.kind();
            if !kind.is_addressable(&contact) {
                debug!("Skipping {} alert: no recipient on contact", kind);
                outcomes[index] = Some(DeliveryOutcome::Skipped);
                continue;
            }

            let channel = Arc::clone(channel);
            let event = Arc::clone(&event);
            let contact = Arc::clone(&contact);
            tasks.spawn(async move { (index, channel.send(&event, &contact).await) });
        }

        // Dropping the JoinSet aborts anything left, so an abandoned
        // dispatch cannot leak channel tasks either
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, Ok(()))) => {
                    outcomes[index] = Some(DeliveryOutcome::Delivered);
                }
                Ok((index, Err(err))) => {
                    warn!("{} alert failed: {}", channels[index].kind(), err);
                    outcomes[index] = Some(DeliveryOutcome::Failed(err.to_string()));
                }
                Err(err) => {
                    // The task's index is lost with the panic; its slot stays empty
                    warn!("Alert channel task did not complete: {}", err);
                }
            }
        }

        let results: Vec<DispatchResult> = channels
            .iter()
            .zip(outcomes)
            .map(|(channel, outcome)| DispatchResult {
                channel: channel.kind(),
                outcome: outcome.unwrap_or_else(|| DeliveryOutcome::Failed(PANICKED.to_string())),
            })
            .collect();

        let report = DispatchReport {
            fall_timestamp,
            results,
        };
        self.record(&report);
        info!("Fall alert dispatched: {}", report);
        report
    }

    /// Snapshot of lifetime statistics
    pub fn stats(&self) -> DispatchStats {
        self.stats
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, report: &DispatchReport) {
        let mut stats = self.stats.lock().unwrap_or_else(PoisonError::into_inner);
        stats.dispatches += 1;
        stats.delivered += report.delivered() as u64;
        stats.failed += report.failed() as u64;
        stats.skipped += report.skipped() as u64;

        let last_failure = report.results.iter().rev().find_map(|r| match &r.outcome {
            DeliveryOutcome::Failed(reason) => Some(format!("{}: {}", r.channel, reason)),
            _ => None,
        });
        if last_failure.is_some() {
            stats.last_error = last_failure;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ChannelError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct Fake {
        kind: ChannelKind,
        delay: Duration,
        result: Result<(), ChannelError>,
        calls: AtomicUsize,
    }

    impl Fake {
        fn ok(kind: ChannelKind) -> Arc<Self> {
            Self::with(kind, Duration::ZERO, Ok(()))
        }

        fn with(kind: ChannelKind, delay: Duration, result: Result<(), ChannelError>) -> Arc<Self> {
            Arc::new(Self {
                kind,
                delay,
                result,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl NotificationChannel for Fake {
        fn kind(&self) -> ChannelKind {
            self.kind
        }

        async fn send(&self, _event: &FallEvent, _contact: &EmergencyContact) -> Result<(), ChannelError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            self.result.clone()
        }
    }

    struct Panics;

    #[async_trait]
    impl NotificationChannel for Panics {
        fn kind(&self) -> ChannelKind {
            ChannelKind::Push
        }

        async fn send(&self, _event: &FallEvent, _contact: &EmergencyContact) -> Result<(), ChannelError> {
            panic!("notification service crashed");
        }
    }

    fn event() -> FallEvent {
        FallEvent {
            timestamp: 1_000,
            last_known_location: None,
            trigger_magnitude: 30.0,
        }
    }

    #[tokio::test]
    async fn phone_only_contact_skips_email() {
        let sms = Fake::ok(ChannelKind::Sms);
        let email = Fake::ok(ChannelKind::Email);
        let channels: Vec<Arc<dyn NotificationChannel>> = vec![sms.clone(), email.clone()];

        let report = AlertDispatcher::new()
            .dispatch(event(), &EmergencyContact::phone("+15551234567"), &channels)
            .await;

        assert_eq!(report.outcome_for(ChannelKind::Sms), Some(&DeliveryOutcome::Delivered));
        assert_eq!(report.outcome_for(ChannelKind::Email), Some(&DeliveryOutcome::Skipped));
        assert_eq!(sms.calls.load(Ordering::SeqCst), 1);
        assert_eq!(email.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failure_does_not_mask_siblings() {
        let channels: Vec<Arc<dyn NotificationChannel>> = vec![
            Fake::with(
                ChannelKind::Sms,
                Duration::ZERO,
                Err(ChannelError::Unavailable("no signal".into())),
            ),
            Fake::ok(ChannelKind::Email),
            Fake::ok(ChannelKind::Call),
        ];
        let contact = EmergencyContact::new("+15551234567", "carer@example.com");

        let report = AlertDispatcher::new().dispatch(event(), &contact, &channels).await;

        assert_eq!(
            report.outcome_for(ChannelKind::Sms),
            Some(&DeliveryOutcome::Failed("Channel unavailable: no signal".into()))
        );
        assert_eq!(report.delivered(), 2);
        assert_eq!(report.failed(), 1);
        assert!(!report.all_delivered());
    }

    #[tokio::test(start_paused = true)]
    async fn channels_run_concurrently() {
        let channels: Vec<Arc<dyn NotificationChannel>> = vec![
            Fake::with(ChannelKind::Sms, Duration::from_secs(5), Ok(())),
            Fake::with(ChannelKind::Email, Duration::from_secs(5), Ok(())),
            Fake::with(ChannelKind::Call, Duration::from_secs(5), Ok(())),
        ];
        let contact = EmergencyContact::new("+15551234567", "carer@example.com");

        let started = tokio::time::Instant::now();
        let report = AlertDispatcher::new().dispatch(event(), &contact, &channels).await;

        assert_eq!(report.delivered(), 3);
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn report_keeps_channel_order() {
        // Completion order is the reverse of the input order
        let channels: Vec<Arc<dyn NotificationChannel>> = vec![
            Fake::with(ChannelKind::Push, Duration::from_secs(3), Ok(())),
            Fake::with(ChannelKind::Call, Duration::from_secs(2), Ok(())),
            Fake::with(ChannelKind::Sms, Duration::from_secs(1), Ok(())),
        ];

        let report = AlertDispatcher::new()
            .dispatch(event(), &EmergencyContact::phone("+15551234567"), &channels)
            .await;

        let order: Vec<ChannelKind> = report.results.iter().map(|r| r.channel).collect();
        assert_eq!(order, vec![ChannelKind::Push, ChannelKind::Call, ChannelKind::Sms]);
        assert_eq!(report.fall_timestamp, 1_000);
    }

    #[tokio::test]
    async fn panicking_channel_is_reported_as_failed() {
        let channels: Vec<Arc<dyn NotificationChannel>> =
            vec![Arc::new(Panics), Fake::ok(ChannelKind::Sms)];

        let report = AlertDispatcher::new()
            .dispatch(event(), &EmergencyContact::phone("+15551234567"), &channels)
            .await;

        assert_eq!(
            report.results[0].outcome,
            DeliveryOutcome::Failed(PANICKED.to_string())
        );
        assert_eq!(report.results[1].outcome, DeliveryOutcome::Delivered);
    }

    #[tokio::test]
    async fn empty_channel_set_yields_empty_report() {
        let report = AlertDispatcher::new()
            .dispatch(event(), &EmergencyContact::default(), &[])
            .await;
        assert!(report.results.is_empty());
        assert!(!report.all_delivered());
        assert_eq!(report.to_string(), "no channels");
    }

    #[tokio::test]
    async fn stats_accumulate_across_dispatches() {
        let dispatcher = AlertDispatcher::new();
        let channels: Vec<Arc<dyn NotificationChannel>> = vec![
            Fake::ok(ChannelKind::Sms),
            Fake::with(
                ChannelKind::Push,
                Duration::ZERO,
                Err(ChannelError::PermissionDenied("POST_NOTIFICATIONS".into())),
            ),
            Fake::ok(ChannelKind::Email),
        ];
        let contact = EmergencyContact::phone("+15551234567");

        dispatcher.dispatch(event(), &contact, &channels).await;
        dispatcher.dispatch(event(), &contact, &channels).await;

        let stats = dispatcher.stats();
        assert_eq!(stats.dispatches, 2);
        assert_eq!(stats.delivered, 2);
        assert_eq!(stats.failed, 2);
        assert_eq!(stats.skipped, 2);
        assert_eq!(
            stats.last_error.as_deref(),
            Some("push: Permission denied: POST_NOTIFICATIONS")
        );
    }

    #[test]
    fn report_display_and_json() {
        let report = DispatchReport {
            fall_timestamp: 7,
            results: vec![
                DispatchResult {
                    channel: ChannelKind::Sms,
                    outcome: DeliveryOutcome::Delivered,
                },
                DispatchResult {
                    channel: ChannelKind::Email,
                    outcome: DeliveryOutcome::Skipped,
                },
                DispatchResult {
                    channel: ChannelKind::Call,
                    outcome: DeliveryOutcome::Failed("busy".into()),
                },
            ],
        };

        assert_eq!(report.to_string(), "sms: ok, email: skipped, call: failed (busy)");
        assert_eq!(
            report.to_json().unwrap(),
            concat!(
                r#"{"fall_timestamp":7,"results":["#,
                r#"{"channel":"sms","outcome":{"status":"delivered"}},"#,
                r#"{"channel":"email","outcome":{"status":"skipped"}},"#,
                r#"{"channel":"call","outcome":{"status":"failed","reason":"busy"}}]}"#
            )
        );
    }
}
