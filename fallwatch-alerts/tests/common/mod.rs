//! Shared fakes for alert dispatch tests

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use fallwatch_alerts::{ChannelError, ChannelKind, NotificationChannel};
use fallwatch_core::{EmergencyContact, FallEvent};

/// Channel that records every alert it is asked to send
pub struct RecordingChannel {
    kind: ChannelKind,
    latency: Duration,
    failure: Option<ChannelError>,
    sent: Mutex<Vec<(FallEvent, EmergencyContact)>>,
}

impl RecordingChannel {
    pub fn new(kind: ChannelKind) -> Arc<Self> {
        Self::build(kind, Duration::ZERO, None)
    }

    pub fn slow(kind: ChannelKind, latency: Duration) -> Arc<Self> {
        Self::build(kind, latency, None)
    }

    pub fn failing(kind: ChannelKind, failure: ChannelError) -> Arc<Self> {
        Self::build(kind, Duration::ZERO, Some(failure))
    }

    fn build(kind: ChannelKind, latency: Duration, failure: Option<ChannelError>) -> Arc<Self> {
        Arc::new(Self {
            kind,
            latency,
            failure,
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn sent(&self) -> Vec<(FallEvent, EmergencyContact)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn send_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl NotificationChannel for RecordingChannel {
    fn kind(&self) -> ChannelKind {
        self.kind
    }

    async fn send(&self, event: &FallEvent, contact: &EmergencyContact) -> Result<(), ChannelError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.sent.lock().unwrap().push((event.clone(), contact.clone()));
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

pub fn as_channels(channels: &[Arc<RecordingChannel>]) -> Vec<Arc<dyn NotificationChannel>> {
    channels
        .iter()
        .map(|c| Arc::clone(c) as Arc<dyn NotificationChannel>)
        .collect()
}

pub fn fall_event() -> FallEvent {
    FallEvent {
        timestamp: 0,
        last_known_location: Some("Latitude: 45.0, Longitude: 9.0".to_string()),
        trigger_magnitude: 30.0,
    }
}
