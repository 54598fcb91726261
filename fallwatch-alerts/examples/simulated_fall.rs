//! Simulated Fall with Alert Dispatch
//!
//! Streams a synthetic accelerometer trace through a [`FallWatch`] session:
//! a walk, a hard impact, then the wearer lying flat. Ten seconds later the
//! session confirms the fall and sends alerts over every channel the
//! contact can be reached on.
//!
//! ## What You'll Learn
//!
//! - Implementing [`NotificationChannel`] for a delivery backend
//! - Starting a session and feeding it samples and commands
//! - Subscribing to session events
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run -p fallwatch-alerts --example simulated_fall
//! ```
//!
//! The trace plays back at 10x speed, so the monitoring window is shortened
//! by the same factor.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use fallwatch_alerts::{
    AlertMessage, ChannelError, ChannelKind, FallWatch, NotificationChannel, SessionEvent,
};
use fallwatch_core::constants::DEFAULT_MONITORING_WINDOW_MS;
use fallwatch_core::time::SystemTime;
use fallwatch_core::{magnitude, DetectionConfig, EmergencyContact, FallEvent, Sample};

/// Sampling period of the synthetic trace
const SAMPLE_INTERVAL_MS: u64 = 50;

/// Playback speed-up
const SPEED: u64 = 10;

/// Prints the alert instead of delivering it
struct ConsoleChannel(ChannelKind);

#[async_trait]
impl NotificationChannel for ConsoleChannel {
    fn kind(&self) -> ChannelKind {
        self.0
    }

    async fn send(&self, event: &FallEvent, contact: &EmergencyContact) -> Result<(), ChannelError> {
        let message = AlertMessage::compose(event);
        match self.0 {
            ChannelKind::Email => println!(
                "  [email -> {}] {}: {}",
                contact.email_address().unwrap_or("?"),
                message.subject,
                message.body
            ),
            ChannelKind::Push => println!("  [push] {}: {}", message.push_title, message.push_body),
            kind => println!(
                "  [{} -> {}] {}",
                kind,
                contact.phone_number().unwrap_or("?"),
                message.body
            ),
        }
        Ok(())
    }
}

fn trace() -> Vec<Sample> {
    let mut samples = Vec::new();
    let mut t = 0;
    let mut push = |x: f64, y: f64, z: f64| {
        samples.push(Sample::new(x, y, z, t));
        t += SAMPLE_INTERVAL_MS;
    };

    // Two seconds of upright walking
    for i in 0..40 {
        let sway = if i % 2 == 0 { 1.5 } else { -1.5 };
        push(sway, 9.8 + sway, 0.5);
    }
    // Impact
    push(4.0, 18.0, 24.0);
    push(2.0, 6.0, 12.0);
    // Twelve seconds lying flat
    for _ in 0..240 {
        push(0.1, 0.3, 9.8);
    }
    samples
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    println!("FallWatch Simulated Fall");
    println!("========================\n");

    let config = match DetectionConfig::default().with_window(Duration::from_millis(
        DEFAULT_MONITORING_WINDOW_MS / SPEED,
    )) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            return;
        }
    };
    println!(
        "Detection: threshold {:.1} m/s², stable |y| <= {:.1} m/s², window {} ms\n",
        config.fall_threshold(),
        config.y_stability_band(),
        config.monitoring_window_ms()
    );

    let channels: Vec<Arc<dyn NotificationChannel>> = ChannelKind::ALL
        .into_iter()
        .map(|kind| Arc::new(ConsoleChannel(kind)) as Arc<dyn NotificationChannel>)
        .collect();
    let contact = EmergencyContact::phone("+15551234567");

    // Wall-clock stamps so alerts carry the real time of the fall
    let watch = match FallWatch::new(config, contact, channels) {
        Ok(watch) => watch.with_clock(SystemTime),
        Err(e) => {
            eprintln!("Cannot start session: {}", e);
            return;
        }
    };
    let mut events = watch.subscribe();
    let handle = watch.start();

    let printer = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                SessionEvent::Monitor(notification) => println!("-> {}", notification.name()),
                SessionEvent::Dispatched(report) => println!("-> dispatched: {}", report),
            }
        }
    });

    if handle
        .set_location("Latitude: 45.4642, Longitude: 9.1900")
        .await
        .is_err()
    {
        eprintln!("Session stopped early");
        return;
    }

    let tick = Duration::from_millis(SAMPLE_INTERVAL_MS / SPEED);
    for sample in trace() {
        if magnitude(&sample) > 20.0 {
            println!("t={:>5} ms  |a| = {:.1} m/s²", sample.timestamp, magnitude(&sample));
        }
        if handle.send_sample(sample).await.is_err() {
            eprintln!("Session stopped early");
            return;
        }
        tokio::time::sleep(tick).await;
    }

    match handle.finish().await {
        Ok(summary) => {
            println!("\nSummary");
            println!("-------");
            println!("Samples seen:    {}", summary.stats.samples_seen);
            println!("Falls confirmed: {}", summary.stats.falls_confirmed);
            println!("False alarms:    {}", summary.stats.false_alarms);
            for report in &summary.reports {
                println!("Alerts:          {}", report);
            }
        }
        Err(e) => eprintln!("Session failed: {}", e),
    }

    let _ = printer.await;
}
