//! Replaying an Accelerometer Trace
//!
//! Drives a [`FallMonitor`] directly, without any runtime. The caller owns
//! the clock: it checks [`FallMonitor::deadline`] before each sample and
//! closes the window itself once the deadline has passed.
//!
//! ## What You'll Learn
//!
//! - Choosing a detection preset
//! - Feeding samples and closing monitoring windows by hand
//! - Reading notifications and statistics
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run -p fallwatch-core --example 01_replay_trace
//! ```

use fallwatch_core::{
    magnitude, DetectionConfig, FallMonitor, MonitorNotification, Sample,
};

const SAMPLE_INTERVAL_MS: u64 = 100;

/// Walk, trip and recover, then a hard fall where the wearer stays down
fn trace() -> Vec<Sample> {
    let mut samples = Vec::new();
    let mut t = 0;
    let mut push = |count: usize, axes: [f64; 3]| {
        for _ in 0..count {
            samples.push(Sample::from_axes(axes, t));
            t += SAMPLE_INTERVAL_MS;
        }
    };

    push(20, [0.5, 9.8, 1.0]); // walking
    push(1, [6.0, 20.0, 16.0]); // stumble
    push(120, [0.8, 9.6, 1.2]); // back on their feet
    push(1, [3.0, 17.0, 26.0]); // impact
    push(120, [0.2, 0.4, 9.8]); // lying flat
    samples
}

fn describe(notification: &MonitorNotification) -> String {
    match notification {
        MonitorNotification::WatchStarted { since, trigger } => format!(
            "watch started at {} ms (|a| = {:.1} m/s²)",
            since,
            magnitude(trigger)
        ),
        MonitorNotification::FallConfirmed(event) => format!(
            "FALL CONFIRMED (trigger at {} ms, |a| = {:.1} m/s²)",
            event.timestamp, event.trigger_magnitude
        ),
        MonitorNotification::FalseAlarm => "false alarm: wearer is upright again".to_string(),
        MonitorNotification::Cancelled => "cancelled".to_string(),
    }
}

fn main() {
    println!("FallWatch Trace Replay");
    println!("======================\n");

    for (name, config) in [
        ("default", DetectionConfig::default()),
        ("sensitive", DetectionConfig::sensitive()),
    ] {
        println!(
            "Preset '{}': threshold {:.1}, band ±{:.1}, window {} ms",
            name,
            config.fall_threshold(),
            config.y_stability_band(),
            config.monitoring_window_ms()
        );

        let mut monitor = match FallMonitor::new(config) {
            Ok(monitor) => monitor,
            Err(e) => {
                println!("  rejected: {}", e);
                continue;
            }
        };
        monitor.set_location(Some("Latitude: 51.5072, Longitude: -0.1276".to_string()));

        for sample in trace() {
            // Close an expired window before the sample that follows it
            if monitor.deadline().is_some_and(|due| sample.timestamp >= due) {
                if let Some(n) = monitor.window_elapsed_with_latest() {
                    println!("  {:>6} ms  {}", sample.timestamp, describe(&n));
                }
            }
            if let Some(n) = monitor.on_sample(sample, sample.timestamp) {
                println!("  {:>6} ms  {}", sample.timestamp, describe(&n));
            }
        }
        if let Some(n) = monitor.cancel() {
            println!("  end of trace: {}", describe(&n));
        }

        let stats = monitor.stats();
        println!(
            "  samples {}, watches {}, falls {}, false alarms {}\n",
            stats.samples_seen, stats.watches_started, stats.falls_confirmed, stats.false_alarms
        );
    }
}
