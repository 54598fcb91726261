//! Synthetic accelerometer traces
//!
//! All traces sample at 50 Hz (20 ms) unless stated otherwise. Values are
//! m/s² in the device frame, gravity included. A phone held upright reads
//! y ≈ 9.8; a phone lying flat reads z ≈ 9.8.

use fallwatch_core::{constants::STANDARD_GRAVITY, time::Timestamp, Sample};

pub const SAMPLE_INTERVAL_MS: u64 = 20;

/// Upright phone with gentle periodic motion, never near the threshold
pub fn walking(start: Timestamp, duration_ms: u64) -> Vec<Sample> {
    (0..duration_ms / SAMPLE_INTERVAL_MS)
        .map(|i| {
            let t = start + i * SAMPLE_INTERVAL_MS;
            let phase = (i % 25) as f64 / 25.0 * std::f64::consts::TAU;
            Sample::new(
                0.8 * phase.sin(),
                STANDARD_GRAVITY + 2.0 * phase.cos(),
                1.5 * phase.sin(),
                t,
            )
        })
        .collect()
}

/// Single impact spike of the given magnitude
pub fn impact(at: Timestamp, magnitude: f64) -> Sample {
    // Split across axes the way a tumbling phone reports it
    let axis = magnitude / 3f64.sqrt();
    Sample::new(axis, axis, axis, at)
}

/// Phone lying flat and still
pub fn lying_flat(start: Timestamp, duration_ms: u64) -> Vec<Sample> {
    (0..duration_ms / SAMPLE_INTERVAL_MS)
        .map(|i| Sample::new(0.05, 0.3, STANDARD_GRAVITY, start + i * SAMPLE_INTERVAL_MS))
        .collect()
}

/// Walking, impact, then lying still long enough for the window to close
pub fn fall_then_still(window_ms: u64) -> Vec<Sample> {
    let mut trace = walking(0, 2_000);
    trace.push(impact(2_000, 30.0));
    trace.extend(lying_flat(2_000 + SAMPLE_INTERVAL_MS, window_ms + 1_000));
    trace
}

/// Walking, a hard landing from a jump, then walking on
pub fn jump_then_walk(window_ms: u64) -> Vec<Sample> {
    let mut trace = walking(0, 2_000);
    trace.push(impact(2_000, 32.0));
    trace.extend(walking(2_000 + SAMPLE_INTERVAL_MS, window_ms + 1_000));
    trace
}
