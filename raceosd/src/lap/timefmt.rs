//! Lap-time text formatting.

use std::time::Duration;

/// Format a duration as `m:ss.d` (minutes, zero-padded seconds, tenths).
///
/// This is the split format used by lap-result and lap-time lists:
/// `0:42.5`, `3:45.2`.
pub fn split(duration: Duration) -> String {
    // Round to the nearest millisecond first; truncating sub-millisecond
    // noise would misreport e.g. 225.2s (stored as 225.19999…) as 3:45.1.
    let ms = (duration.as_secs_f64() * 1000.0).round() as u128;
    let minutes = ms / 60_000;
    let seconds = (ms % 60_000) / 1_000;
    let tenths = (ms % 1_000) / 100;
    format!("{}:{:02}.{}", minutes, seconds, tenths)
}

/// Format a duration as seconds with two decimals, no minutes component.
///
/// The rolling recent-laps element is width-constrained, so `105.32` is
/// preferred over `1:45.32` regardless of how long the lap ran.
pub fn seconds(duration: Duration) -> String {
    format!("{:.2}", duration.as_secs_f64())
}
