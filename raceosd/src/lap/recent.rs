//! Rolling history of recent valid laps.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use crate::config::PilotId;

use super::filter::LapLabel;

/// One entry in the rolling display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecentLap {
    pub label: LapLabel,
    pub duration: Duration,
}

/// Bounded per-pilot history of the most recent valid laps.
///
/// Only laps the [`LapFilter`](super::LapFilter) counted are pushed, so the
/// sequence is FIFO by recency, not by raw lap index: aggregated laps
/// compress it. Capacity is the pilot's resolved `num_laps`, passed at push
/// time because different pilots may configure different depths.
#[derive(Debug, Default)]
pub struct RecentLapsTracker {
    inner: Mutex<HashMap<PilotId, VecDeque<RecentLap>>>,
}

impl RecentLapsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a counted lap, evicting the oldest entry beyond `capacity`.
    pub fn push(&self, pilot: PilotId, label: LapLabel, duration: Duration, capacity: usize) {
        let capacity = capacity.max(1);
        let mut inner = self.inner.lock().unwrap();
        let laps = inner.entry(pilot).or_default();
        while laps.len() >= capacity {
            laps.pop_front();
        }
        laps.push_back(RecentLap { label, duration });
    }

    /// The most recent laps for `pilot`, newest first, at most `num_laps`.
    pub fn snapshot(&self, pilot: PilotId, num_laps: usize) -> Vec<RecentLap> {
        let inner = self.inner.lock().unwrap();
        match inner.get(&pilot) {
            Some(laps) => laps.iter().rev().take(num_laps).copied().collect(),
            None => Vec::new(),
        }
    }

    /// Drop all per-pilot state (race reset).
    pub fn reset(&self) {
        self.inner.lock().unwrap().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PILOT: PilotId = PilotId(1);

    fn secs(s: f64) -> Duration {
        Duration::from_secs_f64(s)
    }

    #[test]
    fn test_snapshot_is_newest_first() {
        let tracker = RecentLapsTracker::new();
        tracker.push(PILOT, LapLabel::Holeshot, secs(45.01), 3);
        tracker.push(PILOT, LapLabel::Lap(1), secs(44.23), 3);
        tracker.push(PILOT, LapLabel::Lap(2), secs(43.56), 3);

        let snap = tracker.snapshot(PILOT, 3);
        assert_eq!(snap[0].label, LapLabel::Lap(2));
        assert_eq!(snap[1].label, LapLabel::Lap(1));
        assert_eq!(snap[2].label, LapLabel::Holeshot);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let tracker = RecentLapsTracker::new();
        tracker.push(PILOT, LapLabel::Holeshot, secs(45.01), 3);
        tracker.push(PILOT, LapLabel::Lap(1), secs(44.23), 3);
        tracker.push(PILOT, LapLabel::Lap(2), secs(43.56), 3);
        tracker.push(PILOT, LapLabel::Lap(3), secs(42.90), 3);

        let snap = tracker.snapshot(PILOT, 3);
        assert_eq!(
            snap,
            vec![
                RecentLap { label: LapLabel::Lap(3), duration: secs(42.90) },
                RecentLap { label: LapLabel::Lap(2), duration: secs(43.56) },
                RecentLap { label: LapLabel::Lap(1), duration: secs(44.23) },
            ]
        );
    }

    #[test]
    fn test_snapshot_shorter_than_capacity() {
        let tracker = RecentLapsTracker::new();
        tracker.push(PILOT, LapLabel::Holeshot, secs(45.0), 3);
        assert_eq!(tracker.snapshot(PILOT, 3).len(), 1);
    }

    #[test]
    fn test_snapshot_limit_below_stored() {
        let tracker = RecentLapsTracker::new();
        for n in 1..=5 {
            tracker.push(PILOT, LapLabel::Lap(n), secs(40.0), 5);
        }
        let snap = tracker.snapshot(PILOT, 2);
        assert_eq!(snap.len(), 2);
        assert_eq!(snap[0].label, LapLabel::Lap(5));
    }

    #[test]
    fn test_shrinking_capacity_drops_old_entries() {
        let tracker = RecentLapsTracker::new();
        for n in 1..=4 {
            tracker.push(PILOT, LapLabel::Lap(n), secs(40.0), 4);
        }
        // A later push with a smaller capacity trims the backlog.
        tracker.push(PILOT, LapLabel::Lap(5), secs(40.0), 2);
        let snap = tracker.snapshot(PILOT, 4);
        assert_eq!(snap.len(), 2);
        assert_eq!(snap[0].label, LapLabel::Lap(5));
    }

    #[test]
    fn test_unknown_pilot_is_empty() {
        let tracker = RecentLapsTracker::new();
        assert!(tracker.snapshot(PILOT, 3).is_empty());
    }

    #[test]
    fn test_reset_clears_all_pilots() {
        let tracker = RecentLapsTracker::new();
        tracker.push(PILOT, LapLabel::Holeshot, secs(45.0), 3);
        tracker.push(PilotId(2), LapLabel::Holeshot, secs(44.0), 3);
        tracker.reset();
        assert!(tracker.snapshot(PILOT, 3).is_empty());
        assert!(tracker.snapshot(PilotId(2), 3).is_empty());
    }
}
