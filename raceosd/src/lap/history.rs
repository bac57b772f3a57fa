//! Full per-race log of counted laps.
//!
//! The post-race lap-time lists (race stop, pilot done) need every counted
//! lap in order, not just the rolling tail kept by the recent tracker. The
//! filter already aggregated short laps when it counted them, so this log is
//! simply an append-only record of its verdicts.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use crate::config::PilotId;

use super::filter::LapLabel;

/// Append-only per-pilot list of counted laps for the current race.
#[derive(Debug, Default)]
pub struct LapHistory {
    inner: Mutex<HashMap<PilotId, Vec<(LapLabel, Duration)>>>,
}

impl LapHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a counted lap.
    pub fn push(&self, pilot: PilotId, label: LapLabel, duration: Duration) {
        self.inner
            .lock()
            .unwrap()
            .entry(pilot)
            .or_default()
            .push((label, duration));
    }

    /// All counted laps for `pilot`, oldest first.
    pub fn laps(&self, pilot: PilotId) -> Vec<(LapLabel, Duration)> {
        self.inner
            .lock()
            .unwrap()
            .get(&pilot)
            .cloned()
            .unwrap_or_default()
    }

    /// Drop all per-pilot state (race reset).
    pub fn reset(&self) {
        self.inner.lock().unwrap().clear();
    }
}
