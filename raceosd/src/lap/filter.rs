//! Lap validity filtering with carry-time aggregation.
//!
//! Timing gates occasionally double-trigger, producing laps far shorter than
//! the race format's minimum lap time. Rather than discarding those samples,
//! their time is *carried*: accumulated and folded into the next lap that
//! (with carry included) clears the minimum. The holeshot (the first gate
//! crossing of a race) is always valid regardless of duration.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use tracing::debug;

use crate::config::PilotId;

/// Label of a counted lap as it appears on the OSD.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LapLabel {
    /// First gate crossing of the race.
    Holeshot,
    /// Full lap, numbered from 1.
    Lap(u32),
}

impl std::fmt::Display for LapLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LapLabel::Holeshot => f.write_str("HS"),
            LapLabel::Lap(n) => write!(f, "L{}", n),
        }
    }
}

/// Outcome of classifying one raw lap duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LapVerdict {
    /// The lap is valid and counts toward the pilot's displayed lap count.
    Counted {
        /// Raw duration plus any carry folded in.
        display: Duration,
        label: LapLabel,
    },
    /// The lap was too short; its duration joins the pilot's carry.
    Carried {
        /// Total carry now pending for the pilot.
        carry: Duration,
    },
}

impl LapVerdict {
    /// Whether this lap counts as a new displayed lap.
    pub fn counts_as_new_lap(&self) -> bool {
        matches!(self, LapVerdict::Counted { .. })
    }

    /// The displayed duration for a counted lap.
    pub fn display_duration(&self) -> Option<Duration> {
        match self {
            LapVerdict::Counted { display, .. } => Some(*display),
            LapVerdict::Carried { .. } => None,
        }
    }
}

#[derive(Debug, Default)]
struct PilotLapState {
    carry: Duration,
    /// Valid laps so far, holeshot included.
    laps_counted: u32,
    holeshot_seen: bool,
}

/// Per-pilot lap classification for one race.
///
/// The minimum lap time comes from the race format and is fixed for the
/// race's duration; carry accumulates monotonically and resets only with
/// [`LapFilter::reset`].
#[derive(Debug)]
pub struct LapFilter {
    min_lap_time: Duration,
    inner: Mutex<HashMap<PilotId, PilotLapState>>,
}

impl LapFilter {
    pub fn new(min_lap_time: Duration) -> Self {
        Self {
            min_lap_time,
            inner: Mutex::new(HashMap::new()),
        }
    }

    /// Classify one raw lap duration for `pilot`.
    pub fn record(&self, pilot: PilotId, raw: Duration, is_holeshot: bool) -> LapVerdict {
        let mut inner = self.inner.lock().unwrap();
        let state = inner.entry(pilot).or_default();

        if is_holeshot {
            state.laps_counted += 1;
            state.holeshot_seen = true;
            debug!(%pilot, duration = ?raw, "holeshot counted");
            return LapVerdict::Counted {
                display: raw,
                label: LapLabel::Holeshot,
            };
        }

        let total = raw + state.carry;
        if total < self.min_lap_time {
            state.carry = total;
            debug!(%pilot, duration = ?raw, carry = ?state.carry, "short lap carried");
            return LapVerdict::Carried { carry: total };
        }

        state.carry = Duration::ZERO;
        state.laps_counted += 1;
        let number = state.laps_counted - u32::from(state.holeshot_seen);
        debug!(%pilot, display = ?total, number, "lap counted");
        LapVerdict::Counted {
            display: total,
            label: LapLabel::Lap(number),
        }
    }

    /// Valid laps recorded for `pilot` so far, holeshot included.
    pub fn displayed_lap_count(&self, pilot: PilotId) -> u32 {
        self.inner
            .lock()
            .unwrap()
            .get(&pilot)
            .map(|state| state.laps_counted)
            .unwrap_or(0)
    }

    /// Carry currently pending for `pilot`.
    pub fn carry(&self, pilot: PilotId) -> Duration {
        self.inner
            .lock()
            .unwrap()
            .get(&pilot)
            .map(|state| state.carry)
            .unwrap_or(Duration::ZERO)
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
    fn test_holeshot_always_counts() {
        let filter = LapFilter::new(secs(3.0));
        let verdict = filter.record(PILOT, secs(0.8), true);
        assert_eq!(
            verdict,
            LapVerdict::Counted {
                display: secs(0.8),
                label: LapLabel::Holeshot,
            }
        );
        assert_eq!(filter.displayed_lap_count(PILOT), 1);
    }

    #[test]
    fn test_short_laps_carry_into_next() {
        let filter = LapFilter::new(secs(3.0));

        assert_eq!(
            filter.record(PILOT, secs(1.0), false),
            LapVerdict::Carried { carry: secs(1.0) }
        );
        assert_eq!(
            filter.record(PILOT, secs(1.5), false),
            LapVerdict::Carried { carry: secs(2.5) }
        );
        assert_eq!(filter.displayed_lap_count(PILOT), 0);
        assert_eq!(filter.carry(PILOT), secs(2.5));

        let verdict = filter.record(PILOT, secs(4.0), false);
        assert_eq!(
            verdict,
            LapVerdict::Counted {
                display: secs(6.5),
                label: LapLabel::Lap(1),
            }
        );
        // Exactly one displayed lap came out of the three samples.
        assert_eq!(filter.displayed_lap_count(PILOT), 1);
        assert_eq!(filter.carry(PILOT), Duration::ZERO);
    }

    #[test]
    fn test_lap_numbers_skip_the_holeshot() {
        let filter = LapFilter::new(secs(3.0));
        filter.record(PILOT, secs(1.0), true);
        let verdict = filter.record(PILOT, secs(40.0), false);
        assert_eq!(
            verdict,
            LapVerdict::Counted {
                display: secs(40.0),
                label: LapLabel::Lap(1),
            }
        );
        assert_eq!(filter.displayed_lap_count(PILOT), 2);
    }

    #[test]
    fn test_lap_numbers_without_holeshot_start_at_one() {
        let filter = LapFilter::new(secs(3.0));
        let verdict = filter.record(PILOT, secs(35.0), false);
        assert_eq!(
            verdict,
            LapVerdict::Counted {
                display: secs(35.0),
                label: LapLabel::Lap(1),
            }
        );
    }

    #[test]
    fn test_exactly_minimum_counts() {
        let filter = LapFilter::new(secs(3.0));
        assert!(filter.record(PILOT, secs(3.0), false).counts_as_new_lap());
    }

    #[test]
    fn test_zero_minimum_accepts_everything() {
        let filter = LapFilter::new(Duration::ZERO);
        assert!(filter.record(PILOT, secs(0.1), false).counts_as_new_lap());
    }

    #[test]
    fn test_pilots_are_independent() {
        let filter = LapFilter::new(secs(3.0));
        let other = PilotId(2);
        filter.record(PILOT, secs(1.0), false);
        assert_eq!(filter.carry(other), Duration::ZERO);
        assert!(filter.record(other, secs(5.0), false).counts_as_new_lap());
    }

    #[test]
    fn test_reset_clears_state() {
        let filter = LapFilter::new(secs(3.0));
        filter.record(PILOT, secs(1.0), false);
        filter.record(PILOT, secs(20.0), false);
        filter.reset();
        assert_eq!(filter.displayed_lap_count(PILOT), 0);
        assert_eq!(filter.carry(PILOT), Duration::ZERO);
    }

    #[test]
    fn test_label_display() {
        assert_eq!(LapLabel::Holeshot.to_string(), "HS");
        assert_eq!(LapLabel::Lap(4).to_string(), "L4");
    }
}
