//! The timed-display state machine.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Instant;

use tracing::debug;

use crate::config::{ElementId, PilotId};

use super::display::{DisplayState, DisplayTiming, ScheduledDisplay, TextLine};

#[derive(Debug)]
struct Entry {
    lines: Vec<TextLine>,
    expires_at: Option<Instant>,
}

/// Tracks visibility and expiry per (pilot, element).
///
/// Race-event handlers call [`show`](DisplayScheduler::show) and
/// [`clear`](DisplayScheduler::clear); an external timer drives
/// [`poll`](DisplayScheduler::poll). All three paths serialize on one lock,
/// so an expiry can never interleave with a handler re-showing the same
/// element: last write wins, and a re-shown element's timer restarts from
/// the `show` call.
///
/// The scheduler knows nothing about screen-region collisions between
/// *different* elements; keeping two elements off the same rows is the
/// operator's configuration responsibility.
#[derive(Debug, Default)]
pub struct DisplayScheduler {
    inner: Mutex<HashMap<(PilotId, ElementId), Entry>>,
}

impl DisplayScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put an element on screen, replacing any previous entry for the same
    /// (pilot, element) regardless of its state. No queueing: an element is
    /// never "pending" behind another.
    pub fn show(
        &self,
        pilot: PilotId,
        element: ElementId,
        lines: Vec<TextLine>,
        timing: DisplayTiming,
    ) {
        self.show_at(Instant::now(), pilot, element, lines, timing);
    }

    fn show_at(
        &self,
        now: Instant,
        pilot: PilotId,
        element: ElementId,
        lines: Vec<TextLine>,
        timing: DisplayTiming,
    ) {
        let expires_at = timing.duration().map(|d| now + d);
        debug!(%pilot, %element, timed = expires_at.is_some(), "display shown");
        self.inner
            .lock()
            .unwrap()
            .insert((pilot, element), Entry { lines, expires_at });
    }

    /// Force an element off immediately, returning the removed entry so the
    /// caller can wipe its rows. Used when an event supersedes a message
    /// that may still be showing.
    pub fn clear(&self, pilot: PilotId, element: ElementId) -> Option<ScheduledDisplay> {
        let entry = self.inner.lock().unwrap().remove(&(pilot, element))?;
        debug!(%pilot, %element, "display cleared");
        Some(to_display(pilot, element, entry))
    }

    /// Current state of one (pilot, element) slot.
    pub fn state(&self, pilot: PilotId, element: ElementId) -> DisplayState {
        match self.inner.lock().unwrap().get(&(pilot, element)) {
            None => DisplayState::Off,
            Some(Entry {
                expires_at: None, ..
            }) => DisplayState::StaticOn,
            Some(_) => DisplayState::TimedOn,
        }
    }

    /// Remove and return every entry whose uptime has elapsed.
    ///
    /// Drive this from a timer with sub-second granularity; the contract
    /// only depends on "called reasonably often", not on any particular
    /// tick rate.
    pub fn poll(&self) -> Vec<ScheduledDisplay> {
        self.poll_at(Instant::now())
    }

    fn poll_at(&self, now: Instant) -> Vec<ScheduledDisplay> {
        let mut inner = self.inner.lock().unwrap();
        let expired_keys: Vec<_> = inner
            .iter()
            .filter(|(_, entry)| matches!(entry.expires_at, Some(at) if at <= now))
            .map(|(key, _)| *key)
            .collect();

        let mut expired = Vec::with_capacity(expired_keys.len());
        for key in expired_keys {
            if let Some(entry) = inner.remove(&key) {
                debug!(pilot = %key.0, element = %key.1, "display expired");
                expired.push(to_display(key.0, key.1, entry));
            }
        }
        expired
    }

    /// Remove every live entry for one pilot.
    pub fn drain_pilot(&self, pilot: PilotId) -> Vec<ScheduledDisplay> {
        let mut inner = self.inner.lock().unwrap();
        let keys: Vec<_> = inner
            .keys()
            .filter(|(p, _)| *p == pilot)
            .copied()
            .collect();
        keys.into_iter()
            .filter_map(|key| inner.remove(&key).map(|e| to_display(key.0, key.1, e)))
            .collect()
    }

    /// Remove every live entry (race reset). One lock acquisition: callers
    /// never observe a partially-drained board.
    pub fn drain_all(&self) -> Vec<ScheduledDisplay> {
        let mut inner = self.inner.lock().unwrap();
        inner
            .drain()
            .map(|((pilot, element), entry)| to_display(pilot, element, entry))
            .collect()
    }

    /// Number of live entries across all pilots.
    pub fn live_count(&self) -> usize {
        self.inner.lock().unwrap().len()
    }
}

fn to_display(pilot: PilotId, element: ElementId, entry: Entry) -> ScheduledDisplay {
    ScheduledDisplay {
        pilot,
        element,
        lines: entry.lines,
        expires_at: entry.expires_at,
    }
}
