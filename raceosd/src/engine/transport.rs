//! Transport seam.
//!
//! Delivery of rendered text to a pilot's display hardware is out of scope;
//! the engine only talks to [`OsdTransport`]. Calls follow the hardware's
//! batch protocol: one or more `clear_row`/`send_line` calls staged per
//! pilot, committed by `display`. Implementations are fire-and-forget: the
//! engine never blocks on delivery or observes its outcome.

use std::sync::Mutex;

use crate::config::PilotId;
use crate::scheduler::TextLine;

/// Sink for rendered OSD output.
pub trait OsdTransport: Send + Sync {
    /// Stage one positioned line of text.
    fn send_line(&self, pilot: PilotId, line: &TextLine);

    /// Stage a wipe of one row.
    fn clear_row(&self, pilot: PilotId, row: u8);

    /// Stage a wipe of the whole screen.
    fn clear_screen(&self, pilot: PilotId);

    /// Commit everything staged for `pilot`.
    fn display(&self, pilot: PilotId);
}

/// Transport that discards everything. Useful as a stand-in when no
/// hardware is attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTransport;

impl OsdTransport for NullTransport {
    fn send_line(&self, _pilot: PilotId, _line: &TextLine) {}
    fn clear_row(&self, _pilot: PilotId, _row: u8) {}
    fn clear_screen(&self, _pilot: PilotId) {}
    fn display(&self, _pilot: PilotId) {}
}

/// One recorded transport call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    Line { pilot: PilotId, line: TextLine },
    ClearRow { pilot: PilotId, row: u8 },
    ClearScreen { pilot: PilotId },
    Display { pilot: PilotId },
}

/// Transport that records every call, for tests and dry runs.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    events: Mutex<Vec<TransportEvent>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call so far, in order.
    pub fn events(&self) -> Vec<TransportEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Drain and return every call so far.
    pub fn take(&self) -> Vec<TransportEvent> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }

    /// Just the staged text lines, in order.
    pub fn lines(&self) -> Vec<(PilotId, TextLine)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                TransportEvent::Line { pilot, line } => Some((pilot, line)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, event: TransportEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl OsdTransport for RecordingTransport {
    fn send_line(&self, pilot: PilotId, line: &TextLine) {
        self.record(TransportEvent::Line {
            pilot,
            line: line.clone(),
        });
    }

    fn clear_row(&self, pilot: PilotId, row: u8) {
        self.record(TransportEvent::ClearRow { pilot, row });
    }

    fn clear_screen(&self, pilot: PilotId) {
        self.record(TransportEvent::ClearScreen { pilot });
    }

    fn display(&self, pilot: PilotId) {
        self.record(TransportEvent::Display { pilot });
    }
}
