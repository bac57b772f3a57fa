//! Display entry types.

use std::time::{Duration, Instant};

use crate::config::{ElementConfig, ElementId, PilotId};

/// One row of positioned OSD text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLine {
    pub row: u8,
    pub col: u8,
    /// Raw text including color codes.
    pub text: String,
}

impl TextLine {
    pub fn new(row: u8, col: u8, text: impl Into<String>) -> Self {
        Self {
            row,
            col,
            text: text.into(),
        }
    }
}

/// How long a display stays up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayTiming {
    /// Persists until explicitly replaced or cleared.
    Static,
    /// Auto-clears after `uptime` deciseconds.
    Timed { uptime: u16 },
}

impl DisplayTiming {
    /// Derive timing from a resolved element configuration. A timed element
    /// with zero uptime degrades to static rather than flashing off
    /// immediately.
    pub fn from_element(config: &ElementConfig) -> Self {
        if config.is_timed && config.uptime > 0 {
            DisplayTiming::Timed {
                uptime: config.uptime,
            }
        } else {
            DisplayTiming::Static
        }
    }

    /// Wall-clock duration of a timed display.
    pub fn duration(&self) -> Option<Duration> {
        match self {
            DisplayTiming::Static => None,
            DisplayTiming::Timed { uptime } => {
                Some(Duration::from_millis(u64::from(*uptime) * 100))
            }
        }
    }
}

/// Visibility state of one (pilot, element) slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayState {
    Off,
    StaticOn,
    TimedOn,
}

/// A live (or just-removed) display entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledDisplay {
    pub pilot: PilotId,
    pub element: ElementId,
    pub lines: Vec<TextLine>,
    /// `None` for static displays.
    pub expires_at: Option<Instant>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timing_from_element() {
        let mut config = ElementId::RaceStart.default_config();
        assert_eq!(
            DisplayTiming::from_element(&config),
            DisplayTiming::Timed { uptime: 5 }
        );

        config.is_timed = false;
        assert_eq!(DisplayTiming::from_element(&config), DisplayTiming::Static);

        config.is_timed = true;
        config.uptime = 0;
        assert_eq!(DisplayTiming::from_element(&config), DisplayTiming::Static);
    }

    #[test]
    fn test_uptime_is_deciseconds() {
        let timing = DisplayTiming::Timed { uptime: 30 };
        assert_eq!(timing.duration(), Some(Duration::from_secs(3)));
        assert_eq!(DisplayTiming::Static.duration(), None);
    }
}
