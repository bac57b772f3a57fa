//! Typed OSD element model.
//!
//! Every element the engine can draw is a known [`ElementId`] with a
//! fully-populated built-in [`ElementConfig`]. Stored configuration (global
//! options or a per-pilot payload) only ever *overrides* fields of these
//! built-ins, so resolution never has to invent a value at event time.

use serde::Deserialize;

use crate::screen::{clamp_col, clamp_row, Alignment};

/// Identifier of an OSD element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementId {
    /// Event name banner, shown while staging.
    EventName,
    /// Race-class name, shown while staging.
    ClassName,
    /// Heat name (optionally with round number), shown while staging.
    HeatName,
    /// Operator broadcast messages.
    Announcement,
    /// "ARM NOW" style staging message.
    RaceStage,
    /// "GO!" race-start flash.
    RaceStart,
    /// "FINISH LAP!" race-end message.
    RaceFinish,
    /// "LAND NOW!" race-stop message.
    RaceStop,
    /// "FINISHED!" message when a pilot completes the race.
    PilotDone,
    /// Current lap counter (optionally with position).
    CurrentLap,
    /// Rolling list of the most recent lap times.
    RecentLaps,
    /// Post-race placement and win-condition summary (two rows).
    Results,
    /// Post-race lap time list.
    LapTimes,
    /// Per-lap result line (last lap / gap).
    LapResults,
}

impl ElementId {
    /// Every known element, in default top-to-bottom screen order.
    pub const ALL: [ElementId; 14] = [
        ElementId::EventName,
        ElementId::ClassName,
        ElementId::HeatName,
        ElementId::Announcement,
        ElementId::RaceStage,
        ElementId::RaceStart,
        ElementId::RaceFinish,
        ElementId::RaceStop,
        ElementId::PilotDone,
        ElementId::CurrentLap,
        ElementId::RecentLaps,
        ElementId::Results,
        ElementId::LapTimes,
        ElementId::LapResults,
    ];

    /// Stable string key used in stored payloads and option names.
    pub fn key(&self) -> &'static str {
        match self {
            ElementId::EventName => "event_name",
            ElementId::ClassName => "class_name",
            ElementId::HeatName => "heat_name",
            ElementId::Announcement => "announcement",
            ElementId::RaceStage => "race_stage",
            ElementId::RaceStart => "race_start",
            ElementId::RaceFinish => "race_finish",
            ElementId::RaceStop => "race_stop",
            ElementId::PilotDone => "pilot_done",
            ElementId::CurrentLap => "current_lap",
            ElementId::RecentLaps => "recent_laps",
            ElementId::Results => "results",
            ElementId::LapTimes => "lap_times",
            ElementId::LapResults => "lap_results",
        }
    }

    /// Look up an element by its stored key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|id| id.key() == key)
    }

    /// Built-in default configuration for this element.
    ///
    /// These are the values a fresh installation renders with: staging
    /// banners near the top, status messages on row 5, timing read-outs in
    /// the lower third. Timed defaults are in deciseconds.
    pub fn default_config(&self) -> ElementConfig {
        use Alignment::{Center, Left};

        let cfg = |enabled, row, alignment, uptime| ElementConfig {
            enabled,
            row,
            alignment,
            custom_col: None,
            is_timed: uptime > 0,
            uptime,
            num_laps: DEFAULT_RECENT_LAPS,
        };

        match self {
            ElementId::EventName => cfg(false, 0, Center, 0),
            ElementId::ClassName => cfg(false, 1, Center, 0),
            ElementId::HeatName => cfg(false, 2, Center, 0),
            ElementId::Announcement => cfg(true, 3, Center, 50),
            ElementId::RaceStage => cfg(true, 5, Center, 0),
            ElementId::RaceStart => cfg(true, 5, Center, 5),
            ElementId::RaceFinish => cfg(true, 5, Center, 20),
            ElementId::RaceStop => cfg(true, 5, Center, 0),
            ElementId::PilotDone => cfg(true, 5, Center, 20),
            ElementId::CurrentLap => cfg(true, 0, Left, 0),
            ElementId::RecentLaps => cfg(false, 11, Left, 5),
            ElementId::Results => cfg(false, 13, Center, 0),
            ElementId::LapTimes => cfg(true, 14, Center, 150),
            ElementId::LapResults => cfg(true, 15, Center, 40),
        }
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Default depth of the rolling recent-laps list.
pub const DEFAULT_RECENT_LAPS: u8 = 3;

/// Fully-resolved configuration of one OSD element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementConfig {
    /// Whether the element is drawn at all.
    pub enabled: bool,
    /// Base screen row (multi-row elements grow downward from here).
    pub row: u8,
    /// Horizontal alignment.
    pub alignment: Alignment,
    /// Explicit start column; `None` defers to the alignment.
    pub custom_col: Option<u8>,
    /// Whether the element auto-clears after `uptime`.
    pub is_timed: bool,
    /// Display duration for timed elements, in deciseconds.
    pub uptime: u16,
    /// Depth of the recent-laps list; ignored by other elements.
    pub num_laps: u8,
}

/// Sparse per-pilot override of an [`ElementConfig`].
///
/// This is the wire shape inside the pilot attribute payload: every field is
/// optional, and only present fields shadow the global value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ElementOverride {
    pub enabled: Option<bool>,
    pub row: Option<u8>,
    pub alignment: Option<Alignment>,
    pub custom_col: Option<u8>,
    pub is_timed: Option<bool>,
    pub uptime: Option<u16>,
    pub num_laps: Option<u8>,
}

impl ElementOverride {
    /// Clamp stored values onto the grid and normalize legacy sentinels.
    ///
    /// A stored `custom_col` of exactly zero meant "unset" in the legacy
    /// payloads, so zero folds to `None` here; the alignment-based default
    /// then applies. `num_laps` of zero would render nothing and is lifted
    /// to one.
    pub fn normalize(mut self) -> Self {
        self.row = self.row.map(clamp_row);
        self.custom_col = match self.custom_col {
            Some(0) | None => None,
            Some(col) => Some(clamp_col(col)),
        };
        self.num_laps = self.num_laps.map(|n| n.max(1));
        self
    }

    /// Apply this override on top of a base configuration, field by field.
    pub fn apply(&self, base: &ElementConfig) -> ElementConfig {
        ElementConfig {
            enabled: self.enabled.unwrap_or(base.enabled),
            row: self.row.unwrap_or(base.row),
            alignment: self.alignment.unwrap_or(base.alignment),
            custom_col: self.custom_col.or(base.custom_col),
            is_timed: self.is_timed.unwrap_or(base.is_timed),
            uptime: self.uptime.unwrap_or(base.uptime),
            num_laps: self.num_laps.unwrap_or(base.num_laps),
        }
    }
}

/// Behavior switches that shape message content rather than placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BehaviorFlag {
    /// Include race position in the current-lap line.
    PositionMode,
    /// Show gap-to-next instead of lap/total times in lap results.
    GapMode,
    /// Append `| ROUND n` to the heat name.
    RoundNum,
}

impl BehaviorFlag {
    pub const ALL: [BehaviorFlag; 3] = [
        BehaviorFlag::PositionMode,
        BehaviorFlag::GapMode,
        BehaviorFlag::RoundNum,
    ];

    /// Stable string key used in stored payloads and option names.
    pub fn key(&self) -> &'static str {
        match self {
            BehaviorFlag::PositionMode => "position_mode",
            BehaviorFlag::GapMode => "gap_mode",
            BehaviorFlag::RoundNum => "round_num",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.key() == key)
    }
}

/// Operator-editable message templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageTemplate {
    RaceStage,
    RaceStart,
    RaceFinish,
    RaceStop,
    PilotDone,
    Leader,
}

impl MessageTemplate {
    pub const ALL: [MessageTemplate; 6] = [
        MessageTemplate::RaceStage,
        MessageTemplate::RaceStart,
        MessageTemplate::RaceFinish,
        MessageTemplate::RaceStop,
        MessageTemplate::PilotDone,
        MessageTemplate::Leader,
    ];

    /// Stable string key used in stored payloads and option names.
    pub fn key(&self) -> &'static str {
        match self {
            MessageTemplate::RaceStage => "race_stage_message",
            MessageTemplate::RaceStart => "race_start_message",
            MessageTemplate::RaceFinish => "race_finish_message",
            MessageTemplate::RaceStop => "race_stop_message",
            MessageTemplate::PilotDone => "pilot_done_message",
            MessageTemplate::Leader => "leader_message",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.key() == key)
    }

    /// Built-in template text. Lowercase letters are color codes.
    pub fn default_text(&self) -> &'static str {
        match self {
            MessageTemplate::RaceStage => "w ARM NOW x",
            MessageTemplate::RaceStart => "w   GO!   x",
            MessageTemplate::RaceFinish => "w FINISH LAP! x",
            MessageTemplate::RaceStop => "w  LAND NOW!  x",
            MessageTemplate::PilotDone => "w FINISHED! x",
            MessageTemplate::Leader => "RACE LEADER",
        }
    }
}
