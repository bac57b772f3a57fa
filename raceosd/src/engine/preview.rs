//! Element preview.
//!
//! The configuration editor needs to show operators what an element will
//! look like without waiting for a live race. [`element_preview`] runs the
//! exact formatting and layout code the handlers use, over fixed sample
//! data, and mutates nothing: the result is the same `(lines, timing)` a
//! race event would produce for the pilot's resolved settings.

use std::time::Duration;

use crate::config::{BehaviorFlag, ElementId, LayoutResolver, MessageTemplate, PilotId};
use crate::lap::{timefmt, LapLabel};
use crate::scheduler::{DisplayTiming, TextLine};
use crate::screen;

use super::context::HeatContext;
use super::format;

/// What one element would render as, for a given pilot's settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementPreview {
    pub element: ElementId,
    /// Whether a live event would actually draw this element.
    pub enabled: bool,
    pub timing: DisplayTiming,
    pub lines: Vec<TextLine>,
}

/// Render sample content for every element, pilot-resolved.
pub fn all_previews(resolver: &LayoutResolver, pilot: PilotId) -> Vec<ElementPreview> {
    ElementId::ALL
        .iter()
        .map(|&element| element_preview(resolver, pilot, element))
        .collect()
}

/// Render sample content for one element, pilot-resolved.
///
/// Disabled elements still produce a preview (flagged `enabled: false`) so
/// the editor can show where they would land.
pub fn element_preview(
    resolver: &LayoutResolver,
    pilot: PilotId,
    element: ElementId,
) -> ElementPreview {
    let config = resolver.element(pilot, element);

    let texts: Vec<String> = match element {
        ElementId::HeatName => {
            let heat = HeatContext {
                heat_name: Some("Heat 1".into()),
                round: Some(2),
                ..Default::default()
            };
            let with_round = resolver.flag(pilot, BehaviorFlag::RoundNum);
            vec![format::heat_line(&heat, with_round).unwrap_or_default()]
        }
        ElementId::ClassName => vec![format::decorate("Open Class")],
        ElementId::EventName => vec![format::decorate("MultiGP Race 2025")],
        ElementId::Announcement => vec![format::decorate("Next race in 5 minutes")],
        ElementId::RaceStage => {
            vec![resolver.template(pilot, MessageTemplate::RaceStage).to_string()]
        }
        ElementId::RaceStart => {
            vec![resolver.template(pilot, MessageTemplate::RaceStart).to_string()]
        }
        ElementId::RaceFinish => {
            vec![resolver.template(pilot, MessageTemplate::RaceFinish).to_string()]
        }
        ElementId::RaceStop => {
            vec![resolver.template(pilot, MessageTemplate::RaceStop).to_string()]
        }
        ElementId::PilotDone => {
            vec![resolver.template(pilot, MessageTemplate::PilotDone).to_string()]
        }
        ElementId::CurrentLap => {
            let position_mode = resolver.flag(pilot, BehaviorFlag::PositionMode);
            vec![format::current_lap_line(4, Some(2), position_mode)]
        }
        ElementId::LapResults => vec![format!(
            "x {} | {} w",
            timefmt::split(Duration::from_millis(42_500)),
            timefmt::split(Duration::from_millis(225_200))
        )],
        ElementId::Results => vec![
            format::placement_line(2),
            format!("TOTAL TIME: {}", timefmt::split(Duration::from_millis(225_200))),
        ],
        ElementId::LapTimes => vec![
            format!("HS: {}", timefmt::split(Duration::from_millis(45_200))),
            format!("L1: {}", timefmt::split(Duration::from_millis(46_100))),
            format!("L2: {}", timefmt::split(Duration::from_millis(44_500))),
        ],
        ElementId::RecentLaps => sample_recent_rows(config.num_laps),
    };

    let lines = texts
        .iter()
        .enumerate()
        .map(|(offset, text)| {
            let text = screen::clip(text);
            let row = screen::clamp_row(config.row.saturating_add(offset as u8));
            let col = screen::column(config.alignment, config.custom_col, text);
            TextLine::new(row, col, text)
        })
        .collect();

    ElementPreview {
        element,
        enabled: config.enabled,
        timing: DisplayTiming::from_element(&config),
        lines,
    }
}

/// Plausible rolling lap times, newest first, one per configured row.
fn sample_recent_rows(num_laps: u8) -> Vec<String> {
    (0..num_laps)
        .map(|i| {
            let duration = Duration::from_millis(42_900 + u64::from(i) * 890);
            let label = if i + 1 == num_laps && num_laps > 1 {
                LapLabel::Holeshot
            } else {
                LapLabel::Lap(u32::from(num_laps - 1 - i).max(1))
            };
            format!("{}:{}", label, timefmt::seconds(duration))
        })
        .collect()
}
