//! Message formatting.
//!
//! Pure text builders shared by the live handlers and the preview
//! interface. Lowercase letters in the output are color codes: `x` opens the
//! highlight, `w` closes it.

use std::time::Duration;

use crate::lap::timefmt;
use crate::lap::{LapLabel, RecentLap};

use super::context::{HeatContext, LapResultContext, PilotResult, WinCondition};

/// Wrap operator text for display: uppercased between color codes.
pub(crate) fn decorate(text: &str) -> String {
    format!("x {} w", text.to_uppercase())
}

/// Heat banner, optionally suffixed with the round number.
pub(crate) fn heat_line(heat: &HeatContext, with_round: bool) -> Option<String> {
    let name = heat.heat_name.as_deref()?;
    match (with_round, heat.round) {
        (true, Some(round)) => Some(format!("x {} | ROUND {} w", name.to_uppercase(), round)),
        _ => Some(format!("x {} w", name.to_uppercase())),
    }
}

/// Current-lap read-out.
pub(crate) fn current_lap_line(
    lap_count: u32,
    position: Option<u32>,
    position_mode: bool,
) -> String {
    match (position_mode, position) {
        (true, Some(position)) => format!("POSN: {} | LAP: {}", position, lap_count),
        _ => format!("LAP: {}", lap_count),
    }
}

/// The per-lap results line.
///
/// `last_lap` is the duration the lap filter decided to display (carry
/// included), so an aggregated lap shows its folded total. Which companion
/// value appears depends on the win condition and the gap-mode flag.
pub(crate) fn lap_result_line(
    last_lap: Duration,
    ctx: &LapResultContext,
    gap_mode: bool,
    leader_template: &str,
) -> String {
    // Consecutive-window formats read the same either way.
    if ctx.win_condition == WinCondition::FastestConsecutive {
        if let Some(consec) = &ctx.consecutives {
            return format!(
                "x {} | {}/{} w",
                timefmt::split(last_lap),
                consec.base,
                timefmt::split(consec.time)
            );
        }
    }

    if !gap_mode {
        if ctx.win_condition == WinCondition::FastestLap && ctx.is_best_lap {
            return format!("x BEST LAP | {} w", timefmt::split(last_lap));
        }
        return format!(
            "x {} | {} w",
            timefmt::split(last_lap),
            timefmt::split(ctx.total_time)
        );
    }

    if let Some(next) = &ctx.next_rank {
        return format!(
            "x {} | +{} w",
            next.callsign.to_uppercase(),
            timefmt::split(next.diff)
        );
    }
    if ctx.win_condition == WinCondition::FastestLap && !ctx.is_best_lap {
        if let Some(first) = &ctx.first_rank {
            return format!(
                "x {} | +{} w",
                first.callsign.to_uppercase(),
                timefmt::split(first.diff)
            );
        }
    }
    // Nobody ahead: this pilot leads.
    format!("x {} | {} w", leader_template, timefmt::split(last_lap))
}

/// Placement row of the results element.
pub(crate) fn placement_line(position: u32) -> String {
    format!("PLACEMENT: {}", position)
}

/// Win-condition row of the results element.
pub(crate) fn win_line(result: &PilotResult) -> String {
    match result.win_condition {
        WinCondition::FastestConsecutive => match &result.consecutives {
            Some(consec) => format!(
                "FASTEST {} CONSEC: {}",
                consec.base,
                timefmt::split(consec.time)
            ),
            None => format!("LAPS COMPLETED: {}", result.laps_completed),
        },
        WinCondition::FastestLap => match result.fastest_lap {
            Some(fastest) => format!("FASTEST LAP: {}", timefmt::split(fastest)),
            None => format!("LAPS COMPLETED: {}", result.laps_completed),
        },
        WinCondition::FirstToLapX => {
            format!("TOTAL TIME: {}", timefmt::split(result.total_time))
        }
        WinCondition::MostLaps => format!("LAPS COMPLETED: {}", result.laps_completed),
    }
}

/// Rows of the post-race lap-time list: `HS: 0:45.2`, `L1: 0:46.1`, …
pub(crate) fn lap_time_rows(laps: &[(LapLabel, Duration)], max: usize) -> Vec<String> {
    laps.iter()
        .take(max)
        .map(|(label, duration)| format!("{}: {}", label, timefmt::split(*duration)))
        .collect()
}

/// Rows of the rolling recent-laps element: `L3:42.90`, newest first.
pub(crate) fn recent_rows(snapshot: &[RecentLap]) -> Vec<String> {
    snapshot
        .iter()
        .map(|lap| format!("{}:{}", lap.label, timefmt::seconds(lap.duration)))
        .collect()
}
