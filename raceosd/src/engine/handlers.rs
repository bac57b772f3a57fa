//! The OSD engine and its race-event handlers.

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::{BehaviorFlag, ElementId, LayoutResolver, MessageTemplate, PilotId, SessionSettings};
use crate::lap::{LapFilter, LapHistory, LapVerdict, RecentLapsTracker};
use crate::scheduler::{DisplayScheduler, DisplayTiming, TextLine};
use crate::screen;

use super::context::{HeatContext, LapRecord, LapResultContext, PilotResult};
use super::format;
use super::transport::OsdTransport;

/// Maximum lap-time rows on a race-stop screen.
const STOP_LAP_ROWS: usize = 10;

/// Maximum lap-time rows on a pilot-done screen, which shares space with
/// the results element.
const DONE_LAP_ROWS: usize = 5;

/// The settings-resolution and timed-display engine for one race session.
///
/// The race-lifecycle source calls the `on_*` handlers serially as events
/// occur and drives [`poll`](OsdEngine::poll) from a timer. Each handler
/// resolves effective settings through the session snapshot, updates lap
/// state where the event carries timing, registers displays with the
/// scheduler, and stages the rendered lines on the transport.
pub struct OsdEngine {
    resolver: LayoutResolver,
    filter: LapFilter,
    history: LapHistory,
    recent: RecentLapsTracker,
    scheduler: DisplayScheduler,
    transport: Arc<dyn OsdTransport>,
}

impl OsdEngine {
    /// Build an engine for one race session.
    pub fn new(settings: SessionSettings, transport: Arc<dyn OsdTransport>) -> Self {
        let min_lap_time = settings.global.min_lap_time;
        info!(
            pilots = settings.roster().len(),
            min_lap = ?min_lap_time,
            "OSD engine ready"
        );
        Self {
            resolver: LayoutResolver::new(settings),
            filter: LapFilter::new(min_lap_time),
            history: LapHistory::new(),
            recent: RecentLapsTracker::new(),
            scheduler: DisplayScheduler::new(),
            transport,
        }
    }

    /// The session's settings resolver.
    pub fn resolver(&self) -> &LayoutResolver {
        &self.resolver
    }

    /// The display scheduler (visibility queries, mainly for tests and
    /// dashboards).
    pub fn scheduler(&self) -> &DisplayScheduler {
        &self.scheduler
    }

    /// Heat is staged: staging message plus the enabled name banners.
    pub fn on_race_stage(&self, heat: &HeatContext) {
        info!(heat = heat.heat_name.as_deref().unwrap_or("-"), "race staged");
        for &pilot in self.resolver.roster() {
            let stage_text = self.resolver.template(pilot, MessageTemplate::RaceStage).to_string();
            self.show_element(pilot, ElementId::RaceStage, &[stage_text]);

            let with_round = self.resolver.flag(pilot, BehaviorFlag::RoundNum);
            if let Some(line) = format::heat_line(heat, with_round) {
                self.show_element(pilot, ElementId::HeatName, &[line]);
            }
            if let Some(class) = heat.class_name.as_deref() {
                self.show_element(pilot, ElementId::ClassName, &[format::decorate(class)]);
            }
            if let Some(event) = heat.event_name.as_deref() {
                self.show_element(pilot, ElementId::EventName, &[format::decorate(event)]);
            }
        }
    }

    /// Race start: staging text is superseded wholesale, then the start
    /// flash goes up.
    pub fn on_race_start(&self) {
        info!("race started");
        for &pilot in self.resolver.roster() {
            self.wipe_pilot(pilot);
            let text = self.resolver.template(pilot, MessageTemplate::RaceStart).to_string();
            self.show_element(pilot, ElementId::RaceStart, &[text]);
        }
    }

    /// A gate crossing was recorded for one pilot.
    pub fn on_lap_recorded(&self, record: &LapRecord, ctx: &LapResultContext) {
        let pilot = record.pilot;
        if !self.resolver.roster().contains(&pilot) {
            return;
        }

        let verdict = self
            .filter
            .record(pilot, record.raw_duration, record.is_holeshot);

        if let LapVerdict::Counted { display, label } = verdict {
            self.history.push(pilot, label, display);
            let capacity = self.resolver.element(pilot, ElementId::RecentLaps).num_laps;
            self.recent.push(pilot, label, display, capacity as usize);
        }

        // Lap counter updates on every crossing, carries included: the
        // aggregated count is what changes (or doesn't).
        let count = self.filter.displayed_lap_count(pilot);
        let position_mode = self.resolver.flag(pilot, BehaviorFlag::PositionMode);
        let counter = format::current_lap_line(count, ctx.position, position_mode);
        self.show_element(pilot, ElementId::CurrentLap, &[counter]);

        let LapVerdict::Counted { display, label } = verdict else {
            debug!(%pilot, "crossing carried, no results update");
            return;
        };

        // Holeshots update the counter and the rolling list but are not a
        // full lap, so no results line yet.
        if !matches!(label, crate::lap::LapLabel::Holeshot) {
            let gap_mode = self.resolver.flag(pilot, BehaviorFlag::GapMode);
            let leader = self.resolver.template(pilot, MessageTemplate::Leader).to_string();
            let line = format::lap_result_line(display, ctx, gap_mode, &leader);
            self.show_element(pilot, ElementId::LapResults, &[line]);
        }

        let recent_cfg = self.resolver.element(pilot, ElementId::RecentLaps);
        if recent_cfg.enabled {
            let snapshot = self.recent.snapshot(pilot, recent_cfg.num_laps as usize);
            let rows = format::recent_rows(&snapshot);
            if !rows.is_empty() {
                self.show_element(pilot, ElementId::RecentLaps, &rows);
            }
        }
    }

    /// Race time expired: the finish message replaces any staging/start
    /// message still showing.
    pub fn on_race_finish(&self) {
        info!("race finished");
        for &pilot in self.resolver.roster() {
            self.clear_element(pilot, ElementId::RaceStage);
            self.clear_element(pilot, ElementId::RaceStart);
            let text = self.resolver.template(pilot, MessageTemplate::RaceFinish).to_string();
            self.show_element(pilot, ElementId::RaceFinish, &[text]);
        }
    }

    /// Race stopped: stop message plus the lap-time list.
    pub fn on_race_stop(&self) {
        info!("race stopped");
        for &pilot in self.resolver.roster() {
            let text = self.resolver.template(pilot, MessageTemplate::RaceStop).to_string();
            self.show_element(pilot, ElementId::RaceStop, &[text]);

            let laps = self.history.laps(pilot);
            let mut rows = format::lap_time_rows(&laps, STOP_LAP_ROWS);
            if rows.is_empty() {
                rows.push("NO LAPS RECORDED".to_string());
            }
            self.show_element(pilot, ElementId::LapTimes, &rows);
        }
    }

    /// One pilot completed the race.
    pub fn on_pilot_done(&self, result: &PilotResult) {
        let pilot = result.pilot;
        if !self.resolver.roster().contains(&pilot) {
            return;
        }
        info!(%pilot, position = result.position, "pilot done");

        // The done message supersedes whatever status/counter text is up.
        self.clear_element(pilot, ElementId::CurrentLap);
        self.clear_element(pilot, ElementId::RaceStage);
        self.clear_element(pilot, ElementId::RaceStart);
        self.clear_element(pilot, ElementId::RaceFinish);

        let text = self.resolver.template(pilot, MessageTemplate::PilotDone).to_string();
        self.show_element(pilot, ElementId::PilotDone, &[text]);

        // Result rows stay up until the next reset, whatever the element's
        // timed setting says: the pilot is hovering and reading them.
        let results_rows = vec![format::placement_line(result.position), format::win_line(result)];
        self.show_element_as(
            pilot,
            ElementId::Results,
            &results_rows,
            Some(DisplayTiming::Static),
        );

        let laps = self.history.laps(pilot);
        let rows = format::lap_time_rows(&laps, DONE_LAP_ROWS);
        if !rows.is_empty() {
            self.show_element_as(
                pilot,
                ElementId::LapTimes,
                &rows,
                Some(DisplayTiming::Static),
            );
        }
    }

    /// Operator broadcast to every active pilot.
    pub fn on_message(&self, text: &str) {
        info!(text, "broadcast message");
        let decorated = format::decorate(text);
        for &pilot in self.resolver.roster() {
            self.show_element(pilot, ElementId::Announcement, &[decorated.clone()]);
        }
    }

    /// Laps were cleared by the operator; equivalent to a race reset.
    pub fn on_laps_clear(&self) {
        self.reset();
    }

    /// Full reset: every display and every piece of lap state goes,
    /// atomically from the handlers' perspective, and every screen is wiped.
    pub fn reset(&self) {
        let drained = self.scheduler.drain_all();
        self.filter.reset();
        self.history.reset();
        self.recent.reset();
        info!(displays = drained.len(), "race reset");
        for &pilot in self.resolver.roster() {
            self.transport.clear_screen(pilot);
            self.transport.display(pilot);
        }
    }

    /// Remove expired timed displays and wipe their rows. Call from a timer
    /// at sub-second granularity.
    pub fn poll(&self) {
        for expired in self.scheduler.poll() {
            debug!(pilot = %expired.pilot, element = %expired.element, "clearing expired display");
            for line in &expired.lines {
                self.transport.clear_row(expired.pilot, line.row);
            }
            self.transport.display(expired.pilot);
        }
    }

    /// Resolve, lay out, schedule, and transmit one element. Returns false
    /// when the element is disabled for this pilot.
    fn show_element(&self, pilot: PilotId, element: ElementId, texts: &[String]) -> bool {
        self.show_element_as(pilot, element, texts, None)
    }

    fn show_element_as(
        &self,
        pilot: PilotId,
        element: ElementId,
        texts: &[String],
        timing_override: Option<DisplayTiming>,
    ) -> bool {
        let config = self.resolver.element(pilot, element);
        if !config.enabled {
            debug!(%pilot, %element, "element disabled, suppressed");
            return false;
        }

        let timing = timing_override.unwrap_or_else(|| DisplayTiming::from_element(&config));
        let lines: Vec<TextLine> = texts
            .iter()
            .enumerate()
            .map(|(offset, text)| {
                let text = screen::clip(text);
                let row = screen::clamp_row(config.row.saturating_add(offset as u8));
                let col = screen::column(config.alignment, config.custom_col, text);
                TextLine::new(row, col, text)
            })
            .collect();

        for line in &lines {
            self.transport.clear_row(pilot, line.row);
            self.transport.send_line(pilot, line);
        }
        self.transport.display(pilot);
        self.scheduler.show(pilot, element, lines, timing);
        true
    }

    /// Clear one element and wipe its rows, if it was showing.
    fn clear_element(&self, pilot: PilotId, element: ElementId) {
        if let Some(removed) = self.scheduler.clear(pilot, element) {
            for line in &removed.lines {
                self.transport.clear_row(pilot, line.row);
            }
            self.transport.display(pilot);
        }
    }

    /// Drop every display for one pilot and wipe the screen.
    fn wipe_pilot(&self, pilot: PilotId) {
        self.scheduler.drain_pilot(pilot);
        self.transport.clear_screen(pilot);
        self.transport.display(pilot);
    }
}
