//! Integration tests for the OSD engine.
//!
//! These tests verify the complete flow including:
//! - session settings → stage/start/lap/done handlers → transport output
//! - per-pilot overrides changing placement for one pilot only
//! - timed expiry with a real clock driving `poll()`
//! - race reset leaving no live state behind
//!
//! Run with: `cargo test --test engine_integration`

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use raceosd::config::{ElementId, MemoryStore, SessionSettings, OSD_CONFIG_ATTRIBUTE};
use raceosd::engine::{
    HeatContext, LapRecord, LapResultContext, OsdEngine, PilotResult, RecordingTransport,
    TransportEvent, WinCondition,
};
use raceosd::scheduler::DisplayState;
use raceosd::PilotId;

// ============================================================================
// Helper Functions
// ============================================================================

const P1: PilotId = PilotId(1);
const P2: PilotId = PilotId(2);

fn secs(s: f64) -> Duration {
    Duration::from_secs_f64(s)
}

/// A store with a 3-second minimum lap time and two seated pilots.
fn base_store() -> MemoryStore {
    let mut store = MemoryStore::new();
    store.set_option("min_lap_sec", "3");
    store
}

fn engine_from(store: &MemoryStore) -> (OsdEngine, Arc<RecordingTransport>) {
    let transport = Arc::new(RecordingTransport::new());
    let settings = SessionSettings::load(store, &[P1, P2]);
    (OsdEngine::new(settings, transport.clone()), transport)
}

fn crossing(pilot: PilotId, index: u32, duration: f64) -> LapRecord {
    LapRecord {
        pilot,
        lap_index: index,
        raw_duration: secs(duration),
        is_holeshot: index == 0,
    }
}

fn texts_for(transport: &RecordingTransport, pilot: PilotId) -> Vec<String> {
    transport
        .lines()
        .into_iter()
        .filter(|(p, _)| *p == pilot)
        .map(|(_, line)| line.text)
        .collect()
}

// ============================================================================
// Integration Tests
// ============================================================================

/// Staging shows the message to every pilot, honoring a per-pilot position
/// override for exactly the pilot who set it.
#[test]
fn test_stage_with_per_pilot_override() {
    let mut store = base_store();
    store.set_pilot_attribute(
        P2,
        OSD_CONFIG_ATTRIBUTE,
        r#"{"use_global": false, "race_stage": {"row": 12, "alignment": "left"}}"#,
    );
    let (engine, transport) = engine_from(&store);

    engine.on_race_stage(&HeatContext::default());

    let placements: Vec<(PilotId, u8, u8)> = transport
        .lines()
        .into_iter()
        .map(|(pilot, line)| (pilot, line.row, line.col))
        .collect();
    // P1 inherits global: row 5, centered. P2 overrode both.
    assert!(placements.contains(&(P1, 5, 21)));
    assert!(placements.contains(&(P2, 12, 0)));
}

/// The full lap-filter contract over a live engine: short laps carry, the
/// aggregate lap displays once, and the counter increments exactly once.
#[test]
fn test_lap_aggregation_end_to_end() {
    let (engine, transport) = engine_from(&base_store());
    let ctx = LapResultContext {
        total_time: secs(6.5),
        ..Default::default()
    };

    engine.on_lap_recorded(&crossing(P1, 1, 1.0), &ctx);
    engine.on_lap_recorded(&crossing(P1, 2, 1.5), &ctx);
    transport.take();
    engine.on_lap_recorded(&crossing(P1, 3, 4.0), &ctx);

    let texts = texts_for(&transport, P1);
    assert!(texts.contains(&"LAP: 1".to_string()));
    assert!(texts.contains(&"x 0:06.5 | 0:06.5 w".to_string()));
}

/// The rolling recent-laps element tracks the newest laps, newest on top,
/// and evicts beyond its configured depth.
#[test]
fn test_recent_laps_rolling_window() {
    let mut store = base_store();
    store.set_option("_recent_laps_enabled", "1");
    store.set_option("_recent_laps_num_laps", "2");
    let (engine, transport) = engine_from(&store);
    let ctx = LapResultContext::default();

    for (index, duration) in [45.01, 44.23, 43.56].iter().enumerate() {
        engine.on_lap_recorded(&crossing(P1, index as u32, *duration), &ctx);
    }

    let recent: Vec<(u8, String)> = transport
        .lines()
        .into_iter()
        .filter(|(p, line)| *p == P1 && (11..=12).contains(&line.row))
        .map(|(_, line)| (line.row, line.text))
        .collect();
    let last_two = &recent[recent.len() - 2..];
    assert_eq!(last_two[0], (11, "L2:43.56".to_string()));
    assert_eq!(last_two[1], (12, "L1:44.23".to_string()));
}

/// Timed elements really expire on the wall clock, within sub-second
/// tolerance, and a reshow restarts the timer.
#[test]
fn test_timed_expiry_with_real_clock() {
    let mut store = base_store();
    // 3 deciseconds: long enough to observe, short enough to test.
    store.set_option("_announcement_uptime", "3");
    let (engine, _transport) = engine_from(&store);

    engine.on_message("stand by");
    assert_eq!(
        engine.scheduler().state(P1, ElementId::Announcement),
        DisplayState::TimedOn
    );

    // Well before expiry: still on.
    thread::sleep(Duration::from_millis(150));
    engine.poll();
    assert_eq!(
        engine.scheduler().state(P1, ElementId::Announcement),
        DisplayState::TimedOn
    );

    // A reshow restarts the clock from now.
    engine.on_message("stand by again");
    thread::sleep(Duration::from_millis(200));
    engine.poll();
    assert_eq!(
        engine.scheduler().state(P1, ElementId::Announcement),
        DisplayState::TimedOn
    );

    thread::sleep(Duration::from_millis(150));
    engine.poll();
    assert_eq!(
        engine.scheduler().state(P1, ElementId::Announcement),
        DisplayState::Off
    );
}

/// Expired displays wipe exactly the rows they occupied.
#[test]
fn test_expiry_clears_occupied_rows() {
    let mut store = base_store();
    store.set_option("_announcement_uptime", "1");
    store.set_option("_announcement_row", "7");
    let (engine, transport) = engine_from(&store);

    engine.on_message("gone soon");
    transport.take();

    thread::sleep(Duration::from_millis(150));
    engine.poll();

    let events = transport.events();
    assert!(events
        .iter()
        .any(|e| matches!(e, TransportEvent::ClearRow { pilot, row } if *pilot == P1 && *row == 7)));
    assert!(events
        .iter()
        .any(|e| matches!(e, TransportEvent::Display { pilot } if *pilot == P2)));
}

/// A finished pilot gets the done message and their persistent results,
/// while the other pilot's displays are untouched.
#[test]
fn test_pilot_done_is_per_pilot() {
    let mut store = base_store();
    store.set_option("_results_enabled", "1");
    let (engine, transport) = engine_from(&store);
    let ctx = LapResultContext::default();

    engine.on_race_stage(&HeatContext::default());
    engine.on_lap_recorded(&crossing(P1, 0, 45.0), &ctx);
    engine.on_lap_recorded(&crossing(P1, 1, 42.5), &ctx);
    transport.take();

    engine.on_pilot_done(&PilotResult {
        pilot: P1,
        position: 1,
        laps_completed: 2,
        total_time: secs(87.5),
        fastest_lap: Some(secs(42.5)),
        consecutives: None,
        win_condition: WinCondition::MostLaps,
    });

    let texts = texts_for(&transport, P1);
    assert!(texts.contains(&"w FINISHED! x".to_string()));
    assert!(texts.contains(&"PLACEMENT: 1".to_string()));
    assert!(texts.contains(&"LAPS COMPLETED: 2".to_string()));
    assert!(texts.contains(&"HS: 0:45.0".to_string()));
    assert!(texts.contains(&"L1: 0:42.5".to_string()));

    assert_eq!(
        engine.scheduler().state(P1, ElementId::Results),
        DisplayState::StaticOn
    );
    // P2 is still racing: staging message untouched.
    assert_eq!(
        engine.scheduler().state(P2, ElementId::RaceStage),
        DisplayState::StaticOn
    );
    assert!(texts_for(&transport, P2).is_empty());
}

/// Race reset drops every live display and every piece of lap state for
/// every pilot, and wipes every screen.
#[test]
fn test_reset_is_total() {
    let (engine, transport) = engine_from(&base_store());
    let ctx = LapResultContext::default();

    engine.on_race_stage(&HeatContext {
        heat_name: Some("Heat 1".into()),
        ..Default::default()
    });
    engine.on_race_start();
    engine.on_lap_recorded(&crossing(P1, 0, 45.0), &ctx);
    engine.on_lap_recorded(&crossing(P2, 0, 44.0), &ctx);
    engine.on_message("mid race note");
    transport.take();

    engine.reset();

    assert_eq!(engine.scheduler().live_count(), 0);
    for pilot in [P1, P2] {
        for element in ElementId::ALL {
            assert_eq!(engine.scheduler().state(pilot, element), DisplayState::Off);
        }
    }

    let wipes = transport
        .events()
        .iter()
        .filter(|e| matches!(e, TransportEvent::ClearScreen { .. }))
        .count();
    assert_eq!(wipes, 2);

    // Lap state restarted: the next crossing is a fresh lap 1.
    transport.take();
    engine.on_lap_recorded(&crossing(P1, 1, 40.0), &LapResultContext::default());
    let texts = texts_for(&transport, P1);
    assert!(texts.contains(&"LAP: 1".to_string()));
}

/// An inactive pilot receives nothing, for any event.
#[test]
fn test_inactive_pilot_gets_no_output() {
    let mut store = base_store();
    store.set_pilot_attribute(P2, "osd_active", "0");
    let (engine, transport) = engine_from(&store);

    engine.on_race_stage(&HeatContext::default());
    engine.on_message("hello");
    engine.on_lap_recorded(&crossing(P2, 0, 45.0), &LapResultContext::default());

    assert!(texts_for(&transport, P2).is_empty());
    assert!(!texts_for(&transport, P1).is_empty());
}
