//! `raceosd simulate`: run a scripted demo race against live timers.
//!
//! Drives the engine through a full race lifecycle (stage → start → laps →
//! finish → pilot done → reset) with the terminal standing in for the
//! video-link hardware, while a background task polls timed expiry the way
//! the production timer would.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use tracing::info;

use raceosd::config::{load_settings_file, SessionSettings, CALLSIGN_ATTRIBUTE};
use raceosd::engine::{
    HeatContext, LapRecord, LapResultContext, OsdEngine, PilotResult, WinCondition,
};
use raceosd::PilotId;

use crate::error::CliError;
use crate::render::TermTransport;

/// Arguments for the simulate command.
#[derive(Debug, Args)]
pub struct SimulateArgs {
    /// Settings file (JSON: options + pilots)
    pub settings: PathBuf,

    /// Full laps to fly per pilot
    #[arg(long, default_value_t = 3)]
    pub laps: u32,

    /// Time compression: 10 means a 45s lap passes in 4.5s
    #[arg(long, default_value_t = 10.0)]
    pub speedup: f64,
}

/// Scripted lap durations, cycled per pilot with a per-seat offset so the
/// field spreads out.
const LAP_SECONDS: [f64; 6] = [44.2, 43.1, 45.0, 42.7, 43.8, 44.5];
const HOLESHOT_SECONDS: f64 = 2.4;

pub async fn run(args: SimulateArgs) -> Result<(), CliError> {
    let speedup = if args.speedup > 0.0 { args.speedup } else { 1.0 };
    let (store, seated) = load_settings_file(&args.settings)?;

    use raceosd::config::AttributeStore;
    let mut callsigns = HashMap::new();
    for &pilot in &seated {
        if let Some(callsign) = store.pilot_attribute(pilot, CALLSIGN_ATTRIBUTE) {
            callsigns.insert(pilot, callsign);
        }
    }

    let transport = Arc::new(TermTransport::new(callsigns, false));
    let settings = SessionSettings::load(&store, &seated);
    let engine = Arc::new(OsdEngine::new(settings, transport));
    let roster: Vec<PilotId> = engine.resolver().roster().to_vec();
    if roster.is_empty() {
        return Err(CliError::Usage(
            "settings file seats no active pilots".to_string(),
        ));
    }

    // Expiry ticks at 100ms, like the production render timer.
    let poller = {
        let engine = engine.clone();
        tokio::spawn(async move {
            let mut tick = tokio::time::interval(Duration::from_millis(100));
            loop {
                tick.tick().await;
                engine.poll();
            }
        })
    };

    let pause = |seconds: f64| tokio::time::sleep(Duration::from_secs_f64(seconds / speedup));

    info!(pilots = roster.len(), laps = args.laps, "simulation starting");
    engine.on_race_stage(&HeatContext {
        heat_name: Some("Heat 1".into()),
        class_name: Some("Open Class".into()),
        event_name: Some("Demo Race".into()),
        round: Some(1),
    });
    pause(3.0).await;

    engine.on_race_start();
    pause(1.0).await;

    let mut totals: HashMap<PilotId, Duration> = HashMap::new();
    let mut crossings = 0u32;
    for (seat, &pilot) in roster.iter().enumerate() {
        let duration = HOLESHOT_SECONDS + seat as f64 * 0.3;
        record_crossing(&engine, pilot, crossings, duration, &mut totals);
        crossings += 1;
        pause(0.5).await;
    }

    for lap in 0..args.laps {
        for (seat, &pilot) in roster.iter().enumerate() {
            let base = LAP_SECONDS[(lap as usize + seat) % LAP_SECONDS.len()];
            let duration = base + seat as f64 * 0.4;
            pause(duration / roster.len() as f64).await;
            record_crossing(&engine, pilot, crossings, duration, &mut totals);
            crossings += 1;
        }
    }

    engine.on_race_finish();
    pause(2.0).await;

    let mut standings: Vec<(PilotId, Duration)> = totals.iter().map(|(p, t)| (*p, *t)).collect();
    standings.sort_by_key(|(_, total)| *total);
    for (index, (pilot, total)) in standings.iter().enumerate() {
        engine.on_pilot_done(&PilotResult {
            pilot: *pilot,
            position: index as u32 + 1,
            laps_completed: args.laps + 1,
            total_time: *total,
            fastest_lap: Some(Duration::from_secs_f64(
                LAP_SECONDS.iter().copied().fold(f64::MAX, f64::min),
            )),
            consecutives: None,
            win_condition: WinCondition::MostLaps,
        });
        pause(1.0).await;
    }

    pause(3.0).await;
    engine.on_message("Next heat in 5 minutes");
    pause(3.0).await;

    engine.reset();
    info!("simulation complete");
    poller.abort();
    Ok(())
}

/// Feed one crossing with a standings context derived from the running
/// totals. A pilot's first crossing is their holeshot.
fn record_crossing(
    engine: &OsdEngine,
    pilot: PilotId,
    index: u32,
    seconds: f64,
    totals: &mut HashMap<PilotId, Duration>,
) {
    let duration = Duration::from_secs_f64(seconds);
    let is_holeshot = !totals.contains_key(&pilot);
    let total = totals.get(&pilot).copied().unwrap_or_default() + duration;
    totals.insert(pilot, total);

    let ahead = totals.values().filter(|t| **t < total).count();
    engine.on_lap_recorded(
        &LapRecord {
            pilot,
            lap_index: index,
            raw_duration: duration,
            is_holeshot,
        },
        &LapResultContext {
            position: Some(ahead as u32 + 1),
            total_time: total,
            ..Default::default()
        },
    );
}
