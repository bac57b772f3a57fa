//! `raceosd preview`: render element previews from a settings file.

use std::collections::HashMap;
use std::path::PathBuf;

use clap::Args;

use raceosd::config::{
    load_settings_file, ElementId, SessionSettings, CALLSIGN_ATTRIBUTE,
};
use raceosd::engine::{all_previews, element_preview, ElementPreview};
use raceosd::scheduler::DisplayTiming;
use raceosd::{LayoutResolver, PilotId};

use crate::error::CliError;
use crate::render::ScreenBuffer;

/// Arguments for the preview command.
#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// Settings file (JSON: options + pilots)
    pub settings: PathBuf,

    /// Preview a single pilot id (default: every seated pilot)
    #[arg(long)]
    pub pilot: Option<u32>,

    /// Preview a single element (e.g. race_stage, recent_laps)
    #[arg(long)]
    pub element: Option<String>,

    /// Also draw each pilot's screen with the enabled elements composited
    #[arg(long)]
    pub grid: bool,
}

pub fn run(args: PreviewArgs) -> Result<(), CliError> {
    let (store, seated) = load_settings_file(&args.settings)?;
    let settings = SessionSettings::load(&store, &seated);
    let resolver = LayoutResolver::new(settings);

    let element = match args.element.as_deref() {
        Some(key) => Some(ElementId::from_key(key).ok_or_else(|| {
            CliError::Usage(format!(
                "unknown element '{}'; known: {}",
                key,
                ElementId::ALL.map(|id| id.key()).join(", ")
            ))
        })?),
        None => None,
    };

    let pilots: Vec<PilotId> = match args.pilot {
        Some(id) => vec![PilotId(id)],
        None => resolver.roster().to_vec(),
    };
    if pilots.is_empty() {
        return Err(CliError::Usage(
            "settings file seats no active pilots".to_string(),
        ));
    }

    let mut callsigns = HashMap::new();
    for &pilot in &pilots {
        if let Some(callsign) = store_callsign(&store, pilot) {
            callsigns.insert(pilot, callsign);
        }
    }

    for &pilot in &pilots {
        let title = callsigns
            .get(&pilot)
            .cloned()
            .unwrap_or_else(|| pilot.to_string());
        println!("== {} ==", title);

        let previews = match element {
            Some(element) => vec![element_preview(&resolver, pilot, element)],
            None => all_previews(&resolver, pilot),
        };
        for preview in &previews {
            print_preview(preview);
        }

        if args.grid {
            let mut buffer = ScreenBuffer::default();
            for preview in previews.iter().filter(|p| p.enabled) {
                for line in &preview.lines {
                    buffer.put(line);
                }
            }
            println!("{}", buffer.render(&title));
        }
        println!();
    }

    Ok(())
}

fn store_callsign(store: &raceosd::config::MemoryStore, pilot: PilotId) -> Option<String> {
    use raceosd::config::AttributeStore;
    store.pilot_attribute(pilot, CALLSIGN_ATTRIBUTE)
}

fn print_preview(preview: &ElementPreview) {
    let timing = match preview.timing {
        DisplayTiming::Static => "static".to_string(),
        DisplayTiming::Timed { uptime } => format!("timed {:.1}s", f64::from(uptime) / 10.0),
    };
    let state = if preview.enabled { "" } else { " (disabled)" };
    println!("{:>12} [{}]{}", preview.element.key(), timing, state);
    for line in &preview.lines {
        println!("    row {:2} col {:2}  {}", line.row, line.col, line.text);
    }
}
