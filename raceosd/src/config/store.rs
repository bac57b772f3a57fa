//! Attribute store seam.
//!
//! Configuration persistence is external: the race controller keeps options
//! and per-pilot attributes in an opaque key-value store. The engine only
//! ever reads through [`AttributeStore`], and only during session load.
//! [`MemoryStore`] backs tests and the CLI, which can populate one from a
//! JSON settings file.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use super::pilot::{OSD_ACTIVE_ATTRIBUTE, OSD_CONFIG_ATTRIBUTE};
use super::PilotId;

/// Attribute-store key for a pilot's display callsign.
pub const CALLSIGN_ATTRIBUTE: &str = "callsign";

/// Read access to the external key-value store.
///
/// Implementations must be cheap to call; the engine reads every key it
/// needs once, at race-session start.
pub trait AttributeStore: Send + Sync {
    /// A per-pilot attribute value.
    fn pilot_attribute(&self, pilot: PilotId, key: &str) -> Option<String>;

    /// An event-wide option value.
    fn option(&self, key: &str) -> Option<String>;
}

/// In-memory attribute store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    options: HashMap<String, String>,
    pilot_attributes: HashMap<(PilotId, String), String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an event-wide option.
    pub fn set_option(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.options.insert(key.into(), value.into());
    }

    /// Set a per-pilot attribute.
    pub fn set_pilot_attribute(
        &mut self,
        pilot: PilotId,
        key: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.pilot_attributes.insert((pilot, key.into()), value.into());
    }
}

impl AttributeStore for MemoryStore {
    fn pilot_attribute(&self, pilot: PilotId, key: &str) -> Option<String> {
        self.pilot_attributes.get(&(pilot, key.to_string())).cloned()
    }

    fn option(&self, key: &str) -> Option<String> {
        self.options.get(key).cloned()
    }
}

/// Errors loading a settings file.
#[derive(Debug, Error)]
pub enum SettingsFileError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One seated pilot in a settings file.
#[derive(Debug, Deserialize)]
struct PilotEntry {
    id: u32,
    #[serde(default)]
    callsign: Option<String>,
    #[serde(default = "default_active")]
    osd_active: bool,
    #[serde(default)]
    osd_config: Option<serde_json::Value>,
}

fn default_active() -> bool {
    true
}

/// On-disk settings shape consumed by the CLI.
#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    options: HashMap<String, String>,
    #[serde(default)]
    pilots: Vec<PilotEntry>,
}

/// Load a JSON settings file into a [`MemoryStore`] plus the seated pilots.
///
/// The file mirrors what the race controller would hold: an `options` map
/// and a `pilots` array with optional embedded OSD payloads. A pilot's
/// `osd_config` object is re-serialized into the attribute the engine reads,
/// so the session loader exercises the exact same path as a live store.
pub fn load_settings_file(
    path: &Path,
) -> Result<(MemoryStore, Vec<PilotId>), SettingsFileError> {
    let raw = std::fs::read_to_string(path)?;
    let file: SettingsFile = serde_json::from_str(&raw)?;

    let mut store = MemoryStore::new();
    for (key, value) in file.options {
        store.set_option(key, value);
    }

    let mut pilots = Vec::with_capacity(file.pilots.len());
    for entry in file.pilots {
        let pilot = PilotId(entry.id);
        pilots.push(pilot);
        if let Some(callsign) = entry.callsign {
            store.set_pilot_attribute(pilot, CALLSIGN_ATTRIBUTE, callsign);
        }
        store.set_pilot_attribute(
            pilot,
            OSD_ACTIVE_ATTRIBUTE,
            if entry.osd_active { "1" } else { "0" },
        );
        if let Some(config) = entry.osd_config {
            store.set_pilot_attribute(pilot, OSD_CONFIG_ATTRIBUTE, config.to_string());
        }
    }

    Ok((store, pilots))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryStore::new();
        store.set_option("_gap_mode", "1");
        store.set_pilot_attribute(PilotId(3), CALLSIGN_ATTRIBUTE, "VAPOR");

        assert_eq!(store.option("_gap_mode").as_deref(), Some("1"));
        assert_eq!(store.option("missing"), None);
        assert_eq!(
            store
                .pilot_attribute(PilotId(3), CALLSIGN_ATTRIBUTE)
                .as_deref(),
            Some("VAPOR")
        );
        assert_eq!(store.pilot_attribute(PilotId(4), CALLSIGN_ATTRIBUTE), None);
    }

    #[test]
    fn test_load_settings_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "options": {{"min_lap_sec": "5"}},
                "pilots": [
                    {{"id": 1, "callsign": "VAPOR"}},
                    {{"id": 2, "osd_active": false,
                      "osd_config": {{"use_global": false,
                                      "race_stage": {{"row": 8}}}}}}
                ]
            }}"#
        )
        .unwrap();

        let (store, pilots) = load_settings_file(file.path()).unwrap();
        assert_eq!(pilots, vec![PilotId(1), PilotId(2)]);
        assert_eq!(store.option("min_lap_sec").as_deref(), Some("5"));
        assert_eq!(
            store
                .pilot_attribute(PilotId(1), OSD_ACTIVE_ATTRIBUTE)
                .as_deref(),
            Some("1")
        );
        assert_eq!(
            store
                .pilot_attribute(PilotId(2), OSD_ACTIVE_ATTRIBUTE)
                .as_deref(),
            Some("0")
        );
        let payload = store
            .pilot_attribute(PilotId(2), OSD_CONFIG_ATTRIBUTE)
            .unwrap();
        assert!(payload.contains("race_stage"));
    }

    #[test]
    fn test_load_settings_file_missing() {
        let err = load_settings_file(Path::new("/nonexistent/settings.json"));
        assert!(matches!(err, Err(SettingsFileError::Io(_))));
    }

    #[test]
    fn test_load_settings_file_malformed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = load_settings_file(file.path());
        assert!(matches!(err, Err(SettingsFileError::Parse(_))));
    }
}
