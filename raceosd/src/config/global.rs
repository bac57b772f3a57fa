//! Event-wide OSD configuration snapshot.
//!
//! Global settings live in the external store as a flat option namespace
//! (`_race_stage_row`, `_gap_mode`, `_leader_message`, …). They are read
//! exactly once per race session and merged over the built-in element
//! defaults into an immutable [`GlobalConfig`]; nothing reloads or mutates
//! this snapshot while a race is running.

use std::collections::HashMap;
use std::time::Duration;

use tracing::warn;

use super::element::{BehaviorFlag, ElementConfig, ElementId, ElementOverride, MessageTemplate};
use super::store::AttributeStore;
use crate::screen::Alignment;

/// Option key holding the race format's minimum lap time, in seconds.
pub const MIN_LAP_SEC_OPTION: &str = "min_lap_sec";

/// Immutable global configuration for one race session.
#[derive(Debug, Clone)]
pub struct GlobalConfig {
    elements: HashMap<ElementId, ElementConfig>,
    flags: HashMap<BehaviorFlag, bool>,
    templates: HashMap<MessageTemplate, String>,
    /// Laps shorter than this (after carry) are folded into the next lap.
    pub min_lap_time: Duration,
}

impl Default for GlobalConfig {
    /// Pure built-in defaults, as if the store were empty.
    fn default() -> Self {
        Self {
            elements: ElementId::ALL
                .iter()
                .map(|id| (*id, id.default_config()))
                .collect(),
            flags: HashMap::new(),
            templates: HashMap::new(),
            min_lap_time: Duration::ZERO,
        }
    }
}

impl GlobalConfig {
    /// Build the session snapshot from the option store.
    ///
    /// Every element setting is read as `_{element}_{setting}`; missing keys
    /// keep the built-in default, unparseable values are logged (once: this
    /// runs once per session) and keep the default. A stored uptime decides
    /// whether the element defaults to timed, matching the legacy rule that
    /// a zero uptime means "static".
    pub fn load(store: &dyn AttributeStore) -> Self {
        let mut config = GlobalConfig::default();

        for id in ElementId::ALL {
            let over = ElementOverride {
                enabled: read_bool(store, &option_key(id, "enabled")),
                row: read_number(store, &option_key(id, "row")),
                alignment: read_alignment(store, &option_key(id, "alignment")),
                custom_col: read_number(store, &option_key(id, "custom_col")),
                is_timed: None,
                uptime: read_number(store, &option_key(id, "uptime")),
                num_laps: read_number(store, &option_key(id, "num_laps")),
            }
            .normalize();

            let base = id.default_config();
            let mut resolved = over.apply(&base);
            if let Some(uptime) = over.uptime {
                resolved.is_timed = uptime > 0;
            }
            config.elements.insert(id, resolved);
        }

        for flag in BehaviorFlag::ALL {
            if let Some(on) = read_bool(store, &format!("_{}", flag.key())) {
                config.flags.insert(flag, on);
            }
        }

        for template in MessageTemplate::ALL {
            if let Some(text) = store.option(&format!("_{}", template.key())) {
                config.templates.insert(template, text);
            }
        }

        let min_lap_sec: u64 = read_number(store, MIN_LAP_SEC_OPTION).unwrap_or(0);
        config.min_lap_time = Duration::from_secs(min_lap_sec);

        config
    }

    /// Effective global configuration for an element. Total: every known
    /// element has a value.
    pub fn element(&self, id: ElementId) -> &ElementConfig {
        // The maps are populated for every variant in the constructors.
        &self.elements[&id]
    }

    /// Effective global value of a behavior flag.
    pub fn flag(&self, flag: BehaviorFlag) -> bool {
        self.flags.get(&flag).copied().unwrap_or(false)
    }

    /// Effective global text of a message template.
    pub fn template(&self, template: MessageTemplate) -> &str {
        self.templates
            .get(&template)
            .map(String::as_str)
            .unwrap_or_else(|| template.default_text())
    }
}

fn option_key(id: ElementId, setting: &str) -> String {
    format!("_{}_{}", id.key(), setting)
}

fn read_number<T: std::str::FromStr>(store: &dyn AttributeStore, key: &str) -> Option<T> {
    let raw = store.option(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, raw, "unparseable numeric option, using default");
            None
        }
    }
}

fn read_bool(store: &dyn AttributeStore, key: &str) -> Option<bool> {
    let raw = store.option(key)?;
    match raw.trim() {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        other => {
            warn!(key, raw = other, "unparseable boolean option, using default");
            None
        }
    }
}

fn read_alignment(store: &dyn AttributeStore, key: &str) -> Option<Alignment> {
    let raw = store.option(key)?;
    match Alignment::parse_lenient(&raw) {
        Some(alignment) => Some(alignment),
        None => {
            warn!(key, raw, "unparseable alignment option, using default");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::store::MemoryStore;

    #[test]
    fn test_default_snapshot_matches_builtins() {
        let config = GlobalConfig::default();
        for id in ElementId::ALL {
            assert_eq!(*config.element(id), id.default_config());
        }
        assert!(!config.flag(BehaviorFlag::GapMode));
        assert_eq!(
            config.template(MessageTemplate::RaceStage),
            "w ARM NOW x"
        );
    }

    #[test]
    fn test_load_merges_stored_options() {
        let mut store = MemoryStore::new();
        store.set_option("_race_stage_row", "9");
        store.set_option("_race_stage_alignment", "right");
        store.set_option("_gap_mode", "1");
        store.set_option("_leader_message", "OUT FRONT");
        store.set_option("min_lap_sec", "10");

        let config = GlobalConfig::load(&store);
        let stage = config.element(ElementId::RaceStage);
        assert_eq!(stage.row, 9);
        assert_eq!(stage.alignment, Alignment::Right);
        // Untouched settings keep the built-in default.
        assert!(stage.enabled);

        assert!(config.flag(BehaviorFlag::GapMode));
        assert_eq!(config.template(MessageTemplate::Leader), "OUT FRONT");
        assert_eq!(config.min_lap_time, Duration::from_secs(10));
    }

    #[test]
    fn test_stored_uptime_drives_timing() {
        let mut store = MemoryStore::new();
        // Staging message becomes timed once it has an uptime...
        store.set_option("_race_stage_uptime", "30");
        // ...and the start flash becomes static when its uptime is zeroed.
        store.set_option("_race_start_uptime", "0");

        let config = GlobalConfig::load(&store);
        assert!(config.element(ElementId::RaceStage).is_timed);
        assert_eq!(config.element(ElementId::RaceStage).uptime, 30);
        assert!(!config.element(ElementId::RaceStart).is_timed);
    }

    #[test]
    fn test_bad_values_keep_defaults() {
        let mut store = MemoryStore::new();
        store.set_option("_race_stage_row", "twelve");
        store.set_option("_race_stage_alignment", "diagonal");
        store.set_option("_gap_mode", "maybe");

        let config = GlobalConfig::load(&store);
        let stage = config.element(ElementId::RaceStage);
        assert_eq!(stage.row, ElementId::RaceStage.default_config().row);
        assert_eq!(stage.alignment, Alignment::Center);
        assert!(!config.flag(BehaviorFlag::GapMode));
    }

    #[test]
    fn test_out_of_range_row_is_clamped() {
        let mut store = MemoryStore::new();
        store.set_option("_race_stage_row", "99");
        let config = GlobalConfig::load(&store);
        assert_eq!(config.element(ElementId::RaceStage).row, 17);
    }
}
