//! Per-pilot OSD configuration payload.
//!
//! Pilots carry their overrides as a JSON blob in the external attribute
//! store under [`OSD_CONFIG_ATTRIBUTE`]. The payload is parsed once per race
//! session. Parsing is deliberately lenient: a missing or malformed payload
//! means "use the global configuration", never an error. A race in progress
//! must not fail because a pilot saved a bad blob.

use std::collections::HashMap;

use serde_json::Value;
use tracing::warn;

use super::element::{BehaviorFlag, ElementId, ElementOverride, MessageTemplate};
use super::PilotId;

/// Attribute-store key under which a pilot's OSD payload is stored.
pub const OSD_CONFIG_ATTRIBUTE: &str = "osd_config";

/// Attribute-store key gating whether a pilot receives OSD output at all.
pub const OSD_ACTIVE_ATTRIBUTE: &str = "osd_active";

/// Parsed per-pilot configuration.
#[derive(Debug, Clone, Default)]
pub struct PilotConfig {
    /// When true the pilot inherits the global configuration wholesale and
    /// every stored override is ignored.
    pub use_global: bool,
    elements: HashMap<ElementId, ElementOverride>,
    flags: HashMap<BehaviorFlag, bool>,
    templates: HashMap<MessageTemplate, String>,
}

impl PilotConfig {
    /// Parse a stored payload.
    ///
    /// Returns `None` when the payload is not a JSON object: the caller
    /// treats that identically to "no stored config". Unknown top-level keys
    /// are logged and skipped; since parsing happens once per session, each
    /// defect is reported exactly once.
    pub fn parse(pilot: PilotId, raw: &str) -> Option<Self> {
        let value: Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(err) => {
                warn!(%pilot, %err, "malformed pilot OSD payload, using global config");
                return None;
            }
        };
        let Value::Object(map) = value else {
            warn!(%pilot, "pilot OSD payload is not an object, using global config");
            return None;
        };

        let mut config = PilotConfig {
            use_global: true,
            ..Default::default()
        };

        for (key, entry) in map {
            if key == "use_global" {
                config.use_global = entry.as_bool().unwrap_or(true);
            } else if let Some(id) = ElementId::from_key(&key) {
                match serde_json::from_value::<ElementOverride>(entry) {
                    Ok(over) => {
                        config.elements.insert(id, over.normalize());
                    }
                    Err(err) => {
                        warn!(%pilot, element = %id, %err, "bad element override, ignored");
                    }
                }
            } else if let Some(flag) = BehaviorFlag::from_key(&key) {
                match parse_flag(&entry) {
                    Some(on) => {
                        config.flags.insert(flag, on);
                    }
                    None => warn!(%pilot, flag = key, "bad flag value, ignored"),
                }
            } else if let Some(template) = MessageTemplate::from_key(&key) {
                match entry.as_str() {
                    Some(text) => {
                        config.templates.insert(template, text.to_string());
                    }
                    None => warn!(%pilot, template = key, "bad template value, ignored"),
                }
            } else {
                warn!(%pilot, key, "unknown OSD config key, ignored");
            }
        }

        Some(config)
    }

    /// The stored override for an element, if any.
    pub fn element(&self, id: ElementId) -> Option<&ElementOverride> {
        self.elements.get(&id)
    }

    /// The stored flag override, if any.
    pub fn flag(&self, flag: BehaviorFlag) -> Option<bool> {
        self.flags.get(&flag).copied()
    }

    /// The stored template override, if any.
    pub fn template(&self, template: MessageTemplate) -> Option<&str> {
        self.templates.get(&template).map(String::as_str)
    }
}

/// Flags arrive either as JSON booleans or as the legacy `"0"` / `"1"`
/// option strings.
fn parse_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.as_str() {
            "1" => Some(true),
            "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}
