//! Layered OSD configuration.
//!
//! Configuration comes from three tiers, resolved per setting:
//!
//! ```text
//! pilot payload ──► global options ──► built-in defaults
//!   (overrides)      (event-wide)       (always present)
//! ```
//!
//! The external store is read exactly once per race session into an
//! immutable [`SessionSettings`] snapshot; [`LayoutResolver`] then answers
//! every lookup for the rest of the race without touching storage.

mod element;
mod global;
mod pilot;
mod resolver;
mod store;

pub use element::{
    BehaviorFlag, ElementConfig, ElementId, ElementOverride, MessageTemplate,
    DEFAULT_RECENT_LAPS,
};
pub use global::{GlobalConfig, MIN_LAP_SEC_OPTION};
pub use pilot::{PilotConfig, OSD_ACTIVE_ATTRIBUTE, OSD_CONFIG_ATTRIBUTE};
pub use resolver::{LayoutResolver, SessionSettings};
pub use store::{
    load_settings_file, AttributeStore, MemoryStore, SettingsFileError, CALLSIGN_ATTRIBUTE,
};

/// Identity of a pilot, as assigned by the race controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PilotId(pub u32);

impl std::fmt::Display for PilotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "pilot {}", self.0)
    }
}
