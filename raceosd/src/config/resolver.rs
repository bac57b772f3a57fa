//! Layered settings resolution.
//!
//! [`SessionSettings`] is the immutable per-race snapshot: the global
//! configuration plus every active pilot's parsed payload. [`LayoutResolver`]
//! answers every "where does this element go for this pilot" question with a
//! strict three-tier precedence, applied independently per setting:
//!
//! 1. no pilot payload, or `use_global`: the global value;
//! 2. the pilot's stored override for that setting;
//! 3. the global value (which itself folded built-in defaults in at load).
//!
//! A pilot can therefore move an element's row while inheriting its
//! alignment, uptime, and everything else from the event configuration.

use std::collections::HashMap;

use tracing::debug;

use super::element::{BehaviorFlag, ElementConfig, ElementId, MessageTemplate};
use super::global::GlobalConfig;
use super::pilot::{PilotConfig, OSD_ACTIVE_ATTRIBUTE, OSD_CONFIG_ATTRIBUTE};
use super::store::AttributeStore;
use super::PilotId;

/// Immutable configuration snapshot for one race session.
#[derive(Debug, Clone, Default)]
pub struct SessionSettings {
    pub global: GlobalConfig,
    pilots: HashMap<PilotId, PilotConfig>,
    roster: Vec<PilotId>,
}

impl SessionSettings {
    /// Load the snapshot from the external store.
    ///
    /// `seated` is the set of pilots in the heat, in seat order; pilots whose
    /// `osd_active` attribute is off are dropped from the roster entirely.
    /// Per-pilot payloads are parsed here, once: malformed payloads degrade
    /// to pure global behavior and are logged at parse time.
    pub fn load(store: &dyn AttributeStore, seated: &[PilotId]) -> Self {
        let global = GlobalConfig::load(store);

        let mut pilots = HashMap::new();
        let mut roster = Vec::new();
        for &pilot in seated {
            let active = store
                .pilot_attribute(pilot, OSD_ACTIVE_ATTRIBUTE)
                .map(|v| v.trim() == "1" || v.trim() == "true")
                // Absent attribute means the pilot never opted out.
                .unwrap_or(true);
            if !active {
                debug!(%pilot, "pilot OSD inactive, skipping");
                continue;
            }
            roster.push(pilot);

            if let Some(raw) = store.pilot_attribute(pilot, OSD_CONFIG_ATTRIBUTE) {
                if let Some(config) = PilotConfig::parse(pilot, &raw) {
                    pilots.insert(pilot, config);
                }
            }
        }

        debug!(
            pilots = roster.len(),
            overrides = pilots.len(),
            "session settings loaded"
        );
        Self {
            global,
            pilots,
            roster,
        }
    }

    /// Build a snapshot directly from parts (primarily for tests).
    pub fn from_parts(
        global: GlobalConfig,
        pilots: HashMap<PilotId, PilotConfig>,
        roster: Vec<PilotId>,
    ) -> Self {
        Self {
            global,
            pilots,
            roster,
        }
    }

    /// Active pilots, in seat order.
    pub fn roster(&self) -> &[PilotId] {
        &self.roster
    }

    fn overrides_for(&self, pilot: PilotId) -> Option<&PilotConfig> {
        let config = self.pilots.get(&pilot)?;
        if config.use_global {
            return None;
        }
        Some(config)
    }
}

/// Resolves effective settings from a [`SessionSettings`] snapshot.
#[derive(Debug, Clone, Default)]
pub struct LayoutResolver {
    settings: SessionSettings,
}

impl LayoutResolver {
    pub fn new(settings: SessionSettings) -> Self {
        Self { settings }
    }

    /// The underlying snapshot.
    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// Active pilots, in seat order.
    pub fn roster(&self) -> &[PilotId] {
        self.settings.roster()
    }

    /// Effective configuration of `element` for `pilot`, every field
    /// resolved independently.
    pub fn element(&self, pilot: PilotId, element: ElementId) -> ElementConfig {
        let global = self.settings.global.element(element);
        match self
            .settings
            .overrides_for(pilot)
            .and_then(|config| config.element(element))
        {
            Some(over) => over.apply(global),
            None => global.clone(),
        }
    }

    /// Effective behavior flag for `pilot`.
    pub fn flag(&self, pilot: PilotId, flag: BehaviorFlag) -> bool {
        self.settings
            .overrides_for(pilot)
            .and_then(|config| config.flag(flag))
            .unwrap_or_else(|| self.settings.global.flag(flag))
    }

    /// Effective message template for `pilot`.
    pub fn template(&self, pilot: PilotId, template: MessageTemplate) -> &str {
        self.settings
            .overrides_for(pilot)
            .and_then(|config| config.template(template))
            .unwrap_or_else(|| self.settings.global.template(template))
    }

    /// Minimum lap time from the race format.
    pub fn min_lap_time(&self) -> std::time::Duration {
        self.settings.global.min_lap_time
    }
}
