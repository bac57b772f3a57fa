//! RaceOSD - Race telemetry overlays for pilot video links
//!
//! This library is the settings-resolution and timed-display engine behind
//! a race-timing OSD: it decides what overlay text each pilot sees, where
//! it goes on their screen, and when it disappears.
//!
//! # Architecture
//!
//! ```text
//! attribute store ──► config (session snapshot + 3-tier resolution)
//!                         │
//! race events ──────► engine handlers ──► scheduler (timed displays)
//!                         │                   │
//!                      lap state           transport (external hardware)
//! ```
//!
//! Everything stateful lives per race session: configuration is snapshotted
//! once at session start, lap state accumulates per pilot as crossings
//! arrive, and the display scheduler tracks what is on each pilot's screen
//! until a poll expires it or a reset wipes it. The HTTP surface, storage,
//! and the actual video-link transport are external collaborators.

pub mod config;
pub mod engine;
pub mod lap;
pub mod logging;
pub mod scheduler;
pub mod screen;

pub use config::{LayoutResolver, PilotId, SessionSettings};
pub use engine::{OsdEngine, OsdTransport};
pub use scheduler::{DisplayScheduler, DisplayState, DisplayTiming, TextLine};
