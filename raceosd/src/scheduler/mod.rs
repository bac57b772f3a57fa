//! Timed-display scheduling.
//!
//! Every OSD element a handler puts on screen is registered here as a
//! [`ScheduledDisplay`] keyed by (pilot, element). Static entries persist
//! until replaced or cleared; timed entries carry a deadline and are removed
//! by [`DisplayScheduler::poll`].
//!
//! # State Machine
//!
//! ```text
//! Off ──show(static)──► StaticOn ──clear/show──► *
//! Off ──show(timed)───► TimedOn ──poll past deadline──► Off
//! TimedOn ──show(timed)──► TimedOn (deadline restarts at the call)
//! ```
//!
//! The scheduler is deliberately passive: it never spawns timers itself, so
//! the contract is independent of any particular tick source. The CLI drives
//! it from a 100ms interval; tests drive it with synthetic instants.

mod display;
mod machine;

pub use display::{DisplayState, DisplayTiming, ScheduledDisplay, TextLine};
pub use machine::DisplayScheduler;
