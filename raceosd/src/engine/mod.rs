//! Race-event handling.
//!
//! [`OsdEngine`] ties the layered configuration, lap state, and display
//! scheduling together behind the handlers the race-lifecycle source calls:
//!
//! ```text
//! race event ──► handler ──► LayoutResolver (effective settings)
//!                   │              │
//!                   │              └─► screen::column (placement)
//!                   ├─► LapFilter / trackers (lap-bearing events)
//!                   ├─► DisplayScheduler (static / timed registration)
//!                   └─► OsdTransport (rendered lines, fire-and-forget)
//! ```
//!
//! Events arrive serially; the only asynchronous mutation is timed expiry,
//! driven by [`OsdEngine::poll`] from an external timer.

mod context;
mod format;
mod handlers;
mod preview;
mod transport;

pub use context::{
    Consecutives, HeatContext, LapRecord, LapResultContext, PilotResult, RankGap, WinCondition,
};
pub use handlers::OsdEngine;
pub use preview::{all_previews, element_preview, ElementPreview};
pub use transport::{NullTransport, OsdTransport, RecordingTransport, TransportEvent};
