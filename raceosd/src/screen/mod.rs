//! OSD screen model.
//!
//! The display hardware exposes a fixed character grid (18 rows × 50 columns)
//! and a text protocol in which single lowercase letters act as color-control
//! codes that occupy no screen cell. This module owns the grid constants,
//! color-aware text measurement, and the alignment → start-column math. It is
//! a pure leaf: no state, no I/O.
//!
//! # Example
//!
//! ```
//! use raceosd::screen::{column, visible_len, Alignment};
//!
//! // "x" and "w" are color codes and take no screen cells.
//! assert_eq!(visible_len("x GO! w"), 5);
//! assert_eq!(column(Alignment::Right, None, "GO!"), 46);
//! ```

mod column;
mod text;

pub use column::{column, Alignment};
pub use text::{clamp_col, clamp_row, clip, visible_len, OSD_COLS, OSD_ROWS};
