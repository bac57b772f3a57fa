//! CLI subcommands.

pub mod preview;
pub mod simulate;
