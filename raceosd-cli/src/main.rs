//! RaceOSD CLI - Command-line interface
//!
//! Preview OSD layouts from a settings file and run scripted demo races
//! against a terminal rendering of each pilot's screen.

mod commands;
mod error;
mod render;

use clap::{Parser, Subcommand};

use commands::{preview, simulate};

#[derive(Debug, Parser)]
#[command(name = "raceosd", version, about = "Race telemetry OSD overlay engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Render element previews for seated pilots
    Preview(preview::PreviewArgs),

    /// Run a scripted demo race with live timed expiry
    Simulate(simulate::SimulateArgs),
}

#[tokio::main]
async fn main() {
    raceosd::logging::init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Preview(args) => preview::run(args),
        Commands::Simulate(args) => simulate::run(args).await,
    };

    if let Err(err) = result {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}
