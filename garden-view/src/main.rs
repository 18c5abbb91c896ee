//! Application entry point for the Digital Garden viewer.
//!
//! This binary parses the command line, installs logging, sets up
//! eframe/egui and delegates all interactive logic and rendering to
//! [`Viewer`] from the `viewer` module.

mod canvas;
mod viewer;

use std::path::PathBuf;

use clap::Parser;
use viewer::{Viewer, ViewerSettings};

#[derive(Parser, Debug)]
#[command(
    name = "garden-view",
    version,
    about = "Grow plants from genome tables and smash them together"
)]
struct Cli {
    /// Genome table to grow first. A random genome is used when omitted.
    genome: Option<PathBuf>,

    /// Seed for every random choice, for reproducible plants.
    #[arg(long)]
    seed: Option<u64>,

    /// Growth steps per rendered frame while running.
    #[arg(long, default_value_t = 4)]
    steps_per_frame: usize,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// Starts the native eframe application.
///
/// ### Returns
/// - `Ok(())` if the application runs to completion without errors.
/// - `Err` if eframe fails to create the native window or event loop.
fn main() -> eframe::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let settings = ViewerSettings {
        seed: cli.seed,
        genome_path: cli.genome,
        steps_per_frame: cli.steps_per_frame.max(1),
        ..ViewerSettings::default()
    };

    let options = eframe::NativeOptions::default();

    eframe::run_native(
        "Digital Garden",
        options,
        Box::new(move |_cc| Ok(Box::new(Viewer::new(settings)))),
    )
}
