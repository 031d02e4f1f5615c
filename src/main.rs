use anyhow::{Result, bail};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

mod cli;
mod config;
mod error;
mod geometry;
mod georef;
mod inspect;
mod profiles;
mod sync;
mod trajectory;
mod writer;

use cli::{Cli, Commands};
use config::Calibration;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Commands::Inspect {
            trajectory,
            scanners,
        } => inspect::inspect_inputs(&trajectory, &scanners),
        Commands::Georef {
            trajectory,
            out,
            scanners,
            calibration,
            profiles_per_file,
            partitioned,
            workers,
            derived_offsets,
            dry_run,
            progress,
        } => {
            let mut calib = match calibration {
                Some(path) => Calibration::from_json_file(std::path::Path::new(&path))?,
                None => Calibration::default(),
            };
            if let Some(ppf) = profiles_per_file {
                calib.profiles_per_file = ppf;
            }
            if calib.profiles_per_file == 0 {
                bail!("profiles-per-file must be > 0");
            }

            let options = georef::GeorefOptions {
                trajectory_path: trajectory,
                scanner_paths: scanners,
                output_path: out,
                calibration: calib,
                partitioned,
                workers,
                derived_offsets,
                dry_run,
                show_progress: progress,
            };
            let summary = georef::run_georef(&options)?;
            if !dry_run {
                println!(
                    "Georeferenced {} points from {} files ({} boundary records dropped) → {}",
                    summary.emitted,
                    summary.units,
                    summary.skipped_boundaries,
                    options.output_path
                );
            }
            Ok(())
        }
    }
}
