use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "scan2world",
    about = "Georeference mobile LiDAR scanner profiles against a GPS/INS trajectory",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Summarize a trajectory export and scanner files
    Inspect {
        /// Path to the GPS/INS trajectory export
        trajectory: String,
        /// Scanner profile files
        #[arg(required = true)]
        scanners: Vec<String>,
    },

    /// Georeference scanner files into a world-frame CSV
    Georef {
        /// Path to the GPS/INS trajectory export
        trajectory: String,
        /// Output CSV path
        out: String,
        /// Scanner profile files, processed in this order
        #[arg(required = true)]
        scanners: Vec<String>,
        /// JSON calibration file overriding the built-in vehicle fit
        #[arg(long = "calibration")]
        calibration: Option<String>,
        /// Override the assumed number of profiles per scanner file
        #[arg(long = "profiles-per-file")]
        profiles_per_file: Option<usize>,
        /// Process one work unit per scanner file on a thread pool
        #[arg(long = "partitioned")]
        partitioned: bool,
        /// Worker threads in partitioned mode (0 = one per file)
        #[arg(long = "workers", default_value_t = 0)]
        workers: usize,
        /// Pre-scan each file to derive its starting trajectory offset
        /// instead of trusting the fixed per-file profile count
        #[arg(long = "derived-offsets")]
        derived_offsets: bool,
        /// Dry-run: show plan but do not write any output
        #[arg(long = "dry-run")]
        dry_run: bool,
        /// Show progress bar (enabled by default)
        #[arg(long = "progress", action = ArgAction::SetTrue, default_value_t = true)]
        progress: bool,
    },
}
