//! scan2world - Georeference mobile LiDAR scanner profiles
//!
//! This library converts scanner-frame point measurements into absolute
//! world (cartographic) coordinates using a synchronized GPS/INS navigation
//! trajectory.
//!
//! # Features
//!
//! - **Geometry kernel**: Euler rotation construction and rigid-body frame
//!   composition (sensor → body → world)
//! - **Loaders**: whitespace-delimited trajectory exports and 8-column
//!   scanner profile files, loaded eagerly (scanner files in parallel)
//! - **Synchronizer**: the profile-boundary cursor rule mapping each scanner
//!   record to its navigation pose
//! - **Partitioned runs**: one work unit per scanner file on a worker pool,
//!   merged deterministically in file order
//! - **Calibration**: lever arm, boresight rotation and per-file profile
//!   count from a JSON file, with built-in vehicle-fit defaults
//!
//! # Example
//!
//! ```rust,no_run
//! use scan2world::{Calibration, GeorefOptions, run_georef};
//!
//! let options = GeorefOptions {
//!     trajectory_path: "export_dgps.txt".to_string(),
//!     scanner_paths: vec!["scan_0001.xyz".to_string()],
//!     output_path: "world.csv".to_string(),
//!     calibration: Calibration::default(),
//!     partitioned: false,
//!     workers: 0,
//!     derived_offsets: false,
//!     dry_run: false,
//!     show_progress: false,
//! };
//!
//! let summary = run_georef(&options)?;
//! println!("{} points", summary.emitted);
//! # Ok::<(), scan2world::GeorefError>(())
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod geometry;
pub mod georef;
pub mod inspect;
pub mod profiles;
pub mod sync;
pub mod trajectory;
pub mod writer;

// Re-export main types for convenience
pub use config::Calibration;
pub use error::{GeorefError, UnitFailure};
pub use georef::{GeorefOptions, GeorefSummary, run_georef};
pub use profiles::{ProfileTable, ScannerPoint};
pub use sync::{SyncState, SyncStats, WorldPoint, synchronize, trajectory_rows_consumed};
pub use trajectory::{Pose, Trajectory};
