//! Error taxonomy for the georeferencing pipeline.
//!
//! Every failure here stems from malformed static input or a cursor/data
//! mismatch; nothing is transient, so there are no retry variants. Errors
//! carry the file path, line number or unit index needed to diagnose them.

use std::path::PathBuf;

use thiserror::Error;

/// Failure of one work unit in a partitioned run.
#[derive(Debug)]
pub struct UnitFailure {
    /// Index of the failed unit in file-list order.
    pub unit: usize,
    /// The error the unit reported.
    pub error: GeorefError,
}

#[derive(Debug, Error)]
pub enum GeorefError {
    /// A row in an input file could not be parsed.
    #[error("{}:{line}: {reason}", .path.display())]
    MalformedInput {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    /// The synchronization cursor advanced past the last trajectory row.
    #[error("navigation trajectory exhausted: cursor {cursor} is past the last row ({len} rows loaded)")]
    TrajectoryExhausted { cursor: usize, len: usize },

    /// One or more work units failed in a partitioned run. No output is
    /// written when this is raised.
    #[error("{} work unit(s) failed: units {:?}", .failures.len(), .failures.iter().map(|f| f.unit).collect::<Vec<_>>())]
    PartialFailure { failures: Vec<UnitFailure> },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse calibration file {}: {source}", .path.display())]
    Calibration {
        path: PathBuf,
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, GeorefError>;
