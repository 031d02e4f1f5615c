//! Scanner profile tables.
//!
//! Raw scanner exports are whitespace-delimited with exactly 8 numeric
//! columns per row: profile id, point index, X, Y, Z and three angle columns
//! that carry no georeferencing role and are dropped on load. After loading,
//! records are stably sorted by profile id so that iteration order matches
//! the synchronization rule's non-decreasing invariant.

use std::fs;
use std::path::{Path, PathBuf};

use nalgebra::Vector3;
use rayon::prelude::*;

use crate::error::{GeorefError, Result};

/// Required column count of a raw scanner row.
pub const SCANNER_COLUMNS: usize = 8;

/// One scanner measurement in the sensor frame.
#[derive(Debug, Clone)]
pub struct ScannerPoint {
    /// Profile (scan sweep) the point belongs to.
    pub profile_id: i64,
    /// Index of the point within its profile.
    pub point_index: i64,
    /// Coordinates in the scanner frame.
    pub local: Vector3<f64>,
}

/// Ordered, read-only point table for one scanner file.
#[derive(Debug, Clone)]
pub struct ProfileTable {
    path: PathBuf,
    points: Vec<ScannerPoint>,
}

impl ProfileTable {
    /// Build a table directly from records, applying the same stable sort as
    /// the file loader.
    pub fn from_points(points: Vec<ScannerPoint>) -> Self {
        let mut table = Self {
            path: PathBuf::from("<memory>"),
            points,
        };
        table.points.sort_by_key(|p| p.profile_id);
        table
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| GeorefError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut points = Vec::new();
        for (idx, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let cols: Vec<&str> = line.split_whitespace().collect();
            if cols.len() != SCANNER_COLUMNS {
                return Err(GeorefError::MalformedInput {
                    path: path.to_path_buf(),
                    line: idx + 1,
                    reason: format!(
                        "expected {SCANNER_COLUMNS} columns, found {}",
                        cols.len()
                    ),
                });
            }
            let mut fields = [0.0f64; SCANNER_COLUMNS];
            for (col, raw) in cols.iter().enumerate() {
                fields[col] = raw.parse().map_err(|_| GeorefError::MalformedInput {
                    path: path.to_path_buf(),
                    line: idx + 1,
                    reason: format!("non-numeric value '{raw}' in column {col}"),
                })?;
            }
            // columns 5-7 are sensor angles with no georeferencing role
            points.push(ScannerPoint {
                profile_id: fields[0] as i64,
                point_index: fields[1] as i64,
                local: Vector3::new(fields[2], fields[3], fields[4]),
            });
        }

        // stable: points inside a profile keep their file order
        points.sort_by_key(|p| p.profile_id);

        Ok(Self {
            path: path.to_path_buf(),
            points,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn points(&self) -> &[ScannerPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of distinct profile ids in the table.
    pub fn distinct_profiles(&self) -> usize {
        let mut count = 0;
        let mut last = None;
        for p in &self.points {
            if last != Some(p.profile_id) {
                count += 1;
                last = Some(p.profile_id);
            }
        }
        count
    }
}

/// Load every scanner file eagerly, in parallel, preserving input order.
pub fn load_tables(paths: &[String]) -> Result<Vec<ProfileTable>> {
    paths
        .par_iter()
        .map(|p| ProfileTable::from_file(Path::new(p)))
        .collect()
}
