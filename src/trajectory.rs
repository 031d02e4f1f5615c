//! Navigation trajectory loading.
//!
//! The trajectory is a whitespace-delimited text export from the GPS/INS
//! post-processing suite: one header row (discarded), then one numeric row
//! per pose. Position sits in columns 1-3 and attitude (roll/pitch/yaw in
//! degrees) in columns 7-9; all other columns are ignored. The whole
//! trajectory is loaded eagerly and is read-only for the rest of the run.

use std::fs;
use std::path::Path;

use nalgebra::Vector3;

use crate::error::{GeorefError, Result};

const POSITION_START: usize = 1;
const ATTITUDE_START: usize = 7;
/// A usable row must reach past the last attitude column.
const MIN_COLUMNS: usize = 10;

/// One navigation pose. Identified downstream only by its row index in the
/// [`Trajectory`]; row order is time order.
#[derive(Debug, Clone)]
pub struct Pose {
    /// Platform position in the world frame.
    pub position: Vector3<f64>,
    /// Roll/pitch/yaw attitude in degrees.
    pub attitude_deg: [f64; 3],
}

/// Ordered, read-only sequence of navigation poses.
#[derive(Debug, Clone)]
pub struct Trajectory {
    poses: Vec<Pose>,
}

impl Trajectory {
    pub fn from_poses(poses: Vec<Pose>) -> Self {
        Self { poses }
    }

    /// Load a trajectory export, skipping the header row and blank lines.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| GeorefError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut poses = Vec::new();
        for (idx, line) in text.lines().enumerate().skip(1) {
            if line.trim().is_empty() {
                continue;
            }
            let cols: Vec<&str> = line.split_whitespace().collect();
            if cols.len() < MIN_COLUMNS {
                return Err(GeorefError::MalformedInput {
                    path: path.to_path_buf(),
                    line: idx + 1,
                    reason: format!(
                        "expected at least {MIN_COLUMNS} columns, found {}",
                        cols.len()
                    ),
                });
            }
            let position = Vector3::new(
                parse_field(path, idx + 1, &cols, POSITION_START, "position")?,
                parse_field(path, idx + 1, &cols, POSITION_START + 1, "position")?,
                parse_field(path, idx + 1, &cols, POSITION_START + 2, "position")?,
            );
            let attitude_deg = [
                parse_field(path, idx + 1, &cols, ATTITUDE_START, "attitude")?,
                parse_field(path, idx + 1, &cols, ATTITUDE_START + 1, "attitude")?,
                parse_field(path, idx + 1, &cols, ATTITUDE_START + 2, "attitude")?,
            ];
            poses.push(Pose {
                position,
                attitude_deg,
            });
        }
        Ok(Self { poses })
    }

    pub fn len(&self) -> usize {
        self.poses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Pose> {
        self.poses.get(index)
    }
}

fn parse_field(path: &Path, line: usize, cols: &[&str], index: usize, what: &str) -> Result<f64> {
    cols[index]
        .parse::<f64>()
        .map_err(|_| GeorefError::MalformedInput {
            path: path.to_path_buf(),
            line,
            reason: format!("non-numeric {what} value '{}' in column {index}", cols[index]),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn header_is_discarded_and_columns_mapped() {
        let file = write_file(
            "Time X Y Z VX VY VZ Roll Pitch Yaw\n\
             0.0 1.0 2.0 3.0 9 9 9 10.0 20.0 30.0\n\
             0.1 4.0 5.0 6.0 9 9 9 -1.0 -2.0 -3.0 extra trailing\n",
        );

        let trajectory = Trajectory::from_file(file.path()).unwrap();
        assert_eq!(trajectory.len(), 2);
        let pose = trajectory.get(0).unwrap();
        assert_eq!(pose.position, Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(pose.attitude_deg, [10.0, 20.0, 30.0]);
        let pose = trajectory.get(1).unwrap();
        assert_eq!(pose.position, Vector3::new(4.0, 5.0, 6.0));
        assert_eq!(pose.attitude_deg, [-1.0, -2.0, -3.0]);
    }

    #[test]
    fn undersized_row_is_malformed() {
        let file = write_file("header\n0.0 1.0 2.0 3.0 9 9 9 10.0 20.0\n");
        let err = Trajectory::from_file(file.path()).unwrap_err();
        match err {
            GeorefError::MalformedInput { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_numeric_field_is_malformed() {
        let file = write_file("header\n0.0 1.0 oops 3.0 9 9 9 10.0 20.0 30.0\n");
        let err = Trajectory::from_file(file.path()).unwrap_err();
        assert!(matches!(err, GeorefError::MalformedInput { line: 2, .. }));
    }

    #[test]
    fn blank_lines_are_skipped() {
        let file = write_file("header\n\n0 1 2 3 9 9 9 0 0 0\n\n");
        let trajectory = Trajectory::from_file(file.path()).unwrap();
        assert_eq!(trajectory.len(), 1);
    }
}
