//! Calibration constants for the georeferencing run.
//!
//! The lever arm, boresight rotation and per-file profile count are survey
//! constants supplied by the acquisition team, never inferred from the data.
//! Defaults match the current vehicle fit; any subset can be overridden from
//! a JSON file, e.g. `{"lever_arm": [0.14, 0.249, -0.076]}`.

use std::fs;
use std::path::Path;

use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::{GeorefError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Calibration {
    /// Scanner-origin offset from the navigation reference point, expressed
    /// in the body frame.
    #[serde(default = "default_lever_arm")]
    pub lever_arm: [f64; 3],

    /// Fixed rotation from the scanner frame into the body frame, row-major.
    #[serde(default = "default_boresight")]
    pub boresight: [[f64; 3]; 3],

    /// Assumed number of distinct profiles in every scanner file. Drives the
    /// starting trajectory offset of each partitioned work unit.
    #[serde(default = "default_profiles_per_file")]
    pub profiles_per_file: usize,
}

fn default_lever_arm() -> [f64; 3] {
    [0.14, 0.249, -0.076]
}

fn default_boresight() -> [[f64; 3]; 3] {
    [[0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]]
}

fn default_profiles_per_file() -> usize {
    538
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            lever_arm: default_lever_arm(),
            boresight: default_boresight(),
            profiles_per_file: default_profiles_per_file(),
        }
    }
}

impl Calibration {
    /// Load calibration overrides from a JSON file. Missing keys keep their
    /// defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| GeorefError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&text).map_err(|e| GeorefError::Calibration {
            path: path.to_path_buf(),
            source: e,
        })
    }

    pub fn lever_arm_vector(&self) -> Vector3<f64> {
        Vector3::from(self.lever_arm)
    }

    pub fn boresight_matrix(&self) -> Matrix3<f64> {
        Matrix3::from_fn(|i, j| self.boresight[i][j])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_match_vehicle_fit() {
        let calib = Calibration::default();
        assert_eq!(calib.lever_arm, [0.14, 0.249, -0.076]);
        assert_eq!(calib.profiles_per_file, 538);
        // boresight maps +x to +y and +y to -x
        let m = calib.boresight_matrix();
        let v = m * Vector3::new(1.0, 0.0, 0.0);
        assert_eq!(v, Vector3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{{\"profiles_per_file\": 12}}").unwrap();
        file.flush().unwrap();

        let calib = Calibration::from_json_file(file.path()).unwrap();
        assert_eq!(calib.profiles_per_file, 12);
        assert_eq!(calib.lever_arm, [0.14, 0.249, -0.076]);
    }

    #[test]
    fn bad_json_reports_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not json").unwrap();
        file.flush().unwrap();

        let err = Calibration::from_json_file(file.path()).unwrap_err();
        assert!(matches!(err, GeorefError::Calibration { .. }));
    }
}
