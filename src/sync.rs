//! Profile-to-pose synchronization.
//!
//! Walks one scanner table in stored order while advancing a cursor into the
//! navigation trajectory. A record whose profile id equals the expected id is
//! georeferenced against the pose under the cursor; any other id marks a
//! profile boundary, advancing cursor and expected id by one. The boundary
//! record itself is dropped and never georeferenced against either pose;
//! changing that would silently shift every produced dataset, so the behavior
//! is kept as-is (see DESIGN.md).

use nalgebra::Vector3;

use crate::config::Calibration;
use crate::error::{GeorefError, Result};
use crate::geometry::{body_to_world, sensor_to_body};
use crate::profiles::ProfileTable;
use crate::trajectory::Trajectory;

/// One georeferenced point in the output cartographic frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl From<Vector3<f64>> for WorldPoint {
    fn from(v: Vector3<f64>) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

/// Cursor into the navigation trajectory.
///
/// A sequential run carries one state across every table; a partitioned run
/// seeds a fresh state per work unit with the unit's starting row.
#[derive(Debug, Clone, Copy)]
pub struct SyncState {
    pub cursor: usize,
}

impl SyncState {
    pub fn starting_at(index: usize) -> Self {
        Self { cursor: index }
    }
}

/// Per-table synchronization counters.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncStats {
    /// World points emitted.
    pub emitted: usize,
    /// Boundary records dropped while advancing the cursor.
    pub skipped: usize,
}

/// Georeference one table, appending world points to `out` in visit order.
///
/// The cursor in `state` is left where the table finished so a sequential
/// pass can continue into the next table.
pub fn synchronize(
    table: &ProfileTable,
    trajectory: &Trajectory,
    calibration: &Calibration,
    state: &mut SyncState,
    out: &mut Vec<WorldPoint>,
) -> Result<SyncStats> {
    let lever_arm = calibration.lever_arm_vector();
    let boresight = calibration.boresight_matrix();

    let mut expected: i64 = 0;
    let mut stats = SyncStats::default();
    out.reserve(table.len());

    for record in table.points() {
        if record.profile_id == expected {
            let pose =
                trajectory
                    .get(state.cursor)
                    .ok_or(GeorefError::TrajectoryExhausted {
                        cursor: state.cursor,
                        len: trajectory.len(),
                    })?;
            let body = sensor_to_body(&record.local, &lever_arm, &boresight);
            out.push(WorldPoint::from(body_to_world(&body, pose)));
            stats.emitted += 1;
        } else {
            // profile boundary: the triggering record is dropped
            state.cursor += 1;
            expected += 1;
            stats.skipped += 1;
        }
    }
    Ok(stats)
}

/// Number of trajectory rows a table will consume when synchronized, found by
/// replaying the cursor rule without computing any transform.
///
/// Used to derive partition offsets and to check that the configured per-file
/// profile count actually matches the data.
pub fn trajectory_rows_consumed(table: &ProfileTable) -> usize {
    let mut expected: i64 = 0;
    let mut consumed = 0;
    for record in table.points() {
        if record.profile_id != expected {
            expected += 1;
            consumed += 1;
        }
    }
    consumed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::ScannerPoint;
    use crate::trajectory::Pose;

    fn identity_calibration() -> Calibration {
        Calibration {
            lever_arm: [0.0, 0.0, 0.0],
            boresight: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            profiles_per_file: 1,
        }
    }

    fn table_with_ids(ids: &[i64]) -> ProfileTable {
        ProfileTable::from_points(
            ids.iter()
                .map(|&id| ScannerPoint {
                    profile_id: id,
                    point_index: 0,
                    local: Vector3::zeros(),
                })
                .collect(),
        )
    }

    fn straight_line_trajectory(len: usize) -> Trajectory {
        Trajectory::from_poses(
            (0..len)
                .map(|i| Pose {
                    position: Vector3::new(i as f64, 0.0, 0.0),
                    attitude_deg: [0.0, 0.0, 0.0],
                })
                .collect(),
        )
    }

    #[test]
    fn boundary_records_are_dropped() {
        let table = table_with_ids(&[0, 0, 0, 1, 1, 2]);
        let trajectory = straight_line_trajectory(3);
        let calibration = identity_calibration();

        let mut state = SyncState::starting_at(0);
        let mut out = Vec::new();
        let stats = synchronize(&table, &trajectory, &calibration, &mut state, &mut out).unwrap();

        // ids 1 and 2 each trigger one skipped boundary record
        assert_eq!(stats.emitted, 4);
        assert_eq!(stats.skipped, 2);
        let xs: Vec<f64> = out.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 0.0, 0.0, 1.0]);
        assert_eq!(state.cursor, 2);
    }

    #[test]
    fn gap_in_profile_ids_keeps_advancing() {
        let table = table_with_ids(&[0, 2, 2, 2]);
        let trajectory = straight_line_trajectory(4);
        let calibration = identity_calibration();

        let mut state = SyncState::starting_at(0);
        let mut out = Vec::new();
        let stats = synchronize(&table, &trajectory, &calibration, &mut state, &mut out).unwrap();

        // the first two id-2 records bridge expected 0 -> 2, the third matches
        assert_eq!(stats.emitted, 2);
        assert_eq!(stats.skipped, 2);
        let xs: Vec<f64> = out.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 2.0]);
    }

    #[test]
    fn exhausted_trajectory_is_an_error() {
        let table = table_with_ids(&[0, 1, 1]);
        let trajectory = straight_line_trajectory(1);
        let calibration = identity_calibration();

        let mut state = SyncState::starting_at(0);
        let mut out = Vec::new();
        let err =
            synchronize(&table, &trajectory, &calibration, &mut state, &mut out).unwrap_err();
        assert!(matches!(
            err,
            GeorefError::TrajectoryExhausted { cursor: 1, len: 1 }
        ));
    }

    #[test]
    fn state_continues_across_tables() {
        let first = table_with_ids(&[0, 0, 1]);
        let second = table_with_ids(&[0, 0]);
        let trajectory = straight_line_trajectory(3);
        let calibration = identity_calibration();

        let mut state = SyncState::starting_at(0);
        let mut out = Vec::new();
        synchronize(&first, &trajectory, &calibration, &mut state, &mut out).unwrap();
        synchronize(&second, &trajectory, &calibration, &mut state, &mut out).unwrap();

        let xs: Vec<f64> = out.iter().map(|p| p.x).collect();
        // second table matches against the row the first table advanced to
        assert_eq!(xs, vec![0.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn rows_consumed_replays_the_rule() {
        assert_eq!(trajectory_rows_consumed(&table_with_ids(&[0, 0, 0])), 0);
        assert_eq!(trajectory_rows_consumed(&table_with_ids(&[0, 0, 1, 1, 2])), 2);
        assert_eq!(trajectory_rows_consumed(&table_with_ids(&[0, 2, 2])), 2);
        assert_eq!(trajectory_rows_consumed(&table_with_ids(&[])), 0);
    }
}
