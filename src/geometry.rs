//! Frame-composition kernel: Euler rotations and rigid-body transforms.
//!
//! All functions here are pure and stateless. Finite input always produces
//! the same output bit for bit; non-finite angles propagate NaN.

use nalgebra::{Matrix3, Vector3};

use crate::trajectory::Pose;

/// Build a rotation matrix from roll/pitch/yaw Euler angles in degrees.
///
/// Composition order is roll → pitch → yaw as intrinsic rotations about the
/// body axes. `rotation_from_euler([0.0, 0.0, 0.0])` is the identity.
pub fn rotation_from_euler(angles_deg: [f64; 3]) -> Matrix3<f64> {
    let (sx, cx) = angles_deg[0].to_radians().sin_cos();
    let (sy, cy) = angles_deg[1].to_radians().sin_cos();
    let (sz, cz) = angles_deg[2].to_radians().sin_cos();
    Matrix3::new(
        cy * cz,
        sx * sy * cz + cx * sz,
        -cx * sy * cz + sx * sz,
        -cy * sz,
        -sx * sy * sz + cx * cz,
        cx * sy * sz + sx * cz,
        sy,
        -sx * cy,
        cx * cy,
    )
}

/// Move a scanner-frame point into the navigation body frame through the
/// fixed lever arm and boresight rotation.
pub fn sensor_to_body(
    local: &Vector3<f64>,
    lever_arm: &Vector3<f64>,
    boresight: &Matrix3<f64>,
) -> Vector3<f64> {
    lever_arm + boresight * local
}

/// Move a body-frame point into the world frame through a navigation pose.
pub fn body_to_world(body: &Vector3<f64>, pose: &Pose) -> Vector3<f64> {
    pose.position + rotation_from_euler(pose.attitude_deg) * body
}
