use nalgebra as na;
use ndarray as nd;
use ndarray::prelude::*;

/// Below this angle (radians) the axis is too ill-defined to normalise and
/// we fall back to the series expansion of the half-angle terms.
pub const SMALL_ANGLE_EPS: f32 = 1e-4;

/// Converts a Rodrigues (axis-angle) vector into a unit quaternion.
///
/// The direction of `(rod_x, rod_y, rod_z)` is the rotation axis and its norm
/// the angle in radians. The zero vector maps to the identity.
pub fn rodrigues_to_quat(rod_x: f32, rod_y: f32, rod_z: f32) -> na::UnitQuaternion<f32> {
    let angle_sqr = rod_x * rod_x + rod_y * rod_y + rod_z * rod_z;
    let angle = angle_sqr.sqrt();

    let (w, s) = if angle < SMALL_ANGLE_EPS {
        // cos(a/2) ~ 1 - a^2/8 and sin(a/2)/a ~ 1/2 - a^2/48
        (1.0 - angle_sqr / 8.0, 0.5 - angle_sqr / 48.0)
    } else {
        let half = 0.5 * angle;
        (half.cos(), half.sin() / angle)
    };

    na::UnitQuaternion::new_normalize(na::Quaternion::new(w, rod_x * s, rod_y * s, rod_z * s))
}

pub fn rodrigues_vec_to_quat(rod: &na::Vector3<f32>) -> na::UnitQuaternion<f32> {
    rodrigues_to_quat(rod.x, rod.y, rod.z)
}

/// Inverse of [`rodrigues_to_quat`]. The returned angle is in `[0, pi]`.
pub fn quat_to_rodrigues(rot: &na::UnitQuaternion<f32>) -> na::Vector3<f32> {
    // pick the hemisphere with w >= 0 so the angle stays below pi
    let q = if rot.w < 0.0 { -rot.into_inner() } else { rot.into_inner() };
    let sin_half = q.imag().norm();
    if sin_half < SMALL_ANGLE_EPS {
        return q.imag() * 2.0;
    }
    let angle = 2.0 * sin_half.atan2(q.w);
    q.imag() * (angle / sin_half)
}

/// Rotation matrices of shape `[nr_joints, 3, 3]` for a batch of joint rotations
pub fn batch_quat_to_matrices(rotations: &[na::UnitQuaternion<f32>]) -> nd::Array3<f32> {
    let mut rot_mats = nd::Array3::<f32>::zeros((rotations.len(), 3, 3));
    for (q, mut rot_out) in rotations.iter().zip(rot_mats.axis_iter_mut(nd::Axis(0))) {
        rot_out.assign(&quat_matrix_to_nd(q.to_rotation_matrix().matrix()));
    }
    rot_mats
}

fn quat_matrix_to_nd(m: &na::Matrix3<f32>) -> nd::Array2<f32> {
    array![
        [m[(0, 0)], m[(0, 1)], m[(0, 2)]],
        [m[(1, 0)], m[(1, 1)], m[(1, 2)]],
        [m[(2, 0)], m[(2, 1)], m[(2, 2)]]
    ]
}
