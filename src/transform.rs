//! Conversion from the detector's camera frame (x right, y down, z forward)
//! to the field's world frame (x forward, y left, z up).
use crate::{geometry::{EulerAngles, Pose3, Rotation3}, util::math::{Mat33, Vec3}};

/// Axis remap applied to camera-frame vectors
///
/// `field_x = camera_z`, `field_y = camera_x`, `field_z = -camera_y`.
///
/// Note that this is a reflection (determinant -1), so rotations are
/// conjugated by it rather than multiplied.
pub const CAMERA_TO_FIELD: Mat33 = Mat33::from_rows([
    [0.,  0., 1.],
    [1.,  0., 0.],
    [0., -1., 0.],
]);

/// Decompose a rotation matrix into sxyz roll/pitch/yaw
///
/// Returns all zeroes when there is no matrix (e.g. no detection this frame).
pub fn to_euler_angles(rotation: Option<&Mat33>) -> EulerAngles {
    match rotation {
        Some(R) => Rotation3::from_matrix(*R).euler(),
        None => EulerAngles::zero(),
    }
}

/// Remap a camera-frame translation into field axes
pub fn translation_to_field(translation: &Vec3) -> Vec3 {
    &CAMERA_TO_FIELD * translation
}

/// Remap a camera-frame rotation into field axes
pub fn rotation_to_field(rotation: &Mat33) -> Rotation3 {
    Rotation3::from_matrix(rotation.conjugate(&CAMERA_TO_FIELD))
}

/// Convert a detector pose (rotation + translation in the camera frame) into
/// a pose using field axes
pub fn camera_to_field(rotation: &Mat33, translation: &Vec3) -> Pose3 {
    Pose3::new(translation_to_field(translation), rotation_to_field(rotation))
}
