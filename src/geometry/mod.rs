//! Rigid-body geometry in the field's world frame (x forward, y left, z up).
mod pose;
mod rotation;

pub use pose::{Pose3, PoseSpec};
pub use rotation::{EulerAngles, Quaternion, Rotation3};
