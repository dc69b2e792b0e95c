use crate::geometry::{Pose3, PoseSpec};

/// A fiducial marker with a known pose on the field
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tag {
    id: u32,
    pose: Pose3,
}

impl Tag {
    pub fn new(id: u32, pose: PoseSpec) -> Self {
        Self::from_pose(id, pose.into())
    }

    pub const fn from_pose(id: u32, pose: Pose3) -> Self {
        Self { id, pose }
    }

    pub const fn id(&self) -> u32 {
        self.id
    }

    /// Pose in the field's native frame
    pub const fn pose(&self) -> &Pose3 {
        &self.pose
    }
}
