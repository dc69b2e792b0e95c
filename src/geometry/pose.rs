use crate::util::math::Vec3;

use super::{EulerAngles, Quaternion, Rotation3};

/// Description of a pose, in one of the forms poses are commonly written down
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PoseSpec {
    /// Translation in meters, rotation as sxyz euler angles in radians
    Components {
        x: f64,
        y: f64,
        z: f64,
        roll: f64,
        pitch: f64,
        yaw: f64,
    },
    /// Translation in meters, rotation as a unit quaternion
    Quaternion {
        translation: Vec3,
        rotation: Quaternion,
    },
}

/// Rigid transform: a rotation followed by a translation
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pose3 {
    pub translation: Vec3,
    pub rotation: Rotation3,
}

impl Pose3 {
    pub const fn new(translation: Vec3, rotation: Rotation3) -> Self {
        Self { translation, rotation }
    }

    /// The zero pose. Also used as the "unknown" sentinel by [FieldLayout](crate::FieldLayout).
    pub const fn identity() -> Self {
        Self::new(Vec3::zero(), Rotation3::identity())
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    pub const fn x(&self) -> f64 {
        self.translation.0
    }

    pub const fn y(&self) -> f64 {
        self.translation.1
    }

    pub const fn z(&self) -> f64 {
        self.translation.2
    }

    pub fn euler(&self) -> EulerAngles {
        self.rotation.euler()
    }

    /// Apply `other` in this pose's frame (`self * other`)
    pub fn compose(&self, other: &Pose3) -> Self {
        Self {
            translation: &self.translation + &self.rotation.apply(&other.translation),
            rotation: &self.rotation * &other.rotation,
        }
    }

    pub fn inverse(&self) -> Self {
        let rotation = self.rotation.inverse();
        Self {
            translation: -rotation.apply(&self.translation),
            rotation,
        }
    }

    /// Express this pose in the frame of `origin`
    pub fn relative_to(&self, origin: &Pose3) -> Self {
        Self {
            translation: origin.rotation.inverse().apply(&(&self.translation - &origin.translation)),
            rotation: self.rotation.relative_to(&origin.rotation),
        }
    }
}

impl From<PoseSpec> for Pose3 {
    fn from(value: PoseSpec) -> Self {
        match value {
            PoseSpec::Components { x, y, z, roll, pitch, yaw } => Self::new(
                Vec3::of(x, y, z),
                Rotation3::from_euler(EulerAngles::new(roll, pitch, yaw)),
            ),
            PoseSpec::Quaternion { translation, rotation } => Self::new(
                translation,
                Rotation3::from_quaternion(rotation),
            ),
        }
    }
}
