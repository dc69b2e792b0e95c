use std::ops::Mul;

use crate::util::math::{Mat33, Vec3};

/// Threshold below which the pitch decomposition is treated as gimbal locked
const EPS4: f64 = f64::EPSILON * 4.;

/// Quaternion `w + xi + yj + zk`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quaternion {
    pub w: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Quaternion {
    pub const fn new(w: f64, x: f64, y: f64, z: f64) -> Self {
        Self { w, x, y, z }
    }

    pub const fn identity() -> Self {
        Self::new(1., 0., 0., 0.)
    }

    pub fn norm(&self) -> f64 {
        (self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Scale to unit length
    ///
    /// Returns `None` if the norm is zero or not finite.
    pub fn normalized(&self) -> Option<Self> {
        let norm = self.norm();
        if !norm.is_finite() || norm == 0. {
            return None;
        }
        Some(Self::new(self.w / norm, self.x / norm, self.y / norm, self.z / norm))
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::identity()
    }
}

/// Roll/pitch/yaw in radians, using the static X-Y-Z ("sxyz") convention
///
/// The equivalent rotation is `Rz(yaw) * Ry(pitch) * Rx(roll)`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EulerAngles {
    /// Rotation about x
    pub roll: f64,
    /// Rotation about y
    pub pitch: f64,
    /// Rotation about z
    pub yaw: f64,
}

impl EulerAngles {
    pub const fn new(roll: f64, pitch: f64, yaw: f64) -> Self {
        Self { roll, pitch, yaw }
    }

    pub const fn zero() -> Self {
        Self::new(0., 0., 0.)
    }
}

/// A rotation in 3D space, backed by an orthonormal matrix
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rotation3(Mat33);

impl Rotation3 {
    pub const fn identity() -> Self {
        Self(Mat33::identity())
    }

    /// Wrap a rotation matrix
    ///
    /// The matrix is not re-orthonormalized; callers are expected to pass
    /// a proper rotation.
    pub const fn from_matrix(matrix: Mat33) -> Self {
        Self(matrix)
    }

    /// Rotation from sxyz euler angles
    pub fn from_euler(angles: EulerAngles) -> Self {
        let R = Mat33::rot_z(angles.yaw)
            .matmul(&Mat33::rot_y(angles.pitch))
            .matmul(&Mat33::rot_x(angles.roll));
        Self(R)
    }

    /// Rotation from a quaternion
    ///
    /// The quaternion is normalized first. A degenerate quaternion yields the
    /// identity rotation.
    pub fn from_quaternion(q: Quaternion) -> Self {
        match q.normalized() {
            Some(q) => Self(Mat33::from_quaternion(q.w, q.x, q.y, q.z)),
            None => Self::identity(),
        }
    }

    /// Rotation of `theta` radians about the z (vertical) axis
    pub fn about_z(theta: f64) -> Self {
        Self(Mat33::rot_z(theta))
    }

    pub const fn matrix(&self) -> &Mat33 {
        &self.0
    }

    pub fn inverse(&self) -> Self {
        Self(self.0.transposed())
    }

    /// Apply `other` after this rotation
    pub fn rotate_by(&self, other: &Rotation3) -> Self {
        Self(other.0.matmul(&self.0))
    }

    /// This rotation, expressed relative to `other`
    pub fn relative_to(&self, other: &Rotation3) -> Self {
        Self(other.0.transpose_matmul(&self.0))
    }

    pub fn apply(&self, v: &Vec3) -> Vec3 {
        &self.0 * v
    }

    /// Decompose into sxyz euler angles
    pub fn euler(&self) -> EulerAngles {
        let M = &self.0;
        let cy = f64::hypot(M[(0, 0)], M[(1, 0)]);
        if cy > EPS4 {
            EulerAngles {
                roll: f64::atan2(M[(2, 1)], M[(2, 2)]),
                pitch: f64::atan2(-M[(2, 0)], cy),
                yaw: f64::atan2(M[(1, 0)], M[(0, 0)]),
            }
        } else {
            // Gimbal lock: yaw is folded into roll
            EulerAngles {
                roll: f64::atan2(-M[(1, 2)], M[(1, 1)]),
                pitch: f64::atan2(-M[(2, 0)], cy),
                yaw: 0.,
            }
        }
    }

    pub fn roll(&self) -> f64 {
        self.euler().roll
    }

    pub fn pitch(&self) -> f64 {
        self.euler().pitch
    }

    pub fn yaw(&self) -> f64 {
        self.euler().yaw
    }
}

impl From<EulerAngles> for Rotation3 {
    fn from(value: EulerAngles) -> Self {
        Self::from_euler(value)
    }
}

impl From<Quaternion> for Rotation3 {
    fn from(value: Quaternion) -> Self {
        Self::from_quaternion(value)
    }
}

impl Mul<&Rotation3> for &Rotation3 {
    type Output = Rotation3;

    fn mul(self, rhs: &Rotation3) -> Self::Output {
        Rotation3(self.0.matmul(&rhs.0))
    }
}
