use std::ops::{Index, Mul};

use crate::util::math::Vec3;

/// 3x3 matrix, row-major
#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mat33(pub [f64; 9]);

impl Default for Mat33 {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
impl float_cmp::ApproxEq for Mat33 {
    type Margin = float_cmp::F64Margin;

    fn approx_eq<M: Into<Self::Margin>>(self, other: Self, margin: M) -> bool {
        <&[f64] as float_cmp::ApproxEq>::approx_eq(&self.0, &other.0, margin)
    }
}

impl Mat33 {
    /// Create from array
    pub const fn of(v: [f64; 9]) -> Self {
        Self(v)
    }

    /// Create from rows
    pub const fn from_rows(rows: [[f64; 3]; 3]) -> Self {
        let [[a, b, c], [d, e, f], [g, h, i]] = rows;
        Self([a, b, c, d, e, f, g, h, i])
    }

    /// Create an identity matrix
    pub const fn identity() -> Self {
        Self([
            1., 0., 0.,
            0., 1., 0.,
            0., 0., 1.,
        ])
    }

    /// Rotation matrix from a unit quaternion `(w, x, y, z)`
    pub fn from_quaternion(w: f64, x: f64, y: f64, z: f64) -> Self {
        let qxx = x*x;
        let qyy = y*y;
        let qzz = z*z;
        let qxz = x*z;
        let qxy = x*y;
        let qyz = y*z;
        let qwx = w*x;
        let qwy = w*y;
        let qwz = w*z;

        Self::of([
            1. - 2.*(qyy + qzz), 2.*(qxy - qwz),     2.*(qxz + qwy),
            2.*(qxy + qwz),     1. - 2.*(qxx + qzz), 2.*(qyz - qwx),
            2.*(qxz - qwy),     2.*(qyz + qwx),     1. - 2.*(qxx + qyy),
        ])
    }

    /// Rotation of `theta` radians about the x axis
    pub fn rot_x(theta: f64) -> Self {
        let (s, c) = theta.sin_cos();
        Self::of([
            1., 0., 0.,
            0., c, -s,
            0., s,  c,
        ])
    }

    /// Rotation of `theta` radians about the y axis
    pub fn rot_y(theta: f64) -> Self {
        let (s, c) = theta.sin_cos();
        Self::of([
             c, 0., s,
            0., 1., 0.,
            -s, 0., c,
        ])
    }

    /// Rotation of `theta` radians about the z axis
    pub fn rot_z(theta: f64) -> Self {
        let (s, c) = theta.sin_cos();
        Self::of([
            c, -s, 0.,
            s,  c, 0.,
            0., 0., 1.,
        ])
    }

    /// Are all elements finite?
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|v| v.is_finite())
    }

    /// Determinant
    pub fn det(&self) -> f64 {
		0.
			+ self.0[0] * self.0[4] * self.0[8]
			- self.0[0] * self.0[5] * self.0[7]
			+ self.0[1] * self.0[5] * self.0[6]
			- self.0[1] * self.0[3] * self.0[8]
			+ self.0[2] * self.0[3] * self.0[7]
			- self.0[2] * self.0[4] * self.0[6]
    }

    /// Transpose
    pub const fn transposed(&self) -> Self {
        Self([
            self.0[0], self.0[3], self.0[6],
            self.0[1], self.0[4], self.0[7],
            self.0[2], self.0[5], self.0[8],
        ])
    }

    /// Matrix multipliation
    pub fn matmul(&self, rhs: &Mat33) -> Self {
        Self([
            self.0[0]*rhs.0[0] + self.0[1]*rhs.0[3] + self.0[2]*rhs.0[6], self.0[0]*rhs.0[1] + self.0[1]*rhs.0[4] + self.0[2]*rhs.0[7], self.0[0]*rhs.0[2] + self.0[1]*rhs.0[5] + self.0[2]*rhs.0[8],
            self.0[3]*rhs.0[0] + self.0[4]*rhs.0[3] + self.0[5]*rhs.0[6], self.0[3]*rhs.0[1] + self.0[4]*rhs.0[4] + self.0[5]*rhs.0[7], self.0[3]*rhs.0[2] + self.0[4]*rhs.0[5] + self.0[5]*rhs.0[8],
            self.0[6]*rhs.0[0] + self.0[7]*rhs.0[3] + self.0[8]*rhs.0[6], self.0[6]*rhs.0[1] + self.0[7]*rhs.0[4] + self.0[8]*rhs.0[7], self.0[6]*rhs.0[2] + self.0[7]*rhs.0[5] + self.0[8]*rhs.0[8],
        ])
    }

    /// Matrix multiplication (equivalent to `self.transposed().matmul(rhs)`)
    pub fn transpose_matmul(&self, rhs: &Mat33) -> Self {
        Self([
            self.0[0]*rhs.0[0] + self.0[3]*rhs.0[3] + self.0[6]*rhs.0[6], self.0[0]*rhs.0[1] + self.0[3]*rhs.0[4] + self.0[6]*rhs.0[7], self.0[0]*rhs.0[2] + self.0[3]*rhs.0[5] + self.0[6]*rhs.0[8],
            self.0[1]*rhs.0[0] + self.0[4]*rhs.0[3] + self.0[7]*rhs.0[6], self.0[1]*rhs.0[1] + self.0[4]*rhs.0[4] + self.0[7]*rhs.0[7], self.0[1]*rhs.0[2] + self.0[4]*rhs.0[5] + self.0[7]*rhs.0[8],
            self.0[2]*rhs.0[0] + self.0[5]*rhs.0[3] + self.0[8]*rhs.0[6], self.0[2]*rhs.0[1] + self.0[5]*rhs.0[4] + self.0[8]*rhs.0[7], self.0[2]*rhs.0[2] + self.0[5]*rhs.0[5] + self.0[8]*rhs.0[8],
        ])
    }

    /// Conjugate by `P`, i.e. `P * self * P'`
    pub fn conjugate(&self, P: &Mat33) -> Self {
        P.matmul(self).matmul(&P.transposed())
    }

    /// Is this matrix orthonormal with determinant +1 (within `tolerance`)?
    pub fn is_rotation(&self, tolerance: f64) -> bool {
        let RtR = self.transpose_matmul(self);
        let I = Self::identity();
        let orthogonal = RtR.0.iter()
            .zip(I.0.iter())
            .all(|(a, b)| (a - b).abs() <= tolerance);
        orthogonal && (self.det() - 1.).abs() <= tolerance
    }
}

impl Index<(usize, usize)> for Mat33 {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        debug_assert!(row < 3);
        debug_assert!(col < 3);
        let idx = row * 3 + col;
        &self.0[idx]
    }
}

impl Mul<&Vec3> for &Mat33 {
    type Output = Vec3;

    fn mul(self, rhs: &Vec3) -> Self::Output {
        Vec3::of(
            self.0[0] * rhs.0 + self.0[1] * rhs.1 + self.0[2] * rhs.2,
            self.0[3] * rhs.0 + self.0[4] * rhs.1 + self.0[5] * rhs.2,
            self.0[6] * rhs.0 + self.0[7] * rhs.1 + self.0[8] * rhs.2,
        )
    }
}

impl Mul<Vec3> for Mat33 {
    type Output = Vec3;

    fn mul(self, rhs: Vec3) -> Self::Output {
        <&Mat33 as Mul<&Vec3>>::mul(&self, &rhs)
    }
}

impl Mul<&Mat33> for &Mat33 {
    type Output = Mat33;

    fn mul(self, rhs: &Mat33) -> Self::Output {
        self.matmul(rhs)
    }
}

#[cfg(test)]
mod test {
    use std::f64::consts::{FRAC_PI_2, PI};

    use float_cmp::approx_eq;

    use crate::util::math::Vec3;
    use super::Mat33;

    #[test]
    fn rot_z_quarter_turn() {
        let R = Mat33::rot_z(FRAC_PI_2);
        let v = R * Vec3::of(1., 0., 0.);
        assert!(approx_eq!(Vec3, v, Vec3::of(0., 1., 0.), epsilon = 1e-12));
    }

    #[test]
    fn quaternion_matches_axis_rotation() {
        // 180 degrees about z
        let q = Mat33::from_quaternion(0., 0., 0., 1.);
        assert!(approx_eq!(Mat33, q, Mat33::rot_z(PI), epsilon = 1e-12));

        // 90 degrees about x
        let h = FRAC_PI_2 / 2.;
        let q = Mat33::from_quaternion(h.cos(), h.sin(), 0., 0.);
        assert!(approx_eq!(Mat33, q, Mat33::rot_x(FRAC_PI_2), epsilon = 1e-12));
    }

    #[test]
    fn transpose_matmul_is_inverse() {
        let R = Mat33::rot_x(0.3).matmul(&Mat33::rot_y(-1.1)).matmul(&Mat33::rot_z(2.0));
        assert!(R.is_rotation(1e-12));
        assert!(approx_eq!(Mat33, R.transpose_matmul(&R), Mat33::identity(), epsilon = 1e-12));
    }

    #[test]
    fn det_of_reflection() {
        let P = Mat33::from_rows([
            [0., 0., 1.],
            [1., 0., 0.],
            [0., -1., 0.],
        ]);
        assert_eq!(P.det(), -1.);
        assert!(!P.is_rotation(1e-12));
    }
}
