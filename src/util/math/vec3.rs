use std::ops::{Add, Sub, Neg};

/// 3 element vector
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3(pub f64, pub f64, pub f64);

impl Vec3 {
    /// Create from constant values
    pub const fn of(x: f64, y: f64, z: f64) -> Self {
        Self(x, y, z)
    }

    /// Vector of all zeroes
    pub const fn zero() -> Self {
        Self(0., 0., 0.)
    }

    pub const fn x(&self) -> f64 {
        self.0
    }

    pub const fn y(&self) -> f64 {
        self.1
    }

    pub const fn z(&self) -> f64 {
        self.2
    }

    /// Are all elements finite?
    pub fn is_finite(&self) -> bool {
        self.0.is_finite() && self.1.is_finite() && self.2.is_finite()
    }
}

impl From<[f64; 3]> for Vec3 {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self(x, y, z)
    }
}

#[cfg(test)]
impl float_cmp::ApproxEq for Vec3 {
    type Margin = float_cmp::F64Margin;

    fn approx_eq<M: Into<Self::Margin>>(self, other: Self, margin: M) -> bool {
        use float_cmp::ApproxEq;
        let margin = margin.into();
        self.0.approx_eq(other.0, margin) && self.1.approx_eq(other.1, margin) && self.2.approx_eq(other.2, margin)
    }
}

/// Vector addition
impl Add<&Vec3> for &Vec3 {
    type Output = Vec3;

    fn add(self, rhs: &Vec3) -> Self::Output {
        Vec3(self.0 + rhs.0, self.1 + rhs.1, self.2 + rhs.2)
    }
}

/// Vector subtraction
impl Sub<&Vec3> for &Vec3 {
    type Output = Vec3;

    fn sub(self, rhs: &Vec3) -> Self::Output {
        Vec3(self.0 - rhs.0, self.1 - rhs.1, self.2 - rhs.2)
    }
}

/// Vector negative
impl Neg for Vec3 {
    type Output = Vec3;

    fn neg(self) -> Self::Output {
        Vec3(-self.0, -self.1, -self.2)
    }
}
