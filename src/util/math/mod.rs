mod vec3;
pub use vec3::Vec3;

pub mod mat;
pub use mat::Mat33;

use std::f64::consts::PI;

/// Wrap `input` into `[minimum, maximum]`
///
/// Values already inside the range are returned unchanged.
pub fn input_modulus(input: f64, minimum: f64, maximum: f64) -> f64 {
    let modulus = maximum - minimum;

    // Wrap input if it's above the maximum input
    let num_max = ((input - minimum) / modulus).trunc();
    let input = input - num_max * modulus;

    // Wrap input if it's below the minimum input
    let num_min = ((input - maximum) / modulus).trunc();
    input - num_min * modulus
}

/// Map `angle` (radians) to `[-π, π]`
#[inline]
pub fn angle_modulus(angle: f64) -> f64 {
    input_modulus(angle, -PI, PI)
}
