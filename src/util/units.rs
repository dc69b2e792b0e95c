//! Conversions between the units commonly found in field drawings and SI.

const INCHES_PER_FOOT: f64 = 12.0;
const METERS_PER_INCH: f64 = 0.0254;

pub const fn inches_to_meters(inches: f64) -> f64 {
    inches * METERS_PER_INCH
}

pub const fn meters_to_inches(meters: f64) -> f64 {
    meters / METERS_PER_INCH
}

pub const fn feet_to_meters(feet: f64) -> f64 {
    inches_to_meters(feet * INCHES_PER_FOOT)
}

pub const fn meters_to_feet(meters: f64) -> f64 {
    meters_to_inches(meters) / INCHES_PER_FOOT
}

#[inline]
pub fn degrees_to_radians(degrees: f64) -> f64 {
    degrees.to_radians()
}

#[inline]
pub fn radians_to_degrees(radians: f64) -> f64 {
    radians.to_degrees()
}
