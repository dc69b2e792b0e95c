pub mod math;
pub mod units;
