use serde::Serialize;

use crate::estimator::BestResult;

/// One frame's worth of published data
///
/// When `target_valid` is false, every other field except the timestamp is zero.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TelemetrySample {
    pub tag_id: u32,
    /// Meters
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// Radians
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
    /// Frame capture time, seconds
    pub timestamp_sec: f64,
    pub target_valid: bool,
}

impl TelemetrySample {
    /// Sample for a frame where nothing passed filtering
    pub const fn no_target(timestamp_sec: f64) -> Self {
        Self {
            tag_id: 0,
            x: 0.,
            y: 0.,
            z: 0.,
            roll: 0.,
            pitch: 0.,
            yaw: 0.,
            timestamp_sec,
            target_valid: false,
        }
    }

    /// `[id, x, y, z, roll, pitch, yaw]`, the layout of the `BestResult` entry
    pub fn best_result_array(&self) -> [f64; 7] {
        [self.tag_id as f64, self.x, self.y, self.z, self.roll, self.pitch, self.yaw]
    }
}

impl From<&BestResult> for TelemetrySample {
    fn from(best: &BestResult) -> Self {
        Self {
            tag_id: best.id,
            x: best.translation.x(),
            y: best.translation.y(),
            z: best.translation.z(),
            roll: best.rotation.roll,
            pitch: best.rotation.pitch,
            yaw: best.rotation.yaw,
            timestamp_sec: best.timestamp,
            target_valid: true,
        }
    }
}
