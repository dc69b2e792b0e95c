use crate::{
	dbg::FrameProfile,
	filter::RawDetection,
	geometry::{EulerAngles, Pose3},
	telemetry::TelemetrySample,
	util::math::Vec3,
};

/// One camera frame's detector output
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
	/// Capture time, seconds
	pub timestamp: f64,
	/// Detections, in the order the detector reported them
	pub detections: Vec<RawDetection>,
}

impl Frame {
	pub fn new(timestamp: f64, detections: impl IntoIterator<Item = RawDetection>) -> Self {
		Self {
			timestamp,
			detections: detections.into_iter().collect(),
		}
	}
}

/// Produces frames until the stream ends
pub trait DetectionSource {
	/// Next frame, or `None` at end of stream
	fn next_frame(&mut self) -> Option<Frame>;
}

impl<I: Iterator<Item = Frame>> DetectionSource for I {
	fn next_frame(&mut self) -> Option<Frame> {
		self.next()
	}
}

/// Pose estimate for a single surviving detection
#[derive(Clone, Debug, PartialEq)]
pub struct TagEstimate {
	pub id: u32,
	pub decision_margin: f32,
	/// The tag's pose relative to the camera, in field axes
	pub camera_relative: Pose3,
	/// Reported pose (depends on [PoseOutput](super::PoseOutput))
	pub pose: Pose3,
}

/// The single most trustworthy detection of a frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BestResult {
	pub id: u32,
	/// Meters
	pub translation: Vec3,
	/// Radians
	pub rotation: EulerAngles,
	/// Frame capture time, seconds
	pub timestamp: f64,
}

impl BestResult {
	pub fn new(estimate: &TagEstimate, timestamp: f64) -> Self {
		Self {
			id: estimate.id,
			translation: estimate.pose.translation,
			rotation: estimate.pose.euler(),
			timestamp,
		}
	}
}

/// Output of [PoseEstimator::process](super::PoseEstimator::process)
#[derive(Clone, Debug)]
pub struct FrameResult {
	pub timestamp: f64,
	/// One estimate per surviving detection, in arrival order
	pub estimates: Vec<TagEstimate>,
	pub best: Option<BestResult>,
	/// Did any detection pass filtering?
	pub target_valid: bool,
	/// Number of detections thrown out
	pub discarded: usize,
	pub profile: FrameProfile,
}

impl FrameResult {
	/// What gets published for this frame
	pub fn sample(&self) -> TelemetrySample {
		match &self.best {
			Some(best) => TelemetrySample::from(best),
			None => TelemetrySample::no_target(self.timestamp),
		}
	}
}
