//! Per-frame orchestration: filter the detector output, convert the
//! survivors into field axes, pick the best one and publish it.
mod builder;
mod config;
mod detector;
mod error;
mod result;

use std::f64::consts::PI;

use tracing::{debug, info_span, warn};

use crate::{
	dbg::{FrameProfile, FrameProfileStatistics},
	field::{FieldLayout, Origin},
	filter::{DetectionFilter, RawDetection},
	geometry::{Pose3, Rotation3},
	telemetry::{Publisher, TelemetryError},
	transform::camera_to_field,
	util::math::Vec3,
};

pub use builder::EstimatorBuilder;
pub use config::{EstimatorConfig, PoseOutput, DEFAULT_FAMILY, DEFAULT_TAG_SIZE};
pub use detector::{CameraIntrinsics, DetectorSettings};
pub use error::EstimatorBuildError;
pub use result::{BestResult, DetectionSource, Frame, FrameResult, TagEstimate};

/// Turns raw detections into field-relative pose estimates
///
/// Create with [EstimatorBuilder].
#[derive(Clone, Debug)]
pub struct PoseEstimator {
	config: EstimatorConfig,
	filter: DetectionFilter,
	layout: Option<FieldLayout>,
}

impl PoseEstimator {
	/// Estimator with default configuration
	pub fn new() -> Result<Self, EstimatorBuildError> {
		EstimatorBuilder::default().build()
	}

	pub fn builder() -> EstimatorBuilder {
		EstimatorBuilder::default()
	}

	pub const fn config(&self) -> &EstimatorConfig {
		&self.config
	}

	pub fn layout(&self) -> Option<&FieldLayout> {
		self.layout.as_ref()
	}

	/// Change the field origin (no-op without a layout)
	///
	/// Intended to be called once at session start, before steady-state
	/// processing.
	pub fn set_origin(&mut self, origin: Origin) {
		if let Some(layout) = self.layout.as_mut() {
			layout.set_origin(origin);
		}
	}

	/// Settings the external detector should be configured with
	pub fn detector_settings(&self, intrinsics: CameraIntrinsics) -> DetectorSettings {
		DetectorSettings::new(
			intrinsics,
			self.config.family.clone(),
			self.config.tag_size,
			self.config.filter.max_hamming,
		)
	}

	/// Produce the reported pose for a single detection
	fn estimate(&self, detection: &RawDetection) -> Option<TagEstimate> {
		let detector_pose = detection.pose.as_ref()?;
		let camera_relative = camera_to_field(&detector_pose.rotation, &detector_pose.translation);

		let pose = match (self.config.output, self.layout.as_ref()) {
			(PoseOutput::CameraRelative, _) | (_, None) => camera_relative,
			(PoseOutput::TagField, Some(layout)) => tag_field_pose(layout, detection.id),
			(PoseOutput::CameraField, Some(layout)) => tag_field_pose(layout, detection.id)
				.compose(&detected_tag_in_layout_frame())
				.compose(&camera_relative.inverse()),
		};

		Some(TagEstimate {
			id: detection.id,
			decision_margin: detection.decision_margin,
			camera_relative,
			pose,
		})
	}

	/// Process a single frame
	///
	/// Never fails: bad detections are discarded, and a frame with nothing
	/// left is reported with `target_valid = false`.
	pub fn process(&self, frame: &Frame) -> FrameResult {
		let _span = info_span!("frame", timestamp = frame.timestamp).entered();
		let mut profile = FrameProfile::default();

		let filtered = self.filter.filter(&frame.detections);
		profile.stamp("filter");

		let estimates = filtered.detections
			.iter()
			.filter_map(|detection| self.estimate(detection))
			.collect::<Vec<_>>();
		let best = filtered.best_index()
			.and_then(|idx| estimates.get(idx))
			.map(|estimate| BestResult::new(estimate, frame.timestamp));
		profile.stamp("transform");

		debug!(
			detections = frame.detections.len(),
			survivors = estimates.len(),
			best = ?best.as_ref().map(|best| best.id),
			"Processed frame"
		);

		FrameResult {
			timestamp: frame.timestamp,
			target_valid: filtered.target_valid(),
			discarded: filtered.discarded,
			estimates,
			best,
			profile,
		}
	}

	/// Process a frame and hand the result to `publisher` (exactly once)
	pub fn process_and_publish(&self, frame: &Frame, publisher: &mut impl Publisher) -> Result<FrameResult, TelemetryError> {
		let mut result = self.process(frame);
		publisher.publish(&result.sample())?;
		result.profile.stamp("publish");
		Ok(result)
	}

	/// Process frames until `source` runs out
	///
	/// Publish failures are logged and do not stop the loop. Returns timing
	/// statistics for every processed frame.
	pub fn run(&self, source: &mut impl DetectionSource, publisher: &mut impl Publisher) -> FrameProfileStatistics {
		let mut stats = FrameProfileStatistics::default();
		while let Some(frame) = source.next_frame() {
			match self.process_and_publish(&frame, publisher) {
				Ok(result) => stats.add(&result.profile),
				Err(e) => warn!(timestamp = frame.timestamp, error = %e, "Unable to publish frame"),
			}
		}
		stats
	}
}

/// Detected tag frame (x into the tag face, after the axis remap) expressed
/// in the layout's tag frame (x out of the face)
fn detected_tag_in_layout_frame() -> Pose3 {
	Pose3::new(Vec3::zero(), Rotation3::about_z(PI))
}

fn tag_field_pose(layout: &FieldLayout, id: u32) -> Pose3 {
	if !layout.contains(id) {
		debug!(id, "Tag is not in the field layout");
	}
	layout.tag_pose(id)
}
