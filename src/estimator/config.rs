use std::borrow::Cow;

use crate::{filter::FilterConfig, util::units::inches_to_meters};

/// Default printed tag size (6 inches, black border to black border)
pub const DEFAULT_TAG_SIZE: f64 = inches_to_meters(6.);

/// Default tag family
pub const DEFAULT_FAMILY: &str = "tag16h5";

/// Which pose is reported for each detected tag
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum PoseOutput {
	/// The tag's pose relative to the camera, in field axes
	#[default]
	CameraRelative,
	/// The tag's pose on the field, from the field layout
	TagField,
	/// The camera's pose on the field
	///
	/// Computed as the tag's field pose composed with the inverse of the
	/// camera-relative pose.
	CameraField,
}

impl PoseOutput {
	/// Does this output mode need a [FieldLayout](crate::FieldLayout)?
	pub const fn requires_layout(&self) -> bool {
		match self {
			Self::CameraRelative => false,
			Self::TagField | Self::CameraField => true,
		}
	}
}

/// Configuration for [PoseEstimator](super::PoseEstimator)
#[derive(Clone, Debug, PartialEq)]
pub struct EstimatorConfig {
	/// Detection filter thresholds
	pub filter: FilterConfig,

	/// Edge length of the printed tag, in meters
	pub tag_size: f64,

	/// Tag family passed on to the detector
	pub family: Cow<'static, str>,

	/// Which pose to report
	pub output: PoseOutput,
}

impl Default for EstimatorConfig {
	fn default() -> Self {
		Self {
			filter: FilterConfig::default(),
			tag_size: DEFAULT_TAG_SIZE,
			family: Cow::Borrowed(DEFAULT_FAMILY),
			output: PoseOutput::default(),
		}
	}
}

#[cfg(test)]
mod test {
	use super::{EstimatorConfig, PoseOutput, DEFAULT_TAG_SIZE};

	#[test]
	fn defaults() {
		let config = EstimatorConfig::default();
		assert!((DEFAULT_TAG_SIZE - 0.1524).abs() < 1e-12);
		assert_eq!(config.family, "tag16h5");
		assert_eq!(config.output, PoseOutput::CameraRelative);
		assert_eq!(config.filter.tag_ids, 1..=8);
	}

	#[test]
	fn layout_modes() {
		assert!(!PoseOutput::CameraRelative.requires_layout());
		assert!(PoseOutput::TagField.requires_layout());
		assert!(PoseOutput::CameraField.requires_layout());
	}
}
