use crate::{field::{FieldLayout, Origin}, filter::DetectionFilter};

use super::{EstimatorBuildError, EstimatorConfig, PoseEstimator, PoseOutput};

#[derive(Clone, Debug, Default)]
pub struct EstimatorBuilder {
	/// Configuration parameters
	pub config: EstimatorConfig,
	layout: Option<FieldLayout>,
}

impl From<PoseEstimator> for EstimatorBuilder {
    fn from(value: PoseEstimator) -> Self {
        Self {
            config: value.config,
            layout: value.layout,
        }
    }
}

impl EstimatorBuilder {
	pub fn new(config: EstimatorConfig) -> Self {
		Self {
			config,
			layout: None,
		}
	}

	pub fn layout(&self) -> Option<&FieldLayout> {
		self.layout.as_ref()
	}

	pub fn set_layout(&mut self, layout: FieldLayout) {
		self.layout = Some(layout);
	}

	/// Use this field layout
	pub fn with_layout(mut self, layout: FieldLayout) -> Self {
		self.set_layout(layout);
		self
	}

	/// Use one of the field layouts built into this crate
	pub fn with_builtin_layout(self, name: &str, origin: Origin) -> Result<Self, EstimatorBuildError> {
		let mut layout = FieldLayout::load(name, false)?;
		layout.set_origin(origin);
		Ok(self.with_layout(layout))
	}

	pub fn clear_layout(&mut self) {
		self.layout = None;
	}

	pub fn with_output(mut self, output: PoseOutput) -> Self {
		self.config.output = output;
		self
	}

	/// Build an estimator with these options
	pub fn build(self) -> Result<PoseEstimator, EstimatorBuildError> {
		let config = self.config;
		let filter = DetectionFilter::new(config.filter.clone())?;

		if !(config.tag_size.is_finite() && config.tag_size > 0.) {
			return Err(EstimatorBuildError::InvalidTagSize(config.tag_size));
		}

		match &self.layout {
			// Only layout-composing modes look tags up in the layout
			Some(layout) if config.output.requires_layout() => {
				let max_id = *config.filter.tag_ids.end();
				if max_id as usize > layout.capacity() {
					return Err(EstimatorBuildError::LayoutTooSmall { capacity: layout.capacity(), max_id });
				}
			},
			Some(_) => {},
			None if config.output.requires_layout() => return Err(EstimatorBuildError::MissingLayout(config.output)),
			None => {},
		}

		Ok(PoseEstimator {
			config,
			filter,
			layout: self.layout,
		})
	}
}
