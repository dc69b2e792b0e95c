use thiserror::Error;

use crate::{field::FieldLayoutError, filter::FilterConfigError};

use super::PoseOutput;

/// Error generated when attempting to [build](crate::EstimatorBuilder::build) a [PoseEstimator](crate::PoseEstimator)
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EstimatorBuildError {
	#[error("Invalid filter thresholds")]
	Filter(#[from] FilterConfigError),
	#[error("Tag size must be finite and positive (actual: {0})")]
	InvalidTagSize(f64),
	#[error("Output mode {0:?} requires a field layout")]
	MissingLayout(PoseOutput),
	#[error("Field layout is too small for the accepted tag ids (capacity: {capacity}, largest id: {max_id})")]
	LayoutTooSmall {
		capacity: usize,
		max_id: u32,
	},
	#[error("Unable to load field layout")]
	Layout(#[from] FieldLayoutError),
}

impl PartialEq for EstimatorBuildError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Filter(l0), Self::Filter(r0)) => l0 == r0,
            (Self::InvalidTagSize(l0), Self::InvalidTagSize(r0)) => l0 == r0,
            (Self::MissingLayout(l0), Self::MissingLayout(r0)) => l0 == r0,
            (Self::LayoutTooSmall { capacity: lc, max_id: lm }, Self::LayoutTooSmall { capacity: rc, max_id: rm }) => lc == rc && lm == rm,
            // FieldLayoutError is not comparable
            (Self::Layout(_), Self::Layout(_)) => false,
            _ => false,
        }
    }
}
