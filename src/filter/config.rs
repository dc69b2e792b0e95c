use std::ops::RangeInclusive;

use thiserror::Error;

/// Error generated when a [FilterConfig] can never accept a detection
#[derive(Clone, Debug, PartialEq, Error)]
#[non_exhaustive]
pub enum FilterConfigError {
    #[error("Valid tag id range {start}..={end} is empty")]
    EmptyIdRange {
        start: u32,
        end: u32,
    },
    #[error("Maximum reprojection error must be finite and non-negative (actual: {0})")]
    InvalidMaxError(f64),
    #[error("Minimum decision margin must not be NaN")]
    InvalidMinConfidence,
}

/// Thresholds used by [DetectionFilter](super::DetectionFilter)
///
/// Each threshold is an independent gate; a detection must pass all of them.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterConfig {
    /// Tag ids that exist on the field. Anything else is environmental noise.
    pub tag_ids: RangeInclusive<u32>,

    /// Maximum number of corrected bits.
    ///
    /// Accepting large numbers of corrected errors leads to greatly
    /// increased false positive rates.
    pub max_hamming: u16,

    /// Maximum object-space error of the fitted pose
    pub max_error: f64,

    /// Minimum decision margin
    pub min_confidence: f32,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            tag_ids: 1..=crate::field::CHARGED_UP_CAPACITY as u32,
            max_hamming: 1,
            max_error: 1e-3,
            min_confidence: 30.,
        }
    }
}

impl FilterConfig {
    /// Default thresholds, accepting ids `1..=capacity`
    pub fn for_capacity(capacity: usize) -> Self {
        Self {
            tag_ids: 1..=(capacity as u32),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), FilterConfigError> {
        if self.tag_ids.is_empty() {
            return Err(FilterConfigError::EmptyIdRange { start: *self.tag_ids.start(), end: *self.tag_ids.end() });
        }
        if !self.max_error.is_finite() || self.max_error < 0. {
            return Err(FilterConfigError::InvalidMaxError(self.max_error));
        }
        if self.min_confidence.is_nan() {
            return Err(FilterConfigError::InvalidMinConfidence);
        }
        Ok(())
    }
}
