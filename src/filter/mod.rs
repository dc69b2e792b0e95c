//! Per-frame rejection of noisy detections and selection of the best one.
mod config;

use std::fmt::Display;

use tracing::trace;

use crate::util::math::{Mat33, Vec3};

pub use config::{FilterConfig, FilterConfigError};

/// Pose reported by the detector, in the camera frame (x right, y down, z forward)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetectorPose {
    pub rotation: Mat33,
    /// Meters
    pub translation: Vec3,
}

impl DetectorPose {
    pub const fn new(rotation: Mat33, translation: Vec3) -> Self {
        Self { rotation, translation }
    }

    fn is_finite(&self) -> bool {
        self.rotation.is_finite() && self.translation.is_finite()
    }
}

/// One candidate tag, as reported by the external detector
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RawDetection {
    /// The decoded ID of the tag
    pub id: u32,

    /// How many error bits were corrected?
    pub hamming: u16,

    /// Detector confidence. Higher is better.
    pub decision_margin: f32,

    /// `None` if the detector did not produce a pose
    pub pose: Option<DetectorPose>,

    /// Residual of the pose fit. Lower is better.
    pub pose_error: f64,
}

impl RawDetection {
    pub const fn new(id: u32, rotation: Mat33, translation: Vec3) -> Self {
        Self {
            id,
            hamming: 0,
            decision_margin: 0.,
            pose: Some(DetectorPose::new(rotation, translation)),
            pose_error: 0.,
        }
    }

    /// Set the decoding/fit quality metrics
    pub const fn with_metrics(mut self, hamming: u16, pose_error: f64, decision_margin: f32) -> Self {
        self.hamming = hamming;
        self.pose_error = pose_error;
        self.decision_margin = decision_margin;
        self
    }
}

/// Why a detection was discarded
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Rejection {
    /// Tag id is not on this field
    IdOutOfRange,
    /// Missing or non-finite pose
    MalformedPose,
    /// Too many corrected bits
    Hamming,
    /// Pose fit residual too large (or NaN)
    PoseError,
    /// Decision margin too small (or NaN)
    Confidence,
}

impl Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::IdOutOfRange => "id out of range",
            Self::MalformedPose => "malformed pose",
            Self::Hamming => "hamming distance",
            Self::PoseError => "pose error",
            Self::Confidence => "decision margin",
        })
    }
}

/// Detections that survived a frame's filtering pass
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilteredDetections {
    /// Survivors, in arrival order
    pub detections: Vec<RawDetection>,
    /// Index into `detections`
    best: Option<usize>,
    /// Number of discarded detections
    pub discarded: usize,
}

impl FilteredDetections {
    /// Survivor with the largest decision margin (first one on ties)
    pub fn best(&self) -> Option<&RawDetection> {
        self.best.map(|idx| &self.detections[idx])
    }

    pub fn best_index(&self) -> Option<usize> {
        self.best
    }

    /// Did anything survive?
    pub fn target_valid(&self) -> bool {
        !self.detections.is_empty()
    }

    pub fn len(&self) -> usize {
        self.detections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }
}

/// Stateless per-frame detection filter
#[derive(Clone, Debug)]
pub struct DetectionFilter {
    config: FilterConfig,
}

impl Default for DetectionFilter {
    fn default() -> Self {
        Self { config: FilterConfig::default() }
    }
}

impl DetectionFilter {
    pub fn new(config: FilterConfig) -> Result<Self, FilterConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub const fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Check a single detection against every gate
    pub fn check(&self, detection: &RawDetection) -> Result<(), Rejection> {
        let config = &self.config;
        if !config.tag_ids.contains(&detection.id) {
            return Err(Rejection::IdOutOfRange);
        }
        match &detection.pose {
            Some(pose) if pose.is_finite() => {},
            _ => return Err(Rejection::MalformedPose),
        }
        if detection.hamming > config.max_hamming {
            return Err(Rejection::Hamming);
        }
        if !(detection.pose_error <= config.max_error) {
            return Err(Rejection::PoseError);
        }
        if !(detection.decision_margin >= config.min_confidence) {
            return Err(Rejection::Confidence);
        }
        Ok(())
    }

    /// Run one frame's detections through the filter
    pub fn filter<'a>(&self, detections: impl IntoIterator<Item = &'a RawDetection>) -> FilteredDetections {
        let mut result = FilteredDetections::default();

        for detection in detections {
            if let Err(reason) = self.check(detection) {
                trace!(id = detection.id, %reason, "Discarding detection");
                result.discarded += 1;
                continue;
            }

            // Strictly greater, so ties keep the earlier detection
            let is_best = match result.best() {
                Some(best) => detection.decision_margin > best.decision_margin,
                None => true,
            };
            if is_best {
                result.best = Some(result.detections.len());
            }
            result.detections.push(*detection);
        }

        result
    }
}

#[cfg(test)]
mod test {
    use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};

    use crate::util::math::{Mat33, Vec3};
    use super::{DetectionFilter, DetectorPose, FilterConfig, FilterConfigError, RawDetection, Rejection};

    fn detection(id: u32, hamming: u16, error: f64, margin: f32) -> RawDetection {
        RawDetection::new(id, Mat33::identity(), Vec3::of(0., 0., 2.))
            .with_metrics(hamming, error, margin)
    }

    #[test]
    fn defaults() {
        let config = FilterConfig::default();
        assert_eq!(config.tag_ids, 1..=8);
        assert_eq!(config.max_hamming, 1);
        assert_eq!(config.max_error, 1e-3);
        assert_eq!(config.min_confidence, 30.);
    }

    #[test]
    fn out_of_range_ids_always_discarded() {
        let mut rng = StdRng::seed_from_u64(7);
        for capacity in [8usize, 30] {
            let filter = DetectionFilter::new(FilterConfig::for_capacity(capacity)).unwrap();
            let mut ids = vec![0, capacity as u32 + 1, u32::MAX];
            ids.extend((0..50).map(|_| rng.gen_range(capacity as u32 + 1..10_000)));
            for id in ids {
                let det = detection(id, 0, 0., 1000.);
                assert_eq!(filter.check(&det), Err(Rejection::IdOutOfRange));
                assert!(!filter.filter([&det]).target_valid());
            }
            for id in 1..=capacity as u32 {
                assert_eq!(filter.check(&detection(id, 0, 0., 1000.)), Ok(()));
            }
        }
    }

    #[test]
    fn perfect_detection_survives() {
        let filter = DetectionFilter::default();
        for id in 1..=8 {
            let result = filter.filter([&detection(id, 0, 0., 1000.)]);
            assert_eq!(result.len(), 1);
            assert_eq!(result.best().map(|det| det.id), Some(id));
        }
    }

    #[test]
    fn gates_are_independent() {
        let filter = DetectionFilter::default();
        assert_eq!(filter.check(&detection(1, 1, 1e-3, 30.)), Ok(()));
        assert_eq!(filter.check(&detection(1, 2, 0., 1000.)), Err(Rejection::Hamming));
        assert_eq!(filter.check(&detection(1, 0, 2e-3, 1000.)), Err(Rejection::PoseError));
        assert_eq!(filter.check(&detection(1, 0, 0., 29.9)), Err(Rejection::Confidence));
    }

    #[test]
    fn malformed_detections_discarded() {
        let filter = DetectionFilter::default();

        let mut missing = detection(2, 0, 0., 100.);
        missing.pose = None;
        assert_eq!(filter.check(&missing), Err(Rejection::MalformedPose));

        let mut nan_pose = detection(2, 0, 0., 100.);
        nan_pose.pose = Some(DetectorPose::new(Mat33::identity(), Vec3::of(f64::NAN, 0., 1.)));
        assert_eq!(filter.check(&nan_pose), Err(Rejection::MalformedPose));

        assert_eq!(filter.check(&detection(2, 0, f64::NAN, 100.)), Err(Rejection::PoseError));
        assert_eq!(filter.check(&detection(2, 0, 0., f32::NAN)), Err(Rejection::Confidence));

        // A bad detection does not spoil the rest of the frame
        let good = detection(4, 0, 0., 50.);
        let result = filter.filter([&missing, &good, &nan_pose]);
        assert_eq!(result.detections, vec![good]);
        assert_eq!(result.discarded, 2);
    }

    #[test]
    fn best_is_largest_margin() {
        let filter = DetectionFilter::default();
        let a = detection(1, 0, 0., 40.);
        let b = detection(2, 0, 0., 90.);
        assert_eq!(filter.filter([&a, &b]).best().unwrap().id, 2);
        assert_eq!(filter.filter([&b, &a]).best().unwrap().id, 2);
    }

    #[test]
    fn ties_keep_arrival_order() {
        let filter = DetectionFilter::default();
        let a = detection(5, 0, 0., 70.);
        let b = detection(6, 0, 0., 70.);
        let result = filter.filter([&a, &b]);
        assert_eq!(result.best().unwrap().id, 5);
        assert_eq!(result.best_index(), Some(0));
        assert_eq!(filter.filter([&b, &a]).best().unwrap().id, 6);
    }

    #[test]
    fn all_survivors_reported() {
        let filter = DetectionFilter::default();
        let mut rng = StdRng::seed_from_u64(99);
        let mut dets = (1..=8).map(|id| detection(id, 0, 0., 30. + id as f32)).collect::<Vec<_>>();
        dets.push(detection(12, 0, 0., 500.));
        dets.push(detection(3, 2, 0., 500.));
        dets.shuffle(&mut rng);

        let result = filter.filter(&dets);
        assert_eq!(result.len(), 8);
        assert_eq!(result.discarded, 2);
        assert_eq!(result.best().unwrap().id, 8);
        // Arrival order is preserved
        let expected = dets.iter().filter(|det| filter.check(det).is_ok()).copied().collect::<Vec<_>>();
        assert_eq!(result.detections, expected);
    }

    #[test]
    fn empty_frame() {
        let none: [RawDetection; 0] = [];
        let result = DetectionFilter::default().filter(&none);
        assert!(result.is_empty());
        assert!(result.best().is_none());
        assert!(!result.target_valid());
    }

    #[test]
    fn invalid_config() {
        #[allow(clippy::reversed_empty_ranges)]
        let config = FilterConfig { tag_ids: 5..=1, ..Default::default() };
        assert_eq!(DetectionFilter::new(config).unwrap_err(), FilterConfigError::EmptyIdRange { start: 5, end: 1 });

        let config = FilterConfig { max_error: -1., ..Default::default() };
        assert!(matches!(DetectionFilter::new(config), Err(FilterConfigError::InvalidMaxError(_))));

        let config = FilterConfig { min_confidence: f32::NAN, ..Default::default() };
        assert!(matches!(DetectionFilter::new(config), Err(FilterConfigError::InvalidMinConfidence)));
    }
}
