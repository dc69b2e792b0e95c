//! Field-relative robot localization from AprilTag detections.
//!
//! The pipeline for each camera frame is:
//! 1. An external detector produces [RawDetection]s.
//! 2. [DetectionFilter] throws out tags that are not on the field or look like noise,
//!    and picks the detection with the best decision margin.
//! 3. [transform::camera_to_field] converts each survivor from the camera's axes
//!    to the field's axes.
//! 4. Optionally, the pose is combined with the known tag poses in a [FieldLayout].
//! 5. The best result is handed to a [Publisher].
//!
//! [PoseEstimator] runs the whole thing.
#![allow(non_snake_case)]

pub mod util;
pub mod geometry;
pub mod field;
pub mod transform;
pub mod filter;
mod estimator;
pub mod telemetry;
mod dbg;

pub use field::{FieldLayout, FieldLayoutError, Origin, Tag};
pub use filter::{DetectionFilter, DetectorPose, FilterConfig, FilteredDetections, RawDetection};
pub use estimator::{
    BestResult,
    CameraIntrinsics,
    DetectionSource,
    DetectorSettings,
    EstimatorBuildError,
    EstimatorBuilder,
    EstimatorConfig,
    Frame,
    FrameResult,
    PoseEstimator,
    PoseOutput,
    TagEstimate,
    DEFAULT_FAMILY,
    DEFAULT_TAG_SIZE,
};
pub use telemetry::{MemoryTable, Publisher, TelemetryError, TelemetrySample, TelemetrySession, Transport};
pub use dbg::{FrameProfile, FrameProfileStatistics};
