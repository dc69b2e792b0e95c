//! Parameters handed to the external tag detector
use std::borrow::Cow;

use crate::util::math::Mat33;

/// Pinhole camera intrinsics
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraIntrinsics {
	/// Focal length (x), pixels
	pub fx: f64,
	/// Focal length (y), pixels
	pub fy: f64,
	/// Principal point (x), pixels
	pub cx: f64,
	/// Principal point (y), pixels
	pub cy: f64,
}

impl CameraIntrinsics {
	pub const fn new(fx: f64, fy: f64, cx: f64, cy: f64) -> Self {
		Self { fx, fy, cx, cy }
	}

	/// Extract intrinsics from a 3x3 camera calibration matrix
	/// ```text
	/// [fx  0 cx]
	/// [ 0 fy cy]
	/// [ 0  0  1]
	/// ```
	pub fn from_matrix(K: &Mat33) -> Self {
		Self {
			fx: K[(0, 0)],
			fy: K[(1, 1)],
			cx: K[(0, 2)],
			cy: K[(1, 2)],
		}
	}

	/// Are the focal lengths positive and everything finite?
	pub fn is_valid(&self) -> bool {
		[self.fx, self.fy, self.cx, self.cy].iter().all(|v| v.is_finite())
			&& self.fx > 0.
			&& self.fy > 0.
	}

	pub fn as_tuple(&self) -> (f64, f64, f64, f64) {
		(self.fx, self.fy, self.cx, self.cy)
	}
}

/// Everything the external detector needs to produce [RawDetection](crate::RawDetection)s
#[derive(Clone, Debug, PartialEq)]
pub struct DetectorSettings {
	pub intrinsics: CameraIntrinsics,
	/// Tag family name
	pub family: Cow<'static, str>,
	/// Tag edge length, meters
	pub tag_size: f64,
	/// Number of bit errors the detector should correct
	pub bits_corrected: u16,
	/// How many threads should be used?
	pub nthreads: usize,
	/// Detection of quads can be done on a lower-resolution image.
	pub quad_decimate: f32,
	/// What Gaussian blur should be applied to the segmented image
	pub quad_sigma: f32,
	/// Should edges be snapped to strong gradients?
	pub refine_edges: bool,
	/// How much sharpening should be done to decoded images?
	pub decode_sharpening: f64,
}

impl DetectorSettings {
	pub fn new(intrinsics: CameraIntrinsics, family: Cow<'static, str>, tag_size: f64, bits_corrected: u16) -> Self {
		Self {
			intrinsics,
			family,
			tag_size,
			bits_corrected,
			nthreads: 10,
			quad_decimate: 1.0,
			quad_sigma: 0.0,
			refine_edges: true,
			decode_sharpening: 1.0,
		}
	}
}
