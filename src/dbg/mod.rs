//! Debug helpers
mod timeprofile;

pub use timeprofile::{FrameProfile, FrameProfileStatistics};
